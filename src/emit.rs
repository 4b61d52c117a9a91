//! Canonical text form of a validated manifest.
//!
//! Blocks are emitted per kind, sorted by id, separated by blank lines, with
//! resolved class/protocol names as comments. Repeated emission of the same
//! model is byte-stable; whitespace and comments of the source are not
//! preserved.

use std::fmt;

use crate::descriptor::{
    BundleDescriptor, CPortDescriptor, DeviceDescriptor, InterfaceDescriptor, MikrobusDescriptor,
    PropertyDescriptor, StringDescriptor,
};
use crate::manifest::{Manifest, ManifestHeader};

impl fmt::Display for ManifestHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[manifest-header]")?;
        writeln!(f, "version-major = {}", self.major)?;
        writeln!(f, "version-minor = {}", self.minor)
    }
}

impl fmt::Display for InterfaceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[interface-descriptor]")?;
        writeln!(f, "vendor-string-id = {:#x}", self.vendor_string_id)?;
        writeln!(f, "product-string-id = {:#x}", self.product_string_id)
    }
}

impl fmt::Display for MikrobusDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[mikrobus-descriptor]")?;
        writeln!(f, "pwm-state = {:#x}", self.pwm)?;
        writeln!(f, "int-state = {:#x}", self.int)?;
        writeln!(f, "rx-state = {:#x}", self.rx)?;
        writeln!(f, "tx-state = {:#x}", self.tx)?;
        writeln!(f, "scl-state = {:#x}", self.scl)?;
        writeln!(f, "sda-state = {:#x}", self.sda)?;
        writeln!(f, "mosi-state = {:#x}", self.mosi)?;
        writeln!(f, "miso-state = {:#x}", self.miso)?;
        writeln!(f, "sck-state = {:#x}", self.sck)?;
        writeln!(f, "cs-state = {:#x}", self.cs)?;
        writeln!(f, "rst-state = {:#x}", self.rst)?;
        writeln!(f, "an-state = {:#x}", self.an)
    }
}

impl fmt::Display for DeviceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[device-descriptor {:#x}]", self.id)?;
        writeln!(f, "driver-string-id = {:#x}", self.driver_string_id)?;
        writeln!(f, "protocol = {:#x}", self.protocol)?;
        writeln!(f, "reg = {:#x}", self.reg)?;
        writeln!(f, "irq = {:#x}", self.irq)?;
        writeln!(f, "irq-type = {:#x}", self.irq_type)?;
        writeln!(f, "max-speed-hz = {:#x}", self.max_speed_hz)?;
        writeln!(f, "mode = {:#x}", self.mode)?;
        writeln!(f, "prop-link = {:#x}", self.prop_link)?;
        writeln!(f, "gpio-link = {:#x}", self.gpio_link)?;
        writeln!(f, "reg-link = {:#x}", self.reg_link)?;
        writeln!(f, "clock-link = {:#x}", self.clock_link)
    }
}

impl fmt::Display for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[property-descriptor {:#x}]", self.id)?;
        writeln!(f, "name-string-id = {}", self.name_string_id)?;
        writeln!(f, "type = {}", self.type_tag)?;
        let values: Vec<String> = self.value.iter().map(u64::to_string).collect();
        writeln!(f, "value = <{}>", values.join(" "))
    }
}

impl fmt::Display for BundleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; '{}' class on Bundle {}", self.class_name(), self.id)?;
        writeln!(f, "[bundle-descriptor {:#x}]", self.id)?;
        writeln!(f, "class = {:#x}", self.class_code)
    }
}

impl fmt::Display for CPortDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; '{}' protocol on CPort {}", self.protocol_name(), self.id)?;
        writeln!(f, "[cport-descriptor {:#x}]", self.id)?;
        writeln!(f, "bundle = {:#x}", self.bundle_id)?;
        writeln!(f, "protocol = {:#x}", self.protocol_code)
    }
}

/// String blocks are annotated against the interface's vendor/product ids,
/// so they render with the manifest as context rather than standalone.
fn write_string(
    f: &mut fmt::Formatter<'_>,
    desc: &StringDescriptor,
    interface: &InterfaceDescriptor,
) -> fmt::Result {
    if desc.id == interface.vendor_string_id {
        writeln!(f, "; Interface vendor string")?;
    } else if desc.id == interface.product_string_id {
        writeln!(f, "; Interface product string")?;
    }
    writeln!(f, "[string-descriptor {:#x}]", desc.id)?;
    writeln!(f, "string = {}", desc.string)
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header())?;
        write!(f, "\n{}", self.interface())?;
        if let Some(mikrobus) = self.mikrobus() {
            write!(f, "\n{mikrobus}")?;
        }
        for device in self.devices() {
            write!(f, "\n{device}")?;
        }
        for property in self.properties() {
            write!(f, "\n{property}")?;
        }
        for string in self.strings() {
            f.write_str("\n")?;
            write_string(f, string, self.interface())?;
        }
        for bundle in self.bundles() {
            write!(f, "\n{bundle}")?;
        }
        for cport in self.cports() {
            write!(f, "\n{cport}")?;
        }
        Ok(())
    }
}
