//! Build validated manifests from tokenized sections.
//!
//! One builder per descriptor kind; each reads its options through the
//! [`Section`] accessors and inserts into the [`ManifestBuilder`]. The whole
//! document is processed in one pass; any failure aborts the parse with no
//! partial model.

use std::path::Path;

use crate::descriptor::{
    BundleDescriptor, CPortDescriptor, DeviceDescriptor, InterfaceDescriptor, MikrobusDescriptor,
    PropertyDescriptor, Protocol, StringDescriptor,
};
use crate::error::Error;
use crate::manifest::{Manifest, ManifestBuilder, ManifestHeader};
use crate::tokenizer::{self, Section};

// Byte widths of the manifest's numeric fields.
const VERSION_SIZE: usize = 1;
const ID_SIZE: usize = 1;
const CPORT_ID_SIZE: usize = 2;
const MAX_SPEED_SIZE: usize = 4;
const STRING_MAX: usize = 255;
const PROP_VALUE_MAX: usize = 255;

/// The closed set of recognized section names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    Header,
    Interface,
    Mikrobus,
    String,
    Property,
    Device,
    Bundle,
    CPort,
}

impl SectionKind {
    /// Dispatch on the header text. Exact-name sections must match the whole
    /// header; kind+id sections match on the first token.
    fn classify(header: &str) -> Result<SectionKind, Error> {
        match header.split_whitespace().next().unwrap_or("") {
            "manifest-header" if header == "manifest-header" => Ok(SectionKind::Header),
            "interface-descriptor" if header == "interface-descriptor" => {
                Ok(SectionKind::Interface)
            }
            "mikrobus-descriptor" if header == "mikrobus-descriptor" => Ok(SectionKind::Mikrobus),
            "string-descriptor" => Ok(SectionKind::String),
            "property-descriptor" => Ok(SectionKind::Property),
            "device-descriptor" => Ok(SectionKind::Device),
            "bundle-descriptor" => Ok(SectionKind::Bundle),
            "cport-descriptor" => Ok(SectionKind::CPort),
            _ => Err(Error::UnknownSection {
                section: header.to_string(),
            }),
        }
    }
}

/// Parse manifest source into a validated [`Manifest`].
pub fn parse(source: &str) -> Result<Manifest, Error> {
    let document = tokenizer::tokenize(source)?;
    let mut builder = ManifestBuilder::new();
    for section in &document.sections {
        match SectionKind::classify(&section.header)? {
            SectionKind::Header => build_header(section, &mut builder)?,
            SectionKind::Interface => build_interface(section, &mut builder)?,
            SectionKind::Mikrobus => build_mikrobus(section, &mut builder)?,
            SectionKind::String => build_string(section, &mut builder)?,
            SectionKind::Property => build_property(section, &mut builder)?,
            SectionKind::Device => build_device(section, &mut builder)?,
            SectionKind::Bundle => build_bundle(section, &mut builder)?,
            SectionKind::CPort => build_cport(section, &mut builder)?,
        }
    }
    builder.finish()
}

/// Read and parse one manifest file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Manifest, Error> {
    let source = std::fs::read_to_string(path)?;
    parse(&source)
}

fn build_header(section: &Section, builder: &mut ManifestBuilder) -> Result<(), Error> {
    let major = section.int_option("version-major", VERSION_SIZE)? as u8;
    let minor = section.int_option("version-minor", VERSION_SIZE)? as u8;
    builder.set_header(ManifestHeader::new(major, minor)?)
}

fn build_interface(section: &Section, builder: &mut ManifestBuilder) -> Result<(), Error> {
    let vendor_string_id = section.int_option("vendor-string-id", ID_SIZE)? as u8;
    let product_string_id = section.int_option("product-string-id", ID_SIZE)? as u8;
    builder.set_interface(InterfaceDescriptor {
        section: section.header.clone(),
        vendor_string_id,
        product_string_id,
    })
}

fn build_mikrobus(section: &Section, builder: &mut ManifestBuilder) -> Result<(), Error> {
    let pin = |name: &str| -> Result<u8, Error> { Ok(section.int_option(name, ID_SIZE)? as u8) };
    builder.set_mikrobus(MikrobusDescriptor {
        section: section.header.clone(),
        pwm: pin("pwm-state")?,
        int: pin("int-state")?,
        rx: pin("rx-state")?,
        tx: pin("tx-state")?,
        scl: pin("scl-state")?,
        sda: pin("sda-state")?,
        mosi: pin("mosi-state")?,
        miso: pin("miso-state")?,
        sck: pin("sck-state")?,
        cs: pin("cs-state")?,
        rst: pin("rst-state")?,
        an: pin("an-state")?,
    })
}

fn build_string(section: &Section, builder: &mut ManifestBuilder) -> Result<(), Error> {
    let id = section.id(ID_SIZE)? as u8;
    if id == 0 {
        return Err(Error::ZeroId {
            section: section.header.clone(),
        });
    }
    let string = section.str_option("string", STRING_MAX)?.to_string();
    builder.add_string(StringDescriptor {
        section: section.header.clone(),
        id,
        string,
    })
}

fn build_property(section: &Section, builder: &mut ManifestBuilder) -> Result<(), Error> {
    let id = section.id(ID_SIZE)? as u8;
    if id == 0 {
        return Err(Error::ZeroId {
            section: section.header.clone(),
        });
    }
    let name_string_id = section.int_option("name-string-id", ID_SIZE)? as u8;
    let type_tag = section.int_option("type", ID_SIZE)? as u8;
    let elem_width =
        PropertyDescriptor::value_width(type_tag).ok_or_else(|| Error::InvalidValue {
            value: type_tag.to_string(),
            field: "type".to_string(),
            section: section.header.clone(),
            reason: "unknown property type".to_string(),
        })?;
    let value = section.array_option("value", PROP_VALUE_MAX, elem_width)?;
    builder.add_property(PropertyDescriptor {
        section: section.header.clone(),
        id,
        name_string_id,
        type_tag,
        value,
    })
}

fn build_bundle(section: &Section, builder: &mut ManifestBuilder) -> Result<(), Error> {
    let id = section.id(ID_SIZE)? as u8;
    let class_code = section.int_option("class", ID_SIZE)? as u8;
    if id == 0 {
        if class_code != 0 {
            return Err(Error::ControlBundleClass {
                section: section.header.clone(),
            });
        }
    } else {
        if u16::from(id) != builder.next_bundle_id {
            let warning = format!("non-incremental id for '[{}]'", section.header);
            tracing::warn!("{}", warning);
            builder.push_warning(warning);
        }
        builder.next_bundle_id += 1;
    }
    builder.add_bundle(BundleDescriptor {
        section: section.header.clone(),
        id,
        class_code,
        cports: Vec::new(),
    })
}

fn build_cport(section: &Section, builder: &mut ManifestBuilder) -> Result<(), Error> {
    let id = section.id(CPORT_ID_SIZE)? as u16;
    let bundle_id = section.int_option("bundle", ID_SIZE)? as u8;
    let protocol_code = section.int_option("protocol", ID_SIZE)? as u8;
    if id == 0 && protocol_code != 0 {
        return Err(Error::ControlCPortProtocol {
            section: section.header.clone(),
        });
    }
    builder.add_cport(CPortDescriptor {
        section: section.header.clone(),
        id,
        bundle_id,
        protocol_code,
    })
}

fn build_device(section: &Section, builder: &mut ManifestBuilder) -> Result<(), Error> {
    let id = section.id(ID_SIZE)? as u8;
    let driver_string_id = section.int_option("driver-string-id", ID_SIZE)? as u8;
    let protocol = section.int_option("protocol", ID_SIZE)? as u8;

    // SPI devices carry bus speed and mode; UART devices have no address.
    let (max_speed_hz, mode) = if Protocol::from_code(protocol) == Some(Protocol::Spi) {
        (
            section.int_option("max-speed-hz", MAX_SPEED_SIZE)? as u32,
            section.int_option("mode", ID_SIZE)? as u8,
        )
    } else {
        (0, 0)
    };
    let reg = if Protocol::from_code(protocol) != Some(Protocol::Uart) {
        section.int_option("reg", ID_SIZE)? as u8
    } else {
        0
    };
    let (irq, irq_type) = if section.has_option("irq") {
        (
            section.int_option("irq", ID_SIZE)? as u8,
            section.int_option("irq-type", ID_SIZE)? as u8,
        )
    } else {
        (0, 0)
    };
    let link = |name: &str| -> Result<u8, Error> {
        if section.has_option(name) {
            Ok(section.int_option(name, ID_SIZE)? as u8)
        } else {
            Ok(0)
        }
    };

    builder.add_device(DeviceDescriptor {
        section: section.header.clone(),
        id,
        driver_string_id,
        protocol,
        reg,
        irq,
        irq_type,
        max_speed_hz,
        mode,
        prop_link: link("prop-link")?,
        gpio_link: link("gpio-link")?,
        reg_link: link("reg-link")?,
        clock_link: link("clock-link")?,
    })
}
