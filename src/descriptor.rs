//! Typed manifest descriptors and the fixed protocol/class enumerations.

/// Identity of one descriptor instance within a manifest.
///
/// Used for the declaration-order record and as the key of the reference
/// registry (see [`Manifest::mark_referenced`](crate::Manifest::mark_referenced)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorId {
    Interface,
    Mikrobus,
    String(u8),
    Property(u8),
    Device(u8),
    Bundle(u8),
    CPort(u16),
}

/// CPort/device wire protocol codes.
///
/// The numeric code is the wire representation; [`Protocol::from_code`]
/// returns `None` for reserved codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Protocol {
    Control = 0x00,
    Ap = 0x01,
    Gpio = 0x02,
    I2c = 0x03,
    Uart = 0x04,
    Hid = 0x05,
    Usb = 0x06,
    Sdio = 0x07,
    PowerSupply = 0x08,
    Pwm = 0x09,
    Spi = 0x0b,
    Display = 0x0c,
    CameraManagement = 0x0d,
    Sensor = 0x0e,
    Lights = 0x0f,
    Vibrator = 0x10,
    Loopback = 0x11,
    AudioManagement = 0x12,
    AudioData = 0x13,
    Svc = 0x14,
    Firmware = 0x15,
    CameraData = 0x16,
    Raw = 0xfe,
    VendorSpecific = 0xff,
}

impl Protocol {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(Protocol::Control),
            0x01 => Some(Protocol::Ap),
            0x02 => Some(Protocol::Gpio),
            0x03 => Some(Protocol::I2c),
            0x04 => Some(Protocol::Uart),
            0x05 => Some(Protocol::Hid),
            0x06 => Some(Protocol::Usb),
            0x07 => Some(Protocol::Sdio),
            0x08 => Some(Protocol::PowerSupply),
            0x09 => Some(Protocol::Pwm),
            0x0b => Some(Protocol::Spi),
            0x0c => Some(Protocol::Display),
            0x0d => Some(Protocol::CameraManagement),
            0x0e => Some(Protocol::Sensor),
            0x0f => Some(Protocol::Lights),
            0x10 => Some(Protocol::Vibrator),
            0x11 => Some(Protocol::Loopback),
            0x12 => Some(Protocol::AudioManagement),
            0x13 => Some(Protocol::AudioData),
            0x14 => Some(Protocol::Svc),
            0x15 => Some(Protocol::Firmware),
            0x16 => Some(Protocol::CameraData),
            0xfe => Some(Protocol::Raw),
            0xff => Some(Protocol::VendorSpecific),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Protocol::Control => "Control",
            Protocol::Ap => "AP",
            Protocol::Gpio => "GPIO",
            Protocol::I2c => "I2C",
            Protocol::Uart => "UART",
            Protocol::Hid => "HID",
            Protocol::Usb => "USB",
            Protocol::Sdio => "SDIO",
            Protocol::PowerSupply => "Power Supply",
            Protocol::Pwm => "PWM",
            Protocol::Spi => "SPI",
            Protocol::Display => "Display",
            Protocol::CameraManagement => "Camera Management",
            Protocol::Sensor => "Sensor",
            Protocol::Lights => "Lights",
            Protocol::Vibrator => "Vibrator",
            Protocol::Loopback => "Loopback",
            Protocol::AudioManagement => "Audio Management",
            Protocol::AudioData => "Audio Data",
            Protocol::Svc => "SVC",
            Protocol::Firmware => "Firmware",
            Protocol::CameraData => "Camera Data",
            Protocol::Raw => "Raw",
            Protocol::VendorSpecific => "Vendor Specific",
        }
    }

    /// Bundle class the protocol belongs to.
    pub fn class(self) -> u8 {
        match self {
            Protocol::Control => 0x00,
            Protocol::Ap => 0x01,
            Protocol::Hid => 0x05,
            Protocol::PowerSupply => 0x08,
            Protocol::Gpio
            | Protocol::I2c
            | Protocol::Uart
            | Protocol::Usb
            | Protocol::Sdio
            | Protocol::Pwm
            | Protocol::Spi => 0x0a,
            Protocol::Display => 0x0c,
            Protocol::CameraManagement | Protocol::CameraData => 0x0d,
            Protocol::Sensor => 0x0e,
            Protocol::Lights => 0x0f,
            Protocol::Vibrator => 0x10,
            Protocol::Loopback => 0x11,
            Protocol::AudioManagement | Protocol::AudioData => 0x12,
            Protocol::Svc => 0x14,
            Protocol::Firmware => 0x15,
            Protocol::Raw => 0xfe,
            Protocol::VendorSpecific => 0xff,
        }
    }
}

/// Bundle class codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BundleClass {
    Control = 0x00,
    Ap = 0x01,
    Hid = 0x05,
    PowerSupply = 0x08,
    BridgedPhy = 0x0a,
    Display = 0x0c,
    Camera = 0x0d,
    Sensor = 0x0e,
    Lights = 0x0f,
    Vibrator = 0x10,
    Loopback = 0x11,
    Audio = 0x12,
    Svc = 0x14,
    Firmware = 0x15,
    Raw = 0xfe,
    VendorSpecific = 0xff,
}

impl BundleClass {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(BundleClass::Control),
            0x01 => Some(BundleClass::Ap),
            0x05 => Some(BundleClass::Hid),
            0x08 => Some(BundleClass::PowerSupply),
            0x0a => Some(BundleClass::BridgedPhy),
            0x0c => Some(BundleClass::Display),
            0x0d => Some(BundleClass::Camera),
            0x0e => Some(BundleClass::Sensor),
            0x0f => Some(BundleClass::Lights),
            0x10 => Some(BundleClass::Vibrator),
            0x11 => Some(BundleClass::Loopback),
            0x12 => Some(BundleClass::Audio),
            0x14 => Some(BundleClass::Svc),
            0x15 => Some(BundleClass::Firmware),
            0xfe => Some(BundleClass::Raw),
            0xff => Some(BundleClass::VendorSpecific),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BundleClass::Control => "Control",
            BundleClass::Ap => "AP",
            BundleClass::Hid => "HID",
            BundleClass::PowerSupply => "Power Supply",
            BundleClass::BridgedPhy => "Bridged PHY",
            BundleClass::Display => "Display",
            BundleClass::Camera => "Camera",
            BundleClass::Sensor => "Sensor",
            BundleClass::Lights => "Lights",
            BundleClass::Vibrator => "Vibrator",
            BundleClass::Loopback => "Loopback",
            BundleClass::Audio => "Audio",
            BundleClass::Svc => "SVC",
            BundleClass::Firmware => "Firmware",
            BundleClass::Raw => "Raw",
            BundleClass::VendorSpecific => "Vendor Specific",
        }
    }
}

/// `[interface-descriptor]`: vendor/product string ids.
#[derive(Debug, Clone)]
pub struct InterfaceDescriptor {
    pub section: String,
    pub vendor_string_id: u8,
    pub product_string_id: u8,
}

/// `[mikrobus-descriptor]`: the twelve pin-state values. Pure data.
#[derive(Debug, Clone)]
pub struct MikrobusDescriptor {
    pub section: String,
    pub pwm: u8,
    pub int: u8,
    pub rx: u8,
    pub tx: u8,
    pub scl: u8,
    pub sda: u8,
    pub mosi: u8,
    pub miso: u8,
    pub sck: u8,
    pub cs: u8,
    pub rst: u8,
    pub an: u8,
}

/// `[string-descriptor N]`: an identified string, id nonzero.
#[derive(Debug, Clone)]
pub struct StringDescriptor {
    pub section: String,
    pub id: u8,
    pub string: String,
}

/// `[property-descriptor N]`: a typed integer-array property, id nonzero.
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    pub section: String,
    pub id: u8,
    pub name_string_id: u8,
    pub type_tag: u8,
    pub value: Vec<u64>,
}

impl PropertyDescriptor {
    /// Byte width of one value element for a property type tag.
    /// `None` for reserved tags.
    pub fn value_width(type_tag: u8) -> Option<usize> {
        match type_tag {
            0x00..=0x03 => Some(1),
            0x04 => Some(2),
            0x05 => Some(4),
            0x06 => Some(8),
            0x07 | 0x08 => Some(1),
            _ => None,
        }
    }
}

/// `[bundle-descriptor N]`: a functional grouping of cports.
/// Id 0 is the Control bundle and requires class 0.
#[derive(Debug, Clone)]
pub struct BundleDescriptor {
    pub section: String,
    pub id: u8,
    pub class_code: u8,
    /// Ids of the cports attached to this bundle, in declaration order.
    pub cports: Vec<u16>,
}

impl BundleDescriptor {
    pub fn class(&self) -> Option<BundleClass> {
        BundleClass::from_code(self.class_code)
    }

    pub fn class_name(&self) -> &'static str {
        self.class().map_or("Reserved", BundleClass::name)
    }
}

/// `[cport-descriptor N]`: one communication endpoint, 2-byte id.
/// Id 0 is the Control cport and requires protocol 0.
#[derive(Debug, Clone)]
pub struct CPortDescriptor {
    pub section: String,
    pub id: u16,
    pub bundle_id: u8,
    pub protocol_code: u8,
}

impl CPortDescriptor {
    pub fn protocol(&self) -> Option<Protocol> {
        Protocol::from_code(self.protocol_code)
    }

    pub fn protocol_name(&self) -> &'static str {
        self.protocol().map_or("Reserved", Protocol::name)
    }

    pub fn protocol_class(&self) -> Option<u8> {
        self.protocol().map(Protocol::class)
    }
}

/// `[device-descriptor N]`: a physical device behind the bridge.
///
/// `max_speed_hz`/`mode` are meaningful for SPI devices, `reg` for everything
/// but UART, `irq`/`irq_type` when an interrupt line is wired; absent fields
/// read as 0.
#[derive(Debug, Clone)]
pub struct DeviceDescriptor {
    pub section: String,
    pub id: u8,
    pub driver_string_id: u8,
    pub protocol: u8,
    pub reg: u8,
    pub irq: u8,
    pub irq_type: u8,
    pub max_speed_hz: u32,
    pub mode: u8,
    pub prop_link: u8,
    pub gpio_link: u8,
    pub reg_link: u8,
    pub clock_link: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_codes_round_trip() {
        for code in 0u8..=0xff {
            if let Some(p) = Protocol::from_code(code) {
                assert_eq!(p as u8, code);
            }
        }
        assert!(Protocol::from_code(0x0a).is_none());
        assert!(Protocol::from_code(0x42).is_none());
    }

    #[test]
    fn protocol_classes_match_bundle_classes() {
        for code in 0u8..=0xff {
            if let Some(p) = Protocol::from_code(code) {
                assert!(
                    BundleClass::from_code(p.class()).is_some(),
                    "protocol {:?} maps to unknown class {:#x}",
                    p,
                    p.class()
                );
            }
        }
    }

    #[test]
    fn property_value_widths() {
        assert_eq!(PropertyDescriptor::value_width(0), Some(1));
        assert_eq!(PropertyDescriptor::value_width(4), Some(2));
        assert_eq!(PropertyDescriptor::value_width(5), Some(4));
        assert_eq!(PropertyDescriptor::value_width(6), Some(8));
        assert_eq!(PropertyDescriptor::value_width(8), Some(1));
        assert_eq!(PropertyDescriptor::value_width(9), None);
    }
}
