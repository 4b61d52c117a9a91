//! Validation-rule tests: section dispatch, width constraints, reserved ids,
//! conditional device fields, duplicate detection, reference registry.

use mnfs::{parse, DescriptorId, Error};

const HEADER: &str = "[manifest-header]\nversion-major = 0\nversion-minor = 1\n";
const INTERFACE: &str = "[interface-descriptor]\nvendor-string-id = 0x1\nproduct-string-id = 0x2\n";

/// Minimal valid prologue plus a body of extra sections.
fn doc(body: &str) -> String {
    format!("{HEADER}\n{INTERFACE}\n{body}")
}

// ==================== Header and interface ====================

#[test]
fn minimal_manifest_parses() {
    let manifest = parse(&doc("")).expect("parse");
    assert_eq!(manifest.header().major, 0);
    assert_eq!(manifest.header().minor, 1);
    assert_eq!(manifest.interface().vendor_string_id, 1);
    assert_eq!(manifest.interface().product_string_id, 2);
    assert!(manifest.mikrobus().is_none());
    assert!(manifest.warnings().is_empty());
}

#[test]
fn version_gate_rejects_unsupported() {
    let src = format!(
        "[manifest-header]\nversion-major = 1\nversion-minor = 0\n\n{INTERFACE}"
    );
    let err = parse(&src).unwrap_err();
    assert!(matches!(err, Error::VersionMismatch { .. }), "{err}");
    assert!(err.to_string().contains("only supports '0.1'"), "{err}");
}

#[test]
fn missing_header_section_rejected() {
    let err = parse(INTERFACE).unwrap_err();
    assert!(matches!(
        err,
        Error::MissingSection {
            section: "manifest-header"
        }
    ));
}

#[test]
fn missing_interface_section_rejected() {
    let err = parse(HEADER).unwrap_err();
    assert!(matches!(
        err,
        Error::MissingSection {
            section: "interface-descriptor"
        }
    ));
}

#[test]
fn second_interface_section_rejected() {
    let err = parse(&doc(INTERFACE)).unwrap_err();
    assert!(matches!(err, Error::MultipleInstances { .. }), "{err}");
    assert!(err.to_string().contains("multiple instances"), "{err}");
}

#[test]
fn second_header_section_rejected() {
    let err = parse(&doc(HEADER)).unwrap_err();
    assert!(matches!(err, Error::MultipleInstances { .. }), "{err}");
}

#[test]
fn header_version_is_one_byte() {
    let src = format!(
        "[manifest-header]\nversion-major = 0\nversion-minor = 256\n\n{INTERFACE}"
    );
    assert!(matches!(
        parse(&src).unwrap_err(),
        Error::InvalidValue { .. }
    ));
}

// ==================== Mikrobus pin states ====================

const MIKROBUS: &str = r#"[mikrobus-descriptor]
pwm-state = 0x2
int-state = 0x2
rx-state = 0x2
tx-state = 0x2
scl-state = 0x3
sda-state = 0x3
mosi-state = 0x2
miso-state = 0x2
sck-state = 0x2
cs-state = 0x2
rst-state = 0x1
an-state = 0x1
"#;

#[test]
fn mikrobus_pin_states_read_back() {
    let manifest = parse(&doc(MIKROBUS)).expect("parse");
    let mikrobus = manifest.mikrobus().expect("mikrobus");
    assert_eq!(mikrobus.scl, 3);
    assert_eq!(mikrobus.rst, 1);
    assert_eq!(mikrobus.pwm, 2);
}

#[test]
fn mikrobus_missing_pin_rejected() {
    let body = "[mikrobus-descriptor]\npwm-state = 0x2\n";
    let err = parse(&doc(body)).unwrap_err();
    assert!(matches!(err, Error::MissingField { .. }), "{err}");
}

#[test]
fn second_mikrobus_section_rejected() {
    let body = format!("{MIKROBUS}\n{MIKROBUS}");
    let err = parse(&doc(&body)).unwrap_err();
    assert!(matches!(err, Error::MultipleInstances { .. }), "{err}");
}

// ==================== String and property descriptors ====================

#[test]
fn string_descriptor_zero_id_rejected() {
    let err = parse(&doc("[string-descriptor 0]\nstring = x\n")).unwrap_err();
    assert!(matches!(err, Error::ZeroId { .. }), "{err}");
}

#[test]
fn property_descriptor_zero_id_rejected() {
    let body = "[property-descriptor 0]\nname-string-id = 1\ntype = 0\nvalue = <1>\n";
    let err = parse(&doc(body)).unwrap_err();
    assert!(matches!(err, Error::ZeroId { .. }), "{err}");
}

#[test]
fn duplicate_string_id_rejected_across_spellings() {
    let body = "[string-descriptor 2]\nstring = a\n\n[string-descriptor 0x2]\nstring = b\n";
    let err = parse(&doc(body)).unwrap_err();
    assert!(matches!(err, Error::DuplicateId { .. }), "{err}");
    assert!(err.to_string().contains("duplicated 'id'"), "{err}");
}

#[test]
fn quoted_and_hex_id_tokens_accepted() {
    let body = "[string-descriptor \"0x2\"]\nstring = quoted\n";
    let manifest = parse(&doc(body)).expect("parse");
    assert_eq!(manifest.string(2).expect("string 2").string, "quoted");
}

#[test]
fn string_length_capped_at_255() {
    let long = "a".repeat(256);
    let err = parse(&doc(&format!("[string-descriptor 1]\nstring = {long}\n"))).unwrap_err();
    assert!(matches!(err, Error::StringTooLong { .. }), "{err}");

    let max = "a".repeat(255);
    let manifest = parse(&doc(&format!("[string-descriptor 1]\nstring = {max}\n"))).expect("parse");
    assert_eq!(manifest.string(1).expect("string 1").string.len(), 255);
}

#[test]
fn property_value_width_follows_type_tag() {
    let ok = |type_tag: u8, value: &str| {
        let body = format!(
            "[property-descriptor 1]\nname-string-id = 1\ntype = {type_tag}\nvalue = <{value}>\n"
        );
        parse(&doc(&body))
    };
    assert!(ok(0, "255").is_ok());
    assert!(matches!(ok(0, "256").unwrap_err(), Error::InvalidValue { .. }));
    assert!(ok(4, "0xffff").is_ok());
    assert!(matches!(ok(4, "0x10000").unwrap_err(), Error::InvalidValue { .. }));
    assert!(ok(5, "0xffffffff").is_ok());
    assert!(matches!(
        ok(5, "0x100000000").unwrap_err(),
        Error::InvalidValue { .. }
    ));
    assert!(ok(6, "0xffffffffffffffff").is_ok());
}

#[test]
fn property_values_read_back() {
    let body = "[property-descriptor 3]\nname-string-id = 4\ntype = 7\nvalue = <1 2 0x10>\n";
    let manifest = parse(&doc(body)).expect("parse");
    let property = manifest.property(3).expect("property 3");
    assert_eq!(property.name_string_id, 4);
    assert_eq!(property.type_tag, 7);
    assert_eq!(property.value, vec![1, 2, 16]);
}

#[test]
fn property_unknown_type_rejected() {
    let body = "[property-descriptor 1]\nname-string-id = 1\ntype = 9\nvalue = <1>\n";
    let err = parse(&doc(body)).unwrap_err();
    assert!(err.to_string().contains("unknown property type"), "{err}");
}

#[test]
fn property_array_must_be_bracketed() {
    let body = "[property-descriptor 1]\nname-string-id = 1\ntype = 0\nvalue = 1 2 3\n";
    let err = parse(&doc(body)).unwrap_err();
    assert!(matches!(err, Error::MalformedArray { .. }), "{err}");
}

// ==================== Bundles and cports ====================

#[test]
fn control_bundle_requires_class_zero() {
    let err = parse(&doc("[bundle-descriptor 0]\nclass = 0x1\n")).unwrap_err();
    assert!(matches!(err, Error::ControlBundleClass { .. }), "{err}");

    let manifest = parse(&doc("[bundle-descriptor 0]\nclass = 0x0\n")).expect("parse");
    assert_eq!(manifest.bundle(0).expect("bundle 0").class_name(), "Control");
}

#[test]
fn control_cport_requires_protocol_zero() {
    let err = parse(&doc("[cport-descriptor 0]\nbundle = 0\nprotocol = 0x3\n")).unwrap_err();
    assert!(matches!(err, Error::ControlCPortProtocol { .. }), "{err}");

    let manifest = parse(&doc("[cport-descriptor 0]\nbundle = 0\nprotocol = 0\n")).expect("parse");
    assert_eq!(manifest.cport(0).expect("cport 0").protocol_name(), "Control");
}

#[test]
fn cport_id_is_two_bytes() {
    let manifest =
        parse(&doc("[cport-descriptor 0xffff]\nbundle = 1\nprotocol = 0x3\n")).expect("parse");
    assert!(manifest.cport(0xffff).is_some());

    let err = parse(&doc("[cport-descriptor 0x10000]\nbundle = 1\nprotocol = 0x3\n")).unwrap_err();
    assert!(matches!(err, Error::InvalidId { .. }), "{err}");
}

#[test]
fn sequential_bundle_ids_do_not_warn() {
    let body = "[bundle-descriptor 0]\nclass = 0\n\n[bundle-descriptor 1]\nclass = 0xa\n\n[bundle-descriptor 2]\nclass = 0xe\n";
    let manifest = parse(&doc(body)).expect("parse");
    assert!(manifest.warnings().is_empty(), "{:?}", manifest.warnings());
}

#[test]
fn non_incremental_bundle_ids_warn_but_parse() {
    // expected ids run 1, 2, 3; 3 and 4 each miss the running counter
    let body = "[bundle-descriptor 1]\nclass = 0xa\n\n[bundle-descriptor 3]\nclass = 0xe\n\n[bundle-descriptor 4]\nclass = 0xc\n";
    let manifest = parse(&doc(body)).expect("parse");
    assert_eq!(manifest.warnings().len(), 2, "{:?}", manifest.warnings());
    assert!(manifest.warnings()[0].contains("non-incremental"));
    assert!(manifest.bundle(3).is_some());
}

#[test]
fn bundle_counter_is_parse_scoped() {
    let body = "[bundle-descriptor 1]\nclass = 0xa\n\n[bundle-descriptor 2]\nclass = 0xe\n";
    let src = doc(body);
    for _ in 0..2 {
        let manifest = parse(&src).expect("parse");
        assert!(manifest.warnings().is_empty(), "{:?}", manifest.warnings());
    }
}

#[test]
fn duplicate_bundle_id_rejected() {
    let body = "[bundle-descriptor 1]\nclass = 0xa\n\n[bundle-descriptor 0x1]\nclass = 0xe\n";
    assert!(matches!(
        parse(&doc(body)).unwrap_err(),
        Error::DuplicateId { .. }
    ));
}

#[test]
fn cports_attach_to_bundles_in_order() {
    let body = "[bundle-descriptor 1]\nclass = 0xa\n\n[cport-descriptor 2]\nbundle = 1\nprotocol = 0x3\n\n[cport-descriptor 1]\nbundle = 1\nprotocol = 0xb\n";
    let manifest = parse(&doc(body)).expect("parse");
    assert_eq!(manifest.bundle(1).expect("bundle 1").cports, vec![2, 1]);
}

#[test]
fn class_and_protocol_names_resolve() {
    let body = "[bundle-descriptor 1]\nclass = 0xe\n\n[bundle-descriptor 2]\nclass = 0x42\n\n[cport-descriptor 1]\nbundle = 1\nprotocol = 0x3\n";
    let manifest = parse(&doc(body)).expect("parse");
    assert_eq!(manifest.bundle(1).expect("bundle").class_name(), "Sensor");
    assert_eq!(manifest.bundle(2).expect("bundle").class_name(), "Reserved");
    let cport = manifest.cport(1).expect("cport");
    assert_eq!(cport.protocol_name(), "I2C");
    assert_eq!(cport.protocol_class(), Some(0x0a));
}

// ==================== Device descriptors ====================

#[test]
fn spi_device_requires_speed_and_mode() {
    let body = "[device-descriptor 1]\ndriver-string-id = 0x3\nprotocol = 0xb\nreg = 0\n";
    let err = parse(&doc(body)).unwrap_err();
    match err {
        Error::MissingField { ref field, .. } => assert_eq!(field, "max-speed-hz"),
        other => panic!("expected missing field, got {other}"),
    }

    let body = "[device-descriptor 1]\ndriver-string-id = 0x3\nprotocol = 0xb\nreg = 0\nmax-speed-hz = 0x3d0900\nmode = 0x1\n";
    let manifest = parse(&doc(body)).expect("parse");
    let device = manifest.device(1).expect("device 1");
    assert_eq!(device.max_speed_hz, 4_000_000);
    assert_eq!(device.mode, 1);
}

#[test]
fn uart_device_reg_defaults_to_zero() {
    let body = "[device-descriptor 1]\ndriver-string-id = 0x3\nprotocol = 0x4\n";
    let manifest = parse(&doc(body)).expect("parse");
    assert_eq!(manifest.device(1).expect("device 1").reg, 0);
}

#[test]
fn non_uart_device_requires_reg() {
    let body = "[device-descriptor 1]\ndriver-string-id = 0x3\nprotocol = 0x3\n";
    let err = parse(&doc(body)).unwrap_err();
    match err {
        Error::MissingField { ref field, .. } => assert_eq!(field, "reg"),
        other => panic!("expected missing field, got {other}"),
    }
}

#[test]
fn irq_and_irq_type_come_as_a_pair() {
    let body = "[device-descriptor 1]\ndriver-string-id = 0x3\nprotocol = 0x3\nreg = 0x76\nirq = 0x7\n";
    let err = parse(&doc(body)).unwrap_err();
    match err {
        Error::MissingField { ref field, .. } => assert_eq!(field, "irq-type"),
        other => panic!("expected missing field, got {other}"),
    }

    let body = "[device-descriptor 1]\ndriver-string-id = 0x3\nprotocol = 0x3\nreg = 0x76\n";
    let manifest = parse(&doc(body)).expect("parse");
    let device = manifest.device(1).expect("device 1");
    assert_eq!((device.irq, device.irq_type), (0, 0));
}

#[test]
fn device_links_default_to_zero() {
    let body = "[device-descriptor 1]\ndriver-string-id = 0x3\nprotocol = 0x3\nreg = 0x76\ngpio-link = 0x5\n";
    let manifest = parse(&doc(body)).expect("parse");
    let device = manifest.device(1).expect("device 1");
    assert_eq!(device.gpio_link, 5);
    assert_eq!(device.prop_link, 0);
    assert_eq!(device.reg_link, 0);
    assert_eq!(device.clock_link, 0);
}

#[test]
fn device_width_boundary() {
    let body = "[device-descriptor 1]\ndriver-string-id = 255\nprotocol = 0x3\nreg = 0x76\n";
    assert!(parse(&doc(body)).is_ok());

    let body = "[device-descriptor 1]\ndriver-string-id = 256\nprotocol = 0x3\nreg = 0x76\n";
    assert!(matches!(
        parse(&doc(body)).unwrap_err(),
        Error::InvalidValue { .. }
    ));
}

#[test]
fn duplicate_device_id_rejected() {
    let device = "[device-descriptor 1]\ndriver-string-id = 0x3\nprotocol = 0x3\nreg = 0x76\n";
    let body = format!("{device}\n{device}");
    assert!(matches!(
        parse(&doc(&body)).unwrap_err(),
        Error::DuplicateId { .. }
    ));
}

// ==================== Dispatch and grammar-level rules ====================

#[test]
fn unknown_section_rejected() {
    let err = parse(&doc("[frobnicator-descriptor 1]\nx = 1\n")).unwrap_err();
    assert!(matches!(err, Error::UnknownSection { .. }), "{err}");
    assert!(err.to_string().contains("invalid descriptor"), "{err}");
}

#[test]
fn spaces_inside_header_brackets_rejected() {
    let src = "[manifest-header ]\nversion-major = 0\nversion-minor = 1\n";
    assert!(matches!(
        parse(src).unwrap_err(),
        Error::SectionSpaces { .. }
    ));
}

#[test]
fn duplicate_option_rejected() {
    let body = "[string-descriptor 1]\nstring = a\nstring = b\n";
    assert!(matches!(
        parse(&doc(body)).unwrap_err(),
        Error::DuplicateField { .. }
    ));
}

#[test]
fn decimal_and_hex_are_equivalent() {
    let hex = parse(&doc(
        "[device-descriptor 1]\ndriver-string-id = 0x3\nprotocol = 0x3\nreg = 0x76\n",
    ))
    .expect("parse hex");
    let dec = parse(&doc(
        "[device-descriptor 1]\ndriver-string-id = 3\nprotocol = 3\nreg = 118\n",
    ))
    .expect("parse decimal");
    assert_eq!(
        hex.device(1).expect("device").reg,
        dec.device(1).expect("device").reg
    );
}

// ==================== Model queries ====================

#[test]
fn driver_name_resolves_through_string_map() {
    let body = "[string-descriptor 3]\nstring = bme280\n\n[device-descriptor 1]\ndriver-string-id = 0x3\nprotocol = 0x3\nreg = 0x76\n";
    let manifest = parse(&doc(body)).expect("parse");
    let device = manifest.device(1).expect("device 1");
    assert_eq!(manifest.driver_name(device), Some("bme280"));
}

#[test]
fn declaration_order_is_recorded() {
    let body = "[string-descriptor 2]\nstring = b\n\n[string-descriptor 1]\nstring = a\n\n[bundle-descriptor 1]\nclass = 0xa\n";
    let manifest = parse(&doc(body)).expect("parse");
    assert_eq!(
        manifest.declaration_order(),
        &[
            DescriptorId::Interface,
            DescriptorId::String(2),
            DescriptorId::String(1),
            DescriptorId::Bundle(1),
        ]
    );
}

#[test]
fn reference_registry_is_single_set() {
    let body = "[string-descriptor 1]\nstring = vendor\n";
    let mut manifest = parse(&doc(body)).expect("parse");
    assert!(!manifest.is_referenced(DescriptorId::String(1)));
    assert_eq!(
        manifest
            .mark_referenced(DescriptorId::String(1), "interface-descriptor")
            .expect("first reference"),
        true
    );
    assert!(manifest.is_referenced(DescriptorId::String(1)));
    assert_eq!(
        manifest.referenced_by(DescriptorId::String(1)),
        Some("interface-descriptor")
    );

    let err = manifest
        .mark_referenced(DescriptorId::String(1), "property-descriptor 1")
        .unwrap_err();
    assert!(matches!(err, Error::MultipleReferences { .. }), "{err}");
    assert!(err.to_string().contains("multiple references"), "{err}");

    // a target that does not exist records nothing
    assert_eq!(
        manifest
            .mark_referenced(DescriptorId::String(9), "interface-descriptor")
            .expect("unknown target"),
        false
    );
    assert!(!manifest.is_referenced(DescriptorId::String(9)));
}
