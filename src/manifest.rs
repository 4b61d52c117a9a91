//! The validated manifest model: header, descriptor collections,
//! declaration order and the reference registry.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use crate::descriptor::{
    BundleDescriptor, CPortDescriptor, DescriptorId, DeviceDescriptor, InterfaceDescriptor,
    MikrobusDescriptor, PropertyDescriptor, StringDescriptor,
};
use crate::error::Error;

/// Manifest format version pair. Only one version is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifestHeader {
    pub major: u8,
    pub minor: u8,
}

impl ManifestHeader {
    pub const VERSION_MAJOR: u8 = 0;
    pub const VERSION_MINOR: u8 = 1;

    pub fn new(major: u8, minor: u8) -> Result<Self, Error> {
        if major != Self::VERSION_MAJOR || minor != Self::VERSION_MINOR {
            return Err(Error::VersionMismatch {
                major,
                minor,
                supported_major: Self::VERSION_MAJOR,
                supported_minor: Self::VERSION_MINOR,
            });
        }
        Ok(ManifestHeader { major, minor })
    }
}

/// A fully validated manifest. Built in one pass by [`parse`](crate::parse);
/// the descriptor data is immutable afterwards. The only post-parse state is
/// the reference registry ([`Manifest::mark_referenced`]).
#[derive(Debug, Clone)]
pub struct Manifest {
    header: ManifestHeader,
    interface: InterfaceDescriptor,
    mikrobus: Option<MikrobusDescriptor>,
    strings: BTreeMap<u8, StringDescriptor>,
    properties: BTreeMap<u8, PropertyDescriptor>,
    devices: BTreeMap<u8, DeviceDescriptor>,
    bundles: BTreeMap<u8, BundleDescriptor>,
    cports: BTreeMap<u16, CPortDescriptor>,
    order: Vec<DescriptorId>,
    refs: HashMap<DescriptorId, String>,
    warnings: Vec<String>,
}

impl Manifest {
    pub fn header(&self) -> &ManifestHeader {
        &self.header
    }

    pub fn interface(&self) -> &InterfaceDescriptor {
        &self.interface
    }

    pub fn mikrobus(&self) -> Option<&MikrobusDescriptor> {
        self.mikrobus.as_ref()
    }

    pub fn string(&self, id: u8) -> Option<&StringDescriptor> {
        self.strings.get(&id)
    }

    pub fn property(&self, id: u8) -> Option<&PropertyDescriptor> {
        self.properties.get(&id)
    }

    pub fn device(&self, id: u8) -> Option<&DeviceDescriptor> {
        self.devices.get(&id)
    }

    pub fn bundle(&self, id: u8) -> Option<&BundleDescriptor> {
        self.bundles.get(&id)
    }

    pub fn cport(&self, id: u16) -> Option<&CPortDescriptor> {
        self.cports.get(&id)
    }

    /// String descriptors in ascending id order. Same shape for the other
    /// per-kind iterators below.
    pub fn strings(&self) -> impl Iterator<Item = &StringDescriptor> {
        self.strings.values()
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.values()
    }

    pub fn devices(&self) -> impl Iterator<Item = &DeviceDescriptor> {
        self.devices.values()
    }

    pub fn bundles(&self) -> impl Iterator<Item = &BundleDescriptor> {
        self.bundles.values()
    }

    pub fn cports(&self) -> impl Iterator<Item = &CPortDescriptor> {
        self.cports.values()
    }

    /// Descriptor identities in the order they were declared in the source.
    pub fn declaration_order(&self) -> &[DescriptorId] {
        &self.order
    }

    /// Non-fatal warnings collected during the parse (non-incremental
    /// bundle ids).
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Driver name of a device, resolved through the string descriptors.
    pub fn driver_name(&self, device: &DeviceDescriptor) -> Option<&str> {
        self.string(device.driver_string_id).map(|s| s.string.as_str())
    }

    /// Record that `by_section` references `target`. Each descriptor may be
    /// referenced at most once; a second registration fails. Returns `false`
    /// (and records nothing) when `target` does not exist in this manifest.
    pub fn mark_referenced(&mut self, target: DescriptorId, by_section: &str) -> Result<bool, Error> {
        let section = match self.section_of(target) {
            Some(s) => s.to_string(),
            None => return Ok(false),
        };
        match self.refs.entry(target) {
            Entry::Occupied(_) => Err(Error::MultipleReferences { section }),
            Entry::Vacant(slot) => {
                slot.insert(by_section.to_string());
                Ok(true)
            }
        }
    }

    /// Whether `target` has been referenced (the emitter's "used" view).
    pub fn is_referenced(&self, target: DescriptorId) -> bool {
        self.refs.contains_key(&target)
    }

    /// Section header of the descriptor referencing `target`, if any.
    pub fn referenced_by(&self, target: DescriptorId) -> Option<&str> {
        self.refs.get(&target).map(String::as_str)
    }

    fn section_of(&self, id: DescriptorId) -> Option<&str> {
        match id {
            DescriptorId::Interface => Some(self.interface.section.as_str()),
            DescriptorId::Mikrobus => self.mikrobus.as_ref().map(|d| d.section.as_str()),
            DescriptorId::String(i) => self.strings.get(&i).map(|d| d.section.as_str()),
            DescriptorId::Property(i) => self.properties.get(&i).map(|d| d.section.as_str()),
            DescriptorId::Device(i) => self.devices.get(&i).map(|d| d.section.as_str()),
            DescriptorId::Bundle(i) => self.bundles.get(&i).map(|d| d.section.as_str()),
            DescriptorId::CPort(i) => self.cports.get(&i).map(|d| d.section.as_str()),
        }
    }
}

/// Accumulates descriptors during a parse; [`ManifestBuilder::finish`]
/// checks the required sections and produces the immutable [`Manifest`].
#[derive(Debug, Default)]
pub(crate) struct ManifestBuilder {
    header: Option<ManifestHeader>,
    interface: Option<InterfaceDescriptor>,
    mikrobus: Option<MikrobusDescriptor>,
    strings: BTreeMap<u8, StringDescriptor>,
    properties: BTreeMap<u8, PropertyDescriptor>,
    devices: BTreeMap<u8, DeviceDescriptor>,
    bundles: BTreeMap<u8, BundleDescriptor>,
    cports: BTreeMap<u16, CPortDescriptor>,
    order: Vec<DescriptorId>,
    warnings: Vec<String>,
    /// Expected id of the next non-Control bundle; parse-scoped.
    pub(crate) next_bundle_id: u16,
}

impl ManifestBuilder {
    pub(crate) fn new() -> Self {
        ManifestBuilder {
            next_bundle_id: 1,
            ..ManifestBuilder::default()
        }
    }

    pub(crate) fn set_header(&mut self, header: ManifestHeader) -> Result<(), Error> {
        if self.header.is_some() {
            return Err(Error::MultipleInstances {
                section: "manifest-header".to_string(),
            });
        }
        self.header = Some(header);
        Ok(())
    }

    pub(crate) fn set_interface(&mut self, desc: InterfaceDescriptor) -> Result<(), Error> {
        if self.interface.is_some() {
            return Err(Error::MultipleInstances {
                section: desc.section,
            });
        }
        self.interface = Some(desc);
        self.order.push(DescriptorId::Interface);
        Ok(())
    }

    pub(crate) fn set_mikrobus(&mut self, desc: MikrobusDescriptor) -> Result<(), Error> {
        if self.mikrobus.is_some() {
            return Err(Error::MultipleInstances {
                section: desc.section,
            });
        }
        self.mikrobus = Some(desc);
        self.order.push(DescriptorId::Mikrobus);
        Ok(())
    }

    pub(crate) fn add_string(&mut self, desc: StringDescriptor) -> Result<(), Error> {
        if let Some(previous) = self.strings.get(&desc.id) {
            return Err(Error::DuplicateId {
                section: desc.section,
                previous: previous.section.clone(),
            });
        }
        self.order.push(DescriptorId::String(desc.id));
        self.strings.insert(desc.id, desc);
        Ok(())
    }

    pub(crate) fn add_property(&mut self, desc: PropertyDescriptor) -> Result<(), Error> {
        if let Some(previous) = self.properties.get(&desc.id) {
            return Err(Error::DuplicateId {
                section: desc.section,
                previous: previous.section.clone(),
            });
        }
        self.order.push(DescriptorId::Property(desc.id));
        self.properties.insert(desc.id, desc);
        Ok(())
    }

    pub(crate) fn add_device(&mut self, desc: DeviceDescriptor) -> Result<(), Error> {
        if let Some(previous) = self.devices.get(&desc.id) {
            return Err(Error::DuplicateId {
                section: desc.section,
                previous: previous.section.clone(),
            });
        }
        self.order.push(DescriptorId::Device(desc.id));
        self.devices.insert(desc.id, desc);
        Ok(())
    }

    pub(crate) fn add_bundle(&mut self, desc: BundleDescriptor) -> Result<(), Error> {
        if let Some(previous) = self.bundles.get(&desc.id) {
            return Err(Error::DuplicateId {
                section: desc.section,
                previous: previous.section.clone(),
            });
        }
        self.order.push(DescriptorId::Bundle(desc.id));
        self.bundles.insert(desc.id, desc);
        Ok(())
    }

    pub(crate) fn add_cport(&mut self, desc: CPortDescriptor) -> Result<(), Error> {
        if let Some(previous) = self.cports.get(&desc.id) {
            return Err(Error::DuplicateId {
                section: desc.section,
                previous: previous.section.clone(),
            });
        }
        self.order.push(DescriptorId::CPort(desc.id));
        self.cports.insert(desc.id, desc);
        Ok(())
    }

    pub(crate) fn push_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    pub(crate) fn finish(self) -> Result<Manifest, Error> {
        let ManifestBuilder {
            header,
            interface,
            mikrobus,
            strings,
            properties,
            devices,
            mut bundles,
            cports,
            order,
            warnings,
            ..
        } = self;

        let header = header.ok_or(Error::MissingSection {
            section: "manifest-header",
        })?;
        let interface = interface.ok_or(Error::MissingSection {
            section: "interface-descriptor",
        })?;

        // attach cports to their bundles in declaration order
        for id in &order {
            if let DescriptorId::CPort(cport_id) = id {
                let bundle_id = cports[cport_id].bundle_id;
                if let Some(bundle) = bundles.get_mut(&bundle_id) {
                    bundle.cports.push(*cport_id);
                }
            }
        }

        Ok(Manifest {
            header,
            interface,
            mikrobus,
            strings,
            properties,
            devices,
            bundles,
            cports,
            order,
            refs: HashMap::new(),
            warnings,
        })
    }
}
