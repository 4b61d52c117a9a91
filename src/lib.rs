//! # mnfs — mikroBUS manifest compiler
//!
//! Parses textual manifest files (`.mnfs`) describing a hardware bridge
//! interface into a validated, cross-referenced [`Manifest`], and prints the
//! model back in canonical form.
//!
//! ## Manifest structure
//!
//! - **`[manifest-header]`**: format version (exactly one supported)
//! - **`[interface-descriptor]`**: vendor/product string ids (exactly one)
//! - **`[mikrobus-descriptor]`**: twelve pin-state values (at most one)
//! - **`[string-descriptor N]`**, **`[property-descriptor N]`**,
//!   **`[device-descriptor N]`**, **`[bundle-descriptor N]`**,
//!   **`[cport-descriptor N]`**: identified descriptors, ids unique per kind
//!
//! Options are `key = value` lines; `;` starts a full-line comment; integers
//! accept decimal or `0x` hex; arrays are `<int int ...>`. Every numeric
//! field is checked against its byte width, ids 0 are reserved for Control
//! entities, and device fields are conditionally required by protocol.
//!
//! ## Example manifest
//!
//! ```text
//! [manifest-header]
//! version-major = 0
//! version-minor = 1
//!
//! [interface-descriptor]
//! vendor-string-id = 0x1
//! product-string-id = 0x2
//!
//! [string-descriptor 1]
//! string = MikroElektronika
//!
//! [string-descriptor 2]
//! string = Weather Click
//!
//! [device-descriptor 1]
//! driver-string-id = 0x3
//! protocol = 0x3
//! reg = 0x76
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! let manifest = mnfs::parse_file("weather-click.mnfs")?;
//! for device in manifest.devices() {
//!     println!("{:?} -> {:?}", device.id, manifest.driver_name(device));
//! }
//! print!("{}", manifest); // canonical form
//! # Ok::<(), mnfs::Error>(())
//! ```

pub mod descriptor;
mod emit;
pub mod error;
pub mod manifest;
pub mod parser;
pub mod tokenizer;

pub use descriptor::{
    BundleClass, BundleDescriptor, CPortDescriptor, DescriptorId, DeviceDescriptor,
    InterfaceDescriptor, MikrobusDescriptor, PropertyDescriptor, Protocol, StringDescriptor,
};
pub use error::Error;
pub use manifest::{Manifest, ManifestHeader};
pub use parser::{parse, parse_file};
