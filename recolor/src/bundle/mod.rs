//! `.resources` bundle codec.
//!
//! The patched application stores its UI assets in the binary resource
//! bundle format of the CLR runtime (magic `0xBEEFCACE`): a resource manager
//! header, a name-hash lookup table, a name section of UTF-16 keys, and a
//! data section of typed payloads. This module reads a bundle into a
//! [`ResourceSet`](crate::set::ResourceSet) and writes one back out
//! deterministically.
//!
//! Only the built-in payload types are handled; bundles using serialized
//! user types are rejected with a typed error. That covers the target
//! application's bundles, which hold streams, strings and scalars.

mod io;
pub mod reader;
mod value;
pub mod writer;

pub use reader::{load_bundle, read_bundle};
pub use value::ResourceValue;
pub use writer::write_bundle;

/// Magic number opening every `.resources` bundle.
pub const RESOURCE_MAGIC: u32 = 0xBEEFCACE;

/// Class name of the runtime reader recorded in the bundle header.
pub(crate) const READER_TYPE_NAME: &str = "System.Resources.ResourceReader, mscorlib, \
     Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089";

/// Class name of the runtime resource set recorded in the bundle header.
pub(crate) const RESOURCE_SET_TYPE_NAME: &str = "System.Resources.RuntimeResourceSet";
