//! Engine operation descriptors.
//!
//! The engine describes the operations it offers by printing one line per
//! operation when run in query mode:
//!
//! ```text
//! DESC:<name>:(<inputs>)(<outputs>)(<params>)(<categories>)
//! ```
//!
//! Each group is comma-delimited; each parameter is a `type:name:default`
//! triple. Lines without the `DESC:` prefix are engine logging and ignored.

mod parser;
mod types;

pub use parser::{DescriptorError, parse_catalog, parse_descriptor_line};
pub use types::{Descriptor, DescriptorCatalog, ParamDescriptor};
