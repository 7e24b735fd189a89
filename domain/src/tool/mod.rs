//! Tool descriptors and discovery strategies
//!
//! A [`ToolDescriptor`] names an external tool and lists the ways it can be
//! found. The strategies are plain data; the application layer's locator
//! walks them in order and stops at the first one that yields a path.

pub mod descriptor;
pub mod version;
pub mod well_known;

pub use descriptor::{AuxiliaryQuery, DiscoveryStrategy, RegistryQuery, ToolDescriptor};
pub use version::{Version, sort_by_version_desc};
pub use well_known::{HostLayout, ToolOverrides};
