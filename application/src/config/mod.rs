//! Application-level configuration.
//!
//! - [`Toolchain`] — host layout and tool overrides that descriptors are built from

pub mod toolchain;

pub use toolchain::Toolchain;
