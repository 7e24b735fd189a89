//! Configuration value objects shared across layers

pub mod config_key;
mod output_format;

pub use config_key::{ConfigKeyInfo, known_keys, lookup_key};
pub use output_format::OutputFormat;
