//! Configuration file loading for buildrig
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `BUILDRIG_` environment variables (e.g. `BUILDRIG_TOOLS__MSBUILD`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./buildrig.toml` or `./.buildrig.toml`
//! 4. Global: `~/.config/buildrig/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, FileConfig, FileLoggingConfig, FileMsBuildConfig, FileOutputConfig,
    FileRemoteConfig, FileToolsConfig,
};
pub use loader::ConfigLoader;
