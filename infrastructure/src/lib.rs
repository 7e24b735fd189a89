//! Infrastructure layer for buildrig
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod discovery;
pub mod fs;
pub mod logging;
pub mod process;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigLoader, FileConfig, FileOutputConfig, FileRemoteConfig};
#[cfg(windows)]
pub use discovery::WindowsRegistryStore;
pub use discovery::{InMemoryKeyValueStore, WhichProbe, detect_host_layout, system_store};
pub use fs::LocalFileSystem;
pub use logging::JsonlInvocationLogger;
pub use process::{LocalProcessExecutor, SshProcessExecutor};
