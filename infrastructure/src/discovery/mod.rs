//! Adapters used by tool discovery.

mod host;
mod memory_store;
mod probe;
#[cfg(windows)]
mod windows_registry;

pub use host::detect_host_layout;
pub use memory_store::InMemoryKeyValueStore;
pub use probe::WhichProbe;
#[cfg(windows)]
pub use windows_registry::WindowsRegistryStore;

use buildrig_application::KeyValueStore;
use std::sync::Arc;

/// The registry of this machine, or an empty store where there is none.
pub fn system_store() -> Arc<dyn KeyValueStore> {
    #[cfg(windows)]
    {
        Arc::new(WindowsRegistryStore::new())
    }
    #[cfg(not(windows))]
    {
        Arc::new(InMemoryKeyValueStore::new())
    }
}
