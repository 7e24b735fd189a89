//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod executable_probe;
pub mod file_system;
pub mod invocation_logger;
pub mod key_value_store;
pub mod process_executor;
