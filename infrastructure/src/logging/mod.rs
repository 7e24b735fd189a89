//! Logging infrastructure — structured invocation history.
//!
//! Provides [`JsonlInvocationLogger`], a JSONL file writer that implements
//! the [`InvocationLogger`](buildrig_application::InvocationLogger) port.

mod invocation_log;

pub use invocation_log::JsonlInvocationLogger;
