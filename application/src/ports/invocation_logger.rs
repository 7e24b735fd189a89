//! Port for structured invocation logging.
//!
//! Separate from `tracing`: this records one machine-readable event per
//! process start and exit so a build's tool history can be replayed.

use serde_json::Value;

/// A structured invocation event.
pub struct InvocationEvent {
    /// Event type identifier (e.g., "process_started", "tool_located").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl InvocationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging invocation events.
///
/// `log` is synchronous and infallible; write failures are dropped.
pub trait InvocationLogger: Send + Sync {
    fn log(&self, event: InvocationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoInvocationLogger;

impl InvocationLogger for NoInvocationLogger {
    fn log(&self, _event: InvocationEvent) {}
}
