//! Port for structured dispatch logging.
//!
//! Defines the [`DispatchLogger`] trait for recording dispatch events
//! (every dispatch attempt, self-test runs) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures one
//! machine-readable record per attempt (JSONL).

use serde_json::Value;

/// A structured dispatch event for logging.
///
/// Each event has a type string and a JSON payload with event-specific
/// fields. The adapter adds the timestamp when it writes the record.
pub struct DispatchEvent {
    /// Event type identifier (e.g., "dispatch_result", "self_test_complete").
    pub event_type: &'static str,
    pub payload: Value,
}

impl DispatchEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging dispatch events.
///
/// `log` is synchronous and infallible: a logging failure must never turn
/// into a dispatch failure.
pub trait DispatchLogger: Send + Sync {
    fn log(&self, event: DispatchEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoDispatchLogger;

impl DispatchLogger for NoDispatchLogger {
    fn log(&self, _event: DispatchEvent) {}
}
