//! Port for structured session logging.
//!
//! Defines the [`SessionEventLogger`] trait for recording session events
//! (plan creation, step attempts, tool calls, reviews, escalations) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! session transcript in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured session event for logging.
pub struct SessionEvent {
    /// Event type identifier (e.g., "step_started", "tool_call", "escalation").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl SessionEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging session events to a structured log.
///
/// `log` is synchronous and non-fallible so logging never disturbs the
/// session; write failures are dropped by the adapter.
pub trait SessionEventLogger: Send + Sync {
    /// Record a session event.
    fn log(&self, event: SessionEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoSessionLogger;

impl SessionEventLogger for NoSessionLogger {
    fn log(&self, _event: SessionEvent) {}
}
