//! Tool call records and per-tool running statistics.
//!
//! A [`ToolCallRecord`] is one immutable fact about one tool invocation.
//! [`ToolStats`] aggregates those facts per tool name and maintains
//! `successes + failures == calls` after every update.

use serde::{Deserialize, Serialize};

/// One tool invocation outcome. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    tool_name: String,
    success: bool,
    latency_ms: f64,
    error: Option<String>,
    /// Unix timestamp in milliseconds
    created_at: u64,
}

impl ToolCallRecord {
    /// Record a successful call.
    pub fn success(tool_name: impl Into<String>, latency_ms: f64) -> Self {
        Self::new(tool_name, true, latency_ms, None)
    }

    /// Record a failed call with its error message.
    pub fn failure(tool_name: impl Into<String>, latency_ms: f64, error: impl Into<String>) -> Self {
        Self::new(tool_name, false, latency_ms, Some(error.into()))
    }

    /// Negative or NaN latencies are clamped to 0.
    pub fn new(
        tool_name: impl Into<String>,
        success: bool,
        latency_ms: f64,
        error: Option<String>,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            success,
            latency_ms: if latency_ms > 0.0 { latency_ms } else { 0.0 },
            error,
            created_at: current_timestamp(),
        }
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn latency_ms(&self) -> f64 {
        self.latency_ms
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }
}

/// Running aggregate for one tool name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolStats {
    calls: u64,
    successes: u64,
    failures: u64,
    total_latency_ms: f64,
}

impl ToolStats {
    /// Fold one call outcome into the aggregate.
    pub fn record(&mut self, record: &ToolCallRecord) {
        self.calls += 1;
        self.total_latency_ms += record.latency_ms();
        if record.is_success() {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls
    }

    pub fn successes(&self) -> u64 {
        self.successes
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn total_latency_ms(&self) -> f64 {
        self.total_latency_ms
    }

    /// Mean latency, 0 when no calls have been recorded.
    pub fn avg_latency_ms(&self) -> f64 {
        if self.calls == 0 {
            return 0.0;
        }
        self.total_latency_ms / self.calls as f64
    }

    /// Fraction of successful calls, 0 when no calls have been recorded.
    pub fn success_rate(&self) -> f64 {
        if self.calls == 0 {
            return 0.0;
        }
        self.successes as f64 / self.calls as f64
    }
}

fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
