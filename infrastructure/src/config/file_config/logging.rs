use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw `[logging]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL session event log; disabled when unset
    pub event_log: Option<PathBuf>,
}
