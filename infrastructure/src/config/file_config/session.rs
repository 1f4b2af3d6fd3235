use super::ConfigIssue;
use serde::{Deserialize, Serialize};
use stepwise_domain::{EscalationScope, HilMode};

/// Raw `[session]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// Failed attempts before a step is escalated
    pub max_retries: Option<u64>,
    /// Upper bound on planned steps
    pub max_steps: Option<u64>,
    /// Escalation scope (step, session)
    pub escalation_scope: String,
    /// How escalations are resolved (interactive, abort, skip, replan)
    pub hil_mode: String,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self {
            max_retries: None,
            max_steps: None,
            escalation_scope: EscalationScope::default().as_str().to_string(),
            hil_mode: HilMode::default().as_str().to_string(),
        }
    }
}

impl FileSessionConfig {
    /// Parse `escalation_scope`, falling back to the default on unknown values.
    pub fn parse_escalation_scope(&self) -> (EscalationScope, Option<ConfigIssue>) {
        match self.escalation_scope.parse() {
            Ok(scope) => (scope, None),
            Err(e) => (
                EscalationScope::default(),
                Some(ConfigIssue::new("session.escalation_scope", e.to_string())),
            ),
        }
    }

    /// Parse `hil_mode`, falling back to the default on unknown values.
    pub fn parse_hil_mode(&self) -> (HilMode, Option<ConfigIssue>) {
        match self.hil_mode.parse() {
            Ok(mode) => (mode, None),
            Err(e) => (
                HilMode::default(),
                Some(ConfigIssue::new("session.hil_mode", e)),
            ),
        }
    }
}
