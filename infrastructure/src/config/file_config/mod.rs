//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Enum-like settings stay strings here and are parsed on conversion, so a
//! typo degrades to the default instead of rejecting the whole file.

mod execution;
mod logging;
mod session;

pub use execution::FileExecutionConfig;
pub use logging::FileLoggingConfig;
pub use session::FileSessionConfig;

use serde::{Deserialize, Serialize};
use stepwise_application::SessionConfig;
use stepwise_domain::ReviewPolicy;

/// A problem found in a loaded configuration.
///
/// Issues never stop loading; the offending value falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Dotted path of the offending key
    pub field: String,
    pub message: String,
}

impl ConfigIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Session policy settings
    pub session: FileSessionConfig,
    /// Coordinator loop limits
    pub execution: FileExecutionConfig,
    /// Event log settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.session.parse_escalation_scope().1);
        issues.extend(self.session.parse_hil_mode().1);
        issues.extend(self.execution.validate());
        issues
    }

    /// Convert to the application-level session configuration.
    pub fn to_session_config(&self) -> SessionConfig {
        let policy = ReviewPolicy::default()
            .with_escalation_scope(self.session.parse_escalation_scope().0);
        let mut config = SessionConfig::new(
            policy,
            self.session.parse_hil_mode().0,
            self.execution.to_execution_params(),
        );
        if let Some(max) = self.session.max_retries {
            config = config.with_max_retries(max);
        }
        if let Some(max) = self.session.max_steps {
            config = config.with_max_steps(max);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwise_domain::{EscalationScope, HilMode};

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.execution.max_iterations, 50);
        assert!(config.logging.event_log.is_none());

        let session = config.to_session_config();
        assert!(session.initial_constraints().is_empty());
        assert_eq!(session.hil_mode(), HilMode::Interactive);
    }

    #[test]
    fn test_full_config_to_session_config() {
        let toml_str = r#"
[session]
max_retries = 2
max_steps = 6
escalation_scope = "session"
hil_mode = "replan"

[execution]
max_iterations = 20
max_plan_rewrites = 4

[logging]
event_log = "/tmp/stepwise.jsonl"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_empty());

        let session = config.to_session_config();
        assert_eq!(session.max_retries(), Some(2));
        assert_eq!(session.max_steps(), Some(6));
        assert_eq!(session.hil_mode(), HilMode::Replan);
        assert_eq!(session.policy().escalation_scope, EscalationScope::Session);
        assert_eq!(session.execution().max_iterations, 20);
        assert_eq!(session.execution().max_plan_rewrites, 4);
        assert_eq!(
            config.logging.event_log.as_deref(),
            Some(std::path::Path::new("/tmp/stepwise.jsonl"))
        );
    }

    #[test]
    fn test_validate_collects_all_issues() {
        let toml_str = r#"
[session]
hil_mode = "typo"
escalation_scope = "typo"

[execution]
max_iterations = 0
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let fields: Vec<String> = config.validate().into_iter().map(|i| i.field).collect();
        assert_eq!(
            fields,
            vec![
                "session.escalation_scope",
                "session.hil_mode",
                "execution.max_iterations"
            ]
        );
    }

    #[test]
    fn test_issue_display() {
        let issue = ConfigIssue::new("session.hil_mode", "unknown hil mode: x");
        assert_eq!(issue.to_string(), "session.hil_mode: unknown hil mode: x");
    }
}
