//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid {kind} status: {value}")]
    InvalidStatus { kind: &'static str, value: String },

    #[error("Invalid escalation scope: {0}")]
    InvalidEscalationScope(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_status_display() {
        let error = DomainError::InvalidStatus {
            kind: "step",
            value: "exploded".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid step status: exploded");
    }

    #[test]
    fn test_invalid_scope_display() {
        let error = DomainError::InvalidEscalationScope("global".to_string());
        assert_eq!(error.to_string(), "Invalid escalation scope: global");
    }
}
