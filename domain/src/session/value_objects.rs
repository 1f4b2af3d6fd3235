//! Session value objects - identifiers and lifecycle statuses.
//!
//! # Identifiers
//! - [`StepId`] - Opaque identifier for a plan step
//!
//! # Statuses
//! - [`StepStatus`] - Lifecycle of a single plan step
//! - [`SessionStatus`] - Lifecycle of the whole session

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Opaque identifier for a plan step.
///
/// Generated ids are the first 8 hex characters of a v4 UUID, which keeps
/// them short enough to read in logs while collisions stay negligible for
/// plans of realistic size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(String);

impl StepId {
    /// Creates a StepId from an existing string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random StepId.
    pub fn generate() -> Self {
        let mut id = uuid::Uuid::new_v4().simple().to_string();
        id.truncate(8);
        Self(id)
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<T: Into<String>> From<T> for StepId {
    fn from(s: T) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a plan step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Step is waiting to be executed
    #[default]
    Pending,
    /// Step is currently being executed
    Running,
    /// Step completed successfully
    Success,
    /// Step failed (may be retried)
    Failed,
    /// Step was skipped
    Skipped,
}

impl StepStatus {
    pub fn as_str(&self) -> &str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Running => "running",
            StepStatus::Success => "success",
            StepStatus::Failed => "failed",
            StepStatus::Skipped => "skipped",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StepStatus::Success | StepStatus::Failed | StepStatus::Skipped
        )
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StepStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(StepStatus::Pending),
            "running" => Ok(StepStatus::Running),
            "success" => Ok(StepStatus::Success),
            "failed" => Ok(StepStatus::Failed),
            "skipped" => Ok(StepStatus::Skipped),
            _ => Err(DomainError::InvalidStatus {
                kind: "step",
                value: s.to_string(),
            }),
        }
    }
}

/// Status of the whole session.
///
/// `Done` and `Failed` are terminal: nothing in the domain transitions out
/// of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Running,
    Done,
    Failed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SessionStatus::Running => "running",
            SessionStatus::Done => "done",
            SessionStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionStatus::Running)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "running" => Ok(SessionStatus::Running),
            "done" => Ok(SessionStatus::Done),
            "failed" => Ok(SessionStatus::Failed),
            _ => Err(DomainError::InvalidStatus {
                kind: "session",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_step_ids_are_short_and_distinct() {
        let a = StepId::generate();
        let b = StepId::generate();
        assert_eq!(a.as_str().len(), 8);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_step_status_terminal() {
        assert!(!StepStatus::Pending.is_terminal());
        assert!(!StepStatus::Running.is_terminal());
        assert!(StepStatus::Success.is_terminal());
        assert!(StepStatus::Failed.is_terminal());
        assert!(StepStatus::Skipped.is_terminal());
    }

    #[test]
    fn test_step_status_parse() {
        assert_eq!("failed".parse::<StepStatus>().unwrap(), StepStatus::Failed);
        assert_eq!(" Success ".parse::<StepStatus>().unwrap(), StepStatus::Success);
        assert!("exploded".parse::<StepStatus>().is_err());
    }

    #[test]
    fn test_session_status_parse_and_display() {
        assert_eq!("done".parse::<SessionStatus>().unwrap(), SessionStatus::Done);
        assert_eq!(SessionStatus::Failed.to_string(), "failed");
        assert!(SessionStatus::Done.is_terminal());
        assert!(!SessionStatus::Running.is_terminal());
        assert!("paused".parse::<SessionStatus>().is_err());
    }

    #[test]
    fn test_status_serde_is_snake_case() {
        let json = serde_json::to_string(&StepStatus::Skipped).unwrap();
        assert_eq!(json, "\"skipped\"");
        let status: SessionStatus = serde_json::from_str("\"done\"").unwrap();
        assert_eq!(status, SessionStatus::Done);
    }
}
