//! Human-in-the-loop types for escalated steps.
//!
//! When a step exhausts its retries the critic escalates it. How the
//! escalation is resolved is governed by [`HilMode`]; the resolution itself
//! is a [`HumanDecision`].

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How escalations are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HilMode {
    /// Ask the operator.
    #[default]
    Interactive,
    /// Fail the session.
    Abort,
    /// Skip the escalated step and carry on.
    Skip,
    /// Regenerate the plan.
    Replan,
}

impl HilMode {
    pub fn as_str(&self) -> &str {
        match self {
            HilMode::Interactive => "interactive",
            HilMode::Abort => "abort",
            HilMode::Skip => "skip",
            HilMode::Replan => "replan",
        }
    }
}

impl std::fmt::Display for HilMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HilMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "interactive" => Ok(HilMode::Interactive),
            "abort" | "auto_abort" => Ok(HilMode::Abort),
            "skip" | "auto_skip" => Ok(HilMode::Skip),
            "replan" | "auto_replan" => Ok(HilMode::Replan),
            _ => Err(format!("unknown hil mode: {}", s)),
        }
    }
}

/// Resolution of an escalated step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HumanDecision {
    /// Reset the step's attempts and run it again.
    Retry,
    /// Mark the step skipped and move on.
    Skip,
    /// Throw the plan away and plan again.
    Replan,
    /// Fail the session with the given reason.
    Abort(String),
}

impl HumanDecision {
    pub fn as_str(&self) -> &str {
        match self {
            HumanDecision::Retry => "retry",
            HumanDecision::Skip => "skip",
            HumanDecision::Replan => "replan",
            HumanDecision::Abort(_) => "abort",
        }
    }
}
