//! Human intervention port for escalated steps.
//!
//! When a step fails `max_retries` times the critic raises
//! `need_human_for_step`. The session coordinator then asks this port what
//! to do with the step.
//!
//! # Flow
//!
//! ```text
//! Step FAILED (attempt 1) ── retry
//!        ↓
//! Step FAILED (attempt 2) ── retry
//!        ↓
//! Step FAILED (attempt 3)
//!        ↓
//! max_retries reached ── need_human_for_step + plan_rewrite_needed
//!        ↓
//! HumanInterventionPort::request_intervention()
//!        ↓
//! Retry / Skip / Replan / Abort
//! ```
//!
//! # Built-in Implementations
//!
//! - [`AutoAbortIntervention`] - Always fails the session
//! - [`AutoSkipIntervention`] - Always skips the step
//! - [`AutoReplanIntervention`] - Always asks for a new plan
//!
//! For interactive use, see `InteractiveHumanIntervention` in the
//! presentation layer.

use async_trait::async_trait;
use std::sync::Arc;
use stepwise_domain::{GlobalState, HilMode, HumanDecision, PlanStep};

/// Error type for human intervention operations.
///
/// These errors represent failures during the intervention process,
/// not decisions made by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HumanInterventionError {
    /// Operator cancelled (e.g., closed stdin).
    Cancelled,
    /// Input/output error (e.g., terminal read failure).
    IoError(String),
    /// Invalid operator input.
    InvalidInput(String),
}

impl std::fmt::Display for HumanInterventionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HumanInterventionError::Cancelled => write!(f, "Intervention cancelled"),
            HumanInterventionError::IoError(msg) => write!(f, "I/O error: {}", msg),
            HumanInterventionError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for HumanInterventionError {}

/// Port for resolving escalated steps.
#[async_trait]
pub trait HumanInterventionPort: Send + Sync {
    /// Decide what happens to an escalated step.
    ///
    /// # Arguments
    ///
    /// * `state` - The session state at the moment of escalation
    /// * `step` - The escalated step (status, attempts, last error)
    async fn request_intervention(
        &self,
        state: &GlobalState,
        step: &PlanStep,
    ) -> Result<HumanDecision, HumanInterventionError>;
}

/// Non-interactive handler that fails the session.
///
/// This is the safest non-interactive mode.
pub struct AutoAbortIntervention;

#[async_trait]
impl HumanInterventionPort for AutoAbortIntervention {
    async fn request_intervention(
        &self,
        _state: &GlobalState,
        step: &PlanStep,
    ) -> Result<HumanDecision, HumanInterventionError> {
        Ok(HumanDecision::Abort(format!(
            "step {} failed after {} attempts",
            step.id, step.attempts
        )))
    }
}

/// Non-interactive handler that skips the escalated step.
pub struct AutoSkipIntervention;

#[async_trait]
impl HumanInterventionPort for AutoSkipIntervention {
    async fn request_intervention(
        &self,
        _state: &GlobalState,
        _step: &PlanStep,
    ) -> Result<HumanDecision, HumanInterventionError> {
        Ok(HumanDecision::Skip)
    }
}

/// Non-interactive handler that asks for a new plan.
pub struct AutoReplanIntervention;

#[async_trait]
impl HumanInterventionPort for AutoReplanIntervention {
    async fn request_intervention(
        &self,
        _state: &GlobalState,
        _step: &PlanStep,
    ) -> Result<HumanDecision, HumanInterventionError> {
        Ok(HumanDecision::Replan)
    }
}

/// Built-in handler for a non-interactive [`HilMode`].
///
/// Returns `None` for [`HilMode::Interactive`]; the caller must supply an
/// interactive adapter.
pub fn automatic_intervention(mode: HilMode) -> Option<Arc<dyn HumanInterventionPort>> {
    match mode {
        HilMode::Interactive => None,
        HilMode::Abort => Some(Arc::new(AutoAbortIntervention)),
        HilMode::Skip => Some(Arc::new(AutoSkipIntervention)),
        HilMode::Replan => Some(Arc::new(AutoReplanIntervention)),
    }
}
