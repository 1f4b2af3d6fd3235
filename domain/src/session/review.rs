//! Step review: the retry / escalation rule.
//!
//! [`review_step`] inspects the step under the cursor after it executed and
//! rewrites the control flags accordingly:
//!
//! ```text
//! failed, attempts >= max_retries  ──> Escalate  (need_human + plan_rewrite)
//! failed, attempts <  max_retries  ──> Retry     (should_retry)
//! anything else                    ──> Clear     (no control flags)
//! no current step                  ──> NoStep    (state untouched)
//! ```
//!
//! `max_retries` comes from the session constraints and degrades to the
//! default when missing or malformed. Independently of the verdict, a
//! non-empty final answer moves a running session to `done`.

use super::entities::GlobalState;
use super::value_objects::{StepId, StepStatus};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Whether `need_human_for_step` outlives the step it was raised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationScope {
    /// A retry request always clears any pending escalation.
    #[default]
    Step,
    /// An escalation raised for another step persists until it is resolved.
    Session,
}

impl EscalationScope {
    pub fn as_str(&self) -> &str {
        match self {
            EscalationScope::Step => "step",
            EscalationScope::Session => "session",
        }
    }
}

impl std::fmt::Display for EscalationScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EscalationScope {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "step" => Ok(EscalationScope::Step),
            "session" => Ok(EscalationScope::Session),
            _ => Err(DomainError::InvalidEscalationScope(s.to_string())),
        }
    }
}

/// Static rules for step review.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewPolicy {
    pub escalation_scope: EscalationScope,
}

impl ReviewPolicy {
    pub fn with_escalation_scope(mut self, scope: EscalationScope) -> Self {
        self.escalation_scope = scope;
        self
    }
}

/// Outcome of one review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepVerdict {
    /// Cursor is past the end of the plan; nothing was changed.
    NoStep,
    /// The step failed and has attempts left.
    Retry { step_id: StepId, attempts: u32, max_retries: u64 },
    /// The step failed and exhausted its attempts.
    Escalate { step_id: StepId, attempts: u32, max_retries: u64 },
    /// The step needs no intervention.
    Clear { step_id: StepId },
}

impl StepVerdict {
    pub fn as_str(&self) -> &str {
        match self {
            StepVerdict::NoStep => "no_step",
            StepVerdict::Retry { .. } => "retry",
            StepVerdict::Escalate { .. } => "escalate",
            StepVerdict::Clear { .. } => "clear",
        }
    }
}

/// Review the current step and update flags and session status.
///
/// Never fails. Running it twice on an unchanged state yields the same flags.
pub fn review_step(state: &mut GlobalState, policy: &ReviewPolicy) -> StepVerdict {
    let Some(step) = state.current_step() else {
        return StepVerdict::NoStep;
    };
    let step_id = step.id.clone();
    let status = step.status;
    let attempts = step.attempts;
    let max_retries = state.constraints.max_retries();

    let verdict = match status {
        StepStatus::Failed if u64::from(attempts) >= max_retries => {
            state.flags.escalate(&step_id);
            StepVerdict::Escalate { step_id, attempts, max_retries }
        }
        StepStatus::Failed => {
            state.flags.request_retry();
            let keep_pending_escalation = policy.escalation_scope == EscalationScope::Session
                && state
                    .flags
                    .need_human_for_step()
                    .is_some_and(|other| other != step_id);
            if !keep_pending_escalation {
                state.flags.clear_need_human();
            }
            StepVerdict::Retry { step_id, attempts, max_retries }
        }
        _ => {
            state.flags.clear_control();
            StepVerdict::Clear { step_id }
        }
    };

    if state.has_final_answer() {
        state.mark_done(None);
    }

    verdict
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::constraints::{Constraints, MAX_RETRIES};
    use crate::session::entities::PlanStep;
    use crate::session::flags::{NEED_HUMAN_FOR_STEP, PLAN_REWRITE_NEEDED, SHOULD_RETRY_STEP};
    use crate::session::value_objects::SessionStatus;
    use serde_json::json;

    fn state_with_step(status: StepStatus, attempts: u32) -> GlobalState {
        let mut step = PlanStep::new("Look up", "executor").with_id("step-1");
        step.status = status;
        step.attempts = attempts;
        GlobalState::new("q").with_plan(vec![step])
    }

    fn control_flags(state: &GlobalState) -> (bool, bool, bool) {
        (
            state.flags.contains(SHOULD_RETRY_STEP),
            state.flags.contains(NEED_HUMAN_FOR_STEP),
            state.flags.contains(PLAN_REWRITE_NEEDED),
        )
    }

    #[test]
    fn test_failed_below_threshold_retries() {
        let mut state = state_with_step(StepStatus::Failed, 2);
        let verdict = review_step(&mut state, &ReviewPolicy::default());

        assert_eq!(verdict.as_str(), "retry");
        assert!(state.flags.should_retry_step());
        assert_eq!(control_flags(&state), (true, false, false));
    }

    #[test]
    fn test_failed_at_threshold_escalates() {
        let mut state = state_with_step(StepStatus::Failed, 3)
            .with_constraints(Constraints::new().with(MAX_RETRIES, 3));
        let verdict = review_step(&mut state, &ReviewPolicy::default());

        assert_eq!(
            verdict,
            StepVerdict::Escalate {
                step_id: StepId::new("step-1"),
                attempts: 3,
                max_retries: 3
            }
        );
        assert_eq!(state.flags.need_human_for_step(), Some(StepId::new("step-1")));
        assert!(state.flags.plan_rewrite_needed());
        assert!(!state.flags.contains(SHOULD_RETRY_STEP));
    }

    #[test]
    fn test_success_clears_all_control_flags() {
        let mut state = state_with_step(StepStatus::Success, 1);
        state.flags.set(SHOULD_RETRY_STEP, true);
        state.flags.set(NEED_HUMAN_FOR_STEP, "old");
        state.flags.set(PLAN_REWRITE_NEEDED, true);

        review_step(&mut state, &ReviewPolicy::default());
        assert_eq!(control_flags(&state), (false, false, false));
    }

    #[test]
    fn test_pending_running_skipped_clear_flags() {
        for status in [StepStatus::Pending, StepStatus::Running, StepStatus::Skipped] {
            let mut state = state_with_step(status, 0);
            state.flags.set(SHOULD_RETRY_STEP, true);
            let verdict = review_step(&mut state, &ReviewPolicy::default());
            assert_eq!(verdict.as_str(), "clear");
            assert_eq!(control_flags(&state), (false, false, false));
        }
    }

    #[test]
    fn test_malformed_max_retries_falls_back_to_default() {
        let mut state = state_with_step(StepStatus::Failed, 3)
            .with_constraints(Constraints::new().with(MAX_RETRIES, "oops"));
        let verdict = review_step(&mut state, &ReviewPolicy::default());

        assert_eq!(verdict.as_str(), "escalate");
        assert!(state.flags.plan_rewrite_needed());
    }

    #[test]
    fn test_final_answer_marks_done() {
        let mut state = state_with_step(StepStatus::Running, 1);
        state.final_answer = Some("42".to_string());

        review_step(&mut state, &ReviewPolicy::default());
        assert_eq!(state.session_status, SessionStatus::Done);
    }

    #[test]
    fn test_empty_final_answer_does_not_mark_done() {
        let mut state = state_with_step(StepStatus::Success, 1);
        state.final_answer = Some(String::new());

        review_step(&mut state, &ReviewPolicy::default());
        assert_eq!(state.session_status, SessionStatus::Running);
    }

    #[test]
    fn test_no_current_step_is_noop() {
        let mut state = GlobalState::new("q");
        state.flags.set(SHOULD_RETRY_STEP, true);
        state.final_answer = Some("42".to_string());
        let before = state.clone();

        let verdict = review_step(&mut state, &ReviewPolicy::default());
        assert_eq!(verdict, StepVerdict::NoStep);
        assert_eq!(state, before);
    }

    #[test]
    fn test_review_is_idempotent() {
        for (status, attempts) in [
            (StepStatus::Failed, 1),
            (StepStatus::Failed, 5),
            (StepStatus::Success, 1),
        ] {
            let mut once = state_with_step(status, attempts);
            review_step(&mut once, &ReviewPolicy::default());
            let mut twice = once.clone();
            review_step(&mut twice, &ReviewPolicy::default());
            assert_eq!(once.flags, twice.flags);
        }
    }

    #[test]
    fn test_failed_step_never_asserts_retry_and_escalation_together() {
        for attempts in 0..6 {
            let mut state = state_with_step(StepStatus::Failed, attempts);
            state.flags.request_retry();
            state.flags.escalate(&StepId::new("step-1"));
            review_step(&mut state, &ReviewPolicy::default());

            let retry = state.flags.should_retry_step();
            let escalate =
                state.flags.need_human_for_step().is_some() && state.flags.plan_rewrite_needed();
            assert!(retry ^ escalate, "attempts={attempts}");
        }
    }

    #[test]
    fn test_step_scope_clears_foreign_escalation_on_retry() {
        let mut state = state_with_step(StepStatus::Failed, 1);
        state.flags.set(NEED_HUMAN_FOR_STEP, "other-step");

        review_step(&mut state, &ReviewPolicy::default());
        assert!(state.flags.should_retry_step());
        assert_eq!(state.flags.need_human_for_step(), None);
    }

    #[test]
    fn test_session_scope_keeps_foreign_escalation_on_retry() {
        let policy = ReviewPolicy::default().with_escalation_scope(EscalationScope::Session);
        let mut state = state_with_step(StepStatus::Failed, 1);
        state.flags.set(NEED_HUMAN_FOR_STEP, "other-step");

        review_step(&mut state, &policy);
        assert!(state.flags.should_retry_step());
        assert_eq!(
            state.flags.need_human_for_step(),
            Some(StepId::new("other-step"))
        );
    }

    #[test]
    fn test_session_scope_clears_own_escalation_on_retry() {
        let policy = ReviewPolicy::default().with_escalation_scope(EscalationScope::Session);
        let mut state = state_with_step(StepStatus::Failed, 1)
            .with_constraints(Constraints::new().with(MAX_RETRIES, json!(5)));
        state.flags.set(NEED_HUMAN_FOR_STEP, "step-1");

        review_step(&mut state, &policy);
        assert_eq!(state.flags.need_human_for_step(), None);
    }

    #[test]
    fn test_escalation_scope_parse() {
        assert_eq!("Session".parse::<EscalationScope>().unwrap(), EscalationScope::Session);
        assert_eq!("step".parse::<EscalationScope>().unwrap(), EscalationScope::Step);
        assert!("global".parse::<EscalationScope>().is_err());
    }
}
