//! Inter-agent signaling flags.
//!
//! [`Flags`] keeps the open key/value map agents use to signal each other,
//! but gives the recognized keys named accessors. The three control flags
//! (`should_retry_step`, `need_human_for_step`, `plan_rewrite_needed`) are
//! only changed through the grouped operations below so a retry request and
//! an escalation can never be asserted together.
//!
//! # Recognized keys
//!
//! | Key | Value | Writer |
//! |-----|-------|--------|
//! | `should_retry_step` | `true` | critic |
//! | `need_human_for_step` | step id | critic |
//! | `plan_rewrite_needed` | `true` | critic |
//! | `failure_reason` | string | `GlobalState::mark_failed` |

use super::value_objects::StepId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const SHOULD_RETRY_STEP: &str = "should_retry_step";
pub const NEED_HUMAN_FOR_STEP: &str = "need_human_for_step";
pub const PLAN_REWRITE_NEEDED: &str = "plan_rewrite_needed";
pub const FAILURE_REASON: &str = "failure_reason";

/// What the coordinator should do next, derived from the control flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlAction {
    /// Pause and ask a human about the named step.
    Escalate(StepId),
    /// Regenerate the plan.
    RewritePlan,
    /// Re-invoke the current step.
    RetryStep,
    /// Move on to the next step.
    Advance,
}

impl ControlAction {
    pub fn as_str(&self) -> &str {
        match self {
            ControlAction::Escalate(_) => "escalate",
            ControlAction::RewritePlan => "rewrite_plan",
            ControlAction::RetryStep => "retry_step",
            ControlAction::Advance => "advance",
        }
    }
}

/// Open signaling map with typed accessors for the control flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flags(BTreeMap<String, Value>);

impl Flags {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Open map access ====================

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    // ==================== Control flags ====================

    pub fn should_retry_step(&self) -> bool {
        self.is_true(SHOULD_RETRY_STEP)
    }

    pub fn plan_rewrite_needed(&self) -> bool {
        self.is_true(PLAN_REWRITE_NEEDED)
    }

    pub fn need_human_for_step(&self) -> Option<StepId> {
        match self.0.get(NEED_HUMAN_FOR_STEP)? {
            Value::String(id) => Some(StepId::new(id.clone())),
            Value::Null => None,
            other => Some(StepId::new(other.to_string())),
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.0.get(FAILURE_REASON).and_then(Value::as_str)
    }

    pub(crate) fn set_failure_reason(&mut self, reason: impl Into<String>) {
        self.set(FAILURE_REASON, reason.into());
    }

    /// Hand the step to a human and ask for a new plan.
    pub fn escalate(&mut self, step_id: &StepId) {
        self.set(NEED_HUMAN_FOR_STEP, step_id.as_str());
        self.set(PLAN_REWRITE_NEEDED, true);
        self.0.remove(SHOULD_RETRY_STEP);
    }

    /// Ask for the current step to be re-invoked.
    ///
    /// `need_human_for_step` is left alone; the caller decides whether an
    /// escalation outlives the step it was raised for.
    pub fn request_retry(&mut self) {
        self.set(SHOULD_RETRY_STEP, true);
        self.0.remove(PLAN_REWRITE_NEEDED);
    }

    pub fn clear_need_human(&mut self) {
        self.0.remove(NEED_HUMAN_FOR_STEP);
    }

    pub fn clear_plan_rewrite(&mut self) {
        self.0.remove(PLAN_REWRITE_NEEDED);
    }

    /// Remove all three control flags.
    pub fn clear_control(&mut self) {
        self.0.remove(SHOULD_RETRY_STEP);
        self.0.remove(NEED_HUMAN_FOR_STEP);
        self.0.remove(PLAN_REWRITE_NEEDED);
    }

    /// Priority: human > plan rewrite > retry > advance.
    pub fn next_action(&self) -> ControlAction {
        if let Some(step_id) = self.need_human_for_step() {
            ControlAction::Escalate(step_id)
        } else if self.plan_rewrite_needed() {
            ControlAction::RewritePlan
        } else if self.should_retry_step() {
            ControlAction::RetryStep
        } else {
            ControlAction::Advance
        }
    }

    fn is_true(&self, key: &str) -> bool {
        matches!(self.0.get(key), Some(Value::Bool(true)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escalate_clears_retry() {
        let mut flags = Flags::new();
        flags.request_retry();
        assert!(flags.should_retry_step());

        flags.escalate(&StepId::new("abc12345"));
        assert!(!flags.should_retry_step());
        assert!(flags.plan_rewrite_needed());
        assert_eq!(flags.need_human_for_step(), Some(StepId::new("abc12345")));
    }

    #[test]
    fn test_retry_clears_plan_rewrite_only() {
        let mut flags = Flags::new();
        flags.escalate(&StepId::new("s1"));
        flags.request_retry();

        assert!(flags.should_retry_step());
        assert!(!flags.plan_rewrite_needed());
        assert_eq!(flags.need_human_for_step(), Some(StepId::new("s1")));
    }

    #[test]
    fn test_clear_control_keeps_other_keys() {
        let mut flags = Flags::new();
        flags.escalate(&StepId::new("s1"));
        flags.set("custom", "value");

        flags.clear_control();
        assert!(!flags.contains(SHOULD_RETRY_STEP));
        assert!(!flags.contains(NEED_HUMAN_FOR_STEP));
        assert!(!flags.contains(PLAN_REWRITE_NEEDED));
        assert_eq!(flags.get("custom"), Some(&Value::from("value")));
    }

    #[test]
    fn test_next_action_priority() {
        let mut flags = Flags::new();
        assert_eq!(flags.next_action(), ControlAction::Advance);

        flags.set(SHOULD_RETRY_STEP, true);
        assert_eq!(flags.next_action(), ControlAction::RetryStep);

        flags.set(PLAN_REWRITE_NEEDED, true);
        assert_eq!(flags.next_action(), ControlAction::RewritePlan);

        flags.set(NEED_HUMAN_FOR_STEP, "s9");
        assert_eq!(
            flags.next_action(),
            ControlAction::Escalate(StepId::new("s9"))
        );
    }

    #[test]
    fn test_non_bool_values_are_not_true() {
        let mut flags = Flags::new();
        flags.set(SHOULD_RETRY_STEP, "yes");
        flags.set(PLAN_REWRITE_NEEDED, 1);
        assert!(!flags.should_retry_step());
        assert!(!flags.plan_rewrite_needed());
    }

    #[test]
    fn test_null_need_human_reads_as_absent() {
        let mut flags = Flags::new();
        flags.set(NEED_HUMAN_FOR_STEP, Value::Null);
        assert_eq!(flags.need_human_for_step(), None);
    }
}
