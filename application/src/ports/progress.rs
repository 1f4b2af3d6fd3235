//! Session progress port.
//!
//! [`SessionProgressNotifier`] is an **output port** that the presentation
//! layer implements to show a session as it runs. All callback argument
//! types come from the domain layer.
//!
//! All methods have default no-op implementations, so implementers only
//! need to override the callbacks they care about.

use stepwise_domain::{ControlAction, GlobalState, HumanDecision, PlanStep};

pub trait SessionProgressNotifier: Send + Sync {
    /// Called when a plan has been created or rewritten
    fn on_plan_ready(&self, _plan: &[PlanStep], _revision: usize) {}

    /// Called before a step attempt (`index` is 1-based)
    fn on_step_start(&self, _step: &PlanStep, _index: usize, _total: usize) {}

    /// Called after the step's agent returned
    fn on_step_complete(&self, _step: &PlanStep) {}

    /// Called with the action the control flags resolved to after review
    fn on_review(&self, _step: &PlanStep, _action: &ControlAction) {}

    /// Called when a step is escalated to a human
    fn on_escalation(&self, _step: &PlanStep) {}

    /// Called with the resolution of an escalation
    fn on_decision(&self, _step: &PlanStep, _decision: &HumanDecision) {}

    /// Called once the session reached a terminal status
    fn on_session_finished(&self, _state: &GlobalState) {}
}

/// No-op progress notifier
pub struct NoSessionProgress;

impl SessionProgressNotifier for NoSessionProgress {}
