//! Session configuration container.
//!
//! [`SessionConfig`] groups everything a session run is configured with:
//! the review policy, how escalations are resolved, loop limits, and the
//! constraint values seeded into a new session.
//!
//! Constraint values set here are caller-provided, so the perception agent
//! will not override them with its own defaults.

use crate::config::ExecutionParams;
use crate::use_cases::run_session::RunSessionInput;
use stepwise_domain::{Constraints, EscalationScope, HilMode, MAX_RETRIES, MAX_STEPS, ReviewPolicy};

#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    policy: ReviewPolicy,
    hil_mode: HilMode,
    execution: ExecutionParams,
    max_retries: Option<u64>,
    max_steps: Option<u64>,
}

impl SessionConfig {
    pub fn new(policy: ReviewPolicy, hil_mode: HilMode, execution: ExecutionParams) -> Self {
        Self {
            policy,
            hil_mode,
            execution,
            max_retries: None,
            max_steps: None,
        }
    }

    // ==================== Accessors ====================

    pub fn policy(&self) -> &ReviewPolicy {
        &self.policy
    }

    pub fn hil_mode(&self) -> HilMode {
        self.hil_mode
    }

    pub fn execution(&self) -> &ExecutionParams {
        &self.execution
    }

    pub fn max_retries(&self) -> Option<u64> {
        self.max_retries
    }

    pub fn max_steps(&self) -> Option<u64> {
        self.max_steps
    }

    // ==================== Builder Methods ====================

    pub fn with_hil_mode(mut self, mode: HilMode) -> Self {
        self.hil_mode = mode;
        self
    }

    pub fn with_escalation_scope(mut self, scope: EscalationScope) -> Self {
        self.policy = self.policy.with_escalation_scope(scope);
        self
    }

    pub fn with_execution(mut self, execution: ExecutionParams) -> Self {
        self.execution = execution;
        self
    }

    pub fn with_max_retries(mut self, max: u64) -> Self {
        self.max_retries = Some(max);
        self
    }

    pub fn with_max_steps(mut self, max: u64) -> Self {
        self.max_steps = Some(max);
        self
    }

    // ==================== Factory ====================

    /// Constraints seeded into a new session.
    pub fn initial_constraints(&self) -> Constraints {
        let mut constraints = Constraints::new();
        if let Some(max) = self.max_retries {
            constraints.set(MAX_RETRIES, max);
        }
        if let Some(max) = self.max_steps {
            constraints.set(MAX_STEPS, max);
        }
        constraints
    }

    /// Build the use case input for a query.
    pub fn to_session_input(&self, query: impl Into<String>) -> RunSessionInput {
        RunSessionInput::new(query).with_constraints(self.initial_constraints())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_seeds_nothing() {
        let config = SessionConfig::default();
        assert!(config.initial_constraints().is_empty());
        assert_eq!(config.hil_mode(), HilMode::Interactive);
        assert_eq!(config.policy().escalation_scope, EscalationScope::Step);
    }

    #[test]
    fn test_builder_seeds_constraints() {
        let config = SessionConfig::default()
            .with_max_retries(5)
            .with_max_steps(4)
            .with_hil_mode(HilMode::Skip)
            .with_escalation_scope(EscalationScope::Session);

        let constraints = config.initial_constraints();
        assert_eq!(constraints.max_retries(), 5);
        assert_eq!(constraints.max_steps(), 4);
        assert_eq!(config.hil_mode(), HilMode::Skip);
        assert_eq!(config.policy().escalation_scope, EscalationScope::Session);
    }

    #[test]
    fn test_to_session_input() {
        let input = SessionConfig::default()
            .with_max_retries(1)
            .to_session_input("rust vs go");
        assert_eq!(input.query, "rust vs go");
        assert_eq!(input.constraints.max_retries(), 1);
    }
}
