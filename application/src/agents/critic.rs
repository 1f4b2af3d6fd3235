//! Critic agent: arbitrates the outcome of the step that just ran.
//!
//! Thin wrapper around [`review_step`]: the retry / escalation rule lives in
//! the domain, this agent applies it with the configured [`ReviewPolicy`]
//! and reports the verdict.

use crate::ports::agent::{Agent, AgentOptions, CRITIC};
use async_trait::async_trait;
use stepwise_domain::{GlobalState, ReviewPolicy, StepVerdict, review_step};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
pub struct CriticAgent {
    policy: ReviewPolicy,
}

impl CriticAgent {
    pub fn new(policy: ReviewPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ReviewPolicy {
        &self.policy
    }
}

#[async_trait]
impl Agent for CriticAgent {
    fn name(&self) -> &str {
        CRITIC
    }

    async fn run(&self, mut state: GlobalState, _options: &AgentOptions) -> GlobalState {
        match review_step(&mut state, &self.policy) {
            StepVerdict::NoStep => debug!("No current step to review"),
            StepVerdict::Retry {
                step_id,
                attempts,
                max_retries,
            } => info!(
                "Step {} failed (attempt {}/{}), requesting retry",
                step_id, attempts, max_retries
            ),
            StepVerdict::Escalate {
                step_id,
                attempts,
                max_retries,
            } => warn!(
                "Step {} failed {} times (max {}), escalating",
                step_id, attempts, max_retries
            ),
            StepVerdict::Clear { step_id } => debug!("Step {} needs no intervention", step_id),
        }
        state
    }
}
