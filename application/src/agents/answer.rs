//! Answer agent: composes the final answer from step outputs.

use crate::ports::agent::{ANSWER, Agent, AgentOptions};
use async_trait::async_trait;
use serde_json::Value;
use stepwise_domain::{GlobalState, StepStatus};
use tracing::info;

#[derive(Debug, Default)]
pub struct AnswerAgent;

impl AnswerAgent {
    pub fn new() -> Self {
        Self
    }

    fn render(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    fn compose(state: &GlobalState) -> String {
        state
            .plan
            .iter()
            .filter(|step| step.status == StepStatus::Success)
            .filter_map(|step| step.output.as_ref())
            .map(Self::render)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl Agent for AnswerAgent {
    fn name(&self) -> &str {
        ANSWER
    }

    async fn run(&self, mut state: GlobalState, _options: &AgentOptions) -> GlobalState {
        let answer = Self::compose(&state);
        let Some(step) = state.current_step_mut() else {
            return state;
        };
        step.mark_running();

        if answer.is_empty() {
            step.mark_failed("no step outputs to compose");
            return state;
        }

        step.mark_success(answer.clone());
        info!("Composed final answer ({} bytes)", answer.len());
        state.mark_done(Some(answer));
        state
    }
}
