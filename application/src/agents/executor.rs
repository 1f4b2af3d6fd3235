//! Executor agent: runs the current step's tool.
//!
//! Every invocation lands in the state's tool log and statistics, success
//! or not, so the critic and the memory agent see the outcome. The step
//! ends `success` with the tool output or `failed` with the tool error.

use crate::ports::agent::{Agent, AgentOptions, EXECUTOR};
use crate::ports::tool_executor::ToolExecutorPort;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use stepwise_domain::{GlobalState, ToolCallRecord};
use tracing::{debug, warn};

pub struct ExecutorAgent {
    tools: Arc<dyn ToolExecutorPort>,
}

impl ExecutorAgent {
    pub fn new(tools: Arc<dyn ToolExecutorPort>) -> Self {
        Self { tools }
    }
}

#[async_trait]
impl Agent for ExecutorAgent {
    fn name(&self) -> &str {
        EXECUTOR
    }

    fn delegates(&self) -> bool {
        true
    }

    async fn run(&self, mut state: GlobalState, _options: &AgentOptions) -> GlobalState {
        let Some(step) = state.current_step_mut() else {
            return state;
        };
        step.mark_running();

        let Some(tool_name) = step.tool_name.clone() else {
            warn!("Step {} has no tool assigned", step.id);
            step.mark_failed("no tool assigned");
            return state;
        };
        let input = step.input.clone().unwrap_or(Value::Null);

        debug!("Step {}: calling tool {}", step.id, tool_name);
        let started = Instant::now();
        let result = self.tools.execute(&tool_name, &input).await;
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        let record = match result {
            Ok(output) => {
                step.mark_success(output);
                ToolCallRecord::success(&tool_name, latency_ms)
            }
            Err(e) => {
                let message = e.to_string();
                warn!("Step {}: {}", step.id, message);
                step.mark_failed(message.clone());
                ToolCallRecord::failure(&tool_name, latency_ms, message)
            }
        };
        state.record_tool_call(record);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::tool_executor::ToolError;
    use stepwise_domain::{PlanStep, StepStatus};

    struct FixedTools;

    #[async_trait]
    impl ToolExecutorPort for FixedTools {
        fn available_tools(&self) -> Vec<&str> {
            vec!["echo", "broken"]
        }

        async fn execute(&self, tool_name: &str, input: &Value) -> Result<Value, ToolError> {
            match tool_name {
                "echo" => Ok(input.clone()),
                "broken" => Err(ToolError::Failed {
                    tool: tool_name.to_string(),
                    message: "timeout".to_string(),
                }),
                other => Err(ToolError::NotFound(other.to_string())),
            }
        }
    }

    fn agent() -> ExecutorAgent {
        ExecutorAgent::new(Arc::new(FixedTools))
    }

    fn state_with(step: PlanStep) -> GlobalState {
        GlobalState::new("q").with_plan(vec![step])
    }

    #[tokio::test]
    async fn test_successful_tool_call() {
        let step = PlanStep::new("Look up", EXECUTOR)
            .with_tool("echo")
            .with_input("hello");
        let state = agent().run(state_with(step), &AgentOptions::new()).await;

        let step = &state.plan[0];
        assert_eq!(step.status, StepStatus::Success);
        assert_eq!(step.output, Some(Value::from("hello")));
        assert_eq!(state.tool_log().len(), 1);
        assert!(state.tool_log()[0].is_success());
        assert_eq!(state.tool_stats_for("echo").unwrap().successes(), 1);
    }

    #[tokio::test]
    async fn test_failed_tool_call_is_recorded() {
        let step = PlanStep::new("Look up", EXECUTOR).with_tool("broken");
        let state = agent().run(state_with(step), &AgentOptions::new()).await;

        let step = &state.plan[0];
        assert_eq!(step.status, StepStatus::Failed);
        assert_eq!(step.error.as_deref(), Some("Tool broken failed: timeout"));
        let stats = state.tool_stats_for("broken").unwrap();
        assert_eq!(stats.failures(), 1);
        assert_eq!(
            state.tool_log()[0].error(),
            Some("Tool broken failed: timeout")
        );
    }

    #[tokio::test]
    async fn test_unknown_tool_fails_step() {
        let step = PlanStep::new("Look up", EXECUTOR).with_tool("missing");
        let state = agent().run(state_with(step), &AgentOptions::new()).await;
        assert_eq!(state.plan[0].status, StepStatus::Failed);
        assert_eq!(state.tool_stats_for("missing").unwrap().calls(), 1);
    }

    #[tokio::test]
    async fn test_step_without_tool() {
        let step = PlanStep::new("Look up", EXECUTOR);
        let state = agent().run(state_with(step), &AgentOptions::new()).await;
        assert_eq!(state.plan[0].status, StepStatus::Failed);
        assert_eq!(state.plan[0].error.as_deref(), Some("no tool assigned"));
        assert!(state.tool_log().is_empty());
    }

    #[tokio::test]
    async fn test_no_current_step_is_noop() {
        let state = agent().run(GlobalState::new("q"), &AgentOptions::new()).await;
        assert!(state.tool_log().is_empty());
        assert!(agent().delegates());
    }
}
