//! Planner agent: placeholder plan generation.
//!
//! Builds one lookup step per entity (or a single lookup for the whole
//! query), followed by a step for the answer agent. Lookups use the
//! remembered preferred tool when there is one. This stands in for a real
//! planner; the coordinator only relies on it producing a plan.
//!
//! # Options
//!
//! - `default_tool`: lookup tool when no preferred tool is remembered

use crate::agents::memory::PREFERRED_TOOL;
use crate::ports::agent::{ANSWER, Agent, AgentOptions, EXECUTOR, PLANNER};
use async_trait::async_trait;
use stepwise_domain::{GlobalState, PlanStep};
use tracing::info;

pub const DEFAULT_LOOKUP_TOOL: &str = "echo";

#[derive(Debug)]
pub struct PlannerAgent {
    default_tool: String,
}

impl Default for PlannerAgent {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKUP_TOOL)
    }
}

impl PlannerAgent {
    pub fn new(default_tool: impl Into<String>) -> Self {
        Self {
            default_tool: default_tool.into(),
        }
    }

    fn lookup_tool<'a>(&'a self, state: &'a GlobalState, options: &'a AgentOptions) -> &'a str {
        state
            .memory
            .get(PREFERRED_TOOL)
            .and_then(|v| v.as_str())
            .or_else(|| options.get_str("default_tool"))
            .unwrap_or(&self.default_tool)
    }

    fn build_plan(&self, state: &GlobalState, options: &AgentOptions) -> Vec<PlanStep> {
        let tool = self.lookup_tool(state, options);
        let subjects: Vec<&str> = if state.entities.is_empty() {
            vec![state.query()]
        } else {
            state.entities.iter().map(String::as_str).collect()
        };
        let max_lookups = state.constraints.max_steps().saturating_sub(1).max(1) as usize;

        let mut plan: Vec<PlanStep> = subjects
            .into_iter()
            .take(max_lookups)
            .map(|subject| {
                PlanStep::new(format!("Look up {}", subject), EXECUTOR)
                    .with_tool(tool)
                    .with_input(subject)
            })
            .collect();
        plan.push(PlanStep::new("Compose the final answer", ANSWER));
        plan
    }
}

#[async_trait]
impl Agent for PlannerAgent {
    fn name(&self) -> &str {
        PLANNER
    }

    async fn run(&self, mut state: GlobalState, options: &AgentOptions) -> GlobalState {
        let plan = self.build_plan(&state, options);
        let rewrite = !state.plan.is_empty();
        info!(
            "{} plan with {} steps",
            if rewrite { "Rewrote" } else { "Created" },
            plan.len()
        );

        state.replace_plan(plan);
        state.flags.clear_control();
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use stepwise_domain::{Constraints, MAX_STEPS, StepStatus};

    async fn plan(state: GlobalState, options: AgentOptions) -> GlobalState {
        PlannerAgent::default().run(state, &options).await
    }

    #[tokio::test]
    async fn test_plan_for_plain_query() {
        let state = plan(GlobalState::new("what is rust"), AgentOptions::new()).await;

        assert_eq!(state.plan.len(), 2);
        assert_eq!(state.plan[0].agent, EXECUTOR);
        assert_eq!(state.plan[0].tool_name.as_deref(), Some(DEFAULT_LOOKUP_TOOL));
        assert_eq!(state.plan[0].input, Some(Value::from("what is rust")));
        assert_eq!(state.plan[1].agent, ANSWER);
        assert_eq!(state.current_step_index, 0);
    }

    #[tokio::test]
    async fn test_one_lookup_per_entity_capped_by_max_steps() {
        let mut state = GlobalState::new("a vs b vs c")
            .with_constraints(Constraints::new().with(MAX_STEPS, 3));
        state.entities = vec!["a".into(), "b".into(), "c".into()];

        let state = plan(state, AgentOptions::new()).await;
        let descriptions: Vec<&str> = state.plan.iter().map(|s| s.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec!["Look up a", "Look up b", "Compose the final answer"]
        );
    }

    #[tokio::test]
    async fn test_zero_max_steps_still_plans_one_lookup() {
        let state = GlobalState::new("q").with_constraints(Constraints::new().with(MAX_STEPS, 0));
        let state = plan(state, AgentOptions::new()).await;
        assert_eq!(state.plan.len(), 2);
    }

    #[tokio::test]
    async fn test_tool_selection_order() {
        let options = AgentOptions::new().with("default_tool", "search");
        let state = plan(GlobalState::new("q"), options.clone()).await;
        assert_eq!(state.plan[0].tool_name.as_deref(), Some("search"));

        let mut state = GlobalState::new("q");
        state.memory.insert(PREFERRED_TOOL.into(), Value::from("fetch"));
        let state = plan(state, options).await;
        assert_eq!(state.plan[0].tool_name.as_deref(), Some("fetch"));
    }

    #[tokio::test]
    async fn test_rewrite_archives_attempted_steps_and_clears_flags() {
        let mut state = plan(GlobalState::new("q"), AgentOptions::new()).await;
        let failed_id = state.plan[0].id.clone();
        state.plan[0].begin_attempt();
        state.plan[0].mark_failed("boom");
        state.flags.escalate(&failed_id);

        let state = plan(state, AgentOptions::new()).await;
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.history()[0].id, failed_id);
        assert_eq!(state.history()[0].status, StepStatus::Failed);
        assert!(state.plan.iter().all(|s| s.status == StepStatus::Pending));
        assert!(state.flags.need_human_for_step().is_none());
        assert!(!state.flags.plan_rewrite_needed());
    }
}
