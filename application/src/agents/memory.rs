//! Memory agent: keeps the preferred tool hint up to date.
//!
//! Picks the tool with the best success rate among tools with at least
//! [`MIN_CALLS`] recorded calls and stores it in `memory["preferred_tool"]`
//! (null when no tool qualifies). Ties go to the tool recorded first.
//! Nothing else in the state is touched.

use crate::ports::agent::{Agent, AgentOptions, MEMORY};
use async_trait::async_trait;
use serde_json::Value;
use stepwise_domain::GlobalState;

pub const PREFERRED_TOOL: &str = "preferred_tool";

/// Calls a tool needs before its success rate is trusted
pub const MIN_CALLS: u64 = 3;

#[derive(Debug, Default)]
pub struct MemoryAgent;

impl MemoryAgent {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Agent for MemoryAgent {
    fn name(&self) -> &str {
        MEMORY
    }

    async fn run(&self, mut state: GlobalState, _options: &AgentOptions) -> GlobalState {
        let mut best: Option<(&str, f64)> = None;
        for (tool_name, stats) in state.tool_stats() {
            if stats.calls() < MIN_CALLS {
                continue;
            }
            let score = stats.success_rate();
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((tool_name.as_str(), score));
            }
        }

        let preferred = best
            .map(|(name, _)| Value::String(name.to_string()))
            .unwrap_or(Value::Null);
        state.memory.insert(PREFERRED_TOOL.to_string(), preferred);
        state
    }
}
