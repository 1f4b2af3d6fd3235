//! Agent registry: name to agent lookup for the coordinator.

use super::{AnswerAgent, CriticAgent, ExecutorAgent, MemoryAgent, PerceptionAgent, PlannerAgent};
use crate::ports::agent::Agent;
use crate::ports::tool_executor::ToolExecutorPort;
use std::collections::HashMap;
use std::sync::Arc;
use stepwise_domain::ReviewPolicy;

#[derive(Clone, Default)]
pub struct AgentRegistry {
    agents: HashMap<String, Arc<dyn Agent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in agent.
    pub fn with_builtin_agents(tools: Arc<dyn ToolExecutorPort>, policy: ReviewPolicy) -> Self {
        Self::new()
            .with(Arc::new(PerceptionAgent::new()))
            .with(Arc::new(PlannerAgent::default()))
            .with(Arc::new(ExecutorAgent::new(tools)))
            .with(Arc::new(AnswerAgent::new()))
            .with(Arc::new(CriticAgent::new(policy)))
            .with(Arc::new(MemoryAgent::new()))
    }

    /// Register an agent under its own name, replacing any previous one.
    pub fn register(&mut self, agent: Arc<dyn Agent>) {
        self.agents.insert(agent.name().to_string(), agent);
    }

    pub fn with(mut self, agent: Arc<dyn Agent>) -> Self {
        self.register(agent);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Agent>> {
        self.agents.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.agents.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.agents.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRegistry")
            .field("agents", &self.names())
            .finish()
    }
}
