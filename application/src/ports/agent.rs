//! Agent port
//!
//! Every agent is a named unit with one operation: take the session state,
//! mutate it, and hand it back. The state moves into [`Agent::run`] and out
//! again, so only one agent can hold it at a time and nothing keeps a hidden
//! reference to it.
//!
//! Agents must not touch anything but the state they are given. A variant
//! that delegates to a non-deterministic collaborator (a tool, a model)
//! says so through [`Agent::delegates`].

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use stepwise_domain::GlobalState;

pub const PERCEPTION: &str = "perception";
pub const PLANNER: &str = "planner";
pub const EXECUTOR: &str = "executor";
pub const ANSWER: &str = "answer";
pub const MEMORY: &str = "memory";
pub const CRITIC: &str = "critic";

/// Opaque, variant-specific options passed to [`Agent::run`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentOptions(BTreeMap<String, Value>);

impl AgentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

/// Port for session agents.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Registry key; plan steps name their agent with it.
    fn name(&self) -> &str;

    /// Whether `run` delegates to a non-deterministic collaborator.
    fn delegates(&self) -> bool {
        false
    }

    /// Read and update the session state.
    async fn run(&self, state: GlobalState, options: &AgentOptions) -> GlobalState;
}
