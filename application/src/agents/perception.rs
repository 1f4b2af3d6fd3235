//! Perception agent: turns the raw query into structured fields.
//!
//! The extraction is a placeholder heuristic: a query of the form
//! `"a vs b"` yields the entities `["a", "b"]`, anything else yields none.
//! Fields the caller already set are left alone.

use crate::ports::agent::{Agent, AgentOptions, PERCEPTION};
use async_trait::async_trait;
use stepwise_domain::{DEFAULT_MAX_RETRIES, DEFAULT_MAX_STEPS, GlobalState, MAX_RETRIES, MAX_STEPS};
use tracing::debug;

const ENTITY_SEPARATOR: &str = " vs ";

#[derive(Debug, Default)]
pub struct PerceptionAgent;

impl PerceptionAgent {
    pub fn new() -> Self {
        Self
    }

    fn extract_entities(query: &str) -> Vec<String> {
        let query = query.to_lowercase();
        if !query.contains(ENTITY_SEPARATOR) {
            return Vec::new();
        }
        query
            .split(ENTITY_SEPARATOR)
            .map(str::trim)
            // An empty fragment would plan a lookup of nothing
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[async_trait]
impl Agent for PerceptionAgent {
    fn name(&self) -> &str {
        PERCEPTION
    }

    async fn run(&self, mut state: GlobalState, _options: &AgentOptions) -> GlobalState {
        if state.entities.is_empty() {
            state.entities = Self::extract_entities(state.query());
        }
        if state.objective.as_deref().is_none_or(str::is_empty) {
            state.objective = Some(format!("Answer the user's query: {}", state.query()));
        }
        state.constraints.set_default(MAX_STEPS, DEFAULT_MAX_STEPS);
        state.constraints.set_default(MAX_RETRIES, DEFAULT_MAX_RETRIES);

        debug!(entities = ?state.entities, "Perceived query");
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwise_domain::Constraints;

    async fn perceive(state: GlobalState) -> GlobalState {
        PerceptionAgent::new().run(state, &AgentOptions::new()).await
    }

    #[tokio::test]
    async fn test_versus_query_yields_entities() {
        let state = perceive(GlobalState::new("Rust vs Go vs  Zig ")).await;
        assert_eq!(state.entities, vec!["rust", "go", "zig"]);
        assert_eq!(
            state.objective.as_deref(),
            Some("Answer the user's query: Rust vs Go vs  Zig ")
        );
    }

    #[tokio::test]
    async fn test_empty_fragments_are_dropped() {
        let state = perceive(GlobalState::new("a vs  vs b")).await;
        assert_eq!(state.entities, vec!["a", "b"]);

        let state = perceive(GlobalState::new(" vs b")).await;
        assert_eq!(state.entities, vec!["b"]);
    }

    #[tokio::test]
    async fn test_plain_query_has_no_entities() {
        let state = perceive(GlobalState::new("what is a monad")).await;
        assert!(state.entities.is_empty());
    }

    #[tokio::test]
    async fn test_seeds_default_constraints() {
        let state = perceive(GlobalState::new("q")).await;
        assert_eq!(state.constraints.max_steps(), 3);
        assert_eq!(state.constraints.max_retries(), 3);
        assert!(state.constraints.contains(MAX_STEPS));
        assert!(state.constraints.contains(MAX_RETRIES));
    }

    #[tokio::test]
    async fn test_never_overrides_caller_values() {
        let mut state = GlobalState::new("a vs b")
            .with_constraints(Constraints::new().with(MAX_RETRIES, 7).with(MAX_STEPS, "oops"));
        state.objective = Some("Compare a and b".to_string());
        state.entities = vec!["alpha".to_string()];

        let state = perceive(state).await;
        assert_eq!(state.objective.as_deref(), Some("Compare a and b"));
        assert_eq!(state.entities, vec!["alpha"]);
        assert_eq!(state.constraints.max_retries(), 7);
        assert_eq!(state.constraints.get(MAX_STEPS), Some(&"oops".into()));
    }

    #[tokio::test]
    async fn test_empty_query_does_not_fail() {
        let state = perceive(GlobalState::new("")).await;
        assert!(state.entities.is_empty());
        assert!(state.objective.is_some());
    }
}
