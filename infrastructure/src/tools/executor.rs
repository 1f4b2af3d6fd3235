//! Built-in tool executor: the concrete implementation of [`ToolExecutorPort`].

use super::builtin::{ToolFn, builtin_tools};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use stepwise_application::{ToolError, ToolExecutorPort};
use tracing::debug;

/// Executor backed by in-process tool functions.
///
/// | Constructor | Tools |
/// |-------------|-------|
/// | [`new()`](Self::new) | `echo`, `word_count`, `uppercase` |
/// | [`only()`](Self::only) | The named subset of the built-ins |
#[derive(Debug, Clone)]
pub struct BuiltinToolExecutor {
    tools: BTreeMap<&'static str, ToolFn>,
}

impl Default for BuiltinToolExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl BuiltinToolExecutor {
    pub fn new() -> Self {
        Self {
            tools: builtin_tools().into_iter().collect(),
        }
    }

    /// Keep only the named built-ins; unknown names are ignored.
    pub fn only(names: &[&str]) -> Self {
        Self {
            tools: builtin_tools()
                .into_iter()
                .filter(|(name, _)| names.contains(name))
                .collect(),
        }
    }
}

#[async_trait]
impl ToolExecutorPort for BuiltinToolExecutor {
    fn available_tools(&self) -> Vec<&str> {
        self.tools.keys().copied().collect()
    }

    async fn execute(&self, tool_name: &str, input: &Value) -> Result<Value, ToolError> {
        let tool = self
            .tools
            .get(tool_name)
            .ok_or_else(|| ToolError::NotFound(tool_name.to_string()))?;
        debug!("Executing builtin tool {}", tool_name);
        tool(tool_name, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_execute_known_tool() {
        let executor = BuiltinToolExecutor::new();
        let output = executor.execute("uppercase", &json!("rust")).await.unwrap();
        assert_eq!(output, json!("RUST"));
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let executor = BuiltinToolExecutor::new();
        let err = executor.execute("search", &json!("rust")).await.unwrap_err();
        assert_eq!(err, ToolError::NotFound("search".to_string()));
    }

    #[test]
    fn test_available_tools() {
        assert_eq!(
            BuiltinToolExecutor::new().available_tools(),
            vec!["echo", "uppercase", "word_count"]
        );

        let restricted = BuiltinToolExecutor::only(&["echo", "nope"]);
        assert!(restricted.has_tool("echo"));
        assert!(!restricted.has_tool("uppercase"));
    }
}
