//! Tool Executor port
//!
//! Defines the interface for invoking tools. How a tool actually runs is up
//! to the adapter; the application layer only needs the output or an error.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors a tool invocation can end with
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid input for {tool}: {message}")]
    InvalidInput { tool: String, message: String },

    #[error("Tool {tool} failed: {message}")]
    Failed { tool: String, message: String },
}

/// Port for tool execution
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Names of all available tools
    fn available_tools(&self) -> Vec<&str>;

    /// Check if a tool is available
    fn has_tool(&self, name: &str) -> bool {
        self.available_tools().contains(&name)
    }

    /// Invoke a tool with the given input
    async fn execute(&self, tool_name: &str, input: &Value) -> Result<Value, ToolError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedTools;

    #[async_trait]
    impl ToolExecutorPort for FixedTools {
        fn available_tools(&self) -> Vec<&str> {
            vec!["echo"]
        }

        async fn execute(&self, tool_name: &str, input: &Value) -> Result<Value, ToolError> {
            if tool_name == "echo" {
                Ok(input.clone())
            } else {
                Err(ToolError::NotFound(tool_name.to_string()))
            }
        }
    }

    #[test]
    fn test_has_tool_default() {
        assert!(FixedTools.has_tool("echo"));
        assert!(!FixedTools.has_tool("search"));
    }

    #[test]
    fn test_tool_error_display() {
        let err = ToolError::Failed {
            tool: "search".to_string(),
            message: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "Tool search failed: rate limited");
        assert_eq!(ToolError::NotFound("x".into()).to_string(), "Tool not found: x");
    }
}
