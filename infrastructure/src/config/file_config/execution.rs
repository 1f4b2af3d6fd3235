use super::ConfigIssue;
use serde::{Deserialize, Serialize};
use stepwise_application::ExecutionParams;

/// Raw `[execution]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    /// Step attempts allowed per session
    pub max_iterations: usize,
    /// Plan rewrites allowed per session
    pub max_plan_rewrites: usize,
}

impl Default for FileExecutionConfig {
    fn default() -> Self {
        let params = ExecutionParams::default();
        Self {
            max_iterations: params.max_iterations,
            max_plan_rewrites: params.max_plan_rewrites,
        }
    }
}

impl FileExecutionConfig {
    pub fn to_execution_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_max_iterations(self.max_iterations)
            .with_max_plan_rewrites(self.max_plan_rewrites)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.max_iterations == 0 {
            issues.push(ConfigIssue::new(
                "execution.max_iterations",
                "0 fails every session before its first step",
            ));
        }
        issues
    }
}
