//! Execution parameters: coordinator loop control.
//!
//! [`ExecutionParams`] groups the static parameters that bound the session
//! loop in [`RunSessionUseCase`](crate::use_cases::run_session::RunSessionUseCase).
//! These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};

/// Session loop control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Maximum number of step attempts across the whole session.
    pub max_iterations: usize,
    /// Maximum number of plan rewrites before the session fails.
    pub max_plan_rewrites: usize,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            max_plan_rewrites: 2,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_max_plan_rewrites(mut self, max: usize) -> Self {
        self.max_plan_rewrites = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = ExecutionParams::default();
        assert_eq!(params.max_iterations, 50);
        assert_eq!(params.max_plan_rewrites, 2);
    }

    #[test]
    fn test_builder() {
        let params = ExecutionParams::default()
            .with_max_iterations(10)
            .with_max_plan_rewrites(0);

        assert_eq!(params.max_iterations, 10);
        assert_eq!(params.max_plan_rewrites, 0);
    }
}
