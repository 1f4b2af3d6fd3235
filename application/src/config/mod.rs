//! Application-level configuration.
//!
//! - [`ExecutionParams`]: session loop limits (iterations, plan rewrites)
//! - [`SessionConfig`]: review policy, HiL mode, loop limits, seeded constraints

pub mod execution_params;
pub mod session_config;

pub use execution_params::ExecutionParams;
pub use session_config::SessionConfig;
