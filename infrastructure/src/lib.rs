//! Infrastructure layer for stepwise
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer:
//! - [`BuiltinToolExecutor`] for [`ToolExecutorPort`](stepwise_application::ToolExecutorPort)
//! - [`JsonlSessionLogger`] for [`SessionEventLogger`](stepwise_application::SessionEventLogger)
//!
//! plus TOML configuration loading ([`ConfigLoader`]).

pub mod config;
pub mod logging;
pub mod tools;

pub use config::{
    ConfigIssue, ConfigLoader, FileConfig, FileExecutionConfig, FileLoggingConfig,
    FileSessionConfig,
};
pub use logging::JsonlSessionLogger;
pub use tools::BuiltinToolExecutor;
