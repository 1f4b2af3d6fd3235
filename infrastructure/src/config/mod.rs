//! Configuration file loading for stepwise
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. `STEPWISE_<SECTION>__<KEY>` environment variables
//! 3. Project root: `./stepwise.toml` or `./.stepwise.toml`
//! 4. Global: `$XDG_CONFIG_HOME/stepwise/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, FileConfig, FileExecutionConfig, FileLoggingConfig, FileSessionConfig,
};
pub use loader::ConfigLoader;
