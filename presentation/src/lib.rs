//! Presentation layer for stepwise
//!
//! This crate contains CLI definitions, output formatters, the progress
//! reporter and the interactive escalation prompt.

pub mod agent;
pub mod cli;
pub mod output;

// Re-export commonly used types
pub use agent::{InteractiveHumanIntervention, SessionProgressReporter};
pub use cli::commands::{Cli, HilArg, OutputFormat, ScopeArg};
pub use output::console::ConsoleFormatter;
