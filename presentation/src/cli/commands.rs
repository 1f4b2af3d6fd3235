//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use stepwise_application::SessionConfig;
use stepwise_domain::{EscalationScope, HilMode};

/// Output format for session results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Status, answer, steps and tool statistics
    Summary,
    /// The full final state as JSON
    Json,
}

/// How escalated steps are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HilArg {
    /// Ask on the terminal
    Interactive,
    /// Fail the session
    Abort,
    /// Skip the step
    Skip,
    /// Plan again
    Replan,
}

impl From<HilArg> for HilMode {
    fn from(arg: HilArg) -> Self {
        match arg {
            HilArg::Interactive => HilMode::Interactive,
            HilArg::Abort => HilMode::Abort,
            HilArg::Skip => HilMode::Skip,
            HilArg::Replan => HilMode::Replan,
        }
    }
}

/// Lifetime of a pending escalation
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScopeArg {
    /// Cleared once another step is reviewed
    Step,
    /// Kept until resolved
    Session,
}

impl From<ScopeArg> for EscalationScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Step => EscalationScope::Step,
            ScopeArg::Session => EscalationScope::Session,
        }
    }
}

/// CLI arguments for stepwise
#[derive(Parser, Debug)]
#[command(name = "stepwise")]
#[command(author, version, about = "Step-by-step agent sessions with retry and escalation")]
#[command(long_about = r#"
Stepwise answers a query by running a plan of steps through a set of agents.

After every step a critic reviews the outcome:
1. Success: move on to the next step
2. Failure below the retry limit: run the step again
3. Failure at the retry limit: escalate to a human (or the --hil policy)

Configuration files are loaded from (in priority order):
1. --config <path>        Explicit config file
2. STEPWISE_<SECTION>__<KEY> environment variables
3. ./stepwise.toml        Project-level config
4. ~/.config/stepwise/config.toml   Global config

Example:
  stepwise "rust vs go"
  stepwise --tool uppercase --hil skip "what is a monad"
  stepwise --output json --event-log session.jsonl "tokio vs async-std"
"#)]
pub struct Cli {
    /// The query to run (not required with --show-config)
    pub query: Option<String>,

    /// Failed attempts before a step is escalated
    #[arg(long, value_name = "N")]
    pub max_retries: Option<u64>,

    /// Upper bound on planned steps
    #[arg(long, value_name = "N")]
    pub max_steps: Option<u64>,

    /// Step attempts allowed in the whole session
    #[arg(long, value_name = "N")]
    pub max_iterations: Option<usize>,

    /// Plan rewrites allowed in the whole session
    #[arg(long, value_name = "N")]
    pub max_plan_rewrites: Option<usize>,

    /// How escalated steps are resolved
    #[arg(long, value_enum)]
    pub hil: Option<HilArg>,

    /// Lifetime of a pending escalation
    #[arg(long, value_enum)]
    pub escalation_scope: Option<ScopeArg>,

    /// Tool the planner assigns to lookup steps
    #[arg(long, value_name = "TOOL")]
    pub tool: Option<String>,

    /// Append session events as JSON lines to this file
    #[arg(long, value_name = "PATH")]
    pub event_log: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_to(&self, mut config: SessionConfig) -> SessionConfig {
        if let Some(max) = self.max_retries {
            config = config.with_max_retries(max);
        }
        if let Some(max) = self.max_steps {
            config = config.with_max_steps(max);
        }
        if let Some(hil) = self.hil {
            config = config.with_hil_mode(hil.into());
        }
        if let Some(scope) = self.escalation_scope {
            config = config.with_escalation_scope(scope.into());
        }

        let mut execution = config.execution().clone();
        if let Some(max) = self.max_iterations {
            execution = execution.with_max_iterations(max);
        }
        if let Some(max) = self.max_plan_rewrites {
            execution = execution.with_max_plan_rewrites(max);
        }
        config.with_execution(execution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::parse_from(["stepwise", "rust vs go"]);
        assert_eq!(cli.query.as_deref(), Some("rust vs go"));
        assert_eq!(cli.output, OutputFormat::Summary);
        assert_eq!(cli.verbose, 0);
        assert!(cli.hil.is_none());
    }

    #[test]
    fn test_parse_all_overrides() {
        let cli = Cli::parse_from([
            "stepwise",
            "--max-retries",
            "5",
            "--max-steps",
            "4",
            "--max-iterations",
            "10",
            "--hil",
            "skip",
            "--escalation-scope",
            "session",
            "--output",
            "json",
            "-vv",
            "q",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, OutputFormat::Json);

        let config = cli.apply_to(SessionConfig::default());
        assert_eq!(config.max_retries(), Some(5));
        assert_eq!(config.max_steps(), Some(4));
        assert_eq!(config.hil_mode(), HilMode::Skip);
        assert_eq!(config.policy().escalation_scope, EscalationScope::Session);
        assert_eq!(config.execution().max_iterations, 10);
        assert_eq!(config.execution().max_plan_rewrites, 2);
    }

    #[test]
    fn test_no_flags_keep_loaded_config() {
        let cli = Cli::parse_from(["stepwise", "q"]);
        let loaded = SessionConfig::default()
            .with_max_retries(7)
            .with_hil_mode(HilMode::Replan);

        let config = cli.apply_to(loaded);
        assert_eq!(config.max_retries(), Some(7));
        assert_eq!(config.hil_mode(), HilMode::Replan);
    }

    #[test]
    fn test_show_config_without_query() {
        let cli = Cli::parse_from(["stepwise", "--show-config"]);
        assert!(cli.show_config);
        assert!(cli.query.is_none());
    }
}
