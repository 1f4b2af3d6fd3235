//! CLI entrypoint for stepwise
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use stepwise_application::{
    AgentOptions, AgentRegistry, HumanInterventionPort, NoSessionLogger, NoSessionProgress,
    RunSessionError, RunSessionUseCase, SessionEventLogger, SessionProgressNotifier,
    ToolExecutorPort, automatic_intervention,
};
use stepwise_application::ports::agent::PLANNER;
use stepwise_infrastructure::{BuiltinToolExecutor, ConfigLoader, JsonlSessionLogger};
use stepwise_presentation::{
    Cli, ConsoleFormatter, InteractiveHumanIntervention, OutputFormat, SessionProgressReporter,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    let Some(query) = cli.query.clone().filter(|q| !q.trim().is_empty()) else {
        bail!("A query is required.");
    };

    // === Configuration ===
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    for issue in file_config.validate() {
        warn!("Config: {}", issue);
    }
    let session_config = cli.apply_to(file_config.to_session_config());

    info!("Starting stepwise session");

    // === Dependency Injection ===
    let tools = Arc::new(BuiltinToolExecutor::new());
    if let Some(tool) = &cli.tool
        && !tools.available_tools().contains(&tool.as_str())
    {
        warn!("Unknown tool '{}', lookups will fail", tool);
    }
    let registry = AgentRegistry::with_builtin_agents(tools, session_config.policy().clone());

    let intervention: Arc<dyn HumanInterventionPort> =
        match automatic_intervention(session_config.hil_mode()) {
            Some(handler) => handler,
            None => Arc::new(InteractiveHumanIntervention::new()),
        };

    let event_log = cli.event_log.clone().or(file_config.logging.event_log.clone());
    let logger: Arc<dyn SessionEventLogger> = match event_log {
        Some(path) => Arc::new(
            JsonlSessionLogger::open(&path)
                .with_context(|| format!("Failed to open event log {}", path.display()))?,
        ),
        None => Arc::new(NoSessionLogger),
    };

    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_token.cancel();
        }
    });

    let mut use_case = RunSessionUseCase::new(registry)
        .with_human_intervention(intervention)
        .with_session_logger(logger)
        .with_execution_params(session_config.execution().clone())
        .with_cancellation(token);
    if let Some(tool) = &cli.tool {
        use_case = use_case.with_agent_options(
            PLANNER,
            AgentOptions::new().with("default_tool", tool.as_str()),
        );
    }

    // Execute with or without progress reporting
    let progress: Box<dyn SessionProgressNotifier> = if cli.quiet {
        Box::new(NoSessionProgress)
    } else if cli.verbose > 0 {
        Box::new(SessionProgressReporter::verbose())
    } else {
        Box::new(SessionProgressReporter::new())
    };
    let output = match use_case
        .execute_with_progress(session_config.to_session_input(query), progress.as_ref())
        .await
    {
        Ok(output) => output,
        Err(RunSessionError::Cancelled) => {
            eprintln!("Session cancelled.");
            // An interactive prompt may still be blocked on stdin, and the
            // runtime would wait for it on shutdown.
            std::process::exit(130);
        }
        Err(e) => return Err(e.into()),
    };

    // Output results
    let rendered = match cli.output {
        OutputFormat::Summary => ConsoleFormatter::format_summary(&output),
        OutputFormat::Json => ConsoleFormatter::format_json(&output),
    };
    println!("{}", rendered);

    if output.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
