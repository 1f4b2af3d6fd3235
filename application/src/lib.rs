//! Application layer for stepwise
//!
//! This crate contains the agents, port definitions, application
//! configuration and the session coordinator. It depends only on the
//! domain layer.

pub mod agents;
pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use agents::{
    AgentRegistry, AnswerAgent, CriticAgent, ExecutorAgent, MemoryAgent, PerceptionAgent,
    PlannerAgent,
};
pub use config::{ExecutionParams, SessionConfig};
pub use ports::{
    agent::{Agent, AgentOptions},
    human_intervention::{
        AutoAbortIntervention, AutoReplanIntervention, AutoSkipIntervention,
        HumanInterventionError, HumanInterventionPort, automatic_intervention,
    },
    progress::{NoSessionProgress, SessionProgressNotifier},
    session_logger::{NoSessionLogger, SessionEvent, SessionEventLogger},
    tool_executor::{ToolError, ToolExecutorPort},
};
pub use use_cases::run_session::{
    RunSessionError, RunSessionInput, RunSessionOutput, RunSessionUseCase,
};
