//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that agents and infrastructure adapters must
//! implement.

pub mod agent;
pub mod human_intervention;
pub mod progress;
pub mod session_logger;
pub mod tool_executor;
