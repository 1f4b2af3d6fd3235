//! Built-in agents.
//!
//! | Agent | Role |
//! |-------|------|
//! | [`PerceptionAgent`] | Entities, objective, default constraints |
//! | [`PlannerAgent`] | Plan (and plan rewrites) |
//! | [`ExecutorAgent`] | Runs a step's tool |
//! | [`AnswerAgent`] | Composes the final answer |
//! | [`CriticAgent`] | Reviews the current step, sets control flags |
//! | [`MemoryAgent`] | Preferred tool hint |

pub mod answer;
pub mod critic;
pub mod executor;
pub mod memory;
pub mod perception;
pub mod planner;
pub mod registry;

pub use answer::AnswerAgent;
pub use critic::CriticAgent;
pub use executor::ExecutorAgent;
pub use memory::{MemoryAgent, PREFERRED_TOOL};
pub use perception::PerceptionAgent;
pub use planner::PlannerAgent;
pub use registry::AgentRegistry;
