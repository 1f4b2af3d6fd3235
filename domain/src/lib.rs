//! Domain layer for stepwise
//!
//! This crate contains the session state model and the step review rules.
//! It has no dependencies on infrastructure or presentation concerns, and
//! performs no I/O.
//!
//! # Core Concepts
//!
//! ## Session
//!
//! A session is one run from an initial query to a terminal status. All of
//! its data lives in a single [`GlobalState`] that agents receive, mutate and
//! hand back one at a time.
//!
//! ## Step review
//!
//! After a step executes, [`review_step`] decides whether it is retried,
//! escalated to a human, or needs no intervention, and records that decision
//! in the control [`Flags`].

pub mod core;
pub mod session;
pub mod util;

// Re-export commonly used types
pub use core::error::DomainError;
pub use session::{
    ControlAction, Constraints, EscalationScope, Flags, GlobalState, HilMode, HumanDecision,
    Memory, PlanStep, ReviewPolicy, SessionStatus, StepId, StepStatus, StepVerdict,
    ToolCallRecord, ToolStats,
    constraints::{DEFAULT_MAX_RETRIES, DEFAULT_MAX_STEPS, MAX_RETRIES, MAX_STEPS},
    review_step,
};
