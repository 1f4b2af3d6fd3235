//! Session domain module
//!
//! Contains the session state model shared by all agents: the plan and its
//! steps, tool call statistics, control flags, constraints, and the step
//! review rule that turns a step outcome into retry or escalation flags.

pub mod constraints;
pub mod entities;
pub mod flags;
pub mod intervention;
pub mod review;
pub mod tool_stats;
pub mod value_objects;

pub use constraints::Constraints;
pub use entities::{GlobalState, Memory, PlanStep};
pub use flags::{ControlAction, Flags};
pub use intervention::{HilMode, HumanDecision};
pub use review::{EscalationScope, ReviewPolicy, StepVerdict, review_step};
pub use tool_stats::{ToolCallRecord, ToolStats};
pub use value_objects::{SessionStatus, StepId, StepStatus};
