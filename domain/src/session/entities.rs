//! Session domain entities

use super::constraints::Constraints;
use super::flags::Flags;
use super::tool_stats::{ToolCallRecord, ToolStats};
use super::value_objects::{SessionStatus, StepId, StepStatus};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Free-form memory shared between agents.
pub type Memory = BTreeMap<String, Value>;

/// A single unit of planned work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    /// Unique identifier for this step
    pub id: StepId,
    /// Human-readable description of what this step does
    pub description: String,
    /// Name of the agent that executes this step
    pub agent: String,
    /// The tool to use (if any)
    pub tool_name: Option<String>,
    /// Input handed to the tool
    pub input: Option<Value>,
    /// Output produced by the last attempt
    pub output: Option<Value>,
    /// Current status
    pub status: StepStatus,
    /// Error message from the last failed attempt
    pub error: Option<String>,
    /// Number of execution attempts so far
    pub attempts: u32,
}

impl PlanStep {
    /// Creates a pending step with a freshly generated id.
    pub fn new(description: impl Into<String>, agent: impl Into<String>) -> Self {
        Self {
            id: StepId::generate(),
            description: description.into(),
            agent: agent.into(),
            tool_name: None,
            input: None,
            output: None,
            status: StepStatus::Pending,
            error: None,
            attempts: 0,
        }
    }

    pub fn with_id(mut self, id: impl Into<StepId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_tool(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }

    pub fn with_input(mut self, input: impl Into<Value>) -> Self {
        self.input = Some(input.into());
        self
    }

    /// Count one more execution attempt.
    pub fn begin_attempt(&mut self) {
        self.attempts += 1;
    }

    pub fn reset_attempts(&mut self) {
        self.attempts = 0;
    }

    pub fn mark_running(&mut self) {
        self.status = StepStatus::Running;
    }

    pub fn mark_success(&mut self, output: impl Into<Value>) {
        self.status = StepStatus::Success;
        self.output = Some(output.into());
        self.error = None;
    }

    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.status = StepStatus::Failed;
        self.error = Some(error.into());
    }

    pub fn mark_skipped(&mut self) {
        self.status = StepStatus::Skipped;
    }
}

/// Session-wide record shared by every agent (Entity).
///
/// Exactly one agent holds the state at a time: agents receive it by value
/// and hand it back. The query is fixed at creation; the tool log, tool
/// statistics and history are append-only and only change through
/// [`record_tool_call`](Self::record_tool_call),
/// [`advance`](Self::advance) and [`replace_plan`](Self::replace_plan).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalState {
    query: String,
    /// Derived objective for the session
    pub objective: Option<String>,
    /// Entity strings extracted from the query
    pub entities: Vec<String>,
    /// Open constraints map (`max_steps`, `max_retries`, ...)
    pub constraints: Constraints,
    /// Ordered plan
    pub plan: Vec<PlanStep>,
    /// Cursor into `plan`
    pub current_step_index: usize,
    pub session_status: SessionStatus,
    pub memory: Memory,
    history: Vec<PlanStep>,
    /// Per-tool statistics in first-recorded order
    tool_stats: IndexMap<String, ToolStats>,
    tool_log: Vec<ToolCallRecord>,
    /// Inter-agent signaling channel
    pub flags: Flags,
    pub final_answer: Option<String>,
}

impl GlobalState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            objective: None,
            entities: Vec::new(),
            constraints: Constraints::new(),
            plan: Vec::new(),
            current_step_index: 0,
            session_status: SessionStatus::Running,
            memory: Memory::new(),
            history: Vec::new(),
            tool_stats: IndexMap::new(),
            tool_log: Vec::new(),
            flags: Flags::new(),
            final_answer: None,
        }
    }

    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_plan(mut self, plan: Vec<PlanStep>) -> Self {
        self.plan = plan;
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    // ==================== Plan cursor ====================

    /// The step under the cursor, or `None` once the cursor is past the end.
    pub fn current_step(&self) -> Option<&PlanStep> {
        self.plan.get(self.current_step_index)
    }

    pub fn current_step_mut(&mut self) -> Option<&mut PlanStep> {
        self.plan.get_mut(self.current_step_index)
    }

    /// Archive the current step into the history and move the cursor on.
    ///
    /// Returns `false` (and does nothing) when there is no current step.
    pub fn advance(&mut self) -> bool {
        let Some(step) = self.current_step().cloned() else {
            return false;
        };
        self.history.push(step);
        self.current_step_index += 1;
        true
    }

    /// Swap in a new plan and reset the cursor.
    ///
    /// Steps of the old plan that were not archived yet but have already
    /// been touched (anything but `pending`) are archived first, so no
    /// executed step disappears from the audit trail.
    pub fn replace_plan(&mut self, plan: Vec<PlanStep>) {
        let start = self.current_step_index.min(self.plan.len());
        let touched: Vec<PlanStep> = self.plan[start..]
            .iter()
            .filter(|step| step.status != StepStatus::Pending)
            .cloned()
            .collect();
        self.history.extend(touched);
        self.plan = plan;
        self.current_step_index = 0;
    }

    /// Archive the step under the cursor without moving the cursor.
    ///
    /// Used when the session ends on a step that was never advanced past.
    /// Pending steps and steps already in the history are left alone.
    pub fn archive_current_step(&mut self) -> bool {
        let Some(step) = self.current_step() else {
            return false;
        };
        if step.status == StepStatus::Pending || self.history.last() == Some(step) {
            return false;
        }
        let step = step.clone();
        self.history.push(step);
        true
    }

    pub fn history(&self) -> &[PlanStep] {
        &self.history
    }

    /// Completion progress of the current plan (terminal / total)
    pub fn progress(&self) -> (usize, usize) {
        let done = self.plan.iter().filter(|s| s.status.is_terminal()).count();
        (done, self.plan.len())
    }

    // ==================== Tool records ====================

    /// Intake for tool call outcomes: appends to the log and folds the
    /// record into the per-tool statistics in one step.
    pub fn record_tool_call(&mut self, record: ToolCallRecord) {
        self.tool_stats
            .entry(record.tool_name().to_string())
            .or_default()
            .record(&record);
        self.tool_log.push(record);
    }

    pub fn tool_stats(&self) -> &IndexMap<String, ToolStats> {
        &self.tool_stats
    }

    pub fn tool_stats_for(&self, tool_name: &str) -> Option<&ToolStats> {
        self.tool_stats.get(tool_name)
    }

    pub fn tool_log(&self) -> &[ToolCallRecord] {
        &self.tool_log
    }

    // ==================== Termination ====================

    /// Finish the session, optionally with an answer.
    ///
    /// Returns `false` if the session had already terminated.
    pub fn mark_done(&mut self, answer: Option<String>) -> bool {
        if self.session_status.is_terminal() {
            return false;
        }
        self.session_status = SessionStatus::Done;
        if answer.is_some() {
            self.final_answer = answer;
        }
        true
    }

    /// Fail the session; the reason lands in `flags["failure_reason"]`.
    ///
    /// Returns `false` if the session had already terminated.
    pub fn mark_failed(&mut self, reason: Option<String>) -> bool {
        if self.session_status.is_terminal() {
            return false;
        }
        self.session_status = SessionStatus::Failed;
        if let Some(reason) = reason.filter(|r| !r.is_empty()) {
            self.flags.set_failure_reason(reason);
        }
        true
    }

    pub fn has_final_answer(&self) -> bool {
        self.final_answer.as_deref().is_some_and(|a| !a.is_empty())
    }

    pub fn is_finished(&self) -> bool {
        self.session_status.is_terminal()
    }
}
