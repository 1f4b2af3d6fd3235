//! Run Session use case
//!
//! Drives one session from the query to a terminal status:
//! 1. Perception - entities, objective, default constraints
//! 2. Planning - initial plan
//! 3. Step loop - run the step's agent, then the critic and the memory agent,
//!    then act on the control flags:
//!    - Escalation - ask the human intervention port
//!    - Plan rewrite - run the planner again (bounded)
//!    - Retry - run the same step again
//!    - Advance - archive the step and move the cursor on
//!
//! The state is threaded through every agent by value, so exactly one agent
//! works on it at a time. Cancellation is checked before every step and
//! while waiting on the human intervention port.

use crate::agents::AgentRegistry;
use crate::config::ExecutionParams;
use crate::ports::agent::{Agent, AgentOptions, CRITIC, MEMORY, PERCEPTION, PLANNER};
use crate::ports::human_intervention::{
    AutoAbortIntervention, HumanInterventionError, HumanInterventionPort,
};
use crate::ports::progress::{NoSessionProgress, SessionProgressNotifier};
use crate::ports::session_logger::{NoSessionLogger, SessionEvent, SessionEventLogger};
use crate::use_cases::shared::check_cancelled;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use stepwise_domain::{
    Constraints, ControlAction, GlobalState, HumanDecision, SessionStatus, StepId, StepStatus,
};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that abort a session run before it reaches a terminal status.
///
/// Everything else (failing steps, exhausted limits, an operator abort)
/// ends the session as data: `session_status == failed`.
#[derive(Error, Debug)]
pub enum RunSessionError {
    #[error("Required agent not registered: {0}")]
    MissingAgent(String),

    #[error("Human intervention failed: {0}")]
    Intervention(HumanInterventionError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl From<HumanInterventionError> for RunSessionError {
    fn from(e: HumanInterventionError) -> Self {
        match e {
            HumanInterventionError::Cancelled => RunSessionError::Cancelled,
            other => RunSessionError::Intervention(other),
        }
    }
}

/// Input for the RunSession use case
#[derive(Debug, Clone)]
pub struct RunSessionInput {
    /// The user's query
    pub query: String,
    /// Constraints seeded before perception runs
    pub constraints: Constraints,
}

impl RunSessionInput {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            constraints: Constraints::new(),
        }
    }

    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_constraint(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.constraints.set(key, value);
        self
    }
}

/// Output from the RunSession use case
#[derive(Debug, Clone)]
pub struct RunSessionOutput {
    /// Final session state
    pub state: GlobalState,
    /// Step attempts made
    pub iterations: usize,
    /// Plan rewrites performed
    pub plan_rewrites: usize,
}

impl RunSessionOutput {
    pub fn is_success(&self) -> bool {
        self.state.session_status == SessionStatus::Done
    }
}

/// Use case for running a session
pub struct RunSessionUseCase {
    registry: AgentRegistry,
    human_intervention: Arc<dyn HumanInterventionPort>,
    session_logger: Arc<dyn SessionEventLogger>,
    params: ExecutionParams,
    agent_options: BTreeMap<String, AgentOptions>,
    cancellation_token: Option<CancellationToken>,
}

impl RunSessionUseCase {
    /// Escalations are aborted unless an intervention handler is set.
    pub fn new(registry: AgentRegistry) -> Self {
        Self {
            registry,
            human_intervention: Arc::new(AutoAbortIntervention),
            session_logger: Arc::new(NoSessionLogger),
            params: ExecutionParams::default(),
            agent_options: BTreeMap::new(),
            cancellation_token: None,
        }
    }

    pub fn with_human_intervention(mut self, intervention: Arc<dyn HumanInterventionPort>) -> Self {
        self.human_intervention = intervention;
        self
    }

    pub fn with_session_logger(mut self, logger: Arc<dyn SessionEventLogger>) -> Self {
        self.session_logger = logger;
        self
    }

    pub fn with_execution_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self
    }

    /// Options passed to the named agent on every invocation.
    pub fn with_agent_options(mut self, agent: impl Into<String>, options: AgentOptions) -> Self {
        self.agent_options.insert(agent.into(), options);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Run a session without progress reporting
    pub async fn execute(&self, input: RunSessionInput) -> Result<RunSessionOutput, RunSessionError> {
        self.execute_with_progress(input, &NoSessionProgress).await
    }

    /// Run a session with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunSessionInput,
        progress: &dyn SessionProgressNotifier,
    ) -> Result<RunSessionOutput, RunSessionError> {
        let perception = self.require(PERCEPTION)?;
        let planner = self.require(PLANNER)?;
        let critic = self.require(CRITIC)?;
        let memory = self.require(MEMORY)?;
        check_cancelled(&self.cancellation_token)?;

        info!("Starting session for query: {}", input.query);
        self.log(
            "session_started",
            json!({ "query": input.query, "constraints": input.constraints }),
        );

        let mut state = GlobalState::new(input.query).with_constraints(input.constraints);
        state = self.invoke(&perception, state).await;
        state = self.invoke(&planner, state).await;
        self.plan_ready(&state, 0, progress);

        let mut iterations = 0;
        let mut plan_rewrites = 0;

        while !state.is_finished() {
            check_cancelled(&self.cancellation_token)?;

            if state.current_step().is_none() {
                info!("Plan exhausted");
                state.mark_done(None);
                break;
            }

            if iterations >= self.params.max_iterations {
                warn!("Iteration limit of {} exceeded", self.params.max_iterations);
                state.mark_failed(Some(format!(
                    "iteration limit of {} exceeded",
                    self.params.max_iterations
                )));
                break;
            }

            let index = state.current_step_index;
            let total = state.plan.len();
            let Some(step) = state.current_step_mut() else {
                break;
            };

            iterations += 1;
            step.begin_attempt();
            let step_id = step.id.clone();
            let agent_name = step.agent.clone();
            debug!(
                "Step {} ({}/{}), attempt {}: {}",
                step_id, index + 1, total, step.attempts, step.description
            );
            progress.on_step_start(step, index + 1, total);
            self.log(
                "step_started",
                json!({ "step_id": step_id, "agent": agent_name, "attempt": step.attempts }),
            );

            let logged_calls = state.tool_log().len();
            state = match self.registry.get(&agent_name) {
                Some(agent) => self.invoke(&agent, state).await,
                None => {
                    warn!("Step {} names unknown agent '{}'", step_id, agent_name);
                    if let Some(step) = state.current_step_mut() {
                        step.mark_failed(format!("unknown agent '{}'", agent_name));
                    }
                    state
                }
            };

            for record in state.tool_log().iter().skip(logged_calls) {
                self.log(
                    "tool_call",
                    json!({
                        "tool": record.tool_name(),
                        "success": record.is_success(),
                        "latency_ms": record.latency_ms(),
                        "error": record.error(),
                    }),
                );
            }
            if let Some(step) = state.current_step() {
                progress.on_step_complete(step);
                self.log(
                    "step_finished",
                    json!({
                        "step_id": step.id,
                        "status": step.status.as_str(),
                        "error": step.error,
                    }),
                );
            }

            state = self.invoke(&critic, state).await;
            state = self.invoke(&memory, state).await;

            let action = state.flags.next_action();
            if let Some(step) = state.current_step() {
                progress.on_review(step, &action);
            }
            self.log(
                "step_reviewed",
                json!({ "step_id": step_id, "action": action.as_str() }),
            );

            if state.is_finished() {
                break;
            }

            state = match action {
                ControlAction::Escalate(escalated) => {
                    self.resolve_escalation(state, &escalated, &planner, &mut plan_rewrites, progress)
                        .await?
                }
                ControlAction::RewritePlan => {
                    self.rewrite_plan(state, &planner, &mut plan_rewrites, progress)
                        .await
                }
                ControlAction::RetryStep => {
                    debug!("Retrying step {}", step_id);
                    state
                }
                ControlAction::Advance => {
                    state.advance();
                    state
                }
            };
        }

        state.archive_current_step();
        info!(
            status = %state.session_status,
            iterations,
            plan_rewrites,
            "Session finished"
        );
        progress.on_session_finished(&state);
        self.log(
            "session_finished",
            json!({
                "status": state.session_status.as_str(),
                "final_answer": state.final_answer,
                "failure_reason": state.flags.failure_reason(),
                "iterations": iterations,
                "plan_rewrites": plan_rewrites,
            }),
        );

        Ok(RunSessionOutput {
            state,
            iterations,
            plan_rewrites,
        })
    }

    /// Ask the intervention port about an escalated step and apply the decision.
    async fn resolve_escalation(
        &self,
        mut state: GlobalState,
        step_id: &StepId,
        planner: &Arc<dyn Agent>,
        plan_rewrites: &mut usize,
        progress: &dyn SessionProgressNotifier,
    ) -> Result<GlobalState, RunSessionError> {
        let Some(step) = state.plan.iter().find(|s| &s.id == step_id).cloned() else {
            warn!("Escalated step {} is not in the current plan, dropping", step_id);
            state.flags.clear_need_human();
            return Ok(state);
        };

        warn!(
            "Step {} escalated after {} attempts: {}",
            step.id,
            step.attempts,
            step.error.as_deref().unwrap_or("no error recorded")
        );
        progress.on_escalation(&step);
        self.log(
            "escalation",
            json!({ "step_id": step.id, "attempts": step.attempts, "error": step.error }),
        );

        let request = self.human_intervention.request_intervention(&state, &step);
        let decision = match &self.cancellation_token {
            Some(token) => tokio::select! {
                _ = token.cancelled() => {
                    warn!("Cancelled while waiting on escalation of step {}", step.id);
                    return Err(RunSessionError::Cancelled);
                }
                decision = request => decision?,
            },
            None => request.await?,
        };

        info!("Escalation of step {} resolved: {}", step.id, decision.as_str());
        progress.on_decision(&step, &decision);
        self.log(
            "human_decision",
            json!({ "step_id": step.id, "decision": decision.as_str() }),
        );

        match decision {
            HumanDecision::Retry => {
                state.flags.clear_control();
                if let Some(target) = state.plan.iter_mut().find(|s| s.id == step.id) {
                    target.reset_attempts();
                    target.status = StepStatus::Pending;
                    target.error = None;
                }
            }
            HumanDecision::Skip => {
                state.flags.clear_control();
                if let Some(target) = state.plan.iter_mut().find(|s| s.id == step.id) {
                    target.mark_skipped();
                }
                if state.current_step().is_some_and(|s| s.id == step.id) {
                    state.advance();
                }
            }
            HumanDecision::Replan => {
                state.flags.clear_need_human();
                state = self
                    .rewrite_plan(state, planner, plan_rewrites, progress)
                    .await;
            }
            HumanDecision::Abort(reason) => {
                state.mark_failed(Some(reason));
            }
        }

        Ok(state)
    }

    /// Run the planner again, or fail the session once the rewrite budget is spent.
    async fn rewrite_plan(
        &self,
        mut state: GlobalState,
        planner: &Arc<dyn Agent>,
        plan_rewrites: &mut usize,
        progress: &dyn SessionProgressNotifier,
    ) -> GlobalState {
        let limit = self.params.max_plan_rewrites;
        if *plan_rewrites >= limit {
            warn!("Plan rewrite limit of {} reached", limit);
            state.mark_failed(Some(format!("plan rewrite limit of {} reached", limit)));
            return state;
        }

        *plan_rewrites += 1;
        info!("Rewriting plan (revision {})", plan_rewrites);
        let state = self.invoke(planner, state).await;
        self.plan_ready(&state, *plan_rewrites, progress);
        state
    }

    fn require(&self, name: &str) -> Result<Arc<dyn Agent>, RunSessionError> {
        self.registry
            .get(name)
            .ok_or_else(|| RunSessionError::MissingAgent(name.to_string()))
    }

    async fn invoke(&self, agent: &Arc<dyn Agent>, state: GlobalState) -> GlobalState {
        let options = self
            .agent_options
            .get(agent.name())
            .cloned()
            .unwrap_or_default();
        agent.run(state, &options).await
    }

    fn plan_ready(
        &self,
        state: &GlobalState,
        revision: usize,
        progress: &dyn SessionProgressNotifier,
    ) {
        info!("Plan revision {} has {} steps", revision, state.plan.len());
        progress.on_plan_ready(&state.plan, revision);

        let steps: Vec<Value> = state
            .plan
            .iter()
            .map(|s| {
                json!({
                    "id": s.id,
                    "description": s.description,
                    "agent": s.agent,
                    "tool": s.tool_name,
                })
            })
            .collect();
        self.log(
            "plan_created",
            json!({ "revision": revision, "steps": steps }),
        );
    }

    fn log(&self, event_type: &'static str, payload: Value) {
        self.session_logger
            .log(SessionEvent::new(event_type, payload));
    }
}
