//! Console output formatter for session results

use colored::Colorize;
use serde_json::json;
use stepwise_application::RunSessionOutput;
use stepwise_domain::util::preview_value;
use stepwise_domain::{PlanStep, SessionStatus, StepStatus};

const PREVIEW_BYTES: usize = 80;

/// Formats session results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Status, answer, steps and tool statistics
    pub fn format_summary(output: &RunSessionOutput) -> String {
        let state = &output.state;
        let mut out = String::new();

        out.push_str(&Self::header("Session Result"));
        out.push('\n');
        out.push_str(&format!("{} {}\n", "Query:".cyan().bold(), state.query()));
        out.push_str(&format!(
            "{} {}\n",
            "Status:".cyan().bold(),
            Self::status_label(state.session_status)
        ));
        if let Some(reason) = state.flags.failure_reason() {
            out.push_str(&format!("{} {}\n", "Reason:".cyan().bold(), reason.red()));
        }
        out.push_str(&format!(
            "{} {} step attempts, {} plan rewrites\n",
            "Effort:".cyan().bold(),
            output.iterations,
            output.plan_rewrites
        ));

        if let Some(answer) = state.final_answer.as_deref().filter(|a| !a.is_empty()) {
            out.push_str(&Self::section_header("Answer"));
            out.push_str(answer);
            out.push('\n');
        }

        out.push_str(&Self::section_header("Steps"));
        let archived = state.history().len();
        for (i, step) in state.history().iter().enumerate() {
            out.push_str(&Self::step_line(i + 1, step));
        }
        let pending = state
            .plan
            .iter()
            .skip(state.current_step_index)
            .filter(|step| !state.history().iter().any(|h| h.id == step.id));
        for (i, step) in pending.enumerate() {
            out.push_str(&Self::step_line(archived + i + 1, step));
        }

        if !state.tool_stats().is_empty() {
            out.push_str(&Self::section_header("Tools"));
            for (name, stats) in state.tool_stats() {
                out.push_str(&format!(
                    "  {:<12} {} calls, {} ok, {} failed, {:.0}% success, {:.1} ms avg\n",
                    name.bold(),
                    stats.calls(),
                    stats.successes(),
                    stats.failures(),
                    stats.success_rate() * 100.0,
                    stats.avg_latency_ms()
                ));
            }
        }

        out
    }

    /// Final state plus run counters as pretty JSON
    pub fn format_json(output: &RunSessionOutput) -> String {
        let state = &output.state;
        let value = json!({
            "status": state.session_status.as_str(),
            "final_answer": state.final_answer,
            "failure_reason": state.flags.failure_reason(),
            "iterations": output.iterations,
            "plan_rewrites": output.plan_rewrites,
            "state": state,
        });
        serde_json::to_string_pretty(&value)
            .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize result: {}\"}}", e))
    }

    fn step_line(index: usize, step: &PlanStep) -> String {
        let mut line = format!(
            "  {:>2}. {} {} ({})",
            index,
            Self::step_icon(step.status),
            step.description,
            step.agent.dimmed()
        );
        if step.attempts > 1 {
            line.push_str(&format!(" x{}", step.attempts));
        }
        match (&step.error, &step.output) {
            (Some(error), _) if step.status == StepStatus::Failed => {
                line.push_str(&format!(" - {}", error.red()));
            }
            (_, Some(output)) if step.status == StepStatus::Success => {
                line.push_str(&format!(" - {}", preview_value(output, PREVIEW_BYTES).dimmed()));
            }
            _ => {}
        }
        line.push('\n');
        line
    }

    fn step_icon(status: StepStatus) -> String {
        match status {
            StepStatus::Success => "✓".green().to_string(),
            StepStatus::Failed => "✗".red().to_string(),
            StepStatus::Skipped => "↷".yellow().to_string(),
            StepStatus::Running => "…".blue().to_string(),
            StepStatus::Pending => "·".dimmed().to_string(),
        }
    }

    fn status_label(status: SessionStatus) -> String {
        match status {
            SessionStatus::Done => "done".green().bold().to_string(),
            SessionStatus::Failed => "failed".red().bold().to_string(),
            SessionStatus::Running => "running".yellow().to_string(),
        }
    }

    fn header(title: &str) -> String {
        let line = "═".repeat(60);
        format!(
            "{}\n{}\n{}",
            line.blue(),
            format!("  {}", title).blue().bold(),
            line.blue()
        )
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n", format!("── {} ──", title).yellow().bold())
    }
}
