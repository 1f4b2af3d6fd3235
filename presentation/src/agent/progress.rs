//! Progress reporting for session execution
//!
//! Writes to stderr so `--output json` on stdout stays machine-readable.

use colored::Colorize;
use stepwise_application::SessionProgressNotifier;
use stepwise_domain::util::preview_value;
use stepwise_domain::{ControlAction, HumanDecision, PlanStep, StepStatus};

const PREVIEW_BYTES: usize = 60;

/// Line-oriented progress reporter
pub struct SessionProgressReporter {
    verbose: bool,
}

impl SessionProgressReporter {
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Also print the plan and every review
    pub fn verbose() -> Self {
        Self { verbose: true }
    }

    fn plan_lines(plan: &[PlanStep], revision: usize) -> Vec<String> {
        let title = if revision == 0 {
            format!("📝 Plan: {} steps", plan.len())
        } else {
            format!("📝 Plan revision {}: {} steps", revision, plan.len())
        };
        let mut lines = vec![title.cyan().bold().to_string()];
        for (i, step) in plan.iter().enumerate() {
            let tool = step
                .tool_name
                .as_deref()
                .map(|t| format!(" via {}", t))
                .unwrap_or_default();
            lines.push(format!(
                "   {}. {} {}",
                i + 1,
                step.description,
                format!("[{}{}]", step.agent, tool).dimmed()
            ));
        }
        lines
    }

    fn completion_line(step: &PlanStep) -> String {
        match step.status {
            StepStatus::Success => {
                let preview = step
                    .output
                    .as_ref()
                    .map(|v| preview_value(v, PREVIEW_BYTES))
                    .unwrap_or_default();
                format!("   {} {}", "✓".green(), preview.dimmed())
            }
            StepStatus::Failed => format!(
                "   {} {}",
                "✗".red(),
                step.error.as_deref().unwrap_or("failed").red()
            ),
            other => format!("   {} {}", "·".dimmed(), other.as_str()),
        }
    }
}

impl Default for SessionProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionProgressNotifier for SessionProgressReporter {
    fn on_plan_ready(&self, plan: &[PlanStep], revision: usize) {
        if self.verbose || revision > 0 {
            for line in Self::plan_lines(plan, revision) {
                eprintln!("{}", line);
            }
        }
    }

    fn on_step_start(&self, step: &PlanStep, index: usize, total: usize) {
        let attempt = if step.attempts > 1 {
            format!(" (attempt {})", step.attempts)
        } else {
            String::new()
        };
        eprintln!(
            "{} {}{}",
            format!("▶ [{}/{}]", index, total).blue().bold(),
            step.description,
            attempt.yellow()
        );
    }

    fn on_step_complete(&self, step: &PlanStep) {
        eprintln!("{}", Self::completion_line(step));
    }

    fn on_review(&self, _step: &PlanStep, action: &ControlAction) {
        match action {
            ControlAction::RetryStep => eprintln!("   {}", "↻ retrying".yellow()),
            ControlAction::RewritePlan => eprintln!("   {}", "⟳ plan rewrite requested".yellow()),
            _ if self.verbose => eprintln!("   {}", action.as_str().dimmed()),
            _ => {}
        }
    }

    fn on_escalation(&self, step: &PlanStep) {
        eprintln!(
            "{} step {} escalated after {} attempts",
            "⚠".yellow().bold(),
            step.id,
            step.attempts
        );
    }

    fn on_decision(&self, _step: &PlanStep, decision: &HumanDecision) {
        eprintln!("   {} {}", "→".magenta(), decision.as_str().magenta().bold());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_lines() {
        let plan = vec![
            PlanStep::new("Look up rust", "executor").with_tool("echo"),
            PlanStep::new("Compose the final answer", "answer"),
        ];
        let lines = SessionProgressReporter::plan_lines(&plan, 1);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("revision 1"));
        assert!(lines[1].contains("Look up rust"));
        assert!(lines[1].contains("executor via echo"));
        assert!(!lines[2].contains("via"));
    }

    #[test]
    fn test_completion_line() {
        let mut step = PlanStep::new("Look up", "executor");
        step.mark_failed("Tool echo failed: unavailable");
        assert!(SessionProgressReporter::completion_line(&step).contains("unavailable"));

        step.mark_success("line one\nline two");
        assert!(SessionProgressReporter::completion_line(&step).contains("line one line two"));
    }
}
