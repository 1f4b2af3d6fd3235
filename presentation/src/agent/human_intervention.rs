//! Interactive human intervention for escalated steps.
//!
//! Used when `HilMode::Interactive` is set. The operator sees the failed
//! step and picks what happens next:
//!
//! ```text
//! ═══════════════════════════════════════════════════════════════
//!   ⚠️  Step Requires Human Intervention
//! ═══════════════════════════════════════════════════════════════
//!
//! Query:    rust vs go
//! Step:     Look up rust (3f9c2a1b)
//! Attempts: 3
//! Error:    Tool echo failed: unavailable
//!
//! Commands:
//!   /retry   - Reset attempts and run the step again
//!   /skip    - Skip the step and continue
//!   /replan  - Discard the plan and plan again
//!   /abort   - Fail the session
//!
//! step-hil>
//! ```
//!
//! # Commands
//!
//! | Command | Aliases | Decision |
//! |---------|---------|----------|
//! | `/retry` | `retry`, `r` | [`HumanDecision::Retry`] |
//! | `/skip` | `skip`, `s` | [`HumanDecision::Skip`] |
//! | `/replan` | `replan`, `p` | [`HumanDecision::Replan`] |
//! | `/abort` | `abort`, `a`, `q` | [`HumanDecision::Abort`] |

use async_trait::async_trait;
use colored::Colorize;
use std::io::{self, Write};
use stepwise_application::{HumanInterventionError, HumanInterventionPort};
use stepwise_domain::{GlobalState, HumanDecision, PlanStep};

/// Interactive human intervention handler for the terminal.
pub struct InteractiveHumanIntervention;

impl InteractiveHumanIntervention {
    pub fn new() -> Self {
        Self
    }

    fn display_intervention_prompt(&self, state: &GlobalState, step: &PlanStep) {
        let rule = "═══════════════════════════════════════════════════════════════";
        eprintln!();
        eprintln!("{}", rule.yellow().bold());
        eprintln!("{}", "  ⚠️  Step Requires Human Intervention".yellow().bold());
        eprintln!("{}", rule.yellow().bold());
        eprintln!();
        eprintln!("{} {}", "Query:   ".cyan().bold(), state.query().dimmed());
        eprintln!("{} {} ({})", "Step:    ".cyan().bold(), step.description, step.id);
        eprintln!("{} {}", "Attempts:".cyan().bold(), step.attempts);
        if let Some(error) = &step.error {
            eprintln!("{} {}", "Error:   ".cyan().bold(), error.red());
        }
        eprintln!();
        eprintln!("{}", "Commands:".cyan().bold());
        eprintln!("  {}   - Reset attempts and run the step again", "/retry".green());
        eprintln!("  {}    - Skip the step and continue", "/skip".yellow());
        eprintln!("  {}  - Discard the plan and plan again", "/replan".blue());
        eprintln!("  {}   - Fail the session", "/abort".red());
        eprintln!();
    }

    fn read_command() -> Result<String, HumanInterventionError> {
        eprint!("{} ", "step-hil>".magenta().bold());
        io::stderr().flush().map_err(|e| {
            HumanInterventionError::IoError(format!("Failed to flush prompt: {}", e))
        })?;

        let mut input = String::new();
        let read = io::stdin()
            .read_line(&mut input)
            .map_err(|e| HumanInterventionError::IoError(format!("Failed to read input: {}", e)))?;
        if read == 0 {
            return Err(HumanInterventionError::Cancelled);
        }
        Ok(input.trim().to_string())
    }
}

impl Default for InteractiveHumanIntervention {
    fn default() -> Self {
        Self::new()
    }
}

/// Map operator input to a decision; `None` for empty or unknown input.
pub fn parse_decision(input: &str, step: &PlanStep) -> Option<HumanDecision> {
    match input.trim().to_lowercase().as_str() {
        "/retry" | "retry" | "r" => Some(HumanDecision::Retry),
        "/skip" | "skip" | "s" => Some(HumanDecision::Skip),
        "/replan" | "replan" | "p" => Some(HumanDecision::Replan),
        "/abort" | "abort" | "a" | "q" => Some(HumanDecision::Abort(format!(
            "aborted by operator at step {}",
            step.id
        ))),
        _ => None,
    }
}

#[async_trait]
impl HumanInterventionPort for InteractiveHumanIntervention {
    async fn request_intervention(
        &self,
        state: &GlobalState,
        step: &PlanStep,
    ) -> Result<HumanDecision, HumanInterventionError> {
        self.display_intervention_prompt(state, step);

        loop {
            let input = tokio::task::spawn_blocking(Self::read_command)
                .await
                .map_err(|e| HumanInterventionError::IoError(e.to_string()))??;

            if input.is_empty() {
                continue;
            }
            match parse_decision(&input, step) {
                Some(decision) => return Ok(decision),
                None => {
                    eprintln!("{} Unknown command: {}", "⚠️".yellow(), input.red());
                    eprintln!("Available commands: /retry, /skip, /replan, /abort");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decision() {
        let step = PlanStep::new("Look up", "executor").with_id("s1");
        assert_eq!(parse_decision("/retry", &step), Some(HumanDecision::Retry));
        assert_eq!(parse_decision(" S ", &step), Some(HumanDecision::Skip));
        assert_eq!(parse_decision("p", &step), Some(HumanDecision::Replan));
        assert_eq!(
            parse_decision("q", &step),
            Some(HumanDecision::Abort("aborted by operator at step s1".to_string()))
        );
        assert_eq!(parse_decision("/edit", &step), None);
        assert_eq!(parse_decision("", &step), None);
    }
}
