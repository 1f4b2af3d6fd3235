//! Session-facing terminal adapters.

pub mod human_intervention;
pub mod progress;

pub use human_intervention::InteractiveHumanIntervention;
pub use progress::SessionProgressReporter;
