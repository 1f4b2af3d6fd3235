//! Use cases.

pub mod run_session;
pub(crate) mod shared;

pub use run_session::{RunSessionError, RunSessionInput, RunSessionOutput, RunSessionUseCase};
