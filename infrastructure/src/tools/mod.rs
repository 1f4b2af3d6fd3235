//! Tool adapters.

pub mod builtin;
mod executor;

pub use executor::BuiltinToolExecutor;
