//! Logging infrastructure: structured session logging.
//!
//! Provides [`JsonlSessionLogger`], a JSONL file writer that implements
//! the [`SessionEventLogger`](stepwise_application::SessionEventLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlSessionLogger;
