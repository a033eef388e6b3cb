// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! # Core Error Types
//!
//! Aggregates the sub-crate error types into one enum so `main` has a single
//! `Result` to match on during bootstrap and the run loop.

use arbitron_data::error::DataError;
use arbitron_execution::ExecutionError;
use thiserror::Error;

/// Top-level error for the engine binary.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A venue adapter could not start at all (spec 7, `FatalAdapterInit`).
    #[error("adapter init: {0}")]
    AdapterInit(#[from] DataError),

    /// The execution layer failed in a way that prevented the journal from
    /// being written at all (rather than a routine trade `FAILED`/`PARTIAL`).
    #[error("execution: {0}")]
    Execution(#[from] ExecutionError),

    /// A spawned task panicked or was cancelled.
    #[error("task join error: {0}")]
    Join(String),

    /// Configuration could not be parsed from the environment.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<tokio::task::JoinError> for CoreError {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Join(value.to_string())
    }
}
