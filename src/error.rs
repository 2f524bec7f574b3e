//! Error taxonomy for ingestion, row validation and configuration.
//!
//! None of these escape a pipeline run: row failures become [`RowRejected`]
//! entries and source failures become [`SkippedSource`] entries.

use thiserror::Error;

/// Why an individual input source could not be shaped into visitor rows.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("expected at least {expected} columns, found {found}")]
    TooFewColumns { expected: usize, found: usize },

    #[error("source has no rows")]
    Empty,
}

/// Why a single row was dropped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("unparsable timestamp {0:?}")]
    UnparsableTimestamp(String),

    #[error("row has {0} fields, need at least 6")]
    TooFewFields(usize),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// A row dropped somewhere in the pipeline, with enough context to find it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRejected {
    pub source: String,
    pub line: usize,
    pub reason: RejectReason,
}

/// A source that was skipped entirely while the rest of the batch continued.
#[derive(Debug)]
pub struct SkippedSource {
    pub source: String,
    pub error: SourceError,
}
