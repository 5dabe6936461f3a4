//! Error taxonomy for chronotree
//!
//! Load-time failures (malformed records) are fatal for the whole input source.
//! Per-line failures (missing timestamps) are fatal for that line only; the
//! batch driver decides whether they abort the run.

use thiserror::Error;

/// Errors produced while loading inputs or building hierarchies
#[derive(Error, Debug)]
pub enum ChronoTreeError {
    #[error("no timestamp for identifier '{identifier}' (input line {line})")]
    MissingTimestamp { identifier: String, line: usize },

    #[error("malformed record in {origin} at line {line}: {reason}")]
    MalformedRecord {
        origin: String,
        line: usize,
        reason: String,
    },

    #[error("itemset key must contain at least one identifier")]
    EmptyItemset,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("cannot read {path}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ChronoTreeError {
    pub(crate) fn malformed(origin: &str, line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            origin: origin.to_string(),
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn unreadable(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Unreadable {
            path: path.display().to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ChronoTreeError>;
