use crate::error::{ChronoTreeError, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;

/// A single identifier occurrence on one input line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub identifier: String,
    pub timestamp: NaiveDateTime,
    /// 0 until the clustering pass assigns an id (ids start at 1)
    pub cluster_id: u32,
}

impl Event {
    pub fn new(identifier: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            identifier: identifier.into(),
            timestamp,
            cluster_id: 0,
        }
    }
}

/// Source of identifier → timestamp mappings
pub trait TimestampLookup {
    fn timestamp_of(&self, identifier: &str) -> Option<NaiveDateTime>;
}

impl TimestampLookup for HashMap<String, NaiveDateTime> {
    fn timestamp_of(&self, identifier: &str) -> Option<NaiveDateTime> {
        self.get(identifier).copied()
    }
}

/// Resolve a line's identifiers and sort them chronologically
///
/// The sort is stable, so identifiers sharing a timestamp keep their input
/// order.
///
/// # Errors
/// [`ChronoTreeError::MissingTimestamp`] for the first identifier without a
/// mapping. `line` is only used for the error report.
pub fn resolve_events<S, L>(identifiers: &[S], lookup: &L, line: usize) -> Result<Vec<Event>>
where
    S: AsRef<str>,
    L: TimestampLookup + ?Sized,
{
    let mut events = identifiers
        .iter()
        .map(|id| {
            let id = id.as_ref();
            lookup
                .timestamp_of(id)
                .map(|timestamp| Event::new(id, timestamp))
                .ok_or_else(|| ChronoTreeError::MissingTimestamp {
                    identifier: id.to_string(),
                    line,
                })
        })
        .collect::<Result<Vec<_>>>()?;

    events.sort_by_key(|event| event.timestamp);
    Ok(events)
}
