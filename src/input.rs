//! Line-oriented input collaborators
//!
//! - identifier → timestamp table (`<date> <time> <identifier>`)
//! - association count sources (`a-b 7`, `a,b 7` or `7,a,b`)
//! - per-line identifier lists (whitespace separated)
//!
//! Any record that does not fit its expected shape fails the whole source.

use crate::association::AssociationTable;
use crate::error::{ChronoTreeError, Result};
use crate::itemset::ItemsetKey;
use crate::temporal::TimestampLookup;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Timestamp format used by the identifier → timestamp table
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn origin_of(path: &Path) -> String {
    path.display().to_string()
}

/// Identifier → timestamp mapping
#[derive(Debug, Clone, Default)]
pub struct TimestampTable {
    entries: HashMap<String, NaiveDateTime>,
}

impl TimestampTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ChronoTreeError::unreadable(path, e))?;
        Self::from_reader(BufReader::new(file), &origin_of(path))
    }

    /// Parse `<date> <time> <identifier>` records
    ///
    /// Blank lines are skipped and later records overwrite earlier ones.
    /// `origin` names the source in error reports.
    pub fn from_reader<R: BufRead>(reader: R, origin: &str) -> Result<Self> {
        let mut table = Self::new();
        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.map_err(|e| ChronoTreeError::malformed(origin, line_no, e.to_string()))?;
            let mut tokens = line.split_whitespace();
            let (date, time, identifier) = match (tokens.next(), tokens.next(), tokens.next()) {
                (None, _, _) => continue,
                (Some(date), Some(time), Some(identifier)) => (date, time, identifier),
                _ => {
                    return Err(ChronoTreeError::malformed(
                        origin,
                        line_no,
                        "expected '<date> <time> <identifier>'",
                    ))
                }
            };
            let stamp = format!("{date} {time}");
            let timestamp = NaiveDateTime::parse_from_str(&stamp, TIMESTAMP_FORMAT).map_err(|e| {
                ChronoTreeError::malformed(origin, line_no, format!("bad timestamp '{stamp}': {e}"))
            })?;
            table.insert(identifier, timestamp);
        }
        tracing::info!(origin, identifiers = table.len(), "loaded timestamp table");
        Ok(table)
    }

    pub fn insert(&mut self, identifier: &str, timestamp: NaiveDateTime) {
        self.entries.insert(identifier.to_string(), timestamp);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TimestampLookup for TimestampTable {
    fn timestamp_of(&self, identifier: &str) -> Option<NaiveDateTime> {
        self.entries.get(identifier).copied()
    }
}

/// Parse one association record into its key and count
///
/// Accepted shapes:
/// - `<ids> <count>` where `<ids>` is joined by `-` or `,`
/// - `<count>,<id>[,<id>…]`
///
/// Returns `Ok(None)` for blank lines.
pub fn parse_association_record(line: &str) -> std::result::Result<Option<(ItemsetKey, u64)>, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        [] => Ok(None),
        [ids, count] => {
            let count = parse_count(count)?;
            let separator = if ids.contains(',') { ',' } else { '-' };
            let key = parse_ids(ids.split(separator))?;
            Ok(Some((key, count)))
        }
        [record] => {
            let mut fields = record.split(',');
            let count = parse_count(fields.next().unwrap_or_default())?;
            let key = parse_ids(fields)?;
            Ok(Some((key, count)))
        }
        _ => Err(format!("expected 1 or 2 tokens, found {}", tokens.len())),
    }
}

fn parse_count(token: &str) -> std::result::Result<u64, String> {
    token
        .parse::<u64>()
        .map_err(|_| format!("count '{token}' is not a non-negative integer"))
}

fn parse_ids<'a, I>(ids: I) -> std::result::Result<ItemsetKey, String>
where
    I: Iterator<Item = &'a str>,
{
    let ids: Vec<&str> = ids.collect();
    if ids.iter().any(|id| id.is_empty()) {
        return Err("empty identifier in itemset".to_string());
    }
    ItemsetKey::new(ids).map_err(|e| e.to_string())
}

/// Load association records from `reader` into `table`
///
/// Keys already present are overwritten. Returns the number of records read.
pub fn load_associations<R: BufRead>(
    table: &mut AssociationTable,
    reader: R,
    origin: &str,
) -> Result<usize> {
    let mut records = 0;
    for (idx, line) in reader.lines().enumerate() {
        let parsed = line
            .map_err(|e| e.to_string())
            .and_then(|line| parse_association_record(&line))
            .map_err(|reason| ChronoTreeError::malformed(origin, idx + 1, reason))?;
        if let Some((key, count)) = parsed {
            table.insert(key, count);
            records += 1;
        }
    }
    tracing::info!(origin, records, keys = table.len(), "loaded association source");
    Ok(records)
}

/// Build the base table from several sources; later sources win on overlap
pub fn load_association_sources<P: AsRef<Path>>(paths: &[P]) -> Result<AssociationTable> {
    let mut table = AssociationTable::new();
    for path in paths {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ChronoTreeError::unreadable(path, e))?;
        load_associations(&mut table, BufReader::new(file), &origin_of(path))?;
    }
    Ok(table)
}

/// Split every line into its identifiers (an empty line yields an empty group)
pub fn read_identifier_lines<R: BufRead>(reader: R) -> Result<Vec<Vec<String>>> {
    reader
        .lines()
        .map(|line| -> Result<Vec<String>> {
            let line = line?;
            Ok(line.split_whitespace().map(str::to_string).collect())
        })
        .collect()
}

pub fn read_identifier_lines_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<String>>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ChronoTreeError::unreadable(path, e))?;
    read_identifier_lines(BufReader::new(file))
}
