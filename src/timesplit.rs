//! Sliding time-window split of a timestamped tag stream
//!
//! Input records are `<date> <time> #tag #tag ...`, in time order. Window 1
//! ends one window length after the start time; a record later than the
//! current window's end moves to the first window that contains it. Each
//! window's tags go to `<out_dir>/<window>.dat`, one record per line, with
//! the leading `#` removed and lowercased.

use crate::error::{ChronoTreeError, Result};
use crate::input::TIMESTAMP_FORMAT;
use chrono::{Duration, NaiveDateTime};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Format of the start time argument
pub const START_FORMAT: &str = "%Y/%m/%d-%H:%M:%S";

/// Window length written as `days-hours-minutes-seconds`, e.g. `1-12-30-45`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowLength(Duration);

impl WindowLength {
    pub fn duration(&self) -> Duration {
        self.0
    }
}

impl FromStr for WindowLength {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts = s
            .split('-')
            .map(|part| {
                part.parse::<i64>()
                    .ok()
                    .filter(|v| *v >= 0)
                    .ok_or_else(|| format!("'{part}' is not a non-negative integer"))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let [days, hours, minutes, seconds] = parts[..] else {
            return Err(format!("expected days-hours-minutes-seconds, got '{s}'"));
        };
        let seconds = ((days * 24 + hours) * 60 + minutes) * 60 + seconds;
        if seconds == 0 {
            return Err("window length must be positive".to_string());
        }
        Ok(Self(Duration::seconds(seconds)))
    }
}

/// Parse a start time in [`START_FORMAT`]
pub fn parse_start(s: &str) -> std::result::Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, START_FORMAT)
        .map_err(|e| format!("bad start time '{s}' (expected yyyy/mm/dd-HH:MM:SS): {e}"))
}

/// Maps timestamps to 1-based window numbers
#[derive(Debug, Clone)]
pub struct WindowClock {
    length: Duration,
    end: NaiveDateTime,
    window: usize,
}

impl WindowClock {
    pub fn new(start: NaiveDateTime, length: WindowLength) -> Self {
        Self {
            length: length.duration(),
            end: start + length.duration(),
            window: 1,
        }
    }

    /// Window for `at`; the clock only moves forward
    pub fn window_of(&mut self, at: NaiveDateTime) -> usize {
        while at > self.end {
            self.end += self.length;
            self.window += 1;
        }
        self.window
    }
}

fn normalize_tag(tag: &str) -> String {
    tag.strip_prefix('#').unwrap_or(tag).to_lowercase()
}

/// Counts reported by a split run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitSummary {
    pub records: usize,
    pub files: usize,
    pub last_window: usize,
}

/// Split `reader` into window files under `out_dir`
///
/// Blank lines are skipped and records without tags write nothing.
pub fn split_stream<R: BufRead>(
    reader: R,
    origin: &str,
    mut clock: WindowClock,
    out_dir: &Path,
) -> Result<SplitSummary> {
    fs::create_dir_all(out_dir)?;
    let mut summary = SplitSummary::default();
    let mut current: Option<(usize, BufWriter<File>)> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| ChronoTreeError::malformed(origin, line_no, e.to_string()))?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (date, time, tags) = match tokens.as_slice() {
            [] => continue,
            [date, time, tags @ ..] => (date, time, tags),
            _ => {
                return Err(ChronoTreeError::malformed(
                    origin,
                    line_no,
                    "expected '<date> <time> <tag>...'",
                ))
            }
        };
        let stamp = format!("{date} {time}");
        let at = NaiveDateTime::parse_from_str(&stamp, TIMESTAMP_FORMAT).map_err(|e| {
            ChronoTreeError::malformed(origin, line_no, format!("bad timestamp '{stamp}': {e}"))
        })?;

        let window = clock.window_of(at);
        summary.records += 1;
        summary.last_window = window;
        if tags.is_empty() {
            continue;
        }

        let out = match &mut current {
            Some((open, out)) if *open == window => out,
            slot => {
                if let Some((_, mut done)) = slot.take() {
                    done.flush()?;
                }
                let file = File::create(out_dir.join(format!("{window}.dat")))?;
                summary.files += 1;
                &mut slot.insert((window, BufWriter::new(file))).1
            }
        };
        let normalized: Vec<String> = tags.iter().map(|tag| normalize_tag(tag)).collect();
        writeln!(out, "{}", normalized.join(" "))?;
    }

    if let Some((_, mut out)) = current {
        out.flush()?;
    }
    tracing::info!(
        origin,
        records = summary.records,
        files = summary.files,
        windows = summary.last_window,
        "split stream into time windows"
    );
    Ok(summary)
}

/// Split the file at `input` starting at `start`
pub fn split_by_time(
    input: &Path,
    start: NaiveDateTime,
    length: WindowLength,
    out_dir: &Path,
) -> Result<SplitSummary> {
    let file = File::open(input).map_err(|e| ChronoTreeError::unreadable(input, e))?;
    split_stream(
        BufReader::new(file),
        &input.display().to_string(),
        WindowClock::new(start, length),
        out_dir,
    )
}
