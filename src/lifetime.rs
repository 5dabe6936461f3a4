//! Phenomenon lifetime analysis
//!
//! Consolidated phenomena (one tag line each, numbered from 1) are traced
//! through daily phenomenon files `<day>.dat`. A daily line belongs to the
//! phenomenon owning its first tag; the day records how many of the line's
//! tags had not been seen on any earlier line.

use crate::counting::{for_each_line, open_lines};
use crate::error::Result;
use fnv::{FnvHashMap, FnvHashSet};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

pub const LIFETIME_FILE: &str = "phen_lifetime.dat";
pub const DELTA_FILE: &str = "delta_phen.dat";

/// Days scanned when none are given
pub const DEFAULT_DAYS: u32 = 90;

/// Marker some tools append to phenomenon lines
const END_MARKER: &str = "*";

/// First and last day a phenomenon was active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifetime {
    pub first_day: u32,
    pub last_day: u32,
}

impl Lifetime {
    pub fn duration(&self) -> u32 {
        self.last_day - self.first_day
    }
}

/// Tracks when each consolidated phenomenon appears and grows
#[derive(Debug, Default)]
pub struct LifetimeTracker {
    /// Tag → 1-based id of the last phenomenon listing it
    owner: FnvHashMap<String, usize>,
    discovered: FnvHashSet<String>,
    /// Per phenomenon: day → tags first seen that day
    evolution: Vec<BTreeMap<u32, usize>>,
}

impl LifetimeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the next consolidated phenomenon and return its id
    pub fn add_phenomenon<S: AsRef<str>>(&mut self, tags: &[S]) -> usize {
        self.evolution.push(BTreeMap::new());
        let id = self.evolution.len();
        for tag in tags {
            self.owner.insert(tag.as_ref().to_string(), id);
        }
        id
    }

    pub fn phenomena(&self) -> usize {
        self.evolution.len()
    }

    /// Record one daily phenomenon line
    ///
    /// Returns the owning phenomenon id, or `None` when the first tag belongs
    /// to no consolidated phenomenon. Tags outside the consolidated set never
    /// count as new. A later line of the same phenomenon on the same day
    /// replaces the day's count.
    pub fn observe<S: AsRef<str>>(&mut self, day: u32, tags: &[S]) -> Option<usize> {
        let tags: Vec<&str> = tags.iter().map(AsRef::as_ref).collect();
        let tags = match tags.split_last() {
            Some((&END_MARKER, rest)) => rest,
            _ => &tags[..],
        };

        let id = *self.owner.get(*tags.first()?)?;
        let mut fresh = 0;
        for tag in tags {
            if self.owner.contains_key(*tag) && self.discovered.insert(tag.to_string()) {
                fresh += 1;
            }
        }
        self.evolution[id - 1].insert(day, fresh);
        Some(id)
    }

    /// Feed every line of one daily file
    pub fn observe_day<R: BufRead>(&mut self, day: u32, reader: R, origin: &str) -> Result<usize> {
        for_each_line(reader, origin, |tags| {
            self.observe(day, tags);
        })
    }

    /// Active span of phenomenon `id`, or `None` if it never appeared
    pub fn lifetime(&self, id: usize) -> Option<Lifetime> {
        let days = self.evolution.get(id.checked_sub(1)?)?;
        let first_day = *days.keys().next()?;
        let last_day = *days.keys().next_back()?;
        Some(Lifetime {
            first_day,
            last_day,
        })
    }

    /// `(days since the first growth day, new tags)` for each later growth day
    pub fn deltas(&self, id: usize) -> Vec<(u32, usize)> {
        let Some(days) = id.checked_sub(1).and_then(|idx| self.evolution.get(idx)) else {
            return Vec::new();
        };
        let mut growth = days.iter().filter(|&(_, &fresh)| fresh > 0);
        let Some((&origin, _)) = growth.next() else {
            return Vec::new();
        };
        growth.map(|(&day, &fresh)| (day - origin, fresh)).collect()
    }

    /// Write `Id:n FDay:f LDay:l Dur:d` for every phenomenon that appeared
    pub fn write_lifetimes<W: Write>(&self, mut out: W) -> Result<()> {
        for id in 1..=self.phenomena() {
            if let Some(span) = self.lifetime(id) {
                writeln!(
                    out,
                    "Id:{id} FDay:{} LDay:{} Dur:{}",
                    span.first_day,
                    span.last_day,
                    span.duration()
                )?;
            }
        }
        out.flush()?;
        Ok(())
    }

    /// Write `Id:n Day:offset Len:count` growth records
    pub fn write_deltas<W: Write>(&self, mut out: W) -> Result<()> {
        for id in 1..=self.phenomena() {
            for (offset, fresh) in self.deltas(id) {
                writeln!(out, "Id:{id} Day:{offset} Len:{fresh}")?;
            }
        }
        out.flush()?;
        Ok(())
    }
}

/// Trace consolidated phenomena through `daily_dir/<1..=days>.dat`
///
/// Missing daily files are days without activity.
pub fn analyze_lifetimes(
    phenomena: &Path,
    daily_dir: &Path,
    days: u32,
    out_dir: &Path,
) -> Result<LifetimeTracker> {
    let mut tracker = LifetimeTracker::new();
    for_each_line(open_lines(phenomena)?, &phenomena.display().to_string(), |tags| {
        tracker.add_phenomenon(tags);
    })?;

    let mut active_days = 0;
    for day in 1..=days {
        let path = daily_dir.join(format!("{day}.dat"));
        if !path.is_file() {
            tracing::debug!(day, path = %path.display(), "no daily file");
            continue;
        }
        tracker.observe_day(day, open_lines(&path)?, &path.display().to_string())?;
        active_days += 1;
    }

    fs::create_dir_all(out_dir)?;
    tracker.write_lifetimes(BufWriter::new(File::create(out_dir.join(LIFETIME_FILE))?))?;
    tracker.write_deltas(BufWriter::new(File::create(out_dir.join(DELTA_FILE))?))?;

    tracing::info!(
        phenomena = tracker.phenomena(),
        active_days,
        "wrote phenomenon lifetimes"
    );
    Ok(tracker)
}
