//! Per-line processing and the batch driver
//!
//! Each line runs resolve → cluster → compress → build on its own; the only
//! shared state is the read-only base association table. With `jobs > 1`
//! lines are distributed to scoped worker threads through a lock-free queue
//! and re-assembled in input order.

use crate::association::{compress, AssociationTable};
use crate::config::{HierarchyConfig, OutputFormat};
use crate::error::{ChronoTreeError, Result};
use crate::hierarchy::{build_hierarchy, render_text, Tree};
use crate::json_output::JsonLineRecord;
use crate::temporal::{resolve_events, Clustering, TimestampLookup};
use crossbeam::queue::ArrayQueue;
use std::io::Write;

/// Everything produced for one input line
#[derive(Debug, Clone)]
pub struct LineHierarchy {
    /// 1-based input line number
    pub line: usize,
    pub clustering: Clustering,
    pub tree: Tree,
}

/// Summary of a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub lines: usize,
    pub failed: usize,
    pub clusters: usize,
    pub nodes: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[Result<LineHierarchy>]) -> Self {
        let mut summary = Self {
            lines: outcomes.len(),
            ..Self::default()
        };
        for outcome in outcomes {
            match outcome {
                Ok(hierarchy) => {
                    summary.clusters += hierarchy.clustering.clusters().len();
                    summary.nodes += hierarchy.tree.len() - 1;
                }
                Err(_) => summary.failed += 1,
            }
        }
        summary
    }
}

/// Per-line hierarchy pipeline over shared, read-only inputs
pub struct Pipeline<'a, L: TimestampLookup + Sync + ?Sized> {
    timestamps: &'a L,
    associations: &'a AssociationTable,
    config: &'a HierarchyConfig,
}

impl<'a, L: TimestampLookup + Sync + ?Sized> Pipeline<'a, L> {
    pub fn new(
        timestamps: &'a L,
        associations: &'a AssociationTable,
        config: &'a HierarchyConfig,
    ) -> Self {
        Self {
            timestamps,
            associations,
            config,
        }
    }

    /// Build the hierarchy for one line of identifiers
    ///
    /// # Errors
    /// [`ChronoTreeError::MissingTimestamp`] if any identifier has no timestamp.
    pub fn process_line<S: AsRef<str>>(&self, line: usize, identifiers: &[S]) -> Result<LineHierarchy> {
        let events = resolve_events(identifiers, self.timestamps, line)?;
        let clustering = Clustering::from_sorted_events(events, self.config.alpha_hours);
        let working = compress(self.associations, clustering.clusters());
        let tree = build_hierarchy(
            &working,
            &clustering.representatives(),
            &self.config.root_label,
        );

        tracing::debug!(
            line,
            events = clustering.events().len(),
            clusters = clustering.clusters().len(),
            rewritten_keys = working.touched(),
            "built line hierarchy"
        );

        Ok(LineHierarchy {
            line,
            clustering,
            tree,
        })
    }

    /// Process every line, keeping input order
    ///
    /// Without `keep_going` the first failing line (in input order) aborts
    /// the batch. With it, failures are logged and returned in their slot.
    pub fn run(&self, lines: &[Vec<String>]) -> Result<Vec<Result<LineHierarchy>>> {
        let mut outcomes = if self.config.jobs > 1 && lines.len() > 1 {
            self.run_parallel(lines, self.config.jobs)
        } else {
            self.run_sequential(lines)?
        };

        if !self.config.keep_going {
            if let Some(pos) = outcomes.iter().position(Result::is_err) {
                if let Err(err) = outcomes.swap_remove(pos) {
                    return Err(err);
                }
            }
        }

        for err in outcomes.iter().filter_map(|outcome| outcome.as_ref().err()) {
            tracing::warn!("skipping line: {}", err);
        }

        let summary = BatchSummary::from_outcomes(&outcomes);
        tracing::info!(
            lines = summary.lines,
            failed = summary.failed,
            clusters = summary.clusters,
            nodes = summary.nodes,
            "batch complete"
        );
        Ok(outcomes)
    }

    fn run_sequential(&self, lines: &[Vec<String>]) -> Result<Vec<Result<LineHierarchy>>> {
        let mut outcomes = Vec::with_capacity(lines.len());
        for (idx, identifiers) in lines.iter().enumerate() {
            let outcome = self.process_line(idx + 1, identifiers);
            if outcome.is_err() && !self.config.keep_going {
                return outcome.map(|_| Vec::new());
            }
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    fn run_parallel(&self, lines: &[Vec<String>], jobs: usize) -> Vec<Result<LineHierarchy>> {
        let queue = ArrayQueue::new(lines.len());
        for idx in 0..lines.len() {
            // Capacity equals the number of lines, so every push succeeds.
            let _ = queue.push(idx);
        }

        let queue = &queue;
        let workers = jobs.min(lines.len());
        let finished = crossbeam::thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    scope.spawn(move |_| {
                        let mut done = Vec::new();
                        while let Some(idx) = queue.pop() {
                            done.push((idx, self.process_line(idx + 1, &lines[idx])));
                        }
                        done
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                })
                .collect::<Vec<_>>()
        })
        .unwrap_or_else(|payload| std::panic::resume_unwind(payload));

        let mut slots: Vec<Option<Result<LineHierarchy>>> = (0..lines.len()).map(|_| None).collect();
        for (idx, outcome) in finished {
            slots[idx] = Some(outcome);
        }
        slots.into_iter().flatten().collect()
    }
}

/// Write one output block per outcome, in order
///
/// Text blocks are followed by an empty line; a failed line leaves an empty
/// block so positions still line up with the input. JSON emits one object
/// per line.
pub fn write_forest<W: Write>(
    mut out: W,
    outcomes: &[Result<LineHierarchy>],
    config: &HierarchyConfig,
) -> Result<()> {
    for (idx, outcome) in outcomes.iter().enumerate() {
        match config.format {
            OutputFormat::Text => {
                if let Ok(hierarchy) = outcome {
                    out.write_all(render_text(&hierarchy.tree, config.render_options()).as_bytes())?;
                }
                writeln!(out)?;
            }
            OutputFormat::Json => {
                let record = JsonLineRecord::from_outcome(idx + 1, outcome);
                serde_json::to_writer(&mut out, &record)
                    .map_err(|e| ChronoTreeError::Io(e.into()))?;
                writeln!(out)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}
