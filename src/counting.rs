//! Mono/bi-word association counting
//!
//! Produces the association count sources read by `build`. Candidates come
//! from phenomenon lines: every tag is a monoword candidate and every pair of
//! tags on the same line a biword candidate. Each document then credits, for
//! every kept tag, all candidate pairs it forms with the document's other
//! tags; a tag that forms no candidate pair credits its monoword instead.

use crate::error::{ChronoTreeError, Result};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub const BIWORD_FILE: &str = "biword_assoc.dat";
pub const MONOWORD_FILE: &str = "monoword_assoc.dat";

/// Accumulates support counts for candidate tags and tag pairs
#[derive(Debug, Clone, Default)]
pub struct AssociationCounter {
    monowords: BTreeMap<String, u64>,
    /// Unordered pairs stored as (smaller, larger)
    biwords: BTreeMap<(String, String), u64>,
    documents: usize,
}

fn ordered_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl AssociationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the tags of one phenomenon as candidates (count 0)
    pub fn add_phenomenon<S: AsRef<str>>(&mut self, tags: &[S]) {
        for (i, a) in tags.iter().enumerate() {
            self.monowords.entry(a.as_ref().to_string()).or_insert(0);
            for (j, b) in tags.iter().enumerate() {
                if i != j && a.as_ref() != b.as_ref() {
                    self.biwords
                        .entry(ordered_pair(a.as_ref(), b.as_ref()))
                        .or_insert(0);
                }
            }
        }
    }

    /// Credit one document's tags
    ///
    /// Tags that are not candidates are ignored. Each pair of positions is
    /// credited once, so repeated tags multiply their pair support.
    pub fn observe_document<S: AsRef<str>>(&mut self, tags: &[S]) {
        self.documents += 1;
        let kept: Vec<&str> = tags
            .iter()
            .map(AsRef::as_ref)
            .filter(|tag| self.monowords.contains_key(*tag))
            .collect();

        for (i, a) in kept.iter().enumerate() {
            let mut paired = false;
            for (j, b) in kept.iter().enumerate() {
                if i == j {
                    continue;
                }
                if let Some(count) = self.biwords.get_mut(&ordered_pair(a, b)) {
                    paired = true;
                    if i < j {
                        *count += 1;
                    }
                }
            }
            if !paired {
                if let Some(count) = self.monowords.get_mut(*a) {
                    *count += 1;
                }
            }
        }
    }

    /// Support of the unordered pair `{a, b}`
    pub fn biword(&self, a: &str, b: &str) -> u64 {
        self.biwords.get(&ordered_pair(a, b)).copied().unwrap_or(0)
    }

    pub fn monoword(&self, tag: &str) -> u64 {
        self.monowords.get(tag).copied().unwrap_or(0)
    }

    pub fn documents(&self) -> usize {
        self.documents
    }

    /// Write `a-b count` records in key order
    pub fn write_biwords<W: Write>(&self, mut out: W) -> Result<()> {
        for ((a, b), count) in &self.biwords {
            writeln!(out, "{a}-{b} {count}")?;
        }
        out.flush()?;
        Ok(())
    }

    /// Write `tag count` records in key order
    pub fn write_monowords<W: Write>(&self, mut out: W) -> Result<()> {
        for (tag, count) in &self.monowords {
            writeln!(out, "{tag} {count}")?;
        }
        out.flush()?;
        Ok(())
    }
}

pub(crate) fn open_lines(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| ChronoTreeError::unreadable(path, e))?;
    Ok(BufReader::new(file))
}

pub(crate) fn for_each_line<R: BufRead>(
    reader: R,
    origin: &str,
    mut f: impl FnMut(&[&str]),
) -> Result<usize> {
    let mut lines = 0;
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| ChronoTreeError::malformed(origin, idx + 1, e.to_string()))?;
        let tags: Vec<&str> = line.split_whitespace().collect();
        f(&tags);
        lines += 1;
    }
    Ok(lines)
}

/// Count associations from files and write both outputs into `out_dir`
pub fn count_associations(phenomena: &Path, documents: &Path, out_dir: &Path) -> Result<AssociationCounter> {
    let mut counter = AssociationCounter::new();

    let phenomenon_lines = for_each_line(
        open_lines(phenomena)?,
        &phenomena.display().to_string(),
        |tags| counter.add_phenomenon(tags),
    )?;
    for_each_line(
        open_lines(documents)?,
        &documents.display().to_string(),
        |tags| counter.observe_document(tags),
    )?;

    fs::create_dir_all(out_dir)?;
    counter.write_biwords(BufWriter::new(File::create(out_dir.join(BIWORD_FILE))?))?;
    counter.write_monowords(BufWriter::new(File::create(out_dir.join(MONOWORD_FILE))?))?;

    tracing::info!(
        phenomena = phenomenon_lines,
        documents = counter.documents(),
        monowords = counter.monowords.len(),
        biwords = counter.biwords.len(),
        "wrote association counts"
    );
    Ok(counter)
}
