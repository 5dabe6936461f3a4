//! Connected components over frequent itemsets
//!
//! Each itemset line (`tag tag ... <support>`) links its tags. Tags reachable
//! through shared itemsets end up in the same component.

use crate::error::Result;
use fnv::FnvHashMap;
use std::io::{BufRead, Write};

/// Disjoint-set forest over tag indices
#[derive(Debug, Default)]
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn push(&mut self) -> usize {
        let id = self.parent.len();
        self.parent.push(id);
        self.rank.push(0);
        id
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            // path halving
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Incrementally groups tags into components
#[derive(Debug, Default)]
pub struct ComponentFinder {
    /// Tags in first-appearance order
    tags: Vec<String>,
    index: FnvHashMap<String, usize>,
    sets: UnionFind,
}

impl ComponentFinder {
    pub fn new() -> Self {
        Self::default()
    }

    fn intern(&mut self, tag: &str) -> usize {
        if let Some(&id) = self.index.get(tag) {
            return id;
        }
        let id = self.sets.push();
        self.tags.push(tag.to_string());
        self.index.insert(tag.to_string(), id);
        id
    }

    /// Link all tags of one itemset
    pub fn add_itemset<S: AsRef<str>>(&mut self, tags: &[S]) {
        let mut ids = tags.iter().map(|tag| self.intern(tag.as_ref())).collect::<Vec<_>>();
        if let Some(first) = ids.pop() {
            for id in ids {
                self.sets.union(first, id);
            }
        }
    }

    /// Add one `tag ... <support>` line; the trailing support token is ignored
    pub fn add_line(&mut self, line: &str) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if let Some((_support, tags)) = tokens.split_last() {
            self.add_itemset(tags);
        }
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// Components in order of their earliest tag, each listing tags in
    /// first-appearance order
    pub fn components(&mut self) -> Vec<Vec<String>> {
        let mut slot_of_root: FnvHashMap<usize, usize> = FnvHashMap::default();
        let mut components: Vec<Vec<String>> = Vec::new();
        for id in 0..self.tags.len() {
            let root = self.sets.find(id);
            let slot = *slot_of_root.entry(root).or_insert_with(|| {
                components.push(Vec::new());
                components.len() - 1
            });
            components[slot].push(self.tags[id].clone());
        }
        components
    }
}

/// Read itemset lines from `reader` and write one component per line
pub fn write_components<R: BufRead, W: Write>(reader: R, mut out: W) -> Result<usize> {
    let mut finder = ComponentFinder::new();
    for line in reader.lines() {
        finder.add_line(&line?);
    }

    let components = finder.components();
    for component in &components {
        writeln!(out, "{}", component.join(" "))?;
    }
    out.flush()?;

    tracing::info!(
        tags = finder.tag_count(),
        components = components.len(),
        "grouped itemsets into components"
    );
    Ok(components.len())
}
