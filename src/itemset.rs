//! Canonical itemset keys
//!
//! An itemset key is a non-empty set of identifiers kept sorted and
//! deduplicated, so two keys compare equal iff they name the same set.
//! The display form is the comma-joined canonical sequence (`a,b,c`).

use crate::error::{ChronoTreeError, Result};
use serde::{Serialize, Serializer};
use std::fmt;

/// Sorted, deduplicated, non-empty set of identifiers
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemsetKey {
    items: Vec<String>,
}

impl ItemsetKey {
    /// Canonicalize an arbitrary collection of identifiers
    ///
    /// # Errors
    /// Returns [`ChronoTreeError::EmptyItemset`] when no identifier is given.
    ///
    /// # Example
    /// ```
    /// use chronotree::itemset::ItemsetKey;
    ///
    /// let key = ItemsetKey::new(["b", "a", "b"]).unwrap();
    /// assert_eq!(key.to_string(), "a,b");
    /// ```
    pub fn new<I, S>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut items: Vec<String> = ids.into_iter().map(Into::into).collect();
        if items.is_empty() {
            return Err(ChronoTreeError::EmptyItemset);
        }
        items.sort();
        items.dedup();
        Ok(Self { items })
    }

    /// Key of a single identifier
    pub fn singleton(id: &str) -> Self {
        Self {
            items: vec![id.to_string()],
        }
    }

    /// Canonical pairwise key `{a, b}` (collapses to a singleton when `a == b`)
    pub fn pair(a: &str, b: &str) -> Self {
        let items = match a.cmp(b) {
            std::cmp::Ordering::Less => vec![a.to_string(), b.to_string()],
            std::cmp::Ordering::Greater => vec![b.to_string(), a.to_string()],
            std::cmp::Ordering::Equal => vec![a.to_string()],
        };
        Self { items }
    }

    /// Replace `from` with `to`, keeping the key canonical
    ///
    /// Returns a clone of `self` when `from` is not a member.
    pub fn substitute(&self, from: &str, to: &str) -> Self {
        if !self.contains(from) {
            return self.clone();
        }
        let mut items: Vec<String> = self
            .items
            .iter()
            .map(|id| if id == from { to.to_string() } else { id.clone() })
            .collect();
        items.sort();
        items.dedup();
        Self { items }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items
            .binary_search_by(|item| item.as_str().cmp(id))
            .is_ok()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the key holds no identifiers
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl fmt::Display for ItemsetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.items.join(","))
    }
}

impl Serialize for ItemsetKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
