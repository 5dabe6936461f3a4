use crate::itemset::ItemsetKey;
use fnv::FnvHashMap;
use std::collections::BTreeSet;

/// Read access to itemset counts
///
/// Implemented by the shared [`AssociationTable`] and by the per-line
/// [`WorkingTable`](super::WorkingTable), so the hierarchy builder can score
/// against either.
pub trait AssociationLookup {
    /// Count for `key`, or 0 when the key is absent
    fn count(&self, key: &ItemsetKey) -> u64;
}

/// Immutable-after-load mapping from itemset key to occurrence count
///
/// # Example
/// ```
/// use chronotree::association::{AssociationLookup, AssociationTable};
/// use chronotree::itemset::ItemsetKey;
///
/// let mut table = AssociationTable::new();
/// table.insert(ItemsetKey::pair("a", "b"), 7);
/// table.insert(ItemsetKey::singleton("a"), 5);
///
/// assert_eq!(table.count(&ItemsetKey::pair("b", "a")), 7);
/// assert_eq!(table.keys_containing("a").count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AssociationTable {
    counts: FnvHashMap<ItemsetKey, u64>,

    /// Reverse index: identifier → keys containing it
    index: FnvHashMap<String, BTreeSet<ItemsetKey>>,
}

impl AssociationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a key, returning the previous count
    pub fn insert(&mut self, key: ItemsetKey, count: u64) -> Option<u64> {
        for id in key.items() {
            self.index
                .entry(id.clone())
                .or_default()
                .insert(key.clone());
        }
        self.counts.insert(key, count)
    }

    pub fn get(&self, key: &ItemsetKey) -> Option<u64> {
        self.counts.get(key).copied()
    }

    pub fn contains_key(&self, key: &ItemsetKey) -> bool {
        self.counts.contains_key(key)
    }

    /// All keys containing `id`, in canonical order
    ///
    /// An identifier that was never indexed simply has no associations.
    pub fn keys_containing<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a ItemsetKey> + 'a {
        self.index.get(id).into_iter().flatten()
    }

    /// Summed count of every key touching at least one of `ids`
    ///
    /// Keys touching several of the identifiers are counted once.
    pub fn mass_touching(&self, ids: &[&str]) -> u64 {
        let keys: BTreeSet<&ItemsetKey> = ids
            .iter()
            .flat_map(|id| self.keys_containing(id))
            .collect();
        keys.into_iter().filter_map(|key| self.get(key)).sum()
    }

    /// Sum of all counts in the table
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemsetKey, u64)> {
        self.counts.iter().map(|(key, &count)| (key, count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl AssociationLookup for AssociationTable {
    fn count(&self, key: &ItemsetKey) -> u64 {
        self.get(key).unwrap_or(0)
    }
}

impl FromIterator<(ItemsetKey, u64)> for AssociationTable {
    fn from_iter<I: IntoIterator<Item = (ItemsetKey, u64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (key, count) in iter {
            table.insert(key, count);
        }
        table
    }
}

impl PartialEq for AssociationTable {
    fn eq(&self, other: &Self) -> bool {
        self.counts == other.counts
    }
}

impl Eq for AssociationTable {}
