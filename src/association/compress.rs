use super::table::{AssociationLookup, AssociationTable};
use crate::itemset::ItemsetKey;
use crate::temporal::Cluster;
use fnv::FnvHashMap;
use std::collections::BTreeSet;

/// Per-line copy-on-write view of an [`AssociationTable`]
///
/// Reads fall through to the shared base unless the key has been overridden
/// or deleted on this line. Keys created here (absent from the base) get
/// their own reverse index so later folds can still find them.
#[derive(Debug)]
pub struct WorkingTable<'a> {
    base: &'a AssociationTable,

    /// `Some(count)` overrides the base, `None` deletes the key
    overrides: FnvHashMap<ItemsetKey, Option<u64>>,

    /// Reverse index for live keys that do not exist in the base
    created: FnvHashMap<String, BTreeSet<ItemsetKey>>,
}

impl<'a> WorkingTable<'a> {
    pub fn new(base: &'a AssociationTable) -> Self {
        Self {
            base,
            overrides: FnvHashMap::default(),
            created: FnvHashMap::default(),
        }
    }

    pub fn get(&self, key: &ItemsetKey) -> Option<u64> {
        match self.overrides.get(key) {
            Some(overridden) => *overridden,
            None => self.base.get(key),
        }
    }

    /// Live keys currently containing `id`, in canonical order
    pub fn keys_containing(&self, id: &str) -> Vec<ItemsetKey> {
        let mut keys: BTreeSet<&ItemsetKey> = self.base.keys_containing(id).collect();
        if let Some(created) = self.created.get(id) {
            keys.extend(created.iter());
        }
        keys.into_iter()
            .filter(|key| self.get(key).is_some())
            .cloned()
            .collect()
    }

    fn set(&mut self, key: ItemsetKey, count: u64) {
        if !self.base.contains_key(&key) {
            for id in key.items() {
                self.created
                    .entry(id.clone())
                    .or_default()
                    .insert(key.clone());
            }
        }
        self.overrides.insert(key, Some(count));
    }

    fn remove(&mut self, key: &ItemsetKey) {
        for id in key.items() {
            if let Some(keys) = self.created.get_mut(id) {
                keys.remove(key);
            }
        }
        self.overrides.insert(key.clone(), None);
    }

    /// Rewrite every key containing `member` so that it names `winner` instead
    ///
    /// Collided keys are merged by summing their counts. Returns the number
    /// of keys rewritten.
    pub fn fold_member(&mut self, member: &str, winner: &str) -> usize {
        if member == winner {
            return 0;
        }

        let keys = self.keys_containing(member);
        for key in &keys {
            let Some(count) = self.get(key) else {
                continue;
            };
            let replacement = key.substitute(member, winner);
            self.remove(key);
            let merged = self.get(&replacement).unwrap_or(0).saturating_add(count);
            self.set(replacement, merged);
        }
        keys.len()
    }

    /// Fold every non-representative member of `cluster` into its representative
    pub fn fold_cluster(&mut self, cluster: &Cluster) -> usize {
        let winner = cluster.representative();
        cluster
            .members()
            .iter()
            .skip(1)
            .map(|member| self.fold_member(member, winner))
            .sum()
    }

    /// Live (key, count) entries, unordered
    pub fn iter(&self) -> impl Iterator<Item = (&ItemsetKey, u64)> + '_ {
        let inherited = self
            .base
            .iter()
            .filter(|(key, _)| !self.overrides.contains_key(*key));
        let overridden = self
            .overrides
            .iter()
            .filter_map(|(key, count)| count.map(|count| (key, count)));
        inherited.chain(overridden)
    }

    /// Summed count of every live key touching at least one of `ids`
    pub fn mass_touching(&self, ids: &[&str]) -> u64 {
        let keys: BTreeSet<ItemsetKey> = ids
            .iter()
            .flat_map(|id| self.keys_containing(id))
            .collect();
        keys.iter().filter_map(|key| self.get(key)).sum()
    }

    /// Number of keys overridden or deleted on this line
    pub fn touched(&self) -> usize {
        self.overrides.len()
    }

    /// Materialize the working copy into an owned table
    pub fn to_table(&self) -> AssociationTable {
        self.iter().map(|(key, count)| (key.clone(), count)).collect()
    }
}

impl AssociationLookup for WorkingTable<'_> {
    fn count(&self, key: &ItemsetKey) -> u64 {
        self.get(key).unwrap_or(0)
    }
}

/// Collapse the base table onto the representatives of `clusters`
///
/// The result contains no key naming a non-representative member of any
/// cluster. Cluster order does not affect the result since merges are sums.
///
/// # Example
/// ```
/// use chronotree::association::{compress, AssociationLookup, AssociationTable};
/// use chronotree::itemset::ItemsetKey;
/// use chronotree::temporal::Cluster;
///
/// let base: AssociationTable = vec![
///     (ItemsetKey::singleton("a"), 5),
///     (ItemsetKey::singleton("b"), 3),
///     (ItemsetKey::pair("a", "b"), 7),
/// ]
/// .into_iter()
/// .collect();
///
/// let cluster = Cluster::new(1, ["b", "a"]).unwrap();
/// let working = compress(&base, &[cluster]);
///
/// assert_eq!(working.count(&ItemsetKey::singleton("a")), 15);
/// assert_eq!(working.count(&ItemsetKey::pair("a", "b")), 0);
/// // The shared table is untouched
/// assert_eq!(base.len(), 3);
/// ```
pub fn compress<'a>(base: &'a AssociationTable, clusters: &[Cluster]) -> WorkingTable<'a> {
    let mut working = WorkingTable::new(base);
    for cluster in clusters {
        let rewritten = working.fold_cluster(cluster);
        tracing::trace!(
            cluster = cluster.id(),
            representative = cluster.representative(),
            rewritten,
            "folded cluster"
        );
    }
    working
}
