use super::tree::{NodeId, Tree};
use crate::association::AssociationLookup;
use crate::itemset::ItemsetKey;
use std::collections::HashMap;

/// Greedy maximum-association tree builder
///
/// # Example
/// ```
/// use chronotree::association::AssociationTable;
/// use chronotree::hierarchy::HierarchyBuilder;
/// use chronotree::itemset::ItemsetKey;
///
/// let table: AssociationTable = vec![(ItemsetKey::pair("x", "z"), 4)].into_iter().collect();
/// let mut builder = HierarchyBuilder::new(&table, "root");
/// builder.insert("x");
/// builder.insert("z");
///
/// let tree = builder.finish();
/// assert_eq!(tree.parent_of("z").unwrap().name, "x");
/// ```
pub struct HierarchyBuilder<'t, T: AssociationLookup + ?Sized> {
    table: &'t T,
    tree: Tree,
    by_name: HashMap<String, NodeId>,
}

impl<'t, T: AssociationLookup + ?Sized> HierarchyBuilder<'t, T> {
    pub fn new(table: &'t T, root_label: &str) -> Self {
        Self {
            table,
            tree: Tree::new(root_label),
            by_name: HashMap::new(),
        }
    }

    /// Choose the parent for `name` without inserting it
    ///
    /// Starts from the singleton count of `name` against the root, then scans
    /// existing nodes in insertion order; only a strictly larger pairwise
    /// count replaces the current best.
    pub fn best_parent(&self, name: &str) -> (NodeId, u64) {
        let mut best_score = self.table.count(&ItemsetKey::singleton(name));
        let mut best_parent = self.tree.root();

        for (id, node) in self.tree.inserted() {
            let score = self.table.count(&ItemsetKey::pair(name, &node.name));
            if score > best_score {
                best_score = score;
                best_parent = id;
            }
        }

        (best_parent, best_score)
    }

    /// Insert a representative; a name already in the tree is not added twice
    pub fn insert(&mut self, name: &str) -> NodeId {
        if let Some(&existing) = self.by_name.get(name) {
            return existing;
        }

        let (parent, score) = self.best_parent(name);
        let id = self.tree.attach(parent, name);
        tracing::trace!(
            node = name,
            parent = %self.tree.node(parent).name,
            score,
            "attached representative"
        );
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn finish(self) -> Tree {
        self.tree
    }
}

/// Build a tree by inserting `representatives` in the given order
pub fn build_hierarchy<T, S>(table: &T, representatives: &[S], root_label: &str) -> Tree
where
    T: AssociationLookup + ?Sized,
    S: AsRef<str>,
{
    let mut builder = HierarchyBuilder::new(table, root_label);
    for rep in representatives {
        builder.insert(rep.as_ref());
    }
    builder.finish()
}
