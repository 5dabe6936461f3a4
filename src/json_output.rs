//! JSON output format for line hierarchies
//!
//! One [`JsonLineRecord`] per input line, written as JSON Lines.

use crate::error::ChronoTreeError;
use crate::hierarchy::{NodeId, Tree};
use crate::pipeline::LineHierarchy;
use serde::Serialize;

/// A node with its subtree
#[derive(Debug, Clone, Serialize)]
pub struct JsonTreeNode {
    pub name: String,
    pub level: u32,
    pub frequency: u64,
    pub children: Vec<JsonTreeNode>,
}

impl JsonTreeNode {
    pub fn from_tree(tree: &Tree) -> Self {
        Self::from_node(tree, tree.root())
    }

    fn from_node(tree: &Tree, id: NodeId) -> Self {
        let node = tree.node(id);
        Self {
            name: node.name.clone(),
            level: node.level,
            frequency: node.frequency,
            children: node
                .children
                .iter()
                .map(|&child| Self::from_node(tree, child))
                .collect(),
        }
    }
}

/// A cluster as reported in JSON
#[derive(Debug, Clone, Serialize)]
pub struct JsonCluster {
    pub id: u32,
    pub representative: String,
    pub members: Vec<String>,
}

/// Output record for one input line
#[derive(Debug, Clone, Serialize)]
pub struct JsonLineRecord {
    /// 1-based input line number
    pub line: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub clusters: Vec<JsonCluster>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<JsonTreeNode>,
    /// Failure message when the line could not be processed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JsonLineRecord {
    pub fn from_hierarchy(hierarchy: &LineHierarchy) -> Self {
        let clusters = hierarchy
            .clustering
            .clusters()
            .iter()
            .map(|cluster| JsonCluster {
                id: cluster.id(),
                representative: cluster.representative().to_string(),
                members: cluster.members().to_vec(),
            })
            .collect();

        Self {
            line: hierarchy.line,
            clusters,
            tree: Some(JsonTreeNode::from_tree(&hierarchy.tree)),
            error: None,
        }
    }

    pub fn from_outcome(
        line: usize,
        outcome: &std::result::Result<LineHierarchy, ChronoTreeError>,
    ) -> Self {
        match outcome {
            Ok(hierarchy) => Self::from_hierarchy(hierarchy),
            Err(err) => Self {
                line,
                clusters: Vec::new(),
                tree: None,
                error: Some(err.to_string()),
            },
        }
    }
}
