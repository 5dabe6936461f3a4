use serde::Serialize;

/// Sentinel name of the synthetic root
pub const DEFAULT_ROOT_LABEL: &str = "root";

/// Index of a node inside its [`Tree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

/// A node of the hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    /// Root is level 1, every child is one deeper than its parent
    pub level: u32,
    /// Reserved for weighting; always 0 today
    pub frequency: u64,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Append-only n-ary tree with a synthetic root
///
/// Nodes live in an arena in insertion order; each non-root node is owned by
/// exactly one parent and is never moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<TreeNode>,
}

impl Tree {
    pub fn new(root_label: &str) -> Self {
        Self {
            nodes: vec![TreeNode {
                name: root_label.to_string(),
                level: 1,
                frequency: 0,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    /// Append `name` as the last child of `parent`
    pub fn attach(&mut self, parent: NodeId, name: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        let level = self.nodes[parent.0].level + 1;
        self.nodes.push(TreeNode {
            name: name.to_string(),
            level,
            frequency: 0,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Non-root nodes in insertion order
    pub fn inserted(&self) -> impl Iterator<Item = (NodeId, &TreeNode)> {
        self.nodes
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, node)| (NodeId(i), node))
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.inserted()
            .find(|(_, node)| node.name == name)
            .map(|(id, _)| id)
    }

    pub fn parent_of(&self, name: &str) -> Option<&TreeNode> {
        let id = self.find(name)?;
        self.node(id).parent.map(|parent| self.node(parent))
    }

    /// Node ids in preorder, each with its depth (root = 0)
    pub fn preorder(&self) -> Vec<(NodeId, usize)> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(self.root(), 0usize)];
        while let Some((id, depth)) = stack.pop() {
            order.push((id, depth));
            for &child in self.node(id).children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        order
    }

    /// Number of nodes including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root exists
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }
}
