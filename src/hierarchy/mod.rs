// Association-driven hierarchy over cluster representatives
//
// Representatives are inserted in chronological order. Each one attaches to
// the existing node with the strictly highest pairwise association count,
// falling back to the synthetic root when nothing beats its own singleton
// count. Iterating candidates in insertion order makes the first-inserted
// maximum win ties, which keeps trees reproducible.

mod builder;
mod render;
mod tree;

pub use builder::{build_hierarchy, HierarchyBuilder};
pub use render::{render_text, RenderOptions};
pub use tree::{NodeId, Tree, TreeNode, DEFAULT_ROOT_LABEL};
