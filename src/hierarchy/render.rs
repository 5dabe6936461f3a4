use super::tree::Tree;
use std::fmt::Write;

/// Options for the indented text form
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Emit the synthetic root as the first line
    pub emit_root: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { emit_root: true }
    }
}

/// Render a tree in preorder, one node per line
///
/// Each line is `<depth tabs>-name:frequency:childCount ` where depth is the
/// node's level minus one. Suppressing the root does not shift its children.
///
/// # Example
/// ```
/// use chronotree::hierarchy::{render_text, RenderOptions, Tree};
///
/// let mut tree = Tree::new("root");
/// let a = tree.attach(tree.root(), "a");
/// tree.attach(a, "b");
///
/// let text = render_text(&tree, RenderOptions::default());
/// assert_eq!(text, "-root:0:1 \n\t-a:0:1 \n\t\t-b:0:0 \n");
/// ```
pub fn render_text(tree: &Tree, options: RenderOptions) -> String {
    let mut out = String::new();
    for (id, depth) in tree.preorder() {
        if depth == 0 && !options.emit_root {
            continue;
        }
        let node = tree.node(id);
        for _ in 0..depth {
            out.push('\t');
        }
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "-{}:{}:{} ",
            node.name,
            node.frequency,
            node.children.len()
        );
    }
    out
}
