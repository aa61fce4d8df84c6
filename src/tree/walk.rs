//! Depth-first traversal of a bookmark tree.

use super::model::Node;

/// Visit every node below `root` in depth-first pre-order.
///
/// Traversal starts from each top-level child of `root`; the root itself is
/// not part of the output. Nodes are never modified, and a node whose
/// `children` is absent or empty simply ends that branch.
///
/// # Example
///
/// ```
/// use markdupe::tree::{walk, Node};
///
/// let root = Node::folder("1", "Bar")
///     .with_child(Node::folder("2", "Dev").with_child(Node::bookmark("3", "http://a.com")))
///     .with_child(Node::bookmark("4", "http://b.com"));
///
/// let ids: Vec<&str> = walk(&root).iter().map(|n| n.id.as_str()).collect();
/// assert_eq!(ids, ["2", "3", "4"]);
/// ```
#[must_use]
pub fn walk(root: &Node) -> Vec<&Node> {
    let mut visited = Vec::new();
    for child in root.children() {
        visit(child, &mut visited);
    }
    visited
}

fn visit<'a>(node: &'a Node, visited: &mut Vec<&'a Node>) {
    visited.push(node);
    for child in node.children() {
        visit(child, visited);
    }
}

/// All folders of a root container: the root itself followed by every
/// nested folder in pre-order.
#[must_use]
pub fn folders(root: &Node) -> Vec<&Node> {
    std::iter::once(root)
        .chain(walk(root).into_iter().filter(|node| node.is_container()))
        .collect()
}

/// Ids of every non-folder node below `root`, in pre-order.
#[must_use]
pub fn leaf_ids(root: &Node) -> Vec<&str> {
    walk(root)
        .into_iter()
        .filter(|node| !node.is_container())
        .map(|node| node.id.as_str())
        .collect()
}
