//! Path resolution over the flat node collection.
//!
//! Reconstructs the canonical slash-separated path of a node by walking
//! parent links to the root. Pure function, no caching: trees are tens to
//! low hundreds of nodes and correctness wins over micro-optimization.

use crate::tree::node::Node;
use crate::types::{NodeId, ROOT_ID};
use std::collections::HashSet;

/// Resolve the full relative path of `node` within `nodes`.
///
/// Returns `None` when any ancestor link is dangling, or when the parent
/// chain revisits a node. A dangling file must not block publishing the rest
/// of the project, so callers treat `None` as fatal for that file only.
pub fn resolve_path(node: &Node, nodes: &[Node]) -> Option<String> {
    let mut visited: HashSet<&NodeId> = HashSet::new();
    resolve_inner(node, nodes, &mut visited)
}

fn resolve_inner<'a>(
    node: &'a Node,
    nodes: &'a [Node],
    visited: &mut HashSet<&'a NodeId>,
) -> Option<String> {
    if !visited.insert(&node.id) {
        return None; // corrupt parent chain, bail instead of recursing forever
    }

    let parent_id = match &node.parent_id {
        None => return Some(node.name.clone()),
        Some(id) if id == ROOT_ID => return Some(node.name.clone()),
        Some(id) => id,
    };

    let parent = nodes.iter().find(|n| &n.id == parent_id)?;
    if parent.id == ROOT_ID {
        return Some(node.name.clone());
    }

    let parent_path = resolve_inner(parent, nodes, visited)?;
    Some(format!("{}/{}", parent_path, node.name))
}
