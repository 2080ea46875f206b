//! Project Tree
//!
//! The flat, parent-linked node collection that is the single source of
//! truth for the virtual project, plus the mutation operations over it.
//! All structural edits go through `ProjectTree` so the tree invariants
//! (single root, acyclic parent graph, cascade deletion) hold everywhere.

pub mod language;
pub mod node;
pub mod path;
pub mod pending;

use crate::error::TreeError;
use crate::types::{NodeId, ROOT_ID};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

pub use language::Language;
pub use node::{Node, NodeKind};
pub use path::resolve_path;

/// The project tree: a flat collection of nodes linked by parent ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectTree {
    nodes: Vec<Node>,
}

impl Default for ProjectTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectTree {
    /// An empty project: just the root folder.
    pub fn new() -> Self {
        ProjectTree {
            nodes: vec![Node::root()],
        }
    }

    /// Build a tree from a persisted snapshot.
    ///
    /// The snapshot must carry exactly one root (a node with a null parent).
    pub fn from_nodes(nodes: Vec<Node>) -> Result<Self, TreeError> {
        match nodes.iter().filter(|n| n.is_root()).count() {
            1 => Ok(ProjectTree { nodes }),
            _ => Err(TreeError::MissingRoot),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Canonical slash-separated path of a node, or `None` when a parent
    /// link dangles.
    pub fn path_of(&self, id: &str) -> Option<String> {
        let node = self.get(id)?;
        resolve_path(node, &self.nodes)
    }

    /// Create a file or folder under `parent_id` and return its id.
    ///
    /// Siblings are re-sorted afterwards: folders before files, names in
    /// case-sensitive order within each group. Callers depend on this
    /// ordering for presentation.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        kind: NodeKind,
        parent_id: &str,
    ) -> Result<NodeId, TreeError> {
        self.require_folder(parent_id)?;
        let id = Uuid::new_v4().to_string();
        let node = match kind {
            NodeKind::File => Node::file(id.clone(), name, parent_id.to_string(), String::new()),
            NodeKind::Folder => Node::folder(id.clone(), name, parent_id.to_string()),
        };
        debug!(node = %id, parent = %parent_id, "create {:?} {}", kind, node.name);
        self.nodes.push(node);
        self.resort();
        Ok(id)
    }

    /// Insert a pre-built node (used by the two-phase generated-file flow).
    pub(crate) fn insert(&mut self, node: Node) -> Result<NodeId, TreeError> {
        let parent_id = node.parent_id.clone().ok_or(TreeError::MissingRoot)?;
        self.require_folder(&parent_id)?;
        let id = node.id.clone();
        self.nodes.push(node);
        self.resort();
        Ok(id)
    }

    /// Rename a node. Does not re-sort siblings; list order tracking renames
    /// is a caller decision via [`ProjectTree::resort`].
    pub fn rename(&mut self, id: &str, new_name: impl Into<String>) -> Result<(), TreeError> {
        let node = self
            .get_mut(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))?;
        if node.is_root() {
            return Err(TreeError::RootImmutable("renamed"));
        }
        node.name = new_name.into();
        if node.is_file() {
            node.language = Language::from_file_name(&node.name);
        }
        Ok(())
    }

    /// Replace the content of a file node.
    pub fn set_content(&mut self, id: &str, content: impl Into<String>) -> Result<(), TreeError> {
        let node = self
            .get_mut(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))?;
        if !node.is_file() {
            return Err(TreeError::NotAFile(id.to_string()));
        }
        node.content = Some(content.into());
        Ok(())
    }

    /// Reparent a node (drag-and-drop move).
    ///
    /// `move_node(id, id)` is a no-op. Moving a node into its own subtree is
    /// rejected: the flat collection has no built-in cycle protection, so the
    /// check lives here.
    pub fn move_node(&mut self, id: &str, new_parent_id: &str) -> Result<(), TreeError> {
        if id == new_parent_id {
            return Ok(());
        }
        let node = self
            .get(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))?;
        if node.is_root() {
            return Err(TreeError::RootImmutable("moved"));
        }
        self.require_folder(new_parent_id)?;
        if self.is_descendant(new_parent_id, id) {
            return Err(TreeError::CyclicMove(id.to_string()));
        }
        debug!(node = %id, new_parent = %new_parent_id, "move");
        let node = self
            .get_mut(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))?;
        node.parent_id = Some(new_parent_id.to_string());
        Ok(())
    }

    /// Delete a node and its whole subtree.
    ///
    /// Returns every removed id, deleted node first, so the caller can close
    /// any editor view bound to a removed node.
    pub fn delete(&mut self, id: &str) -> Result<Vec<NodeId>, TreeError> {
        let node = self
            .get(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))?;
        if node.is_root() {
            return Err(TreeError::RootImmutable("deleted"));
        }
        let mut removed = vec![id.to_string()];
        removed.extend(self.descendants(id));
        self.nodes.retain(|n| !removed.contains(&n.id));
        debug!(node = %id, count = removed.len(), "delete subtree");
        Ok(removed)
    }

    /// Flip a folder's expanded state. No structural effect.
    pub fn toggle_folder(&mut self, id: &str) -> Result<(), TreeError> {
        let node = self
            .get_mut(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))?;
        if !node.is_folder() {
            return Err(TreeError::NotAFolder(id.to_string()));
        }
        node.expanded = Some(!node.expanded.unwrap_or(false));
        Ok(())
    }

    /// All ids in the subtree below `id`, in discovery order.
    pub fn descendants(&self, id: &str) -> Vec<NodeId> {
        let mut result: Vec<NodeId> = Vec::new();
        let mut queue: Vec<NodeId> = vec![id.to_string()];
        while let Some(current) = queue.pop() {
            for node in &self.nodes {
                if node.parent_id.as_deref() == Some(current.as_str()) {
                    result.push(node.id.clone());
                    queue.push(node.id.clone());
                }
            }
        }
        result
    }

    /// Whether `candidate` sits in the subtree below `ancestor`.
    fn is_descendant(&self, candidate: &str, ancestor: &str) -> bool {
        let mut current = self.get(candidate).and_then(|n| n.parent_id.clone());
        let mut hops = 0usize;
        while let Some(parent_id) = current {
            if parent_id == ancestor {
                return true;
            }
            hops += 1;
            if hops > self.nodes.len() {
                return true; // corrupt chain, refuse the move
            }
            current = self.get(&parent_id).and_then(|n| n.parent_id.clone());
        }
        false
    }

    /// Re-apply the presentation ordering: folders first, then files, each
    /// group in case-sensitive name order.
    pub fn resort(&mut self) {
        self.nodes.sort_by(|a, b| {
            if a.kind == b.kind {
                a.name.cmp(&b.name)
            } else if a.is_folder() {
                std::cmp::Ordering::Less
            } else {
                std::cmp::Ordering::Greater
            }
        });
    }

    fn require_folder(&self, id: &str) -> Result<(), TreeError> {
        let node = self
            .get(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))?;
        if !node.is_folder() {
            return Err(TreeError::NotAFolder(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_tree() -> (ProjectTree, NodeId, NodeId) {
        let mut tree = ProjectTree::new();
        let src = tree.create("src", NodeKind::Folder, ROOT_ID).unwrap();
        let file = tree.create("main.py", NodeKind::File, &src).unwrap();
        (tree, src, file)
    }

    #[test]
    fn new_tree_has_only_the_root() {
        let tree = ProjectTree::new();
        assert_eq!(tree.len(), 1);
        assert!(tree.get(ROOT_ID).unwrap().is_root());
    }

    #[test]
    fn from_nodes_requires_exactly_one_root() {
        assert!(matches!(
            ProjectTree::from_nodes(vec![]),
            Err(TreeError::MissingRoot)
        ));
        let two_roots = vec![Node::root(), {
            let mut n = Node::root();
            n.id = "root2".to_string();
            n
        }];
        assert!(matches!(
            ProjectTree::from_nodes(two_roots),
            Err(TreeError::MissingRoot)
        ));
    }

    #[test]
    fn create_sorts_folders_before_files_and_names_within_groups() {
        let mut tree = ProjectTree::new();
        tree.create("zeta.txt", NodeKind::File, ROOT_ID).unwrap();
        tree.create("alpha", NodeKind::Folder, ROOT_ID).unwrap();
        tree.create("Beta.txt", NodeKind::File, ROOT_ID).unwrap();
        tree.create("omega", NodeKind::Folder, ROOT_ID).unwrap();

        let names: Vec<&str> = tree
            .nodes()
            .iter()
            .filter(|n| n.parent_id.as_deref() == Some(ROOT_ID))
            .map(|n| n.name.as_str())
            .collect();
        // Mixed case: 'B' < 'z' in case-sensitive order.
        assert_eq!(names, vec!["alpha", "omega", "Beta.txt", "zeta.txt"]);
    }

    #[test]
    fn create_rejects_a_file_parent() {
        let (mut tree, _, file) = sample_tree();
        let err = tree.create("child.txt", NodeKind::File, &file).unwrap_err();
        assert!(matches!(err, TreeError::NotAFolder(_)));
    }

    #[test]
    fn rename_updates_name_and_language_but_not_order() {
        let mut tree = ProjectTree::new();
        let a = tree.create("a.txt", NodeKind::File, ROOT_ID).unwrap();
        tree.create("b.txt", NodeKind::File, ROOT_ID).unwrap();

        tree.rename(&a, "z.py").unwrap();
        let node = tree.get(&a).unwrap();
        assert_eq!(node.name, "z.py");
        assert_eq!(node.language, Some(Language::Python));

        // Rename intentionally leaves position untouched.
        let files: Vec<&str> = tree
            .nodes()
            .iter()
            .filter(|n| n.is_file())
            .map(|n| n.name.as_str())
            .collect();
        assert_eq!(files, vec!["z.py", "b.txt"]);
    }

    #[test]
    fn root_cannot_be_renamed_moved_or_deleted() {
        let (mut tree, src, _) = sample_tree();
        assert!(matches!(
            tree.rename(ROOT_ID, "x"),
            Err(TreeError::RootImmutable("renamed"))
        ));
        assert!(matches!(
            tree.move_node(ROOT_ID, &src),
            Err(TreeError::RootImmutable("moved"))
        ));
        assert!(matches!(
            tree.delete(ROOT_ID),
            Err(TreeError::RootImmutable("deleted"))
        ));
    }

    #[test]
    fn move_to_self_is_a_noop() {
        let (mut tree, src, _) = sample_tree();
        let before = tree.nodes().to_vec();
        tree.move_node(&src, &src).unwrap();
        assert_eq!(tree.nodes(), before.as_slice());
    }

    #[test]
    fn move_into_own_descendant_is_rejected() {
        let mut tree = ProjectTree::new();
        let a = tree.create("a", NodeKind::Folder, ROOT_ID).unwrap();
        let b = tree.create("b", NodeKind::Folder, &a).unwrap();
        let c = tree.create("c", NodeKind::Folder, &b).unwrap();

        let err = tree.move_node(&a, &c).unwrap_err();
        assert_eq!(err, TreeError::CyclicMove(a.clone()));
        // Tree unchanged.
        assert_eq!(tree.get(&a).unwrap().parent_id.as_deref(), Some(ROOT_ID));
    }

    #[test]
    fn move_reparents_and_paths_follow() {
        let mut tree = ProjectTree::new();
        let src = tree.create("src", NodeKind::Folder, ROOT_ID).unwrap();
        let file = tree.create("util.rs", NodeKind::File, ROOT_ID).unwrap();

        tree.move_node(&file, &src).unwrap();
        assert_eq!(tree.path_of(&file).as_deref(), Some("src/util.rs"));
    }

    #[test]
    fn delete_cascades_to_descendants() {
        let mut tree = ProjectTree::new();
        let src = tree.create("src", NodeKind::Folder, ROOT_ID).unwrap();
        let sub = tree.create("sub", NodeKind::Folder, &src).unwrap();
        let f1 = tree.create("a.rs", NodeKind::File, &src).unwrap();
        let f2 = tree.create("b.rs", NodeKind::File, &sub).unwrap();
        let keep = tree.create("keep.md", NodeKind::File, ROOT_ID).unwrap();

        let removed = tree.delete(&src).unwrap();
        assert_eq!(removed.len(), 4);
        for id in [&src, &sub, &f1, &f2] {
            assert!(removed.contains(id));
            assert!(tree.get(id).is_none());
        }
        assert!(tree.get(&keep).is_some());
        // No orphans left behind.
        for node in tree.nodes() {
            if let Some(parent) = &node.parent_id {
                assert!(tree.get(parent).is_some(), "orphan: {}", node.name);
            }
        }
    }

    #[test]
    fn toggle_folder_flips_presentation_state_only() {
        let (mut tree, src, file) = sample_tree();
        assert_eq!(tree.get(&src).unwrap().expanded, Some(true));
        tree.toggle_folder(&src).unwrap();
        assert_eq!(tree.get(&src).unwrap().expanded, Some(false));
        assert!(matches!(
            tree.toggle_folder(&file),
            Err(TreeError::NotAFolder(_))
        ));
    }

    #[test]
    fn set_content_is_files_only() {
        let (mut tree, src, file) = sample_tree();
        tree.set_content(&file, "print('hello')").unwrap();
        assert_eq!(
            tree.get(&file).unwrap().content.as_deref(),
            Some("print('hello')")
        );
        assert!(matches!(
            tree.set_content(&src, "x"),
            Err(TreeError::NotAFile(_))
        ));
    }

    #[test]
    fn snapshot_round_trips_through_serde() {
        let (tree, _, _) = sample_tree();
        let json = serde_json::to_string(&tree).unwrap();
        // Transparent: the snapshot is a bare array of nodes.
        assert!(json.starts_with('['));
        let back: ProjectTree = serde_json::from_str(&json).unwrap();
        assert_eq!(back.nodes(), tree.nodes());
    }

    proptest! {
        #[test]
        fn ordering_invariant_holds_after_any_creates(
            names in proptest::collection::vec("[a-zA-Z][a-zA-Z0-9]{0,8}", 1..20),
            kinds in proptest::collection::vec(any::<bool>(), 1..20),
        ) {
            let mut tree = ProjectTree::new();
            for (name, is_folder) in names.iter().zip(kinds.iter()) {
                let kind = if *is_folder { NodeKind::Folder } else { NodeKind::File };
                tree.create(name.clone(), kind, ROOT_ID).unwrap();
            }
            // Past the first folder-to-file transition no folder appears.
            let kinds: Vec<NodeKind> = tree.nodes().iter().map(|n| n.kind).collect();
            let first_file = kinds.iter().position(|k| *k == NodeKind::File);
            if let Some(idx) = first_file {
                prop_assert!(kinds[idx..].iter().all(|k| *k == NodeKind::File));
            }
            // Names sorted within each kind group.
            for group in [NodeKind::Folder, NodeKind::File] {
                let names: Vec<&String> = tree
                    .nodes()
                    .iter()
                    .filter(|n| n.kind == group && !n.is_root())
                    .map(|n| &n.name)
                    .collect();
                let mut sorted = names.clone();
                sorted.sort();
                prop_assert_eq!(names, sorted);
            }
        }

        #[test]
        fn moves_never_create_cycles(ops in proptest::collection::vec((0usize..8, 0usize..8), 1..40)) {
            let mut tree = ProjectTree::new();
            let mut folders = vec![ROOT_ID.to_string()];
            for i in 0..7 {
                let parent = folders[i % folders.len()].clone();
                let id = tree.create(format!("d{}", i), NodeKind::Folder, &parent).unwrap();
                folders.push(id);
            }
            for (a, b) in ops {
                let id = folders[a % folders.len()].clone();
                let target = folders[b % folders.len()].clone();
                let _ = tree.move_node(&id, &target);
                // Every node must still resolve to a path from the root.
                for node in tree.nodes() {
                    prop_assert!(resolve_path(node, tree.nodes()).is_some());
                }
            }
        }
    }
}
