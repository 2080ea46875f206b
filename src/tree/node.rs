//! Project tree node types and their persisted wire format.

use crate::tree::language::Language;
use crate::types::{NodeId, ROOT_ID};
use serde::{Deserialize, Serialize};

/// Node kind enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

/// One file or folder entry in the project tree.
///
/// Serializes to the snapshot format the surrounding application persists:
/// `{"id", "name", "type", "language"?, "content"?, "parentId", "isOpen"?}`.
/// `content` is present iff the node is a file; `isOpen` is presentation
/// state for folders only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub parent_id: Option<NodeId>,
    #[serde(rename = "isOpen", default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
}

impl Node {
    /// The root folder node carried by every project tree.
    pub fn root() -> Node {
        Node {
            id: ROOT_ID.to_string(),
            name: ROOT_ID.to_string(),
            kind: NodeKind::Folder,
            language: None,
            content: None,
            parent_id: None,
            expanded: Some(true),
        }
    }

    /// A new file node with the given content and an inferred language tag.
    pub fn file(id: NodeId, name: impl Into<String>, parent_id: NodeId, content: String) -> Node {
        let name = name.into();
        Node {
            id,
            language: Language::from_file_name(&name),
            name,
            kind: NodeKind::File,
            content: Some(content),
            parent_id: Some(parent_id),
            expanded: None,
        }
    }

    /// A new folder node, expanded by default.
    pub fn folder(id: NodeId, name: impl Into<String>, parent_id: NodeId) -> Node {
        Node {
            id,
            name: name.into(),
            kind: NodeKind::Folder,
            language: None,
            content: None,
            parent_id: Some(parent_id),
            expanded: Some(true),
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
