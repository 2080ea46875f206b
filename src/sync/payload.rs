//! Sync payload construction.
//!
//! Flattens the project tree into the `{path, content}` sequence the
//! publisher uploads. Dangling files are dropped, never fatal; an empty
//! result is.

use crate::error::SyncError;
use crate::tree::{resolve_path, ProjectTree};
use tracing::warn;

/// One publishable file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishEntry {
    pub path: String,
    pub content: String,
}

/// Build the publishable file set for `tree`.
///
/// Includes every named file node with content (empty string counts),
/// resolved to its canonical path with any leading slashes stripped, since
/// the remote API rejects leading-slash paths. Name-less files and files
/// whose parent chain dangles are skipped so one broken entry cannot block
/// the whole project; an empty path never reaches the remote.
pub fn build_payload(tree: &ProjectTree) -> Result<Vec<PublishEntry>, SyncError> {
    let candidates: Vec<_> = tree
        .nodes()
        .iter()
        .filter(|n| n.is_file() && !n.name.is_empty() && n.content.is_some())
        .collect();

    if candidates.is_empty() {
        return Err(SyncError::Validation(
            "Project is empty. Create some files before pushing.".to_string(),
        ));
    }

    let mut entries = Vec::with_capacity(candidates.len());
    for node in candidates {
        match resolve_path(node, tree.nodes()) {
            Some(path) if !path.trim_start_matches('/').is_empty() => {
                entries.push(PublishEntry {
                    path: path.trim_start_matches('/').to_string(),
                    content: node.content.clone().unwrap_or_default(),
                })
            }
            _ => warn!(node = %node.id, name = %node.name, "skipping unresolvable file"),
        }
    }

    if entries.is_empty() {
        return Err(SyncError::Validation(
            "Failed to resolve file paths. Check project structure.".to_string(),
        ));
    }
    Ok(entries)
}
