//! Two-phase generated files.
//!
//! AI-generated files are created in two steps: a placeholder node is
//! inserted immediately so the tree can show the entry, then the content is
//! filled in place once generation arrives. The registry hands out a oneshot
//! ticket per node id so a subscriber can await completion instead of
//! polling the tree.

use crate::error::TreeError;
use crate::tree::{Node, ProjectTree};
use crate::types::NodeId;
use parking_lot::Mutex;
use std::collections::HashMap;
use tokio::sync::oneshot;
use tracing::debug;
use uuid::Uuid;

/// Placeholder banner shown while generation is in flight.
///
/// The comment leader is picked from the extension so the placeholder is
/// valid-ish source in the target language.
pub fn placeholder_content(name: &str, description: &str) -> String {
    let ext = name
        .rsplit('.')
        .next()
        .filter(|e| *e != name)
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    let leader = match ext.as_str() {
        "html" | "xml" | "md" => "<!--",
        "py" | "sh" | "yaml" | "yml" => "#",
        _ => "//",
    };
    format!(
        "{leader} Generating content for \"{name}\"...\n{leader} Description: {description}"
    )
}

/// A pending generation bound to a node id.
pub struct GenerationTicket {
    pub node_id: NodeId,
    rx: oneshot::Receiver<String>,
}

impl GenerationTicket {
    /// Wait for the generated content. `None` when the request was abandoned
    /// (typically because the node was deleted first).
    pub async fn ready(self) -> Option<String> {
        self.rx.await.ok()
    }
}

/// Registry of in-flight generation requests.
#[derive(Default)]
pub struct PendingGenerations {
    waiting: Mutex<HashMap<NodeId, oneshot::Sender<String>>>,
}

impl PendingGenerations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase one: insert a placeholder file and register a completion channel.
    pub fn begin(
        &self,
        tree: &mut ProjectTree,
        name: impl Into<String>,
        description: &str,
        parent_id: &str,
    ) -> Result<GenerationTicket, TreeError> {
        let name = name.into();
        let id = Uuid::new_v4().to_string();
        let node = Node::file(
            id.clone(),
            name.clone(),
            parent_id.to_string(),
            placeholder_content(&name, description),
        );
        tree.insert(node)?;

        let (tx, rx) = oneshot::channel();
        self.waiting.lock().insert(id.clone(), tx);
        debug!(node = %id, "generation pending for {}", name);
        Ok(GenerationTicket { node_id: id, rx })
    }

    /// Phase two: write the generated content in place and resolve the ticket.
    pub fn complete(
        &self,
        tree: &mut ProjectTree,
        id: &str,
        content: String,
    ) -> Result<(), TreeError> {
        tree.set_content(id, content.clone())?;
        if let Some(tx) = self.waiting.lock().remove(id) {
            // A dropped receiver just means nobody was listening.
            let _ = tx.send(content);
        }
        Ok(())
    }

    /// Drop a pending request, resolving its ticket with `None`. Called when
    /// the node is deleted before generation finishes.
    pub fn abandon(&self, id: &str) {
        self.waiting.lock().remove(id);
    }

    /// Abandon every request whose node id appears in `removed`, matching a
    /// cascade delete.
    pub fn abandon_all(&self, removed: &[NodeId]) {
        let mut waiting = self.waiting.lock();
        for id in removed {
            waiting.remove(id);
        }
    }
}
