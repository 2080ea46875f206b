//! Remote git-hosting object API.
//!
//! The publisher talks to the hosting service through [`RemoteObjectApi`],
//! a seam over the low-level REST endpoints: repository lookup/create,
//! branch reference read/patch, blob/tree/commit object create, and the
//! simple contents PUT used only as a fallback. The real implementation is
//! [`github::GitHubClient`]; tests drive the pipeline with in-memory fakes.

pub mod github;
pub mod publisher;

use crate::error::SyncError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use github::GitHubClient;
pub use publisher::{PublishReceipt, RemotePublisher};

/// Regular (non-executable) file blob. The only file mode this system writes.
pub const BLOB_MODE: &str = "100644";

/// Remote repository coordinates, as returned by the hosting service.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    pub default_branch: String,
    pub html_url: String,
}

/// One entry of a tree object: a path bound to an uploaded blob.
#[derive(Debug, Clone, Serialize)]
pub struct TreeEntry {
    pub path: String,
    pub mode: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub sha: String,
}

impl TreeEntry {
    /// A regular file blob entry.
    pub fn blob(path: impl Into<String>, sha: impl Into<String>) -> TreeEntry {
        TreeEntry {
            path: path.into(),
            mode: BLOB_MODE.to_string(),
            kind: "blob".to_string(),
            sha: sha.into(),
        }
    }
}

/// Low-level object API of the git-hosting service.
///
/// Blobs, trees and commits are immutable content-addressed objects; the
/// branch reference is the only mutable piece of state.
#[async_trait]
pub trait RemoteObjectApi: Send + Sync {
    /// Look up a repository by name under the authenticated account.
    /// `Ok(None)` when it does not exist.
    async fn fetch_repository(&self, name: &str) -> Result<Option<Repository>, SyncError>;

    /// Create an auto-initialized repository (an initializing commit makes
    /// the subsequent branch lookup possible).
    async fn create_repository(
        &self,
        name: &str,
        description: &str,
    ) -> Result<Repository, SyncError>;

    /// Head commit SHA of a branch. `Ok(None)` when the service reports the
    /// reference missing or conflicted, which is how an empty repository
    /// presents itself.
    async fn branch_head(
        &self,
        repo: &Repository,
        branch: &str,
    ) -> Result<Option<String>, SyncError>;

    /// Simple contents PUT. Fallback only: forces a branch into existence on
    /// a repository whose state cannot be resolved.
    async fn put_file(
        &self,
        repo: &Repository,
        path: &str,
        message: &str,
        content: &str,
    ) -> Result<(), SyncError>;

    /// Upload file content as a new blob object, returning its SHA.
    async fn create_blob(&self, repo: &Repository, content: &str) -> Result<String, SyncError>;

    /// Create a tree object referencing the given blob entries.
    async fn create_tree(
        &self,
        repo: &Repository,
        entries: &[TreeEntry],
    ) -> Result<String, SyncError>;

    /// Create a commit pointing at `tree_sha`, with `parent` as sole parent
    /// (no parents on an empty repository).
    async fn create_commit(
        &self,
        repo: &Repository,
        message: &str,
        tree_sha: &str,
        parent: Option<&str>,
    ) -> Result<String, SyncError>;

    /// Point the branch reference at `sha`. With `force` set this is a
    /// last-writer-wins update that discards divergent remote history.
    async fn update_branch_ref(
        &self,
        repo: &Repository,
        branch: &str,
        sha: &str,
        force: bool,
    ) -> Result<(), SyncError>;
}
