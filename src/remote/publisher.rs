//! Remote object publisher.
//!
//! Publishes a project snapshot as one atomic commit: ensure the repository
//! exists, resolve the branch head, upload every file as a blob (in
//! parallel), assemble one tree and one commit, then force-update the branch
//! reference. The remote API is non-transactional, so the sequence below is
//! the only ordering that leaves the branch either untouched or pointing at
//! a complete snapshot.

use crate::config::{RefUpdatePolicy, SyncConfig};
use crate::error::SyncError;
use crate::remote::{RemoteObjectApi, Repository, TreeEntry};
use crate::sync::payload::PublishEntry;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Placeholder written by the remediation fallback.
const INIT_FILE_PATH: &str = "README.md";
const INIT_FILE_CONTENT: &str = "# Studio Project";
const INIT_COMMIT_MESSAGE: &str = "Initial commit";

/// Result of a successful publish.
#[derive(Debug, Clone)]
pub struct PublishReceipt {
    pub repository_url: String,
    pub branch: String,
    pub commit_sha: String,
    pub file_count: usize,
    pub pushed_at: DateTime<Utc>,
}

/// Resolved remote state: the repository plus its branch head, if any.
struct RepoState {
    repo: Repository,
    branch: String,
    head: Option<String>,
}

/// Seven-phase publish state machine over a [`RemoteObjectApi`].
pub struct RemotePublisher<'a, A: RemoteObjectApi> {
    api: &'a A,
    config: &'a SyncConfig,
}

impl<'a, A: RemoteObjectApi> RemotePublisher<'a, A> {
    pub fn new(api: &'a A, config: &'a SyncConfig) -> Self {
        Self { api, config }
    }

    /// Run the full publish sequence for `entries`.
    ///
    /// Phases are strictly sequential except blob creation, which issues all
    /// uploads concurrently and waits for every one to settle. Each phase
    /// reports one human-readable line through `progress`.
    pub async fn publish(
        &self,
        entries: &[PublishEntry],
        progress: &(dyn Fn(&str) + Send + Sync),
    ) -> Result<PublishReceipt, SyncError> {
        progress("Connecting to GitHub...");
        let repo = self.ensure_repository(progress).await?;

        let state = self.resolve_state_with_remediation(repo).await?;
        info!(
            branch = %state.branch,
            head = state.head.as_deref().unwrap_or("<empty>"),
            "remote state resolved"
        );

        progress(&format!("Uploading {} files...", entries.len()));
        let tree_entries = self.upload_blobs(&state.repo, entries).await?;

        progress("Assembling tree...");
        let tree_sha = self.api.create_tree(&state.repo, &tree_entries).await?;

        progress("Finalizing commit...");
        let commit_sha = self
            .api
            .create_commit(
                &state.repo,
                &self.config.commit_message,
                &tree_sha,
                state.head.as_deref(),
            )
            .await?;

        progress(&format!("Updating branch {}...", state.branch));
        let force = matches!(self.config.ref_update, RefUpdatePolicy::ForceOverwrite);
        self.api
            .update_branch_ref(&state.repo, &state.branch, &commit_sha, force)
            .await?;

        info!(commit = %commit_sha, files = tree_entries.len(), "published snapshot");
        Ok(PublishReceipt {
            repository_url: state.repo.html_url,
            branch: state.branch,
            commit_sha,
            file_count: tree_entries.len(),
            pushed_at: Utc::now(),
        })
    }

    /// Phase 1: look the repository up, creating it when absent. A fresh
    /// repository needs a settling pause before its branch is visible.
    async fn ensure_repository(
        &self,
        progress: &(dyn Fn(&str) + Send + Sync),
    ) -> Result<Repository, SyncError> {
        if let Some(repo) = self.api.fetch_repository(&self.config.repo_name).await? {
            return Ok(repo);
        }
        progress("Creating repository...");
        let repo = self
            .api
            .create_repository(&self.config.repo_name, &self.config.repo_description)
            .await?;
        sleep(Duration::from_millis(self.config.settle_after_create_ms)).await;
        Ok(repo)
    }

    /// Phases 2–3: resolve branch + head, remediating once via the contents
    /// endpoint when the state cannot be determined at all.
    async fn resolve_state_with_remediation(
        &self,
        repo: Repository,
    ) -> Result<RepoState, SyncError> {
        match self.resolve_state().await? {
            Some(state) => Ok(state),
            None => {
                warn!("repository state unresolvable, writing placeholder file");
                self.api
                    .put_file(&repo, INIT_FILE_PATH, INIT_COMMIT_MESSAGE, INIT_FILE_CONTENT)
                    .await?;
                sleep(Duration::from_millis(self.config.settle_after_init_ms)).await;
                self.resolve_state().await?.ok_or_else(|| {
                    SyncError::RemoteState(
                        "branch lookup failed after initialization; check repository permissions"
                            .to_string(),
                    )
                })
            }
        }
    }

    /// One state-resolution attempt. `Ok(None)` means the state could not be
    /// determined (distinct from a resolved-but-empty repository, which
    /// yields `head: None`). Auth failures are never swallowed.
    async fn resolve_state(&self) -> Result<Option<RepoState>, SyncError> {
        // Re-fetch: the default branch of a just-created repository may only
        // settle after auto-init.
        let repo = match self.api.fetch_repository(&self.config.repo_name).await {
            Ok(Some(repo)) => repo,
            Ok(None) => return Ok(None),
            Err(err) if err.is_auth_error() => return Err(err),
            Err(err) => {
                warn!(error = %err, "repository lookup failed");
                return Ok(None);
            }
        };
        let branch = repo.default_branch.clone();
        match self.api.branch_head(&repo, &branch).await {
            Ok(head) => Ok(Some(RepoState { repo, branch, head })),
            Err(err) if err.is_auth_error() => Err(err),
            Err(err) => {
                warn!(error = %err, "branch head lookup failed");
                Ok(None)
            }
        }
    }

    /// Phase 4: upload every entry as a blob, all at once. An individual
    /// failure drops that entry from the batch; only a fully failed batch
    /// aborts the publish.
    async fn upload_blobs(
        &self,
        repo: &Repository,
        entries: &[PublishEntry],
    ) -> Result<Vec<TreeEntry>, SyncError> {
        let uploads = entries.iter().map(|entry| {
            async move {
                match self.api.create_blob(repo, &entry.content).await {
                    Ok(sha) => Some(TreeEntry::blob(entry.path.clone(), sha)),
                    Err(err) => {
                        warn!(path = %entry.path, error = %err, "blob upload failed");
                        None
                    }
                }
            }
        });

        let survivors: Vec<TreeEntry> = join_all(uploads).await.into_iter().flatten().collect();
        if survivors.is_empty() {
            return Err(SyncError::Validation("No valid files to push".to_string()));
        }
        if survivors.len() < entries.len() {
            warn!(
                failed = entries.len() - survivors.len(),
                total = entries.len(),
                "continuing without failed blob uploads"
            );
        }
        Ok(survivors)
    }
}
