//! Sync Orchestrator
//!
//! Wraps payload construction and the remote publisher end to end, emits one
//! human-readable progress line per phase, and is the sole translation point
//! between raw remote failures and the error taxonomy: any 401/403 becomes
//! `AuthExpired` here, everything else propagates verbatim.

pub mod payload;

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::remote::{RemoteObjectApi, RemotePublisher};
use crate::tree::ProjectTree;
use tracing::info;

pub use payload::{build_payload, PublishEntry};

/// Successful publish result handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub repository_url: String,
    pub branch: String,
    pub pushed_at: chrono::DateTime<chrono::Utc>,
}

/// End-to-end publish workflow over a remote object API.
///
/// One logical workflow per invocation; the engine does not serialize
/// concurrent publishes of the same project, callers must.
pub struct SyncEngine<A: RemoteObjectApi> {
    api: A,
    config: SyncConfig,
}

impl<A: RemoteObjectApi> SyncEngine<A> {
    pub fn new(api: A, config: SyncConfig) -> Self {
        Self { api, config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Publish the current tree snapshot as one commit.
    ///
    /// `progress` receives live status text per phase so a UI can display it
    /// without coupling the engine to any UI type.
    pub async fn publish(
        &self,
        tree: &ProjectTree,
        progress: impl Fn(&str) + Send + Sync,
    ) -> Result<SyncOutcome, SyncError> {
        progress("Analyzing project structure...");
        let entries = build_payload(tree)?;
        progress(&format!("Preparing {} files for upload...", entries.len()));

        let publisher = RemotePublisher::new(&self.api, &self.config);
        let receipt = publisher
            .publish(&entries, &progress)
            .await
            .map_err(classify)?;

        info!(url = %receipt.repository_url, branch = %receipt.branch, "sync complete");
        progress("Successfully pushed to GitHub!");
        Ok(SyncOutcome {
            repository_url: receipt.repository_url,
            branch: receipt.branch,
            pushed_at: receipt.pushed_at,
        })
    }
}

/// Re-classify remote failures: 401/403 is the authoritative auth-expiry
/// signal regardless of the remote-supplied message text.
fn classify(err: SyncError) -> SyncError {
    if err.is_auth_error() {
        SyncError::AuthExpired
    } else {
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_status_becomes_auth_expired() {
        let err = classify(SyncError::RemoteApi {
            status: Some(403),
            message: "Must have admin rights".to_string(),
        });
        assert!(matches!(err, SyncError::AuthExpired));
    }

    #[test]
    fn unauthorized_status_becomes_auth_expired() {
        let err = classify(SyncError::RemoteApi {
            status: Some(401),
            message: "Bad credentials".to_string(),
        });
        assert!(matches!(err, SyncError::AuthExpired));
    }

    #[test]
    fn other_remote_errors_keep_their_message() {
        let err = classify(SyncError::RemoteApi {
            status: Some(422),
            message: "Validation Failed".to_string(),
        });
        match err {
            SyncError::RemoteApi { status, message } => {
                assert_eq!(status, Some(422));
                assert_eq!(message, "Validation Failed");
            }
            other => panic!("expected RemoteApi, got {:?}", other),
        }
    }
}
