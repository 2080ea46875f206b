//! Error types for tree mutation, synchronization, and configuration.

use crate::types::NodeId;
use thiserror::Error;

/// Errors raised by structural mutation of the project tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("node {0} is not a folder")]
    NotAFolder(NodeId),

    #[error("node {0} is not a file")]
    NotAFile(NodeId),

    #[error("cannot move {0} into its own subtree")]
    CyclicMove(NodeId),

    #[error("the project root cannot be {0}")]
    RootImmutable(&'static str),

    #[error("project snapshot has no root node")]
    MissingRoot,
}

/// Errors raised by the publish pipeline.
///
/// The orchestrator is the sole translation point between raw transport
/// failures and this taxonomy; 401/403 responses are re-classified as
/// `AuthExpired` there so the caller can prompt re-authentication.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Recovered locally: presented to the user, no retry performed.
    #[error("{0}")]
    Validation(String),

    /// Repository existence or branch-head resolution failed unrecoverably.
    #[error("could not validate repository state: {0}")]
    RemoteState(String),

    /// Any 401/403 from the remote API.
    #[error("Auth expired. Please logout and login again.")]
    AuthExpired,

    /// Any other non-2xx response; message passed through when present.
    #[error("{message}")]
    RemoteApi { status: Option<u16>, message: String },

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl SyncError {
    /// HTTP status associated with this failure, when one exists.
    pub fn status(&self) -> Option<u16> {
        match self {
            SyncError::RemoteApi { status, .. } => *status,
            SyncError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether this failure is the authoritative auth-expiry signal.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, SyncError::AuthExpired) || matches!(self.status(), Some(401) | Some(403))
    }
}

/// Configuration and logging setup errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Invalid(String),

    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}
