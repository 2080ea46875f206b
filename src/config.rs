//! Configuration
//!
//! Layered configuration in the usual precedence order: defaults, optional
//! TOML file, `STUDIO__`-prefixed environment variables. The credential is
//! never written back out.

use crate::error::ConfigError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Conflict policy for the final branch-reference update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefUpdatePolicy {
    /// Last-writer-wins: overwrite the branch even when remote history
    /// diverged. The default, and the always-succeeds trade-off.
    ForceOverwrite,
    /// Plain ref update; a non-fast-forward is surfaced as a remote error.
    FailOnDivergence,
}

impl Default for RefUpdatePolicy {
    fn default() -> Self {
        RefUpdatePolicy::ForceOverwrite
    }
}

/// Publish pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Remote API base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Bearer credential; falls back to `STUDIO_GITHUB_TOKEN`.
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    /// Repository the project publishes into.
    #[serde(default = "default_repo_name")]
    pub repo_name: String,

    #[serde(default = "default_repo_description")]
    pub repo_description: String,

    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    /// Settling pause after repository creation (remote-side eventual
    /// consistency), milliseconds.
    #[serde(default = "default_settle_after_create_ms")]
    pub settle_after_create_ms: u64,

    /// Settling pause after the placeholder-file remediation, milliseconds.
    #[serde(default = "default_settle_after_init_ms")]
    pub settle_after_init_ms: u64,

    #[serde(default)]
    pub ref_update: RefUpdatePolicy,
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_repo_name() -> String {
    "studio-project".to_string()
}

fn default_repo_description() -> String {
    "Created with Studio".to_string()
}

fn default_commit_message() -> String {
    "Deployed via Studio".to_string()
}

fn default_settle_after_create_ms() -> u64 {
    4000
}

fn default_settle_after_init_ms() -> u64 {
    2000
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token: None,
            repo_name: default_repo_name(),
            repo_description: default_repo_description(),
            commit_message: default_commit_message(),
            settle_after_create_ms: default_settle_after_create_ms(),
            settle_after_init_ms: default_settle_after_init_ms(),
            ref_update: RefUpdatePolicy::default(),
        }
    }
}

impl SyncConfig {
    /// Resolve the credential: explicit config wins, then the environment.
    pub fn resolve_token(&self) -> Option<String> {
        self.token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var("STUDIO_GITHUB_TOKEN").ok().filter(|t| !t.is_empty()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repo_name.trim().is_empty() {
            return Err(ConfigError::Invalid("repo_name cannot be empty".to_string()));
        }
        if self.repo_name.contains('/') {
            return Err(ConfigError::Invalid(format!(
                "repo_name must be a bare name, got {}",
                self.repo_name
            )));
        }
        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "api_base must be an http(s) URL, got {}",
                self.api_base
            )));
        }
        Ok(())
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudioConfig {
    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StudioConfig {
    /// Load configuration, layering an optional file under `STUDIO__*`
    /// environment variables (e.g. `STUDIO__SYNC__REPO_NAME`).
    pub fn load(file: Option<&Path>) -> Result<StudioConfig, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix("STUDIO").separator("__"))
            .build()?;
        let loaded: StudioConfig = settings.try_deserialize()?;
        loaded.sync.validate()?;
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_mirror_the_publish_pipeline() {
        let config = SyncConfig::default();
        assert_eq!(config.api_base, "https://api.github.com");
        assert_eq!(config.repo_name, "studio-project");
        assert_eq!(config.settle_after_create_ms, 4000);
        assert_eq!(config.settle_after_init_ms, 2000);
        assert_eq!(config.ref_update, RefUpdatePolicy::ForceOverwrite);
    }

    #[test]
    fn validate_rejects_owner_qualified_repo_names() {
        let config = SyncConfig {
            repo_name: "owner/repo".to_string(),
            ..SyncConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_http_api_base() {
        let config = SyncConfig {
            api_base: "ftp://example.com".to_string(),
            ..SyncConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reads_a_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[sync]\nrepo_name = \"demo\"\nref_update = \"fail-on-divergence\"\n"
        )
        .unwrap();

        let loaded = StudioConfig::load(Some(file.path())).unwrap();
        assert_eq!(loaded.sync.repo_name, "demo");
        assert_eq!(loaded.sync.ref_update, RefUpdatePolicy::FailOnDivergence);
        // Untouched fields keep their defaults.
        assert_eq!(loaded.sync.settle_after_create_ms, 4000);
    }

    #[test]
    fn explicit_token_wins_over_environment() {
        let config = SyncConfig {
            token: Some("from-config".to_string()),
            ..SyncConfig::default()
        };
        assert_eq!(config.resolve_token().as_deref(), Some("from-config"));
    }
}
