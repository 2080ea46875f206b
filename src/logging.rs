//! Logging System
//!
//! Structured logging via the `tracing` crate: configurable level, text or
//! json format, and stdout/stderr/file destinations. Environment variables
//! (`STUDIO_LOG`, `STUDIO_LOG_FORMAT`, `STUDIO_LOG_OUTPUT`,
//! `STUDIO_LOG_FILE`) override the configuration file.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format: json, text
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path when output is "file"; None means the platform default
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Colored output (text format, terminal destinations only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_true() -> bool {
    true
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
        }
    }
}

/// Resolve the log file path: `STUDIO_LOG_FILE` env, config file, default.
pub fn resolve_log_file_path(config_file: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    if let Ok(env_path) = std::env::var("STUDIO_LOG_FILE") {
        if !env_path.is_empty() {
            return Ok(PathBuf::from(env_path));
        }
    }
    if let Some(p) = config_file {
        if !p.as_os_str().is_empty() {
            return Ok(p);
        }
    }
    let project_dirs = directories::ProjectDirs::from("", "studio", "studio").ok_or_else(|| {
        ConfigError::Invalid("could not determine platform state directory for log file".to_string())
    })?;
    let state_dir = project_dirs
        .state_dir()
        .unwrap_or_else(|| project_dirs.data_dir())
        .to_path_buf();
    Ok(state_dir.join("studio.log"))
}

/// Initialize the logging system.
///
/// Priority, highest first: environment variables, configuration, defaults.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ConfigError> {
    if config.map(|c| !c.enabled).unwrap_or(false) {
        Registry::default().with(EnvFilter::new("off")).init();
        return Ok(());
    }

    let filter = build_env_filter(config);
    let format = std::env::var("STUDIO_LOG_FORMAT")
        .ok()
        .unwrap_or_else(|| config.map(|c| c.format.clone()).unwrap_or_else(default_format));
    let output = std::env::var("STUDIO_LOG_OUTPUT")
        .ok()
        .unwrap_or_else(|| config.map(|c| c.output.clone()).unwrap_or_else(default_output));
    let use_color = config.map(|c| c.color).unwrap_or(true);

    let (writer, ansi) = match output.as_str() {
        "stdout" => (BoxMakeWriter::new(std::io::stdout), use_color),
        "stderr" => (BoxMakeWriter::new(std::io::stderr), use_color),
        "file" => {
            let path = resolve_log_file_path(config.and_then(|c| c.file.clone()))?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ConfigError::Invalid(format!("failed to create log directory: {}", e))
                })?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| {
                    ConfigError::Invalid(format!("failed to open log file {:?}: {}", path, e))
                })?;
            (BoxMakeWriter::new(file), false)
        }
        "file+stderr" => {
            let path = resolve_log_file_path(config.and_then(|c| c.file.clone()))?;
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| {
                    ConfigError::Invalid(format!("failed to open log file {:?}: {}", path, e))
                })?;
            (BoxMakeWriter::new(file.and(std::io::stderr)), false)
        }
        other => {
            return Err(ConfigError::Invalid(format!(
                "invalid log output: {} (must be 'stdout', 'stderr', 'file', or 'file+stderr')",
                other
            )))
        }
    };

    let base = Registry::default().with(filter);
    match format.as_str() {
        "json" => base
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .init(),
        "text" => base
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .init(),
        other => {
            return Err(ConfigError::Invalid(format!(
                "invalid log format: {} (must be 'json' or 'text')",
                other
            )))
        }
    }
    Ok(())
}

fn build_env_filter(config: Option<&LoggingConfig>) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env("STUDIO_LOG") {
        return filter;
    }
    let level = config.map(|c| c.level.as_str()).unwrap_or("info");
    EnvFilter::new(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_logging_config() {
        let config = LoggingConfig::default();
        assert!(config.enabled);
        assert_eq!(config.level, "info");
        assert_eq!(config.format, "text");
        assert_eq!(config.output, "stderr");
        assert_eq!(config.file, None);
    }

    #[test]
    fn config_file_path_is_used_when_env_is_unset() {
        std::env::remove_var("STUDIO_LOG_FILE");
        let path = resolve_log_file_path(Some(PathBuf::from("/tmp/studio-test.log"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/studio-test.log"));
    }

    #[test]
    fn default_path_ends_with_crate_log_name() {
        std::env::remove_var("STUDIO_LOG_FILE");
        let path = resolve_log_file_path(None).unwrap();
        assert!(path.ends_with("studio.log"));
    }
}
