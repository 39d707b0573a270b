//! Error types for local-cache
//!
//! All modules use `CacheResult<T>` as their return type. The cache engine
//! never returns these to its callers; it logs them and reports a miss or a
//! failed save instead. Only the CLI layer lets them abort the process.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for local-cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// All errors that can occur in local-cache
#[derive(Error, Debug)]
pub enum CacheError {
    // Input errors
    #[error("Input required and not supplied: {0}")]
    MissingInput(&'static str),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    // Cache errors
    #[error("Failed to create cache directory {path}: {source}")]
    CacheDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to restore cache entry. Exiting as fail-on-cache-miss is set. Input key: {key}")]
    CacheMiss { key: String },

    // Codec errors
    #[error("Required tool not found: {name}")]
    ToolNotFound { name: String },

    #[error("Archive not found: {0}")]
    ArchiveNotFound(PathBuf),

    #[error("Archive command failed: {command}, exit code: {code:?}, stderr: {stderr}")]
    ArchiveCommand {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CacheError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error, distinguishing a missing binary
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        let command = command.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            let name = command
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_string();
            return Self::ToolNotFound { name };
        }
        Self::CommandFailed { command, source }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingInput(_) => Some("Pass --key and --path, or set INPUT_KEY and INPUT_PATH"),
            Self::ToolNotFound { .. } => {
                Some("Install tar and zstd on the runner, e.g.: apt-get install -y tar zstd")
            }
            Self::CacheDirCreate { .. } => {
                Some("Set RUNNER_TOOL_CACHE or [cache] dir to a writable directory")
            }
            _ => None,
        }
    }
}
