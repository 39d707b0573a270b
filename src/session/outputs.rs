//! Step outputs published back to the pipeline runner

use crate::error::{CacheError, CacheResult};
use std::env;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

/// Output names
pub mod names {
    /// `"true"` only for an exact primary-key match
    pub const CACHE_HIT: &str = "cache-hit";
    /// Echo of the primary key input
    pub const CACHE_PRIMARY_KEY: &str = "cache-primary-key";
    /// Key that matched, empty on a miss
    pub const CACHE_MATCHED_KEY: &str = "cache-matched-key";
}

/// Destination for step outputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    /// Append `name=value` lines to the runner's output file
    GithubOutput(PathBuf),
    /// Print `name=value` lines on stdout
    Stdout,
}

impl OutputSink {
    /// Use `GITHUB_OUTPUT` when the runner provides it
    pub fn detect() -> Self {
        match env::var_os("GITHUB_OUTPUT").filter(|v| !v.is_empty()) {
            Some(path) => Self::GithubOutput(PathBuf::from(path)),
            None => Self::Stdout,
        }
    }

    /// Publish one output
    pub fn set(&self, name: &str, value: &str) -> CacheResult<()> {
        debug!("Output {}={}", name, value);
        let line = format!("{}={}", name, value.replace(['\r', '\n'], " "));

        match self {
            Self::Stdout => {
                println!("{}", line);
                Ok(())
            }
            Self::GithubOutput(path) => {
                let mut file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| {
                        CacheError::io(format!("opening output file {}", path.display()), e)
                    })?;
                writeln!(file, "{}", line).map_err(|e| {
                    CacheError::io(format!("writing output file {}", path.display()), e)
                })
            }
        }
    }
}
