//! Configuration management for local-cache
//!
//! Two sources feed a run: the optional TOML file handled by
//! [`ConfigManager`], and the runner environment captured by
//! [`Environment`]. Command-line inputs win over both.

pub mod schema;

pub use schema::Config;

use crate::error::{CacheError, CacheResult};
use std::env;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Directory name under `$HOME` used when no tool cache is configured
pub const HOME_CACHE_DIR: &str = ".local-cache";

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("local-cache")
            .join("config.toml")
    }

    /// Load configuration, falling back to defaults if the file is absent
    pub async fn load(&self) -> CacheResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> CacheResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| CacheError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| CacheError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of the runner environment variables local-cache consumes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    /// `RUNNER_TOOL_CACHE`
    pub tool_cache: Option<PathBuf>,
    /// `HOME`, or the platform home directory
    pub home: Option<PathBuf>,
    /// `GITHUB_WORKSPACE`
    pub workspace: Option<PathBuf>,
    /// `RUNNER_TEMP`
    pub temp: Option<PathBuf>,
    /// Run identity built from `GITHUB_RUN_ID`, `GITHUB_RUN_ATTEMPT`, `GITHUB_JOB`
    pub run_id: Option<String>,
}

impl Environment {
    /// Capture the current process environment
    pub fn from_env() -> Self {
        let run_id = non_empty_var("GITHUB_RUN_ID").map(|id| {
            let mut parts = vec![id];
            parts.extend(non_empty_var("GITHUB_RUN_ATTEMPT"));
            parts.extend(non_empty_var("GITHUB_JOB"));
            parts.join("-")
        });

        Self {
            tool_cache: non_empty_var("RUNNER_TOOL_CACHE").map(PathBuf::from),
            home: non_empty_var("HOME")
                .map(PathBuf::from)
                .or_else(dirs::home_dir),
            workspace: non_empty_var("GITHUB_WORKSPACE").map(PathBuf::from),
            temp: non_empty_var("RUNNER_TEMP").map(PathBuf::from),
            run_id,
        }
    }

    /// Cache directory: explicit override, tool cache, then `~/.local-cache`
    pub fn cache_dir(&self, configured: Option<&Path>) -> PathBuf {
        if let Some(dir) = configured {
            return dir.to_path_buf();
        }
        if let Some(ref dir) = self.tool_cache {
            return dir.clone();
        }
        self.home
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(HOME_CACHE_DIR)
    }

    /// Default extraction root: the workspace, else the filesystem root
    pub fn workspace_dir(&self) -> PathBuf {
        self.workspace
            .clone()
            .unwrap_or_else(|| PathBuf::from("/"))
    }

    /// Scratch directory for permission fallbacks and run state
    pub fn temp_dir(&self) -> PathBuf {
        self.temp.clone().unwrap_or_else(env::temp_dir)
    }

    /// Where pending-save state files live
    pub fn state_dir(&self) -> PathBuf {
        self.temp_dir().join("local-cache").join("state")
    }

    /// Run identity used to pair `restore` with its later `post`
    pub fn run_id(&self) -> String {
        self.run_id.clone().unwrap_or_else(|| "local".to_string())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
