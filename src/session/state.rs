//! Pending-save state carried from `restore` to `post`
//!
//! A restore that misses records what to archive once the job's main work is
//! done. The record lives in `<state dir>/<run id>.json` so a separate `post`
//! process can pick it up.

use crate::cache::key::sanitize;
use crate::codec::CompressionLevel;
use crate::error::{CacheError, CacheResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

/// One deferred save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingSave {
    /// Primary key to save under
    pub key: String,

    /// Resolved path spec to archive
    pub paths: Vec<String>,

    /// Compression level requested at restore time
    pub compression_level: CompressionLevel,

    /// When the restore recorded this save
    pub recorded_at: DateTime<Utc>,
}

impl PendingSave {
    /// Create a pending save stamped with the current time
    pub fn new(key: String, paths: Vec<String>, compression_level: CompressionLevel) -> Self {
        Self {
            key,
            paths,
            compression_level,
            recorded_at: Utc::now(),
        }
    }
}

/// All deferred saves of one pipeline run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PendingSaves {
    /// Run identity the saves belong to
    pub run_id: String,

    /// Saves in the order they were recorded
    pub saves: Vec<PendingSave>,
}

impl PendingSaves {
    /// State file for a run
    pub fn file_path(state_dir: &Path, run_id: &str) -> PathBuf {
        state_dir.join(format!("{}.json", sanitize(run_id)))
    }

    /// Load the run's pending saves; an absent file means none
    pub async fn load(state_dir: &Path, run_id: &str) -> CacheResult<Self> {
        let path = Self::file_path(state_dir, run_id);

        if !path.exists() {
            return Ok(Self {
                run_id: run_id.to_string(),
                saves: vec![],
            });
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| CacheError::io(format!("reading state file {}", path.display()), e))?;

        Ok(serde_json::from_str(&content)?)
    }

    /// Add a save, replacing any earlier one for the same key
    pub fn record(&mut self, save: PendingSave) {
        self.saves.retain(|s| s.key != save.key);
        self.saves.push(save);
    }

    /// Write the state file through a temporary sibling
    pub async fn persist(&self, state_dir: &Path) -> CacheResult<()> {
        fs::create_dir_all(state_dir)
            .await
            .map_err(|e| CacheError::io("creating state directory", e))?;

        let path = Self::file_path(state_dir, &self.run_id);
        let staging = state_dir.join(format!(".{}.tmp", Uuid::new_v4()));

        let content = serde_json::to_string_pretty(self)?;
        fs::write(&staging, content)
            .await
            .map_err(|e| CacheError::io(format!("writing state file {}", staging.display()), e))?;
        fs::rename(&staging, &path)
            .await
            .map_err(|e| CacheError::io(format!("moving state file to {}", path.display()), e))?;

        debug!("Recorded {} pending save(s) in {}", self.saves.len(), path.display());
        Ok(())
    }

    /// Load and remove the run's pending saves
    pub async fn take(state_dir: &Path, run_id: &str) -> CacheResult<Vec<PendingSave>> {
        let pending = Self::load(state_dir, run_id).await?;

        let path = Self::file_path(state_dir, run_id);
        if path.exists() {
            fs::remove_file(&path)
                .await
                .map_err(|e| CacheError::io(format!("deleting state file {}", path.display()), e))?;
        }

        Ok(pending.saves)
    }
}
