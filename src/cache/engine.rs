//! Cache resolution engine
//!
//! Implements the exact-match-then-fallback policy shared by `lookup`,
//! `restore` and `save`. Every failure is logged and folded into the normal
//! return value; nothing here returns an error to the caller.

use crate::cache::store::CacheStore;
use crate::codec::{ArchiveCodec, CompressionLevel};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of a lookup or restore
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheOutcome {
    /// True only when the primary key matched
    pub cache_hit: bool,
    /// The key that matched or was restored, if any
    pub matched_key: Option<String>,
    /// Directory the archive was extracted into (restore only)
    pub restored_to: Option<PathBuf>,
}

impl CacheOutcome {
    /// Nothing matched
    pub fn miss() -> Self {
        Self::default()
    }

    fn matched(key: &str, exact: bool) -> Self {
        Self {
            cache_hit: exact,
            matched_key: Some(key.to_string()),
            restored_to: None,
        }
    }

    fn restored(key: &str, exact: bool, dir: PathBuf) -> Self {
        Self {
            restored_to: Some(dir),
            ..Self::matched(key, exact)
        }
    }

    /// Whether any key, exact or fallback, matched
    pub fn is_match(&self) -> bool {
        self.matched_key.is_some()
    }
}

/// Orchestrates the cache store and archive codec
pub struct CacheEngine {
    store: Box<dyn CacheStore>,
    codec: Box<dyn ArchiveCodec>,
}

impl CacheEngine {
    /// Create an engine over the given store and codec
    pub fn new(store: Box<dyn CacheStore>, codec: Box<dyn ArchiveCodec>) -> Self {
        Self { store, codec }
    }

    /// Find the best existing entry without extracting anything
    pub fn lookup(&self, primary_key: &str, restore_keys: &[String]) -> CacheOutcome {
        if self.store.exists(primary_key) {
            info!("Cache hit for key: {}", primary_key);
            return CacheOutcome::matched(primary_key, true);
        }

        for key in restore_keys {
            if self.store.exists(key) {
                info!("Cache hit for restore key: {}", key);
                return CacheOutcome::matched(key, false);
            }
        }

        info!("Cache not found for key: {}", primary_key);
        CacheOutcome::miss()
    }

    /// Extract the best entry that actually restores into `target_dir`
    ///
    /// `paths` is only informational; archive members carry their own layout.
    pub async fn restore(
        &self,
        paths: &[String],
        primary_key: &str,
        restore_keys: &[String],
        target_dir: &Path,
    ) -> CacheOutcome {
        debug!(
            "Restoring {:?} into {} (key {}, {} restore keys)",
            paths,
            target_dir.display(),
            primary_key,
            restore_keys.len()
        );

        if let Some(dir) = self.try_extract(primary_key, target_dir).await {
            info!("Cache restored from key: {}", primary_key);
            return CacheOutcome::restored(primary_key, true, dir);
        }

        for key in restore_keys {
            if let Some(dir) = self.try_extract(key, target_dir).await {
                info!("Cache restored from restore key: {}", key);
                return CacheOutcome::restored(key, false, dir);
            }
        }

        info!("Cache not found for key: {}", primary_key);
        CacheOutcome::miss()
    }

    /// Archive the existing subset of `paths` under `key`
    ///
    /// Returns false when nothing exists to archive or the codec failed.
    pub async fn save(&self, paths: &[String], key: &str, level: CompressionLevel) -> bool {
        let existing: Vec<String> = paths
            .iter()
            .filter(|p| {
                let present = Path::new(p.as_str()).exists();
                if !present {
                    debug!("Skipping missing path: {}", p);
                }
                present
            })
            .cloned()
            .collect();

        if existing.is_empty() {
            warn!("Path validation: none of {:?} exist, nothing to cache", paths);
            return false;
        }

        let archive = match self.store.archive_path(key) {
            Ok(path) => path,
            Err(e) => {
                warn!("Failed to save cache {}: {}", key, e);
                return false;
            }
        };

        match self.codec.compress(&archive, &existing, level).await {
            Ok(()) => {
                info!("Cache saved with key: {}", key);
                true
            }
            Err(e) => {
                warn!(
                    "Failed to save cache {} with {}: {}",
                    key,
                    self.codec.codec_name(),
                    e
                );
                false
            }
        }
    }

    /// Extract one key if its archive exists; None on absence or failure
    async fn try_extract(&self, key: &str, target_dir: &Path) -> Option<PathBuf> {
        if !self.store.exists(key) {
            return None;
        }

        let archive = match self.store.archive_path(key) {
            Ok(path) => path,
            Err(e) => {
                warn!("Cannot resolve archive for {}: {}", key, e);
                return None;
            }
        };

        match self.codec.decompress(&archive, target_dir).await {
            Ok(dir) => Some(dir),
            Err(e) => {
                warn!("Failed to restore {}: {}", archive.display(), e);
                None
            }
        }
    }
}
