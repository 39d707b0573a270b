//! Cache directory and key-to-archive mapping
//!
//! The directory holds one flat set of `<sanitized key>.tar.zst` files. The
//! file name is the whole index; there is no manifest.

use crate::cache::key::archive_file_name;
use crate::error::{CacheError, CacheResult};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Storage backend consulted by the cache engine
pub trait CacheStore: Send + Sync {
    /// Cache directory, created if it does not exist yet
    fn cache_directory(&self) -> CacheResult<PathBuf>;

    /// Location of the archive for a key (creates the cache directory)
    fn archive_path(&self, key: &str) -> CacheResult<PathBuf> {
        Ok(self.cache_directory()?.join(archive_file_name(key)))
    }

    /// Whether an archive exists for a key
    ///
    /// Must not touch the filesystem beyond the existence check.
    fn exists(&self, key: &str) -> bool;
}

/// Cache store rooted at a directory on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalCacheStore {
    root: PathBuf,
}

impl LocalCacheStore {
    /// Create a store rooted at `root`; nothing is created until first use
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl CacheStore for LocalCacheStore {
    fn cache_directory(&self) -> CacheResult<PathBuf> {
        if !self.root.is_dir() {
            debug!("Creating cache directory {}", self.root.display());
            // create_dir_all succeeds when another process won the race
            fs::create_dir_all(&self.root).map_err(|e| CacheError::CacheDirCreate {
                path: self.root.clone(),
                source: e,
            })?;
        }
        Ok(self.root.clone())
    }

    fn exists(&self, key: &str) -> bool {
        let path = self.root.join(archive_file_name(key));
        let found = path.is_file();
        debug!("Lookup {} -> {}", path.display(), found);
        found
    }
}
