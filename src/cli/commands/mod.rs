//! CLI command implementations

pub mod post;
pub mod restore;
pub mod save;

pub use post::execute as post;
pub use restore::execute as restore;
pub use save::execute as save;

use crate::cache::{CacheEngine, LocalCacheStore};
use crate::codec::TarZstdCodec;
use crate::config::{Config, Environment};
use std::path::PathBuf;

/// Everything a command needs besides its own arguments
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Loaded configuration file (or defaults)
    pub config: Config,
    /// Runner environment snapshot
    pub env: Environment,
    /// `--cache-dir` override
    pub cache_dir: Option<PathBuf>,
}

impl RunContext {
    /// Resolved cache directory
    pub fn cache_dir(&self) -> PathBuf {
        let configured = self
            .cache_dir
            .as_deref()
            .or(self.config.cache.dir.as_deref());
        self.env.cache_dir(configured)
    }

    /// Engine over the local store and the tar+zstd codec
    pub fn engine(&self) -> CacheEngine {
        let store = LocalCacheStore::new(self.cache_dir());
        let codec = TarZstdCodec::new(self.env.temp_dir())
            .with_binaries(&self.config.codec.tar, &self.config.codec.zstd);
        CacheEngine::new(Box::new(store), Box::new(codec))
    }

    /// Run identity: explicit flag, else derived from the runner
    pub fn run_id(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from)
            .unwrap_or_else(|| self.env.run_id())
    }
}
