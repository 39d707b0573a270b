//! Configuration schema for local-cache
//!
//! Configuration is read from `~/.config/local-cache/config.toml` when present:
//!
//! ```toml
//! [cache]
//! dir = "/srv/ci-cache"
//! compression_level = 3
//!
//! [codec]
//! tar = "gtar"
//! zstd = "zstd"
//! ```

use crate::codec::CompressionLevel;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cache location and defaults
    pub cache: CacheConfig,

    /// External archiver binaries
    pub codec: CodecConfig,
}

/// Cache settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache directory; overrides the runner tool cache and `~/.local-cache`
    pub dir: Option<PathBuf>,

    /// Compression level used when none is passed on the command line
    pub compression_level: CompressionLevel,
}

/// Archiver binaries to invoke
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// tar binary (must support --use-compress-program)
    pub tar: String,

    /// zstd binary
    pub zstd: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            tar: "tar".to_string(),
            zstd: "zstd".to_string(),
        }
    }
}
