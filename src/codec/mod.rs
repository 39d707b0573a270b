//! Archive codec abstraction
//!
//! The cache engine never touches archive bytes itself. It hands a set of
//! paths to an [`ArchiveCodec`] and gets back success or a diagnostic.

mod tar_zstd;

pub use tar_zstd::TarZstdCodec;

use crate::error::CacheResult;
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};

/// Compression level handed to the compressor untouched
///
/// Conventionally -5..=22 for zstd; the range is not validated here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CompressionLevel(pub i32);

impl CompressionLevel {
    /// Level used when nothing is configured
    pub const DEFAULT: Self = Self(3);

    /// Command-line flags selecting this level in zstd
    pub fn zstd_args(&self) -> Vec<String> {
        match self.0 {
            n if n < 0 => vec![format!("--fast={}", n.unsigned_abs())],
            n if n > 19 => vec!["--ultra".to_string(), format!("-{}", n)],
            n => vec![format!("-{}", n)],
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<i32> for CompressionLevel {
    fn from(level: i32) -> Self {
        Self(level)
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Produces and consumes single-file archives of filesystem paths
#[async_trait]
pub trait ArchiveCodec: Send + Sync {
    /// Archive `paths` into `archive` at the given level
    ///
    /// Creates the parent directory of `archive`. An existing archive is
    /// replaced only once the new one is complete.
    async fn compress(
        &self,
        archive: &Path,
        paths: &[String],
        level: CompressionLevel,
    ) -> CacheResult<()>;

    /// Extract `archive` under `target`, returning the directory actually used
    ///
    /// The returned directory differs from `target` when `target` is not
    /// writable and the codec fell back to a temporary location.
    async fn decompress(&self, archive: &Path, target: &Path) -> CacheResult<PathBuf>;

    /// Human-readable codec name for logs
    fn codec_name(&self) -> &'static str;
}
