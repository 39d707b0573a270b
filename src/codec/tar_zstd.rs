//! tar + zstd codec driven through external processes
//!
//! Uses `tar --use-compress-program` so a single child process produces or
//! consumes the `.tar.zst` stream. Both binaries are checked before every
//! operation so a missing tool is reported by name instead of as a generic
//! tar failure.

use crate::codec::{ArchiveCodec, CompressionLevel};
use crate::error::{CacheError, CacheResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, warn};
use uuid::Uuid;

/// Name of the directory used when the requested target is not writable
const FALLBACK_DIR_NAME: &str = "local-cache-restore";

/// Codec producing zstd-compressed tarballs with the system `tar` and `zstd`
#[derive(Debug, Clone)]
pub struct TarZstdCodec {
    tar: String,
    zstd: String,
    fallback_root: PathBuf,
}

impl TarZstdCodec {
    /// Create a codec using `tar` and `zstd` from `PATH`
    ///
    /// `temp_dir` hosts the fallback extraction directory.
    pub fn new(temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            tar: "tar".to_string(),
            zstd: "zstd".to_string(),
            fallback_root: temp_dir.into(),
        }
    }

    /// Override the binaries to invoke
    pub fn with_binaries(mut self, tar: impl Into<String>, zstd: impl Into<String>) -> Self {
        self.tar = tar.into();
        self.zstd = zstd.into();
        self
    }

    /// Directory used when the requested extraction target is not writable
    pub fn fallback_dir(&self) -> PathBuf {
        self.fallback_root.join(FALLBACK_DIR_NAME)
    }

    /// Check that both binaries can be spawned
    pub async fn ensure_tools(&self) -> CacheResult<()> {
        for bin in [&self.tar, &self.zstd] {
            Command::new(bin)
                .arg("--version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .await
                .map_err(|e| CacheError::command_failed(format!("{} --version", bin), e))?;
        }
        Ok(())
    }

    /// Run tar with the given arguments, failing on non-zero exit
    async fn exec(&self, args: &[String]) -> CacheResult<()> {
        let command = format!("{} {}", self.tar, args.join(" "));
        debug!("Executing: {}", command);

        let output = Command::new(&self.tar)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| CacheError::command_failed(&command, e))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(CacheError::ArchiveCommand {
                command,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    fn compress_program(&self, level: CompressionLevel) -> String {
        format!(
            "--use-compress-program={} {} -T0",
            self.zstd,
            level.zstd_args().join(" ")
        )
    }

    fn decompress_program(&self) -> String {
        format!("--use-compress-program={} -d", self.zstd)
    }

    /// Resolve the directory to extract into, falling back when unwritable
    async fn writable_target(&self, target: &Path) -> CacheResult<PathBuf> {
        match fs::create_dir_all(target).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return self.fallback_target(target).await;
            }
            Err(e) => {
                return Err(CacheError::io(
                    format!("creating target directory {}", target.display()),
                    e,
                ))
            }
        }

        let marker = target.join(format!(".local-cache-write-check-{}", Uuid::new_v4()));
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&marker)
            .await
        {
            Ok(_) => {
                let _ = fs::remove_file(&marker).await;
                Ok(target.to_path_buf())
            }
            Err(e) => {
                debug!("Write check in {} failed: {}", target.display(), e);
                self.fallback_target(target).await
            }
        }
    }

    async fn fallback_target(&self, target: &Path) -> CacheResult<PathBuf> {
        let fallback = self.fallback_dir();
        fs::create_dir_all(&fallback).await.map_err(|e| {
            CacheError::io(
                format!("creating fallback directory {}", fallback.display()),
                e,
            )
        })?;
        warn!(
            "No write permission on {}, restoring into {} instead",
            target.display(),
            fallback.display()
        );
        Ok(fallback)
    }
}

/// Paths as tar operands, never as options
///
/// Relative paths starting with `-` get a `./` prefix for tars that keep
/// parsing options after `--`.
fn member_args(paths: &[String]) -> Vec<String> {
    let mut args = vec!["--".to_string()];
    args.extend(paths.iter().map(|p| {
        if p.starts_with('-') {
            format!("./{}", p)
        } else {
            p.clone()
        }
    }));
    args
}

#[async_trait]
impl ArchiveCodec for TarZstdCodec {
    async fn compress(
        &self,
        archive: &Path,
        paths: &[String],
        level: CompressionLevel,
    ) -> CacheResult<()> {
        self.ensure_tools().await?;

        let parent = archive
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).await.map_err(|e| {
            CacheError::io(format!("creating archive directory {}", parent.display()), e)
        })?;

        let file_name = archive
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let staging = parent.join(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

        let mut args = vec![
            self.compress_program(level),
            "-cf".to_string(),
            staging.display().to_string(),
        ];
        args.extend(member_args(paths));

        if let Err(e) = self.exec(&args).await {
            let _ = fs::remove_file(&staging).await;
            return Err(e);
        }

        // Rename is atomic within a directory: readers see the old archive or the new one
        if let Err(e) = fs::rename(&staging, archive).await {
            let _ = fs::remove_file(&staging).await;
            return Err(CacheError::io(
                format!("moving archive into {}", archive.display()),
                e,
            ));
        }

        debug!("Wrote archive {} (level {})", archive.display(), level);
        Ok(())
    }

    async fn decompress(&self, archive: &Path, target: &Path) -> CacheResult<PathBuf> {
        if !archive.is_file() {
            return Err(CacheError::ArchiveNotFound(archive.to_path_buf()));
        }

        self.ensure_tools().await?;
        let target = self.writable_target(target).await?;

        let args = vec![
            self.decompress_program(),
            "-xf".to_string(),
            archive.display().to_string(),
            "-C".to_string(),
            target.display().to_string(),
        ];
        self.exec(&args).await?;

        debug!("Extracted {} into {}", archive.display(), target.display());
        Ok(target)
    }

    fn codec_name(&self) -> &'static str {
        "tar+zstd"
    }
}
