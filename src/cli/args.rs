//! CLI argument definitions using clap derive
//!
//! Every step input can also come from the `INPUT_*` variables a workflow
//! runner sets for an action, so the binary works both as a plain CLI and as
//! the body of a CI cache step.

use crate::cache::{parse_key_list, resolve_paths};
use crate::codec::CompressionLevel;
use crate::config::Config;
use crate::error::{CacheError, CacheResult};
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// local-cache - Filesystem-backed artifact cache for CI runners
///
/// Saves paths as zstd-compressed tarballs keyed by a cache key and restores
/// the best match for a key and its fallback keys.
#[derive(Parser, Debug)]
#[command(name = "local-cache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "LOCAL_CACHE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Cache directory (overrides config and RUNNER_TOOL_CACHE)
    #[arg(long, global = true, env = "LOCAL_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text, env = "LOCAL_CACHE_LOG_FORMAT")]
    pub log_format: LogFormat,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Restore the best matching cache entry (records a deferred save on miss)
    Restore(RestoreArgs),

    /// Save paths under a key immediately
    Save(SaveArgs),

    /// Run the saves deferred by earlier restores of this run
    Post(PostArgs),
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per event
    Json,
}

/// Inputs shared by restore and save
#[derive(Parser, Debug, Default)]
pub struct CacheInputs {
    /// Paths to cache (repeatable, or newline-delimited)
    #[arg(long = "path", env = "INPUT_PATH")]
    pub path: Vec<String>,

    /// Primary cache key
    #[arg(long, env = "INPUT_KEY")]
    pub key: Option<String>,

    /// zstd compression level (conventionally -5..22)
    #[arg(long, env = "INPUT_COMPRESSION-LEVEL", allow_negative_numbers = true)]
    pub compression_level: Option<i32>,
}

impl CacheInputs {
    /// The primary key, required and non-blank
    pub fn key(&self) -> CacheResult<String> {
        self.key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(String::from)
            .ok_or(CacheError::MissingInput("key"))
    }

    /// The resolved path list, required and non-empty
    pub fn paths(&self) -> CacheResult<Vec<String>> {
        let paths = resolve_paths(&self.path.join("\n"));
        if paths.is_empty() {
            return Err(CacheError::MissingInput("path"));
        }
        Ok(paths)
    }

    /// Command-line level, else the configured default
    pub fn compression_level(&self, config: &Config) -> CompressionLevel {
        self.compression_level
            .map(CompressionLevel)
            .unwrap_or(config.cache.compression_level)
    }
}

/// Arguments for the restore command
#[derive(Parser, Debug)]
pub struct RestoreArgs {
    #[command(flatten)]
    pub inputs: CacheInputs,

    /// Fallback keys in priority order (repeatable, or newline-delimited)
    #[arg(long = "restore-keys", env = "INPUT_RESTORE-KEYS")]
    pub restore_keys: Vec<String>,

    /// Fail when neither the key nor any restore key matches
    #[arg(long, env = "INPUT_FAIL-ON-CACHE-MISS", value_parser = FalseyValueParser::new())]
    pub fail_on_cache_miss: bool,

    /// Only check whether an entry exists; extract nothing
    #[arg(long, env = "INPUT_LOOKUP-ONLY", value_parser = FalseyValueParser::new())]
    pub lookup_only: bool,

    /// Directory to extract into (defaults to GITHUB_WORKSPACE or /)
    #[arg(long, env = "INPUT_TARGET-DIR")]
    pub target_dir: Option<PathBuf>,

    /// Run identity pairing this restore with its post phase
    #[arg(long, env = "LOCAL_CACHE_RUN_ID")]
    pub run_id: Option<String>,
}

impl RestoreArgs {
    /// Fallback keys with blank entries dropped
    pub fn restore_keys(&self) -> Vec<String> {
        parse_key_list(&self.restore_keys.join("\n"))
    }
}

/// Arguments for the save command
#[derive(Parser, Debug)]
pub struct SaveArgs {
    #[command(flatten)]
    pub inputs: CacheInputs,
}

/// Arguments for the post command
#[derive(Parser, Debug)]
pub struct PostArgs {
    /// Run identity used by the matching restore
    #[arg(long, env = "LOCAL_CACHE_RUN_ID")]
    pub run_id: Option<String>,
}
