//! local-cache - Filesystem-backed artifact cache for CI runners
//!
//! Archives paths into `<cache dir>/<sanitized key>.tar.zst` and restores the
//! best match for a primary key plus ordered fallback keys. No server, no
//! eviction: the cache is a flat directory on the runner.

pub mod cache;
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod session;

pub use error::{CacheError, CacheResult};
