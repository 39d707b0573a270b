//! Local artifact cache
//!
//! Archives are stored as `<cache dir>/<sanitized key>.tar.zst` and found
//! again by key, with an ordered list of fallback keys.
//!
//! # Match Kinds
//!
//! | Kind | `cache_hit` | `matched_key` |
//! |------|-------------|---------------|
//! | Exact | true | primary key |
//! | Partial | false | first usable restore key |
//! | Miss | false | none |

pub mod engine;
pub mod key;
pub mod store;

pub use engine::{CacheEngine, CacheOutcome};
pub use key::{archive_file_name, parse_key_list, resolve_paths, sanitize};
pub use store::{CacheStore, LocalCacheStore};
