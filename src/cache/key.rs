//! Cache key sanitization and path spec parsing
//!
//! Keys are mapped onto file names character by character. Two keys that only
//! differ in non-alphanumeric characters land on the same archive.

/// File extension of every archive in the cache directory
pub const ARCHIVE_EXTENSION: &str = "tar.zst";

/// Map a cache key onto a file-name-safe string
///
/// Every character outside `[A-Za-z0-9]` becomes `_`; the character count
/// and order are preserved.
pub fn sanitize(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Archive file name for a cache key (`<sanitized>.tar.zst`)
pub fn archive_file_name(key: &str) -> String {
    format!("{}.{}", sanitize(key), ARCHIVE_EXTENSION)
}

/// Split a newline-delimited path spec into trimmed, non-empty entries
pub fn resolve_paths(raw: &str) -> Vec<String> {
    non_empty_lines(raw)
}

/// Split a newline-delimited restore-key list, keeping priority order
pub fn parse_key_list(raw: &str) -> Vec<String> {
    non_empty_lines(raw)
}

fn non_empty_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
