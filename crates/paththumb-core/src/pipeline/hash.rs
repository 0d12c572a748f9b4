//! Cache keys for thumbnail outputs.

use blake3::Hasher as Blake3Hasher;

/// Extension of files written for cacheable thumbnails.
pub const THUMBNAIL_EXTENSION: &str = "jpg";

/// BLAKE3 hex digest of a source URL or path, used as its cache key.
pub fn cache_key(url: &str) -> String {
    let mut hasher = Blake3Hasher::new();
    hasher.update(url.as_bytes());
    hasher.finalize().to_hex().to_string()
}

/// File name a thumbnail for `url` is stored under.
pub fn cache_file_name(url: &str) -> String {
    format!("{}.{}", cache_key(url), THUMBNAIL_EXTENSION)
}
