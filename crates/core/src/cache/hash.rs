//! Cache key generation for analyses.

use sha2::{Digest, Sha256};

use crate::Language;
use crate::page::truncate_chars;

/// Upper bound on key length.
pub const MAX_KEY_CHARS: usize = 200;

/// Compute the cache key for an analysis of `url` in `language`.
///
/// The URL is hashed rather than embedded, so long URLs sharing a prefix
/// never collide.
pub fn cache_key(language: Language, url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    let key = format!("analysis:{}:{}", language.as_str(), hex::encode(hasher.finalize()));
    truncate_chars(&key, MAX_KEY_CHARS).to_string()
}
