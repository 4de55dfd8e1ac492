//! Content addressing for descriptions.

use crate::schema::CacheKey;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::LazyLock;

static PUNCTUATION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\s*([,.!?;:])\s*").ok());

/// Derives cache keys from free-text descriptions.
///
/// Keys are insensitive to case, whitespace runs and spacing around
/// punctuation, but not to wording: paraphrases hash differently.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentHasher;

impl ContentHasher {
    pub fn hash(text: &str) -> CacheKey {
        let normalized = normalize_description(text);
        let digest = Sha256::digest(normalized.as_bytes());
        CacheKey::from_digest(hex::encode(digest))
    }
}

/// Canonical form of a description as it is fed to the digest.
pub fn normalize_description(text: &str) -> String {
    let collapsed = collapse_whitespace(&text.to_lowercase());
    let Some(punctuation) = PUNCTUATION.as_ref() else {
        return collapsed;
    };
    collapse_whitespace(&punctuation.replace_all(&collapsed, "$1 "))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
