//! Cache eviction policies.

use crate::schema::{CacheEntry, CacheKey};
use indexmap::IndexMap;

/// Chooses entries to drop after an insert.
pub trait EvictionPolicy: Send + Sync {
    /// Keys to remove from `entries`. `protected` (the entry just inserted)
    /// must never be returned.
    fn select_victims(
        &self,
        entries: &IndexMap<CacheKey, CacheEntry>,
        protected: &CacheKey,
    ) -> Vec<CacheKey>;
}

/// Keeps every entry forever.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEviction;

impl EvictionPolicy for NoEviction {
    fn select_victims(
        &self,
        _entries: &IndexMap<CacheKey, CacheEntry>,
        _protected: &CacheKey,
    ) -> Vec<CacheKey> {
        Vec::new()
    }
}

/// Bounds the cache to `max_entries`, dropping the least recently used.
#[derive(Debug, Clone, Copy)]
pub struct LeastRecentlyUsed {
    pub max_entries: usize,
}

impl LeastRecentlyUsed {
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries: max_entries.max(1),
        }
    }
}

impl EvictionPolicy for LeastRecentlyUsed {
    fn select_victims(
        &self,
        entries: &IndexMap<CacheKey, CacheEntry>,
        protected: &CacheKey,
    ) -> Vec<CacheKey> {
        let excess = entries.len().saturating_sub(self.max_entries);
        if excess == 0 {
            return Vec::new();
        }
        let mut candidates: Vec<_> = entries
            .iter()
            .filter(|(key, _)| *key != protected)
            .collect();
        candidates.sort_by_key(|(_, entry)| entry.last_used_at);
        candidates
            .into_iter()
            .take(excess)
            .map(|(key, _)| key.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::ContentHasher;
    use crate::schema::{FieldSpec, Schema, SchemaOrigin};
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;

    fn entry(description: &str, minutes_ago: i64) -> (CacheKey, CacheEntry) {
        let key = ContentHasher::hash(description);
        let mut fields = IndexMap::new();
        fields.insert("name".to_string(), FieldSpec::native("name"));
        let mut entry = CacheEntry::new(Schema::new(
            key.clone(),
            "general",
            fields,
            SchemaOrigin::Authored,
        ));
        entry.last_used_at = Utc::now() - Duration::minutes(minutes_ago);
        (key, entry)
    }

    #[test]
    fn lru_drops_oldest_but_never_the_protected_key() {
        let entries: IndexMap<_, _> = [entry("a", 30), entry("b", 20), entry("c", 10), entry("d", 40)]
            .into_iter()
            .collect();
        let protected = ContentHasher::hash("d");
        let victims = LeastRecentlyUsed::new(2).select_victims(&entries, &protected);
        assert_eq!(victims, vec![ContentHasher::hash("a"), ContentHasher::hash("b")]);
    }

    #[test]
    fn no_eviction_keeps_everything() {
        let entries: IndexMap<_, _> = [entry("a", 1), entry("b", 2)].into_iter().collect();
        assert!(NoEviction
            .select_victims(&entries, &ContentHasher::hash("a"))
            .is_empty());
    }
}
