//! Durable, concurrency-safe schema cache backed by a single JSON file.
//!
//! Every operation re-reads the file under an exclusive lock (an in-process
//! mutex plus an advisory file lock), applies its change and writes the file
//! back atomically. Persistence is best effort: write failures are logged and
//! the affected entries stay visible in memory as pending until a later write
//! succeeds.

mod file;

pub use file::CACHE_FORMAT_VERSION;

use crate::error::StoreError;
use crate::eviction::{EvictionPolicy, NoEviction};
use crate::schema::{CacheEntry, CacheKey, Schema};
use chrono::{DateTime, Utc};
use file::{CacheDocument, CacheFiles, FileLock};
use indexmap::IndexMap;
use log::{debug, info, warn};
use parking_lot::Mutex;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Snapshot of cache health and size.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    /// Sum of `use_count` across entries.
    pub total_hits: u64,
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub last_updated: Option<DateTime<Utc>>,
    pub path: Option<PathBuf>,
    pub backup_path: Option<PathBuf>,
    pub file_size_bytes: Option<u64>,
    pub backup_size_bytes: Option<u64>,
    /// Entries held in memory because their write failed.
    pub pending_writes: usize,
    pub healthy: bool,
}

#[derive(Debug, Clone, Copy)]
struct DiskStatus {
    readable: bool,
    consistent: bool,
}

struct StoreState {
    document: CacheDocument,
    pending: IndexMap<CacheKey, CacheEntry>,
    disk: DiskStatus,
}

enum Change {
    None,
    Touched,
    Inserted(CacheKey),
    Cleared,
}

/// Owner of the key to entry map.
pub struct SchemaStore {
    files: Option<CacheFiles>,
    eviction: Box<dyn EvictionPolicy>,
    state: Mutex<StoreState>,
}

impl SchemaStore {
    /// Open (or create) the cache at `path`.
    ///
    /// Unreadable or corrupt content never fails: the backup is tried next,
    /// then an empty cache. Only failing to create the parent directory is
    /// an error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let files = CacheFiles::new(path);
        let (document, disk) = {
            let _guard = lock_or_warn(&files);
            load_with_recovery(&files)
        };
        info!(
            "initialized schema store (path={}, entries={})",
            path.display(),
            document.schemas.len()
        );
        Ok(Self {
            files: Some(files),
            eviction: Box::new(NoEviction),
            state: Mutex::new(StoreState {
                document,
                pending: IndexMap::new(),
                disk,
            }),
        })
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        debug!("initialized in-memory schema store");
        Self {
            files: None,
            eviction: Box::new(NoEviction),
            state: Mutex::new(StoreState {
                document: CacheDocument::empty(),
                pending: IndexMap::new(),
                disk: DiskStatus {
                    readable: true,
                    consistent: true,
                },
            }),
        }
    }

    /// Replace the eviction policy (default `NoEviction`).
    pub fn with_eviction(mut self, policy: impl EvictionPolicy + 'static) -> Self {
        self.eviction = Box::new(policy);
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.files.as_ref().map(|files| files.path.as_path())
    }

    /// Fetch an entry, recording the hit.
    pub fn lookup(&self, key: &CacheKey) -> Option<CacheEntry> {
        let (entry, _) = self.transact(|document| match document.schemas.get_mut(key) {
            Some(entry) => {
                entry.touch();
                (Some(entry.clone()), Change::Touched)
            }
            None => (None, Change::None),
        });
        match &entry {
            Some(entry) => debug!(
                "schema store hit (key={}, use_count={})",
                key.short(),
                entry.use_count
            ),
            None => debug!("schema store miss (key={})", key.short()),
        }
        entry
    }

    /// Insert `schema` under `key` unless an entry already exists.
    ///
    /// Returns the entry now stored for `key`: the existing one when another
    /// writer got there first.
    pub fn upsert(&self, key: &CacheKey, mut schema: Schema) -> CacheEntry {
        schema.key = key.clone();
        let (entry, _) = self.transact(|document| {
            if let Some(existing) = document.schemas.get(key) {
                return (existing.clone(), Change::None);
            }
            let entry = CacheEntry::new(schema);
            document.schemas.insert(key.clone(), entry.clone());
            (entry, Change::Inserted(key.clone()))
        });
        entry
    }

    pub fn keys(&self) -> Vec<CacheKey> {
        self.transact(|document| (document.schemas.keys().cloned().collect(), Change::None))
            .0
    }

    pub fn len(&self) -> usize {
        self.transact(|document| (document.schemas.len(), Change::None))
            .0
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every entry. Returns how many were removed.
    pub fn clear(&self) -> Result<usize, StoreError> {
        let (removed, written) = self.transact(|document| {
            let removed = document.schemas.len();
            document.schemas.clear();
            (removed, Change::Cleared)
        });
        {
            self.state.lock().pending.clear();
        }
        written?;
        info!("schema store cleared (removed={removed})");
        Ok(removed)
    }

    pub fn stats(&self) -> CacheStats {
        let (mut stats, _) = self.transact(|document| {
            let stats = CacheStats {
                total_entries: document.schemas.len(),
                total_hits: document.schemas.values().map(|entry| entry.use_count).sum(),
                version: document.version.clone(),
                created_at: document.created_at,
                last_updated: document.metadata.last_updated,
                path: None,
                backup_path: None,
                file_size_bytes: None,
                backup_size_bytes: None,
                pending_writes: 0,
                healthy: false,
            };
            (stats, Change::None)
        });
        let state = self.state.lock();
        stats.pending_writes = state.pending.len();
        stats.healthy = state.disk.readable && state.disk.consistent && state.pending.is_empty();
        if let Some(files) = &self.files {
            stats.path = Some(files.path.clone());
            stats.backup_path = Some(files.backup.clone());
            stats.file_size_bytes = files.main_size();
            stats.backup_size_bytes = files.backup_size();
        }
        stats
    }

    /// File readable, counts consistent and nothing waiting to be written.
    pub fn is_healthy(&self) -> bool {
        self.stats().healthy
    }

    /// Run one read-modify-write cycle under both locks.
    fn transact<T>(
        &self,
        apply: impl FnOnce(&mut CacheDocument) -> (T, Change),
    ) -> (T, Result<(), StoreError>) {
        let mut state = self.state.lock();
        let Some(files) = &self.files else {
            let (value, change) = apply(&mut state.document);
            if let Change::Inserted(key) = &change {
                self.evict(&mut state, key);
            }
            return (value, Ok(()));
        };

        let _guard = lock_or_warn(files);
        reload(files, &mut state);
        let (value, change) = apply(&mut state.document);

        let inserted = match &change {
            Change::None => return (value, Ok(())),
            Change::Inserted(key) => {
                self.evict(&mut state, key);
                state.document.schemas.get(key).map(|entry| (key.clone(), entry.clone()))
            }
            Change::Touched | Change::Cleared => None,
        };

        let written = persist(files, &mut state);
        match &written {
            Ok(()) => state.pending.clear(),
            Err(err) => {
                warn!(
                    "failed to persist schema cache (path={}): {err}",
                    files.path.display()
                );
                if let Some((key, entry)) = inserted {
                    state.pending.insert(key, entry);
                }
            }
        }
        (value, written)
    }

    fn evict(&self, state: &mut StoreState, protected: &CacheKey) {
        let victims = self
            .eviction
            .select_victims(&state.document.schemas, protected);
        for victim in victims {
            if &victim == protected {
                continue;
            }
            state.document.schemas.shift_remove(&victim);
            state.pending.shift_remove(&victim);
            debug!("evicted schema (key={})", victim.short());
        }
    }
}

fn lock_or_warn(files: &CacheFiles) -> Option<FileLock> {
    match files.lock() {
        Ok(guard) => Some(guard),
        Err(err) => {
            warn!(
                "proceeding without cross-process cache lock (path={}): {err}",
                files.path.display()
            );
            None
        }
    }
}

/// Startup load: main file, then backup, then empty.
fn load_with_recovery(files: &CacheFiles) -> (CacheDocument, DiskStatus) {
    match files.read_main() {
        Ok(Some(document)) => {
            let disk = DiskStatus {
                readable: true,
                consistent: document.is_consistent(),
            };
            return (document, disk);
        }
        Ok(None) => {
            debug!(
                "schema cache file not found; starting empty (path={})",
                files.path.display()
            );
            let disk = DiskStatus {
                readable: true,
                consistent: true,
            };
            return (CacheDocument::empty(), disk);
        }
        Err(err) => warn!(
            "schema cache unreadable; trying backup (path={}): {err}",
            files.path.display()
        ),
    }

    let unreadable = DiskStatus {
        readable: false,
        consistent: false,
    };
    match files.read_backup() {
        Ok(Some(document)) => {
            warn!(
                "recovered schema cache from backup (path={}, entries={})",
                files.backup.display(),
                document.schemas.len()
            );
            (document, unreadable)
        }
        Ok(None) => {
            warn!("no schema cache backup available; starting empty");
            (CacheDocument::empty(), unreadable)
        }
        Err(err) => {
            warn!(
                "schema cache backup unreadable; starting empty (path={}): {err}",
                files.backup.display()
            );
            (CacheDocument::empty(), unreadable)
        }
    }
}

/// Refresh the in-memory view from disk, then re-apply pending entries.
fn reload(files: &CacheFiles, state: &mut StoreState) {
    match files.read_main() {
        Ok(Some(document)) => {
            state.disk = DiskStatus {
                readable: true,
                consistent: document.is_consistent(),
            };
            state.document = document;
        }
        Ok(None) => {
            state.disk = DiskStatus {
                readable: true,
                consistent: true,
            };
            let created_at = state.document.created_at;
            state.document = CacheDocument::empty();
            state.document.created_at = created_at;
        }
        Err(err) => {
            state.disk = DiskStatus {
                readable: false,
                consistent: false,
            };
            warn!(
                "schema cache unreadable; using in-memory view (path={}): {err}",
                files.path.display()
            );
        }
    }

    let document = &mut state.document;
    state.pending.retain(|key, entry| {
        if document.schemas.contains_key(key) {
            return false;
        }
        document.schemas.insert(key.clone(), entry.clone());
        true
    });
}

fn persist(files: &CacheFiles, state: &mut StoreState) -> Result<(), StoreError> {
    // A corrupt main file must not replace a good backup.
    if state.disk.readable {
        if let Err(err) = files.backup_main() {
            warn!(
                "failed to back up schema cache (path={}): {err}",
                files.backup.display()
            );
        }
    }
    state.document.refresh_metadata();
    files.write_main(&state.document)?;
    state.disk = DiskStatus {
        readable: true,
        consistent: true,
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eviction::LeastRecentlyUsed;
    use crate::hasher::ContentHasher;
    use crate::schema::{FieldSpec, SchemaOrigin};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn schema(description: &str, field: &str) -> (CacheKey, Schema) {
        let key = ContentHasher::hash(description);
        let mut fields = IndexMap::new();
        fields.insert(field.to_string(), FieldSpec::native("word"));
        let schema = Schema::new(key.clone(), "general", fields, SchemaOrigin::Authored);
        (key, schema)
    }

    #[test]
    fn upsert_survives_reopen() {
        let dir = tempdir().expect("tmp");
        let path = dir.path().join("cache").join("schemas.json");
        let (key, schema) = schema("orders", "order_id");
        {
            let store = SchemaStore::open(&path).expect("store");
            let entry = store.upsert(&key, schema.clone());
            assert_eq!(entry.use_count, 0);
        }
        let reopened = SchemaStore::open(&path).expect("store");
        let entry = reopened.lookup(&key).expect("entry");
        assert_eq!(entry.schema.fields, schema.fields);
        assert_eq!(entry.use_count, 1);
        assert!(reopened.is_healthy());
    }

    #[test]
    fn first_writer_wins() {
        let store = SchemaStore::in_memory();
        let (key, first) = schema("orders", "first");
        let (_, second) = schema("orders", "second");
        store.upsert(&key, first.clone());
        let entry = store.upsert(&key, second);
        assert_eq!(entry.schema.fields, first.fields);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn lookup_updates_bookkeeping() {
        let store = SchemaStore::in_memory();
        let (key, schema) = schema("orders", "id");
        let created = store.upsert(&key, schema);
        store.lookup(&key).expect("hit");
        let entry = store.lookup(&key).expect("hit");
        assert_eq!(entry.use_count, 2);
        assert_eq!(entry.created_at, created.created_at);
        assert!(entry.last_used_at >= created.last_used_at);
        assert_eq!(store.stats().total_hits, 2);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempdir().expect("tmp");
        let path = dir.path().join("schemas.json");
        fs::write(&path, "{ not json").expect("write");
        let store = SchemaStore::open(&path).expect("store");
        assert!(store.is_empty());
        assert!(!store.is_healthy());

        let (key, schema) = schema("orders", "id");
        store.upsert(&key, schema);
        assert!(store.is_healthy());
        let reopened = SchemaStore::open(&path).expect("store");
        assert_eq!(reopened.len(), 1);
    }

    #[test]
    fn corrupt_file_recovers_from_backup() {
        let dir = tempdir().expect("tmp");
        let path = dir.path().join("schemas.json");
        let (key, schema) = schema("orders", "id");
        {
            let store = SchemaStore::open(&path).expect("store");
            store.upsert(&key, schema);
            let (other, schema) = self::schema("invoices", "total");
            store.upsert(&other, schema);
        }
        fs::write(&path, "garbage").expect("corrupt");

        let store = SchemaStore::open(&path).expect("store");
        assert!(store.lookup(&key).is_some());
    }

    #[test]
    fn failed_write_keeps_entry_pending() {
        let dir = tempdir().expect("tmp");
        let path = dir.path().join("schemas.json");
        let store = SchemaStore::open(&path).expect("store");
        let temp = dir.path().join("schemas.json.tmp");
        fs::create_dir(&temp).expect("block temp file");

        let (key, schema) = schema("orders", "id");
        let entry = store.upsert(&key, schema.clone());
        assert_eq!(entry.schema.fields, schema.fields);
        assert!(store.lookup(&key).is_some());
        let stats = store.stats();
        assert_eq!(stats.pending_writes, 1);
        assert!(!stats.healthy);

        fs::remove_dir(&temp).expect("unblock");
        let (other, schema) = self::schema("invoices", "total");
        store.upsert(&other, schema);
        assert_eq!(store.stats().pending_writes, 0);

        let reopened = SchemaStore::open(&path).expect("store");
        assert!(reopened.lookup(&key).is_some());
        assert!(reopened.lookup(&other).is_some());
    }

    #[test]
    fn concurrent_upserts_leave_one_entry() {
        let dir = tempdir().expect("tmp");
        let path = dir.path().join("schemas.json");
        let store = Arc::new(SchemaStore::open(&path).expect("store"));
        let (key, _) = schema("orders", "unused");

        let handles: Vec<_> = (0..16)
            .map(|idx| {
                let store = store.clone();
                let key = key.clone();
                std::thread::spawn(move || {
                    let field = if idx % 2 == 0 { "variant_a" } else { "variant_b" };
                    let (_, schema) = schema("orders", field);
                    store.upsert(&key, schema)
                })
            })
            .collect();
        let entries: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().expect("join"))
            .collect();

        assert!(
            entries
                .windows(2)
                .all(|pair| pair[0].schema.fields == pair[1].schema.fields)
        );
        let raw = fs::read_to_string(&path).expect("read");
        let document: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
        assert_eq!(document["schemas"].as_object().map(|m| m.len()), Some(1));
        assert_eq!(document["metadata"]["total_schemas"], 1);
    }

    #[test]
    fn lru_eviction_bounds_entries() {
        let store = SchemaStore::in_memory().with_eviction(LeastRecentlyUsed::new(2));
        let mut keys = Vec::new();
        for name in ["a", "b", "c"] {
            let (key, schema) = schema(name, "id");
            store.upsert(&key, schema);
            keys.push(key);
        }
        assert_eq!(store.keys(), vec![keys[1].clone(), keys[2].clone()]);
    }

    #[test]
    fn clear_removes_everything() {
        let dir = tempdir().expect("tmp");
        let path = dir.path().join("schemas.json");
        let store = SchemaStore::open(&path).expect("store");
        let (key, schema) = schema("orders", "id");
        store.upsert(&key, schema);
        assert_eq!(store.clear().expect("clear"), 1);
        assert!(store.is_empty());
        assert!(SchemaStore::open(&path).expect("store").is_empty());
    }

    #[test]
    fn stats_report_file_details() {
        let dir = tempdir().expect("tmp");
        let path = dir.path().join("schemas.json");
        let store = SchemaStore::open(&path).expect("store");
        let (key, schema) = schema("orders", "id");
        store.upsert(&key, schema);
        let stats = store.stats();
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.version, CACHE_FORMAT_VERSION);
        assert_eq!(stats.path.as_deref(), Some(path.as_path()));
        assert!(stats.file_size_bytes.unwrap_or(0) > 0);
        assert!(stats.last_updated.is_some());
    }
}
