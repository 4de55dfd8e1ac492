//! On-disk representation of the schema cache.

use crate::error::StoreError;
use crate::schema::{CacheEntry, CacheKey};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Cache file format version written by this crate.
pub const CACHE_FORMAT_VERSION: &str = "1.0";

/// Top-level cache document. Unknown fields are ignored on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CacheDocument {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: CacheMetadata,
    #[serde(default)]
    pub schemas: IndexMap<CacheKey, CacheEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct CacheMetadata {
    #[serde(default)]
    pub total_schemas: usize,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

fn default_version() -> String {
    CACHE_FORMAT_VERSION.to_string()
}

impl CacheDocument {
    pub fn empty() -> Self {
        Self {
            version: default_version(),
            created_at: Utc::now(),
            metadata: CacheMetadata::default(),
            schemas: IndexMap::new(),
        }
    }

    /// Metadata counts agree with the entry map.
    pub fn is_consistent(&self) -> bool {
        self.metadata.total_schemas == self.schemas.len()
    }

    pub fn refresh_metadata(&mut self) {
        self.version = default_version();
        self.metadata.total_schemas = self.schemas.len();
        self.metadata.last_updated = Some(Utc::now());
    }
}

/// Paths of the cache file and its siblings.
#[derive(Debug, Clone)]
pub(crate) struct CacheFiles {
    pub path: PathBuf,
    pub backup: PathBuf,
    temp: PathBuf,
    lock: PathBuf,
}

impl CacheFiles {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            backup: sibling(path, "backup"),
            temp: sibling(path, "tmp"),
            lock: sibling(path, "lock"),
        }
    }

    /// Take the cross-process lock; released when the guard drops.
    pub fn lock(&self) -> Result<FileLock, StoreError> {
        FileLock::acquire(&self.lock)
    }

    /// `Ok(None)` when the main file does not exist yet.
    pub fn read_main(&self) -> Result<Option<CacheDocument>, StoreError> {
        read_document(&self.path)
    }

    pub fn read_backup(&self) -> Result<Option<CacheDocument>, StoreError> {
        read_document(&self.backup)
    }

    /// Copy the current main file over the backup.
    pub fn backup_main(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            fs::copy(&self.path, &self.backup)?;
        }
        Ok(())
    }

    /// Replace the main file without ever exposing a partial write.
    pub fn write_main(&self, document: &CacheDocument) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(document)?;
        {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&self.temp)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        fs::rename(&self.temp, &self.path)?;
        Ok(())
    }

    pub fn main_size(&self) -> Option<u64> {
        fs::metadata(&self.path).ok().map(|meta| meta.len())
    }

    pub fn backup_size(&self) -> Option<u64> {
        fs::metadata(&self.backup).ok().map(|meta| meta.len())
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

fn read_document(path: &Path) -> Result<Option<CacheDocument>, StoreError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(StoreError::Io(err)),
    };
    Ok(Some(serde_json::from_slice(&bytes)?))
}

/// Exclusive advisory lock on the sidecar lock file.
#[derive(Debug)]
pub(crate) struct FileLock {
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, StoreError> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(path)?;
        lock_exclusive(&file).map_err(StoreError::Lock)?;
        Ok(Self { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = unlock(&self.file);
    }
}

#[cfg(unix)]
fn lock_exclusive(file: &File) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;
    let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(unix)]
fn unlock(file: &File) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;
    let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_UN) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

// Other platforms rely on the in-process mutex only.
#[cfg(not(unix))]
fn lock_exclusive(_file: &File) -> io::Result<()> {
    Ok(())
}

#[cfg(not(unix))]
fn unlock(_file: &File) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn sibling_paths_append_suffix() {
        let files = CacheFiles::new(Path::new("/tmp/data/schemas.json"));
        assert_eq!(files.backup, PathBuf::from("/tmp/data/schemas.json.backup"));
        assert_eq!(files.lock, PathBuf::from("/tmp/data/schemas.json.lock"));
    }

    #[test]
    fn document_tolerates_unknown_and_missing_fields() {
        let doc: CacheDocument = serde_json::from_str(
            r#"{"version": "9.9", "future_section": {"a": 1}, "schemas": {}}"#,
        )
        .expect("doc");
        assert_eq!(doc.version, "9.9");
        assert!(doc.schemas.is_empty());
        assert!(doc.is_consistent());
    }

    #[test]
    fn write_then_read_replaces_atomically() {
        let dir = tempdir().expect("tmp");
        let files = CacheFiles::new(&dir.path().join("schemas.json"));
        assert!(files.read_main().expect("read").is_none());

        let mut doc = CacheDocument::empty();
        doc.refresh_metadata();
        files.write_main(&doc).expect("write");
        assert!(!files.temp.exists());
        let loaded = files.read_main().expect("read").expect("present");
        assert_eq!(loaded.metadata.total_schemas, 0);

        files.backup_main().expect("backup");
        assert!(files.read_backup().expect("read").is_some());
    }

    #[test]
    fn lock_can_be_retaken_after_drop() {
        let dir = tempdir().expect("tmp");
        let files = CacheFiles::new(&dir.path().join("schemas.json"));
        drop(files.lock().expect("first"));
        let _second = files.lock().expect("second");
    }
}
