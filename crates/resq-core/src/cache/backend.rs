use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use super::manager::CachedData;
use crate::error::{CacheError, Result};

/// A record as the storage engine sees it: its key and its serialized body.
pub type StoredRecord = (String, Value);

/// Durable key-value facility underneath the cache.
///
/// Each named store is independent and keyed by record id. Writing a batch
/// replaces whole records; nothing is merged field by field.
pub trait StorageBackend: Send + Sync {
    /// Make the named stores usable. Safe to call repeatedly.
    fn open(&self, stores: &[&str]) -> Result<()>;

    /// Upsert a batch. An existing id is replaced in full.
    fn put_all(&self, store: &str, records: Vec<StoredRecord>) -> Result<()>;

    /// Every record in the store, empty if it was never written.
    fn get_all(&self, store: &str) -> Result<Vec<Value>>;

    fn clear(&self, store: &str) -> Result<()>;

    /// When the last batch landed, if ever.
    fn last_written(&self, store: &str) -> Result<Option<DateTime<Utc>>>;
}

type StoreContents = BTreeMap<String, Value>;

// ============================================================================
// File backend
// ============================================================================

/// Probe file used to verify the cache directory accepts writes
const PROBE_FILE: &str = ".write-probe";

/// Stores each collection as `<dir>/<store>.json`, inside a timestamped envelope.
///
/// Writes to one store are serialized within the process, so concurrent
/// batches merge instead of overwriting each other.
pub struct FileBackend {
    cache_dir: PathBuf,
    write_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl FileBackend {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            write_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Lock guarding the load-merge-save cycle of `store`
    fn write_lock(&self, store: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .write_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(locks.entry(store.to_string()).or_default())
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn store_path(&self, store: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", store))
    }

    fn load(&self, store: &str) -> Result<Option<CachedData<StoreContents>>> {
        let path = self.store_path(store);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .map_err(|e| CacheError::QueryFailed(format!("read {}: {}", store, e)))?;
        let cached: CachedData<StoreContents> = serde_json::from_str(&contents)
            .map_err(|e| CacheError::QueryFailed(format!("parse {}: {}", store, e)))?;

        Ok(Some(cached))
    }

    /// Replace the store file atomically. A crash mid-write leaves the
    /// previous contents readable; an uncommitted file is discarded on drop.
    fn save(&self, store: &str, contents: StoreContents) -> Result<()> {
        let cached = CachedData::new(contents);
        let path = self.store_path(store);

        let mut file =
            AtomicWriteFile::open(&path).map_err(|e| CacheError::sync_write_failed(store, e))?;
        serde_json::to_writer_pretty(&mut file, &cached)
            .map_err(|e| CacheError::sync_write_failed(store, e))?;
        file.commit()
            .map_err(|e| CacheError::sync_write_failed(store, e))?;
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn open(&self, stores: &[&str]) -> Result<()> {
        std::fs::create_dir_all(&self.cache_dir).map_err(|e| {
            CacheError::StorageUnavailable(format!("{}: {}", self.cache_dir.display(), e))
        })?;

        let probe = self.cache_dir.join(PROBE_FILE);
        std::fs::write(&probe, b"ok")
            .and_then(|_| std::fs::remove_file(&probe))
            .map_err(|e| {
                CacheError::StorageUnavailable(format!(
                    "{} is not writable: {}",
                    self.cache_dir.display(),
                    e
                ))
            })?;

        debug!(dir = %self.cache_dir.display(), stores = ?stores, "Opened file cache");
        Ok(())
    }

    fn put_all(&self, store: &str, records: Vec<StoredRecord>) -> Result<()> {
        let lock = self.write_lock(store);
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut contents = match self.load(store) {
            Ok(Some(cached)) => cached.data,
            Ok(None) => StoreContents::new(),
            Err(e) => {
                // An unreadable store is rebuilt from this batch
                warn!(store, error = %e, "Discarding unreadable cache store");
                StoreContents::new()
            }
        };

        for (id, value) in records {
            contents.insert(id, value);
        }

        self.save(store, contents)
    }

    fn get_all(&self, store: &str) -> Result<Vec<Value>> {
        Ok(self
            .load(store)?
            .map(|cached| cached.data.into_values().collect())
            .unwrap_or_default())
    }

    fn clear(&self, store: &str) -> Result<()> {
        let lock = self.write_lock(store);
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let path = self.store_path(store);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn last_written(&self, store: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(self.load(store)?.map(|cached| cached.cached_at))
    }
}

// ============================================================================
// Memory backend
// ============================================================================

#[derive(Default)]
struct MemoryStore {
    records: StoreContents,
    written_at: Option<DateTime<Utc>>,
}

/// In-process storage. Contents vanish with the process.
#[derive(Default)]
pub struct MemoryBackend {
    stores: Mutex<HashMap<String, MemoryStore>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn stores(&self) -> MutexGuard<'_, HashMap<String, MemoryStore>> {
        // Every mutation completes before the guard drops, so a poisoned map is still consistent
        self.stores.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StorageBackend for MemoryBackend {
    fn open(&self, stores: &[&str]) -> Result<()> {
        let mut map = self.stores();
        for store in stores {
            map.entry(store.to_string()).or_default();
        }
        Ok(())
    }

    fn put_all(&self, store: &str, records: Vec<StoredRecord>) -> Result<()> {
        let mut map = self.stores();
        let entry = map.entry(store.to_string()).or_default();
        for (id, value) in records {
            entry.records.insert(id, value);
        }
        entry.written_at = Some(Utc::now());
        Ok(())
    }

    fn get_all(&self, store: &str) -> Result<Vec<Value>> {
        Ok(self
            .stores()
            .get(store)
            .map(|s| s.records.values().cloned().collect())
            .unwrap_or_default())
    }

    fn clear(&self, store: &str) -> Result<()> {
        if let Some(entry) = self.stores().get_mut(store) {
            entry.records.clear();
            entry.written_at = None;
        }
        Ok(())
    }

    fn last_written(&self, store: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(self.stores().get(store).and_then(|s| s.written_at))
    }
}

// ============================================================================
// Test doubles
// ============================================================================

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    /// Storage whose open() is refused, like a browser in private mode.
    pub struct UnavailableBackend;

    impl StorageBackend for UnavailableBackend {
        fn open(&self, _stores: &[&str]) -> Result<()> {
            Err(CacheError::StorageUnavailable("storage disabled".into()))
        }

        fn put_all(&self, _store: &str, _records: Vec<StoredRecord>) -> Result<()> {
            Err(CacheError::StorageUnavailable("storage disabled".into()))
        }

        fn get_all(&self, _store: &str) -> Result<Vec<Value>> {
            Err(CacheError::StorageUnavailable("storage disabled".into()))
        }

        fn clear(&self, _store: &str) -> Result<()> {
            Err(CacheError::StorageUnavailable("storage disabled".into()))
        }

        fn last_written(&self, _store: &str) -> Result<Option<DateTime<Utc>>> {
            Err(CacheError::StorageUnavailable("storage disabled".into()))
        }
    }

    /// Memory storage with switchable write failures, slow calls and a write counter.
    #[derive(Default)]
    pub struct FlakyBackend {
        pub inner: MemoryBackend,
        pub fail_writes: AtomicBool,
        pub hang_reads: AtomicBool,
        /// Writes take 100ms before landing
        pub slow_writes: AtomicBool,
        /// Writes that fail before succeeding; decremented on each attempt
        pub failures_remaining: AtomicUsize,
        pub write_attempts: AtomicUsize,
    }

    impl StorageBackend for FlakyBackend {
        fn open(&self, stores: &[&str]) -> Result<()> {
            self.inner.open(stores)
        }

        fn put_all(&self, store: &str, records: Vec<StoredRecord>) -> Result<()> {
            self.write_attempts.fetch_add(1, Ordering::SeqCst);
            if self.slow_writes.load(Ordering::SeqCst) {
                std::thread::sleep(Duration::from_millis(100));
            }
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(CacheError::sync_write_failed(store, "quota exceeded"));
            }
            let remaining = self.failures_remaining.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
                return Err(CacheError::sync_write_failed(store, "transient failure"));
            }
            self.inner.put_all(store, records)
        }

        fn get_all(&self, store: &str) -> Result<Vec<Value>> {
            if self.hang_reads.load(Ordering::SeqCst) {
                std::thread::sleep(Duration::from_millis(500));
            }
            self.inner.get_all(store)
        }

        fn clear(&self, store: &str) -> Result<()> {
            self.inner.clear(store)
        }

        fn last_written(&self, store: &str) -> Result<Option<DateTime<Utc>>> {
            self.inner.last_written(store)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(id: &str, name: &str) -> StoredRecord {
        (id.to_string(), json!({ "id": id, "name": name }))
    }

    #[test]
    fn test_file_backend_missing_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("cache"));
        backend.open(&["numbers"]).unwrap();
        assert!(backend.get_all("numbers").unwrap().is_empty());
        assert!(backend.last_written("numbers").unwrap().is_none());
    }

    #[test]
    fn test_file_backend_put_replaces_whole_record() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().to_path_buf());
        backend.open(&["numbers"]).unwrap();

        backend
            .put_all("numbers", vec![(
                "5".to_string(),
                json!({ "id": "5", "name": "Old", "extra": true }),
            )])
            .unwrap();
        backend.put_all("numbers", vec![record("5", "New")]).unwrap();

        let all = backend.get_all("numbers").unwrap();
        assert_eq!(all, vec![json!({ "id": "5", "name": "New" })]);
        assert!(backend.last_written("numbers").unwrap().is_some());
    }

    #[test]
    fn test_file_backend_upsert_keeps_other_ids() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().to_path_buf());
        backend.open(&["numbers"]).unwrap();

        backend.put_all("numbers", vec![record("1", "A"), record("2", "B")]).unwrap();
        backend.put_all("numbers", vec![record("2", "B2")]).unwrap();

        assert_eq!(backend.get_all("numbers").unwrap().len(), 2);
    }

    #[test]
    fn test_file_backend_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().to_path_buf());
        backend.open(&["legal"]).unwrap();
        backend.put_all("legal", vec![record("1", "A")]).unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("legal.json")]);
    }

    #[test]
    fn test_file_backend_concurrent_writers_keep_every_record() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(FileBackend::new(dir.path().to_path_buf()));
        backend.open(&["numbers"]).unwrap();

        let writers: Vec<_> = (0..8)
            .map(|writer| {
                let backend = Arc::clone(&backend);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        let id = format!("{}-{}", writer, i);
                        backend.put_all("numbers", vec![record(&id, "N")])?;
                    }
                    Ok::<(), CacheError>(())
                })
            })
            .collect();

        for writer in writers {
            writer.join().unwrap().unwrap();
        }
        assert_eq!(backend.get_all("numbers").unwrap().len(), 200);
    }

    #[test]
    fn test_file_backend_open_fails_on_file_in_the_way() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let backend = FileBackend::new(blocker.join("cache"));
        let err = backend.open(&["numbers"]).unwrap_err();
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_file_backend_corrupt_store_is_query_failure() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().to_path_buf());
        backend.open(&["numbers"]).unwrap();
        std::fs::write(dir.path().join("numbers.json"), b"{ not json").unwrap();

        assert!(matches!(
            backend.get_all("numbers"),
            Err(CacheError::QueryFailed(_))
        ));

        // A sync rewrites the store from scratch
        backend.put_all("numbers", vec![record("1", "A")]).unwrap();
        assert_eq!(backend.get_all("numbers").unwrap().len(), 1);
    }

    #[test]
    fn test_file_backend_clear() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().to_path_buf());
        backend.open(&["numbers"]).unwrap();
        backend.put_all("numbers", vec![record("1", "A")]).unwrap();

        backend.clear("numbers").unwrap();
        assert!(backend.get_all("numbers").unwrap().is_empty());
        // Clearing twice is fine
        backend.clear("numbers").unwrap();
    }

    #[test]
    fn test_memory_backend_stores_are_independent() {
        let backend = MemoryBackend::new();
        backend.open(&["a", "b"]).unwrap();
        backend.put_all("a", vec![record("1", "A")]).unwrap();

        assert_eq!(backend.get_all("a").unwrap().len(), 1);
        assert!(backend.get_all("b").unwrap().is_empty());
        assert!(backend.last_written("b").unwrap().is_none());

        backend.clear("a").unwrap();
        assert!(backend.get_all("a").unwrap().is_empty());
        assert!(backend.last_written("a").unwrap().is_none());
    }
}
