use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::backend::{FileBackend, MemoryBackend, StorageBackend, StoredRecord};
use crate::error::{CacheError, Result};
use crate::models::{EmergencyNumber, LegalInfo, Record};

/// Default bound on a single storage read.
/// A hung read must not hang query resolution; 2s is long enough for a cold disk.
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(2);

/// Stores opened by [`CacheManager::open`]
const STORES: [&str; 2] = [EmergencyNumber::STORE, LegalInfo::STORE];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }
}

/// Minutes elapsed since `at`
pub fn age_minutes(at: DateTime<Utc>) -> i64 {
    (Utc::now() - at).num_minutes()
}

/// Human readable age such as "just now", "5m ago", "2h ago" or "3d ago".
pub fn age_display(at: DateTime<Utc>) -> String {
    let minutes = age_minutes(at);
    if minutes < 1 {
        // Also covers clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        if minutes % 60 >= 30 {
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        if (minutes % 1440) / 60 >= 12 {
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}

/// Typed access to the local cache.
///
/// Cheap to clone; clones share the same storage backend. Every backend call
/// runs on the blocking pool. Reads are bounded by the storage timeout; writes
/// always run to completion so their outcome is the one reported.
#[derive(Clone)]
pub struct CacheManager {
    backend: Arc<dyn StorageBackend>,
    timeout: Duration,
}

impl CacheManager {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            timeout: DEFAULT_STORAGE_TIMEOUT,
        }
    }

    /// Cache persisted as JSON files under `cache_dir`
    pub fn file(cache_dir: PathBuf) -> Self {
        Self::new(Arc::new(FileBackend::new(cache_dir)))
    }

    /// Cache that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn run_blocking<T, F>(&self, op: &'static str, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn StorageBackend) -> Result<T> + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        tokio::task::spawn_blocking(move || f(backend.as_ref()))
            .await
            .map_err(|join_err| CacheError::QueryFailed(format!("{} task failed: {}", op, join_err)))?
    }

    /// Like `run_blocking`, but gives up after the storage timeout. Only for
    /// calls that change nothing: an abandoned call keeps running.
    async fn run_bounded<T, F>(&self, op: &'static str, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn StorageBackend) -> Result<T> + Send + 'static,
    {
        match tokio::time::timeout(self.timeout, self.run_blocking(op, f)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(op, timeout_ms = self.timeout.as_millis() as u64, "Storage call timed out");
                Err(CacheError::Timeout(self.timeout.as_millis() as u64))
            }
        }
    }

    /// Create the emergency-number and legal-info stores if absent.
    pub async fn open(&self) -> Result<()> {
        self.run_blocking("open", |backend| backend.open(&STORES)).await
    }

    /// Upsert records by id, replacing any existing record with the same id in full.
    pub async fn put_all<R: Record>(&self, records: &[R]) -> Result<()> {
        let batch = records
            .iter()
            .map(|r| -> Result<StoredRecord> { Ok((r.id().to_string(), serde_json::to_value(r)?)) })
            .collect::<Result<Vec<_>>>()?;
        let count = batch.len();

        self.run_blocking("put_all", move |backend| backend.put_all(R::STORE, batch))
            .await?;
        debug!(store = R::STORE, count, "Wrote records to cache");
        Ok(())
    }

    /// Every cached record of this type, in no particular order.
    /// Rows that no longer deserialize are skipped.
    pub async fn get_all<R: Record>(&self) -> Result<Vec<R>> {
        let values = self
            .run_bounded("get_all", |backend| backend.get_all(R::STORE))
            .await?;

        let records = values
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<R>(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(store = R::STORE, error = %e, "Skipping malformed cached record");
                    None
                }
            })
            .collect();
        Ok(records)
    }

    pub async fn clear<R: Record>(&self) -> Result<()> {
        self.run_blocking("clear", |backend| backend.clear(R::STORE)).await
    }

    /// Wipe every store. Maintenance only; reads fall back to seed data afterwards.
    pub async fn clear_all(&self) -> Result<()> {
        self.clear::<EmergencyNumber>().await?;
        self.clear::<LegalInfo>().await?;
        debug!("Cleared all cache stores");
        Ok(())
    }

    pub async fn last_synced<R: Record>(&self) -> Result<Option<DateTime<Utc>>> {
        self.run_bounded("last_written", |backend| backend.last_written(R::STORE))
            .await
    }

    /// Helper to read a store's age and log errors without failing
    async fn load_age<R: Record>(&self) -> Option<String> {
        match self.last_synced::<R>().await {
            Ok(at) => at.map(age_display),
            Err(e) => {
                debug!(cache = R::STORE, error = %e, "Failed to load cache age");
                None
            }
        }
    }

    pub async fn cache_ages(&self) -> CacheAges {
        CacheAges {
            emergency_numbers: self.load_age::<EmergencyNumber>().await,
            legal_info: self.load_age::<LegalInfo>().await,
        }
    }
}

#[derive(Debug, Default)]
pub struct CacheAges {
    pub emergency_numbers: Option<String>,
    pub legal_info: Option<String>,
}

impl CacheAges {
    pub fn numbers_age(&self) -> String {
        self.emergency_numbers
            .clone()
            .unwrap_or_else(|| "never".to_string())
    }

    pub fn legal_age(&self) -> String {
        self.legal_info.clone().unwrap_or_else(|| "never".to_string())
    }

    /// First known age across stores, or "never"
    pub fn last_updated(&self) -> String {
        self.emergency_numbers
            .clone()
            .or_else(|| self.legal_info.clone())
            .unwrap_or_else(|| "never".to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
