//! Local persistent cache for offline data access.
//!
//! This module provides the `CacheManager` for storing and retrieving
//! reference data locally. Each record type lives in its own store keyed by
//! id; the two stores are independent and have no cross-store transactions.
//!
//! Storage engines:
//! - `FileBackend`: one JSON file per store, replaced atomically on write
//! - `MemoryBackend`: in-process only, for tests and ephemeral runs

pub mod backend;
pub mod manager;

pub use backend::{FileBackend, MemoryBackend, StorageBackend, StoredRecord};
pub use manager::{age_display, CacheAges, CacheManager, CachedData, DEFAULT_STORAGE_TIMEOUT};
