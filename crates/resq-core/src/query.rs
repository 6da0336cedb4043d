//! Offline-first read access to reference data.
//!
//! A [`QueryService`] reads from the local cache and falls back to the bundled
//! seed whenever the cache has nothing to offer: never synced, storage
//! unavailable, a failed read, or a read that timed out. From the caller's
//! side those cases look the same; [`DataOrigin`] says which source answered.

use std::marker::PhantomData;

use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::CacheManager;
use crate::models::{EmergencyNumber, LegalInfo, Record};
use crate::seed::Seeded;
use crate::utils::cmp_ids;

/// What a read does when the cache holds zero records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyCachePolicy {
    /// Treat "no rows yet" like "no cache" and serve the seed dataset.
    #[default]
    FallbackToSeed,
    /// Trust an empty store as intentionally empty. Read errors still fall back.
    ReturnEmpty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOrigin {
    Cache,
    Seed,
}

#[derive(Debug, Clone)]
pub struct QueryResult<R> {
    pub records: Vec<R>,
    pub origin: DataOrigin,
}

impl<R> QueryResult<R> {
    fn map_records(self, f: impl FnOnce(Vec<R>) -> Vec<R>) -> Self {
        Self {
            records: f(self.records),
            origin: self.origin,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == DataOrigin::Seed
    }
}

/// Read-side service for one record type. Construct one per collection and pass it
/// to whatever needs it; instances share nothing but the cache they were given.
pub struct QueryService<R> {
    cache: CacheManager,
    policy: EmptyCachePolicy,
    _marker: PhantomData<fn() -> R>,
}

/// Emergency number lookups
pub type NumberDirectory = QueryService<EmergencyNumber>;

/// Legal rights lookups
pub type LegalLibrary = QueryService<LegalInfo>;

impl<R> Clone for QueryService<R> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            policy: self.policy,
            _marker: PhantomData,
        }
    }
}

impl<R: Seeded> QueryService<R> {
    pub fn new(cache: CacheManager) -> Self {
        Self {
            cache,
            policy: EmptyCachePolicy::default(),
            _marker: PhantomData,
        }
    }

    pub fn with_policy(mut self, policy: EmptyCachePolicy) -> Self {
        self.policy = policy;
        self
    }

    fn seed_result() -> QueryResult<R> {
        QueryResult {
            records: sorted(R::seed()),
            origin: DataOrigin::Seed,
        }
    }

    /// Every record, tagged with where it came from.
    pub async fn get_all_with_origin(&self) -> QueryResult<R> {
        match self.cache.get_all::<R>().await {
            Ok(records) if !records.is_empty() => QueryResult {
                records: sorted(records),
                origin: DataOrigin::Cache,
            },
            Ok(_) => match self.policy {
                EmptyCachePolicy::FallbackToSeed => {
                    debug!(store = R::STORE, "Cache empty, serving bundled data");
                    Self::seed_result()
                }
                EmptyCachePolicy::ReturnEmpty => QueryResult {
                    records: Vec::new(),
                    origin: DataOrigin::Cache,
                },
            },
            Err(e) => {
                warn!(store = R::STORE, error = %e, "Cache read failed, serving bundled data");
                Self::seed_result()
            }
        }
    }

    /// Every record, ordered by id.
    pub async fn get_all(&self) -> Vec<R> {
        self.get_all_with_origin().await.records
    }

    pub async fn get_by_category_with_origin(&self, category: &str) -> QueryResult<R> {
        self.get_all_with_origin()
            .await
            .map_records(|records| {
                records
                    .into_iter()
                    .filter(|r| r.category() == category)
                    .collect()
            })
    }

    /// Records whose category equals `category` exactly (case-sensitive).
    pub async fn get_by_category(&self, category: &str) -> Vec<R> {
        self.get_by_category_with_origin(category).await.records
    }

    pub async fn search_with_origin(&self, query: &str) -> QueryResult<R> {
        let all = self.get_all_with_origin().await;
        if query.trim().is_empty() {
            return all;
        }
        let needle = query.to_lowercase();
        all.map_records(|records| records.into_iter().filter(|r| r.matches(&needle)).collect())
    }

    /// Case-insensitive substring search over the record's text fields.
    /// A blank query returns everything.
    pub async fn search(&self, query: &str) -> Vec<R> {
        self.search_with_origin(query).await.records
    }

    /// Distinct categories in sorted order.
    pub async fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .get_all()
            .await
            .iter()
            .map(|r| r.category().to_string())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }
}

fn sorted<R: Record>(mut records: Vec<R>) -> Vec<R> {
    records.sort_by(|a, b| cmp_ids(a.id(), b.id()));
    records
}
