//! Sync Policy: refresh the local cache from the authoritative dataset.
//!
//! A sync is a full overwrite keyed by id (last write wins, whole records),
//! never a diff. Syncs run at cold start when online and on each
//! offline-to-online transition; the [`SyncDriver`] consumes the trigger
//! channel produced by the connectivity observer and runs every registered
//! policy once per trigger.
//!
//! Failures never reach the caller as errors. Storage that cannot be opened
//! skips the sync; a failed write leaves the previous cache contents intact.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cache::CacheManager;
use crate::connectivity::{SyncReason, SyncTriggers};
use crate::error::CacheError;
use crate::seed::Seeded;
use crate::source::{BundledSource, DatasetSource};

/// Initial backoff delay in milliseconds between write retries.
const INITIAL_BACKOFF_MS: u64 = 500;

/// Upper bound on configured retries. A persistent quota error must surface as
/// staleness in the logs, not as an endless retry loop.
pub const MAX_SYNC_RETRIES: u32 = 5;

/// How many times a failed cache write is retried, and how long to wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
}

impl RetryPolicy {
    /// Never retry; the next trigger gets a fresh attempt.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
        }
    }

    /// Exponential backoff, capped at [`MAX_SYNC_RETRIES`] retries.
    pub fn with_retries(max_retries: u32) -> Self {
        Self {
            max_retries: max_retries.min(MAX_SYNC_RETRIES),
            ..Self::none()
        }
    }

    /// Delay before retry number `attempt` (1-based)
    fn backoff(&self, attempt: u32) -> Duration {
        self.initial_backoff * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    Synced { store: String, count: usize },
    /// Storage could not be opened; nothing was attempted.
    Skipped { store: String, reason: String },
    /// The download or every write attempt failed; previous contents are untouched.
    Failed {
        store: String,
        attempts: u32,
        reason: String,
    },
}

impl SyncOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncOutcome::Synced { .. })
    }

    pub fn store(&self) -> &str {
        match self {
            SyncOutcome::Synced { store, .. }
            | SyncOutcome::Skipped { store, .. }
            | SyncOutcome::Failed { store, .. } => store,
        }
    }
}

/// Keeps one cache store consistent with its dataset source.
pub struct SyncPolicy<R> {
    cache: CacheManager,
    source: Arc<dyn DatasetSource<R>>,
    retry: RetryPolicy,
}

impl<R: Seeded> SyncPolicy<R> {
    /// Sync from the bundled seed dataset.
    pub fn new(cache: CacheManager) -> Self {
        Self {
            cache,
            source: Arc::new(BundledSource::<R>::new()),
            retry: RetryPolicy::none(),
        }
    }

    pub fn with_source(mut self, source: Arc<dyn DatasetSource<R>>) -> Self {
        self.source = source;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Overwrite the cache store with the latest dataset.
    pub async fn sync(&self) -> SyncOutcome {
        let store = R::STORE.to_string();

        if let Err(e) = self.cache.open().await {
            warn!(store = R::STORE, error = %e, "Cache unavailable, skipping sync");
            return SyncOutcome::Skipped {
                store,
                reason: e.to_string(),
            };
        }

        let records = match self.source.fetch().await {
            Ok(records) => records,
            Err(e) => {
                error!(store = R::STORE, source = %self.source.describe(), error = %e, "Failed to fetch dataset");
                return SyncOutcome::Failed {
                    store,
                    attempts: 0,
                    reason: e.to_string(),
                };
            }
        };

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.cache.put_all(&records).await {
                Ok(()) => {
                    info!(store = R::STORE, count = records.len(), attempt, "Synced cache");
                    return SyncOutcome::Synced {
                        store,
                        count: records.len(),
                    };
                }
                Err(CacheError::StorageUnavailable(reason)) => {
                    warn!(store = R::STORE, %reason, "Cache became unavailable, skipping sync");
                    return SyncOutcome::Skipped { store, reason };
                }
                Err(e) if attempt <= self.retry.max_retries => {
                    let delay = self.retry.backoff(attempt);
                    warn!(
                        store = R::STORE,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Cache write failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    error!(store = R::STORE, attempt, error = %e, "Cache write failed, keeping previous contents");
                    return SyncOutcome::Failed {
                        store,
                        attempts: attempt,
                        reason: e.to_string(),
                    };
                }
            }
        }
    }
}

/// Type-erased sync job so one driver can refresh every collection.
pub trait SyncTask: Send + Sync {
    fn store(&self) -> &'static str;

    fn run(&self) -> BoxFuture<'_, SyncOutcome>;
}

impl<R: Seeded> SyncTask for SyncPolicy<R> {
    fn store(&self) -> &'static str {
        R::STORE
    }

    fn run(&self) -> BoxFuture<'_, SyncOutcome> {
        self.sync().boxed()
    }
}

/// Result of one triggered sync round, reported to whoever is listening.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub reason: SyncReason,
    pub outcomes: Vec<SyncOutcome>,
}

/// Buffer size for the sync report channel.
/// Rounds happen once per reconnect; 16 covers a flapping link without blocking.
pub const REPORT_BUFFER_SIZE: usize = 16;

/// Runs every registered sync task once per trigger.
#[derive(Default)]
pub struct SyncDriver {
    tasks: Vec<Arc<dyn SyncTask>>,
    reports: Option<mpsc::Sender<SyncReport>>,
}

impl SyncDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_task(mut self, task: Arc<dyn SyncTask>) -> Self {
        self.tasks.push(task);
        self
    }

    /// Send a [`SyncReport`] after every round.
    pub fn with_reports(mut self, tx: mpsc::Sender<SyncReport>) -> Self {
        self.reports = Some(tx);
        self
    }

    /// Run every task now, one after another.
    pub async fn sync_all(&self) -> Vec<SyncOutcome> {
        let mut outcomes = Vec::with_capacity(self.tasks.len());
        for task in &self.tasks {
            debug!(store = task.store(), "Running sync");
            outcomes.push(task.run().await);
        }
        outcomes
    }

    /// Consume triggers in the background until the observer is dropped.
    /// The handle resolves to the number of sync rounds run.
    pub fn spawn(self, mut triggers: SyncTriggers) -> JoinHandle<usize> {
        tokio::spawn(async move {
            let mut rounds = 0;
            while let Some(reason) = triggers.recv().await {
                info!(?reason, "Sync triggered");
                let outcomes = self.sync_all().await;
                rounds += 1;

                if let Some(ref tx) = self.reports {
                    // A closed receiver only means nobody is watching
                    let _ = tx.send(SyncReport { reason, outcomes }).await;
                }
            }
            debug!(rounds, "Sync trigger channel closed");
            rounds
        })
    }
}
