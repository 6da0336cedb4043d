//! Where a sync gets its authoritative dataset from.
//!
//! The bundled seed is the default. A deployment can point a collection at a
//! JSON endpoint instead. A failed or empty download is an error, so the sync
//! fails and the cache keeps whatever it last received.

use std::marker::PhantomData;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::models::Record;
use crate::seed::Seeded;

/// HTTP request timeout for dataset downloads.
/// Reference datasets are a few kilobytes; 15s tolerates a poor mobile link.
const REQUEST_TIMEOUT_SECS: u64 = 15;

pub trait DatasetSource<R>: Send + Sync {
    /// The full dataset, in source order.
    fn fetch(&self) -> BoxFuture<'_, Result<Vec<R>>>;

    /// Short description for log lines
    fn describe(&self) -> String;
}

/// The dataset compiled into the binary.
pub struct BundledSource<R> {
    _marker: PhantomData<fn() -> R>,
}

impl<R> BundledSource<R> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<R> Default for BundledSource<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Seeded> DatasetSource<R> for BundledSource<R> {
    fn fetch(&self) -> BoxFuture<'_, Result<Vec<R>>> {
        futures::future::ready(Ok(R::seed())).boxed()
    }

    fn describe(&self) -> String {
        format!("bundled {}", R::STORE)
    }
}

/// A JSON array of records served over HTTP.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpSource<R> {
    client: Client,
    url: String,
    _marker: PhantomData<fn() -> R>,
}

impl<R: Record> HttpSource<R> {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CacheError::Remote(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
            _marker: PhantomData,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn download(&self) -> Result<Vec<R>> {
        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| CacheError::Remote(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CacheError::Remote(format!(
                "Status {}: {}",
                status,
                CacheError::truncate_detail(&body)
            )));
        }

        response
            .json::<Vec<R>>()
            .await
            .map_err(|e| CacheError::Remote(format!("invalid dataset: {}", e)))
    }
}

impl<R: Record> DatasetSource<R> for HttpSource<R> {
    fn fetch(&self) -> BoxFuture<'_, Result<Vec<R>>> {
        async move {
            let records = self.download().await?;
            if records.is_empty() {
                return Err(CacheError::Remote(format!("{} returned an empty dataset", self.url)));
            }
            debug!(url = %self.url, count = records.len(), "Downloaded dataset");
            Ok(records)
        }
        .boxed()
    }

    fn describe(&self) -> String {
        format!("{} from {}", R::STORE, self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmergencyNumber, LegalInfo};

    #[tokio::test]
    async fn test_bundled_source_returns_seed() {
        let source = BundledSource::<LegalInfo>::new();
        let records = source.fetch().await.unwrap();
        assert_eq!(records, LegalInfo::seed());
        assert_eq!(source.describe(), "bundled legalInfo");
    }

    #[tokio::test]
    async fn test_http_source_unreachable_is_remote_error() {
        // Nothing listens on the discard port in test environments
        let source = HttpSource::<EmergencyNumber>::with_timeout(
            "http://127.0.0.1:9/numbers.json",
            Duration::from_millis(500),
        )
        .unwrap();

        assert!(matches!(source.fetch().await, Err(CacheError::Remote(_))));
    }
}
