//! Connection quality probe.
//!
//! Measures a round trip to a small, always-available resource and grades the
//! latency. The result doubles as an online/offline signal for the
//! connectivity observer when no platform event source exists.

use std::fmt;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::connectivity::Connectivity;
use crate::error::{CacheError, Result};

/// Resource fetched by the probe; tiny and served from a global CDN.
pub const DEFAULT_PROBE_URL: &str = "https://www.google.com/favicon.ico";

/// Probe request timeout in seconds.
/// Anything slower than this is indistinguishable from offline for our purposes.
const PROBE_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LinkQuality {
    Excellent,
    Good,
    Fair,
    Poor,
    Unknown,
}

impl LinkQuality {
    pub fn from_latency(latency: Option<Duration>) -> Self {
        match latency.map(|l| l.as_millis()) {
            None => LinkQuality::Unknown,
            Some(ms) if ms < 100 => LinkQuality::Excellent,
            Some(ms) if ms < 300 => LinkQuality::Good,
            Some(ms) if ms < 600 => LinkQuality::Fair,
            Some(_) => LinkQuality::Poor,
        }
    }
}

impl fmt::Display for LinkQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LinkQuality::Excellent => "Excellent",
            LinkQuality::Good => "Good",
            LinkQuality::Fair => "Fair",
            LinkQuality::Poor => "Poor",
            LinkQuality::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub online: bool,
    #[serde(rename = "latency_ms", serialize_with = "serialize_latency")]
    pub latency: Option<Duration>,
    pub quality: LinkQuality,
    pub checked_at: DateTime<Utc>,
}

fn serialize_latency<S: serde::Serializer>(
    latency: &Option<Duration>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match latency {
        Some(l) => serializer.serialize_some(&(l.as_millis() as u64)),
        None => serializer.serialize_none(),
    }
}

impl ProbeReport {
    pub fn offline() -> Self {
        Self {
            online: false,
            latency: None,
            quality: LinkQuality::Unknown,
            checked_at: Utc::now(),
        }
    }

    pub fn connectivity(&self) -> Connectivity {
        Connectivity::from_online(self.online)
    }
}

/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ConnectionProbe {
    client: Client,
    url: String,
}

impl ConnectionProbe {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, Duration::from_secs(PROBE_TIMEOUT_SECS))
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CacheError::Remote(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Any HTTP response counts as online; only transport failures mean offline.
    pub async fn check(&self) -> ProbeReport {
        let started = Instant::now();
        match self.client.head(&self.url).send().await {
            Ok(response) => {
                let latency = started.elapsed();
                debug!(url = %self.url, status = %response.status(), latency_ms = latency.as_millis() as u64, "Probe succeeded");
                ProbeReport {
                    online: true,
                    latency: Some(latency),
                    quality: LinkQuality::from_latency(Some(latency)),
                    checked_at: Utc::now(),
                }
            }
            Err(e) => {
                debug!(url = %self.url, error = %e, "Probe failed");
                ProbeReport::offline()
            }
        }
    }
}
