use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Sync write to '{store}' failed: {reason}")]
    SyncWriteFailed { store: String, reason: String },

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Cache operation timed out after {0}ms")]
    Timeout(u64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Remote fetch failed: {0}")]
    Remote(String),
}

/// Maximum length for error details carried into log lines
const MAX_ERROR_DETAIL_LENGTH: usize = 200;

impl CacheError {
    /// Truncate a detail string to avoid logging excessive data
    pub(crate) fn truncate_detail(detail: &str) -> String {
        if detail.len() <= MAX_ERROR_DETAIL_LENGTH {
            detail.to_string()
        } else {
            let cut: String = detail.chars().take(MAX_ERROR_DETAIL_LENGTH).collect();
            format!("{}... (truncated, {} total bytes)", cut, detail.len())
        }
    }

    pub fn sync_write_failed(store: &str, reason: impl std::fmt::Display) -> Self {
        CacheError::SyncWriteFailed {
            store: store.to_string(),
            reason: Self::truncate_detail(&reason.to_string()),
        }
    }

    /// Whether the error means the storage engine itself is out of reach,
    /// as opposed to a single failed operation.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, CacheError::StorageUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
