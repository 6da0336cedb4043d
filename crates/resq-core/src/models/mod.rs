//! Reference data models for ResQ360.
//!
//! This module contains the two reference collections served offline:
//!
//! - `EmergencyNumber`: helplines and emergency dial strings
//! - `LegalInfo`: legal rights entries with long-form details and citations
//!
//! Both implement [`Record`], which lets the cache, sync and query layers be
//! written once and instantiated per collection.

pub mod emergency;
pub mod legal;

use serde::{de::DeserializeOwned, Serialize};

use crate::utils::contains_ignore_case;

pub use emergency::EmergencyNumber;
pub use legal::LegalInfo;

/// A piece of immutable reference data stored in its own cache store and keyed by `id`.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Name of the cache store holding this record type.
    const STORE: &'static str;

    fn id(&self) -> &str;

    fn category(&self) -> &str;

    /// Text fields consulted by substring search.
    fn search_fields(&self) -> Vec<&str>;

    /// Case-insensitive substring match over the searchable fields.
    /// `needle_lower` must already be lowercased.
    fn matches(&self, needle_lower: &str) -> bool {
        self.search_fields()
            .into_iter()
            .any(|field| contains_ignore_case(field, needle_lower))
    }
}
