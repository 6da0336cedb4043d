//! ResQ360 core - offline-first reference data for personal safety.
//!
//! Emergency numbers and legal-rights information are served from a local
//! cache that is refreshed whenever the device comes online, with the bundled
//! seed dataset as a fallback so reads always answer.
//!
//! Typical wiring:
//!
//! 1. Build a [`CacheManager`] over a storage backend.
//! 2. Create a [`ConnectivityObserver`] from the current network state and
//!    hand its trigger channel to a [`SyncDriver`] holding one
//!    [`SyncPolicy`] per collection.
//! 3. Serve reads through a [`QueryService`] per collection.

pub mod cache;
pub mod config;
pub mod connectivity;
pub mod debounce;
pub mod error;
pub mod models;
pub mod probe;
pub mod query;
pub mod seed;
pub mod source;
pub mod sync;
pub mod utils;

pub use cache::{CacheAges, CacheManager, FileBackend, MemoryBackend, StorageBackend};
pub use config::Config;
pub use connectivity::{Connectivity, ConnectivityObserver, SyncReason, SyncTriggers, Transition};
pub use error::{CacheError, Result};
pub use models::{EmergencyNumber, LegalInfo, Record};
pub use probe::{ConnectionProbe, LinkQuality, ProbeReport};
pub use query::{DataOrigin, EmptyCachePolicy, LegalLibrary, NumberDirectory, QueryResult, QueryService};
pub use seed::Seeded;
pub use source::{BundledSource, DatasetSource, HttpSource};
pub use sync::{RetryPolicy, SyncDriver, SyncOutcome, SyncPolicy, SyncReport, SyncTask};
