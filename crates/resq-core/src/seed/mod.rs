//! Bundled default datasets.
//!
//! Seed data is the network-independent ground truth: it is what reads fall
//! back to when the cache is empty or unreachable, and what a sync writes
//! into the cache when no remote source is configured.

mod legal;
mod numbers;

use crate::models::{EmergencyNumber, LegalInfo, Record};

pub use legal::legal_info;
pub use numbers::emergency_numbers;

/// Record types that ship with a bundled dataset.
pub trait Seeded: Record {
    fn seed() -> Vec<Self>;
}

impl Seeded for EmergencyNumber {
    fn seed() -> Vec<Self> {
        emergency_numbers()
    }
}

impl Seeded for LegalInfo {
    fn seed() -> Vec<Self> {
        legal_info()
    }
}
