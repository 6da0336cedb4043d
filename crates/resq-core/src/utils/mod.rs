//! Utility functions for string matching and formatting.

pub mod format;

pub use format::{cmp_ids, contains_ignore_case, truncate_string};
