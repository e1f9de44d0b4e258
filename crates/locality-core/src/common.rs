// crates/locality-core/src/common.rs
use serde::{Deserialize, Serialize};

/// Simple aggregate statistics for an open index.
///
/// Returned by [`crate::LocalityIndex::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub records: usize,
    /// Rows with a non-empty phonetic code.
    pub coded: usize,
    pub uncoded: usize,
    /// Distinct phonetic codes in the accelerator (0 without one).
    pub buckets: usize,
    /// Whether the code accelerator exists.
    pub accelerated: bool,
}
