// crates/locality-core/src/lib.rs

//! # locality-core
//!
//! Phonetic + substring lookup over a dataset of named places.
//!
//! - [`phonetic`] reduces a name to a 4-character code of how it sounds.
//! - [`similarity`] scores two names by their longest matching blocks.
//! - [`LocalityIndex`] owns the stored rows, their precomputed codes and the
//!   code lookup accelerator, and runs the batch indexing pass.
//! - [`SearchEngine`] turns a query into scored, filtered rows.
//!
//! ```rust
//! use locality_core::prelude::*;
//!
//! let mut index = LocalityIndex::open(MemoryStorage::new())?;
//! index.import(vec![
//!     LocalityRecord::named("Smith", "Smith, Alberta, Canada"),
//!     LocalityRecord::named("Smythe", "Smythe, Nowhere"),
//! ])?;
//! index.rebuild_phonetic_index(RebuildMode::Full)?;
//!
//! let engine = SearchEngine::new(&index);
//! let hits = engine.search("Smith", &SearchOptions::phonetic(Threshold::DEFAULT));
//! assert_eq!(hits.len(), 2);
//! # Ok::<(), locality_core::StorageError>(())
//! ```

pub mod common;
pub mod error;
pub mod index;
pub mod location;
pub mod model;
pub mod phonetic;
pub mod search;
pub mod similarity;
pub mod storage;
pub mod text;
pub mod traits;

// Re-exports
pub use crate::common::IndexStats;
pub use crate::error::{Result, StorageError};
pub use crate::index::{LocalityIndex, RebuildMode, RebuildReport};
pub use crate::location::{parse_location, Coordinates, MalformedLocation};
pub use crate::model::LocalityRecord;
pub use crate::search::{
    ScoredRecord, SearchEngine, SearchMode, SearchOptions, Threshold, ThresholdError,
};
pub use crate::storage::{FileStorage, MemoryStorage, Storage};
pub use crate::text::FoldMode;
pub use crate::traits::CandidateSource;

/// Everything needed to open an index and search it.
pub mod prelude {
    pub use crate::phonetic::encode;
    pub use crate::similarity::similarity;
    pub use crate::{
        CandidateSource, Coordinates, FileStorage, FoldMode, LocalityIndex, LocalityRecord,
        MemoryStorage, RebuildMode, Result, ScoredRecord, SearchEngine, SearchMode,
        SearchOptions, Storage, StorageError, Threshold,
    };
}
