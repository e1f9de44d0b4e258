// crates/locality-core/src/storage/mod.rs

//! # Record Store
//!
//! The `localities` table lives in a single snapshot: a format marker
//! followed by the bincode-encoded [`Table`]. [`FileStorage`] keeps it on
//! disk (gzip compressed with the `compact` feature), [`MemoryStorage`] keeps
//! it in process.

use crate::error::{Result, StorageError};
use crate::model::LocalityRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

mod file;
#[cfg(feature = "json")]
pub mod import;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Bumped whenever [`Table`] changes shape.
pub const SNAPSHOT_FORMAT: u32 = 1;

/// Upper bound for a decoded snapshot, guards against corrupt length prefixes.
const SNAPSHOT_LIMIT: u64 = 1024 * 1024 * 1024;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Where the table is loaded from and persisted to.
///
/// Implementations must make `persist` all-or-nothing: a reader never sees
/// a partially written table.
pub trait Storage {
    fn load(&self) -> Result<Table>;
    fn persist(&mut self, table: &Table) -> Result<()>;
    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// The stored rows plus the optional lookup accelerator.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub records: Vec<LocalityRecord>,
    /// Present once an indexing pass created it.
    pub code_index: Option<CodeIndex>,
}

/// Phonetic code -> ascending row ids. Rows without a code are not listed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeIndex {
    buckets: BTreeMap<String, Vec<usize>>,
}

impl CodeIndex {
    pub fn build(records: &[LocalityRecord]) -> Self {
        let mut buckets: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (row, record) in records.iter().enumerate() {
            if let Some(code) = record.phonetic_code.as_deref().filter(|c| !c.is_empty()) {
                buckets.entry(code.to_owned()).or_default().push(row);
            }
        }
        Self { buckets }
    }

    /// Row ids stored under `code`, in storage order.
    pub fn rows(&self, code: &str) -> &[usize] {
        self.buckets.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

// -----------------------------------------------------------------------------
// CODEC (shared by every storage)
// -----------------------------------------------------------------------------

pub(crate) fn encode_table(table: &Table) -> Result<Vec<u8>> {
    let mut out = bincode::serialize(&SNAPSHOT_FORMAT)?;
    bincode::serialize_into(&mut out, table)?;
    Ok(out)
}

pub(crate) fn decode_table(bytes: &[u8]) -> Result<Table> {
    use bincode::Options;

    let mut reader = decompress(bytes)?;
    let options = || {
        bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .with_limit(SNAPSHOT_LIMIT)
            .allow_trailing_bytes()
    };

    let found: u32 = options().deserialize_from(&mut reader)?;
    if found != SNAPSHOT_FORMAT {
        return Err(StorageError::IncompatibleSnapshot {
            found,
            expected: SNAPSHOT_FORMAT,
        });
    }
    Ok(options().deserialize_from(&mut reader)?)
}

fn decompress(bytes: &[u8]) -> Result<Box<dyn Read + '_>> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Ok(Box::new(bytes));
    }

    #[cfg(feature = "compact")]
    {
        Ok(Box::new(flate2::read::GzDecoder::new(bytes)))
    }

    #[cfg(not(feature = "compact"))]
    {
        Err(StorageError::InvalidData(
            "snapshot is gzip compressed but 'compact' is disabled".into(),
        ))
    }
}
