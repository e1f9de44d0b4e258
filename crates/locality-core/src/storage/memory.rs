// crates/locality-core/src/storage/memory.rs
use super::{decode_table, encode_table, Storage, Table};
use crate::error::{Result, StorageError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Slot {
    bytes: Option<Vec<u8>>,
    unavailable: bool,
}

/// In-process snapshot, encoded exactly like [`super::FileStorage`] minus
/// compression.
///
/// Clones share the same slot, so a caller can keep a handle after moving
/// one into a [`crate::LocalityIndex`] and flip it offline.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Slot>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every load and persist fails with [`StorageError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.unavailable = unavailable;
    }

    fn lock(&self) -> Result<MutexGuard<'_, Slot>> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| StorageError::Unavailable("memory slot poisoned".into()))?;
        if slot.unavailable {
            return Err(StorageError::Unavailable("memory storage is offline".into()));
        }
        Ok(slot)
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Table> {
        match &self.lock()?.bytes {
            Some(bytes) => decode_table(bytes),
            None => Ok(Table::default()),
        }
    }

    fn persist(&mut self, table: &Table) -> Result<()> {
        let bytes = encode_table(table)?;
        self.lock()?.bytes = Some(bytes);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_owned()
    }
}
