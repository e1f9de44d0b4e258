// crates/locality-core/src/storage/file.rs
use super::{decode_table, encode_table, Storage, Table};
use crate::error::{Result, StorageError};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

#[cfg(feature = "compact")]
use flate2::{write::GzEncoder, Compression};

/// Snapshot file on disk.
///
/// A missing file loads as an empty table. Writes go to a temporary file in
/// the same directory which is then renamed over the target.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_compressed(&self, bytes: &[u8], out: &mut impl Write) -> Result<()> {
        #[cfg(feature = "compact")]
        {
            let mut encoder = GzEncoder::new(out, Compression::default());
            encoder.write_all(bytes)?;
            encoder.finish()?;
        }

        #[cfg(not(feature = "compact"))]
        {
            out.write_all(bytes)?;
        }

        Ok(())
    }
}

impl Storage for FileStorage {
    fn load(&self) -> Result<Table> {
        match fs::read(&self.path) {
            Ok(bytes) => decode_table(&bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no snapshot yet, starting empty");
                Ok(Table::default())
            }
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn persist(&mut self, table: &Table) -> Result<()> {
        let bytes = encode_table(table)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        self.write_compressed(&bytes, tmp.as_file_mut())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StorageError::Persist {
            path: self.path.clone(),
            source: e.error,
        })?;

        tracing::debug!(
            path = %self.path.display(),
            rows = table.records.len(),
            "snapshot persisted"
        );
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
