// crates/locality-core/src/index.rs

//! # Locality Index
//!
//! Owns the record store for its whole lifetime: opened once from an
//! explicitly passed [`Storage`], queried read-only, and maintained by the
//! batch indexing pass ([`LocalityIndex::rebuild_phonetic_index`]).

use crate::common::IndexStats;
use crate::error::Result;
use crate::model::LocalityRecord;
use crate::phonetic::encode_opt;
use crate::storage::{CodeIndex, Storage, Table};
use crate::text::FoldMode;
use crate::traits::{scan_code, scan_substring, CandidateSource};
use serde::{Deserialize, Serialize};

/// Which rows the indexing pass recomputes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RebuildMode {
    /// Every row.
    #[default]
    Full,
    /// Only rows whose code is missing or empty.
    MissingOnly,
}

/// Outcome of one indexing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebuildReport {
    pub mode: RebuildMode,
    /// Rows whose code was computed.
    pub recomputed: usize,
    /// Rows whose stored code differs from before the pass.
    pub changed: usize,
    /// Whether the pass had to create the code accelerator.
    pub created_accelerator: bool,
}

/// The record store plus the precomputed phonetic lookup.
pub struct LocalityIndex<S: Storage> {
    storage: S,
    table: Table,
}

impl<S: Storage> LocalityIndex<S> {
    /// Loads the table from `storage`.
    pub fn open(storage: S) -> Result<Self> {
        let table = storage.load()?;
        tracing::debug!(
            storage = %storage.describe(),
            rows = table.records.len(),
            accelerated = table.code_index.is_some(),
            "locality index opened"
        );
        Ok(Self { storage, table })
    }

    /// Closes the index, handing the storage back.
    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// All rows in storage order.
    pub fn records(&self) -> &[LocalityRecord] {
        &self.table.records
    }

    pub fn len(&self) -> usize {
        self.table.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.records.is_empty()
    }

    /// Whether phonetic lookups go through the code accelerator.
    pub fn is_accelerated(&self) -> bool {
        self.table.code_index.is_some()
    }

    pub fn stats(&self) -> IndexStats {
        let coded = self.table.records.iter().filter(|r| r.is_coded()).count();
        IndexStats {
            records: self.len(),
            coded,
            uncoded: self.len() - coded,
            buckets: self
                .table
                .code_index
                .as_ref()
                .map_or(0, CodeIndex::bucket_count),
            accelerated: self.is_accelerated(),
        }
    }

    /// The batch indexing pass.
    ///
    /// Computes codes for every row (`Full`) or for uncoded rows only
    /// (`MissingOnly`), (re)builds the code accelerator and persists. If
    /// persisting fails the open index keeps its previous state. Running it
    /// again without changes to the data changes nothing.
    pub fn rebuild_phonetic_index(&mut self, mode: RebuildMode) -> Result<RebuildReport> {
        // (row, previous code) for every row this pass touched.
        let mut previous: Vec<(usize, Option<String>)> = Vec::new();
        let mut recomputed = 0;

        for (row, record) in self.table.records.iter_mut().enumerate() {
            if mode == RebuildMode::MissingOnly && record.is_coded() {
                continue;
            }
            recomputed += 1;
            let code = Some(encode_opt(record.name.as_deref()));
            if record.phonetic_code != code {
                previous.push((row, std::mem::replace(&mut record.phonetic_code, code)));
            }
        }

        let created_accelerator = self.table.code_index.is_none();
        let report = RebuildReport {
            mode,
            recomputed,
            changed: previous.len(),
            created_accelerator,
        };

        if previous.is_empty() && !created_accelerator {
            tracing::info!(?mode, recomputed, "phonetic index already up to date");
            return Ok(report);
        }

        let old_index = self
            .table
            .code_index
            .replace(CodeIndex::build(&self.table.records));

        if let Err(e) = self.storage.persist(&self.table) {
            for (row, code) in previous {
                self.table.records[row].phonetic_code = code;
            }
            self.table.code_index = old_index;
            tracing::warn!(storage = %self.storage.describe(), error = %e, "phonetic rebuild rolled back");
            return Err(e);
        }

        tracing::info!(
            ?mode,
            recomputed,
            changed = report.changed,
            created_accelerator,
            "phonetic index rebuilt"
        );
        Ok(report)
    }

    /// Appends rows from the external loader and persists.
    ///
    /// An existing accelerator is refreshed so it covers any codes the new
    /// rows already carry; uncoded rows become phonetically visible after the
    /// next indexing pass.
    pub fn import(&mut self, records: Vec<LocalityRecord>) -> Result<usize> {
        let added = records.len();
        if added == 0 {
            return Ok(0);
        }

        let before = self.table.records.len();
        self.table.records.extend(records);
        let old_index = if self.table.code_index.is_some() {
            self.table
                .code_index
                .replace(CodeIndex::build(&self.table.records))
        } else {
            None
        };

        if let Err(e) = self.storage.persist(&self.table) {
            self.table.records.truncate(before);
            if old_index.is_some() {
                self.table.code_index = old_index;
            }
            return Err(e);
        }

        tracing::info!(storage = %self.storage.describe(), added, total = self.len(), "rows imported");
        Ok(added)
    }
}

impl<S: Storage> CandidateSource for LocalityIndex<S> {
    fn substring_candidates(&self, query: &str, fold: FoldMode) -> Vec<&LocalityRecord> {
        let hits = scan_substring(&self.table.records, query, fold);
        tracing::debug!(query, hits = hits.len(), "substring candidates");
        hits
    }

    fn phonetic_candidates(&self, code: &str) -> Vec<&LocalityRecord> {
        let hits = match &self.table.code_index {
            Some(index) => index
                .rows(code)
                .iter()
                .filter_map(|&row| self.table.records.get(row))
                .collect(),
            None => {
                tracing::debug!(code, "no code accelerator, scanning all rows");
                scan_code(&self.table.records, code)
            }
        };
        tracing::debug!(code, hits = hits.len(), "phonetic candidates");
        hits
    }
}
