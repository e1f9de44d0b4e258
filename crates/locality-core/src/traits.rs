// crates/locality-core/src/traits.rs
use crate::model::LocalityRecord;
use crate::text::{contains_folded, FoldMode};

/// Cheap candidate retrieval, the first stage of every search.
///
/// Implemented by [`crate::LocalityIndex`] (accelerated phonetic lookup) and
/// by plain record slices (linear scans), so the search engine runs the same
/// way over a persisted index and over an ad-hoc list.
///
/// # Examples
/// ```rust
/// use locality_core::prelude::*;
///
/// let mut rows = vec![LocalityRecord::named("Rome", "Rome, Lazio, Italy")];
/// rows[0].phonetic_code = Some(encode(rows[0].name()));
///
/// assert_eq!(rows.substring_candidates("LAZIO", FoldMode::Case).len(), 1);
/// assert_eq!(rows.phonetic_candidates("R500").len(), 1);
/// ```
pub trait CandidateSource {
    /// Records whose name or display name contains `query`, in storage order.
    ///
    /// An empty query has no candidates.
    fn substring_candidates(&self, query: &str, fold: FoldMode) -> Vec<&LocalityRecord>;

    /// Records whose stored phonetic code equals `code`, in storage order.
    ///
    /// Records that were never coded are invisible here until the indexing
    /// pass has run over them.
    fn phonetic_candidates(&self, code: &str) -> Vec<&LocalityRecord>;
}

/// Substring scan shared by every [`CandidateSource`].
pub(crate) fn scan_substring<'a>(
    records: impl IntoIterator<Item = &'a LocalityRecord>,
    query: &str,
    fold: FoldMode,
) -> Vec<&'a LocalityRecord> {
    let q = fold.fold(query);
    if q.is_empty() {
        return Vec::new();
    }
    records
        .into_iter()
        .filter(|r| {
            contains_folded(r.name.as_deref(), &q, fold)
                || contains_folded(r.display_name.as_deref(), &q, fold)
        })
        .collect()
}

/// Linear code scan, used when no accelerator exists.
pub(crate) fn scan_code<'a>(
    records: impl IntoIterator<Item = &'a LocalityRecord>,
    code: &str,
) -> Vec<&'a LocalityRecord> {
    if code.is_empty() {
        return Vec::new();
    }
    records
        .into_iter()
        .filter(|r| r.phonetic_code.as_deref() == Some(code))
        .collect()
}

impl CandidateSource for [LocalityRecord] {
    fn substring_candidates(&self, query: &str, fold: FoldMode) -> Vec<&LocalityRecord> {
        scan_substring(self, query, fold)
    }

    fn phonetic_candidates(&self, code: &str) -> Vec<&LocalityRecord> {
        scan_code(self, code)
    }
}

impl CandidateSource for Vec<LocalityRecord> {
    fn substring_candidates(&self, query: &str, fold: FoldMode) -> Vec<&LocalityRecord> {
        self.as_slice().substring_candidates(query, fold)
    }

    fn phonetic_candidates(&self, code: &str) -> Vec<&LocalityRecord> {
        self.as_slice().phonetic_candidates(code)
    }
}
