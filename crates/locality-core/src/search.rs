// crates/locality-core/src/search.rs

//! Query orchestration: candidate retrieval, scoring, threshold filtering.

use crate::model::LocalityRecord;
use crate::phonetic::encode;
use crate::similarity::similarity;
use crate::text::FoldMode;
use crate::traits::CandidateSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// How a query is matched against stored names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMode {
    /// Case-insensitive substring of the name or display name. Unscored.
    #[default]
    Substring,
    /// Equal phonetic code, then similarity of the names above a threshold.
    Phonetic,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ThresholdError {
    #[error("similarity threshold must be within [0, 1], got {0}")]
    OutOfRange(f64),
}

/// Minimum similarity a phonetic hit needs. Always finite and within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Threshold(f64);

impl Threshold {
    /// Default of the interactive shell's slider.
    pub const DEFAULT: Threshold = Threshold(0.7);

    pub fn new(value: f64) -> Result<Self, ThresholdError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ThresholdError::OutOfRange(value))
        }
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for Threshold {
    type Error = ThresholdError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-query options.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchOptions {
    pub mode: SearchMode,
    /// Ignored in substring mode.
    pub threshold: Threshold,
    /// Normalization of the substring path.
    pub fold: FoldMode,
}

impl SearchOptions {
    pub fn substring() -> Self {
        Self {
            mode: SearchMode::Substring,
            ..Self::default()
        }
    }

    pub fn phonetic(threshold: Threshold) -> Self {
        Self {
            mode: SearchMode::Phonetic,
            threshold,
            ..Self::default()
        }
    }

    pub fn with_fold(mut self, fold: FoldMode) -> Self {
        self.fold = fold;
        self
    }
}

/// A search hit. `similarity` is set in phonetic mode only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredRecord<'a> {
    #[serde(flatten)]
    pub record: &'a LocalityRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
}

/// Runs queries against a [`CandidateSource`].
///
/// ```rust
/// use locality_core::prelude::*;
///
/// let mut rows = vec![
///     LocalityRecord::named("Smith", "Smith, Alberta, Canada"),
///     LocalityRecord::named("Smythe", "Smythe, Nowhere"),
/// ];
/// for r in &mut rows {
///     r.phonetic_code = Some(encode(r.name()));
/// }
///
/// let engine = SearchEngine::new(&rows);
/// let hits = engine.search("Smith", &SearchOptions::phonetic(Threshold::new(0.5).unwrap()));
/// assert_eq!(hits.len(), 2);
/// assert_eq!(hits[0].similarity, Some(1.0));
/// ```
pub struct SearchEngine<'a, C: CandidateSource + ?Sized> {
    source: &'a C,
}

impl<'a, C: CandidateSource + ?Sized> SearchEngine<'a, C> {
    pub fn new(source: &'a C) -> Self {
        Self { source }
    }

    /// Runs one query.
    ///
    /// A blank query returns no rows. Any other query is matched and scored
    /// exactly as given, surrounding whitespace included. Substring hits come
    /// back in storage order without a score.
    /// Phonetic hits all have `similarity >= threshold` and are sorted by
    /// descending similarity, ties in storage order.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<ScoredRecord<'a>> {
        if query.trim().is_empty() {
            tracing::debug!("blank query, nothing to search");
            return Vec::new();
        }

        match options.mode {
            SearchMode::Substring => self
                .source
                .substring_candidates(query, options.fold)
                .into_iter()
                .map(|record| ScoredRecord {
                    record,
                    similarity: None,
                })
                .collect(),
            SearchMode::Phonetic => self.search_phonetic(query, options.threshold),
        }
    }

    fn search_phonetic(&self, query: &str, threshold: Threshold) -> Vec<ScoredRecord<'a>> {
        let code = encode(query);
        let candidates = self.source.phonetic_candidates(&code);
        let scanned = candidates.len();

        let mut hits: Vec<(f64, &'a LocalityRecord)> = candidates
            .into_iter()
            .map(|record| (similarity(query, record.name()), record))
            .filter(|(score, _)| *score >= threshold.value())
            .collect();
        hits.sort_by(|a, b| b.0.total_cmp(&a.0));

        tracing::debug!(
            query,
            code = %code,
            scanned,
            kept = hits.len(),
            threshold = threshold.value(),
            "phonetic search"
        );

        hits.into_iter()
            .map(|(score, record)| ScoredRecord {
                record,
                similarity: Some(score),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coded(name: &str, display: &str) -> LocalityRecord {
        let mut r = LocalityRecord::named(name, display);
        r.phonetic_code = Some(encode(name));
        r
    }

    fn dataset() -> Vec<LocalityRecord> {
        vec![
            coded("Smythe", "Smythe, Nowhere"),
            coded("Smith", "Smith, Alberta, Canada"),
            coded("Snead", "Snead, Alabama"),
            coded("Ottawa", "Ottawa, Ontario, Canada"),
        ]
    }

    fn names(hits: &[ScoredRecord<'_>]) -> Vec<String> {
        hits.iter().map(|h| h.record.name().to_owned()).collect()
    }

    #[test]
    fn threshold_bounds() {
        assert!(Threshold::new(0.0).is_ok());
        assert!(Threshold::new(1.0).is_ok());
        assert!(Threshold::new(-0.1).is_err());
        assert!(Threshold::new(1.5).is_err());
        assert!(Threshold::new(f64::NAN).is_err());
        assert_eq!(Threshold::default().value(), 0.7);
    }

    #[test]
    fn phonetic_hits_are_scored_and_sorted() {
        let rows = dataset();
        let engine = SearchEngine::new(&rows);
        let hits = engine.search("Smith", &SearchOptions::phonetic(Threshold::new(0.5).unwrap()));

        // "Snead" is S530 too but scores 0.2.
        assert_eq!(names(&hits), ["Smith", "Smythe"]);
        assert_eq!(hits[0].similarity, Some(1.0));
        assert!(hits.iter().all(|h| h.similarity.unwrap() >= 0.5));
    }

    #[test]
    fn zero_threshold_keeps_every_candidate() {
        let rows = dataset();
        let engine = SearchEngine::new(&rows);
        let hits = engine.search("Smith", &SearchOptions::phonetic(Threshold::new(0.0).unwrap()));
        assert_eq!(names(&hits), ["Smith", "Smythe", "Snead"]);
    }

    #[test]
    fn full_threshold_keeps_exact_names_only() {
        let rows = dataset();
        let engine = SearchEngine::new(&rows);
        let hits = engine.search("SMITH", &SearchOptions::phonetic(Threshold::new(1.0).unwrap()));
        assert_eq!(names(&hits), ["Smith"]);
    }

    #[test]
    fn substring_hits_are_unscored() {
        let rows = dataset();
        let engine = SearchEngine::new(&rows);
        let hits = engine.search("canada", &SearchOptions::substring());
        assert_eq!(names(&hits), ["Smith", "Ottawa"]);
        assert!(hits.iter().all(|h| h.similarity.is_none()));
    }

    #[test]
    fn blank_queries_return_nothing() {
        let rows = dataset();
        let engine = SearchEngine::new(&rows);
        assert!(engine.search("", &SearchOptions::substring()).is_empty());
        assert!(engine
            .search("   ", &SearchOptions::phonetic(Threshold::default()))
            .is_empty());
    }

    #[test]
    fn query_whitespace_is_matched_as_given() {
        let rows = vec![coded("Falls", "Falls"), coded("Smith", "Smith")];
        let engine = SearchEngine::new(&rows);

        // "smith " vs "smith": 2 * 5 / 11.
        let hits = engine.search("Smith ", &SearchOptions::phonetic(Threshold::new(0.0).unwrap()));
        assert_eq!(names(&hits), ["Smith"]);
        assert!((hits[0].similarity.unwrap() - 10.0 / 11.0).abs() < 1e-12);
        assert_eq!(hits[0].similarity, Some(similarity("Smith ", "Smith")));

        assert!(engine
            .search("Smith ", &SearchOptions::phonetic(Threshold::new(1.0).unwrap()))
            .is_empty());
        assert!(engine.search("Falls ", &SearchOptions::substring()).is_empty());
        assert_eq!(engine.search("Falls", &SearchOptions::substring()).len(), 1);
    }

    #[test]
    fn nameless_records_score_as_empty_names() {
        let mut nameless = LocalityRecord::default();
        nameless.phonetic_code = Some("S530".into());
        let rows = vec![nameless];
        let engine = SearchEngine::new(&rows);
        let hits = engine.search("Smith", &SearchOptions::phonetic(Threshold::new(0.0).unwrap()));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].similarity, Some(0.0));
    }

    #[test]
    fn serialized_hits_follow_the_mode() {
        let rows = dataset();
        let engine = SearchEngine::new(&rows);

        let phonetic = engine.search("Smith", &SearchOptions::phonetic(Threshold::new(1.0).unwrap()));
        let json = serde_json::to_value(&phonetic[0]).unwrap();
        assert_eq!(json["name"], "Smith");
        assert!(json.get("type").is_some());
        assert!(json.get("kind").is_none());
        assert_eq!(json["similarity"], 1.0);

        let substring = engine.search("Smith", &SearchOptions::substring());
        let json = serde_json::to_value(&substring[0]).unwrap();
        assert!(json.get("similarity").is_none());
    }
}
