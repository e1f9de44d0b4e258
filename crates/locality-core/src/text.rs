// crates/locality-core/src/text.rs

//! Text normalization used by the substring read path.

use serde::{Deserialize, Serialize};

/// How names and queries are normalized before substring comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoldMode {
    /// Lowercase only. `"Zürich"` matches `"zür"` but not `"zur"`.
    #[default]
    Case,
    /// Transliterate to ASCII, then lowercase. `"Łódź"` matches `"lodz"`.
    Accents,
}

impl FoldMode {
    /// Normalizes `s` according to the mode.
    pub fn fold(self, s: &str) -> String {
        match self {
            FoldMode::Case => s.to_lowercase(),
            FoldMode::Accents => fold_key(s),
        }
    }
}

/// Convert a string into a folded key suitable for accent-insensitive
/// comparison.
///
/// Transliterates Unicode to ASCII with `deunicode` and lowercases the
/// result.
///
/// ```rust
/// use locality_core::text::fold_key;
///
/// assert_eq!(fold_key("Łódź"), "lodz");
/// assert_eq!(fold_key("Straße"), "strasse");
/// ```
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

/// Returns `true` if `haystack` contains the already folded `needle`.
#[inline]
pub fn contains_folded(haystack: Option<&str>, needle: &str, mode: FoldMode) -> bool {
    haystack.is_some_and(|h| mode.fold(h).contains(needle))
}
