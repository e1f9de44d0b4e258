// crates/locality-core/src/model.rs
use crate::location::{parse_location, Coordinates};
use serde::{Deserialize, Serialize};

/// One real-world place, as stored in the `localities` table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalityRecord {
    /// Short place name. May be missing in the source data.
    pub name: Option<String>,
    /// Full human-readable name, e.g. `"Smiths Falls, Ontario, Canada"`.
    pub display_name: Option<String>,
    /// Serialized `(longitude, latitude)` pair, see [`crate::location`].
    pub location: Option<String>,
    /// Bounding box, kept verbatim.
    pub bbox: Option<String>,
    /// Place category (`city`, `town`, `village`, ...).
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub population: Option<i64>,
    /// Precomputed code of `name`; `None` until the indexing pass ran.
    pub phonetic_code: Option<String>,
}

impl LocalityRecord {
    /// A record with just a name and a display name.
    pub fn named(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            display_name: Some(display_name.into()),
            ..Self::default()
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_population(mut self, population: i64) -> Self {
        self.population = Some(population);
        self
    }

    /// The name, empty when missing.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    #[inline]
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or("")
    }

    #[inline]
    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or("")
    }

    /// `true` once the indexing pass stored a non-empty code.
    #[inline]
    pub fn is_coded(&self) -> bool {
        self.phonetic_code.as_deref().is_some_and(|c| !c.is_empty())
    }

    /// Parsed location, or `None` when missing or unparsable.
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.location.as_deref().and_then(parse_location)
    }
}
