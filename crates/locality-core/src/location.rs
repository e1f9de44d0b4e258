// crates/locality-core/src/location.rs

//! Display-side parsing of the serialized `location` field.
//!
//! Locations arrive as text holding a `(longitude, latitude)` pair, either as
//! a JSON array (`[12.49, 41.89]`) or as a looser literal (`(12.49, 41.89)`,
//! `12.49, 41.89`, quoted numbers). Matching never looks at coordinates; a
//! location that cannot be parsed only makes the record unmappable.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A geographic point. Longitude first, as stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lon: f64,
    pub lat: f64,
}

/// Why a location string could not be turned into [`Coordinates`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedLocation {
    #[error("location is empty")]
    Empty,
    #[error("expected 2 coordinates, found {0}")]
    Arity(usize),
    #[error("not a finite number: {0:?}")]
    NotANumber(String),
}

/// Parses `raw` into coordinates, or `None` if neither strategy applies.
///
/// ```rust
/// use locality_core::location::parse_location;
///
/// let p = parse_location("[12.5, 41.9]").unwrap();
/// assert_eq!((p.lon, p.lat), (12.5, 41.9));
/// assert!(parse_location("(12.5, 41.9)").is_some());
/// assert!(parse_location("not json").is_none());
/// ```
pub fn parse_location(raw: &str) -> Option<Coordinates> {
    match try_parse_location(raw) {
        Ok(coords) => Some(coords),
        Err(err) => {
            tracing::trace!(location = raw, error = %err, "unmappable location");
            None
        }
    }
}

/// Like [`parse_location`], but reports why parsing failed.
pub fn try_parse_location(raw: &str) -> Result<Coordinates, MalformedLocation> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(MalformedLocation::Empty);
    }
    structured(raw).map_or_else(|| literal(raw), |pair| from_pair(&pair))
}

/// Strategy 1: a JSON array of numbers.
#[cfg(feature = "json")]
fn structured(raw: &str) -> Option<Vec<f64>> {
    serde_json::from_str::<Vec<f64>>(raw).ok()
}

#[cfg(not(feature = "json"))]
fn structured(_raw: &str) -> Option<Vec<f64>> {
    None
}

/// Strategy 2: a bracketed or bare, comma separated literal.
fn literal(raw: &str) -> Result<Coordinates, MalformedLocation> {
    let inner = strip_brackets(raw);
    let parts: Vec<&str> = inner
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() != 2 {
        return Err(MalformedLocation::Arity(parts.len()));
    }

    let mut values = Vec::with_capacity(2);
    for part in parts {
        let unquoted = part.trim_matches(|c| c == '"' || c == '\'').trim();
        let value: f64 = unquoted
            .parse()
            .map_err(|_| MalformedLocation::NotANumber(part.to_string()))?;
        values.push(value);
    }
    from_pair(&values)
}

fn strip_brackets(raw: &str) -> &str {
    for (open, close) in [('[', ']'), ('(', ')')] {
        if let Some(inner) = raw.strip_prefix(open).and_then(|r| r.strip_suffix(close)) {
            return inner;
        }
    }
    raw
}

fn from_pair(values: &[f64]) -> Result<Coordinates, MalformedLocation> {
    match *values {
        [lon, lat] => {
            for v in [lon, lat] {
                if !v.is_finite() {
                    return Err(MalformedLocation::NotANumber(v.to_string()));
                }
            }
            Ok(Coordinates { lon, lat })
        }
        _ => Err(MalformedLocation::Arity(values.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_array() {
        assert_eq!(
            parse_location("[-75.69, 45.42]"),
            Some(Coordinates { lon: -75.69, lat: 45.42 })
        );
    }

    #[test]
    fn literal_tuple_and_bare_pair() {
        let expected = Some(Coordinates { lon: 2.35, lat: 48.85 });
        assert_eq!(parse_location("(2.35, 48.85)"), expected);
        assert_eq!(parse_location("2.35,48.85"), expected);
        assert_eq!(parse_location("['2.35', '48.85']"), expected);
        assert_eq!(parse_location("  [2.35, 48.85]  "), expected);
    }

    #[test]
    fn malformed_inputs_are_reported() {
        assert_eq!(try_parse_location(""), Err(MalformedLocation::Empty));
        assert_eq!(try_parse_location("not json"), Err(MalformedLocation::Arity(1)));
        assert_eq!(try_parse_location("[1.0, 2.0, 3.0]"), Err(MalformedLocation::Arity(3)));
        assert!(matches!(
            try_parse_location("(abc, 1.0)"),
            Err(MalformedLocation::NotANumber(_))
        ));
        assert!(parse_location("(inf, 1.0)").is_none());
    }
}
