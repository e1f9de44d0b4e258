// crates/locality-core/src/storage/import.rs

// ---------------------------------------------------------------------------
// FILE GUARD: compiled only with the 'json' feature.
// ---------------------------------------------------------------------------

//! Reading locality rows from a source dataset.
//!
//! The source is a JSON array of objects, optionally gzip compressed
//! (`.json.gz`). Keys follow the `localities` table columns; camelCase and
//! legacy spellings are accepted as aliases.

use crate::error::{Result, StorageError};
use crate::model::LocalityRecord;
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// One row of the source dataset, as loosely typed as the data really is.
#[derive(Debug, Deserialize)]
struct LocalityRaw {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "displayName")]
    display_name: Option<String>,
    /// Either a string or the coordinate array itself.
    #[serde(default)]
    location: Option<Value>,
    #[serde(default)]
    bbox: Option<Value>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    /// Integers, floats and numeric strings all occur in the wild.
    #[serde(default)]
    population: Option<Value>,
    #[serde(default, alias = "phoneticCode", alias = "soundex_name")]
    phonetic_code: Option<String>,
}

impl From<LocalityRaw> for LocalityRecord {
    fn from(raw: LocalityRaw) -> Self {
        LocalityRecord {
            name: raw.name,
            display_name: raw.display_name,
            location: raw.location.and_then(value_to_text),
            bbox: raw.bbox.and_then(value_to_text),
            kind: raw.kind,
            population: raw.population.as_ref().and_then(value_to_i64),
            phonetic_code: raw.phonetic_code.filter(|c| !c.is_empty()),
        }
    }
}

/// Strings are kept verbatim, everything else as compact JSON text.
fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole_f64_to_i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `5943.0` is a population, `12.5` or `1e30` is not.
fn whole_f64_to_i64(f: f64) -> Option<i64> {
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.is_finite() && f.fract() == 0.0 && in_range).then_some(f as i64)
}

/// Reads every row of the dataset at `path`.
///
/// Files ending in `.gz` are decompressed on the fly.
pub fn read_source(path: impl AsRef<Path>) -> Result<Vec<LocalityRecord>> {
    let path = path.as_ref();
    let reader = open_stream(path)?;
    let records = read_source_from(reader)?;
    tracing::info!(path = %path.display(), rows = records.len(), "source dataset read");
    Ok(records)
}

/// Reads every row of a JSON array from `reader`.
pub fn read_source_from(reader: impl Read) -> Result<Vec<LocalityRecord>> {
    let raw: Vec<LocalityRaw> = serde_json::from_reader(reader)?;
    Ok(raw.into_iter().map(LocalityRecord::from).collect())
}

fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        StorageError::NotFound(format!("dataset not found at {}: {}", path.display(), e))
    })?;
    let reader = BufReader::new(file);

    let gzipped = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
    if !gzipped {
        return Ok(Box::new(reader));
    }

    #[cfg(feature = "compact")]
    {
        Ok(Box::new(flate2::read::GzDecoder::new(reader)))
    }

    #[cfg(not(feature = "compact"))]
    {
        Err(StorageError::InvalidData(format!(
            "{} is gzip compressed but 'compact' is disabled",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"[
        {
            "name": "Smiths Falls",
            "display_name": "Smiths Falls, Ontario, Canada",
            "location": "[-76.02, 44.90]",
            "bbox": [-76.06, 44.88, -75.98, 44.92],
            "type": "town",
            "population": 9254
        },
        {
            "name": null,
            "displayName": "Unnamed hamlet",
            "location": [1.5, 2.5],
            "population": "120",
            "soundex_name": "U553"
        },
        { "name": "Lee", "population": 5943.0, "phonetic_code": "" }
    ]"#;

    #[test]
    fn rows_are_normalized() {
        let rows = read_source_from(SOURCE.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].name(), "Smiths Falls");
        assert_eq!(rows[0].kind(), "town");
        assert_eq!(rows[0].population, Some(9254));
        assert_eq!(rows[0].bbox.as_deref(), Some("[-76.06,44.88,-75.98,44.92]"));
        assert!(rows[0].phonetic_code.is_none());

        assert!(rows[1].name.is_none());
        assert_eq!(rows[1].display_name(), "Unnamed hamlet");
        assert_eq!(rows[1].location.as_deref(), Some("[1.5,2.5]"));
        assert_eq!(rows[1].population, Some(120));
        assert_eq!(rows[1].phonetic_code.as_deref(), Some("U553"));

        assert_eq!(rows[2].population, Some(5943));
        assert!(rows[2].phonetic_code.is_none());
    }

    #[test]
    fn only_whole_populations_are_kept() {
        let rows = read_source_from(
            &br#"[
                {"name": "A", "population": 12.5},
                {"name": "B", "population": 1e30},
                {"name": "C", "population": -4.0},
                {"name": "D", "population": 18446744073709551615},
                {"name": "E", "population": "n/a"}
            ]"#[..],
        )
        .unwrap();
        let populations: Vec<Option<i64>> = rows.iter().map(|r| r.population).collect();
        assert_eq!(populations, [None, None, Some(-4), None, None]);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_source(dir.path().join("missing.json")),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn invalid_json_is_reported() {
        assert!(matches!(
            read_source_from(&b"{ not an array"[..]),
            Err(StorageError::Json(_))
        ));
    }

    #[cfg(feature = "compact")]
    #[test]
    fn gzipped_source_is_decompressed() {
        use flate2::{write::GzEncoder, Compression};
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("localities.json.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(SOURCE.as_bytes()).unwrap();
        encoder.finish().unwrap();

        assert_eq!(read_source(&path).unwrap().len(), 3);
    }
}
