//! Turning search hits into something a person (or a pipe) can read.

use locality_core::{ScoredRecord, SearchMode};
use serde::Serialize;
use std::io::{self, Write};

/// One output row: the displayed columns plus parsed coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub name: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub population: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    /// `None` when the stored location is missing or unparsable.
    pub lon: Option<f64>,
    pub lat: Option<f64>,
}

impl From<&ScoredRecord<'_>> for ResultRow {
    fn from(hit: &ScoredRecord<'_>) -> Self {
        let coords = hit.record.coordinates();
        ResultRow {
            name: hit.record.name().to_owned(),
            display_name: hit.record.display_name().to_owned(),
            kind: hit.record.kind().to_owned(),
            population: hit.record.population,
            similarity: hit.similarity,
            lon: coords.map(|c| c.lon),
            lat: coords.map(|c| c.lat),
        }
    }
}

impl ResultRow {
    pub fn is_mappable(&self) -> bool {
        self.lon.is_some() && self.lat.is_some()
    }
}

pub fn rows(hits: &[ScoredRecord<'_>]) -> Vec<ResultRow> {
    hits.iter().map(ResultRow::from).collect()
}

/// Writes hits as a pretty JSON array.
pub fn write_json(out: &mut impl Write, rows: &[ResultRow]) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, rows)?;
    writeln!(out)
}

/// Writes hits as an aligned table. The similarity column only appears in
/// phonetic mode.
pub fn write_table(out: &mut impl Write, rows: &[ResultRow], mode: SearchMode) -> io::Result<()> {
    if rows.is_empty() {
        return writeln!(out, "No localities found.");
    }

    let scored = mode == SearchMode::Phonetic;
    let mut header = vec!["name", "display_name", "type", "population"];
    if scored {
        header.push("similarity");
    }
    header.extend(["lon", "lat"]);

    let cells: Vec<Vec<String>> = rows.iter().map(|r| row_cells(r, scored)).collect();
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    writeln!(out, "Found {} matching localities:", rows.len())?;
    let header: Vec<String> = header.iter().map(|h| h.to_string()).collect();
    write_line(out, &header, &widths)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_line(out, &rule, &widths)?;
    for row in &cells {
        write_line(out, row, &widths)?;
    }

    let mappable = rows.iter().filter(|r| r.is_mappable()).count();
    writeln!(out, "{mappable} of {} localities have map coordinates.", rows.len())
}

fn row_cells(row: &ResultRow, scored: bool) -> Vec<String> {
    let mut cells = vec![
        row.name.clone(),
        row.display_name.clone(),
        row.kind.clone(),
        opt(row.population),
    ];
    if scored {
        cells.push(row.similarity.map_or_else(|| "-".into(), |s| format!("{s:.3}")));
    }
    cells.push(row.lon.map_or_else(|| "-".into(), |v| format!("{v:.5}")));
    cells.push(row.lat.map_or_else(|| "-".into(), |v| format!("{v:.5}")));
    cells
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map_or_else(|| "-".into(), |v| v.to_string())
}

fn write_line(out: &mut impl Write, cells: &[String], widths: &[usize]) -> io::Result<()> {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, &w)| format!("{c:<w$}"))
        .collect();
    writeln!(out, "{}", line.join("  ").trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use locality_core::LocalityRecord;

    fn record(location: &str) -> LocalityRecord {
        LocalityRecord::named("Smith Falls", "Smith Falls, Ontario, Canada")
            .with_location(location)
            .with_kind("town")
            .with_population(9254)
    }

    fn render(rows: &[ResultRow], mode: SearchMode) -> String {
        let mut out = Vec::new();
        write_table(&mut out, rows, mode).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_results_say_so() {
        assert_eq!(render(&[], SearchMode::Substring), "No localities found.\n");
    }

    #[test]
    fn similarity_column_only_in_phonetic_mode() {
        let r = record("[-76.02, 44.9]");
        let hit = ScoredRecord { record: &r, similarity: Some(0.8181) };
        let rows = rows(&[hit]);

        let phonetic = render(&rows, SearchMode::Phonetic);
        assert!(phonetic.contains("similarity"));
        assert!(phonetic.contains("0.818"));
        assert!(phonetic.contains("1 of 1 localities have map coordinates."));

        let plain = ScoredRecord { record: &r, similarity: None };
        let substring = render(&super::rows(&[plain]), SearchMode::Substring);
        assert!(!substring.contains("similarity"));
        assert!(substring.starts_with("Found 1 matching localities:"));
    }

    #[test]
    fn unparsable_location_renders_as_dash() {
        let r = record("not json");
        let row = ResultRow::from(&ScoredRecord { record: &r, similarity: None });
        assert!(!row.is_mappable());
        let table = render(&[row], SearchMode::Substring);
        assert!(table.contains("0 of 1 localities have map coordinates."));
    }

    #[test]
    fn json_rows_omit_similarity_when_unscored() {
        let r = record("[1.0, 2.0]");
        let row = ResultRow::from(&ScoredRecord { record: &r, similarity: None });
        let mut out = Vec::new();
        write_json(&mut out, &[row]).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json[0]["type"], "town");
        assert_eq!(json[0]["lon"], 1.0);
        assert!(json[0].get("similarity").is_none());
    }
}
