//! CSV reading of the yearly observation table and writing of result tables.

use crate::core::ObservationTable;
use crate::error::{ClimateError, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// How a raw station export is turned into an observation table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Label of the year column after cleaning.
    pub year_column: String,
    /// Raw label renamed to `year_column` when present.
    pub raw_year_column: String,
    /// Metadata columns that are dropped.
    pub drop_columns: Vec<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            year_column: "leto".to_string(),
            raw_year_column: "valid".to_string(),
            drop_columns: vec!["station id".to_string(), "station name".to_string()],
        }
    }
}

fn parse_year(cell: &str) -> Option<i32> {
    let cell = cell.trim();
    cell.parse::<i32>().ok().or_else(|| {
        cell.parse::<f64>()
            .ok()
            .filter(|v| v.fract() == 0.0 && v.abs() < f64::from(i32::MAX))
            .map(|v| v as i32)
    })
}

fn parse_value(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Read an observation table from CSV.
///
/// Header labels are trimmed. Rows whose year cell is not an integer (unit
/// rows, blank lines) are skipped, empty or non-numeric cells become
/// missing values, and columns with no value at all are dropped.
pub fn read_table<R: Read>(reader: R, options: &LoadOptions) -> Result<ObservationTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| {
            let h = h.trim();
            if h == options.raw_year_column {
                options.year_column.clone()
            } else {
                h.to_string()
            }
        })
        .collect();

    let year_idx = headers
        .iter()
        .position(|h| *h == options.year_column)
        .ok_or_else(|| ClimateError::UnknownColumn(options.year_column.clone()))?;

    let value_idx: Vec<usize> = (0..headers.len())
        .filter(|&idx| idx != year_idx && !options.drop_columns.contains(&headers[idx]))
        .collect();
    let labels: Vec<String> = value_idx.iter().map(|&idx| headers[idx].clone()).collect();

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for record in reader.records() {
        let record = record?;
        let Some(year) = record.get(year_idx).and_then(parse_year) else {
            skipped += 1;
            continue;
        };
        let cells = value_idx
            .iter()
            .map(|&idx| record.get(idx).and_then(parse_value))
            .collect();
        rows.push((year, cells));
    }

    debug!(rows = rows.len(), skipped, "parsed csv records");

    let table = ObservationTable::from_rows(labels, rows)?.without_empty_columns();
    if table.is_empty() {
        return Err(ClimateError::EmptyData);
    }
    Ok(table)
}

/// Load and clean an observation table from a CSV file.
pub fn load_table(path: impl AsRef<Path>, options: &LoadOptions) -> Result<ObservationTable> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| ClimateError::Io(format!("{}: {e}", path.display())))?;
    let table = read_table(BufReader::new(file), options)?;
    info!(
        path = %path.display(),
        years = table.len(),
        columns = table.column_labels().count(),
        "loaded observation table"
    );
    Ok(table)
}

/// Write serialisable rows as CSV with a header line, creating parent directories.
pub fn write_rows<S: Serialize>(path: impl AsRef<Path>, rows: &[S]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    debug!(path = %path.display(), rows = rows.len(), "wrote csv");
    Ok(())
}
