//! Observation table: one record per year, named numeric fields.

use super::series::YearlySeries;
use crate::error::{ClimateError, Result};
use std::ops::RangeInclusive;

/// Which end of a distribution to locate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Extreme {
    Min,
    Max,
}

/// Year coverage of a table relative to an expected span.
#[derive(Debug, Clone, PartialEq)]
pub struct Coverage {
    /// Number of records present.
    pub n_years: usize,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    /// Years inside the expected span with no record.
    pub missing_years: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq)]
struct Column {
    label: String,
    values: Vec<Option<f64>>,
}

/// Yearly records keyed by a unique, ascending year.
///
/// Column-major: every column holds one optional value per year. Missing
/// fields are `None`, never NaN.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationTable {
    years: Vec<i32>,
    columns: Vec<Column>,
}

impl ObservationTable {
    /// Create a table with the given years and no columns.
    ///
    /// Years must be strictly increasing.
    pub fn new(years: Vec<i32>) -> Result<Self> {
        if years.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ClimateError::InvalidParameter(
                "years must be unique and ascending".to_string(),
            ));
        }
        Ok(Self {
            years,
            columns: Vec::new(),
        })
    }

    /// Build a table from unordered rows.
    ///
    /// Rows are sorted by year; a repeated year is rejected. Every row must
    /// carry one cell per label.
    pub fn from_rows(labels: Vec<String>, mut rows: Vec<(i32, Vec<Option<f64>>)>) -> Result<Self> {
        for (_, cells) in &rows {
            if cells.len() != labels.len() {
                return Err(ClimateError::DimensionMismatch {
                    expected: labels.len(),
                    got: cells.len(),
                });
            }
        }

        rows.sort_by_key(|(year, _)| *year);
        if let Some(w) = rows.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(ClimateError::InvalidParameter(format!(
                "duplicate year {}",
                w[0].0
            )));
        }

        let years = rows.iter().map(|(year, _)| *year).collect();
        let columns = labels
            .into_iter()
            .enumerate()
            .map(|(idx, label)| Column {
                label,
                values: rows
                    .iter()
                    .map(|(_, cells)| cells[idx].filter(|x| x.is_finite()))
                    .collect(),
            })
            .collect();

        Ok(Self { years, columns })
    }

    /// Add a column, replacing any column with the same label.
    pub fn with_column(mut self, label: impl Into<String>, values: Vec<Option<f64>>) -> Result<Self> {
        if values.len() != self.years.len() {
            return Err(ClimateError::DimensionMismatch {
                expected: self.years.len(),
                got: values.len(),
            });
        }
        let label = label.into();
        let values = values
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect();
        self.columns.retain(|c| c.label != label);
        self.columns.push(Column { label, values });
        Ok(self)
    }

    /// Number of yearly records.
    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn column_labels(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.label.as_str())
    }

    pub fn has_column(&self, label: &str) -> bool {
        self.columns.iter().any(|c| c.label == label)
    }

    /// Raw optional values of a column, aligned with [`years`](Self::years).
    pub fn column(&self, label: &str) -> Result<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| ClimateError::UnknownColumn(label.to_string()))
    }

    /// Extract the aligned series of a column with missing entries dropped.
    ///
    /// A column without any value yields an empty series; callers decide
    /// whether that is an error.
    pub fn series(&self, label: &str) -> Result<YearlySeries> {
        let column = self.column(label)?;
        let (years, values): (Vec<i32>, Vec<f64>) = self
            .years
            .iter()
            .zip(column)
            .filter_map(|(&year, value)| value.map(|v| (year, v)))
            .unzip();
        YearlySeries::new(years, values)
    }

    /// Value of `label` in `year`.
    pub fn value(&self, label: &str, year: i32) -> Result<f64> {
        let column = self.column(label)?;
        self.years
            .binary_search(&year)
            .ok()
            .and_then(|idx| column[idx])
            .ok_or(ClimateError::MissingYear(year))
    }

    /// Keep only records from `start` onwards.
    pub fn from_start_year(&self, start: i32) -> Self {
        self.filter_rows(|idx| self.years[idx] >= start)
    }

    /// Keep only records where every column has a value.
    pub fn complete_rows(&self) -> Self {
        self.filter_rows(|idx| self.columns.iter().all(|c| c.values[idx].is_some()))
    }

    /// Drop columns that have no value at all.
    pub fn without_empty_columns(mut self) -> Self {
        self.columns.retain(|c| c.values.iter().any(Option::is_some));
        self
    }

    /// Mean of `label` over the inclusive year range, ignoring missing values.
    pub fn period_mean(&self, label: &str, start: i32, end: i32) -> Result<f64> {
        let column = self.column(label)?;
        let values: Vec<f64> = self
            .years
            .iter()
            .zip(column)
            .filter(|&(&year, _)| (start..=end).contains(&year))
            .filter_map(|(_, value)| *value)
            .collect();

        if values.is_empty() {
            return Err(ClimateError::InsufficientData { needed: 1, got: 0 });
        }
        Ok(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Year and value of the global minimum or maximum of `label`.
    ///
    /// The earliest year wins on ties.
    pub fn extreme_year(&self, label: &str, extreme: Extreme) -> Result<(i32, f64)> {
        let series = self.series(label)?;
        let mut best: Option<(i32, f64)> = None;
        for (year, value) in series.iter() {
            let better = match (best, extreme) {
                (None, _) => true,
                (Some((_, b)), Extreme::Min) => value < b,
                (Some((_, b)), Extreme::Max) => value > b,
            };
            if better {
                best = Some((year, value));
            }
        }
        best.ok_or(ClimateError::EmptyData)
    }

    /// Coverage of the table against an expected inclusive span of years.
    pub fn coverage(&self, expected: RangeInclusive<i32>) -> Coverage {
        let missing_years = expected
            .filter(|year| self.years.binary_search(year).is_err())
            .collect();
        Coverage {
            n_years: self.len(),
            first_year: self.years.first().copied(),
            last_year: self.years.last().copied(),
            missing_years,
        }
    }

    fn filter_rows(&self, keep: impl Fn(usize) -> bool) -> Self {
        let indices: Vec<usize> = (0..self.len()).filter(|&idx| keep(idx)).collect();
        Self {
            years: indices.iter().map(|&idx| self.years[idx]).collect(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    label: c.label.clone(),
                    values: indices.iter().map(|&idx| c.values[idx]).collect(),
                })
                .collect(),
        }
    }
}
