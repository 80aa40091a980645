//! Verification of published numeric claims against the observation table.
//!
//! Claims are literal expectations (a single-year value, a period mean, the
//! year of a record low, ...) loaded from TOML. Each one is evaluated
//! independently into a [`CheckOutcome`]; a mismatch or a failed lookup is
//! reported, never raised.
//!
//! ```toml
//! [[claim]]
//! label = "1978 average temperature"
//! kind = "point"
//! variable = "avg_temp"
//! year = 1978
//! expected = 4.6
//!
//! [[claim]]
//! label = "1949-1979 mean snow cover days"
//! kind = "period_mean"
//! variable = "snow_cover_days"
//! start = 1949
//! end = 1979
//! expected = 129
//! tolerance = 1
//! ```

mod outcome;

pub use outcome::{verify_all, CheckOutcome, VerificationSummary};

use crate::core::{ColumnMap, Extreme, ObservationTable};
use crate::error::{ClimateError, Result};
use serde::Deserialize;
use std::path::Path;

/// What a claim measures.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClaimKind {
    /// Value of a variable in one year.
    Point { variable: String, year: i32 },
    /// Mean of a variable over an inclusive year range.
    PeriodMean {
        variable: String,
        start: i32,
        end: i32,
    },
    /// `value(year) − value(minus_year)`.
    Difference {
        variable: String,
        year: i32,
        minus_year: i32,
    },
    /// Percentage decrease from `from_year` to `to_year`.
    PercentDecrease {
        variable: String,
        from_year: i32,
        to_year: i32,
    },
    /// Year of the global minimum or maximum; `expected` is the year.
    ExtremeYear { variable: String, extreme: Extreme },
    /// Number of records in the table.
    RecordCount,
}

/// One literal claim with its tolerance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Claim {
    pub label: String,
    pub expected: f64,
    /// Absolute tolerance; zero requires exact equality.
    #[serde(default)]
    pub tolerance: f64,
    #[serde(flatten)]
    pub kind: ClaimKind,
}

impl Claim {
    /// Compute the statistic the claim refers to.
    ///
    /// Returns the computed value and, for extreme-year claims, the value at
    /// the located year.
    fn compute(&self, table: &ObservationTable, columns: &ColumnMap) -> Result<(f64, Option<f64>)> {
        match &self.kind {
            ClaimKind::Point { variable, year } => {
                Ok((table.value(columns.label(variable)?, *year)?, None))
            }
            ClaimKind::PeriodMean {
                variable,
                start,
                end,
            } => Ok((
                table.period_mean(columns.label(variable)?, *start, *end)?,
                None,
            )),
            ClaimKind::Difference {
                variable,
                year,
                minus_year,
            } => {
                let label = columns.label(variable)?;
                Ok((table.value(label, *year)? - table.value(label, *minus_year)?, None))
            }
            ClaimKind::PercentDecrease {
                variable,
                from_year,
                to_year,
            } => {
                let label = columns.label(variable)?;
                let from = table.value(label, *from_year)?;
                let to = table.value(label, *to_year)?;
                if from == 0.0 {
                    return Err(ClimateError::ComputationError(format!(
                        "zero base value in {from_year}"
                    )));
                }
                Ok(((from - to) / from * 100.0, None))
            }
            ClaimKind::ExtremeYear { variable, extreme } => {
                let (year, value) = table.extreme_year(columns.label(variable)?, *extreme)?;
                Ok((f64::from(year), Some(value)))
            }
            ClaimKind::RecordCount => Ok((table.len() as f64, None)),
        }
    }

    /// Evaluate the claim; lookup failures become failed outcomes.
    pub fn check(&self, table: &ObservationTable, columns: &ColumnMap) -> CheckOutcome {
        match self.compute(table, columns) {
            Ok((computed, located_value)) => {
                CheckOutcome::compare(&self.label, computed, self.expected, self.tolerance)
                    .with_located_value(located_value)
            }
            Err(err) => CheckOutcome::failed(&self.label, self.expected, self.tolerance, &err),
        }
    }
}

/// Claims loaded from a TOML file (`[[claim]]` tables).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClaimSet {
    #[serde(default, rename = "claim")]
    pub claims: Vec<Claim>,
}

impl ClaimSet {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let set: ClaimSet = toml::from_str(text)?;
        if let Some(claim) = set.claims.iter().find(|c| !(c.tolerance >= 0.0)) {
            return Err(ClimateError::InvalidParameter(format!(
                "claim '{}' has a negative tolerance",
                claim.label
            )));
        }
        Ok(set)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}
