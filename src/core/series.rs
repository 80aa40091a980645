//! Year-indexed univariate series.

use crate::error::{ClimateError, Result};

/// Aligned `(year, value)` pairs for one variable, years strictly increasing.
///
/// Produced by [`ObservationTable::series`](super::ObservationTable::series)
/// after missing entries have been dropped, so every value is finite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearlySeries {
    years: Vec<i32>,
    values: Vec<f64>,
}

impl YearlySeries {
    /// Create a series from aligned years and values.
    ///
    /// Fails when the lengths differ, when years are not strictly increasing
    /// or when a value is not finite.
    pub fn new(years: Vec<i32>, values: Vec<f64>) -> Result<Self> {
        if years.len() != values.len() {
            return Err(ClimateError::DimensionMismatch {
                expected: years.len(),
                got: values.len(),
            });
        }

        if years.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ClimateError::InvalidParameter(
                "years must be strictly increasing".to_string(),
            ));
        }

        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(ClimateError::InvalidParameter(format!(
                "non-finite value for year {}",
                years[pos]
            )));
        }

        Ok(Self { years, values })
    }

    /// Create a series of consecutive years starting at `first_year`.
    pub fn consecutive(first_year: i32, values: Vec<f64>) -> Result<Self> {
        let years = (0..values.len()).map(|i| first_year + i as i32).collect();
        Self::new(years, values)
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.years.len()
    }

    /// Check if the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Years as floating point regressors.
    pub fn years_f64(&self) -> Vec<f64> {
        self.years.iter().map(|&y| f64::from(y)).collect()
    }

    pub fn first_year(&self) -> Option<i32> {
        self.years.first().copied()
    }

    pub fn last_year(&self) -> Option<i32> {
        self.years.last().copied()
    }

    pub fn last_value(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Value recorded for `year`, if any.
    pub fn value_at(&self, year: i32) -> Option<f64> {
        self.years
            .binary_search(&year)
            .ok()
            .map(|idx| self.values[idx])
    }

    /// The first `end` observations.
    pub fn prefix(&self, end: usize) -> Result<YearlySeries> {
        if end > self.len() {
            return Err(ClimateError::InsufficientData {
                needed: end,
                got: self.len(),
            });
        }
        Ok(YearlySeries {
            years: self.years[..end].to_vec(),
            values: self.values[..end].to_vec(),
        })
    }

    /// Fail with `InsufficientData` unless at least `needed` observations exist.
    pub fn require(&self, needed: usize) -> Result<&Self> {
        if self.len() < needed {
            return Err(ClimateError::InsufficientData {
                needed,
                got: self.len(),
            });
        }
        Ok(self)
    }

    /// The `horizon` years following the last observation.
    pub fn future_years(&self, horizon: usize) -> Result<Vec<i32>> {
        let last = self.last_year().ok_or(ClimateError::EmptyData)?;
        Ok((1..=horizon as i32).map(|h| last + h).collect())
    }

    /// Iterate `(year, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.years.iter().copied().zip(self.values.iter().copied())
    }
}
