//! Comparisons between fitted trends and raw endpoint changes.

use super::TrendResult;
use crate::core::YearlySeries;
use crate::error::{ClimateError, Result};
use serde::Deserialize;

/// How two slopes are set against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateBasis {
    /// `|first| − |second|`: which series changes faster regardless of sign.
    Magnitude,
    /// `first − second`: which series rises faster.
    Signed,
}

/// Rate comparison of two trends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateComparison {
    pub basis: RateBasis,
    pub first_slope: f64,
    pub second_slope: f64,
    /// Slope difference in units per year, per `basis`.
    pub difference: f64,
    /// `|first| / |second|`; NaN when the second slope is zero.
    pub ratio: f64,
    pub threshold: f64,
}

impl RateComparison {
    pub fn new(first: &TrendResult, second: &TrendResult, basis: RateBasis, threshold: f64) -> Self {
        let (a, b) = (first.slope, second.slope);
        let difference = match basis {
            RateBasis::Magnitude => a.abs() - b.abs(),
            RateBasis::Signed => a - b,
        };
        let ratio = if b == 0.0 { f64::NAN } else { a.abs() / b.abs() };
        Self {
            basis,
            first_slope: a,
            second_slope: b,
            difference,
            ratio,
            threshold,
        }
    }

    /// Whether the difference is larger than the noise threshold.
    pub fn is_meaningful(&self) -> bool {
        self.difference.abs() > self.threshold
    }

    /// `Some(true)` when the first series changes faster, `None` when the
    /// rates are similar.
    pub fn first_is_faster(&self) -> Option<bool> {
        if !self.is_meaningful() {
            return None;
        }
        Some(match self.basis {
            RateBasis::Magnitude => self.first_slope.abs() > self.second_slope.abs(),
            RateBasis::Signed => self.first_slope > self.second_slope,
        })
    }
}

/// Change between the first and last observation of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndpointChange {
    pub first_year: i32,
    pub last_year: i32,
    pub first_value: f64,
    pub last_value: f64,
}

impl EndpointChange {
    pub fn of(series: &YearlySeries) -> Result<Self> {
        let mut points = series.iter();
        let (first_year, first_value) = points.next().ok_or(ClimateError::EmptyData)?;
        let (last_year, last_value) = points.last().unwrap_or((first_year, first_value));
        Ok(Self {
            first_year,
            last_year,
            first_value,
            last_value,
        })
    }

    pub fn change(&self) -> f64 {
        self.last_value - self.first_value
    }

    pub fn span_years(&self) -> i32 {
        self.last_year - self.first_year
    }
}
