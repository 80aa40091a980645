//! Linear trend estimation for yearly series.
//!
//! [`linear_trend`] fits `value = slope · year + intercept` by least squares.
//! [`robust_trend`] adds statistics that do not lean on independent,
//! homoscedastic residuals: a Newey-West slope standard error, the
//! Mann-Kendall test, the Theil-Sen slope and a Ljung-Box check of the
//! residuals.
//!
//! # Example
//!
//! ```
//! use winter_trends::core::YearlySeries;
//! use winter_trends::trend::linear_trend;
//!
//! let series = YearlySeries::consecutive(2000, vec![1.0, 1.2, 1.4, 1.6, 1.8]).unwrap();
//! let trend = linear_trend(&series).unwrap();
//! assert!((trend.slope_per_decade() - 2.0).abs() < 1e-9);
//! ```

pub mod compare;
pub mod hac;
pub mod kendall;
pub mod ols;
pub mod theil_sen;

pub use compare::{EndpointChange, RateBasis, RateComparison};
pub use hac::newey_west_slope_stderr;
pub use kendall::{mann_kendall, KendallResult};
pub use ols::{fit_line, LineFit};
pub use theil_sen::{theil_sen, TheilSenResult};

use crate::core::YearlySeries;
use crate::error::Result;
use crate::validation::{ljung_box, LjungBoxResult};
use serde::Deserialize;
use std::fmt;
use tracing::debug;

/// Settings for the robust trend statistics.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// Bartlett truncation lag of the HAC estimator.
    pub hac_max_lags: usize,
    /// Lag tested by Ljung-Box on the OLS residuals.
    pub ljung_box_lag: usize,
    /// Confidence level of the Theil-Sen slope band.
    pub theil_sen_confidence: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            hac_max_lags: 3,
            ljung_box_lag: 5,
            theil_sen_confidence: 0.95,
        }
    }
}

/// Qualitative reading of R².
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendStrength {
    Strong,
    Moderate,
    Weak,
}

impl TrendStrength {
    pub fn from_r_squared(r_squared: f64) -> Self {
        if r_squared > 0.5 {
            Self::Strong
        } else if r_squared >= 0.3 {
            Self::Moderate
        } else {
            Self::Weak
        }
    }
}

impl fmt::Display for TrendStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Strong => "strong",
            Self::Moderate => "moderate",
            Self::Weak => "weak",
        };
        f.write_str(s)
    }
}

/// Statistics computed by [`robust_trend`] on top of the OLS fit.
#[derive(Debug, Clone, PartialEq)]
pub struct RobustStats {
    pub hac_stderr: f64,
    /// Two-sided p-value of the slope with the HAC standard error.
    pub hac_p_value: f64,
    pub kendall: KendallResult,
    pub theil_sen: TheilSenResult,
    pub ljung_box: LjungBoxResult,
}

/// Fitted linear trend of one series.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendResult {
    pub n: usize,
    pub first_year: i32,
    pub last_year: i32,
    /// Units per year.
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub stderr: f64,
    pub p_value: f64,
    pub robust: Option<RobustStats>,
}

impl TrendResult {
    pub fn slope_per_decade(&self) -> f64 {
        self.slope * 10.0
    }

    /// Value of the fitted line at `year`.
    pub fn project(&self, year: i32) -> f64 {
        self.slope * f64::from(year) + self.intercept
    }

    pub fn strength(&self) -> TrendStrength {
        TrendStrength::from_r_squared(self.r_squared)
    }

    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

// Callers have checked that `series` holds at least two points.
fn trend_from_fit(series: &YearlySeries, fit: &LineFit) -> TrendResult {
    let years = series.years();
    TrendResult {
        n: series.len(),
        first_year: years[0],
        last_year: years[years.len() - 1],
        slope: fit.slope,
        intercept: fit.intercept,
        r_squared: fit.r * fit.r,
        stderr: fit.stderr,
        p_value: fit.p_value,
        robust: None,
    }
}

/// Ordinary least-squares trend of `series`.
///
/// Needs at least two observations.
pub fn linear_trend(series: &YearlySeries) -> Result<TrendResult> {
    series.require(2)?;
    let fit = fit_line(&series.years_f64(), series.values())?;
    Ok(trend_from_fit(series, &fit))
}

/// OLS trend plus HAC, Mann-Kendall, Theil-Sen and Ljung-Box statistics.
pub fn robust_trend(series: &YearlySeries, config: &TrendConfig) -> Result<TrendResult> {
    series.require(2)?;
    let x = series.years_f64();
    let y = series.values();
    let fit = fit_line(&x, y)?;

    let hac_stderr = newey_west_slope_stderr(&x, &fit.residuals, config.hac_max_lags)?;
    let hac_p_value = if series.len() > 2 && hac_stderr > 0.0 {
        ols::student_t_two_sided(fit.slope / hac_stderr, (series.len() - 2) as f64)
    } else if fit.slope != 0.0 {
        0.0
    } else {
        1.0
    };

    let kendall = mann_kendall(&x, y)?;
    let theil_sen = theil_sen(&x, y, config.theil_sen_confidence)?;
    let ljung_box = ljung_box(&fit.residuals, config.ljung_box_lag, 0);

    debug!(
        n = series.len(),
        slope = fit.slope,
        hac_p = hac_p_value,
        mk_p = kendall.p_value,
        "fitted robust trend"
    );

    let mut result = trend_from_fit(series, &fit);
    result.robust = Some(RobustStats {
        hac_stderr,
        hac_p_value,
        kendall,
        theil_sen,
        ljung_box,
    });
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClimateError;
    use approx::assert_relative_eq;

    fn series(values: Vec<f64>) -> YearlySeries {
        YearlySeries::consecutive(1949, values).unwrap()
    }

    #[test]
    fn linear_series_fits_exactly() {
        let s = series((0..30).map(|i| 10.0 + 0.2 * i as f64).collect());
        let trend = linear_trend(&s).unwrap();
        assert_relative_eq!(trend.slope, 0.2, epsilon = 1e-10);
        assert_relative_eq!(trend.r_squared, 1.0, epsilon = 1e-10);
        assert!(trend.p_value < 1e-10);
        assert_eq!(trend.strength(), TrendStrength::Strong);
        assert!(trend.is_significant(0.05));
        assert_relative_eq!(trend.project(1949 + 40), 18.0, epsilon = 1e-8);
        assert!(trend.robust.is_none());
    }

    #[test]
    fn constant_series() {
        let s = series(vec![3.0; 20]);
        let trend = linear_trend(&s).unwrap();
        assert_relative_eq!(trend.slope, 0.0, epsilon = 1e-12);
        assert_relative_eq!(trend.r_squared, 0.0);
        assert_eq!(trend.strength(), TrendStrength::Weak);
        assert!(!trend.is_significant(0.05));
    }

    #[test]
    fn one_point_is_insufficient() {
        let s = series(vec![1.0]);
        assert!(matches!(
            linear_trend(&s),
            Err(ClimateError::InsufficientData { .. })
        ));
        assert!(robust_trend(&s, &TrendConfig::default()).is_err());
    }

    #[test]
    fn two_points_fit() {
        let s = series(vec![1.0, 3.0]);
        let trend = linear_trend(&s).unwrap();
        assert_relative_eq!(trend.slope, 2.0, epsilon = 1e-12);
        assert_eq!(trend.n, 2);
    }

    #[test]
    fn robust_statistics_agree_on_clear_decline() {
        let values: Vec<f64> = (0..40)
            .map(|i| 80.0 - 0.9 * i as f64 + ((i * 7) % 5) as f64 - 2.0)
            .collect();
        let trend = robust_trend(&series(values), &TrendConfig::default()).unwrap();
        let robust = trend.robust.as_ref().unwrap();

        assert!(trend.slope < 0.0);
        assert!(robust.hac_stderr > 0.0);
        assert!(robust.hac_p_value < 0.01);
        assert!(robust.kendall.tau < -0.8);
        assert!(robust.kendall.p_value < 0.01);
        assert_relative_eq!(robust.theil_sen.slope, -0.9, epsilon = 0.2);
        assert_eq!(robust.ljung_box.lags, 5);
        // period-5 residual pattern
        assert!(robust.ljung_box.p_value < 0.05);
    }

    #[test]
    fn strength_thresholds() {
        assert_eq!(TrendStrength::from_r_squared(0.51), TrendStrength::Strong);
        assert_eq!(TrendStrength::from_r_squared(0.5), TrendStrength::Moderate);
        assert_eq!(TrendStrength::from_r_squared(0.3), TrendStrength::Moderate);
        assert_eq!(TrendStrength::from_r_squared(0.29), TrendStrength::Weak);
        assert_eq!(TrendStrength::Moderate.to_string(), "moderate");
    }

    #[test]
    fn config_defaults() {
        let config = TrendConfig::default();
        assert_eq!(config.hac_max_lags, 3);
        assert_eq!(config.ljung_box_lag, 5);
        assert_relative_eq!(config.theil_sen_confidence, 0.95);
    }
}
