//! Model selection and forecasting with an approximate interval.
//!
//! Each candidate model is scored by a rolling-origin one-step backtest
//! ([`backtest`]). The model with the lowest MAE (ties broken by RMSE) is
//! refitted on the whole series and extrapolated `horizon` years ahead.
//!
//! The band around each point is `± 1.96 · RMSE · √h`, where RMSE is the
//! winner's one-step backtest error and `h` the step. This widens one-step
//! error as if step errors were independent; it is a heuristic, not a
//! multi-step prediction interval of the fitted model.
//!
//! # Example
//!
//! ```
//! use winter_trends::core::YearlySeries;
//! use winter_trends::forecast::{forecast_series, ForecastSettings};
//!
//! let values: Vec<f64> = (0..30).map(|i| 100.0 - 2.0 * i as f64).collect();
//! let series = YearlySeries::consecutive(1990, values).unwrap();
//! let result = forecast_series(&series, &ForecastSettings::default(), true).unwrap();
//!
//! assert_eq!(result.points.len(), 10);
//! assert_eq!(result.points[0].year, 2020);
//! assert!(result.points.iter().all(|p| p.low >= 0.0));
//! ```

pub mod backtest;

pub use backtest::{backtest, BacktestResult, ModelScore, DEFAULT_TEST_WINDOW};

use crate::core::YearlySeries;
use crate::error::{ClimateError, Result};
use crate::models::ModelKind;
use crate::utils::stats::round_to;
use serde::Serialize;
use tracing::debug;

/// Normal quantile used for the approximate 95% band.
pub const Z_95: f64 = 1.96;

/// Default number of years forecast past the last observation.
pub const DEFAULT_HORIZON: usize = 10;

/// Decimal places kept in the output tables.
const OUTPUT_DECIMALS: i32 = 3;

/// Half-width of the approximate band at step `step` (1-based).
pub fn interval_half_width(rmse: f64, step: usize) -> f64 {
    Z_95 * rmse * (step as f64).sqrt()
}

/// Backtest and forecast settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSettings {
    /// Number of trailing years in the backtest.
    pub test_window: usize,
    /// Number of years to forecast.
    pub horizon: usize,
    /// Candidate models, in reporting order.
    pub models: Vec<ModelKind>,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            test_window: DEFAULT_TEST_WINDOW,
            horizon: DEFAULT_HORIZON,
            models: ModelKind::ALL.to_vec(),
        }
    }
}

/// One forecast year with its approximate band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastPoint {
    pub year: i32,
    /// 1-based step past the last observation.
    pub step: usize,
    pub forecast: f64,
    pub low: f64,
    pub high: f64,
}

/// Selected model, its backtest and the resulting forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesForecast {
    pub backtest: BacktestResult,
    pub model: ModelKind,
    /// One-step backtest RMSE of the selected model.
    pub rmse: f64,
    pub points: Vec<ForecastPoint>,
}

/// Attach the band to point forecasts, clamping at zero when `non_negative`.
pub fn build_points(
    years: &[i32],
    values: &[f64],
    rmse: f64,
    non_negative: bool,
) -> Result<Vec<ForecastPoint>> {
    if years.len() != values.len() {
        return Err(ClimateError::DimensionMismatch {
            expected: years.len(),
            got: values.len(),
        });
    }

    let floor = |v: f64| if non_negative { v.max(0.0) } else { v };
    Ok(years
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (&year, &value))| {
            let step = i + 1;
            let width = interval_half_width(rmse, step);
            ForecastPoint {
                year,
                step,
                forecast: floor(value),
                low: floor(value - width),
                high: floor(value + width),
            }
        })
        .collect())
}

/// Backtest, select the best model, refit it on all of `series` and forecast.
///
/// `non_negative` clamps point forecasts and bounds at zero.
pub fn forecast_series(
    series: &YearlySeries,
    settings: &ForecastSettings,
    non_negative: bool,
) -> Result<SeriesForecast> {
    let backtest = backtest(series, settings.test_window, &settings.models)?;
    let best = backtest.best().ok_or(ClimateError::EmptyData)?;

    let years = series.future_years(settings.horizon)?;
    let values = best.model.forecast(series, &years)?;
    let points = build_points(&years, &values, best.metrics.rmse, non_negative)?;

    debug!(
        model = best.model.name(),
        mae = best.metrics.mae,
        rmse = best.metrics.rmse,
        "selected model"
    );

    Ok(SeriesForecast {
        backtest,
        model: best.model,
        rmse: best.metrics.rmse,
        points,
    })
}

/// Row of the model summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummaryRow {
    pub variable: String,
    pub model: ModelKind,
    pub test_start_year: i32,
    pub test_end_year: i32,
    pub mae: f64,
    pub rmse: f64,
    pub best_model: bool,
}

/// Row of the forecast table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRow {
    pub variable: String,
    pub model: ModelKind,
    pub year: i32,
    pub forecast: f64,
    pub pi95_low_approx: f64,
    pub pi95_high_approx: f64,
}

impl SeriesForecast {
    /// One summary row per backtested model, all of them present.
    pub fn summary_rows(&self, variable: &str) -> Vec<ModelSummaryRow> {
        self.backtest
            .scores
            .iter()
            .map(|score| ModelSummaryRow {
                variable: variable.to_string(),
                model: score.model,
                test_start_year: self.backtest.test_start_year,
                test_end_year: self.backtest.test_end_year,
                mae: round_to(score.metrics.mae, OUTPUT_DECIMALS),
                rmse: round_to(score.metrics.rmse, OUTPUT_DECIMALS),
                best_model: score.model == self.model,
            })
            .collect()
    }

    pub fn forecast_rows(&self, variable: &str) -> Vec<ForecastRow> {
        self.points
            .iter()
            .map(|p| ForecastRow {
                variable: variable.to_string(),
                model: self.model,
                year: p.year,
                forecast: round_to(p.forecast, OUTPUT_DECIMALS),
                pi95_low_approx: round_to(p.low, OUTPUT_DECIMALS),
                pi95_high_approx: round_to(p.high, OUTPUT_DECIMALS),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn series(values: Vec<f64>) -> YearlySeries {
        YearlySeries::consecutive(1949, values).unwrap()
    }

    #[test]
    fn half_width_grows_with_sqrt_of_step() {
        assert_relative_eq!(interval_half_width(2.0, 1), 3.92, epsilon = 1e-12);
        assert_relative_eq!(interval_half_width(2.0, 4), 7.84, epsilon = 1e-12);
        assert_eq!(interval_half_width(0.0, 9), 0.0);
    }

    #[test]
    fn points_are_clamped_when_non_negative() {
        let points = build_points(&[2026, 2027], &[1.0, -2.0], 1.0, true).unwrap();
        assert_eq!(points[0].low, 0.0);
        assert_relative_eq!(points[0].high, 2.96, epsilon = 1e-12);
        assert_eq!(points[1].forecast, 0.0);
        assert_eq!(points[1].low, 0.0);
        assert_eq!(points[1].step, 2);
    }

    #[test]
    fn points_are_not_clamped_for_temperatures() {
        let points = build_points(&[2026], &[-1.0], 0.5, false).unwrap();
        assert_eq!(points[0].forecast, -1.0);
        assert_relative_eq!(points[0].low, -1.98, epsilon = 1e-12);
    }

    #[test]
    fn linear_series_selects_linear_and_extrapolates() {
        let s = series((0..40).map(|i| 1.0 + 0.25 * i as f64).collect());
        let result = forecast_series(&s, &ForecastSettings::default(), false).unwrap();

        assert_ne!(result.model, ModelKind::Naive);
        assert_eq!(result.points.len(), 10);
        assert_eq!(result.points[0].year, 1989);
        assert_eq!(result.points[9].year, 1998);
        assert_relative_eq!(result.points[0].forecast, 11.0, epsilon = 1e-3);
        assert!(result.rmse < 1e-3);
    }

    #[test]
    fn summary_lists_every_model_once_with_one_best() {
        let s = series((0..40).map(|i| 5.0 + ((i * 7) % 5) as f64 * 0.3).collect());
        let rows = forecast_series(&s, &ForecastSettings::default(), false)
            .unwrap()
            .summary_rows("avg_temp");

        let models: Vec<ModelKind> = rows.iter().map(|r| r.model).collect();
        assert_eq!(models, ModelKind::ALL);
        assert_eq!(rows.iter().filter(|r| r.best_model).count(), 1);

        let duplicated = ForecastSettings {
            models: vec![ModelKind::Linear, ModelKind::Linear],
            ..ForecastSettings::default()
        };
        assert!(forecast_series(&s, &duplicated, false).is_err());
    }

    #[test]
    fn declining_counts_never_go_negative() {
        let s = series((0..30).map(|i| 30.0 - 1.5 * i as f64).map(|v: f64| v.max(0.0) + 1.0).collect());
        let result = forecast_series(&s, &ForecastSettings::default(), true).unwrap();
        for p in &result.points {
            assert!(p.forecast >= 0.0);
            assert!(p.low >= 0.0);
            assert!(p.high >= 0.0);
        }
    }

    #[test]
    fn summary_has_every_model_and_one_best() {
        let s = series((0..25).map(|i| ((i * 7) % 5) as f64).collect());
        let result = forecast_series(&s, &ForecastSettings::default(), true).unwrap();
        let rows = result.summary_rows("frost_days");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows.iter().filter(|r| r.best_model).count(), 1);
        assert!(rows.iter().all(|r| r.test_start_year == 1959 && r.test_end_year == 1973));

        let forecasts = result.forecast_rows("frost_days");
        assert_eq!(forecasts.len(), 10);
        assert!(forecasts.iter().all(|r| r.model == result.model));
    }

    #[test]
    fn short_series_is_insufficient_history() {
        let s = series(vec![1.0; 10]);
        assert!(matches!(
            forecast_series(&s, &ForecastSettings::default(), false),
            Err(ClimateError::InsufficientHistory { .. })
        ));
    }
}
