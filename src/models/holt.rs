//! Holt's Linear Trend forecasting model.
//!
//! Also known as double exponential smoothing, this model is suitable for
//! data with a linear trend but no seasonality.

use crate::core::YearlySeries;
use crate::error::{ClimateError, Result};
use crate::models::Forecaster;
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use tracing::debug;

const PARAM_BOUNDS: (f64, f64) = (0.0001, 0.9999);

/// Smoothing parameters used when the series is too short to estimate them.
const FALLBACK_ALPHA: f64 = 0.5;
const FALLBACK_BETA: f64 = 0.1;

/// Shortest series for which the parameters are estimated.
const MIN_OPTIMIZE_LEN: usize = 3;

/// Holt's Linear Trend forecaster.
///
/// The model equations are:
/// - Level: `l_t = α × y_t + (1-α) × (l_{t-1} + b_{t-1})`
/// - Trend: `b_t = β × (l_t - l_{t-1}) + (1-β) × b_{t-1}`
/// - Forecast: `ŷ_{t+h} = l_t + h × b_t`
///
/// `α`, `β` and the initial states `l_0`, `b_0` are estimated together by
/// minimising the sum of squared one-step errors, which is the Gaussian
/// likelihood objective. Series shorter than three observations skip the
/// estimation and use `α = 0.5`, `β = 0.1` with heuristic initial states.
#[derive(Debug, Clone)]
pub struct HoltLinearTrend {
    /// Level smoothing parameter (0 < alpha < 1).
    alpha: Option<f64>,
    /// Trend smoothing parameter (0 < beta < 1).
    beta: Option<f64>,
    /// Whether to estimate parameters from the data.
    optimize: bool,
    /// Level before the first observation.
    initial_level: Option<f64>,
    /// Trend before the first observation.
    initial_trend: Option<f64>,
    /// Current level state.
    level: Option<f64>,
    /// Current trend state.
    trend: Option<f64>,
    /// Fitted values.
    fitted: Option<Vec<f64>>,
    /// Sum of squared one-step errors.
    sse: Option<f64>,
}

impl HoltLinearTrend {
    /// Create a Holt model that estimates its parameters when fitted.
    pub fn new() -> Self {
        Self {
            alpha: None,
            beta: None,
            optimize: true,
            initial_level: None,
            initial_trend: None,
            level: None,
            trend: None,
            fitted: None,
            sse: None,
        }
    }

    /// Create a Holt model with fixed smoothing parameters.
    ///
    /// Initial states still come from the first observations.
    pub fn with_params(alpha: f64, beta: f64) -> Self {
        Self {
            alpha: Some(alpha.clamp(PARAM_BOUNDS.0, PARAM_BOUNDS.1)),
            beta: Some(beta.clamp(PARAM_BOUNDS.0, PARAM_BOUNDS.1)),
            optimize: false,
            ..Self::new()
        }
    }

    /// Get the level smoothing parameter.
    pub fn alpha(&self) -> Option<f64> {
        self.alpha
    }

    /// Get the trend smoothing parameter.
    pub fn beta(&self) -> Option<f64> {
        self.beta
    }

    /// Get the current level.
    pub fn level(&self) -> Option<f64> {
        self.level
    }

    /// Get the current trend.
    pub fn trend(&self) -> Option<f64> {
        self.trend
    }

    /// Level and trend before the first observation.
    pub fn initial_state(&self) -> Option<(f64, f64)> {
        self.initial_level.zip(self.initial_trend)
    }

    /// Sum of squared in-sample one-step errors.
    pub fn sse(&self) -> Option<f64> {
        self.sse
    }

    /// Run the recursions from the given initial states.
    ///
    /// Returns the final `(level, trend)`, the one-step predictions and their SSE.
    fn filter(values: &[f64], alpha: f64, beta: f64, l0: f64, b0: f64) -> (f64, f64, Vec<f64>, f64) {
        let mut l = l0;
        let mut b = b0;
        let mut fitted = Vec::with_capacity(values.len());
        let mut sse = 0.0;

        for &y in values {
            let forecast = l + b;
            fitted.push(forecast);
            sse += (y - forecast).powi(2);

            let l_prev = l;
            l = alpha * y + (1.0 - alpha) * (l_prev + b);
            b = beta * (l - l_prev) + (1.0 - beta) * b;
        }

        (l, b, fitted, sse)
    }

    /// Initial level and trend that reproduce the first two observations.
    fn initialize_state(values: &[f64]) -> (f64, f64) {
        match values {
            [] => (0.0, 0.0),
            [y0] => (*y0, 0.0),
            [y0, y1, ..] => {
                let trend = y1 - y0;
                (y0 - trend, trend)
            }
        }
    }

    /// Estimate `(α, β, l_0, b_0)` with Nelder-Mead.
    fn optimize_params(values: &[f64], alpha0: f64, beta0: f64) -> (f64, f64, f64, f64) {
        let (l0, b0) = Self::initialize_state(values);
        let config = NelderMeadConfig {
            max_iter: 2000,
            tolerance: 1e-10,
            ..Default::default()
        };

        let result = nelder_mead(
            |p| Self::filter(values, p[0], p[1], p[2], p[3]).3,
            &[alpha0, beta0, l0, b0],
            Some(&[
                PARAM_BOUNDS,
                PARAM_BOUNDS,
                (f64::NEG_INFINITY, f64::INFINITY),
                (f64::NEG_INFINITY, f64::INFINITY),
            ]),
            &config,
        );

        debug!(
            iterations = result.iterations,
            converged = result.converged,
            sse = result.optimal_value,
            "estimated holt parameters"
        );

        let p = &result.optimal_point;
        (
            p[0].clamp(PARAM_BOUNDS.0, PARAM_BOUNDS.1),
            p[1].clamp(PARAM_BOUNDS.0, PARAM_BOUNDS.1),
            p[2],
            p[3],
        )
    }
}

impl Default for HoltLinearTrend {
    fn default() -> Self {
        Self::new()
    }
}

impl Forecaster for HoltLinearTrend {
    fn fit(&mut self, series: &YearlySeries) -> Result<()> {
        let values = series.values();
        if values.is_empty() {
            return Err(ClimateError::EmptyData);
        }

        let (alpha, beta, l0, b0) = if self.optimize && values.len() >= MIN_OPTIMIZE_LEN {
            Self::optimize_params(values, FALLBACK_ALPHA, FALLBACK_BETA)
        } else {
            let (l0, b0) = Self::initialize_state(values);
            (
                self.alpha.unwrap_or(FALLBACK_ALPHA),
                self.beta.unwrap_or(FALLBACK_BETA),
                l0,
                b0,
            )
        };

        let (level, trend, fitted, sse) = Self::filter(values, alpha, beta, l0, b0);
        if !level.is_finite() || !trend.is_finite() {
            return Err(ClimateError::ComputationError(
                "holt recursion diverged".to_string(),
            ));
        }

        self.alpha = Some(alpha);
        self.beta = Some(beta);
        self.initial_level = Some(l0);
        self.initial_trend = Some(b0);
        self.level = Some(level);
        self.trend = Some(trend);
        self.fitted = Some(fitted);
        self.sse = Some(sse);

        Ok(())
    }

    /// The h-th target receives the h-step-ahead forecast.
    fn predict(&self, target_years: &[i32]) -> Result<Vec<f64>> {
        let l = self.level.ok_or(ClimateError::FitRequired)?;
        let b = self.trend.ok_or(ClimateError::FitRequired)?;

        Ok((1..=target_years.len())
            .map(|h| l + h as f64 * b)
            .collect())
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn name(&self) -> &str {
        "holt"
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
    fn linear_series_is_tracked_exactly() {
        let s = series((0..25).map(|i| 10.0 + 2.0 * i as f64).collect());
        let mut model = HoltLinearTrend::new();
        model.fit(&s).unwrap();

        assert!(model.sse().unwrap() < 1e-8);
        let predictions = model.predict(&[1974, 1975, 1976]).unwrap();
        assert_relative_eq!(predictions[0], 60.0, epsilon = 1e-4);
        assert_relative_eq!(predictions[1], 62.0, epsilon = 1e-4);
        assert_relative_eq!(predictions[2], 64.0, epsilon = 1e-4);
    }

    #[test]
    fn constant_series_stays_flat() {
        let s = series(vec![3.0; 20]);
        let mut model = HoltLinearTrend::new();
        model.fit(&s).unwrap();

        for p in model.predict(&[1969, 1970, 1971, 1978]).unwrap() {
            assert_relative_eq!(p, 3.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn parameters_stay_in_bounds() {
        let values: Vec<f64> = (0..30)
            .map(|i| 50.0 - 0.7 * i as f64 + ((i * 13) % 7) as f64)
            .collect();
        let mut model = HoltLinearTrend::new();
        model.fit(&series(values)).unwrap();

        let alpha = model.alpha().unwrap();
        let beta = model.beta().unwrap();
        assert!((0.0001..=0.9999).contains(&alpha));
        assert!((0.0001..=0.9999).contains(&beta));
    }

    #[test]
    fn estimation_does_not_worsen_the_starting_point() {
        let values = vec![4.0, 6.5, 5.0, 7.5, 6.0, 8.0, 7.0, 9.5];
        let mut fixed = HoltLinearTrend::with_params(0.5, 0.1);
        let mut estimated = HoltLinearTrend::new();
        fixed.fit(&series(values.clone())).unwrap();
        estimated.fit(&series(values)).unwrap();
        assert!(estimated.sse().unwrap() <= fixed.sse().unwrap() + 1e-12);
    }

    #[test]
    fn short_series_degrade_gracefully() {
        let mut model = HoltLinearTrend::new();
        model.fit(&series(vec![5.0])).unwrap();
        assert_eq!(model.predict(&[1950, 1951]).unwrap(), vec![5.0, 5.0]);

        let mut model = HoltLinearTrend::new();
        model.fit(&series(vec![5.0, 6.0])).unwrap();
        assert_eq!(model.alpha(), Some(0.5));
        assert_eq!(model.initial_state(), Some((4.0, 1.0)));
        let predictions = model.predict(&[1951, 1952]).unwrap();
        assert_relative_eq!(predictions[0], 7.0, epsilon = 1e-12);
        assert_relative_eq!(predictions[1], 8.0, epsilon = 1e-12);
    }

    #[test]
    fn horizon_follows_target_order_not_year() {
        let s = series((0..10).map(|i| i as f64).collect());
        let mut model = HoltLinearTrend::new();
        model.fit(&s).unwrap();
        let a = model.predict(&[1959]).unwrap();
        let b = model.predict(&[1970]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn requires_fit() {
        assert!(matches!(
            HoltLinearTrend::new().predict(&[2000]),
            Err(ClimateError::FitRequired)
        ));
    }
}
