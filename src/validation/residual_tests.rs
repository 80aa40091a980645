//! Residual diagnostic tests.

use crate::utils::stats::autocorrelation;
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Ljung-Box test result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LjungBoxResult {
    /// Test statistic Q
    pub statistic: f64,
    pub p_value: f64,
    /// Number of lags tested
    pub lags: usize,
    /// Degrees of freedom
    pub df: usize,
}

impl LjungBoxResult {
    /// Returns true if we fail to reject the null of no autocorrelation.
    pub fn is_white_noise(&self, alpha: f64) -> bool {
        self.p_value > alpha
    }
}

/// Perform the Ljung-Box test for autocorrelation in residuals.
///
/// Tests the null hypothesis that residuals are independently distributed
/// up to `lags`. The statistic is
/// `Q = n (n + 2) Σ_{k=1..h} ρ_k² / (n − k)` and is compared with a
/// chi-squared distribution with `h − fitted_params` degrees of freedom.
///
/// With fewer than 3 residuals the result is NaN; `lags` is capped at `n − 1`.
pub fn ljung_box(residuals: &[f64], lags: usize, fitted_params: usize) -> LjungBoxResult {
    let n = residuals.len();

    if n < 3 || lags == 0 {
        return LjungBoxResult {
            statistic: f64::NAN,
            p_value: f64::NAN,
            lags: 0,
            df: 0,
        };
    }

    let lags = lags.min(n - 1);
    let df = lags.saturating_sub(fitted_params).max(1);

    let q = (1..=lags)
        .map(|k| autocorrelation(residuals, k).powi(2) / (n - k) as f64)
        .sum::<f64>()
        * n as f64
        * (n + 2) as f64;

    let p_value = ChiSquared::new(df as f64)
        .map(|dist| dist.sf(q))
        .unwrap_or(f64::NAN);

    LjungBoxResult {
        statistic: q,
        p_value,
        lags,
        df,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn constant_residuals_are_white_noise() {
        let result = ljung_box(&[0.5; 20], 5, 0);
        assert_relative_eq!(result.statistic, 0.0, epsilon = 1e-12);
        assert_relative_eq!(result.p_value, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn alternating_residuals_are_autocorrelated() {
        let residuals: Vec<f64> = (0..40).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let result = ljung_box(&residuals, 5, 0);
        assert_eq!(result.lags, 5);
        assert_eq!(result.df, 5);
        assert!(result.statistic > 50.0);
        assert!(!result.is_white_noise(0.05));
    }

    #[test]
    fn known_statistic() {
        // centred = [-2, -1, 0, 1, 2], denom = 10
        // lag 1: (-1*-2 + 0*-1 + 1*0 + 2*1) / 10 = 0.4
        // lag 2: (0*-2 + 1*-1 + 2*0) / 10 = -0.1
        // Q = 5 * 7 * (0.16 / 4 + 0.01 / 3)
        let result = ljung_box(&[1.0, 2.0, 3.0, 4.0, 5.0], 2, 0);
        let expected = 35.0 * (0.16 / 4.0 + 0.01 / 3.0);
        assert_relative_eq!(result.statistic, expected, epsilon = 1e-10);
        assert!(result.p_value > 0.0 && result.p_value < 1.0);
    }

    #[test]
    fn too_short_is_nan() {
        let result = ljung_box(&[1.0, 2.0], 5, 0);
        assert!(result.statistic.is_nan());
        assert!(result.p_value.is_nan());
    }

    #[test]
    fn lags_capped_by_length() {
        let result = ljung_box(&[1.0, -1.0, 2.0, 0.5], 10, 0);
        assert_eq!(result.lags, 3);
    }
}
