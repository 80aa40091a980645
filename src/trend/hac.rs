//! Newey-West (HAC) standard error for the slope of a simple regression.

use crate::error::{ClimateError, Result};

/// Bartlett kernel weight for lag `lag` with truncation `max_lags`.
fn bartlett_weight(lag: usize, max_lags: usize) -> f64 {
    1.0 - lag as f64 / (max_lags as f64 + 1.0)
}

/// Heteroscedasticity and autocorrelation consistent standard error of the
/// slope in `y = a + b·x`.
///
/// `residuals` must come from the OLS fit on `x`. The regressor is centred,
/// which makes the intercept column orthogonal to it, so the slope entry of
/// the sandwich `(X'X)⁻¹ S (X'X)⁻¹` reduces to `S_xx⁻² Σ_l w_l Γ_l`, where
/// `Γ_l` sums the lag-`l` cross products of the scores `(x_t − x̄) e_t`.
pub fn newey_west_slope_stderr(x: &[f64], residuals: &[f64], max_lags: usize) -> Result<f64> {
    if x.len() != residuals.len() {
        return Err(ClimateError::DimensionMismatch {
            expected: x.len(),
            got: residuals.len(),
        });
    }
    let n = x.len();
    if n < 2 {
        return Err(ClimateError::InsufficientData { needed: 2, got: n });
    }

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let centred: Vec<f64> = x.iter().map(|v| v - mean_x).collect();
    let ss_xx: f64 = centred.iter().map(|c| c * c).sum();
    if ss_xx == 0.0 {
        return Err(ClimateError::ComputationError(
            "regressor has zero variance".to_string(),
        ));
    }

    let scores: Vec<f64> = centred.iter().zip(residuals).map(|(c, e)| c * e).collect();

    let mut long_run = scores.iter().map(|s| s * s).sum::<f64>();
    for lag in 1..=max_lags.min(n - 1) {
        let gamma: f64 = scores[lag..]
            .iter()
            .zip(&scores[..n - lag])
            .map(|(a, b)| a * b)
            .sum();
        long_run += 2.0 * bartlett_weight(lag, max_lags) * gamma;
    }

    Ok((long_run.max(0.0)).sqrt() / ss_xx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_lags_is_white_estimator() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let e = vec![0.5, -0.5, -0.5, 0.5];
        // centred x = [-1.5, -0.5, 0.5, 1.5], scores = [-0.75, 0.25, -0.25, 0.75]
        // Σ s² = 1.25, ss_xx = 5
        let se = newey_west_slope_stderr(&x, &e, 0).unwrap();
        assert_relative_eq!(se, 1.25f64.sqrt() / 5.0, epsilon = 1e-12);
    }

    #[test]
    fn one_lag_adds_weighted_autocovariance() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let e = vec![0.5, -0.5, -0.5, 0.5];
        // Γ_1 = -0.75·0.25 + 0.25·-0.25 + -0.25·0.75 = -0.4375, w_1 = 0.5
        let se = newey_west_slope_stderr(&x, &e, 1).unwrap();
        let expected = (1.25 + 2.0 * 0.5 * -0.4375f64).sqrt() / 5.0;
        assert_relative_eq!(se, expected, epsilon = 1e-12);
    }

    #[test]
    fn perfect_fit_has_zero_stderr() {
        let x: Vec<f64> = (0..10).map(f64::from).collect();
        let se = newey_west_slope_stderr(&x, &[0.0; 10], 3).unwrap();
        assert_eq!(se, 0.0);
    }

    #[test]
    fn bartlett_weights_decline() {
        assert_relative_eq!(bartlett_weight(0, 3), 1.0);
        assert_relative_eq!(bartlett_weight(1, 3), 0.75);
        assert_relative_eq!(bartlett_weight(3, 3), 0.25);
    }

    #[test]
    fn mismatched_lengths() {
        assert!(newey_west_slope_stderr(&[1.0, 2.0], &[0.1], 3).is_err());
    }
}
