//! Accuracy metrics for forecast evaluation.

use crate::error::{ClimateError, Result};

/// Error magnitudes of a set of predictions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
}

/// Calculate MAE and RMSE between actual and predicted values.
pub fn calculate_metrics(actual: &[f64], predicted: &[f64]) -> Result<ErrorMetrics> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(ClimateError::EmptyData);
    }

    if actual.len() != predicted.len() {
        return Err(ClimateError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }

    Ok(ErrorMetrics {
        mae: mae(actual, predicted),
        rmse: rmse(actual, predicted),
    })
}

/// Calculate MAE between two slices.
pub fn mae(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() || actual.is_empty() {
        return f64::NAN;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64
}

/// Calculate MSE between two slices.
pub fn mse(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() || actual.is_empty() {
        return f64::NAN;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / actual.len() as f64
}

/// Calculate RMSE between two slices.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    mse(actual, predicted).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn perfect_prediction_has_zero_error() {
        let actual = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let metrics = calculate_metrics(&actual, &actual).unwrap();
        assert_relative_eq!(metrics.mae, 0.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.rmse, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn known_values() {
        let actual = vec![1.0, 2.0, 3.0, 4.0];
        let predicted = vec![2.0, 2.0, 3.0, 1.0];
        // errors: -1, 0, 0, 3
        let metrics = calculate_metrics(&actual, &predicted).unwrap();
        assert_relative_eq!(metrics.mae, 1.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.rmse, (10.0f64 / 4.0).sqrt(), epsilon = 1e-10);
    }

    #[test]
    fn rmse_never_below_mae() {
        let actual = vec![0.3, -1.2, 4.0, 2.2];
        let predicted = vec![1.0, 0.0, 3.5, 2.0];
        let metrics = calculate_metrics(&actual, &predicted).unwrap();
        assert!(metrics.rmse >= metrics.mae);
    }

    #[test]
    fn dimension_mismatch() {
        let result = calculate_metrics(&[1.0, 2.0, 3.0], &[1.0, 2.0]);
        assert!(matches!(
            result,
            Err(ClimateError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn empty_data() {
        assert!(matches!(
            calculate_metrics(&[], &[]),
            Err(ClimateError::EmptyData)
        ));
        assert!(mae(&[], &[]).is_nan());
    }
}
