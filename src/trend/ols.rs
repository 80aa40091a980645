//! Ordinary least-squares line fit against the year axis.

use crate::error::{ClimateError, Result};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Guards the t statistic against division by zero for a perfect fit.
const TINY: f64 = 1e-20;

/// Result of fitting `y = slope · x + intercept`.
#[derive(Debug, Clone, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation between x and y.
    pub r: f64,
    /// Standard error of the slope.
    pub stderr: f64,
    /// Two-sided p-value for slope = 0 (Student-t, n − 2 df).
    pub p_value: f64,
    /// Residuals `y − ŷ`, aligned with the input.
    pub residuals: Vec<f64>,
}

impl LineFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit a least-squares line.
///
/// Sums are accumulated around the means, so calendar years as regressors
/// do not lose precision. Needs at least two points with distinct `x`.
pub fn fit_line(x: &[f64], y: &[f64]) -> Result<LineFit> {
    if x.len() != y.len() {
        return Err(ClimateError::DimensionMismatch {
            expected: x.len(),
            got: y.len(),
        });
    }
    let n = x.len();
    if n < 2 {
        return Err(ClimateError::InsufficientData { needed: 2, got: n });
    }

    let nf = n as f64;
    let mean_x = x.iter().sum::<f64>() / nf;
    let mean_y = y.iter().sum::<f64>() / nf;

    let mut ss_xx = 0.0;
    let mut ss_yy = 0.0;
    let mut ss_xy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        ss_xx += dx * dx;
        ss_yy += dy * dy;
        ss_xy += dx * dy;
    }

    if ss_xx == 0.0 {
        return Err(ClimateError::ComputationError(
            "regressor has zero variance".to_string(),
        ));
    }

    let slope = ss_xy / ss_xx;
    let intercept = mean_y - slope * mean_x;
    let r = if ss_yy == 0.0 {
        0.0
    } else {
        (ss_xy / (ss_xx * ss_yy).sqrt()).clamp(-1.0, 1.0)
    };

    let (stderr, p_value) = if n == 2 {
        // Two points always lie on the line.
        (0.0, if ss_yy == 0.0 { 1.0 } else { 0.0 })
    } else {
        let df = (n - 2) as f64;
        let t = r * (df / ((1.0 - r + TINY) * (1.0 + r + TINY))).sqrt();
        let stderr = ((1.0 - r * r) * ss_yy / ss_xx / df).max(0.0).sqrt();
        (stderr, student_t_two_sided(t, df))
    };

    let residuals = x
        .iter()
        .zip(y)
        .map(|(&xi, &yi)| yi - (slope * xi + intercept))
        .collect();

    Ok(LineFit {
        slope,
        intercept,
        r,
        stderr,
        p_value,
        residuals,
    })
}

/// Two-sided tail probability of a Student-t statistic.
pub(crate) fn student_t_two_sided(t: f64, df: f64) -> f64 {
    if t.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    if t.is_infinite() {
        return 0.0;
    }
    StudentsT::new(0.0, 1.0, df)
        .map(|dist| (2.0 * dist.sf(t.abs())).min(1.0))
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn exact_line() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![5.0, 8.0, 11.0, 14.0, 17.0];
        let fit = fit_line(&x, &y).unwrap();

        assert_relative_eq!(fit.slope, 3.0, epsilon = 1e-10);
        assert_relative_eq!(fit.intercept, 2.0, epsilon = 1e-10);
        assert_relative_eq!(fit.r, 1.0, epsilon = 1e-12);
        assert!(fit.p_value < 1e-6);
        assert_relative_eq!(fit.predict(6.0), 20.0, epsilon = 1e-10);
        for r in &fit.residuals {
            assert!(r.abs() < 1e-10);
        }
    }

    #[test]
    fn calendar_years_keep_precision() {
        let x: Vec<f64> = (1949..=2025).map(f64::from).collect();
        let y: Vec<f64> = x.iter().map(|&yr| 0.02 * (yr - 1949.0) + 5.0).collect();
        let fit = fit_line(&x, &y).unwrap();
        assert_relative_eq!(fit.slope, 0.02, epsilon = 1e-10);
        assert_relative_eq!(fit.predict(2030.0), 5.0 + 0.02 * 81.0, epsilon = 1e-8);
    }

    #[test]
    fn noisy_line_p_value_matches_t_distribution() {
        // y = x + [0.5, -0.5, -0.5, 0.5]; slope 1, ss_res = 1, ss_xx = 5
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let y = vec![1.5, 1.5, 2.5, 4.5];
        let fit = fit_line(&x, &y).unwrap();
        assert_relative_eq!(fit.slope, 1.0, epsilon = 1e-12);
        // stderr = sqrt(ss_res / df / ss_xx) = sqrt(1 / 2 / 5)
        assert_relative_eq!(fit.stderr, (0.1f64).sqrt(), epsilon = 1e-10);
        let t = fit.slope / fit.stderr;
        let expected = student_t_two_sided(t, 2.0);
        assert_relative_eq!(fit.p_value, expected, epsilon = 1e-6);
        assert!(fit.p_value > 0.01 && fit.p_value < 0.2);
    }

    #[test]
    fn constant_series_has_flat_slope() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let y = vec![3.0; 4];
        let fit = fit_line(&x, &y).unwrap();
        assert_relative_eq!(fit.slope, 0.0, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept, 3.0, epsilon = 1e-12);
        assert_relative_eq!(fit.p_value, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn two_points() {
        let fit = fit_line(&[2000.0, 2001.0], &[1.0, 3.0]).unwrap();
        assert_relative_eq!(fit.slope, 2.0, epsilon = 1e-12);
        assert_eq!(fit.p_value, 0.0);
        assert_eq!(fit.stderr, 0.0);
    }

    #[test]
    fn single_point_is_insufficient() {
        assert!(matches!(
            fit_line(&[2000.0], &[1.0]),
            Err(ClimateError::InsufficientData { needed: 2, got: 1 })
        ));
    }

    #[test]
    fn t_tail_probability() {
        assert_relative_eq!(student_t_two_sided(0.0, 10.0), 1.0, epsilon = 1e-12);
        // t(10) 97.5% quantile ≈ 2.228
        assert_relative_eq!(student_t_two_sided(2.228, 10.0), 0.05, epsilon = 1e-3);
        assert_eq!(student_t_two_sided(f64::INFINITY, 10.0), 0.0);
    }
}
