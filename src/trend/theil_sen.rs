//! Theil-Sen robust slope estimator.

use crate::error::{ClimateError, Result};
use crate::utils::stats::{median, median_of_sorted, tie_counts};
use statrs::distribution::{ContinuousCDF, Normal};
use std::cmp::Ordering;

/// Median pairwise slope with its confidence band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TheilSenResult {
    pub slope: f64,
    /// `median(y) − slope · median(x)`
    pub intercept: f64,
    pub low_slope: f64,
    pub high_slope: f64,
    /// Confidence level of `[low_slope, high_slope]`.
    pub confidence: f64,
}

impl TheilSenResult {
    pub fn slope_per_decade(&self) -> f64 {
        self.slope * 10.0
    }
}

fn tie_sum(values: &[f64]) -> f64 {
    tie_counts(values)
        .into_iter()
        .map(|t| {
            let t = t as f64;
            t * (t - 1.0) * (2.0 * t + 5.0)
        })
        .sum()
}

/// Estimate the Theil-Sen slope of `y` against `x`.
///
/// Slopes are taken over every pair with distinct `x`. The confidence band
/// uses the normal approximation to Kendall's S with tie correction; when
/// the band indices cannot be formed the bounds are NaN.
pub fn theil_sen(x: &[f64], y: &[f64], confidence: f64) -> Result<TheilSenResult> {
    if x.len() != y.len() {
        return Err(ClimateError::DimensionMismatch {
            expected: x.len(),
            got: y.len(),
        });
    }
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(ClimateError::InvalidParameter(format!(
            "confidence must be in (0, 1), got {confidence}"
        )));
    }
    let n = x.len();
    if n < 2 {
        return Err(ClimateError::InsufficientData { needed: 2, got: n });
    }

    let mut slopes = Vec::with_capacity(n * (n - 1) / 2);
    for i in 0..n {
        for j in 0..n {
            let dx = x[j] - x[i];
            if dx > 0.0 {
                slopes.push((y[j] - y[i]) / dx);
            }
        }
    }
    if slopes.is_empty() {
        return Err(ClimateError::ComputationError(
            "all x values are identical".to_string(),
        ));
    }
    slopes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let slope = median_of_sorted(&slopes);
    let intercept = median(y) - slope * median(x);

    let alpha = if confidence > 0.5 { 1.0 - confidence } else { confidence };
    let z = Normal::new(0.0, 1.0)
        .map(|dist| dist.inverse_cdf(alpha / 2.0))
        .unwrap_or(f64::NAN);

    let nf = n as f64;
    let variance = (nf * (nf - 1.0) * (2.0 * nf + 5.0) - tie_sum(x) - tie_sum(y)) / 18.0;
    let nt = slopes.len() as f64;
    let (low_slope, high_slope) = if variance >= 0.0 && z.is_finite() {
        let sigma = variance.sqrt();
        let upper = (((nt - z * sigma) / 2.0).round() as i64).min(slopes.len() as i64 - 1);
        let lower = ((((nt + z * sigma) / 2.0).round() as i64) - 1).max(0);
        match (usize::try_from(lower), usize::try_from(upper)) {
            (Ok(lo), Ok(hi)) if lo < slopes.len() && hi < slopes.len() => (slopes[lo], slopes[hi]),
            _ => (f64::NAN, f64::NAN),
        }
    } else {
        (f64::NAN, f64::NAN)
    };

    Ok(TheilSenResult {
        slope,
        intercept,
        low_slope,
        high_slope,
        confidence,
    })
}
