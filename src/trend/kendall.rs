//! Mann-Kendall monotonic trend test (Kendall's tau-b against time).

use crate::error::{ClimateError, Result};
use crate::utils::stats::tie_counts;
use statrs::distribution::{ContinuousCDF, Normal};

/// Result of the Mann-Kendall test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KendallResult {
    /// Kendall's tau-b.
    pub tau: f64,
    /// Concordant minus discordant pairs.
    pub s: f64,
    /// Standardised statistic.
    pub z: f64,
    /// Two-sided p-value; exact for short tie-free samples, otherwise from
    /// the normal approximation.
    pub p_value: f64,
}

fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Largest tie-free sample that uses the exact null distribution.
const EXACT_MAX_N: usize = 33;

/// Two-sided exact p-value for `discordant` pairs among `n` untied values.
///
/// Builds the distribution of inversion counts over permutations of `n`,
/// truncated at the smaller tail.
fn exact_p_value(n: usize, discordant: usize) -> f64 {
    let total = n * (n - 1) / 2;
    let c = discordant.min(total - discordant);
    if n <= 2 || 2 * c == total {
        return 1.0;
    }

    let mut dist = vec![0.0; c + 1];
    dist[0] = 1.0;
    for k in 2..=n {
        let previous = dist.clone();
        let mut window = 0.0;
        for j in 0..=c {
            window += previous[j];
            if j >= k {
                window -= previous[j - k];
            }
            dist[j] = window / k as f64;
        }
    }
    (2.0 * dist.iter().sum::<f64>()).min(1.0)
}

/// Per-variable tie sums: Σt(t−1)/2, Σt(t−1)(t−2), Σt(t−1)(2t+5).
fn tie_terms(values: &[f64]) -> (f64, f64, f64) {
    tie_counts(values)
        .into_iter()
        .map(|t| t as f64)
        .fold((0.0, 0.0, 0.0), |(a, b, c), t| {
            (
                a + t * (t - 1.0) / 2.0,
                b + t * (t - 1.0) * (t - 2.0),
                c + t * (t - 1.0) * (2.0 * t + 5.0),
            )
        })
}

/// Kendall rank correlation between `x` and `y` with a tie-corrected
/// variance for the significance test.
///
/// A variable with every value tied yields NaN for tau and p.
pub fn mann_kendall(x: &[f64], y: &[f64]) -> Result<KendallResult> {
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

    let mut s = 0.0;
    let mut discordant = 0usize;
    for i in 0..n {
        for j in (i + 1)..n {
            let product = sign(x[j] - x[i]) * sign(y[j] - y[i]);
            s += product;
            if product < 0.0 {
                discordant += 1;
            }
        }
    }

    let nf = n as f64;
    let total = nf * (nf - 1.0) / 2.0;
    let (x_ties, x0, x1) = tie_terms(x);
    let (y_ties, y0, y1) = tie_terms(y);

    let denominator = ((total - x_ties) * (total - y_ties)).sqrt();
    if denominator == 0.0 {
        return Ok(KendallResult {
            tau: f64::NAN,
            s,
            z: f64::NAN,
            p_value: f64::NAN,
        });
    }
    let tau = (s / denominator).clamp(-1.0, 1.0);

    let m = nf * (nf - 1.0);
    let mut variance = (m * (2.0 * nf + 5.0) - x1 - y1) / 18.0 + 2.0 * x_ties * y_ties / m;
    if n > 2 {
        variance += x0 * y0 / (9.0 * m * (nf - 2.0));
    }

    let z = s / variance.sqrt();
    let pairs = n * (n - 1) / 2;
    let tie_free = x_ties == 0.0 && y_ties == 0.0;
    let p_value = if tie_free && (n <= EXACT_MAX_N || discordant.min(pairs - discordant) <= 1) {
        exact_p_value(n, discordant)
    } else {
        Normal::new(0.0, 1.0)
            .map(|dist| (2.0 * dist.sf(z.abs())).min(1.0))
            .unwrap_or(f64::NAN)
    };

    Ok(KendallResult { tau, s, z, p_value })
}
