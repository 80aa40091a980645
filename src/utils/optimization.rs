//! Derivative-free minimisation used to estimate smoothing parameters.

use std::cmp::Ordering;

/// Result of Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// The best point found.
    pub optimal_point: Vec<f64>,
    /// The objective function value at the best point.
    pub optimal_value: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the simplex converged before `max_iter`.
    pub converged: bool,
}

/// Configuration for Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    pub max_iter: usize,
    /// Stop when the spread of objective values drops below this.
    pub tolerance: f64,
    /// Reflection coefficient.
    pub alpha: f64,
    /// Expansion coefficient.
    pub gamma: f64,
    /// Contraction coefficient.
    pub rho: f64,
    /// Shrink coefficient.
    pub sigma: f64,
    /// Relative step used to build the initial simplex.
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-10,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

/// Minimise `objective` starting from `initial`.
///
/// `bounds` clamps every candidate vertex per dimension; use infinite bounds
/// for unconstrained coordinates. The search is fully deterministic.
///
/// # Example
/// ```
/// use winter_trends::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// let result = nelder_mead(
///     |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
///     &[0.0, 0.0],
///     None,
///     &NelderMeadConfig::default(),
/// );
/// assert!((result.optimal_point[0] - 2.0).abs() < 1e-3);
/// assert!((result.optimal_point[1] - 3.0).abs() < 1e-3);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: &NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return NelderMeadResult {
            optimal_point: vec![],
            optimal_value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    let clamp = |point: Vec<f64>| -> Vec<f64> {
        match bounds {
            None => point,
            Some(b) => point
                .into_iter()
                .enumerate()
                .map(|(i, x)| b.get(i).map_or(x, |&(lo, hi)| x.clamp(lo, hi)))
                .collect(),
        }
    };
    let eval = |point: &[f64]| {
        let value = objective(point);
        if value.is_nan() {
            f64::INFINITY
        } else {
            value
        }
    };

    let start = clamp(initial.to_vec());
    let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(n + 1);
    simplex.push((start.clone(), eval(&start)));
    for i in 0..n {
        let mut vertex = start.clone();
        vertex[i] += if vertex[i].abs() > 1e-10 {
            config.initial_step * vertex[i].abs()
        } else {
            config.initial_step
        };
        // A bound may pin the step back onto the start; step the other way.
        let mut vertex = clamp(vertex);
        if vertex[i] == start[i] {
            vertex[i] -= config.initial_step;
            vertex = clamp(vertex);
        }
        let value = eval(&vertex);
        simplex.push((vertex, value));
    }

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;
        simplex.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

        let best = simplex[0].1;
        let worst = simplex[n].1;
        if (worst - best).abs() < config.tolerance {
            converged = true;
            break;
        }

        let centroid: Vec<f64> = (0..n)
            .map(|j| simplex[..n].iter().map(|(v, _)| v[j]).sum::<f64>() / n as f64)
            .collect();
        let toward = |from: &[f64], coef: f64| -> Vec<f64> {
            centroid
                .iter()
                .zip(from)
                .map(|(c, p)| c + coef * (p - c))
                .collect()
        };

        let reflected = clamp(toward(&simplex[n].0, -config.alpha));
        let reflected_value = eval(&reflected);

        if reflected_value < best {
            let expanded = clamp(toward(&reflected, config.gamma));
            let expanded_value = eval(&expanded);
            simplex[n] = if expanded_value < reflected_value {
                (expanded, expanded_value)
            } else {
                (reflected, reflected_value)
            };
            continue;
        }

        if reflected_value < simplex[n - 1].1 {
            simplex[n] = (reflected, reflected_value);
            continue;
        }

        let (contracted, contracted_value) = if reflected_value < worst {
            let c = clamp(toward(&reflected, config.rho));
            let v = eval(&c);
            (c, v)
        } else {
            let c = clamp(toward(&simplex[n].0, config.rho));
            let v = eval(&c);
            (c, v)
        };
        if contracted_value < worst.min(reflected_value) {
            simplex[n] = (contracted, contracted_value);
            continue;
        }

        let anchor = simplex[0].0.clone();
        for (vertex, value) in simplex.iter_mut().skip(1) {
            let shrunk: Vec<f64> = anchor
                .iter()
                .zip(vertex.iter())
                .map(|(a, v)| a + config.sigma * (v - a))
                .collect();
            *vertex = clamp(shrunk);
            *value = eval(vertex);
        }
    }

    simplex.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    let (optimal_point, optimal_value) = simplex.swap_remove(0);

    NelderMeadResult {
        optimal_point,
        optimal_value,
        iterations,
        converged,
    }
}
