//! Rolling-origin one-step-ahead backtest.

use crate::core::YearlySeries;
use crate::error::{ClimateError, Result};
use crate::models::ModelKind;
use crate::utils::metrics::{calculate_metrics, ErrorMetrics};
use tracing::debug;

/// Default number of trailing years held out.
pub const DEFAULT_TEST_WINDOW: usize = 15;

/// Backtest accuracy of one model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelScore {
    pub model: ModelKind,
    pub metrics: ErrorMetrics,
}

/// Outcome of backtesting a set of models on one series.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub test_start_year: i32,
    pub test_end_year: i32,
    /// Held-out observations, one per test year.
    pub actual: Vec<f64>,
    /// One-step predictions per model, aligned with `actual`.
    pub predictions: Vec<(ModelKind, Vec<f64>)>,
    /// Scores in the order the models were given.
    pub scores: Vec<ModelScore>,
}

impl BacktestResult {
    /// Number of held-out years.
    pub fn window(&self) -> usize {
        self.actual.len()
    }

    pub fn score(&self, model: ModelKind) -> Option<ErrorMetrics> {
        self.scores
            .iter()
            .find(|s| s.model == model)
            .map(|s| s.metrics)
    }

    /// Model with the lowest MAE, ties broken by the lowest RMSE.
    ///
    /// Remaining ties go to the model listed first.
    pub fn best(&self) -> Option<ModelScore> {
        self.scores.iter().copied().min_by(|a, b| {
            a.metrics
                .mae
                .total_cmp(&b.metrics.mae)
                .then(a.metrics.rmse.total_cmp(&b.metrics.rmse))
        })
    }
}

/// Backtest `models` on the last `window` observations of `series`.
///
/// For every test index `i` each model is fitted on the observations before
/// `i` and predicts the year at `i`. Needs more observations than `window`
/// so that the first fold has training data.
pub fn backtest(series: &YearlySeries, window: usize, models: &[ModelKind]) -> Result<BacktestResult> {
    let n = series.len();
    if window == 0 {
        return Err(ClimateError::InvalidParameter(
            "backtest window must be positive".to_string(),
        ));
    }
    if models.is_empty() {
        return Err(ClimateError::InvalidParameter(
            "no models to backtest".to_string(),
        ));
    }
    if let Some((i, model)) = models
        .iter()
        .enumerate()
        .find(|(i, model)| models[..*i].contains(*model))
    {
        return Err(ClimateError::InvalidParameter(format!(
            "model '{model}' listed twice (position {i})"
        )));
    }
    if n <= window {
        return Err(ClimateError::InsufficientHistory { window, len: n });
    }

    let start = n - window;
    let years = series.years();
    let actual = series.values()[start..].to_vec();

    let mut predictions: Vec<(ModelKind, Vec<f64>)> = models
        .iter()
        .map(|&model| (model, Vec::with_capacity(window)))
        .collect();

    for i in start..n {
        let train = series.prefix(i)?;
        let target = [years[i]];
        for (model, predicted) in predictions.iter_mut() {
            let value = model.forecast(&train, &target)?;
            predicted.extend(value);
        }
    }

    let scores = predictions
        .iter()
        .map(|(model, predicted)| {
            let metrics = calculate_metrics(&actual, predicted)?;
            debug!(
                model = model.name(),
                mae = metrics.mae,
                rmse = metrics.rmse,
                "backtest score"
            );
            Ok(ModelScore {
                model: *model,
                metrics,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(BacktestResult {
        test_start_year: years[start],
        test_end_year: years[n - 1],
        actual,
        predictions,
        scores,
    })
}
