//! Analysis passes driven by the configured variable table.
//!
//! Every pass runs the same procedure for each configured variable and
//! collects one [`VariableOutcome`] per variable. A variable that fails
//! (missing column, too few years, too short for the backtest) is logged
//! and reported; the other variables are still processed.

use crate::claims::{verify_all, CheckOutcome, ClaimSet};
use crate::config::{AnalysisConfig, ComparisonPair, Period};
use crate::core::{Coverage, ObservationTable, Variable, YearlySeries};
use crate::error::{ClimateError, Result};
use crate::forecast::{
    backtest, forecast_series, BacktestResult, ForecastRow, ModelSummaryRow, SeriesForecast,
};
use crate::io::{load_table, write_rows};
use crate::models::{Forecaster, HoltLinearTrend};
use crate::trend::{linear_trend, robust_trend, EndpointChange, RateComparison, TrendResult};
use std::path::Path;
use tracing::{info, warn};

/// Result of one pass for one variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableOutcome<T> {
    pub variable: Variable,
    pub result: Result<T>,
}

impl<T> VariableOutcome<T> {
    pub fn value(&self) -> Option<&T> {
        self.result.as_ref().ok()
    }
}

/// Rate comparison of a configured variable pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonOutcome {
    pub pair: ComparisonPair,
    pub result: Result<RateComparison>,
}

/// Means of every variable over one period; `None` when the period has no data.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodMeans {
    pub period: Period,
    pub means: Vec<(Variable, Option<f64>)>,
}

/// OLS trends with comparisons, endpoint changes, period means and coverage.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendReport {
    pub trends: Vec<VariableOutcome<TrendResult>>,
    pub comparisons: Vec<ComparisonOutcome>,
    pub endpoints: Vec<VariableOutcome<EndpointChange>>,
    pub period_means: Vec<PeriodMeans>,
    pub coverage: Coverage,
}

/// Robust trends, backtest and Holt preview of the lead variable.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub trends: Vec<VariableOutcome<TrendResult>>,
    pub comparisons: Vec<ComparisonOutcome>,
    /// Backtest of the first configured variable.
    pub backtest: Option<VariableOutcome<BacktestResult>>,
    /// Holt point forecasts `(year, value)` of the first configured variable.
    pub holt_preview: Option<VariableOutcome<Vec<(i32, f64)>>>,
}

/// Selected-model forecasts of every variable.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRun {
    pub forecasts: Vec<VariableOutcome<SeriesForecast>>,
}

impl ForecastRun {
    /// Summary rows of every variable that could be forecast.
    pub fn summary_rows(&self) -> Vec<ModelSummaryRow> {
        self.forecasts
            .iter()
            .filter_map(|o| o.value().map(|f| f.summary_rows(&o.variable.key)))
            .flatten()
            .collect()
    }

    pub fn forecast_rows(&self) -> Vec<ForecastRow> {
        self.forecasts
            .iter()
            .filter_map(|o| o.value().map(|f| f.forecast_rows(&o.variable.key)))
            .flatten()
            .collect()
    }

    pub fn failed(&self) -> usize {
        self.forecasts.iter().filter(|o| o.result.is_err()).count()
    }

    /// Write the model summary and forecast tables as CSV.
    pub fn write(&self, summary_path: &Path, forecast_path: &Path) -> Result<()> {
        write_rows(summary_path, &self.summary_rows())?;
        write_rows(forecast_path, &self.forecast_rows())?;
        info!(
            summary = %summary_path.display(),
            forecast = %forecast_path.display(),
            "wrote forecast tables"
        );
        Ok(())
    }
}

/// Configuration plus the observation table it is applied to.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: AnalysisConfig,
    table: ObservationTable,
}

impl Pipeline {
    /// Use `table`, keeping records from the configured start year on.
    pub fn new(config: AnalysisConfig, table: ObservationTable) -> Self {
        let table = table.from_start_year(config.start_year);
        Self { config, table }
    }

    /// Load the table from the configured data path.
    pub fn load(config: AnalysisConfig) -> Result<Self> {
        let table = load_table(&config.data_path, &config.load)?;
        Ok(Self::new(config, table))
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn table(&self) -> &ObservationTable {
        &self.table
    }

    /// Series of a configured variable, missing years dropped.
    pub fn series(&self, variable: &Variable) -> Result<YearlySeries> {
        self.table.series(&variable.column)
    }

    fn for_each_variable<T>(
        &self,
        stage: &str,
        mut f: impl FnMut(&Variable, &YearlySeries) -> Result<T>,
    ) -> Vec<VariableOutcome<T>> {
        self.config
            .variables
            .iter()
            .map(|variable| VariableOutcome {
                variable: variable.clone(),
                result: self.run_one(stage, variable, &mut f),
            })
            .collect()
    }

    fn run_one<T>(
        &self,
        stage: &str,
        variable: &Variable,
        f: &mut impl FnMut(&Variable, &YearlySeries) -> Result<T>,
    ) -> Result<T> {
        let result = self.series(variable).and_then(|series| f(variable, &series));
        if let Err(err) = &result {
            warn!(stage, variable = %variable.key, %err, "skipping variable");
        }
        result
    }

    fn compare(&self, trends: &[VariableOutcome<TrendResult>]) -> Vec<ComparisonOutcome> {
        self.config
            .comparisons
            .iter()
            .map(|pair| {
                let result = find_trend(trends, &pair.first).and_then(|first| {
                    let second = find_trend(trends, &pair.second)?;
                    Ok(RateComparison::new(first, second, pair.basis, pair.threshold))
                });
                ComparisonOutcome {
                    pair: pair.clone(),
                    result,
                }
            })
            .collect()
    }

    /// OLS trend of every variable and the descriptive extras around it.
    pub fn trend_report(&self) -> TrendReport {
        info!(variables = self.config.variables.len(), "computing trends");
        let trends = self.for_each_variable("trend", |_, series| linear_trend(series));
        let comparisons = self.compare(&trends);
        let endpoints = self.for_each_variable("endpoint", |_, series| EndpointChange::of(series));

        let period_means = self
            .config
            .periods
            .iter()
            .map(|&period| PeriodMeans {
                period,
                means: self
                    .config
                    .variables
                    .iter()
                    .map(|v| {
                        let mean = self.table.period_mean(&v.column, period.start, period.end);
                        (v.clone(), mean.ok())
                    })
                    .collect(),
            })
            .collect();

        let last_year = self.table.years().last().copied().unwrap_or(self.config.start_year);
        let coverage = self.table.coverage(self.config.start_year..=last_year);

        TrendReport {
            trends,
            comparisons,
            endpoints,
            period_means,
            coverage,
        }
    }

    /// Robust statistics of every variable plus a backtest and Holt preview
    /// of the first variable.
    pub fn validation_report(&self) -> ValidationReport {
        info!("computing robust trend statistics");
        let trend_config = &self.config.trend;
        let trends = self.for_each_variable("robust trend", |_, series| {
            robust_trend(series, trend_config)
        });
        let comparisons = self.compare(&trends);

        let forecast = &self.config.forecast;
        let lead = self.config.variables.first();

        let lead_backtest = lead.map(|variable| VariableOutcome {
            variable: variable.clone(),
            result: self.run_one("backtest", variable, &mut |_: &Variable, series: &YearlySeries| {
                backtest(series, forecast.test_window, &forecast.models)
            }),
        });

        let holt_preview = lead.map(|variable| VariableOutcome {
            variable: variable.clone(),
            result: self.run_one("holt preview", variable, &mut |_: &Variable, series: &YearlySeries| {
                holt_preview(series, forecast.holt_preview_steps)
            }),
        });

        ValidationReport {
            trends,
            comparisons,
            backtest: lead_backtest,
            holt_preview,
        }
    }

    /// Backtest, select and forecast every variable.
    pub fn forecast_all(&self) -> ForecastRun {
        let settings = self.config.forecast.settings();
        info!(
            window = settings.test_window,
            horizon = settings.horizon,
            "forecasting all variables"
        );
        let forecasts = self.for_each_variable("forecast", |variable, series| {
            forecast_series(series, &settings, variable.is_non_negative())
        });
        ForecastRun { forecasts }
    }

    /// Check `claims` against the records with no missing field.
    pub fn verify(&self, claims: &ClaimSet) -> Vec<CheckOutcome> {
        let complete = self.table.complete_rows();
        info!(
            claims = claims.len(),
            complete_years = complete.len(),
            "verifying claims"
        );
        verify_all(&complete, &self.config.column_map(), claims)
    }
}

fn find_trend<'a>(trends: &'a [VariableOutcome<TrendResult>], key: &str) -> Result<&'a TrendResult> {
    let outcome = trends
        .iter()
        .find(|o| o.variable.key == key)
        .ok_or_else(|| ClimateError::UnknownVariable(key.to_string()))?;
    outcome.result.as_ref().map_err(Clone::clone)
}

/// Holt forecasts for the `steps` years after the end of `series`.
pub fn holt_preview(series: &YearlySeries, steps: usize) -> Result<Vec<(i32, f64)>> {
    let mut model = HoltLinearTrend::new();
    model.fit(series)?;
    let years = series.future_years(steps)?;
    let values = model.predict(&years)?;
    Ok(years.into_iter().zip(values).collect())
}
