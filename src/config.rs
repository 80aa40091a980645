//! Analysis configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) reproduces the
//! standard Rateče winter analysis.

use crate::core::{default_aliases, default_variables, ColumnAlias, ColumnMap, Variable};
use crate::error::{ClimateError, Result};
use crate::forecast::{ForecastSettings, DEFAULT_HORIZON, DEFAULT_TEST_WINDOW};
use crate::io::LoadOptions;
use crate::models::ModelKind;
use crate::trend::{RateBasis, TrendConfig};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Inclusive span of years compared in the reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Period {
    pub start: i32,
    pub end: i32,
}

impl Period {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn label(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }
}

/// Two variables whose trend rates are compared.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComparisonPair {
    pub first: String,
    pub second: String,
    pub basis: RateBasis,
    /// Smallest slope difference (units per year) reported as a real difference.
    pub threshold: f64,
}

/// Backtest, forecast and output settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForecastSection {
    pub test_window: usize,
    pub horizon: usize,
    pub models: Vec<ModelKind>,
    /// Holt point forecasts shown by the validation report.
    pub holt_preview_steps: usize,
    pub model_summary_path: PathBuf,
    pub forecast_path: PathBuf,
}

impl Default for ForecastSection {
    fn default() -> Self {
        Self {
            test_window: DEFAULT_TEST_WINDOW,
            horizon: DEFAULT_HORIZON,
            models: ModelKind::ALL.to_vec(),
            holt_preview_steps: 5,
            model_summary_path: PathBuf::from("analysis/forecast_model_summary.csv"),
            forecast_path: PathBuf::from("analysis/forecast_2026_2035.csv"),
        }
    }
}

impl ForecastSection {
    pub fn settings(&self) -> ForecastSettings {
        ForecastSettings {
            test_window: self.test_window,
            horizon: self.horizon,
            models: self.models.clone(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub data_path: PathBuf,
    pub claims_path: PathBuf,
    /// Records before this year are ignored.
    pub start_year: i32,
    pub load: LoadOptions,
    /// Analysed variables, in report order.
    pub variables: Vec<Variable>,
    /// Columns available to claims but not analysed.
    pub aliases: Vec<ColumnAlias>,
    pub trend: TrendConfig,
    pub forecast: ForecastSection,
    pub periods: Vec<Period>,
    pub comparisons: Vec<ComparisonPair>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/clean_ratece.csv"),
            claims_path: PathBuf::from("config/claims.toml"),
            start_year: 1949,
            load: LoadOptions::default(),
            variables: default_variables(),
            aliases: default_aliases(),
            trend: TrendConfig::default(),
            forecast: ForecastSection::default(),
            periods: vec![
                Period::new(1949, 1979),
                Period::new(1980, 2004),
                Period::new(2005, 2025),
            ],
            comparisons: vec![
                ComparisonPair {
                    first: "snow_cover_days".to_string(),
                    second: "snowfall_days".to_string(),
                    basis: RateBasis::Magnitude,
                    threshold: 0.1,
                },
                ComparisonPair {
                    first: "avg_min_temp".to_string(),
                    second: "avg_temp".to_string(),
                    basis: RateBasis::Signed,
                    threshold: 0.003,
                },
            ],
        }
    }
}

impl AnalysisConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: AnalysisConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ClimateError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Load `path` when given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(ClimateError::InvalidParameter(msg));

        if self.variables.is_empty() {
            return invalid("at least one variable must be configured".to_string());
        }
        let mut keys = HashSet::new();
        for key in self
            .variables
            .iter()
            .map(|v| &v.key)
            .chain(self.aliases.iter().map(|a| &a.key))
        {
            if !keys.insert(key.as_str()) {
                return invalid(format!("duplicate variable key '{key}'"));
            }
        }

        if self.forecast.test_window == 0 {
            return invalid("forecast.test_window must be positive".to_string());
        }
        if self.forecast.horizon == 0 {
            return invalid("forecast.horizon must be positive".to_string());
        }
        let mut models = self.forecast.models.clone();
        models.sort();
        if models != ModelKind::ALL {
            return invalid(format!(
                "forecast.models must list naive, linear and holt once each, got {:?}",
                self.forecast.models
            ));
        }

        let confidence = self.trend.theil_sen_confidence;
        if !(confidence > 0.0 && confidence < 1.0) {
            return invalid(format!(
                "trend.theil_sen_confidence must be in (0, 1), got {confidence}"
            ));
        }

        if let Some(p) = self.periods.iter().find(|p| p.start > p.end) {
            return invalid(format!("period {} is reversed", p.label()));
        }

        for pair in &self.comparisons {
            for key in [&pair.first, &pair.second] {
                if self.variable(key).is_err() {
                    return Err(ClimateError::UnknownVariable(key.clone()));
                }
            }
        }

        Ok(())
    }

    /// Configured variable with `key`.
    pub fn variable(&self, key: &str) -> Result<&Variable> {
        self.variables
            .iter()
            .find(|v| v.key == key)
            .ok_or_else(|| ClimateError::UnknownVariable(key.to_string()))
    }

    pub fn column_map(&self) -> ColumnMap {
        ColumnMap::new(&self.variables, &self.aliases)
    }
}
