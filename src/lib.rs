//! # winter-trends
//!
//! Winter climate trend statistics for a single weather station.
//!
//! Provides linear and robust trend estimation (HAC standard errors,
//! Mann-Kendall, Theil-Sen, Ljung-Box), a closed set of forecasting models
//! (naive, linear, Holt) scored by a rolling-origin backtest, model selection
//! with an approximate forecast band, and verification of published numeric
//! claims against the yearly observation table.

#![allow(clippy::needless_range_loop)]

pub mod claims;
pub mod config;
pub mod core;
pub mod error;
pub mod forecast;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod trend;
pub mod utils;
pub mod validation;

pub use error::{ClimateError, Result};

pub mod prelude {
    pub use crate::config::AnalysisConfig;
    pub use crate::core::{ObservationTable, Variable, YearlySeries};
    pub use crate::error::{ClimateError, Result};
    pub use crate::forecast::{forecast_series, ForecastSettings};
    pub use crate::models::{Forecaster, ModelKind};
    pub use crate::trend::{linear_trend, robust_trend, TrendResult};
}
