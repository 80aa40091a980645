//! Forecasting models for yearly series.

mod traits;

pub mod holt;
pub mod kind;
pub mod linear;
pub mod naive;

pub use holt::HoltLinearTrend;
pub use kind::{forecast_by_name, ModelKind};
pub use linear::LinearTrend;
pub use naive::Naive;
pub use traits::{BoxedForecaster, Forecaster};
