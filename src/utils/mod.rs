//! Numeric helpers shared by the estimators and models.

pub mod metrics;
pub mod optimization;
pub mod stats;

pub use metrics::{calculate_metrics, ErrorMetrics};
pub use optimization::{nelder_mead, NelderMeadConfig, NelderMeadResult};
pub use stats::round_to;
