//! Forecaster trait defining the common interface for all models.

use crate::core::YearlySeries;
use crate::error::Result;

/// Common interface for the yearly forecasting models.
///
/// This trait is object-safe and can be used with `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Fit the model to a training series.
    fn fit(&mut self, series: &YearlySeries) -> Result<()>;

    /// Predict one value per target year, in the order given.
    fn predict(&self, target_years: &[i32]) -> Result<Vec<f64>>;

    /// In-sample one-step predictions aligned with the training series.
    fn fitted_values(&self) -> Option<&[f64]>;

    /// Get the model name.
    fn name(&self) -> &str;

    /// Check if the model has been fitted.
    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }
}

/// Type alias for boxed forecaster trait objects.
///
/// # Example
///
/// ```
/// use winter_trends::models::{BoxedForecaster, Naive};
///
/// let model: BoxedForecaster = Box::new(Naive::new());
/// assert_eq!(model.name(), "naive");
/// assert!(!model.is_fitted());
/// ```
pub type BoxedForecaster = Box<dyn Forecaster>;
