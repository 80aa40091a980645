//! Naive forecasting model.
//!
//! The naive method simply forecasts the last observed value for all future years.

use crate::core::YearlySeries;
use crate::error::{ClimateError, Result};
use crate::models::Forecaster;

/// Naive forecaster that repeats the last value.
#[derive(Debug, Clone, Default)]
pub struct Naive {
    last_value: Option<f64>,
    fitted: Option<Vec<f64>>,
}

impl Naive {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Forecaster for Naive {
    fn fit(&mut self, series: &YearlySeries) -> Result<()> {
        let values = series.values();
        let last = series.last_value().ok_or(ClimateError::EmptyData)?;

        // y_hat[t] = y[t-1]; the first value has no predecessor
        let mut fitted = Vec::with_capacity(values.len());
        fitted.push(f64::NAN);
        fitted.extend_from_slice(&values[..values.len() - 1]);

        self.last_value = Some(last);
        self.fitted = Some(fitted);
        Ok(())
    }

    fn predict(&self, target_years: &[i32]) -> Result<Vec<f64>> {
        let last = self.last_value.ok_or(ClimateError::FitRequired)?;
        Ok(vec![last; target_years.len()])
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn name(&self) -> &str {
        "naive"
    }
}
