//! Least-squares linear trend extrapolation.

use crate::core::YearlySeries;
use crate::error::{ClimateError, Result};
use crate::models::Forecaster;
use crate::trend::fit_line;

/// Fits `value = slope · year + intercept` and evaluates it at the target years.
///
/// A single training observation gives a flat line through that value.
#[derive(Debug, Clone, Default)]
pub struct LinearTrend {
    coefficients: Option<(f64, f64)>,
    fitted: Option<Vec<f64>>,
}

impl LinearTrend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fitted `(slope, intercept)`.
    pub fn coefficients(&self) -> Option<(f64, f64)> {
        self.coefficients
    }
}

impl Forecaster for LinearTrend {
    fn fit(&mut self, series: &YearlySeries) -> Result<()> {
        let (slope, intercept) = match series.len() {
            0 => return Err(ClimateError::EmptyData),
            1 => (0.0, series.values()[0]),
            _ => {
                let line = fit_line(&series.years_f64(), series.values())?;
                (line.slope, line.intercept)
            }
        };

        self.fitted = Some(
            series
                .years()
                .iter()
                .map(|&year| slope * f64::from(year) + intercept)
                .collect(),
        );
        self.coefficients = Some((slope, intercept));
        Ok(())
    }

    fn predict(&self, target_years: &[i32]) -> Result<Vec<f64>> {
        let (slope, intercept) = self.coefficients.ok_or(ClimateError::FitRequired)?;
        Ok(target_years
            .iter()
            .map(|&year| slope * f64::from(year) + intercept)
            .collect())
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn name(&self) -> &str {
        "linear"
    }
}
