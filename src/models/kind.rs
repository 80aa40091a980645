//! The closed set of models that take part in backtesting and selection.

use super::{BoxedForecaster, HoltLinearTrend, LinearTrend, Naive};
use crate::core::YearlySeries;
use crate::error::{ClimateError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Forecasting model identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Naive,
    Linear,
    Holt,
}

impl ModelKind {
    /// All models, in reporting order.
    pub const ALL: [ModelKind; 3] = [ModelKind::Naive, ModelKind::Linear, ModelKind::Holt];

    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::Naive => "naive",
            ModelKind::Linear => "linear",
            ModelKind::Holt => "holt",
        }
    }

    /// A fresh, unfitted instance.
    pub fn create(&self) -> BoxedForecaster {
        match self {
            ModelKind::Naive => Box::new(Naive::new()),
            ModelKind::Linear => Box::new(LinearTrend::new()),
            ModelKind::Holt => Box::new(HoltLinearTrend::new()),
        }
    }

    /// Fit on `train` and predict the `targets` years.
    pub fn forecast(&self, train: &YearlySeries, targets: &[i32]) -> Result<Vec<f64>> {
        let mut model = self.create();
        model.fit(train)?;
        model.predict(targets)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelKind {
    type Err = ClimateError;

    fn from_str(s: &str) -> Result<Self> {
        ModelKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ClimateError::UnknownModel(s.to_string()))
    }
}

/// Fit the model named `name` and predict `targets`.
///
/// Fails with `UnknownModel` for names outside [`ModelKind::ALL`].
pub fn forecast_by_name(name: &str, train: &YearlySeries, targets: &[i32]) -> Result<Vec<f64>> {
    name.parse::<ModelKind>()?.forecast(train, targets)
}
