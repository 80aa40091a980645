use super::ClaimSet;
use crate::core::{ColumnMap, ObservationTable};
use crate::error::ClimateError;
use serde::Serialize;
use tracing::warn;

/// Result of checking one claim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutcome {
    pub label: String,
    /// Value computed from the data; NaN when it could not be computed.
    pub computed: f64,
    pub expected: f64,
    pub tolerance: f64,
    pub passed: bool,
    /// Value found at the located year, for extreme-year claims.
    pub located_value: Option<f64>,
    /// Why the value could not be computed.
    pub note: Option<String>,
}

impl CheckOutcome {
    /// Compare `computed` with `expected`.
    ///
    /// Passes when the absolute difference is below `tolerance`, or on exact
    /// equality when `tolerance` is zero.
    pub fn compare(label: &str, computed: f64, expected: f64, tolerance: f64) -> Self {
        let passed = if tolerance == 0.0 {
            computed == expected
        } else {
            (computed - expected).abs() < tolerance
        };
        Self {
            label: label.to_string(),
            computed,
            expected,
            tolerance,
            passed,
            located_value: None,
            note: None,
        }
    }

    pub fn failed(label: &str, expected: f64, tolerance: f64, err: &ClimateError) -> Self {
        Self {
            label: label.to_string(),
            computed: f64::NAN,
            expected,
            tolerance,
            passed: false,
            located_value: None,
            note: Some(err.to_string()),
        }
    }

    pub fn with_located_value(mut self, value: Option<f64>) -> Self {
        self.located_value = value;
        self
    }

    pub fn difference(&self) -> f64 {
        self.computed - self.expected
    }
}

/// Pass and fail counts of a verification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VerificationSummary {
    pub passed: usize,
    pub failed: usize,
}

impl VerificationSummary {
    pub fn of(outcomes: &[CheckOutcome]) -> Self {
        let passed = outcomes.iter().filter(|o| o.passed).count();
        Self {
            passed,
            failed: outcomes.len() - passed,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Check every claim independently, in order.
pub fn verify_all(
    table: &ObservationTable,
    columns: &ColumnMap,
    claims: &ClaimSet,
) -> Vec<CheckOutcome> {
    claims
        .claims
        .iter()
        .map(|claim| {
            let outcome = claim.check(table, columns);
            if let Some(note) = &outcome.note {
                warn!(claim = %outcome.label, %note, "claim could not be evaluated");
            }
            outcome
        })
        .collect()
}
