//! Logical variable table: variable key → column label plus per-variable rules.

use crate::error::{ClimateError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Measurement unit of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Degrees Celsius.
    Celsius,
    /// Day counts.
    Days,
    /// Snow depth in centimetres.
    Centimeters,
}

impl Unit {
    /// Short label used in reports.
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Celsius => "°C",
            Unit::Days => "days",
            Unit::Centimeters => "cm",
        }
    }

    /// Counts and depths cannot go below zero.
    pub fn is_non_negative(&self) -> bool {
        matches!(self, Unit::Days | Unit::Centimeters)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One analysed variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Logical key, e.g. `avg_temp`.
    pub key: String,
    /// Column label in the source table.
    pub column: String,
    pub unit: Unit,
    /// Override for forecast clamping; defaults to the unit's rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_negative: Option<bool>,
}

impl Variable {
    pub fn new(key: impl Into<String>, column: impl Into<String>, unit: Unit) -> Self {
        Self {
            key: key.into(),
            column: column.into(),
            unit,
            non_negative: None,
        }
    }

    /// Whether forecasts and interval bounds are clamped at zero.
    pub fn is_non_negative(&self) -> bool {
        self.non_negative.unwrap_or_else(|| self.unit.is_non_negative())
    }
}

/// Lookup-only column used by claims but not analysed (e.g. absolute minimum).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnAlias {
    pub key: String,
    pub column: String,
}

/// The seven winter variables analysed for the Rateče station, in report order.
pub fn default_variables() -> Vec<Variable> {
    vec![
        Variable::new("avg_temp", "povp. T [°C]", Unit::Celsius),
        Variable::new("avg_min_temp", "povp. min T [°C]", Unit::Celsius),
        Variable::new("snow_cover_days", "št. dni s snežno odejo", Unit::Days),
        Variable::new("snowfall_days", "št. dni s snegom >0.1 mm", Unit::Days),
        Variable::new("max_snow_cm", "max višina snega [cm]", Unit::Centimeters),
        Variable::new("frost_days", "št. mrzlih dni", Unit::Days),
        Variable::new("ice_days", "št. ledenih dni", Unit::Days),
    ]
}

pub fn default_aliases() -> Vec<ColumnAlias> {
    vec![ColumnAlias {
        key: "abs_min_temp".to_string(),
        column: "abs. min T [°C]".to_string(),
    }]
}

/// Resolves logical keys of variables and aliases to column labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMap {
    entries: Vec<(String, String)>,
}

impl ColumnMap {
    pub fn new(variables: &[Variable], aliases: &[ColumnAlias]) -> Self {
        let entries = variables
            .iter()
            .map(|v| (v.key.clone(), v.column.clone()))
            .chain(aliases.iter().map(|a| (a.key.clone(), a.column.clone())))
            .collect();
        Self { entries }
    }

    /// Column label for `key`; `UnknownVariable` when the key is not mapped.
    pub fn label(&self, key: &str) -> Result<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, column)| column.as_str())
            .ok_or_else(|| ClimateError::UnknownVariable(key.to_string()))
    }
}
