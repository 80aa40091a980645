//! Core data structures: the yearly observation table and the series extracted from it.

mod series;
mod table;
mod variables;

pub use series::YearlySeries;
pub use table::{Coverage, Extreme, ObservationTable};
pub use variables::{default_aliases, default_variables, ColumnAlias, ColumnMap, Unit, Variable};
