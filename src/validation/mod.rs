//! Diagnostic tests for regression residuals.
//!
//! # Example
//!
//! ```
//! use winter_trends::validation::ljung_box;
//!
//! let residuals = vec![0.1, -0.2, 0.15, -0.1, 0.05, -0.08, 0.12, -0.15, 0.1, -0.05];
//! let lb = ljung_box(&residuals, 5, 0);
//! assert_eq!(lb.lags, 5);
//! ```

pub mod residual_tests;

pub use residual_tests::{ljung_box, LjungBoxResult};
