//! Imputation module for handling missing values.
//!
//! - Median imputation for numeric columns
//! - Constant (sentinel) imputation for categorical columns
//! - Forward/backward propagation for timestamps

mod statistical;

pub use statistical::{FillValue, Imputation, StatisticalImputer};
