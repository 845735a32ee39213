//! Statistical imputation methods.
//!
//! Each method is a pure function from a column to a new column with its
//! missing cells filled. Statistics are computed from the column itself only.

use crate::utils::{fill_integer_nulls, fill_numeric_nulls, fill_string_nulls, is_integer_dtype};
use polars::prelude::*;

/// What was written into the missing cells of a column.
#[derive(Debug, Clone, PartialEq)]
pub enum FillValue {
    /// The column had no missing cells
    Nothing,
    /// Median of the non-missing cells
    Median(f64),
    /// Numeric column without a single observed value, filled with zero
    Zero,
    /// Fixed categorical sentinel
    Constant(String),
    /// Neighbouring values carried forward, then backward
    Propagated,
}

/// Result of imputing one column.
#[derive(Debug, Clone)]
pub struct Imputation {
    pub series: Series,
    /// Number of cells that were filled
    pub filled: usize,
    pub fill_value: FillValue,
}

impl Imputation {
    fn unchanged(series: &Series) -> Self {
        Self {
            series: series.clone(),
            filled: 0,
            fill_value: FillValue::Nothing,
        }
    }

    /// Human-readable description of the fill, for progress messages.
    pub fn describe(&self) -> String {
        let name = self.series.name();
        match &self.fill_value {
            FillValue::Nothing => format!("'{}' has no missing values", name),
            FillValue::Median(m) => {
                format!("Filled {} value(s) in '{}' with median: {:.2}", self.filled, name, m)
            }
            FillValue::Zero => format!(
                "Filled {} value(s) in '{}' with 0 (column has no observed values)",
                self.filled, name
            ),
            FillValue::Constant(c) => {
                format!("Filled {} value(s) in '{}' with constant: '{}'", self.filled, name, c)
            }
            FillValue::Propagated => {
                format!("Forward/backward filled {} value(s) in '{}'", self.filled, name)
            }
        }
    }
}

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill missing numeric cells with the median of the observed cells.
    ///
    /// Integer columns stay integer when the median is integral and are
    /// promoted to Float64 otherwise, so the stored value is the exact median.
    /// A column with no observed values is filled with zero.
    pub fn median(series: &Series) -> PolarsResult<Imputation> {
        let missing = series.null_count();
        if missing == 0 {
            return Ok(Imputation::unchanged(series));
        }

        let is_integer = is_integer_dtype(series.dtype());
        let (filled, fill_value) = match series.median() {
            Some(median) if is_integer && median.fract() == 0.0 => (
                fill_integer_nulls(series, median as i64)?.cast(series.dtype())?,
                FillValue::Median(median),
            ),
            Some(median) if is_integer => {
                (fill_numeric_nulls(series, median)?, FillValue::Median(median))
            }
            Some(median) => (
                fill_numeric_nulls(series, median)?.cast(series.dtype())?,
                FillValue::Median(median),
            ),
            None if is_integer => (
                fill_integer_nulls(series, 0)?.cast(series.dtype())?,
                FillValue::Zero,
            ),
            None => (
                fill_numeric_nulls(series, 0.0)?.cast(series.dtype())?,
                FillValue::Zero,
            ),
        };

        Ok(Imputation {
            series: filled,
            filled: missing,
            fill_value,
        })
    }

    /// Fill missing categorical cells with a constant sentinel.
    ///
    /// Non-missing cells are left exactly as they were.
    pub fn constant(series: &Series, value: &str) -> PolarsResult<Imputation> {
        let missing = series.null_count();
        if missing == 0 {
            return Ok(Imputation::unchanged(series));
        }

        Ok(Imputation {
            series: fill_string_nulls(series, value)?,
            filled: missing,
            fill_value: FillValue::Constant(value.to_string()),
        })
    }

    /// Fill missing cells by carrying the previous value forward, then the
    /// next value backward for leading gaps.
    pub fn propagate(series: &Series) -> PolarsResult<Imputation> {
        let missing = series.null_count();
        if missing == 0 {
            return Ok(Imputation::unchanged(series));
        }

        let filled = series.fill_null(FillNullStrategy::Forward(None))?;
        let filled = filled.fill_null(FillNullStrategy::Backward(None))?;
        let filled_count = missing - filled.null_count();

        Ok(Imputation {
            series: filled,
            filled: filled_count,
            fill_value: FillValue::Propagated,
        })
    }
}
