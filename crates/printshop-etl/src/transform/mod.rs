//! Transform stage.
//!
//! Cleans a job table and derives the reporting features. The input table is
//! never modified; every step produces a new table.

use crate::config::DEFAULT_MISSING_CATEGORY;
use crate::error::{EtlError, Result, ResultExt};
use crate::features::{cost_per_page, derive_temporal, size_category};
use crate::imputers::{FillValue, Imputation, StatisticalImputer};
use crate::pipeline::{EtlStage, ProgressUpdate, SharedReporter, default_reporter};
use crate::schema::{
    COST_PER_PAGE, ESTIMATED_COST, HOUR_OF_DAY, MONTH, PAGE_COUNT, REQUEST_TIMESTAMP,
    SIZE_CATEGORY, TRANSFORM_INPUTS, WEEKDAY_NAME,
};
use crate::table::Table;
use crate::utils::{DtypeCategory, get_dtype_category, is_numeric_dtype};
use polars::prelude::*;
use tracing::debug;

/// Imputes missing values and appends derived columns.
pub struct Transformer {
    missing_category: String,
    reporter: SharedReporter,
}

impl Transformer {
    pub fn new(missing_category: impl Into<String>, reporter: SharedReporter) -> Self {
        Self {
            missing_category: missing_category.into(),
            reporter,
        }
    }

    /// The sentinel written into missing categorical cells.
    pub fn missing_category(&self) -> &str {
        &self.missing_category
    }

    /// Clean `table` and append `month`, `weekday_name`, `hour_of_day`,
    /// `cost_per_page` and `size_category`.
    ///
    /// Row count and row order are preserved.
    pub fn transform(&self, table: &Table) -> Result<Table> {
        self.validate(table)?;

        // Step 1: numeric, categorical and timestamp imputation
        self.report(0.0, "Imputing missing values");
        let cleaned = self.impute(table)?;

        let remaining = cleaned
            .series(REQUEST_TIMESTAMP)
            .transformation_context("cannot read request timestamps")?
            .null_count();
        if remaining > 0 {
            return Err(EtlError::Transformation(format!(
                "column '{}' has no values to fill {} missing timestamp(s) from",
                REQUEST_TIMESTAMP, remaining
            )));
        }

        // Step 2: calendar parts
        self.report(0.5, "Deriving temporal features");
        let timestamps = cleaned
            .series(REQUEST_TIMESTAMP)
            .transformation_context("cannot read request timestamps")?;
        let temporal = derive_temporal(timestamps, MONTH, WEEKDAY_NAME, HOUR_OF_DAY)
            .transformation_context("cannot derive temporal features")?;
        if let Some(idx) = temporal
            .month
            .is_null()
            .into_iter()
            .position(|missing| missing == Some(true))
        {
            return Err(EtlError::Transformation(format!(
                "row {}: column '{}' has an unparseable timestamp",
                idx + 1,
                REQUEST_TIMESTAMP
            )));
        }

        // Step 3: cost per page
        self.report(0.7, "Computing cost per page");
        let pages = cleaned
            .series(PAGE_COUNT)
            .transformation_context("cannot read page counts")?;
        let cost = cleaned
            .series(ESTIMATED_COST)
            .transformation_context("cannot read estimated costs")?;
        let per_page = cost_per_page(cost, pages, COST_PER_PAGE)
            .transformation_context("cannot compute cost per page")?;

        // Step 4: size buckets
        self.report(0.85, "Bucketing job sizes");
        let sizes =
            size_category(pages, SIZE_CATEGORY).transformation_context("cannot bucket job sizes")?;

        let mut result = cleaned;
        for derived in temporal.into_columns().into_iter().chain([per_page, sizes]) {
            let name = derived.name().to_string();
            result = result
                .with_column(derived)
                .transformation_context(format!("cannot add column '{}'", name))?;
        }

        if result.height() != table.height() {
            return Err(EtlError::Transformation(format!(
                "row count changed from {} to {}",
                table.height(),
                result.height()
            )));
        }

        self.report(
            1.0,
            format!(
                "Transformed {} rows, {} columns",
                result.height(),
                result.width()
            ),
        );
        Ok(result)
    }

    fn validate(&self, table: &Table) -> Result<()> {
        for name in TRANSFORM_INPUTS {
            if !table.has_column(name) {
                return Err(EtlError::Transformation(format!(
                    "required column '{}' is missing",
                    name
                )));
            }
        }

        for name in [PAGE_COUNT, ESTIMATED_COST] {
            let dtype = table
                .series(name)
                .transformation_context(format!("cannot read column '{}'", name))?
                .dtype();
            if !is_numeric_dtype(dtype) {
                return Err(EtlError::Transformation(format!(
                    "column '{}' has type {:?}, expected a numeric type",
                    name, dtype
                )));
            }
        }

        let dtype = table
            .series(REQUEST_TIMESTAMP)
            .transformation_context(format!("cannot read column '{}'", REQUEST_TIMESTAMP))?
            .dtype();
        if !matches!(
            dtype,
            DataType::Datetime(_, _) | DataType::Date | DataType::String
        ) {
            return Err(EtlError::Transformation(format!(
                "column '{}' has type {:?}, expected a timestamp",
                REQUEST_TIMESTAMP, dtype
            )));
        }

        Ok(())
    }

    fn impute(&self, table: &Table) -> Result<Table> {
        let mut result = table.clone();
        let names = table.column_names();
        let total = names.len().max(1) as f32;

        for (idx, name) in names.iter().enumerate() {
            let series = table
                .series(name)
                .transformation_context(format!("cannot read column '{}'", name))?;
            if series.null_count() == 0 {
                continue;
            }

            let imputation = match get_dtype_category(series.dtype()) {
                _ if name == REQUEST_TIMESTAMP => StatisticalImputer::propagate(series),
                DtypeCategory::Numeric => StatisticalImputer::median(series),
                DtypeCategory::String => {
                    StatisticalImputer::constant(series, &self.missing_category)
                }
                DtypeCategory::Datetime => StatisticalImputer::propagate(series),
                DtypeCategory::Other => {
                    debug!("Leaving '{}' ({:?}) as is", name, series.dtype());
                    continue;
                }
            }
            .transformation_context(format!("cannot impute column '{}'", name))?;

            self.report_imputation(name, &imputation, (idx + 1) as f32 / total);
            result = result
                .with_column(imputation.series)
                .transformation_context(format!("cannot replace column '{}'", name))?;
        }

        Ok(result)
    }

    fn report_imputation(&self, column: &str, imputation: &Imputation, done: f32) {
        let message = imputation.describe();
        if imputation.fill_value == FillValue::Zero {
            self.reporter
                .report(ProgressUpdate::warning(EtlStage::Transform, message));
        } else {
            self.reporter.report(ProgressUpdate::with_sub_stage(
                EtlStage::Transform,
                column,
                done * 0.5,
                message,
            ));
        }
    }

    fn report(&self, stage_progress: f32, message: impl Into<String>) {
        self.reporter.report(ProgressUpdate::new(
            EtlStage::Transform,
            stage_progress,
            message,
        ));
    }
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new(DEFAULT_MISSING_CATEGORY, default_reporter())
    }
}
