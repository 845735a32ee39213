//! The fixed job record schema.
//!
//! Column names and kinds of a print-shop job record, plus the names of the
//! columns the transformer derives from them.

use polars::prelude::*;

/// How a job column is typed inside a [`Table`](crate::table::Table).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Unique, never-missing string key
    Identifier,
    /// Naive date-time (millisecond precision)
    Timestamp,
    /// Free string category
    Categorical,
    /// 64-bit integer
    Integer,
    /// 64-bit float
    Float,
}

impl ColumnKind {
    /// Polars data type used to store this kind.
    pub fn dtype(&self) -> DataType {
        match self {
            Self::Identifier | Self::Categorical => DataType::String,
            Self::Timestamp => DataType::Datetime(TimeUnit::Milliseconds, None),
            Self::Integer => DataType::Int64,
            Self::Float => DataType::Float64,
        }
    }

    /// Whether a missing cell is acceptable for this kind at extraction time.
    pub fn allows_missing(&self) -> bool {
        !matches!(self, Self::Identifier | Self::Timestamp)
    }
}

pub const ID: &str = "id";
pub const REQUEST_TIMESTAMP: &str = "request_timestamp";
pub const DEPARTMENT: &str = "department";
pub const JOB_TYPE: &str = "job_type";
pub const PAGE_COUNT: &str = "page_count";
pub const COPY_COUNT: &str = "copy_count";
pub const PRIORITY: &str = "priority";
pub const STATUS: &str = "status";
pub const PRODUCTION_HOURS: &str = "production_hours";
pub const ESTIMATED_COST: &str = "estimated_cost";
pub const MATERIAL: &str = "material";

pub const MONTH: &str = "month";
pub const WEEKDAY_NAME: &str = "weekday_name";
pub const HOUR_OF_DAY: &str = "hour_of_day";
pub const COST_PER_PAGE: &str = "cost_per_page";
pub const SIZE_CATEGORY: &str = "size_category";

/// Job record columns in file order.
pub const JOB_COLUMNS: [(&str, ColumnKind); 11] = [
    (ID, ColumnKind::Identifier),
    (REQUEST_TIMESTAMP, ColumnKind::Timestamp),
    (DEPARTMENT, ColumnKind::Categorical),
    (JOB_TYPE, ColumnKind::Categorical),
    (PAGE_COUNT, ColumnKind::Integer),
    (COPY_COUNT, ColumnKind::Integer),
    (PRIORITY, ColumnKind::Categorical),
    (STATUS, ColumnKind::Categorical),
    (PRODUCTION_HOURS, ColumnKind::Float),
    (ESTIMATED_COST, ColumnKind::Float),
    (MATERIAL, ColumnKind::Categorical),
];

/// Columns appended by the transformer, in output order.
pub const DERIVED_COLUMNS: [&str; 5] =
    [MONTH, WEEKDAY_NAME, HOUR_OF_DAY, COST_PER_PAGE, SIZE_CATEGORY];

/// Columns the transformer reads to derive its features.
pub const TRANSFORM_INPUTS: [&str; 3] = [REQUEST_TIMESTAMP, PAGE_COUNT, ESTIMATED_COST];

/// Look up the kind of a job column by name.
pub fn column_kind(name: &str) -> Option<ColumnKind> {
    JOB_COLUMNS
        .iter()
        .find(|(column, _)| *column == name)
        .map(|(_, kind)| *kind)
}
