//! Shared utilities for the ETL pipeline.
//!
//! Data type classification, cell parsing for extraction, and the fill
//! helpers the imputers are built on.

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a data type for imputation purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Date or datetime types
    Datetime,
    /// String/text type
    String,
    /// Other/unknown types
    Other,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is an integer type.
#[inline]
pub fn is_integer_dtype(dtype: &DataType) -> bool {
    is_numeric_dtype(dtype) && !matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Check if a DataType is a datetime type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Datetime(_, _) | DataType::Date)
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if is_datetime_dtype(dtype) {
        DtypeCategory::Datetime
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        DtypeCategory::String
    } else {
        DtypeCategory::Other
    }
}

// =============================================================================
// Cell Parsing Utilities
// =============================================================================

/// Cell contents treated as a missing value when reading delimited files.
pub const MISSING_MARKERS: [&str; 7] = ["", "na", "n/a", "nan", "null", "none", "#n/a"];

/// Date-time layouts accepted for timestamps.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Format used when writing timestamps back out.
pub const TIMESTAMP_OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Check if a raw cell is a missing value marker.
///
/// # Example
///
/// ```rust,ignore
/// use printshop_etl::utils::is_missing_marker;
///
/// assert!(is_missing_marker(""));
/// assert!(is_missing_marker(" N/A "));
/// assert!(!is_missing_marker("Letters"));
/// ```
pub fn is_missing_marker(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    MISSING_MARKERS.iter().any(|&marker| lower == marker)
}

/// Parse an integer cell. Accepts integral floats such as `"12.0"`.
///
/// Floats outside the `i64` range are rejected rather than saturated.
pub fn parse_integer(s: &str) -> Option<i64> {
    let trimmed = s.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    match trimmed.parse::<f64>() {
        Ok(value)
            if value.fract() == 0.0
                && value >= i64::MIN as f64
                && value < i64::MAX as f64 =>
        {
            Some(value as i64)
        }
        _ => None,
    }
}

/// Parse a float cell. Non-finite values are rejected.
pub fn parse_float(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a timestamp cell as a naive (wall-clock) date-time.
///
/// Accepts `T` or space separated date-times with optional seconds and
/// fractional seconds, and bare dates (taken as midnight).
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a numeric Series with a specific value, as Float64.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let values = series.cast(&DataType::Float64)?;
    let filled: Vec<Option<f64>> = values
        .f64()?
        .into_iter()
        .map(|v| Some(v.unwrap_or(fill_value)))
        .collect();

    Ok(Series::new(series.name().clone(), filled))
}

/// Fill null values in an integer Series with a specific value, as Int64.
pub fn fill_integer_nulls(series: &Series, fill_value: i64) -> PolarsResult<Series> {
    let values = series.cast(&DataType::Int64)?;
    let filled: Vec<Option<i64>> = values
        .i64()?
        .into_iter()
        .map(|v| Some(v.unwrap_or(fill_value)))
        .collect();

    Ok(Series::new(series.name().clone(), filled))
}

/// Fill null values in a string Series with a specific value.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let values = series.cast(&DataType::String)?;
    let filled: Vec<Option<String>> = values
        .str()?
        .into_iter()
        .map(|v| Some(v.unwrap_or(fill_value).to_string()))
        .collect();

    Ok(Series::new(series.name().clone(), filled))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_dtype_category() {
        assert_eq!(get_dtype_category(&DataType::Int64), DtypeCategory::Numeric);
        assert_eq!(get_dtype_category(&DataType::Float64), DtypeCategory::Numeric);
        assert_eq!(get_dtype_category(&DataType::Date), DtypeCategory::Datetime);
        assert_eq!(
            get_dtype_category(&DataType::Datetime(TimeUnit::Milliseconds, None)),
            DtypeCategory::Datetime
        );
        assert_eq!(get_dtype_category(&DataType::String), DtypeCategory::String);
        assert_eq!(get_dtype_category(&DataType::Boolean), DtypeCategory::Other);
    }

    #[test]
    fn test_is_integer_dtype() {
        assert!(is_integer_dtype(&DataType::Int64));
        assert!(is_integer_dtype(&DataType::UInt32));
        assert!(!is_integer_dtype(&DataType::Float64));
        assert!(!is_integer_dtype(&DataType::String));
    }

    #[test]
    fn test_is_missing_marker() {
        assert!(is_missing_marker(""));
        assert!(is_missing_marker("   "));
        assert!(is_missing_marker("NaN"));
        assert!(is_missing_marker("N/A"));
        assert!(is_missing_marker("null"));
        assert!(!is_missing_marker("0"));
        assert!(!is_missing_marker("Library"));
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer(" 7 "), Some(7));
        assert_eq!(parse_integer("12.0"), Some(12));
        assert_eq!(parse_integer("12.5"), None);
        assert_eq!(parse_integer("abc"), None);
        assert_eq!(parse_integer("1e30"), None);
        assert_eq!(parse_integer("-1e30"), None);
        assert_eq!(parse_integer("1e3"), Some(1000));
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float("100.25"), Some(100.25));
        assert_eq!(parse_float("3"), Some(3.0));
        assert_eq!(parse_float("inf"), None);
        assert_eq!(parse_float("cheap"), None);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let iso = parse_timestamp("2023-01-01T13:45:10").unwrap();
        assert_eq!((iso.month(), iso.hour(), iso.minute()), (1, 13, 45));

        let spaced = parse_timestamp("2023-03-05 08:00:00").unwrap();
        assert_eq!(spaced.day(), 5);

        let fractional = parse_timestamp("2023-03-05T08:00:00.250").unwrap();
        assert_eq!(fractional.hour(), 8);

        let no_seconds = parse_timestamp("2023-03-05 08:30").unwrap();
        assert_eq!(no_seconds.minute(), 30);

        let date_only = parse_timestamp("2023-12-24").unwrap();
        assert_eq!((date_only.month(), date_only.hour()), (12, 0));

        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_fill_numeric_nulls() {
        let series = Series::new("test".into(), &[Some(1.0), None, Some(3.0)]);
        let filled = fill_numeric_nulls(&series, 0.0).unwrap();

        assert_eq!(filled.null_count(), 0);
        assert_eq!(filled.get(1).unwrap().try_extract::<f64>().unwrap(), 0.0);
        assert_eq!(filled.get(2).unwrap().try_extract::<f64>().unwrap(), 3.0);
    }

    #[test]
    fn test_fill_integer_nulls() {
        let series = Series::new("pages".into(), &[Some(10i64), None]);
        let filled = fill_integer_nulls(&series, 5).unwrap();

        assert_eq!(filled.dtype(), &DataType::Int64);
        assert_eq!(filled.i64().unwrap().get(1), Some(5));
    }

    #[test]
    fn test_fill_string_nulls() {
        let series = Series::new("dept".into(), &[Some("History"), None]);
        let filled = fill_string_nulls(&series, "Unknown").unwrap();

        let values: Vec<Option<&str>> = filled.str().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some("History"), Some("Unknown")]);
        assert_eq!(filled.name().as_str(), "dept");
    }
}
