//! Calendar parts of the request timestamp.

use crate::utils::parse_timestamp;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use polars::prelude::*;

/// Full English name of a weekday.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Month, weekday name and hour of day of each timestamp.
#[derive(Debug, Clone)]
pub struct TemporalParts {
    pub month: Series,
    pub weekday_name: Series,
    pub hour_of_day: Series,
}

impl TemporalParts {
    /// Derived columns in output order.
    pub fn into_columns(self) -> [Series; 3] {
        [self.month, self.weekday_name, self.hour_of_day]
    }
}

/// Read a timestamp column as naive wall-clock values.
///
/// Accepts Datetime (any unit, timezone ignored), Date and String columns.
pub fn to_naive_datetimes(series: &Series) -> PolarsResult<Vec<Option<NaiveDateTime>>> {
    match series.dtype() {
        DataType::Datetime(unit, _) => {
            let unit = *unit;
            let raw = series.cast(&DataType::Int64)?;
            Ok(raw
                .i64()?
                .into_iter()
                .map(|value| {
                    value.and_then(|v| {
                        let dt = match unit {
                            TimeUnit::Milliseconds => DateTime::from_timestamp_millis(v),
                            TimeUnit::Microseconds => DateTime::from_timestamp_micros(v),
                            TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(v)),
                        };
                        dt.map(|dt| dt.naive_utc())
                    })
                })
                .collect())
        }
        DataType::Date => {
            let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
            let raw = series.cast(&DataType::Int32)?;
            Ok(raw
                .i32()?
                .into_iter()
                .map(|days| {
                    days.and_then(|d| epoch.checked_add_signed(chrono::Duration::days(d as i64)))
                        .and_then(|date| date.and_hms_opt(0, 0, 0))
                })
                .collect())
        }
        DataType::String => Ok(series
            .str()?
            .into_iter()
            .map(|value| value.and_then(parse_timestamp))
            .collect()),
        other => Err(PolarsError::InvalidOperation(
            format!(
                "column '{}' has type {:?}, expected a timestamp",
                series.name(),
                other
            )
            .into(),
        )),
    }
}

/// Derive `month` (1-12), `weekday_name` and `hour_of_day` (0-23) from a
/// timestamp column. Values are taken as stored, without timezone conversion.
pub fn derive_temporal(
    series: &Series,
    month: &str,
    weekday: &str,
    hour: &str,
) -> PolarsResult<TemporalParts> {
    let stamps = to_naive_datetimes(series)?;

    let months: Vec<Option<i32>> = stamps.iter().map(|ts| ts.map(|t| t.month() as i32)).collect();
    let weekdays: Vec<Option<&str>> = stamps
        .iter()
        .map(|ts| ts.map(|t| weekday_name(t.weekday())))
        .collect();
    let hours: Vec<Option<i32>> = stamps.iter().map(|ts| ts.map(|t| t.hour() as i32)).collect();

    Ok(TemporalParts {
        month: Series::new(month.into(), months),
        weekday_name: Series::new(weekday.into(), weekdays),
        hour_of_day: Series::new(hour.into(), hours),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn millis(s: &str) -> i64 {
        parse_timestamp(s).unwrap().and_utc().timestamp_millis()
    }

    fn datetime_series(values: &[&str]) -> Series {
        let raw: Vec<i64> = values.iter().map(|s| millis(s)).collect();
        Series::new("ts".into(), raw)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            .unwrap()
    }

    #[test]
    fn test_derive_from_datetime() {
        // 2023-01-01 was a Sunday
        let series = datetime_series(&["2023-01-01T00:00:00", "2023-03-15T17:45:00"]);

        let parts = derive_temporal(&series, "month", "weekday_name", "hour_of_day").unwrap();

        let months: Vec<Option<i32>> = parts.month.i32().unwrap().into_iter().collect();
        assert_eq!(months, vec![Some(1), Some(3)]);
        let days: Vec<Option<&str>> = parts.weekday_name.str().unwrap().into_iter().collect();
        assert_eq!(days, vec![Some("Sunday"), Some("Wednesday")]);
        let hours: Vec<Option<i32>> = parts.hour_of_day.i32().unwrap().into_iter().collect();
        assert_eq!(hours, vec![Some(0), Some(17)]);
    }

    #[test]
    fn test_derive_from_strings() {
        let series = Series::new("ts".into(), &["2024-02-29 23:00:00"]);
        let parts = derive_temporal(&series, "m", "w", "h").unwrap();
        assert_eq!(parts.month.i32().unwrap().get(0), Some(2));
        assert_eq!(parts.weekday_name.str().unwrap().get(0), Some("Thursday"));
        assert_eq!(parts.hour_of_day.i32().unwrap().get(0), Some(23));
    }

    #[test]
    fn test_column_names_and_order() {
        let series = datetime_series(&["2023-01-01T00:00:00"]);
        let columns = derive_temporal(&series, "month", "weekday_name", "hour_of_day")
            .unwrap()
            .into_columns();
        let names: Vec<&str> = columns.iter().map(|s| s.name().as_str()).collect();
        assert_eq!(names, vec!["month", "weekday_name", "hour_of_day"]);
    }

    #[test]
    fn test_rejects_numeric_column() {
        let series = Series::new("ts".into(), &[1.5f64]);
        assert!(derive_temporal(&series, "m", "w", "h").is_err());
    }
}
