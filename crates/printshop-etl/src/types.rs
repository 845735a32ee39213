//! Result types returned by a pipeline run.

use crate::features::to_naive_datetimes;
use crate::schema::{DEPARTMENT, JOB_TYPE, REQUEST_TIMESTAMP};
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Everything a successful run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The transformed table, as written
    pub table: Table,
    /// Canonical path of the written file
    pub path: PathBuf,
    pub summary: RunSummary,
}

/// Human-readable summary of a pipeline run.
///
/// Serialized as-is by the CLI's `--json` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of rows written.
    pub rows: usize,
    /// Output header, in order.
    pub columns: Vec<String>,
    pub output_path: PathBuf,

    /// Earliest request date (`YYYY-MM-DD`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_start: Option<String>,
    /// Latest request date (`YYYY-MM-DD`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_end: Option<String>,

    /// Number of distinct departments, the missing-value sentinel included.
    pub departments: usize,
    /// Distinct job types, sorted.
    pub job_types: Vec<String>,

    /// Total execution time in milliseconds.
    pub duration_ms: u64,
}

impl RunSummary {
    /// Summarize a transformed table written to `output_path`.
    pub fn from_table(table: &Table, output_path: PathBuf, duration_ms: u64) -> Self {
        let (period_start, period_end) = table
            .series(REQUEST_TIMESTAMP)
            .ok()
            .and_then(|series| to_naive_datetimes(series).ok())
            .map(|stamps| {
                let stamps: Vec<_> = stamps.into_iter().flatten().collect();
                let fmt = |ts: Option<&chrono::NaiveDateTime>| {
                    ts.map(|t| t.format("%Y-%m-%d").to_string())
                };
                (fmt(stamps.iter().min()), fmt(stamps.iter().max()))
            })
            .unwrap_or((None, None));

        Self {
            rows: table.height(),
            columns: table.column_names(),
            output_path,
            period_start,
            period_end,
            departments: distinct_values(table, DEPARTMENT).len(),
            job_types: distinct_values(table, JOB_TYPE).into_iter().collect(),
            duration_ms,
        }
    }
}

fn distinct_values(table: &Table, column: &str) -> BTreeSet<String> {
    let Ok(series) = table.series(column) else {
        return BTreeSet::new();
    };
    let Ok(values) = series.str() else {
        return BTreeSet::new();
    };
    values.into_iter().flatten().map(str::to_string).collect()
}
