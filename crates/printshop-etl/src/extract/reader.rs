//! Delimited job file reading.
//!
//! Files are read with every column as text, then each job column is coerced
//! to its schema type cell by cell. Any bad cell rejects the whole file.

use crate::error::{EtlError, Result, ResultExt};
use crate::schema::{ColumnKind, ID, JOB_COLUMNS, column_kind};
use crate::table::Table;
use crate::utils::{is_missing_marker, parse_float, parse_integer, parse_timestamp};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Header occupies line 1, so data row `i` sits on line `i + 2`.
const FIRST_DATA_LINE: usize = 2;

/// Read a job file into a typed table.
pub fn read_job_file(path: &Path) -> Result<Table> {
    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .extraction_context(format!("cannot open '{}'", path.display()))?
        .finish()
        .extraction_context(format!("cannot parse '{}'", path.display()))?;

    debug!("Read raw frame {:?} from {}", frame.shape(), path.display());
    coerce_frame(&frame)
}

/// Coerce a frame of text columns into the job schema.
pub fn coerce_frame(frame: &DataFrame) -> Result<Table> {
    let present: HashSet<&str> = frame
        .get_column_names()
        .into_iter()
        .map(|name| name.as_str())
        .collect();
    let missing: Vec<&str> = JOB_COLUMNS
        .iter()
        .map(|(name, _)| *name)
        .filter(|name| !present.contains(name))
        .collect();
    if !missing.is_empty() {
        return Err(EtlError::Extraction(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let columns = frame
        .get_columns()
        .iter()
        .map(|column| {
            let series = column.as_materialized_series();
            match column_kind(series.name().as_str()) {
                Some(kind) => coerce_series(series, kind),
                None => passthrough_series(series),
            }
        })
        .collect::<Result<Vec<Series>>>()?;

    let table = Table::new(columns).extraction_context("cannot assemble job table")?;
    ensure_unique_ids(&table)?;
    Ok(table)
}

/// Fail if the `id` column repeats a value.
pub fn ensure_unique_ids(table: &Table) -> Result<()> {
    let Ok(ids) = table.series(ID) else {
        return Ok(());
    };
    let ids = ids.cast(&DataType::String).extraction_context("cannot read ids")?;
    let mut seen = HashSet::with_capacity(ids.len());
    for (idx, id) in ids
        .str()
        .extraction_context("cannot read ids")?
        .into_iter()
        .enumerate()
    {
        if let Some(id) = id
            && !seen.insert(id)
        {
            return Err(EtlError::Extraction(format!(
                "duplicate id '{}' at row {}",
                id,
                idx + 1
            )));
        }
    }
    Ok(())
}

fn text_cells(series: &Series) -> Result<StringChunked> {
    let text = series
        .cast(&DataType::String)
        .extraction_context(format!("cannot read column '{}'", series.name()))?;
    Ok(text
        .str()
        .extraction_context(format!("cannot read column '{}'", series.name()))?
        .clone())
}

fn parse_cells<T>(
    cells: &StringChunked,
    name: &str,
    kind: ColumnKind,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Vec<Option<T>>> {
    cells
        .into_iter()
        .enumerate()
        .map(|(idx, cell)| match cell {
            Some(raw) if !is_missing_marker(raw) => parse(raw).map(Some).ok_or_else(|| {
                EtlError::Extraction(format!(
                    "line {}: column '{}' has unparseable {:?} value '{}'",
                    idx + FIRST_DATA_LINE,
                    name,
                    kind,
                    raw
                ))
            }),
            _ if kind.allows_missing() => Ok(None),
            _ => Err(EtlError::Extraction(format!(
                "line {}: column '{}' must not be empty",
                idx + FIRST_DATA_LINE,
                name
            ))),
        })
        .collect()
}

fn coerce_series(series: &Series, kind: ColumnKind) -> Result<Series> {
    let name = series.name().clone();
    let cells = text_cells(series)?;

    let coerced = match kind {
        ColumnKind::Identifier | ColumnKind::Categorical => {
            let values = parse_cells(&cells, &name, kind, |s| Some(s.to_string()))?;
            Series::new(name, values)
        }
        ColumnKind::Integer => {
            let values = parse_cells(&cells, &name, kind, parse_integer)?;
            Series::new(name, values)
        }
        ColumnKind::Float => {
            let values = parse_cells(&cells, &name, kind, parse_float)?;
            Series::new(name, values)
        }
        ColumnKind::Timestamp => {
            let values = parse_cells(&cells, &name, kind, |s| {
                parse_timestamp(s).map(|ts| ts.and_utc().timestamp_millis())
            })?;
            Series::new(name.clone(), values)
                .cast(&kind.dtype())
                .extraction_context(format!("cannot store timestamps of '{}'", name))?
        }
    };

    Ok(coerced)
}

/// Columns outside the job schema are kept as text, with missing markers
/// turned into missing values.
fn passthrough_series(series: &Series) -> Result<Series> {
    let cells = text_cells(series)?;
    let values: Vec<Option<&str>> = cells
        .into_iter()
        .map(|cell| cell.filter(|raw| !is_missing_marker(raw)))
        .collect();
    Ok(Series::new(series.name().clone(), values))
}
