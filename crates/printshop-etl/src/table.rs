//! Table abstraction passed between ETL stages.
//!
//! A [`Table`] is an ordered set of equal-length, named, typed columns backed
//! by a polars `DataFrame`. Every operation returns a new table; the receiver
//! is never modified, so a stage can hand its input on without worrying about
//! later stages changing it. Column data is reference counted, which keeps
//! these copies cheap.

use polars::prelude::*;

/// Ordered collection of equal-length named columns.
#[derive(Debug, Clone)]
pub struct Table {
    frame: DataFrame,
}

impl Table {
    /// Build a table from columns. Fails if lengths differ or names repeat.
    pub fn new(columns: Vec<Series>) -> PolarsResult<Self> {
        let columns: Vec<Column> = columns.into_iter().map(Column::from).collect();
        Ok(Self {
            frame: DataFrame::new(columns)?,
        })
    }

    /// Wrap an existing frame.
    pub fn from_frame(frame: DataFrame) -> Self {
        Self { frame }
    }

    /// Borrow the underlying frame.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Consume the table, returning the underlying frame.
    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.frame.width()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }

    /// Borrow a column as a series.
    pub fn series(&self, name: &str) -> PolarsResult<&Series> {
        self.frame.column(name).map(|c| c.as_materialized_series())
    }

    /// Iterate over all columns as series, in order.
    pub fn iter_series(&self) -> impl Iterator<Item = &Series> {
        self.frame
            .get_columns()
            .iter()
            .map(|c| c.as_materialized_series())
    }

    /// Total number of missing cells across all columns.
    pub fn null_count(&self) -> usize {
        self.frame.get_columns().iter().map(|c| c.null_count()).sum()
    }

    /// Return a copy with `series` appended, or replacing the column of the
    /// same name in place.
    pub fn with_column(&self, series: Series) -> PolarsResult<Self> {
        let mut frame = self.frame.clone();
        frame.with_column(series)?;
        Ok(Self { frame })
    }

    /// Return a copy where column `name` is replaced by `f(column)`.
    ///
    /// The result keeps the original column name and position.
    pub fn map_column<F>(&self, name: &str, f: F) -> PolarsResult<Self>
    where
        F: FnOnce(&Series) -> PolarsResult<Series>,
    {
        let mut mapped = f(self.series(name)?)?;
        mapped.rename(name.into());
        self.with_column(mapped)
    }

    /// Whether two tables hold the same columns and values, treating missing
    /// cells as equal to each other.
    pub fn equals(&self, other: &Table) -> bool {
        self.frame.equals_missing(&other.frame)
    }
}

impl From<DataFrame> for Table {
    fn from(frame: DataFrame) -> Self {
        Self::from_frame(frame)
    }
}
