//! Job size bucketing by page count.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Size bucket of a job, from right-inclusive page-count ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeCategory {
    /// (0, 50] pages
    Small,
    /// (50, 200] pages
    Medium,
    /// (200, 500] pages
    Large,
    /// Zero, negative, above 500 or missing
    Unbucketed,
}

impl SizeCategory {
    pub fn from_page_count(pages: f64) -> Self {
        if pages > 0.0 && pages <= 50.0 {
            Self::Small
        } else if pages > 50.0 && pages <= 200.0 {
            Self::Medium
        } else if pages > 200.0 && pages <= 500.0 {
            Self::Large
        } else {
            Self::Unbucketed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
            Self::Unbucketed => "Unbucketed",
        }
    }
}

impl fmt::Display for SizeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket every page count into a [`SizeCategory`] label column.
pub fn size_category(pages: &Series, name: &str) -> PolarsResult<Series> {
    let pages = pages.cast(&DataType::Float64)?;
    let labels: Vec<&str> = pages
        .f64()?
        .into_iter()
        .map(|p| {
            p.map(SizeCategory::from_page_count)
                .unwrap_or(SizeCategory::Unbucketed)
                .as_str()
        })
        .collect();
    Ok(Series::new(name.into(), labels))
}
