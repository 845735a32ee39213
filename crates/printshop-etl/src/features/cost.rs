//! Cost normalization.

use polars::prelude::*;

/// `estimated_cost / page_count` per row, as Float64.
///
/// Division by zero and NaN results become `0.0`, so the column is always
/// finite.
pub fn cost_per_page(cost: &Series, pages: &Series, name: &str) -> PolarsResult<Series> {
    if cost.len() != pages.len() {
        return Err(PolarsError::ShapeMismatch(
            format!(
                "'{}' has {} rows but '{}' has {}",
                cost.name(),
                cost.len(),
                pages.name(),
                pages.len()
            )
            .into(),
        ));
    }

    let cost = cost.cast(&DataType::Float64)?;
    let pages = pages.cast(&DataType::Float64)?;

    let values: Vec<f64> = cost
        .f64()?
        .into_iter()
        .zip(pages.f64()?.into_iter())
        .map(|(c, p)| match (c, p) {
            (Some(c), Some(p)) => finite_or_zero(c / p),
            _ => 0.0,
        })
        .collect();

    Ok(Series::new(name.into(), values))
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
