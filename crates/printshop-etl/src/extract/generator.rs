//! Synthetic job data.
//!
//! The extractor falls back to a [`JobGenerator`] when no source file is
//! given. [`SyntheticJobGenerator`] produces a realistic, seed-deterministic
//! table for development and tests.

use crate::error::{EtlError, Result, ResultExt};
use crate::schema::*;
use crate::table::Table;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand_distr::Exp;

/// Source of job tables when no input file is available.
///
/// Implementations must be deterministic: the same generator configuration
/// yields the same table every time.
pub trait JobGenerator: Send + Sync {
    /// Produce a job table.
    fn generate(&self) -> Result<Table>;

    /// Short description used in progress messages.
    fn describe(&self) -> String {
        "synthetic job generator".to_string()
    }
}

const DEPARTMENTS: [&str; 6] = [
    "Philosophy",
    "Literature",
    "History",
    "Anthropology",
    "Library",
    "Administration",
];
const JOB_TYPES: [&str; 6] = [
    "Book",
    "Booklet",
    "Leaflet",
    "Thesis",
    "Certificate",
    "Diploma",
];
const PRIORITIES: [&str; 3] = ["High", "Medium", "Low"];
const PRIORITY_WEIGHTS: [f64; 3] = [0.2, 0.5, 0.3];
const STATUSES: [&str; 4] = ["Pending", "In Progress", "Completed", "Delivered"];
const MATERIALS: [&str; 5] = [
    "A4 Paper",
    "A3 Paper",
    "Cardstock",
    "Parchment",
    "Photo Paper",
];

const MEAN_PRODUCTION_HOURS: f64 = 10.0;
const COST_RANGE: (f64, f64) = (50.0, 5000.0);

/// Seeded generator of print-shop jobs.
///
/// Jobs are requested hourly from 2023-01-01T00:00:00 with ids `TRB-00001`,
/// `TRB-00002`, and so on.
#[derive(Debug, Clone)]
pub struct SyntheticJobGenerator {
    seed: u64,
    rows: usize,
    missing_rate: f64,
}

impl SyntheticJobGenerator {
    pub fn new(seed: u64, rows: usize) -> Self {
        Self {
            seed,
            rows,
            missing_rate: 0.0,
        }
    }

    /// Leave roughly this fraction of imputable cells empty.
    pub fn with_missing_rate(mut self, rate: f64) -> Self {
        self.missing_rate = rate.clamp(0.0, 1.0);
        self
    }

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default()
    }

    fn blank<T>(&self, rng: &mut StdRng, value: T) -> Option<T> {
        if self.missing_rate > 0.0 && rng.gen_bool(self.missing_rate) {
            None
        } else {
            Some(value)
        }
    }

    fn categorical(&self, rng: &mut StdRng, name: &str, choices: &[&str]) -> Series {
        let values: Vec<Option<&str>> = (0..self.rows)
            .map(|_| {
                let value = choices.choose(&mut *rng).copied().unwrap_or_default();
                self.blank(rng, value)
            })
            .collect();
        Series::new(name.into(), values)
    }
}

impl JobGenerator for SyntheticJobGenerator {
    fn generate(&self) -> Result<Table> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let rows = self.rows;

        let ids: Vec<String> = (1..=rows).map(|i| format!("TRB-{:05}", i)).collect();

        let start = Self::start();
        let timestamps: Vec<i64> = (0..rows)
            .map(|i| (start + Duration::hours(i as i64)).and_utc().timestamp_millis())
            .collect();
        let timestamps = Series::new(REQUEST_TIMESTAMP.into(), timestamps)
            .cast(&ColumnKind::Timestamp.dtype())
            .extraction_context("cannot build synthetic timestamps")?;

        let departments = self.categorical(&mut rng, DEPARTMENT, &DEPARTMENTS);
        let job_types = self.categorical(&mut rng, JOB_TYPE, &JOB_TYPES);

        let page_counts: Vec<Option<i64>> = (0..rows)
            .map(|_| {
                let value = rng.gen_range(1..500);
                self.blank(&mut rng, value)
            })
            .collect();
        let copy_counts: Vec<Option<i64>> = (0..rows)
            .map(|_| {
                let value = rng.gen_range(1..200);
                self.blank(&mut rng, value)
            })
            .collect();

        let weights = WeightedIndex::new(PRIORITY_WEIGHTS)
            .map_err(|e| EtlError::Extraction(format!("invalid priority weights: {}", e)))?;
        let priorities: Vec<Option<&str>> = (0..rows)
            .map(|_| {
                let value = PRIORITIES[weights.sample(&mut rng)];
                self.blank(&mut rng, value)
            })
            .collect();

        let statuses = self.categorical(&mut rng, STATUS, &STATUSES);

        let production = Exp::new(1.0 / MEAN_PRODUCTION_HOURS).map_err(|e| {
            EtlError::Extraction(format!("invalid production hours distribution: {}", e))
        })?;
        let hours: Vec<Option<f64>> = (0..rows)
            .map(|_| {
                let value = production.sample(&mut rng);
                self.blank(&mut rng, value)
            })
            .collect();
        let costs: Vec<Option<f64>> = (0..rows)
            .map(|_| {
                let value = rng.gen_range(COST_RANGE.0..COST_RANGE.1);
                self.blank(&mut rng, value)
            })
            .collect();

        let materials = self.categorical(&mut rng, MATERIAL, &MATERIALS);

        Table::new(vec![
            Series::new(ID.into(), ids),
            timestamps,
            departments,
            job_types,
            Series::new(PAGE_COUNT.into(), page_counts),
            Series::new(COPY_COUNT.into(), copy_counts),
            Series::new(PRIORITY.into(), priorities),
            statuses,
            Series::new(PRODUCTION_HOURS.into(), hours),
            Series::new(ESTIMATED_COST.into(), costs),
            materials,
        ])
        .extraction_context("cannot assemble synthetic job table")
    }

    fn describe(&self) -> String {
        format!(
            "synthetic job generator (seed {}, {} rows)",
            self.seed, self.rows
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generates_schema_conformant_table() {
        let table = SyntheticJobGenerator::new(42, 50).generate().unwrap();

        assert_eq!(table.height(), 50);
        let expected: Vec<&str> = JOB_COLUMNS.iter().map(|(name, _)| *name).collect();
        assert_eq!(table.column_names(), expected);
        for (name, kind) in JOB_COLUMNS {
            assert_eq!(table.series(name).unwrap().dtype(), &kind.dtype(), "{}", name);
        }
        assert_eq!(table.null_count(), 0);
    }

    #[test]
    fn test_same_seed_same_table() {
        let a = SyntheticJobGenerator::new(42, 100).generate().unwrap();
        let b = SyntheticJobGenerator::new(42, 100).generate().unwrap();
        assert!(a.equals(&b));
    }

    #[test]
    fn test_different_seed_different_table() {
        let a = SyntheticJobGenerator::new(1, 100).generate().unwrap();
        let b = SyntheticJobGenerator::new(2, 100).generate().unwrap();
        assert!(!a.equals(&b));
    }

    #[test]
    fn test_ids_and_timestamps_are_sequential() {
        let table = SyntheticJobGenerator::new(42, 3).generate().unwrap();

        let ids: Vec<Option<&str>> = table.series(ID).unwrap().str().unwrap().into_iter().collect();
        assert_eq!(ids, vec![Some("TRB-00001"), Some("TRB-00002"), Some("TRB-00003")]);

        let millis = table
            .series(REQUEST_TIMESTAMP)
            .unwrap()
            .cast(&DataType::Int64)
            .unwrap();
        let millis: Vec<i64> = millis.i64().unwrap().into_iter().flatten().collect();
        assert_eq!(millis[1] - millis[0], 3_600_000);
    }

    #[test]
    fn test_value_ranges() {
        let table = SyntheticJobGenerator::new(7, 500).generate().unwrap();

        let pages = table.series(PAGE_COUNT).unwrap().i64().unwrap();
        assert!(pages.into_iter().flatten().all(|p| (1..500).contains(&p)));

        let costs = table.series(ESTIMATED_COST).unwrap().f64().unwrap();
        assert!(costs.into_iter().flatten().all(|c| (50.0..5000.0).contains(&c)));

        let hours = table.series(PRODUCTION_HOURS).unwrap().f64().unwrap();
        assert!(hours.into_iter().flatten().all(|h| h >= 0.0 && h.is_finite()));
    }

    #[test]
    fn test_production_hours_follow_exponential_mean() {
        let table = SyntheticJobGenerator::new(42, 5000).generate().unwrap();

        let mean = table.series(PRODUCTION_HOURS).unwrap().mean().unwrap();
        assert!((9.0..11.0).contains(&mean), "mean production hours {}", mean);
    }

    #[test]
    fn test_missing_rate_leaves_keys_intact() {
        let table = SyntheticJobGenerator::new(42, 200)
            .with_missing_rate(0.3)
            .generate()
            .unwrap();

        assert_eq!(table.series(ID).unwrap().null_count(), 0);
        assert_eq!(table.series(REQUEST_TIMESTAMP).unwrap().null_count(), 0);
        assert!(table.series(DEPARTMENT).unwrap().null_count() > 0);
        assert!(table.series(ESTIMATED_COST).unwrap().null_count() > 0);
    }
}
