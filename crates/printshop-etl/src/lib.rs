//! Print-shop Jobs ETL Library
//!
//! A batch Extract-Transform-Load pipeline for print-shop job records, built
//! with Rust and Polars.
//!
//! # Overview
//!
//! - **Extract**: read a CSV export of job records, or generate a seeded
//!   synthetic sample when no file is given
//! - **Transform**: median imputation for numeric columns, a sentinel for
//!   missing categories, then derived `month`, `weekday_name`,
//!   `hour_of_day`, `cost_per_page` and `size_category` columns
//! - **Load**: atomic CSV write to the destination
//! - **Progress Reporting**: every stage reports through an injected
//!   [`ProgressReporter`]
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use printshop_etl::{EtlConfig, Pipeline};
//!
//! let config = EtlConfig::builder()
//!     .data_dir("data")
//!     .seed(42)
//!     .sample_rows(1000)
//!     .build()?;
//!
//! let output = Pipeline::builder()
//!     .config(config)
//!     .build()?
//!     .run(None, "data/processed/processed_jobs.csv")?;
//!
//! println!("{} rows written to {}", output.summary.rows, output.path.display());
//! ```
//!
//! # Custom data sources
//!
//! When no source file is given, jobs come from a [`JobGenerator`]. Inject
//! your own with [`PipelineBuilder::generator`]:
//!
//! ```rust,ignore
//! use printshop_etl::{JobGenerator, Pipeline, Table};
//! use std::sync::Arc;
//!
//! struct Fixture(Table);
//!
//! impl JobGenerator for Fixture {
//!     fn generate(&self) -> printshop_etl::Result<Table> {
//!         Ok(self.0.clone())
//!     }
//! }
//!
//! let pipeline = Pipeline::builder()
//!     .generator(Arc::new(Fixture(table)))
//!     .build()?;
//! ```
//!
//! # Errors
//!
//! Every stage fails with its own [`EtlError`] variant and the pipeline
//! returns the first error unchanged. No output file is written unless
//! Extract and Transform both succeed.

pub mod config;
pub mod error;
pub mod extract;
pub mod features;
pub mod imputers;
pub mod loader;
pub mod pipeline;
pub mod schema;
pub mod table;
pub mod transform;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{ConfigValidationError, DEFAULT_MISSING_CATEGORY, EtlConfig, EtlConfigBuilder};
pub use error::{EtlError, Result, ResultExt};
pub use extract::{Extractor, JobGenerator, SyntheticJobGenerator};
pub use features::SizeCategory;
pub use imputers::StatisticalImputer;
pub use loader::Loader;
pub use pipeline::{
    ClosureProgressReporter, EtlStage, Pipeline, PipelineBuilder, ProgressReporter,
    ProgressUpdate, SharedReporter, SilentReporter, TracingReporter, UpdateLevel,
};
pub use table::Table;
pub use transform::Transformer;
pub use types::{PipelineOutput, RunSummary};
