//! Pipeline module.
//!
//! This module provides the ETL pipeline and the progress reporting used by
//! every stage.

mod builder;
pub mod progress;

pub use builder::{Pipeline, PipelineBuilder};
pub use progress::{
    ClosureProgressReporter, EtlStage, ProgressReporter, ProgressUpdate, SharedReporter,
    SilentReporter, TracingReporter, UpdateLevel, default_reporter,
};
