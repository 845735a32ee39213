//! Extract stage.
//!
//! Produces a job [`Table`] from a delimited source file, or from the injected
//! [`JobGenerator`] when no source is given.

mod generator;
mod reader;

pub use generator::{JobGenerator, SyntheticJobGenerator};
pub use reader::{coerce_frame, ensure_unique_ids, read_job_file};

use crate::error::{EtlError, Result};
use crate::pipeline::{EtlStage, ProgressUpdate, SharedReporter, default_reporter};
use crate::table::Table;
use std::path::Path;
use std::sync::Arc;

/// Reads job records into a table.
///
/// Extraction is all-or-nothing: any unreadable file, missing column or bad
/// cell fails with [`EtlError::Extraction`] and no table is returned.
pub struct Extractor {
    generator: Arc<dyn JobGenerator>,
    reporter: SharedReporter,
}

impl Extractor {
    pub fn new(generator: Arc<dyn JobGenerator>, reporter: SharedReporter) -> Self {
        Self {
            generator,
            reporter,
        }
    }

    /// Extractor backed by the default seeded generator, reporting to `tracing`.
    pub fn with_seed(seed: u64, rows: usize) -> Self {
        Self::new(
            Arc::new(SyntheticJobGenerator::new(seed, rows)),
            default_reporter(),
        )
    }

    /// Extract a table from `source`, or from the generator when `source` is `None`.
    pub fn extract(&self, source: Option<&Path>) -> Result<Table> {
        let table = match source {
            Some(path) => {
                if !path.exists() {
                    return Err(EtlError::Extraction(format!(
                        "source '{}' does not exist",
                        path.display()
                    )));
                }
                self.reporter.report(ProgressUpdate::new(
                    EtlStage::Extract,
                    0.0,
                    format!("Reading jobs from {}", path.display()),
                ));
                read_job_file(path)?
            }
            None => {
                self.reporter.report(ProgressUpdate::new(
                    EtlStage::Extract,
                    0.0,
                    format!("No source given, using {}", self.generator.describe()),
                ));
                let table = self.generator.generate()?;
                ensure_unique_ids(&table)?;
                table
            }
        };

        self.reporter.report(ProgressUpdate::new(
            EtlStage::Extract,
            1.0,
            format!(
                "Extracted {} rows, {} columns",
                table.height(),
                table.width()
            ),
        ));
        Ok(table)
    }
}
