//! ETL pipeline orchestration.
//!
//! This module provides the `Pipeline` struct and its builder, which wire
//! the extractor, transformer and loader together and run them in order.

use crate::config::{ConfigValidationError, EtlConfig};
use crate::error::{EtlError, Result};
use crate::extract::{Extractor, JobGenerator, SyntheticJobGenerator};
use crate::loader::Loader;
use crate::pipeline::progress::{
    ClosureProgressReporter, EtlStage, ProgressReporter, ProgressUpdate, SharedReporter,
    default_reporter,
};
use crate::transform::Transformer;
use crate::types::{PipelineOutput, RunSummary};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// The print-shop jobs ETL pipeline.
///
/// Use [`Pipeline::builder()`] to create a pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use printshop_etl::{EtlConfig, Pipeline};
///
/// let config = EtlConfig::builder().data_dir("data").seed(42).build()?;
///
/// let output = Pipeline::builder()
///     .config(config)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .run_configured()?;
///
/// println!("Wrote {} rows to {}", output.summary.rows, output.path.display());
/// ```
pub struct Pipeline {
    config: EtlConfig,
    extractor: Extractor,
    transformer: Transformer,
    loader: Loader,
    reporter: SharedReporter,
}

// Ensure Pipeline can be moved to a worker thread
static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// The configuration this pipeline was built with.
    pub fn config(&self) -> &EtlConfig {
        &self.config
    }

    /// Run Extract, Transform and Load once.
    ///
    /// With `source` set the jobs are read from that file, otherwise they come
    /// from the generator. The first failing stage aborts the run and its
    /// error is returned unchanged. Nothing is written unless Extract and
    /// Transform both succeed.
    pub fn run(
        &self,
        source: Option<&Path>,
        destination: impl AsRef<Path>,
    ) -> Result<PipelineOutput> {
        match self.run_internal(source, destination.as_ref()) {
            Ok(output) => {
                self.reporter.report(ProgressUpdate::complete(format!(
                    "Pipeline completed successfully: {} rows written to {}",
                    output.summary.rows,
                    output.path.display()
                )));
                Ok(output)
            }
            Err(e) => {
                self.reporter
                    .report(ProgressUpdate::failed(e.stage(), e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Run with the source and destination taken from the configuration.
    ///
    /// Also creates the `raw/` directory under `data_dir`, where input
    /// exports are expected to be dropped.
    pub fn run_configured(&self) -> Result<PipelineOutput> {
        let raw_dir = self.config.raw_dir();
        fs::create_dir_all(&raw_dir).map_err(|e| EtlError::persistence(&raw_dir, e))?;
        debug!("Raw data directory ready: {}", raw_dir.display());

        self.run(self.config.input_file.as_deref(), self.config.destination())
    }

    fn run_internal(&self, source: Option<&Path>, destination: &Path) -> Result<PipelineOutput> {
        let start_time = Instant::now();
        info!("Starting ETL pipeline...");

        let extracted = self.extractor.extract(source)?;
        let transformed = self.transformer.transform(&extracted)?;

        self.loader.initialize(destination)?;
        let path = self.loader.load(&transformed, destination)?;

        let duration_ms = start_time.elapsed().as_millis() as u64;
        info!("ETL pipeline finished in {}ms", duration_ms);

        let summary = RunSummary::from_table(&transformed, path.clone(), duration_ms);
        Ok(PipelineOutput {
            table: transformed,
            path,
            summary,
        })
    }
}

/// Builder for creating a [`Pipeline`] with custom configuration.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<EtlConfig>,
    generator: Option<Arc<dyn JobGenerator>>,
    progress_reporter: Option<SharedReporter>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: EtlConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the job generator used when no source file is given.
    ///
    /// Defaults to a [`SyntheticJobGenerator`] seeded from the configuration.
    pub fn generator(mut self, generator: Arc<dyn JobGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Set a progress reporter shared by every stage.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use printshop_etl::{ProgressReporter, ProgressUpdate};
    /// use std::sync::Arc;
    ///
    /// struct MyReporter;
    ///
    /// impl ProgressReporter for MyReporter {
    ///     fn report(&self, update: ProgressUpdate) {
    ///         println!("{}: {}", update.stage.display_name(), update.message);
    ///     }
    /// }
    ///
    /// let pipeline = Pipeline::builder()
    ///     .progress_reporter(Arc::new(MyReporter))
    ///     .build()?;
    /// ```
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid. Building has no
    /// side effects on the filesystem.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let reporter = self.progress_reporter.unwrap_or_else(default_reporter);
        let generator: Arc<dyn JobGenerator> = match self.generator {
            Some(generator) => generator,
            None => Arc::new(
                SyntheticJobGenerator::new(config.seed, config.sample_rows)
                    .with_missing_rate(config.missing_rate),
            ),
        };

        Ok(Pipeline {
            extractor: Extractor::new(generator, reporter.clone()),
            transformer: Transformer::new(config.missing_category.clone(), reporter.clone()),
            loader: Loader::new(reporter.clone()),
            reporter,
            config,
        })
    }
}
