//! Progress reporting for the ETL pipeline.
//!
//! Every component (extractor, transformer, loader and the pipeline itself)
//! receives a shared [`ProgressReporter`] at construction time and reports
//! through it instead of writing to a process-wide logger. The caller decides
//! where updates go: [`TracingReporter`] forwards them to `tracing`,
//! [`ClosureProgressReporter`] hands them to a closure.
//!
//! # Example
//!
//! ```rust,ignore
//! use printshop_etl::Pipeline;
//!
//! let output = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run(None, "data/processed/jobs.csv")?;
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Stages of the ETL run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EtlStage {
    /// Reading the source file or generating sample data
    Extract,
    /// Imputation and feature engineering
    Transform,
    /// Preparing the destination and writing the output file
    Load,
    /// Run finished successfully
    Complete,
    /// Run aborted with an error
    Failed,
}

impl EtlStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Extract => "Extracting",
            Self::Transform => "Transforming",
            Self::Load => "Loading",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Share of the overall run attributed to this stage (0.0 - 1.0).
    pub fn weight(&self) -> f32 {
        match self {
            Self::Extract => 0.30,
            Self::Transform => 0.50,
            Self::Load => 0.20,
            Self::Complete | Self::Failed => 0.0,
        }
    }

    /// Cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Extract => 0.0,
            Self::Transform => 0.30,
            Self::Load => 0.80,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// Severity attached to a progress update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateLevel {
    #[default]
    Info,
    Warning,
    Error,
}

/// A single progress event emitted by a pipeline component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Stage that emitted the update
    pub stage: EtlStage,

    /// Optional sub-stage description (e.g. "Column: page_count")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_stage: Option<String>,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within the current stage (0.0 - 1.0)
    pub stage_progress: f32,

    /// Human-readable message
    pub message: String,

    #[serde(default)]
    pub level: UpdateLevel,
}

impl ProgressUpdate {
    /// Creates a new informational update for a stage.
    pub fn new(stage: EtlStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            sub_stage: None,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
            level: UpdateLevel::Info,
        }
    }

    /// Creates an update scoped to a sub-stage, such as a single column.
    pub fn with_sub_stage(
        stage: EtlStage,
        sub_stage: impl Into<String>,
        stage_progress: f32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            sub_stage: Some(sub_stage.into()),
            ..Self::new(stage, stage_progress, message)
        }
    }

    /// Creates a warning for a stage. Warnings do not change progress.
    pub fn warning(stage: EtlStage, message: impl Into<String>) -> Self {
        Self {
            level: UpdateLevel::Warning,
            ..Self::new(stage, 0.0, message)
        }
    }

    /// Creates a completion update.
    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: EtlStage::Complete,
            sub_stage: None,
            progress: 1.0,
            stage_progress: 1.0,
            message: message.into(),
            level: UpdateLevel::Info,
        }
    }

    /// Creates a failure update naming the stage that failed.
    pub fn failed(failed_stage: Option<EtlStage>, message: impl Into<String>) -> Self {
        Self {
            stage: EtlStage::Failed,
            sub_stage: failed_stage.map(|s| s.display_name().to_string()),
            progress: 0.0,
            stage_progress: 0.0,
            message: message.into(),
            level: UpdateLevel::Error,
        }
    }
}

/// Receiver for progress updates.
///
/// Implementations must be `Send + Sync` so a reporter can be shared between
/// the components of one pipeline through an `Arc`.
pub trait ProgressReporter: Send + Sync {
    /// Called for every progress event. Implementations should not block.
    fn report(&self, update: ProgressUpdate);
}

/// Reporter that forwards updates to `tracing` events.
///
/// This is the reporter components use when the caller does not inject one.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn report(&self, update: ProgressUpdate) {
        let stage = update.stage.display_name();
        match (update.level, update.sub_stage.as_deref()) {
            (UpdateLevel::Info, None) => info!("[{}] {}", stage, update.message),
            (UpdateLevel::Info, Some(sub)) => info!("[{}/{}] {}", stage, sub, update.message),
            (UpdateLevel::Warning, _) => warn!("[{}] {}", stage, update.message),
            (UpdateLevel::Error, _) => error!("[{}] {}", stage, update.message),
        }
    }
}

/// Reporter that discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn report(&self, _update: ProgressUpdate) {}
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
///
/// # Example
///
/// ```rust,ignore
/// use printshop_etl::ClosureProgressReporter;
///
/// let reporter = ClosureProgressReporter::new(|update| {
///     eprintln!("{}: {}", update.stage.display_name(), update.message);
/// });
/// ```
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

/// Shared handle to a reporter, as held by every component.
pub type SharedReporter = Arc<dyn ProgressReporter>;

/// The reporter used when none is injected.
pub fn default_reporter() -> SharedReporter {
    Arc::new(TracingReporter)
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);
static_assertions::assert_impl_all!(TracingReporter: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_progress_update_new() {
        let update = ProgressUpdate::new(EtlStage::Transform, 0.5, "Imputing...");
        assert_eq!(update.stage, EtlStage::Transform);
        assert!(update.sub_stage.is_none());
        assert_eq!(update.stage_progress, 0.5);
        assert!((update.progress - 0.55).abs() < 1e-6);
        assert_eq!(update.level, UpdateLevel::Info);
    }

    #[test]
    fn test_progress_update_clamps() {
        let update = ProgressUpdate::new(EtlStage::Load, 3.0, "overshoot");
        assert_eq!(update.stage_progress, 1.0);
        assert!(update.progress <= 1.0);
    }

    #[test]
    fn test_progress_update_with_sub_stage() {
        let update = ProgressUpdate::with_sub_stage(
            EtlStage::Transform,
            "Column: page_count",
            0.2,
            "Filled 3 values",
        );
        assert_eq!(update.sub_stage.as_deref(), Some("Column: page_count"));
        assert_eq!(update.message, "Filled 3 values");
    }

    #[test]
    fn test_warning_and_failed_levels() {
        let warning = ProgressUpdate::warning(EtlStage::Transform, "all values missing");
        assert_eq!(warning.level, UpdateLevel::Warning);

        let failed = ProgressUpdate::failed(Some(EtlStage::Extract), "boom");
        assert_eq!(failed.stage, EtlStage::Failed);
        assert_eq!(failed.level, UpdateLevel::Error);
        assert_eq!(failed.sub_stage.as_deref(), Some("Extracting"));
    }

    #[test]
    fn test_progress_update_complete() {
        let update = ProgressUpdate::complete("Done!");
        assert_eq!(update.stage, EtlStage::Complete);
        assert_eq!(update.progress, 1.0);
    }

    #[test]
    fn test_stage_weights_sum() {
        let total: f32 = [EtlStage::Extract, EtlStage::Transform, EtlStage::Load]
            .iter()
            .map(|s| s.weight())
            .sum();
        assert!((total - 1.0).abs() < 0.01, "Weights should sum to ~1.0");
    }

    #[test]
    fn test_closure_progress_reporter() {
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        let reporter = ClosureProgressReporter::new(move |_update| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        reporter.report(ProgressUpdate::new(EtlStage::Extract, 0.5, "Test"));
        reporter.report(ProgressUpdate::complete("Done"));

        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_shared_reporter_collects_messages() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let reporter: SharedReporter = Arc::new(ClosureProgressReporter::new(move |u| {
            sink.lock().unwrap().push(u.message);
        }));

        let other = reporter.clone();
        reporter.report(ProgressUpdate::new(EtlStage::Extract, 0.0, "a"));
        other.report(ProgressUpdate::new(EtlStage::Load, 0.0, "b"));

        assert_eq!(*seen.lock().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_stage_json_values() {
        let expectations = [
            (EtlStage::Extract, "\"extract\""),
            (EtlStage::Transform, "\"transform\""),
            (EtlStage::Load, "\"load\""),
            (EtlStage::Complete, "\"complete\""),
            (EtlStage::Failed, "\"failed\""),
        ];

        for (stage, expected) in expectations {
            assert_eq!(serde_json::to_string(&stage).unwrap(), expected);
        }
    }

    #[test]
    fn test_progress_update_json_round_trip() {
        let update = ProgressUpdate::warning(EtlStage::Transform, "column empty");
        let json = serde_json::to_string(&update).expect("Should serialize");
        assert!(json.contains("\"level\":\"warning\""));
        assert!(!json.contains("sub_stage"));

        let back: ProgressUpdate = serde_json::from_str(&json).expect("Should deserialize");
        assert_eq!(back.stage, EtlStage::Transform);
        assert_eq!(back.level, UpdateLevel::Warning);
    }
}
