//! Error types for the ETL pipeline.
//!
//! Each stage raises its own kind of error; the pipeline propagates the first
//! one unchanged so callers can tell which stage failed and why.
//!
//! Errors are serializable so they can be reported as JSON by the CLI.

use crate::pipeline::EtlStage;
use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the ETL pipeline.
#[derive(Error, Debug)]
pub enum EtlError {
    /// Source missing, unreadable, or not conforming to the job schema.
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// The table handed to the transformer cannot be transformed.
    #[error("Transformation failed: {0}")]
    Transformation(String),

    /// Destination could not be created or written.
    #[error("Failed to persist '{}': {reason}", path.display())]
    Persistence { path: PathBuf, reason: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EtlError {
    /// Convenience constructor for persistence failures.
    pub fn persistence(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        EtlError::Persistence {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Stage that raised the error, if any.
    pub fn stage(&self) -> Option<EtlStage> {
        match self {
            Self::Extraction(_) => Some(EtlStage::Extract),
            Self::Transformation(_) => Some(EtlStage::Transform),
            Self::Persistence { .. } => Some(EtlStage::Load),
            Self::InvalidConfig(_) => None,
        }
    }

    /// Stable error code for machine consumers.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Extraction(_) => "EXTRACTION_ERROR",
            Self::Transformation(_) => "TRANSFORMATION_ERROR",
            Self::Persistence { .. } => "PERSISTENCE_ERROR",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }
}

/// Errors are serialized as `{ code, stage, message }`.
impl Serialize for EtlError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("EtlError", 3)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("stage", &self.stage())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

impl From<crate::config::ConfigValidationError> for EtlError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        EtlError::InvalidConfig(err.to_string())
    }
}

/// Result type alias for ETL operations.
pub type Result<T> = std::result::Result<T, EtlError>;

/// Extension trait for attributing foreign errors to a pipeline stage.
pub trait ResultExt<T> {
    /// Map the error into an [`EtlError::Extraction`] with context.
    fn extraction_context(self, context: impl Into<String>) -> Result<T>;

    /// Map the error into an [`EtlError::Transformation`] with context.
    fn transformation_context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    fn extraction_context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EtlError::Extraction(format!("{}: {}", context.into(), e)))
    }

    fn transformation_context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EtlError::Transformation(format!("{}: {}", context.into(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            EtlError::Extraction("x".to_string()).error_code(),
            "EXTRACTION_ERROR"
        );
        assert_eq!(
            EtlError::persistence("out.csv", "denied").error_code(),
            "PERSISTENCE_ERROR"
        );
    }

    #[test]
    fn test_stage_attribution() {
        assert_eq!(
            EtlError::Extraction("x".into()).stage(),
            Some(EtlStage::Extract)
        );
        assert_eq!(
            EtlError::Transformation("x".into()).stage(),
            Some(EtlStage::Transform)
        );
        assert_eq!(
            EtlError::persistence("a", "b").stage(),
            Some(EtlStage::Load)
        );
        assert_eq!(EtlError::InvalidConfig("x".into()).stage(), None);
    }

    #[test]
    fn test_persistence_message_names_path() {
        let error = EtlError::persistence("/tmp/out/jobs.csv", "permission denied");
        let message = error.to_string();
        assert!(message.contains("/tmp/out/jobs.csv"));
        assert!(message.contains("permission denied"));
    }

    #[test]
    fn test_error_serialization() {
        let error = EtlError::Transformation("required column 'estimated_cost' is missing".into());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("TRANSFORMATION_ERROR"));
        assert!(json.contains("\"stage\":\"transform\""));
        assert!(json.contains("estimated_cost"));
    }

    #[test]
    fn test_result_ext_context() {
        let parsed: std::result::Result<i64, std::num::ParseIntError> = "abc".parse::<i64>();
        let error = parsed.extraction_context("row 3, column 'page_count'").unwrap_err();
        assert!(matches!(error, EtlError::Extraction(_)));
        assert!(error.to_string().contains("row 3"));
    }
}
