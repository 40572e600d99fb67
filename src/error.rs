//! Error types for the projection engine.
//!
//! Internal steps of the projection pass are fallible; the public
//! `Projector::project` entry point converts every error into a
//! `Document` carrying the error flag and message, so callers never
//! see a `Result`.

use thiserror::Error;

/// Errors raised while projecting an analysis result.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// A required piece of analysis data is absent from the result.
    #[error("no {stage} in analysis result")]
    MissingData { stage: String },

    /// An internal consistency invariant was violated (e.g. a vertex
    /// with zero or multiple lattice correspondents where exactly one
    /// is expected).
    #[error("correspondence contract violated: {message}")]
    ContractViolation { message: String },

    /// Failure reported by the upstream analysis pipeline.
    #[error("analysis pipeline failure: {message}")]
    Pipeline { message: String },

    /// Malformed projection configuration.
    #[error("invalid projection config: {message}")]
    Config { message: String },
}

impl ProjectionError {
    pub(crate) fn missing(stage: &str) -> Self {
        ProjectionError::MissingData {
            stage: stage.to_string(),
        }
    }

    pub(crate) fn contract(message: impl Into<String>) -> Self {
        ProjectionError::ContractViolation {
            message: message.into(),
        }
    }
}

/// Result type for projection operations.
pub type ProjectionResult<T> = Result<T, ProjectionError>;
