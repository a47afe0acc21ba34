//! Inference service error types

use healthguard_core::ArtifactError;
use thiserror::Error;

/// Inference service errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Inference disabled, model artifacts unavailable: {0}")]
    ArtifactsUnavailable(#[from] ArtifactError),

    #[error("Input ended before '{0}' was answered")]
    InputClosed(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
