use healthguard_core::{ArtifactError, FitError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by the deterministic trainer.
#[derive(Debug, Error)]
pub enum TrainerError {
    #[error("dataset file not found: {}", .0.display())]
    DatasetMissing(PathBuf),

    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("fit error: {0}")]
    Fit(#[from] FitError),

    #[error("training error: {0}")]
    Training(String),

    #[error("artifact error: {0}")]
    Artifact(#[from] ArtifactError),
}
