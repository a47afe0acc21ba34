//! Error types for HealthGuard core

use std::path::PathBuf;
use thiserror::Error;

use crate::serde_canon::CanonicalError;

/// Raw categorical values that cannot be encoded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("unknown sex label: {0:?} (expected \"Male\" or \"Female\")")]
    UnknownSex(String),

    #[error("unknown drinking flag: {0:?} (expected \"Y\" or \"N\")")]
    UnknownDrinkingFlag(String),

    #[error("unknown smoking status code: {0} (expected 1, 2 or 3)")]
    UnknownSmokingCode(i64),
}

/// Fitting a transform or model on unusable input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FitError {
    #[error("cannot fit on an empty sample set")]
    EmptyInput,

    #[error("features and labels differ in length: {features} vs {labels}")]
    LengthMismatch { features: usize, labels: usize },
}

/// Persisting or loading the fitted scaler/model pair
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("artifact not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("canonical serialization error: {0}")]
    Canonical(#[from] CanonicalError),

    #[error("hash mismatch for {}: expected {expected}, found {actual}", .path.display())]
    HashMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("feature schema mismatch: expected {expected:?}, found {found:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("artifact validation failed: {0}")]
    Validation(String),
}
