//! HealthGuard core: deterministic risk scoring primitives
//!
//! Shared between the offline trainer and the inference surface so both
//! sides agree on one feature order and one artifact format.
//!
//! Modules:
//! - `schema`: ordered feature columns and the fixed-point feature vector
//! - `record`: typed patient record and categorical encodings
//! - `rules`: clinical thresholds and the derived risk label
//! - `scaler`: fixed-point standard scaler
//! - `forest`: integer-only random forest evaluator
//! - `serde_canon`: canonical JSON and blake3 digests
//! - `artifacts`: persisting and loading the fitted scaler/model pair
//! - `explain`: rule-based rationale for a single record

pub mod artifacts;
pub mod errors;
pub mod explain;
pub mod forest;
pub mod record;
pub mod rules;
pub mod scaler;
pub mod schema;
pub mod serde_canon;

pub use artifacts::{ArtifactPaths, FittedArtifacts};
pub use errors::{ArtifactError, FitError, RecordError};
pub use explain::{explain, Finding, FindingKind, Severity};
pub use forest::{ForestMetadata, Node, RandomForest, Tree};
pub use record::{PatientRecord, Sex, SmokingStatus};
pub use rules::{derive_label, RiskLabel};
pub use scaler::StandardScaler;
pub use schema::{Feature, FeatureVector, FEATURE_COLUMNS, FEATURE_COUNT, SCALE};

/// Crate version string for artifact metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
