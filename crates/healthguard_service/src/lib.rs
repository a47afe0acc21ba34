//! HealthGuard Service - single-patient inference over trained artifacts
//!
//! Loads the scaler/model pair once, scores one patient record at a time and
//! pairs the model verdict with the rule-based clinical rationale.

pub mod errors;
pub mod form;
pub mod render;
pub mod service;

pub use errors::ServiceError;
pub use form::{default_record, ChoiceField, NumericField, PatientForm};
pub use render::render_assessment;
pub use service::{Assessment, RiskService};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
