//! Risk assessment over loaded artifacts

use healthguard_core::artifacts::ArtifactPaths;
use healthguard_core::explain::{explain, Finding};
use healthguard_core::forest::label_for_probability;
use healthguard_core::schema::{from_fixed, SCALE};
use healthguard_core::{FittedArtifacts, PatientRecord, RiskLabel};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::ServiceError;

/// Verdict, model probability and rule-based rationale for one patient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub verdict: RiskLabel,
    /// Fixed-point probability of `Alert`
    pub alert_probability: i64,
    pub findings: Vec<Finding>,
}

impl Assessment {
    pub fn alert_probability(&self) -> f64 {
        from_fixed(self.alert_probability)
    }

    /// Probability of `Low`, i.e. `1 - p`
    pub fn safety_probability(&self) -> f64 {
        from_fixed(SCALE - self.alert_probability)
    }
}

/// Holds the scaler/model pair for the lifetime of the process.
///
/// Built once by the caller and passed by reference; there is no global cache.
#[derive(Debug, Clone)]
pub struct RiskService {
    artifacts: FittedArtifacts,
}

impl RiskService {
    pub fn new(artifacts: FittedArtifacts) -> Self {
        Self { artifacts }
    }

    /// Load both artifacts; any failure leaves inference disabled.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ServiceError> {
        let artifacts = FittedArtifacts::load(paths)?;
        info!(
            "Loaded forest with {} trees trained on {} samples (seed {})",
            artifacts.model.num_trees(),
            artifacts.model.metadata.train_samples,
            artifacts.model.metadata.seed
        );
        Ok(Self::new(artifacts))
    }

    pub fn artifacts(&self) -> &FittedArtifacts {
        &self.artifacts
    }

    pub fn assess(&self, record: &PatientRecord) -> Assessment {
        let scaled = self.artifacts.scaler.transform(&record.features());
        let alert_probability = self.artifacts.model.predict_proba(&scaled);
        let verdict = label_for_probability(alert_probability);
        debug!("Alert probability {} -> {}", alert_probability, verdict);

        Assessment {
            verdict,
            alert_probability,
            findings: explain(record),
        }
    }
}
