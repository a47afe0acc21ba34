//! Clinical alert rules
//!
//! The risk label is `hepatic || cardiovascular` where
//! - hepatic: drinks and (gamma-GTP > 50 or ALT > 45)
//! - cardiovascular: current smoker and (SBP > 140 or triglycerides > 200)
//!
//! Thresholds are fixed; the same constants drive the explanation shown at
//! inference time.

use serde::{Deserialize, Serialize};

use crate::record::{PatientRecord, SmokingStatus};

pub const GAMMA_GTP_LIMIT: f64 = 50.0;
pub const ALT_LIMIT: f64 = 45.0;
pub const SYSTOLIC_LIMIT: f64 = 140.0;
pub const TRIGLYCERIDE_LIMIT: f64 = 200.0;

/// Binary risk label (0 = low risk, 1 = alert)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLabel {
    Low,
    Alert,
}

impl RiskLabel {
    /// Both classes in index order
    pub const ALL: [RiskLabel; 2] = [RiskLabel::Low, RiskLabel::Alert];

    pub fn index(self) -> usize {
        match self {
            RiskLabel::Low => 0,
            RiskLabel::Alert => 1,
        }
    }

    pub fn from_alert(alert: bool) -> Self {
        if alert {
            RiskLabel::Alert
        } else {
            RiskLabel::Low
        }
    }

    pub fn is_alert(self) -> bool {
        self == RiskLabel::Alert
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLabel::Low => write!(f, "low"),
            RiskLabel::Alert => write!(f, "alert"),
        }
    }
}

/// Liver enzymes above reference (gamma-GTP or ALT)
pub fn hepatic_markers_elevated(record: &PatientRecord) -> bool {
    record.gamma_gtp > GAMMA_GTP_LIMIT || record.alt > ALT_LIMIT
}

/// Blood pressure or triglycerides above reference
pub fn cardiovascular_markers_elevated(record: &PatientRecord) -> bool {
    record.systolic_bp > SYSTOLIC_LIMIT || record.triglyceride > TRIGLYCERIDE_LIMIT
}

pub fn hepatic_alert(record: &PatientRecord) -> bool {
    record.drinks && hepatic_markers_elevated(record)
}

pub fn cardiovascular_alert(record: &PatientRecord) -> bool {
    record.smoking == SmokingStatus::Current && cardiovascular_markers_elevated(record)
}

/// Derive the training label for a record.
pub fn derive_label(record: &PatientRecord) -> RiskLabel {
    RiskLabel::from_alert(hepatic_alert(record) || cardiovascular_alert(record))
}
