//! Rule-based rationale shown next to the model verdict
//!
//! Independent of the model. Uses the same thresholds as the training label.

use serde::{Deserialize, Serialize};

use crate::record::PatientRecord;
use crate::rules::{cardiovascular_alert, cardiovascular_markers_elevated, hepatic_markers_elevated};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FindingKind {
    Hepatic,
    Cardiovascular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    fn new(kind: FindingKind, severity: Severity, message: &str) -> Self {
        Self {
            kind,
            severity,
            message: message.to_string(),
        }
    }
}

/// One hepatic and one cardiovascular finding, in that order.
pub fn explain(record: &PatientRecord) -> Vec<Finding> {
    vec![hepatic_finding(record), cardiovascular_finding(record)]
}

fn hepatic_finding(record: &PatientRecord) -> Finding {
    if hepatic_markers_elevated(record) {
        Finding::new(
            FindingKind::Hepatic,
            Severity::Warning,
            "Hepatic attention: liver enzymes (GTP/ALT) are elevated. \
             With alcohol consumption the risk of liver damage is high.",
        )
    } else {
        Finding::new(
            FindingKind::Hepatic,
            Severity::Info,
            "Liver: biomarkers within the expected range.",
        )
    }
}

// Warning requires the same conjunction as the training label.
fn cardiovascular_finding(record: &PatientRecord) -> Finding {
    if cardiovascular_alert(record) {
        Finding::new(
            FindingKind::Cardiovascular,
            Severity::Warning,
            "Cardiovascular attention: blood pressure or triglycerides are elevated \
             in a current smoker.",
        )
    } else if cardiovascular_markers_elevated(record) {
        Finding::new(
            FindingKind::Cardiovascular,
            Severity::Info,
            "Heart: blood pressure or triglycerides above reference, no current smoking reported.",
        )
    } else {
        Finding::new(
            FindingKind::Cardiovascular,
            Severity::Info,
            "Heart: blood pressure and triglycerides within the expected range.",
        )
    }
}
