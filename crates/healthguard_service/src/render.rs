//! Plain-text rendering of an assessment

use healthguard_core::{RiskLabel, Severity};

use crate::service::Assessment;

pub fn render_assessment(assessment: &Assessment) -> String {
    let mut out = match assessment.verdict {
        RiskLabel::Alert => format!(
            "ALERT: RISK DETECTED (probability {:.1}%)\n",
            assessment.alert_probability() * 100.0
        ),
        RiskLabel::Low => format!(
            "LOW APPARENT RISK (safety {:.1}%)\n",
            assessment.safety_probability() * 100.0
        ),
    };

    out.push_str("\nClinical rationale:\n");
    for finding in &assessment.findings {
        let tag = match finding.severity {
            Severity::Warning => "WARN",
            Severity::Info => "INFO",
        };
        out.push_str(&format!("  [{}] {}\n", tag, finding.message));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthguard_core::{Finding, FindingKind};

    fn assessment(verdict: RiskLabel, alert_probability: i64) -> Assessment {
        Assessment {
            verdict,
            alert_probability,
            findings: vec![
                Finding {
                    kind: FindingKind::Hepatic,
                    severity: Severity::Warning,
                    message: "liver".to_string(),
                },
                Finding {
                    kind: FindingKind::Cardiovascular,
                    severity: Severity::Info,
                    message: "heart".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_alert_shows_alert_probability() {
        let text = render_assessment(&assessment(RiskLabel::Alert, 873_000));
        assert!(text.starts_with("ALERT: RISK DETECTED (probability 87.3%)"));
        assert!(text.contains("  [WARN] liver\n"));
        assert!(text.contains("  [INFO] heart\n"));
    }

    #[test]
    fn test_low_shows_safety() {
        let text = render_assessment(&assessment(RiskLabel::Low, 250_000));
        assert!(text.starts_with("LOW APPARENT RISK (safety 75.0%)"));
    }
}
