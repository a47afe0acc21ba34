//! CSV dataset loading and label derivation
//!
//! Reads the raw clinical dataset by header name, encodes the categorical
//! columns and derives the risk label for every row. Columns outside the
//! feature schema are ignored.

use anyhow::{Context, Result};
use healthguard_core::record::parse_drinking;
use healthguard_core::{derive_label, FeatureVector, PatientRecord, RiskLabel, Sex, SmokingStatus};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// One dataset row as it appears in the CSV
#[derive(Debug, Clone, Deserialize)]
struct RawRow {
    age: f64,
    sex: String,
    weight: f64,
    waistline: f64,
    #[serde(rename = "SBP")]
    sbp: f64,
    #[serde(rename = "DBP")]
    dbp: f64,
    tot_chole: f64,
    #[serde(rename = "LDL_chole")]
    ldl_chole: f64,
    triglyceride: f64,
    hemoglobin: f64,
    #[serde(rename = "gamma_GTP")]
    gamma_gtp: f64,
    #[serde(rename = "SGOT_ALT")]
    sgot_alt: f64,
    #[serde(rename = "SGOT_AST")]
    sgot_ast: f64,
    #[serde(rename = "SMK_stat_type_cd")]
    smk_stat_type_cd: f64,
    #[serde(rename = "DRK_YN")]
    drk_yn: String,
}

impl RawRow {
    fn into_record(self) -> Result<PatientRecord> {
        if self.smk_stat_type_cd.fract() != 0.0 {
            anyhow::bail!("non-integral smoking code {}", self.smk_stat_type_cd);
        }

        Ok(PatientRecord {
            age: self.age,
            sex: Sex::from_label(&self.sex)?,
            weight: self.weight,
            waistline: self.waistline,
            systolic_bp: self.sbp,
            diastolic_bp: self.dbp,
            total_cholesterol: self.tot_chole,
            ldl_cholesterol: self.ldl_chole,
            triglyceride: self.triglyceride,
            hemoglobin: self.hemoglobin,
            gamma_gtp: self.gamma_gtp,
            alt: self.sgot_alt,
            ast: self.sgot_ast,
            smoking: SmokingStatus::from_code(self.smk_stat_type_cd as i64)?,
            drinks: parse_drinking(&self.drk_yn)?,
        })
    }
}

/// Class counts of the derived label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabelDistribution {
    pub counts: [usize; 2],
}

impl LabelDistribution {
    pub fn from_labels(labels: &[RiskLabel]) -> Self {
        let mut counts = [0usize; 2];
        for label in labels {
            counts[label.index()] += 1;
        }
        Self { counts }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn count(&self, label: RiskLabel) -> usize {
        self.counts[label.index()]
    }

    /// Share of `label` in [0, 1]
    pub fn fraction(&self, label: RiskLabel) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.count(label) as f64 / total as f64,
        }
    }
}

/// Labeled patient records
#[derive(Clone, Debug)]
pub struct Dataset {
    pub records: Vec<PatientRecord>,
    pub labels: Vec<RiskLabel>,
}

impl Dataset {
    /// Label already-typed records
    pub fn from_records(records: Vec<PatientRecord>) -> Self {
        let labels = records.iter().map(derive_label).collect();
        Self { records, labels }
    }

    /// Load dataset from CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())
            .with_context(|| format!("Failed to open {}", path.as_ref().display()))?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut records = Vec::new();

        for (row_idx, result) in reader.deserialize::<RawRow>().enumerate() {
            // header is line 1
            let line = row_idx + 2;
            let raw = result.with_context(|| format!("Line {}: malformed row", line))?;
            let record = raw
                .into_record()
                .with_context(|| format!("Line {}: invalid value", line))?;
            records.push(record);
        }

        if records.is_empty() {
            anyhow::bail!("Dataset is empty");
        }

        Ok(Self::from_records(records))
    }

    /// Get number of samples
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if dataset is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Encoded feature vectors in schema order
    pub fn features(&self) -> Vec<FeatureVector> {
        self.records.iter().map(PatientRecord::features).collect()
    }

    pub fn label_distribution(&self) -> LabelDistribution {
        LabelDistribution::from_labels(&self.labels)
    }
}
