//! Ordered feature schema
//!
//! `FEATURE_COLUMNS` is the single source of truth for column order. The
//! trainer selects dataset columns by these names and the inference side
//! builds its input through `PatientRecord::features`, which indexes through
//! `Feature`. Every persisted artifact carries the same list and is rejected
//! on load if it differs.

use serde::{Deserialize, Serialize};

/// Fixed-point scale factor (1e6, micro-units)
pub const SCALE: i64 = 1_000_000;

/// Number of model input features
pub const FEATURE_COUNT: usize = 15;

/// Dataset column names in model input order
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "age",
    "sex",
    "weight",
    "waistline",
    "SBP",
    "DBP",
    "tot_chole",
    "LDL_chole",
    "triglyceride",
    "hemoglobin",
    "gamma_GTP",
    "SGOT_ALT",
    "SGOT_AST",
    "SMK_stat_type_cd",
    "DRK_YN",
];

/// A model input feature; the discriminant is its position in the vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(usize)]
pub enum Feature {
    Age = 0,
    Sex,
    Weight,
    Waistline,
    SystolicBp,
    DiastolicBp,
    TotalCholesterol,
    LdlCholesterol,
    Triglyceride,
    Hemoglobin,
    GammaGtp,
    Alt,
    Ast,
    Smoking,
    Drinking,
}

impl Feature {
    /// All features in vector order
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Age,
        Feature::Sex,
        Feature::Weight,
        Feature::Waistline,
        Feature::SystolicBp,
        Feature::DiastolicBp,
        Feature::TotalCholesterol,
        Feature::LdlCholesterol,
        Feature::Triglyceride,
        Feature::Hemoglobin,
        Feature::GammaGtp,
        Feature::Alt,
        Feature::Ast,
        Feature::Smoking,
        Feature::Drinking,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Dataset column name for this feature
    pub fn column(self) -> &'static str {
        FEATURE_COLUMNS[self.index()]
    }
}

/// Returns true when `columns` matches `FEATURE_COLUMNS` exactly, order included.
pub fn columns_match(columns: &[String]) -> bool {
    columns.len() == FEATURE_COUNT
        && columns
            .iter()
            .zip(FEATURE_COLUMNS.iter())
            .all(|(a, b)| a == b)
}

/// Owned copy of the schema for embedding in artifacts
pub fn schema_columns() -> Vec<String> {
    FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect()
}

/// Convert a real value to fixed-point, rounding half away from zero
pub fn to_fixed(value: f64) -> i64 {
    (value * SCALE as f64).round() as i64
}

/// Convert a fixed-point value back to a real value (display only)
pub fn from_fixed(value: i64) -> f64 {
    value as f64 / SCALE as f64
}

/// One patient's model input in fixed-point, in `FEATURE_COLUMNS` order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureVector(pub [i64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn zeros() -> Self {
        Self([0; FEATURE_COUNT])
    }

    pub fn get(&self, feature: Feature) -> i64 {
        self.0[feature.index()]
    }

    pub fn set(&mut self, feature: Feature, value: i64) {
        self.0[feature.index()] = value;
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_order_matches_columns() {
        for (i, feature) in Feature::ALL.iter().enumerate() {
            assert_eq!(feature.index(), i);
        }
        assert_eq!(Feature::GammaGtp.column(), "gamma_GTP");
        assert_eq!(Feature::Drinking.column(), "DRK_YN");
        assert_eq!(Feature::Smoking.column(), "SMK_stat_type_cd");
    }

    #[test]
    fn test_columns_match() {
        assert!(columns_match(&schema_columns()));

        let mut swapped = schema_columns();
        swapped.swap(0, 1);
        assert!(!columns_match(&swapped));

        let short: Vec<String> = schema_columns().into_iter().take(14).collect();
        assert!(!columns_match(&short));
    }

    #[test]
    fn test_fixed_point_conversion() {
        assert_eq!(to_fixed(15.3), 15_300_000);
        assert_eq!(to_fixed(-0.5), -500_000);
        assert_eq!(to_fixed(0.0000004), 0);
        assert_eq!(from_fixed(2_500_000), 2.5);
    }

    #[test]
    fn test_feature_vector_access() {
        let mut v = FeatureVector::zeros();
        v.set(Feature::Alt, 45 * SCALE);
        assert_eq!(v.get(Feature::Alt), 45 * SCALE);
        assert_eq!(v.as_slice()[Feature::Alt.index()], 45 * SCALE);
    }
}
