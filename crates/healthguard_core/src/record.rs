//! Patient record and categorical encodings
//!
//! Encodings match the training dataset: sex `Male -> 0, Female -> 1`,
//! drinking `N -> 0, Y -> 1`, smoking kept as its ordinal code `1..=3`.

use serde::{Deserialize, Serialize};

use crate::errors::RecordError;
use crate::schema::{to_fixed, Feature, FeatureVector, SCALE};

/// Biological sex as recorded in the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn code(self) -> i64 {
        match self {
            Sex::Male => 0,
            Sex::Female => 1,
        }
    }

    /// Parse the dataset's textual value
    pub fn from_label(label: &str) -> Result<Self, RecordError> {
        match label.trim() {
            "Male" => Ok(Sex::Male),
            "Female" => Ok(Sex::Female),
            other => Err(RecordError::UnknownSex(other.to_string())),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

/// Smoking status ordinal (`SMK_stat_type_cd`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SmokingStatus {
    Never,
    Former,
    Current,
}

impl SmokingStatus {
    pub fn code(self) -> i64 {
        match self {
            SmokingStatus::Never => 1,
            SmokingStatus::Former => 2,
            SmokingStatus::Current => 3,
        }
    }

    pub fn from_code(code: i64) -> Result<Self, RecordError> {
        match code {
            1 => Ok(SmokingStatus::Never),
            2 => Ok(SmokingStatus::Former),
            3 => Ok(SmokingStatus::Current),
            other => Err(RecordError::UnknownSmokingCode(other)),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SmokingStatus::Never => "never smoked",
            SmokingStatus::Former => "former smoker",
            SmokingStatus::Current => "current smoker",
        }
    }
}

/// Encode the drinking flag
pub fn drinking_code(drinks: bool) -> i64 {
    if drinks {
        1
    } else {
        0
    }
}

/// Parse the dataset's `DRK_YN` value
pub fn parse_drinking(flag: &str) -> Result<bool, RecordError> {
    match flag.trim() {
        "Y" => Ok(true),
        "N" => Ok(false),
        other => Err(RecordError::UnknownDrinkingFlag(other.to_string())),
    }
}

/// One patient's demographic, vital-sign and blood-marker inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Age in years
    pub age: f64,
    pub sex: Sex,
    /// Weight in kg
    pub weight: f64,
    /// Waist circumference in cm
    pub waistline: f64,
    /// Systolic blood pressure (mmHg)
    pub systolic_bp: f64,
    /// Diastolic blood pressure (mmHg)
    pub diastolic_bp: f64,
    pub total_cholesterol: f64,
    pub ldl_cholesterol: f64,
    pub triglyceride: f64,
    pub hemoglobin: f64,
    pub gamma_gtp: f64,
    /// SGOT_ALT
    pub alt: f64,
    /// SGOT_AST
    pub ast: f64,
    pub smoking: SmokingStatus,
    pub drinks: bool,
}

impl PatientRecord {
    /// Build the model input vector in schema order.
    pub fn features(&self) -> FeatureVector {
        let mut v = FeatureVector::zeros();
        v.set(Feature::Age, to_fixed(self.age));
        v.set(Feature::Sex, self.sex.code() * SCALE);
        v.set(Feature::Weight, to_fixed(self.weight));
        v.set(Feature::Waistline, to_fixed(self.waistline));
        v.set(Feature::SystolicBp, to_fixed(self.systolic_bp));
        v.set(Feature::DiastolicBp, to_fixed(self.diastolic_bp));
        v.set(Feature::TotalCholesterol, to_fixed(self.total_cholesterol));
        v.set(Feature::LdlCholesterol, to_fixed(self.ldl_cholesterol));
        v.set(Feature::Triglyceride, to_fixed(self.triglyceride));
        v.set(Feature::Hemoglobin, to_fixed(self.hemoglobin));
        v.set(Feature::GammaGtp, to_fixed(self.gamma_gtp));
        v.set(Feature::Alt, to_fixed(self.alt));
        v.set(Feature::Ast, to_fixed(self.ast));
        v.set(Feature::Smoking, self.smoking.code() * SCALE);
        v.set(Feature::Drinking, drinking_code(self.drinks) * SCALE);
        v
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sex_encoding() {
        assert_eq!(Sex::from_label("Male").unwrap().code(), 0);
        assert_eq!(Sex::from_label("Female").unwrap().code(), 1);
        assert!(Sex::from_label("male").is_err());
        assert_eq!(
            Sex::from_label("1"),
            Err(RecordError::UnknownSex("1".to_string()))
        );
    }

    #[test]
    fn test_drinking_encoding() {
        assert_eq!(drinking_code(parse_drinking("Y").unwrap()), 1);
        assert_eq!(drinking_code(parse_drinking("N").unwrap()), 0);
        assert_eq!(
            parse_drinking("yes"),
            Err(RecordError::UnknownDrinkingFlag("yes".to_string()))
        );
    }

    #[test]
    fn test_smoking_codes() {
        for code in 1..=3 {
            assert_eq!(SmokingStatus::from_code(code).unwrap().code(), code);
        }
        assert!(SmokingStatus::from_code(0).is_err());
        assert!(SmokingStatus::from_code(4).is_err());
    }

    #[test]
    fn test_features_in_schema_order() {
        let mut record = fixtures::baseline();
        record.sex = Sex::Female;
        record.drinks = true;
        record.smoking = SmokingStatus::Current;
        record.hemoglobin = 13.7;

        let v = record.features();
        assert_eq!(v.0[0], 40 * SCALE);
        assert_eq!(v.0[1], SCALE);
        assert_eq!(v.0[4], 120 * SCALE);
        assert_eq!(v.0[9], 13_700_000);
        assert_eq!(v.0[10], 40 * SCALE);
        assert_eq!(v.0[13], 3 * SCALE);
        assert_eq!(v.0[14], SCALE);
    }

    proptest! {
        #[test]
        fn sex_encoding_is_a_bijection(female in any::<bool>()) {
            let sex = if female { Sex::Female } else { Sex::Male };
            prop_assert_eq!(sex.code(), i64::from(female));
            prop_assert_eq!(Sex::from_label(sex.label()).unwrap(), sex);
        }

        #[test]
        fn drinking_encoding_is_a_bijection(drinks in any::<bool>()) {
            let flag = if drinks { "Y" } else { "N" };
            prop_assert_eq!(parse_drinking(flag).unwrap(), drinks);
            prop_assert_eq!(drinking_code(drinks), i64::from(drinks));
        }
    }
}
