//! Line-oriented patient form
//!
//! Each field prompts with its accepted range and default. An empty answer
//! takes the default; an unparsable or out-of-range answer is reported and
//! the field is asked again.

use healthguard_core::{PatientRecord, Sex, SmokingStatus};
use std::io::{BufRead, Write};

use crate::errors::ServiceError;

/// Bounded numeric field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericField {
    pub name: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl NumericField {
    const fn new(
        name: &'static str,
        label: &'static str,
        min: f64,
        max: f64,
        default: f64,
    ) -> Self {
        Self {
            name,
            label,
            min,
            max,
            default,
        }
    }

    pub fn parse(&self, input: &str) -> Result<f64, String> {
        let value: f64 = input
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a number", input.trim()))?;
        self.check(value)
    }

    pub fn check(&self, value: f64) -> Result<f64, String> {
        if value.is_finite() && value >= self.min && value <= self.max {
            Ok(value)
        } else {
            Err(format!(
                "{} must be between {} and {}",
                self.label, self.min, self.max
            ))
        }
    }
}

/// Field with a fixed set of named options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChoiceField<T: 'static> {
    pub name: &'static str,
    pub label: &'static str,
    pub options: &'static [(&'static str, T)],
    pub default: T,
}

impl<T: Copy + PartialEq> ChoiceField<T> {
    /// Accepts an option name, case-insensitive. Numbers are rejected so
    /// dataset codes cannot be mistaken for menu positions.
    pub fn parse(&self, input: &str) -> Result<T, String> {
        let answer = input.trim();
        self.options
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(answer))
            .map(|(_, value)| *value)
            .ok_or_else(|| format!("{} must be one of: {}", self.label, self.option_names()))
    }

    pub fn option_names(&self) -> String {
        self.options
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn default_name(&self) -> &'static str {
        self.options
            .iter()
            .find(|(_, value)| *value == self.default)
            .map(|(name, _)| *name)
            .unwrap_or("")
    }
}

pub const AGE: NumericField = NumericField::new("age", "Age (years)", 18.0, 90.0, 40.0);
pub const WEIGHT: NumericField = NumericField::new("weight", "Weight (kg)", 40.0, 150.0, 75.0);
pub const WAISTLINE: NumericField =
    NumericField::new("waistline", "Waistline (cm)", 50.0, 150.0, 85.0);
pub const SYSTOLIC_BP: NumericField =
    NumericField::new("sbp", "Systolic pressure (SBP)", 80.0, 200.0, 120.0);
pub const DIASTOLIC_BP: NumericField =
    NumericField::new("dbp", "Diastolic pressure (DBP)", 50.0, 120.0, 80.0);
pub const TOTAL_CHOLESTEROL: NumericField =
    NumericField::new("cholesterol", "Total cholesterol", 100.0, 400.0, 190.0);
pub const LDL_CHOLESTEROL: NumericField =
    NumericField::new("ldl", "LDL cholesterol", 50.0, 300.0, 110.0);
pub const TRIGLYCERIDE: NumericField =
    NumericField::new("triglyceride", "Triglycerides", 50.0, 500.0, 130.0);
pub const HEMOGLOBIN: NumericField =
    NumericField::new("hemoglobin", "Hemoglobin", 10.0, 20.0, 15.0);
pub const GAMMA_GTP: NumericField =
    NumericField::new("gamma_gtp", "Gamma-GTP", 10.0, 500.0, 40.0);
pub const ALT: NumericField = NumericField::new("alt", "ALT (SGOT_ALT)", 10.0, 500.0, 30.0);
pub const AST: NumericField = NumericField::new("ast", "AST (SGOT_AST)", 10.0, 500.0, 30.0);

pub const SEX: ChoiceField<Sex> = ChoiceField {
    name: "sex",
    label: "Sex",
    options: &[("male", Sex::Male), ("female", Sex::Female)],
    default: Sex::Male,
};

pub const SMOKING: ChoiceField<SmokingStatus> = ChoiceField {
    name: "smoking",
    label: "Smoking status",
    options: &[
        ("never", SmokingStatus::Never),
        ("former", SmokingStatus::Former),
        ("current", SmokingStatus::Current),
    ],
    default: SmokingStatus::Never,
};

pub const DRINKS: ChoiceField<bool> = ChoiceField {
    name: "drinks",
    label: "Drinks alcohol",
    options: &[("no", false), ("yes", true)],
    default: false,
};

/// Record with every field at its form default
pub fn default_record() -> PatientRecord {
    PatientRecord {
        age: AGE.default,
        sex: SEX.default,
        weight: WEIGHT.default,
        waistline: WAISTLINE.default,
        systolic_bp: SYSTOLIC_BP.default,
        diastolic_bp: DIASTOLIC_BP.default,
        total_cholesterol: TOTAL_CHOLESTEROL.default,
        ldl_cholesterol: LDL_CHOLESTEROL.default,
        triglyceride: TRIGLYCERIDE.default,
        hemoglobin: HEMOGLOBIN.default,
        gamma_gtp: GAMMA_GTP.default,
        alt: ALT.default,
        ast: AST.default,
        smoking: SMOKING.default,
        drinks: DRINKS.default,
    }
}

pub struct PatientForm<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> PatientForm<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Ask every field once and build the record.
    pub fn collect(reader: R, writer: W) -> Result<PatientRecord, ServiceError> {
        Self::new(reader, writer).run()
    }

    pub fn run(&mut self) -> Result<PatientRecord, ServiceError> {
        writeln!(self.writer, "Demographics and habits")?;
        let age = self.ask_number(&AGE)?;
        let sex = self.ask_choice(&SEX)?;
        let weight = self.ask_number(&WEIGHT)?;
        let waistline = self.ask_number(&WAISTLINE)?;
        let smoking = self.ask_choice(&SMOKING)?;
        let drinks = self.ask_choice(&DRINKS)?;

        writeln!(self.writer, "Vital signs and blood markers")?;
        let systolic_bp = self.ask_number(&SYSTOLIC_BP)?;
        let diastolic_bp = self.ask_number(&DIASTOLIC_BP)?;
        let total_cholesterol = self.ask_number(&TOTAL_CHOLESTEROL)?;
        let ldl_cholesterol = self.ask_number(&LDL_CHOLESTEROL)?;
        let triglyceride = self.ask_number(&TRIGLYCERIDE)?;
        let hemoglobin = self.ask_number(&HEMOGLOBIN)?;

        writeln!(self.writer, "Liver enzymes")?;
        let gamma_gtp = self.ask_number(&GAMMA_GTP)?;
        let alt = self.ask_number(&ALT)?;
        let ast = self.ask_number(&AST)?;

        Ok(PatientRecord {
            age,
            sex,
            weight,
            waistline,
            systolic_bp,
            diastolic_bp,
            total_cholesterol,
            ldl_cholesterol,
            triglyceride,
            hemoglobin,
            gamma_gtp,
            alt,
            ast,
            smoking,
            drinks,
        })
    }

    fn ask_number(&mut self, field: &NumericField) -> Result<f64, ServiceError> {
        let prompt = format!(
            "{} [{}-{}] ({})",
            field.label, field.min, field.max, field.default
        );
        loop {
            let answer = self.prompt(&prompt, field.name)?;
            if answer.is_empty() {
                return Ok(field.default);
            }
            match field.parse(&answer) {
                Ok(value) => return Ok(value),
                Err(msg) => writeln!(self.writer, "  {}", msg)?,
            }
        }
    }

    fn ask_choice<T: Copy + PartialEq>(
        &mut self,
        field: &ChoiceField<T>,
    ) -> Result<T, ServiceError> {
        let prompt = format!(
            "{} [{}] ({})",
            field.label,
            field.option_names(),
            field.default_name()
        );
        loop {
            let answer = self.prompt(&prompt, field.name)?;
            if answer.is_empty() {
                return Ok(field.default);
            }
            match field.parse(&answer) {
                Ok(value) => return Ok(value),
                Err(msg) => writeln!(self.writer, "  {}", msg)?,
            }
        }
    }

    fn prompt(&mut self, text: &str, name: &'static str) -> Result<String, ServiceError> {
        write!(self.writer, "{}: ", text)?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(ServiceError::InputClosed(name));
        }
        Ok(line.trim().to_string())
    }
}
