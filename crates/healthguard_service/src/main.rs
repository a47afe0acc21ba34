//! HealthGuard CLI
//!
//! Scores one patient against the trained scaler/model pair.

use anyhow::{Context, Result};
use clap::Parser;
use healthguard_core::artifacts::DEFAULT_ARTIFACT_DIR;
use healthguard_core::{ArtifactPaths, PatientRecord, Sex, SmokingStatus};
use healthguard_service::form::{self, ChoiceField, NumericField};
use healthguard_service::{render_assessment, PatientForm, RiskService};
use std::io;
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

fn numeric(
    field: &'static NumericField,
) -> impl Fn(&str) -> Result<f64, String> + Clone + Send + Sync + 'static {
    move |input| field.parse(input)
}

fn choice<T>(
    field: &'static ChoiceField<T>,
) -> impl Fn(&str) -> Result<T, String> + Clone + Send + Sync + 'static
where
    T: Copy + PartialEq + Send + Sync + 'static,
{
    move |input| field.parse(input)
}

#[derive(Parser, Debug)]
#[command(name = "healthguard")]
#[command(author = "HealthGuard Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Hepatic and cardiovascular risk flag for a single patient", long_about = None)]
struct Args {
    /// Directory holding scaler.json and model.json
    #[arg(short, long, default_value = DEFAULT_ARTIFACT_DIR)]
    artifacts: PathBuf,

    /// Ask for every field on the terminal instead of reading flags
    #[arg(short, long)]
    interactive: bool,

    /// Print the assessment as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[arg(long, value_parser = numeric(&form::AGE), default_value_t = form::AGE.default)]
    age: f64,

    /// male or female
    #[arg(long, value_parser = choice(&form::SEX), default_value = "male")]
    sex: Sex,

    #[arg(long, value_parser = numeric(&form::WEIGHT), default_value_t = form::WEIGHT.default)]
    weight: f64,

    #[arg(
        long,
        value_parser = numeric(&form::WAISTLINE),
        default_value_t = form::WAISTLINE.default
    )]
    waistline: f64,

    /// never, former or current
    #[arg(long, value_parser = choice(&form::SMOKING), default_value = "never")]
    smoking: SmokingStatus,

    /// no or yes
    #[arg(
        long,
        value_parser = choice(&form::DRINKS),
        default_value = "no",
        action = clap::ArgAction::Set
    )]
    drinks: bool,

    #[arg(
        long,
        value_parser = numeric(&form::SYSTOLIC_BP),
        default_value_t = form::SYSTOLIC_BP.default
    )]
    sbp: f64,

    #[arg(
        long,
        value_parser = numeric(&form::DIASTOLIC_BP),
        default_value_t = form::DIASTOLIC_BP.default
    )]
    dbp: f64,

    #[arg(
        long,
        value_parser = numeric(&form::TOTAL_CHOLESTEROL),
        default_value_t = form::TOTAL_CHOLESTEROL.default
    )]
    cholesterol: f64,

    #[arg(
        long,
        value_parser = numeric(&form::LDL_CHOLESTEROL),
        default_value_t = form::LDL_CHOLESTEROL.default
    )]
    ldl: f64,

    #[arg(
        long,
        value_parser = numeric(&form::TRIGLYCERIDE),
        default_value_t = form::TRIGLYCERIDE.default
    )]
    triglyceride: f64,

    #[arg(
        long,
        value_parser = numeric(&form::HEMOGLOBIN),
        default_value_t = form::HEMOGLOBIN.default
    )]
    hemoglobin: f64,

    #[arg(
        long,
        value_parser = numeric(&form::GAMMA_GTP),
        default_value_t = form::GAMMA_GTP.default
    )]
    gamma_gtp: f64,

    #[arg(long, value_parser = numeric(&form::ALT), default_value_t = form::ALT.default)]
    alt: f64,

    #[arg(long, value_parser = numeric(&form::AST), default_value_t = form::AST.default)]
    ast: f64,
}

impl Args {
    fn record(&self) -> PatientRecord {
        PatientRecord {
            age: self.age,
            sex: self.sex,
            weight: self.weight,
            waistline: self.waistline,
            systolic_bp: self.sbp,
            diastolic_bp: self.dbp,
            total_cholesterol: self.cholesterol,
            ldl_cholesterol: self.ldl,
            triglyceride: self.triglyceride,
            hemoglobin: self.hemoglobin,
            gamma_gtp: self.gamma_gtp,
            alt: self.alt,
            ast: self.ast,
            smoking: self.smoking,
            drinks: self.drinks,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging; stdout is reserved for the assessment
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("HealthGuard v{}", env!("CARGO_PKG_VERSION"));

    let paths = ArtifactPaths::in_dir(&args.artifacts);
    let service = match RiskService::load(&paths) {
        Ok(service) => service,
        Err(err) => {
            error!("{}", err);
            error!(
                "Model files not found or unreadable in '{}'. Run healthguard-train first.",
                args.artifacts.display()
            );
            std::process::exit(1);
        }
    };

    let record = if args.interactive {
        PatientForm::collect(io::stdin().lock(), io::stdout())
            .context("Failed to read the patient form")?
    } else {
        args.record()
    };

    let assessment = service.assess(&record);

    if args.json {
        let json =
            serde_json::to_string_pretty(&assessment).context("Failed to encode assessment")?;
        println!("{}", json);
    } else {
        println!();
        print!("{}", render_assessment(&assessment));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_form() {
        let args = Args::try_parse_from(["healthguard"]).unwrap();
        assert_eq!(args.record(), form::default_record());
    }

    #[test]
    fn test_flags_fill_record() {
        let args = Args::try_parse_from([
            "healthguard",
            "--sex",
            "female",
            "--drinks",
            "yes",
            "--smoking",
            "current",
            "--gamma-gtp",
            "80",
        ])
        .unwrap();
        let record = args.record();
        assert_eq!(record.sex, Sex::Female);
        assert!(record.drinks);
        assert_eq!(record.smoking, SmokingStatus::Current);
        assert_eq!(record.gamma_gtp, 80.0);
    }

    #[test]
    fn test_numeric_codes_rejected_for_choices() {
        for (flag, code) in [("--sex", "1"), ("--drinks", "1"), ("--smoking", "3")] {
            assert!(
                Args::try_parse_from(["healthguard", flag, code]).is_err(),
                "{} {} was accepted",
                flag,
                code
            );
        }
    }

    #[test]
    fn test_out_of_range_flag_rejected() {
        assert!(Args::try_parse_from(["healthguard", "--age", "17"]).is_err());
        assert!(Args::try_parse_from(["healthguard", "--hemoglobin", "20.5"]).is_err());
    }
}
