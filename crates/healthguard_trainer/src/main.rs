//! HealthGuard Trainer CLI
//!
//! Deterministic offline trainer producing the scaler/model artifact pair.

use anyhow::{Context, Result};
use clap::Parser;
use healthguard_core::artifacts::DEFAULT_ARTIFACT_DIR;
use healthguard_core::ArtifactPaths;
use healthguard_trainer::{train_from_csv, TrainerError, TrainingParams};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "healthguard-train")]
#[command(author = "HealthGuard Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Deterministic random forest trainer for HealthGuard risk flags",
    long_about = None
)]
struct Args {
    /// Input CSV dataset path (header row required)
    #[arg(short, long, default_value = "smoking_drinking_dataset.csv")]
    input: PathBuf,

    /// Output directory for scaler.json and model.json
    #[arg(short, long, default_value = DEFAULT_ARTIFACT_DIR)]
    output: PathBuf,

    /// TOML file with training parameters; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of trees
    #[arg(long)]
    trees: Option<usize>,

    /// Maximum tree depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Minimum samples required to split a node
    #[arg(long)]
    min_samples_split: Option<usize>,

    /// Minimum samples per leaf
    #[arg(long)]
    min_samples_leaf: Option<usize>,

    /// Features examined per split (default floor(sqrt(15)))
    #[arg(long)]
    max_features: Option<usize>,

    /// Held-out share of the dataset
    #[arg(long)]
    test_ratio: Option<f64>,

    /// Random seed for split, bootstrap and feature sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Disable balanced class weights
    #[arg(long)]
    unweighted: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn training_params(&self) -> Result<TrainingParams, TrainerError> {
        let mut params = match &self.config {
            Some(path) => TrainingParams::from_toml_file(path)?,
            None => TrainingParams::default(),
        };

        if let Some(trees) = self.trees {
            params.num_trees = trees;
        }
        if let Some(depth) = self.max_depth {
            params.max_depth = depth;
        }
        if let Some(split) = self.min_samples_split {
            params.min_samples_split = split;
        }
        if let Some(leaf) = self.min_samples_leaf {
            params.min_samples_leaf = leaf;
        }
        if self.max_features.is_some() {
            params.max_features = self.max_features;
        }
        if let Some(ratio) = self.test_ratio {
            params.test_ratio = ratio;
        }
        if let Some(seed) = self.seed {
            params.seed = seed;
        }
        if self.unweighted {
            params.balanced_class_weight = false;
        }

        params.validate()?;
        Ok(params)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("HealthGuard Trainer v{}", env!("CARGO_PKG_VERSION"));
    info!("═══════════════════════════════════════════");

    let params = args.training_params()?;
    info!("Training configuration:");
    info!("  Trees: {}", params.num_trees);
    info!("  Max depth: {}", params.max_depth);
    info!("  Min samples per leaf: {}", params.min_samples_leaf);
    info!("  Features per split: {}", params.effective_max_features());
    info!("  Balanced class weights: {}", params.balanced_class_weight);
    info!("  Test ratio: {}", params.test_ratio);
    info!("  Seed: {}", params.seed);

    info!("Loading dataset from: {}", args.input.display());
    let outcome = match train_from_csv(&args.input, &params) {
        Ok(outcome) => outcome,
        Err(TrainerError::DatasetMissing(path)) => {
            error!("Dataset file '{}' not found. Check the path.", path.display());
            std::process::exit(1);
        }
        Err(err) => return Err(err).context("Training failed"),
    };

    info!("═══════════════════════════════════════════");
    info!("Evaluation on {} held-out patients:", outcome.test_labels.len());
    println!("{}", outcome.report);
    println!("Confusion matrix:\n{}", outcome.confusion);

    let paths = ArtifactPaths::in_dir(&args.output);
    let (scaler_hash, model_hash) = outcome
        .artifacts
        .save(&paths)
        .context("Failed to save artifacts")?;

    info!("═══════════════════════════════════════════");
    info!("✓ Training completed successfully");
    info!("  Scaler: {} ({})", paths.scaler.display(), scaler_hash);
    info!("  Model: {} ({})", paths.model.display(), model_hash);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "num_trees = 12").unwrap();
        writeln!(file, "seed = 7").unwrap();
        file.flush().unwrap();
        file
    }

    fn params(extra: &[&str], config: &NamedTempFile) -> Result<TrainingParams, TrainerError> {
        let path = config.path().to_string_lossy().into_owned();
        let mut argv = vec!["healthguard-train", "--config", path.as_str()];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap().training_params()
    }

    #[test]
    fn test_config_values_survive_without_flags() {
        let config = config_file();
        let params = params(&[], &config).unwrap();
        assert_eq!(params.num_trees, 12);
        assert_eq!(params.seed, 7);
        assert_eq!(params.max_depth, 15);
        assert!(params.balanced_class_weight);
    }

    #[test]
    fn test_explicit_flags_override_config() {
        let config = config_file();
        let params = params(&["--trees", "5", "--unweighted"], &config).unwrap();
        assert_eq!(params.num_trees, 5);
        assert_eq!(params.seed, 7);
        assert!(!params.balanced_class_weight);
    }

    #[test]
    fn test_invalid_flag_value_rejected() {
        let config = config_file();
        assert!(matches!(
            params(&["--max-features", "16"], &config),
            Err(TrainerError::Config(_))
        ));
    }

    #[test]
    fn test_defaults_without_config() {
        let params = Args::try_parse_from(["healthguard-train"])
            .unwrap()
            .training_params()
            .unwrap();
        assert_eq!(params, TrainingParams::default());
    }
}
