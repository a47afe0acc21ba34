//! HealthGuard Trainer - Deterministic offline random forest trainer
//!
//! Derives the risk label from the raw clinical dataset, splits it with a
//! stratified seeded partition, fits the scaler on the training rows only,
//! trains a balanced random forest and evaluates it on the held-out rows.

pub mod cart;
pub mod dataset;
pub mod deterministic;
pub mod errors;
pub mod metrics;
pub mod split;
pub mod trainer;

use healthguard_core::{FeatureVector, FittedArtifacts, RiskLabel, StandardScaler};
use std::path::Path;
use tracing::info;

pub use dataset::{Dataset, LabelDistribution};
pub use deterministic::{LcgRng, SplitTieBreaker};
pub use errors::TrainerError;
pub use metrics::{ClassMetrics, ClassificationReport, ConfusionMatrix};
pub use split::{stratified_split, SplitIndices};
pub use trainer::{ForestTrainer, TrainingParams};

/// Everything a training run produces
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub artifacts: FittedArtifacts,
    pub distribution: LabelDistribution,
    pub confusion: ConfusionMatrix,
    pub report: ClassificationReport,
    /// Unscaled held-out rows, for checks against reloaded artifacts
    pub test_features: Vec<FeatureVector>,
    pub test_labels: Vec<RiskLabel>,
    pub train_len: usize,
}

/// Train a scaler/forest pair directly from a CSV file.
pub fn train_from_csv(
    path: &Path,
    params: &TrainingParams,
) -> Result<TrainingOutcome, TrainerError> {
    if !path.exists() {
        return Err(TrainerError::DatasetMissing(path.to_path_buf()));
    }

    let dataset =
        Dataset::from_csv(path).map_err(|err| TrainerError::Dataset(format!("{:#}", err)))?;
    info!("Loaded {} patients from {}", dataset.len(), path.display());

    train_dataset(&dataset, params)
}

/// Split, scale, fit and evaluate an already-labeled dataset.
pub fn train_dataset(
    dataset: &Dataset,
    params: &TrainingParams,
) -> Result<TrainingOutcome, TrainerError> {
    params.validate()?;

    let distribution = dataset.label_distribution();
    info!(
        "Risk distribution: low={} ({:.4}) alert={} ({:.4})",
        distribution.count(RiskLabel::Low),
        distribution.fraction(RiskLabel::Low),
        distribution.count(RiskLabel::Alert),
        distribution.fraction(RiskLabel::Alert)
    );

    let features = dataset.features();
    let split = stratified_split(&dataset.labels, params.test_ratio, params.seed)?;
    info!("Split: {} train / {} test", split.train.len(), split.test.len());

    let pick = |idx: &[usize]| -> (Vec<FeatureVector>, Vec<RiskLabel>) {
        idx.iter().map(|&i| (features[i], dataset.labels[i])).unzip()
    };
    let (train_x, train_y) = pick(&split.train);
    let (test_x, test_y) = pick(&split.test);

    let scaler = StandardScaler::fit(&train_x)?;
    let train_scaled = scaler.transform_all(&train_x);
    let test_scaled = scaler.transform_all(&test_x);

    info!(
        "Training forest: {} trees, max depth {}, {} features per split, seed {}",
        params.num_trees,
        params.max_depth,
        params.effective_max_features(),
        params.seed
    );
    let model = ForestTrainer::new(params.clone()).train(&train_scaled, &train_y)?;

    let (nodes, leaves, depth) = trainer::forest_summary(&model.trees);
    info!("Forest: {} nodes, {} leaves, max depth {}", nodes, leaves, depth);

    let predicted = model.predict_all(&test_scaled);
    let confusion = ConfusionMatrix::from_predictions(&test_y, &predicted);
    let report = ClassificationReport::from_confusion(&confusion);

    Ok(TrainingOutcome {
        artifacts: FittedArtifacts { scaler, model },
        distribution,
        confusion,
        report,
        test_features: test_x,
        test_labels: test_y,
        train_len: split.train.len(),
    })
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
