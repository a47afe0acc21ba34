//! Random forest trainer
//!
//! Bagged CART classifiers with balanced class weights. Every tree draws its
//! bootstrap sample and feature subsets from its own seed, derived from the
//! run seed and the tree index.

use healthguard_core::forest::{ForestMetadata, RandomForest, Tree};
use healthguard_core::schema::{schema_columns, FeatureVector, FEATURE_COUNT, SCALE};
use healthguard_core::{FitError, RiskLabel};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cart::{default_max_features, CartBuilder, TreeConfig};
use crate::deterministic::{tree_seed, LcgRng};
use crate::errors::TrainerError;

/// Forest training configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingParams {
    pub num_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features examined per split; `None` means `floor(sqrt(15))`
    pub max_features: Option<usize>,
    /// Reweight classes by `n / (2 * n_class)`
    pub balanced_class_weight: bool,
    pub seed: u64,
    /// Held-out share of the dataset
    pub test_ratio: f64,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            num_trees: 100,
            max_depth: 15,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            balanced_class_weight: true,
            seed: 42,
            test_ratio: 0.2,
        }
    }
}

impl TrainingParams {
    /// Load parameters from a TOML file; absent keys keep their defaults.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, TrainerError> {
        let path = path.as_ref();
        tracing::info!("Loading training configuration from: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| {
            TrainerError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let params: TrainingParams = toml::from_str(&content)
            .map_err(|e| TrainerError::Config(format!("Failed to parse config: {}", e)))?;

        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), TrainerError> {
        if self.num_trees == 0 {
            return Err(TrainerError::Config("num_trees must be at least 1".to_string()));
        }
        if self.max_depth == 0 {
            return Err(TrainerError::Config("max_depth must be at least 1".to_string()));
        }
        if self.min_samples_split < 2 {
            return Err(TrainerError::Config("min_samples_split must be at least 2".to_string()));
        }
        if self.min_samples_leaf == 0 {
            return Err(TrainerError::Config("min_samples_leaf must be at least 1".to_string()));
        }
        if let Some(k) = self.max_features {
            if k == 0 || k > FEATURE_COUNT {
                return Err(TrainerError::Config(format!(
                    "max_features must be in 1..={}, got {}",
                    FEATURE_COUNT, k
                )));
            }
        }
        if !(self.test_ratio > 0.0 && self.test_ratio < 1.0) {
            return Err(TrainerError::Config(format!(
                "test_ratio must be in (0, 1), got {}",
                self.test_ratio
            )));
        }
        Ok(())
    }

    pub fn effective_max_features(&self) -> usize {
        self.max_features
            .unwrap_or_else(|| default_max_features(FEATURE_COUNT))
    }

    fn tree_config(&self) -> TreeConfig {
        TreeConfig {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            max_features: self.effective_max_features(),
        }
    }
}

/// Random forest trainer
pub struct ForestTrainer {
    params: TrainingParams,
}

impl ForestTrainer {
    pub fn new(params: TrainingParams) -> Self {
        Self { params }
    }

    /// Train on scaled features, stamping the current time
    pub fn train(
        &self,
        features: &[FeatureVector],
        labels: &[RiskLabel],
    ) -> Result<RandomForest, TrainerError> {
        self.train_at(features, labels, chrono::Utc::now().timestamp().max(0) as u64)
    }

    /// Train with an explicit `created_at`; output is a pure function of the inputs
    pub fn train_at(
        &self,
        features: &[FeatureVector],
        labels: &[RiskLabel],
        created_at: u64,
    ) -> Result<RandomForest, TrainerError> {
        self.params.validate()?;

        if features.is_empty() {
            return Err(FitError::EmptyInput.into());
        }
        if features.len() != labels.len() {
            return Err(FitError::LengthMismatch {
                features: features.len(),
                labels: labels.len(),
            }
            .into());
        }

        let class_weights = self.class_weights(labels);
        tracing::debug!(
            "Class weights: low={} alert={} (fixed-point)",
            class_weights[0],
            class_weights[1]
        );

        let config = self.params.tree_config();
        let mut trees = Vec::with_capacity(self.params.num_trees);

        for tree_idx in 0..self.params.num_trees {
            let mut rng = LcgRng::new(tree_seed(self.params.seed, tree_idx));
            let weights = bootstrap_weights(labels, &class_weights, &mut rng);

            let builder = CartBuilder::new(features, labels, &weights, config.clone());
            let tree = builder.build(&mut rng);

            tracing::debug!(
                "Tree {}/{}: {} nodes, depth {}",
                tree_idx + 1,
                self.params.num_trees,
                tree.nodes.len(),
                tree.depth()
            );
            if (tree_idx + 1) % 10 == 0 || tree_idx + 1 == self.params.num_trees {
                tracing::info!("Trained {}/{} trees", tree_idx + 1, self.params.num_trees);
            }

            trees.push(tree);
        }

        let metadata = ForestMetadata {
            created_at,
            seed: self.params.seed,
            max_depth: self.params.max_depth,
            max_features: config.max_features,
            train_samples: features.len(),
            class_weights,
        };

        Ok(RandomForest::new(schema_columns(), trees, metadata))
    }

    /// Fixed-point class weights, `n / (2 * n_c)` when balancing
    fn class_weights(&self, labels: &[RiskLabel]) -> [i64; 2] {
        if !self.params.balanced_class_weight {
            return [SCALE; 2];
        }

        let n = labels.len() as i128;
        let mut counts = [0i128; 2];
        for label in labels {
            counts[label.index()] += 1;
        }

        let mut weights = [SCALE; 2];
        for (w, &c) in weights.iter_mut().zip(counts.iter()) {
            if c > 0 {
                *w = (n * SCALE as i128 / (2 * c)) as i64;
            }
        }
        weights
    }
}

/// Bootstrap draw of `n` rows with replacement; weight = draws * class weight
fn bootstrap_weights(labels: &[RiskLabel], class_weights: &[i64; 2], rng: &mut LcgRng) -> Vec<i64> {
    let n = labels.len();
    let mut draws = vec![0i64; n];
    for _ in 0..n {
        draws[rng.next_index(n)] += 1;
    }

    draws
        .iter()
        .zip(labels)
        .map(|(&d, label)| d * class_weights[label.index()])
        .collect()
}

/// Summary of a trained forest for logs
pub fn forest_summary(trees: &[Tree]) -> (usize, usize, usize) {
    let nodes = trees.iter().map(|t| t.nodes.len()).sum();
    let leaves = trees.iter().map(Tree::leaf_count).sum();
    let depth = trees.iter().map(Tree::depth).max().unwrap_or(0);
    (nodes, leaves, depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthguard_core::Feature;

    fn create_simple_dataset() -> (Vec<FeatureVector>, Vec<RiskLabel>) {
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for i in 0..60 {
            let mut v = FeatureVector::zeros();
            v.set(Feature::GammaGtp, (i * 2) * SCALE);
            v.set(Feature::Age, (20 + i % 40) * SCALE);
            features.push(v);
            labels.push(RiskLabel::from_alert(i * 2 > 90));
        }
        (features, labels)
    }

    fn small_params() -> TrainingParams {
        TrainingParams {
            num_trees: 8,
            max_depth: 4,
            max_features: Some(FEATURE_COUNT),
            ..TrainingParams::default()
        }
    }

    #[test]
    fn test_defaults_match_reference_pipeline() {
        let params = TrainingParams::default();
        assert_eq!(params.num_trees, 100);
        assert_eq!(params.max_depth, 15);
        assert_eq!(params.seed, 42);
        assert!(params.balanced_class_weight);
        assert_eq!(params.effective_max_features(), 3);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_train_simple_model() -> Result<(), TrainerError> {
        let (features, labels) = create_simple_dataset();
        let model = ForestTrainer::new(small_params()).train(&features, &labels)?;

        assert_eq!(model.num_trees(), 8);
        assert!(model.validate().is_ok());
        assert_eq!(model.metadata.train_samples, 60);

        let predictions = model.predict_all(&features);
        let correct = predictions.iter().zip(&labels).filter(|(p, l)| p == l).count();
        assert!(correct >= 57, "only {} of 60 correct", correct);

        Ok(())
    }

    #[test]
    fn test_balanced_class_weights() {
        let labels: Vec<RiskLabel> = (0..100).map(|i| RiskLabel::from_alert(i < 20)).collect();
        let weights = ForestTrainer::new(TrainingParams::default()).class_weights(&labels);
        // 100 / (2 * 80) = 0.625, 100 / (2 * 20) = 2.5
        assert_eq!(weights, [625_000, 2_500_000]);

        let unweighted = ForestTrainer::new(TrainingParams {
            balanced_class_weight: false,
            ..TrainingParams::default()
        })
        .class_weights(&labels);
        assert_eq!(unweighted, [SCALE, SCALE]);
    }

    #[test]
    fn test_bootstrap_draws_n_rows() {
        let labels = vec![RiskLabel::Low; 50];
        let weights = bootstrap_weights(&labels, &[SCALE, SCALE], &mut LcgRng::new(5));
        assert_eq!(weights.iter().sum::<i64>(), 50 * SCALE);
        assert!(weights.iter().any(|&w| w == 0));
    }

    #[test]
    fn test_determinism() -> Result<(), TrainerError> {
        let (features, labels) = create_simple_dataset();
        let trainer = ForestTrainer::new(small_params());

        let m1 = trainer.train_at(&features, &labels, 0)?;
        let m2 = trainer.train_at(&features, &labels, 0)?;
        assert_eq!(m1, m2);

        let other = ForestTrainer::new(TrainingParams {
            seed: 7,
            ..small_params()
        })
        .train_at(&features, &labels, 0)?;
        assert_ne!(m1.trees, other.trees);

        Ok(())
    }

    #[test]
    fn test_rejects_mismatched_input() {
        let (features, labels) = create_simple_dataset();
        let trainer = ForestTrainer::new(small_params());
        assert!(matches!(
            trainer.train(&features, &labels[..10]),
            Err(TrainerError::Fit(FitError::LengthMismatch { .. }))
        ));
        assert!(matches!(
            trainer.train(&[], &[]),
            Err(TrainerError::Fit(FitError::EmptyInput))
        ));
    }

    #[test]
    fn test_invalid_params() {
        let params = TrainingParams {
            num_trees: 0,
            ..TrainingParams::default()
        };
        assert!(params.validate().is_err());

        let params = TrainingParams {
            max_features: Some(16),
            ..TrainingParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_params_from_toml() -> Result<(), Box<dyn std::error::Error>> {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "num_trees = 12")?;
        writeln!(file, "seed = 7")?;
        file.flush()?;

        let params = TrainingParams::from_toml_file(file.path())?;
        assert_eq!(params.num_trees, 12);
        assert_eq!(params.seed, 7);
        assert_eq!(params.max_depth, 15);

        Ok(())
    }

    #[test]
    fn test_forest_summary() -> Result<(), TrainerError> {
        let (features, labels) = create_simple_dataset();
        let model = ForestTrainer::new(small_params()).train_at(&features, &labels, 0)?;
        let (nodes, leaves, depth) = forest_summary(&model.trees);
        assert!(nodes >= leaves);
        assert!(depth <= 4);
        Ok(())
    }
}
