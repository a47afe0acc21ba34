//! Random forest classifier with deterministic inference
//!
//! The alert probability is the integer mean of the per-tree leaf
//! probabilities; the verdict is `Alert` when that probability is strictly
//! above one half.

use serde::{Deserialize, Serialize};

use super::tree::Tree;
use crate::errors::ArtifactError;
use crate::rules::RiskLabel;
use crate::schema::{columns_match, FeatureVector, FEATURE_COLUMNS, SCALE};
use crate::serde_canon::{hash_canonical_hex, to_canonical_json};

/// Model format version
pub const FORMAT_VERSION: i32 = 1;

/// Training provenance stored with the model
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForestMetadata {
    /// Unix timestamp (seconds) of the training run
    pub created_at: u64,
    pub seed: u64,
    pub max_depth: usize,
    pub max_features: usize,
    pub train_samples: usize,
    /// Balanced class weights used during fit (fixed-point, index = label)
    pub class_weights: [i64; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RandomForest {
    pub version: i32,

    /// Fixed-point scale of thresholds and leaf values
    pub scale: i64,

    /// Column order the trees were fit against
    pub columns: Vec<String>,

    pub trees: Vec<Tree>,

    pub metadata: ForestMetadata,
}

impl RandomForest {
    pub fn new(columns: Vec<String>, trees: Vec<Tree>, metadata: ForestMetadata) -> Self {
        Self {
            version: FORMAT_VERSION,
            scale: SCALE,
            columns,
            trees,
            metadata,
        }
    }

    /// Validate model structure
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.version != FORMAT_VERSION {
            return Err(ArtifactError::Validation(format!(
                "Unsupported model version: {}",
                self.version
            )));
        }

        if self.scale != SCALE {
            return Err(ArtifactError::Validation(format!(
                "Unsupported scale: {} (expected {})",
                self.scale, SCALE
            )));
        }

        if !columns_match(&self.columns) {
            return Err(ArtifactError::SchemaMismatch {
                expected: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
                found: self.columns.clone(),
            });
        }

        if self.trees.is_empty() {
            return Err(ArtifactError::Validation("Model has no trees".to_string()));
        }

        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate().map_err(|e| {
                ArtifactError::Validation(format!("Tree {} validation failed: {}", i, e))
            })?;
        }

        Ok(())
    }

    /// Probability of `Alert` for a scaled feature vector (fixed-point)
    pub fn predict_proba(&self, features: &FeatureVector) -> i64 {
        if self.trees.is_empty() {
            return 0;
        }

        let sum: i128 = self
            .trees
            .iter()
            .map(|t| t.evaluate(features.as_slice()) as i128)
            .sum();

        (sum / self.trees.len() as i128) as i64
    }

    /// Hard verdict for a scaled feature vector
    pub fn predict(&self, features: &FeatureVector) -> RiskLabel {
        label_for_probability(self.predict_proba(features))
    }

    pub fn predict_all(&self, rows: &[FeatureVector]) -> Vec<RiskLabel> {
        rows.iter().map(|r| self.predict(r)).collect()
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn to_canonical_json(&self) -> Result<String, ArtifactError> {
        Ok(to_canonical_json(self)?)
    }

    pub fn hash_hex(&self) -> Result<String, ArtifactError> {
        Ok(hash_canonical_hex(self)?)
    }
}

/// Alert iff `p(alert) > p(low)`; an exact tie resolves to `Low`.
pub fn label_for_probability(alert_probability: i64) -> RiskLabel {
    RiskLabel::from_alert(alert_probability * 2 > SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::tree::Node;
    use crate::schema::schema_columns;

    fn forest() -> RandomForest {
        let t1 = Tree::new(vec![
            Node::internal(0, 10, 0, 1, 2),
            Node::leaf(1, 200_000),
            Node::leaf(2, 800_000),
        ]);
        let t2 = Tree::new(vec![
            Node::internal(0, 11, 0, 1, 2),
            Node::leaf(1, 0),
            Node::leaf(2, SCALE),
        ]);
        RandomForest::new(schema_columns(), vec![t1, t2], ForestMetadata::default())
    }

    fn input(gtp: i64, alt: i64) -> FeatureVector {
        let mut v = FeatureVector::zeros();
        v.0[10] = gtp;
        v.0[11] = alt;
        v
    }

    #[test]
    fn test_probability_is_tree_mean() {
        let model = forest();
        assert_eq!(model.predict_proba(&input(-1, -1)), 100_000);
        assert_eq!(model.predict_proba(&input(1, -1)), 400_000);
        assert_eq!(model.predict_proba(&input(-1, 1)), 600_000);
        assert_eq!(model.predict_proba(&input(1, 1)), 900_000);
    }

    #[test]
    fn test_verdict_threshold() {
        let model = forest();
        assert_eq!(model.predict(&input(1, -1)), RiskLabel::Low);
        assert_eq!(model.predict(&input(-1, 1)), RiskLabel::Alert);
        assert_eq!(label_for_probability(SCALE / 2), RiskLabel::Low);
        assert_eq!(label_for_probability(SCALE / 2 + 1), RiskLabel::Alert);
    }

    #[test]
    fn test_validation() {
        assert!(forest().validate().is_ok());

        let mut bad = forest();
        bad.version = 7;
        assert!(bad.validate().is_err());

        let mut reordered = forest();
        reordered.columns.reverse();
        assert!(matches!(
            reordered.validate(),
            Err(ArtifactError::SchemaMismatch { .. })
        ));

        let mut empty = forest();
        empty.trees.clear();
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_hash_changes_with_model() {
        let a = forest();
        let mut b = forest();
        b.trees[0].nodes[1].leaf = Some(300_000);

        assert_eq!(a.hash_hex().unwrap(), forest().hash_hex().unwrap());
        assert_ne!(a.hash_hex().unwrap(), b.hash_hex().unwrap());
    }
}
