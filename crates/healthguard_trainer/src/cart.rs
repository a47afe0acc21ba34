//! CART (Classification and Regression Tree) builder
//!
//! Weighted Gini classification trees with fixed-point arithmetic only.
//! Each node considers a seeded random subset of features; thresholds are
//! midpoints between consecutive distinct values.

use healthguard_core::forest::{Node, Tree};
use healthguard_core::schema::{FeatureVector, FEATURE_COUNT, SCALE};
use healthguard_core::RiskLabel;
use std::borrow::Borrow;

use crate::deterministic::{LcgRng, SplitTieBreaker};

/// Training parameters for a single tree
#[derive(Clone, Debug)]
pub struct TreeConfig {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Non-constant features examined per node
    pub max_features: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 15,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: default_max_features(FEATURE_COUNT),
        }
    }
}

/// `floor(sqrt(n))`, at least 1
pub fn default_max_features(n: usize) -> usize {
    let mut k = 1;
    while (k + 1) * (k + 1) <= n {
        k += 1;
    }
    k
}

/// Per-class weight sums at a node
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct ClassWeights {
    low: i128,
    alert: i128,
}

impl ClassWeights {
    fn add(&mut self, label: RiskLabel, weight: i64) {
        match label {
            RiskLabel::Low => self.low += weight as i128,
            RiskLabel::Alert => self.alert += weight as i128,
        }
    }

    fn minus(self, other: ClassWeights) -> ClassWeights {
        ClassWeights {
            low: self.low - other.low,
            alert: self.alert - other.alert,
        }
    }

    fn total(self) -> i128 {
        self.low + self.alert
    }

    fn is_pure(self) -> bool {
        self.low == 0 || self.alert == 0
    }

    /// `sum_c w_c^2 / W`; maximizing the children's sum minimizes weighted Gini
    fn purity(self) -> i128 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        (self.low * self.low + self.alert * self.alert) / total
    }

    /// Alert probability (fixed-point)
    fn alert_probability(self) -> i64 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        (self.alert * SCALE as i128 / total) as i64
    }
}

/// Split candidate with score and tie-breaker
#[derive(Debug, Clone)]
struct SplitCandidate {
    feature_idx: usize,
    threshold: i64,
    score: i128,
    tie_breaker: SplitTieBreaker,
}

impl SplitCandidate {
    fn beats(&self, other: &SplitCandidate) -> bool {
        self.score > other.score
            || (self.score == other.score && self.tie_breaker < other.tie_breaker)
    }
}

/// Build a classification tree over weighted samples
///
/// Samples with weight 0 are out of bag and never reach the tree.
pub struct CartBuilder<'a> {
    config: TreeConfig,
    features: &'a [FeatureVector],
    labels: &'a [RiskLabel],
    weights: &'a [i64],
}

impl<'a> CartBuilder<'a> {
    pub fn new(
        features: &'a [FeatureVector],
        labels: &'a [RiskLabel],
        weights: &'a [i64],
        config: TreeConfig,
    ) -> Self {
        debug_assert_eq!(features.len(), labels.len());
        debug_assert_eq!(features.len(), weights.len());

        Self {
            config,
            features,
            labels,
            weights,
        }
    }

    /// Build tree and return nodes
    pub fn build(&self, rng: &mut LcgRng) -> Tree {
        let mut nodes = Vec::new();
        let indices: Vec<usize> = (0..self.features.len())
            .filter(|&i| self.weights[i] > 0)
            .collect();

        self.build_node(&indices, 0, &mut nodes, 0, rng);

        Tree::new(nodes)
    }

    /// Recursively build tree nodes; returns the index of the new node
    fn build_node(
        &self,
        indices: &[usize],
        depth: usize,
        nodes: &mut Vec<Node>,
        node_id: usize,
        rng: &mut LcgRng,
    ) -> i32 {
        let current_idx = nodes.len() as i32;
        let stats = self.class_weights(indices);

        if depth >= self.config.max_depth
            || indices.len() < self.config.min_samples_split
            || indices.len() < 2 * self.config.min_samples_leaf
            || stats.is_pure()
        {
            nodes.push(Node::leaf(current_idx, stats.alert_probability()));
            return current_idx;
        }

        let split = match self.find_best_split(indices, node_id, rng) {
            Some(s) => s,
            None => {
                nodes.push(Node::leaf(current_idx, stats.alert_probability()));
                return current_idx;
            }
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| self.features[i].0[split.feature_idx] <= split.threshold);

        // Reserve the slot; children are pushed after it
        nodes.push(Node::internal(
            current_idx,
            split.feature_idx as i32,
            split.threshold,
            -1,
            -1,
        ));

        let left_idx = self.build_node(&left_indices, depth + 1, nodes, node_id * 2 + 1, rng);
        let right_idx = self.build_node(&right_indices, depth + 1, nodes, node_id * 2 + 2, rng);

        nodes[current_idx as usize].left = left_idx;
        nodes[current_idx as usize].right = right_idx;

        current_idx
    }

    /// Best split over a random feature subset
    ///
    /// Features are drawn in a seeded order; constant features do not count
    /// towards `max_features`, and drawing continues past `max_features`
    /// until some valid split exists.
    fn find_best_split(
        &self,
        indices: &[usize],
        node_id: usize,
        rng: &mut LcgRng,
    ) -> Option<SplitCandidate> {
        let mut order: Vec<usize> = (0..FEATURE_COUNT).collect();
        rng.shuffle(&mut order);

        let mut best: Option<SplitCandidate> = None;
        let mut visited = 0usize;

        for feature_idx in order {
            if visited >= self.config.max_features && best.is_some() {
                break;
            }

            let mut column: Vec<(i64, usize)> = indices
                .iter()
                .map(|&i| (self.features[i].0[feature_idx], i))
                .collect();
            column.sort_unstable();

            let (first, last) = match (column.first(), column.last()) {
                (Some(f), Some(l)) => (f.0, l.0),
                _ => continue,
            };
            if first == last {
                continue;
            }
            visited += 1;

            if let Some(candidate) = self.best_threshold(&column, feature_idx, node_id) {
                best = match best {
                    Some(current) if !candidate.beats(&current) => Some(current),
                    _ => Some(candidate),
                };
            }
        }

        best
    }

    /// Sweep sorted values, scoring every boundary between distinct values
    fn best_threshold(
        &self,
        column: &[(i64, usize)],
        feature_idx: usize,
        node_id: usize,
    ) -> Option<SplitCandidate> {
        let total = self.class_weights(column.iter().map(|&(_, i)| i));
        let n = column.len();
        let min_leaf = self.config.min_samples_leaf;

        let mut left = ClassWeights::default();
        let mut best: Option<SplitCandidate> = None;

        for pos in 0..n - 1 {
            let (value, idx) = column[pos];
            left.add(self.labels[idx], self.weights[idx]);

            let next_value = column[pos + 1].0;
            if value == next_value {
                continue;
            }

            let left_count = pos + 1;
            if left_count < min_leaf || n - left_count < min_leaf {
                continue;
            }

            let right = total.minus(left);
            let score = left.purity() + right.purity();
            let threshold = ((value as i128 + next_value as i128).div_euclid(2)) as i64;

            let candidate = SplitCandidate {
                feature_idx,
                threshold,
                score,
                tie_breaker: SplitTieBreaker::new(feature_idx, threshold, node_id),
            };

            best = match best {
                Some(current) if !candidate.beats(&current) => Some(current),
                _ => Some(candidate),
            };
        }

        best
    }

    fn class_weights<I>(&self, indices: I) -> ClassWeights
    where
        I: IntoIterator,
        I::Item: Borrow<usize>,
    {
        let mut stats = ClassWeights::default();
        for idx in indices {
            let idx = *idx.borrow();
            stats.add(self.labels[idx], self.weights[idx]);
        }
        stats
    }
}
