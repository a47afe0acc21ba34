//! Decision tree structures for forest inference
//!
//! Integer-only nodes and traversal. Thresholds are scaled feature values;
//! leaf values are fixed-point probabilities of the alert class.

use serde::{Deserialize, Serialize};

use crate::schema::{FEATURE_COUNT, SCALE};

/// A decision tree node (internal or leaf)
///
/// Internal nodes have `feature_idx >= 0` and valid `left`/`right` child
/// indices. Leaves have `feature_idx == -1` and carry `leaf`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Node {
    /// Node ID (for reference, not used in traversal)
    pub id: i32,

    /// Left child index (-1 for leaf nodes)
    pub left: i32,

    /// Right child index (-1 for leaf nodes)
    pub right: i32,

    /// Feature index to split on (-1 for leaf nodes)
    pub feature_idx: i32,

    /// Split threshold; samples with `x <= threshold` go left
    pub threshold: i64,

    /// Alert probability at this leaf (fixed-point, 0..=SCALE)
    pub leaf: Option<i64>,
}

impl Node {
    /// Create a new internal (split) node
    pub fn internal(id: i32, feature_idx: i32, threshold: i64, left: i32, right: i32) -> Self {
        Self {
            id,
            left,
            right,
            feature_idx,
            threshold,
            leaf: None,
        }
    }

    /// Create a new leaf node
    pub fn leaf(id: i32, value: i64) -> Self {
        Self {
            id,
            left: -1,
            right: -1,
            feature_idx: -1,
            threshold: 0,
            leaf: Some(value),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.feature_idx == -1 || self.leaf.is_some()
    }
}

/// A single decision tree; node 0 is the root
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Alert probability for one scaled feature vector.
    ///
    /// Structurally broken trees evaluate to 0; `validate` rejects them at
    /// load time.
    pub fn evaluate(&self, features: &[i64]) -> i64 {
        let mut idx = 0usize;

        loop {
            let node = match self.nodes.get(idx) {
                Some(node) => node,
                None => return 0,
            };

            if node.is_leaf() {
                return node.leaf.unwrap_or(0);
            }

            let feature_value = match features.get(node.feature_idx as usize) {
                Some(&v) => v,
                None => return 0,
            };

            let next = if feature_value <= node.threshold {
                node.left
            } else {
                node.right
            };

            if next < 0 {
                return 0;
            }
            idx = next as usize;
        }
    }

    /// Deepest root-to-leaf path length (root alone is depth 0)
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize, depth: usize) -> usize {
            match nodes.get(idx) {
                Some(node) if !node.is_leaf() => walk(nodes, node.left as usize, depth + 1)
                    .max(walk(nodes, node.right as usize, depth + 1)),
                _ => depth,
            }
        }
        walk(&self.nodes, 0, 0)
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Validate tree structure
    pub fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("Tree has no nodes".to_string());
        }

        let len = self.nodes.len();
        for (i, node) in self.nodes.iter().enumerate() {
            if node.is_leaf() {
                match node.leaf {
                    None => return Err(format!("Leaf node {i} has no leaf value")),
                    Some(p) if !(0..=SCALE).contains(&p) => {
                        return Err(format!("Leaf node {i} has probability {p} outside 0..={SCALE}"))
                    }
                    Some(_) => {}
                }
                continue;
            }

            // Children are always stored after their parent, which also rules out cycles
            if node.left <= i as i32 || node.left as usize >= len {
                return Err(format!("Node {} has invalid left child: {}", i, node.left));
            }
            if node.right <= i as i32 || node.right as usize >= len {
                return Err(format!("Node {} has invalid right child: {}", i, node.right));
            }
            if node.feature_idx < 0 || node.feature_idx as usize >= FEATURE_COUNT {
                return Err(format!(
                    "Internal node {} has invalid feature index: {}",
                    i, node.feature_idx
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump() -> Tree {
        Tree::new(vec![
            Node::internal(0, 0, 50, 1, 2),
            Node::leaf(1, 100_000),
            Node::leaf(2, 900_000),
        ])
    }

    #[test]
    fn test_node_creation() {
        let internal = Node::internal(0, 3, 12345, 1, 2);
        assert_eq!(internal.feature_idx, 3);
        assert!(!internal.is_leaf());

        let leaf = Node::leaf(1, 250_000);
        assert_eq!(leaf.feature_idx, -1);
        assert!(leaf.is_leaf());
        assert_eq!(leaf.leaf, Some(250_000));
    }

    #[test]
    fn test_tree_evaluation() {
        let tree = stump();
        assert_eq!(tree.evaluate(&[30]), 100_000);
        assert_eq!(tree.evaluate(&[50]), 100_000); // Equal goes left
        assert_eq!(tree.evaluate(&[60]), 900_000);
    }

    #[test]
    fn test_depth_and_leaves() {
        let tree = Tree::new(vec![
            Node::internal(0, 0, 50, 1, 2),
            Node::leaf(1, 0),
            Node::internal(2, 1, 10, 3, 4),
            Node::leaf(3, SCALE),
            Node::leaf(4, 0),
        ]);
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(stump().depth(), 1);
    }

    #[test]
    fn test_tree_validation() {
        assert!(stump().validate().is_ok());

        let bad_child = Tree::new(vec![
            Node::internal(0, 0, 50, 5, 2),
            Node::leaf(1, 0),
            Node::leaf(2, 0),
        ]);
        assert!(bad_child.validate().is_err());

        let self_loop = Tree::new(vec![
            Node::internal(0, 0, 50, 0, 1),
            Node::leaf(1, 0),
        ]);
        assert!(self_loop.validate().is_err());

        let bad_prob = Tree::new(vec![Node::leaf(0, SCALE + 1)]);
        assert!(bad_prob.validate().is_err());

        let bad_feature = Tree::new(vec![
            Node::internal(0, FEATURE_COUNT as i32, 50, 1, 2),
            Node::leaf(1, 0),
            Node::leaf(2, 0),
        ]);
        assert!(bad_feature.validate().is_err());

        assert!(Tree::new(vec![]).validate().is_err());
    }
}
