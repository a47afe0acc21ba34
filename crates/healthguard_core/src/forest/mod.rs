//! Integer-only random forest classifier
//!
//! - **Fixed-point only**: thresholds and leaf probabilities are `i64` at `SCALE`
//! - **Deterministic**: traversal uses `<=` against the threshold, the
//!   ensemble mean uses integer division
//! - **Canonical serialization**: sorted-key JSON, blake3 digest
//!
//! # Model Format
//!
//! ```json
//! {
//!   "columns": ["age", "sex", "..."],
//!   "metadata": {"class_weights": [625000, 2500000], "created_at": 0, "...": 0},
//!   "scale": 1000000,
//!   "trees": [
//!     {"nodes": [
//!       {"id":0,"left":1,"right":2,"feature_idx":10,"threshold":412345,"leaf":null},
//!       {"id":1,"left":-1,"right":-1,"feature_idx":-1,"threshold":0,"leaf":31250},
//!       {"id":2,"left":-1,"right":-1,"feature_idx":-1,"threshold":0,"leaf":975000}
//!     ]}
//!   ],
//!   "version": 1
//! }
//! ```

pub mod model;
pub mod tree;

pub use model::{label_for_probability, ForestMetadata, RandomForest, FORMAT_VERSION};
pub use tree::{Node, Tree};
