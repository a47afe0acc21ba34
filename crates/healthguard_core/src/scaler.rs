//! Fixed-point standard scaler
//!
//! Learns a per-column mean and population standard deviation and maps
//! `x -> (x - mean) / std`. All parameters are fixed-point integers so a
//! persisted scaler reproduces training-time outputs bit for bit.

use serde::{Deserialize, Serialize};

use crate::errors::{ArtifactError, FitError};
use crate::schema::{
    columns_match, schema_columns, FeatureVector, FEATURE_COLUMNS, FEATURE_COUNT, SCALE,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Column order the parameters were fit against
    pub columns: Vec<String>,
    /// Per-column mean (fixed-point)
    pub mean: [i64; FEATURE_COUNT],
    /// Per-column standard deviation (fixed-point, never zero)
    pub std: [i64; FEATURE_COUNT],
    /// Number of rows seen during fit
    pub samples_seen: u64,
}

impl StandardScaler {
    /// Fit on the training partition.
    ///
    /// Columns with zero variance keep a unit deviation so they pass
    /// through centered but unscaled.
    pub fn fit(rows: &[FeatureVector]) -> Result<Self, FitError> {
        if rows.is_empty() {
            return Err(FitError::EmptyInput);
        }

        let n = rows.len() as i128;
        let mut mean = [0i64; FEATURE_COUNT];
        let mut std = [SCALE; FEATURE_COUNT];

        for col in 0..FEATURE_COUNT {
            let sum: i128 = rows.iter().map(|r| r.0[col] as i128).sum();
            let m = sum.div_euclid(n);

            // Variance in SCALE^2 units; its square root is back in SCALE units
            let sq: i128 = rows
                .iter()
                .map(|r| {
                    let d = r.0[col] as i128 - m;
                    d * d
                })
                .sum();
            let sd = isqrt(sq / n);

            mean[col] = m as i64;
            if sd > 0 {
                std[col] = sd as i64;
            }
        }

        tracing::debug!("Scaler fit on {} rows", rows.len());

        Ok(Self {
            columns: schema_columns(),
            mean,
            std,
            samples_seen: rows.len() as u64,
        })
    }

    /// Scale one vector. Pure and deterministic.
    pub fn transform(&self, row: &FeatureVector) -> FeatureVector {
        let mut out = FeatureVector::zeros();
        for col in 0..FEATURE_COUNT {
            let centered = row.0[col] as i128 - self.mean[col] as i128;
            let scaled = centered * SCALE as i128 / self.std[col] as i128;
            out.0[col] = scaled.clamp(i64::MIN as i128, i64::MAX as i128) as i64;
        }
        out
    }

    pub fn transform_all(&self, rows: &[FeatureVector]) -> Vec<FeatureVector> {
        rows.iter().map(|r| self.transform(r)).collect()
    }

    /// Check a deserialized scaler before use
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if !columns_match(&self.columns) {
            return Err(ArtifactError::SchemaMismatch {
                expected: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
                found: self.columns.clone(),
            });
        }

        if let Some(col) = self.std.iter().position(|&s| s <= 0) {
            return Err(ArtifactError::Validation(format!(
                "scaler column {} has non-positive deviation {}",
                FEATURE_COLUMNS[col], self.std[col]
            )));
        }

        Ok(())
    }
}

/// Integer square root (floor) by Newton iteration
fn isqrt(n: i128) -> i128 {
    if n < 2 {
        return n.max(0);
    }

    let mut x = n;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}
