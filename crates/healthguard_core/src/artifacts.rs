//! Fitted artifact persistence
//!
//! The scaler and the forest are written as two independent canonical JSON
//! files, each with a sibling `.hash` file holding the blake3 hex digest of
//! the JSON bytes. Loading verifies the digest when the sibling exists and
//! checks the embedded column list against the compiled schema.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::ArtifactError;
use crate::forest::RandomForest;
use crate::scaler::StandardScaler;
use crate::serde_canon::{hash_bytes_hex, to_canonical_json};

pub const SCALER_FILE: &str = "scaler.json";
pub const MODEL_FILE: &str = "model.json";

/// Default output directory for training runs
pub const DEFAULT_ARTIFACT_DIR: &str = "models/healthguard";

/// Locations of the two artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub scaler: PathBuf,
    pub model: PathBuf,
}

impl ArtifactPaths {
    /// Standard file names inside `dir`
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            scaler: dir.join(SCALER_FILE),
            model: dir.join(MODEL_FILE),
        }
    }
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self::in_dir(DEFAULT_ARTIFACT_DIR)
    }
}

/// Sibling digest path for an artifact (`model.json` -> `model.hash`)
pub fn hash_path(path: &Path) -> PathBuf {
    path.with_extension("hash")
}

/// The fitted scaler/model pair produced by one training run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FittedArtifacts {
    pub scaler: StandardScaler,
    pub model: RandomForest,
}

impl FittedArtifacts {
    /// Persist both artifacts; returns the two digests (scaler, model).
    pub fn save(&self, paths: &ArtifactPaths) -> Result<(String, String), ArtifactError> {
        let scaler_hash = save_scaler(&self.scaler, &paths.scaler)?;
        let model_hash = save_model(&self.model, &paths.model)?;
        Ok((scaler_hash, model_hash))
    }

    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        Ok(Self {
            scaler: load_scaler(&paths.scaler)?,
            model: load_model(&paths.model)?,
        })
    }
}

pub fn save_scaler(scaler: &StandardScaler, path: &Path) -> Result<String, ArtifactError> {
    write_artifact(scaler, path)
}

pub fn save_model(model: &RandomForest, path: &Path) -> Result<String, ArtifactError> {
    write_artifact(model, path)
}

pub fn load_scaler(path: &Path) -> Result<StandardScaler, ArtifactError> {
    let scaler: StandardScaler = read_artifact(path)?;
    scaler.validate()?;
    Ok(scaler)
}

pub fn load_model(path: &Path) -> Result<RandomForest, ArtifactError> {
    let model: RandomForest = read_artifact(path)?;
    model.validate()?;
    Ok(model)
}

fn write_artifact<T: Serialize>(value: &T, path: &Path) -> Result<String, ArtifactError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ArtifactError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let json = to_canonical_json(value)?;
    let digest = hash_bytes_hex(json.as_bytes());

    fs::write(path, &json).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let digest_path = hash_path(path);
    fs::write(&digest_path, &digest).map_err(|source| ArtifactError::Io {
        path: digest_path.clone(),
        source,
    })?;

    info!("Saved {} ({})", path.display(), digest);
    Ok(digest)
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::Missing(path.to_path_buf()));
    }

    let bytes = fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let digest_path = hash_path(path);
    if digest_path.exists() {
        let expected = fs::read_to_string(&digest_path).map_err(|source| ArtifactError::Io {
            path: digest_path.clone(),
            source,
        })?;
        let expected = expected.trim().to_string();
        let actual = hash_bytes_hex(&bytes);
        if expected != actual {
            return Err(ArtifactError::HashMismatch {
                path: path.to_path_buf(),
                expected,
                actual,
            });
        }
        debug!("Verified {} against {}", path.display(), digest_path.display());
    }

    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::{ForestMetadata, Node, Tree};
    use crate::schema::{schema_columns, Feature, FeatureVector, SCALE};
    use tempfile::TempDir;

    fn artifacts() -> FittedArtifacts {
        let rows: Vec<FeatureVector> = (0..5)
            .map(|i| {
                let mut v = FeatureVector::zeros();
                v.set(Feature::GammaGtp, (20 + 15 * i) * SCALE);
                v
            })
            .collect();
        let scaler = StandardScaler::fit(&rows).unwrap();
        let tree = Tree::new(vec![
            Node::internal(0, Feature::GammaGtp.index() as i32, 0, 1, 2),
            Node::leaf(1, 0),
            Node::leaf(2, SCALE),
        ]);
        let model = RandomForest::new(schema_columns(), vec![tree], ForestMetadata::default());
        FittedArtifacts { scaler, model }
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path().join("nested"));
        let original = artifacts();

        let (scaler_hash, model_hash) = original.save(&paths).unwrap();
        assert_eq!(scaler_hash.len(), 64);
        assert_eq!(model_hash, original.model.hash_hex().unwrap());
        assert!(hash_path(&paths.model).exists());

        let loaded = FittedArtifacts::load(&paths).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_missing_artifact() {
        let dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        assert!(matches!(
            FittedArtifacts::load(&paths),
            Err(ArtifactError::Missing(_))
        ));
    }

    #[test]
    fn test_tampered_artifact_fails_hash_check() {
        let dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        artifacts().save(&paths).unwrap();

        let json = fs::read_to_string(&paths.model).unwrap();
        fs::write(&paths.model, json.replace("1000000", "999999")).unwrap();

        assert!(matches!(
            load_model(&paths.model),
            Err(ArtifactError::HashMismatch { .. })
        ));
    }

    #[test]
    fn test_unhashed_artifact_still_loads() {
        let dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        artifacts().save(&paths).unwrap();
        fs::remove_file(hash_path(&paths.scaler)).unwrap();

        assert!(load_scaler(&paths.scaler).is_ok());
    }

    #[test]
    fn test_unreadable_artifact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(MODEL_FILE);
        fs::write(&path, "not json").unwrap();
        assert!(matches!(load_model(&path), Err(ArtifactError::Json(_))));
    }
}
