// ============================================================
// Layer 6 — Model Artifact Store
// ============================================================
// Saves and restores the fitted decision tree as a single JSON
// file (default: artifacts/model.json).
//
// The same encoder produces the bytes written here and the bytes
// logged to the experiment tracker, so both copies are identical.
// Encoding is deterministic: a given tree always serialises to
// the same bytes.
//
// File layout:
//   artifacts/
//     model.json   ← config, class names, feature names, tree
//
// Reference: Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{
    fs,
    io::ErrorKind,
    path::PathBuf,
};

use crate::ml::model::DecisionTreeClassifier;

/// Errors specific to loading the local artifact.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("model artifact not found at '{0}'. Run 'train' before 'evaluate'.")]
    NotFound(PathBuf),
}

/// Serialise a model to the artifact byte format.
pub fn encode_model(model: &DecisionTreeClassifier) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(model).context("Cannot serialise model")
}

/// Rebuild a model from artifact bytes.
pub fn decode_model(bytes: &[u8]) -> Result<DecisionTreeClassifier> {
    serde_json::from_slice(bytes).context("Model artifact is not a valid decision tree")
}

/// Reads and writes the local model artifact at a fixed path.
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write the model, creating the parent directory if needed.
    pub fn save(&self, model: &DecisionTreeClassifier) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create artifact directory '{}'", dir.display()))?;
        }

        fs::write(&self.path, encode_model(model)?)
            .with_context(|| format!("Cannot write model to '{}'", self.path.display()))?;

        tracing::info!("Saved local model copy to '{}'", self.path.display());
        Ok(())
    }

    /// Load the model saved by a previous `train` run.
    pub fn load(&self) -> Result<DecisionTreeClassifier> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ArtifactError::NotFound(self.path.clone()).into());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Cannot read model from '{}'", self.path.display()));
            }
        };

        let model = decode_model(&bytes)
            .with_context(|| format!("Corrupt model artifact '{}'", self.path.display()))?;

        tracing::info!("Loaded model from '{}'", self.path.display());
        Ok(model)
    }
}
