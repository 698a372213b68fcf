//! Tracking storage backends
//!
//! Provides the `TrackingBackend` trait, a directory-tree implementation
//! for real runs and an in-memory one for tests.
//!
//! `FileStore` layout under the tracking root:
//!
//! ```text
//! <root>/
//!   <experiment_id>/
//!     meta.json
//!     <run_id>/
//!       run.json
//!       artifacts/<artifact path>
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use super::{now_ms, Experiment, RunRecord};

/// Errors from tracking storage operations
#[derive(Debug, thiserror::Error)]
pub enum TrackingStorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Artifact not found: {0}")]
    ArtifactNotFound(String),

    #[error("Invalid artifact path '{0}': must be relative and stay inside the run")]
    InvalidArtifactPath(String),
}

/// Result alias for tracking storage operations
pub type Result<T> = std::result::Result<T, TrackingStorageError>;

/// Persistence for experiments, runs and run artifacts.
pub trait TrackingBackend {
    /// Look up an experiment by its name
    fn experiment_by_name(&self, name: &str) -> Result<Option<Experiment>>;

    /// Create a new experiment and assign it an id
    fn create_experiment(&mut self, name: &str) -> Result<Experiment>;

    /// Insert or replace a run record
    fn save_run(&mut self, run: &RunRecord) -> Result<()>;

    /// Load one run of an experiment
    fn load_run(&self, experiment_id: &str, run_id: &str) -> Result<RunRecord>;

    /// All runs of an experiment, oldest first
    fn list_runs(&self, experiment_id: &str) -> Result<Vec<RunRecord>>;

    /// Store an artifact file under the run
    fn write_artifact(
        &mut self,
        experiment_id: &str,
        run_id: &str,
        path: &str,
        bytes: &[u8],
    ) -> Result<()>;

    /// Read back an artifact file of a run
    fn read_artifact(&self, experiment_id: &str, run_id: &str, path: &str) -> Result<Vec<u8>>;
}

/// Reject absolute paths and `..` so artifacts stay inside their run.
pub fn validate_artifact_path(path: &str) -> Result<PathBuf> {
    let p = Path::new(path);
    let ok = !path.is_empty() && p.components().all(|c| matches!(c, Component::Normal(_)));
    if !ok {
        return Err(TrackingStorageError::InvalidArtifactPath(path.to_string()));
    }
    Ok(p.to_path_buf())
}

fn sort_runs(runs: &mut [RunRecord]) {
    runs.sort_by(|a, b| {
        a.start_time_ms
            .cmp(&b.start_time_ms)
            .then_with(|| a.run_id.cmp(&b.run_id))
    });
}

// ─── FileStore ────────────────────────────────────────────────────────────────

/// Directory-tree tracking backend
///
/// Experiments get increasing integer ids starting at 1. Every run record
/// is rewritten in full on each save.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`; directories are created lazily
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn experiment_dir(&self, experiment_id: &str) -> PathBuf {
        self.root.join(experiment_id)
    }

    fn run_dir(&self, experiment_id: &str, run_id: &str) -> PathBuf {
        self.experiment_dir(experiment_id).join(run_id)
    }

    fn experiments(&self) -> Result<Vec<Experiment>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let meta = entry?.path().join("meta.json");
            if meta.is_file() {
                let json = fs::read_to_string(&meta)?;
                out.push(serde_json::from_str::<Experiment>(&json)?);
            }
        }
        Ok(out)
    }
}

impl TrackingBackend for FileStore {
    fn experiment_by_name(&self, name: &str) -> Result<Option<Experiment>> {
        Ok(self.experiments()?.into_iter().find(|e| e.name == name))
    }

    fn create_experiment(&mut self, name: &str) -> Result<Experiment> {
        let next_id = self
            .experiments()?
            .iter()
            .filter_map(|e| e.experiment_id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;

        let experiment_id = next_id.to_string();
        let dir = self.experiment_dir(&experiment_id);
        fs::create_dir_all(&dir)?;

        let experiment = Experiment {
            experiment_id,
            name: name.to_string(),
            artifact_location: dir.display().to_string(),
            creation_time_ms: now_ms(),
        };
        fs::write(dir.join("meta.json"), serde_json::to_string_pretty(&experiment)?)?;
        Ok(experiment)
    }

    fn save_run(&mut self, run: &RunRecord) -> Result<()> {
        let dir = self.run_dir(&run.experiment_id, &run.run_id);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("run.json"), serde_json::to_string_pretty(run)?)?;
        Ok(())
    }

    fn load_run(&self, experiment_id: &str, run_id: &str) -> Result<RunRecord> {
        let path = self.run_dir(experiment_id, run_id).join("run.json");
        if !path.exists() {
            return Err(TrackingStorageError::RunNotFound(run_id.to_string()));
        }
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn list_runs(&self, experiment_id: &str) -> Result<Vec<RunRecord>> {
        let dir = self.experiment_dir(experiment_id);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut runs = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path().join("run.json");
            if path.is_file() {
                let json = fs::read_to_string(&path)?;
                runs.push(serde_json::from_str::<RunRecord>(&json)?);
            }
        }
        sort_runs(&mut runs);
        Ok(runs)
    }

    fn write_artifact(
        &mut self,
        experiment_id: &str,
        run_id: &str,
        path: &str,
        bytes: &[u8],
    ) -> Result<()> {
        let rel    = validate_artifact_path(path)?;
        let target = self.run_dir(experiment_id, run_id).join("artifacts").join(rel);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(target, bytes)?;
        Ok(())
    }

    fn read_artifact(&self, experiment_id: &str, run_id: &str, path: &str) -> Result<Vec<u8>> {
        let rel    = validate_artifact_path(path)?;
        let target = self.run_dir(experiment_id, run_id).join("artifacts").join(rel);
        if !target.is_file() {
            return Err(TrackingStorageError::ArtifactNotFound(path.to_string()));
        }
        Ok(fs::read(target)?)
    }
}

// ─── InMemoryStore ────────────────────────────────────────────────────────────

/// In-memory tracking backend for testing
///
/// Same id scheme as `FileStore`, no persistence.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    experiments: Vec<Experiment>,
    runs:        BTreeMap<(String, String), RunRecord>,
    artifacts:   BTreeMap<(String, String, PathBuf), Vec<u8>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TrackingBackend for InMemoryStore {
    fn experiment_by_name(&self, name: &str) -> Result<Option<Experiment>> {
        Ok(self.experiments.iter().find(|e| e.name == name).cloned())
    }

    fn create_experiment(&mut self, name: &str) -> Result<Experiment> {
        let experiment = Experiment {
            experiment_id:     (self.experiments.len() + 1).to_string(),
            name:              name.to_string(),
            artifact_location: String::from("memory"),
            creation_time_ms:  now_ms(),
        };
        self.experiments.push(experiment.clone());
        Ok(experiment)
    }

    fn save_run(&mut self, run: &RunRecord) -> Result<()> {
        let key = (run.experiment_id.clone(), run.run_id.clone());
        self.runs.insert(key, run.clone());
        Ok(())
    }

    fn load_run(&self, experiment_id: &str, run_id: &str) -> Result<RunRecord> {
        self.runs
            .get(&(experiment_id.to_string(), run_id.to_string()))
            .cloned()
            .ok_or_else(|| TrackingStorageError::RunNotFound(run_id.to_string()))
    }

    fn list_runs(&self, experiment_id: &str) -> Result<Vec<RunRecord>> {
        let mut runs: Vec<RunRecord> = self
            .runs
            .values()
            .filter(|r| r.experiment_id == experiment_id)
            .cloned()
            .collect();
        sort_runs(&mut runs);
        Ok(runs)
    }

    fn write_artifact(
        &mut self,
        experiment_id: &str,
        run_id: &str,
        path: &str,
        bytes: &[u8],
    ) -> Result<()> {
        let rel = validate_artifact_path(path)?;
        self.artifacts
            .insert((experiment_id.to_string(), run_id.to_string(), rel), bytes.to_vec());
        Ok(())
    }

    fn read_artifact(&self, experiment_id: &str, run_id: &str, path: &str) -> Result<Vec<u8>> {
        let rel = validate_artifact_path(path)?;
        self.artifacts
            .get(&(experiment_id.to_string(), run_id.to_string(), rel))
            .cloned()
            .ok_or_else(|| TrackingStorageError::ArtifactNotFound(path.to_string()))
    }
}
