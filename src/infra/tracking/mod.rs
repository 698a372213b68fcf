//! Experiment tracking
//!
//! Records each training run (parameters, metrics, tags and artifacts)
//! under a named experiment, in a directory tree compatible in spirit with
//! an MLflow file store.
//!
//! # Architecture
//!
//! - **`ExperimentTracker`**: resolves experiments and opens runs
//! - **`ActiveRun`**: one open run; every log call is persisted immediately
//! - **`TrackingBackend`**: pluggable persistence (`FileStore`, `InMemoryStore`)
//!
//! # Example
//!
//! ```
//! use iris_pipeline::infra::tracking::{ExperimentTracker, RunStatus};
//! use iris_pipeline::infra::tracking::storage::InMemoryStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tracker = ExperimentTracker::new("memory", InMemoryStore::new());
//! let experiment  = tracker.set_experiment("demo")?;
//!
//! let mut run = tracker.start_run(&experiment)?;
//! run.log_param("max_depth", 3)?;
//! run.log_metric("accuracy", 0.95, 0)?;
//! let record = run.end(RunStatus::Finished)?;
//!
//! assert_eq!(record.params["max_depth"], "3");
//! # Ok(())
//! # }
//! ```

pub mod signature;
pub mod storage;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use signature::{InputExample, ModelSignature};
use storage::{FileStore, TrackingBackend, TrackingStorageError};

/// Tracking root used when no URI is configured
pub const DEFAULT_TRACKING_URI: &str = "mlruns";

/// Lifecycle state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Running,
    Finished,
    Failed,
}

/// A named group of runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experiment {
    pub experiment_id:     String,
    pub name:              String,
    pub artifact_location: String,
    pub creation_time_ms:  u64,
}

/// One recorded metric value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEntry {
    pub value:        f64,
    pub step:         u64,
    pub timestamp_ms: u64,
}

/// Everything recorded about a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id:        String,
    pub experiment_id: String,
    pub status:        RunStatus,
    pub start_time_ms: u64,
    pub end_time_ms:   Option<u64>,
    pub params:        BTreeMap<String, String>,
    pub metrics:       BTreeMap<String, Vec<MetricEntry>>,
    pub tags:          BTreeMap<String, String>,
    /// Relative paths of logged artifact files
    pub artifacts:     Vec<String>,
}

impl RunRecord {
    /// Most recent value of a metric
    pub fn latest_metric(&self, key: &str) -> Option<f64> {
        self.metrics.get(key).and_then(|v| v.last()).map(|m| m.value)
    }
}

/// Flavor recorded for models logged by this crate
pub const MODEL_FLAVOR: &str = "iris_pipeline.json_tree";

/// `MLmodel.json` written next to a logged model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub artifact_path:       String,
    pub flavor:              String,
    pub run_id:              String,
    pub model_type:          String,
    pub model_file:          String,
    pub signature:           ModelSignature,
    pub saved_input_example: String,
    pub created_time_ms:     u64,
}

/// Errors from experiment tracking operations
#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    #[error("Unsupported tracking URI '{0}': only local paths and file: URIs are supported")]
    UnsupportedUri(String),

    #[error("Parameter '{key}' already logged as '{existing}', refusing to change it to '{new}'")]
    ParamConflict {
        key:      String,
        existing: String,
        new:      String,
    },

    #[error("Metric '{0}' is not a finite number")]
    NonFiniteMetric(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] TrackingStorageError),
}

/// Result alias for tracking operations
pub type Result<T> = std::result::Result<T, TrackingError>;

pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Map a tracking URI to a local directory.
///
/// Accepts bare paths, `file:<path>` and `file://<path>`. Remote schemes
/// are rejected.
pub fn resolve_tracking_root(uri: &str) -> Result<PathBuf> {
    let uri = uri.trim();
    if uri.is_empty() {
        return Ok(PathBuf::from(DEFAULT_TRACKING_URI));
    }
    if let Some(rest) = uri.strip_prefix("file://") {
        return Ok(PathBuf::from(rest));
    }
    if let Some(rest) = uri.strip_prefix("file:") {
        return Ok(PathBuf::from(rest));
    }
    if uri.contains("://") || uri.starts_with("databricks") {
        return Err(TrackingError::UnsupportedUri(uri.to_string()));
    }
    Ok(PathBuf::from(uri))
}

// ─── ExperimentTracker ────────────────────────────────────────────────────────

/// Entry point for recording runs
#[derive(Debug)]
pub struct ExperimentTracker<B: TrackingBackend> {
    tracking_uri: String,
    backend:      B,
}

impl ExperimentTracker<FileStore> {
    /// Tracker writing to the directory named by `uri`
    pub fn from_uri(uri: &str) -> Result<Self> {
        let root = resolve_tracking_root(uri)?;
        Ok(Self::new(uri, FileStore::new(root)))
    }
}

impl<B: TrackingBackend> ExperimentTracker<B> {
    pub fn new(tracking_uri: impl Into<String>, backend: B) -> Self {
        Self {
            tracking_uri: tracking_uri.into(),
            backend,
        }
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Fetch the experiment called `name`, creating it on first use
    pub fn set_experiment(&mut self, name: &str) -> Result<Experiment> {
        if let Some(existing) = self.backend.experiment_by_name(name)? {
            return Ok(existing);
        }
        let created = self.backend.create_experiment(name)?;
        tracing::info!("Created experiment '{}' (id {})", name, created.experiment_id);
        Ok(created)
    }

    /// Open a new run in `experiment`; it is persisted right away
    pub fn start_run(&mut self, experiment: &Experiment) -> Result<ActiveRun<'_, B>> {
        let record = RunRecord {
            run_id:        uuid::Uuid::new_v4().simple().to_string(),
            experiment_id: experiment.experiment_id.clone(),
            status:        RunStatus::Running,
            start_time_ms: now_ms(),
            end_time_ms:   None,
            params:        BTreeMap::new(),
            metrics:       BTreeMap::new(),
            tags:          BTreeMap::new(),
            artifacts:     Vec::new(),
        };
        self.backend.save_run(&record)?;

        Ok(ActiveRun {
            url: run_url(&self.tracking_uri, &record.experiment_id, &record.run_id),
            backend: &mut self.backend,
            record,
        })
    }
}

/// `{uri}/#/experiments/{experiment_id}/runs/{run_id}`
pub fn run_url(tracking_uri: &str, experiment_id: &str, run_id: &str) -> String {
    format!(
        "{}/#/experiments/{}/runs/{}",
        tracking_uri.trim_end_matches('/'),
        experiment_id,
        run_id
    )
}

// ─── ActiveRun ────────────────────────────────────────────────────────────────

/// An open run. Dropping it without `end` leaves it `RUNNING`.
pub struct ActiveRun<'a, B: TrackingBackend> {
    backend: &'a mut B,
    record:  RunRecord,
    url:     String,
}

impl<B: TrackingBackend> fmt::Debug for ActiveRun<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveRun").field("record", &self.record).finish()
    }
}

impl<B: TrackingBackend> ActiveRun<'_, B> {
    pub fn run_id(&self) -> &str {
        &self.record.run_id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn record(&self) -> &RunRecord {
        &self.record
    }

    fn persist(&mut self) -> Result<()> {
        self.backend.save_run(&self.record)?;
        Ok(())
    }

    /// Record a parameter. Parameters are write-once: logging the same
    /// value again is fine, a different value is an error.
    pub fn log_param(&mut self, key: &str, value: impl fmt::Display) -> Result<()> {
        let value = value.to_string();
        if let Some(existing) = self.record.params.get(key) {
            if *existing != value {
                return Err(TrackingError::ParamConflict {
                    key:      key.to_string(),
                    existing: existing.clone(),
                    new:      value,
                });
            }
            return Ok(());
        }
        self.record.params.insert(key.to_string(), value);
        self.persist()
    }

    /// Append a metric value at `step`
    pub fn log_metric(&mut self, key: &str, value: f64, step: u64) -> Result<()> {
        if !value.is_finite() {
            return Err(TrackingError::NonFiniteMetric(key.to_string()));
        }
        self.record
            .metrics
            .entry(key.to_string())
            .or_default()
            .push(MetricEntry { value, step, timestamp_ms: now_ms() });
        self.persist()
    }

    pub fn set_tag(&mut self, key: &str, value: impl fmt::Display) -> Result<()> {
        self.record.tags.insert(key.to_string(), value.to_string());
        self.persist()
    }

    /// Store raw bytes as an artifact file of this run
    pub fn log_artifact_bytes(&mut self, artifact_file: &str, bytes: &[u8]) -> Result<()> {
        self.backend.write_artifact(
            &self.record.experiment_id,
            &self.record.run_id,
            artifact_file,
            bytes,
        )?;
        if !self.record.artifacts.iter().any(|a| a == artifact_file) {
            self.record.artifacts.push(artifact_file.to_string());
        }
        self.persist()
    }

    /// Store text as an artifact file of this run
    pub fn log_text(&mut self, text: &str, artifact_file: &str) -> Result<()> {
        self.log_artifact_bytes(artifact_file, text.as_bytes())
    }

    /// Store a serialised model with its signature and an input example.
    ///
    /// Writes `model.json`, `MLmodel.json` and `input_example.json` under
    /// `artifact_path`.
    pub fn log_model(
        &mut self,
        artifact_path: &str,
        model_type:    &str,
        model_bytes:   &[u8],
        signature:     &ModelSignature,
        input_example: &InputExample,
    ) -> Result<()> {
        let base = artifact_path.trim_end_matches('/');

        let metadata = ModelMetadata {
            artifact_path:       base.to_string(),
            flavor:              MODEL_FLAVOR.to_string(),
            run_id:              self.record.run_id.clone(),
            model_type:          model_type.to_string(),
            model_file:          "model.json".to_string(),
            signature:           signature.clone(),
            saved_input_example: "input_example.json".to_string(),
            created_time_ms:     now_ms(),
        };

        self.log_artifact_bytes(&format!("{base}/model.json"), model_bytes)?;
        self.log_artifact_bytes(
            &format!("{base}/input_example.json"),
            &serde_json::to_vec_pretty(input_example)?,
        )?;
        self.log_artifact_bytes(&format!("{base}/MLmodel.json"), &serde_json::to_vec_pretty(&metadata)?)?;

        tracing::debug!("Logged model '{}' to run {}", base, self.record.run_id);
        Ok(())
    }

    /// Close the run with `status` and return its final record
    pub fn end(mut self, status: RunStatus) -> Result<RunRecord> {
        self.record.status      = status;
        self.record.end_time_ms = Some(now_ms());
        self.persist()?;
        Ok(self.record)
    }
}
