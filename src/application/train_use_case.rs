// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load + split the dataset       (Layer 4 - data)
//   Step 2: Open a tracked run             (Layer 6 - infra)
//   Step 3: Log hyperparameters            (Layer 6 - infra)
//   Step 4: Fit the decision tree          (Layer 5 - ml)
//   Step 5: Score the test partition       (Layer 5 - ml)
//   Step 6: Log metric, report and model   (Layer 6 - infra)
//   Step 7: Save the local model copy      (Layer 6 - infra)
//
// Exactly one run is opened per call. It ends FINISHED when
// steps 3-7 succeed and FAILED otherwise.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::application::shared::{
    prepare_partitions, DEFAULT_DATA_PATH, DEFAULT_EXPERIMENT, DEFAULT_MODEL_PATH,
};
use crate::data::{dataset::IrisDataset, splitter::SplitConfig};
use crate::domain::iris::FEATURE_COLUMNS;
use crate::infra::{
    checkpoint::{encode_model, ModelStore},
    metrics::ClassificationReport,
    tracking::{
        signature::{InputExample, ModelSignature},
        storage::TrackingBackend,
        ActiveRun, ExperimentTracker, RunStatus, DEFAULT_TRACKING_URI,
    },
};
use crate::ml::{
    inferencer::{Evaluation, Inferencer},
    model::DecisionTreeConfig,
    trainer::fit_model,
};

/// Model type recorded as a parameter and in the logged model metadata
pub const MODEL_TYPE: &str = "DecisionTreeClassifier";

/// Artifact directory the model is logged under
pub const MODEL_ARTIFACT_PATH: &str = "iris_decision_tree_model";

/// Artifact file holding the rendered classification report
pub const REPORT_ARTIFACT: &str = "classification_report.txt";

// ─── Training Configuration ──────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_path:       String,
    pub model_path:      String,
    pub tracking_uri:    String,
    pub experiment_name: String,
    pub split:           SplitConfig,
    pub max_depth:       usize,
    pub random_state:    u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_path:       DEFAULT_DATA_PATH.to_string(),
            model_path:      DEFAULT_MODEL_PATH.to_string(),
            tracking_uri:    DEFAULT_TRACKING_URI.to_string(),
            experiment_name: DEFAULT_EXPERIMENT.to_string(),
            split:           SplitConfig::default(),
            max_depth:       3,
            random_state:    1,
        }
    }
}

impl TrainConfig {
    fn tree_config(&self) -> DecisionTreeConfig {
        DecisionTreeConfig::new(Some(self.max_depth), self.random_state)
    }
}

/// What a successful training run produced.
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub run_id:        String,
    pub experiment_id: String,
    pub run_url:       String,
    pub accuracy:      f64,
    pub report:        ClassificationReport,
    pub model_path:    String,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Train and record the run under the configured tracking URI.
    pub fn execute(&self) -> Result<TrainOutcome> {
        let mut tracker = ExperimentTracker::from_uri(&self.config.tracking_uri)
            .context("Cannot open experiment tracker")?;
        self.execute_with(&mut tracker)
    }

    /// Train and record the run with an explicit tracker.
    pub fn execute_with<B: TrackingBackend>(
        &self,
        tracker: &mut ExperimentTracker<B>,
    ) -> Result<TrainOutcome> {
        let cfg = &self.config;

        // ── Step 1: Load and split ────────────────────────────────────────────
        let (train, test) = prepare_partitions(&cfg.data_path, &cfg.split)?;

        // ── Step 2: Open the run ──────────────────────────────────────────────
        let experiment = tracker
            .set_experiment(&cfg.experiment_name)
            .context("Cannot set experiment")?;
        let mut run = tracker.start_run(&experiment).context("Cannot start run")?;
        tracing::info!("Tracking run ID: {}", run.run_id());

        let run_id  = run.run_id().to_string();
        let run_url = run.url().to_string();

        match self.train_in_run(&mut run, &train, &test) {
            Ok(evaluation) => {
                run.end(RunStatus::Finished).context("Cannot close run")?;
                tracing::info!("Run finished: {}", run_url);
                Ok(TrainOutcome {
                    run_id,
                    experiment_id: experiment.experiment_id,
                    run_url,
                    accuracy: evaluation.accuracy,
                    report: evaluation.report,
                    model_path: cfg.model_path.clone(),
                })
            }
            Err(e) => {
                if let Err(end_err) = run.end(RunStatus::Failed) {
                    tracing::warn!("Could not mark run {} as failed: {}", run_id, end_err);
                }
                Err(e)
            }
        }
    }

    fn train_in_run<B: TrackingBackend>(
        &self,
        run:   &mut ActiveRun<'_, B>,
        train: &IrisDataset,
        test:  &IrisDataset,
    ) -> Result<Evaluation> {
        let cfg = &self.config;

        // ── Step 3: Hyperparameters ───────────────────────────────────────────
        run.set_tag("dataset", &cfg.data_path)?;
        run.log_param("model_type", MODEL_TYPE)?;
        run.log_param("max_depth", cfg.max_depth)?;
        run.log_param("random_state", cfg.random_state)?;

        // ── Step 4: Fit ───────────────────────────────────────────────────────
        let model = fit_model(&cfg.tree_config(), train)?;

        // ── Step 5: Score ─────────────────────────────────────────────────────
        let inferencer = Inferencer::new(&model);
        let evaluation = inferencer.evaluate(test)?;

        // ── Step 6: Log results ───────────────────────────────────────────────
        run.log_metric("accuracy", evaluation.accuracy, 0)?;
        run.log_text(&evaluation.report.to_string(), REPORT_ARTIFACT)?;

        let signature = ModelSignature::infer(&FEATURE_COLUMNS, &inferencer.predict(train));
        let example   = InputExample::from_row(&FEATURE_COLUMNS, &train.feature_row(0));
        let bytes     = encode_model(&model)?;
        run.log_model(MODEL_ARTIFACT_PATH, MODEL_TYPE, &bytes, &signature, &example)?;
        tracing::info!("Logged model to run artifacts under '{}'", MODEL_ARTIFACT_PATH);

        // ── Step 7: Local copy for evaluate ───────────────────────────────────
        ModelStore::new(&cfg.model_path).save(&model)?;

        Ok(evaluation)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::tracking::storage::InMemoryStore;
    use std::fs;

    fn iris_path() -> String {
        format!("{}/data/iris.csv", env!("CARGO_MANIFEST_DIR"))
    }

    fn config(model_path: String) -> TrainConfig {
        TrainConfig {
            data_path: iris_path(),
            model_path,
            tracking_uri: "memory".to_string(),
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_default_config() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.max_depth, 3);
        assert_eq!(cfg.random_state, 1);
        assert_eq!(cfg.experiment_name, "IRIS_Classifier_Pipeline");
        assert_eq!(cfg.model_path, "artifacts/model.json");
        assert_eq!(cfg.split.seed, 42);
    }

    #[test]
    fn test_train_records_one_finished_run() {
        let dir        = tempfile::tempdir().unwrap();
        let model_path = dir.path().join("artifacts/model.json");
        let use_case   = TrainUseCase::new(config(model_path.display().to_string()));
        let mut tracker = ExperimentTracker::new("memory", InMemoryStore::new());

        let outcome = use_case.execute_with(&mut tracker).unwrap();
        assert!(outcome.accuracy > 0.8);
        assert!(model_path.exists());

        let runs = tracker.backend().list_runs(&outcome.experiment_id).unwrap();
        assert_eq!(runs.len(), 1);
        let run = &runs[0];
        assert_eq!(run.status, RunStatus::Finished);
        assert_eq!(run.params["model_type"], MODEL_TYPE);
        assert_eq!(run.params["max_depth"], "3");
        assert_eq!(run.params["random_state"], "1");
        assert_eq!(run.tags["dataset"], iris_path());
        assert_eq!(run.latest_metric("accuracy"), Some(outcome.accuracy));
        assert!(run.artifacts.iter().any(|a| a == REPORT_ARTIFACT));
        assert_eq!(
            outcome.run_url,
            format!("memory/#/experiments/{}/runs/{}", outcome.experiment_id, outcome.run_id)
        );

        // Tracked model and local copy are the same bytes
        let logged = tracker
            .backend()
            .read_artifact(&outcome.experiment_id, &outcome.run_id, "iris_decision_tree_model/model.json")
            .unwrap();
        assert_eq!(logged, fs::read(&model_path).unwrap());

        let report = tracker
            .backend()
            .read_artifact(&outcome.experiment_id, &outcome.run_id, REPORT_ARTIFACT)
            .unwrap();
        assert_eq!(String::from_utf8(report).unwrap(), outcome.report.to_string());
    }

    #[test]
    fn test_failed_save_marks_run_failed() {
        let dir     = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, "x").unwrap();
        let model_path = blocker.join("model.json").display().to_string();

        let use_case    = TrainUseCase::new(config(model_path));
        let mut tracker = ExperimentTracker::new("memory", InMemoryStore::new());
        assert!(use_case.execute_with(&mut tracker).is_err());

        let experiment = tracker.set_experiment("IRIS_Classifier_Pipeline").unwrap();
        let runs       = tracker.backend().list_runs(&experiment.experiment_id).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].status, RunStatus::Failed);
        assert!(runs[0].end_time_ms.is_some());
    }

    #[test]
    fn test_missing_dataset_opens_no_run() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            data_path: dir.path().join("missing.csv").display().to_string(),
            ..config(dir.path().join("model.json").display().to_string())
        };
        let mut tracker = ExperimentTracker::new("memory", InMemoryStore::new());
        assert!(TrainUseCase::new(cfg).execute_with(&mut tracker).is_err());
        assert!(tracker.backend().experiment_by_name("IRIS_Classifier_Pipeline").unwrap().is_none());
    }
}
