//! Tests for the tracking module

use super::signature::{InputExample, ModelSignature};
use super::storage::{
    validate_artifact_path, FileStore, InMemoryStore, TrackingBackend, TrackingStorageError,
};
use super::{
    resolve_tracking_root, run_url, ExperimentTracker, ModelMetadata, RunStatus, TrackingError,
};
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// URI resolution
// ---------------------------------------------------------------------------

#[test]
fn test_resolve_plain_and_file_uris() {
    assert_eq!(resolve_tracking_root("mlruns").unwrap(), PathBuf::from("mlruns"));
    assert_eq!(resolve_tracking_root("file:///tmp/runs").unwrap(), PathBuf::from("/tmp/runs"));
    assert_eq!(resolve_tracking_root("file:runs").unwrap(), PathBuf::from("runs"));
    assert_eq!(resolve_tracking_root("  ").unwrap(), PathBuf::from("mlruns"));
}

#[test]
fn test_resolve_rejects_remote_uris() {
    for uri in ["http://localhost:5000", "https://example.com", "databricks"] {
        assert!(matches!(
            resolve_tracking_root(uri),
            Err(TrackingError::UnsupportedUri(_))
        ));
    }
}

#[test]
fn test_run_url() {
    assert_eq!(run_url("mlruns/", "1", "abc"), "mlruns/#/experiments/1/runs/abc");
}

// ---------------------------------------------------------------------------
// Artifact paths
// ---------------------------------------------------------------------------

#[test]
fn test_artifact_path_validation() {
    assert!(validate_artifact_path("report.txt").is_ok());
    assert!(validate_artifact_path("model/MLmodel.json").is_ok());
    for bad in ["", "/etc/passwd", "../escape.txt", "a/../../b"] {
        assert!(matches!(
            validate_artifact_path(bad),
            Err(TrackingStorageError::InvalidArtifactPath(_))
        ));
    }
}

// ---------------------------------------------------------------------------
// Tracker + in-memory backend
// ---------------------------------------------------------------------------

#[test]
fn test_set_experiment_is_get_or_create() {
    let mut tracker = ExperimentTracker::new("memory", InMemoryStore::new());
    let a = tracker.set_experiment("exp").unwrap();
    let b = tracker.set_experiment("exp").unwrap();
    let c = tracker.set_experiment("other").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.experiment_id, "1");
    assert_eq!(c.experiment_id, "2");
}

#[test]
fn test_run_lifecycle() {
    let mut tracker = ExperimentTracker::new("memory", InMemoryStore::new());
    let exp = tracker.set_experiment("exp").unwrap();

    let mut run = tracker.start_run(&exp).unwrap();
    let run_id  = run.run_id().to_string();
    assert_eq!(run_id.len(), 32);
    assert_eq!(run.record().status, RunStatus::Running);

    run.log_param("max_depth", 3).unwrap();
    run.log_metric("accuracy", 0.9, 0).unwrap();
    run.log_text("hello", "notes/report.txt").unwrap();
    let record = run.end(RunStatus::Finished).unwrap();

    assert_eq!(record.status, RunStatus::Finished);
    assert!(record.end_time_ms.is_some());
    assert_eq!(record.latest_metric("accuracy"), Some(0.9));
    assert_eq!(record.artifacts, vec!["notes/report.txt"]);

    let stored = tracker.backend().load_run(&exp.experiment_id, &run_id).unwrap();
    assert_eq!(stored, record);
    let text = tracker
        .backend()
        .read_artifact(&exp.experiment_id, &run_id, "notes/report.txt")
        .unwrap();
    assert_eq!(text, b"hello");
}

#[test]
fn test_params_are_write_once() {
    let mut tracker = ExperimentTracker::new("memory", InMemoryStore::new());
    let exp = tracker.set_experiment("exp").unwrap();
    let mut run = tracker.start_run(&exp).unwrap();

    run.log_param("seed", 1).unwrap();
    run.log_param("seed", "1").unwrap();
    assert!(matches!(
        run.log_param("seed", 2),
        Err(TrackingError::ParamConflict { .. })
    ));
}

#[test]
fn test_non_finite_metric_rejected() {
    let mut tracker = ExperimentTracker::new("memory", InMemoryStore::new());
    let exp = tracker.set_experiment("exp").unwrap();
    let mut run = tracker.start_run(&exp).unwrap();
    assert!(matches!(
        run.log_metric("loss", f64::NAN, 0),
        Err(TrackingError::NonFiniteMetric(_))
    ));
}

#[test]
fn test_started_run_is_visible_before_end() {
    let mut tracker = ExperimentTracker::new("memory", InMemoryStore::new());
    let exp = tracker.set_experiment("exp").unwrap();
    let run_id = {
        let run = tracker.start_run(&exp).unwrap();
        run.run_id().to_string()
    };
    let runs = tracker.backend().list_runs(&exp.experiment_id).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].run_id, run_id);
    assert_eq!(runs[0].status, RunStatus::Running);
}

// ---------------------------------------------------------------------------
// File store
// ---------------------------------------------------------------------------

#[test]
fn test_file_store_layout() {
    let dir  = tempfile::tempdir().unwrap();
    let root = dir.path().join("mlruns");
    let mut tracker = ExperimentTracker::new(root.display().to_string(), FileStore::new(&root));

    let exp     = tracker.set_experiment("IRIS").unwrap();
    let mut run = tracker.start_run(&exp).unwrap();
    let run_id  = run.run_id().to_string();

    let signature = ModelSignature::infer(&["a", "b"], &["x".to_string()]);
    let example   = InputExample::from_row(&["a", "b"], &[1.0, 2.0]);
    run.log_model("model", "Dummy", b"{}", &signature, &example).unwrap();
    run.end(RunStatus::Finished).unwrap();

    let run_dir = root.join(&exp.experiment_id).join(&run_id);
    assert!(root.join(&exp.experiment_id).join("meta.json").is_file());
    assert!(run_dir.join("run.json").is_file());
    assert_eq!(std::fs::read(run_dir.join("artifacts/model/model.json")).unwrap(), b"{}");

    let meta: ModelMetadata = serde_json::from_slice(
        &std::fs::read(run_dir.join("artifacts/model/MLmodel.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(meta.run_id, run_id);
    assert_eq!(meta.flavor, super::MODEL_FLAVOR);
    assert_eq!(meta.model_type, "Dummy");
    assert_eq!(meta.signature, signature);
    assert!(run_dir.join("artifacts/model/input_example.json").is_file());
}

#[test]
fn test_file_store_reuses_experiment_across_trackers() {
    let dir  = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();

    let first = {
        let mut t = ExperimentTracker::new("x", FileStore::new(&root));
        let e = t.set_experiment("exp").unwrap();
        t.start_run(&e).unwrap().end(RunStatus::Finished).unwrap();
        e
    };

    let mut t = ExperimentTracker::new("x", FileStore::new(&root));
    let again = t.set_experiment("exp").unwrap();
    assert_eq!(first, again);
    t.start_run(&again).unwrap().end(RunStatus::Failed).unwrap();

    let runs = t.backend().list_runs(&again.experiment_id).unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(t.set_experiment("second").unwrap().experiment_id, "2");
}

#[test]
fn test_file_store_missing_run() {
    let dir   = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    assert!(matches!(
        store.load_run("1", "nope"),
        Err(TrackingStorageError::RunNotFound(_))
    ));
    assert!(store.list_runs("1").unwrap().is_empty());
}
