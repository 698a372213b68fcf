//! Runs the `iris-run` binary and checks what reaches stdout.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn scratch() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("data")).unwrap();
    fs::copy(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("data/iris.csv"),
        dir.path().join("data/iris.csv"),
    )
    .unwrap();
    dir
}

fn iris_run(dir: &Path, mode: &str) -> Output {
    Command::new(env!("CARGO_BIN_EXE_iris-run"))
        .arg(mode)
        .current_dir(dir)
        .env_remove("MLFLOW_TRACKING_URI")
        .env("RUST_LOG", "iris_pipeline=info")
        .output()
        .unwrap()
}

#[test]
fn evaluate_before_train_prints_nothing() {
    let dir = scratch();
    let out = iris_run(dir.path(), "evaluate");

    assert!(!out.status.success());
    assert!(out.stdout.is_empty(), "stdout: {}", String::from_utf8_lossy(&out.stdout));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Run 'train'"));
}

#[test]
fn evaluate_after_train_prints_only_markdown() {
    let dir = scratch();
    let train = iris_run(dir.path(), "train");
    assert!(train.status.success(), "stderr: {}", String::from_utf8_lossy(&train.stderr));
    assert!(String::from_utf8_lossy(&train.stdout).contains("mlruns/#/experiments/1/runs/"));
    assert!(dir.path().join("artifacts/model.json").is_file());

    let out = iris_run(dir.path(), "evaluate");
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.starts_with("**Accuracy:** "));
    assert!(stdout.contains("\n\n**Classification Report:**\n```\n"));
    assert!(stdout.ends_with("\n```\n"));
}

#[test]
fn unknown_mode_is_rejected() {
    let dir = scratch();
    let out = iris_run(dir.path(), "predict");
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
}
