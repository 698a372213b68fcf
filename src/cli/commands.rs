// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Argument structs for both binaries:
//
//   iris-run    <train|evaluate> [--data] [--model-path]
//               [--tracking-uri] [--experiment]
//   poison-data --level <INT> [--data]
//
// Each struct converts into its application-layer config, so
// Layer 2 never sees clap types.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, ValueEnum};

use crate::application::{
    evaluate_use_case::EvaluateConfig,
    poison_use_case::PoisonConfig,
    shared::{DEFAULT_DATA_PATH, DEFAULT_EXPERIMENT, DEFAULT_MODEL_PATH},
    train_use_case::TrainConfig,
};
use crate::infra::tracking::DEFAULT_TRACKING_URI;

/// Which half of the pipeline to run
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Train a model, track the run and save a local copy
    Train,

    /// Score the saved model on the test partition
    Evaluate,
}

/// Arguments shared by both runner modes.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Iris CSV file to read
    #[arg(long, default_value = DEFAULT_DATA_PATH)]
    pub data: String,

    /// Where train writes and evaluate reads the model
    #[arg(long, default_value = DEFAULT_MODEL_PATH)]
    pub model_path: String,

    /// Experiment tracking root (directory or file: URI)
    #[arg(long, env = "MLFLOW_TRACKING_URI", default_value = DEFAULT_TRACKING_URI)]
    pub tracking_uri: String,

    /// Experiment that training runs are recorded under
    #[arg(long, default_value = DEFAULT_EXPERIMENT)]
    pub experiment: String,
}

impl From<RunArgs> for TrainConfig {
    fn from(a: RunArgs) -> Self {
        TrainConfig {
            data_path:       a.data,
            model_path:      a.model_path,
            tracking_uri:    a.tracking_uri,
            experiment_name: a.experiment,
            ..TrainConfig::default()
        }
    }
}

impl From<RunArgs> for EvaluateConfig {
    fn from(a: RunArgs) -> Self {
        EvaluateConfig {
            data_path:  a.data,
            model_path: a.model_path,
            ..EvaluateConfig::default()
        }
    }
}

/// Arguments for `poison-data`.
#[derive(Args, Debug, Clone)]
pub struct PoisonArgs {
    /// Percentage of rows to poison (0-100)
    // Negative values must reach validation instead of failing as unknown flags
    #[arg(long, allow_negative_numbers = true)]
    pub level: i64,

    /// Iris CSV file to overwrite
    #[arg(long, default_value = DEFAULT_DATA_PATH)]
    pub data: String,
}

impl From<PoisonArgs> for PoisonConfig {
    fn from(a: PoisonArgs) -> Self {
        PoisonConfig {
            data_path: a.data,
            level:     a.level,
        }
    }
}
