// ============================================================
// Layer 2 — EvaluateUseCase
// ============================================================
// Scores the locally saved model on the same test partition
// train mode used:
//
//   Step 1: Load the model artifact     (Layer 6 - infra)
//   Step 2: Load + split the dataset    (Layer 4 - data)
//   Step 3: Predict and score           (Layer 5 - ml)
//
// Nothing is tracked. The caller renders the result with
// `render_markdown` once every step has succeeded.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::application::shared::{prepare_partitions, DEFAULT_DATA_PATH, DEFAULT_MODEL_PATH};
use crate::data::splitter::SplitConfig;
use crate::infra::{checkpoint::ModelStore, metrics::ClassificationReport};
use crate::ml::inferencer::{Evaluation, Inferencer};

// ─── Evaluate Configuration ──────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateConfig {
    pub data_path:  String,
    pub model_path: String,
    pub split:      SplitConfig,
}

impl Default for EvaluateConfig {
    fn default() -> Self {
        Self {
            data_path:  DEFAULT_DATA_PATH.to_string(),
            model_path: DEFAULT_MODEL_PATH.to_string(),
            split:      SplitConfig::default(),
        }
    }
}

// ─── EvaluateUseCase ─────────────────────────────────────────────────────────
pub struct EvaluateUseCase {
    config: EvaluateConfig,
}

impl EvaluateUseCase {
    pub fn new(config: EvaluateConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<Evaluation> {
        // ── Step 1: Model first, so a missing artifact is reported as such ────
        let model = ModelStore::new(&self.config.model_path).load()?;

        // ── Step 2: Same partition as training ────────────────────────────────
        let (_, test) = prepare_partitions(&self.config.data_path, &self.config.split)?;

        // ── Step 3: Score ─────────────────────────────────────────────────────
        Inferencer::new(&model).evaluate(&test)
    }
}

/// Markdown block printed by evaluate mode.
pub fn render_markdown(accuracy: f64, report: &ClassificationReport) -> String {
    format!("**Accuracy:** {accuracy:.3}\n\n**Classification Report:**\n```\n{report}\n```\n")
}
