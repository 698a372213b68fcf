// ============================================================
// Layer 5 — Inference / Evaluation
// ============================================================
// Runs a fitted classifier over a labelled partition and scores
// the predictions. Used by both modes: train scores the fresh
// model, evaluate scores the model reloaded from disk.

use anyhow::Result;

use crate::data::dataset::IrisDataset;
use crate::domain::traits::Classifier;
use crate::infra::metrics::{accuracy, ClassificationReport};

/// Predictions and scores for one partition.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub predictions: Vec<String>,
    pub accuracy:    f64,
    pub report:      ClassificationReport,
}

/// Wraps any classifier for scoring.
pub struct Inferencer<'a, C: Classifier> {
    model: &'a C,
}

impl<'a, C: Classifier> Inferencer<'a, C> {
    pub fn new(model: &'a C) -> Self {
        Self { model }
    }

    /// Predict labels for every row of `data`.
    pub fn predict(&self, data: &IrisDataset) -> Vec<String> {
        self.model.predict(data.features())
    }

    /// Predict `data` and score the predictions against its labels.
    pub fn evaluate(&self, data: &IrisDataset) -> Result<Evaluation> {
        let predictions = self.predict(data);
        let accuracy    = accuracy(data.labels(), &predictions)?;
        let report      = ClassificationReport::new(data.labels(), &predictions)?;

        tracing::info!("Accuracy on {} rows: {:.3}", data.len(), accuracy);
        Ok(Evaluation { predictions, accuracy, report })
    }
}
