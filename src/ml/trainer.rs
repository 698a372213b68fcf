// ============================================================
// Layer 5 — Training
// ============================================================
// Fits the decision tree on the training partition.
//
// Training is deterministic: the split seed fixes the partition
// and the linfa tree has no random component, so two runs over
// the same data give the same model, byte for byte once serialised.

use anyhow::{Context, Result};

use crate::data::dataset::IrisDataset;
use crate::domain::iris::FEATURE_COLUMNS;
use crate::ml::model::{DecisionTreeClassifier, DecisionTreeConfig};

/// Fit a decision tree on `train`.
pub fn fit_model(config: &DecisionTreeConfig, train: &IrisDataset) -> Result<DecisionTreeClassifier> {
    tracing::info!(
        "Training decision tree (max_depth={:?}, random_state={}) on {} rows",
        config.max_depth,
        config.random_state,
        train.len(),
    );

    let model = config
        .fit(train.features(), train.labels(), &FEATURE_COLUMNS)
        .context("Decision tree training failed")?;

    tracing::info!(
        "Tree ready: depth {}, {} leaves, classes {:?}",
        model.depth(),
        model.n_leaves(),
        model.classes(),
    );
    Ok(model)
}
