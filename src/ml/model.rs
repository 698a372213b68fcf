// ============================================================
// Layer 5 — Decision Tree Classifier
// ============================================================
// Wraps a `linfa-trees` CART tree (Gini impurity) with the
// string labels and feature names of the Iris dataset.
//
// linfa works on class indices, so fitting maps each species to
// its position in the sorted class list and prediction maps the
// indices back.
//
// The fitted tree is deterministic: features are visited in
// column order. `random_state` is kept in the config so every
// run records the seed it was trained with.

use linfa::DatasetBase;
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::{Array1, ArrayView2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::traits::Classifier;

/// Errors raised while fitting the tree.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("cannot fit a tree on an empty training set")]
    EmptyTrainingSet,

    #[error("{features} feature rows but {labels} labels")]
    LengthMismatch { features: usize, labels: usize },

    #[error("expected {expected} feature names, got {found}")]
    FeatureNames { expected: usize, found: usize },

    #[error("row {row}, feature {feature}: value is not finite")]
    NonFinite { row: usize, feature: usize },

    #[error("decision tree fitting failed: {0}")]
    Fit(#[from] linfa::Error),
}

// ─── Config ───────────────────────────────────────────────────────────────────
/// Hyperparameters of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionTreeConfig {
    /// Maximum depth of the tree; `None` grows until leaves are pure
    pub max_depth: Option<usize>,

    /// Seed recorded with the run
    pub random_state: u64,
}

impl DecisionTreeConfig {
    pub fn new(max_depth: Option<usize>, random_state: u64) -> Self {
        Self { max_depth, random_state }
    }

    /// Fit a tree on `features` (`[n_samples, n_features]`) and `labels`.
    pub fn fit(
        &self,
        features:      ArrayView2<'_, f64>,
        labels:        &[String],
        feature_names: &[&str],
    ) -> Result<DecisionTreeClassifier, ModelError> {
        let (n_rows, n_features) = features.dim();
        if n_rows == 0 {
            return Err(ModelError::EmptyTrainingSet);
        }
        if n_rows != labels.len() {
            return Err(ModelError::LengthMismatch { features: n_rows, labels: labels.len() });
        }
        if feature_names.len() != n_features {
            return Err(ModelError::FeatureNames { expected: n_features, found: feature_names.len() });
        }
        if let Some(((row, feature), _)) = features.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(ModelError::NonFinite { row, feature });
        }

        let classes: Vec<String> = labels
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let targets: Array1<usize> = labels
            .iter()
            .map(|l| classes.binary_search(l).unwrap_or_default())
            .collect();

        let dataset = DatasetBase::new(features.to_owned(), targets);
        let params  = DecisionTree::<f64, usize>::params()
            .split_quality(SplitQuality::Gini)
            .max_depth(self.max_depth);
        let tree = linfa::traits::Fit::fit(&params, &dataset).map_err(ModelError::Fit)?;

        Ok(DecisionTreeClassifier {
            config:        *self,
            classes,
            feature_names: feature_names.iter().map(|s| s.to_string()).collect(),
            tree,
        })
    }
}

// ─── Fitted model ─────────────────────────────────────────────────────────────
/// A fitted tree plus the label and column names it was trained with.
#[derive(Debug, Serialize, Deserialize)]
pub struct DecisionTreeClassifier {
    config:        DecisionTreeConfig,
    classes:       Vec<String>,
    feature_names: Vec<String>,
    tree:          DecisionTree<f64, usize>,
}

impl DecisionTreeClassifier {
    pub fn config(&self) -> &DecisionTreeConfig {
        &self.config
    }

    /// Class labels, sorted; predictions are drawn from this list
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn depth(&self) -> usize {
        self.tree.max_depth()
    }

    pub fn n_leaves(&self) -> usize {
        self.tree.num_leaves()
    }
}

impl Classifier for DecisionTreeClassifier {
    fn predict(&self, features: ArrayView2<'_, f64>) -> Vec<String> {
        let indices: Array1<usize> = linfa::traits::Predict::predict(&self.tree, &features);
        indices
            .iter()
            .map(|&i| self.classes.get(i).cloned().unwrap_or_default())
            .collect()
    }
}
