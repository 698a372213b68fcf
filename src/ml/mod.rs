// ============================================================
// Layer 5 — ML / Model Layer
// ============================================================
// The classifier and the two things done with it:
//
//   model.rs      — CART decision tree (Gini), fit + predict,
//                   serialisable with serde
//
//   trainer.rs    — fits the tree on the training partition
//
//   inferencer.rs — predicts a partition and scores it
//                   (accuracy + classification report)

/// Decision tree classifier
pub mod model;

/// Model fitting
pub mod trainer;

/// Prediction and scoring
pub mod inferencer;
