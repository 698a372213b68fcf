// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// one goal per use case: poison the dataset, train a model,
// or evaluate the saved model.
//
// Rules for this layer:
//   - No ML math or model code here
//   - No printing to stdout here (that's Layer 1)
//   - No direct file access (that's Layer 4 and 6)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Dataset loading and splitting shared by train and evaluate
pub mod shared;

// In-place dataset corruption
pub mod poison_use_case;

// Training with experiment tracking
pub mod train_use_case;

// Scoring the saved model
pub mod evaluate_use_case;
