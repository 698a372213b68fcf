// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by the application layer:
//
//   checkpoint.rs — the local model artifact
//                   (artifacts/model.json), saved by `train`
//                   and loaded by `evaluate`
//
//   metrics.rs    — accuracy and the per-class
//                   classification report
//
//   tracking/     — experiment tracker: experiments, runs,
//                   params, metrics, artifacts, logged models
//
//   logging.rs    — tracing subscriber setup for both binaries
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Local model artifact saving and loading
pub mod checkpoint;

/// Accuracy and classification report
pub mod metrics;

/// Experiment run tracking
pub mod tracking;

/// Global tracing subscriber
pub mod logging;
