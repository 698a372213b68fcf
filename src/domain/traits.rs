// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer talks to storage and to the model only
// through these traits:
//   - CsvStore implements TableStore
//   - DecisionTreeClassifier implements Classifier
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use ndarray::ArrayView2;

use crate::domain::table::Table;

// ─── TableStore ───────────────────────────────────────────────────────────────
/// Anything that can read a whole table and write it back in place.
pub trait TableStore {
    /// Read every row of the table.
    fn read_table(&self) -> Result<Table>;

    /// Replace the stored table with `table`.
    fn write_table(&self, table: &Table) -> Result<()>;
}

// ─── Classifier ───────────────────────────────────────────────────────────────
/// A fitted model that maps feature rows to class labels.
pub trait Classifier {
    /// Predict one label per row of `features` (shape `[n_samples, n_features]`).
    fn predict(&self, features: ArrayView2<'_, f64>) -> Vec<String>;
}
