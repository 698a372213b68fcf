// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the CSV file on disk and the matrices the
// model consumes:
//
//   data/iris.csv
//       │
//       ▼
//   CsvStore          → reads/writes the file as a Table
//       │
//       ├──► Poisoner → corrupts feature cells in place
//       │
//       ▼
//   IrisDataset       → feature matrix + labels
//       │
//       ▼
//   stratified_split  → (train, test) with class proportions kept
//
// Reference: Rust Book §13 (Iterators and Closures)

/// CSV file reading and writing
pub mod loader;

/// Typed feature matrix + labels
pub mod dataset;

/// Seeded stratified train/test split
pub mod splitter;

/// In-range random corruption of feature cells
pub mod poisoner;
