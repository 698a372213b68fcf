// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and traits describing the Iris workflow:
// the raw CSV table, the column names, the fixed feature
// ranges used for poisoning, and the seams other layers
// implement (table storage, classification).
//
// Rules for this layer:
//   - NO file I/O
//   - NO model fitting code
//   - Only plain structs, constants and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A header + rows view of a CSV file
pub mod table;

// Iris column names and the valid feature range table
pub mod iris;

// Core abstractions (traits) that other layers implement
pub mod traits;
