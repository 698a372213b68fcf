// ============================================================
// Layer 3 — Raw Table
// ============================================================
// A CSV file held as text cells: one header row and a list of
// data rows. Cells stay as strings so that rewriting the file
// only changes the cells somebody actually touched.

use serde::{Deserialize, Serialize};

/// A flat table of string cells with a header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Column names in file order
    pub headers: Vec<String>,

    /// Data rows, each with exactly `headers.len()` cells
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Position of the column called `name`, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Number of data rows (the header is not counted)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
