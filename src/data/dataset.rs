// ============================================================
// Layer 4 — Iris Dataset
// ============================================================
// Typed view of the CSV table: a `[n_samples, 4]` feature matrix
// and one species label per row. Columns are found by header
// name, so column order in the file does not matter.

use ndarray::{Array2, ArrayView2, Axis};
use std::collections::BTreeSet;

use crate::domain::iris::{FEATURE_COLUMNS, FEATURE_COUNT, LABEL_COLUMN};
use crate::domain::table::Table;

/// Errors raised while converting a `Table` into an `IrisDataset`.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: column '{column}' is not a number: '{value}'")]
    InvalidNumber {
        row:    usize,
        column: &'static str,
        value:  String,
    },

    #[error("dataset has no rows")]
    Empty,
}

/// Feature matrix plus labels, row-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct IrisDataset {
    features: Array2<f64>,
    labels:   Vec<String>,
}

impl IrisDataset {
    /// Build a dataset from already-parsed parts.
    /// `features` must have one row per label and `FEATURE_COUNT` columns.
    pub fn new(features: Array2<f64>, labels: Vec<String>) -> Self {
        debug_assert_eq!(features.nrows(), labels.len());
        debug_assert_eq!(features.ncols(), FEATURE_COUNT);
        Self { features, labels }
    }

    /// Parse the feature and label columns out of a raw table.
    pub fn from_table(table: &Table) -> Result<Self, DatasetError> {
        if table.is_empty() {
            return Err(DatasetError::Empty);
        }

        let mut feature_idx = [0usize; FEATURE_COUNT];
        for (slot, name) in feature_idx.iter_mut().zip(FEATURE_COLUMNS) {
            *slot = table
                .column_index(name)
                .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))?;
        }
        let label_idx = table
            .column_index(LABEL_COLUMN)
            .ok_or_else(|| DatasetError::MissingColumn(LABEL_COLUMN.to_string()))?;

        let mut features = Array2::<f64>::zeros((table.len(), FEATURE_COUNT));
        let mut labels   = Vec::with_capacity(table.len());

        for (r, row) in table.rows.iter().enumerate() {
            for (f, &col) in feature_idx.iter().enumerate() {
                let raw = &row[col];
                features[[r, f]] = raw.parse::<f64>().map_err(|_| DatasetError::InvalidNumber {
                    row:    r,
                    column: FEATURE_COLUMNS[f],
                    value:  raw.clone(),
                })?;
            }
            labels.push(row[label_idx].clone());
        }

        Ok(Self { features, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Distinct labels in sorted order.
    pub fn classes(&self) -> Vec<String> {
        self.labels
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// One feature row copied out as an array.
    pub fn feature_row(&self, index: usize) -> [f64; FEATURE_COUNT] {
        let row = self.features.row(index);
        std::array::from_fn(|i| row[i])
    }

    /// New dataset holding the given rows, in the given order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            features: self.features.select(Axis(0), indices),
            labels:   indices.iter().map(|&i| self.labels[i].clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv;

    const CSV: &str = "\
sepal_length,sepal_width,petal_length,petal_width,species
5.1,3.5,1.4,0.2,setosa
7.0,3.2,4.7,1.4,versicolor
6.3,3.3,6.0,2.5,virginica
";

    #[test]
    fn test_from_table() {
        let ds = IrisDataset::from_table(&parse_csv(CSV).unwrap()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.feature_row(1), [7.0, 3.2, 4.7, 1.4]);
        assert_eq!(ds.classes(), vec!["setosa", "versicolor", "virginica"]);
    }

    #[test]
    fn test_columns_found_by_name() {
        let csv = "species,petal_width,petal_length,sepal_width,sepal_length\nsetosa,0.2,1.4,3.5,5.1\n";
        let ds  = IrisDataset::from_table(&parse_csv(csv).unwrap()).unwrap();
        assert_eq!(ds.feature_row(0), [5.1, 3.5, 1.4, 0.2]);
    }

    #[test]
    fn test_missing_label_column() {
        let csv = "sepal_length,sepal_width,petal_length,petal_width\n5.1,3.5,1.4,0.2\n";
        let err = IrisDataset::from_table(&parse_csv(csv).unwrap()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn(c) if c == "species"));
    }

    #[test]
    fn test_bad_number() {
        let csv = "sepal_length,sepal_width,petal_length,petal_width,species\n5.1,abc,1.4,0.2,setosa\n";
        let err = IrisDataset::from_table(&parse_csv(csv).unwrap()).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidNumber { row: 0, column: "sepal_width", .. }));
    }

    #[test]
    fn test_select_keeps_rows_aligned() {
        let ds  = IrisDataset::from_table(&parse_csv(CSV).unwrap()).unwrap();
        let sub = ds.select(&[2, 0]);
        assert_eq!(sub.labels(), &["virginica".to_string(), "setosa".to_string()]);
        assert_eq!(sub.feature_row(1), [5.1, 3.5, 1.4, 0.2]);
    }
}
