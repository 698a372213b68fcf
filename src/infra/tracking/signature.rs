//! Model input/output signature and input example.
//!
//! Logged next to a model so a consumer knows which columns the model
//! expects and what it returns without loading it.

use serde::{Deserialize, Serialize};

/// Column data type in a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Double,
    Long,
    String,
}

impl ColumnType {
    /// Narrowest type every value parses as.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut all_long   = true;
        let mut all_double = true;
        let mut any        = false;
        for v in values {
            any = true;
            all_long   &= v.parse::<i64>().is_ok();
            all_double &= v.parse::<f64>().is_ok();
        }
        match (any, all_long, all_double) {
            (true, true, _) => ColumnType::Long,
            (true, false, true) => ColumnType::Double,
            _ => ColumnType::String,
        }
    }
}

/// One column of a signature; outputs may be unnamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty:   ColumnType,
}

/// Expected input columns and produced output columns of a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSignature {
    pub inputs:  Vec<ColumnSpec>,
    pub outputs: Vec<ColumnSpec>,
}

impl ModelSignature {
    /// Numeric named inputs, one unnamed output typed from `predictions`.
    pub fn infer(input_columns: &[&str], predictions: &[String]) -> Self {
        Self {
            inputs: input_columns
                .iter()
                .map(|name| ColumnSpec {
                    name: Some(name.to_string()),
                    ty:   ColumnType::Double,
                })
                .collect(),
            outputs: vec![ColumnSpec {
                name: None,
                ty:   ColumnType::infer(predictions.iter().map(String::as_str)),
            }],
        }
    }
}

/// A sample of model input in column/row ("split") orientation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputExample {
    pub columns: Vec<String>,
    pub data:    Vec<Vec<f64>>,
}

impl InputExample {
    pub fn from_row(columns: &[&str], row: &[f64]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            data:    vec![row.to_vec()],
        }
    }
}
