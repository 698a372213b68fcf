// ============================================================
// Layer 3 — Iris Schema
// ============================================================
// Column names of the Iris CSV file and the fixed valid range of
// each feature. The ranges are the sampling domain for poisoning:
// a poisoned value is always plausible, never out of domain.

/// Number of numeric feature columns
pub const FEATURE_COUNT: usize = 4;

/// Feature columns in the order the model consumes them
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] =
    ["sepal_length", "sepal_width", "petal_length", "petal_width"];

/// The categorical label column
pub const LABEL_COLUMN: &str = "species";

/// Inclusive numeric interval for one feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRange {
    pub name: &'static str,
    pub min:  f64,
    pub max:  f64,
}

impl FeatureRange {
    pub const fn new(name: &'static str, min: f64, max: f64) -> Self {
        Self { name, min, max }
    }

    /// True if `value` lies in `[min, max]`
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Valid range of every feature, same order as `FEATURE_COLUMNS`.
pub const FEATURE_RANGES: [FeatureRange; FEATURE_COUNT] = [
    FeatureRange::new("sepal_length", 4.0, 8.0),
    FeatureRange::new("sepal_width",  2.0, 5.0),
    FeatureRange::new("petal_length", 1.0, 7.0),
    FeatureRange::new("petal_width",  0.1, 3.0),
];
