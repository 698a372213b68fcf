// ============================================================
// Layer 4 — Stratified Train/Test Splitter
// ============================================================
// Splits the dataset into a training partition and a test
// partition while keeping the class proportions of the full
// dataset in both.
//
// How the test rows are chosen:
//   1. n_test = ceil(test_fraction * N), n_train = N - n_test
//   2. each class gets floor(class_count * n_test / N) test rows;
//      the rows still missing go to the classes with the largest
//      remainder (ties to the class that sorts first)
//   3. inside each class the rows are shuffled with a StdRng
//      seeded from `seed`, and the first k become test rows
//   4. both partitions are shuffled once more with the same RNG
//
// The RNG is seeded explicitly, so the same seed and the same
// data always give the same partitions. Evaluate mode relies on
// this to rebuild the exact test set training used.
//
// Reference: rand crate documentation (SeedableRng, SliceRandom)

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::data::dataset::IrisDataset;

/// Parameters of the stratified split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Share of rows that go to the test partition, in (0, 1)
    pub test_fraction: f64,

    /// Seed of the shuffling RNG
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.4,
            seed:          42,
        }
    }
}

/// Errors raised when a dataset cannot be split as requested.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    #[error("test fraction must be in (0, 1), got {0}")]
    InvalidFraction(f64),

    #[error("class '{class}' has {count} member(s); stratification needs at least 2")]
    ClassTooSmall { class: String, count: usize },

    #[error("{partition} partition of {size} rows cannot hold {classes} classes")]
    PartitionTooSmall {
        partition: &'static str,
        size:      usize,
        classes:   usize,
    },
}

/// Split `dataset` into `(train, test)` keeping class proportions.
pub fn stratified_split(
    dataset: &IrisDataset,
    config:  &SplitConfig,
) -> Result<(IrisDataset, IrisDataset), SplitError> {
    if !(config.test_fraction > 0.0 && config.test_fraction < 1.0) {
        return Err(SplitError::InvalidFraction(config.test_fraction));
    }

    // Row indices per class, classes in sorted order
    let mut by_class: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, label) in dataset.labels().iter().enumerate() {
        by_class.entry(label.as_str()).or_default().push(i);
    }
    if let Some((class, rows)) = by_class.iter().find(|(_, rows)| rows.len() < 2) {
        return Err(SplitError::ClassTooSmall {
            class: class.to_string(),
            count: rows.len(),
        });
    }

    let total   = dataset.len();
    let n_test  = (config.test_fraction * total as f64).ceil() as usize;
    let n_train = total - n_test;
    let classes = by_class.len();
    if n_test < classes {
        return Err(SplitError::PartitionTooSmall { partition: "test", size: n_test, classes });
    }
    if n_train < classes {
        return Err(SplitError::PartitionTooSmall { partition: "train", size: n_train, classes });
    }

    let counts: Vec<usize> = by_class.values().map(Vec::len).collect();
    let test_counts        = allocate_test_counts(&counts, n_test);

    let mut rng       = StdRng::seed_from_u64(config.seed);
    let mut train_idx = Vec::with_capacity(n_train);
    let mut test_idx  = Vec::with_capacity(n_test);

    for (mut rows, k) in by_class.into_values().zip(test_counts) {
        rows.shuffle(&mut rng);
        test_idx.extend_from_slice(&rows[..k]);
        train_idx.extend_from_slice(&rows[k..]);
    }
    train_idx.shuffle(&mut rng);
    test_idx.shuffle(&mut rng);

    tracing::debug!(
        "Stratified split: {} train, {} test ({} classes, seed {})",
        train_idx.len(),
        test_idx.len(),
        classes,
        config.seed,
    );

    Ok((dataset.select(&train_idx), dataset.select(&test_idx)))
}

/// Share `n_test` rows between classes proportionally to `counts`.
///
/// Integer arithmetic throughout: floor shares first, then one extra
/// row each for the classes with the largest remainders.
fn allocate_test_counts(counts: &[usize], n_test: usize) -> Vec<usize> {
    let total: usize = counts.iter().sum();
    let mut shares: Vec<usize> = counts.iter().map(|&c| c * n_test / total).collect();

    let assigned: usize = shares.iter().sum();
    let mut order: Vec<usize> = (0..counts.len()).collect();
    // Stable sort keeps class order among equal remainders
    order.sort_by_key(|&i| std::cmp::Reverse(counts[i] * n_test % total));

    for &i in order.iter().take(n_test - assigned) {
        shares[i] += 1;
    }
    shares
}
