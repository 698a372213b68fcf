// ============================================================
// Layer 4 — Data Poisoner
// ============================================================
// Corrupts a percentage of the dataset rows by overwriting all
// four feature cells with random values drawn uniformly from the
// feature's valid range (see domain::iris::FEATURE_RANGES).
//
// The corrupted values are in range, so range-based validation
// cannot tell them apart from real measurements. The label cell
// and every other column are left exactly as they were.
//
// Row count: floor(level / 100 * N), computed with integers so
// that e.g. level 57 on 100 rows gives 57 and not 56.
// Row choice: uniform, without replacement.
//
// The caller supplies the RNG. The CLI passes an unseeded one,
// so two poisoning runs never corrupt the same rows.

use rand::{seq::index, Rng};

use crate::domain::iris::{FeatureRange, FEATURE_RANGES};
use crate::domain::table::Table;

/// Errors raised by the poisoner.
#[derive(Debug, thiserror::Error)]
pub enum PoisonError {
    #[error("Poisoning level must be between 0 and 100, got {0}")]
    InvalidLevel(i64),

    #[error("dataset has no '{0}' column to poison")]
    MissingColumn(&'static str),
}

/// What a poisoning pass changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoisonSummary {
    /// Data rows in the table
    pub total_rows: usize,

    /// Indices of the rows that were overwritten, ascending
    pub poisoned_rows: Vec<usize>,
}

/// A validated poisoning level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Poisoner {
    level: u8,
}

impl Poisoner {
    /// Accepts levels in `[0, 100]`.
    pub fn new(level: i64) -> Result<Self, PoisonError> {
        match u8::try_from(level) {
            Ok(l) if l <= 100 => Ok(Self { level: l }),
            _ => Err(PoisonError::InvalidLevel(level)),
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn is_noop(&self) -> bool {
        self.level == 0
    }

    /// floor(level / 100 * total_rows)
    pub fn rows_to_poison(&self, total_rows: usize) -> usize {
        usize::from(self.level) * total_rows / 100
    }

    /// Overwrite the feature cells of a random subset of rows in `table`.
    pub fn poison<R: Rng + ?Sized>(
        &self,
        table: &mut Table,
        rng:   &mut R,
    ) -> Result<PoisonSummary, PoisonError> {
        let columns = feature_columns(table)?;
        let total   = table.len();
        let amount  = self.rows_to_poison(total);

        let mut rows = index::sample(rng, total, amount).into_vec();
        rows.sort_unstable();

        for &r in &rows {
            for &(col, range) in &columns {
                table.rows[r][col] = format_value(draw(range, rng));
            }
        }

        Ok(PoisonSummary {
            total_rows:    total,
            poisoned_rows: rows,
        })
    }
}

/// Column index of every feature, paired with its range.
fn feature_columns(table: &Table) -> Result<Vec<(usize, &'static FeatureRange)>, PoisonError> {
    FEATURE_RANGES
        .iter()
        .map(|range| {
            table
                .column_index(range.name)
                .map(|idx| (idx, range))
                .ok_or(PoisonError::MissingColumn(range.name))
        })
        .collect()
}

fn draw<R: Rng + ?Sized>(range: &FeatureRange, rng: &mut R) -> f64 {
    rng.gen_range(range.min..=range.max)
}

/// Shortest text that parses back to the same float; whole numbers keep ".0".
fn format_value(value: f64) -> String {
    format!("{value:?}")
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::IrisDataset;
    use crate::domain::iris::{FEATURE_COLUMNS, LABEL_COLUMN};
    use rand::{rngs::StdRng, SeedableRng};

    /// `n` identical rows; label and an extra `id` column per row
    fn table(n: usize) -> Table {
        let mut headers: Vec<String> = FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect();
        headers.push(LABEL_COLUMN.into());
        headers.push("id".into());
        let rows = (0..n)
            .map(|i| {
                vec![
                    "5.1".into(), "3.5".into(), "1.4".into(), "0.2".into(),
                    format!("class{}", i % 3),
                    i.to_string(),
                ]
            })
            .collect();
        Table::new(headers, rows)
    }

    #[test]
    fn test_level_bounds() {
        assert!(Poisoner::new(0).is_ok());
        assert!(Poisoner::new(100).is_ok());
        assert!(matches!(Poisoner::new(150), Err(PoisonError::InvalidLevel(150))));
        assert!(matches!(Poisoner::new(-5), Err(PoisonError::InvalidLevel(-5))));
        assert!(matches!(Poisoner::new(101), Err(PoisonError::InvalidLevel(101))));
    }

    #[test]
    fn test_rows_to_poison_is_floor() {
        for level in 0..=100 {
            let p = Poisoner::new(level).unwrap();
            for n in [0usize, 1, 7, 100, 150] {
                let expected = (level as usize * n) / 100;
                assert_eq!(p.rows_to_poison(n), expected, "level {level}, n {n}");
            }
        }
        assert_eq!(Poisoner::new(57).unwrap().rows_to_poison(100), 57);
        assert_eq!(Poisoner::new(10).unwrap().rows_to_poison(150), 15);
    }

    #[test]
    fn test_poisons_exact_count_of_distinct_rows() {
        let mut rng = StdRng::seed_from_u64(7);
        for level in [1, 5, 10, 33, 50, 99, 100] {
            let mut t = table(150);
            let summary = Poisoner::new(level).unwrap().poison(&mut t, &mut rng).unwrap();
            let mut rows = summary.poisoned_rows.clone();
            rows.dedup();
            assert_eq!(rows.len(), level as usize * 150 / 100);
            assert_eq!(summary.total_rows, 150);
        }
    }

    #[test]
    fn test_values_in_range_and_labels_untouched() {
        let original = table(150);
        let mut t    = original.clone();
        let mut rng  = StdRng::seed_from_u64(11);
        Poisoner::new(100).unwrap().poison(&mut t, &mut rng).unwrap();

        let ds = IrisDataset::from_table(&t).unwrap();
        for r in 0..ds.len() {
            for (value, range) in ds.feature_row(r).iter().zip(FEATURE_RANGES.iter()) {
                assert!(range.contains(*value), "{} = {value} out of range", range.name);
            }
        }
        let label = t.column_index(LABEL_COLUMN).unwrap();
        let id    = t.column_index("id").unwrap();
        for (before, after) in original.rows.iter().zip(&t.rows) {
            assert_eq!(before[label], after[label]);
            assert_eq!(before[id], after[id]);
        }
    }

    #[test]
    fn test_unselected_rows_are_unchanged() {
        let original = table(40);
        let mut t    = original.clone();
        let mut rng  = StdRng::seed_from_u64(5);
        let summary  = Poisoner::new(25).unwrap().poison(&mut t, &mut rng).unwrap();
        for r in 0..40 {
            if !summary.poisoned_rows.contains(&r) {
                assert_eq!(original.rows[r], t.rows[r]);
            }
        }
    }

    #[test]
    fn test_missing_feature_column() {
        let mut t = Table::new(vec!["species".into()], vec![vec!["setosa".into()]]);
        let mut rng = StdRng::seed_from_u64(1);
        let err = Poisoner::new(50).unwrap().poison(&mut t, &mut rng).unwrap_err();
        assert!(matches!(err, PoisonError::MissingColumn("sepal_length")));
    }

    #[test]
    fn test_format_value_round_trips() {
        assert_eq!(format_value(5.0), "5.0");
        assert_eq!(format_value(0.1), "0.1");
        let v = 6.123456789;
        assert_eq!(format_value(v).parse::<f64>().unwrap(), v);
    }
}
