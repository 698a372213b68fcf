// ============================================================
// Layer 2 — PoisonUseCase
// ============================================================
// Corrupts the dataset file in place:
//
//   Step 1: Validate the level         (before any I/O)
//   Step 2: Read the CSV table         (Layer 4 - data)
//   Step 3: Poison feature cells       (Layer 4 - data)
//   Step 4: Overwrite the file         (Layer 4 - data)
//
// Level 0 stops after step 2 and never writes, so the file
// stays byte-identical.

use anyhow::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::application::shared::DEFAULT_DATA_PATH;
use crate::data::{
    loader::CsvStore,
    poisoner::{PoisonSummary, Poisoner},
};
use crate::domain::traits::TableStore;

// ─── Poison Configuration ────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoisonConfig {
    pub data_path: String,
    /// Percentage of rows to corrupt; validated by the use case
    pub level:     i64,
}

impl Default for PoisonConfig {
    fn default() -> Self {
        Self {
            data_path: DEFAULT_DATA_PATH.to_string(),
            level:     0,
        }
    }
}

// ─── PoisonUseCase ───────────────────────────────────────────────────────────
pub struct PoisonUseCase {
    config: PoisonConfig,
}

impl PoisonUseCase {
    pub fn new(config: PoisonConfig) -> Self {
        Self { config }
    }

    /// Poison the configured file with an unseeded RNG.
    pub fn execute(&self) -> Result<PoisonSummary> {
        self.execute_with_rng(&mut rand::thread_rng())
    }

    /// Poison the configured file drawing randomness from `rng`.
    pub fn execute_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<PoisonSummary> {
        // ── Step 1: Validate before touching the file ─────────────────────────
        let poisoner = Poisoner::new(self.config.level)?;

        let store = CsvStore::new(&self.config.data_path);
        self.poison_store(&poisoner, &store, rng)
    }

    fn poison_store<S: TableStore, R: Rng + ?Sized>(
        &self,
        poisoner: &Poisoner,
        store:    &S,
        rng:      &mut R,
    ) -> Result<PoisonSummary> {
        // ── Step 2: Read the table ────────────────────────────────────────────
        tracing::info!("Loading original data from '{}'", self.config.data_path);
        let mut table = store.read_table()?;

        if poisoner.is_noop() {
            tracing::info!("Poisoning level is 0. No changes will be made.");
            return Ok(PoisonSummary {
                total_rows:    table.len(),
                poisoned_rows: Vec::new(),
            });
        }

        // ── Step 3: Corrupt the selected rows ─────────────────────────────────
        tracing::info!(
            "Poisoning {} out of {} rows ({}%).",
            poisoner.rows_to_poison(table.len()),
            table.len(),
            poisoner.level(),
        );
        let summary = poisoner.poison(&mut table, rng)?;

        // ── Step 4: Overwrite the source file ─────────────────────────────────
        store.write_table(&table)?;
        tracing::info!("Saved poisoned data to '{}'", self.config.data_path);

        Ok(summary)
    }
}
