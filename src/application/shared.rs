// ============================================================
// Layer 2 — Shared Preamble
// ============================================================
// Both runner modes start the same way: load the dataset and
// split it with the fixed split parameters. Evaluate mode must
// see exactly the test rows that train mode scored, so both go
// through this one function.

use anyhow::{Context, Result};

use crate::data::{
    dataset::IrisDataset,
    loader::CsvStore,
    splitter::{stratified_split, SplitConfig},
};
use crate::domain::traits::TableStore;

/// Dataset read and overwritten by the tools
pub const DEFAULT_DATA_PATH: &str = "data/iris.csv";

/// Local copy of the trained model
pub const DEFAULT_MODEL_PATH: &str = "artifacts/model.json";

/// Experiment that training runs are recorded under
pub const DEFAULT_EXPERIMENT: &str = "IRIS_Classifier_Pipeline";

/// Read a table from `store` and type it as an Iris dataset.
pub fn load_dataset(store: &impl TableStore) -> Result<IrisDataset> {
    let table = store.read_table()?;
    let dataset = IrisDataset::from_table(&table).context("Dataset does not have the Iris layout")?;
    Ok(dataset)
}

/// Load `data_path` and split it into `(train, test)`.
pub fn prepare_partitions(data_path: &str, split: &SplitConfig) -> Result<(IrisDataset, IrisDataset)> {
    tracing::info!("Loading data from '{}'", data_path);
    let dataset = load_dataset(&CsvStore::new(data_path))?;
    tracing::info!(
        "Loaded {} rows, classes: {}",
        dataset.len(),
        dataset.classes().join(", ")
    );

    tracing::info!("Splitting data...");
    let (train, test) = stratified_split(&dataset, split).context("Cannot split dataset")?;
    tracing::info!(
        "Split {} rows: {} train, {} test (test fraction {}, seed {})",
        dataset.len(),
        train.len(),
        test.len(),
        split.test_fraction,
        split.seed,
    );
    Ok((train, test))
}
