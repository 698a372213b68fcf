// ============================================================
// Layer 4 — CSV Store
// ============================================================
// Reads and writes the dataset file as a comma-separated table
// with a header row.
//
// Format rules:
//   - the first non-blank line is the header
//   - every data row must have as many cells as the header
//   - blank lines are skipped, CRLF line endings are accepted
//   - cells are trimmed; quoting is not supported (the Iris
//     file never needs it)
//
// Writing replaces the whole file. There is no backup: the
// poisoning workflow overwrites the dataset on purpose.
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs,
    path::PathBuf,
};

use crate::domain::table::Table;
use crate::domain::traits::TableStore;

/// Errors raised while parsing CSV text.
#[derive(Debug, thiserror::Error)]
pub enum CsvError {
    #[error("CSV input has no header row")]
    MissingHeader,

    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line:     usize,
        expected: usize,
        found:    usize,
    },
}

/// A CSV table stored at a fixed path on disk.
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sibling file the new contents are written to before the rename
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl TableStore for CsvStore {
    fn read_table(&self) -> Result<Table> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read dataset '{}'", self.path.display()))?;

        let table = parse_csv(&text)
            .with_context(|| format!("Malformed dataset '{}'", self.path.display()))?;

        tracing::debug!(
            "Read {} rows x {} columns from '{}'",
            table.len(),
            table.headers.len(),
            self.path.display()
        );
        Ok(table)
    }

    // The original file is only replaced once the full contents are on disk
    fn write_table(&self, table: &Table) -> Result<()> {
        let staging = self.staging_path();
        fs::write(&staging, render_csv(table))
            .with_context(|| format!("Cannot write dataset '{}'", staging.display()))?;

        if let Err(e) = fs::rename(&staging, &self.path) {
            let _ = fs::remove_file(&staging);
            return Err(e)
                .with_context(|| format!("Cannot replace dataset '{}'", self.path.display()));
        }

        tracing::debug!("Wrote {} rows to '{}'", table.len(), self.path.display());
        Ok(())
    }
}

/// Parse CSV text into a `Table`.
pub fn parse_csv(text: &str) -> Result<Table, CsvError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim_end_matches('\r')))
        .filter(|(_, l)| !l.trim().is_empty());

    let (_, header_line) = lines.next().ok_or(CsvError::MissingHeader)?;
    let headers = split_fields(header_line);

    let mut rows = Vec::new();
    for (line, raw) in lines {
        let cells = split_fields(raw);
        if cells.len() != headers.len() {
            return Err(CsvError::FieldCount {
                line,
                expected: headers.len(),
                found:    cells.len(),
            });
        }
        rows.push(cells);
    }

    Ok(Table::new(headers, rows))
}

/// Render a `Table` as CSV text, one row per line, trailing newline.
pub fn render_csv(table: &Table) -> String {
    let mut out = table.headers.join(",");
    out.push('\n');
    for row in &table.rows {
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

fn split_fields(line: &str) -> Vec<String> {
    line.split(',').map(|c| c.trim().to_string()).collect()
}
