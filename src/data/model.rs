use std::collections::BTreeMap;

use crate::error::{MadrigalError, Result};

/// Name of the record-number column that groups rows into records.
pub const RECNO_COLUMN: &str = "RECNO";

// ---------------------------------------------------------------------------
// Table – one loaded Madrigal export, reshaped column-wise
// ---------------------------------------------------------------------------

/// A Madrigal row table reshaped into per-column arrays.
///
/// `column_names` preserves the order declared by the file's metadata
/// ("Data Parameters"); `columns` maps each of those names to a dense
/// `f64` array with one entry per source row. Every array has the same
/// length. All values are stored as `f64` regardless of the source's
/// physical type, so integer-like columns (YEAR, RECNO, ...) must be
/// truncated by consumers that need integers.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Ordered column catalog from the file's metadata section.
    column_names: Vec<String>,
    /// column_name → values, all of length `n_rows`.
    columns: BTreeMap<String, Vec<f64>>,
    n_rows: usize,
}

impl Table {
    /// Assemble a table from the ordered catalog and the per-column arrays.
    /// Callers (the loaders) guarantee the arrays already share one length.
    pub(crate) fn new(column_names: Vec<String>, columns: BTreeMap<String, Vec<f64>>) -> Self {
        let n_rows = columns.values().next().map_or(0, Vec::len);
        debug_assert!(columns.values().all(|v| v.len() == n_rows));
        Table {
            column_names,
            columns,
            n_rows,
        }
    }

    /// Ordered column catalog, as declared by the source file.
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Number of rows in the source table.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Whether the table holds any rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Look up one column's values by name.
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.columns
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| MadrigalError::UnknownColumn {
                name: name.to_string(),
            })
    }

    /// The RECNO column, which partitions rows into records.
    pub fn recnos(&self) -> Result<&[f64]> {
        self.column(RECNO_COLUMN)
    }
}
