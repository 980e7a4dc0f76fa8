use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, MadrigalError>;

/// Everything that can go wrong while reading a Madrigal export or
/// deriving views from it. Errors surface immediately to the caller;
/// nothing is retried or recovered internally.
#[derive(Debug, Error)]
pub enum MadrigalError {
    /// The file could not be opened or read.
    #[error("cannot access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The path does not carry an extension the loader knows how to read.
    #[error("unsupported file extension: .{extension}")]
    UnsupportedFormat { extension: String },

    /// Parquet footer or record batches could not be decoded.
    #[error("parquet read error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Arrow-level failure while materializing record batches.
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Malformed CSV structure or a cell that is not a number.
    #[error("csv read error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON document missing the expected Madrigal structure.
    #[error("json read error: {0}")]
    Json(#[from] serde_json::Error),

    /// A text cell that should hold a number does not parse as one.
    #[error("row {row}, column {column}: '{value}' is not a number")]
    NonNumeric {
        row: usize,
        column: String,
        value: String,
    },

    /// A row's field count does not match the column catalog.
    #[error("row {row}: expected {expected} fields per the column catalog, found {found}")]
    SchemaMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Lookup of a column name that is not in the table.
    #[error("unknown column: {name}")]
    UnknownColumn { name: String },

    /// Record groups are ragged, so no rectangular image exists.
    #[error(
        "record {recno} has {found} bins but the first record has {expected}; \
         image would not be rectangular"
    )]
    ShapeMismatch {
        recno: f64,
        expected: usize,
        found: usize,
    },

    /// Altitude consistency check failed across records.
    #[error(
        "altitude axis of record {recno} differs from the first record at \
         bin {index} (difference {difference})"
    )]
    Validation {
        recno: f64,
        index: usize,
        difference: f64,
    },

    /// The six date/time columns do not name a valid calendar instant.
    #[error(
        "record {recno}: {year:04}-{month:02}-{day:02} \
         {hour:02}:{minute:02}:{second:02} is not a valid date/time"
    )]
    InvalidDate {
        recno: f64,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_context() {
        let err = MadrigalError::SchemaMismatch {
            row: 3,
            expected: 12,
            found: 11,
        };
        assert_eq!(
            err.to_string(),
            "row 3: expected 12 fields per the column catalog, found 11"
        );

        let err = MadrigalError::UnknownColumn {
            name: "VIPN2".into(),
        };
        assert_eq!(err.to_string(), "unknown column: VIPN2");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<MadrigalError>();
        assert_sync::<MadrigalError>();
    }
}
