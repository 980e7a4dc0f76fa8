use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::Table;
use crate::error::{MadrigalError, Result};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read only the column catalog of a Madrigal export. Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` / `.pq` – footer schema field names (recommended)
/// * `.csv` / `.txt`    – header row
/// * `.json`            – the `"Data Parameters"` array
pub fn list_columns(path: &Path) -> Result<Vec<String>> {
    match extension(path).as_str() {
        "parquet" | "pq" => parquet_columns(path),
        "csv" | "txt" => csv_columns(path),
        "json" => json_columns(path),
        other => Err(MadrigalError::UnsupportedFormat {
            extension: other.to_string(),
        }),
    }
}

/// Load a Madrigal export and reshape its row table into column arrays.
///
/// Every call re-reads and re-allocates; nothing is cached. All numeric
/// cells are coerced to `f64` whatever their physical type, and null cells
/// become NaN.
pub fn load_table(path: &Path) -> Result<Table> {
    let table = match extension(path).as_str() {
        "parquet" | "pq" => load_parquet(path),
        "csv" | "txt" => load_csv(path),
        "json" => load_json(path),
        other => Err(MadrigalError::UnsupportedFormat {
            extension: other.to_string(),
        }),
    }?;
    log::debug!(
        "loaded {} rows x {} columns from {}",
        table.n_rows(),
        table.column_names().len(),
        path.display()
    );
    Ok(table)
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Open for read, mapping I/O failures to the crate error.
fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| MadrigalError::FileAccess {
        path: path.to_path_buf(),
        source,
    })
}

/// Zip the ordered catalog with the per-position value arrays.
fn assemble(column_names: Vec<String>, data: Vec<Vec<f64>>) -> Table {
    let columns: BTreeMap<String, Vec<f64>> =
        column_names.iter().cloned().zip(data).collect();
    Table::new(column_names, columns)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Expected schema: one numeric field per Madrigal parameter
/// (Float64/Float32/Int64/Int32), in catalog order. Works with files
/// written by Pandas (`df.to_parquet()`) and Polars (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Table> {
    let file = open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let column_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let n_rows = builder.metadata().file_metadata().num_rows() as usize;

    let mut data: Vec<Vec<f64>> = vec![Vec::with_capacity(n_rows); column_names.len()];
    let reader = builder.build()?;
    for batch_result in reader {
        let batch = batch_result?;
        for (j, values) in data.iter_mut().enumerate() {
            values.extend(numeric_values(batch.column(j), &column_names[j])?);
        }
    }

    Ok(assemble(column_names, data))
}

/// Only the footer metadata is read; the row table is never materialized.
fn parquet_columns(path: &Path) -> Result<Vec<String>> {
    let file = open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    Ok(builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect())
}

/// Coerce one Arrow column to `f64` values, nulls becoming NaN.
fn numeric_values(col: &Arc<dyn Array>, name: &str) -> Result<Vec<f64>> {
    match col.data_type() {
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| downcast_error(name, "Float64Array"))?;
            Ok(arr.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .ok_or_else(|| downcast_error(name, "Float32Array"))?;
            Ok(arr.iter().map(|v| v.map_or(f64::NAN, f64::from)).collect())
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .ok_or_else(|| downcast_error(name, "Int64Array"))?;
            Ok(arr.iter().map(|v| v.map_or(f64::NAN, |i| i as f64)).collect())
        }
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .ok_or_else(|| downcast_error(name, "Int32Array"))?;
            Ok(arr.iter().map(|v| v.map_or(f64::NAN, f64::from)).collect())
        }
        other => Err(MadrigalError::Arrow(ArrowError::SchemaError(format!(
            "column {name} has non-numeric type {other:?}"
        )))),
    }
}

fn downcast_error(name: &str, expected: &str) -> MadrigalError {
    MadrigalError::Arrow(ArrowError::CastError(format!(
        "column {name}: expected {expected}"
    )))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with the parameter names, then one record per
/// table row; every cell must parse as a float.
fn load_csv(path: &Path) -> Result<Table> {
    let file = open(path)?;
    // flexible so that ragged rows reach our own width check below
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);

    let column_names: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut data: Vec<Vec<f64>> = vec![Vec::new(); column_names.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() != column_names.len() {
            return Err(MadrigalError::SchemaMismatch {
                row: row_no,
                expected: column_names.len(),
                found: record.len(),
            });
        }
        for (j, cell) in record.iter().enumerate() {
            let value =
                cell.trim()
                    .parse::<f64>()
                    .map_err(|_| MadrigalError::NonNumeric {
                        row: row_no,
                        column: column_names[j].clone(),
                        value: cell.to_string(),
                    })?;
            data[j].push(value);
        }
    }

    Ok(assemble(column_names, data))
}

fn csv_columns(path: &Path) -> Result<Vec<String>> {
    let file = open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    Ok(reader.headers()?.iter().map(str::to_string).collect())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON document, mirroring the Madrigal HDF5 group names:
///
/// ```json
/// {
///   "Data Parameters": ["YEAR", "MONTH", ..., "RECNO", "GDALT", "VIPN2"],
///   "Table Layout": [
///     [2016.0, 1.0, ..., 1.0, 100.0, 0.12],
///     [2016.0, 1.0, ..., 1.0, 200.0, 0.14]
///   ]
/// }
/// ```
#[derive(Debug, Deserialize)]
struct JsonDocument {
    #[serde(rename = "Data Parameters")]
    parameters: Vec<String>,
    #[serde(rename = "Table Layout")]
    rows: Vec<Vec<f64>>,
}

fn read_json(path: &Path) -> Result<JsonDocument> {
    let text = std::fs::read_to_string(path).map_err(|source| MadrigalError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

fn load_json(path: &Path) -> Result<Table> {
    let doc = read_json(path)?;
    let column_names = doc.parameters;
    let mut data: Vec<Vec<f64>> = vec![Vec::with_capacity(doc.rows.len()); column_names.len()];

    for (row_no, row) in doc.rows.iter().enumerate() {
        if row.len() != column_names.len() {
            return Err(MadrigalError::SchemaMismatch {
                row: row_no,
                expected: column_names.len(),
                found: row.len(),
            });
        }
        for (j, &value) in row.iter().enumerate() {
            data[j].push(value);
        }
    }

    Ok(assemble(column_names, data))
}

fn json_columns(path: &Path) -> Result<Vec<String>> {
    Ok(read_json(path)?.parameters)
}
