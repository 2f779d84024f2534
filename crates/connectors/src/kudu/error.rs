use model::{core::data_type::ColumnType, execution::errors::RowError};
use thiserror::Error;

/// Failures raised by the scanner while talking to the cluster.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Scan transport error: {0}")]
    Transport(String),

    #[error("Scan timed out: {0}")]
    Timeout(String),

    #[error("Scanner is already closed")]
    Closed,
}

/// Failures raised by a record accessor for a single cell.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CellError {
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Column '{column}' is of type {actual}, cannot read it as {expected}")]
    TypeMismatch {
        column: String,
        expected: String,
        actual: ColumnType,
    },

    #[error("Invalid value in column '{column}': {reason}")]
    InvalidValue { column: String, reason: String },

    #[error("Record has {actual} cells but its schema has {expected} columns")]
    ArityMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum ReaderError {
    /// Fetching a page or closing the scanner failed.
    #[error("Scan transport error: {0}")]
    ScanTransport(#[from] ScanError),

    /// The column's logical type has no decoding rule.
    #[error("Unsupported column type {column_type} for column '{column}'")]
    UnsupportedColumnType {
        column: String,
        column_type: ColumnType,
    },

    #[error("Cell error: {0}")]
    Cell(#[from] CellError),

    #[error("Row error: {0}")]
    Row(#[from] RowError),

    #[error("No row available; has_next() must return true before next_row()")]
    NoCurrentRow,
}
