use crate::kudu::{
    error::{CellError, ScanError},
    scanner::{KuduScanner, RowBatch, RowResult},
};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use model::core::{data_type::ColumnType, schema::Schema};
use std::{collections::VecDeque, sync::Arc};
use tracing::debug;

/// Raw cell as the engine stores it, before any decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Bytes(Vec<u8>),
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
    /// Microseconds since the unix epoch.
    Micros(i64),
    Decimal(BigDecimal),
}

impl Cell {
    fn kind(&self) -> &'static str {
        match self {
            Cell::Null => "null",
            Cell::Bytes(_) => "bytes",
            Cell::Bool(_) => "bool",
            Cell::Int8(_) => "int8",
            Cell::Int16(_) => "int16",
            Cell::Int32(_) => "int32",
            Cell::Int64(_) => "int64",
            Cell::Float(_) => "float",
            Cell::Double(_) => "double",
            Cell::Micros(_) => "micros",
            Cell::Decimal(_) => "decimal",
        }
    }
}

macro_rules! impl_cell_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Cell {
                fn from(v: $ty) -> Self {
                    Cell::$variant(v)
                }
            }
        )*
    };
}

impl_cell_from!(
    Vec<u8> => Bytes,
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Float,
    f64 => Double,
    BigDecimal => Decimal,
);

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Cell::Bytes(v.as_bytes().to_vec())
    }
}

impl From<String> for Cell {
    fn from(v: String) -> Self {
        Cell::Bytes(v.into_bytes())
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map_or(Cell::Null, Into::into)
    }
}

/// A record held in memory, with the engine's accessor type checks.
#[derive(Debug, Clone)]
pub struct MemoryRow {
    schema: Arc<Schema>,
    cells: Vec<Cell>,
}

impl MemoryRow {
    pub fn new(schema: Arc<Schema>, cells: Vec<Cell>) -> Result<Self, CellError> {
        if cells.len() != schema.column_count() {
            return Err(CellError::ArityMismatch {
                expected: schema.column_count(),
                actual: cells.len(),
            });
        }
        Ok(MemoryRow { schema, cells })
    }

    /// Looks up a cell, checking the column's declared type against the
    /// types the caller's getter accepts.
    fn cell(
        &self,
        column: &str,
        accepted: &[ColumnType],
        getter: &str,
    ) -> Result<&Cell, CellError> {
        let pos = self
            .schema
            .column_index(column)
            .ok_or_else(|| CellError::ColumnNotFound(column.to_string()))?;
        let actual = &self.schema.columns()[pos].column_type;
        if !accepted.contains(actual) {
            return Err(CellError::TypeMismatch {
                column: column.to_string(),
                expected: getter.to_string(),
                actual: actual.clone(),
            });
        }
        Ok(&self.cells[pos])
    }

    fn invalid(column: &str, cell: &Cell, getter: &str) -> CellError {
        CellError::InvalidValue {
            column: column.to_string(),
            reason: format!("cannot read {} cell as {getter}", cell.kind()),
        }
    }
}

impl RowResult for MemoryRow {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn is_null(&self, column: &str) -> Result<bool, CellError> {
        let pos = self
            .schema
            .column_index(column)
            .ok_or_else(|| CellError::ColumnNotFound(column.to_string()))?;
        Ok(matches!(self.cells[pos], Cell::Null))
    }

    fn get_binary(&self, column: &str) -> Result<Vec<u8>, CellError> {
        match self.cell(column, &[ColumnType::Binary], "binary")? {
            Cell::Bytes(v) => Ok(v.clone()),
            other => Err(Self::invalid(column, other, "binary")),
        }
    }

    fn get_string(&self, column: &str) -> Result<String, CellError> {
        match self.cell(column, &[ColumnType::String, ColumnType::Varchar], "string")? {
            Cell::Bytes(v) => String::from_utf8(v.clone()).map_err(|e| CellError::InvalidValue {
                column: column.to_string(),
                reason: e.to_string(),
            }),
            other => Err(Self::invalid(column, other, "string")),
        }
    }

    fn get_bool(&self, column: &str) -> Result<bool, CellError> {
        match self.cell(column, &[ColumnType::Bool], "bool")? {
            Cell::Bool(v) => Ok(*v),
            other => Err(Self::invalid(column, other, "bool")),
        }
    }

    fn get_double(&self, column: &str) -> Result<f64, CellError> {
        match self.cell(column, &[ColumnType::Double], "double")? {
            Cell::Double(v) => Ok(*v),
            other => Err(Self::invalid(column, other, "double")),
        }
    }

    fn get_float(&self, column: &str) -> Result<f32, CellError> {
        match self.cell(column, &[ColumnType::Float], "float")? {
            Cell::Float(v) => Ok(*v),
            other => Err(Self::invalid(column, other, "float")),
        }
    }

    fn get_i8(&self, column: &str) -> Result<i8, CellError> {
        match self.cell(column, &[ColumnType::Int8], "int8")? {
            Cell::Int8(v) => Ok(*v),
            other => Err(Self::invalid(column, other, "int8")),
        }
    }

    fn get_i16(&self, column: &str) -> Result<i16, CellError> {
        match self.cell(column, &[ColumnType::Int16], "int16")? {
            Cell::Int16(v) => Ok(*v),
            other => Err(Self::invalid(column, other, "int16")),
        }
    }

    fn get_i32(&self, column: &str) -> Result<i32, CellError> {
        match self.cell(column, &[ColumnType::Int32], "int32")? {
            Cell::Int32(v) => Ok(*v),
            other => Err(Self::invalid(column, other, "int32")),
        }
    }

    fn get_i64(&self, column: &str) -> Result<i64, CellError> {
        let accepted = [ColumnType::Int64, ColumnType::UnixtimeMicros];
        match self.cell(column, &accepted, "int64")? {
            Cell::Int64(v) | Cell::Micros(v) => Ok(*v),
            other => Err(Self::invalid(column, other, "int64")),
        }
    }

    fn get_timestamp(&self, column: &str) -> Result<DateTime<Utc>, CellError> {
        match self.cell(column, &[ColumnType::UnixtimeMicros], "timestamp")? {
            Cell::Micros(v) => {
                DateTime::<Utc>::from_timestamp_micros(*v).ok_or_else(|| {
                    CellError::InvalidValue {
                        column: column.to_string(),
                        reason: format!("{v} microseconds is out of the timestamp range"),
                    }
                })
            }
            other => Err(Self::invalid(column, other, "timestamp")),
        }
    }

    fn get_decimal(&self, column: &str) -> Result<BigDecimal, CellError> {
        match self.cell(column, &[ColumnType::Decimal], "decimal")? {
            Cell::Decimal(v) => Ok(v.clone()),
            other => Err(Self::invalid(column, other, "decimal")),
        }
    }
}

/// Scanner replaying a fixed list of pages.
#[derive(Debug, Default)]
pub struct MemoryScanner {
    pages: VecDeque<Vec<MemoryRow>>,
    closed: bool,
}

impl MemoryScanner {
    pub fn new(pages: Vec<Vec<MemoryRow>>) -> Self {
        MemoryScanner {
            pages: pages.into(),
            closed: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn remaining_pages(&self) -> usize {
        self.pages.len()
    }
}

impl KuduScanner for MemoryScanner {
    type Row = MemoryRow;

    fn next_rows(&mut self) -> Result<RowBatch<MemoryRow>, ScanError> {
        if self.closed {
            return Err(ScanError::Closed);
        }
        let rows = self.pages.pop_front().unwrap_or_default();
        debug!(
            "Serving in-memory page with {} rows ({} pages left)",
            rows.len(),
            self.pages.len()
        );
        Ok(RowBatch::new(rows))
    }

    fn has_more_rows(&self) -> bool {
        !self.closed && !self.pages.is_empty()
    }

    fn close(&mut self) -> Result<(), ScanError> {
        if self.closed {
            return Err(ScanError::Closed);
        }
        self.closed = true;
        self.pages.clear();
        Ok(())
    }
}
