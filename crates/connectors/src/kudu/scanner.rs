use crate::kudu::error::{CellError, ScanError};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use model::core::schema::Schema;

/// One record of a scan page, read cell by cell through its column names.
pub trait RowResult {
    /// Projection the record was decoded with.
    fn schema(&self) -> &Schema;

    fn is_null(&self, column: &str) -> Result<bool, CellError>;

    fn get_binary(&self, column: &str) -> Result<Vec<u8>, CellError>;
    fn get_string(&self, column: &str) -> Result<String, CellError>;
    fn get_bool(&self, column: &str) -> Result<bool, CellError>;
    fn get_double(&self, column: &str) -> Result<f64, CellError>;
    fn get_float(&self, column: &str) -> Result<f32, CellError>;
    fn get_i8(&self, column: &str) -> Result<i8, CellError>;
    fn get_i16(&self, column: &str) -> Result<i16, CellError>;
    fn get_i32(&self, column: &str) -> Result<i32, CellError>;

    /// Also readable on `UnixtimeMicros` columns, where it returns the raw
    /// microsecond count.
    fn get_i64(&self, column: &str) -> Result<i64, CellError>;

    fn get_timestamp(&self, column: &str) -> Result<DateTime<Utc>, CellError>;
    fn get_decimal(&self, column: &str) -> Result<BigDecimal, CellError>;
}

/// An open server-side scan.
///
/// Implementations own the network session; `close` must be called exactly
/// once to release it.
pub trait KuduScanner {
    type Row: RowResult;

    /// Fetches the next page of results, blocking until the server answers.
    fn next_rows(&mut self) -> Result<RowBatch<Self::Row>, ScanError>;

    /// Whether the server has more pages to hand out.
    fn has_more_rows(&self) -> bool;

    fn close(&mut self) -> Result<(), ScanError>;
}

/// A single page of records from one round trip, consumed front to back.
#[derive(Debug)]
pub struct RowBatch<R> {
    rows: std::vec::IntoIter<R>,
}

impl<R> RowBatch<R> {
    pub fn new(rows: Vec<R>) -> Self {
        RowBatch {
            rows: rows.into_iter(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn has_next(&self) -> bool {
        !self.rows.as_slice().is_empty()
    }

    pub fn next_row(&mut self) -> Option<R> {
        self.rows.next()
    }

    /// Records not consumed yet.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R> From<Vec<R>> for RowBatch<R> {
    fn from(rows: Vec<R>) -> Self {
        Self::new(rows)
    }
}
