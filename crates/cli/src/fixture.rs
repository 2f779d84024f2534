use bigdecimal::BigDecimal;
use connectors::kudu::{
    CellError,
    memory::{Cell, MemoryRow, MemoryScanner},
};
use model::{
    core::{
        data_type::ColumnType,
        schema::{ColumnSchema, Schema},
    },
    execution::errors::SchemaError,
};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::{str::FromStr, sync::Arc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("{0}")]
    Schema(#[from] SchemaError),

    #[error("{0}")]
    Cell(#[from] CellError),

    #[error("page {page}, row {row}, column '{column}': {reason}")]
    InvalidCell {
        page: usize,
        row: usize,
        column: String,
        reason: String,
    },
}

#[derive(Debug, Deserialize)]
pub struct FixtureColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// A recorded scan: the projection and the pages the server handed out.
#[derive(Debug, Deserialize)]
pub struct ScanFixture {
    pub columns: Vec<FixtureColumn>,
    #[serde(default)]
    pub pages: Vec<Vec<Vec<JsonValue>>>,
    /// Empty pages the server still hands out after the last recorded one.
    #[serde(default)]
    pub has_more_pages_after: usize,
}

impl ScanFixture {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn schema(&self) -> Result<Schema, FixtureError> {
        let columns = self
            .columns
            .iter()
            .map(|c| ColumnSchema::new(c.name.clone(), ColumnType::from_kudu_name(&c.type_name)))
            .collect();
        Ok(Schema::new(columns)?)
    }

    pub fn into_scanner(self) -> Result<MemoryScanner, FixtureError> {
        let schema = Arc::new(self.schema()?);
        let null = JsonValue::Null;
        let mut pages = Vec::with_capacity(self.pages.len() + self.has_more_pages_after);

        for (page_idx, page) in self.pages.into_iter().enumerate() {
            let mut rows = Vec::with_capacity(page.len());
            for (row_idx, json_row) in page.into_iter().enumerate() {
                let cells = schema
                    .columns()
                    .iter()
                    .zip(json_row.iter().chain(std::iter::repeat(&null)))
                    .map(|(column, json)| {
                        to_cell(&column.column_type, json).map_err(|reason| {
                            FixtureError::InvalidCell {
                                page: page_idx,
                                row: row_idx,
                                column: column.name.clone(),
                                reason,
                            }
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                if json_row.len() > schema.column_count() {
                    return Err(CellError::ArityMismatch {
                        expected: schema.column_count(),
                        actual: json_row.len(),
                    }
                    .into());
                }
                rows.push(MemoryRow::new(schema.clone(), cells)?);
            }
            pages.push(rows);
        }
        pages.extend(std::iter::repeat_with(Vec::new).take(self.has_more_pages_after));

        Ok(MemoryScanner::new(pages))
    }
}

/// Converts a JSON cell to the raw representation the engine stores for
/// `column_type`. Missing trailing cells are read as null.
fn to_cell(column_type: &ColumnType, json: &JsonValue) -> Result<Cell, String> {
    if json.is_null() {
        return Ok(Cell::Null);
    }

    let cell = match column_type {
        ColumnType::Binary => match json {
            JsonValue::String(s) => Cell::from(s.as_str()),
            JsonValue::Array(items) => Cell::Bytes(
                items
                    .iter()
                    .map(|b| {
                        b.as_u64()
                            .and_then(|b| u8::try_from(b).ok())
                            .ok_or_else(|| format!("invalid byte {b}"))
                    })
                    .collect::<Result<_, _>>()?,
            ),
            other => return Err(format!("expected bytes, got {other}")),
        },
        ColumnType::String | ColumnType::Varchar => {
            Cell::from(json.as_str().ok_or_else(|| format!("expected string, got {json}"))?)
        }
        ColumnType::Bool => {
            Cell::Bool(json.as_bool().ok_or_else(|| format!("expected bool, got {json}"))?)
        }
        ColumnType::Double => Cell::Double(as_f64(json)?),
        ColumnType::Float => Cell::Float(as_f64(json)? as f32),
        ColumnType::Int8 => Cell::Int8(narrow(as_i64(json)?)?),
        ColumnType::Int16 => Cell::Int16(narrow(as_i64(json)?)?),
        ColumnType::Int32 | ColumnType::Date => Cell::Int32(narrow(as_i64(json)?)?),
        ColumnType::Int64 => Cell::Int64(as_i64(json)?),
        ColumnType::UnixtimeMicros => Cell::Micros(as_i64(json)?),
        ColumnType::Decimal => {
            let text = match json {
                JsonValue::String(s) => s.clone(),
                JsonValue::Number(n) => n.to_string(),
                other => return Err(format!("expected decimal, got {other}")),
            };
            Cell::Decimal(BigDecimal::from_str(&text).map_err(|e| e.to_string())?)
        }
        ColumnType::Custom(_) => match json {
            JsonValue::String(s) => Cell::from(s.as_str()),
            other => Cell::Bytes(other.to_string().into_bytes()),
        },
    };
    Ok(cell)
}

fn as_i64(json: &JsonValue) -> Result<i64, String> {
    json.as_i64()
        .ok_or_else(|| format!("expected integer, got {json}"))
}

fn as_f64(json: &JsonValue) -> Result<f64, String> {
    json.as_f64()
        .ok_or_else(|| format!("expected number, got {json}"))
}

fn narrow<T: TryFrom<i64>>(v: i64) -> Result<T, String> {
    T::try_from(v).map_err(|_| format!("{v} is out of range"))
}
