use crate::kudu::{
    config::{ReaderConfig, TimestampFallback},
    error::{CellError, ReaderError},
    scanner::RowResult,
};
use model::{
    core::{data_type::ColumnType, value::Value},
    records::row::Row,
};
use tracing::warn;

/// Turns scan records into positional rows. Holds no per-record state.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowDecoder {
    timestamp_fallback: TimestampFallback,
}

impl RowDecoder {
    pub fn new(config: &ReaderConfig) -> Self {
        RowDecoder {
            timestamp_fallback: config.timestamp_fallback,
        }
    }

    /// Decodes every column of `record` into the slot at its schema position.
    /// Fails without returning a partial row.
    pub fn decode<R: RowResult + ?Sized>(&self, record: &R) -> Result<Row, ReaderError> {
        let schema = record.schema();
        let mut row = Row::with_arity(schema.column_count());

        for column in schema.columns() {
            let name = column.name.as_str();
            let pos = schema
                .column_index(name)
                .ok_or_else(|| CellError::ColumnNotFound(name.to_string()))?;

            let value = if record.is_null(name)? {
                Value::Null
            } else {
                self.get_value(record, &column.column_type, name)?
            };
            row.set_field(pos, value)?;
        }

        Ok(row)
    }

    pub fn get_value<R: RowResult + ?Sized>(
        &self,
        record: &R,
        column_type: &ColumnType,
        name: &str,
    ) -> Result<Value, ReaderError> {
        let value = match column_type {
            ColumnType::Binary => Value::Binary(record.get_binary(name)?),
            ColumnType::String => Value::String(record.get_string(name)?),
            ColumnType::Bool => Value::Boolean(record.get_bool(name)?),
            ColumnType::Double => Value::Double(record.get_double(name)?),
            ColumnType::Float => Value::Float(record.get_float(name)?),
            ColumnType::Int8 => Value::Byte(record.get_i8(name)?),
            ColumnType::Int16 => Value::Short(record.get_i16(name)?),
            ColumnType::Int32 => Value::Int(record.get_i32(name)?),
            ColumnType::Int64 => Value::Long(record.get_i64(name)?),
            ColumnType::UnixtimeMicros => self.get_timestamp(record, name)?,
            ColumnType::Decimal => Value::Decimal(record.get_decimal(name)?),
            ColumnType::Varchar | ColumnType::Date | ColumnType::Custom(_) => {
                return Err(ReaderError::UnsupportedColumnType {
                    column: name.to_string(),
                    column_type: column_type.clone(),
                });
            }
        };
        Ok(value)
    }

    /// Only the timestamp read itself is recovered from. The raw `i64` read
    /// used for the millisecond substitute propagates its own failure.
    fn get_timestamp<R: RowResult + ?Sized>(
        &self,
        record: &R,
        name: &str,
    ) -> Result<Value, ReaderError> {
        match record.get_timestamp(name) {
            Ok(ts) => Ok(Value::Timestamp(ts)),
            Err(err) if self.timestamp_fallback == TimestampFallback::Millis => {
                warn!(
                    "Timestamp decode failed for column '{}', falling back to milliseconds: {}",
                    name, err
                );
                let micros = record.get_i64(name)?;
                Ok(Value::Long(micros / 1000))
            }
            Err(err) => Err(err.into()),
        }
    }
}
