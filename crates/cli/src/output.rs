use crate::error::CliError;
use model::{core::value::Value, records::row::Row};
use serde_json::{Number, Value as JsonValue};
use std::io::Write;

fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Binary(v) => JsonValue::Array(v.iter().map(|b| JsonValue::from(*b)).collect()),
        Value::String(v) => JsonValue::String(v.clone()),
        Value::Boolean(v) => JsonValue::Bool(*v),
        Value::Double(v) => Number::from_f64(*v).map_or(JsonValue::Null, JsonValue::Number),
        Value::Float(v) => Number::from_f64(*v as f64).map_or(JsonValue::Null, JsonValue::Number),
        Value::Byte(v) => JsonValue::from(*v),
        Value::Short(v) => JsonValue::from(*v),
        Value::Int(v) => JsonValue::from(*v),
        Value::Long(v) => JsonValue::from(*v),
        Value::Timestamp(_) | Value::Decimal(_) => JsonValue::String(value.to_string()),
        Value::Null => JsonValue::Null,
    }
}

pub fn row_to_json(row: &Row) -> JsonValue {
    JsonValue::Array(row.values().iter().map(value_to_json).collect())
}

pub fn write_row<W: Write>(out: &mut W, row: &Row) -> Result<(), CliError> {
    let line = serde_json::to_string(&row_to_json(row)).map_err(CliError::JsonSerialize)?;
    writeln!(out, "{line}")?;
    Ok(())
}
