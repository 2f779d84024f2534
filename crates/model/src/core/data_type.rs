use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, collections::HashMap, fmt};

/// Logical column type as declared by the storage engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Int8,
    Int16,
    Int32,
    Int64,
    Binary,
    String,
    Bool,
    Float,
    Double,
    UnixtimeMicros,
    Decimal,
    Varchar,
    Date,
    Custom(String),
}

lazy_static! {
    static ref KUDU_TYPE_MAP: HashMap<&'static str, ColumnType> = build_kudu_type_map();
}

impl ColumnType {
    /// Resolves an engine type name. Names we don't know become `Custom`.
    pub fn from_kudu_name(type_name: &str) -> Self {
        let normalized = type_name.trim().to_ascii_lowercase();
        KUDU_TYPE_MAP
            .get(normalized.as_str())
            .cloned()
            .unwrap_or_else(|| ColumnType::Custom(type_name.trim().to_string()))
    }

    pub fn kudu_name(&self) -> Cow<'_, str> {
        match self {
            ColumnType::Int8 => Cow::Borrowed("int8"),
            ColumnType::Int16 => Cow::Borrowed("int16"),
            ColumnType::Int32 => Cow::Borrowed("int32"),
            ColumnType::Int64 => Cow::Borrowed("int64"),
            ColumnType::Binary => Cow::Borrowed("binary"),
            ColumnType::String => Cow::Borrowed("string"),
            ColumnType::Bool => Cow::Borrowed("bool"),
            ColumnType::Float => Cow::Borrowed("float"),
            ColumnType::Double => Cow::Borrowed("double"),
            ColumnType::UnixtimeMicros => Cow::Borrowed("unixtime_micros"),
            ColumnType::Decimal => Cow::Borrowed("decimal"),
            ColumnType::Varchar => Cow::Borrowed("varchar"),
            ColumnType::Date => Cow::Borrowed("date"),
            ColumnType::Custom(name) => Cow::Borrowed(name),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kudu_name())
    }
}

fn build_kudu_type_map() -> HashMap<&'static str, ColumnType> {
    let mut map = HashMap::new();

    map.insert("int8", ColumnType::Int8);
    map.insert("tinyint", ColumnType::Int8);
    map.insert("int16", ColumnType::Int16);
    map.insert("smallint", ColumnType::Int16);
    map.insert("int32", ColumnType::Int32);
    map.insert("int", ColumnType::Int32);
    map.insert("int64", ColumnType::Int64);
    map.insert("bigint", ColumnType::Int64);
    map.insert("binary", ColumnType::Binary);
    map.insert("string", ColumnType::String);
    map.insert("bool", ColumnType::Bool);
    map.insert("boolean", ColumnType::Bool);
    map.insert("float", ColumnType::Float);
    map.insert("double", ColumnType::Double);
    map.insert("unixtime_micros", ColumnType::UnixtimeMicros);
    map.insert("timestamp", ColumnType::UnixtimeMicros);
    map.insert("decimal", ColumnType::Decimal);
    map.insert("varchar", ColumnType::Varchar);
    map.insert("date", ColumnType::Date);

    map
}
