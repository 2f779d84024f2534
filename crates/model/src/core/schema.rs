use crate::{core::data_type::ColumnType, execution::errors::SchemaError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Ordered column projection of a scan.
///
/// Positions are assigned in declaration order, so they always form the
/// dense range `0..column_count()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<ColumnSchema>,
    index: HashMap<String, usize>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnSchema>) -> Result<Self, SchemaError> {
        let mut index = HashMap::with_capacity(columns.len());
        for (pos, column) in columns.iter().enumerate() {
            if index.insert(column.name.clone(), pos).is_some() {
                return Err(SchemaError::DuplicateColumn(column.name.clone()));
            }
        }

        Ok(Schema { columns, index })
    }

    pub fn empty() -> Self {
        Schema {
            columns: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, pos: usize) -> Option<&ColumnSchema> {
        self.columns.get(pos)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn column_by_name(&self, name: &str) -> Option<&ColumnSchema> {
        self.column_index(name).map(|pos| &self.columns[pos])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users_schema() -> Schema {
        Schema::new(vec![
            ColumnSchema::new("id", ColumnType::Int64),
            ColumnSchema::new("name", ColumnType::String),
            ColumnSchema::new("created_at", ColumnType::UnixtimeMicros),
        ])
        .unwrap()
    }

    #[test]
    fn test_positions_follow_declaration_order() {
        let schema = users_schema();
        assert_eq!(schema.column_count(), 3);
        assert_eq!(schema.column_index("id"), Some(0));
        assert_eq!(schema.column_index("name"), Some(1));
        assert_eq!(schema.column_index("created_at"), Some(2));
        assert_eq!(schema.column_index("missing"), None);
        assert_eq!(
            schema.column_by_name("name").map(|c| &c.column_type),
            Some(&ColumnType::String)
        );
    }

    #[test]
    fn test_duplicate_column_is_rejected() {
        let err = Schema::new(vec![
            ColumnSchema::new("id", ColumnType::Int64),
            ColumnSchema::new("id", ColumnType::String),
        ])
        .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateColumn("id".to_string()));
    }

    #[test]
    fn test_empty_schema() {
        let schema = Schema::empty();
        assert_eq!(schema.column_count(), 0);
        assert!(schema.column(0).is_none());
    }
}
