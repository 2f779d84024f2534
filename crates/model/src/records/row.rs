use crate::{core::value::Value, execution::errors::RowError};
use serde::{Deserialize, Serialize};

/// Positionally addressed row with one slot per projected column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: Vec<Value>,
}

impl Row {
    /// Creates a row of `arity` slots, all `Null` until written.
    pub fn with_arity(arity: usize) -> Self {
        Row {
            fields: vec![Value::Null; arity],
        }
    }

    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    pub fn set_field(&mut self, pos: usize, value: Value) -> Result<(), RowError> {
        let arity = self.fields.len();
        let slot = self
            .fields
            .get_mut(pos)
            .ok_or(RowError::PositionOutOfBounds { pos, arity })?;
        *slot = value;
        Ok(())
    }

    pub fn field(&self, pos: usize) -> Option<&Value> {
        self.fields.get(pos)
    }

    pub fn values(&self) -> &[Value] {
        &self.fields
    }

    pub fn into_values(self) -> Vec<Value> {
        self.fields
    }
}

impl From<Vec<Value>> for Row {
    fn from(fields: Vec<Value>) -> Self {
        Row { fields }
    }
}

impl IntoIterator for Row {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
