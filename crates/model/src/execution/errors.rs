use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("duplicate column name in schema: {0}")]
    DuplicateColumn(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("field position {pos} is out of bounds for a row of arity {arity}")]
    PositionOutOfBounds { pos: usize, arity: usize },
}
