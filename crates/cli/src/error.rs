use crate::fixture::FixtureError;
use connectors::kudu::ReaderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read input file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to deserialize JSON input: {0}")]
    JsonDeserialize(#[from] serde_json::Error),

    #[error("Failed to serialize row to JSON: {0}")]
    JsonSerialize(serde_json::Error),

    #[error("Invalid scan fixture: {0}")]
    Fixture(#[from] FixtureError),

    #[error("Failed to read rows: {0}")]
    Reader(#[from] ReaderError),
}
