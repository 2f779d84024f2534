pub mod config;
pub mod decoder;
pub mod error;
pub mod memory;
pub mod reader;
pub mod scanner;

pub use config::{ReaderConfig, TimestampFallback};
pub use error::{CellError, ReaderError, ScanError};
pub use reader::{KuduReaderIterator, ReaderState, ReaderStats};
pub use scanner::{KuduScanner, RowBatch, RowResult};
