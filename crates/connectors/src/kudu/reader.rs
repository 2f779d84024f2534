use crate::kudu::{
    config::ReaderConfig,
    decoder::RowDecoder,
    error::ReaderError,
    scanner::{KuduScanner, RowBatch},
};
use model::records::row::Row;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// First page fetched, nothing asked yet.
    Initialized,
    /// Current page has an unconsumed record.
    Ready,
    /// Fetching the next page. A reader left here by a failed fetch retries
    /// the fetch on the next `has_next`.
    AdvancingPage,
    Exhausted,
    Closed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderStats {
    pub pages_fetched: u64,
    pub empty_pages: u64,
    pub rows_returned: u64,
}

impl ReaderStats {
    fn record_page(&mut self, rows: usize) {
        self.pages_fetched += 1;
        if rows == 0 {
            self.empty_pages += 1;
        }
    }
}

/// Pull iterator over the rows of a scan, holding at most one page in
/// memory.
///
/// The reader owns the scanner. It is closed by [`close`](Self::close) or,
/// failing that, when the reader is dropped.
pub struct KuduReaderIterator<S: KuduScanner> {
    scanner: Option<S>,
    batch: RowBatch<S::Row>,
    decoder: RowDecoder,
    state: ReaderState,
    stats: ReaderStats,
}

impl<S: KuduScanner> KuduReaderIterator<S> {
    pub fn new(scanner: S) -> Result<Self, ReaderError> {
        Self::with_config(scanner, &ReaderConfig::default())
    }

    /// Takes ownership of an opened scanner and fetches its first page.
    /// If that fetch fails the scanner is closed before the error is
    /// returned.
    pub fn with_config(mut scanner: S, config: &ReaderConfig) -> Result<Self, ReaderError> {
        let batch = match scanner.next_rows() {
            Ok(batch) => batch,
            Err(err) => {
                if let Err(close_err) = scanner.close() {
                    warn!(
                        "Failed to close scanner after first page fetch failed: {}",
                        close_err
                    );
                }
                return Err(err.into());
            }
        };

        let mut stats = ReaderStats::default();
        stats.record_page(batch.len());
        debug!("Fetched first scan page with {} rows", batch.len());

        Ok(KuduReaderIterator {
            scanner: Some(scanner),
            batch,
            decoder: RowDecoder::new(config),
            state: ReaderState::Initialized,
            stats,
        })
    }

    /// Whether another row is available, fetching pages from the server
    /// until one holds a record or the server runs dry.
    pub fn has_next(&mut self) -> Result<bool, ReaderError> {
        loop {
            if self.batch.has_next() {
                self.state = ReaderState::Ready;
                return Ok(true);
            }

            let Some(scanner) = self.scanner.as_mut() else {
                return Ok(false);
            };

            if !scanner.has_more_rows() {
                self.state = ReaderState::Exhausted;
                return Ok(false);
            }

            self.state = ReaderState::AdvancingPage;
            self.batch = scanner.next_rows()?;
            self.stats.record_page(self.batch.len());
            debug!(
                "Fetched scan page {} with {} rows",
                self.stats.pages_fetched,
                self.batch.len()
            );
        }
    }

    /// Pops and decodes one record. Only valid after `has_next` returned
    /// `true`.
    pub fn next_row(&mut self) -> Result<Row, ReaderError> {
        let record = self.batch.next_row().ok_or(ReaderError::NoCurrentRow)?;
        let row = self.decoder.decode(&record)?;
        self.stats.rows_returned += 1;
        Ok(row)
    }

    /// Releases the scanner. Later calls are no-ops.
    pub fn close(&mut self) -> Result<(), ReaderError> {
        let Some(mut scanner) = self.scanner.take() else {
            return Ok(());
        };
        self.batch = RowBatch::empty();
        self.state = ReaderState::Closed;

        scanner.close()?;
        info!(
            "Closed scanner after {} pages ({} empty), {} rows returned",
            self.stats.pages_fetched, self.stats.empty_pages, self.stats.rows_returned
        );
        Ok(())
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    pub fn stats(&self) -> ReaderStats {
        self.stats
    }

    pub fn is_closed(&self) -> bool {
        self.scanner.is_none()
    }
}

impl<S: KuduScanner> Iterator for KuduReaderIterator<S> {
    type Item = Result<Row, ReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.has_next() {
            Ok(true) => Some(self.next_row()),
            Ok(false) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

impl<S: KuduScanner> Drop for KuduReaderIterator<S> {
    fn drop(&mut self) {
        if let Some(mut scanner) = self.scanner.take()
            && let Err(err) = scanner.close()
        {
            warn!("Failed to close scanner on drop: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kudu::{
        error::{CellError, ScanError},
        memory::{Cell, MemoryRow, MemoryScanner},
    };
    use model::core::{
        data_type::ColumnType,
        schema::{ColumnSchema, Schema},
        value::Value,
    };
    use std::{cell::RefCell, collections::VecDeque, rc::Rc, sync::Arc};
    use tracing_test::traced_test;

    #[derive(Default)]
    struct ScanLog {
        fetches: usize,
        closes: usize,
    }

    /// Scanner whose pages may fail, recording every call in a shared log.
    struct FakeScanner {
        pages: VecDeque<Result<Vec<MemoryRow>, ScanError>>,
        close_error: Option<ScanError>,
        log: Rc<RefCell<ScanLog>>,
    }

    impl FakeScanner {
        fn new(pages: Vec<Result<Vec<MemoryRow>, ScanError>>) -> (Self, Rc<RefCell<ScanLog>>) {
            let log = Rc::new(RefCell::new(ScanLog::default()));
            let scanner = FakeScanner {
                pages: pages.into(),
                close_error: None,
                log: log.clone(),
            };
            (scanner, log)
        }

        fn failing_close(mut self) -> Self {
            self.close_error = Some(ScanError::Transport("session expired".into()));
            self
        }
    }

    impl KuduScanner for FakeScanner {
        type Row = MemoryRow;

        fn next_rows(&mut self) -> Result<RowBatch<MemoryRow>, ScanError> {
            self.log.borrow_mut().fetches += 1;
            match self.pages.pop_front() {
                Some(page) => page.map(RowBatch::new),
                None => Ok(RowBatch::empty()),
            }
        }

        fn has_more_rows(&self) -> bool {
            !self.pages.is_empty()
        }

        fn close(&mut self) -> Result<(), ScanError> {
            self.log.borrow_mut().closes += 1;
            match self.close_error.take() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    fn users_schema() -> Arc<Schema> {
        Arc::new(
            Schema::new(vec![
                ColumnSchema::new("id", ColumnType::Int64),
                ColumnSchema::new("name", ColumnType::String),
            ])
            .unwrap(),
        )
    }

    fn user(id: i64, name: Option<&str>) -> MemoryRow {
        MemoryRow::new(users_schema(), vec![Cell::from(id), Cell::from(name)]).unwrap()
    }

    fn ids(rows: Vec<Row>) -> Vec<i64> {
        rows.iter()
            .map(|r| match r.field(0) {
                Some(Value::Long(id)) => *id,
                other => panic!("unexpected id: {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_single_page_with_null_cell() {
        let (scanner, log) = FakeScanner::new(vec![Ok(vec![user(1, Some("a")), user(2, None)])]);
        let mut reader = KuduReaderIterator::new(scanner).unwrap();

        assert!(reader.has_next().unwrap());
        assert_eq!(
            reader.next_row().unwrap().into_values(),
            vec![Value::Long(1), Value::String("a".into())]
        );
        assert!(reader.has_next().unwrap());
        assert_eq!(
            reader.next_row().unwrap().into_values(),
            vec![Value::Long(2), Value::Null]
        );
        assert!(!reader.has_next().unwrap());
        assert_eq!(reader.state(), ReaderState::Exhausted);
        assert_eq!(log.borrow().fetches, 1);
    }

    #[test]
    fn test_empty_first_page_fetches_once_more() {
        let (scanner, log) = FakeScanner::new(vec![Ok(vec![]), Ok(vec![user(7, Some("x"))])]);
        let mut reader = KuduReaderIterator::new(scanner).unwrap();
        assert_eq!(log.borrow().fetches, 1);

        assert!(reader.has_next().unwrap());
        assert_eq!(log.borrow().fetches, 2);
        assert_eq!(ids(vec![reader.next_row().unwrap()]), vec![7]);
        assert!(!reader.has_next().unwrap());
        assert_eq!(reader.stats().empty_pages, 1);
    }

    #[test]
    fn test_pages_are_drained_in_order_before_next_fetch() {
        let (scanner, log) = FakeScanner::new(vec![
            Ok(vec![user(1, None), user(2, None)]),
            Ok(vec![]),
            Ok(vec![]),
            Ok(vec![user(3, None)]),
        ]);
        let mut reader = KuduReaderIterator::new(scanner).unwrap();

        assert!(reader.has_next().unwrap());
        reader.next_row().unwrap();
        assert!(reader.has_next().unwrap());
        assert_eq!(log.borrow().fetches, 1);

        let rest: Vec<Row> = reader.by_ref().collect::<Result<_, _>>().unwrap();
        assert_eq!(ids(rest), vec![2, 3]);
        assert_eq!(log.borrow().fetches, 4);
        assert_eq!(
            reader.stats(),
            ReaderStats {
                pages_fetched: 4,
                empty_pages: 2,
                rows_returned: 3,
            }
        );
    }

    #[test]
    fn test_exhausted_stays_false() {
        let (scanner, log) = FakeScanner::new(vec![Ok(vec![user(1, None)])]);
        let mut reader = KuduReaderIterator::new(scanner).unwrap();
        assert_eq!(reader.by_ref().count(), 1);

        for _ in 0..3 {
            assert!(!reader.has_next().unwrap());
        }
        assert_eq!(log.borrow().fetches, 1);
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_first_fetch_failure_closes_scanner() {
        let (scanner, log) =
            FakeScanner::new(vec![Err(ScanError::Transport("connection reset".into()))]);

        let err = KuduReaderIterator::new(scanner).err().unwrap();
        assert!(matches!(
            err,
            ReaderError::ScanTransport(ScanError::Transport(_))
        ));
        assert_eq!(log.borrow().closes, 1);
    }

    #[test]
    fn test_page_fetch_failure_consumes_no_row_and_can_be_retried() {
        let (scanner, log) = FakeScanner::new(vec![
            Ok(vec![user(1, None)]),
            Err(ScanError::Timeout("tablet server did not answer".into())),
            Ok(vec![user(2, None)]),
        ]);
        let mut reader = KuduReaderIterator::new(scanner).unwrap();
        assert_eq!(ids(vec![reader.next().unwrap().unwrap()]), vec![1]);

        let err = reader.has_next().unwrap_err();
        assert!(matches!(err, ReaderError::ScanTransport(ScanError::Timeout(_))));
        assert_eq!(reader.state(), ReaderState::AdvancingPage);
        assert_eq!(reader.stats().rows_returned, 1);

        assert!(reader.has_next().unwrap());
        assert_eq!(ids(vec![reader.next_row().unwrap()]), vec![2]);
        assert_eq!(log.borrow().fetches, 3);
    }

    #[test]
    fn test_next_row_without_record_is_an_error() {
        let (scanner, _log) = FakeScanner::new(vec![Ok(vec![])]);
        let mut reader = KuduReaderIterator::new(scanner).unwrap();
        assert!(matches!(reader.next_row(), Err(ReaderError::NoCurrentRow)));
    }

    #[test]
    fn test_decode_error_surfaces_from_next_row() {
        let schema = Arc::new(
            Schema::new(vec![ColumnSchema::new("day", ColumnType::Date)]).unwrap(),
        );
        let record = MemoryRow::new(schema, vec![Cell::from(1i32)]).unwrap();
        let (scanner, _log) = FakeScanner::new(vec![Ok(vec![record])]);
        let mut reader = KuduReaderIterator::new(scanner).unwrap();

        assert!(reader.has_next().unwrap());
        assert!(matches!(
            reader.next_row(),
            Err(ReaderError::UnsupportedColumnType { .. })
        ));
        assert_eq!(reader.stats().rows_returned, 0);
    }

    #[test]
    fn test_close_releases_scanner_once() {
        let (scanner, log) = FakeScanner::new(vec![Ok(vec![user(1, None)]), Ok(vec![])]);
        let mut reader = KuduReaderIterator::new(scanner).unwrap();

        reader.close().unwrap();
        reader.close().unwrap();
        assert!(reader.is_closed());
        assert_eq!(reader.state(), ReaderState::Closed);
        assert!(!reader.has_next().unwrap());

        drop(reader);
        assert_eq!(log.borrow().closes, 1);
    }

    #[test]
    fn test_close_failure_is_reported() {
        let (scanner, log) = FakeScanner::new(vec![Ok(vec![])]);
        let mut reader = KuduReaderIterator::new(scanner.failing_close()).unwrap();

        assert!(matches!(
            reader.close(),
            Err(ReaderError::ScanTransport(ScanError::Transport(_)))
        ));
        drop(reader);
        assert_eq!(log.borrow().closes, 1);
    }

    #[traced_test]
    #[test]
    fn test_abandoned_reader_closes_on_drop() {
        let (scanner, log) = FakeScanner::new(vec![Ok(vec![user(1, None), user(2, None)])]);
        let mut reader = KuduReaderIterator::new(scanner.failing_close()).unwrap();
        assert!(reader.has_next().unwrap());
        drop(reader);

        assert_eq!(log.borrow().closes, 1);
        assert!(logs_contain("Failed to close scanner on drop"));
    }

    #[test]
    fn test_with_memory_scanner() {
        let scanner = MemoryScanner::new(vec![
            vec![user(1, Some("a"))],
            vec![user(2, Some("b")), user(3, Some(""))],
        ]);
        let reader = KuduReaderIterator::new(scanner).unwrap();

        let names: Vec<Value> = reader
            .map(|row| row.unwrap().field(1).cloned().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                Value::String("a".into()),
                Value::String("b".into()),
                Value::String(String::new()),
            ]
        );
    }

    #[test]
    fn test_cell_errors_are_not_transport_errors() {
        let schema = Arc::new(
            Schema::new(vec![ColumnSchema::new("name", ColumnType::String)]).unwrap(),
        );
        let record = MemoryRow::new(schema, vec![Cell::Bytes(vec![0xc3, 0x28])]).unwrap();
        let (scanner, _log) = FakeScanner::new(vec![Ok(vec![record])]);
        let mut reader = KuduReaderIterator::new(scanner).unwrap();

        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            ReaderError::Cell(CellError::InvalidValue { .. })
        ));
    }
}
