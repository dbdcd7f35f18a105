use crate::record::LogRecord;

/// Error returned by a [`LogSink`] that could not accept a record.
#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    #[error("i/o error writing log record: {0}")]
    Io(#[from] std::io::Error),

    #[error("sink lock poisoned")]
    Poisoned,
}

/// Synchronous destination for [`LogRecord`]s produced by a
/// [`Destination`](crate::destination::Destination).
///
/// Implementations are responsible for transporting records to a concrete
/// backend (stderr, syslog, memory, etc). `write` is called on the thread
/// that handles the HTTP request, so it must be cheap and must not block on
/// the network. Implementations synchronise internally; the same sink may be
/// written from many threads at once.
pub trait LogSink: Send + Sync {
    /// Write a single log record to the underlying backend.
    ///
    /// **Returns**
    /// - `Ok(())` if the record was accepted by the backend.
    /// - `Err(..)` if the backend failed. The destination reports the
    ///   failure on stderr and moves on; there are no retries.
    fn write(&self, record: &LogRecord) -> Result<(), SinkError>;

    /// Flush any buffered records, if the backend implements buffering.
    ///
    /// Default implementation is a no-op.
    fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }
}
