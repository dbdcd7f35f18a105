use std::io::{self, Stderr, Write};
use std::sync::Mutex;

use chrono::Local;

use crate::record::LogRecord;
use crate::sink::{LogSink, SinkError};

/// Line-oriented sink writing to a byte stream, standard error by default.
///
/// Each record becomes one line:
/// `2026/10/18 09:14:03.120044 request_logger.rs:71: INFO <message>`.
/// The caller part is omitted when the record carries no location, and a
/// non-empty tag is written as `[tag]` before the message.
pub struct StreamSink<W = Stderr> {
    writer: Mutex<W>,
}

impl StreamSink<Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write + Send> StreamSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Render the line written for `record`, without the trailing newline.
    pub fn render(record: &LogRecord) -> String {
        let mut line = record
            .timestamp
            .with_timezone(&Local)
            .format("%Y/%m/%d %H:%M:%S%.6f")
            .to_string();
        if let Some(caller) = record.caller() {
            line.push(' ');
            line.push_str(&caller);
            line.push(':');
        }
        line.push(' ');
        line.push_str(record.level.as_str());
        line.push(' ');
        if !record.tag.is_empty() {
            line.push('[');
            line.push_str(&record.tag);
            line.push_str("] ");
        }
        line.push_str(&record.message);
        line
    }
}

impl<W: Write + Send> LogSink for StreamSink<W> {
    fn write(&self, record: &LogRecord) -> Result<(), SinkError> {
        let line = Self::render(record);
        let mut writer = self.writer.lock().map_err(|_| SinkError::Poisoned)?;
        writeln!(writer, "{}", line)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        let mut writer = self.writer.lock().map_err(|_| SinkError::Poisoned)?;
        writer.flush()?;
        Ok(())
    }
}
