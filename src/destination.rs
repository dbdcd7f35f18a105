use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use chrono::Utc;

use crate::level::Severity;
use crate::memory_sink::MemorySink;
use crate::record::LogRecord;
use crate::sink::LogSink;

/// Leveled logging capability consumed by [`RequestLogger`].
///
/// Only [`LeveledLogger::log`] is required; the per-level methods forward to
/// it. Callers that pass an empty `tag` get an untagged line.
///
/// [`RequestLogger`]: crate::request_logger::RequestLogger
pub trait LeveledLogger: Send + Sync {
    #[track_caller]
    fn log(&self, level: Severity, tag: &str, message: &str);

    #[track_caller]
    fn debug(&self, tag: &str, message: &str) {
        self.log(Severity::Debug, tag, message)
    }

    #[track_caller]
    fn info(&self, tag: &str, message: &str) {
        self.log(Severity::Info, tag, message)
    }

    #[track_caller]
    fn warning(&self, tag: &str, message: &str) {
        self.log(Severity::Warning, tag, message)
    }

    #[track_caller]
    fn error(&self, tag: &str, message: &str) {
        self.log(Severity::Error, tag, message)
    }

    #[track_caller]
    fn critical(&self, tag: &str, message: &str) {
        self.log(Severity::Critical, tag, message)
    }
}

impl<T: LeveledLogger + ?Sized> LeveledLogger for Arc<T> {
    #[track_caller]
    fn log(&self, level: Severity, tag: &str, message: &str) {
        (**self).log(level, tag, message)
    }
}

/// Named set of sinks that receives every line at or above `min_level`.
///
/// Each call builds one [`LogRecord`] and hands it to every sink in the
/// order they were added. A sink that fails is reported on stderr and
/// skipped; the remaining sinks still get the record.
#[derive(Clone)]
pub struct Destination {
    name: String,
    min_level: Severity,
    sinks: Vec<Arc<dyn LogSink>>,
    memory: Vec<Arc<MemorySink>>,
}

impl Destination {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_level: Severity::Debug,
            sinks: Vec::new(),
            memory: Vec::new(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Add a memory ring; it stays reachable through
    /// [`Destination::memory_sinks`].
    pub fn with_memory_sink(mut self, sink: Arc<MemorySink>) -> Self {
        self.sinks.push(Arc::clone(&sink) as Arc<dyn LogSink>);
        self.memory.push(sink);
        self
    }

    pub fn with_min_level(mut self, level: Severity) -> Self {
        self.min_level = level;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min_level(&self) -> Severity {
        self.min_level
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    pub fn enabled(&self, level: Severity) -> bool {
        level >= self.min_level
    }

    /// Memory rings attached to this destination, in selection order.
    pub fn memory_sinks(&self) -> &[Arc<MemorySink>] {
        &self.memory
    }

    /// First memory ring, if any was selected.
    pub fn memory_sink(&self) -> Option<&Arc<MemorySink>> {
        self.memory.first()
    }

    /// Flush every sink, reporting failures on stderr.
    pub fn flush(&self) {
        for sink in &self.sinks {
            if let Err(e) = sink.flush() {
                eprintln!("http-clerk: error flushing {} sink: {}", self.name, e);
            }
        }
    }

    /// Hand an already built record to every sink.
    pub fn dispatch(&self, record: &LogRecord) {
        if !self.enabled(record.level) {
            return;
        }
        for sink in &self.sinks {
            if let Err(e) = sink.write(record) {
                eprintln!("http-clerk: error writing to {} sink: {}", self.name, e);
            }
        }
    }
}

impl LeveledLogger for Destination {
    #[track_caller]
    fn log(&self, level: Severity, tag: &str, message: &str) {
        if !self.enabled(level) {
            return;
        }
        let caller = Location::caller();
        let record = LogRecord {
            timestamp: Utc::now(),
            level,
            target: self.name.clone(),
            file: Some(caller.file().to_string()),
            line: Some(caller.line()),
            tag: tag.to_string(),
            message: message.to_string(),
        };
        self.dispatch(&record);
    }
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Destination")
            .field("name", &self.name)
            .field("min_level", &self.min_level)
            .field("sinks", &self.sinks.len())
            .finish()
    }
}
