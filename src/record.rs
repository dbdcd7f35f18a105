use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::level::Severity;

/// One line as handed to every [`LogSink`](crate::sink::LogSink) of a
/// destination.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: Severity,
    /// Name of the destination that produced the line.
    pub target: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub tag: String,
    pub message: String,
}

impl LogRecord {
    /// `file:line` of the call site, with the directory part stripped.
    pub fn caller(&self) -> Option<String> {
        let file = self.file.as_deref()?;
        let short = file.rsplit(['/', '\\']).next().unwrap_or(file);
        match self.line {
            Some(line) => Some(format!("{}:{}", short, line)),
            None => Some(short.to_string()),
        }
    }
}
