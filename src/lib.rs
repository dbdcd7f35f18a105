//! Leveled HTTP request logging.
//!
//! ```text
//! http::Request + response ──extract──> Fields ──Formatter──> line
//!                                                   │
//!                     RequestLogger::{debug,info,warning,error,critical}
//!                                                   │
//!                           Destination ──fan-out──> stderr / syslog / memory
//! ```

pub mod level;
pub mod record;
pub mod sink;
pub mod fields;
pub mod format;
pub mod hostname;
pub mod destination;
pub mod request_logger;
pub mod layer;

pub mod stream_sink;
pub mod memory_sink;
#[cfg(all(unix, feature = "syslog"))]
pub mod syslog;

pub mod backend;
pub mod env;
pub mod init;

pub use backend::{must_resolve, resolve, BackendKind, RegistryError};
pub use destination::{Destination, LeveledLogger};
pub use fields::{extract, Fields, HasStatusCode, RequestView, ResponseView, StatusRecorder};
#[cfg(feature = "logstash")]
pub use format::LogstashFormatter;
pub use format::{FormatError, Formatter, ParseFormatError, TextFormatter};
pub use level::Severity;
pub use memory_sink::MemorySink;
pub use request_logger::RequestLogger;
