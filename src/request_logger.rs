use std::fmt;
use std::sync::Arc;

use crate::destination::LeveledLogger;
use crate::fields::{extract, RequestView, ResponseView};
use crate::format::{FormatError, Formatter};
use crate::level::Severity;

/// Logs one line per HTTP request through a [`Formatter`] into a
/// [`LeveledLogger`].
///
/// ```rust,ignore
/// let destination = backend::resolve("api", &[BackendKind::StdOut])?;
/// let logger = RequestLogger::new(
///     "api",
///     Arc::new(destination),
///     Arc::new(LogstashFormatter::new("api", ["http"])),
/// );
/// logger.info(&response, &request);
/// ```
#[derive(Clone)]
pub struct RequestLogger {
    name: String,
    formatter: Arc<dyn Formatter>,
    destination: Arc<dyn LeveledLogger>,
}

impl RequestLogger {
    pub fn new(
        name: impl Into<String>,
        destination: Arc<dyn LeveledLogger>,
        formatter: Arc<dyn Formatter>,
    ) -> Self {
        Self {
            name: name.into(),
            formatter,
            destination,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Extract the request fields and render them with the bound formatter.
    pub fn format<S, R>(&self, response: &S, request: &R) -> Result<String, FormatError>
    where
        S: ResponseView + ?Sized,
        R: RequestView + ?Sized,
    {
        self.formatter.format(&extract(response, request))
    }

    /// Format and write at `level`.
    ///
    /// A formatting failure never reaches the caller: the line
    /// `formatting failed: <error>` is written at the same level instead.
    #[track_caller]
    pub fn log<S, R>(&self, level: Severity, response: &S, request: &R)
    where
        S: ResponseView + ?Sized,
        R: RequestView + ?Sized,
    {
        let line = match self.format(response, request) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(logger = %self.name, error = %e, "request log formatting failed");
                format!("formatting failed: {}", e)
            }
        };
        self.destination.log(level, "", &line);
    }

    #[track_caller]
    pub fn debug<S, R>(&self, response: &S, request: &R)
    where
        S: ResponseView + ?Sized,
        R: RequestView + ?Sized,
    {
        self.log(Severity::Debug, response, request)
    }

    #[track_caller]
    pub fn info<S, R>(&self, response: &S, request: &R)
    where
        S: ResponseView + ?Sized,
        R: RequestView + ?Sized,
    {
        self.log(Severity::Info, response, request)
    }

    #[track_caller]
    pub fn warning<S, R>(&self, response: &S, request: &R)
    where
        S: ResponseView + ?Sized,
        R: RequestView + ?Sized,
    {
        self.log(Severity::Warning, response, request)
    }

    #[track_caller]
    pub fn error<S, R>(&self, response: &S, request: &R)
    where
        S: ResponseView + ?Sized,
        R: RequestView + ?Sized,
    {
        self.log(Severity::Error, response, request)
    }

    #[track_caller]
    pub fn critical<S, R>(&self, response: &S, request: &R)
    where
        S: ResponseView + ?Sized,
        R: RequestView + ?Sized,
    {
        self.log(Severity::Critical, response, request)
    }
}

impl fmt::Debug for RequestLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestLogger").field("name", &self.name).finish()
    }
}
