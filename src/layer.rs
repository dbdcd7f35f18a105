use std::fmt::Write;

use chrono::Utc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::destination::{Destination, LeveledLogger};
use crate::level::Severity;
use crate::record::LogRecord;

/// Target used by [`TracingLogger`] for the events it emits.
pub const TRACING_TARGET: &str = "http_clerk";

/// `tracing_subscriber` layer that forwards events into a [`Destination`].
///
/// Events are mapped to a [`Severity`] from their level; an `ERROR` event
/// carrying `critical = true` becomes [`Severity::Critical`]. The `message`
/// field becomes the line, a `tag` string field becomes the record's tag,
/// the remaining fields are appended as `key=value`. Forwarding is synchronous on the emitting thread.
pub struct DestinationLayer {
    destination: Destination,
}

impl DestinationLayer {
    pub fn new(destination: Destination) -> Self {
        Self { destination }
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }
}

impl<S> Layer<S> for DestinationLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let mut level = Severity::from_tracing(meta.level());
        if visitor.critical && level == Severity::Error {
            level = Severity::Critical;
        }
        if !self.destination.enabled(level) {
            return;
        }

        let tag = std::mem::take(&mut visitor.tag);
        let record = LogRecord {
            timestamp: Utc::now(),
            level,
            target: meta.target().to_string(),
            file: meta.file().map(|s| s.to_string()),
            line: meta.line(),
            tag,
            message: visitor.into_line(),
        };
        self.destination.dispatch(&record);
    }
}

/// Collects the `message` and `tag` of an event and renders every other
/// field as `key=value`.
#[derive(Default)]
pub struct FieldVisitor {
    pub message: Option<String>,
    pub tag: String,
    pub fields: Vec<(String, String)>,
    pub critical: bool,
}

impl FieldVisitor {
    pub fn into_line(self) -> String {
        let mut line = self.message.unwrap_or_default();
        for (key, value) in &self.fields {
            if !line.is_empty() {
                line.push(' ');
            }
            let _ = write!(line, "{}={}", key, value);
        }
        line
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = Some(value.to_string()),
            "tag" => self.tag = value.to_string(),
            name => self.fields.push((name.to_string(), value.to_string())),
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.push((field.name().to_string(), value.to_string()));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "critical" {
            self.critical = value;
        } else {
            self.fields.push((field.name().to_string(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.fields.push((field.name().to_string(), format!("{:?}", value)));
        }
    }
}

/// [`LeveledLogger`] that emits into whatever `tracing` subscriber is
/// installed.
///
/// `Critical` has no `tracing` level; it is emitted as `ERROR` with
/// `critical = true`, which [`DestinationLayer`] maps back. A non-empty tag
/// travels as the `tag` field; an empty one is not emitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

macro_rules! emit {
    ($mac:ident, $tag:expr, $message:expr $(, $key:ident = $value:expr)*) => {
        if $tag.is_empty() {
            tracing::$mac!(target: TRACING_TARGET, $($key = $value,)* "{}", $message)
        } else {
            tracing::$mac!(target: TRACING_TARGET, tag = $tag, $($key = $value,)* "{}", $message)
        }
    };
}

impl LeveledLogger for TracingLogger {
    fn log(&self, level: Severity, tag: &str, message: &str) {
        match level {
            Severity::Debug => emit!(debug, tag, message),
            Severity::Info => emit!(info, tag, message),
            Severity::Warning => emit!(warn, tag, message),
            Severity::Error => emit!(error, tag, message),
            Severity::Critical => emit!(error, tag, message, critical = true),
        }
    }
}
