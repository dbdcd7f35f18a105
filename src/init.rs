use std::sync::{Arc, OnceLock};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

use crate::backend::{self, BackendConfig, BackendKind, ParseBackendError, RegistryError};
use crate::destination::Destination;
use crate::env::*;
use crate::format::{FormatKind, Formatter, ParseFormatError, TextFormatter};
use crate::layer::DestinationLayer;
use crate::level::{ParseSeverityError, Severity};
use crate::memory_sink::DEFAULT_MEMORY_CAPACITY;
use crate::request_logger::RequestLogger;

/// Request logging configuration.
///
/// **Fields**
/// - `name`: destination name, used as syslog ident and as the
///   [`RequestLogger`] name.
/// - `backends`: sinks to fan out to, in order. Must not be empty.
/// - `memory_capacity`: size of each memory ring.
/// - `min_level`: lines below this severity are dropped.
/// - `format`, `source`, `tags`: which formatter to build and its settings.
///   `tags` are ignored by the text format.
/// - `install_subscriber`: [`init_global`] also installs a global `tracing`
///   subscriber that forwards events into the destination.
/// - `enable_stdout`: with `install_subscriber`, additionally print events
///   through a `tracing_subscriber::fmt` layer.
#[derive(Clone, Debug)]
pub struct ClerkConfig {
    pub name: String,
    pub backends: Vec<BackendKind>,
    pub memory_capacity: usize,
    pub min_level: Severity,
    pub format: FormatKind,
    pub source: String,
    pub tags: Vec<String>,
    pub install_subscriber: bool,
    pub enable_stdout: bool,
}

impl Default for ClerkConfig {
    fn default() -> Self {
        Self {
            name: "http-clerk".to_string(),
            backends: vec![BackendKind::StdOut],
            memory_capacity: DEFAULT_MEMORY_CAPACITY,
            min_level: Severity::Debug,
            format: FormatKind::Logstash,
            source: "http-clerk".to_string(),
            tags: Vec::new(),
            install_subscriber: false,
            enable_stdout: false,
        }
    }
}

impl ClerkConfig {
    /// Read the `HTTP_CLERK_*` variables, keeping defaults for unset ones.
    pub fn from_env() -> Result<Self, InitError> {
        let mut config = ClerkConfig::default();
        if let Ok(name) = std::env::var(HTTP_CLERK_NAME_ENV) {
            config.source = name.clone();
            config.name = name;
        }
        if let Ok(list) = std::env::var(HTTP_CLERK_BACKENDS_ENV) {
            config.backends = backend::parse_backends(&list)?;
        }
        if let Ok(capacity) = std::env::var(HTTP_CLERK_MEMORY_CAPACITY_ENV) {
            config.memory_capacity = capacity
                .trim()
                .parse()
                .map_err(|_| InitError::InvalidValue(HTTP_CLERK_MEMORY_CAPACITY_ENV, capacity))?;
        }
        if let Ok(level) = std::env::var(HTTP_CLERK_LEVEL_ENV) {
            config.min_level = level.parse()?;
        }
        config.format = env_or(HTTP_CLERK_FORMAT_ENV, "logstash").parse()?;
        if let Ok(source) = std::env::var(HTTP_CLERK_SOURCE_ENV) {
            config.source = source;
        }
        if let Ok(tags) = std::env::var(HTTP_CLERK_TAGS_ENV) {
            config.tags = tags
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
        }
        Ok(config)
    }

    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig::new(self.name.clone(), self.backends.clone())
            .with_memory_capacity(self.memory_capacity)
    }

    /// Construct the configured formatter.
    pub fn formatter(&self) -> Result<Arc<dyn Formatter>, InitError> {
        match self.format {
            #[cfg(feature = "logstash")]
            FormatKind::Logstash => Ok(Arc::new(crate::format::LogstashFormatter::new(
                self.source.clone(),
                self.tags.clone(),
            ))),
            #[cfg(not(feature = "logstash"))]
            FormatKind::Logstash => Err(InitError::FeatureDisabled("logstash")),
            FormatKind::Text => Ok(Arc::new(TextFormatter::new(self.source.clone()))),
        }
    }
}

/// Errors raised while turning configuration into a logger.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Backend(#[from] ParseBackendError),

    #[error(transparent)]
    Severity(#[from] ParseSeverityError),

    #[error(transparent)]
    Format(#[from] ParseFormatError),

    #[error("invalid value for {0}: {1:?}")]
    InvalidValue(&'static str, String),

    #[error("{0} feature is not enabled")]
    FeatureDisabled(&'static str),

    #[error("request logging is already initialized")]
    AlreadyInitialized,

    #[error("request logging has not been initialized")]
    NotInitialized,

    #[error("failed to set global tracing subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Resolve the configured backends and bind a [`RequestLogger`] to them.
///
/// Installs nothing globally.
pub fn build(config: &ClerkConfig) -> Result<(Destination, RequestLogger), InitError> {
    let destination = backend::resolve_config(&config.backend_config())?
        .with_min_level(config.min_level);
    let logger = RequestLogger::new(
        config.name.clone(),
        Arc::new(destination.clone()),
        config.formatter()?,
    );
    Ok((destination, logger))
}

static GLOBAL: OnceLock<Destination> = OnceLock::new();

/// Install the process-wide default destination.
///
/// The destination lives for the rest of the process; there is no teardown.
/// Only the first successful call has an effect, later calls return
/// [`InitError::AlreadyInitialized`]. If another global `tracing` subscriber
/// is already set, [`InitError::Subscriber`] is returned and nothing is
/// installed. With `install_subscriber` set, a
/// [`Registry`] with [`DestinationLayer`] (and a `fmt` layer when
/// `enable_stdout` is set) becomes the global `tracing` subscriber.
pub fn init_global(config: &ClerkConfig) -> Result<&'static Destination, InitError> {
    if GLOBAL.get().is_some() {
        return Err(InitError::AlreadyInitialized);
    }
    let destination = backend::resolve_config(&config.backend_config())?
        .with_min_level(config.min_level);

    // GLOBAL is only committed once the subscriber is in place, so a failed
    // install leaves the process uninitialized and the call can be retried.
    if config.install_subscriber {
        let layer = DestinationLayer::new(destination.clone());
        if config.enable_stdout {
            let fmt_layer = tracing_subscriber::fmt::layer();
            let subscriber = Registry::default().with(layer).with(fmt_layer);
            tracing::subscriber::set_global_default(subscriber)?;
        } else {
            let subscriber = Registry::default().with(layer);
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    if GLOBAL.set(destination).is_err() {
        return Err(InitError::AlreadyInitialized);
    }
    GLOBAL.get().ok_or(InitError::AlreadyInitialized)
}

/// The destination installed by [`init_global`], if any.
pub fn global() -> Option<&'static Destination> {
    GLOBAL.get()
}

/// [`RequestLogger`] writing into the global destination.
pub fn global_request_logger(config: &ClerkConfig) -> Result<RequestLogger, InitError> {
    let destination = global().ok_or(InitError::NotInitialized)?;
    Ok(RequestLogger::new(
        config.name.clone(),
        Arc::new(destination.clone()),
        config.formatter()?,
    ))
}
