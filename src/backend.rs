use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use crate::destination::Destination;
use crate::memory_sink::{MemorySink, DEFAULT_MEMORY_CAPACITY};
use crate::sink::LogSink;
use crate::stream_sink::StreamSink;

/// Supported backend kinds that can be selected via config.
///
/// The discriminants are part of the configuration format and never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BackendKind {
    /// Line-oriented writer on standard error.
    StdOut = 0,
    /// Local syslog daemon.
    SysLog = 1,
    /// Bounded in-memory ring, for tests and introspection.
    Memory = 2,
}

impl TryFrom<u8> for BackendKind {
    type Error = ParseBackendError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(BackendKind::StdOut),
            1 => Ok(BackendKind::SysLog),
            2 => Ok(BackendKind::Memory),
            other => Err(ParseBackendError::UnknownKind(other.to_string())),
        }
    }
}

impl FromStr for BackendKind {
    type Err = ParseBackendError;

    /// Accepts the stable integer or a name: `stdout`/`stderr`, `syslog`,
    /// `memory`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u8>() {
            return BackendKind::try_from(n);
        }
        match s.to_ascii_lowercase().as_str() {
            "stdout" | "stderr" => Ok(BackendKind::StdOut),
            "syslog" => Ok(BackendKind::SysLog),
            "memory" => Ok(BackendKind::Memory),
            _ => Err(ParseBackendError::UnknownKind(s.to_string())),
        }
    }
}

/// Parse a comma separated backend list such as `"stdout,syslog"` or
/// `"0,2"`. Empty items are skipped; an empty result is returned as-is and
/// rejected later by [`resolve`].
pub fn parse_backends(list: &str) -> Result<Vec<BackendKind>, ParseBackendError> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(BackendKind::from_str)
        .collect()
}

/// Error type returned when parsing a backend selection.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseBackendError {
    #[error("unknown backend kind: {0:?}")]
    UnknownKind(String),
}

/// Configuration errors raised while resolving backends.
#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    #[error("no log backend selected")]
    EmptySelection,

    #[error("unable to reach the system log for {name:?}: {source}")]
    SyslogUnavailable {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("backend {0:?} requires a disabled cargo feature")]
    FeatureDisabled(BackendKind),
}

/// Backend selection plus the knobs the individual sinks need.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Name of the destination; also the syslog ident.
    pub name: String,
    /// Selected backends, in fan-out order. Repeats are allowed.
    pub kinds: Vec<BackendKind>,
    /// Capacity of each memory ring.
    pub memory_capacity: usize,
    /// Syslog socket to use instead of probing the well-known paths.
    pub syslog_path: Option<PathBuf>,
}

impl BackendConfig {
    pub fn new(name: impl Into<String>, kinds: Vec<BackendKind>) -> Self {
        BackendConfig {
            name: name.into(),
            kinds,
            memory_capacity: DEFAULT_MEMORY_CAPACITY,
            syslog_path: None,
        }
    }

    pub fn with_memory_capacity(mut self, capacity: usize) -> Self {
        self.memory_capacity = capacity;
        self
    }

    pub fn with_syslog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.syslog_path = Some(path.into());
        self
    }
}

/// Create the concrete sink for one backend kind.
pub fn make_sink(kind: BackendKind, name: &str) -> Result<Arc<dyn LogSink>, RegistryError> {
    match kind {
        BackendKind::StdOut => Ok(Arc::new(StreamSink::stderr())),
        BackendKind::SysLog => make_syslog_sink(name, None),
        BackendKind::Memory => Ok(Arc::new(MemorySink::new(DEFAULT_MEMORY_CAPACITY))),
    }
}

#[cfg(all(unix, feature = "syslog"))]
fn make_syslog_sink(name: &str, path: Option<&Path>) -> Result<Arc<dyn LogSink>, RegistryError> {
    use crate::syslog::SyslogSink;

    let sink = match path {
        Some(path) => SyslogSink::connect_to(name, path),
        None => SyslogSink::connect(name),
    }
    .map_err(|source| RegistryError::SyslogUnavailable {
        name: name.to_string(),
        source,
    })?;
    Ok(Arc::new(sink))
}

#[cfg(not(all(unix, feature = "syslog")))]
fn make_syslog_sink(_name: &str, _path: Option<&Path>) -> Result<Arc<dyn LogSink>, RegistryError> {
    Err(RegistryError::FeatureDisabled(BackendKind::SysLog))
}

/// Build a [`Destination`] named `name` that fans out to one sink per
/// requested kind, with default sink settings.
///
/// Nothing global is installed; thread the returned handle into a
/// [`RequestLogger`](crate::request_logger::RequestLogger).
pub fn resolve(name: &str, kinds: &[BackendKind]) -> Result<Destination, RegistryError> {
    resolve_config(&BackendConfig::new(name, kinds.to_vec()))
}

/// Same as [`resolve`], driven by a full [`BackendConfig`].
pub fn resolve_config(cfg: &BackendConfig) -> Result<Destination, RegistryError> {
    if cfg.kinds.is_empty() {
        return Err(RegistryError::EmptySelection);
    }

    let mut destination = Destination::new(cfg.name.clone());
    for &kind in &cfg.kinds {
        destination = match kind {
            BackendKind::Memory => {
                destination.with_memory_sink(Arc::new(MemorySink::new(cfg.memory_capacity)))
            }
            BackendKind::SysLog => {
                destination.with_sink(make_syslog_sink(&cfg.name, cfg.syslog_path.as_deref())?)
            }
            BackendKind::StdOut => destination.with_sink(make_sink(kind, &cfg.name)?),
        };
    }

    tracing::debug!(name = %cfg.name, kinds = ?cfg.kinds, "resolved log backends");
    Ok(destination)
}

/// Like [`resolve`], but a configuration error is printed to stderr and
/// terminates the process with exit status 1.
pub fn must_resolve(name: &str, kinds: &[BackendKind]) -> Destination {
    match resolve(name, kinds) {
        Ok(destination) => destination,
        Err(e) => {
            eprintln!("http-clerk: {}", e);
            std::process::exit(1);
        }
    }
}
