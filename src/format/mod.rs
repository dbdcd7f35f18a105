//! Rendering of [`Fields`] into a single log line.

use crate::fields::Fields;

#[cfg(feature = "logstash")]
mod logstash;
mod text;

#[cfg(feature = "logstash")]
pub use logstash::{Envelope, LogstashFormatter};
pub use text::{headers_repr, TextFormatter};

/// Error returned when a formatter cannot render a record.
#[derive(thiserror::Error, Debug)]
pub enum FormatError {
    #[error("error marshalling JSON: {0}")]
    Serialization(String),

    #[error("{0}")]
    Other(String),
}

/// Turns a request record into the string handed to the destination.
///
/// Implementations hold only read-only configuration and can be shared across
/// threads; every call is a pure function of that configuration, the record
/// and the current time or hostname.
pub trait Formatter: Send + Sync {
    fn format(&self, fields: &Fields) -> Result<String, FormatError>;
}

/// Error returned when a format name is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown format: {0:?}")]
pub struct ParseFormatError(pub String);

/// Which built-in formatter to construct from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormatKind {
    #[default]
    Logstash,
    Text,
}

impl std::str::FromStr for FormatKind {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "logstash" | "json" => Ok(FormatKind::Logstash),
            "text" | "plain" => Ok(FormatKind::Text),
            other => Err(ParseFormatError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_kind_parse() {
        assert_eq!("json".parse::<FormatKind>().unwrap(), FormatKind::Logstash);
        assert_eq!("Text".parse::<FormatKind>().unwrap(), FormatKind::Text);
        assert_eq!(
            "xml".parse::<FormatKind>(),
            Err(ParseFormatError("xml".to_string()))
        );
        assert_eq!(
            ParseFormatError("xml".to_string()).to_string(),
            "unknown format: \"xml\""
        );
    }
}
