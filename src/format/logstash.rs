use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use super::{FormatError, Formatter};
use crate::fields::Fields;

/// Logstash `json_event` formatter.
///
/// Wraps each record into an [`Envelope`] carrying the configured source and
/// tags and the time of formatting, then serialises it as compact JSON.
#[derive(Debug, Clone)]
pub struct LogstashFormatter {
    source: String,
    tags: Vec<String>,
}

/// Wire shape of a structured line.
#[derive(Debug, Serialize)]
pub struct Envelope<'a> {
    #[serde(rename = "@source")]
    pub source: &'a str,
    #[serde(rename = "@fields")]
    pub fields: &'a Fields,
    #[serde(rename = "@tags")]
    pub tags: &'a [String],
    #[serde(rename = "@timestamp")]
    pub timestamp: String,
}

impl LogstashFormatter {
    pub fn new<I, T>(source: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            source: source.into(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl Formatter for LogstashFormatter {
    fn format(&self, fields: &Fields) -> Result<String, FormatError> {
        let envelope = Envelope {
            source: &self.source,
            fields,
            tags: &self.tags,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true),
        };
        serde_json::to_string(&envelope).map_err(|e| FormatError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn sample_fields() -> Fields {
        let mut fields = Fields {
            method: "GET".to_string(),
            status: "200".to_string(),
            path: "/foo/bar?x=1".to_string(),
            host: "dill.on.com".to_string(),
            ..Fields::default()
        };
        fields
            .headers
            .insert("X-Foo".to_string(), vec!["Gaz".to_string(), "Baz".to_string()]);
        fields
    }

    #[test]
    fn test_logstash_envelope_keys() {
        let formatter = LogstashFormatter::new("fooApp", ["blimp", "foo"]);
        let data = formatter.format(&sample_fields()).unwrap();
        let value: Value = serde_json::from_str(&data).unwrap();

        assert_eq!(value["@source"], "fooApp");
        assert_eq!(value["@tags"], json!(["blimp", "foo"]));
        assert_eq!(
            value["@fields"],
            json!({
                "method": "GET",
                "status": "200",
                "path": "/foo/bar?x=1",
                "host": "dill.on.com",
                "headers": { "X-Foo": ["Gaz", "Baz"] }
            })
        );
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 4);
    }

    #[test]
    fn test_logstash_timestamp_is_rfc3339_nanos() {
        let formatter = LogstashFormatter::new("fooApp", Vec::<String>::new());
        let data = formatter.format(&Fields::default()).unwrap();
        let value: Value = serde_json::from_str(&data).unwrap();

        let ts = value["@timestamp"].as_str().unwrap();
        let parsed = chrono::DateTime::parse_from_rfc3339(ts).unwrap();
        assert!(ts.ends_with('Z'));
        // nine fractional digits
        let fraction = ts.rsplit('.').next().unwrap().trim_end_matches('Z');
        assert_eq!(fraction.len(), 9);
        assert!(parsed.timestamp() > 0);
    }

    #[test]
    fn test_logstash_output_is_single_line() {
        let formatter = LogstashFormatter::new("fooApp", ["a"]);
        let data = formatter.format(&sample_fields()).unwrap();
        assert!(!data.contains('\n'));
    }

    #[test]
    fn test_empty_tags_serialise_as_array() {
        let formatter = LogstashFormatter::new("svc", Vec::<&str>::new());
        let data = formatter.format(&Fields::default()).unwrap();
        let value: Value = serde_json::from_str(&data).unwrap();
        assert_eq!(value["@tags"], json!([]));
        assert_eq!(value["@fields"]["headers"], json!({}));
    }
}
