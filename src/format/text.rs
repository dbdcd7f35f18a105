use std::collections::BTreeMap;
use std::fmt::Write;

use super::{FormatError, Formatter};
use crate::fields::Fields;
use crate::hostname::hostname;

/// Plain one-line formatter.
///
/// Output looks like
/// `testApp web-1 > Method: GET Path: /foo Status: 200 Host: dill.on.com Headers: map[X-Foo:[Gaz]]`.
/// No timestamp is written; the sink prefixes its own.
#[derive(Debug, Clone)]
pub struct TextFormatter {
    source: String,
}

impl TextFormatter {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    fn render(&self, host: &str, fields: &Fields) -> String {
        format!(
            "{} {} > Method: {} Path: {} Status: {} Host: {} Headers: {}",
            self.source,
            host,
            fields.method,
            fields.path,
            fields.status,
            fields.host,
            headers_repr(&fields.headers),
        )
    }
}

impl Formatter for TextFormatter {
    fn format(&self, fields: &Fields) -> Result<String, FormatError> {
        Ok(self.render(&hostname(), fields))
    }
}

/// `map[Name:[v1 v2] Other:[v]]`, names in sorted order.
pub fn headers_repr(headers: &BTreeMap<String, Vec<String>>) -> String {
    let mut out = String::from("map[");
    for (i, (name, values)) in headers.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{}:[{}]", name, values.join(" "));
    }
    out.push(']');
    out
}
