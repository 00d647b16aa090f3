//! Template formats.

use serde::Serialize;
use std::fmt;

/// Formats every registry knows about, as `(token, mime)` pairs.
pub const BUILTIN_FORMATS: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("text", "text/plain"),
    ("js", "text/javascript"),
    ("css", "text/css"),
    ("ics", "text/calendar"),
    ("csv", "text/csv"),
    ("xml", "application/xml"),
    ("rss", "application/rss+xml"),
    ("atom", "application/atom+xml"),
    ("yaml", "application/x-yaml"),
    ("json", "application/json"),
];

/// A resolved output format: the filename token plus its MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Format {
    token: String,
    mime: String,
}

impl Format {
    /// Create a format from a token and MIME type.
    pub fn new(token: impl Into<String>, mime: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            mime: mime.into(),
        }
    }

    /// The filename token (`html`).
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The MIME type (`text/html`).
    pub fn mime(&self) -> &str {
        &self.mime
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mime)
    }
}
