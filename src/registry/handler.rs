//! Template handlers.

use serde::Serialize;

use super::format::Format;

/// A template handler, identified by the file extension it claims.
///
/// Handlers are opaque to the resolver. It only carries them on the
/// templates it discovers so the rendering layer knows what to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Handler {
    extension: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_format: Option<Format>,
}

impl Handler {
    /// Create a handler for an extension.
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            default_format: None,
        }
    }

    /// Declare the format used when a file names none.
    pub fn with_default_format(mut self, format: Format) -> Self {
        self.default_format = Some(format);
        self
    }

    /// The extension this handler claims (`erb`).
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// The declared default format, if any.
    pub fn default_format(&self) -> Option<&Format> {
        self.default_format.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_without_default_format() {
        let handler = Handler::new("erb");
        assert_eq!(handler.extension(), "erb");
        assert!(handler.default_format().is_none());
    }

    #[test]
    fn handler_with_default_format() {
        let handler = Handler::new("rjs").with_default_format(Format::new("js", "text/javascript"));
        assert_eq!(handler.default_format().map(Format::token), Some("js"));
    }
}
