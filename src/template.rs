//! Discovered template sources.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::registry::{Format, Handler};

/// One template source found by a scan.
///
/// A template is built once per discovery. Its `locals` are stamped by the
/// resolution cache before the template is handed to anyone; after that
/// the template is shared read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Template {
    #[serde(skip)]
    source: Vec<u8>,
    identifier: PathBuf,
    handler: Arc<Handler>,
    virtual_path: String,
    format: Option<Format>,
    locals: Arc<[String]>,
}

impl Template {
    /// Create a template with no locals.
    pub fn new(
        source: Vec<u8>,
        identifier: impl Into<PathBuf>,
        handler: Arc<Handler>,
        virtual_path: impl Into<String>,
        format: Option<Format>,
    ) -> Self {
        Self {
            source,
            identifier: identifier.into(),
            handler,
            virtual_path: virtual_path.into(),
            format,
            locals: Arc::from(Vec::new()),
        }
    }

    /// Raw bytes of the template source.
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    /// Absolute location the source was read from.
    pub fn identifier(&self) -> &Path {
        &self.identifier
    }

    /// The handler that owns this template.
    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    /// Logical path shared by every variant of the template (`posts/_form`).
    pub fn virtual_path(&self) -> &str {
        &self.virtual_path
    }

    /// Resolved format; `None` when neither the file, the handler nor the
    /// lookup supplied one.
    pub fn format(&self) -> Option<&Format> {
        self.format.as_ref()
    }

    /// Local variable names the template expects, sorted.
    pub fn locals(&self) -> &[String] {
        &self.locals
    }

    /// Stamp the canonical locals onto this template.
    pub(crate) fn set_locals(&mut self, locals: Arc<[String]>) {
        self.locals = locals;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> Template {
        Template::new(
            b"<h1><%= title %></h1>".to_vec(),
            "/views/posts/show.html.erb",
            Arc::new(Handler::new("erb")),
            "posts/show",
            Some(Format::new("html", "text/html")),
        )
    }

    #[test]
    fn new_template_has_no_locals() {
        let t = template();
        assert!(t.locals().is_empty());
        assert_eq!(t.virtual_path(), "posts/show");
        assert_eq!(t.identifier(), Path::new("/views/posts/show.html.erb"));
        assert_eq!(t.handler().extension(), "erb");
        assert_eq!(t.format().map(Format::token), Some("html"));
    }

    #[test]
    fn set_locals_is_idempotent() {
        let locals: Arc<[String]> = Arc::from(vec!["post".to_string(), "user".to_string()]);
        let mut t = template();
        t.set_locals(locals.clone());
        let once = t.clone();
        t.set_locals(locals);
        assert_eq!(t, once);
        assert_eq!(t.locals(), ["post", "user"]);
    }

    #[test]
    fn serializes_without_source_bytes() {
        let json = serde_json::to_value(template()).unwrap();
        assert!(json.get("source").is_none());
        assert_eq!(json["virtual_path"], "posts/show");
        assert_eq!(json["format"]["mime"], "text/html");
        assert_eq!(json["handler"]["extension"], "erb");
    }
}
