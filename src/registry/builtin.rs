//! Built-in handlers and formats, extendable from configuration.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::config::StencilConfig;
use crate::registry::format::{Format, BUILTIN_FORMATS};
use crate::registry::handler::Handler;
use crate::registry::Registry;

/// Handlers every registry starts with, as `(extension, default format)`.
const BUILTIN_HANDLERS: &[(&str, Option<&str>)] = &[
    ("erb", None),
    ("builder", None),
    ("raw", None),
    ("rjs", Some("js")),
];

/// Handler used for files that carry no extension at all.
const BUILTIN_DEFAULT_HANDLER: &str = "erb";

/// The stock [`Registry`]: built-in handlers and MIME formats plus
/// whatever configuration adds on top.
#[derive(Debug, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<Handler>>,
    formats: HashMap<String, Format>,
    default_handler: Option<String>,
}

impl HandlerRegistry {
    /// Create a registry with the built-in handlers and formats.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for (token, mime) in BUILTIN_FORMATS {
            registry.register_format(*token, *mime);
        }
        for (extension, default_format) in BUILTIN_HANDLERS {
            registry.register_handler(*extension, *default_format);
        }
        registry.default_handler = Some(BUILTIN_DEFAULT_HANDLER.to_string());
        registry
    }

    /// Create a registry that knows nothing.
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
            formats: HashMap::new(),
            default_handler: None,
        }
    }

    /// Create a registry from the built-ins layered with configuration.
    ///
    /// Formats are registered before handlers so a configured handler can
    /// default to a configured format.
    pub fn from_config(config: &StencilConfig) -> Self {
        let mut registry = Self::new();

        for (token, mime) in &config.formats {
            registry.register_format(token.as_str(), mime.as_str());
        }
        for (extension, handler) in &config.handlers {
            registry.register_handler(extension.as_str(), handler.default_format.as_deref());
        }
        if let Some(extension) = &config.settings.default_handler {
            if !registry.set_default_handler(extension) {
                warn!(
                    "Default handler '{}' is not registered, keeping '{}'",
                    extension, BUILTIN_DEFAULT_HANDLER
                );
            }
        }

        registry
    }

    /// Register (or replace) a format.
    pub fn register_format(&mut self, token: impl Into<String>, mime: impl Into<String>) {
        let format = Format::new(token, mime);
        self.formats.insert(format.token().to_string(), format);
    }

    /// Register (or replace) a handler.
    ///
    /// A default format token that is not registered is dropped with a warning.
    pub fn register_handler(&mut self, extension: impl Into<String>, default_format: Option<&str>) {
        let extension = extension.into();
        let mut handler = Handler::new(extension.clone());

        if let Some(token) = default_format {
            match self.formats.get(token) {
                Some(format) => handler = handler.with_default_format(format.clone()),
                None => warn!(
                    "Handler '{}' declares unknown default format '{}'",
                    extension, token
                ),
            }
        }

        self.handlers.insert(extension, Arc::new(handler));
    }

    /// Make a registered handler the one used for extensionless files.
    ///
    /// Returns `false` (and changes nothing) if the extension is unknown.
    pub fn set_default_handler(&mut self, extension: &str) -> bool {
        if self.handlers.contains_key(extension) {
            self.default_handler = Some(extension.to_string());
            true
        } else {
            false
        }
    }

    /// All registered handlers, sorted by extension.
    pub fn handlers(&self) -> Vec<&Handler> {
        let mut handlers: Vec<&Handler> = self.handlers.values().map(Arc::as_ref).collect();
        handlers.sort_by(|a, b| a.extension().cmp(b.extension()));
        handlers
    }

    /// All registered formats, sorted by token.
    pub fn formats(&self) -> Vec<&Format> {
        let mut formats: Vec<&Format> = self.formats.values().collect();
        formats.sort_by(|a, b| a.token().cmp(b.token()));
        formats
    }

    /// Extension of the handler used for extensionless files.
    pub fn default_handler_extension(&self) -> Option<&str> {
        self.default_handler.as_deref()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry for HandlerRegistry {
    fn handler_for(&self, extension: &str) -> Option<Arc<Handler>> {
        self.handlers.get(extension).cloned()
    }

    fn format_for(&self, token: &str) -> Option<Format> {
        self.formats.get(token).cloned()
    }

    fn default_handler(&self) -> Option<Arc<Handler>> {
        self.default_handler
            .as_deref()
            .and_then(|extension| self.handler_for(extension))
    }
}
