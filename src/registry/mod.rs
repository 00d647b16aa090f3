//! Template handler and format registry.
//!
//! The resolver never decides on its own what a file extension means. It
//! asks a [`Registry`] two questions about every matched file:
//! - which [`Handler`] owns the trailing extension (`show.html.erb` → `erb`)
//! - which [`Format`] the token before it names (`html` → `text/html`)
//!
//! [`HandlerRegistry`] is the stock implementation: a set of built-in
//! handlers and MIME formats that configuration can extend.
//!
//! # Example
//!
//! ```
//! use stencil::registry::{HandlerRegistry, Registry};
//!
//! let registry = HandlerRegistry::new();
//!
//! let erb = registry.handler_for("erb").unwrap();
//! assert_eq!(erb.extension(), "erb");
//!
//! let html = registry.format_for("html").unwrap();
//! assert_eq!(html.mime(), "text/html");
//! ```

pub mod builtin;
pub mod format;
pub mod handler;

// Re-exports
pub use builtin::HandlerRegistry;
pub use format::{Format, BUILTIN_FORMATS};
pub use handler::Handler;

use std::sync::Arc;

/// Maps filename tokens to handlers and formats.
///
/// Implementations are expected to be cheap to query; the variant matcher
/// calls them once or twice per matched file.
pub trait Registry {
    /// Look up the handler registered for an extension token.
    ///
    /// Returns `None` for unknown tokens; the caller turns that into an
    /// [`UnknownHandler`](crate::StencilError::UnknownHandler) error.
    fn handler_for(&self, extension: &str) -> Option<Arc<Handler>>;

    /// Look up the format a token names, if it is registered.
    fn format_for(&self, token: &str) -> Option<Format>;

    /// The format a handler declares for files that carry no format token.
    fn default_format_of(&self, handler: &Handler) -> Option<Format> {
        handler.default_format().cloned()
    }

    /// Handler used for files without any extension.
    fn default_handler(&self) -> Option<Arc<Handler>>;
}

impl<R: Registry + ?Sized> Registry for Arc<R> {
    fn handler_for(&self, extension: &str) -> Option<Arc<Handler>> {
        (**self).handler_for(extension)
    }

    fn format_for(&self, token: &str) -> Option<Format> {
        (**self).format_for(token)
    }

    fn default_format_of(&self, handler: &Handler) -> Option<Format> {
        (**self).default_format_of(handler)
    }

    fn default_handler(&self) -> Option<Arc<Handler>> {
        (**self).default_handler()
    }
}
