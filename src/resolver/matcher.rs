//! Variant matching against a backing store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{Result, StencilError};
use crate::registry::{Format, Handler, Registry};
use crate::resolver::query::{build_query, escape_literal, Qualifiers};
use crate::resolver::store::Store;
use crate::template::Template;

/// Something that can find every variant of a canonical template path.
pub trait TemplateSource {
    /// Find all templates stored under `path` that satisfy `qualifiers`.
    ///
    /// `format_hint` lists formats to fall back on for templates whose
    /// filename and handler name none. The scan is all-or-nothing: any
    /// error discards every template found so far.
    fn scan(
        &self,
        path: &str,
        qualifiers: &Qualifiers<'_>,
        format_hint: &[String],
    ) -> Result<Vec<Template>>;
}

impl<T: TemplateSource + ?Sized> TemplateSource for Box<T> {
    fn scan(
        &self,
        path: &str,
        qualifiers: &Qualifiers<'_>,
        format_hint: &[String],
    ) -> Result<Vec<Template>> {
        (**self).scan(path, qualifiers, format_hint)
    }
}

/// Matches template variants under a root directory of a [`Store`].
///
/// Every variant found for a lookup reports the canonical path it was
/// looked up by as its virtual path, whichever physical file matched.
#[derive(Debug, Clone)]
pub struct PathMatcher<S, R> {
    root: PathBuf,
    store: S,
    registry: R,
}

impl<S: Store, R: Registry> PathMatcher<S, R> {
    /// Create a matcher rooted at `root`.
    pub fn new(root: impl Into<PathBuf>, store: S, registry: R) -> Self {
        Self {
            root: root.into(),
            store,
            registry,
        }
    }

    /// The directory queries are rooted at.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The handler/format registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Work out handler and format from a matched filename.
    ///
    /// Only the last two dotted tokens after the stem count: the last one
    /// names the handler, the one before it the format.
    fn extract_handler_and_format(
        &self,
        candidate: &Path,
        format_hint: &[String],
    ) -> Result<(Arc<Handler>, Option<Format>)> {
        let file_name = candidate
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut tokens: Vec<&str> = file_name.split('.').skip(1).collect();
        let handler_token = tokens.pop().filter(|t| !t.is_empty());
        let format_token = tokens.pop().filter(|t| !t.is_empty());

        let handler = match handler_token {
            Some(extension) => self.registry.handler_for(extension),
            None => self.registry.default_handler(),
        }
        .ok_or_else(|| StencilError::UnknownHandler {
            extension: handler_token.unwrap_or_default().to_string(),
            path: candidate.to_path_buf(),
        })?;

        let format = format_token
            .and_then(|token| self.registry.format_for(token))
            .or_else(|| self.registry.default_format_of(&handler))
            .or_else(|| {
                format_hint
                    .iter()
                    .find_map(|token| self.registry.format_for(token))
            });

        Ok((handler, format))
    }
}

impl<S: Store, R: Registry> TemplateSource for PathMatcher<S, R> {
    fn scan(
        &self,
        path: &str,
        qualifiers: &Qualifiers<'_>,
        format_hint: &[String],
    ) -> Result<Vec<Template>> {
        // Only the qualifier groups may act as wildcards
        let base = escape_literal(&self.root.join(path).to_string_lossy());
        let query = build_query(&base, qualifiers);
        debug!("Scanning {}", query);

        let candidates = self.store.exists_matching(&query)?;
        let mut templates = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            if self.store.is_directory(&candidate) {
                trace!("Skipping directory {}", candidate.display());
                continue;
            }

            let (handler, format) = self.extract_handler_and_format(&candidate, format_hint)?;
            let source = self.store.read_bytes(&candidate)?;
            trace!(
                "Found {} (handler: {}, format: {})",
                candidate.display(),
                handler.extension(),
                format.as_ref().map(Format::token).unwrap_or("none")
            );

            templates.push(Template::new(source, candidate, handler, path, format));
        }

        debug!("{} template(s) for {}", templates.len(), path);
        Ok(templates)
    }
}
