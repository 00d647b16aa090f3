//! Template resolution.
//!
//! This module turns a logical lookup (name, prefix, partial flag, details,
//! locals) into the list of templates that satisfy it:
//! - [`build_path`] makes the canonical path (`posts/_form`)
//! - [`PathMatcher`] expands it into a variant query and reads every match
//! - [`ResolutionCache`] memoizes the result per lookup tuple
//! - [`Resolver`] ties the three together
//!
//! # Example
//!
//! ```
//! use stencil::registry::HandlerRegistry;
//! use stencil::resolver::{Details, LookupKey, MemoryStore, PathMatcher, Resolver};
//! use std::sync::Arc;
//!
//! let store = MemoryStore::new().with_file("posts/show.html.erb", "<h1>Post</h1>");
//! let mut resolver = Resolver::new(PathMatcher::new("", store, HandlerRegistry::new()));
//!
//! let details = Details::new().with_formats(["html"]).with_handlers(["erb"]);
//! let key = LookupKey::from("html");
//! let first = resolver
//!     .find_all("show", "posts", false, &details, &["post"], Some(&key))
//!     .unwrap();
//! let again = resolver
//!     .find_all("show", "posts", false, &details, &["post"], Some(&key))
//!     .unwrap();
//!
//! assert_eq!(first[0].virtual_path(), "posts/show");
//! assert!(Arc::ptr_eq(&first, &again));
//! ```

pub mod cache;
pub mod filesystem;
pub mod matcher;
pub mod path;
pub mod query;
pub mod store;

// Re-exports
pub use cache::{canonical_locals, CacheKey, CacheStats, LookupKey, ResolutionCache, Templates};
pub use filesystem::FileSystemResolver;
pub use matcher::{PathMatcher, TemplateSource};
pub use path::build_path;
pub use query::{build_query, escape_literal, expand_braces, Details, Dimension, Qualifiers};
pub use store::{FsStore, MemoryStore, Store};

use crate::error::Result;

/// Resolves lookups through a [`TemplateSource`], memoizing the results.
///
/// Whether results are memoized is fixed at construction. With caching on,
/// a lookup that carries a [`LookupKey`] scans at most once until
/// [`Resolver::clear_cache`]; lookups without a key always scan.
#[derive(Debug)]
pub struct Resolver<T> {
    source: T,
    cache: ResolutionCache,
    caching: bool,
}

impl<T: TemplateSource> Resolver<T> {
    /// Create a resolver with caching enabled.
    pub fn new(source: T) -> Self {
        Self::with_caching(source, true)
    }

    /// Create a resolver with an explicit caching toggle.
    pub fn with_caching(source: T, caching: bool) -> Self {
        Self {
            source,
            cache: ResolutionCache::new(),
            caching,
        }
    }

    /// Whether lookups are memoized.
    pub fn caching(&self) -> bool {
        self.caching
    }

    /// The underlying template source.
    pub fn source(&self) -> &T {
        &self.source
    }

    /// Find every template for a lookup.
    ///
    /// `locals` may come in any order; the returned templates carry them
    /// sorted. Errors from the scan are returned as is and never cached.
    pub fn find_all<S: AsRef<str>>(
        &mut self,
        name: &str,
        prefix: &str,
        partial: bool,
        details: &Details,
        locals: &[S],
        key: Option<&LookupKey>,
    ) -> Result<Templates> {
        let source = &self.source;
        self.cache
            .lookup(key, prefix, name, partial, locals, self.caching, || {
                let path = build_path(name, prefix, partial);
                source.scan(&path, &Qualifiers::from(details), details.format_hint())
            })
    }

    /// Forget every memoized lookup.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Hit and miss counters of the memo table.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Number of memoized lookups.
    pub fn cached_lookups(&self) -> usize {
        self.cache.len()
    }
}
