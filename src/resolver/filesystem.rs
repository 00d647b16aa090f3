//! Resolver over a directory on the local filesystem.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::error::{Result, StencilError};
use crate::registry::HandlerRegistry;
use crate::resolver::cache::{CacheStats, LookupKey, Templates};
use crate::resolver::matcher::PathMatcher;
use crate::resolver::query::Details;
use crate::resolver::store::FsStore;
use crate::resolver::Resolver;

/// A [`Resolver`] rooted at a directory of template files.
///
/// Two filesystem resolvers are equal when they share a root, whatever
/// their cache holds.
#[derive(Debug)]
pub struct FileSystemResolver {
    root: PathBuf,
    resolver: Resolver<PathMatcher<FsStore, Arc<HandlerRegistry>>>,
}

impl FileSystemResolver {
    /// Create a resolver with the built-in handlers and caching on.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if `root` is empty or names something that
    /// exists but is not a directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        Self::with_registry(root, Arc::new(HandlerRegistry::new()))
    }

    /// Create a resolver that resolves handlers through `registry`.
    pub fn with_registry(root: impl AsRef<Path>, registry: Arc<HandlerRegistry>) -> Result<Self> {
        let root = validate_root(root.as_ref())?;
        debug!("Template root {}", root.display());
        let matcher = PathMatcher::new(root.clone(), FsStore::new(), registry);

        Ok(Self {
            root,
            resolver: Resolver::new(matcher),
        })
    }

    /// Turn memoization on or off. Any cached lookups are dropped.
    pub fn with_caching(self, caching: bool) -> Self {
        let Self { root, resolver } = self;
        let matcher = PathMatcher::new(
            root.clone(),
            FsStore::new(),
            Arc::clone(resolver.source().registry()),
        );

        Self {
            root,
            resolver: Resolver::with_caching(matcher, caching),
        }
    }

    /// The absolute root directory.
    pub fn to_path(&self) -> &Path {
        &self.root
    }

    /// Whether lookups are memoized.
    pub fn caching(&self) -> bool {
        self.resolver.caching()
    }

    /// The handler/format registry in use.
    pub fn registry(&self) -> &HandlerRegistry {
        self.resolver.source().registry()
    }

    /// Find every template for a lookup. See [`Resolver::find_all`].
    pub fn find_all<S: AsRef<str>>(
        &mut self,
        name: &str,
        prefix: &str,
        partial: bool,
        details: &Details,
        locals: &[S],
        key: Option<&LookupKey>,
    ) -> Result<Templates> {
        self.resolver
            .find_all(name, prefix, partial, details, locals, key)
    }

    /// Forget every memoized lookup.
    pub fn clear_cache(&mut self) {
        self.resolver.clear_cache();
    }

    /// Hit and miss counters of the memo table.
    pub fn cache_stats(&self) -> CacheStats {
        self.resolver.cache_stats()
    }
}

fn validate_root(root: &Path) -> Result<PathBuf> {
    if root.as_os_str().is_empty() {
        return Err(StencilError::Configuration {
            message: "template root is empty".to_string(),
        });
    }

    let absolute = std::path::absolute(root).map_err(|e| StencilError::Configuration {
        message: format!("cannot resolve template root {}: {}", root.display(), e),
    })?;

    if absolute.exists() && !absolute.is_dir() {
        return Err(StencilError::Configuration {
            message: format!("template root {} is not a directory", absolute.display()),
        });
    }

    Ok(absolute)
}

impl PartialEq for FileSystemResolver {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
    }
}

impl Eq for FileSystemResolver {}

impl fmt::Display for FileSystemResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root.display())
    }
}

impl AsRef<Path> for FileSystemResolver {
    fn as_ref(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn html() -> Details {
        Details::new()
            .with_locale(["en"])
            .with_formats(["html"])
            .with_handlers(["erb", "builder"])
    }

    #[test]
    fn finds_templates_under_root() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "posts/show.html.erb", "<h1>Post</h1>");

        let mut resolver = FileSystemResolver::new(temp.path()).unwrap();
        let templates = resolver
            .find_all("show", "posts", false, &html(), &["post"], None)
            .unwrap();

        assert_eq!(templates.len(), 1);
        let template = &templates[0];
        assert_eq!(template.source(), b"<h1>Post</h1>");
        assert_eq!(template.virtual_path(), "posts/show");
        assert_eq!(template.identifier(), temp.path().join("posts/show.html.erb"));
        assert_eq!(template.format().unwrap().mime(), "text/html");
        assert_eq!(template.locals(), ["post"]);
    }

    #[test]
    fn directories_named_like_templates_are_skipped() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("posts/show.erb")).unwrap();
        write(temp.path(), "posts/show.html.erb", "");

        let mut resolver = FileSystemResolver::new(temp.path()).unwrap();
        let templates = resolver
            .find_all("show", "posts", false, &html(), &[] as &[&str], None)
            .unwrap();

        assert_eq!(templates.len(), 1);
        assert!(templates[0].identifier().ends_with("show.html.erb"));
    }

    #[test]
    fn cached_results_survive_file_changes() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "posts/show.html.erb", "v1");
        let key = LookupKey::from("html");

        let mut resolver = FileSystemResolver::new(temp.path()).unwrap();
        resolver
            .find_all("show", "posts", false, &html(), &[] as &[&str], Some(&key))
            .unwrap();
        write(temp.path(), "posts/show.html.erb", "v2");

        let cached = resolver
            .find_all("show", "posts", false, &html(), &[] as &[&str], Some(&key))
            .unwrap();
        assert_eq!(cached[0].source(), b"v1");

        resolver.clear_cache();
        let fresh = resolver
            .find_all("show", "posts", false, &html(), &[] as &[&str], Some(&key))
            .unwrap();
        assert_eq!(fresh[0].source(), b"v2");
    }

    #[test]
    fn with_caching_false_always_rescans() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "posts/show.html.erb", "v1");
        let key = LookupKey::from("html");

        let mut resolver = FileSystemResolver::new(temp.path())
            .unwrap()
            .with_caching(false);
        assert!(!resolver.caching());
        resolver
            .find_all("show", "posts", false, &html(), &[] as &[&str], Some(&key))
            .unwrap();
        write(temp.path(), "posts/show.html.erb", "v2");

        let again = resolver
            .find_all("show", "posts", false, &html(), &[] as &[&str], Some(&key))
            .unwrap();
        assert_eq!(again[0].source(), b"v2");
    }

    #[test]
    fn root_with_glob_characters_is_literal() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("[site]");
        write(&root, "posts/show.html.erb", "site");
        write(temp.path(), "s/posts/show.html.erb", "other");

        let mut resolver = FileSystemResolver::new(&root).unwrap();
        let templates = resolver
            .find_all("show", "posts", false, &html(), &[] as &[&str], None)
            .unwrap();

        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].source(), b"site");
    }

    #[test]
    fn root_with_braces_is_literal() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("a{b");
        write(&root, "posts/show.html.erb", "braced");

        let mut resolver = FileSystemResolver::new(&root).unwrap();
        let templates = resolver
            .find_all("show", "posts", false, &html(), &[] as &[&str], None)
            .unwrap();

        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].source(), b"braced");
        assert_eq!(templates[0].identifier(), root.join("posts/show.html.erb"));
    }

    #[test]
    fn empty_root_is_rejected() {
        let result = FileSystemResolver::new("");
        assert!(matches!(result, Err(StencilError::Configuration { .. })));
    }

    #[test]
    fn file_root_is_rejected() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "not_a_dir.txt", "");

        let result = FileSystemResolver::new(temp.path().join("not_a_dir.txt"));
        assert!(matches!(result, Err(StencilError::Configuration { .. })));
    }

    #[test]
    fn missing_root_finds_nothing() {
        let temp = TempDir::new().unwrap();
        let mut resolver = FileSystemResolver::new(temp.path().join("later")).unwrap();
        let templates = resolver
            .find_all("show", "posts", false, &html(), &[] as &[&str], None)
            .unwrap();
        assert!(templates.is_empty());
    }

    #[test]
    fn resolvers_with_same_root_are_equal() {
        let temp = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();

        let a = FileSystemResolver::new(temp.path()).unwrap();
        let b = FileSystemResolver::new(temp.path()).unwrap().with_caching(false);
        let c = FileSystemResolver::new(other.path()).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), temp.path().display().to_string());
        assert_eq!(a.to_path(), temp.path());
    }
}
