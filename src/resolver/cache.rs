//! Memoization of template lookups.
//!
//! Every lookup is identified by five parts: the caller's [`LookupKey`],
//! the prefix, the name, the partial flag and the sorted locals. The first
//! lookup for a tuple scans the store; every later one gets the stored list
//! back, the very same `Arc`, until [`ResolutionCache::clear`] is called.
//! Entries never expire and are never refreshed on their own.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::Result;
use crate::template::Template;

/// A shared, immutable list of resolved templates.
pub type Templates = Arc<Vec<Template>>;

/// Opaque caller-supplied identifier that scopes cached lookups.
///
/// Callers typically derive it from the details of a lookup (locale,
/// formats, handlers) so different detail sets never share entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupKey(Arc<str>);

impl LookupKey {
    /// Create a lookup key.
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }

    /// The key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LookupKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for LookupKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Composite key of one cached lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    key: LookupKey,
    prefix: String,
    name: String,
    partial: bool,
    locals: Arc<[String]>,
}

impl CacheKey {
    /// Create a key; `locals` must already be canonical.
    pub fn new(
        key: LookupKey,
        prefix: impl Into<String>,
        name: impl Into<String>,
        partial: bool,
        locals: Arc<[String]>,
    ) -> Self {
        Self {
            key,
            prefix: prefix.into(),
            name: name.into(),
            partial,
            locals,
        }
    }

    /// The canonical locals part of the key.
    pub fn locals(&self) -> &[String] {
        &self.locals
    }
}

/// Sort local names into their canonical, frozen form.
///
/// ```
/// use stencil::resolver::canonical_locals;
///
/// let locals = canonical_locals(&["post", "author"]);
/// assert_eq!(&*locals, ["author", "post"]);
/// ```
pub fn canonical_locals<S: AsRef<str>>(locals: &[S]) -> Arc<[String]> {
    let mut sorted: Vec<String> = locals.iter().map(|l| l.as_ref().to_string()).collect();
    sorted.sort();
    Arc::from(sorted)
}

/// Hit and miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the table
    pub hits: usize,
    /// Lookups that scanned and stored the result
    pub misses: usize,
    /// Lookups that scanned without touching the table
    pub bypassed: usize,
}

impl CacheStats {
    /// Share of cacheable lookups answered from the table, in percent.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Process-lifetime memo table for template lookups.
///
/// The table has a single owner; lookups take `&mut self`. Concurrent
/// callers must serialize access themselves. Two callers missing the same
/// tuple concurrently would both scan.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: HashMap<CacheKey, Templates>,
    stats: CacheStats,
}

impl ResolutionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a lookup, scanning with `miss` only when needed.
    ///
    /// Without a `key`, or with `caching` off, `miss` runs on every call and
    /// nothing is stored. Otherwise the stored list is returned as is; its
    /// templates were stamped with the canonical locals when it was stored.
    /// A failing `miss` leaves the table untouched.
    #[allow(clippy::too_many_arguments)]
    pub fn lookup<S, F>(
        &mut self,
        key: Option<&LookupKey>,
        prefix: &str,
        name: &str,
        partial: bool,
        locals: &[S],
        caching: bool,
        miss: F,
    ) -> Result<Templates>
    where
        S: AsRef<str>,
        F: FnOnce() -> Result<Vec<Template>>,
    {
        let locals = canonical_locals(locals);

        let key = match key {
            Some(key) if caching => key,
            _ => {
                trace!("Uncached lookup for {}/{}", prefix, name);
                self.stats.bypassed += 1;
                return Ok(stamp(miss()?, &locals));
            }
        };

        match self
            .entries
            .entry(CacheKey::new(key.clone(), prefix, name, partial, locals))
        {
            Entry::Occupied(entry) => {
                trace!("Cache hit for {}/{} ({})", prefix, name, key);
                self.stats.hits += 1;
                Ok(Arc::clone(entry.get()))
            }
            Entry::Vacant(entry) => {
                debug!("Cache miss for {}/{} ({})", prefix, name, key);
                let locals = Arc::clone(&entry.key().locals);
                let templates = stamp(miss()?, &locals);
                self.stats.misses += 1;
                Ok(Arc::clone(entry.insert(templates)))
            }
        }
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&mut self) {
        debug!("Clearing {} cached lookup(s)", self.entries.len());
        self.entries.clear();
        self.stats = CacheStats::default();
    }

    /// Number of cached lookups.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hit and miss counters since creation or the last clear.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

fn stamp(mut templates: Vec<Template>, locals: &Arc<[String]>) -> Templates {
    for template in &mut templates {
        template.set_locals(Arc::clone(locals));
    }
    Arc::new(templates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StencilError;
    use crate::registry::Handler;
    use std::cell::Cell;

    fn scanned() -> Vec<Template> {
        vec![Template::new(
            b"body".to_vec(),
            "/views/posts/show.erb",
            Arc::new(Handler::new("erb")),
            "posts/show",
            None,
        )]
    }

    fn lookup(
        cache: &mut ResolutionCache,
        key: Option<&LookupKey>,
        locals: &[&str],
        scans: &Cell<usize>,
    ) -> Templates {
        cache
            .lookup(key, "posts", "show", false, locals, true, || {
                scans.set(scans.get() + 1);
                Ok(scanned())
            })
            .unwrap()
    }

    #[test]
    fn locals_are_sorted_before_keying() {
        let mut cache = ResolutionCache::new();
        let scans = Cell::new(0);
        let key = LookupKey::from("html");

        let first = lookup(&mut cache, Some(&key), &["fr", "en"], &scans);
        let second = lookup(&mut cache, Some(&key), &["en", "fr"], &scans);

        assert_eq!(scans.get(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(first.iter().all(|t| t.locals() == ["en", "fr"]));
    }

    #[test]
    fn missing_key_bypasses_the_table() {
        let mut cache = ResolutionCache::new();
        let scans = Cell::new(0);

        let first = lookup(&mut cache, None, &["b", "a"], &scans);
        let second = lookup(&mut cache, None, &["b", "a"], &scans);

        assert_eq!(scans.get(), 2);
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(cache.is_empty());
        assert_eq!(first[0].locals(), ["a", "b"]);
        assert_eq!(cache.stats().bypassed, 2);
    }

    #[test]
    fn disabled_caching_bypasses_the_table() {
        let mut cache = ResolutionCache::new();
        let key = LookupKey::from("html");
        let scans = Cell::new(0);

        for _ in 0..2 {
            cache
                .lookup(Some(&key), "", "index", false, &[] as &[&str], false, || {
                    scans.set(scans.get() + 1);
                    Ok(Vec::new())
                })
                .unwrap();
        }

        assert_eq!(scans.get(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn every_key_part_separates_entries() {
        let mut cache = ResolutionCache::new();
        let html = LookupKey::from("html");
        let json = LookupKey::from("json");
        let scans = Cell::new(0);
        let mut run = |key: &LookupKey, prefix: &str, name: &str, partial: bool, locals: &[&str]| {
            cache
                .lookup(Some(key), prefix, name, partial, locals, true, || {
                    scans.set(scans.get() + 1);
                    Ok(Vec::new())
                })
                .unwrap();
        };

        run(&html, "posts", "show", false, &[]);
        run(&json, "posts", "show", false, &[]);
        run(&html, "users", "show", false, &[]);
        run(&html, "posts", "index", false, &[]);
        run(&html, "posts", "show", true, &[]);
        run(&html, "posts", "show", false, &["post"]);
        run(&html, "posts", "show", false, &[]);

        assert_eq!(scans.get(), 6);
        assert_eq!(cache.len(), 6);
    }

    #[test]
    fn failed_scans_are_not_cached() {
        let mut cache = ResolutionCache::new();
        let key = LookupKey::from("html");

        let result = cache.lookup(Some(&key), "posts", "show", false, &[] as &[&str], true, || {
            Err(StencilError::UnknownHandler {
                extension: "haml".into(),
                path: "posts/show.haml".into(),
            })
        });
        assert!(result.is_err());
        assert!(cache.is_empty());

        let scans = Cell::new(0);
        lookup(&mut cache, Some(&key), &[], &scans);
        assert_eq!(scans.get(), 1);
    }

    #[test]
    fn clear_forces_a_rescan() {
        let mut cache = ResolutionCache::new();
        let key = LookupKey::from("html");
        let scans = Cell::new(0);

        let before = lookup(&mut cache, Some(&key), &[], &scans);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats::default());

        let after = lookup(&mut cache, Some(&key), &[], &scans);
        assert_eq!(scans.get(), 2);
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn stats_track_hits_and_misses() {
        let mut cache = ResolutionCache::new();
        let key = LookupKey::from("html");
        let scans = Cell::new(0);

        lookup(&mut cache, Some(&key), &[], &scans);
        lookup(&mut cache, Some(&key), &[], &scans);
        lookup(&mut cache, Some(&key), &[], &scans);

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 2);
        assert!((stats.hit_rate() - 66.666).abs() < 0.01);
    }

    #[test]
    fn canonical_locals_handles_empty_input() {
        let locals = canonical_locals::<&str>(&[]);
        assert!(locals.is_empty());
    }
}
