//! Backing stores for template sources.
//!
//! A [`Store`] answers three questions: which paths match a query pattern,
//! whether a path is a directory, and what bytes a path holds. Patterns use
//! glob syntax plus `{a,b}` alternation groups (see [`expand_braces`]).
//!
//! - [`FsStore`] reads the local filesystem through the `glob` crate
//! - [`MemoryStore`] serves templates held in memory

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::{debug, trace};

use crate::error::{Result, StencilError};
use crate::resolver::query::expand_braces;

/// Read-only source of template files.
pub trait Store {
    /// Paths matching `pattern`, in a deterministic order.
    fn exists_matching(&self, pattern: &str) -> Result<Vec<PathBuf>>;

    /// Whether `path` is a directory.
    fn is_directory(&self, path: &Path) -> bool;

    /// Full contents of `path`.
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>>;
}

/// Filesystem-backed store.
///
/// Alternation groups are expanded first; each expansion is globbed in turn
/// and its matches are appended in the alphabetical order `glob` yields
/// them. A path matched by several expansions is reported once, at its
/// first position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FsStore;

impl FsStore {
    /// Create a filesystem store.
    pub fn new() -> Self {
        Self
    }
}

impl Store for FsStore {
    fn exists_matching(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let mut seen = HashSet::new();
        let mut matches = Vec::new();

        for expanded in expand_braces(pattern) {
            let paths = glob::glob(&expanded).map_err(|e| StencilError::InvalidPattern {
                pattern: expanded.clone(),
                message: e.to_string(),
            })?;

            for entry in paths {
                match entry {
                    Ok(path) => {
                        if seen.insert(path.clone()) {
                            trace!("Matched {}", path.display());
                            matches.push(path);
                        }
                    }
                    Err(e) => debug!("Skipping unreadable entry: {}", e),
                }
            }
        }

        Ok(matches)
    }

    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|source| StencilError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// In-memory store.
///
/// Files are matched in path order within each brace expansion, the same
/// way [`FsStore`] orders them.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, replacing any previous content.
    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), content.into());
    }

    /// Builder form of [`MemoryStore::insert`].
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }

    /// Add a directory entry.
    pub fn with_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.directories.insert(path.into());
        self
    }

    /// Number of files held.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the store holds no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Store for MemoryStore {
    fn exists_matching(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let options = MatchOptions {
            require_literal_separator: true,
            ..MatchOptions::new()
        };
        let mut seen = HashSet::new();
        let mut matches = Vec::new();

        for expanded in expand_braces(pattern) {
            let compiled = Pattern::new(&expanded).map_err(|e| StencilError::InvalidPattern {
                pattern: expanded.clone(),
                message: e.to_string(),
            })?;

            let mut hits: Vec<&PathBuf> = self
                .files
                .keys()
                .chain(self.directories.iter())
                .filter(|path| compiled.matches_path_with(path, options))
                .collect();
            hits.sort();

            for path in hits {
                if seen.insert(path.clone()) {
                    matches.push(path.clone());
                }
            }
        }

        Ok(matches)
    }

    fn is_directory(&self, path: &Path) -> bool {
        self.directories.contains(path)
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| StencilError::ReadFailed {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such template"),
        })
    }
}
