//! stencil - template resolution with memoized variant lookup.
//!
//! Given a logical template name, a prefix, a partial flag and a set of
//! qualifiers (locale, format, handler), stencil finds every matching
//! template source and remembers the answer so identical lookups never
//! scan the store twice.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading and parsing
//! - [`error`] - Error types and result aliases
//! - [`registry`] - Handler and format registry
//! - [`resolver`] - Path building, variant matching and the lookup cache
//! - [`template`] - Discovered template sources
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use stencil::resolver::{Details, FileSystemResolver, LookupKey};
//! use std::fs;
//! use tempfile::TempDir;
//!
//! let views = TempDir::new().unwrap();
//! fs::create_dir_all(views.path().join("posts")).unwrap();
//! fs::write(views.path().join("posts/_form.html.erb"), "<form>").unwrap();
//!
//! let mut resolver = FileSystemResolver::new(views.path()).unwrap();
//! let details = Details::new().with_formats(["html"]).with_handlers(["erb"]);
//! let templates = resolver
//!     .find_all("form", "posts", true, &details, &["post"], Some(&LookupKey::from("html")))
//!     .unwrap();
//!
//! assert_eq!(templates[0].virtual_path(), "posts/_form");
//! assert_eq!(templates[0].locals(), ["post"]);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod registry;
pub mod resolver;
pub mod template;
pub mod ui;

pub use error::{Result, StencilError};
pub use template::Template;
