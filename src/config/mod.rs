//! Configuration loading and parsing for stencil.
//!
//! - Schema definitions in [`schema`]
//! - File discovery, layering and environment overrides in [`loader`]
//!
//! # Example
//!
//! ```
//! use stencil::config::load_merged_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let stencil_dir = temp.path().join(".stencil");
//! fs::create_dir_all(&stencil_dir).unwrap();
//! fs::write(stencil_dir.join("config.yml"), "roots: [app/views]").unwrap();
//!
//! let config = load_merged_config(temp.path()).unwrap();
//! assert_eq!(config.roots.len(), 1);
//! ```
//!
//! # Configuration File Locations
//!
//! stencil layers configuration in this order:
//! 1. User global config (`~/.stencil/config.yml`)
//! 2. Project config (`.stencil/config.yml`)
//! 3. `STENCIL_CACHE_TEMPLATES` environment override

pub mod loader;
pub mod schema;

// Schema re-exports
pub use schema::{HandlerConfig, OutputMode, Settings, StencilConfig};

// Loader re-exports
pub use loader::{
    apply_cache_override, find_project_root, load_config, load_config_file, load_config_value,
    load_from_paths, load_merged_config, overlay, parse_config, ConfigPaths, CACHE_TEMPLATES_ENV,
};
