//! Configuration file discovery and loading.
//!
//! This module finds the configuration files that apply to a project,
//! layers them, and applies environment overrides.

use crate::config::schema::StencilConfig;
use crate::error::{Result, StencilError};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable that overrides `settings.cache_templates`.
pub const CACHE_TEMPLATES_ENV: &str = "STENCIL_CACHE_TEMPLATES";

/// Paths to configuration files in priority order (later overrides earlier).
///
/// Merge order:
/// 1. User global config (`~/.stencil/config.yml`)
/// 2. Project config (`.stencil/config.yml`)
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// User's global config: ~/.stencil/config.yml
    pub user_global: Option<PathBuf>,

    /// Project config: .stencil/config.yml
    pub project: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        Self::discover_with_home(project_root, dirs::home_dir().as_deref())
    }

    /// Discover config files using an explicit home directory.
    pub fn discover_with_home(project_root: &Path, home: Option<&Path>) -> Self {
        Self {
            user_global: home.and_then(|h| existing(h.join(".stencil").join("config.yml"))),
            project: existing(project_root.join(".stencil").join("config.yml")),
        }
    }

    /// Returns all existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.user_global.iter().chain(self.project.iter()).collect()
    }

    /// Check if a project config exists.
    pub fn has_project_config(&self) -> bool {
        self.project.is_some()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.is_file().then_some(path)
}

/// Find the project root by walking up from `start`.
///
/// A directory containing `.stencil` wins; a directory containing `.git`
/// is the fallback.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".stencil").is_dir() || dir.join(".git").exists())
        .map(Path::to_path_buf)
}

/// Load a single config file and parse it into [`StencilConfig`].
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<StencilConfig> {
    let value = load_config_value(path)?;
    from_value(value, path)
}

/// Parse YAML content into [`StencilConfig`].
///
/// `source_path` is only used for error reporting.
pub fn parse_config(content: &str, source_path: &Path) -> Result<StencilConfig> {
    if content.trim().is_empty() {
        return Ok(StencilConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| StencilError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a config file as a raw YAML value, for layering.
pub fn load_config_value(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            StencilError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            StencilError::Io(e)
        }
    })?;

    if content.trim().is_empty() {
        return Ok(Value::Mapping(Default::default()));
    }

    serde_yaml::from_str(&content).map_err(|e| StencilError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Layer `top` over `base`.
///
/// Mappings merge key by key, recursively. Anything else in `top`
/// replaces what `base` had, sequences included.
pub fn overlay(base: Value, top: Value) -> Value {
    match (base, top) {
        (Value::Mapping(mut base), Value::Mapping(top)) => {
            for (key, value) in top {
                let merged = match base.remove(&key) {
                    Some(existing) => overlay(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Mapping(base)
        }
        (_, top) => top,
    }
}

/// Load and layer every config file that applies to a project.
///
/// A project without any config file gets [`StencilConfig::default`].
/// The `STENCIL_CACHE_TEMPLATES` override is applied last.
pub fn load_merged_config(project_root: &Path) -> Result<StencilConfig> {
    load_from_paths(&ConfigPaths::discover(project_root), project_root)
}

/// Load config from already-discovered paths.
pub fn load_from_paths(paths: &ConfigPaths, project_root: &Path) -> Result<StencilConfig> {
    let mut merged = Value::Mapping(Default::default());
    for path in paths.all_existing() {
        debug!("Loading config from {}", path.display());
        merged = overlay(merged, load_config_value(path)?);
    }

    let config_path = project_root.join(".stencil").join("config.yml");
    let mut config = from_value(merged, &config_path)?;
    apply_cache_override(
        &mut config,
        std::env::var(CACHE_TEMPLATES_ENV).ok().as_deref(),
    );
    Ok(config)
}

/// Load config with optional path override.
///
/// If `config_override` is provided, only that file is loaded.
/// Otherwise every discovered config file is layered.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<StencilConfig> {
    match config_override {
        Some(path) => {
            let mut config = load_config_file(path)?;
            apply_cache_override(
                &mut config,
                std::env::var(CACHE_TEMPLATES_ENV).ok().as_deref(),
            );
            Ok(config)
        }
        None => load_merged_config(project_root),
    }
}

/// Apply a `STENCIL_CACHE_TEMPLATES` value to a loaded config.
///
/// Unrecognized values are ignored.
pub fn apply_cache_override(config: &mut StencilConfig, value: Option<&str>) {
    if let Some(enabled) = value.and_then(parse_toggle) {
        debug!("{} overrides cache_templates to {}", CACHE_TEMPLATES_ENV, enabled);
        config.settings.cache_templates = enabled;
    }
}

fn parse_toggle(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn from_value(value: Value, path: &Path) -> Result<StencilConfig> {
    if value.is_null() {
        return Ok(StencilConfig::default());
    }
    serde_yaml::from_value(value).map_err(|e| StencilError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
