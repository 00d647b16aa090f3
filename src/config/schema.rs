//! Configuration schema definitions for stencil.
//!
//! This module contains the structs that map to `.stencil/config.yml`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Root configuration structure for config.yml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StencilConfig {
    /// Global settings
    pub settings: Settings,

    /// Template roots searched in order, relative to the project root
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roots: Vec<PathBuf>,

    /// Extra handlers, keyed by the extension they claim
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub handlers: HashMap<String, HandlerConfig>,

    /// Extra formats, token to MIME type
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub formats: HashMap<String, String>,
}

/// Global settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Memoize lookups for the life of the process
    #[serde(default = "default_cache_templates", skip_serializing_if = "is_true")]
    pub cache_templates: bool,

    /// Formats to fall back on when a template names none
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub default_formats: Vec<String>,

    /// Handler for files without an extension (overrides the built-in `erb`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_handler: Option<String>,

    /// Default output mode: normal, verbose, quiet, silent
    #[serde(default)]
    pub default_output: OutputMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_templates: default_cache_templates(),
            default_formats: Vec::new(),
            default_handler: None,
            default_output: OutputMode::default(),
        }
    }
}

fn default_cache_templates() -> bool {
    true
}

fn is_true(v: &bool) -> bool {
    *v
}

/// A configured template handler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    /// Format token used when a file carries no format of its own
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,
}

/// Output verbosity mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Normal,
    Verbose,
    Quiet,
    Silent,
}
