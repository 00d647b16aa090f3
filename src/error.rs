//! Error types for stencil operations.
//!
//! This module defines [`StencilError`], the error type returned by every
//! fallible operation in the crate, and a [`Result`] alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - A scan either returns every matched template or fails as a whole
//! - Failed scans are never cached, so a later lookup scans again
//! - Nothing in the resolver retries; callers decide what a failure means

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for stencil operations.
#[derive(Debug, Error)]
pub enum StencilError {
    /// A matched file ends in an extension no handler is registered for.
    #[error("No template handler registered for extension '{extension}' ({path})")]
    UnknownHandler { extension: String, path: PathBuf },

    /// A matched template could not be read.
    #[error("Failed to read template {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing store rejected a lookup pattern.
    #[error("Invalid lookup pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A resolver was constructed from an unusable root.
    #[error("Invalid resolver configuration: {message}")]
    Configuration { message: String },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for stencil operations.
pub type Result<T> = std::result::Result<T, StencilError>;
