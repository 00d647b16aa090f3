//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// stencil - find template variants by name, locale, format and handler.
#[derive(Debug, Parser)]
#[command(name = "stencil")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .stencil/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Find every template matching a name and qualifiers
    Find(FindArgs),

    /// List registered handlers and formats
    Handlers(HandlersArgs),
}

/// Arguments for the `find` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct FindArgs {
    /// Logical template name (e.g. `show`)
    pub name: String,

    /// Directory-like prefix (e.g. `posts`)
    #[arg(long, default_value = "")]
    pub prefix: String,

    /// Look up a partial (`_name`)
    #[arg(long)]
    pub partial: bool,

    /// Acceptable locales, in preference order
    #[arg(short, long = "locale", value_name = "LOCALE")]
    pub locales: Vec<String>,

    /// Acceptable formats, in preference order
    #[arg(short, long = "format", value_name = "FORMAT")]
    pub formats: Vec<String>,

    /// Acceptable handlers, in preference order
    #[arg(long = "handler", value_name = "HANDLER")]
    pub handlers: Vec<String>,

    /// Local variable names passed to the template
    #[arg(long = "local", value_name = "NAME")]
    pub locals: Vec<String>,

    /// Template roots to search (overrides configured roots)
    #[arg(short, long = "root", value_name = "DIR")]
    pub roots: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `handlers` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct HandlersArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
