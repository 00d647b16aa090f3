//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::config::{load_config, StencilConfig};
use crate::error::Result;
use crate::ui::{OutputMode, UserInterface};

use super::find::FindCommand;
use super::handlers::HandlersCommand;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command, reporting through `ui`.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self {
            project_root,
            config_path: None,
        }
    }

    /// Load only this config file instead of the discovered ones.
    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Load configuration and apply its `default_output` unless a flag
    /// already chose a mode.
    pub fn load_config(&self, ui: &mut dyn UserInterface) -> Result<StencilConfig> {
        let config = load_config(&self.project_root, self.config_path.as_deref())?;
        if ui.output_mode() == OutputMode::Normal {
            ui.set_output_mode(config.settings.default_output.into());
        }
        Ok(config)
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.load_config(ui)?;

        match &cli.command {
            Commands::Find(args) => {
                let cmd = FindCommand::new(&self.project_root, config, args.clone());
                cmd.execute(ui)
            }
            Commands::Handlers(args) => {
                let cmd = HandlersCommand::new(config, args.clone());
                cmd.execute(ui)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(1);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn dispatcher_creation() {
        let dispatcher = CommandDispatcher::new(PathBuf::from("/test"));
        assert_eq!(dispatcher.project_root(), Path::new("/test"));
    }

    #[test]
    fn config_default_output_applies_in_normal_mode() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".stencil")).unwrap();
        fs::write(
            temp.path().join(".stencil/config.yml"),
            "settings:\n  default_output: quiet\n",
        )
        .unwrap();

        let dispatcher = CommandDispatcher::new(temp.path().to_path_buf());
        let mut ui = MockUI::new();
        dispatcher.load_config(&mut ui).unwrap();
        assert_eq!(ui.output_mode(), OutputMode::Quiet);

        let mut verbose = MockUI::with_mode(OutputMode::Verbose);
        dispatcher.load_config(&mut verbose).unwrap();
        assert_eq!(verbose.output_mode(), OutputMode::Verbose);
    }

    #[test]
    fn dispatches_handlers() {
        let temp = TempDir::new().unwrap();
        let cli = Cli::try_parse_from(["stencil", "handlers"]).unwrap();

        let dispatcher = CommandDispatcher::new(temp.path().to_path_buf());
        let mut ui = MockUI::new();
        let result = dispatcher.dispatch(&cli, &mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_message("erb"));
    }

    #[test]
    fn missing_config_override_is_an_error() {
        let temp = TempDir::new().unwrap();
        let cli = Cli::try_parse_from(["stencil", "handlers"]).unwrap();

        let dispatcher = CommandDispatcher::new(temp.path().to_path_buf())
            .with_config_path(Some(temp.path().join("missing.yml")));
        let mut ui = MockUI::new();

        assert!(dispatcher.dispatch(&cli, &mut ui).is_err());
    }
}
