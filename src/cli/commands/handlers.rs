//! The `stencil handlers` command lists registered handlers and formats.

use serde::Serialize;

use crate::cli::args::HandlersArgs;
use crate::config::StencilConfig;
use crate::error::Result;
use crate::registry::{Format, Handler, HandlerRegistry};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The handlers command implementation.
pub struct HandlersCommand {
    config: StencilConfig,
    args: HandlersArgs,
}

#[derive(Serialize)]
struct Listing<'a> {
    default_handler: Option<&'a str>,
    handlers: Vec<&'a Handler>,
    formats: Vec<&'a Format>,
}

impl HandlersCommand {
    /// Create a new handlers command.
    pub fn new(config: StencilConfig, args: HandlersArgs) -> Self {
        Self { config, args }
    }
}

impl Command for HandlersCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let registry = HandlerRegistry::from_config(&self.config);
        let default_handler = registry.default_handler_extension();

        if self.args.json {
            let listing = Listing {
                default_handler,
                handlers: registry.handlers(),
                formats: registry.formats(),
            };
            let json = serde_json::to_string_pretty(&listing).map_err(anyhow::Error::from)?;
            ui.data(&json);
            return Ok(CommandResult::success());
        }

        ui.show_header("Handlers");
        for handler in registry.handlers() {
            let mut line = format!("  {}", handler.extension());
            if let Some(format) = handler.default_format() {
                line.push_str(&format!(" (default format: {})", format.token()));
            }
            if Some(handler.extension()) == default_handler {
                line.push_str(" [default]");
            }
            ui.message(&line);
        }

        ui.show_header("Formats");
        for format in registry.formats() {
            ui.message(&format!("  {:<8} {}", format.token(), format.mime()));
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HandlerConfig;
    use crate::ui::MockUI;

    #[test]
    fn lists_builtin_handlers_and_formats() {
        let cmd = HandlersCommand::new(StencilConfig::default(), HandlersArgs::default());
        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert_eq!(ui.headers(), ["Handlers", "Formats"]);
        assert!(ui.has_message("erb [default]"));
        assert!(ui.has_message("rjs (default format: js)"));
        assert!(ui.has_message("text/html"));
    }

    #[test]
    fn includes_configured_handlers() {
        let mut config = StencilConfig::default();
        config.formats.insert("md".to_string(), "text/markdown".to_string());
        config.handlers.insert(
            "liquid".to_string(),
            HandlerConfig {
                default_format: Some("md".to_string()),
            },
        );

        let cmd = HandlersCommand::new(config, HandlersArgs::default());
        let mut ui = MockUI::new();
        cmd.execute(&mut ui).unwrap();

        assert!(ui.has_message("liquid (default format: md)"));
        assert!(ui.has_message("text/markdown"));
    }

    #[test]
    fn json_listing() {
        let cmd = HandlersCommand::new(StencilConfig::default(), HandlersArgs { json: true });
        let mut ui = MockUI::new();
        cmd.execute(&mut ui).unwrap();

        let value: serde_json::Value = serde_json::from_str(&ui.payloads()[0]).unwrap();
        assert_eq!(value["default_handler"], "erb");
        assert_eq!(value["handlers"][0]["extension"], "builder");
        assert!(value["formats"]
            .as_array()
            .unwrap()
            .iter()
            .any(|f| f["token"] == "json" && f["mime"] == "application/json"));
    }
}
