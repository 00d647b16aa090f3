//! The `stencil find` command resolves one lookup across every template root.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::cli::args::FindArgs;
use crate::config::StencilConfig;
use crate::error::Result;
use crate::registry::HandlerRegistry;
use crate::resolver::{build_path, Details, FileSystemResolver, LookupKey};
use crate::template::Template;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Root searched when neither the command line nor config names one.
pub const DEFAULT_ROOT: &str = "app/views";

/// Locale searched when none is given.
pub const DEFAULT_LOCALE: &str = "en";

/// Format searched when none is given or configured.
pub const DEFAULT_FORMAT: &str = "html";

/// The find command implementation.
pub struct FindCommand {
    project_root: PathBuf,
    config: StencilConfig,
    args: FindArgs,
}

impl FindCommand {
    /// Create a new find command.
    pub fn new(project_root: &Path, config: StencilConfig, args: FindArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config,
            args,
        }
    }

    /// Roots to search, in order, relative roots anchored at the project.
    ///
    /// Command-line roots win over configured roots; with neither,
    /// `app/views` is searched.
    pub fn roots(&self) -> Vec<PathBuf> {
        let roots = if !self.args.roots.is_empty() {
            &self.args.roots
        } else if !self.config.roots.is_empty() {
            &self.config.roots
        } else {
            return vec![self.project_root.join(DEFAULT_ROOT)];
        };

        roots.iter().map(|root| self.project_root.join(root)).collect()
    }

    /// Qualifiers for the lookup.
    ///
    /// Unset locales default to `en`, unset formats to the configured
    /// default formats (or `html`), unset handlers to every registered one.
    pub fn details(&self, registry: &HandlerRegistry) -> Details {
        let default_formats = &self.config.settings.default_formats;

        let locale = if self.args.locales.is_empty() {
            vec![DEFAULT_LOCALE.to_string()]
        } else {
            self.args.locales.clone()
        };
        let formats = if !self.args.formats.is_empty() {
            self.args.formats.clone()
        } else if !default_formats.is_empty() {
            default_formats.clone()
        } else {
            vec![DEFAULT_FORMAT.to_string()]
        };
        let handlers: Vec<String> = if self.args.handlers.is_empty() {
            registry
                .handlers()
                .iter()
                .map(|handler| handler.extension().to_string())
                .collect()
        } else {
            self.args.handlers.clone()
        };

        let details = Details::new()
            .with_locale(locale)
            .with_formats(formats)
            .with_handlers(handlers);

        if default_formats.is_empty() {
            details
        } else {
            details.with_default_formats(default_formats.iter().cloned())
        }
    }

    fn resolve(&self) -> Result<Vec<Template>> {
        let registry = Arc::new(HandlerRegistry::from_config(&self.config));
        let details = self.details(&registry);
        let key = LookupKey::from(self.args.name.as_str());
        let mut found = Vec::new();

        for root in self.roots() {
            let mut resolver = FileSystemResolver::with_registry(&root, Arc::clone(&registry))?
                .with_caching(self.config.settings.cache_templates);
            let templates = resolver.find_all(
                &self.args.name,
                &self.args.prefix,
                self.args.partial,
                &details,
                &self.args.locals,
                Some(&key),
            )?;
            debug!("{} template(s) under {}", templates.len(), resolver);
            found.extend(templates.iter().cloned());
        }

        Ok(found)
    }
}

impl Command for FindCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let virtual_path = build_path(&self.args.name, &self.args.prefix, self.args.partial);
        if ui.output_mode().shows_details() {
            for root in self.roots() {
                ui.message(&format!("Searching {}", root.display()));
            }
        }
        let templates = self.resolve()?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&templates).map_err(anyhow::Error::from)?;
            ui.data(&json);
        } else if templates.is_empty() {
            ui.warning(&format!("No templates found for {}", virtual_path));
        } else {
            ui.show_header(&virtual_path);
            for template in &templates {
                ui.message(&template.identifier().display().to_string());
                ui.show_field("handler", template.handler().extension());
                ui.show_field(
                    "format",
                    template.format().map(|f| f.token()).unwrap_or("none"),
                );
                if !template.locals().is_empty() {
                    ui.show_field("locals", &template.locals().join(", "));
                }
            }
            let noun = if templates.len() == 1 { "template" } else { "templates" };
            ui.success(&format!("{} {} found", templates.len(), noun));
        }

        if templates.is_empty() {
            Ok(CommandResult::failure(1))
        } else {
            Ok(CommandResult::success())
        }
    }
}
