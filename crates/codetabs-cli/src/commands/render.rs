//! `codetabs render` command implementation.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use codetabs::{
    BlockStyle, CodeTabs, Collaborators, ColorMode, SelectionCoordinator, SharedSelection,
};
use codetabs_config::{CliSettings, Config};

use super::{build_widgets, read_page};
use crate::error::CliError;
use crate::output::{Output, Status};

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Path to the page markup (JSON).
    file: PathBuf,

    /// Path to configuration file (default: auto-discover codetabs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Default selection group (overrides config).
    #[arg(short, long)]
    group: Option<String>,

    /// Block style, `loud` or `subtle` (overrides config).
    #[arg(long)]
    style: Option<BlockStyle>,

    /// Color mode, `light` or `dark` (overrides config).
    #[arg(long)]
    color_mode: Option<ColorMode>,

    /// Select the tab with this value in every widget that has one.
    #[arg(long, value_name = "VALUE")]
    select: Option<String>,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, markup or output fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            group: self.group,
            block_style: self.style,
            color_mode: self.color_mode,
            class_name: None,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            output.line(Status::Note, &format!("Using config: {}", path.display()));
        }

        let page = read_page(&self.file)?;
        let coordinator: Arc<dyn SelectionCoordinator> = Arc::new(SharedSelection::new());
        let mut widgets = build_widgets(page, &config.tabs, &coordinator);

        for widget in &widgets {
            output.widget(widget);
        }

        if let Some(value) = &self.select
            && select(&widgets, value) == 0
        {
            output.line(
                Status::Warn,
                &format!("No widget has a tab with value {value:?}"),
            );
        }

        let html = render_widgets(&mut widgets, config.tabs.color_mode);
        match &self.output {
            Some(path) => std::fs::write(path, &html)?,
            None => std::io::stdout().lock().write_all(html.as_bytes())?,
        }

        output.line(Status::Done, &format!("Rendered {} widget(s)", widgets.len()));
        Ok(())
    }
}

/// Activate `value` in every widget that has it. Returns how many did.
fn select(widgets: &[CodeTabs], value: &str) -> usize {
    widgets.iter().filter(|w| w.activate(value)).count()
}

/// Render every widget, one per line.
fn render_widgets(widgets: &mut [CodeTabs], color_mode: ColorMode) -> String {
    let collaborators = Collaborators::default();
    let mut html = String::new();
    for widget in widgets {
        html.push_str(&widget.render(color_mode, &collaborators));
        html.push('\n');
    }
    html
}
