//! `codetabs inspect` command implementation.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use codetabs::{BlockStyle, CodeTabs, SelectionCoordinator, SharedSelection, TabSummary};
use codetabs_config::Config;
use serde::Serialize;

use super::{build_widgets, read_page};
use crate::error::CliError;
use crate::output::{Output, Status};

/// Arguments for the inspect command.
#[derive(Args)]
pub(crate) struct InspectArgs {
    /// Path to the page markup (JSON).
    file: PathBuf,

    /// Path to configuration file (default: auto-discover codetabs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Normalized view of one widget.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WidgetReport<'a> {
    id: String,
    group: &'a str,
    block_style: BlockStyle,
    tabs: Vec<TabSummary<'a>>,
}

impl<'a> From<&'a CodeTabs> for WidgetReport<'a> {
    fn from(widget: &'a CodeTabs) -> Self {
        Self {
            id: widget.id().root().to_string(),
            group: widget.group(),
            block_style: widget.block_style(),
            tabs: widget.tabs().iter().map(|tab| tab.summary()).collect(),
        }
    }
}

impl InspectArgs {
    /// Execute the inspect command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, markup or output fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), None)?;
        let page = read_page(&self.file)?;
        let coordinator: Arc<dyn SelectionCoordinator> = Arc::new(SharedSelection::new());
        let widgets = build_widgets(page, &config.tabs, &coordinator);

        for widget in &widgets {
            output.widget(widget);
        }

        let reports: Vec<WidgetReport<'_>> = widgets.iter().map(WidgetReport::from).collect();
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &reports)?;
        stdout.write_all(b"\n")?;

        let tab_count: usize = reports.iter().map(|r| r.tabs.len()).sum();
        output.line(
            Status::Done,
            &format!("{} widget(s), {tab_count} tab(s)", reports.len()),
        );
        Ok(())
    }
}
