//! CLI command implementations.

pub(crate) mod inspect;
pub(crate) mod render;

pub(crate) use inspect::InspectArgs;
pub(crate) use render::RenderArgs;

use std::path::Path;
use std::sync::Arc;

use codetabs::{CodeTabs, PageMarkup, SelectionCoordinator, parse_page};
use codetabs_config::TabsConfig;

use crate::error::CliError;

/// Read and parse a page of widget declarations.
fn read_page(path: &Path) -> Result<PageMarkup, CliError> {
    let markup = std::fs::read_to_string(path)?;
    let page = parse_page(&markup)?;
    tracing::info!(
        file = %path.display(),
        widgets = page.widgets.len(),
        "Loaded page"
    );
    Ok(page)
}

/// Build one widget per declaration, all sharing `coordinator`.
fn build_widgets(
    page: PageMarkup,
    tabs: &TabsConfig,
    coordinator: &Arc<dyn SelectionCoordinator>,
) -> Vec<CodeTabs> {
    let defaults = tabs.widget_defaults();
    page.widgets
        .into_iter()
        .enumerate()
        .map(|(index, markup)| {
            CodeTabs::from_markup(index, markup, &defaults, Arc::clone(coordinator))
        })
        .collect()
}
