//! A code-tabs widget instance.
//!
//! [`CodeTabs`] ties the pieces together for one widget on a page:
//!
//! 1. **Normalize** its children into tab records (recomputed only when the
//!    children change)
//! 2. **Render** the header strip and selected content, collecting button
//!    handles for this pass
//! 3. **After paint**, position the indicator from live layout
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use codetabs::{CodeTabs, Collaborators, ColorMode, SharedSelection, parse_children};
//!
//! let children = parse_children(r#"[
//!     {"tag": "CodeTab", "props": {"label": "npm", "value": "npm"},
//!      "children": [{"tag": "pre", "props": {"source": "npm i"}}]},
//!     {"tag": "CodeTab", "props": {"label": "yarn", "value": "yarn"},
//!      "children": [{"tag": "pre", "props": {"source": "yarn add"}}]}
//! ]"#).unwrap();
//!
//! let selection = Arc::new(SharedSelection::new());
//! let mut tabs = CodeTabs::new("install", children.into(), selection)
//!     .with_group("pkg-manager");
//!
//! assert!(tabs.activate("yarn"));
//! let html = tabs.render(ColorMode::Light, &Collaborators::default());
//! assert!(html.contains("yarn add"));
//! ```

use std::sync::Arc;

use crate::composer::{Collaborators, ComposeInput, DomIds, compose};
use crate::indicator::{ButtonHandles, IndicatorPlacement, IndicatorPositioner, LayoutSurface};
use crate::markup::{Node, WidgetMarkup};
use crate::normalize::{TabRecord, normalize};
use crate::selection::{
    DEFAULT_GROUP, SelectionCoordinator, SelectionEventReceiver, TabSelection, get_selection,
};
use crate::style::{BlockStyle, ColorMode};

/// Settings applied to widgets that do not declare their own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetDefaults {
    pub group: String,
    pub block_style: BlockStyle,
    pub class_name: Option<String>,
}

impl Default for WidgetDefaults {
    fn default() -> Self {
        Self {
            group: DEFAULT_GROUP.to_owned(),
            block_style: BlockStyle::default(),
            class_name: None,
        }
    }
}

/// One code-tabs widget.
pub struct CodeTabs {
    ids: DomIds,
    group: String,
    block_style: BlockStyle,
    class_name: Option<String>,
    children: Arc<[Node]>,
    tabs: Vec<TabRecord>,
    coordinator: Arc<dyn SelectionCoordinator>,
    handles: ButtonHandles,
}

impl CodeTabs {
    /// Create a widget in the default group.
    ///
    /// `id` prefixes the DOM ids of every element the widget renders.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        children: Arc<[Node]>,
        coordinator: Arc<dyn SelectionCoordinator>,
    ) -> Self {
        let tabs = normalize(&children);
        Self {
            ids: DomIds::new(id),
            group: DEFAULT_GROUP.to_owned(),
            block_style: BlockStyle::default(),
            class_name: None,
            children,
            tabs,
            coordinator,
            handles: ButtonHandles::new(),
        }
    }

    /// Build a widget from a page declaration.
    ///
    /// Markup without an id gets `code-tabs-{index}`. Pages from
    /// [`parse_page`](crate::parse_page) already carry a free id.
    #[must_use]
    pub fn from_markup(
        index: usize,
        markup: WidgetMarkup,
        defaults: &WidgetDefaults,
        coordinator: Arc<dyn SelectionCoordinator>,
    ) -> Self {
        let id = markup
            .id
            .unwrap_or_else(|| format!("code-tabs-{index}"));
        let group = markup
            .group
            .filter(|g| !g.is_empty())
            .unwrap_or_else(|| defaults.group.clone());
        let class_name = markup.class_name.or_else(|| defaults.class_name.clone());

        let mut widget = Self::new(id, markup.children.into(), coordinator)
            .with_group(group)
            .with_block_style(markup.block_style.unwrap_or(defaults.block_style));
        widget.class_name = class_name;
        widget
    }

    /// Share selection with every widget using the same `group`.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    #[must_use]
    pub fn with_block_style(mut self, block_style: BlockStyle) -> Self {
        self.block_style = block_style;
        self
    }

    /// Extra class for the outer container.
    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> &DomIds {
        &self.ids
    }

    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    #[must_use]
    pub fn block_style(&self) -> BlockStyle {
        self.block_style
    }

    /// Normalized tabs, in child order.
    #[must_use]
    pub fn tabs(&self) -> &[TabRecord] {
        &self.tabs
    }

    /// Button handles from the most recent render.
    #[must_use]
    pub fn handles(&self) -> &ButtonHandles {
        &self.handles
    }

    /// Replace the children.
    ///
    /// Tabs are recomputed only when `children` is a different allocation
    /// from the current one. Returns whether they were.
    pub fn set_children(&mut self, children: Arc<[Node]>) -> bool {
        if Arc::ptr_eq(&self.children, &children) {
            return false;
        }
        self.tabs = normalize(&children);
        self.children = children;
        self.handles.clear();
        true
    }

    /// This widget's view of its group's selection.
    #[must_use]
    pub fn selection(&self) -> TabSelection<'_> {
        get_selection(&*self.coordinator, &self.tabs, &self.group)
    }

    /// Select the tab with `value` for the whole group.
    ///
    /// Returns `false`, writing nothing, when no local tab has that value.
    pub fn activate(&self, value: &str) -> bool {
        let Some(tab) = self.tabs.iter().find(|tab| tab.value() == value) else {
            tracing::debug!(widget = %self.ids.root(), value, "No tab to activate");
            return false;
        };
        self.selection().change(tab);
        true
    }

    /// Subscribe to selection changes in this widget's group.
    #[must_use]
    pub fn subscribe(&self) -> SelectionEventReceiver {
        self.coordinator.subscribe(&self.group)
    }

    /// Render the widget, rebuilding its button handles.
    pub fn render(&mut self, color_mode: ColorMode, collaborators: &Collaborators) -> String {
        let selection = get_selection(&*self.coordinator, &self.tabs, &self.group);
        compose(
            &ComposeInput {
                ids: &self.ids,
                tabs: &self.tabs,
                selection: &selection,
                block_style: self.block_style,
                color_mode,
                class_name: self.class_name.as_deref(),
            },
            collaborators,
            &mut self.handles,
        )
    }

    /// Position the indicator once the rendered output has been painted.
    ///
    /// Call after every paint that may have moved or resized the selected
    /// tab, and at least after every render that changed the selection.
    pub fn after_paint(&self, surface: &mut dyn LayoutSurface) -> Option<IndicatorPlacement> {
        IndicatorPositioner::new(self.ids.indicator(), self.ids.header(), self.block_style)
            .position(&self.handles, surface)
    }
}
