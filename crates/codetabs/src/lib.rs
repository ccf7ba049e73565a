//! Tabbed code-example widget.
//!
//! This crate renders a group of alternative code snippets (one per
//! language, package manager or platform) as a tab strip with a single
//! visible code block. Widgets sharing a group key switch together.
//!
//! # Architecture
//!
//! - [`markup`](parse_page): the element tree a page declares widgets with
//! - [`normalize`]: turns raw children into [`TabRecord`]s, skipping invalid ones
//! - [`SelectionCoordinator`]: group-keyed selection shared across widgets
//! - [`compose`]: renders the header strip and selected content through
//!   pluggable [`Collaborators`]
//! - [`IndicatorPositioner`]: moves the selection indicator after paint,
//!   measuring through a [`LayoutSurface`]
//! - [`CodeTabs`]: one widget instance tying the above together
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use codetabs::{CodeTabs, Collaborators, ColorMode, SharedSelection, parse_page};
//!
//! let page = parse_page(r#"{"widgets": [{"group": "lang", "children": [
//!     {"tag": "CodeTab", "props": {"label": "Rust", "value": "rust"},
//!      "children": [{"tag": "pre", "props": {"source": "fn main() {}", "lang": "rust"}}]}
//! ]}]}"#).unwrap();
//!
//! let selection = Arc::new(SharedSelection::new());
//! let mut widgets: Vec<CodeTabs> = page
//!     .widgets
//!     .into_iter()
//!     .enumerate()
//!     .map(|(i, w)| CodeTabs::from_markup(i, w, &Default::default(), selection.clone()))
//!     .collect();
//!
//! let html = widgets[0].render(ColorMode::Light, &Collaborators::default());
//! assert!(html.contains(r#"role="tab""#));
//! ```

mod code_block;
mod composer;
mod geometry;
mod indicator;
mod markup;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod normalize;
mod selection;
mod style;
mod util;
mod widget;

pub use code_block::{
    CodeConfig, CodeConfigSummary, ContentOptions, DEFAULT_BADGE_COLOR, FLUSH_TOP_CLASS, augment,
};
pub use composer::{
    ActionBarProps, ActionBarRenderer, BadgeRenderer, ChangeSelection, CodeBlockRenderer,
    Collaborators, ComposeInput, DomIds, HtmlActionBar, HtmlBadge, HtmlCodeBlock, HtmlTabButton,
    TabButtonProps, TabButtonRenderer, compose,
};
pub use geometry::Rect;
pub use indicator::{
    ButtonHandle, ButtonHandles, IndicatorPlacement, IndicatorPositioner, LayoutSurface, NodeRef,
};
pub use markup::{
    Element, ElementKind, MarkupError, Node, PageMarkup, Props, WidgetMarkup, parse_children,
    parse_page, write_element, write_html,
};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockSurface;
pub use normalize::{TabRecord, TabSummary, normalize};
pub use selection::{
    DEFAULT_GROUP, SelectionCoordinator, SelectionEvent, SelectionEventReceiver, SharedSelection,
    TabSelection, get_selection,
};
pub use style::{BlockStyle, ColorMode, ParseStyleError};
pub use util::escape_html;
pub use widget::{CodeTabs, WidgetDefaults};
