//! HTML composition of a code-tabs widget.
//!
//! The composer owns the layout of the widget. Everything inside it that
//! has its own behavior (tab buttons, the badge, the copy/report action bar,
//! the code block) is drawn by a collaborator from [`Collaborators`].
//!
//! # Output HTML Structure
//!
//! ```html
//! <div class="code-tabs code-tabs--loud ..." id="w" data-group="client">
//!   <div class="code-tabs__header ..." id="w-header">
//!     <span class="code-tabs__indicator ..." id="w-indicator" aria-hidden="true"></span>
//!     <ul class="code-tabs__list" role="tablist">
//!       <li class="code-tabs__item"><button role="tab" id="w-tab-0" aria-selected="true" ...>npm</button></li>
//!       <li class="code-tabs__item"><button role="tab" id="w-tab-1" aria-selected="false" ...>yarn</button></li>
//!     </ul>
//!     <span class="badge badge--code">Terminal</span>
//!     <div class="code-block-actions ...">...</div>
//!   </div>
//!   <div class="code-tabs__body" role="tabpanel" id="w-panel" aria-labelledby="w-tab-0">
//!     <!-- selected tab content -->
//!   </div>
//! </div>
//! ```

use std::fmt::Write;

use serde_json::Value;

use crate::indicator::{ButtonHandles, NodeRef};
use crate::markup::{Element, Props, write_element};
use crate::normalize::TabRecord;
use crate::selection::TabSelection;
use crate::style::{BlockStyle, ColorMode};
use crate::util::{escape_html, join_classes};

/// Props handed to the tab button collaborator.
///
/// The author's own tab element type and props come first; the composer
/// layers the contextual props on top.
pub struct TabButtonProps<'a> {
    /// Element type of the author's tab child.
    pub tag: &'a str,
    /// The author's own props.
    pub props: &'a Props,
    pub label: &'a str,
    pub value: &'a str,
    /// Id the button must carry so it can be measured.
    pub node_ref: &'a NodeRef,
    pub is_selected: bool,
    pub block_style: BlockStyle,
    /// Selection-change handler for this button.
    pub change_selection: ChangeSelection<'a>,
}

/// Selection-change handler bound to one tab.
#[derive(Clone, Copy)]
pub struct ChangeSelection<'a> {
    selection: &'a TabSelection<'a>,
    tab: &'a TabRecord,
}

impl ChangeSelection<'_> {
    /// Select the bound tab for the whole group.
    pub fn invoke(&self) {
        self.selection.change(self.tab);
    }

    /// Group the handler writes to.
    #[must_use]
    pub fn group(&self) -> &str {
        self.selection.group()
    }
}

/// Props handed to the action bar collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionBarProps<'a> {
    pub source: &'a str,
    pub block_style: BlockStyle,
    pub no_report: bool,
    pub no_copy: bool,
    pub in_inner_code: bool,
    pub show_gradient_bg: bool,
    pub in_header: bool,
    pub is_collapsed: bool,
}

impl<'a> ActionBarProps<'a> {
    /// Action bar props for the tab currently shown.
    #[must_use]
    pub fn for_tab(tab: &'a TabRecord, block_style: BlockStyle) -> Self {
        let config = tab.code_config();
        Self {
            source: config.source(),
            block_style,
            no_report: config.no_report(),
            no_copy: config.no_copy(),
            in_inner_code: true,
            show_gradient_bg: false,
            in_header: true,
            is_collapsed: false,
        }
    }
}

/// Draws one tab button.
pub trait TabButtonRenderer {
    fn render(&self, props: &TabButtonProps<'_>, out: &mut String);
}

/// Draws the copy/report action bar.
pub trait ActionBarRenderer {
    fn render(&self, props: &ActionBarProps<'_>, out: &mut String);
}

/// Draws the header badge.
pub trait BadgeRenderer {
    fn render(&self, label: &str, variant: &str, out: &mut String);
}

/// Draws the selected tab's content.
pub trait CodeBlockRenderer {
    fn render(&self, content: &Element, out: &mut String);
}

/// Default HTML tab button: a `button` inside a list item.
pub struct HtmlTabButton;

impl TabButtonRenderer for HtmlTabButton {
    fn render(&self, props: &TabButtonProps<'_>, out: &mut String) {
        let author_class = props.props.get("className").and_then(Value::as_str);
        let class = join_classes([
            Some("code-tabs__tab"),
            Some(match props.block_style {
                BlockStyle::Loud => "code-tabs__tab--loud",
                BlockStyle::Subtle => "code-tabs__tab--subtle",
            }),
            props.is_selected.then_some("code-tabs__tab--selected"),
            author_class,
        ]);
        let _ = write!(
            out,
            r#"<li class="code-tabs__item"><button type="button" role="tab" id="{}" class="{}" aria-selected="{}" tabindex="{}" data-group="{}" data-value="{}">{}</button></li>"#,
            escape_html(props.node_ref.as_str()),
            escape_html(&class),
            props.is_selected,
            if props.is_selected { "0" } else { "-1" },
            escape_html(props.change_selection.group()),
            escape_html(props.value),
            escape_html(props.label),
        );
    }
}

/// Default HTML action bar with copy and report controls.
pub struct HtmlActionBar;

impl ActionBarRenderer for HtmlActionBar {
    fn render(&self, props: &ActionBarProps<'_>, out: &mut String) {
        if props.no_copy && props.no_report {
            return;
        }
        let class = join_classes([
            Some("code-block-actions"),
            Some(match props.block_style {
                BlockStyle::Loud => "code-block-actions--loud",
                BlockStyle::Subtle => "code-block-actions--subtle",
            }),
            props.in_header.then_some("code-block-actions--header"),
            props.in_inner_code.then_some("code-block-actions--inner"),
            props.show_gradient_bg.then_some("code-block-actions--gradient"),
            props.is_collapsed.then_some("code-block-actions--collapsed"),
        ]);
        let _ = write!(out, r#"<div class="{class}">"#);
        if !props.no_copy {
            let _ = write!(
                out,
                r#"<button type="button" class="code-block-actions__copy" data-copy="{}">Copy</button>"#,
                escape_html(props.source)
            );
        }
        if !props.no_report {
            out.push_str(
                r#"<button type="button" class="code-block-actions__report">Report issue</button>"#,
            );
        }
        out.push_str("</div>");
    }
}

/// Default HTML badge.
pub struct HtmlBadge;

impl BadgeRenderer for HtmlBadge {
    fn render(&self, label: &str, variant: &str, out: &mut String) {
        let _ = write!(
            out,
            r#"<span class="badge badge--{}">{}</span>"#,
            escape_html(variant),
            escape_html(label)
        );
    }
}

/// Default HTML code block: serializes the content element.
pub struct HtmlCodeBlock;

impl CodeBlockRenderer for HtmlCodeBlock {
    fn render(&self, content: &Element, out: &mut String) {
        write_element(content, out);
    }
}

/// The collaborators a widget draws with.
pub struct Collaborators {
    pub tab_button: Box<dyn TabButtonRenderer>,
    pub action_bar: Box<dyn ActionBarRenderer>,
    pub badge: Box<dyn BadgeRenderer>,
    pub code_block: Box<dyn CodeBlockRenderer>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            tab_button: Box::new(HtmlTabButton),
            action_bar: Box::new(HtmlActionBar),
            badge: Box::new(HtmlBadge),
            code_block: Box::new(HtmlCodeBlock),
        }
    }
}

/// DOM ids of one widget's parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomIds {
    prefix: String,
}

impl DomIds {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeRef {
        NodeRef::new(self.prefix.clone())
    }

    /// The tab strip container the indicator is positioned against.
    #[must_use]
    pub fn header(&self) -> NodeRef {
        NodeRef::new(format!("{}-header", self.prefix))
    }

    #[must_use]
    pub fn indicator(&self) -> NodeRef {
        NodeRef::new(format!("{}-indicator", self.prefix))
    }

    #[must_use]
    pub fn button(&self, index: usize) -> NodeRef {
        NodeRef::new(format!("{}-tab-{index}", self.prefix))
    }

    #[must_use]
    pub fn panel(&self) -> NodeRef {
        NodeRef::new(format!("{}-panel", self.prefix))
    }
}

/// Everything the composer needs for one render pass.
pub struct ComposeInput<'a> {
    pub ids: &'a DomIds,
    pub tabs: &'a [TabRecord],
    pub selection: &'a TabSelection<'a>,
    pub block_style: BlockStyle,
    pub color_mode: ColorMode,
    pub class_name: Option<&'a str>,
}

/// Compose the widget HTML.
///
/// `handles` is cleared and refilled with one handle per rendered button.
pub fn compose(
    input: &ComposeInput<'_>,
    collaborators: &Collaborators,
    handles: &mut ButtonHandles,
) -> String {
    let ComposeInput {
        ids,
        tabs,
        selection,
        block_style,
        color_mode,
        class_name,
    } = *input;

    handles.clear();
    let effective = selection.effective();
    let effective_index = effective.map(|(idx, _)| idx);

    let mut out = String::with_capacity(1024);

    let root_class = join_classes([
        Some("code-tabs"),
        Some(match block_style {
            BlockStyle::Loud => "code-tabs--loud",
            BlockStyle::Subtle => "code-tabs--subtle",
        }),
        Some(block_style.background_class(color_mode)),
        Some(block_style.shadow_class()),
        class_name,
    ]);
    let _ = write!(
        out,
        r#"<div class="{}" id="{}" data-group="{}">"#,
        escape_html(&root_class),
        escape_html(ids.root().as_str()),
        escape_html(selection.group()),
    );

    let _ = write!(
        out,
        r#"<div class="{}" id="{}">"#,
        block_style.header_class(),
        escape_html(ids.header().as_str()),
    );
    let _ = write!(
        out,
        r#"<span class="code-tabs__indicator {}" id="{}" aria-hidden="true"></span>"#,
        block_style.indicator_class(color_mode),
        escape_html(ids.indicator().as_str()),
    );

    out.push_str(r#"<ul class="code-tabs__list" role="tablist">"#);
    for (idx, tab) in tabs.iter().enumerate() {
        let node_ref = ids.button(idx);
        handles.push(tab.value(), node_ref.clone());
        collaborators.tab_button.render(
            &TabButtonProps {
                tag: tab.button_tag(),
                props: tab.button_props(),
                label: tab.label(),
                value: tab.value(),
                node_ref: &node_ref,
                is_selected: effective_index == Some(idx),
                block_style,
                change_selection: ChangeSelection { selection, tab },
            },
            &mut out,
        );
    }
    out.push_str("</ul>");

    if let Some((_, tab)) = effective {
        let config = tab.code_config();
        if let Some(label) = config.badge_label() {
            collaborators
                .badge
                .render(label, config.badge_color(), &mut out);
        }
        collaborators
            .action_bar
            .render(&ActionBarProps::for_tab(tab, block_style), &mut out);
    }
    out.push_str("</div>");

    if let Some((idx, tab)) = effective {
        let _ = write!(
            out,
            r#"<div class="code-tabs__body" role="tabpanel" id="{}" aria-labelledby="{}">"#,
            escape_html(ids.panel().as_str()),
            escape_html(ids.button(idx).as_str()),
        );
        collaborators.code_block.render(tab.content(), &mut out);
        out.push_str("</div>");
    }

    out.push_str("</div>");

    tracing::debug!(
        widget = %ids.root(),
        tabs = tabs.len(),
        selected = effective.map(|(_, tab)| tab.value()),
        "Composed code tabs"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_children;
    use crate::normalize::normalize;
    use crate::selection::{SelectionCoordinator, SharedSelection, get_selection};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    const TABS: &str = r#"[
        {"tag": "CodeTab", "props": {"label": "npm", "value": "npm", "className": "pm"},
         "children": [{"tag": "pre", "props": {"source": "npm i", "badgeLabel": "Terminal", "badgeColor": "green"}}]},
        {"tag": "CodeTab", "props": {"label": "yarn", "value": "yarn"},
         "children": [{"tag": "pre", "props": {"source": "yarn add", "noCopy": true, "noReport": true}}]}
    ]"#;

    fn render(
        tabs: &[TabRecord],
        coordinator: &dyn SelectionCoordinator,
        style: BlockStyle,
        collaborators: &Collaborators,
    ) -> (String, ButtonHandles) {
        let ids = DomIds::new("w");
        let selection = get_selection(coordinator, tabs, "pkg");
        let mut handles = ButtonHandles::new();
        let html = compose(
            &ComposeInput {
                ids: &ids,
                tabs,
                selection: &selection,
                block_style: style,
                color_mode: ColorMode::Dark,
                class_name: Some("docs-example"),
            },
            collaborators,
            &mut handles,
        );
        (html, handles)
    }

    #[test]
    fn test_first_tab_selected_by_default() {
        let tabs = normalize(&parse_children(TABS).unwrap());
        let coordinator = SharedSelection::new();
        let (html, handles) = render(&tabs, &coordinator, BlockStyle::Loud, &Collaborators::default());

        assert!(html.contains(
            r#"<li class="code-tabs__item"><button type="button" role="tab" id="w-tab-0" class="code-tabs__tab code-tabs__tab--loud code-tabs__tab--selected pm" aria-selected="true" tabindex="0" data-group="pkg" data-value="npm">npm</button></li>"#
        ));
        assert!(html.contains(r#"id="w-tab-1" class="code-tabs__tab code-tabs__tab--loud" aria-selected="false" tabindex="-1""#));
        assert!(html.contains(r#"<span class="badge badge--green">Terminal</span>"#));
        assert!(html.contains(r#"data-copy="npm i""#));
        assert!(html.contains(r#"aria-labelledby="w-tab-0""#));
        assert_eq!(
            handles.iter().map(|h| h.node.as_str()).collect::<Vec<_>>(),
            vec!["w-tab-0", "w-tab-1"]
        );
    }

    #[test]
    fn test_selected_tab_body_only() {
        let tabs = normalize(&parse_children(TABS).unwrap());
        let coordinator = SharedSelection::new();
        coordinator.change_selection("pkg", "yarn");
        let (html, _) = render(&tabs, &coordinator, BlockStyle::Loud, &Collaborators::default());

        assert!(html.contains("yarn add"));
        assert!(!html.contains("npm i"));
        // Badge suppressed, actions fully disabled for yarn.
        assert!(!html.contains("badge"));
        assert!(!html.contains("code-block-actions"));
        assert!(html.contains(r#"id="w-tab-1" class="code-tabs__tab code-tabs__tab--loud code-tabs__tab--selected" aria-selected="true""#));
    }

    #[test]
    fn test_container_classes() {
        let tabs = normalize(&parse_children(TABS).unwrap());
        let coordinator = SharedSelection::new();
        let (html, _) = render(&tabs, &coordinator, BlockStyle::Subtle, &Collaborators::default());

        assert!(html.starts_with(
            r#"<div class="code-tabs code-tabs--subtle code-tabs--code-header code-tabs--flat docs-example" id="w" data-group="pkg">"#
        ));
        assert!(html.contains(r#"<div class="code-tabs__header code-tabs__header--subtle" id="w-header">"#));
        assert!(html.contains(
            r#"<span class="code-tabs__indicator code-tabs__indicator--pill code-tabs__indicator--dark" id="w-indicator" aria-hidden="true"></span>"#
        ));
    }

    #[test]
    fn test_zero_tabs_renders_empty_strip() {
        let coordinator = SharedSelection::new();
        let (html, handles) = render(&[], &coordinator, BlockStyle::Loud, &Collaborators::default());

        assert!(html.contains(r#"<ul class="code-tabs__list" role="tablist"></ul></div></div>"#));
        assert!(!html.contains("tabpanel"));
        assert!(handles.is_empty());
    }

    #[test]
    fn test_handles_reset_each_pass() {
        let tabs = normalize(&parse_children(TABS).unwrap());
        let coordinator = SharedSelection::new();
        let ids = DomIds::new("w");
        let selection = get_selection(&coordinator, &tabs, "pkg");
        let mut handles = ButtonHandles::new();
        let input = ComposeInput {
            ids: &ids,
            tabs: &tabs,
            selection: &selection,
            block_style: BlockStyle::Loud,
            color_mode: ColorMode::Light,
            class_name: None,
        };

        compose(&input, &Collaborators::default(), &mut handles);
        compose(&input, &Collaborators::default(), &mut handles);

        assert_eq!(handles.len(), 2);
    }

    #[test]
    fn test_action_bar_props() {
        let tabs = normalize(&parse_children(TABS).unwrap());
        assert_eq!(
            ActionBarProps::for_tab(&tabs[1], BlockStyle::Subtle),
            ActionBarProps {
                source: "yarn add",
                block_style: BlockStyle::Subtle,
                no_report: true,
                no_copy: true,
                in_inner_code: true,
                show_gradient_bg: false,
                in_header: true,
                is_collapsed: false,
            }
        );
    }

    /// Button collaborator that records what it was given and activates
    /// the last tab.
    struct RecordingButton {
        seen: Rc<RefCell<Vec<(String, String, bool, BlockStyle)>>>,
    }

    impl TabButtonRenderer for RecordingButton {
        fn render(&self, props: &TabButtonProps<'_>, out: &mut String) {
            self.seen.borrow_mut().push((
                props.tag.to_owned(),
                props.value.to_owned(),
                props.is_selected,
                props.block_style,
            ));
            if props.value == "yarn" {
                props.change_selection.invoke();
            }
            out.push_str("<li></li>");
        }
    }

    #[test]
    fn test_button_collaborator_receives_context() {
        let tabs = normalize(&parse_children(TABS).unwrap());
        let coordinator = SharedSelection::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let collaborators = Collaborators {
            tab_button: Box::new(RecordingButton {
                seen: Rc::clone(&seen),
            }),
            ..Collaborators::default()
        };

        render(&tabs, &coordinator, BlockStyle::Subtle, &collaborators);

        assert_eq!(
            *seen.borrow(),
            vec![
                ("CodeTab".to_owned(), "npm".to_owned(), true, BlockStyle::Subtle),
                ("CodeTab".to_owned(), "yarn".to_owned(), false, BlockStyle::Subtle),
            ]
        );
        assert_eq!(coordinator.selected_value("pkg").as_deref(), Some("yarn"));
    }

    #[test]
    fn test_escapes_labels_and_source() {
        let tabs = normalize(
            &parse_children(
                r#"[{"tag": "T", "props": {"label": "<b>", "value": "v\"1"},
                     "children": [{"tag": "pre", "props": {"source": "a && b"}}]}]"#,
            )
            .unwrap(),
        );
        let coordinator = SharedSelection::new();
        let (html, _) = render(&tabs, &coordinator, BlockStyle::Loud, &Collaborators::default());

        assert!(html.contains(r#"data-value="v&quot;1">&lt;b&gt;</button>"#));
        assert!(html.contains(r#"data-copy="a &amp;&amp; b""#));
        assert!(!html.contains("<b>"));
    }
}
