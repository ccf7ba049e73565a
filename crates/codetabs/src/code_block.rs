//! Code block configuration and content augmentation.
//!
//! [`CodeConfig`] is a typed view over the props of a code-bearing element.
//! It holds the props by reference, so a tab's configuration is always the
//! author's own configuration.
//!
//! [`augment`] produces the content shown under a tab header: the author's
//! block with its badge moved out, a sibling-tabs marker, and a flush-top
//! class.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::markup::{Element, ElementKind, Node, Props};
use crate::util::join_classes;

/// Class that removes the block's own vertical margin so it sits flush under
/// the shared header.
pub const FLUSH_TOP_CLASS: &str = "code-block--flush";

/// Badge variant used when the block does not name one.
pub const DEFAULT_BADGE_COLOR: &str = "code";

/// Configuration of a code-bearing element.
#[derive(Clone, Debug, PartialEq)]
pub struct CodeConfig {
    kind: ElementKind,
    props: Arc<Props>,
    text: String,
    /// `className` of the first nested element (the `code` inside a `pre`).
    inner_class: Option<String>,
}

impl CodeConfig {
    /// Extract the configuration of a code-bearing element.
    ///
    /// Returns `None` when the element is not code-bearing.
    #[must_use]
    pub fn extract(element: &Element) -> Option<Self> {
        if !element.kind().is_code_bearing() {
            return None;
        }
        Some(Self {
            kind: element.kind(),
            props: Arc::clone(element.shared_props()),
            text: element.text_content(),
            inner_class: element
                .children()
                .iter()
                .find_map(Node::as_element)
                .and_then(|inner| inner.prop_str("className"))
                .map(str::to_owned),
        })
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// The underlying props, shared with the author's element.
    #[must_use]
    pub fn props(&self) -> &Arc<Props> {
        &self.props
    }

    fn str_prop(&self, name: &str) -> Option<&str> {
        self.props
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    fn flag(&self, name: &str) -> bool {
        self.props.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Source text: the `source` prop, or the element's text when a plain
    /// `pre` has none.
    #[must_use]
    pub fn source(&self) -> &str {
        match self.props.get("source").and_then(Value::as_str) {
            Some(source) => source,
            None => &self.text,
        }
    }

    /// Language from the `lang` prop, else from a `language-*` class on the
    /// element or its nested `code`.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.str_prop("lang").or_else(|| {
            [self.class_name(), self.inner_class.as_deref()]
                .into_iter()
                .flatten()
                .flat_map(str::split_whitespace)
                .find_map(|c| c.strip_prefix("language-"))
                .filter(|l| !l.is_empty())
        })
    }

    #[must_use]
    pub fn badge_label(&self) -> Option<&str> {
        self.str_prop("badgeLabel")
    }

    #[must_use]
    pub fn badge_color(&self) -> &str {
        self.str_prop("badgeColor").unwrap_or(DEFAULT_BADGE_COLOR)
    }

    #[must_use]
    pub fn no_copy(&self) -> bool {
        self.flag("noCopy")
    }

    #[must_use]
    pub fn no_report(&self) -> bool {
        self.flag("noReport")
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.str_prop("title")
    }

    #[must_use]
    pub fn class_name(&self) -> Option<&str> {
        self.str_prop("className")
    }
}

/// Serializable summary used by `inspect` style tooling.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeConfigSummary<'a> {
    pub kind: ElementKind,
    pub source: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge_label: Option<&'a str>,
    pub badge_color: &'a str,
    pub no_copy: bool,
    pub no_report: bool,
}

impl<'a> From<&'a CodeConfig> for CodeConfigSummary<'a> {
    fn from(config: &'a CodeConfig) -> Self {
        Self {
            kind: config.kind(),
            source: config.source(),
            language: config.language(),
            badge_label: config.badge_label(),
            badge_color: config.badge_color(),
            no_copy: config.no_copy(),
            no_report: config.no_report(),
        }
    }
}

/// Context injected into tab content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentOptions {
    /// Drop the inline badge (the header shows it instead).
    pub suppress_badge: bool,
    /// Mark the content as one of several tabs.
    pub has_sibling_tabs: bool,
    /// Classes placed before the block's own class.
    pub extra_classes: Vec<String>,
}

impl ContentOptions {
    /// Options used for every tab of a code-tabs widget.
    #[must_use]
    pub fn for_tab() -> Self {
        Self {
            suppress_badge: true,
            has_sibling_tabs: true,
            extra_classes: vec![FLUSH_TOP_CLASS.to_owned()],
        }
    }
}

/// Build tab content from a code-bearing element.
///
/// Clones `block` and rewrites the props of its first nested element; a
/// block without a nested element has its own props rewritten instead.
/// The rewritten props start from the nested element's props, then:
///
/// - `badgeLabel` is removed when `suppress_badge` is set
/// - `hasTabs` is set to `true` when `has_sibling_tabs` is set
/// - `className` becomes `extra_classes` followed by the block's own
///   `className`
///
/// # Example
///
/// ```
/// use codetabs::{augment, ContentOptions, Element, Node, Props};
///
/// let code = Element::new("code", Props::new(), vec!["ls".into()]);
/// let pre = Element::new("pre", Props::new(), vec![code.into()]);
///
/// let out = augment(&pre, &ContentOptions::for_tab());
/// let Node::Element(inner) = &out.children()[0] else { unreachable!() };
/// assert_eq!(inner.prop_str("className"), Some("code-block--flush"));
/// assert!(inner.prop_flag("hasTabs"));
/// ```
#[must_use]
pub fn augment(block: &Element, options: &ContentOptions) -> Element {
    let class_name = join_classes(
        options
            .extra_classes
            .iter()
            .map(|c| Some(c.as_str()))
            .chain([block.prop_str("className")]),
    );

    let rewrite = |mut props: Props| {
        if options.suppress_badge {
            props.remove("badgeLabel");
        }
        if options.has_sibling_tabs {
            props.insert("hasTabs".to_owned(), Value::Bool(true));
        }
        if class_name.is_empty() {
            props.remove("className");
        } else {
            props.insert("className".to_owned(), Value::String(class_name.clone()));
        }
        props
    };

    let mut out = block.clone();
    match out.first_element_index() {
        Some(idx) => {
            let children = out.children_mut();
            if let Node::Element(inner) = children[idx].clone() {
                let props = rewrite(inner.props().clone());
                children[idx] = Node::Element(inner.with_props(props));
            }
            out
        }
        None => {
            let props = rewrite(out.props().clone());
            out.with_props(props)
        }
    }
}
