//! Author markup: the typed boundary where untyped child nodes enter.
//!
//! Markup arrives as loosely-typed JSON. Every element is classified exactly
//! once, when it is constructed, into an [`ElementKind`]. Downstream code
//! (the normalizer in particular) matches on that discriminant instead of
//! re-inspecting tags and props.
//!
//! # Format
//!
//! ```json
//! {
//!   "widgets": [
//!     {
//!       "group": "pkg-manager",
//!       "children": [
//!         {
//!           "tag": "CodeTab",
//!           "props": { "label": "npm", "value": "npm" },
//!           "children": [
//!             { "tag": "pre", "props": { "source": "npm install" } }
//!           ]
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! A node is either a JSON string (text) or an object with `tag` (alias
//! `type`), optional `props` and optional `children`. Any other JSON value
//! is kept as [`Node::Other`] so a stray child never fails the whole parse;
//! it is simply not a tab.

use std::collections::HashSet;
use std::fmt::Write;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::style::BlockStyle;
use crate::util::{escape_html, kebab_case};

/// Loosely-typed element properties.
pub type Props = serde_json::Map<String, Value>;

/// Explicit discriminant for the shape of an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    /// A generic preformatted block (`pre`).
    Preformatted,
    /// Any element exposing a `source` prop.
    SourceBearing,
    /// Everything else.
    Generic,
}

impl ElementKind {
    /// Classify an element from its tag and props.
    ///
    /// `pre` takes precedence over a `source` prop.
    #[must_use]
    pub fn classify(tag: &str, props: &Props) -> Self {
        if tag == "pre" {
            Self::Preformatted
        } else if props.contains_key("source") {
            Self::SourceBearing
        } else {
            Self::Generic
        }
    }

    /// Whether elements of this kind hold displayable source content.
    #[must_use]
    pub fn is_code_bearing(self) -> bool {
        matches!(self, Self::Preformatted | Self::SourceBearing)
    }
}

/// A markup node.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// Raw text.
    Text(String),
    /// A renderable element.
    Element(Element),
    /// Anything else (`null`, numbers, booleans, objects without a tag).
    Other(Value),
}

impl Node {
    /// Borrow the element, if this node is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) | Self::Other(_) => None,
        }
    }

    /// Whitespace-only text, `null` and booleans carry no content.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Other(value) => value.is_null() || value.is_boolean(),
            Self::Element(_) => false,
        }
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
            Self::Other(Value::Number(n)) => {
                let _ = write!(out, "{n}");
            }
            Self::Other(_) => {}
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

/// A classified element.
///
/// Props are shared behind an [`Arc`]: cloning an element, or extracting its
/// configuration, never copies them.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "RawElement")]
pub struct Element {
    tag: String,
    kind: ElementKind,
    props: Arc<Props>,
    children: Vec<Node>,
}

#[derive(Deserialize)]
struct RawElement {
    #[serde(alias = "type")]
    tag: String,
    #[serde(default)]
    props: Props,
    #[serde(default)]
    children: Vec<Node>,
}

impl From<RawElement> for Element {
    fn from(raw: RawElement) -> Self {
        let mut props = raw.props;
        // Nested content lives in `children`, never in props.
        props.remove("children");
        Self::new(raw.tag, props, raw.children)
    }
}

impl Element {
    /// Create an element, classifying it from `tag` and `props`.
    #[must_use]
    pub fn new(tag: impl Into<String>, props: Props, children: Vec<Node>) -> Self {
        Self::with_shared_props(tag, Arc::new(props), children)
    }

    /// Create an element that shares an existing props object.
    #[must_use]
    pub fn with_shared_props(
        tag: impl Into<String>,
        props: Arc<Props>,
        children: Vec<Node>,
    ) -> Self {
        let tag = tag.into();
        let kind = ElementKind::classify(&tag, &props);
        Self {
            tag,
            kind,
            props,
            children,
        }
    }

    /// Element type name (`pre`, `code`, `CodeBlock`, ...).
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Shape discriminant computed at construction.
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    #[must_use]
    pub fn props(&self) -> &Props {
        &self.props
    }

    /// The shared props handle.
    #[must_use]
    pub fn shared_props(&self) -> &Arc<Props> {
        &self.props
    }

    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Replace the props, reclassifying the element.
    #[must_use]
    pub fn with_props(self, props: Props) -> Self {
        Self::new(self.tag, props, self.children)
    }

    /// String prop, `None` when missing, not a string, or empty.
    #[must_use]
    pub fn prop_str(&self, name: &str) -> Option<&str> {
        self.props
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Boolean prop, `false` unless the prop is literally `true`.
    #[must_use]
    pub fn prop_flag(&self, name: &str) -> bool {
        self.props.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    /// The only non-blank child, if it is an element.
    ///
    /// Returns `None` when there are zero or several non-blank children, or
    /// when the only one is text.
    #[must_use]
    pub fn single_element_child(&self) -> Option<&Element> {
        let mut content = self.children.iter().filter(|c| !c.is_blank());
        match (content.next(), content.next()) {
            (Some(Node::Element(element)), None) => Some(element),
            _ => None,
        }
    }

    /// Index of the first element child.
    pub(crate) fn first_element_index(&self) -> Option<usize> {
        self.children
            .iter()
            .position(|c| matches!(c, Node::Element(_)))
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// Concatenated text of all descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }
}

/// One code-tabs widget declared in a page.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetMarkup {
    /// DOM id prefix. [`parse_page`] fills in a free `code-tabs-{n}` id when
    /// absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Selection group key.
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub block_style: Option<BlockStyle>,
    /// Extra class for the outer container.
    #[serde(default)]
    pub class_name: Option<String>,
    /// Accepted for compatibility; not rendered.
    #[serde(default)]
    pub title: Option<String>,
    /// Tab children.
    #[serde(default)]
    pub children: Vec<Node>,
}

/// A page holding any number of code-tabs widgets.
#[derive(Debug, Default, Deserialize)]
pub struct PageMarkup {
    pub widgets: Vec<WidgetMarkup>,
}

/// Markup parsing error.
#[derive(Debug, thiserror::Error)]
pub enum MarkupError {
    /// JSON syntax or shape error.
    #[error("invalid markup: {0}")]
    Json(#[from] serde_json::Error),
    /// Two widgets on one page claim the same id.
    #[error("duplicate widget id: {0}")]
    DuplicateWidgetId(String),
}

/// Parse a page of widget declarations.
///
/// Widgets without an id get `code-tabs-{index}`, or the next free
/// `code-tabs-{n}` when an explicit id already took that one, so every
/// widget on the page ends up with a distinct id.
///
/// # Example
///
/// ```
/// let page = codetabs::parse_page(r#"{"widgets": [{"children": []}]}"#).unwrap();
/// assert_eq!(page.widgets.len(), 1);
/// ```
pub fn parse_page(json: &str) -> Result<PageMarkup, MarkupError> {
    let mut page: PageMarkup = serde_json::from_str(json)?;

    let mut seen = HashSet::new();
    for id in page.widgets.iter().filter_map(|w| w.id.as_deref()) {
        if !seen.insert(id.to_owned()) {
            return Err(MarkupError::DuplicateWidgetId(id.to_owned()));
        }
    }

    for (index, widget) in page.widgets.iter_mut().enumerate() {
        if widget.id.is_some() {
            continue;
        }
        let mut n = index;
        let id = loop {
            let candidate = format!("code-tabs-{n}");
            if seen.insert(candidate.clone()) {
                break candidate;
            }
            n += 1;
        };
        widget.id = Some(id);
    }

    Ok(page)
}

/// Parse a JSON array of nodes.
pub fn parse_children(json: &str) -> Result<Vec<Node>, MarkupError> {
    Ok(serde_json::from_str(json)?)
}

const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "wbr"];
const VERBATIM_ATTRS: &[&str] = &["id", "title", "lang", "role", "href", "name", "tabindex"];

/// Serialize a node as HTML.
///
/// Component tags (leading uppercase letter) render as a `div` carrying a
/// `data-component` attribute. An element with a `source` prop and no
/// element children renders the source as a code block (a `pre` gets just
/// the inner `code`).
pub fn write_html(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(&escape_html(text)),
        Node::Element(element) => write_element(element, out),
        Node::Other(Value::Number(n)) => {
            let _ = write!(out, "{n}");
        }
        Node::Other(_) => {}
    }
}

/// Serialize an element as HTML. See [`write_html`].
pub fn write_element(element: &Element, out: &mut String) {
    let is_component = element.tag.starts_with(|c: char| c.is_ascii_uppercase());
    let is_valid_tag = !element.tag.is_empty()
        && element
            .tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    let tag = if is_component || !is_valid_tag {
        "div"
    } else {
        element.tag.as_str()
    };

    out.push('<');
    out.push_str(tag);
    if is_component {
        let _ = write!(out, r#" data-component="{}""#, escape_html(&element.tag));
    }
    write_attrs(&element.props, out);
    out.push('>');

    if VOID_TAGS.contains(&tag) {
        return;
    }

    let has_element_children = element.first_element_index().is_some();
    if let Some(source) = element.props.get("source").and_then(Value::as_str)
        && !has_element_children
    {
        let in_pre = tag == "pre";
        if !in_pre {
            out.push_str("<pre>");
        }
        match element.prop_str("lang") {
            Some(lang) => {
                let _ = write!(
                    out,
                    r#"<code class="language-{}">{}</code>"#,
                    escape_html(lang),
                    escape_html(source)
                );
            }
            None => {
                let _ = write!(out, "<code>{}</code>", escape_html(source));
            }
        }
        if !in_pre {
            out.push_str("</pre>");
        }
    } else {
        for child in &element.children {
            write_html(child, out);
        }
    }

    let _ = write!(out, "</{tag}>");
}

fn write_attrs(props: &Props, out: &mut String) {
    for (name, value) in props {
        let attr = match name.as_str() {
            "children" | "source" => continue,
            "className" => "class".to_owned(),
            "style" => {
                write_style_attr(value, out);
                continue;
            }
            n if VERBATIM_ATTRS.contains(&n) || n.starts_with("data-") || n.starts_with("aria-") => {
                n.to_owned()
            }
            n => format!("data-{}", kebab_case(n)),
        };
        if !is_attr_name(&attr) {
            tracing::debug!(name = %name, "Dropping prop with invalid attribute name");
            continue;
        }

        match value {
            Value::String(s) => {
                let _ = write!(out, r#" {attr}="{}""#, escape_html(s));
            }
            Value::Number(n) => {
                let _ = write!(out, r#" {attr}="{n}""#);
            }
            Value::Bool(true) => {
                let _ = write!(out, " {attr}");
            }
            _ => {}
        }
    }
}

/// Attribute and CSS property names: `[A-Za-z0-9_:-]+`.
fn is_attr_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '-'))
}

fn write_style_attr(value: &Value, out: &mut String) {
    let css = match value {
        Value::String(s) => s.clone(),
        Value::Object(rules) => rules
            .iter()
            .map(|(k, v)| (kebab_case(k), v))
            .filter(|(k, _)| is_attr_name(k))
            .filter_map(|(k, v)| match v {
                Value::String(s) => Some(format!("{k}: {s}")),
                Value::Number(n) => Some(format!("{k}: {n}")),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("; "),
        _ => return,
    };
    if !css.is_empty() {
        let _ = write!(out, r#" style="{}""#, escape_html(&css));
    }
}
