//! Tab record normalization.
//!
//! Turns the author's child nodes into an ordered list of [`TabRecord`]s.
//! Children that do not have the expected shape are dropped; that is not an
//! error, they simply are not tabs.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::code_block::{CodeConfig, CodeConfigSummary, ContentOptions, augment};
use crate::markup::{Element, Node, Props};

/// Canonical, immutable record for one tab.
#[derive(Clone, Debug, PartialEq)]
pub struct TabRecord {
    label: String,
    value: String,
    code_config: CodeConfig,
    content: Element,
    button_tag: String,
    button_props: Arc<Props>,
}

impl TabRecord {
    /// Display text for the tab button.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Identity key used for selection matching.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn code_config(&self) -> &CodeConfig {
        &self.code_config
    }

    /// Content shown when this tab is active, already augmented for tabs.
    #[must_use]
    pub fn content(&self) -> &Element {
        &self.content
    }

    /// Element type of the author's tab child; the button collaborator is
    /// invoked with it.
    #[must_use]
    pub fn button_tag(&self) -> &str {
        &self.button_tag
    }

    /// The author's own props for the tab child.
    #[must_use]
    pub fn button_props(&self) -> &Props {
        &self.button_props
    }

    /// Serializable summary of this record.
    #[must_use]
    pub fn summary(&self) -> TabSummary<'_> {
        TabSummary {
            label: &self.label,
            value: &self.value,
            code: CodeConfigSummary::from(&self.code_config),
        }
    }

    fn from_child(child: &Node) -> Result<Self, Rejection> {
        let Node::Element(tab) = child else {
            return Err(Rejection::NotAnElement);
        };
        let label = tab.prop_str("label").ok_or(Rejection::MissingLabel)?;
        let value = tab.prop_str("value").ok_or(Rejection::MissingValue)?;
        let block = tab
            .single_element_child()
            .ok_or(Rejection::NoSingleElementChild)?;
        let code_config = CodeConfig::extract(block).ok_or(Rejection::NotCodeBearing)?;

        Ok(Self {
            label: label.to_owned(),
            value: value.to_owned(),
            code_config,
            content: augment(block, &ContentOptions::for_tab()),
            button_tag: tab.tag().to_owned(),
            button_props: Arc::clone(tab.shared_props()),
        })
    }
}

/// Serializable view of a [`TabRecord`].
#[derive(Debug, Serialize)]
pub struct TabSummary<'a> {
    pub label: &'a str,
    pub value: &'a str,
    pub code: CodeConfigSummary<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    NotAnElement,
    MissingLabel,
    MissingValue,
    NoSingleElementChild,
    NotCodeBearing,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotAnElement => "not an element",
            Self::MissingLabel => "missing label",
            Self::MissingValue => "missing value",
            Self::NoSingleElementChild => "content is not a single element",
            Self::NotCodeBearing => "content is neither `pre` nor source-bearing",
        })
    }
}

/// Normalize child nodes into tab records.
///
/// Output order follows input order. Duplicate values are kept.
///
/// # Example
///
/// ```
/// let children = codetabs::parse_children(r#"[
///     {"tag": "CodeTab", "props": {"label": "npm", "value": "npm"},
///      "children": [{"tag": "pre", "props": {"source": "npm i"}}]},
///     {"tag": "CodeTab", "props": {"label": "broken"}}
/// ]"#).unwrap();
///
/// let tabs = codetabs::normalize(&children);
/// assert_eq!(tabs.len(), 1);
/// assert_eq!(tabs[0].value(), "npm");
/// ```
pub fn normalize(children: &[Node]) -> Vec<TabRecord> {
    let mut tabs = Vec::with_capacity(children.len());
    for (index, child) in children.iter().enumerate() {
        match TabRecord::from_child(child) {
            Ok(tab) => tabs.push(tab),
            Err(_) if child.is_blank() => {}
            Err(reason) => tracing::debug!(index, %reason, "Skipping code tab child"),
        }
    }
    tabs
}
