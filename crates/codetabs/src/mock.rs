//! In-memory layout surface for testing.
//!
//! Provides [`MockSurface`] for exercising indicator positioning without a
//! browser.

use std::collections::HashMap;

use crate::geometry::Rect;
use crate::indicator::{LayoutSurface, NodeRef};

#[derive(Debug, Default)]
struct MockElement {
    rect: Rect,
    parent: Option<NodeRef>,
    attributes: HashMap<String, String>,
}

/// Layout surface backed by a map of element ids to boxes.
///
/// An element is attached while it is present in the map.
#[derive(Debug, Default)]
pub struct MockSurface {
    elements: HashMap<NodeRef, MockElement>,
    styles: HashMap<(NodeRef, String), String>,
    writes: usize,
}

impl MockSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attached element.
    #[must_use]
    pub fn with_element(mut self, id: &str, rect: Rect) -> Self {
        self.elements.insert(
            NodeRef::new(id),
            MockElement {
                rect,
                ..MockElement::default()
            },
        );
        self
    }

    /// Add an attached element nested in `parent`.
    #[must_use]
    pub fn with_child(mut self, id: &str, parent: &str, rect: Rect) -> Self {
        self.elements.insert(
            NodeRef::new(id),
            MockElement {
                rect,
                parent: Some(NodeRef::new(parent)),
                ..MockElement::default()
            },
        );
        self
    }

    /// Set an attribute on an existing element.
    #[must_use]
    pub fn with_attribute(mut self, id: &str, name: &str, value: &str) -> Self {
        self.set_attribute(id, name, value);
        self
    }

    pub fn set_attribute(&mut self, id: &str, name: &str, value: &str) {
        if let Some(element) = self.elements.get_mut(&NodeRef::new(id)) {
            element.attributes.insert(name.to_owned(), value.to_owned());
        }
    }

    /// Change the box of an existing element.
    pub fn set_rect(&mut self, id: &str, rect: Rect) {
        if let Some(element) = self.elements.get_mut(&NodeRef::new(id)) {
            element.rect = rect;
        }
    }

    /// Remove an element from the document.
    pub fn detach(&mut self, id: &str) {
        self.elements.remove(&NodeRef::new(id));
    }

    /// Apply the `aria-selected` attributes found in rendered HTML.
    ///
    /// Simulates the DOM commit of a render pass: every tag carrying both an
    /// `id` and an `aria-selected` attribute updates the matching element.
    pub fn commit(&mut self, html: &str) {
        let mut remaining = html;
        while let Some(start) = remaining.find('<') {
            let Some(len) = remaining[start..].find('>') else {
                break;
            };
            let tag = &remaining[start..start + len];
            if let (Some(id), Some(selected)) =
                (attr_value(tag, "id"), attr_value(tag, "aria-selected"))
            {
                self.set_attribute(id, "aria-selected", selected);
            }
            remaining = &remaining[start + len..];
        }
    }

    /// Last value written to a style property.
    #[must_use]
    pub fn style(&self, id: &str, property: &str) -> Option<&str> {
        self.styles
            .get(&(NodeRef::new(id), property.to_owned()))
            .map(String::as_str)
    }

    /// Total number of style writes.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

/// Value of a double-quoted attribute inside an opening tag.
fn attr_value<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!(r#" {name}=""#);
    let start = tag.find(&needle)? + needle.len();
    let end = tag[start..].find('"')? + start;
    Some(&tag[start..end])
}

impl LayoutSurface for MockSurface {
    fn is_attached(&self, node: &NodeRef) -> bool {
        self.elements.contains_key(node)
    }

    fn bounding_rect(&self, node: &NodeRef) -> Option<Rect> {
        self.elements.get(node).map(|e| e.rect)
    }

    fn attribute(&self, node: &NodeRef, name: &str) -> Option<String> {
        self.elements.get(node)?.attributes.get(name).cloned()
    }

    fn parent(&self, node: &NodeRef) -> Option<NodeRef> {
        self.elements.get(node)?.parent.clone()
    }

    fn set_style(&mut self, node: &NodeRef, property: &str, value: &str) {
        self.writes += 1;
        self.styles
            .insert((node.clone(), property.to_owned()), value.to_owned());
    }
}
