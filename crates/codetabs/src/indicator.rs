//! Selection indicator positioning.
//!
//! After each paint the indicator is moved under the selected tab button.
//! Layout is only observable through a [`LayoutSurface`], the measurement
//! side channel to whatever hosts the rendered output.
//!
//! The selected button is found by reading each button's `aria-selected`
//! attribute from the surface, not from the selection state, so the
//! indicator follows what the DOM actually shows.

use std::fmt;

use crate::geometry::Rect;
use crate::style::BlockStyle;
use crate::util::px;

/// Reference to a rendered element (its DOM id).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef(String);

impl NodeRef {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle to one rendered tab button.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonHandle {
    pub value: String,
    pub node: NodeRef,
}

/// Button handles collected during one render pass.
///
/// The collection is rebuilt from scratch on every render; handles from a
/// previous pass never survive into the next.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ButtonHandles {
    handles: Vec<ButtonHandle>,
}

impl ButtonHandles {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new render pass.
    pub fn clear(&mut self) {
        self.handles.clear();
    }

    /// Record the handle of a rendered button.
    pub fn push(&mut self, value: impl Into<String>, node: NodeRef) {
        self.handles.push(ButtonHandle {
            value: value.into(),
            node,
        });
    }

    /// Handle of the first button rendered for `value`.
    #[must_use]
    pub fn get(&self, value: &str) -> Option<&NodeRef> {
        self.handles
            .iter()
            .find(|h| h.value == value)
            .map(|h| &h.node)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ButtonHandle> {
        self.handles.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Access to live layout of rendered elements.
pub trait LayoutSurface {
    /// Whether `node` is currently attached to the document.
    fn is_attached(&self, node: &NodeRef) -> bool;

    /// Bounding box of `node` in viewport coordinates.
    fn bounding_rect(&self, node: &NodeRef) -> Option<Rect>;

    /// Attribute value of `node`.
    fn attribute(&self, node: &NodeRef, name: &str) -> Option<String>;

    /// Parent element of `node`.
    fn parent(&self, node: &NodeRef) -> Option<NodeRef>;

    /// Write an inline style property (`left`, `width`, `height`).
    fn set_style(&mut self, node: &NodeRef, property: &str, value: &str);
}

/// Offset and size written to the indicator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndicatorPlacement {
    pub left: f64,
    pub width: f64,
    /// Only set when the style measures the indicator height.
    pub height: Option<f64>,
}

/// Positions the indicator of one widget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndicatorPositioner {
    indicator: NodeRef,
    container: NodeRef,
    block_style: BlockStyle,
}

impl IndicatorPositioner {
    #[must_use]
    pub fn new(indicator: NodeRef, container: NodeRef, block_style: BlockStyle) -> Self {
        Self {
            indicator,
            container,
            block_style,
        }
    }

    #[must_use]
    pub fn indicator(&self) -> &NodeRef {
        &self.indicator
    }

    #[must_use]
    pub fn container(&self) -> &NodeRef {
        &self.container
    }

    /// Measure the selected button and move the indicator under it.
    ///
    /// Returns `None`, writing nothing, when the indicator or container is
    /// not attached, when no button is marked selected, or when a box
    /// cannot be measured.
    pub fn position(
        &self,
        handles: &ButtonHandles,
        surface: &mut dyn LayoutSurface,
    ) -> Option<IndicatorPlacement> {
        if !surface.is_attached(&self.indicator) || !surface.is_attached(&self.container) {
            tracing::trace!(indicator = %self.indicator, "Indicator not attached, skipping");
            return None;
        }

        let selected = handles
            .iter()
            .find(|h| surface.attribute(&h.node, "aria-selected").as_deref() == Some("true"))?;

        // Measure the list item wrapping the button when there is one.
        let target = surface
            .parent(&selected.node)
            .unwrap_or_else(|| selected.node.clone());
        let container = surface.bounding_rect(&self.container)?;
        let button = surface.bounding_rect(&target)?.relative_to(&container);

        let placement = IndicatorPlacement {
            left: button.left,
            width: button.width,
            height: self
                .block_style
                .measures_indicator_height()
                .then_some(button.height),
        };

        surface.set_style(&self.indicator, "left", &px(placement.left));
        surface.set_style(&self.indicator, "width", &px(placement.width));
        if let Some(height) = placement.height {
            surface.set_style(&self.indicator, "height", &px(height));
        }

        tracing::trace!(
            indicator = %self.indicator,
            value = %selected.value,
            left = placement.left,
            width = placement.width,
            "Indicator positioned"
        );
        Some(placement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSurface;

    fn strip() -> MockSurface {
        MockSurface::new()
            .with_element("strip", Rect::new(100.0, 40.0, 600.0, 48.0))
            .with_element("indicator", Rect::new(100.0, 87.0, 0.0, 1.0))
            .with_element("item-npm", Rect::new(112.0, 48.0, 52.0, 32.0))
            .with_child("tab-npm", "item-npm", Rect::new(116.0, 52.0, 44.0, 24.0))
            .with_element("item-yarn", Rect::new(176.0, 48.0, 60.0, 32.0))
            .with_child("tab-yarn", "item-yarn", Rect::new(180.0, 52.0, 52.0, 24.0))
    }

    fn handles() -> ButtonHandles {
        let mut handles = ButtonHandles::new();
        handles.push("npm", NodeRef::new("tab-npm"));
        handles.push("yarn", NodeRef::new("tab-yarn"));
        handles
    }

    fn positioner(style: BlockStyle) -> IndicatorPositioner {
        IndicatorPositioner::new(NodeRef::new("indicator"), NodeRef::new("strip"), style)
    }

    #[test]
    fn test_positions_under_selected_item() {
        let mut surface = strip().with_attribute("tab-yarn", "aria-selected", "true");

        let placement = positioner(BlockStyle::Loud)
            .position(&handles(), &mut surface)
            .unwrap();

        assert_eq!(placement.left, 76.0);
        assert_eq!(placement.width, 60.0);
        assert_eq!(surface.style("indicator", "left"), Some("76px"));
        assert_eq!(surface.style("indicator", "width"), Some("60px"));
    }

    #[test]
    fn test_loud_never_writes_height() {
        let mut surface = strip().with_attribute("tab-npm", "aria-selected", "true");

        let placement = positioner(BlockStyle::Loud)
            .position(&handles(), &mut surface)
            .unwrap();

        assert_eq!(placement.height, None);
        assert_eq!(surface.style("indicator", "height"), None);
    }

    #[test]
    fn test_subtle_writes_height() {
        let mut surface = strip().with_attribute("tab-npm", "aria-selected", "true");

        let placement = positioner(BlockStyle::Subtle)
            .position(&handles(), &mut surface)
            .unwrap();

        assert_eq!(placement.height, Some(32.0));
        assert_eq!(surface.style("indicator", "height"), Some("32px"));
    }

    #[test]
    fn test_measures_button_without_parent() {
        let mut surface = MockSurface::new()
            .with_element("strip", Rect::new(0.0, 0.0, 300.0, 40.0))
            .with_element("indicator", Rect::default())
            .with_element("tab-npm", Rect::new(8.5, 4.0, 40.0, 30.0))
            .with_attribute("tab-npm", "aria-selected", "true");
        let mut handles = ButtonHandles::new();
        handles.push("npm", NodeRef::new("tab-npm"));

        let placement = positioner(BlockStyle::Loud)
            .position(&handles, &mut surface)
            .unwrap();

        assert_eq!(placement.left, 8.5);
        assert_eq!(placement.width, 40.0);
    }

    #[test]
    fn test_skips_when_indicator_detached() {
        let mut surface = strip().with_attribute("tab-npm", "aria-selected", "true");
        surface.detach("indicator");

        assert_eq!(
            positioner(BlockStyle::Subtle).position(&handles(), &mut surface),
            None
        );
        assert_eq!(surface.write_count(), 0);
    }

    #[test]
    fn test_skips_when_container_detached() {
        let mut surface = strip().with_attribute("tab-npm", "aria-selected", "true");
        surface.detach("strip");

        assert_eq!(
            positioner(BlockStyle::Loud).position(&handles(), &mut surface),
            None
        );
        assert_eq!(surface.write_count(), 0);
    }

    #[test]
    fn test_skips_when_no_button_selected() {
        let mut surface = strip().with_attribute("tab-npm", "aria-selected", "false");

        assert_eq!(
            positioner(BlockStyle::Loud).position(&handles(), &mut surface),
            None
        );
        assert_eq!(surface.write_count(), 0);
    }

    #[test]
    fn test_skips_with_no_handles() {
        let mut surface = strip();
        assert_eq!(
            positioner(BlockStyle::Loud).position(&ButtonHandles::new(), &mut surface),
            None
        );
    }

    #[test]
    fn test_follows_dom_attribute_not_handle_order() {
        let mut surface = strip()
            .with_attribute("tab-npm", "aria-selected", "false")
            .with_attribute("tab-yarn", "aria-selected", "true");

        let placement = positioner(BlockStyle::Loud)
            .position(&handles(), &mut surface)
            .unwrap();
        assert_eq!(placement.left, 76.0);

        // Layout shifts (e.g. a web font loads); the next paint re-measures.
        surface.set_rect("item-yarn", Rect::new(190.0, 48.0, 70.0, 32.0));
        let placement = positioner(BlockStyle::Loud)
            .position(&handles(), &mut surface)
            .unwrap();
        assert_eq!(placement.left, 90.0);
        assert_eq!(surface.style("indicator", "width"), Some("70px"));
    }

    #[test]
    fn test_handles_rebuilt_per_pass() {
        let mut handles = handles();
        assert_eq!(handles.len(), 2);
        handles.clear();
        assert!(handles.is_empty());
        handles.push("pnpm", NodeRef::new("tab-pnpm"));
        assert_eq!(handles.get("pnpm"), Some(&NodeRef::new("tab-pnpm")));
        assert_eq!(handles.get("npm"), None);
    }
}
