//! Group-keyed tab selection.
//!
//! Selection is shared state: every widget instance tagged with the same
//! group reads and writes the same selected value. Widgets never write it
//! directly, only through [`SelectionCoordinator::change_selection`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use codetabs::{SelectionCoordinator, SharedSelection};
//!
//! let selection = Arc::new(SharedSelection::new());
//! let events = selection.subscribe("pkg-manager");
//!
//! selection.change_selection("pkg-manager", "pnpm");
//!
//! assert_eq!(selection.selected_value("pkg-manager").as_deref(), Some("pnpm"));
//! assert_eq!(events.try_recv().unwrap().value, "pnpm");
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, mpsc};

use crate::normalize::TabRecord;

/// Group used when a widget does not name one.
///
/// Widgets left on this key share their selection with each other.
pub const DEFAULT_GROUP: &str = "client";

/// Notification that a group's selected value changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionEvent {
    pub group: String,
    pub value: String,
}

/// Receiver for [`SelectionEvent`]s of one group.
pub struct SelectionEventReceiver {
    rx: mpsc::Receiver<SelectionEvent>,
}

impl SelectionEventReceiver {
    pub(crate) fn new(rx: mpsc::Receiver<SelectionEvent>) -> Self {
        Self { rx }
    }

    /// Receiver for coordinators without change notification.
    #[must_use]
    pub fn no_op() -> Self {
        let (_tx, rx) = mpsc::channel();
        Self { rx }
    }

    /// Try to receive an event without blocking.
    #[must_use]
    pub fn try_recv(&self) -> Option<SelectionEvent> {
        self.rx.try_recv().ok()
    }

    /// Drain all pending events without blocking.
    pub fn pending(&self) -> impl Iterator<Item = SelectionEvent> + '_ {
        self.rx.try_iter()
    }
}

/// Owner of the shared, group-keyed selection state.
pub trait SelectionCoordinator: Send + Sync {
    /// Currently selected value for `group`, `None` until something is selected.
    fn selected_value(&self, group: &str) -> Option<String>;

    /// Select `value` in `group`, for every widget sharing the group.
    fn change_selection(&self, group: &str, value: &str);

    /// Subscribe to selection changes in `group`.
    ///
    /// The default implementation never yields events.
    fn subscribe(&self, _group: &str) -> SelectionEventReceiver {
        SelectionEventReceiver::no_op()
    }
}

/// In-memory [`SelectionCoordinator`] shared through an `Arc`.
#[derive(Debug, Default)]
pub struct SharedSelection {
    values: RwLock<HashMap<String, String>>,
    subscribers: RwLock<Vec<(String, mpsc::Sender<SelectionEvent>)>>,
}

impl SharedSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of groups that have a selection.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn notify(&self, event: &SelectionEvent) {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        // Dropped receivers are pruned here.
        subscribers.retain(|(group, tx)| group != &event.group || tx.send(event.clone()).is_ok());
    }
}

impl SelectionCoordinator for SharedSelection {
    fn selected_value(&self, group: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(group)
            .cloned()
    }

    fn change_selection(&self, group: &str, value: &str) {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        if values.get(group).is_some_and(|current| current == value) {
            return;
        }
        values.insert(group.to_owned(), value.to_owned());

        tracing::debug!(group, value, "Tab selection changed");
        // Notified under the values lock: events arrive in write order, so
        // the last event always matches the stored value.
        self.notify(&SelectionEvent {
            group: group.to_owned(),
            value: value.to_owned(),
        });
    }

    fn subscribe(&self, group: &str) -> SelectionEventReceiver {
        let (tx, rx) = mpsc::channel();
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((group.to_owned(), tx));
        SelectionEventReceiver::new(rx)
    }
}

/// One widget's view of its group's selection.
///
/// Resolving the selection is read-only; only [`change`](Self::change)
/// writes, and it goes through the coordinator.
pub struct TabSelection<'a> {
    coordinator: &'a dyn SelectionCoordinator,
    group: &'a str,
    tabs: &'a [TabRecord],
    selected_value: Option<String>,
}

/// Read the selection for `tabs` in `group`.
pub fn get_selection<'a>(
    coordinator: &'a dyn SelectionCoordinator,
    tabs: &'a [TabRecord],
    group: &'a str,
) -> TabSelection<'a> {
    TabSelection {
        coordinator,
        group,
        tabs,
        selected_value: coordinator.selected_value(group),
    }
}

impl<'a> TabSelection<'a> {
    /// The selected record, matched by value (first match wins).
    ///
    /// `None` when nothing is selected yet or when the group's value names a
    /// tab this widget does not have.
    #[must_use]
    pub fn selected(&self) -> Option<&'a TabRecord> {
        let value = self.selected_value.as_deref()?;
        self.tabs.iter().find(|tab| tab.value() == value)
    }

    /// The group's raw selected value, even if no local tab matches.
    #[must_use]
    pub fn selected_value(&self) -> Option<&str> {
        self.selected_value.as_deref()
    }

    /// Whether the group has a value that matches no local tab.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.selected_value.is_some() && self.selected().is_none()
    }

    /// The record to render: the selected one, else the first tab.
    #[must_use]
    pub fn effective(&self) -> Option<(usize, &'a TabRecord)> {
        if let Some(value) = self.selected_value.as_deref()
            && let Some(found) = self.tabs.iter().position(|tab| tab.value() == value)
        {
            return Some((found, &self.tabs[found]));
        }
        self.tabs.first().map(|tab| (0, tab))
    }

    /// Select `tab` for the whole group.
    pub fn change(&self, tab: &TabRecord) {
        self.coordinator.change_selection(self.group, tab.value());
    }

    #[must_use]
    pub fn group(&self) -> &'a str {
        self.group
    }
}
