#![forbid(unsafe_code)]

//! Host listener table.
//!
//! Mirrors `addEventListener` / `removeEventListener` bookkeeping so the
//! web panel only delivers an event when a live listener would have
//! received it in a browser.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use calpane_core::subscription::{ListenerId, ListenerKind, ListenerRegistry, ListenerTarget};

/// One registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerEntry {
    pub target: ListenerTarget,
    pub kind: ListenerKind,
}

/// Listener registrations keyed by id.
#[derive(Debug, Default)]
pub struct ListenerTable {
    next_id: Cell<u64>,
    entries: RefCell<BTreeMap<ListenerId, ListenerEntry>>,
}

impl ListenerTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Live listeners in registration order.
    #[must_use]
    pub fn entries(&self) -> Vec<ListenerEntry> {
        self.entries.borrow().values().copied().collect()
    }

    /// Whether a listener for `kind` is attached to `target`.
    #[must_use]
    pub fn is_listening(&self, target: ListenerTarget, kind: ListenerKind) -> bool {
        self.entries
            .borrow()
            .values()
            .any(|entry| entry.target == target && entry.kind == kind)
    }

    /// Element targets listening for `kind`.
    #[must_use]
    pub fn element_targets(&self, kind: ListenerKind) -> Vec<calpane_core::NodeId> {
        self.entries
            .borrow()
            .values()
            .filter(|entry| entry.kind == kind)
            .filter_map(|entry| match entry.target {
                ListenerTarget::Element(node) => Some(node),
                ListenerTarget::Window => None,
            })
            .collect()
    }
}

impl ListenerRegistry for ListenerTable {
    fn attach(&self, target: ListenerTarget, kind: ListenerKind) -> ListenerId {
        let id = self.next_id.get().saturating_add(1);
        self.next_id.set(id);
        let id = ListenerId(id);
        self.entries
            .borrow_mut()
            .insert(id, ListenerEntry { target, kind });
        id
    }

    fn detach(&self, id: ListenerId) {
        if self.entries.borrow_mut().remove(&id).is_none() {
            tracing::warn!(id = id.0, "detach of unknown listener");
        }
    }
}
