#![forbid(unsafe_code)]

//! RAII listener subscriptions.
//!
//! The engine asks the host to attach DOM listeners through a
//! [`ListenerRegistry`]. Each attachment comes back as a [`Subscription`]
//! that detaches itself when dropped, so ending a mouse session or tearing
//! down the engine releases every listener it owns without bookkeeping at
//! the call sites.
//!
//! All listeners are registered non-passive: the engine may advise
//! `preventDefault` on any of them.

use std::fmt;
use std::rc::Rc;

use crate::host::NodeId;

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    /// The panel container element.
    Element(NodeId),
    /// The global window; used for mouse drags that leave the container.
    Window,
}

/// Raw event a listener receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    TouchStart,
    TouchMove,
    TouchEnd,
    TouchCancel,
    MouseDown,
    MouseMove,
    MouseUp,
}

impl ListenerKind {
    /// Listeners attached to the container for the engine's lifetime.
    pub const CONTAINER: [Self; 5] = [
        Self::TouchStart,
        Self::TouchMove,
        Self::TouchEnd,
        Self::TouchCancel,
        Self::MouseDown,
    ];

    /// Listeners attached to the window for one mouse session.
    pub const MOUSE_SESSION: [Self; 2] = [Self::MouseMove, Self::MouseUp];

    /// DOM event name.
    #[must_use]
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::TouchStart => "touchstart",
            Self::TouchMove => "touchmove",
            Self::TouchEnd => "touchend",
            Self::TouchCancel => "touchcancel",
            Self::MouseDown => "mousedown",
            Self::MouseMove => "mousemove",
            Self::MouseUp => "mouseup",
        }
    }
}

/// Host-assigned listener identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Host side of listener management.
///
/// Methods take `&self`; implementations use interior mutability so that
/// subscriptions can detach from `Drop`.
pub trait ListenerRegistry {
    fn attach(&self, target: ListenerTarget, kind: ListenerKind) -> ListenerId;
    fn detach(&self, id: ListenerId);
}

/// An attached listener; detaches on drop.
pub struct Subscription {
    id: ListenerId,
    target: ListenerTarget,
    kind: ListenerKind,
    registry: Rc<dyn ListenerRegistry>,
}

impl Subscription {
    /// Attach a listener and wrap it.
    #[must_use]
    pub fn attach(
        registry: &Rc<dyn ListenerRegistry>,
        target: ListenerTarget,
        kind: ListenerKind,
    ) -> Self {
        let id = registry.attach(target, kind);
        tracing::trace!(id = id.0, event = kind.event_name(), ?target, "listener attached");
        Self {
            id,
            target,
            kind,
            registry: Rc::clone(registry),
        }
    }

    #[must_use]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    #[must_use]
    pub fn target(&self) -> ListenerTarget {
        self.target
    }

    #[must_use]
    pub fn kind(&self) -> ListenerKind {
        self.kind
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("target", &self.target)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.detach(self.id);
        tracing::trace!(id = self.id.0, event = self.kind.event_name(), "listener detached");
    }
}

/// A group of subscriptions released together.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach one listener per kind on `target`.
    #[must_use]
    pub fn attach_all(
        registry: &Rc<dyn ListenerRegistry>,
        target: ListenerTarget,
        kinds: &[ListenerKind],
    ) -> Self {
        Self {
            subscriptions: kinds
                .iter()
                .map(|&kind| Subscription::attach(registry, target, kind))
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Detach everything now.
    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subscription> {
        self.subscriptions.iter()
    }
}
