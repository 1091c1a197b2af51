#![forbid(unsafe_code)]

//! Host-driven calendar panel.
//!
//! [`WebPanel`] owns a [`DomTree`], a [`ListenerTable`], a
//! [`DeterministicClock`] and the [`PanelEngine`]. The host pushes raw
//! pointer events and advances time; the panel delivers each event only if
//! a live listener would have received it (container listeners for events
//! inside the container, window listeners for anything), exactly as the
//! browser would.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use calpane_core::engine::DispatchOutcome;
use calpane_core::subscription::{ListenerKind, ListenerRegistry, ListenerTarget};
use calpane_core::{
    FrameReport, GestureConfig, GestureDispatch, PanelEngine, PanelHandles, PanelHost,
    PointerEvent, PointerKind, PointerPhase, SwipeDirection,
};

use crate::DeterministicClock;
use crate::dom::DomTree;
use crate::listeners::ListenerTable;

/// A calendar panel wired to a deterministic document.
pub struct WebPanel {
    dom: DomTree,
    listeners: Rc<ListenerTable>,
    clock: DeterministicClock,
    engine: PanelEngine,
    navigations: Rc<RefCell<Vec<SwipeDirection>>>,
}

impl std::fmt::Debug for WebPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebPanel")
            .field("now", &self.clock.now())
            .field("listeners", &self.listeners.len())
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl WebPanel {
    /// Build and mount a panel over `dom`.
    ///
    /// Month navigations are collected and available from
    /// [`navigations`](Self::navigations).
    #[must_use]
    pub fn new(config: GestureConfig, dom: DomTree, handles: PanelHandles) -> Self {
        let navigations = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&navigations);
        let engine = PanelEngine::new(config, handles)
            .with_swipe_callback(move |direction| sink.borrow_mut().push(direction));
        let mut panel = Self {
            dom,
            listeners: Rc::new(ListenerTable::new()),
            clock: DeterministicClock::new(),
            engine,
            navigations,
        };
        panel.mount();
        panel
    }

    /// Build from a JSON-encoded [`GestureConfig`].
    pub fn from_json_config(
        json: &str,
        dom: DomTree,
        handles: PanelHandles,
    ) -> Result<Self, calpane_core::ConfigError> {
        let config = GestureConfig::from_json_str(json)?;
        Ok(Self::new(config, dom, handles))
    }

    /// Attach the engine's container listeners.
    pub fn mount(&mut self) -> GestureDispatch {
        let registry: Rc<dyn ListenerRegistry> = self.listeners.clone();
        self.engine.mount(registry)
    }

    /// Detach everything and cancel pending work.
    pub fn teardown(&mut self) -> GestureDispatch {
        self.engine.teardown()
    }

    #[must_use]
    pub fn dom(&self) -> &DomTree {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut DomTree {
        &mut self.dom
    }

    #[must_use]
    pub fn engine(&self) -> &PanelEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut PanelEngine {
        &mut self.engine
    }

    #[must_use]
    pub fn listeners(&self) -> &ListenerTable {
        &self.listeners
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Month navigations fired so far.
    #[must_use]
    pub fn navigations(&self) -> Vec<SwipeDirection> {
        self.navigations.borrow().clone()
    }

    /// Height the host should render right now.
    #[must_use]
    pub fn rendered_height(&self) -> f64 {
        self.engine.rendered_height(&self.dom)
    }

    /// Deliver a raw pointer event at the current host time.
    ///
    /// Returns `None` when no live listener would receive the event.
    pub fn dispatch(&mut self, event: &PointerEvent) -> Option<GestureDispatch> {
        let kind = listener_kind(event)?;
        if !self.is_delivered(event, kind) {
            tracing::trace!(event = kind.event_name(), target = event.target.0, "no listener; event dropped");
            return None;
        }
        let dispatch = self.engine.handle(&mut self.dom, event, self.clock.now());
        if let DispatchOutcome::Ignored(reason) = dispatch.log.outcome {
            tracing::trace!(event = kind.event_name(), ?reason, "event ignored");
        }
        Some(dispatch)
    }

    /// Advance the host clock by `dt` and run one frame.
    pub fn advance(&mut self, dt: Duration) -> FrameReport {
        self.clock.advance(dt);
        self.engine.tick(self.clock.now())
    }

    fn is_delivered(&self, event: &PointerEvent, kind: ListenerKind) -> bool {
        if self.listeners.is_listening(ListenerTarget::Window, kind) {
            return true;
        }
        self.listeners
            .element_targets(kind)
            .into_iter()
            .any(|element| self.dom.contains(element, event.target))
    }
}

fn listener_kind(event: &PointerEvent) -> Option<ListenerKind> {
    Some(match (event.kind(), event.phase) {
        (PointerKind::Touch, PointerPhase::Down) => ListenerKind::TouchStart,
        (PointerKind::Touch, PointerPhase::Move) => ListenerKind::TouchMove,
        (PointerKind::Touch, PointerPhase::Up) => ListenerKind::TouchEnd,
        (PointerKind::Touch, PointerPhase::Cancel) => ListenerKind::TouchCancel,
        (PointerKind::Mouse, PointerPhase::Down) => ListenerKind::MouseDown,
        (PointerKind::Mouse, PointerPhase::Move) => ListenerKind::MouseMove,
        (PointerKind::Mouse, PointerPhase::Up) => ListenerKind::MouseUp,
        (PointerKind::Mouse, PointerPhase::Cancel) => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;
    use calpane_core::Viewport;

    fn panel() -> (WebPanel, calpane_core::NodeId, calpane_core::NodeId) {
        let mut dom = DomTree::new(Viewport::new(390.0, 844.0));
        let root = dom.root();
        let container = dom.append(root, Element::new("div"));
        let inside = dom.append(container, Element::new("div"));
        let outside = dom.append(root, Element::new("div"));
        let handles = PanelHandles {
            container: Some(container),
            ..PanelHandles::default()
        };
        (
            WebPanel::new(GestureConfig::default(), dom, handles),
            inside,
            outside,
        )
    }

    #[test]
    fn container_listeners_scope_delivery() {
        let (mut panel, inside, outside) = panel();
        assert_eq!(panel.listeners().len(), 5);
        let down = PointerEvent::mouse(PointerPhase::Down, outside, 0.0, 0.0);
        assert!(panel.dispatch(&down).is_none());
        // No window listener yet: a stray mousemove goes nowhere.
        let stray = PointerEvent::mouse(PointerPhase::Move, outside, 5.0, 0.0);
        assert!(panel.dispatch(&stray).is_none());

        let down = PointerEvent::mouse(PointerPhase::Down, inside, 0.0, 0.0);
        assert!(panel.dispatch(&down).is_some());
        assert_eq!(panel.listeners().len(), 7);
        // Mouse moves outside the container now reach the window listener.
        let mv = PointerEvent::mouse(PointerPhase::Move, outside, 80.0, 0.0);
        assert!(panel.dispatch(&mv).is_some());
        let up = PointerEvent::mouse(PointerPhase::Up, outside, 80.0, 0.0);
        assert!(panel.dispatch(&up).is_some());
        assert_eq!(panel.listeners().len(), 5);
    }

    #[test]
    fn teardown_detaches_all() {
        let (mut panel, _, _) = panel();
        panel.teardown();
        assert!(panel.listeners().is_empty());
    }
}
