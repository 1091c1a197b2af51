#![forbid(unsafe_code)]

//! Unified touch/mouse pointer events.
//!
//! Hosts deliver either touch or mouse input. [`PointerEvent`] carries both
//! behind a single tagged source so the rest of the engine only ever asks
//! for a position:
//!
//! - [`PointerEvent::active_position`] for down/move (first *active* touch),
//! - [`PointerEvent::release_position`] for up (first *changed* touch, i.e.
//!   the contact that was just lifted).
//!
//! Both return `None` when a touch event carries no usable contact point,
//! which happens when the last finger lifts mid-gesture.

use crate::geometry::Point;
use crate::host::NodeId;

/// Lifecycle phase of a raw pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    /// `touchstart` / `mousedown`.
    Down,
    /// `touchmove` / `mousemove`.
    Move,
    /// `touchend` / `mouseup`.
    Up,
    /// `touchcancel`.
    Cancel,
}

/// Input device family of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Touch,
    Mouse,
}

/// One contact point of a touch event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchContact {
    pub identifier: i64,
    pub client: Point,
}

impl TouchContact {
    #[must_use]
    pub const fn new(identifier: i64, x: f64, y: f64) -> Self {
        Self {
            identifier,
            client: Point::new(x, y),
        }
    }
}

/// Device-specific payload of a pointer event.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerSource {
    /// Touch input: every contact still on the surface, plus the contacts
    /// that changed in this event.
    Touch {
        touches: Vec<TouchContact>,
        changed_touches: Vec<TouchContact>,
    },
    /// Mouse input carries its own coordinates.
    Mouse { position: Point },
}

/// A raw pointer event as delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    /// Innermost element the event was dispatched to.
    pub target: NodeId,
    /// Whether the host may still call `preventDefault` on this event.
    pub cancelable: bool,
    pub source: PointerSource,
}

impl PointerEvent {
    /// Build a mouse event.
    #[must_use]
    pub fn mouse(phase: PointerPhase, target: NodeId, x: f64, y: f64) -> Self {
        Self {
            phase,
            target,
            cancelable: true,
            source: PointerSource::Mouse {
                position: Point::new(x, y),
            },
        }
    }

    /// Build a touch event from its active and changed contact lists.
    #[must_use]
    pub fn touch(
        phase: PointerPhase,
        target: NodeId,
        touches: Vec<TouchContact>,
        changed_touches: Vec<TouchContact>,
    ) -> Self {
        Self {
            phase,
            target,
            cancelable: true,
            source: PointerSource::Touch {
                touches,
                changed_touches,
            },
        }
    }

    /// Mark this event as non-cancelable (e.g. a passive scroll-driven move).
    #[must_use]
    pub fn non_cancelable(mut self) -> Self {
        self.cancelable = false;
        self
    }

    /// Device family of this event.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> PointerKind {
        match self.source {
            PointerSource::Touch { .. } => PointerKind::Touch,
            PointerSource::Mouse { .. } => PointerKind::Mouse,
        }
    }

    /// Number of contacts currently on the surface (always 1 for mouse).
    #[must_use]
    pub fn touch_count(&self) -> usize {
        match &self.source {
            PointerSource::Touch { touches, .. } => touches.len(),
            PointerSource::Mouse { .. } => 1,
        }
    }

    /// Primary contact point for down/move events.
    #[must_use]
    pub fn active_position(&self) -> Option<Point> {
        match &self.source {
            PointerSource::Touch { touches, .. } => touches.first().map(|t| t.client),
            PointerSource::Mouse { position } => Some(*position),
        }
    }

    /// Primary contact point for up events: the contact that was released.
    #[must_use]
    pub fn release_position(&self) -> Option<Point> {
        match &self.source {
            PointerSource::Touch {
                changed_touches, ..
            } => changed_touches.first().map(|t| t.client),
            PointerSource::Mouse { position } => Some(*position),
        }
    }
}
