#![forbid(unsafe_code)]

//! Host document abstraction.
//!
//! The engine never touches a real DOM. Everything it needs to know about
//! elements (ancestry, interactive-ness, tap markers, scroll offsets, sizes)
//! and the two side effects it may perform (synthetic click, scroll write)
//! go through [`PanelHost`]. A browser binding implements it over `web-sys`;
//! `calpane-web` implements it over a deterministic arena for tests and
//! replay.

use bitflags::bitflags;

use crate::geometry::Viewport;

/// Opaque handle to a host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

bitflags! {
    /// Classification bits the engine reads from an element.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ElementTraits: u8 {
        /// `button`, `a`, `input`, `select`, `[role=button]` or `.clickable`.
        const INTERACTIVE   = 0b0000_0001;
        /// `input[type=range]`; horizontal drags over it keep native behaviour.
        const RANGE_INPUT   = 0b0000_0010;
        /// A calendar day cell (`.calendar-cell-base` / `.calendar-cell-fullscreen`).
        const CALENDAR_CELL = 0b0000_0100;
        /// A fullscreen event card (`.calendar-fullscreen-event-card`).
        const EVENT_CARD    = 0b0000_1000;
    }
}

impl ElementTraits {
    /// Cells and cards stay gesture-capable even inside `role=button` wrappers.
    pub const TAPPABLE: Self = Self::CALENDAR_CELL.union(Self::EVENT_CARD);
}

/// Identity marker that makes an element a synthetic-click destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TapMarker {
    /// `data-calendar-date="2025-06-01"`.
    CalendarDate(String),
    /// `data-event-id="..."`.
    EventCard(String),
}

/// Element handles the engine is configured with.
///
/// Any handle may be missing; the engine degrades to a no-op for the
/// features that need it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelHandles {
    /// Element the container listeners are attached to.
    pub container: Option<NodeId>,
    /// The calendar panel itself.
    pub panel: Option<NodeId>,
    /// Inner content region whose rendered height is the live panel height.
    pub content: Option<NodeId>,
    /// Nested scrollable event list.
    pub list: Option<NodeId>,
}

/// Read/write access to the host document.
pub trait PanelHost {
    /// Parent element, `None` at the root.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Classification bits of this element alone (not its ancestors).
    fn traits(&self, node: NodeId) -> ElementTraits;

    /// Tap marker carried by this element alone.
    fn tap_marker(&self, node: NodeId) -> Option<TapMarker>;

    /// Run the element's own click handling.
    fn click(&mut self, node: NodeId);

    /// Current vertical scroll offset of a scrollable element.
    fn scroll_top(&self, node: NodeId) -> f64;

    /// Write the vertical scroll offset of a scrollable element.
    fn set_scroll_top(&mut self, node: NodeId, value: f64);

    /// Rendered (bounding box) height, `None` if the element is not laid out.
    fn rendered_height(&self, node: NodeId) -> Option<f64>;

    /// Rendered (offset) width, `None` if the element is not laid out.
    fn rendered_width(&self, node: NodeId) -> Option<f64>;

    /// Current visual viewport.
    fn viewport(&self) -> Viewport;

    /// Measured height of the sibling bottom navigation, if present.
    fn sibling_nav_height(&self) -> Option<f64>;

    /// Whether a modal currently owns the document.
    fn modal_open(&self) -> bool {
        false
    }

    /// Inclusive containment: `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Nearest element at or above `node` carrying any of `wanted`.
    fn closest(&self, node: NodeId, wanted: ElementTraits) -> Option<NodeId> {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if self.traits(current).intersects(wanted) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }
}
