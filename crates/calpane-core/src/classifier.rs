#![forbid(unsafe_code)]

//! Session admission and one-shot direction classification.
//!
//! # State Machine
//!
//! ```text
//! IDLE --(admitted down)--> TRACKING(lock = none)
//! TRACKING --(first move past dead zone)--> LOCKED(horizontal | vertical-resize | vertical-scroll)
//! TRACKING --(touch, vertical, not a resize)--> TRACKING(yielded to native scroll)
//! TRACKING | LOCKED --(up)--> COMMIT --> IDLE
//! TRACKING | LOCKED --(cancel / second contact)--> IDLE   (nothing committed)
//! ```
//!
//! # Invariants
//!
//! 1. A session's lock direction is written at most once
//!    ([`GestureSession::try_lock`] refuses a second write).
//! 2. Once a session is locked or yielded, [`GestureClassifier::classify`]
//!    is never consulted again for it.
//! 3. Rejected pointer-downs never create a session.

use crate::config::GestureConfig;
use crate::geometry::{Delta, Point};
use crate::host::{ElementTraits, NodeId, PanelHandles, PanelHost};
use crate::pointer::{PointerEvent, PointerKind};

/// The single gesture category a session commits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockDirection {
    /// Month swipe.
    Horizontal,
    /// Panel resize.
    VerticalResize,
    /// Mouse-driven scroll emulation of the nested list.
    VerticalScroll,
}

impl LockDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::VerticalResize => "vertical-resize",
            Self::VerticalScroll => "vertical-scroll",
        }
    }
}

/// Why a pointer-down did not start a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionRejection {
    /// Another session is already live.
    SessionActive,
    /// A modal owns the document.
    ModalOpen,
    /// A decided month swipe is still sliding.
    AnimationInFlight,
    /// The panel is still settling after a resize.
    SettleInFlight,
    /// More than one contact is on the surface.
    MultiTouch,
    /// The target sits inside a button, link, form control or clickable region.
    InteractiveTarget,
    /// Year view owns taps inside the content region.
    YearViewContent,
    /// The event carried no usable contact point.
    NoContactPoint,
}

/// Engine state consulted by admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdmissionContext {
    pub session_active: bool,
    pub swipe_animating: bool,
    pub settling: bool,
    pub year_view: bool,
    pub handles: PanelHandles,
}

/// Ephemeral state of one pointer interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSession {
    pub start: Point,
    /// Rendered panel height when the session began.
    pub start_height: f64,
    /// Nested list scroll offset when the session began; `None` without a list.
    pub initial_scroll_top: Option<f64>,
    pub pointer: PointerKind,
    /// Whether the pointer went down over the panel element.
    pub started_on_panel: bool,
    /// Element the pointer went down on.
    pub origin: NodeId,
    lock: Option<LockDirection>,
    yielded_to_native: bool,
}

impl GestureSession {
    #[must_use]
    pub fn new(
        start: Point,
        start_height: f64,
        initial_scroll_top: Option<f64>,
        pointer: PointerKind,
        started_on_panel: bool,
        origin: NodeId,
    ) -> Self {
        Self {
            start,
            start_height,
            initial_scroll_top,
            pointer,
            started_on_panel,
            origin,
            lock: None,
            yielded_to_native: false,
        }
    }

    /// Lock direction, `None` while unclassified.
    #[inline]
    #[must_use]
    pub fn lock(&self) -> Option<LockDirection> {
        self.lock
    }

    /// Assign the lock direction. Returns `false` (and changes nothing) if
    /// the session was already locked or yielded.
    pub fn try_lock(&mut self, direction: LockDirection) -> bool {
        if self.is_classified() {
            return false;
        }
        self.lock = Some(direction);
        true
    }

    /// Hand the rest of the session to native touch scrolling.
    pub fn yield_to_native(&mut self) -> bool {
        if self.is_classified() {
            return false;
        }
        self.yielded_to_native = true;
        true
    }

    #[inline]
    #[must_use]
    pub fn is_yielded(&self) -> bool {
        self.yielded_to_native
    }

    /// Locked or yielded: classification is finished for this session.
    #[inline]
    #[must_use]
    pub fn is_classified(&self) -> bool {
        self.lock.is_some() || self.yielded_to_native
    }
}

/// Result of classifying one move of an unclassified session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Inside the dead zone, or diagonal without a dominant axis.
    Pending,
    Lock(LockDirection),
    /// Vertical touch drag that is not a resize; leave it to the browser.
    YieldToNative,
}

/// Admission rules and direction thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureClassifier {
    dead_zone: f64,
    horizontal_ratio: f64,
    scroll_top_tolerance: f64,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::from_config(&GestureConfig::default())
    }
}

impl GestureClassifier {
    #[must_use]
    pub fn from_config(config: &GestureConfig) -> Self {
        Self {
            dead_zone: config.dead_zone,
            horizontal_ratio: config.horizontal_ratio,
            scroll_top_tolerance: config.scroll_top_tolerance,
        }
    }

    /// Decide whether a pointer-down may start a session.
    ///
    /// Returns the start point on success.
    pub fn admit<H: PanelHost + ?Sized>(
        &self,
        host: &H,
        event: &PointerEvent,
        ctx: &AdmissionContext,
    ) -> Result<Point, AdmissionRejection> {
        if ctx.session_active {
            return Err(AdmissionRejection::SessionActive);
        }
        if host.modal_open() {
            return Err(AdmissionRejection::ModalOpen);
        }
        if ctx.settling {
            return Err(AdmissionRejection::SettleInFlight);
        }
        if ctx.swipe_animating {
            return Err(AdmissionRejection::AnimationInFlight);
        }
        if event.touch_count() > 1 {
            return Err(AdmissionRejection::MultiTouch);
        }
        if is_interactive_target(host, event.target) {
            return Err(AdmissionRejection::InteractiveTarget);
        }
        if ctx.year_view
            && let Some(content) = ctx.handles.content
            && host.contains(content, event.target)
        {
            return Err(AdmissionRejection::YearViewContent);
        }
        event
            .active_position()
            .ok_or(AdmissionRejection::NoContactPoint)
    }

    /// Classify the displacement of an unclassified session.
    #[must_use]
    pub fn classify(&self, session: &GestureSession, delta: Delta) -> Classification {
        let abs_x = delta.dx.abs();
        let abs_y = delta.dy.abs();

        if abs_x.max(abs_y) <= self.dead_zone {
            return Classification::Pending;
        }

        if abs_x > abs_y * self.horizontal_ratio {
            return Classification::Lock(LockDirection::Horizontal);
        }

        if abs_y > abs_x {
            let list_at_top = session
                .initial_scroll_top
                .is_some_and(|top| top <= self.scroll_top_tolerance);
            let pulling_down = delta.dy > 0.0;
            if session.started_on_panel || (list_at_top && pulling_down) {
                return Classification::Lock(LockDirection::VerticalResize);
            }
            return match session.pointer {
                PointerKind::Mouse => Classification::Lock(LockDirection::VerticalScroll),
                PointerKind::Touch => Classification::YieldToNative,
            };
        }

        Classification::Pending
    }
}

/// Inside an interactive element, unless a calendar cell or event card
/// sits between the target and that element's ancestry.
fn is_interactive_target<H: PanelHost + ?Sized>(host: &H, target: NodeId) -> bool {
    host.closest(target, ElementTraits::INTERACTIVE).is_some()
        && host.closest(target, ElementTraits::TAPPABLE).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(pointer: PointerKind, on_panel: bool, scroll_top: f64) -> GestureSession {
        GestureSession::new(
            Point::new(100.0, 100.0),
            280.0,
            Some(scroll_top),
            pointer,
            on_panel,
            NodeId(1),
        )
    }

    fn classify(s: &GestureSession, dx: f64, dy: f64) -> Classification {
        GestureClassifier::default().classify(s, Delta::new(dx, dy))
    }

    #[test]
    fn dead_zone_is_exclusive() {
        let s = session(PointerKind::Touch, true, 0.0);
        assert_eq!(classify(&s, 10.0, 0.0), Classification::Pending);
        assert_eq!(classify(&s, 0.0, -10.0), Classification::Pending);
        assert_eq!(
            classify(&s, 10.5, 0.0),
            Classification::Lock(LockDirection::Horizontal)
        );
    }

    #[test]
    fn horizontal_needs_ratio() {
        let s = session(PointerKind::Touch, false, 50.0);
        assert_eq!(
            classify(&s, -140.0, 5.0),
            Classification::Lock(LockDirection::Horizontal)
        );
        // 15 is not > 10 * 1.5, and dy does not dominate either.
        assert_eq!(classify(&s, 15.0, 10.0), Classification::Pending);
        assert_eq!(classify(&s, 12.0, 12.0), Classification::Pending);
    }

    #[test]
    fn vertical_on_panel_resizes() {
        let s = session(PointerKind::Touch, true, 300.0);
        assert_eq!(
            classify(&s, 0.0, -40.0),
            Classification::Lock(LockDirection::VerticalResize)
        );
    }

    #[test]
    fn pull_down_at_list_top_resizes() {
        let s = session(PointerKind::Touch, false, 2.0);
        assert_eq!(
            classify(&s, 0.0, 30.0),
            Classification::Lock(LockDirection::VerticalResize)
        );
        // Pushing up at the top is a normal scroll.
        assert_eq!(classify(&s, 0.0, -30.0), Classification::YieldToNative);
    }

    #[test]
    fn pull_down_without_list_does_not_resize() {
        let mut touch = session(PointerKind::Touch, false, 0.0);
        touch.initial_scroll_top = None;
        assert_eq!(classify(&touch, 0.0, 40.0), Classification::YieldToNative);

        let mut mouse = session(PointerKind::Mouse, false, 0.0);
        mouse.initial_scroll_top = None;
        assert_eq!(
            classify(&mouse, 0.0, 40.0),
            Classification::Lock(LockDirection::VerticalScroll)
        );

        // The panel itself still resizes.
        let mut on_panel = session(PointerKind::Touch, true, 0.0);
        on_panel.initial_scroll_top = None;
        assert_eq!(
            classify(&on_panel, 0.0, 40.0),
            Classification::Lock(LockDirection::VerticalResize)
        );
    }

    #[test]
    fn scrolled_list_scrolls() {
        let touch = session(PointerKind::Touch, false, 2.5);
        assert_eq!(classify(&touch, 0.0, 30.0), Classification::YieldToNative);
        let mouse = session(PointerKind::Mouse, false, 2.5);
        assert_eq!(
            classify(&mouse, 0.0, 30.0),
            Classification::Lock(LockDirection::VerticalScroll)
        );
    }

    #[test]
    fn lock_is_write_once() {
        let mut s = session(PointerKind::Mouse, false, 0.0);
        assert!(s.try_lock(LockDirection::Horizontal));
        assert!(!s.try_lock(LockDirection::VerticalResize));
        assert!(!s.yield_to_native());
        assert_eq!(s.lock(), Some(LockDirection::Horizontal));
    }

    #[test]
    fn yield_blocks_later_lock() {
        let mut s = session(PointerKind::Touch, false, 100.0);
        assert!(s.yield_to_native());
        assert!(!s.try_lock(LockDirection::Horizontal));
        assert_eq!(s.lock(), None);
        assert!(s.is_classified());
    }

    #[test]
    fn lock_names() {
        assert_eq!(LockDirection::VerticalResize.as_str(), "vertical-resize");
    }
}
