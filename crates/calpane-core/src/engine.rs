#![forbid(unsafe_code)]

//! The panel gesture engine.
//!
//! [`PanelEngine`] ties the components together: it admits pointer-downs,
//! classifies the first qualifying move, routes the rest of the session to
//! the [`HeightController`] or the [`SwipeAnimator`], and on release commits
//! a height, decides a swipe, or forwards a tap as a click.
//!
//! The engine is single-threaded and host-clocked. The host calls the
//! `pointer_*` methods from its DOM listeners and [`PanelEngine::tick`] once
//! per animation frame; every timestamp is a monotonic [`Duration`] from the
//! host's clock.
//!
//! Every pointer and lifecycle call returns a [`GestureDispatch`]: the
//! side effects the host should apply (`preventDefault`, `touch-action`)
//! plus a [`DispatchLog`] entry describing what happened. Ignored input is
//! reported through the log, never as an error.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::classifier::{
    AdmissionContext, AdmissionRejection, Classification, GestureClassifier, GestureSession,
    LockDirection,
};
use crate::click::{ForwardedClick, forward_click};
use crate::config::GestureConfig;
use crate::geometry::Delta;
use crate::height::{self, HeightController, PanelHeights, PanelMode, ReleasePolicy};
use crate::host::{ElementTraits, NodeId, PanelHandles, PanelHost};
use crate::pointer::{PointerEvent, PointerKind, PointerPhase};
use crate::subscription::{ListenerKind, ListenerRegistry, ListenerTarget, SubscriptionSet};
use crate::swipe::{SwipeAnimator, SwipeDirection, SwipeRelease};

/// Month navigation callback.
pub type SwipeCallback = Box<dyn FnMut(SwipeDirection)>;

/// Entry point that produced a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPhase {
    Mount,
    Teardown,
    PointerDown,
    PointerMove,
    PointerUp,
    PointerCancel,
}

impl DispatchPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mount => "mount",
            Self::Teardown => "teardown",
            Self::PointerDown => "pointer_down",
            Self::PointerMove => "pointer_move",
            Self::PointerUp => "pointer_up",
            Self::PointerCancel => "pointer_cancel",
        }
    }
}

/// Why a live session ended without committing anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// `touchcancel`.
    Cancelled,
    /// A second contact appeared.
    MultiTouch,
    /// The terminating event carried no contact point.
    NoContactPoint,
    /// The engine was torn down.
    Teardown,
}

/// Why an input was dropped without touching engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    Rejected(AdmissionRejection),
    NoActiveSession,
    /// Touch input during a mouse session, or vice versa.
    DeviceMismatch,
    NoContactPoint,
    AlreadyMounted,
    MissingContainer,
    NotMounted,
}

/// What one dispatch did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DispatchOutcome {
    Mounted { listeners: usize },
    TornDown { cancelled_commit: Option<SwipeDirection> },
    SessionStarted { pointer: PointerKind },
    /// Session still unclassified (inside the dead zone or diagonal).
    Tracking,
    /// This move assigned the session's lock.
    Locked(LockDirection),
    /// Move routed by an existing lock.
    Routed(LockDirection),
    /// Session handed to native touch scrolling.
    YieldedToNative,
    HeightCommitted {
        from: PanelMode,
        to: PanelMode,
        policy: ReleasePolicy,
    },
    SwipeDecided(SwipeDirection),
    SwipeSnappedBack,
    ClickForwarded(NodeId),
    /// Session released with nothing to commit.
    SessionEnded,
    Aborted(AbortReason),
    Ignored(IgnoredReason),
}

impl DispatchOutcome {
    /// Short stable label for logs and recordings.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Mounted { .. } => "mounted",
            Self::TornDown { .. } => "torn_down",
            Self::SessionStarted { .. } => "session_started",
            Self::Tracking => "tracking",
            Self::Locked(_) => "locked",
            Self::Routed(_) => "routed",
            Self::YieldedToNative => "yielded_to_native",
            Self::HeightCommitted { .. } => "height_committed",
            Self::SwipeDecided(_) => "swipe_decided",
            Self::SwipeSnappedBack => "swipe_snapped_back",
            Self::ClickForwarded(_) => "click_forwarded",
            Self::SessionEnded => "session_ended",
            Self::Aborted(_) => "aborted",
            Self::Ignored(_) => "ignored",
        }
    }
}

/// Structured log record for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchLog {
    pub phase: DispatchPhase,
    /// Monotonic sequence number; `None` for ignored input.
    pub sequence: Option<u64>,
    pub outcome: DispatchOutcome,
}

/// CSS `touch-action` advice for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TouchActionHint {
    /// Set `touch-action: pan-y` on these elements.
    PanY(Vec<NodeId>),
}

/// Result of one engine call.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureDispatch {
    /// The host should call `preventDefault()` on the raw event.
    pub prevent_default: bool,
    pub touch_action: Option<TouchActionHint>,
    pub click: Option<ForwardedClick>,
    pub log: DispatchLog,
}

impl GestureDispatch {
    fn ignored(phase: DispatchPhase, reason: IgnoredReason) -> Self {
        Self {
            prevent_default: false,
            touch_action: None,
            click: None,
            log: DispatchLog {
                phase,
                sequence: None,
                outcome: DispatchOutcome::Ignored(reason),
            },
        }
    }

    /// Whether the input was dropped.
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(self.log.outcome, DispatchOutcome::Ignored(_))
    }
}

/// What one [`PanelEngine::tick`] published.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameReport {
    /// Live panel height published this frame.
    pub live_height: Option<f64>,
    /// Horizontal offset published this frame.
    pub drag_offset: Option<f64>,
    /// Month navigation committed this frame.
    pub navigated: Option<SwipeDirection>,
    /// A resize settle window closed this frame.
    pub settled: bool,
}

impl FrameReport {
    /// Whether anything changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live_height.is_none()
            && self.drag_offset.is_none()
            && self.navigated.is_none()
            && !self.settled
    }
}

/// Pointer-gesture engine for one calendar panel.
pub struct PanelEngine {
    config: GestureConfig,
    classifier: GestureClassifier,
    handles: PanelHandles,
    year_view: bool,
    height: HeightController,
    swipe: SwipeAnimator,
    session: Option<GestureSession>,
    on_swipe: Option<SwipeCallback>,
    registry: Option<Rc<dyn ListenerRegistry>>,
    container_listeners: SubscriptionSet,
    window_listeners: SubscriptionSet,
    settling: bool,
    next_sequence: u64,
}

impl fmt::Debug for PanelEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelEngine")
            .field("handles", &self.handles)
            .field("mode", &self.height.mode())
            .field("dragging", &self.height.is_dragging())
            .field("drag_offset", &self.swipe.drag_offset())
            .field("animating", &self.swipe.is_animating())
            .field("session", &self.session)
            .field("mounted", &self.is_mounted())
            .finish_non_exhaustive()
    }
}

impl PanelEngine {
    /// Build an engine in `config.default_mode`.
    #[must_use]
    pub fn new(config: GestureConfig, handles: PanelHandles) -> Self {
        Self {
            classifier: GestureClassifier::from_config(&config),
            height: HeightController::new(config.default_mode),
            year_view: config.year_view,
            config,
            handles,
            swipe: SwipeAnimator::new(),
            session: None,
            on_swipe: None,
            registry: None,
            container_listeners: SubscriptionSet::new(),
            window_listeners: SubscriptionSet::new(),
            settling: false,
            next_sequence: 1,
        }
    }

    /// Install the month navigation callback.
    #[must_use]
    pub fn with_swipe_callback(mut self, callback: impl FnMut(SwipeDirection) + 'static) -> Self {
        self.on_swipe = Some(Box::new(callback));
        self
    }

    /// Replace the month navigation callback.
    pub fn set_swipe_callback(&mut self, callback: impl FnMut(SwipeDirection) + 'static) {
        self.on_swipe = Some(Box::new(callback));
    }

    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    #[must_use]
    pub fn handles(&self) -> PanelHandles {
        self.handles
    }

    pub fn set_year_view(&mut self, year_view: bool) {
        self.year_view = year_view;
    }

    #[must_use]
    pub fn is_year_view(&self) -> bool {
        self.year_view
    }

    // --- exposed state ---

    #[must_use]
    pub fn calendar_mode(&self) -> PanelMode {
        self.height.mode()
    }

    pub fn set_calendar_mode(&mut self, mode: PanelMode) {
        self.height.set_mode(mode);
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.height.is_dragging()
    }

    /// Live panel height; meaningful only while [`is_dragging`](Self::is_dragging).
    #[must_use]
    pub fn live_calendar_height(&self) -> f64 {
        self.height.live_height()
    }

    #[must_use]
    pub fn drag_offset(&self) -> f64 {
        self.swipe.drag_offset()
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.swipe.is_animating()
    }

    /// External animating setter; clearing it abandons a pending month commit.
    pub fn set_animating(&mut self, animating: bool) {
        self.swipe.set_animating(animating);
    }

    /// Live session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        !self.container_listeners.is_empty()
    }

    /// Whether window listeners for a mouse session are attached.
    #[must_use]
    pub fn has_window_listeners(&self) -> bool {
        !self.window_listeners.is_empty()
    }

    /// Whether a decided swipe is waiting for its commit window.
    #[must_use]
    pub fn commit_pending(&self) -> bool {
        self.swipe.commit_pending()
    }

    /// Fullscreen height for the host's current viewport.
    #[must_use]
    pub fn fullscreen_height<H: PanelHost + ?Sized>(&self, host: &H) -> f64 {
        fullscreen_for(&self.config, host)
    }

    /// Canonical height of the current mode.
    #[must_use]
    pub fn target_height<H: PanelHost + ?Sized>(&self, host: &H) -> f64 {
        self.heights(host).of(self.height.mode())
    }

    /// Height the host should render right now.
    #[must_use]
    pub fn rendered_height<H: PanelHost + ?Sized>(&self, host: &H) -> f64 {
        self.height.rendered_height(&self.heights(host))
    }

    fn heights<H: PanelHost + ?Sized>(&self, host: &H) -> PanelHeights {
        PanelHeights::new(self.config.expanded_height, fullscreen_for(&self.config, host))
    }

    // --- lifecycle ---

    /// Attach the container listeners.
    ///
    /// A missing container handle makes this a no-op.
    pub fn mount(&mut self, registry: Rc<dyn ListenerRegistry>) -> GestureDispatch {
        if self.is_mounted() {
            tracing::warn!("panel engine mounted twice; keeping existing listeners");
            return GestureDispatch::ignored(DispatchPhase::Mount, IgnoredReason::AlreadyMounted);
        }
        let Some(container) = self.handles.container else {
            tracing::debug!("no container handle; gesture listeners not attached");
            return GestureDispatch::ignored(DispatchPhase::Mount, IgnoredReason::MissingContainer);
        };

        self.container_listeners = SubscriptionSet::attach_all(
            &registry,
            ListenerTarget::Element(container),
            &ListenerKind::CONTAINER,
        );
        self.registry = Some(registry);
        let listeners = self.container_listeners.len();
        tracing::debug!(container = container.0, listeners, "panel engine mounted");
        self.accepted(
            DispatchPhase::Mount,
            DispatchOutcome::Mounted { listeners },
            false,
        )
    }

    /// Release every listener and cancel all pending work.
    ///
    /// A decided swipe that has not committed yet is cancelled: its callback
    /// never runs and the offset returns to 0.
    pub fn teardown(&mut self) -> GestureDispatch {
        if !self.is_mounted() && self.session.is_none() && !self.swipe.commit_pending() {
            return GestureDispatch::ignored(DispatchPhase::Teardown, IgnoredReason::NotMounted);
        }
        if self.session.is_some() {
            self.abort_session(AbortReason::Teardown);
        }
        let cancelled_commit = self.release_resources();
        tracing::debug!(?cancelled_commit, "panel engine torn down");
        self.accepted(
            DispatchPhase::Teardown,
            DispatchOutcome::TornDown { cancelled_commit },
            false,
        )
    }

    fn release_resources(&mut self) -> Option<SwipeDirection> {
        self.window_listeners.clear();
        self.container_listeners.clear();
        self.registry = None;
        self.height.abort();
        self.height.clear_settle();
        self.settling = false;
        self.swipe.abort();
        self.swipe.cancel_commit()
    }

    // --- pointer input ---

    /// Route a raw event by its phase.
    pub fn handle<H: PanelHost + ?Sized>(
        &mut self,
        host: &mut H,
        event: &PointerEvent,
        now: Duration,
    ) -> GestureDispatch {
        match event.phase {
            PointerPhase::Down => self.pointer_down(host, event, now),
            PointerPhase::Move => self.pointer_move(host, event),
            PointerPhase::Up => self.pointer_up(host, event, now),
            PointerPhase::Cancel => self.pointer_cancel(),
        }
    }

    /// `touchstart` / `mousedown` on the container.
    pub fn pointer_down<H: PanelHost + ?Sized>(
        &mut self,
        host: &H,
        event: &PointerEvent,
        now: Duration,
    ) -> GestureDispatch {
        if self.session.is_some()
            && event.kind() == PointerKind::Touch
            && event.touch_count() > 1
        {
            return self.abort_dispatch(DispatchPhase::PointerDown, AbortReason::MultiTouch);
        }

        let ctx = AdmissionContext {
            session_active: self.session.is_some(),
            swipe_animating: self.swipe.is_animating(),
            settling: self.height.is_settling(now),
            year_view: self.year_view,
            handles: self.handles,
        };
        let start = match self.classifier.admit(host, event, &ctx) {
            Ok(start) => start,
            Err(rejection) => {
                tracing::debug!(?rejection, target = event.target.0, "pointer down rejected");
                return GestureDispatch::ignored(
                    DispatchPhase::PointerDown,
                    IgnoredReason::Rejected(rejection),
                );
            }
        };

        let initial_scroll_top = self.handles.list.map(|list| host.scroll_top(list));
        let start_height = self
            .handles
            .content
            .and_then(|content| host.rendered_height(content))
            .unwrap_or_else(|| self.target_height(host));
        let started_on_panel = self
            .handles
            .panel
            .is_some_and(|panel| host.contains(panel, event.target));
        let pointer = event.kind();

        self.session = Some(GestureSession::new(
            start,
            start_height,
            initial_scroll_top,
            pointer,
            started_on_panel,
            event.target,
        ));

        if pointer == PointerKind::Mouse
            && let Some(registry) = self.registry.as_ref()
        {
            self.window_listeners = SubscriptionSet::attach_all(
                registry,
                ListenerTarget::Window,
                &ListenerKind::MOUSE_SESSION,
            );
        }

        tracing::debug!(
            ?pointer,
            x = start.x,
            y = start.y,
            start_height,
            ?initial_scroll_top,
            started_on_panel,
            "gesture session started"
        );

        let mut dispatch = self.accepted(
            DispatchPhase::PointerDown,
            DispatchOutcome::SessionStarted { pointer },
            false,
        );
        dispatch.touch_action = self.touch_action_hint();
        dispatch
    }

    /// `touchmove` on the container or `mousemove` on the window.
    pub fn pointer_move<H: PanelHost + ?Sized>(
        &mut self,
        host: &mut H,
        event: &PointerEvent,
    ) -> GestureDispatch {
        let phase = DispatchPhase::PointerMove;
        let Some(session) = self.session.as_mut() else {
            return GestureDispatch::ignored(phase, IgnoredReason::NoActiveSession);
        };
        if event.kind() != session.pointer {
            return GestureDispatch::ignored(phase, IgnoredReason::DeviceMismatch);
        }
        if event.touch_count() > 1 {
            return self.abort_dispatch(phase, AbortReason::MultiTouch);
        }
        let Some(position) = event.active_position() else {
            return GestureDispatch::ignored(phase, IgnoredReason::NoContactPoint);
        };
        let delta = position.delta_from(session.start);

        if session.is_yielded() {
            return self.accepted(phase, DispatchOutcome::YieldedToNative, false);
        }

        let mut newly_locked = false;
        if session.lock().is_none() {
            match self.classifier.classify(session, delta) {
                Classification::Pending => {
                    return self.accepted(phase, DispatchOutcome::Tracking, false);
                }
                Classification::YieldToNative => {
                    session.yield_to_native();
                    tracing::debug!(dy = delta.dy, "vertical touch drag left to native scroll");
                    return self.accepted(phase, DispatchOutcome::YieldedToNative, false);
                }
                Classification::Lock(direction) => {
                    if session.try_lock(direction) {
                        newly_locked = true;
                        tracing::debug!(
                            lock = direction.as_str(),
                            dx = delta.dx,
                            dy = delta.dy,
                            "gesture session locked"
                        );
                        match direction {
                            LockDirection::Horizontal => self.swipe.begin(),
                            LockDirection::VerticalResize => {
                                self.height.begin(session.start_height);
                            }
                            LockDirection::VerticalScroll => {}
                        }
                    }
                }
            }
        }

        let Some(lock) = session.lock() else {
            return self.accepted(phase, DispatchOutcome::Tracking, false);
        };
        let initial_scroll_top = session.initial_scroll_top;
        let suppress = self.route_move(host, event, lock, delta, initial_scroll_top);
        let prevent = event.cancelable && suppress;

        let outcome = if newly_locked {
            DispatchOutcome::Locked(lock)
        } else {
            DispatchOutcome::Routed(lock)
        };
        self.accepted(phase, outcome, prevent)
    }

    /// Apply one move to the locked component. Returns whether the move
    /// should suppress the browser default.
    fn route_move<H: PanelHost + ?Sized>(
        &mut self,
        host: &mut H,
        event: &PointerEvent,
        lock: LockDirection,
        delta: Delta,
        initial_scroll_top: Option<f64>,
    ) -> bool {
        match lock {
            LockDirection::Horizontal => {
                self.swipe.drag(delta.dx);
                tracing::trace!(dx = delta.dx, "drag offset scheduled");
                host.closest(event.target, ElementTraits::RANGE_INPUT)
                    .is_none()
            }
            LockDirection::VerticalResize => {
                let fullscreen = fullscreen_for(&self.config, host);
                let height = self.height.drag(delta.dy, fullscreen);
                tracing::trace!(dy = delta.dy, height, "live height scheduled");
                true
            }
            LockDirection::VerticalScroll => {
                if let Some(list) = self.handles.list
                    && let Some(initial) = initial_scroll_top
                {
                    let scroll_top = (initial - delta.dy).max(0.0);
                    host.set_scroll_top(list, scroll_top);
                    tracing::trace!(scroll_top, "list scroll emulated");
                }
                true
            }
        }
    }

    /// `touchend` on the container or `mouseup` on the window.
    pub fn pointer_up<H: PanelHost + ?Sized>(
        &mut self,
        host: &mut H,
        event: &PointerEvent,
        now: Duration,
    ) -> GestureDispatch {
        let phase = DispatchPhase::PointerUp;
        let Some(session) = self.session.as_ref() else {
            return GestureDispatch::ignored(phase, IgnoredReason::NoActiveSession);
        };
        if event.kind() != session.pointer {
            return GestureDispatch::ignored(phase, IgnoredReason::DeviceMismatch);
        }
        let Some(position) = event.release_position() else {
            return self.abort_dispatch(phase, AbortReason::NoContactPoint);
        };
        let Some(session) = self.session.take() else {
            return GestureDispatch::ignored(phase, IgnoredReason::NoActiveSession);
        };
        self.window_listeners.clear();
        let delta = position.delta_from(session.start);

        match session.lock() {
            Some(LockDirection::Horizontal) => {
                let width = self
                    .handles
                    .container
                    .and_then(|container| host.rendered_width(container))
                    .filter(|width| *width > 0.0)
                    .unwrap_or_else(|| host.viewport().width);
                let release = self.swipe.release(
                    delta.dx,
                    width,
                    self.config.min_swipe_distance,
                    now,
                    self.config.commit_window(),
                );
                match release {
                    SwipeRelease::Decided {
                        direction,
                        exit_offset,
                        deadline,
                        ..
                    } => {
                        tracing::info!(
                            direction = direction.as_str(),
                            dx = delta.dx,
                            exit_offset,
                            deadline_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
                            "month swipe decided"
                        );
                        self.accepted(phase, DispatchOutcome::SwipeDecided(direction), false)
                    }
                    SwipeRelease::SnappedBack => {
                        tracing::debug!(dx = delta.dx, "month swipe too short; snapped back");
                        self.accepted(phase, DispatchOutcome::SwipeSnappedBack, false)
                    }
                }
            }
            Some(LockDirection::VerticalResize) => {
                let heights = self.heights(host);
                let release = self.height.release(
                    delta.dy,
                    &heights,
                    self.config.flick_threshold,
                    now,
                    self.config.settle_duration(),
                );
                self.settling = true;
                tracing::info!(
                    from = release.from.as_str(),
                    to = release.to.as_str(),
                    policy = ?release.policy,
                    released_height = release.released_height,
                    dy = delta.dy,
                    "panel mode committed"
                );
                self.accepted(
                    phase,
                    DispatchOutcome::HeightCommitted {
                        from: release.from,
                        to: release.to,
                        policy: release.policy,
                    },
                    false,
                )
            }
            Some(LockDirection::VerticalScroll) => {
                self.accepted(phase, DispatchOutcome::SessionEnded, false)
            }
            None if session.is_yielded() => {
                self.accepted(phase, DispatchOutcome::SessionEnded, false)
            }
            None => {
                if delta.length() >= self.config.tap_slop {
                    return self.accepted(phase, DispatchOutcome::SessionEnded, false);
                }
                match forward_click(host, event.target) {
                    Some(click) => {
                        tracing::debug!(node = click.node.0, marker = ?click.marker, "tap forwarded as click");
                        let mut dispatch = self.accepted(
                            phase,
                            DispatchOutcome::ClickForwarded(click.node),
                            event.cancelable,
                        );
                        dispatch.click = Some(click);
                        dispatch
                    }
                    None => self.accepted(phase, DispatchOutcome::SessionEnded, false),
                }
            }
        }
    }

    /// `touchcancel`: end the session without committing anything.
    pub fn pointer_cancel(&mut self) -> GestureDispatch {
        if self.session.is_none() {
            return GestureDispatch::ignored(
                DispatchPhase::PointerCancel,
                IgnoredReason::NoActiveSession,
            );
        }
        self.abort_dispatch(DispatchPhase::PointerCancel, AbortReason::Cancelled)
    }

    // --- frame clock ---

    /// Publish coalesced updates and fire due timers. Call once per frame.
    pub fn tick(&mut self, now: Duration) -> FrameReport {
        let mut report = FrameReport {
            live_height: self.height.flush_frame(),
            drag_offset: self.swipe.flush_frame(),
            ..FrameReport::default()
        };

        if let Some(direction) = self.swipe.poll(now) {
            tracing::info!(direction = direction.as_str(), "month navigation committed");
            if let Some(callback) = self.on_swipe.as_mut() {
                callback(direction);
            }
            self.swipe.finish_commit();
            report.navigated = Some(direction);
        }

        if self.settling && !self.height.is_settling(now) {
            self.height.expire_settle(now);
            self.settling = false;
            report.settled = true;
        }

        report
    }

    // --- internals ---

    fn abort_dispatch(&mut self, phase: DispatchPhase, reason: AbortReason) -> GestureDispatch {
        self.abort_session(reason);
        self.accepted(phase, DispatchOutcome::Aborted(reason), false)
    }

    fn abort_session(&mut self, reason: AbortReason) {
        let Some(session) = self.session.take() else {
            return;
        };
        self.window_listeners.clear();
        match session.lock() {
            Some(LockDirection::Horizontal) => self.swipe.abort(),
            Some(LockDirection::VerticalResize) => self.height.abort(),
            Some(LockDirection::VerticalScroll) | None => {}
        }
        tracing::debug!(?reason, lock = ?session.lock(), "gesture session aborted");
    }

    fn touch_action_hint(&self) -> Option<TouchActionHint> {
        let nodes: Vec<NodeId> = [self.handles.panel, self.handles.content]
            .into_iter()
            .flatten()
            .collect();
        if !nodes.is_empty() {
            return Some(TouchActionHint::PanY(nodes));
        }
        self.handles
            .container
            .map(|container| TouchActionHint::PanY(vec![container]))
    }

    fn accepted(
        &mut self,
        phase: DispatchPhase,
        outcome: DispatchOutcome,
        prevent_default: bool,
    ) -> GestureDispatch {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.saturating_add(1);
        GestureDispatch {
            prevent_default,
            touch_action: None,
            click: None,
            log: DispatchLog {
                phase,
                sequence: Some(sequence),
                outcome,
            },
        }
    }
}

impl Drop for PanelEngine {
    fn drop(&mut self) {
        self.session = None;
        self.release_resources();
    }
}

fn fullscreen_for<H: PanelHost + ?Sized>(config: &GestureConfig, host: &H) -> f64 {
    let nav = host
        .sibling_nav_height()
        .unwrap_or(config.fallback_nav_height);
    height::fullscreen_height(host.viewport().height, config.header_height, nav)
}
