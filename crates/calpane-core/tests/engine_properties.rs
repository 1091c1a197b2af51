//! Property tests for the session state machine.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use calpane_core::engine::{AbortReason, DispatchOutcome, IgnoredReason};
use calpane_core::height::ReleasePolicy;
use calpane_core::{
    AdmissionRejection, ElementTraits, GestureConfig, LockDirection, NodeId, PanelEngine,
    PanelHandles, PanelHost, PanelMode, PointerEvent, PointerPhase, SwipeDirection, TapMarker,
    TouchContact, Viewport,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const ROOT: NodeId = NodeId(0);
const CONTAINER: NodeId = NodeId(1);
const PANEL: NodeId = NodeId(2);
const CONTENT: NodeId = NodeId(3);
const CELL: NodeId = NodeId(4);
const LIST: NodeId = NodeId(5);
const ROW: NodeId = NodeId(6);
const BUTTON: NodeId = NodeId(7);
const CELL_IN_BUTTON: NodeId = NodeId(8);

const VIEWPORT: Viewport = Viewport::new(390.0, 844.0);
const NAV: f64 = 64.0;
const HEADER: f64 = 56.0;
const FULLSCREEN: f64 = 844.0 - 56.0 - 64.0;

/// Fixed page:
/// root > container > panel > content > cell
///                  > list > row
///                  > button > cell_in_button
struct Page {
    scroll: f64,
    modal: bool,
    clicks: Vec<NodeId>,
}

impl Page {
    fn new() -> Self {
        Self {
            scroll: 0.0,
            modal: false,
            clicks: Vec::new(),
        }
    }
}

impl PanelHost for Page {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        Some(match node {
            CONTAINER => ROOT,
            PANEL | LIST | BUTTON => CONTAINER,
            CONTENT => PANEL,
            CELL => CONTENT,
            ROW => LIST,
            CELL_IN_BUTTON => BUTTON,
            _ => return None,
        })
    }

    fn traits(&self, node: NodeId) -> ElementTraits {
        match node {
            BUTTON => ElementTraits::INTERACTIVE,
            CELL | CELL_IN_BUTTON => ElementTraits::CALENDAR_CELL,
            _ => ElementTraits::empty(),
        }
    }

    fn tap_marker(&self, node: NodeId) -> Option<TapMarker> {
        match node {
            CELL => Some(TapMarker::CalendarDate("2025-06-01".into())),
            CELL_IN_BUTTON => Some(TapMarker::CalendarDate("2025-06-02".into())),
            _ => None,
        }
    }

    fn click(&mut self, node: NodeId) {
        self.clicks.push(node);
    }

    fn scroll_top(&self, _node: NodeId) -> f64 {
        self.scroll
    }

    fn set_scroll_top(&mut self, _node: NodeId, value: f64) {
        self.scroll = value;
    }

    fn rendered_height(&self, _node: NodeId) -> Option<f64> {
        None
    }

    fn rendered_width(&self, _node: NodeId) -> Option<f64> {
        None
    }

    fn viewport(&self) -> Viewport {
        VIEWPORT
    }

    fn sibling_nav_height(&self) -> Option<f64> {
        Some(NAV)
    }

    fn modal_open(&self) -> bool {
        self.modal
    }
}

fn engine(mode: PanelMode) -> (PanelEngine, Rc<RefCell<Vec<SwipeDirection>>>) {
    let fired = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&fired);
    let config = GestureConfig {
        header_height: HEADER,
        default_mode: mode,
        ..GestureConfig::default()
    };
    let handles = PanelHandles {
        container: Some(CONTAINER),
        panel: Some(PANEL),
        content: Some(CONTENT),
        list: Some(LIST),
    };
    let engine = PanelEngine::new(config, handles)
        .with_swipe_callback(move |direction| sink.borrow_mut().push(direction));
    (engine, fired)
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn touch(phase: PointerPhase, target: NodeId, x: f64, y: f64) -> PointerEvent {
    let contact = vec![TouchContact::new(0, x, y)];
    match phase {
        PointerPhase::Up | PointerPhase::Cancel => {
            PointerEvent::touch(phase, target, Vec::new(), contact)
        }
        _ => PointerEvent::touch(phase, target, contact.clone(), contact),
    }
}

#[test]
fn modal_blocks_admission() {
    let mut page = Page::new();
    page.modal = true;
    let (mut e, _) = engine(PanelMode::Expanded);
    let d = e.pointer_down(&page, &touch(PointerPhase::Down, CELL, 10.0, 10.0), ms(0));
    assert_eq!(
        d.log.outcome,
        DispatchOutcome::Ignored(IgnoredReason::Rejected(AdmissionRejection::ModalOpen))
    );
    assert!(e.session().is_none());
}

#[test]
fn interactive_target_rejected_but_cells_inside_buttons_admitted() {
    let mut page = Page::new();
    let (mut e, _) = engine(PanelMode::Expanded);
    let d = e.pointer_down(&page, &touch(PointerPhase::Down, BUTTON, 10.0, 10.0), ms(0));
    assert_eq!(
        d.log.outcome,
        DispatchOutcome::Ignored(IgnoredReason::Rejected(
            AdmissionRejection::InteractiveTarget
        ))
    );
    let d = e.pointer_down(
        &page,
        &touch(PointerPhase::Down, CELL_IN_BUTTON, 10.0, 10.0),
        ms(0),
    );
    assert!(!d.is_ignored());
    let up = e.pointer_up(&mut page, &touch(PointerPhase::Up, CELL_IN_BUTTON, 10.0, 10.0), ms(5));
    assert_eq!(up.log.outcome, DispatchOutcome::ClickForwarded(CELL_IN_BUTTON));
    assert_eq!(page.clicks, vec![CELL_IN_BUTTON]);
}

#[test]
fn year_view_content_rejected() {
    let page = Page::new();
    let (mut e, _) = engine(PanelMode::Expanded);
    e.set_year_view(true);
    let d = e.pointer_down(&page, &touch(PointerPhase::Down, CELL, 10.0, 10.0), ms(0));
    assert_eq!(
        d.log.outcome,
        DispatchOutcome::Ignored(IgnoredReason::Rejected(AdmissionRejection::YearViewContent))
    );
    // Outside the content region still works.
    let d = e.pointer_down(&page, &touch(PointerPhase::Down, ROW, 10.0, 10.0), ms(0));
    assert!(!d.is_ignored());
}

#[test]
fn settle_window_rejects_new_sessions() {
    let mut page = Page::new();
    let (mut e, _) = engine(PanelMode::Collapsed);
    e.pointer_down(&page, &touch(PointerPhase::Down, CELL, 100.0, 100.0), ms(0));
    e.pointer_move(&mut page, &touch(PointerPhase::Move, CELL, 100.0, 200.0));
    e.pointer_up(&mut page, &touch(PointerPhase::Up, CELL, 100.0, 200.0), ms(100));
    assert_eq!(e.calendar_mode(), PanelMode::Expanded);

    let d = e.pointer_down(&page, &touch(PointerPhase::Down, CELL, 100.0, 100.0), ms(399));
    assert_eq!(
        d.log.outcome,
        DispatchOutcome::Ignored(IgnoredReason::Rejected(AdmissionRejection::SettleInFlight))
    );
    assert!(e.tick(ms(400)).settled);
    let d = e.pointer_down(&page, &touch(PointerPhase::Down, CELL, 100.0, 100.0), ms(400));
    assert!(!d.is_ignored());
}

#[test]
fn cancel_mid_resize_commits_nothing() {
    let mut page = Page::new();
    let (mut e, _) = engine(PanelMode::Expanded);
    e.pointer_down(&page, &touch(PointerPhase::Down, CELL, 100.0, 100.0), ms(0));
    e.pointer_move(&mut page, &touch(PointerPhase::Move, CELL, 100.0, 300.0));
    e.tick(ms(16));
    assert!(e.is_dragging());
    assert_eq!(e.live_calendar_height(), 480.0);

    let d = e.pointer_cancel();
    assert_eq!(d.log.outcome, DispatchOutcome::Aborted(AbortReason::Cancelled));
    assert!(!e.is_dragging());
    assert_eq!(e.calendar_mode(), PanelMode::Expanded);
    assert_eq!(e.tick(ms(32)).live_height, None);
}

#[test]
fn second_contact_aborts_swipe() {
    let mut page = Page::new();
    let (mut e, fired) = engine(PanelMode::Expanded);
    e.pointer_down(&page, &touch(PointerPhase::Down, CELL, 200.0, 50.0), ms(0));
    e.pointer_move(&mut page, &touch(PointerPhase::Move, CELL, 120.0, 50.0));
    e.tick(ms(16));
    assert_eq!(e.drag_offset(), -80.0);

    let two = PointerEvent::touch(
        PointerPhase::Move,
        CELL,
        vec![TouchContact::new(0, 100.0, 50.0), TouchContact::new(1, 300.0, 300.0)],
        vec![TouchContact::new(1, 300.0, 300.0)],
    );
    let d = e.pointer_move(&mut page, &two);
    assert_eq!(d.log.outcome, DispatchOutcome::Aborted(AbortReason::MultiTouch));
    assert_eq!(e.drag_offset(), 0.0);
    assert!(!e.is_animating());
    e.tick(ms(1000));
    assert!(fired.borrow().is_empty());
}

#[test]
fn teardown_cancels_pending_commit() {
    let mut page = Page::new();
    let (mut e, fired) = engine(PanelMode::Expanded);
    e.pointer_down(&page, &touch(PointerPhase::Down, CELL, 200.0, 50.0), ms(0));
    e.pointer_move(&mut page, &touch(PointerPhase::Move, CELL, 60.0, 55.0));
    e.pointer_up(&mut page, &touch(PointerPhase::Up, CELL, 60.0, 55.0), ms(100));
    assert!(e.commit_pending());

    let d = e.teardown();
    assert_eq!(
        d.log.outcome,
        DispatchOutcome::TornDown {
            cancelled_commit: Some(SwipeDirection::Next)
        }
    );
    assert_eq!(e.drag_offset(), 0.0);
    assert!(!e.is_animating());
    e.tick(ms(1000));
    assert!(fired.borrow().is_empty());
}

#[test]
fn swipe_in_flight_rejects_new_sessions() {
    let mut page = Page::new();
    let (mut e, fired) = engine(PanelMode::Expanded);
    e.pointer_down(&page, &touch(PointerPhase::Down, CELL, 200.0, 50.0), ms(0));
    e.pointer_move(&mut page, &touch(PointerPhase::Move, CELL, 60.0, 55.0));
    let up = e.pointer_up(&mut page, &touch(PointerPhase::Up, CELL, 60.0, 55.0), ms(10));
    assert_eq!(up.log.outcome, DispatchOutcome::SwipeDecided(SwipeDirection::Next));

    let d = e.pointer_down(&page, &touch(PointerPhase::Down, CELL, 100.0, 100.0), ms(50));
    assert_eq!(
        d.log.outcome,
        DispatchOutcome::Ignored(IgnoredReason::Rejected(
            AdmissionRejection::AnimationInFlight
        ))
    );
    assert_eq!(d.log.sequence, None);
    assert!(e.session().is_none());
    assert_eq!(e.drag_offset(), -VIEWPORT.width);
    assert!(e.is_animating());
    assert_eq!(e.calendar_mode(), PanelMode::Expanded);

    assert_eq!(e.tick(ms(210)).navigated, Some(SwipeDirection::Next));
    assert_eq!(*fired.borrow(), vec![SwipeDirection::Next]);
    assert_eq!(e.drag_offset(), 0.0);
    assert!(!e.is_animating());
    let d = e.pointer_down(&page, &touch(PointerPhase::Down, CELL, 100.0, 100.0), ms(220));
    assert!(!d.is_ignored());
}

#[test]
fn live_session_ignores_another_single_contact_down() {
    let mut page = Page::new();
    let (mut e, _) = engine(PanelMode::Expanded);
    e.pointer_down(&page, &touch(PointerPhase::Down, CELL, 100.0, 100.0), ms(0));
    e.pointer_move(&mut page, &touch(PointerPhase::Move, CELL, 100.0, 160.0));
    assert!(e.is_dragging());

    let d = e.pointer_down(&page, &touch(PointerPhase::Down, ROW, 30.0, 30.0), ms(20));
    assert_eq!(
        d.log.outcome,
        DispatchOutcome::Ignored(IgnoredReason::Rejected(AdmissionRejection::SessionActive))
    );
    assert_eq!(d.touch_action, None);
    let session = e.session().expect("original session kept");
    assert_eq!(session.origin, CELL);
    assert_eq!(session.lock(), Some(LockDirection::VerticalResize));
    assert!(e.is_dragging());
    assert_eq!(e.calendar_mode(), PanelMode::Expanded);

    let mouse = PointerEvent::mouse(PointerPhase::Down, ROW, 30.0, 30.0);
    assert!(e.pointer_down(&page, &mouse, ms(30)).is_ignored());
    assert_eq!(e.session().map(|s| s.origin), Some(CELL));
}

#[test]
fn touch_end_without_changed_contact_aborts() {
    let mut page = Page::new();
    let (mut e, fired) = engine(PanelMode::Expanded);
    e.pointer_down(&page, &touch(PointerPhase::Down, CELL, 100.0, 100.0), ms(0));
    e.pointer_move(&mut page, &touch(PointerPhase::Move, CELL, 100.0, 200.0));
    assert!(e.is_dragging());

    let bare_end = PointerEvent::touch(PointerPhase::Up, CELL, Vec::new(), Vec::new());
    let d = e.pointer_up(&mut page, &bare_end, ms(50));
    assert_eq!(
        d.log.outcome,
        DispatchOutcome::Aborted(AbortReason::NoContactPoint)
    );
    assert!(d.click.is_none());
    assert!(e.session().is_none());
    assert!(!e.is_dragging());
    assert_eq!(e.calendar_mode(), PanelMode::Expanded);
    assert_eq!(e.drag_offset(), 0.0);
    assert!(page.clicks.is_empty());
    assert_eq!(e.tick(ms(66)), calpane_core::FrameReport::default());
    assert!(fired.borrow().is_empty());
}

#[test]
fn missing_list_leaves_pull_down_to_native_scroll() {
    let mut page = Page::new();
    let config = GestureConfig {
        header_height: HEADER,
        default_mode: PanelMode::Expanded,
        ..GestureConfig::default()
    };
    let handles = PanelHandles {
        container: Some(CONTAINER),
        panel: Some(PANEL),
        content: Some(CONTENT),
        list: None,
    };
    let mut e = PanelEngine::new(config, handles);

    e.pointer_down(&page, &touch(PointerPhase::Down, ROW, 100.0, 100.0), ms(0));
    let d = e.pointer_move(&mut page, &touch(PointerPhase::Move, ROW, 100.0, 140.0));
    assert_eq!(d.log.outcome, DispatchOutcome::YieldedToNative);
    assert!(!d.prevent_default);
    assert!(!e.is_dragging());
    assert_eq!(e.session().and_then(|s| s.initial_scroll_top), None);

    let up = e.pointer_up(&mut page, &touch(PointerPhase::Up, ROW, 100.0, 140.0), ms(40));
    assert_eq!(up.log.outcome, DispatchOutcome::SessionEnded);
    assert_eq!(e.calendar_mode(), PanelMode::Expanded);

    // Dragging the panel itself still resizes.
    e.pointer_down(&page, &touch(PointerPhase::Down, CELL, 100.0, 100.0), ms(500));
    let d = e.pointer_move(&mut page, &touch(PointerPhase::Move, CELL, 100.0, 140.0));
    assert_eq!(d.log.outcome, DispatchOutcome::Locked(LockDirection::VerticalResize));
}

#[test]
fn range_input_keeps_native_horizontal() {
    struct RangeRow(Page);
    impl PanelHost for RangeRow {
        fn parent(&self, node: NodeId) -> Option<NodeId> {
            self.0.parent(node)
        }
        fn traits(&self, node: NodeId) -> ElementTraits {
            if node == ROW {
                ElementTraits::RANGE_INPUT
            } else {
                self.0.traits(node)
            }
        }
        fn tap_marker(&self, node: NodeId) -> Option<TapMarker> {
            self.0.tap_marker(node)
        }
        fn click(&mut self, node: NodeId) {
            self.0.click(node);
        }
        fn scroll_top(&self, node: NodeId) -> f64 {
            self.0.scroll_top(node)
        }
        fn set_scroll_top(&mut self, node: NodeId, value: f64) {
            self.0.set_scroll_top(node, value);
        }
        fn rendered_height(&self, node: NodeId) -> Option<f64> {
            self.0.rendered_height(node)
        }
        fn rendered_width(&self, node: NodeId) -> Option<f64> {
            self.0.rendered_width(node)
        }
        fn viewport(&self) -> Viewport {
            self.0.viewport()
        }
        fn sibling_nav_height(&self) -> Option<f64> {
            self.0.sibling_nav_height()
        }
    }

    let mut page = RangeRow(Page::new());
    let (mut e, _) = engine(PanelMode::Expanded);
    e.pointer_down(&page, &touch(PointerPhase::Down, ROW, 100.0, 100.0), ms(0));
    let d = e.pointer_move(&mut page, &touch(PointerPhase::Move, ROW, 160.0, 100.0));
    assert_eq!(d.log.outcome, DispatchOutcome::Locked(LockDirection::Horizontal));
    assert!(!d.prevent_default);
}

#[test]
fn non_cancelable_moves_are_never_prevented() {
    let mut page = Page::new();
    let (mut e, _) = engine(PanelMode::Expanded);
    e.pointer_down(&page, &touch(PointerPhase::Down, CELL, 100.0, 100.0), ms(0));
    let d = e.pointer_move(
        &mut page,
        &touch(PointerPhase::Move, CELL, 100.0, 160.0).non_cancelable(),
    );
    assert_eq!(d.log.outcome, DispatchOutcome::Locked(LockDirection::VerticalResize));
    assert!(!d.prevent_default);
}

fn mode_strategy() -> impl Strategy<Value = PanelMode> {
    prop::sample::select(PanelMode::ALL.to_vec())
}

proptest! {
    #[test]
    fn lock_is_assigned_once(moves in prop::collection::vec((-300.0f64..300.0, -300.0f64..300.0), 1..20)) {
        let mut page = Page::new();
        let (mut e, _) = engine(PanelMode::Expanded);
        e.pointer_down(&page, &touch(PointerPhase::Down, CELL, 0.0, 0.0), ms(0));
        let mut seen: Option<LockDirection> = None;
        for (x, y) in moves {
            e.pointer_move(&mut page, &touch(PointerPhase::Move, CELL, x, y));
            let lock = e.session().and_then(|s| s.lock());
            if let Some(first) = seen {
                prop_assert_eq!(lock, Some(first));
            }
            seen = seen.or(lock);
        }
    }

    #[test]
    fn resize_release_follows_policy(mode in mode_strategy(), dy in -400.0f64..400.0) {
        let mut page = Page::new();
        let (mut e, _) = engine(mode);
        let start_height = e.target_height(&page);
        // Start at the panel so any vertical drag is a resize.
        e.pointer_down(&page, &touch(PointerPhase::Down, CELL, 100.0, 500.0), ms(0));
        e.pointer_move(&mut page, &touch(PointerPhase::Move, CELL, 100.0, 500.0 + dy));
        e.tick(ms(16));
        let d = e.pointer_up(&mut page, &touch(PointerPhase::Up, CELL, 100.0, 500.0 + dy), ms(32));

        if dy.abs() <= 10.0 {
            // Inside the dead zone nothing locked.
            prop_assert_eq!(e.calendar_mode(), mode);
            return Ok(());
        }

        let released = (start_height + dy).clamp(0.0, FULLSCREEN);
        let (expected, policy) = if dy > 50.0 {
            (mode.expand_step(), ReleasePolicy::Flick)
        } else if dy < -50.0 {
            (mode.collapse_step(), ReleasePolicy::Flick)
        } else {
            let candidates = [(PanelMode::Collapsed, 0.0), (PanelMode::Expanded, 280.0), (PanelMode::Fullscreen, FULLSCREEN)];
            let mut best = candidates[0];
            for candidate in candidates {
                if (released - candidate.1).abs() < (released - best.1).abs() {
                    best = candidate;
                }
            }
            (best.0, ReleasePolicy::Settle)
        };
        prop_assert_eq!(
            d.log.outcome,
            DispatchOutcome::HeightCommitted { from: mode, to: expected, policy }
        );
        prop_assert!(!e.is_dragging());
    }

    #[test]
    fn horizontal_release_fires_at_most_once(dx in -300.0f64..300.0) {
        prop_assume!(dx.abs() > 10.0);
        let mut page = Page::new();
        let (mut e, fired) = engine(PanelMode::Expanded);
        e.pointer_down(&page, &touch(PointerPhase::Down, ROW, 200.0, 100.0), ms(0));
        e.pointer_move(&mut page, &touch(PointerPhase::Move, ROW, 200.0 + dx, 100.0));
        e.pointer_up(&mut page, &touch(PointerPhase::Up, ROW, 200.0 + dx, 100.0), ms(1000));

        if dx.abs() >= 50.0 {
            prop_assert!(e.is_animating());
            prop_assert_eq!(e.drag_offset(), if dx < 0.0 { -VIEWPORT.width } else { VIEWPORT.width });
            e.tick(ms(1199));
            prop_assert!(fired.borrow().is_empty());
            prop_assert!(e.is_animating());
            e.tick(ms(1200));
            let expected = if dx < 0.0 { SwipeDirection::Next } else { SwipeDirection::Prev };
            prop_assert_eq!(fired.borrow().clone(), vec![expected]);
        } else {
            prop_assert!(!e.is_animating());
        }
        e.tick(ms(5000));
        prop_assert!(fired.borrow().len() <= 1);
        prop_assert_eq!(e.drag_offset(), 0.0);
        prop_assert!(!e.is_animating());
    }

    #[test]
    fn small_sessions_click_without_locking(dx in -7.0f64..7.0, dy in -7.0f64..7.0) {
        let mut page = Page::new();
        let (mut e, fired) = engine(PanelMode::Expanded);
        e.pointer_down(&page, &touch(PointerPhase::Down, CELL, 100.0, 100.0), ms(0));
        e.pointer_move(&mut page, &touch(PointerPhase::Move, CELL, 100.0 + dx, 100.0 + dy));
        prop_assert_eq!(e.session().and_then(|s| s.lock()), None);
        let d = e.pointer_up(&mut page, &touch(PointerPhase::Up, CELL, 100.0 + dx, 100.0 + dy), ms(50));
        prop_assert_eq!(d.log.outcome, DispatchOutcome::ClickForwarded(CELL));
        prop_assert_eq!(page.clicks.clone(), vec![CELL]);
        prop_assert_eq!(e.calendar_mode(), PanelMode::Expanded);
        prop_assert_eq!(e.drag_offset(), 0.0);
        prop_assert!(fired.borrow().is_empty());
    }
}
