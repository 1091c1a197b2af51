#![forbid(unsafe_code)]

//! Panel height states and the resize controller.
//!
//! The panel always rests in one of three [`PanelMode`]s. While a
//! vertical-resize session is active the controller tracks a *live* height
//! instead; on release a two-tier policy picks the next resting mode:
//!
//! - **Flick**: `dy` beyond the flick threshold moves exactly one step in
//!   the drag direction.
//! - **Settle**: otherwise the canonical height nearest to the released live
//!   height wins, with ties resolved in `[Collapsed, Expanded, Fullscreen]`
//!   order.
//!
//! # Invariants
//!
//! 1. `live_height` is within `[0, fullscreen]` whenever it was produced by
//!    [`HeightController::drag`].
//! 2. After [`release`](HeightController::release) or
//!    [`abort`](HeightController::abort), `is_dragging()` is false and no
//!    frame update is pending.

use std::time::Duration;

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};

use crate::frame::FrameMailbox;

/// Canonical resting state of the calendar panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(rename_all = "lowercase"))]
pub enum PanelMode {
    #[default]
    Collapsed,
    Expanded,
    Fullscreen,
}

impl PanelMode {
    /// Fixed evaluation order; earlier entries win settle ties.
    pub const ALL: [Self; 3] = [Self::Collapsed, Self::Expanded, Self::Fullscreen];

    /// One step toward fullscreen (saturating).
    #[must_use]
    pub const fn expand_step(self) -> Self {
        match self {
            Self::Collapsed => Self::Expanded,
            Self::Expanded | Self::Fullscreen => Self::Fullscreen,
        }
    }

    /// One step toward collapsed (saturating).
    #[must_use]
    pub const fn collapse_step(self) -> Self {
        match self {
            Self::Fullscreen => Self::Expanded,
            Self::Expanded | Self::Collapsed => Self::Collapsed,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Collapsed => "collapsed",
            Self::Expanded => "expanded",
            Self::Fullscreen => "fullscreen",
        }
    }
}

impl std::fmt::Display for PanelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fullscreen height for the current viewport, never negative.
#[must_use]
pub fn fullscreen_height(viewport_height: f64, header_height: f64, nav_height: f64) -> f64 {
    (viewport_height - header_height - nav_height).max(0.0)
}

/// Canonical heights of the non-collapsed modes, measured for one moment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelHeights {
    pub expanded: f64,
    pub fullscreen: f64,
}

impl PanelHeights {
    #[must_use]
    pub const fn new(expanded: f64, fullscreen: f64) -> Self {
        Self {
            expanded,
            fullscreen,
        }
    }

    /// Canonical height of `mode`.
    #[must_use]
    pub fn of(&self, mode: PanelMode) -> f64 {
        match mode {
            PanelMode::Collapsed => 0.0,
            PanelMode::Expanded => self.expanded,
            PanelMode::Fullscreen => self.fullscreen,
        }
    }

    /// Mode whose canonical height is nearest to `height`.
    #[must_use]
    pub fn nearest(&self, height: f64) -> PanelMode {
        let mut best = PanelMode::Collapsed;
        let mut best_distance = f64::INFINITY;
        for mode in PanelMode::ALL {
            let distance = (height - self.of(mode)).abs();
            if distance < best_distance {
                best = mode;
                best_distance = distance;
            }
        }
        best
    }
}

/// Which release policy decided a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleasePolicy {
    Flick,
    Settle,
}

/// Outcome of a resize release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightRelease {
    pub from: PanelMode,
    pub to: PanelMode,
    pub policy: ReleasePolicy,
    /// Live height at release (clamped).
    pub released_height: f64,
}

/// Owns the resting mode and the live height of an active resize.
#[derive(Debug, Clone)]
pub struct HeightController {
    mode: PanelMode,
    dragging: bool,
    live_height: f64,
    start_height: f64,
    frame: FrameMailbox<f64>,
    settle_until: Option<Duration>,
}

impl HeightController {
    #[must_use]
    pub fn new(mode: PanelMode) -> Self {
        Self {
            mode,
            dragging: false,
            live_height: 0.0,
            start_height: 0.0,
            frame: FrameMailbox::new(),
            settle_until: None,
        }
    }

    /// Current resting mode.
    #[inline]
    #[must_use]
    pub fn mode(&self) -> PanelMode {
        self.mode
    }

    /// Override the resting mode (external setter).
    pub fn set_mode(&mut self, mode: PanelMode) {
        self.mode = mode;
    }

    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Last published live height; only meaningful while dragging.
    #[inline]
    #[must_use]
    pub fn live_height(&self) -> f64 {
        self.live_height
    }

    /// Height the host should render: live while dragging, canonical otherwise.
    #[must_use]
    pub fn rendered_height(&self, heights: &PanelHeights) -> f64 {
        if self.dragging {
            self.live_height
        } else {
            heights.of(self.mode)
        }
    }

    /// Start a resize from the panel's current rendered height.
    pub fn begin(&mut self, start_height: f64) {
        self.dragging = true;
        self.start_height = start_height;
        self.live_height = start_height;
        self.frame.cancel();
    }

    /// Schedule the live height for vertical displacement `dy`.
    ///
    /// Returns the clamped height that will be published on the next frame.
    pub fn drag(&mut self, dy: f64, fullscreen: f64) -> f64 {
        let height = clamp_height(self.start_height + dy, fullscreen);
        self.frame.post(height);
        height
    }

    /// Publish the pending live height, if any. Call once per frame.
    pub fn flush_frame(&mut self) -> Option<f64> {
        let height = self.frame.take()?;
        if self.dragging {
            self.live_height = height;
        }
        Some(height)
    }

    /// Commit the resize and start the settle transition.
    pub fn release(
        &mut self,
        dy: f64,
        heights: &PanelHeights,
        flick_threshold: f64,
        now: Duration,
        settle: Duration,
    ) -> HeightRelease {
        self.frame.cancel();
        let released_height = clamp_height(self.start_height + dy, heights.fullscreen);
        let from = self.mode;
        let (to, policy) = if dy > flick_threshold {
            (from.expand_step(), ReleasePolicy::Flick)
        } else if dy < -flick_threshold {
            (from.collapse_step(), ReleasePolicy::Flick)
        } else {
            (heights.nearest(released_height), ReleasePolicy::Settle)
        };

        self.mode = to;
        self.dragging = false;
        self.live_height = released_height;
        self.settle_until = Some(now.saturating_add(settle));

        HeightRelease {
            from,
            to,
            policy,
            released_height,
        }
    }

    /// Drop the resize without changing the resting mode.
    pub fn abort(&mut self) {
        self.frame.cancel();
        self.dragging = false;
    }

    /// Whether the post-release transition is still running at `now`.
    #[must_use]
    pub fn is_settling(&self, now: Duration) -> bool {
        self.settle_until.is_some_and(|until| now < until)
    }

    /// Clear an elapsed settle window.
    pub fn expire_settle(&mut self, now: Duration) {
        if self.settle_until.is_some_and(|until| now >= until) {
            self.settle_until = None;
        }
    }

    /// Stop tracking the settle transition.
    pub fn clear_settle(&mut self) {
        self.settle_until = None;
    }

    /// Whether a live-height update is waiting for the next frame.
    #[must_use]
    pub fn frame_pending(&self) -> bool {
        self.frame.is_pending()
    }
}

fn clamp_height(height: f64, fullscreen: f64) -> f64 {
    height.min(fullscreen).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEIGHTS: PanelHeights = PanelHeights::new(280.0, 600.0);
    const FLICK: f64 = 50.0;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn resized(mode: PanelMode, start: f64, dy: f64) -> HeightRelease {
        let mut hc = HeightController::new(mode);
        hc.begin(start);
        hc.drag(dy, HEIGHTS.fullscreen);
        hc.release(dy, &HEIGHTS, FLICK, ms(0), ms(300))
    }

    #[test]
    fn steps_saturate() {
        assert_eq!(PanelMode::Collapsed.expand_step(), PanelMode::Expanded);
        assert_eq!(PanelMode::Expanded.expand_step(), PanelMode::Fullscreen);
        assert_eq!(PanelMode::Fullscreen.expand_step(), PanelMode::Fullscreen);
        assert_eq!(PanelMode::Fullscreen.collapse_step(), PanelMode::Expanded);
        assert_eq!(PanelMode::Collapsed.collapse_step(), PanelMode::Collapsed);
    }

    #[test]
    fn fullscreen_height_never_negative() {
        assert_eq!(fullscreen_height(800.0, 60.0, 80.0), 660.0);
        assert_eq!(fullscreen_height(100.0, 60.0, 80.0), 0.0);
    }

    #[test]
    fn nearest_breaks_ties_toward_collapsed() {
        assert_eq!(HEIGHTS.nearest(140.0), PanelMode::Collapsed);
        assert_eq!(HEIGHTS.nearest(141.0), PanelMode::Expanded);
        assert_eq!(HEIGHTS.nearest(440.0), PanelMode::Expanded);
        assert_eq!(HEIGHTS.nearest(441.0), PanelMode::Fullscreen);
    }

    #[test]
    fn drag_clamps_to_range() {
        let mut hc = HeightController::new(PanelMode::Expanded);
        hc.begin(280.0);
        assert_eq!(hc.drag(1000.0, 600.0), 600.0);
        assert_eq!(hc.drag(-1000.0, 600.0), 0.0);
    }

    #[test]
    fn live_height_publishes_once_per_frame() {
        let mut hc = HeightController::new(PanelMode::Expanded);
        hc.begin(280.0);
        hc.drag(10.0, 600.0);
        hc.drag(20.0, 600.0);
        assert_eq!(hc.live_height(), 280.0);
        assert_eq!(hc.flush_frame(), Some(300.0));
        assert_eq!(hc.live_height(), 300.0);
        assert_eq!(hc.flush_frame(), None);
    }

    #[test]
    fn flick_down_steps_once() {
        let release = resized(PanelMode::Collapsed, 0.0, 51.0);
        assert_eq!(release.to, PanelMode::Expanded);
        assert_eq!(release.policy, ReleasePolicy::Flick);

        let release = resized(PanelMode::Expanded, 280.0, 150.0);
        assert_eq!(release.to, PanelMode::Fullscreen);
    }

    #[test]
    fn flick_up_steps_once() {
        let release = resized(PanelMode::Fullscreen, 600.0, -400.0);
        assert_eq!(release.to, PanelMode::Expanded);
        let release = resized(PanelMode::Collapsed, 0.0, -80.0);
        assert_eq!(release.to, PanelMode::Collapsed);
    }

    #[test]
    fn slow_drag_settles_to_nearest() {
        let release = resized(PanelMode::Expanded, 280.0, -50.0);
        assert_eq!(release.policy, ReleasePolicy::Settle);
        assert_eq!(release.released_height, 230.0);
        assert_eq!(release.to, PanelMode::Expanded);

        // Mid-drag start below the expanded height.
        let release = resized(PanelMode::Expanded, 120.0, 20.0);
        assert_eq!(release.to, PanelMode::Collapsed);
    }

    #[test]
    fn release_clears_dragging_and_starts_settle() {
        let mut hc = HeightController::new(PanelMode::Collapsed);
        hc.begin(0.0);
        hc.drag(30.0, 600.0);
        hc.release(30.0, &HEIGHTS, FLICK, ms(1000), ms(300));
        assert!(!hc.is_dragging());
        assert!(!hc.frame_pending());
        assert!(hc.is_settling(ms(1299)));
        assert!(!hc.is_settling(ms(1300)));
        hc.expire_settle(ms(1300));
        assert!(!hc.is_settling(ms(0)));
    }

    #[test]
    fn abort_keeps_mode() {
        let mut hc = HeightController::new(PanelMode::Expanded);
        hc.begin(280.0);
        hc.drag(200.0, 600.0);
        hc.abort();
        assert_eq!(hc.mode(), PanelMode::Expanded);
        assert!(!hc.is_dragging());
        assert_eq!(hc.flush_frame(), None);
        assert_eq!(hc.rendered_height(&HEIGHTS), 280.0);
    }

    #[test]
    fn mode_display_is_lowercase() {
        assert_eq!(PanelMode::Fullscreen.to_string(), "fullscreen");
    }
}
