#![forbid(unsafe_code)]

//! Horizontal month swipe with a two-phase commit.
//!
//! While a horizontal session is live the offset follows the pointer 1:1.
//! On release a long enough swipe is *decided* immediately (offset jumps to
//! a full viewport width so the host's CSS transition slides the month out)
//! but only *committed* once the commit window has elapsed: the navigation
//! callback runs strictly after the slide, then the offset snaps back to 0
//! underneath the new month.
//!
//! # Invariants
//!
//! 1. `drag_offset() == 0` whenever `!is_animating()` and no horizontal
//!    session is tracking.
//! 2. A decided swipe yields its direction from [`SwipeAnimator::poll`] at
//!    most once, and never if it was cancelled first.

use std::time::Duration;

use crate::frame::FrameMailbox;
use crate::timer::{CancellationToken, OneShot};

/// Month navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    /// Finger moved left: show the following month.
    Next,
    /// Finger moved right: show the preceding month.
    Prev,
}

impl SwipeDirection {
    /// Direction for a horizontal displacement.
    #[must_use]
    pub fn from_dx(dx: f64) -> Self {
        if dx < 0.0 { Self::Next } else { Self::Prev }
    }

    /// Offset the outgoing month slides to.
    #[must_use]
    pub fn exit_offset(self, width: f64) -> f64 {
        match self {
            Self::Next => -width,
            Self::Prev => width,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Prev => "prev",
        }
    }
}

impl std::fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a horizontal release.
#[derive(Debug, Clone)]
pub enum SwipeRelease {
    /// Swipe decided; the callback fires at `deadline`.
    Decided {
        direction: SwipeDirection,
        exit_offset: f64,
        deadline: Duration,
        token: CancellationToken,
    },
    /// Too short; the offset snapped back to 0.
    SnappedBack,
}

/// Owns the horizontal drag offset and the pending month commit.
#[derive(Debug, Default)]
pub struct SwipeAnimator {
    drag_offset: f64,
    animating: bool,
    tracking: bool,
    frame: FrameMailbox<f64>,
    commit: OneShot<SwipeDirection>,
}

impl SwipeAnimator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn drag_offset(&self) -> f64 {
        self.drag_offset
    }

    #[inline]
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Whether a horizontal session currently drives the offset.
    #[inline]
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// External animating setter.
    ///
    /// Clearing the flag abandons any decided swipe and restores offset 0.
    pub fn set_animating(&mut self, animating: bool) {
        if animating {
            self.animating = true;
        } else {
            self.cancel_commit();
            self.animating = false;
            if !self.tracking {
                self.drag_offset = 0.0;
            }
        }
    }

    /// Start following a horizontal session.
    pub fn begin(&mut self) {
        self.tracking = true;
        self.frame.cancel();
    }

    /// Schedule the offset for horizontal displacement `dx`.
    pub fn drag(&mut self, dx: f64) {
        self.frame.post(dx);
    }

    /// Publish the pending offset, if any. Call once per frame.
    pub fn flush_frame(&mut self) -> Option<f64> {
        let offset = self.frame.take()?;
        if self.tracking {
            self.drag_offset = offset;
        }
        Some(offset)
    }

    /// Decide the swipe on release.
    pub fn release(
        &mut self,
        dx: f64,
        width: f64,
        min_distance: f64,
        now: Duration,
        window: Duration,
    ) -> SwipeRelease {
        self.frame.cancel();
        self.tracking = false;

        if dx.abs() < min_distance {
            self.drag_offset = 0.0;
            return SwipeRelease::SnappedBack;
        }

        let direction = SwipeDirection::from_dx(dx);
        let exit_offset = direction.exit_offset(width);
        self.drag_offset = exit_offset;
        self.animating = true;
        let token = self.commit.arm(now, window, direction);
        SwipeRelease::Decided {
            direction,
            exit_offset,
            deadline: now.saturating_add(window),
            token,
        }
    }

    /// Fire a decided swipe once the commit window has elapsed.
    ///
    /// Returns the direction to navigate exactly once. The exit offset and
    /// animating flag stay in place until [`finish_commit`](Self::finish_commit),
    /// which the caller runs after navigating.
    pub fn poll(&mut self, now: Duration) -> Option<SwipeDirection> {
        self.commit.poll(now)
    }

    /// Return to rest after a fired commit has navigated.
    pub fn finish_commit(&mut self) {
        if self.commit.is_armed() {
            return;
        }
        self.drag_offset = 0.0;
        self.animating = false;
    }

    /// Abandon a live horizontal session without committing.
    pub fn abort(&mut self) {
        self.frame.cancel();
        self.tracking = false;
        if !self.animating {
            self.drag_offset = 0.0;
        }
    }

    /// Cancel a decided swipe before it commits.
    ///
    /// Returns the direction that will now never be navigated.
    pub fn cancel_commit(&mut self) -> Option<SwipeDirection> {
        let direction = self.commit.cancel()?;
        self.drag_offset = 0.0;
        self.animating = false;
        Some(direction)
    }

    /// Whether a decided swipe is waiting for its commit window.
    #[must_use]
    pub fn commit_pending(&self) -> bool {
        self.commit.is_armed()
    }
}
