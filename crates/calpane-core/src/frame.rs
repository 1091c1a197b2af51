#![forbid(unsafe_code)]

//! Single-slot, latest-wins frame mailbox.
//!
//! Pointer moves arrive far more often than the host paints. Each move
//! [`post`](FrameMailbox::post)s its value; a pending value that has not yet
//! been drained is cancelled and replaced. The render loop calls
//! [`take`](FrameMailbox::take) once per animation frame, so at most one
//! update per frame ever reaches the render layer regardless of input rate.
//!
//! # Invariants
//!
//! 1. The mailbox holds at most one value.
//! 2. `take()` after `take()` in the same frame returns `None`.
//! 3. `cancel()` discards the pending value without publishing it.

/// Latest-wins single-slot mailbox drained once per frame.
#[derive(Debug, Clone)]
pub struct FrameMailbox<T> {
    pending: Option<T>,
    /// Values replaced before they were drained.
    superseded: u64,
}

impl<T> Default for FrameMailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FrameMailbox<T> {
    /// Create an empty mailbox.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: None,
            superseded: 0,
        }
    }

    /// Schedule `value` for the next frame.
    ///
    /// Returns `true` if a previously pending value was cancelled.
    pub fn post(&mut self, value: T) -> bool {
        let replaced = self.pending.replace(value).is_some();
        if replaced {
            self.superseded = self.superseded.saturating_add(1);
        }
        replaced
    }

    /// Drain the pending value for this frame.
    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }

    /// Discard the pending value, returning whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Whether a value is waiting for the next frame.
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Peek at the pending value.
    #[inline]
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    /// Total number of values replaced before they could be drained.
    #[inline]
    #[must_use]
    pub fn superseded(&self) -> u64 {
        self.superseded
    }
}
