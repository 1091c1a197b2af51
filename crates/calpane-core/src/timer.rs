#![forbid(unsafe_code)]

//! Host-clocked one-shot timers with cooperative cancellation.
//!
//! The engine never sleeps. A [`OneShot`] remembers a deadline on the
//! host's monotonic clock and yields its payload from [`OneShot::poll`] the
//! first time the host reports `now >= deadline`. Every armed timer carries
//! a [`CancellationToken`]; cancelling its [`CancellationSource`] (directly,
//! or through [`OneShot::cancel`]) guarantees the payload is never yielded.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// A cloneable cancellation signal observed by timers.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

/// The control handle that triggers cancellation.
///
/// Dropping the source does **not** cancel; call [`cancel`](Self::cancel).
#[derive(Debug)]
pub struct CancellationSource {
    cancelled: Arc<AtomicBool>,
}

impl CancellationSource {
    /// Create a new, uncancelled source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Obtain a token observing this source.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    /// Signal cancellation to every token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationToken {
    /// Whether cancellation was requested.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
struct Armed<T> {
    deadline: Duration,
    payload: T,
    source: CancellationSource,
}

/// A one-shot deadline timer driven by the host clock.
#[derive(Debug)]
pub struct OneShot<T> {
    armed: Option<Armed<T>>,
}

impl<T> Default for OneShot<T> {
    fn default() -> Self {
        Self { armed: None }
    }
}

impl<T> OneShot<T> {
    /// Create an idle timer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer to yield `payload` at `now + delay`.
    ///
    /// An already armed timer is cancelled and replaced. Returns a token
    /// observing the new arming.
    pub fn arm(&mut self, now: Duration, delay: Duration, payload: T) -> CancellationToken {
        self.cancel();
        let source = CancellationSource::new();
        let token = source.token();
        self.armed = Some(Armed {
            deadline: now.saturating_add(delay),
            payload,
            source,
        });
        token
    }

    /// Yield the payload if the deadline has passed and nobody cancelled.
    ///
    /// A cancelled timer is disarmed on the next poll without yielding.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        let armed = self.armed.as_ref()?;
        if armed.source.is_cancelled() {
            self.armed = None;
            return None;
        }
        if now < armed.deadline {
            return None;
        }
        self.armed.take().map(|armed| armed.payload)
    }

    /// Cancel and disarm. Returns the payload that will now never fire.
    pub fn cancel(&mut self) -> Option<T> {
        let armed = self.armed.take()?;
        armed.source.cancel();
        Some(armed.payload)
    }

    /// Whether the timer is armed and not cancelled.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
            .as_ref()
            .is_some_and(|armed| !armed.source.is_cancelled())
    }

    /// Deadline of the current arming.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.armed.as_ref().map(|armed| armed.deadline)
    }
}
