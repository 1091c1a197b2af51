#![forbid(unsafe_code)]

//! `calpane-web` hosts the calpane gesture engine without a browser.
//!
//! Design goals:
//! - **Host-driven input**: the embedding environment (JS) pushes pointer events.
//! - **Deterministic time**: the host advances a monotonic clock explicitly.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! [`dom::DomTree`] stands in for the page, [`listeners::ListenerTable`]
//! for `addEventListener` bookkeeping, and [`panel::WebPanel`] wires both
//! to a [`calpane_core::PanelEngine`]. Host-encoded JSON events are decoded
//! by `input_parser`; `session_record` writes dispatches as JSONL.

pub mod dom;
#[cfg(feature = "input-parser")]
pub mod input_parser;
pub mod listeners;
pub mod panel;
#[cfg(feature = "session-record")]
pub mod session_record;

use core::time::Duration;

pub use dom::{DomTree, Element};
pub use panel::WebPanel;

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time. Time never moves backwards.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_monotonic() {
        let mut clock = DeterministicClock::new();
        clock.advance(Duration::from_millis(16));
        clock.set(Duration::from_millis(10));
        assert_eq!(clock.now(), Duration::from_millis(16));
        clock.set(Duration::from_millis(40));
        assert_eq!(clock.now(), Duration::from_millis(40));
    }
}
