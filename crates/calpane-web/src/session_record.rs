#![forbid(unsafe_code)]

//! JSONL recording of engine dispatches for replay debugging.
//!
//! A [`SessionRecorder`] collects one [`TraceRecord`] per delivered input
//! and per non-empty frame. [`SessionRecorder::to_jsonl`] writes them one
//! JSON object per line:
//!
//! ```text
//! {"event":"dispatch","ts_ms":0,"seq":1,"phase":"pointer_down","outcome":"session_started","detail":"touch","prevent_default":false}
//! {"event":"frame","ts_ms":16,"live_height":430.0}
//! {"event":"frame","ts_ms":232,"navigated":"next"}
//! ```
//!
//! Timestamps are the host clock in milliseconds, so a recording replays
//! deterministically against the same document.

use std::time::Duration;

use calpane_core::engine::{AbortReason, DispatchOutcome, IgnoredReason};
use calpane_core::{FrameReport, GestureDispatch, TapMarker};
use serde::Serialize;

/// One line of a session recording.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceRecord {
    Dispatch {
        ts_ms: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        seq: Option<u64>,
        phase: &'static str,
        outcome: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
        prevent_default: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        click: Option<String>,
    },
    Frame {
        ts_ms: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        live_height: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        drag_offset: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        navigated: Option<&'static str>,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        settled: bool,
    },
}

/// Accumulates trace records for one session.
#[derive(Debug, Clone, Default)]
pub struct SessionRecorder {
    records: Vec<TraceRecord>,
}

impl SessionRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one engine dispatch.
    pub fn record_dispatch(&mut self, now: Duration, dispatch: &GestureDispatch) {
        self.records.push(TraceRecord::Dispatch {
            ts_ms: millis(now),
            seq: dispatch.log.sequence,
            phase: dispatch.log.phase.as_str(),
            outcome: dispatch.log.outcome.label(),
            detail: outcome_detail(&dispatch.log.outcome),
            prevent_default: dispatch.prevent_default,
            click: dispatch.click.as_ref().map(|click| match &click.marker {
                TapMarker::CalendarDate(date) => format!("date:{date}"),
                TapMarker::EventCard(id) => format!("event:{id}"),
            }),
        });
    }

    /// Record a frame; empty frames are skipped.
    pub fn record_frame(&mut self, now: Duration, report: &FrameReport) {
        if report.is_empty() {
            return;
        }
        self.records.push(TraceRecord::Frame {
            ts_ms: millis(now),
            live_height: report.live_height,
            drag_offset: report.drag_offset,
            navigated: report.navigated.map(|direction| direction.as_str()),
            settled: report.settled,
        });
    }

    #[must_use]
    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    /// Serialise every record as one JSON line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }
        Ok(out)
    }
}

fn millis(now: Duration) -> u64 {
    u64::try_from(now.as_millis()).unwrap_or(u64::MAX)
}

fn outcome_detail(outcome: &DispatchOutcome) -> Option<String> {
    Some(match outcome {
        DispatchOutcome::Mounted { listeners } => format!("{listeners} listeners"),
        DispatchOutcome::TornDown { cancelled_commit } => {
            cancelled_commit.map(|direction| format!("cancelled {direction}"))?
        }
        DispatchOutcome::SessionStarted { pointer } => format!("{pointer:?}").to_lowercase(),
        DispatchOutcome::Locked(lock) | DispatchOutcome::Routed(lock) => lock.as_str().to_owned(),
        DispatchOutcome::HeightCommitted { from, to, policy } => {
            format!("{from}->{to} ({policy:?})").to_lowercase()
        }
        DispatchOutcome::SwipeDecided(direction) => direction.as_str().to_owned(),
        DispatchOutcome::ClickForwarded(node) => format!("node {}", node.0),
        DispatchOutcome::Aborted(reason) => abort_label(*reason).to_owned(),
        DispatchOutcome::Ignored(reason) => ignored_label(*reason),
        DispatchOutcome::Tracking
        | DispatchOutcome::YieldedToNative
        | DispatchOutcome::SwipeSnappedBack
        | DispatchOutcome::SessionEnded => return None,
    })
}

fn abort_label(reason: AbortReason) -> &'static str {
    match reason {
        AbortReason::Cancelled => "cancelled",
        AbortReason::MultiTouch => "multi_touch",
        AbortReason::NoContactPoint => "no_contact_point",
        AbortReason::Teardown => "teardown",
    }
}

fn ignored_label(reason: IgnoredReason) -> String {
    match reason {
        IgnoredReason::Rejected(rejection) => format!("rejected: {rejection:?}"),
        other => format!("{other:?}"),
    }
}
