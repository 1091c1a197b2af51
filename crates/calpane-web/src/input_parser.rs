#![forbid(unsafe_code)]

//! JSON input parser for host-encoded pointer events.
//!
//! The JS side serialises each DOM event it forwards as one JSON object:
//!
//! ```json
//! {"type":"touchmove","target":4,"cancelable":true,
//!  "touches":[{"id":0,"x":120.0,"y":52.0}],
//!  "changedTouches":[{"id":0,"x":120.0,"y":52.0}]}
//! {"type":"mousedown","target":4,"x":10.0,"y":20.0}
//! ```
//!
//! [`parse_pointer_event`] turns that into a [`PointerEvent`]. Event types
//! the engine does not consume (`wheel`, `click`, ...) return `Ok(None)`.
//! Gated behind the `input-parser` feature.

use calpane_core::{NodeId, PointerEvent, PointerPhase, TouchContact};
use serde::Deserialize;

/// Errors from parsing encoded input JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputParseError {
    /// Malformed JSON.
    Json(String),
    /// Missing required field.
    MissingField(&'static str),
}

impl core::fmt::Display for InputParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
        }
    }
}

impl std::error::Error for InputParseError {}

#[derive(Debug, Deserialize)]
struct RawTouch {
    #[serde(default)]
    id: i64,
    x: f64,
    y: f64,
}

#[derive(Debug, Deserialize)]
struct RawInput {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    target: Option<u32>,
    #[serde(default)]
    cancelable: Option<bool>,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    touches: Option<Vec<RawTouch>>,
    #[serde(default, rename = "changedTouches")]
    changed_touches: Option<Vec<RawTouch>>,
}

/// Parse one host-encoded pointer event.
pub fn parse_pointer_event(json: &str) -> Result<Option<PointerEvent>, InputParseError> {
    let raw: RawInput =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;

    let event = match raw.kind.as_str() {
        "touchstart" => parse_touch(&raw, PointerPhase::Down)?,
        "touchmove" => parse_touch(&raw, PointerPhase::Move)?,
        "touchend" => parse_touch(&raw, PointerPhase::Up)?,
        "touchcancel" => parse_touch(&raw, PointerPhase::Cancel)?,
        "mousedown" => parse_mouse(&raw, PointerPhase::Down)?,
        "mousemove" => parse_mouse(&raw, PointerPhase::Move)?,
        "mouseup" => parse_mouse(&raw, PointerPhase::Up)?,
        other => {
            tracing::trace!(kind = other, "encoded input has no pointer mapping");
            return Ok(None);
        }
    };

    Ok(Some(if raw.cancelable == Some(false) {
        event.non_cancelable()
    } else {
        event
    }))
}

/// Parse newline-delimited encoded inputs, skipping blank lines and
/// non-pointer events.
pub fn parse_pointer_events(jsonl: &str) -> Result<Vec<PointerEvent>, InputParseError> {
    let mut events = Vec::new();
    for line in jsonl.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if let Some(event) = parse_pointer_event(line)? {
            events.push(event);
        }
    }
    Ok(events)
}

fn target(raw: &RawInput) -> Result<NodeId, InputParseError> {
    raw.target
        .map(NodeId)
        .ok_or(InputParseError::MissingField("target"))
}

fn contacts(list: Option<&Vec<RawTouch>>) -> Vec<TouchContact> {
    list.map(|touches| {
        touches
            .iter()
            .map(|t| TouchContact::new(t.id, t.x, t.y))
            .collect()
    })
    .unwrap_or_default()
}

fn parse_touch(raw: &RawInput, phase: PointerPhase) -> Result<PointerEvent, InputParseError> {
    let target = target(raw)?;
    Ok(PointerEvent::touch(
        phase,
        target,
        contacts(raw.touches.as_ref()),
        contacts(raw.changed_touches.as_ref()),
    ))
}

fn parse_mouse(raw: &RawInput, phase: PointerPhase) -> Result<PointerEvent, InputParseError> {
    let target = target(raw)?;
    let x = raw.x.ok_or(InputParseError::MissingField("x"))?;
    let y = raw.y.ok_or(InputParseError::MissingField("y"))?;
    Ok(PointerEvent::mouse(phase, target, x, y))
}
