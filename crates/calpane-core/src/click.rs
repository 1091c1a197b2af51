#![forbid(unsafe_code)]

//! Tap-to-click forwarding.
//!
//! The engine may `preventDefault` the terminating touch event, which also
//! suppresses the browser's synthetic click. A session that never locked
//! and released within the tap slop is therefore re-delivered explicitly:
//! the nearest ancestor (inclusive) of the release target that carries a
//! [`TapMarker`] gets its own click handling invoked.

use crate::host::{NodeId, PanelHost, TapMarker};

/// A click the forwarder delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardedClick {
    pub node: NodeId,
    pub marker: TapMarker,
}

/// Nearest tap-marked element at or above `target`.
#[must_use]
pub fn find_tap_target<H: PanelHost + ?Sized>(host: &H, target: NodeId) -> Option<ForwardedClick> {
    let mut cursor = Some(target);
    while let Some(node) = cursor {
        if let Some(marker) = host.tap_marker(node) {
            return Some(ForwardedClick { node, marker });
        }
        cursor = host.parent(node);
    }
    None
}

/// Locate the tap target and invoke its click handling.
pub fn forward_click<H: PanelHost + ?Sized>(host: &mut H, target: NodeId) -> Option<ForwardedClick> {
    let click = find_tap_target(host, target)?;
    host.click(click.node);
    Some(click)
}
