#![forbid(unsafe_code)]

//! Core: the pointer-gesture engine behind the calendar panel.
//!
//! # Role in calpane
//! `calpane-core` turns raw touch and mouse events into exactly one of four
//! outcomes per interaction: a month swipe, a panel resize across three
//! height states, a pass-through scroll of the nested event list, or a tap
//! forwarded as a click. It knows nothing about a real DOM; the host is
//! reached through [`host::PanelHost`] and [`subscription::ListenerRegistry`].
//!
//! # Primary responsibilities
//! - **Coordinate adapter** ([`pointer`]): one position accessor for touch and mouse.
//! - **Classifier** ([`classifier`]): admission and the write-once lock direction.
//! - **Height controller** ([`height`]): canonical modes, live height, flick/settle release.
//! - **Swipe animator** ([`swipe`]): drag offset and the timed month commit.
//! - **Click forwarder** ([`click`]): taps re-delivered to date cells and event cards.
//! - **Engine** ([`engine`]): the session state machine tying them together.
//!
//! # How it fits in the system
//! `calpane-web` implements the host traits over a deterministic document
//! arena and drives [`PanelEngine`] from host-encoded input. A browser
//! binding does the same over `web-sys`.

pub mod classifier;
pub mod click;
pub mod config;
pub mod engine;
pub mod frame;
pub mod geometry;
pub mod height;
pub mod host;
pub mod pointer;
pub mod subscription;
pub mod swipe;
pub mod timer;

pub use classifier::{AdmissionRejection, GestureSession, LockDirection};
pub use config::{ConfigError, GestureConfig};
pub use engine::{
    DispatchLog, DispatchOutcome, DispatchPhase, FrameReport, GestureDispatch, PanelEngine,
    TouchActionHint,
};
pub use geometry::{Delta, Point, Viewport};
pub use height::PanelMode;
pub use host::{ElementTraits, NodeId, PanelHandles, PanelHost, TapMarker};
pub use pointer::{PointerEvent, PointerKind, PointerPhase, TouchContact};
pub use swipe::SwipeDirection;
