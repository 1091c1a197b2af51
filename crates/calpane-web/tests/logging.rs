//! Structured log output of a full swipe.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use calpane_core::{
    GestureConfig, PanelHandles, PointerEvent, PointerPhase, SwipeDirection, Viewport,
};
use calpane_web::{DomTree, Element, WebPanel};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<(Level, String)>>>);

struct Message(String);

impl Visit for Message {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for Captured {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut message = Message(String::new());
        event.record(&mut message);
        if let Ok(mut lines) = self.0.lock() {
            lines.push((*event.metadata().level(), message.0));
        }
    }
}

#[test]
fn swipe_logs_decision_and_commit_at_info() {
    let captured = Captured::default();
    let subscriber = tracing_subscriber::registry().with(captured.clone());

    tracing::subscriber::with_default(subscriber, || {
        let mut dom = DomTree::new(Viewport::new(390.0, 844.0));
        let root = dom.root();
        let container = dom.append(root, Element::new("div"));
        let day = dom.append(container, Element::new("div"));
        let handles = PanelHandles {
            container: Some(container),
            ..PanelHandles::default()
        };
        let mut panel = WebPanel::new(GestureConfig::default(), dom, handles);

        panel.dispatch(&PointerEvent::mouse(PointerPhase::Down, day, 300.0, 40.0));
        panel.dispatch(&PointerEvent::mouse(PointerPhase::Move, day, 360.0, 42.0));
        panel.dispatch(&PointerEvent::mouse(PointerPhase::Up, day, 380.0, 42.0));
        panel.advance(Duration::from_millis(250));
        assert_eq!(panel.navigations(), vec![SwipeDirection::Prev]);
    });

    let lines = captured.0.lock().map(|l| l.clone()).unwrap_or_default();
    let info: Vec<&str> = lines
        .iter()
        .filter(|(level, _)| *level == Level::INFO)
        .map(|(_, message)| message.as_str())
        .collect();
    assert_eq!(
        info,
        vec!["month swipe decided", "month navigation committed"]
    );
    assert!(
        lines
            .iter()
            .any(|(level, message)| *level == Level::DEBUG && message == "gesture session locked")
    );
}
