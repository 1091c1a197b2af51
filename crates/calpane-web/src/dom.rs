#![forbid(unsafe_code)]

//! Deterministic document arena.
//!
//! [`DomTree`] stores just enough of a page for the gesture engine: tags,
//! classes, a handful of attributes, ancestry, scroll offsets and laid-out
//! sizes. It implements [`PanelHost`] by evaluating the same selectors a
//! browser binding would (`button, a, input, select, [role=button],
//! .clickable`, the calendar cell and event card classes, the
//! `data-calendar-date` / `data-event-id` markers, `.shell-bottom-nav`, and
//! the `modal-open` class on the document root).

use std::collections::BTreeMap;

use calpane_core::{ElementTraits, NodeId, PanelHost, TapMarker, Viewport};

const INTERACTIVE_TAGS: [&str; 4] = ["button", "a", "input", "select"];
const CELL_CLASSES: [&str; 2] = ["calendar-cell-base", "calendar-cell-fullscreen"];
const EVENT_CARD_CLASS: &str = "calendar-fullscreen-event-card";
const CLICKABLE_CLASS: &str = "clickable";
const BOTTOM_NAV_CLASS: &str = "shell-bottom-nav";
const MODAL_OPEN_CLASS: &str = "modal-open";

/// One element of the arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    scroll_top: f64,
    height: Option<f64>,
    width: Option<f64>,
    clicks: u32,
}

impl Element {
    /// A detached element with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
            scroll_top: 0.0,
            height: None,
            width: None,
            clicks: 0,
        }
    }

    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Laid-out height in CSS pixels.
    #[must_use]
    pub fn height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    /// Laid-out width in CSS pixels.
    #[must_use]
    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn scroll_top(mut self, scroll_top: f64) -> Self {
        self.scroll_top = scroll_top;
        self
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn traits(&self) -> ElementTraits {
        let mut traits = ElementTraits::empty();
        if INTERACTIVE_TAGS.contains(&self.tag.as_str())
            || self.attribute("role") == Some("button")
            || self.has_class(CLICKABLE_CLASS)
        {
            traits |= ElementTraits::INTERACTIVE;
        }
        if self.tag == "input" && self.attribute("type") == Some("range") {
            traits |= ElementTraits::RANGE_INPUT;
        }
        if CELL_CLASSES.iter().any(|class| self.has_class(class)) {
            traits |= ElementTraits::CALENDAR_CELL;
        }
        if self.has_class(EVENT_CARD_CLASS) {
            traits |= ElementTraits::EVENT_CARD;
        }
        traits
    }

    fn tap_marker(&self) -> Option<TapMarker> {
        if let Some(id) = self.attribute("data-event-id") {
            return Some(TapMarker::EventCard(id.to_owned()));
        }
        self.attribute("data-calendar-date")
            .map(|date| TapMarker::CalendarDate(date.to_owned()))
    }
}

/// Arena-backed document.
#[derive(Debug, Clone)]
pub struct DomTree {
    elements: Vec<Element>,
    viewport: Viewport,
}

impl DomTree {
    /// A document holding only its root (`<body>`).
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            elements: vec![Element::new("body")],
            viewport,
        }
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append `element` as the last child of `parent`.
    ///
    /// An unknown parent attaches the element to the root.
    pub fn append(&mut self, parent: NodeId, mut element: Element) -> NodeId {
        let parent = if self.get(parent).is_some() {
            parent
        } else {
            self.root()
        };
        let id = NodeId(u32::try_from(self.elements.len()).unwrap_or(u32::MAX));
        element.parent = Some(parent);
        self.elements.push(element);
        if let Some(parent) = self.get_mut(parent) {
            parent.children.push(id);
        }
        id
    }

    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<&Element> {
        self.elements.get(node.0 as usize)
    }

    fn get_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.elements.get_mut(node.0 as usize)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Times the element's click handling ran.
    #[must_use]
    pub fn click_count(&self, node: NodeId) -> u32 {
        self.get(node).map_or(0, |element| element.clicks)
    }

    /// Total clicks across the document.
    #[must_use]
    pub fn total_clicks(&self) -> u32 {
        self.elements.iter().map(|element| element.clicks).sum()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn set_height(&mut self, node: NodeId, height: Option<f64>) {
        if let Some(element) = self.get_mut(node) {
            element.height = height;
        }
    }

    /// Toggle the `modal-open` class on the root.
    pub fn set_modal_open(&mut self, open: bool) {
        let root = self.root();
        if let Some(element) = self.get_mut(root) {
            element.classes.retain(|class| class != MODAL_OPEN_CLASS);
            if open {
                element.classes.push(MODAL_OPEN_CLASS.to_owned());
            }
        }
    }

    /// First element in document order carrying `class`.
    #[must_use]
    pub fn query_class(&self, class: &str) -> Option<NodeId> {
        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            let element = self.get(node)?;
            if element.has_class(class) {
                return Some(node);
            }
            stack.extend(element.children.iter().rev().copied());
        }
        None
    }
}

impl PanelHost for DomTree {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.parent
    }

    fn traits(&self, node: NodeId) -> ElementTraits {
        self.get(node).map_or(ElementTraits::empty(), Element::traits)
    }

    fn tap_marker(&self, node: NodeId) -> Option<TapMarker> {
        self.get(node)?.tap_marker()
    }

    fn click(&mut self, node: NodeId) {
        if let Some(element) = self.get_mut(node) {
            element.clicks += 1;
            tracing::trace!(node = node.0, tag = %element.tag, "click dispatched");
        }
    }

    fn scroll_top(&self, node: NodeId) -> f64 {
        self.get(node).map_or(0.0, |element| element.scroll_top)
    }

    fn set_scroll_top(&mut self, node: NodeId, value: f64) {
        if let Some(element) = self.get_mut(node) {
            element.scroll_top = value.max(0.0);
        }
    }

    fn rendered_height(&self, node: NodeId) -> Option<f64> {
        self.get(node)?.height
    }

    fn rendered_width(&self, node: NodeId) -> Option<f64> {
        self.get(node)?.width
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn sibling_nav_height(&self) -> Option<f64> {
        let nav = self.query_class(BOTTOM_NAV_CLASS)?;
        self.rendered_height(nav)
    }

    fn modal_open(&self) -> bool {
        self.get(self.root())
            .is_some_and(|root| root.has_class(MODAL_OPEN_CLASS))
    }
}
