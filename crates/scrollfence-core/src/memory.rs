#![forbid(unsafe_code)]

//! In-memory document implementing [`DomTree`] and [`DocumentHost`].
//!
//! Deterministic and headless: layout metrics are whatever the caller sets.
//! Used by the test suites and by embedders that mirror a remote document.

use std::collections::{BTreeMap, HashMap};

use crate::event::{Axis, GestureKind};
use crate::host::{
    DocumentHost, DomTree, ListenerOptions, Overflow, ScrollMetrics, StyleSheetId, TextDirection,
};

/// Handle to a node in a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, PartialEq)]
enum NodeKind {
    Element { tag: String },
    ShadowRoot { host: NodeId },
}

#[derive(Debug, Clone)]
struct NodeData {
    parent: Option<NodeId>,
    kind: NodeKind,
    input_type: Option<String>,
    overflow_x: Overflow,
    overflow_y: Overflow,
    horizontal: ScrollMetrics,
    vertical: ScrollMetrics,
    direction: TextDirection,
}

impl NodeData {
    fn new(parent: Option<NodeId>, kind: NodeKind) -> Self {
        Self {
            parent,
            kind,
            input_type: None,
            overflow_x: Overflow::Visible,
            overflow_y: Overflow::Visible,
            horizontal: ScrollMetrics::default(),
            vertical: ScrollMetrics::default(),
            direction: TextDirection::Ltr,
        }
    }
}

/// A document tree plus the head/body side-effect state the lock touches.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<NodeData>,
    document_element: NodeId,
    body: NodeId,
    viewport_width: f64,
    client_width: f64,
    body_style: HashMap<String, String>,
    body_attributes: BTreeMap<String, String>,
    stylesheets: Vec<(StyleSheetId, String)>,
    next_stylesheet: u64,
    listeners: Vec<(GestureKind, ListenerOptions)>,
}

impl MemoryDocument {
    /// `<html><body></body></html>` with the given `innerWidth` and
    /// `documentElement.clientWidth`.
    #[must_use]
    pub fn new(viewport_width: f64, client_width: f64) -> Self {
        let html = NodeData::new(
            None,
            NodeKind::Element {
                tag: "HTML".to_string(),
            },
        );
        let body = NodeData::new(
            Some(NodeId(0)),
            NodeKind::Element {
                tag: "BODY".to_string(),
            },
        );
        Self {
            nodes: vec![html, body],
            document_element: NodeId(0),
            body: NodeId(1),
            viewport_width,
            client_width,
            body_style: HashMap::new(),
            body_attributes: BTreeMap::new(),
            stylesheets: Vec::new(),
            next_stylesheet: 1,
            listeners: Vec::new(),
        }
    }

    #[must_use]
    pub const fn body(&self) -> NodeId {
        self.body
    }

    #[must_use]
    pub const fn document_element(&self) -> NodeId {
        self.document_element
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(data);
        id
    }

    fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0 as usize)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Append an element with an uppercase-normalized tag.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        self.push(NodeData::new(
            Some(parent),
            NodeKind::Element {
                tag: tag.to_ascii_uppercase(),
            },
        ))
    }

    /// Attach a shadow root to `host`. Its `parent_node` is `None`.
    pub fn attach_shadow(&mut self, host: NodeId) -> NodeId {
        self.push(NodeData::new(None, NodeKind::ShadowRoot { host }))
    }

    pub fn set_overflow(&mut self, node: NodeId, x: Overflow, y: Overflow) {
        if let Some(data) = self.node_mut(node) {
            data.overflow_x = x;
            data.overflow_y = y;
        }
    }

    pub fn set_scroll_metrics(&mut self, node: NodeId, axis: Axis, metrics: ScrollMetrics) {
        if let Some(data) = self.node_mut(node) {
            match axis {
                Axis::Horizontal => data.horizontal = metrics,
                Axis::Vertical => data.vertical = metrics,
            }
        }
    }

    /// Update only the scroll offset on `axis`.
    pub fn scroll_to(&mut self, node: NodeId, axis: Axis, position: f64) {
        if let Some(data) = self.node_mut(node) {
            match axis {
                Axis::Horizontal => data.horizontal.position = position,
                Axis::Vertical => data.vertical.position = position,
            }
        }
    }

    pub fn set_direction(&mut self, node: NodeId, direction: TextDirection) {
        if let Some(data) = self.node_mut(node) {
            data.direction = direction;
        }
    }

    pub fn set_input_type(&mut self, node: NodeId, input_type: &str) {
        if let Some(data) = self.node_mut(node) {
            data.input_type = Some(input_type.to_string());
        }
    }

    pub fn set_body_style(&mut self, property: &str, value: &str) {
        self.body_style
            .insert(property.to_string(), value.to_string());
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }

    pub fn set_document_client_width(&mut self, width: f64) {
        self.client_width = width;
    }

    #[must_use]
    pub fn body_attribute(&self, name: &str) -> Option<&str> {
        self.body_attributes.get(name).map(String::as_str)
    }

    /// CSS text of every injected stylesheet, in insertion order.
    pub fn stylesheets(&self) -> impl Iterator<Item = &str> + '_ {
        self.stylesheets.iter().map(|(_, css)| css.as_str())
    }

    #[must_use]
    pub fn stylesheet_count(&self) -> usize {
        self.stylesheets.len()
    }

    #[must_use]
    pub fn has_listener(&self, kind: GestureKind) -> bool {
        self.listeners.iter().any(|(registered, _)| *registered == kind)
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl DomTree for MemoryDocument {
    type Node = NodeId;

    fn parent_node(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    fn shadow_host(&self, node: NodeId) -> Option<NodeId> {
        match self.node(node)?.kind {
            NodeKind::ShadowRoot { host } => Some(host),
            NodeKind::Element { .. } => None,
        }
    }

    fn is_body(&self, node: NodeId) -> bool {
        node == self.body
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        match &self.node(node)?.kind {
            NodeKind::Element { tag } => Some(tag.as_str()),
            NodeKind::ShadowRoot { .. } => None,
        }
    }

    fn input_type(&self, node: NodeId) -> Option<&str> {
        self.node(node)?.input_type.as_deref()
    }

    fn overflow(&self, node: NodeId, axis: Axis) -> Overflow {
        self.node(node).map_or(Overflow::Visible, |data| match axis {
            Axis::Horizontal => data.overflow_x,
            Axis::Vertical => data.overflow_y,
        })
    }

    fn scroll_metrics(&self, node: NodeId, axis: Axis) -> ScrollMetrics {
        self.node(node).map_or_else(ScrollMetrics::default, |data| match axis {
            Axis::Horizontal => data.horizontal,
            Axis::Vertical => data.vertical,
        })
    }

    fn direction(&self, node: NodeId) -> TextDirection {
        self.node(node)
            .map_or(TextDirection::Ltr, |data| data.direction)
    }
}

impl DocumentHost for MemoryDocument {
    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn document_client_width(&self) -> f64 {
        self.client_width
    }

    fn body_computed_style(&self, property: &str) -> Option<String> {
        self.body_style.get(property).cloned()
    }

    fn set_body_attribute(&mut self, name: &str, value: &str) {
        self.body_attributes
            .insert(name.to_string(), value.to_string());
    }

    fn remove_body_attribute(&mut self, name: &str) {
        self.body_attributes.remove(name);
    }

    fn insert_stylesheet(&mut self, css: &str) -> StyleSheetId {
        let id = StyleSheetId(self.next_stylesheet);
        self.next_stylesheet += 1;
        self.stylesheets.push((id, css.to_string()));
        id
    }

    fn remove_stylesheet(&mut self, id: StyleSheetId) {
        self.stylesheets.retain(|(existing, _)| *existing != id);
    }

    fn add_listener(&mut self, kind: GestureKind, options: ListenerOptions) {
        // Same type + options registers once, as with addEventListener.
        if !self.listeners.contains(&(kind, options)) {
            self.listeners.push((kind, options));
        }
    }

    fn remove_listener(&mut self, kind: GestureKind, options: ListenerOptions) {
        self.listeners
            .retain(|registered| *registered != (kind, options));
    }
}
