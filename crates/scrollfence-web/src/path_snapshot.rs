#![forbid(unsafe_code)]

//! Per-event snapshot of the composed path, answering [`DomTree`] queries.
//!
//! A JS host cannot hand Rust a live DOM, so each encoded event carries the
//! nodes from its target up to the body along with the computed styles and
//! scroll metrics the probe needs. Entry `i + 1` is the parent of entry `i`,
//! except after a shadow root, where entry `i + 1` is the root's host.

use std::collections::HashSet;

use scrollfence_core::Axis;
use scrollfence_core::host::{DomTree, Overflow, ScrollMetrics, TextDirection};

/// Host-assigned node identity, stable for the lifetime of the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WebNodeId(pub u32);

/// One node on the composed path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeSnapshot {
    pub id: u32,
    /// Uppercase tag name. `None` for shadow roots.
    pub tag: Option<String>,
    pub input_type: Option<String>,
    pub overflow_x: Overflow,
    pub overflow_y: Overflow,
    pub horizontal: ScrollMetrics,
    pub vertical: ScrollMetrics,
    pub direction: TextDirection,
    pub is_body: bool,
}

impl NodeSnapshot {
    /// Element with default styles.
    #[must_use]
    pub fn element(id: u32, tag: &str) -> Self {
        Self {
            id,
            tag: Some(tag.to_ascii_uppercase()),
            is_body: tag.eq_ignore_ascii_case("body"),
            ..Self::default()
        }
    }

    /// Shadow root; the next path entry is its host.
    #[must_use]
    pub fn shadow_root(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_overflow(mut self, x: Overflow, y: Overflow) -> Self {
        self.overflow_x = x;
        self.overflow_y = y;
        self
    }

    #[must_use]
    pub fn with_metrics(mut self, axis: Axis, metrics: ScrollMetrics) -> Self {
        match axis {
            Axis::Horizontal => self.horizontal = metrics,
            Axis::Vertical => self.vertical = metrics,
        }
        self
    }

    #[must_use]
    pub const fn is_shadow_root(&self) -> bool {
        self.tag.is_none()
    }
}

/// Composed path from the event target (index 0) outward.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathSnapshot {
    nodes: Vec<NodeSnapshot>,
}

impl PathSnapshot {
    /// Later entries repeating an earlier id are dropped, so every parent
    /// step moves strictly outward.
    #[must_use]
    pub fn new(mut nodes: Vec<NodeSnapshot>) -> Self {
        let mut seen = HashSet::with_capacity(nodes.len());
        nodes.retain(|entry| seen.insert(entry.id));
        Self { nodes }
    }

    #[must_use]
    pub fn nodes(&self) -> &[NodeSnapshot] {
        &self.nodes
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn index_of(&self, node: WebNodeId) -> Option<usize> {
        self.nodes.iter().position(|entry| entry.id == node.0)
    }

    fn get(&self, node: WebNodeId) -> Option<&NodeSnapshot> {
        self.index_of(node).map(|index| &self.nodes[index])
    }

    fn next_id(&self, index: usize) -> Option<WebNodeId> {
        self.nodes.get(index + 1).map(|entry| WebNodeId(entry.id))
    }
}

impl DomTree for PathSnapshot {
    type Node = WebNodeId;

    fn parent_node(&self, node: WebNodeId) -> Option<WebNodeId> {
        let index = self.index_of(node)?;
        if self.nodes[index].is_shadow_root() {
            return None;
        }
        self.next_id(index)
    }

    fn shadow_host(&self, node: WebNodeId) -> Option<WebNodeId> {
        let index = self.index_of(node)?;
        if self.nodes[index].is_shadow_root() {
            self.next_id(index)
        } else {
            None
        }
    }

    fn is_body(&self, node: WebNodeId) -> bool {
        self.get(node).is_some_and(|entry| entry.is_body)
    }

    fn tag_name(&self, node: WebNodeId) -> Option<&str> {
        self.get(node)?.tag.as_deref()
    }

    fn input_type(&self, node: WebNodeId) -> Option<&str> {
        self.get(node)?.input_type.as_deref()
    }

    fn overflow(&self, node: WebNodeId, axis: Axis) -> Overflow {
        self.get(node).map_or(Overflow::Visible, |entry| match axis {
            Axis::Horizontal => entry.overflow_x,
            Axis::Vertical => entry.overflow_y,
        })
    }

    fn scroll_metrics(&self, node: WebNodeId, axis: Axis) -> ScrollMetrics {
        self.get(node).map_or_else(ScrollMetrics::default, |entry| match axis {
            Axis::Horizontal => entry.horizontal,
            Axis::Vertical => entry.vertical,
        })
    }

    fn direction(&self, node: WebNodeId) -> TextDirection {
        self.get(node).map_or(TextDirection::Ltr, |entry| entry.direction)
    }
}
