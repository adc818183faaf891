#![forbid(unsafe_code)]

//! Host abstractions: the document tree and the document mutation surface.
//!
//! The core never touches a real DOM. Embedders implement [`DomTree`] for
//! structural and layout queries and [`DocumentHost`] for the few side effects
//! the lock needs (body attribute, one stylesheet, listener registration).
//! [`crate::memory::MemoryDocument`] implements both for headless use.

use core::fmt::Debug;

use crate::event::{Axis, GestureKind};

/// Computed `overflow-x` / `overflow-y` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Clip,
    Scroll,
    Auto,
}

impl Overflow {
    /// Parse a computed-style keyword. Unknown keywords read as `visible`.
    #[must_use]
    pub fn from_css(value: &str) -> Self {
        match value.trim() {
            "hidden" => Self::Hidden,
            "clip" => Self::Clip,
            "scroll" => Self::Scroll,
            "auto" | "overlay" => Self::Auto,
            _ => Self::Visible,
        }
    }
}

/// Computed `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

/// Scroll offsets along one axis: `scrollTop/Left`, `scrollHeight/Width`,
/// `clientHeight/Width`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub position: f64,
    pub size: f64,
    pub client: f64,
}

impl ScrollMetrics {
    #[must_use]
    pub const fn new(position: f64, size: f64, client: f64) -> Self {
        Self {
            position,
            size,
            client,
        }
    }

    /// Content overflows the viewport on this axis.
    #[must_use]
    pub fn overflows(&self) -> bool {
        self.size > self.client
    }
}

/// Read access to the live node graph.
///
/// `parent_node` returns the raw parent, which may be a shadow root;
/// [`DomTree::composed_parent`] crosses shadow boundaries to the host element.
pub trait DomTree {
    /// Node handle. Equality is node identity.
    type Node: Copy + Eq + Debug;

    fn parent_node(&self, node: Self::Node) -> Option<Self::Node>;

    /// Host element when `node` is a shadow root.
    fn shadow_host(&self, node: Self::Node) -> Option<Self::Node>;

    fn is_body(&self, node: Self::Node) -> bool;

    /// Uppercase tag name, or `None` for non-element nodes.
    fn tag_name(&self, node: Self::Node) -> Option<&str>;

    /// `type` attribute of an `<input>`.
    fn input_type(&self, node: Self::Node) -> Option<&str>;

    fn overflow(&self, node: Self::Node, axis: Axis) -> Overflow;

    fn scroll_metrics(&self, node: Self::Node, axis: Axis) -> ScrollMetrics;

    fn direction(&self, node: Self::Node) -> TextDirection;

    fn is_element(&self, node: Self::Node) -> bool {
        self.tag_name(node).is_some()
    }

    /// Parent in the composed tree: shadow roots resolve to their host.
    fn composed_parent(&self, node: Self::Node) -> Option<Self::Node> {
        let parent = self.parent_node(node)?;
        Some(self.shadow_host(parent).unwrap_or(parent))
    }

    /// Inclusive containment over light-DOM parents.
    fn contains(&self, ancestor: Self::Node, node: Self::Node) -> bool {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.parent_node(candidate);
        }
        false
    }
}

/// Opaque handle to an injected stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleSheetId(pub u64);

/// `addEventListener` options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerOptions {
    pub passive: bool,
}

impl Default for ListenerOptions {
    /// Non-passive, so `preventDefault` is honoured.
    fn default() -> Self {
        Self { passive: false }
    }
}

/// Document-level side effects and layout reads used by the lock.
pub trait DocumentHost {
    /// `window.innerWidth`.
    fn viewport_width(&self) -> f64;

    /// `document.documentElement.clientWidth`.
    fn document_client_width(&self) -> f64;

    /// Computed style value of `document.body`, e.g. `"8px"`.
    fn body_computed_style(&self, property: &str) -> Option<String>;

    fn set_body_attribute(&mut self, name: &str, value: &str);

    fn remove_body_attribute(&mut self, name: &str);

    /// Append a `<style>` element to the document head.
    fn insert_stylesheet(&mut self, css: &str) -> StyleSheetId;

    fn remove_stylesheet(&mut self, id: StyleSheetId);

    fn add_listener(&mut self, kind: GestureKind, options: ListenerOptions);

    fn remove_listener(&mut self, kind: GestureKind, options: ListenerOptions);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn overflow_keywords() {
        assert_eq!(Overflow::from_css("hidden"), Overflow::Hidden);
        assert_eq!(Overflow::from_css(" auto "), Overflow::Auto);
        assert_eq!(Overflow::from_css("overlay"), Overflow::Auto);
        assert_eq!(Overflow::from_css("inherit"), Overflow::Visible);
    }

    #[test]
    fn listeners_default_to_non_passive() {
        assert!(!ListenerOptions::default().passive);
    }
}
