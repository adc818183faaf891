#![forbid(unsafe_code)]

//! Scroll feasibility and delta-accumulation tests.
//!
//! The coordinator asks two questions of the document and never looks at
//! layout directly:
//!
//! - **Feasibility**: can anything between the event target and the body
//!   scroll on this axis at all?
//! - **Accumulation**: after summing the remaining scroll budget of every
//!   scroll container between the target and the region boundary, does the
//!   gesture still have somewhere to go?
//!
//! Both are behind [`ScrollProbe`] so hosts with their own layout engine can
//! answer them directly. [`DomScrollProbe`] answers them from any [`DomTree`].

use crate::event::Axis;
use crate::host::{DomTree, Overflow, TextDirection};

/// Budget below which a boundary check treats a container as exhausted.
const BOUNDARY_EPSILON: f64 = 1.0;

/// Layout questions asked by the gesture coordinator.
pub trait ScrollProbe {
    type Node: Copy + Eq + core::fmt::Debug;

    /// Inclusive DOM containment.
    fn contains(&self, ancestor: Self::Node, node: Self::Node) -> bool;

    /// `<input type="range">`, which consumes horizontal drags itself.
    fn is_range_input(&self, node: Self::Node) -> bool;

    /// Some ancestor of `node` (inclusive, below the body) can scroll on `axis`.
    fn can_scroll_further(&self, axis: Axis, node: Self::Node) -> bool;

    /// `true` when the gesture must be cancelled because the containers
    /// between `target` and `region` have no budget left for `signed_delta`.
    ///
    /// With `is_boundary_check` the test only asks whether any budget remains
    /// in the delta's direction; otherwise the delta must fit in the budget.
    fn resolve_scroll_handling(
        &self,
        axis: Axis,
        region: Self::Node,
        target: Self::Node,
        signed_delta: f64,
        is_boundary_check: bool,
    ) -> bool;

    /// Outermost shadow host enclosing `node`, which is where the event is
    /// retargeted to by the time it reaches the document.
    fn outermost_shadow_host(&self, node: Self::Node) -> Option<Self::Node> {
        let _ = node;
        None
    }
}

/// [`ScrollProbe`] backed by computed styles and scroll metrics of a tree.
#[derive(Debug, Clone, Copy)]
pub struct DomScrollProbe<'a, T: DomTree> {
    tree: &'a T,
}

impl<'a, T: DomTree> DomScrollProbe<'a, T> {
    #[must_use]
    pub const fn new(tree: &'a T) -> Self {
        Self { tree }
    }

    /// Whether `node`'s own overflow on `axis` makes it a scroll container.
    ///
    /// `visible` on both axes means no container unless the node is a
    /// textarea, which always scrolls its own content.
    pub fn element_can_be_scrolled(&self, node: T::Node, axis: Axis) -> bool {
        if !self.tree.is_element(node) {
            return false;
        }
        let own = self.tree.overflow(node, axis);
        if matches!(own, Overflow::Hidden | Overflow::Clip) {
            return false;
        }
        let other = self.tree.overflow(node, axis.opposite());
        let always_contains = self.tree.tag_name(node) == Some("TEXTAREA");
        !(own == other && !always_contains && own == Overflow::Visible)
    }

    fn direction_factor(&self, axis: Axis, node: T::Node) -> f64 {
        match (axis, self.tree.direction(node)) {
            (Axis::Horizontal, TextDirection::Rtl) => -1.0,
            _ => 1.0,
        }
    }
}

impl<T: DomTree> ScrollProbe for DomScrollProbe<'_, T> {
    type Node = T::Node;

    fn contains(&self, ancestor: T::Node, node: T::Node) -> bool {
        self.tree.contains(ancestor, node)
    }

    fn is_range_input(&self, node: T::Node) -> bool {
        self.tree.tag_name(node) == Some("INPUT") && self.tree.input_type(node) == Some("range")
    }

    fn can_scroll_further(&self, axis: Axis, node: T::Node) -> bool {
        let mut current = Some(node);
        while let Some(raw) = current {
            let candidate = self.tree.shadow_host(raw).unwrap_or(raw);
            if self.element_can_be_scrolled(candidate, axis)
                && self.tree.scroll_metrics(candidate, axis).overflows()
            {
                return true;
            }
            current = self
                .tree
                .parent_node(candidate)
                .filter(|parent| !self.tree.is_body(*parent));
        }
        false
    }

    fn resolve_scroll_handling(
        &self,
        axis: Axis,
        region: T::Node,
        target: T::Node,
        signed_delta: f64,
        is_boundary_check: bool,
    ) -> bool {
        let factor = self.direction_factor(axis, region);
        let delta = factor * signed_delta;
        let target_in_region = self.tree.contains(region, target);

        let mut available_forward = 0.0;
        let mut available_backward = 0.0;
        let mut current = Some(target);

        while let Some(node) = current {
            let metrics = self.tree.scroll_metrics(node, axis);
            let remaining = metrics.size - metrics.client - factor * metrics.position;
            if (metrics.position != 0.0 || remaining != 0.0)
                && self.element_can_be_scrolled(node, axis)
            {
                available_forward += remaining;
                available_backward += metrics.position;
            }

            current = self.tree.composed_parent(node);
            let keep_walking = match current {
                Some(next) if target_in_region => self.tree.contains(region, next),
                Some(next) => !self.tree.is_body(next),
                None => false,
            };
            if !keep_walking {
                break;
            }
        }

        if delta > 0.0 {
            if is_boundary_check {
                available_forward.abs() < BOUNDARY_EPSILON
            } else {
                delta > available_forward
            }
        } else if is_boundary_check {
            available_backward.abs() < BOUNDARY_EPSILON
        } else {
            -delta > available_backward
        }
    }

    fn outermost_shadow_host(&self, node: T::Node) -> Option<T::Node> {
        let mut outermost = None;
        let mut current = Some(node);
        while let Some(candidate) = current {
            match self.tree.shadow_host(candidate) {
                Some(host) => {
                    outermost = Some(host);
                    current = Some(host);
                }
                None => current = self.tree.parent_node(candidate),
            }
        }
        outermost
    }
}

/// Parse the leading integer of a computed CSS length, e.g. `"12.5px"` → 12.
///
/// Anything without a leading integer reads as 0.
#[must_use]
pub fn parse_css_px(value: &str) -> f64 {
    let trimmed = value.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1.0, &trimmed[1..]),
        Some(b'+') => (1.0, &trimmed[1..]),
        _ => (1.0, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end]
        .parse::<f64>()
        .map_or(0.0, |magnitude| sign * magnitude)
}
