#![forbid(unsafe_code)]

//! Hand-off buffer for verdicts already reached by an inner consumer.
//!
//! An inner consumer (a capture handler closer to the target) evaluates a
//! gesture against its own region and records the verdict here. When the same
//! physical tick reaches the document listener, it finds the record by exact
//! match and reuses the verdict instead of recomputing it.
//!
//! Records live for one dispatch frame: a match consumes the record, and
//! [`ShouldPreventQueue::end_frame`] drops whatever the frame left behind. The
//! buffer is also capped, evicting the oldest record on overflow.

use std::collections::VecDeque;

use crate::event::GestureKind;

/// Upper bound on buffered records.
pub const QUEUE_CAPACITY: usize = 32;

/// A verdict recorded by an inner consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct ShouldPreventQueueItem<N> {
    pub kind: GestureKind,
    pub delta: [f64; 2],
    pub target: N,
    /// `true` when the default action must be cancelled.
    pub should: bool,
    /// Shadow host the event is retargeted to outside its shadow tree.
    pub shadow_parent: Option<N>,
}

impl<N: Copy + Eq> ShouldPreventQueueItem<N> {
    /// Type, target (or shadow host), and exact delta all match.
    #[must_use]
    pub fn matches(&self, kind: GestureKind, target: N, delta: [f64; 2]) -> bool {
        self.kind == kind
            && (self.target == target || self.shadow_parent == Some(target))
            && self.delta == delta
    }
}

#[derive(Debug, Clone)]
struct Entry<N> {
    frame: u64,
    item: ShouldPreventQueueItem<N>,
}

/// Bounded, frame-scoped buffer of [`ShouldPreventQueueItem`]s.
#[derive(Debug, Clone)]
pub struct ShouldPreventQueue<N> {
    entries: VecDeque<Entry<N>>,
    frame: u64,
}

impl<N> Default for ShouldPreventQueue<N> {
    fn default() -> Self {
        Self {
            entries: VecDeque::with_capacity(QUEUE_CAPACITY),
            frame: 0,
        }
    }
}

impl<N: Copy + Eq> ShouldPreventQueue<N> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a verdict for the current frame.
    pub fn push(&mut self, item: ShouldPreventQueueItem<N>) {
        if self.entries.len() == QUEUE_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(Entry {
            frame: self.frame,
            item,
        });
    }

    /// Remove and return the first record matching this event.
    pub fn take_match(
        &mut self,
        kind: GestureKind,
        target: N,
        delta: [f64; 2],
    ) -> Option<ShouldPreventQueueItem<N>> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.item.matches(kind, target, delta))?;
        self.entries.remove(index).map(|entry| entry.item)
    }

    /// Close the current dispatch frame, dropping its unconsumed records.
    pub fn end_frame(&mut self) {
        let closing = self.frame;
        self.entries.retain(|entry| entry.frame > closing);
        self.frame = self.frame.wrapping_add(1);
    }

}

impl<N> ShouldPreventQueue<N> {
    /// Frames closed so far.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
