#![forbid(unsafe_code)]

//! Gesture interception: decides which wheel/touch gestures must be cancelled.
//!
//! [`GestureInterceptionCoordinator`] owns the document-level listener
//! lifecycle, the touch gesture state, and the [`ShouldPreventQueue`]. Every
//! wheel and touchmove event that reaches the document goes through
//! [`GestureInterceptionCoordinator::should_prevent`]:
//!
//! ```text
//! event ──► queued verdict for this tick? ──yes──► reuse it
//!                  │ no
//!                  ▼
//!           first exclusion region containing target? ──yes──► should_cancel_event
//!                  │ no
//!                  ▼
//!           cancel unless no_isolation
//! ```
//!
//! # Touch state machine
//!
//! `IDLE → touchstart → TRACKING(no axis) → first non-zero delta →
//! TRACKING(axis locked)`. The next touchstart re-enters `TRACKING(no axis)`.
//! Zero deltas never lock an axis.
//!
//! # Failure Modes
//!
//! None surface as errors. Missing touch data reads as a zero delta and
//! non-cancelable events are never prevented.

use std::fmt;
use std::rc::Rc;

use crate::compensator::{CompensatorOptions, ScrollbarCompensator};
use crate::event::{Axis, GestureEvent, GestureKind};
use crate::gap::GapMode;
use crate::host::{DocumentHost, ListenerOptions};
use crate::queue::{ShouldPreventQueue, ShouldPreventQueueItem};
use crate::scroll_probe::ScrollProbe;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// An exclusion region, either fixed or resolved at dispatch time.
#[derive(Clone)]
pub enum ExcludedElement<N> {
    Static(N),
    /// Resolved on every dispatch; `None` means "not mounted right now".
    Dynamic(Rc<dyn Fn() -> Option<N>>),
}

impl<N: Copy> ExcludedElement<N> {
    /// Wrap a resolver closure.
    pub fn dynamic(resolve: impl Fn() -> Option<N> + 'static) -> Self {
        Self::Dynamic(Rc::new(resolve))
    }

    #[must_use]
    pub fn resolve(&self) -> Option<N> {
        match self {
            Self::Static(node) => Some(*node),
            Self::Dynamic(resolve) => resolve(),
        }
    }
}

impl<N: fmt::Debug> fmt::Debug for ExcludedElement<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(node) => f.debug_tuple("Static").field(node).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Coordinator configuration.
#[derive(Debug, Clone)]
pub struct RemoveScrollOptions<N> {
    /// Skip forcing `position: relative` on the locked body.
    pub no_relative: bool,
    /// Emit compensation rules without `!important`.
    pub no_important: bool,
    pub gap_mode: GapMode,
    /// Let gestures outside every exclusion region through.
    pub no_isolation: bool,
    /// Never cancel two-finger touches or ctrl-wheel.
    pub allow_pinch_zoom: bool,
    /// Regions evaluated against their own scrollability, first match wins.
    pub excluded_elements: Vec<ExcludedElement<N>>,
}

impl<N> Default for RemoveScrollOptions<N> {
    fn default() -> Self {
        Self {
            no_relative: false,
            no_important: false,
            gap_mode: GapMode::Margin,
            no_isolation: false,
            allow_pinch_zoom: false,
            excluded_elements: Vec::new(),
        }
    }
}

impl<N> RemoveScrollOptions<N> {
    #[must_use]
    pub const fn compensator_options(&self) -> CompensatorOptions {
        CompensatorOptions {
            no_relative: self.no_relative,
            no_important: self.no_important,
            gap_mode: self.gap_mode,
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch results
// ---------------------------------------------------------------------------

/// Outcome for one gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Allow,
    Cancel,
}

impl Verdict {
    #[must_use]
    pub const fn from_cancel(cancel: bool) -> Self {
        if cancel { Self::Cancel } else { Self::Allow }
    }

    #[must_use]
    pub const fn is_cancel(self) -> bool {
        matches!(self, Self::Cancel)
    }
}

/// Which branch of the pipeline produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchSource {
    /// Reused from an inner consumer's queued verdict.
    Queued,
    /// Evaluated against the first containing exclusion region.
    ExclusionRegion,
    /// No region contains the target; isolation policy applied.
    Isolation,
    /// Touch start bookkeeping only.
    TouchStart,
    /// The coordinator is not enabled.
    Disabled,
}

/// Result of one listener invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub verdict: Verdict,
    /// Host must call `preventDefault()`.
    pub prevent_default: bool,
    pub source: DispatchSource,
}

impl Dispatch {
    const fn allow(source: DispatchSource) -> Self {
        Self {
            verdict: Verdict::Allow,
            prevent_default: false,
            source,
        }
    }

    fn decided(verdict: Verdict, cancelable: bool, source: DispatchSource) -> Self {
        Self {
            verdict,
            prevent_default: verdict.is_cancel() && cancelable,
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

/// Document-level scroll containment for one lock owner.
pub struct GestureInterceptionCoordinator<N> {
    options: RemoveScrollOptions<N>,
    compensator: ScrollbarCompensator,
    queue: ShouldPreventQueue<N>,
    touch_start: [f64; 2],
    active_axis: Option<Axis>,
    depth: u32,
}

impl<N: fmt::Debug> fmt::Debug for GestureInterceptionCoordinator<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureInterceptionCoordinator")
            .field("depth", &self.depth)
            .field("lock_count", &self.compensator.lock_count())
            .field("active_axis", &self.active_axis)
            .field("queued", &self.queue.len())
            .finish()
    }
}

impl<N: Copy + Eq + fmt::Debug> GestureInterceptionCoordinator<N> {
    /// Build the coordinator and its compensator. The compensating stylesheet
    /// is injected immediately; the lock marker waits for `enable_scroll`.
    pub fn new<H: DocumentHost + ?Sized>(host: &mut H, options: RemoveScrollOptions<N>) -> Self {
        let compensator = ScrollbarCompensator::new(host, options.compensator_options());
        Self {
            options,
            compensator,
            queue: ShouldPreventQueue::new(),
            touch_start: [0.0, 0.0],
            active_axis: None,
            depth: 0,
        }
    }

    /// Take the lock and attach the document listeners.
    pub fn enable_scroll<H: DocumentHost + ?Sized>(&mut self, host: &mut H) {
        self.compensator.hide_scrollbar(host);
        if self.depth == 0 {
            for kind in GestureKind::LISTENED {
                host.add_listener(kind, ListenerOptions::default());
            }
        }
        self.depth = self.depth.saturating_add(1);
        #[cfg(feature = "tracing")]
        tracing::debug!(depth = self.depth, "scroll containment enabled");
    }

    /// Release the lock; listeners detach when the last nested enable is released.
    pub fn disable_scroll<H: DocumentHost + ?Sized>(&mut self, host: &mut H) {
        self.compensator.show_scrollbar(host);
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            for kind in GestureKind::LISTENED {
                host.remove_listener(kind, ListenerOptions::default());
            }
            self.queue.clear();
            self.active_axis = None;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(depth = self.depth, "scroll containment disabled");
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.depth > 0
    }

    #[must_use]
    pub const fn compensator(&self) -> &ScrollbarCompensator {
        &self.compensator
    }

    #[must_use]
    pub const fn options(&self) -> &RemoveScrollOptions<N> {
        &self.options
    }

    /// Axis locked for the current touch sequence, if any.
    #[must_use]
    pub const fn active_axis(&self) -> Option<Axis> {
        self.active_axis
    }

    #[must_use]
    pub const fn touch_start_position(&self) -> [f64; 2] {
        self.touch_start
    }

    #[must_use]
    pub const fn queue(&self) -> &ShouldPreventQueue<N> {
        &self.queue
    }

    /// Route one event from the document listeners.
    pub fn handle_event<P: ScrollProbe<Node = N>>(
        &mut self,
        probe: &P,
        event: &GestureEvent<N>,
    ) -> Dispatch {
        if !self.is_enabled() {
            return Dispatch::allow(DispatchSource::Disabled);
        }
        match event.kind() {
            GestureKind::TouchStart => {
                self.touch_start(event);
                Dispatch::allow(DispatchSource::TouchStart)
            }
            GestureKind::Wheel | GestureKind::TouchMove => self.should_prevent(probe, event),
        }
    }

    /// Begin a new touch sequence.
    pub fn touch_start(&mut self, event: &GestureEvent<N>) {
        self.touch_start = event.touch_position();
        self.active_axis = None;
    }

    /// Document-level wheel/touchmove listener.
    pub fn should_prevent<P: ScrollProbe<Node = N>>(
        &mut self,
        probe: &P,
        event: &GestureEvent<N>,
    ) -> Dispatch {
        if event.kind() == GestureKind::TouchStart {
            self.touch_start(event);
            return Dispatch::allow(DispatchSource::TouchStart);
        }

        let target = event.target();
        let delta = event.delta();
        let cancelable = event.is_cancelable();

        if let Some(record) = self.queue.take_match(event.kind(), target, delta) {
            #[cfg(feature = "tracing")]
            tracing::trace!(kind = event.kind().dom_name(), should = record.should, "queued verdict reused");
            return Dispatch::decided(
                Verdict::from_cancel(record.should),
                cancelable,
                DispatchSource::Queued,
            );
        }

        let region = self
            .options
            .excluded_elements
            .iter()
            .filter_map(ExcludedElement::resolve)
            .find(|node| probe.contains(*node, target));

        let dispatch = match region {
            Some(region) => Dispatch::decided(
                Verdict::from_cancel(self.should_cancel_event(probe, event, region)),
                cancelable,
                DispatchSource::ExclusionRegion,
            ),
            None => Dispatch::decided(
                Verdict::from_cancel(!self.options.no_isolation),
                cancelable,
                DispatchSource::Isolation,
            ),
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(
            kind = event.kind().dom_name(),
            verdict = ?dispatch.verdict,
            source = ?dispatch.source,
            prevent_default = dispatch.prevent_default,
            "gesture dispatched"
        );
        dispatch
    }

    /// Inner consumer: decide against `region` and queue the verdict so the
    /// document listener reuses it for the same tick.
    pub fn capture_in_region<P: ScrollProbe<Node = N>>(
        &mut self,
        probe: &P,
        event: &GestureEvent<N>,
        region: N,
    ) -> Verdict {
        if event.kind() == GestureKind::TouchStart {
            self.touch_start(event);
            return Verdict::Allow;
        }
        let target = event.target();
        let verdict = Verdict::from_cancel(self.should_cancel_event(probe, event, region));
        self.queue.push(ShouldPreventQueueItem {
            kind: event.kind(),
            delta: event.delta(),
            target,
            should: verdict.is_cancel(),
            shadow_parent: probe.outermost_shadow_host(target),
        });
        verdict
    }

    /// Close the current dispatch frame, expiring unconsumed queued verdicts.
    pub fn end_dispatch_frame(&mut self) {
        self.queue.end_frame();
    }

    /// `true` when `event` must be cancelled to keep scroll inside `region`.
    pub fn should_cancel_event<P: ScrollProbe<Node = N>>(
        &mut self,
        probe: &P,
        event: &GestureEvent<N>,
        region: N,
    ) -> bool {
        if event.is_pinch() {
            return !self.options.allow_pinch_zoom;
        }

        let target = event.target();
        let is_touch = event.kind().is_touch();
        let [dx, dy] = match event {
            GestureEvent::Wheel {
                delta_x, delta_y, ..
            } => [*delta_x, *delta_y],
            GestureEvent::TouchMove {
                changed_touches, ..
            }
            | GestureEvent::TouchStart {
                changed_touches, ..
            } => {
                let Some(point) = changed_touches.first() else {
                    // No changed touch means no direction signal: zero delta,
                    // no axis lock, and nothing to cancel on.
                    #[cfg(feature = "tracing")]
                    tracing::trace!("touch event without changed touches allowed");
                    return false;
                };
                let [x, y] = point.as_pair();
                [self.touch_start[0] - x, self.touch_start[1] - y]
            }
        };

        let move_direction = Axis::dominant(dx, dy);

        // Range inputs consume horizontal drags themselves.
        if is_touch && move_direction == Axis::Horizontal && probe.is_range_input(target) {
            return false;
        }

        let current_axis = if probe.can_scroll_further(move_direction, target) {
            move_direction
        } else {
            let fallback = move_direction.opposite();
            if !probe.can_scroll_further(fallback, target) {
                // Neither axis can scroll: cancel takes precedence over the
                // later allow-if-nothing-scrollable branch, which this makes
                // unreachable. Blocking here stops bleed-through to the page.
                return true;
            }
            fallback
        };

        if self.active_axis.is_none() && is_touch && (dx != 0.0 || dy != 0.0) {
            self.active_axis = Some(current_axis);
            #[cfg(feature = "tracing")]
            tracing::trace!(axis = ?current_axis, "touch axis locked");
        }

        let canceling_axis = self.active_axis.unwrap_or(current_axis);
        probe.resolve_scroll_handling(
            canceling_axis,
            region,
            target,
            canceling_axis.component(dx, dy),
            true,
        )
    }
}
