#![forbid(unsafe_code)]

//! Canonical gesture events delivered by the host.
//!
//! Browsers fire wheel and touch events with overlapping but differently
//! shaped payloads. [`GestureEvent`] normalizes them into one tagged variant so
//! the decision pipeline never has to probe for fields structurally.
//!
//! # Delta convention
//!
//! [`GestureEvent::delta`] returns the value the interception queue keys on:
//! the native `(deltaX, deltaY)` for wheel events, and the first changed
//! touch's client position for touch events. Touch deltas proper are derived
//! by the coordinator from the recorded touch-start position.

use bitflags::bitflags;

/// Scroll axis a gesture moves along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// The other axis.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Dominant axis of a delta vector. Ties resolve to vertical.
    #[must_use]
    pub fn dominant(dx: f64, dy: f64) -> Self {
        if dx.abs() > dy.abs() {
            Self::Horizontal
        } else {
            Self::Vertical
        }
    }

    /// Component of `(dx, dy)` along this axis.
    #[must_use]
    pub const fn component(self, dx: f64, dy: f64) -> f64 {
        match self {
            Self::Horizontal => dx,
            Self::Vertical => dy,
        }
    }
}

/// Kind of DOM event a gesture originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Wheel,
    TouchMove,
    TouchStart,
}

impl GestureKind {
    /// All kinds the coordinator listens for, in registration order.
    pub const LISTENED: [Self; 3] = [Self::Wheel, Self::TouchMove, Self::TouchStart];

    /// DOM event type name.
    #[must_use]
    pub const fn dom_name(self) -> &'static str {
        match self {
            Self::Wheel => "wheel",
            Self::TouchMove => "touchmove",
            Self::TouchStart => "touchstart",
        }
    }

    /// Parse a DOM event type name.
    #[must_use]
    pub fn from_dom_name(name: &str) -> Option<Self> {
        match name {
            "wheel" => Some(Self::Wheel),
            "touchmove" => Some(Self::TouchMove),
            "touchstart" => Some(Self::TouchStart),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_touch(self) -> bool {
        matches!(self, Self::TouchMove | Self::TouchStart)
    }
}

bitflags! {
    /// Keyboard modifiers held during a wheel event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const NONE  = 0b0000;
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const META  = 0b1000;
    }
}

/// A single touch contact in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchPoint {
    pub client_x: f64,
    pub client_y: f64,
}

impl TouchPoint {
    #[must_use]
    pub const fn new(client_x: f64, client_y: f64) -> Self {
        Self { client_x, client_y }
    }

    #[must_use]
    pub const fn as_pair(self) -> [f64; 2] {
        [self.client_x, self.client_y]
    }
}

/// A wheel or touch event as seen by the document-level listener.
///
/// `N` is the host's node handle type.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureEvent<N> {
    Wheel {
        target: N,
        delta_x: f64,
        delta_y: f64,
        modifiers: Modifiers,
        cancelable: bool,
    },
    TouchMove {
        target: N,
        /// Contacts currently on the surface.
        touches: Vec<TouchPoint>,
        /// Contacts that changed in this event.
        changed_touches: Vec<TouchPoint>,
        cancelable: bool,
    },
    TouchStart {
        target: N,
        changed_touches: Vec<TouchPoint>,
    },
}

impl<N: Copy> GestureEvent<N> {
    /// Convenience constructor for a cancelable, unmodified wheel event.
    #[must_use]
    pub const fn wheel(target: N, delta_x: f64, delta_y: f64) -> Self {
        Self::Wheel {
            target,
            delta_x,
            delta_y,
            modifiers: Modifiers::NONE,
            cancelable: true,
        }
    }

    /// Convenience constructor for a cancelable single-finger touch move.
    #[must_use]
    pub fn touch_move(target: N, x: f64, y: f64) -> Self {
        let point = TouchPoint::new(x, y);
        Self::TouchMove {
            target,
            touches: vec![point],
            changed_touches: vec![point],
            cancelable: true,
        }
    }

    /// Convenience constructor for a single-finger touch start.
    #[must_use]
    pub fn touch_start(target: N, x: f64, y: f64) -> Self {
        Self::TouchStart {
            target,
            changed_touches: vec![TouchPoint::new(x, y)],
        }
    }

    #[must_use]
    pub const fn kind(&self) -> GestureKind {
        match self {
            Self::Wheel { .. } => GestureKind::Wheel,
            Self::TouchMove { .. } => GestureKind::TouchMove,
            Self::TouchStart { .. } => GestureKind::TouchStart,
        }
    }

    #[must_use]
    pub fn target(&self) -> N {
        match self {
            Self::Wheel { target, .. }
            | Self::TouchMove { target, .. }
            | Self::TouchStart { target, .. } => *target,
        }
    }

    /// Whether the host permits cancelling the default action.
    ///
    /// Touch starts are observed only and never blocked.
    #[must_use]
    pub const fn is_cancelable(&self) -> bool {
        match self {
            Self::Wheel { cancelable, .. } | Self::TouchMove { cancelable, .. } => *cancelable,
            Self::TouchStart { .. } => false,
        }
    }

    /// Position of the first changed touch, or `(0, 0)` when absent.
    #[must_use]
    pub fn touch_position(&self) -> [f64; 2] {
        match self {
            Self::TouchMove {
                changed_touches, ..
            }
            | Self::TouchStart {
                changed_touches, ..
            } => changed_touches
                .first()
                .map_or([0.0, 0.0], |point| point.as_pair()),
            Self::Wheel { .. } => [0.0, 0.0],
        }
    }

    /// Queue key vector: wheel delta, or touch position for touch events.
    #[must_use]
    pub fn delta(&self) -> [f64; 2] {
        match self {
            Self::Wheel {
                delta_x, delta_y, ..
            } => [*delta_x, *delta_y],
            _ => self.touch_position(),
        }
    }

    /// Two-finger touch or ctrl-wheel, both of which browsers map to zoom.
    #[must_use]
    pub fn is_pinch(&self) -> bool {
        match self {
            Self::Wheel { modifiers, .. } => modifiers.contains(Modifiers::CTRL),
            Self::TouchMove { touches, .. } => touches.len() == 2,
            Self::TouchStart { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn dominant_axis_prefers_vertical_on_tie() {
        assert_eq!(Axis::dominant(3.0, 3.0), Axis::Vertical);
        assert_eq!(Axis::dominant(-4.0, 3.0), Axis::Horizontal);
        assert_eq!(Axis::dominant(0.0, 0.0), Axis::Vertical);
    }

    #[test]
    fn opposite_axis_round_trips() {
        assert_eq!(Axis::Horizontal.opposite(), Axis::Vertical);
        assert_eq!(Axis::Vertical.opposite().opposite(), Axis::Vertical);
    }

    #[test]
    fn touch_without_changed_touches_defaults_to_origin() {
        let event: GestureEvent<u32> = GestureEvent::TouchMove {
            target: 1,
            touches: Vec::new(),
            changed_touches: Vec::new(),
            cancelable: true,
        };
        assert_eq!(event.delta(), [0.0, 0.0]);
    }

    #[test]
    fn wheel_delta_is_native_delta() {
        let event = GestureEvent::wheel(7_u32, 1.5, -20.0);
        assert_eq!(event.delta(), [1.5, -20.0]);
        assert_eq!(event.kind(), GestureKind::Wheel);
        assert_eq!(event.target(), 7);
    }

    #[test]
    fn ctrl_wheel_is_pinch() {
        let event = GestureEvent::Wheel {
            target: 0_u32,
            delta_x: 0.0,
            delta_y: 10.0,
            modifiers: Modifiers::CTRL | Modifiers::SHIFT,
            cancelable: true,
        };
        assert!(event.is_pinch());
        assert!(!GestureEvent::wheel(0_u32, 0.0, 10.0).is_pinch());
    }

    #[test]
    fn two_finger_touch_is_pinch() {
        let event = GestureEvent::TouchMove {
            target: 0_u32,
            touches: vec![TouchPoint::new(0.0, 0.0), TouchPoint::new(5.0, 5.0)],
            changed_touches: vec![TouchPoint::new(5.0, 5.0)],
            cancelable: true,
        };
        assert!(event.is_pinch());
    }

    #[test]
    fn touch_start_is_never_cancelable() {
        assert!(!GestureEvent::touch_start(0_u32, 1.0, 1.0).is_cancelable());
    }

    #[test]
    fn dom_names_round_trip() {
        for kind in GestureKind::LISTENED {
            assert_eq!(GestureKind::from_dom_name(kind.dom_name()), Some(kind));
        }
        assert_eq!(GestureKind::from_dom_name("scroll"), None);
    }
}
