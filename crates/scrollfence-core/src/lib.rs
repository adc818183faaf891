#![forbid(unsafe_code)]

//! Core: scroll containment decisions and scrollbar-gap compensation.
//!
//! # Role in scrollfence
//! `scrollfence-core` decides, for every wheel and touch gesture reaching the
//! document, whether its default action must be cancelled so that scrolling
//! stays inside the permitted regions of a modal surface. It also keeps the
//! page layout stable while the body's scrollbar is hidden.
//!
//! # Primary responsibilities
//! - **GestureInterceptionCoordinator**: listener lifecycle and touch axis
//!   locking. Owns the inner/outer verdict hand-off queue.
//! - **ScrollbarCompensator**: nestable body lock plus the compensating
//!   stylesheet built from a [`gap::GapMeasurement`].
//! - **ScrollProbe**: feasibility and delta-accumulation tests over a
//!   [`host::DomTree`].
//!
//! # How it fits
//! The core performs no I/O. Hosts implement [`host::DomTree`] and
//! [`host::DocumentHost`], deliver [`event::GestureEvent`]s, and call
//! `preventDefault()` when a [`coordinator::Dispatch`] asks for it.
//! `scrollfence-web` wraps this for JS hosts that exchange encoded events.

pub mod compensator;
pub mod coordinator;
pub mod event;
pub mod gap;
pub mod host;
pub mod memory;
pub mod queue;
pub mod scroll_probe;
pub mod stylesheet;

pub use compensator::{CompensatorOptions, ScrollbarCompensator};
pub use coordinator::{
    Dispatch, DispatchSource, ExcludedElement, GestureInterceptionCoordinator,
    RemoveScrollOptions, Verdict,
};
pub use event::{Axis, GestureEvent, GestureKind, Modifiers, TouchPoint};
pub use gap::{GapMeasurement, GapMode};
pub use scroll_probe::{DomScrollProbe, ScrollProbe};
