#![forbid(unsafe_code)]

//! `scrollfence-web` drives a [`GestureInterceptionCoordinator`] from a JS host.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding page pushes encoded events and layout
//!   readings; the session never touches a live DOM.
//! - **Command output**: every DOM mutation the lock needs (marker attribute,
//!   compensation stylesheet, listener registration, `preventDefault`) comes
//!   back as a [`HostCommand`] the host applies in order.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! This crate does not bind to `wasm-bindgen`. It is the building block a
//! thin JS glue layer wraps.

pub mod path_snapshot;

#[cfg(feature = "input-parser")]
pub mod input_parser;

use std::cell::Cell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use scrollfence_core::coordinator::{
    DispatchSource, ExcludedElement, GestureInterceptionCoordinator, RemoveScrollOptions, Verdict,
};
use scrollfence_core::event::{GestureEvent, GestureKind};
use scrollfence_core::gap::GapMode;
use scrollfence_core::host::{DocumentHost, ListenerOptions, StyleSheetId};
use scrollfence_core::scroll_probe::DomScrollProbe;

use crate::path_snapshot::{PathSnapshot, WebNodeId};

/// Default number of dispatch records kept in the session log.
pub const DEFAULT_LOG_CAPACITY: usize = 256;

/// Web session error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// `log_capacity` must be at least one.
    InvalidLogCapacity,
    /// No exclusion slot with this index was configured.
    UnknownExclusionSlot(usize),
    /// The encoded event could not be parsed.
    #[cfg(feature = "input-parser")]
    Parse(input_parser::InputParseError),
}

impl core::fmt::Display for SessionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidLogCapacity => write!(f, "log capacity must be at least 1"),
            Self::UnknownExclusionSlot(index) => write!(f, "unknown exclusion slot: {index}"),
            #[cfg(feature = "input-parser")]
            Self::Parse(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SessionError {}

#[cfg(feature = "input-parser")]
impl From<input_parser::InputParseError> for SessionError {
    fn from(err: input_parser::InputParseError) -> Self {
        Self::Parse(err)
    }
}

// ---------------------------------------------------------------------------
// Host side
// ---------------------------------------------------------------------------

/// Layout readings the host supplies before enabling the lock.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutSnapshot {
    /// `window.innerWidth`.
    pub viewport_width: f64,
    /// `document.documentElement.clientWidth`.
    pub client_width: f64,
    /// Computed body styles by property name (`margin-left`, `padding-top`, ...).
    pub body_style: HashMap<String, String>,
}

impl LayoutSnapshot {
    #[must_use]
    pub fn new(viewport_width: f64, client_width: f64) -> Self {
        Self {
            viewport_width,
            client_width,
            body_style: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_body_style(mut self, property: &str, value: &str) -> Self {
        self.body_style.insert(property.to_owned(), value.to_owned());
        self
    }
}

/// DOM mutation the host must apply, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    SetBodyAttribute { name: String, value: String },
    RemoveBodyAttribute { name: String },
    InsertStylesheet { id: StyleSheetId, css: String },
    RemoveStylesheet { id: StyleSheetId },
    AddListener { kind: GestureKind, passive: bool },
    RemoveListener { kind: GestureKind, passive: bool },
    /// Call `preventDefault()` on the event dispatched with this sequence.
    PreventDefault { sequence: u64 },
}

/// [`DocumentHost`] that records mutations as [`HostCommand`]s.
#[derive(Debug, Default)]
struct CommandHost {
    layout: LayoutSnapshot,
    commands: Vec<HostCommand>,
    next_stylesheet: u64,
}

impl DocumentHost for CommandHost {
    fn viewport_width(&self) -> f64 {
        self.layout.viewport_width
    }

    fn document_client_width(&self) -> f64 {
        self.layout.client_width
    }

    fn body_computed_style(&self, property: &str) -> Option<String> {
        self.layout.body_style.get(property).cloned()
    }

    fn set_body_attribute(&mut self, name: &str, value: &str) {
        self.commands.push(HostCommand::SetBodyAttribute {
            name: name.to_owned(),
            value: value.to_owned(),
        });
    }

    fn remove_body_attribute(&mut self, name: &str) {
        self.commands.push(HostCommand::RemoveBodyAttribute {
            name: name.to_owned(),
        });
    }

    fn insert_stylesheet(&mut self, css: &str) -> StyleSheetId {
        let id = StyleSheetId(self.next_stylesheet);
        self.next_stylesheet += 1;
        self.commands.push(HostCommand::InsertStylesheet {
            id,
            css: css.to_owned(),
        });
        id
    }

    fn remove_stylesheet(&mut self, id: StyleSheetId) {
        self.commands.push(HostCommand::RemoveStylesheet { id });
    }

    fn add_listener(&mut self, kind: GestureKind, options: ListenerOptions) {
        self.commands.push(HostCommand::AddListener {
            kind,
            passive: options.passive,
        });
    }

    fn remove_listener(&mut self, kind: GestureKind, options: ListenerOptions) {
        self.commands.push(HostCommand::RemoveListener {
            kind,
            passive: options.passive,
        });
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One event as delivered by the host, with its composed path.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedGesture {
    pub event: GestureEvent<WebNodeId>,
    pub path: PathSnapshot,
    /// Set when the host delivers the event to an exclusion region's own
    /// capture-phase listener rather than the document listener.
    pub capture_region: Option<WebNodeId>,
}

/// Session configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub no_relative: bool,
    pub no_important: bool,
    pub gap_mode: GapMode,
    pub no_isolation: bool,
    pub allow_pinch_zoom: bool,
    /// Exclusion slots in priority order. `None` is an unmounted region.
    pub excluded: Vec<Option<WebNodeId>>,
    pub log_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            no_relative: false,
            no_important: false,
            gap_mode: GapMode::Margin,
            no_isolation: false,
            allow_pinch_zoom: false,
            excluded: Vec::new(),
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

/// Where a dispatched event was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPhase {
    /// An exclusion region's own listener.
    Capture,
    /// The document-level listener.
    Document,
}

/// Structured record for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchLogEntry {
    pub sequence: u64,
    pub phase: DispatchPhase,
    pub kind: GestureKind,
    pub target: WebNodeId,
    pub verdict: Verdict,
    /// `None` for capture-phase records.
    pub source: Option<DispatchSource>,
    pub prevent_default: bool,
}

/// Scroll lock session for one lock owner on a web page.
#[derive(Debug)]
pub struct ScrollFenceSession {
    host: CommandHost,
    coordinator: GestureInterceptionCoordinator<WebNodeId>,
    slots: Vec<Rc<Cell<Option<WebNodeId>>>>,
    log: VecDeque<DispatchLogEntry>,
    log_capacity: usize,
    next_sequence: u64,
}

impl ScrollFenceSession {
    /// Build a session. The compensation stylesheet command is queued
    /// immediately, measured against `layout`.
    pub fn new(config: SessionConfig, layout: LayoutSnapshot) -> Result<Self, SessionError> {
        if config.log_capacity == 0 {
            return Err(SessionError::InvalidLogCapacity);
        }
        let slots: Vec<Rc<Cell<Option<WebNodeId>>>> = config
            .excluded
            .iter()
            .map(|node| Rc::new(Cell::new(*node)))
            .collect();
        let excluded_elements = slots
            .iter()
            .map(|slot| {
                let slot = Rc::clone(slot);
                ExcludedElement::dynamic(move || slot.get())
            })
            .collect();
        let options = RemoveScrollOptions {
            no_relative: config.no_relative,
            no_important: config.no_important,
            gap_mode: config.gap_mode,
            no_isolation: config.no_isolation,
            allow_pinch_zoom: config.allow_pinch_zoom,
            excluded_elements,
        };
        let mut host = CommandHost {
            layout,
            ..CommandHost::default()
        };
        let coordinator = GestureInterceptionCoordinator::new(&mut host, options);
        Ok(Self {
            host,
            coordinator,
            slots,
            log: VecDeque::with_capacity(config.log_capacity),
            log_capacity: config.log_capacity,
            next_sequence: 0,
        })
    }

    /// Replace the layout readings used by the next (re-)measurement.
    pub fn set_layout(&mut self, layout: LayoutSnapshot) {
        self.host.layout = layout;
    }

    pub fn enable(&mut self) {
        self.coordinator.enable_scroll(&mut self.host);
    }

    pub fn disable(&mut self) {
        self.coordinator.disable_scroll(&mut self.host);
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.coordinator.is_enabled()
    }

    #[must_use]
    pub const fn coordinator(&self) -> &GestureInterceptionCoordinator<WebNodeId> {
        &self.coordinator
    }

    /// Mount, move or unmount the region behind exclusion slot `index`.
    pub fn set_excluded_slot(
        &mut self,
        index: usize,
        node: Option<WebNodeId>,
    ) -> Result<(), SessionError> {
        let slot = self
            .slots
            .get(index)
            .ok_or(SessionError::UnknownExclusionSlot(index))?;
        slot.set(node);
        Ok(())
    }

    /// Route one host event. A cancel that must reach the browser also
    /// queues [`HostCommand::PreventDefault`] for the returned sequence.
    pub fn dispatch(&mut self, gesture: &EncodedGesture) -> DispatchLogEntry {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        let probe = DomScrollProbe::new(&gesture.path);
        let event = &gesture.event;

        let entry = match gesture.capture_region {
            Some(region) if self.coordinator.is_enabled() => {
                let verdict = self.coordinator.capture_in_region(&probe, event, region);
                DispatchLogEntry {
                    sequence,
                    phase: DispatchPhase::Capture,
                    kind: event.kind(),
                    target: event.target(),
                    verdict,
                    source: None,
                    prevent_default: false,
                }
            }
            Some(_) => DispatchLogEntry {
                sequence,
                phase: DispatchPhase::Capture,
                kind: event.kind(),
                target: event.target(),
                verdict: Verdict::Allow,
                source: Some(DispatchSource::Disabled),
                prevent_default: false,
            },
            None => {
                let dispatch = self.coordinator.handle_event(&probe, event);
                DispatchLogEntry {
                    sequence,
                    phase: DispatchPhase::Document,
                    kind: event.kind(),
                    target: event.target(),
                    verdict: dispatch.verdict,
                    source: Some(dispatch.source),
                    prevent_default: dispatch.prevent_default,
                }
            }
        };

        if entry.prevent_default {
            self.host
                .commands
                .push(HostCommand::PreventDefault { sequence });
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(
            sequence,
            phase = ?entry.phase,
            kind = entry.kind.dom_name(),
            verdict = ?entry.verdict,
            "web dispatch"
        );
        self.record(entry);
        entry
    }

    /// Parse and route one JSON-encoded event. Unknown kinds yield `Ok(None)`.
    #[cfg(feature = "input-parser")]
    pub fn dispatch_json(&mut self, json: &str) -> Result<Option<DispatchLogEntry>, SessionError> {
        let Some(gesture) = input_parser::parse_encoded_gesture(json)? else {
            return Ok(None);
        };
        Ok(Some(self.dispatch(&gesture)))
    }

    /// The browser finished dispatching the current event; unconsumed
    /// capture-phase verdicts expire.
    pub fn end_frame(&mut self) {
        self.coordinator.end_dispatch_frame();
    }

    /// Take all pending host commands in emission order.
    pub fn drain_commands(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.host.commands)
    }

    /// Most recent dispatch records, oldest first.
    pub fn log(&self) -> impl Iterator<Item = &DispatchLogEntry> + '_ {
        self.log.iter()
    }

    fn record(&mut self, entry: DispatchLogEntry) {
        if self.log.len() == self.log_capacity {
            self.log.pop_front();
        }
        self.log.push_back(entry);
    }
}
