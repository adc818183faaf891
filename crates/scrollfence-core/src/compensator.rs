#![forbid(unsafe_code)]

//! Reference-counted body lock with scrollbar-gap compensation.
//!
//! # Invariants
//!
//! 1. The lock attribute is present iff `lock_count() > 0`, and its value is
//!    the count.
//! 2. The stylesheet is present iff the compensator is armed.
//! 3. The count never goes below zero. Releasing past balance tears down
//!    whatever is left and stays at zero.
//!
//! Construction arms the compensator (measure + inject). Dropping the count to
//! zero disarms it; a later [`ScrollbarCompensator::hide_scrollbar`] re-arms
//! with a fresh measurement, since layout may have changed in between.

use crate::gap::{GapMeasurement, GapMode, measure_gap};
use crate::host::{DocumentHost, StyleSheetId};
use crate::stylesheet::{LOCK_ATTRIBUTE, StyleOptions, render_stylesheet};

/// Compensator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompensatorOptions {
    /// Skip forcing `position: relative` on the locked body.
    pub no_relative: bool,
    /// Emit declarations without `!important`.
    pub no_important: bool,
    pub gap_mode: GapMode,
}

impl CompensatorOptions {
    #[must_use]
    pub const fn style_options(&self) -> StyleOptions {
        StyleOptions {
            allow_relative: !self.no_relative,
            gap_mode: self.gap_mode,
            important: !self.no_important,
        }
    }
}

/// Nestable lock over `document.body` plus its compensating stylesheet.
#[derive(Debug, Clone)]
pub struct ScrollbarCompensator {
    options: CompensatorOptions,
    count: u32,
    stylesheet: Option<StyleSheetId>,
    gap: GapMeasurement,
}

impl ScrollbarCompensator {
    /// Measure the current gap and inject the stylesheet.
    pub fn new<H: DocumentHost + ?Sized>(host: &mut H, options: CompensatorOptions) -> Self {
        let mut compensator = Self {
            options,
            count: 0,
            stylesheet: None,
            gap: GapMeasurement::default(),
        };
        compensator.arm(host);
        compensator
    }

    fn arm<H: DocumentHost + ?Sized>(&mut self, host: &mut H) {
        self.gap = measure_gap(host, self.options.gap_mode);
        let css = render_stylesheet(&self.gap, &self.options.style_options());
        self.stylesheet = Some(host.insert_stylesheet(&css));
        #[cfg(feature = "tracing")]
        tracing::debug!(gap = self.gap.gap, mode = ?self.options.gap_mode, "scrollbar compensation armed");
    }

    fn disarm<H: DocumentHost + ?Sized>(&mut self, host: &mut H) {
        host.remove_body_attribute(LOCK_ATTRIBUTE);
        if let Some(id) = self.stylesheet.take() {
            host.remove_stylesheet(id);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!("scrollbar compensation released");
    }

    /// Take one more nested lock.
    pub fn hide_scrollbar<H: DocumentHost + ?Sized>(&mut self, host: &mut H) {
        if self.stylesheet.is_none() {
            self.arm(host);
        }
        self.count = self.count.saturating_add(1);
        host.set_body_attribute(LOCK_ATTRIBUTE, &self.count.to_string());
    }

    /// Release one nested lock. At zero the marker and stylesheet are removed.
    pub fn show_scrollbar<H: DocumentHost + ?Sized>(&mut self, host: &mut H) {
        if self.count == 0 {
            #[cfg(feature = "tracing")]
            tracing::warn!("show_scrollbar called without a matching hide_scrollbar");
        }
        self.count = self.count.saturating_sub(1);
        if self.count == 0 {
            self.disarm(host);
        } else {
            host.set_body_attribute(LOCK_ATTRIBUTE, &self.count.to_string());
        }
    }

    #[must_use]
    pub const fn lock_count(&self) -> u32 {
        self.count
    }

    /// Stylesheet currently injected.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.stylesheet.is_some()
    }

    /// Measurement the current stylesheet was built from.
    #[must_use]
    pub const fn gap(&self) -> GapMeasurement {
        self.gap
    }

    #[must_use]
    pub const fn options(&self) -> CompensatorOptions {
        self.options
    }
}
