#![forbid(unsafe_code)]

//! Scrollbar gap measurement.
//!
//! The gap is the width the native scrollbar occupies: viewport width minus
//! the root element's client width, corrected by the body's horizontal insets
//! in the configured [`GapMode`]. It is clamped at zero, so a page without a
//! scrollbar (or a host reporting zeros) yields a no-op compensation.

use crate::host::DocumentHost;
use crate::scroll_probe::parse_css_px;

/// Which body box edge absorbs the gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GapMode {
    Padding,
    #[default]
    Margin,
}

impl GapMode {
    /// Computed-style properties for `(left, top, right)`.
    #[must_use]
    pub const fn inset_properties(self) -> [&'static str; 3] {
        match self {
            Self::Padding => ["padding-left", "padding-top", "padding-right"],
            Self::Margin => ["margin-left", "margin-top", "margin-right"],
        }
    }
}

/// Body insets and the resulting scrollbar gap, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GapMeasurement {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub gap: f64,
}

impl GapMeasurement {
    /// Gap from raw layout numbers. Never negative.
    #[must_use]
    pub fn from_layout(
        viewport_width: f64,
        client_width: f64,
        [left, top, right]: [f64; 3],
    ) -> Self {
        Self {
            left,
            top,
            right,
            gap: (viewport_width - client_width + right - left).max(0.0),
        }
    }
}

/// Read the current layout from `host` and compute the gap.
pub fn measure_gap<H: DocumentHost + ?Sized>(host: &H, mode: GapMode) -> GapMeasurement {
    let insets = mode.inset_properties().map(|property| {
        host.body_computed_style(property)
            .map_or(0.0, |value| parse_css_px(&value))
    });
    GapMeasurement::from_layout(host.viewport_width(), host.document_client_width(), insets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use crate::memory::MemoryDocument;

    #[test]
    fn classic_scrollbar_gap() {
        let doc = MemoryDocument::new(1000.0, 985.0);
        assert_eq!(measure_gap(&doc, GapMode::Margin).gap, 15.0);
    }

    #[test]
    fn over_measurement_clamps_to_zero() {
        let doc = MemoryDocument::new(1000.0, 1005.0);
        assert_eq!(measure_gap(&doc, GapMode::Margin).gap, 0.0);
    }

    #[test]
    fn zero_layout_is_zero_gap() {
        let doc = MemoryDocument::new(0.0, 0.0);
        assert_eq!(measure_gap(&doc, GapMode::Padding), GapMeasurement::default());
    }

    #[test]
    fn insets_follow_gap_mode() {
        let mut doc = MemoryDocument::new(1000.0, 985.0);
        doc.set_body_style("margin-left", "8px");
        doc.set_body_style("margin-top", "4px");
        doc.set_body_style("margin-right", "8px");
        doc.set_body_style("padding-left", "20px");
        doc.set_body_style("padding-right", "0px");

        let margin = measure_gap(&doc, GapMode::Margin);
        assert_eq!(
            margin,
            GapMeasurement {
                left: 8.0,
                top: 4.0,
                right: 8.0,
                gap: 15.0,
            }
        );

        // 1000 - 985 + 0 - 20 < 0
        let padding = measure_gap(&doc, GapMode::Padding);
        assert_eq!(padding.left, 20.0);
        assert_eq!(padding.gap, 0.0);
    }
}
