#![forbid(unsafe_code)]

//! Compensating stylesheet text.
//!
//! Rules emitted, all parameterized by the measured gap:
//!
//! | Selector | Effect |
//! |---|---|
//! | `.with-scroll-bars-hidden` | hide overflow, pad right by the gap |
//! | `body[data-scroll-locked]` | hide overflow, contain overscroll, shift by the gap |
//! | `.right-scroll-bar-position` | move `right` inward by the gap |
//! | `.width-before-scroll-bar` | grow `margin-right` by the gap |
//! | nested copies of the two above | reset to 0 so offsets don't stack |
//! | `body[data-scroll-locked]` | `--removed-body-scroll-bar-size` custom property |

use core::fmt::Write as _;

use crate::gap::{GapMeasurement, GapMode};

/// Body attribute carrying the nested lock count.
pub const LOCK_ATTRIBUTE: &str = "data-scroll-locked";
/// Class for fixed elements pinned to the right edge.
pub const ZERO_RIGHT_CLASS: &str = "right-scroll-bar-position";
/// Class for full-width elements that should stop before the scrollbar.
pub const FULL_WIDTH_CLASS: &str = "width-before-scroll-bar";
/// Class applying the lock to an arbitrary container.
pub const NO_SCROLLBARS_CLASS: &str = "with-scroll-bars-hidden";
/// Custom property exposing the gap.
pub const REMOVED_BAR_SIZE_VARIABLE: &str = "--removed-body-scroll-bar-size";

/// Stylesheet generation switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleOptions {
    /// Force `position: relative` on the locked body.
    pub allow_relative: bool,
    pub gap_mode: GapMode,
    /// Append `!important` to the lock declarations.
    pub important: bool,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            allow_relative: true,
            gap_mode: GapMode::Margin,
            important: true,
        }
    }
}

/// Render the full compensating stylesheet.
#[must_use]
pub fn render_stylesheet(measurement: &GapMeasurement, options: &StyleOptions) -> String {
    let GapMeasurement {
        left,
        top,
        right,
        gap,
    } = *measurement;
    let imp = if options.important { " !important" } else { "" };
    let mut css = String::with_capacity(1024);

    // Writing to a String cannot fail.
    let _ = write!(
        css,
        "\n  .{NO_SCROLLBARS_CLASS} {{\n    overflow: hidden{imp};\n    padding-right: {gap}px{imp};\n  }}\n"
    );

    let _ = write!(
        css,
        "\n  body[{LOCK_ATTRIBUTE}] {{\n    overflow: hidden{imp};\n    overscroll-behavior: contain;\n"
    );
    if options.allow_relative {
        let _ = writeln!(css, "    position: relative{imp};");
    }
    match options.gap_mode {
        GapMode::Margin => {
            let _ = write!(
                css,
                "    padding-left: {left}px;\n    padding-top: {top}px;\n    padding-right: {right}px;\n    margin-left: 0;\n    margin-top: 0;\n    margin-right: {gap}px{imp};\n"
            );
        }
        GapMode::Padding => {
            let _ = writeln!(css, "    padding-right: {gap}px{imp};");
        }
    }
    css.push_str("  }\n");

    let _ = write!(
        css,
        "\n  .{ZERO_RIGHT_CLASS} {{\n    right: {gap}px{imp};\n  }}\n\
         \n  .{FULL_WIDTH_CLASS} {{\n    margin-right: {gap}px{imp};\n  }}\n\
         \n  .{ZERO_RIGHT_CLASS} .{ZERO_RIGHT_CLASS} {{\n    right: 0{imp};\n  }}\n\
         \n  .{FULL_WIDTH_CLASS} .{FULL_WIDTH_CLASS} {{\n    margin-right: 0{imp};\n  }}\n\
         \n  body[{LOCK_ATTRIBUTE}] {{\n    {REMOVED_BAR_SIZE_VARIABLE}: {gap}px;\n  }}\n"
    );
    css
}
