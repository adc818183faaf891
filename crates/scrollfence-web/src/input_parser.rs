#![forbid(unsafe_code)]

//! JSON input parser for host-encoded DOM gesture events.
//!
//! The JS side serializes each `wheel` / `touchmove` / `touchstart` it
//! receives, together with the composed path the probe needs:
//!
//! ```json
//! {"kind":"wheel","target":7,"dx":0,"dy":40,"mods":4,"cancelable":true,
//!  "region":null,
//!  "path":[{"id":7,"tag":"LI"},
//!          {"id":3,"tag":"DIALOG","overflow_y":"auto",
//!           "scroll_top":0,"scroll_height":600,"client_height":200},
//!          {"id":1,"tag":"BODY"}]}
//! ```
//!
//! `region` marks an inner capture-phase delivery for that exclusion region.
//! Unknown kinds return `Ok(None)`. A missing `cancelable` reads as `false`,
//! so an under-specified event is never blocked.

use scrollfence_core::event::{GestureEvent, GestureKind, Modifiers, TouchPoint};
use scrollfence_core::host::{Overflow, ScrollMetrics, TextDirection};
use serde::Deserialize;

use crate::EncodedGesture;
use crate::path_snapshot::{NodeSnapshot, PathSnapshot, WebNodeId};

/// Errors from parsing encoded input JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputParseError {
    /// Malformed JSON.
    Json(String),
    /// Missing required field.
    MissingField(&'static str),
}

impl core::fmt::Display for InputParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
        }
    }
}

impl std::error::Error for InputParseError {}

#[derive(Debug, Deserialize)]
struct RawTouch {
    x: f64,
    y: f64,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    id: u32,
    #[serde(default)]
    tag: Option<String>,
    #[serde(default)]
    input_type: Option<String>,
    #[serde(default)]
    shadow_root: bool,
    #[serde(default)]
    overflow_x: Option<String>,
    #[serde(default)]
    overflow_y: Option<String>,
    #[serde(default)]
    scroll_left: f64,
    #[serde(default)]
    scroll_width: f64,
    #[serde(default)]
    client_width: f64,
    #[serde(default)]
    scroll_top: f64,
    #[serde(default)]
    scroll_height: f64,
    #[serde(default)]
    client_height: f64,
    #[serde(default)]
    dir: Option<String>,
}

/// Internal deserialization target for one encoded gesture.
#[derive(Debug, Deserialize)]
struct RawGesture {
    kind: String,
    #[serde(default)]
    target: Option<u32>,
    #[serde(default)]
    dx: Option<f64>,
    #[serde(default)]
    dy: Option<f64>,
    #[serde(default)]
    mods: Option<i32>,
    #[serde(default)]
    cancelable: Option<bool>,
    #[serde(default)]
    touches: Vec<RawTouch>,
    #[serde(default)]
    changed: Vec<RawTouch>,
    #[serde(default)]
    region: Option<u32>,
    #[serde(default)]
    path: Vec<RawNode>,
}

/// Parse one host-encoded gesture.
///
/// Returns `Err` for malformed JSON, a missing `target`, or a path element
/// without a tag.
pub fn parse_encoded_gesture(json: &str) -> Result<Option<EncodedGesture>, InputParseError> {
    let raw: RawGesture =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;

    let Some(kind) = GestureKind::from_dom_name(&raw.kind) else {
        return Ok(None);
    };
    let target = WebNodeId(raw.target.ok_or(InputParseError::MissingField("target"))?);
    let cancelable = raw.cancelable.unwrap_or(false);

    let event = match kind {
        GestureKind::Wheel => GestureEvent::Wheel {
            target,
            delta_x: raw.dx.unwrap_or(0.0),
            delta_y: raw.dy.unwrap_or(0.0),
            modifiers: parse_modifiers(raw.mods),
            cancelable,
        },
        GestureKind::TouchMove => GestureEvent::TouchMove {
            target,
            touches: raw.touches.iter().map(touch_point).collect(),
            changed_touches: raw.changed.iter().map(touch_point).collect(),
            cancelable,
        },
        GestureKind::TouchStart => GestureEvent::TouchStart {
            target,
            changed_touches: raw.changed.iter().map(touch_point).collect(),
        },
    };

    let nodes = raw
        .path
        .into_iter()
        .map(node_snapshot)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(EncodedGesture {
        event,
        path: PathSnapshot::new(nodes),
        capture_region: raw.region.map(WebNodeId),
    }))
}

fn parse_modifiers(mods: Option<i32>) -> Modifiers {
    let bits = mods.unwrap_or(0).clamp(0, i32::from(u8::MAX)) as u8;
    Modifiers::from_bits_truncate(bits)
}

fn touch_point(raw: &RawTouch) -> TouchPoint {
    TouchPoint::new(raw.x, raw.y)
}

fn parse_direction(dir: Option<&str>) -> TextDirection {
    match dir {
        Some(value) if value.eq_ignore_ascii_case("rtl") => TextDirection::Rtl,
        _ => TextDirection::Ltr,
    }
}

fn node_snapshot(raw: RawNode) -> Result<NodeSnapshot, InputParseError> {
    let tag = if raw.shadow_root {
        None
    } else {
        let tag = raw.tag.ok_or(InputParseError::MissingField("path.tag"))?;
        Some(tag.to_ascii_uppercase())
    };
    let is_body = tag.as_deref() == Some("BODY");
    Ok(NodeSnapshot {
        id: raw.id,
        tag,
        input_type: raw.input_type,
        overflow_x: raw.overflow_x.as_deref().map_or(Overflow::Visible, Overflow::from_css),
        overflow_y: raw.overflow_y.as_deref().map_or(Overflow::Visible, Overflow::from_css),
        horizontal: ScrollMetrics::new(raw.scroll_left, raw.scroll_width, raw.client_width),
        vertical: ScrollMetrics::new(raw.scroll_top, raw.scroll_height, raw.client_height),
        direction: parse_direction(raw.dir.as_deref()),
        is_body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scrollfence_core::host::DomTree;

    #[test]
    fn wheel_with_modifiers() {
        let parsed = parse_encoded_gesture(
            r#"{"kind":"wheel","target":7,"dx":1.5,"dy":-40,"mods":4,"cancelable":true}"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            parsed.event,
            GestureEvent::Wheel {
                target: WebNodeId(7),
                delta_x: 1.5,
                delta_y: -40.0,
                modifiers: Modifiers::CTRL,
                cancelable: true,
            }
        );
        assert!(parsed.path.is_empty());
        assert_eq!(parsed.capture_region, None);
    }

    #[test]
    fn touchmove_with_two_touches() {
        let parsed = parse_encoded_gesture(
            r#"{"kind":"touchmove","target":2,"cancelable":true,
                "touches":[{"x":1,"y":2},{"x":30,"y":40}],
                "changed":[{"x":30,"y":40}]}"#,
        )
        .unwrap()
        .unwrap();
        assert!(parsed.event.is_pinch());
        assert_eq!(parsed.event.delta(), [30.0, 40.0]);
    }

    #[test]
    fn touchstart_without_changed_touches() {
        let parsed = parse_encoded_gesture(r#"{"kind":"touchstart","target":2}"#)
            .unwrap()
            .unwrap();
        assert_eq!(parsed.event.touch_position(), [0.0, 0.0]);
    }

    #[test]
    fn missing_cancelable_is_not_cancelable() {
        let parsed = parse_encoded_gesture(r#"{"kind":"wheel","target":7,"dy":10}"#)
            .unwrap()
            .unwrap();
        assert!(!parsed.event.is_cancelable());
    }

    #[test]
    fn negative_modifiers_clamp_to_none() {
        let parsed = parse_encoded_gesture(r#"{"kind":"wheel","target":7,"mods":-3}"#)
            .unwrap()
            .unwrap();
        assert!(!parsed.event.is_pinch());
    }

    #[test]
    fn path_nodes_carry_styles_and_metrics() {
        let parsed = parse_encoded_gesture(
            r#"{"kind":"wheel","target":7,"dy":10,"region":3,"path":[
                {"id":7,"tag":"li"},
                {"id":8,"shadow_root":true},
                {"id":3,"tag":"dialog","overflow_y":"auto","dir":"RTL",
                 "scroll_top":10,"scroll_height":600,"client_height":200},
                {"id":1,"tag":"body"}]}"#,
        )
        .unwrap()
        .unwrap();
        let path = &parsed.path;
        assert_eq!(parsed.capture_region, Some(WebNodeId(3)));
        assert_eq!(path.tag_name(WebNodeId(3)), Some("DIALOG"));
        assert_eq!(path.overflow(WebNodeId(3), scrollfence_core::Axis::Vertical), Overflow::Auto);
        assert_eq!(path.direction(WebNodeId(3)), TextDirection::Rtl);
        assert_eq!(
            path.scroll_metrics(WebNodeId(3), scrollfence_core::Axis::Vertical),
            ScrollMetrics::new(10.0, 600.0, 200.0)
        );
        assert_eq!(path.shadow_host(WebNodeId(8)), Some(WebNodeId(3)));
        assert!(path.is_body(WebNodeId(1)));
    }

    #[test]
    fn unknown_kind_returns_none() {
        assert!(
            parse_encoded_gesture(r#"{"kind":"scroll","target":1}"#)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn missing_target_is_error() {
        assert_eq!(
            parse_encoded_gesture(r#"{"kind":"wheel","dy":1}"#).unwrap_err(),
            InputParseError::MissingField("target")
        );
    }

    #[test]
    fn untagged_element_in_path_is_error() {
        assert_eq!(
            parse_encoded_gesture(r#"{"kind":"wheel","target":1,"path":[{"id":1}]}"#).unwrap_err(),
            InputParseError::MissingField("path.tag")
        );
    }

    #[test]
    fn malformed_json_returns_error() {
        let result = parse_encoded_gesture("{not json");
        assert!(matches!(result, Err(InputParseError::Json(_))));
    }
}
