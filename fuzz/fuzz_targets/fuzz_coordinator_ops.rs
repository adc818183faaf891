#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use scrollfence_core::coordinator::{ExcludedElement, RemoveScrollOptions};
use scrollfence_core::host::{Overflow, ScrollMetrics};
use scrollfence_core::memory::{MemoryDocument, NodeId};
use scrollfence_core::stylesheet::LOCK_ATTRIBUTE;
use scrollfence_core::{Axis, DomScrollProbe, GestureEvent, GestureInterceptionCoordinator};

#[derive(Debug, Arbitrary)]
enum Op {
    Enable,
    Disable,
    Wheel { leaf: bool, dx: i16, dy: i16 },
    TouchStart { x: i16, y: i16 },
    TouchMove { x: i16, y: i16 },
    Capture { dx: i16, dy: i16 },
    ScrollTo { top: u16 },
    EndFrame,
}

fuzz_target!(|ops: Vec<Op>| {
    if ops.len() > 256 {
        return;
    }

    let mut doc = MemoryDocument::new(1000.0, 985.0);
    let page = doc.append_element(doc.body(), "MAIN");
    let region = doc.append_element(doc.body(), "DIALOG");
    doc.set_overflow(region, Overflow::Auto, Overflow::Auto);
    doc.set_scroll_metrics(region, Axis::Vertical, ScrollMetrics::new(0.0, 900.0, 300.0));
    let leaf: NodeId = doc.append_element(region, "P");

    let mut coordinator = GestureInterceptionCoordinator::new(
        &mut doc,
        RemoveScrollOptions {
            excluded_elements: vec![ExcludedElement::Static(region)],
            ..RemoveScrollOptions::default()
        },
    );
    let mut depth: u32 = 0;

    for op in ops {
        match op {
            Op::Enable => {
                coordinator.enable_scroll(&mut doc);
                depth += 1;
            }
            Op::Disable => {
                coordinator.disable_scroll(&mut doc);
                depth = depth.saturating_sub(1);
            }
            Op::Wheel { leaf: on_leaf, dx, dy } => {
                let target = if on_leaf { leaf } else { page };
                let probe = DomScrollProbe::new(&doc);
                let event = GestureEvent::wheel(target, f64::from(dx), f64::from(dy));
                let dispatch = coordinator.handle_event(&probe, &event);
                assert!(!dispatch.prevent_default || dispatch.verdict.is_cancel());
            }
            Op::TouchStart { x, y } => {
                let probe = DomScrollProbe::new(&doc);
                let event = GestureEvent::touch_start(leaf, f64::from(x), f64::from(y));
                coordinator.handle_event(&probe, &event);
            }
            Op::TouchMove { x, y } => {
                let probe = DomScrollProbe::new(&doc);
                let event = GestureEvent::touch_move(leaf, f64::from(x), f64::from(y));
                coordinator.handle_event(&probe, &event);
            }
            Op::Capture { dx, dy } => {
                let probe = DomScrollProbe::new(&doc);
                let event = GestureEvent::wheel(leaf, f64::from(dx), f64::from(dy));
                coordinator.capture_in_region(&probe, &event, region);
            }
            Op::ScrollTo { top } => doc.scroll_to(region, Axis::Vertical, f64::from(top % 600)),
            Op::EndFrame => coordinator.end_dispatch_frame(),
        }

        // Lock bookkeeping must track the enable/disable balance.
        assert_eq!(coordinator.is_enabled(), depth > 0);
        assert_eq!(coordinator.compensator().lock_count(), depth);
        let expected = (depth > 0).then(|| depth.to_string());
        assert_eq!(doc.body_attribute(LOCK_ATTRIBUTE), expected.as_deref());
        assert!(coordinator.compensator().gap().gap >= 0.0);
    }
});
