#![forbid(unsafe_code)]

use criterion::{Criterion, criterion_group, criterion_main};
use scrollfence_core::coordinator::{ExcludedElement, RemoveScrollOptions};
use scrollfence_core::host::{Overflow, ScrollMetrics};
use scrollfence_core::memory::{MemoryDocument, NodeId};
use scrollfence_core::{Axis, DomScrollProbe, GestureEvent, GestureInterceptionCoordinator};
use std::hint::black_box;

/// body > region(scroll-y) > depth nested divs > leaf
fn deep_document(depth: usize) -> (MemoryDocument, NodeId, NodeId) {
    let mut doc = MemoryDocument::new(1280.0, 1265.0);
    let region = doc.append_element(doc.body(), "SECTION");
    doc.set_overflow(region, Overflow::Hidden, Overflow::Auto);
    doc.set_scroll_metrics(region, Axis::Vertical, ScrollMetrics::new(120.0, 4000.0, 600.0));
    let mut leaf = region;
    for _ in 0..depth {
        leaf = doc.append_element(leaf, "DIV");
    }
    (doc, region, leaf)
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch/wheel");

    for depth in [4_usize, 32] {
        let (mut doc, region, leaf) = deep_document(depth);
        let mut coordinator = GestureInterceptionCoordinator::new(
            &mut doc,
            RemoveScrollOptions {
                excluded_elements: vec![ExcludedElement::Static(region)],
                ..RemoveScrollOptions::default()
            },
        );
        coordinator.enable_scroll(&mut doc);
        let probe = DomScrollProbe::new(&doc);
        let event = GestureEvent::wheel(leaf, 0.0, 48.0);

        group.bench_function(format!("region_depth_{depth}"), |b| {
            b.iter(|| {
                let dispatch = coordinator.handle_event(&probe, black_box(&event));
                black_box(dispatch.verdict);
            });
        });

        group.bench_function(format!("queued_depth_{depth}"), |b| {
            b.iter(|| {
                coordinator.capture_in_region(&probe, &event, region);
                let dispatch = coordinator.handle_event(&probe, black_box(&event));
                coordinator.end_dispatch_frame();
                black_box(dispatch.prevent_default);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_dispatch);
criterion_main!(benches);
