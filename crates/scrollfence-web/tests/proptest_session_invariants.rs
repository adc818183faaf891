//! Property tests for session-level invariants.
//!
//! 1. The dispatch log never exceeds its capacity and keeps the newest records.
//! 2. Every `PreventDefault` command refers to a logged, cancelled, cancelable dispatch.
//! 3. A disabled session never requests `preventDefault`.
//! 4. Balanced enable/disable leaves no marker, stylesheet or listener behind.

use proptest::prelude::*;
use scrollfence_core::Axis;
use scrollfence_core::event::GestureEvent;
use scrollfence_core::host::{Overflow, ScrollMetrics};
use scrollfence_web::path_snapshot::{NodeSnapshot, PathSnapshot, WebNodeId};
use scrollfence_web::{
    EncodedGesture, HostCommand, LayoutSnapshot, ScrollFenceSession, SessionConfig,
};

// ── Strategies ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Wheel { inside: bool, dy: f64, scroll_top: f64 },
    Capture { dy: f64 },
    EndFrame,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (any::<bool>(), -200.0..200.0f64, 0.0..400.0f64)
            .prop_map(|(inside, dy, scroll_top)| Op::Wheel { inside, dy, scroll_top }),
        2 => (-200.0..200.0f64).prop_map(|dy| Op::Capture { dy }),
        1 => Just(Op::EndFrame),
    ]
}

fn path(inside: bool, scroll_top: f64) -> PathSnapshot {
    if inside {
        PathSnapshot::new(vec![
            NodeSnapshot::element(7, "li"),
            NodeSnapshot::element(3, "dialog")
                .with_overflow(Overflow::Hidden, Overflow::Auto)
                .with_metrics(Axis::Vertical, ScrollMetrics::new(scroll_top, 600.0, 200.0)),
            NodeSnapshot::element(1, "body"),
        ])
    } else {
        PathSnapshot::new(vec![
            NodeSnapshot::element(9, "main"),
            NodeSnapshot::element(1, "body"),
        ])
    }
}

fn gesture(op: &Op) -> Option<EncodedGesture> {
    match *op {
        Op::Wheel { inside, dy, scroll_top } => Some(EncodedGesture {
            event: GestureEvent::wheel(WebNodeId(if inside { 7 } else { 9 }), 0.0, dy),
            path: path(inside, scroll_top),
            capture_region: None,
        }),
        Op::Capture { dy } => Some(EncodedGesture {
            event: GestureEvent::wheel(WebNodeId(7), 0.0, dy),
            path: path(true, 0.0),
            capture_region: Some(WebNodeId(3)),
        }),
        Op::EndFrame => None,
    }
}

fn session(log_capacity: usize) -> ScrollFenceSession {
    ScrollFenceSession::new(
        SessionConfig {
            excluded: vec![Some(WebNodeId(3))],
            log_capacity,
            ..SessionConfig::default()
        },
        LayoutSnapshot::new(1000.0, 985.0),
    )
    .unwrap()
}

fn run(session: &mut ScrollFenceSession, ops: &[Op]) -> u64 {
    let mut dispatched = 0;
    for op in ops {
        match gesture(op) {
            Some(gesture) => {
                session.dispatch(&gesture);
                dispatched += 1;
            }
            None => session.end_frame(),
        }
    }
    dispatched
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Log bound
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn log_never_exceeds_capacity(
        capacity in 1usize..16,
        ops in proptest::collection::vec(op_strategy(), 0..64),
    ) {
        let mut session = session(capacity);
        session.enable();
        let dispatched = run(&mut session, &ops);
        let sequences: Vec<u64> = session.log().map(|entry| entry.sequence).collect();
        prop_assert!(sequences.len() <= capacity);
        let expected_first = dispatched.saturating_sub(sequences.len() as u64);
        for (offset, sequence) in sequences.iter().enumerate() {
            prop_assert_eq!(*sequence, expected_first + offset as u64);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. PreventDefault commands match the log
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn prevent_default_commands_match_log(
        ops in proptest::collection::vec(op_strategy(), 0..48),
    ) {
        let mut session = session(1024);
        session.enable();
        session.drain_commands();
        run(&mut session, &ops);

        let prevented: Vec<u64> = session
            .drain_commands()
            .into_iter()
            .filter_map(|command| match command {
                HostCommand::PreventDefault { sequence } => Some(sequence),
                _ => None,
            })
            .collect();
        let expected: Vec<u64> = session
            .log()
            .filter(|entry| entry.prevent_default)
            .map(|entry| entry.sequence)
            .collect();
        prop_assert_eq!(&prevented, &expected);
        for entry in session.log().filter(|entry| entry.prevent_default) {
            prop_assert!(entry.verdict.is_cancel());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Disabled sessions stay passive
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn disabled_session_never_prevents(
        ops in proptest::collection::vec(op_strategy(), 0..48),
    ) {
        let mut session = session(64);
        session.drain_commands();
        run(&mut session, &ops);
        prop_assert!(session.drain_commands().is_empty());
        prop_assert!(session.log().all(|entry| !entry.prevent_default));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Balanced lifecycle
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn balanced_lifecycle_cleans_up(depth in 1usize..6) {
        let mut session = session(8);
        for _ in 0..depth {
            session.enable();
        }
        for _ in 0..depth {
            session.disable();
        }
        prop_assert!(!session.is_enabled());

        let commands = session.drain_commands();
        let added = commands.iter().filter(|c| matches!(c, HostCommand::AddListener { .. })).count();
        let removed = commands.iter().filter(|c| matches!(c, HostCommand::RemoveListener { .. })).count();
        let inserted = commands.iter().filter(|c| matches!(c, HostCommand::InsertStylesheet { .. })).count();
        let dropped = commands.iter().filter(|c| matches!(c, HostCommand::RemoveStylesheet { .. })).count();
        prop_assert_eq!(added, removed);
        prop_assert_eq!(inserted, dropped);
        prop_assert!(
            matches!(commands.last(), Some(HostCommand::RemoveListener { .. })),
            "last command must be RemoveListener"
        );
    }
}
