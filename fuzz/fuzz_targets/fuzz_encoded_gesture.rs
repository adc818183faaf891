#![no_main]

use libfuzzer_sys::fuzz_target;
use scrollfence_web::path_snapshot::WebNodeId;
use scrollfence_web::{HostCommand, LayoutSnapshot, ScrollFenceSession, SessionConfig};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 8192 {
        return;
    }

    let Ok(mut session) = ScrollFenceSession::new(
        SessionConfig {
            excluded: vec![Some(WebNodeId(3)), None],
            log_capacity: 8,
            ..SessionConfig::default()
        },
        LayoutSnapshot::new(1000.0, 985.0),
    ) else {
        return;
    };
    session.enable();
    session.drain_commands();

    // Parsing and dispatch must never panic, whatever the payload.
    let Ok(Some(entry)) = session.dispatch_json(text) else {
        return;
    };
    session.end_frame();

    let commands = session.drain_commands();
    if entry.prevent_default {
        assert!(entry.verdict.is_cancel(), "prevent_default without cancel");
        assert_eq!(commands, vec![HostCommand::PreventDefault { sequence: entry.sequence }]);
    } else {
        assert!(commands.is_empty(), "unexpected host commands: {commands:?}");
    }
    assert!(session.coordinator().queue().is_empty(), "queue survived end_frame");
});
