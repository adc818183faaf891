#![no_main]

use libfuzzer_sys::fuzz_target;
use scrollfence_core::scroll_probe::parse_css_px;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 1024 {
        return;
    }

    // Never panics, never NaN.
    let value = parse_css_px(text);
    assert!(!value.is_nan());

    // A value without a leading sign or digit reads as zero.
    let leading = text.trim_start().chars().next();
    if !matches!(leading, Some('0'..='9' | '-' | '+')) {
        assert_eq!(value, 0.0);
    }
});
