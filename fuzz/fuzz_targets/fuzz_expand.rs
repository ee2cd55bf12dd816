#![no_main]

use libfuzzer_sys::fuzz_target;

// Accepts arbitrary bytes, attempts to parse as JSON, feeds to expand_value().
// Goal: no panics, even on malformed input. String payloads also go through
// the ID parser and flatten.
fuzz_target!(|data: &[u8]| {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        let _ = arm_identity_core::expand_value(&value, &Default::default());

        if let Ok(list) = serde_json::from_value::<arm_identity_core::UserAssignedList>(value) {
            let _ = arm_identity_core::flatten(Some(&list));
        }
    }
    if let Ok(raw) = std::str::from_utf8(data) {
        let _ = arm_identity_core::UserAssignedIdentityId::parse_insensitively(raw);
    }
});
