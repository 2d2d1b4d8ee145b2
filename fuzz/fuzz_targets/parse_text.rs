#![no_main]

use libfuzzer_sys::fuzz_target;

use wexpr::text;

fuzz_target!(|data: &[u8]| {
    // Invalid UTF-8 must come back as a parse error, not a panic
    let _ = text::parse_bytes(data);
});
