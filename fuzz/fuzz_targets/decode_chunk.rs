#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // We don't care about the result - we're looking for panics/crashes
    let _ = wexpr::decode_binary(data);
});
