#![no_main]

use libfuzzer_sys::fuzz_target;

use wexpr::WriteOptions;

fuzz_target!(|data: &[u8]| {
    let source = String::from_utf8_lossy(data);
    if let Ok(expr) = wexpr::parse_text(&source) {
        // Whatever parses must survive both encodings unchanged
        let rendered = wexpr::render_text(&expr, &WriteOptions::default(), 0);
        assert_eq!(wexpr::parse_text(&rendered).as_ref(), Ok(&expr));
        assert_eq!(wexpr::decode_binary(&wexpr::encode_binary(&expr)), Ok(expr));
    }
});
