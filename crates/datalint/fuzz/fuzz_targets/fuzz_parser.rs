//! Fuzz target for the data readers.
//!
//! The delimited and JSON-lines readers must never panic on malformed input,
//! whatever delimiter auto-detection settles on.

#![no_main]

use datalint::Parser;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let parser = Parser::new();
    for delimiter in [b',', b'\t', b';', b'|'] {
        let _ = parser.parse_delimited_bytes(data, delimiter);
    }
    let _ = parser.parse_jsonl_bytes(data);
});
