#![no_main]

use cxlgraph_core::{ResolveOptions, extract_records, resolve};
use libfuzzer_sys::fuzz_target;

// Arbitrary text must never panic: either records come back or an error does.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(records) = extract_records(text) {
        let _ = resolve(&records, ResolveOptions { direct_links: true });
    }
});
