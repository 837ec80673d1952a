//! Fuzz target for single annotation line parsing.
//!
//! Arbitrary UTF-8 lines go through the line parser; any outcome is fine,
//! a panic is not.

#![no_main]

use libfuzzer_sys::fuzz_target;
use visdrone_sft::annotation::parse_annotation_line;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };

    let _ = parse_annotation_line(line);
});
