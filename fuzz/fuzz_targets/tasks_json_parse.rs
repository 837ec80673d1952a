//! Fuzz target for detection_tasks.json parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use visdrone_sft::task::io_json::fuzz_parse_tasks_json;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let _ = fuzz_parse_tasks_json(input);
});
