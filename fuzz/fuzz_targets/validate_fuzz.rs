#![no_main]
use libfuzzer_sys::fuzz_target;
use oxipatch::bps;

fuzz_target!(|data: &[u8]| {
    // Validation and inspection must never panic on arbitrary bytes --
    // only return errors.
    let _ = bps::validate_patch(data);
    let _ = bps::patch_info(data);
});
