#![no_main]
use libfuzzer_sys::fuzz_target;
use oxipatch::bps;

fuzz_target!(|data: &[u8]| {
    // Application must never panic, whatever the source/patch split.
    if data.is_empty() {
        return;
    }
    let split = data.len() / 2;
    let (source, patch) = data.split_at(split);
    let _ = bps::apply_patch(source, patch);

    // Also with an empty source.
    let _ = bps::apply_patch(&[], data);
});
