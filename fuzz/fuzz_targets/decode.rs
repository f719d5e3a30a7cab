#![no_main]
use libfuzzer_sys::fuzz_target;
use lz4_grind::decompress_block;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must either decode or error, never panic, and never
    // produce more output than allowed.
    let mut out = Vec::new();
    if decompress_block(data, &mut out, 1 << 20).is_ok() {
        assert!(out.len() <= 1 << 20);
    }
});
