#![no_main]
use libfuzzer_sys::fuzz_target;
use lz4_grind::{compress_block, decompress_block, max_packed_size, Level};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    // The first byte picks the level so the corpus exercises every parser.
    let level = Level::from_number(5 + (data[0] % 5) as u32).unwrap();
    let data = &data[1..];

    let mut packed = Vec::new();
    let written = compress_block(data, &mut packed, level);
    assert_eq!(written, packed.len());
    assert!(written <= max_packed_size(data.len()));

    let mut depacked = Vec::new();
    decompress_block(&packed, &mut depacked, data.len()).expect("own output must decode");
    assert_eq!(depacked, data);
});
