use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lz4_grind::{compress_block, decompress_block, Level};
use rand::prelude::*;

fn criterion_benchmark(c: &mut Criterion) {
    // Half structured, half noise, like a typical binary.
    let mut data = vec![0u8; 1_000_000];
    thread_rng().fill(&mut data[200_000..600_000]);

    let mut group = c.benchmark_group("compress");
    for level in [Level::L5, Level::L7, Level::L9] {
        group.bench_with_input(
            format!("level {}", level.number()),
            &data.as_slice(),
            |b, input| {
                b.iter(|| {
                    let mut out = Vec::new();
                    compress_block(black_box(input), &mut out, level)
                })
            },
        );
    }
    group.finish();

    let mut packed = Vec::new();
    compress_block(&data, &mut packed, Level::L9);

    c.bench_function("decompress", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            decompress_block(black_box(&packed), &mut out, usize::MAX).unwrap();
            out
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
