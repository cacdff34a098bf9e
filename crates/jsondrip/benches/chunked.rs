//! Benchmark – chunked absorption throughput.
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jsondrip::{chunk_utils::produce_chunks, DefaultStreamParser, StreamMode};

/// A deterministic outer array of small records, at least `target_len` bytes
/// long, so every scenario chews through the same amount of data.
fn make_payload(target_len: usize) -> String {
    let mut s = String::with_capacity(target_len + 64);
    s.push('[');
    let mut i = 0u64;
    while s.len() < target_len {
        if i > 0 {
            s.push(',');
        }
        s.push_str(&format!("{{\"id\":{i},\"tag\":\"record-{i}\",\"ok\":true}}"));
        i += 1;
    }
    s.push(']');
    s
}

/// Absorb `payload` in `parts` chunks and count the values produced, so the
/// result can be black-boxed.
fn run_chunks(payload: &str, parts: usize, mode: StreamMode) -> usize {
    let mut parser = DefaultStreamParser::new(mode);
    let mut produced = 0;
    for chunk in produce_chunks(payload, parts) {
        produced += parser.absorb(chunk).unwrap().len();
    }
    produced + parser.finish().unwrap().len()
}

fn bench_chunked(c: &mut Criterion) {
    let payload = make_payload(64 * 1024);

    let mut group = c.benchmark_group("chunked_absorb");
    for &parts in &[1usize, 16, 256, 4096] {
        for (name, mode) in [
            ("single", StreamMode::SingleValue),
            ("unwrap", StreamMode::UnwrapArray),
        ] {
            group.bench_with_input(
                BenchmarkId::new(name, parts),
                &mode,
                |b, &mode| {
                    b.iter(|| black_box(run_chunks(black_box(&payload), parts, mode)));
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_chunked);
criterion_main!(benches);
