use criterion::{Criterion, criterion_group, criterion_main};
use cvmatch::embeddings::chunking::{ChunkingConfig, chunk_text};
use std::hint::black_box;

pub fn criterion_benchmark(c: &mut Criterion) {
    // Roughly 50KB of resume-shaped text, enough for a few dozen windows.
    let text = "Seasoned backend engineer. Shipped Rust services on Kubernetes, \
                tuned Postgres for ingest-heavy workloads, and led a team of five. "
        .repeat(400);
    let config = ChunkingConfig::default();

    c.bench_function("chunking", |b| {
        b.iter(|| chunk_text(black_box(&text), black_box(&config)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
