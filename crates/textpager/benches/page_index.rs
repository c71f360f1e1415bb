//! Benchmark – `textpager::PageIndexBuilder`
#![allow(missing_docs)]

use std::{io::Cursor, time::Duration};

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use textpager::{Charset, PageIndexBuilder};

/// A deterministic document of exactly `len` bytes made of lines between 20
/// and 120 bytes long.
fn make_document(len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    let mut line = 0usize;
    while out.len() < len {
        let width = 20 + (line * 37) % 100;
        out.extend(std::iter::repeat_n(b'a' + (line % 26) as u8, width.saturating_sub(1)));
        out.push(b'\n');
        line += 1;
    }
    out.truncate(len);
    out
}

fn to_utf16le(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().flat_map(|&b| [b, 0]).collect()
}

fn bench_page_index(c: &mut Criterion) {
    let utf8 = make_document(8 * 1024 * 1024);
    let utf16 = to_utf16le(&utf8[..4 * 1024 * 1024]);

    let mut group = c.benchmark_group("page_index");
    for (name, charset, bytes) in [
        ("utf8", Charset::UTF_8, &utf8),
        ("utf16le", Charset::UTF_16LE, &utf16),
    ] {
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        for &target in &[4 * 1024u64, 128 * 1024] {
            group.bench_with_input(BenchmarkId::new(name, target), &target, |b, &t| {
                b.iter(|| {
                    let index = PageIndexBuilder::build(Cursor::new(black_box(bytes)), charset, t).unwrap();
                    black_box(index.page_count());
                });
            });
        }
    }
    group.finish();
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(3))
            .measurement_time(Duration::from_secs(10));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_page_index }
criterion_main!(benches);
