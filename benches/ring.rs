//! Definition of benchmarks.

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use ringtape::RingBuffer;
use std::time::Duration;
use tempfile::TempDir;

// About 64 MB of memory for benchmarks.
const CAPACITY: usize = 64 * 1024 * 1024;

// Number of bytes to write/read at a time, deliberately not a divisor of capacity.
const BATCH_SIZE: usize = 4099;

criterion_main!(benches);
criterion_group! {
    name = benches;
    config = Criterion::default()
        .warm_up_time(Duration::from_secs(3))
        .measurement_time(Duration::from_secs(15));
    targets = anonymous_bench, file_backed_bench
}

fn anonymous_bench(c: &mut Criterion) {
    let ring = RingBuffer::anonymous(CAPACITY).expect("Should allocate ring buffer");
    run_bench(c, ring, "Anonymous");
}

fn file_backed_bench(c: &mut Criterion) {
    let dir = TempDir::new().expect("Should create temp dir");
    let ring = RingBuffer::file_backed(dir.path().join("ring"), CAPACITY)
        .expect("Should map ring buffer");

    run_bench(c, ring, "FileBacked");
}

fn run_bench(c: &mut Criterion, mut ring: RingBuffer, name: &str) {
    let bytes: Vec<u8> = (0..BATCH_SIZE).map(|i| i as u8).collect();
    let mut buf = vec![0u8; BATCH_SIZE];

    let mut group = c.benchmark_group(name);
    group.throughput(Throughput::BytesDecimal(BATCH_SIZE as _));
    group.bench_function("write", |bencher| bencher.iter(|| ring.write(&bytes)));
    group.bench_function("read", |bencher| bencher.iter(|| ring.read(&mut buf)));
    group.finish();

    ring.destroy().expect("Should destroy ring buffer");
}
