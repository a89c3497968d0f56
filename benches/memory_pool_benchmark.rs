use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tesseract_provider::memory::{self, pool::SecurePool, SecureArray};

/// Benchmark pool allocation for different sizes.
fn bench_allocation_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocation_sizes");

    for size in [16, 32, 256, 4096].iter() {
        group.throughput(Throughput::Bytes(*size as u64));

        group.bench_with_input(BenchmarkId::new("pooled", size), size, |b, &size| {
            let pool = SecurePool::new(64 * 1024);
            b.iter(|| {
                let allocation = pool.allocate(size).unwrap();
                black_box(allocation);
            });
        });

        group.bench_with_input(BenchmarkId::new("unpooled", size), size, |b, &size| {
            b.iter(|| black_box(SecureArray::zeroed(size)));
        });
    }

    group.finish();
}

/// Benchmark secure buffers with and without page locking.
fn bench_page_locking(c: &mut Criterion) {
    let mut group = c.benchmark_group("page_locking");

    for locked in [false, true] {
        let label = if locked { "locked" } else { "unlocked" };
        group.bench_function(label, |b| {
            memory::set_page_locking(locked);
            b.iter(|| black_box(SecureArray::zeroed(4096)));
        });
    }
    memory::set_page_locking(true);

    group.finish();
}

/// Benchmark the exhaustion path.
fn bench_exhaustion(c: &mut Criterion) {
    let pool = SecurePool::new(32);
    let _held = pool.allocate(32).unwrap();

    c.bench_function("exhausted_reserve", |b| {
        b.iter(|| black_box(pool.reserve(16).is_err()));
    });
}

criterion_group!(
    benches,
    bench_allocation_sizes,
    bench_page_locking,
    bench_exhaustion
);
criterion_main!(benches);
