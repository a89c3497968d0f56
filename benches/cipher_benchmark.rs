use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tesseract_provider::{Direction, InitializationVector, Provider, SymmetricKey};

/// Encrypts `data` in `chunk`-sized updates with the named cipher.
fn encrypt(provider: &Provider, name: &str, data: &[u8], chunk: usize) -> Vec<u8> {
    let mut cipher = provider.create_cipher(name).unwrap();
    let key = SymmetricKey::from(&vec![7u8; cipher.key_length().minimum()][..]);
    let iv = InitializationVector::from(&vec![3u8; cipher.block_size()][..]);
    cipher.setup(Direction::Encode, &key, &iv).unwrap();

    let mut output = Vec::with_capacity(data.len() + cipher.block_size());
    for piece in data.chunks(chunk) {
        output.extend_from_slice(&cipher.update(piece).unwrap());
    }
    output.extend_from_slice(&cipher.finalize().unwrap());
    output
}

/// Benchmark cipher throughput per feature.
fn bench_cipher_throughput(c: &mut Criterion) {
    let provider = Provider::default();
    provider.init();
    let data = vec![42u8; 1024 * 1024];

    let mut group = c.benchmark_group("cipher_throughput");
    group.throughput(Throughput::Bytes(data.len() as u64));

    for name in [
        "aes128-cbc",
        "aes256-cbc-pkcs7",
        "aes256-cfb",
        "blowfish-cbc",
        "des-cbc",
        "tripledes-cbc",
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &data, |b, data| {
            b.iter(|| black_box(encrypt(&provider, name, data, 64 * 1024)));
        });
    }

    group.finish();
}

/// Benchmark the cost of unaligned update chunks.
fn bench_chunk_sizes(c: &mut Criterion) {
    let provider = Provider::default();
    let data = vec![42u8; 256 * 1024];

    let mut group = c.benchmark_group("chunk_sizes");
    group.throughput(Throughput::Bytes(data.len() as u64));

    for chunk in [7, 16, 1000, 4096, 64 * 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(chunk), &chunk, |b, &chunk| {
            b.iter(|| black_box(encrypt(&provider, "aes128-cbc-pkcs7", &data, chunk)));
        });
    }

    group.finish();
}

/// Benchmark digests over 1MB.
fn bench_digests(c: &mut Criterion) {
    let provider = Provider::default();
    let data = vec![42u8; 1024 * 1024];

    let mut group = c.benchmark_group("digest");
    group.throughput(Throughput::Bytes(data.len() as u64));

    for name in ["md5", "sha1", "sha256", "sha512", "ripemd160"] {
        group.bench_function(name, |b| {
            let mut hash = provider.create_hash(name).unwrap();
            b.iter(|| {
                hash.update(&data);
                black_box(hash.finalize());
            });
        });
    }

    group.finish();
}

/// Benchmark PBKDF2 at different iteration counts.
fn bench_pbkdf2(c: &mut Criterion) {
    let provider = Provider::default();
    let kdf = provider.create_kdf("pbkdf2(sha1)").unwrap();
    let salt = InitializationVector::from(&b"benchmark_salt"[..]);

    let mut group = c.benchmark_group("pbkdf2_sha1");
    for iterations in [1u32, 1000, 10_000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(iterations),
            &iterations,
            |b, &iterations| {
                b.iter(|| black_box(kdf.make_key(b"password", &salt, 32, iterations)));
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_cipher_throughput,
    bench_chunk_sizes,
    bench_digests,
    bench_pbkdf2
);
criterion_main!(benches);
