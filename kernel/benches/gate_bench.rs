use criterion::{black_box, criterion_group, criterion_main, Criterion};
use graviton_kernel::{Kernel, KernelConfig, SpectralHash};
use num_bigint::BigUint;

fn bench_spectral_hash(c: &mut Criterion) {
    let hasher = SpectralHash::new();
    let data = b"graviton benchmark block header 1234567890";
    c.bench_function("spectral_signature", |b| {
        b.iter(|| hasher.signature(black_box(data)))
    });
}

fn bench_phi_structure(c: &mut Criterion) {
    let kernel = Kernel::new(KernelConfig::default());
    let data = b"graviton benchmark block header 1234567890";
    c.bench_function("phi_structure", |b| {
        b.iter(|| kernel.compute_phi_structure(black_box(data)))
    });
}

fn bench_gate_pipeline(c: &mut Criterion) {
    let kernel = Kernel::new(KernelConfig::default());
    let difficulty = BigUint::from(50_000u32);
    let data = b"graviton benchmark block header 1234567890";
    c.bench_function("is_valid_block", |b| {
        b.iter(|| kernel.is_valid_block(black_box(data), &difficulty, 1))
    });
}

criterion_group!(
    benches,
    bench_spectral_hash,
    bench_phi_structure,
    bench_gate_pipeline
);
criterion_main!(benches);
