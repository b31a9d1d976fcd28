use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use imxform::filter::{SpectralFilterConfig, SpectralFilterKernel};
use imxform::kernel::KernelLifecycle;
use imxform::traits::SpectralFilter2D;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_image(rows: usize, cols: usize) -> Array2<i32> {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    Array2::from_shape_fn((rows, cols), |_| rng.random_range(0..256))
}

///
/// Lowpass and highpass over a 256x256 image at increasing cutoff radii.
///
fn spectral_filter_256(c: &mut Criterion) {
    let image = random_image(256, 256);
    let mut group = c.benchmark_group("spectral_filter_256");
    for cutoff in [8.0, 32.0, 128.0] {
        let low = SpectralFilterKernel::<f64>::try_new(SpectralFilterConfig::lowpass(cutoff))
            .expect("valid config");
        let high = SpectralFilterKernel::<f64>::try_new(SpectralFilterConfig::highpass(cutoff))
            .expect("valid config");
        group.bench_with_input(BenchmarkId::new("lowpass", cutoff), &image, |b, image| {
            b.iter(|| black_box(low.run_alloc(black_box(image)).expect("power of two")))
        });
        group.bench_with_input(BenchmarkId::new("highpass", cutoff), &image, |b, image| {
            b.iter(|| black_box(high.run_alloc(black_box(image)).expect("power of two")))
        });
    }
    group.finish();
}

criterion_group!(benches, spectral_filter_256);
criterion_main!(benches);
