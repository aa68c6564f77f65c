use std::hint::black_box;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fastica::{ContrastType, FastIca, FastIcaConfig, Strategy};
use ndarray::Array2;

fn generate_data(n_features: usize, n_samples: usize, seed: u64) -> Array2<f64> {
    let mut data = Array2::<f64>::zeros((n_features, n_samples));
    let mut state = seed;

    for i in 0..n_features {
        for j in 0..n_samples {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let u = (state >> 33) as f64 / (1u64 << 31) as f64;
            // Laplace distribution
            data[[i, j]] = if u < 0.5 {
                (2.0 * u).max(f64::MIN_POSITIVE).ln()
            } else {
                -(2.0 * (1.0 - u)).max(f64::MIN_POSITIVE).ln()
            };
        }
    }

    // Mix with random matrix, kept diagonally dominant so it stays invertible
    let mut mixing = Array2::<f64>::zeros((n_features, n_features));
    for i in 0..n_features {
        for j in 0..n_features {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            mixing[[i, j]] = (state >> 33) as f64 / (1u64 << 31) as f64 - 0.5;
        }
        mixing[[i, i]] += n_features as f64;
    }

    mixing.dot(&data)
}

fn bench_fastica(c: &mut Criterion) {
    let mut group = c.benchmark_group("fastica");

    for n_samples in [1000, 10000] {
        for n_features in [4, 16] {
            let data = generate_data(n_features, n_samples, 42);

            for strategy in [Strategy::Symmetric, Strategy::Deflation] {
                let config = FastIcaConfig::builder()
                    .contrast(ContrastType::logcosh())
                    .strategy(strategy)
                    .max_iter(1000)
                    .random_state(42)
                    .build();

                group.bench_with_input(
                    BenchmarkId::new(
                        format!("{}x{}", n_features, n_samples),
                        strategy.to_string(),
                    ),
                    &data,
                    |b, data| b.iter(|| FastIca::fit_with_config(black_box(data), &config)),
                );
            }
        }
    }

    group.finish();
}

fn criterion_config() -> Criterion {
    Criterion::default()
        .measurement_time(std::time::Duration::from_secs(15))
        .sample_size(20)
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = bench_fastica
}
criterion_main!(benches);
