use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use doe::design::{Design, TwoLevelFullFactorial};
use doe::screening::{screen_responses, simulate_null, ContrastMatrix, ScreeningConfig};
use doe::FactorSpec;

fn design(k: usize) -> doe::DesignMatrix {
    let spec = FactorSpec::new((0..k).map(|i| (format!("X{i}"), vec![-1.0, 1.0]))).unwrap();
    TwoLevelFullFactorial.build(&spec).unwrap()
}

fn responses(n: usize) -> Vec<f64> {
    (0..n).map(|r| 50.0 + ((r * 37) % 11) as f64).collect()
}

fn bench_contrast_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("ContrastMatrix");

    for k in [3, 5, 7] {
        let design = design(k);
        group.bench_with_input(BenchmarkId::from_parameter(1 << k), &design, |b, design| {
            b.iter(|| ContrastMatrix::new(design).unwrap());
        });
    }
    group.finish();
}

fn bench_null_distribution(c: &mut Criterion) {
    let mut group = c.benchmark_group("NullDistribution");
    group.sample_size(20);

    for effects in [7, 15, 31] {
        group.bench_with_input(BenchmarkId::from_parameter(effects), &effects, |b, &effects| {
            let config = ScreeningConfig::default();
            b.iter(|| simulate_null(effects, 1.0, &config, None).unwrap());
        });
    }
    group.finish();
}

fn bench_screen(c: &mut Criterion) {
    let mut group = c.benchmark_group("Screen");
    group.sample_size(20);

    let design = design(3);
    let y = responses(8);
    group.bench_function("sequential_2^3", |b| {
        b.iter(|| screen_responses(&design, &y, &ScreeningConfig::default()).unwrap());
    });

    #[cfg(feature = "parallel")]
    group.bench_function("parallel_2^3", |b| {
        b.iter(|| doe::parallel::par_screen(&design, &y, &ScreeningConfig::default()).unwrap());
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_contrast_matrix,
    bench_null_distribution,
    bench_screen
);
criterion_main!(benches);
