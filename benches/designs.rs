use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use doe::design::{
    BoxBehnken, CentralComposite, Design, FractionalFactorial, LatinHypercube, PlackettBurman,
    TwoLevelFullFactorial,
};
use doe::FactorSpec;

fn spec(k: usize) -> FactorSpec {
    FactorSpec::new((0..k).map(|i| (format!("X{i}"), vec![0.0, 1.0]))).unwrap()
}

fn bench_two_level(c: &mut Criterion) {
    let mut group = c.benchmark_group("TwoLevelFullFactorial");

    for k in [3, 6, 10] {
        let spec = spec(k);
        group.bench_with_input(BenchmarkId::from_parameter(k), &spec, |b, spec| {
            b.iter(|| TwoLevelFullFactorial.build(spec).unwrap());
        });
    }
    group.finish();
}

fn bench_fractional(c: &mut Criterion) {
    let mut group = c.benchmark_group("FractionalFactorial");

    // (runs, factors)
    for (runs, k) in [(16, 8), (32, 16), (64, 20)] {
        let spec = spec(k);
        group.bench_with_input(BenchmarkId::new(format!("{runs}runs"), k), &spec, |b, spec| {
            let ff = FractionalFactorial::new(runs);
            b.iter(|| ff.build(spec).unwrap());
        });
    }
    group.finish();
}

fn bench_plackett_burman(c: &mut Criterion) {
    let mut group = c.benchmark_group("PlackettBurman");

    for runs in [12, 20, 28] {
        let spec = spec(runs - 1);
        group.bench_with_input(BenchmarkId::from_parameter(runs), &spec, |b, spec| {
            let pb = PlackettBurman::new(runs);
            b.iter(|| pb.build(spec).unwrap());
        });
    }
    group.finish();
}

fn bench_response_surface(c: &mut Criterion) {
    let mut group = c.benchmark_group("ResponseSurface");
    let spec = spec(6);

    group.bench_function("BoxBehnken_6", |b| {
        b.iter(|| BoxBehnken.build(&spec).unwrap());
    });
    group.bench_function("CentralComposite_6", |b| {
        b.iter(|| CentralComposite::new().build(&spec).unwrap());
    });
    group.bench_function("LatinHypercube_100x6", |b| {
        let lhs = LatinHypercube::new(100, 7);
        b.iter(|| lhs.build(&spec).unwrap());
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_two_level,
    bench_fractional,
    bench_plackett_burman,
    bench_response_surface
);
criterion_main!(benches);
