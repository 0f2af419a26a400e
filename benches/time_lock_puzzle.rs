use ark_std::rand::rngs::StdRng;
use ark_std::rand::SeedableRng;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use pvde::puzzle::{generate_param, generate_puzzle, sigma, solve};

fn bench_sequential_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequential_solve");
    group.sample_size(10);
    for t in [1_000u32, 4_000, 16_000] {
        let param = generate_param(t).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let (_, public) = generate_puzzle(&param, &mut rng).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(t), &t, |b, _| {
            b.iter(|| solve(&public.o, param.t, &param.n))
        });
    }
    group.finish();
}

fn bench_commit_side(c: &mut Criterion) {
    let param = generate_param(1_000).unwrap();
    let mut rng = StdRng::seed_from_u64(8);
    let (_, public) = generate_puzzle(&param, &mut rng).unwrap();

    c.bench_function("sigma_verify", |b| b.iter(|| sigma::verify(&public, &param)));
    c.bench_function("generate_puzzle", |b| {
        b.iter(|| generate_puzzle(&param, &mut rng).unwrap())
    });
}

criterion_group!(benches, bench_sequential_solve, bench_commit_side);
criterion_main!(benches);
