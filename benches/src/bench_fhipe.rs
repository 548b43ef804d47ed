use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use fe::Fhipe;
use fe::traits::FEScheme;
use rand::Rng;
use rand::rngs::OsRng;
use std::hint::black_box;

const MAX_VALUE: i64 = 255;

fn bench_fhipe(c: &mut Criterion) {
    let mut group = c.benchmark_group("BLS12-381 FHIPE");
    group.sample_size(10);

    for n in [16usize, 64, 130] {
        let mut rng = OsRng;
        let x: Vec<i64> = (0..n).map(|_| rng.gen_range(0..=MAX_VALUE)).collect();
        let y: Vec<i64> = (0..n).map(|_| rng.gen_range(0..=MAX_VALUE)).collect();

        let bound = (MAX_VALUE * MAX_VALUE) as u64 * n as u64;
        let scheme = Fhipe::setup(n, bound).unwrap();
        let msk = scheme.generate_master_key(&mut rng);

        group.bench_with_input(BenchmarkId::new("DeriveKey", n), &x, |b, x| {
            b.iter(|| scheme.derive_key(&mut rng, black_box(x), &msk))
        });
        group.bench_with_input(BenchmarkId::new("Encrypt", n), &y, |b, y| {
            b.iter(|| scheme.encrypt(&mut rng, black_box(y), &msk))
        });

        let sk = scheme.derive_key(&mut rng, &x, &msk).unwrap();
        let ct = scheme.encrypt(&mut rng, &y, &msk).unwrap();
        group.bench_function(BenchmarkId::new("Decrypt", n), |b| {
            b.iter(|| scheme.decrypt(black_box(&ct), black_box(&sk)))
        });
    }
}

criterion_group!(benches, bench_fhipe);
criterion_main!(benches);
