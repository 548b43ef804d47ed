use client::Client;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::rngs::OsRng;
use server::Server;
use std::hint::black_box;
use templates::Parameters;

const MAX_VALUE_TEMPLATE: i64 = 255;

fn random_template(length: usize) -> Vec<i64> {
    (0..length)
        .map(|_| OsRng.gen_range(0..=MAX_VALUE_TEMPLATE))
        .collect()
}

/// The four phases of the protocol, each measured on its own
fn bench_protocol(c: &mut Criterion) {
    let mut group = c.benchmark_group("Protocol");
    group.sample_size(10);

    for length in [16usize, 64, 128] {
        let parameters = Parameters::new(length, MAX_VALUE_TEMPLATE, 16).unwrap();
        let reference = random_template(length);
        let probe = random_template(length);
        let server = Server::new(parameters).unwrap();

        group.bench_with_input(BenchmarkId::new("ClientEnrol", length), &reference, |b, r| {
            b.iter(|| Client::enrol(parameters, black_box(r), &mut OsRng).unwrap())
        });

        let (client, enrolment) = Client::enrol(parameters, &reference, &mut OsRng).unwrap();
        let frame = messages::encode(&enrolment).unwrap();
        group.bench_function(BenchmarkId::new("ServerEnrol", length), |b| {
            b.iter(|| server.enrol_bytes(black_box(&frame)).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("ClientAuthentication", length), &probe, |b, p| {
            b.iter(|| client.authenticate(black_box(p), &mut OsRng).unwrap())
        });

        let (message, signature) = client.authenticate(&probe, &mut OsRng).unwrap();
        group.bench_function(BenchmarkId::new("ServerAuthentication", length), |b| {
            b.iter(|| server.authenticate(black_box(&message), black_box(&signature)).unwrap())
        });
    }
}

criterion_group!(benches, bench_protocol);
criterion_main!(benches);
