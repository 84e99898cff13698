#[macro_use]
extern crate criterion;
extern crate rs_baccarat;

use criterion::{BenchmarkId, Criterion};
use rs_baccarat::baccarat::{MonteCarloBaccarat, SimulationResult};
use rs_baccarat::core::Shoe;

fn simulate_one_round(c: &mut Criterion) {
    let mut sim = MonteCarloBaccarat::new(Shoe::default()).expect("Should be able to create a sim.");
    let mut working = Shoe::default();
    let mut tally = SimulationResult::default();

    c.bench_function("Simulate one round from a full shoe", move |b| {
        b.iter(|| sim.simulate(&mut working, &mut tally).unwrap())
    });
}

fn estimate_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate_batch");
    for used in [0usize, 200, 400] {
        let known: Vec<u8> = (0..used).map(|i| (i % 13) as u8 + 1).collect();
        let base = Shoe::default().remove_known(&known).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(used), &base, |b, base| {
            let mut sim = MonteCarloBaccarat::new(base.clone()).unwrap();
            b.iter(|| sim.estimate(10_000, 1).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, simulate_one_round, estimate_batch);
criterion_main!(benches);
