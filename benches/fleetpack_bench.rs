//! Criterion benchmarks for fitness evaluation and full searches.
//!
//! Inventories come from the seeder so sizes match realistic warehouse
//! days.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use u_fleetpack::ga::{FillProbability, FitnessEvaluator, GenomeFactory, SearchConfig, SearchRunner};
use u_fleetpack::io::generate_catalog;
use u_fleetpack::model::{Catalog, Fleet};

fn inventory(n: u64) -> (Catalog, Fleet) {
    let mut rng = StdRng::seed_from_u64(42);
    let catalog = generate_catalog(n, &mut rng).expect("valid count");
    (catalog, Fleet::uniform(10, 80.0).expect("valid fleet"))
}

// ===========================================================================
// Uncached evaluation: a fresh evaluator per iteration batch
// ===========================================================================

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    for &n in &[100u64, 500, 2000] {
        let (catalog, fleet) = inventory(n);
        let factory = GenomeFactory::new(&catalog, &fleet, FillProbability::CapacityRatio);
        let mut rng = StdRng::seed_from_u64(1);
        let genomes: Vec<_> = (0..100).map(|_| factory.random_genome(&mut rng)).collect();

        group.bench_with_input(BenchmarkId::from_parameter(n), &genomes, |b, genomes| {
            b.iter(|| {
                let evaluator = FitnessEvaluator::new(&catalog, &fleet, 1024).expect("capacity");
                for genome in genomes {
                    black_box(evaluator.score(black_box(genome)));
                }
            })
        });
    }
    group.finish();
}

// ===========================================================================
// Full search
// ===========================================================================

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    for (n, pop) in [(100u64, 50usize), (500, 100)] {
        let (catalog, fleet) = inventory(n);
        let config = SearchConfig::fast()
            .with_population_size(pop)
            .with_repetition_limit(50)
            .with_verbose(false)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::new(format!("n{}_p{}", n, pop), n),
            &config,
            |b, config| {
                b.iter(|| {
                    let result = SearchRunner::run(black_box(&catalog), &fleet, config);
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_search);
criterion_main!(benches);
