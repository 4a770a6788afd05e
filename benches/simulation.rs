use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use microcosm::config::Config;
use microcosm::genetics::traits::TraitVector;
use microcosm::{World, DEFAULT_FRAME_DT};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn quiet_config(population: usize) -> Config {
    let mut config = Config::default();
    config.world.initial_population = population;
    config.world.max_population = population * 4;
    config
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");
    for population in [20usize, 100, 300] {
        group.bench_with_input(
            BenchmarkId::from_parameter(population),
            &population,
            |b, &population| {
                let mut world = World::with_seed(quiet_config(population), 42);
                b.iter(|| world.step(black_box(DEFAULT_FRAME_DT)));
            },
        );
    }
    group.finish();
}

fn bench_full_day(c: &mut Criterion) {
    c.bench_function("full_day_pop100", |b| {
        b.iter(|| {
            let mut world = World::with_seed(quiet_config(100), 42);
            world.run_days(black_box(1));
            world.population()
        });
    });
}

fn bench_mutation(c: &mut Criterion) {
    let config = Config::default();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let parent = TraitVector::random(&config.traits, &mut rng);

    c.bench_function("trait_mutation", |b| {
        b.iter(|| black_box(parent.mutated(&config.traits, &mut rng)));
    });
}

criterion_group!(benches, bench_step, bench_full_day, bench_mutation);
criterion_main!(benches);
