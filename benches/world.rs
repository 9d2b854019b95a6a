//! Benchmarks for world stepping and fitness evaluation.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use sirca::{
    compute::{RuleChromosome, World, evolution::FitnessEvaluator},
    schema::{EvolutionConfig, Occupancy, Preset, WorldConfig, WorldMode},
};

fn bench_life_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("life_step");

    for size in [32, 64, 128, 256] {
        let config = WorldConfig {
            rows: size,
            columns: size,
            mode: WorldMode::GameOfLife,
            ..Default::default()
        };
        let mut world = World::new(&config).unwrap();
        world.load_preset(Preset::Tumbler).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", size, size)),
            &size,
            |b, _| {
                b.iter(|| {
                    black_box(&mut world).step();
                });
            },
        );
    }

    group.finish();
}

fn bench_sir_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("sir_step");
    let rule: RuleChromosome = "001001010011".parse().unwrap();

    for size in [32, 64, 128, 256] {
        let config = WorldConfig {
            rows: size,
            columns: size,
            mode: WorldMode::Sir,
            occupancy: Occupancy::standard(),
            allow_births: true,
            random_seed: Some(7),
            ..Default::default()
        };

        let mut fixed = World::new(&config).unwrap();
        group.bench_with_input(
            BenchmarkId::new("fixed", format!("{}x{}", size, size)),
            &size,
            |b, _| {
                b.iter(|| {
                    black_box(&mut fixed).step();
                });
            },
        );

        let mut evolved = World::new(&config).unwrap();
        group.bench_with_input(
            BenchmarkId::new("chromosome", format!("{}x{}", size, size)),
            &size,
            |b, _| {
                b.iter(|| {
                    black_box(&mut evolved).step_with_rule(&rule).unwrap();
                });
            },
        );
    }

    group.finish();
}

fn bench_fitness(c: &mut Criterion) {
    let mut group = c.benchmark_group("fitness");
    let config = EvolutionConfig::default();
    let evaluator = FitnessEvaluator::new(&config.world, &config.evaluation).unwrap();
    let rule: RuleChromosome = "001001010011".parse().unwrap();

    group.bench_function("single_chromosome", |b| {
        let mut world = evaluator.world();
        b.iter(|| evaluator.evaluate_on(&mut world, black_box(&rule)).unwrap());
    });

    let mut rng = sirca::compute::evolution::GenomeRng::new(1);
    let population = rng.random_population(config.population.size, 12);
    for parallel in [false, true] {
        group.bench_with_input(
            BenchmarkId::new("population", if parallel { "parallel" } else { "sequential" }),
            &parallel,
            |b, &parallel| {
                b.iter(|| {
                    evaluator
                        .evaluate_population(black_box(&population), parallel)
                        .unwrap()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_life_step, bench_sir_step, bench_fitness);
criterion_main!(benches);
