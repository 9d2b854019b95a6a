//! Quick evolution performance test

use sirca::{
    EvolutionConfig,
    compute::evolution::EvolutionEngine,
    schema::{EvaluationConfig, PopulationConfig},
};
use std::time::Instant;

fn main() {
    println!("=== Evolution Performance Test ===\n");

    // Test different grid sizes
    for grid_size in [20, 40, 80] {
        println!("Grid size: {}x{}", grid_size, grid_size);

        let mut config = EvolutionConfig {
            population: PopulationConfig {
                size: 50,
                max_generations: 10,
            },
            random_seed: Some(42),
            ..Default::default()
        };
        config.world.rows = grid_size;
        config.world.columns = grid_size;

        let start = Instant::now();
        let mut engine = EvolutionEngine::new(config).unwrap();
        let result = engine.run().unwrap();
        let elapsed = start.elapsed();

        let total_evals = result.stats.total_evaluations;
        let evals_per_sec = total_evals as f64 / elapsed.as_secs_f64();

        println!("  Generations:    {}", result.stats.generations);
        println!("  Evaluations:    {}", total_evals);
        println!("  Elapsed:        {:.2}s", elapsed.as_secs_f64());
        println!("  Evals/sec:      {:.1}", evals_per_sec);
        println!(
            "  Best fitness:   {} ({})",
            result.best_fitness, result.best_chromosome
        );
        println!();
    }

    println!("=== Parallel vs Sequential (fixed 20x20 grid) ===\n");

    for parallel in [false, true] {
        for pop_size in [20, 100, 400] {
            let config = EvolutionConfig {
                population: PopulationConfig {
                    size: pop_size,
                    max_generations: 5,
                },
                evaluation: EvaluationConfig {
                    parallel,
                    ..Default::default()
                },
                random_seed: Some(42),
                ..Default::default()
            };

            let start = Instant::now();
            let mut engine = EvolutionEngine::new(config).unwrap();
            let result = engine.run().unwrap();
            let elapsed = start.elapsed();

            let total_evals = result.stats.total_evaluations;
            let evals_per_sec = total_evals as f64 / elapsed.as_secs_f64();

            println!(
                "{} population {}: {} evals in {:.2}s ({:.1} evals/sec)",
                if parallel { "Parallel" } else { "Sequential" },
                pop_size,
                total_evals,
                elapsed.as_secs_f64(),
                evals_per_sec
            );
        }
    }
}
