//! SIRCA CLI - Run genetic rule search from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::path::PathBuf;
use std::time::Instant;

use sirca::{
    compute::{World, evolution::EvolutionEngine},
    schema::{EvolutionConfig, Preset, WorldConfig, WorldMode},
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    match args[1].as_str() {
        "--example" => print_example_config(),
        "--defaults" => run_search(EvolutionConfig::default()),
        "--life" => {
            let preset = args.get(2).map(String::as_str).unwrap_or("glider");
            let steps: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(4);
            run_life(preset, steps);
        }
        path => {
            let config_path = PathBuf::from(path);
            let config = EvolutionConfig::from_json_file(&config_path).unwrap_or_else(|e| {
                eprintln!("Error loading {}: {}", config_path.display(), e);
                std::process::exit(1);
            });
            run_search(config);
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <config.json>", program);
    eprintln!("       {} --defaults", program);
    eprintln!("       {} --life [preset] [steps]", program);
    eprintln!();
    eprintln!("Search SIR rule chromosomes for the most new infections.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  config.json  Path to evolution configuration file");
    eprintln!("  --defaults   Run with the default configuration");
    eprintln!("  --life       Step a Game of Life preset and print the grid");
    eprintln!();
    eprintln!("Example configuration is generated with --example flag.");
}

fn run_search(config: EvolutionConfig) {
    println!("SIRCA Rule Search");
    println!("=================");
    println!(
        "Grid: {}x{} ({}, {}-neighbor)",
        config.world.rows,
        config.world.columns,
        config.world.mode,
        config.world.neighborhood.size()
    );
    println!(
        "Population: {} chromosomes x {} generations",
        config.population.size, config.population.max_generations
    );
    println!("Steps per evaluation: {}", config.evaluation.steps);
    println!(
        "Operators: tournament {}, crossover {}, mutation {}",
        config.operators.tournament_size,
        config.operators.crossover_rate,
        config.operators.mutation_rate
    );
    println!();

    let total = config.population.max_generations;
    let mut engine = EvolutionEngine::new(config).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    println!("Running search...");
    let start = Instant::now();

    let result = engine
        .run_with_callback(|progress| {
            // Print progress every 10%
            let done = progress.generation + 1;
            if done % (total / 10).max(1) == 0 || done == total {
                println!(
                    "  Generation {}/{}: max={}, mean={:.2}, best={}, {:.1} evals/s",
                    done,
                    total,
                    progress.generation_best,
                    progress.mean_fitness,
                    progress.best_fitness,
                    progress.evaluations as f64 / start.elapsed().as_secs_f64()
                );
            }
        })
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    println!();
    println!("Best chromosome: {}", result.best_chromosome);
    if let Ok(chromosome) = result.best_chromosome.parse::<sirca::RuleChromosome>() {
        let t = chromosome.thresholds();
        println!(
            "  Thresholds: birth={}, infection={}, recovery={}, rebirth={}",
            t.birth, t.infection, t.recovery, t.rebirth
        );
    }
    println!("  Fitness: {}", result.best_fitness);
    println!(
        "Time: {:.2}s ({} evaluations, {:.1} evals/s)",
        result.stats.elapsed_seconds,
        result.stats.total_evaluations,
        result.stats.evaluations_per_second
    );
}

fn run_life(name: &str, steps: u64) {
    let Some(preset) = Preset::ALL
        .into_iter()
        .find(|p| p.name().replace(' ', "_").eq_ignore_ascii_case(name))
    else {
        eprintln!("Unknown preset {:?}", name);
        eprintln!(
            "Available: {}",
            Preset::ALL
                .iter()
                .map(|p| p.name().replace(' ', "_").to_lowercase())
                .collect::<Vec<_>>()
                .join(", ")
        );
        std::process::exit(1);
    };

    let config = WorldConfig {
        rows: 20,
        columns: 20,
        mode: WorldMode::GameOfLife,
        ..Default::default()
    };
    let mut world = World::new(&config).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    if let Err(e) = world.load_preset(preset) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    println!("{} (generation 0)", preset.name());
    println!("{}", world);
    for _ in 0..steps {
        world.step();
    }
    println!(
        "{} (generation {}{})",
        preset.name(),
        world.generation(),
        if world.is_stagnant() { ", stagnant" } else { "" }
    );
    println!("{}", world);
}

fn print_example_config() {
    let config = EvolutionConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
