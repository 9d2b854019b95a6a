//! Generational genetic algorithm over SIR rule chromosomes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use log::{debug, info, warn};

use crate::compute::{CHROMOSOME_LENGTH, RuleChromosome, RuleError};
use crate::schema::{
    EvolutionConfig, EvolutionConfigError, EvolutionProgress, EvolutionResult, EvolutionStats,
    FitnessRecord, GenerationStats, StopReason,
};

use super::fitness::{EvaluationError, FitnessEvaluator};
use super::genome::GenomeRng;
use super::population::{PopulationError, PopulationMatrix};

/// Evolution engine that runs the search.
pub struct EvolutionEngine {
    config: EvolutionConfig,
    rng: GenomeRng,
    evaluator: FitnessEvaluator,
    population: PopulationMatrix,
    /// Fitness of each population row.
    fitness: Vec<u64>,
    history: FitnessRecord,
    best_fitness: u64,
    best_chromosome: Option<RuleChromosome>,
    evaluations: u64,
    cancelled: Arc<AtomicBool>,
}

impl EvolutionEngine {
    /// Create a new evolution engine from a validated configuration.
    pub fn new(config: EvolutionConfig) -> Result<Self, EvolutionError> {
        config.validate()?;

        let rng = match config.random_seed {
            Some(seed) => GenomeRng::new(seed),
            None => GenomeRng::random(),
        };
        let evaluator = FitnessEvaluator::new(&config.world, &config.evaluation)?;
        let population = PopulationMatrix::new(config.population.size, CHROMOSOME_LENGTH);

        Ok(Self {
            config,
            rng,
            evaluator,
            population,
            fitness: Vec::new(),
            history: FitnessRecord::default(),
            best_fitness: 0,
            best_chromosome: None,
            evaluations: 0,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Get cancellation handle.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Current population, one chromosome per row.
    pub fn population(&self) -> &PopulationMatrix {
        &self.population
    }

    /// Fitness of each current chromosome.
    pub fn fitness(&self) -> &[u64] {
        &self.fitness
    }

    /// Per-generation record so far.
    pub fn history(&self) -> &FitnessRecord {
        &self.history
    }

    /// Index of the latest recorded generation, 0 for the initial population.
    pub fn generation(&self) -> usize {
        self.history.len().saturating_sub(1)
    }

    /// Fittest chromosome seen in any generation.
    pub fn best_chromosome(&self) -> Option<RuleChromosome> {
        self.best_chromosome
    }

    /// Draw a random population, score it and record generation 0.
    pub fn initialize(&mut self) -> Result<(), EvolutionError> {
        self.history = FitnessRecord::default();
        self.best_fitness = 0;
        self.best_chromosome = None;
        self.evaluations = 0;

        self.population = self
            .rng
            .random_population(self.config.population.size, CHROMOSOME_LENGTH);
        self.evaluate_population()?;
        self.record_generation()
    }

    /// Score every chromosome in the current population.
    fn evaluate_population(&mut self) -> Result<(), EvolutionError> {
        self.fitness = self
            .evaluator
            .evaluate_population(&self.population, self.config.evaluation.parallel)?;
        self.evaluations += self.fitness.len() as u64;
        Ok(())
    }

    /// Select, cross over, mutate, rescore and record one generation.
    pub fn step_generation(&mut self) -> Result<(), EvolutionError> {
        let operators = &self.config.operators;

        let selected = self.rng.tournament_select(
            &self.population,
            &self.fitness,
            operators.tournament_size,
        )?;
        let offspring = self.rng.crossover(&selected, operators.crossover_rate)?;
        let mutated = self.rng.mutate(&offspring, operators.mutation_rate);
        self.population.assign(&mutated)?;

        self.evaluate_population()?;
        self.record_generation()
    }

    /// Append the current population's statistics to the history.
    fn record_generation(&mut self) -> Result<(), EvolutionError> {
        // First index holding the maximum.
        let (best_idx, max_fitness) = self
            .fitness
            .iter()
            .copied()
            .enumerate()
            .fold((0, 0), |best, (i, f)| if f > best.1 { (i, f) } else { best });
        let mean_fitness = mean(&self.fitness);
        let chromosome = RuleChromosome::try_from(self.population.row(best_idx)?)?;

        if self.best_chromosome.is_none() || max_fitness > self.best_fitness {
            self.best_fitness = max_fitness;
            self.best_chromosome = Some(chromosome);
        }

        let stats = GenerationStats {
            generation: self.history.len(),
            max_fitness,
            mean_fitness,
            best_chromosome: chromosome.to_string(),
        };
        debug!(
            "Generation {}: max {} mean {:.2} best {}",
            stats.generation, stats.max_fitness, stats.mean_fitness, stats.best_chromosome
        );
        self.history.push(stats);
        Ok(())
    }

    /// Get current progress.
    pub fn progress(&self) -> EvolutionProgress {
        EvolutionProgress {
            generation: self.generation(),
            total_generations: self.config.population.max_generations,
            best_fitness: self.best_fitness,
            best_chromosome: self.best_chromosome.map(|c| c.to_string()),
            generation_best: self.fitness.iter().copied().max().unwrap_or(0),
            mean_fitness: mean(&self.fitness),
            evaluations: self.evaluations,
        }
    }

    /// Check if evolution should stop.
    fn should_stop(&self) -> Option<StopReason> {
        if self.cancelled.load(Ordering::Relaxed) {
            return Some(StopReason::Cancelled);
        }

        if self.history.len() >= self.config.population.max_generations {
            return Some(StopReason::MaxGenerations);
        }

        None
    }

    /// Run evolution with progress callback.
    pub fn run_with_callback<F>(&mut self, callback: F) -> Result<EvolutionResult, EvolutionError>
    where
        F: Fn(&EvolutionProgress),
    {
        let start_time = Instant::now();
        info!(
            "Starting rule search: {} chromosomes, {} generations, {} steps per evaluation",
            self.config.population.size,
            self.config.population.max_generations,
            self.config.evaluation.steps
        );

        self.initialize()?;
        callback(&self.progress());

        let stop_reason = loop {
            if let Some(reason) = self.should_stop() {
                break reason;
            }

            self.step_generation()?;
            callback(&self.progress());
        };

        if stop_reason == StopReason::Cancelled {
            warn!("Rule search cancelled after {} generations", self.history.len());
        }

        let elapsed = start_time.elapsed().as_secs_f64();
        let best_chromosome = self
            .best_chromosome
            .map(|c| c.to_string())
            .unwrap_or_default();

        info!(
            "Rule search finished: best fitness {} from {}",
            self.best_fitness, best_chromosome
        );

        Ok(EvolutionResult {
            best_chromosome,
            best_fitness: self.best_fitness,
            stats: EvolutionStats {
                generations: self.history.len(),
                total_evaluations: self.evaluations,
                best_fitness: self.best_fitness,
                final_mean_fitness: mean(&self.fitness),
                elapsed_seconds: elapsed,
                evaluations_per_second: if elapsed > 0.0 {
                    self.evaluations as f64 / elapsed
                } else {
                    0.0
                },
                stop_reason,
            },
            history: self.history.clone(),
        })
    }

    /// Run evolution (blocking).
    pub fn run(&mut self) -> Result<EvolutionResult, EvolutionError> {
        self.run_with_callback(|_| {})
    }
}

fn mean(values: &[u64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<u64>() as f64 / values.len() as f64
    }
}

/// Errors raised while running the search.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvolutionError {
    #[error("Invalid evolution config: {0}")]
    Config(#[from] EvolutionConfigError),
    #[error("Fitness evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),
    #[error("Population error: {0}")]
    Population(#[from] PopulationError),
    #[error("Chromosome error: {0}")]
    Rule(#[from] RuleError),
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::schema::{EvaluationConfig, PopulationConfig};

    fn small_config(size: usize, max_generations: usize) -> EvolutionConfig {
        let mut config = EvolutionConfig {
            population: PopulationConfig {
                size,
                max_generations,
            },
            evaluation: EvaluationConfig {
                steps: 10,
                ..Default::default()
            },
            random_seed: Some(42),
            ..Default::default()
        };
        config.world.rows = 12;
        config.world.columns = 12;
        config.world.random_seed = Some(0);
        config
    }

    #[test]
    fn test_evolution_engine_creation() {
        let mut engine = EvolutionEngine::new(small_config(10, 5)).unwrap();
        engine.initialize().unwrap();

        assert_eq!(engine.population().dimensions(), (10, CHROMOSOME_LENGTH));
        assert_eq!(engine.fitness().len(), 10);
        assert_eq!(engine.history().len(), 1);
        assert_eq!(engine.generation(), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            EvolutionEngine::new(small_config(9, 5)),
            Err(EvolutionError::Config(EvolutionConfigError::OddPopulation(9)))
        ));
    }

    #[test]
    fn test_evolution_run() {
        let mut engine = EvolutionEngine::new(small_config(10, 6)).unwrap();
        let result = engine.run().unwrap();

        assert_eq!(result.stats.generations, 6);
        assert_eq!(result.history.len(), 6);
        assert_eq!(result.stats.total_evaluations, 60);
        assert_eq!(result.stats.stop_reason, StopReason::MaxGenerations);
        assert_eq!(
            result.best_fitness,
            result.history.max_fitness.iter().copied().max().unwrap()
        );
        assert!(result.best_chromosome.parse::<RuleChromosome>().is_ok());
    }

    #[test]
    fn test_fitness_bounds_hold() {
        let mut config = small_config(12, 5);
        config.world.allow_births = false;
        let cells = config.world.grid_size() as u64;

        let mut engine = EvolutionEngine::new(config).unwrap();
        let result = engine.run().unwrap();

        for stats in result.history.iter() {
            assert!(0.0 <= stats.mean_fitness);
            assert!(stats.mean_fitness <= stats.max_fitness as f64);
            assert!(stats.max_fitness <= cells);
        }
    }

    #[test]
    fn test_recorded_max_matches_population() {
        let mut engine = EvolutionEngine::new(small_config(10, 4)).unwrap();
        engine.initialize().unwrap();
        engine.step_generation().unwrap();

        let evaluator = FitnessEvaluator::new(
            &engine.config().world,
            &engine.config().evaluation,
        )
        .unwrap();
        let recomputed = evaluator
            .evaluate_population(engine.population(), false)
            .unwrap();
        let last = engine.history().last().unwrap();

        assert_eq!(recomputed, engine.fitness());
        assert_eq!(last.max_fitness, recomputed.iter().copied().max().unwrap());

        let best: RuleChromosome = last.best_chromosome.parse().unwrap();
        assert_eq!(evaluator.evaluate(&best).unwrap(), last.max_fitness);
    }

    #[test]
    fn test_seeded_runs_reproducible() {
        let mut a = EvolutionEngine::new(small_config(8, 4)).unwrap();
        let mut b = EvolutionEngine::new(small_config(8, 4)).unwrap();

        let result_a = a.run().unwrap();
        let result_b = b.run().unwrap();

        assert_eq!(result_a.history, result_b.history);
        assert_eq!(a.population(), b.population());
    }

    #[test]
    fn test_progress_callback() {
        let mut engine = EvolutionEngine::new(small_config(6, 3)).unwrap();
        let seen = Mutex::new(Vec::new());

        engine
            .run_with_callback(|progress| {
                seen.lock().unwrap().push(progress.generation);
            })
            .unwrap();

        assert_eq!(seen.into_inner().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_cancellation() {
        let mut engine = EvolutionEngine::new(small_config(6, 100)).unwrap();
        let cancel = engine.cancel_handle();

        // Cancel immediately
        cancel.store(true, Ordering::Relaxed);

        let result = engine.run().unwrap();
        assert_eq!(result.stats.stop_reason, StopReason::Cancelled);
        assert_eq!(result.stats.generations, 1);
    }
}
