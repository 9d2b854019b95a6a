//! Evolution configuration types for genetic rule search.
//!
//! This module provides the types for configuring the genetic algorithm that
//! searches SIR transition thresholds for rules producing the most new
//! infections, plus the progress and result records it emits.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ConfigError, InitialCondition, Neighborhood, Occupancy, WorldConfig, WorldMode};

/// Top-level configuration for genetic rule search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// World every chromosome is scored on. Must be an SIR world.
    pub world: WorldConfig,
    /// Population and generation settings.
    #[serde(default)]
    pub population: PopulationConfig,
    /// Evaluation settings (steps per candidate, starting grid).
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    /// Genetic operator settings.
    #[serde(default)]
    pub operators: GeneticAlgorithmConfig,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig {
                rows: 20,
                columns: 20,
                mode: WorldMode::Sir,
                neighborhood: Neighborhood::Moore,
                occupancy: Occupancy::fully_susceptible(),
                allow_births: true,
                allow_carriers: false,
                random_seed: None,
            },
            population: PopulationConfig::default(),
            evaluation: EvaluationConfig::default(),
            operators: GeneticAlgorithmConfig::default(),
            random_seed: None,
        }
    }
}

/// Population settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Number of chromosomes. Must be even so crossover pairs everyone.
    #[serde(default = "default_population_size")]
    pub size: usize,
    /// Number of generations recorded, including the initial one.
    #[serde(default = "default_max_generations")]
    pub max_generations: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: default_population_size(),
            max_generations: default_max_generations(),
        }
    }
}

fn default_population_size() -> usize {
    100
}
fn default_max_generations() -> usize {
    100
}

/// Fitness evaluation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// CA steps run per chromosome.
    #[serde(default = "default_steps")]
    pub steps: usize,
    /// Grid every run starts from.
    #[serde(default)]
    pub initial: InitialCondition,
    /// Evaluate chromosomes on the rayon thread pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            initial: InitialCondition::default(),
            parallel: default_parallel(),
        }
    }
}

fn default_steps() -> usize {
    30
}
fn default_parallel() -> bool {
    true
}

/// Genetic operator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneticAlgorithmConfig {
    /// Chromosomes sampled (with replacement) per tournament.
    #[serde(default = "default_tournament_size")]
    pub tournament_size: usize,
    /// Probability that a mating pair undergoes two-point crossover.
    #[serde(default = "default_crossover_rate")]
    pub crossover_rate: f64,
    /// Probability that any single bit is flipped.
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
}

impl Default for GeneticAlgorithmConfig {
    fn default() -> Self {
        Self {
            tournament_size: default_tournament_size(),
            crossover_rate: default_crossover_rate(),
            mutation_rate: default_mutation_rate(),
        }
    }
}

fn default_tournament_size() -> usize {
    25
}
fn default_crossover_rate() -> f64 {
    0.25
}
fn default_mutation_rate() -> f64 {
    0.001
}

// ============================================================================
// Progress and Result Types
// ============================================================================

/// Statistics for a single generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation index (0 is the random initial population).
    pub generation: usize,
    /// Highest fitness in the population.
    pub max_fitness: u64,
    /// Mean fitness of the population.
    pub mean_fitness: f64,
    /// Fittest chromosome as a bit string.
    pub best_chromosome: String,
}

/// Append-only per-generation fitness record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FitnessRecord {
    /// Max fitness per generation.
    pub max_fitness: Vec<u64>,
    /// Mean fitness per generation.
    pub mean_fitness: Vec<f64>,
    /// Fittest chromosome per generation.
    pub best_chromosomes: Vec<String>,
}

impl FitnessRecord {
    /// Append one generation.
    pub fn push(&mut self, stats: GenerationStats) {
        self.max_fitness.push(stats.max_fitness);
        self.mean_fitness.push(stats.mean_fitness);
        self.best_chromosomes.push(stats.best_chromosome);
    }

    /// Number of recorded generations.
    pub fn len(&self) -> usize {
        self.max_fitness.len()
    }

    pub fn is_empty(&self) -> bool {
        self.max_fitness.is_empty()
    }

    /// Statistics for one generation.
    pub fn get(&self, generation: usize) -> Option<GenerationStats> {
        Some(GenerationStats {
            generation,
            max_fitness: *self.max_fitness.get(generation)?,
            mean_fitness: *self.mean_fitness.get(generation)?,
            best_chromosome: self.best_chromosomes.get(generation)?.clone(),
        })
    }

    /// Most recent generation.
    pub fn last(&self) -> Option<GenerationStats> {
        self.len().checked_sub(1).and_then(|g| self.get(g))
    }

    /// Iterate over all recorded generations.
    pub fn iter(&self) -> impl Iterator<Item = GenerationStats> + '_ {
        (0..self.len()).filter_map(|g| self.get(g))
    }
}

/// Progress update emitted after every generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionProgress {
    /// Current generation number.
    pub generation: usize,
    /// Total generations planned.
    pub total_generations: usize,
    /// Best fitness seen so far.
    pub best_fitness: u64,
    /// Chromosome that achieved `best_fitness`.
    pub best_chromosome: Option<String>,
    /// Best fitness this generation.
    pub generation_best: u64,
    /// Mean fitness of the current population.
    pub mean_fitness: f64,
    /// Evaluations performed so far.
    pub evaluations: u64,
}

/// Final result of an evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionResult {
    /// Fittest chromosome seen in any generation.
    pub best_chromosome: String,
    /// Its fitness.
    pub best_fitness: u64,
    /// Statistics from the run.
    pub stats: EvolutionStats,
    /// Full per-generation record.
    pub history: FitnessRecord,
}

/// Statistics from an evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Generations recorded.
    pub generations: usize,
    /// Total fitness evaluations performed.
    pub total_evaluations: u64,
    /// Best fitness achieved.
    pub best_fitness: u64,
    /// Mean fitness of the final population.
    pub final_mean_fitness: f64,
    /// Time taken (in seconds).
    pub elapsed_seconds: f64,
    /// Evaluations per second.
    pub evaluations_per_second: f64,
    /// Reason for stopping.
    pub stop_reason: StopReason,
}

/// Reason evolution stopped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// Generation budget exhausted.
    MaxGenerations,
    /// Caller cancelled.
    Cancelled,
}

// ============================================================================
// Validation
// ============================================================================

/// Evolution configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvolutionConfigError {
    #[error("Population size must be at least 2")]
    PopulationTooSmall,
    #[error("Population size {0} must be even")]
    OddPopulation(usize),
    #[error("At least one generation is required")]
    NoGenerations,
    #[error("Evaluation steps must be positive")]
    InvalidSteps,
    #[error("Tournament size must be positive")]
    InvalidTournamentSize,
    #[error("{name} probability {value} is outside [0, 1]")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("Rule search needs an SIR world, got {0}")]
    NotSirWorld(WorldMode),
    #[error("World config validation failed: {0}")]
    WorldConfigError(#[from] ConfigError),
}

impl EvolutionConfig {
    /// Validate evolution configuration.
    pub fn validate(&self) -> Result<(), EvolutionConfigError> {
        self.world.validate()?;

        if self.world.mode != WorldMode::Sir {
            return Err(EvolutionConfigError::NotSirWorld(self.world.mode));
        }

        if self.population.size < 2 {
            return Err(EvolutionConfigError::PopulationTooSmall);
        }
        if self.population.size % 2 != 0 {
            return Err(EvolutionConfigError::OddPopulation(self.population.size));
        }
        if self.population.max_generations == 0 {
            return Err(EvolutionConfigError::NoGenerations);
        }

        if self.evaluation.steps == 0 {
            return Err(EvolutionConfigError::InvalidSteps);
        }

        if self.operators.tournament_size == 0 {
            return Err(EvolutionConfigError::InvalidTournamentSize);
        }

        let check_probability = |value: f64, name: &'static str| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(EvolutionConfigError::InvalidProbability { name, value })
            }
        };

        check_probability(self.operators.crossover_rate, "crossover")?;
        check_probability(self.operators.mutation_rate, "mutation")?;

        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

/// Errors raised while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Error reading config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error parsing config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(#[from] EvolutionConfigError),
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = EvolutionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.population.size, 100);
        assert_eq!(config.operators.tournament_size, 25);
        assert_eq!(config.evaluation.steps, 30);
    }

    #[test]
    fn test_validation_errors() {
        let mut config = EvolutionConfig::default();
        config.population.size = 7;
        assert_eq!(
            config.validate(),
            Err(EvolutionConfigError::OddPopulation(7))
        );

        let mut config = EvolutionConfig::default();
        config.operators.mutation_rate = 1.5;
        assert!(matches!(
            config.validate(),
            Err(EvolutionConfigError::InvalidProbability {
                name: "mutation",
                ..
            })
        ));

        let mut config = EvolutionConfig::default();
        config.world.mode = WorldMode::GameOfLife;
        assert_eq!(
            config.validate(),
            Err(EvolutionConfigError::NotSirWorld(WorldMode::GameOfLife))
        );

        let mut config = EvolutionConfig::default();
        config.world.occupancy = Occupancy::new(0, 90, 0, 0);
        assert!(matches!(
            config.validate(),
            Err(EvolutionConfigError::WorldConfigError(_))
        ));
    }

    #[test]
    fn test_fitness_record() {
        let mut record = FitnessRecord::default();
        assert!(record.last().is_none());

        record.push(GenerationStats {
            generation: 0,
            max_fitness: 12,
            mean_fitness: 4.5,
            best_chromosome: "000000000001".to_string(),
        });
        record.push(GenerationStats {
            generation: 1,
            max_fitness: 15,
            mean_fitness: 6.0,
            best_chromosome: "000000000011".to_string(),
        });

        assert_eq!(record.len(), 2);
        let last = record.last().unwrap();
        assert_eq!(last.generation, 1);
        assert_eq!(last.max_fitness, 15);
        assert_eq!(record.iter().count(), 2);
    }

    #[test]
    fn test_serialization() {
        let config = EvolutionConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: EvolutionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.population.size, config.population.size);
        assert_eq!(parsed.world, config.world);
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "world": {{ "rows": 10, "columns": 12, "occupancy":
                    {{ "empty": 0, "susceptible": 100, "infected": 0, "carrier": 0 }} }},
                "population": {{ "size": 8 }},
                "random_seed": 7
            }}"#
        )
        .unwrap();

        let config = EvolutionConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.world.rows, 10);
        assert_eq!(config.world.neighborhood, Neighborhood::Moore);
        assert_eq!(config.population.size, 8);
        assert_eq!(config.population.max_generations, 100);
        assert_eq!(config.random_seed, Some(7));

        let mut odd = tempfile::NamedTempFile::new().unwrap();
        write!(
            odd,
            r#"{{ "world": {{ "rows": 10, "columns": 10 }}, "population": {{ "size": 3 }} }}"#
        )
        .unwrap();
        assert!(matches!(
            EvolutionConfig::from_json_file(odd.path()),
            Err(ConfigLoadError::Invalid(EvolutionConfigError::OddPopulation(3)))
        ));
    }
}
