//! Fitness evaluation for rule chromosomes.
//!
//! A chromosome's fitness is the number of new infections its decoded rules
//! produce over a fixed number of steps from a fixed starting grid.

use rayon::prelude::*;

use crate::compute::{CHROMOSOME_LENGTH, CellState, RuleChromosome, RuleError, World, WorldError};
use crate::schema::{EvaluationConfig, WorldConfig, WorldMode, offset_from_center};

use super::population::{PopulationError, PopulationMatrix};

/// Scores chromosomes by replaying the CA from a fixed start.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    /// World every run is cloned from.
    template: World,
    /// Grid positions of the initially INFECTED cells.
    infected: Vec<(usize, usize)>,
    steps: usize,
}

impl FitnessEvaluator {
    /// Create an evaluator for an SIR world.
    pub fn new(
        world_config: &WorldConfig,
        evaluation: &EvaluationConfig,
    ) -> Result<Self, EvaluationError> {
        if world_config.mode != WorldMode::Sir {
            return Err(WorldError::RuleRequiresSir(world_config.mode).into());
        }

        let template = World::new(world_config)?;
        let (rows, columns) = template.dimensions();
        let infected = evaluation
            .initial
            .infected
            .iter()
            .map(|&offset| {
                offset_from_center(rows, columns, offset).ok_or(WorldError::PatternOutOfBounds {
                    offset,
                    rows,
                    columns,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            template,
            infected,
            steps: evaluation.steps,
        })
    }

    /// CA steps run per evaluation.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Fresh copy of the evaluation world.
    pub fn world(&self) -> World {
        self.template.clone()
    }

    /// Reset `world` to the starting grid: all SUSCEPTIBLE plus the initial
    /// INFECTED cells, with counters cleared.
    pub fn prepare(&self, world: &mut World) -> Result<(), WorldError> {
        world.reset_to(CellState::Susceptible);
        for &(row, column) in &self.infected {
            world.set_cell_state(row, column, CellState::Infected)?;
        }
        Ok(())
    }

    /// Score one chromosome on `world`, which is fully reset first.
    pub fn evaluate_on(
        &self,
        world: &mut World,
        chromosome: &RuleChromosome,
    ) -> Result<u64, WorldError> {
        self.prepare(world)?;
        for _ in 0..self.steps {
            world.step_with_rule(chromosome)?;
        }
        Ok(world.new_infection_count())
    }

    /// Score one chromosome on a fresh world.
    pub fn evaluate(&self, chromosome: &RuleChromosome) -> Result<u64, WorldError> {
        self.evaluate_on(&mut self.world(), chromosome)
    }

    /// Score every chromosome in `population`, in row order.
    ///
    /// Sequential evaluation reuses one world. Parallel evaluation gives each
    /// rayon worker its own world; chromosome stepping draws no randomness, so
    /// both paths produce the same scores.
    pub fn evaluate_population(
        &self,
        population: &PopulationMatrix,
        parallel: bool,
    ) -> Result<Vec<u64>, EvaluationError> {
        if population.columns() != CHROMOSOME_LENGTH {
            return Err(RuleError::Length {
                expected: CHROMOSOME_LENGTH,
                actual: population.columns(),
            }
            .into());
        }

        let chromosomes = population
            .iter_rows()
            .map(RuleChromosome::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let fitness = if parallel {
            chromosomes
                .par_iter()
                .map_init(|| self.world(), |world, c| self.evaluate_on(world, c))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            let mut world = self.world();
            chromosomes
                .iter()
                .map(|c| self.evaluate_on(&mut world, c))
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(fitness)
    }
}

/// Fitness evaluation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error("World error: {0}")]
    World(#[from] WorldError),
    #[error("Chromosome error: {0}")]
    Rule(#[from] RuleError),
    #[error("Population error: {0}")]
    Population(#[from] PopulationError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::Thresholds;
    use crate::schema::{EvolutionConfig, InitialCondition};

    fn evaluator(allow_births: bool) -> FitnessEvaluator {
        let mut config = EvolutionConfig::default();
        config.world.allow_births = allow_births;
        config.world.random_seed = Some(1);
        FitnessEvaluator::new(&config.world, &config.evaluation).unwrap()
    }

    #[test]
    fn test_prepare_starting_grid() {
        let evaluator = evaluator(true);
        let mut world = evaluator.world();
        world.step();
        evaluator.prepare(&mut world).unwrap();

        assert_eq!(world.count_state(CellState::Infected), 3);
        assert_eq!(world.count_state(CellState::Susceptible), 397);
        for column in 9..=11 {
            assert_eq!(world.cell_state(10, column).unwrap(), CellState::Infected);
        }
        assert_eq!(world.new_infection_count(), 0);
        assert_eq!(world.generation(), 0);
    }

    #[test]
    fn test_fixed_rules_fitness() {
        let evaluator = evaluator(false);
        let fixed: RuleChromosome = "001001010011".parse().unwrap();
        assert_eq!(fixed.thresholds(), Thresholds::FIXED);

        let fitness = evaluator.evaluate(&fixed).unwrap();
        assert!(fitness >= 6);
        assert!(fitness <= 400);
    }

    #[test]
    fn test_unreachable_threshold_scores_zero() {
        // Infection needs 8 infected neighbors, which a line of three never
        // provides.
        let evaluator = evaluator(false);
        let chromosome: RuleChromosome = "000100000000".parse().unwrap();
        assert_eq!(chromosome.thresholds().infection, 8);
        assert_eq!(evaluator.evaluate(&chromosome).unwrap(), 0);
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let evaluator = evaluator(true);
        let chromosome: RuleChromosome = "011000110101".parse().unwrap();
        let mut world = evaluator.world();
        let first = evaluator.evaluate_on(&mut world, &chromosome).unwrap();
        let second = evaluator.evaluate_on(&mut world, &chromosome).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, evaluator.evaluate(&chromosome).unwrap());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let evaluator = evaluator(true);
        let mut rng = super::super::GenomeRng::new(8);
        let population = rng.random_population(16, CHROMOSOME_LENGTH);

        let sequential = evaluator.evaluate_population(&population, false).unwrap();
        let parallel = evaluator.evaluate_population(&population, true).unwrap();
        assert_eq!(sequential.len(), 16);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_fitness_bounded_without_births() {
        let evaluator = evaluator(false);
        let mut rng = super::super::GenomeRng::new(12);
        let population = rng.random_population(20, CHROMOSOME_LENGTH);

        let fitness = evaluator.evaluate_population(&population, true).unwrap();
        // Without births each cell can be infected at most once.
        assert!(fitness.iter().all(|&f| f <= 400));
    }

    #[test]
    fn test_construction_errors() {
        let mut config = EvolutionConfig::default();
        config.world.mode = WorldMode::GameOfLife;
        assert!(matches!(
            FitnessEvaluator::new(&config.world, &config.evaluation),
            Err(EvaluationError::World(WorldError::RuleRequiresSir(
                WorldMode::GameOfLife
            )))
        ));

        let mut config = EvolutionConfig::default();
        config.evaluation.initial = InitialCondition {
            infected: vec![(0, 15)],
        };
        assert!(matches!(
            FitnessEvaluator::new(&config.world, &config.evaluation),
            Err(EvaluationError::World(WorldError::PatternOutOfBounds { .. }))
        ));
    }

    #[test]
    fn test_wrong_chromosome_length() {
        let evaluator = evaluator(false);
        let population = PopulationMatrix::new(4, 10);
        assert_eq!(
            evaluator.evaluate_population(&population, false),
            Err(EvaluationError::Rule(RuleError::Length {
                expected: CHROMOSOME_LENGTH,
                actual: 10
            }))
        );
    }
}
