//! Genetic operators over bit-string chromosomes.
//!
//! Provides random populations, tournament selection, two-point crossover
//! and point mutation.

use rand::prelude::*;

use super::population::{PopulationError, PopulationMatrix};

/// Random number generator wrapper for genetic operations.
pub struct GenomeRng {
    rng: StdRng,
}

impl GenomeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Population of `size` chromosomes with every bit drawn uniformly.
    pub fn random_population(&mut self, size: usize, chromosome_length: usize) -> PopulationMatrix {
        PopulationMatrix::random(size, chromosome_length, &mut self.rng)
    }

    /// Run one tournament of `size` draws with replacement.
    ///
    /// Returns the last sampled index holding the maximum fitness, or `None`
    /// when `fitness` is empty.
    pub fn compete(&mut self, fitness: &[u64], size: usize) -> Option<usize> {
        if fitness.is_empty() {
            return None;
        }

        let mut winner = None;
        let mut best = 0;
        for _ in 0..size {
            let idx = self.rng.gen_range(0..fitness.len());
            // `>=` lets later draws win ties.
            if winner.is_none() || fitness[idx] >= best {
                winner = Some(idx);
                best = fitness[idx];
            }
        }
        winner
    }

    /// Fill a new population by running one tournament per slot.
    ///
    /// A zero `tournament_size` cannot pick a winner and is an error.
    pub fn tournament_select(
        &mut self,
        population: &PopulationMatrix,
        fitness: &[u64],
        tournament_size: usize,
    ) -> Result<PopulationMatrix, PopulationError> {
        if fitness.len() != population.rows() {
            return Err(PopulationError::LengthMismatch {
                expected: population.rows(),
                actual: fitness.len(),
            });
        }

        let mut selected = PopulationMatrix::new(population.rows(), population.columns());
        for slot in 0..population.rows() {
            let winner = self
                .compete(fitness, tournament_size)
                .ok_or(PopulationError::EmptyTournament)?;
            selected.set_row(slot, population.row(winner)?)?;
        }
        Ok(selected)
    }

    /// Pair chromosomes by a random permutation and cross each pair.
    ///
    /// Offspring of the k-th pair land in rows `2k` and `2k + 1`. With an odd
    /// population the unpaired chromosome is copied through.
    pub fn crossover(
        &mut self,
        population: &PopulationMatrix,
        rate: f64,
    ) -> Result<PopulationMatrix, PopulationError> {
        let mut order: Vec<usize> = (0..population.rows()).collect();
        order.shuffle(&mut self.rng);

        let mut offspring = PopulationMatrix::new(population.rows(), population.columns());
        for (pair, parents) in order.chunks(2).enumerate() {
            let slot = pair * 2;
            match *parents {
                [a, b] => {
                    let (child_a, child_b) =
                        self.two_point_crossover(population.row(a)?, population.row(b)?, rate);
                    offspring.set_row(slot, &child_a)?;
                    offspring.set_row(slot + 1, &child_b)?;
                }
                [a] => offspring.set_row(slot, population.row(a)?)?,
                _ => {}
            }
        }
        Ok(offspring)
    }

    /// With probability `rate`, swap the segment between two random cut
    /// points. Otherwise both parents pass through unchanged.
    pub fn two_point_crossover(
        &mut self,
        a: &[bool],
        b: &[bool],
        rate: f64,
    ) -> (Vec<bool>, Vec<bool>) {
        let mut child_a = a.to_vec();
        let mut child_b = b.to_vec();
        let len = a.len().min(b.len());

        if len > 0 && self.rng.r#gen::<f64>() < rate {
            let first = self.rng.gen_range(0..len);
            let second = self.rng.gen_range(0..len);
            let (lo, hi) = if first <= second {
                (first, second)
            } else {
                (second, first)
            };
            child_a[lo..hi].copy_from_slice(&b[lo..hi]);
            child_b[lo..hi].copy_from_slice(&a[lo..hi]);
        }

        (child_a, child_b)
    }

    /// Copy of `population` with each bit flipped independently with
    /// probability `rate`.
    pub fn mutate(&mut self, population: &PopulationMatrix, rate: f64) -> PopulationMatrix {
        let rng = &mut self.rng;
        let mut mutated = population.clone();
        mutated.map_bits(|bit| if rng.r#gen::<f64>() < rate { !bit } else { bit });
        mutated
    }

    /// Generate next u64 for seeding child RNGs.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.r#gen()
    }
}
