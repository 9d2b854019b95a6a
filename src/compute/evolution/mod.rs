//! Genetic search for SIR rule chromosomes.
//!
//! # Overview
//!
//! - **Population** (`population`): bit matrix holding one chromosome per row
//! - **Genome Operations** (`genome`): tournament selection, two-point
//!   crossover and point mutation
//! - **Fitness** (`fitness`): new-infection count over a fixed CA run
//! - **Search** (`search`): the generational driver
//!
//! # Example
//!
//! ```rust,no_run
//! use sirca::compute::evolution::EvolutionEngine;
//! use sirca::schema::EvolutionConfig;
//!
//! let mut engine = EvolutionEngine::new(EvolutionConfig::default()).unwrap();
//! let result = engine
//!     .run_with_callback(|progress| {
//!         println!(
//!             "Generation {}: best fitness = {}",
//!             progress.generation, progress.best_fitness
//!         );
//!     })
//!     .unwrap();
//!
//! println!("Best chromosome: {}", result.best_chromosome);
//! ```

mod fitness;
mod genome;
mod population;
mod search;

pub use fitness::*;
pub use genome::*;
pub use population::*;
pub use search::*;
