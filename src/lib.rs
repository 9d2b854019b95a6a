//! SIRCA - SIR epidemic and Game of Life cellular automata with genetic rule
//! search.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration types, presets and evolution records
//! - `compute`: Grid world, Gray-coded rule chromosomes and the genetic search
//!
//! # Example
//!
//! ```rust,no_run
//! use sirca::{
//!     compute::{CellState, RuleChromosome, World},
//!     schema::{Occupancy, WorldConfig},
//! };
//!
//! let config = WorldConfig {
//!     rows: 20,
//!     columns: 20,
//!     occupancy: Occupancy::fully_susceptible(),
//!     ..Default::default()
//! };
//! let mut world = World::new(&config).unwrap();
//! world.set_cell_state(10, 10, CellState::Infected).unwrap();
//!
//! let rule: RuleChromosome = "001001010011".parse().unwrap();
//! for _ in 0..30 {
//!     world.step_with_rule(&rule).unwrap();
//! }
//!
//! println!("New infections after 30 steps: {}", world.new_infection_count());
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{Cell, CellState, RuleChromosome, Thresholds, World, WorldError};
pub use schema::{EvolutionConfig, Neighborhood, Occupancy, WorldConfig, WorldMode};
