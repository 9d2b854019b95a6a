//! Compute module - cellular automaton engine and rule search.

mod cell;
pub mod evolution;
pub mod gray;
mod rule;
mod world;

pub use cell::*;
pub use rule::*;
pub use world::*;
