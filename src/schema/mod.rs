//! Schema module - Configuration, seeding and record types for SIRCA runs.

mod config;
mod evolution;
mod seed;

pub use config::*;
pub use evolution::*;
pub use seed::*;
