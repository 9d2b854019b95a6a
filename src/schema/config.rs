//! Configuration types for SIRCA world parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Rule system a world evolves under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WorldMode {
    /// Conway's Game of Life over DEAD / ALIVE cells.
    #[serde(rename = "GOL")]
    GameOfLife,
    /// Susceptible-Infected-Recovered epidemic rules.
    #[default]
    #[serde(rename = "SIR")]
    Sir,
}

impl WorldMode {
    /// Short name used in configuration files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GameOfLife => "GOL",
            Self::Sir => "SIR",
        }
    }
}

impl fmt::Display for WorldMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorldMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GOL" => Ok(Self::GameOfLife),
            "SIR" => Ok(Self::Sir),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

/// Set of neighbors considered when counting states around a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum Neighborhood {
    /// Four orthogonal neighbors.
    VonNeumann,
    /// Orthogonal plus diagonal neighbors.
    #[default]
    Moore,
}

impl Neighborhood {
    /// Number of neighbors in this neighborhood.
    #[inline]
    pub const fn size(self) -> usize {
        match self {
            Self::VonNeumann => 4,
            Self::Moore => 8,
        }
    }
}

impl TryFrom<usize> for Neighborhood {
    type Error = ConfigError;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        match size {
            4 => Ok(Self::VonNeumann),
            8 => Ok(Self::Moore),
            other => Err(ConfigError::UnsupportedNeighborhood(other)),
        }
    }
}

impl From<Neighborhood> for usize {
    fn from(neighborhood: Neighborhood) -> Self {
        neighborhood.size()
    }
}

/// Occupancy percentages used when randomly populating an SIR world.
///
/// The four percentages must sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupancy {
    /// Chance of an EMPTY cell.
    pub empty: u8,
    /// Chance of a SUSCEPTIBLE cell.
    pub susceptible: u8,
    /// Chance of an INFECTED cell.
    pub infected: u8,
    /// Chance of an uninfected carrier.
    pub carrier: u8,
}

impl Default for Occupancy {
    fn default() -> Self {
        Self::standard()
    }
}

impl Occupancy {
    pub const fn new(empty: u8, susceptible: u8, infected: u8, carrier: u8) -> Self {
        Self {
            empty,
            susceptible,
            infected,
            carrier,
        }
    }

    /// 15 / 70 / 15 / 0, the interactive default.
    pub const fn standard() -> Self {
        Self::new(15, 70, 15, 0)
    }

    /// 10 / 70 / 10 / 10, used when carriers are switched on.
    pub const fn with_carriers() -> Self {
        Self::new(10, 70, 10, 10)
    }

    /// Every cell susceptible.
    pub const fn fully_susceptible() -> Self {
        Self::new(0, 100, 0, 0)
    }

    /// Sum of all four percentages.
    pub fn total(&self) -> u32 {
        [self.empty, self.susceptible, self.infected, self.carrier]
            .iter()
            .map(|&p| u32::from(p))
            .sum()
    }

    /// Check that the percentages sum to 100.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.total() {
            100 => Ok(()),
            total => Err(ConfigError::InvalidOccupancy { total }),
        }
    }
}

/// Top-level world configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Number of cell rows.
    pub rows: usize,
    /// Number of cell columns.
    pub columns: usize,
    /// Rule system.
    #[serde(default)]
    pub mode: WorldMode,
    /// Neighborhood used by every rule system (serialized as 4 or 8).
    #[serde(default)]
    pub neighborhood: Neighborhood,
    /// Occupancy table for SIR population sampling.
    #[serde(default)]
    pub occupancy: Occupancy,
    /// Whether EMPTY and RECOVERED cells may turn over.
    #[serde(default)]
    pub allow_births: bool,
    /// Whether carrier states take part in the fixed SIR rules.
    #[serde(default)]
    pub allow_carriers: bool,
    /// Seed for occupancy sampling. Entropy-seeded when absent.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            rows: 30,
            columns: 40,
            mode: WorldMode::Sir,
            neighborhood: Neighborhood::Moore,
            occupancy: Occupancy::standard(),
            allow_births: false,
            allow_carriers: false,
            random_seed: None,
        }
    }
}

impl WorldConfig {
    /// Total number of cells.
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.rows * self.columns
    }

    /// Validate configuration parameters.
    ///
    /// Both dimensions must be non-zero and their product must fit in `usize`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.columns == 0 || self.rows.checked_mul(self.columns).is_none() {
            return Err(ConfigError::InvalidDimensions);
        }
        self.occupancy.validate()
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown world mode {0:?} (expected \"SIR\" or \"GOL\")")]
    UnknownMode(String),
    #[error("Neighborhood size {0} is not supported (expected 4 or 8)")]
    UnsupportedNeighborhood(usize),
    #[error("Grid dimensions (rows, columns) must be non-zero and their product must fit in memory")]
    InvalidDimensions,
    #[error("Occupancy percentages sum to {total}, expected 100")]
    InvalidOccupancy { total: u32 },
}
