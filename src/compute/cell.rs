//! Cell states and the double-buffered cell.
//!
//! Each cell carries its current state and age plus the pending values the
//! next step will commit, so a whole grid can be planned before any cell
//! changes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Symbol held by a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellState {
    /// Sentinel for out-of-bounds neighbors and freshly reset pending states.
    #[default]
    Undefined,
    Dead,
    Alive,
    Empty,
    Susceptible,
    Infected,
    Recovered,
    /// Carrier that has not picked up the infection.
    CarrierUninfected,
    /// Carrier that transmits without counting as INFECTED.
    CarrierInfected,
}

impl CellState {
    /// Single-character symbol.
    pub const fn symbol(self) -> char {
        match self {
            Self::Undefined => 'U',
            Self::Dead => 'D',
            Self::Alive => 'A',
            Self::Empty => 'E',
            Self::Susceptible => 'S',
            Self::Infected => 'I',
            Self::Recovered => 'R',
            Self::CarrierUninfected => 'C',
            Self::CarrierInfected => 'X',
        }
    }

    /// Inverse of [`CellState::symbol`].
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'U' => Some(Self::Undefined),
            'D' => Some(Self::Dead),
            'A' => Some(Self::Alive),
            'E' => Some(Self::Empty),
            'S' => Some(Self::Susceptible),
            'I' => Some(Self::Infected),
            'R' => Some(Self::Recovered),
            'C' => Some(Self::CarrierUninfected),
            'X' => Some(Self::CarrierInfected),
            _ => None,
        }
    }

    /// Whether the state belongs to the SIR symbol set.
    pub const fn is_sir(self) -> bool {
        matches!(
            self,
            Self::Empty
                | Self::Susceptible
                | Self::Infected
                | Self::Recovered
                | Self::CarrierUninfected
                | Self::CarrierInfected
        )
    }

    /// Whether the state belongs to the Game of Life symbol set.
    pub const fn is_life(self) -> bool {
        matches!(self, Self::Dead | Self::Alive)
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single grid cell.
///
/// `next_state` and `next_age` hold the values computed for the coming step;
/// [`Cell::commit`] moves them into place. Since commit copies `next_age` into
/// `age`, the two ages agree at the start of every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    state: CellState,
    next_state: CellState,
    age: u32,
    next_age: u32,
}

impl Cell {
    /// Create a cell in `state` with age zero and no pending state.
    pub const fn new(state: CellState) -> Self {
        Self {
            state,
            next_state: CellState::Undefined,
            age: 0,
            next_age: 0,
        }
    }

    #[inline]
    pub const fn state(&self) -> CellState {
        self.state
    }

    #[inline]
    pub const fn next_state(&self) -> CellState {
        self.next_state
    }

    #[inline]
    pub const fn age(&self) -> u32 {
        self.age
    }

    #[inline]
    pub const fn next_age(&self) -> u32 {
        self.next_age
    }

    pub fn set_state(&mut self, state: CellState) {
        self.state = state;
    }

    pub fn set_next_state(&mut self, state: CellState) {
        self.next_state = state;
    }

    pub fn set_age(&mut self, age: u32) {
        self.age = age;
    }

    pub fn set_next_age(&mut self, age: u32) {
        self.next_age = age;
    }

    /// Increment the current age.
    pub fn grow_older(&mut self) {
        self.age = self.age.saturating_add(1);
    }

    /// Increment the pending age.
    pub fn age_next(&mut self) {
        self.next_age = self.next_age.saturating_add(1);
    }

    /// Whether the pending state equals the current one.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.state == self.next_state
    }

    /// Move the pending state and age into place.
    #[inline]
    pub fn commit(&mut self) {
        self.state = self.next_state;
        self.age = self.next_age;
    }

    /// Force `state`, clear both ages and the pending state.
    pub fn reset_to(&mut self, state: CellState) {
        *self = Self::new(state);
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.state)
    }
}
