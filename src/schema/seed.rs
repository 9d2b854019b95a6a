//! Seed patterns for initializing SIRCA worlds.
//!
//! All patterns are expressed as `(row, column)` offsets from the grid center,
//! which is `(rows / 2, columns / 2)`.

use serde::{Deserialize, Serialize};

/// Predefined Game of Life patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Five-cell glider heading south-east.
    Glider,
    /// Ten cells in a horizontal line.
    RowOfTen,
    /// Seven-cell exploder.
    SmallExploder,
    /// Twelve-cell exploder.
    Exploder,
    /// Tumbler oscillator.
    Tumbler,
    /// Empty grid.
    Clear,
}

const GLIDER: &[(isize, isize)] = &[(1, -1), (1, 0), (1, 1), (0, 1), (-1, 0)];

const ROW_OF_TEN: &[(isize, isize)] = &[
    (0, -5),
    (0, -4),
    (0, -3),
    (0, -2),
    (0, -1),
    (0, 0),
    (0, 1),
    (0, 2),
    (0, 3),
    (0, 4),
];

const SMALL_EXPLODER: &[(isize, isize)] = &[
    (-2, 0),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, 0),
];

const EXPLODER: &[(isize, isize)] = &[
    (-2, -2),
    (-2, 0),
    (-2, 2),
    (-1, -2),
    (-1, 2),
    (0, -2),
    (0, 2),
    (1, -2),
    (1, 2),
    (2, -2),
    (2, 0),
    (2, 2),
];

const TUMBLER: &[(isize, isize)] = &[
    (-2, -2),
    (-2, -1),
    (-2, 1),
    (-2, 2),
    (-1, -2),
    (-1, -1),
    (-1, 1),
    (-1, 2),
    (0, -1),
    (0, 1),
    (1, -3),
    (1, -1),
    (1, 1),
    (1, 3),
    (2, -3),
    (2, -1),
    (2, 1),
    (2, 3),
    (3, -3),
    (3, -2),
    (3, 2),
    (3, 3),
];

impl Preset {
    /// Every preset, in menu order.
    pub const ALL: [Self; 6] = [
        Self::Glider,
        Self::RowOfTen,
        Self::SmallExploder,
        Self::Exploder,
        Self::Tumbler,
        Self::Clear,
    ];

    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Glider => "Glider",
            Self::RowOfTen => "Row Of Ten",
            Self::SmallExploder => "Small Exploder",
            Self::Exploder => "Exploder",
            Self::Tumbler => "Tumbler",
            Self::Clear => "Clear",
        }
    }

    /// Offsets of the ALIVE cells.
    pub const fn offsets(self) -> &'static [(isize, isize)] {
        match self {
            Self::Glider => GLIDER,
            Self::RowOfTen => ROW_OF_TEN,
            Self::SmallExploder => SMALL_EXPLODER,
            Self::Exploder => EXPLODER,
            Self::Tumbler => TUMBLER,
            Self::Clear => &[],
        }
    }
}

/// Starting grid used when scoring rule chromosomes: every cell SUSCEPTIBLE
/// except the listed offsets, which start INFECTED.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialCondition {
    /// Offsets of the INFECTED cells.
    pub infected: Vec<(isize, isize)>,
}

impl Default for InitialCondition {
    /// Three infected cells in a horizontal line through the center.
    fn default() -> Self {
        Self {
            infected: vec![(0, -1), (0, 0), (0, 1)],
        }
    }
}

/// Resolve a center-relative offset to grid coordinates.
///
/// Returns `None` when the offset lands outside a `rows x columns` grid.
pub fn offset_from_center(
    rows: usize,
    columns: usize,
    (row_offset, column_offset): (isize, isize),
) -> Option<(usize, usize)> {
    let row = (rows / 2).checked_add_signed(row_offset)?;
    let column = (columns / 2).checked_add_signed(column_offset)?;
    (row < rows && column < columns).then_some((row, column))
}
