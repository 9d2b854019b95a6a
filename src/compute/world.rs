//! Grid world - the cellular automaton driver.
//!
//! A [`World`] owns a dense `rows x columns` grid of [`Cell`]s and evolves it
//! one generation at a time. Every step first plans the pending state of every
//! cell from the current grid, then commits all cells together.

use std::fmt;

use log::debug;
use rand::prelude::*;

use crate::schema::{
    ConfigError, Neighborhood, Occupancy, Preset, WorldConfig, WorldMode, offset_from_center,
};

use super::{Cell, CellState, RuleChromosome, Thresholds};

/// Steps a carrier must age before it may recover.
pub const CARRIER_DWELL_STEPS: u32 = 50;

/// Neighbor offsets; the first four are the von Neumann neighborhood.
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, 0),
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 1),
    (1, 1),
    (1, -1),
    (-1, -1),
];

const INFECTIOUS: &[CellState] = &[CellState::Infected];
const INFECTIOUS_WITH_CARRIERS: &[CellState] = &[CellState::Infected, CellState::CarrierInfected];

/// 100-slot table for weighted occupancy sampling.
#[derive(Debug, Clone)]
struct SamplingTable([CellState; 100]);

impl SamplingTable {
    fn new(occupancy: &Occupancy) -> Self {
        let mut slots = [CellState::Undefined; 100];
        let weights = [
            (CellState::Empty, occupancy.empty),
            (CellState::Susceptible, occupancy.susceptible),
            (CellState::Infected, occupancy.infected),
            (CellState::CarrierUninfected, occupancy.carrier),
        ];

        let mut free = slots.iter_mut();
        for (state, percent) in weights {
            for slot in free.by_ref().take(usize::from(percent)) {
                *slot = state;
            }
        }

        Self(slots)
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> CellState {
        self.0.choose(rng).copied().unwrap_or_default()
    }
}

/// How a transition changes the pending age.
#[derive(Debug, Clone, Copy)]
enum Aging {
    Hold,
    Advance,
    Restart,
}

/// Planned change for one cell.
#[derive(Debug, Clone, Copy)]
struct Transition {
    state: CellState,
    aging: Aging,
    new_infection: bool,
}

impl Transition {
    const fn hold(state: CellState) -> Self {
        Self {
            state,
            aging: Aging::Hold,
            new_infection: false,
        }
    }

    const fn advance(state: CellState) -> Self {
        Self {
            state,
            aging: Aging::Advance,
            new_infection: false,
        }
    }

    const fn restart(state: CellState) -> Self {
        Self {
            state,
            aging: Aging::Restart,
            new_infection: false,
        }
    }

    const fn infection() -> Self {
        Self {
            state: CellState::Infected,
            aging: Aging::Advance,
            new_infection: true,
        }
    }
}

/// Grid world state and rule engine.
#[derive(Debug, Clone)]
pub struct World {
    rows: usize,
    columns: usize,
    /// Row-major cells.
    cells: Vec<Cell>,
    mode: WorldMode,
    neighborhood: Neighborhood,
    allow_births: bool,
    allow_carriers: bool,
    /// Generations advanced since the last reset.
    generation: u64,
    stagnant: bool,
    new_infections: u64,
    occupancy: Occupancy,
    sampler: SamplingTable,
    rng: StdRng,
}

impl World {
    /// Build a world from configuration.
    ///
    /// SIR worlds are populated from the occupancy table; Game of Life worlds
    /// start all DEAD.
    pub fn new(config: &WorldConfig) -> Result<Self, WorldError> {
        config.validate()?;

        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut world = Self {
            rows: config.rows,
            columns: config.columns,
            cells: vec![Cell::new(CellState::Undefined); config.grid_size()],
            mode: config.mode,
            neighborhood: config.neighborhood,
            allow_births: config.allow_births,
            allow_carriers: config.allow_carriers,
            generation: 0,
            stagnant: false,
            new_infections: 0,
            occupancy: config.occupancy,
            sampler: SamplingTable::new(&config.occupancy),
            rng,
        };

        match world.mode {
            WorldMode::GameOfLife => world.reset_to(CellState::Dead),
            WorldMode::Sir => {
                world.reset_to(CellState::Empty);
                world.randomize_population();
            }
        }

        Ok(world)
    }

    /// Build a world from loose parameters, parsing the mode name and
    /// neighborhood size.
    pub fn configure(
        rows: usize,
        columns: usize,
        mode: &str,
        neighborhood: usize,
        occupancy: Occupancy,
    ) -> Result<Self, WorldError> {
        let config = WorldConfig {
            rows,
            columns,
            mode: mode.parse()?,
            neighborhood: Neighborhood::try_from(neighborhood)?,
            occupancy,
            ..Default::default()
        };
        Self::new(&config)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// `(rows, columns)`.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    pub fn mode(&self) -> WorldMode {
        self.mode
    }

    pub fn neighborhood(&self) -> Neighborhood {
        self.neighborhood
    }

    pub fn occupancy(&self) -> Occupancy {
        self.occupancy
    }

    pub fn allows_births(&self) -> bool {
        self.allow_births
    }

    pub fn allows_carriers(&self) -> bool {
        self.allow_carriers
    }

    /// Generations advanced since the last reset. Stagnant steps do not count.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the last step left every cell unchanged.
    pub fn is_stagnant(&self) -> bool {
        self.stagnant
    }

    /// SUSCEPTIBLE -> INFECTED transitions since the last reset.
    pub fn new_infection_count(&self) -> u64 {
        self.new_infections
    }

    #[inline]
    fn index(&self, row: usize, column: usize) -> Result<usize, WorldError> {
        if row < self.rows && column < self.columns {
            Ok(row * self.columns + column)
        } else {
            Err(WorldError::OutOfBounds {
                row,
                column,
                rows: self.rows,
                columns: self.columns,
            })
        }
    }

    /// Current state at `(row, column)`.
    pub fn cell_state(&self, row: usize, column: usize) -> Result<CellState, WorldError> {
        Ok(self.cells[self.index(row, column)?].state())
    }

    /// Copy of the cell at `(row, column)`.
    pub fn cell(&self, row: usize, column: usize) -> Result<Cell, WorldError> {
        Ok(self.cells[self.index(row, column)?])
    }

    /// Overwrite the current state at `(row, column)`.
    pub fn set_cell_state(
        &mut self,
        row: usize,
        column: usize,
        state: CellState,
    ) -> Result<(), WorldError> {
        let idx = self.index(row, column)?;
        self.cells[idx].set_state(state);
        Ok(())
    }

    /// Flip ALIVE to DEAD; anything else becomes ALIVE.
    pub fn toggle_cell(&mut self, row: usize, column: usize) -> Result<(), WorldError> {
        let next = match self.cell_state(row, column)? {
            CellState::Alive => CellState::Dead,
            _ => CellState::Alive,
        };
        self.set_cell_state(row, column, next)
    }

    /// Number of cells currently in `state`.
    pub fn count_state(&self, state: CellState) -> usize {
        self.cells.iter().filter(|c| c.state() == state).count()
    }

    /// Current states, row-major.
    pub fn states(&self) -> impl Iterator<Item = CellState> + '_ {
        self.cells.iter().map(Cell::state)
    }

    pub fn set_allow_births(&mut self, allow: bool) {
        self.allow_births = allow;
    }

    pub fn set_allow_carriers(&mut self, allow: bool) {
        self.allow_carriers = allow;
    }

    pub fn set_neighborhood(&mut self, neighborhood: Neighborhood) {
        self.neighborhood = neighborhood;
    }

    /// Replace the occupancy table used by [`World::randomize_population`].
    pub fn set_occupancy(&mut self, occupancy: Occupancy) -> Result<(), WorldError> {
        occupancy.validate()?;
        self.occupancy = occupancy;
        self.sampler = SamplingTable::new(&occupancy);
        Ok(())
    }

    /// Switch rule system. Game of Life clears the grid to DEAD; SIR
    /// re-samples every cell.
    pub fn set_mode(&mut self, mode: WorldMode) {
        self.mode = mode;
        match mode {
            WorldMode::GameOfLife => self.reset_to(CellState::Dead),
            WorldMode::Sir => {
                self.reset();
                self.randomize_population();
            }
        }
        debug!("World switched to {} mode", mode);
    }

    /// Clear the generation counter, stagnation flag and infection count.
    pub fn reset(&mut self) {
        self.stagnant = false;
        self.generation = 0;
        self.new_infections = 0;
    }

    /// [`World::reset`] and force every cell to `state` with zero age.
    pub fn reset_to(&mut self, state: CellState) {
        self.reset();
        for cell in &mut self.cells {
            cell.reset_to(state);
        }
    }

    /// Re-sample every cell from the occupancy table.
    pub fn randomize_population(&mut self) {
        let Self {
            cells, sampler, rng, ..
        } = self;
        for cell in cells.iter_mut() {
            cell.set_state(sampler.sample(rng));
        }
    }

    /// Clear to DEAD and place a Game of Life preset around the center.
    pub fn load_preset(&mut self, preset: Preset) -> Result<(), WorldError> {
        let positions = preset
            .offsets()
            .iter()
            .map(|&offset| {
                offset_from_center(self.rows, self.columns, offset).ok_or(
                    WorldError::PatternOutOfBounds {
                        offset,
                        rows: self.rows,
                        columns: self.columns,
                    },
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.reset_to(CellState::Dead);
        for (row, column) in positions {
            self.set_cell_state(row, column, CellState::Alive)?;
        }
        debug!("Loaded preset {}", preset.name());
        Ok(())
    }

    /// Neighbors of `(row, column)` currently in `state`.
    pub fn neighbor_count(
        &self,
        row: usize,
        column: usize,
        state: CellState,
    ) -> Result<usize, WorldError> {
        self.index(row, column)?;
        Ok(self.count_neighbors(row, column, &[state]))
    }

    /// State at an offset from `(row, column)`, UNDEFINED off the grid.
    fn state_at_offset(&self, row: usize, column: usize, (dr, dc): (isize, isize)) -> CellState {
        match (row.checked_add_signed(dr), column.checked_add_signed(dc)) {
            (Some(r), Some(c)) if r < self.rows && c < self.columns => {
                self.cells[r * self.columns + c].state()
            }
            _ => CellState::Undefined,
        }
    }

    fn count_neighbors(&self, row: usize, column: usize, states: &[CellState]) -> usize {
        NEIGHBOR_OFFSETS[..self.neighborhood.size()]
            .iter()
            .filter(|&&offset| states.contains(&self.state_at_offset(row, column, offset)))
            .count()
    }

    /// Advance one generation under the fixed rules of the active mode.
    pub fn step(&mut self) {
        match self.mode {
            WorldMode::GameOfLife => self.plan(Self::life_transition),
            WorldMode::Sir => {
                let carriers = self.allow_carriers;
                self.plan(|world, row, column, cell| {
                    world.sir_transition(row, column, cell, &Thresholds::FIXED, carriers)
                });
            }
        }
        self.commit();
    }

    /// Advance one SIR generation with thresholds decoded from `chromosome`.
    ///
    /// Carrier states are ignored by the decoded rule set and hold.
    pub fn step_with_rule(&mut self, chromosome: &RuleChromosome) -> Result<(), WorldError> {
        if self.mode != WorldMode::Sir {
            return Err(WorldError::RuleRequiresSir(self.mode));
        }

        let thresholds = chromosome.thresholds();
        self.plan(|world, row, column, cell| {
            world.sir_transition(row, column, cell, &thresholds, false)
        });
        self.commit();
        Ok(())
    }

    /// Compute every cell's pending state from the current grid.
    ///
    /// Only current states are read while planning, so writing pending fields
    /// in place cannot affect later cells in the pass.
    fn plan<F>(&mut self, rule: F)
    where
        F: Fn(&Self, usize, usize, &Cell) -> Transition,
    {
        for row in 0..self.rows {
            for column in 0..self.columns {
                let idx = row * self.columns + column;
                let current = self.cells[idx];
                let transition = rule(self, row, column, &current);

                let cell = &mut self.cells[idx];
                cell.set_next_state(transition.state);
                match transition.aging {
                    Aging::Hold => {}
                    Aging::Advance => cell.age_next(),
                    Aging::Restart => cell.set_next_age(0),
                }
                if transition.new_infection {
                    self.new_infections += 1;
                }
            }
        }
    }

    /// Commit all pending states, then update stagnation and generation.
    fn commit(&mut self) {
        self.stagnant = self.cells.iter().all(Cell::is_settled);
        for cell in &mut self.cells {
            cell.commit();
        }
        if !self.stagnant {
            self.generation += 1;
        }
    }

    fn life_transition(&self, row: usize, column: usize, cell: &Cell) -> Transition {
        let alive = self.count_neighbors(row, column, &[CellState::Alive]);
        let next = match cell.state() {
            CellState::Alive if alive == 2 || alive == 3 => CellState::Alive,
            CellState::Alive => CellState::Dead,
            CellState::Dead if alive == 3 => CellState::Alive,
            CellState::Dead => CellState::Dead,
            other => other,
        };
        Transition::hold(next)
    }

    fn sir_transition(
        &self,
        row: usize,
        column: usize,
        cell: &Cell,
        thresholds: &Thresholds,
        carriers: bool,
    ) -> Transition {
        let infectious = if carriers {
            INFECTIOUS_WITH_CARRIERS
        } else {
            INFECTIOUS
        };
        let count = |states: &[CellState]| self.count_neighbors(row, column, states);

        match cell.state() {
            CellState::Empty => {
                if self.allow_births && count(&[CellState::Empty]) >= thresholds.birth {
                    Transition::restart(CellState::Susceptible)
                } else {
                    Transition::restart(CellState::Empty)
                }
            }
            CellState::Susceptible => {
                if count(infectious) >= thresholds.infection {
                    Transition::infection()
                } else {
                    Transition::advance(CellState::Susceptible)
                }
            }
            CellState::Infected => {
                if count(infectious) <= thresholds.recovery {
                    Transition::restart(CellState::Recovered)
                } else {
                    Transition::advance(CellState::Infected)
                }
            }
            CellState::Recovered => {
                if self.allow_births && count(&[CellState::Recovered]) >= thresholds.rebirth {
                    Transition::restart(CellState::Empty)
                } else {
                    Transition::restart(CellState::Recovered)
                }
            }
            CellState::CarrierUninfected if carriers => {
                if count(infectious) >= thresholds.infection {
                    Transition::advance(CellState::CarrierInfected)
                } else {
                    Transition::advance(CellState::CarrierUninfected)
                }
            }
            CellState::CarrierInfected if carriers => {
                if count(infectious) <= thresholds.recovery && cell.age() >= CARRIER_DWELL_STEPS {
                    Transition::restart(CellState::Recovered)
                } else {
                    Transition::advance(CellState::CarrierInfected)
                }
            }
            other => Transition::hold(other),
        }
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.columns.max(1)) {
            for cell in row {
                write!(f, "{cell}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// World errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    #[error("Cell ({row}, {column}) is outside the {rows}x{columns} grid")]
    OutOfBounds {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },
    #[error("Rule chromosomes only drive SIR worlds, this world is {0}")]
    RuleRequiresSir(WorldMode),
    #[error("Pattern offset {offset:?} falls outside the {rows}x{columns} grid")]
    PatternOutOfBounds {
        offset: (isize, isize),
        rows: usize,
        columns: usize,
    },
    #[error("Invalid world configuration: {0}")]
    Config(#[from] ConfigError),
}
