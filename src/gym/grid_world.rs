use std::collections::{BTreeMap, BTreeSet};

use log::trace;
use strum::{Display, EnumIter, VariantArray};

use crate::{
    env::{DiscreteActionSpace, DiscreteStateSpace, Environment},
    error::{Error, Result},
};

/// Row/column coordinates of a cell
pub type Coords = (usize, usize);

/// Moves available in a [`GridWorld`], in canonical order
///
/// Greedy selection breaks ties in favor of the earlier variant.
#[derive(EnumIter, VariantArray, Display, Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

/// What an observer should draw in a cell, see [`GridWorld::layout`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Agent,
    Hazard,
    TeleportIn,
    TeleportOut,
    Goal,
}

/// Configuration for the [`GridWorld`]
#[derive(Debug, Clone, PartialEq)]
pub struct GridWorldConfig {
    /// Number of cells per line, which is also the vertical stride between cells
    ///
    /// **Default**: `4`
    pub rows: usize,
    /// Number of lines
    ///
    /// **Default**: `4`
    pub columns: usize,
    /// Fire pits, which send the agent back to the start
    ///
    /// **Default**: `{11, 12}`
    pub hazards: BTreeSet<usize>,
    /// Teleporter entrances mapped to their exits
    ///
    /// **Default**: `{5: 14, 13: 2}`
    pub teleporters: BTreeMap<usize, usize>,
}

impl Default for GridWorldConfig {
    fn default() -> Self {
        Self {
            rows: 4,
            columns: 4,
            hazards: BTreeSet::from([11, 12]),
            teleporters: BTreeMap::from([(5, 14), (13, 2)]),
        }
    }
}

/// A grid of cells numbered `0..rows * columns` with fire pits and teleporters
///
/// The agent starts in cell `0` and the episode ends in the last cell. Every move costs `-1`,
/// falling into a fire pit costs another `-1` and puts the agent back on cell `0`, and stepping
/// onto a teleporter entrance moves the agent straight to its exit. Moves that leave the grid or
/// wrap around the edge of a line are rejected: the agent stays put but is still charged for
/// the move it tried to make.
///
/// Cells are laid out in lines of `rows` cells, so `Up` and `Down` move by `rows` cells and a
/// cell's coordinates are `(state / rows, state % rows)`. On a square grid this is the usual
/// row-major layout.
///
/// Intended for use with a [`QTableAgent`](crate::algo::tabular::q_table::QTableAgent)
#[derive(Debug, Clone)]
pub struct GridWorld {
    rows: usize,
    columns: usize,
    hazards: BTreeSet<usize>,
    teleporters: BTreeMap<usize, usize>,
    pos: usize,
}

impl GridWorld {
    /// Build a grid world, checking that every special cell is on the grid and that the goal
    /// is neither a fire pit nor a teleporter entrance
    pub fn new(config: GridWorldConfig) -> Result<Self> {
        let GridWorldConfig {
            rows,
            columns,
            hazards,
            teleporters,
        } = config;

        // With fewer than three cells per line every horizontal move looks like a wrap
        let size = rows
            .checked_mul(columns)
            .filter(|_| rows >= 3 && columns >= 1)
            .ok_or(Error::InvalidDimensions { rows, columns })?;
        let goal = size - 1;

        let check = |kind, state: usize, may_be_goal: bool| {
            if state >= size {
                Err(Error::CellOutOfBounds { kind, state, size })
            } else if state == goal && !may_be_goal {
                Err(Error::GoalConflict { kind, state })
            } else {
                Ok(())
            }
        };
        for &pit in &hazards {
            check("hazard", pit, false)?;
        }
        for (&entrance, &exit) in &teleporters {
            check("teleporter entrance", entrance, false)?;
            check("teleporter exit", exit, true)?;
        }

        Ok(Self {
            rows,
            columns,
            hazards,
            teleporters,
            pos: 0,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// The terminal cell
    pub fn goal(&self) -> usize {
        self.rows * self.columns - 1
    }

    /// The cell the agent is currently on
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_goal(&self, state: usize) -> bool {
        state == self.goal()
    }

    pub fn to_coords(&self, state: usize) -> Coords {
        (state / self.rows, state % self.rows)
    }

    pub fn from_coords(&self, (row, column): Coords) -> usize {
        row * self.rows + column
    }

    pub fn agent_coords(&self) -> Coords {
        self.to_coords(self.pos)
    }

    pub fn hazard_coords(&self) -> Vec<Coords> {
        self.hazards.iter().map(|&s| self.to_coords(s)).collect()
    }

    /// `(entrance, exit)` coordinates for every teleporter
    pub fn teleporter_coords(&self) -> Vec<(Coords, Coords)> {
        self.teleporters
            .iter()
            .map(|(&i, &o)| (self.to_coords(i), self.to_coords(o)))
            .collect()
    }

    /// Rebuild a drawable picture of the grid, indexed by [`to_coords`](Self::to_coords)
    ///
    /// Later layers win where cells overlap: hazards, teleporter entrances and exits, the
    /// agent, then the goal.
    pub fn layout(&self) -> Vec<Vec<Cell>> {
        let mut grid = vec![vec![Cell::Empty; self.rows]; self.columns];
        let mut paint = |state: usize, cell: Cell| {
            let (r, c) = self.to_coords(state);
            grid[r][c] = cell;
        };

        for &pit in &self.hazards {
            paint(pit, Cell::Hazard);
        }
        for (&entrance, &exit) in &self.teleporters {
            paint(entrance, Cell::TeleportIn);
            paint(exit, Cell::TeleportOut);
        }
        paint(self.pos, Cell::Agent);
        paint(self.goal(), Cell::Goal);

        grid
    }

    fn offset(&self, action: Action) -> isize {
        let stride = self.rows as isize;
        match action {
            Action::Up => -stride,
            Action::Down => stride,
            Action::Left => -1,
            Action::Right => 1,
        }
    }

    /// Whether moving from `old` to `new` leaves the grid or wraps across the edge of a line
    fn is_off_grid(&self, new: usize, old: usize) -> bool {
        let last = self.rows - 1;
        new > self.goal()
            || (old % self.rows == 0 && new % self.rows == last)
            || (old % self.rows == last && new % self.rows == 0)
    }
}

impl Environment for GridWorld {
    type State = usize;
    type Action = Action;

    fn step(&mut self, action: Self::Action) -> (Self::State, f32, bool) {
        let old = self.pos;
        let mut reward = 0.0;

        // `None` is a cell above the first line
        let mut candidate = old.checked_add_signed(self.offset(action));

        if candidate.is_some_and(|s| self.hazards.contains(&s)) {
            trace!("fell into fire pit {candidate:?} moving {action} from {old}");
            candidate = Some(0);
            reward -= 1.0;
        }

        if let Some(&exit) = candidate.and_then(|s| self.teleporters.get(&s)) {
            candidate = Some(exit);
        }

        let reached_goal = candidate.is_some_and(|s| self.is_goal(s));
        if reached_goal {
            reward = 0.0;
        } else {
            reward -= 1.0;
        }

        match candidate.filter(|&s| !self.is_off_grid(s, old)) {
            Some(next) => {
                self.pos = next;
                (next, reward, reached_goal)
            }
            None => {
                trace!("rejected move {action} from {old} to {candidate:?}");
                (old, reward, self.is_goal(old))
            }
        }
    }

    fn reset(&mut self) -> Self::State {
        self.pos = 0;
        self.pos
    }
}

impl DiscreteActionSpace for GridWorld {
    fn actions(&self) -> Vec<Self::Action> {
        Action::VARIANTS.to_vec()
    }

    fn action_index(&self, action: &Self::Action) -> usize {
        *action as usize
    }
}

impl DiscreteStateSpace for GridWorld {
    fn num_states(&self) -> usize {
        self.rows * self.columns
    }
}
