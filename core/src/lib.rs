#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Chronolife engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative simulation, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then reports [`Event`] values describing what
//! actually changed. The [`Grid`] lives here as well so that the step engine,
//! the world and renderers all agree on a single cell representation.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of cell columns in the default field.
pub const GRID_WIDTH: u32 = 64;

/// Number of cell rows in the default field.
pub const GRID_HEIGHT: u32 = 48;

/// Maximum number of snapshots retained for stepping backwards.
pub const HISTORY_LIMIT: usize = 10_000;

/// Time between automatic generations at the 1x multiplier.
pub const BASE_STEP_INTERVAL: Duration = Duration::from_millis(100);

/// Ordered playback multipliers cycled by the speed control.
pub const SPEED_MULTIPLIERS: [u32; 4] = [1, 2, 4, 8];

/// Probability that a cell starts alive when the field is randomised.
pub const DEFAULT_DENSITY: f64 = 0.25;

/// Commands that express all permissible simulation mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Wall-clock time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Flips between paused and running playback.
    TogglePause,
    /// Pauses playback and advances exactly one generation.
    StepForward,
    /// Restores the most recently recorded generation, if any.
    StepBackward,
    /// Moves to the next entry of [`SPEED_MULTIPLIERS`], wrapping at the end.
    ToggleSpeedMultiplier,
    /// Replaces the field with freshly randomised cells.
    Randomize,
    /// Kills every cell in the field.
    Clear,
    /// Starts a paint stroke over the provided cell.
    PressPointer {
        /// Cell under the pointer when the button went down.
        cell: CellCoord,
    },
    /// Continues the active paint stroke over the provided cell.
    DragPointer {
        /// Cell currently under the held pointer.
        cell: CellCoord,
    },
    /// Records whether the pointer button is held.
    SetPointerDown {
        /// Whether the button is currently held.
        down: bool,
    },
    /// Writes a single cell directly, honouring the paused-only editing rule.
    PaintCell {
        /// Cell to overwrite.
        cell: CellCoord,
        /// Liveness written into the cell.
        alive: bool,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of wall-clock time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a new generation replaced the field.
    GenerationAdvanced {
        /// Number of snapshots available for stepping back afterwards.
        history_len: usize,
    },
    /// Confirms that the field was restored from history.
    GenerationRewound {
        /// Number of snapshots still available after the rewind.
        history_len: usize,
    },
    /// Announces that playback switched between paused and running.
    PlayStateChanged {
        /// State that became active.
        state: PlayState,
    },
    /// Announces that the playback multiplier changed.
    SpeedChanged {
        /// Setting that became active.
        speed: SpeedSetting,
    },
    /// Confirms that the field was randomised.
    GridRandomized {
        /// Live cells after randomisation.
        population: usize,
    },
    /// Confirms that every cell was killed.
    GridCleared,
    /// Confirms that a single cell was written by an edit.
    CellPainted {
        /// Cell that was written.
        cell: CellCoord,
        /// Liveness written into the cell.
        alive: bool,
    },
    /// Reports a change of the pointer button state.
    PointerChanged {
        /// Whether the button is now held.
        down: bool,
    },
}

/// Playback state of the simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayState {
    /// Generations only advance through explicit steps; the field is editable.
    #[default]
    Paused,
    /// Generations advance automatically on every elapsed step interval.
    Running,
}

impl PlayState {
    /// Returns the opposite state.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Paused => Self::Running,
            Self::Running => Self::Paused,
        }
    }

    /// Reports whether the state is [`PlayState::Paused`].
    #[must_use]
    pub const fn is_paused(self) -> bool {
        matches!(self, Self::Paused)
    }
}

/// Index into [`SPEED_MULTIPLIERS`] that is valid by construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpeedSetting(usize);

impl SpeedSetting {
    /// Creates a setting for the provided index, wrapping out-of-range values.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index % SPEED_MULTIPLIERS.len())
    }

    /// Position of the setting inside [`SPEED_MULTIPLIERS`].
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0
    }

    /// Playback multiplier selected by the setting.
    #[must_use]
    pub const fn multiplier(&self) -> u32 {
        SPEED_MULTIPLIERS[self.0]
    }

    /// Following setting, wrapping from the fastest back to 1x.
    #[must_use]
    pub const fn next(self) -> Self {
        Self::new(self.0 + 1)
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Fixed-size toroidal field of boolean cells.
///
/// Reads outside the field report a dead cell and writes outside the field are
/// ignored, so callers never need to pre-validate coordinates. Neighbour
/// counting wraps at every edge: each cell has exactly eight neighbours.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl Grid {
    /// Creates an all-dead grid with the provided dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let capacity_u64 = u64::from(width) * u64::from(height);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            width,
            height,
            cells: vec![false; capacity],
        }
    }

    /// Creates a grid whose only live cells are the provided coordinates.
    ///
    /// Coordinates outside the field are ignored.
    #[must_use]
    pub fn from_live_cells<I>(width: u32, height: u32, live: I) -> Self
    where
        I: IntoIterator<Item = CellCoord>,
    {
        let mut grid = Self::new(width, height);
        for cell in live {
            grid.set(cell, true);
        }
        grid
    }

    /// Number of columns in the field.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the field.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the cell lies inside the field.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Returns the cell's liveness; out-of-range cells are dead.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }

    /// Overwrites a single cell; out-of-range writes are ignored.
    pub fn set(&mut self, cell: CellCoord, alive: bool) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = alive;
            }
        }
    }

    /// Counts live cells among the eight toroidally wrapped neighbours.
    #[must_use]
    pub fn count_live_neighbors(&self, cell: CellCoord) -> u8 {
        if !self.contains(cell) {
            return 0;
        }

        let columns = wrapped_neighborhood(cell.column(), self.width);
        let rows = wrapped_neighborhood(cell.row(), self.height);

        let mut count = 0;
        for (row_offset, row) in rows.iter().enumerate() {
            for (column_offset, column) in columns.iter().enumerate() {
                if row_offset == 1 && column_offset == 1 {
                    continue;
                }
                if self.get(CellCoord::new(*column, *row)) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Sets every cell live independently with probability `density`.
    ///
    /// Densities at or below zero (including NaN) kill every cell and
    /// densities at or above one fill the field.
    pub fn randomize<R: Rng + ?Sized>(&mut self, density: f64, rng: &mut R) {
        if !(density > 0.0) {
            self.clear();
            return;
        }
        if density >= 1.0 {
            self.cells.fill(true);
            return;
        }
        for slot in &mut self.cells {
            *slot = rng.gen_bool(density);
        }
    }

    /// Kills every cell.
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Number of live cells.
    #[must_use]
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|alive| **alive).count()
    }

    /// Reports whether no cell is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(|alive| *alive)
    }

    /// Iterator over live cells in row-major order.
    pub fn live_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .filter_map(move |(index, _)| {
                let index = u32::try_from(index).ok()?;
                Some(CellCoord::new(index % width, index / width))
            })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.width).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Returns `[previous, value, next]` along an axis of length `extent`, wrapping
/// at both ends. `value` must lie below `extent`.
const fn wrapped_neighborhood(value: u32, extent: u32) -> [u32; 3] {
    let previous = if value == 0 { extent - 1 } else { value - 1 };
    let next = if value + 1 == extent { 0 } else { value + 1 };
    [previous, value, next]
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(GRID_WIDTH, GRID_HEIGHT)
    }
}
