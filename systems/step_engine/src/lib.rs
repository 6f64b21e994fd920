#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure generation-transition system implementing the B3/S23 Life rule.
//!
//! Every cell of the next generation is derived from the same prior grid, so
//! the result never observes a partially updated field. [`StepEngine`] keeps a
//! scratch buffer around and swaps it with the caller's grid once the whole
//! generation has been written.

use chronolife_core::{CellCoord, Grid};

/// Decides a cell's next liveness from its current state and neighbour count.
#[must_use]
pub const fn survives(alive: bool, live_neighbors: u8) -> bool {
    matches!((alive, live_neighbors), (true, 2) | (true, 3) | (false, 3))
}

/// Computes the generation that follows `grid`.
#[must_use]
pub fn next_generation(grid: &Grid) -> Grid {
    let mut next = Grid::new(grid.width(), grid.height());
    write_generation(grid, &mut next);
    next
}

/// Generation stepper that reuses a scratch grid between advances.
#[derive(Clone, Debug, Default)]
pub struct StepEngine {
    scratch: Option<Grid>,
}

impl StepEngine {
    /// Creates a stepper without a scratch buffer; one is allocated on first use.
    #[must_use]
    pub const fn new() -> Self {
        Self { scratch: None }
    }

    /// Replaces `grid` with its next generation.
    ///
    /// The generation is computed into the scratch buffer first and ownership
    /// is swapped afterwards, leaving the previous generation as the new
    /// scratch contents.
    pub fn advance(&mut self, grid: &mut Grid) {
        let mut scratch = match self.scratch.take() {
            Some(scratch)
                if scratch.width() == grid.width() && scratch.height() == grid.height() =>
            {
                scratch
            }
            _ => Grid::new(grid.width(), grid.height()),
        };
        write_generation(grid, &mut scratch);
        std::mem::swap(grid, &mut scratch);
        self.scratch = Some(scratch);
    }
}

fn write_generation(current: &Grid, next: &mut Grid) {
    for row in 0..current.height() {
        for column in 0..current.width() {
            let cell = CellCoord::new(column, row);
            let alive = current.get(cell);
            next.set(cell, survives(alive, current.count_live_neighbors(cell)));
        }
    }
}
