//! Rules module for Conway's Game of Life simulation
//!
//! This module contains the transition rule, the toroidal neighbour count and
//! the whole-grid generation step, plus the pattern catalogue and speed/size
//! presets used to seed and drive a simulation.

pub mod patterns;
pub mod presets;

use crate::grid::Grid;

/// Minimum neighbours for a live cell to survive
pub const SURVIVAL_MIN: u8 = 2;
/// Maximum neighbours for a live cell to survive
pub const SURVIVAL_MAX: u8 = 3;
/// Number of neighbours for a dead cell to become alive
pub const BIRTH_COUNT: u8 = 3;

/// Game of Life standard rules (B3/S23):
/// 1. Any live cell with fewer than two live neighbors dies (underpopulation)
/// 2. Any live cell with two or three live neighbors lives (survival)
/// 3. Any live cell with more than three live neighbors dies (overpopulation)
/// 4. Any dead cell with exactly three live neighbors becomes alive (reproduction)
pub fn next_state(alive: bool, neighbors: u8) -> bool {
    if alive {
        (SURVIVAL_MIN..=SURVIVAL_MAX).contains(&neighbors)
    } else {
        neighbors == BIRTH_COUNT
    }
}

/// Wrap `pos + delta` into `0..len`.
///
/// Same as `((pos + delta) mod len + len) mod len`; each axis is wrapped with
/// its own length, so non-square grids are fine.
fn wrap(pos: usize, delta: isize, len: usize) -> usize {
    (pos as isize + delta).rem_euclid(len as isize) as usize
}

/// Given a grid position, count the number of live neighbors using wrapping boundaries
pub fn count_neighbors(grid: &Grid, col: usize, row: usize) -> u8 {
    let (width, height) = grid.dimensions();
    let cells = grid.cells();
    let mut count = 0;

    for dr in -1..=1 {
        for dc in -1..=1 {
            // Skip the cell itself
            if dc == 0 && dr == 0 {
                continue;
            }
            let nc = wrap(col, dc, width);
            let nr = wrap(row, dr, height);
            if cells[grid.index(nc, nr)].alive {
                count += 1;
            }
        }
    }

    count
}

/// Advance `grid` by one generation and return `generation + 1`.
///
/// The index saturates at `u64::MAX`; the grid still advances.
///
/// All cells are counted before any is decided, and all are decided before
/// any is committed, so every cell sees the same previous generation. The
/// `&mut` borrow keeps the intermediate phases unobservable.
pub fn step(grid: &mut Grid, generation: u64) -> u64 {
    let (width, height) = grid.dimensions();

    // --- Count ---
    for row in 0..height {
        for col in 0..width {
            let count = count_neighbors(grid, col, row);
            let idx = grid.index(col, row);
            grid.cells_mut()[idx].neighbor_count = count;
        }
    }

    // --- Decide ---
    for cell in grid.cells_mut() {
        cell.next_alive = next_state(cell.alive, cell.neighbor_count);
    }

    // --- Commit ---
    for cell in grid.cells_mut() {
        cell.alive = cell.next_alive;
        cell.next_alive = false;
        cell.neighbor_count = 0;
    }

    generation.saturating_add(1)
}
