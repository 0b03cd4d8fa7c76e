//! Plain-text save format for a simulation.
//!
//! ```text
//! <generation>
//! <col>,<row>
//! <col>,<row>
//! ```
//!
//! One live cell per line in row-major order. Grid dimensions are not
//! recorded; a stream can only be loaded into a grid that is already the
//! right size.

use std::fmt;
use std::str::FromStr;

use crate::error::{LifeError, Result};
use crate::grid::Grid;

/// A generation index and the live cells at that generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    generation: u64,
    cells: Vec<(i64, i64)>,
}

impl Snapshot {
    /// Record the live cells of `grid` in row-major order.
    pub fn capture(generation: u64, grid: &Grid) -> Self {
        let cells = grid
            .live_cells()
            .map(|(col, row)| (col as i64, row as i64))
            .collect();
        Self { generation, cells }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Recorded `(col, row)` pairs, as written in the stream.
    pub fn cells(&self) -> &[(i64, i64)] {
        &self.cells
    }

    /// Replace the contents of `grid` with this snapshot and return its
    /// generation.
    ///
    /// Every coordinate is checked before the grid is touched, so on error
    /// the grid is exactly as it was.
    pub fn apply_to(&self, grid: &mut Grid) -> Result<u64> {
        let (width, height) = grid.dimensions();
        let in_range = |v: i64, len: usize| usize::try_from(v).ok().filter(|v| *v < len);
        let mut positions = Vec::with_capacity(self.cells.len());
        for &(col, row) in &self.cells {
            match (in_range(col, width), in_range(row, height)) {
                (Some(c), Some(r)) => positions.push((c, r)),
                _ => return Err(LifeError::out_of_bounds(col, row, width, height)),
            }
        }

        grid.clear();
        for (col, row) in positions {
            grid.set_alive(col, row, true)?;
        }
        log::info!(
            "Loaded generation {} with {} live cells",
            self.generation,
            self.cells.len()
        );
        Ok(self.generation)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.generation)?;
        for (col, row) in &self.cells {
            writeln!(f, "{},{}", col, row)?;
        }
        Ok(())
    }
}

impl FromStr for Snapshot {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self> {
        let mut tokens = s.split_whitespace();

        let first = tokens
            .next()
            .ok_or_else(|| LifeError::malformed(0, "missing generation index"))?;
        let generation = first.parse::<u64>().map_err(|_| {
            LifeError::malformed(0, format!("{:?} is not a non-negative integer", first))
        })?;

        let mut cells = Vec::new();
        for (i, token) in tokens.enumerate() {
            cells.push(parse_pair(token).ok_or_else(|| {
                LifeError::malformed(i + 1, format!("{:?} is not a col,row pair", token))
            })?);
        }

        Ok(Self { generation, cells })
    }
}

fn parse_pair(token: &str) -> Option<(i64, i64)> {
    let mut parts = token.split(',');
    let col = parts.next()?.parse().ok()?;
    let row = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((col, row))
}

/// Serialize `generation` and the live cells of `grid`.
pub fn encode(generation: u64, grid: &Grid) -> String {
    Snapshot::capture(generation, grid).to_string()
}

/// Parse `text` and load it into `grid`, returning the restored generation.
///
/// All-or-nothing: a malformed or out-of-range stream leaves `grid` unchanged.
pub fn decode(text: &str, grid: &mut Grid) -> Result<u64> {
    text.parse::<Snapshot>()?.apply_to(grid)
}
