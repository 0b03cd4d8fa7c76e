use std::fmt;

use crate::error::{LifeError, Result};

/// One lattice site.
///
/// `neighbor_count` and `next_alive` are scratch space for the generation
/// step and only hold meaningful values between its count and commit phases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    pub(crate) alive: bool,
    pub(crate) neighbor_count: u8,
    pub(crate) next_alive: bool,
}

impl Cell {
    pub fn is_alive(&self) -> bool {
        self.alive
    }
}

/// A fixed-size toroidal grid of cells, stored row-major.
///
/// Coordinates are `(col, row)` with `col < width` and `row < height`.
/// Opposite edges are adjacent: the neighbour arithmetic in [`crate::rules`]
/// wraps every lookup, so the grid has no border.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid with every cell dead.
    ///
    /// Fails with `InvalidDimension` if either side is zero or the cell array
    /// cannot be allocated.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let invalid = LifeError::InvalidDimension { width, height };
        if width == 0 || height == 0 {
            return Err(invalid);
        }
        let len = width.checked_mul(height).ok_or_else(|| invalid.clone())?;
        let mut cells = Vec::new();
        if let Err(e) = cells.try_reserve_exact(len) {
            log::warn!("Cannot allocate {}x{} grid: {}", width, height, e);
            return Err(invalid);
        }
        cells.resize(len, Cell::default());
        log::debug!("Creating {}x{} grid", width, height);
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Index into the 1D cell array for an in-range position.
    pub(crate) fn index(&self, col: usize, row: usize) -> usize {
        row * self.width + col
    }

    fn checked_index(&self, col: usize, row: usize) -> Result<usize> {
        if col < self.width && row < self.height {
            Ok(self.index(col, row))
        } else {
            Err(LifeError::out_of_range(col, row, self.width, self.height))
        }
    }

    pub fn is_alive(&self, col: usize, row: usize) -> Result<bool> {
        let idx = self.checked_index(col, row)?;
        Ok(self.cells[idx].alive)
    }

    /// Set one cell's state. Scratch fields are left alone.
    pub fn set_alive(&mut self, col: usize, row: usize, alive: bool) -> Result<()> {
        let idx = self.checked_index(col, row)?;
        self.cells[idx].alive = alive;
        Ok(())
    }

    /// Flip one cell and return its new state.
    pub fn toggle(&mut self, col: usize, row: usize) -> Result<bool> {
        let idx = self.checked_index(col, row)?;
        let cell = &mut self.cells[idx];
        cell.alive = !cell.alive;
        Ok(cell.alive)
    }

    /// Kill every cell, keeping the dimensions.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Coordinates of live cells in row-major order (row ascending, then col).
    ///
    /// The iterator borrows the grid, so calling this again restarts it.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.alive)
            .map(move |(idx, _)| (idx % width, idx / width))
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.alive).count()
    }

    pub fn cell(&self, col: usize, row: usize) -> Result<&Cell> {
        let idx = self.checked_index(col, row)?;
        Ok(&self.cells[idx])
    }

    pub(crate) fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }
}

/// Plaintext rendering: one line per row, `O` for live cells and `.` for dead.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width) {
            let line: String = row
                .iter()
                .map(|cell| if cell.alive { 'O' } else { '.' })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_dead() {
        let grid = Grid::new(4, 3).unwrap();
        assert_eq!(grid.dimensions(), (4, 3));
        assert_eq!(grid.live_count(), 0);
        assert!(grid.cells().iter().all(|c| *c == Cell::default()));
    }

    #[test]
    fn zero_dimensions_rejected() {
        assert_eq!(
            Grid::new(0, 5),
            Err(LifeError::InvalidDimension { width: 0, height: 5 })
        );
        assert!(Grid::new(5, 0).is_err());
    }

    #[test]
    fn unallocatable_dimensions_rejected() {
        assert_eq!(
            Grid::new(usize::MAX, 1),
            Err(LifeError::InvalidDimension { width: usize::MAX, height: 1 })
        );
        // product fits in usize but the byte size does not
        assert!(matches!(
            Grid::new(usize::MAX / 2, 2),
            Err(LifeError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn set_and_query_bounds() {
        let mut grid = Grid::new(3, 2).unwrap();
        grid.set_alive(2, 1, true).unwrap();
        assert!(grid.is_alive(2, 1).unwrap());
        assert!(!grid.is_alive(1, 1).unwrap());

        let err = grid.set_alive(3, 0, true).unwrap_err();
        assert_eq!(err, LifeError::out_of_bounds(3, 0, 3, 2));
        assert!(grid.is_alive(0, 2).is_err());
    }

    #[test]
    fn huge_coordinates_report_saturated_position() {
        let mut grid = Grid::new(3, 2).unwrap();
        assert_eq!(
            grid.set_alive(usize::MAX, 1, true).unwrap_err(),
            LifeError::out_of_bounds(i64::MAX, 1, 3, 2)
        );
        assert_eq!(
            grid.toggle(0, usize::MAX).unwrap_err(),
            LifeError::out_of_bounds(0, i64::MAX, 3, 2)
        );
        assert_eq!(grid.live_count(), 0);
    }

    #[test]
    fn toggle_flips_state() {
        let mut grid = Grid::new(2, 2).unwrap();
        assert!(grid.toggle(1, 0).unwrap());
        assert!(!grid.toggle(1, 0).unwrap());
    }

    #[test]
    fn live_cells_are_row_major() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set_alive(2, 0, true).unwrap();
        grid.set_alive(0, 2, true).unwrap();
        grid.set_alive(1, 0, true).unwrap();
        grid.set_alive(0, 1, true).unwrap();

        let cells: Vec<_> = grid.live_cells().collect();
        assert_eq!(cells, vec![(1, 0), (2, 0), (0, 1), (0, 2)]);
        // restartable
        assert_eq!(grid.live_cells().count(), 4);
    }

    #[test]
    fn clear_kills_everything() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set_alive(1, 1, true).unwrap();
        grid.clear();
        assert_eq!(grid.live_count(), 0);
    }

    #[test]
    fn display_renders_rows() {
        let mut grid = Grid::new(3, 2).unwrap();
        grid.set_alive(0, 0, true).unwrap();
        grid.set_alive(2, 1, true).unwrap();
        assert_eq!(grid.to_string(), "O..\n..O\n");
    }
}
