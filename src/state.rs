use crate::codec;
use crate::error::Result;
use crate::grid::Grid;
use crate::rules::{self, patterns::PatternLibrary};

/// A grid together with the index of the generation it currently shows.
///
/// This is the unit the simulator locks: every edit, step and save goes
/// through one `LifeState`, so the generation can never drift from the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifeState {
    grid: Grid,
    generation: u64,
}

impl LifeState {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Ok(Self::from_grid(Grid::new(width, height)?))
    }

    pub fn from_grid(grid: Grid) -> Self {
        Self { grid, generation: 0 }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Run one generation and return the new index.
    pub fn step(&mut self) -> u64 {
        self.generation = rules::step(&mut self.grid, self.generation);
        self.generation
    }

    pub fn set_alive(&mut self, col: usize, row: usize, alive: bool) -> Result<()> {
        self.grid.set_alive(col, row, alive)
    }

    pub fn toggle(&mut self, col: usize, row: usize) -> Result<bool> {
        self.grid.toggle(col, row)
    }

    pub fn is_alive(&self, col: usize, row: usize) -> Result<bool> {
        self.grid.is_alive(col, row)
    }

    /// Stamp the named pattern from the global library onto the grid centre.
    pub fn stamp(&mut self, name: &str) -> Result<()> {
        let pattern = PatternLibrary::global().get(name)?;
        rules::patterns::stamp(&mut self.grid, pattern)
    }

    /// Kill every cell and start over at generation 0.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.generation = 0;
    }

    /// Replace the grid with an empty one of the new size.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<()> {
        self.grid = Grid::new(width, height)?;
        self.generation = 0;
        log::info!("Resized grid to: {}x{}", width, height);
        Ok(())
    }

    /// Encode the current generation and live cells.
    pub fn save(&self) -> String {
        codec::encode(self.generation, &self.grid)
    }

    /// Load a saved stream into the current grid.
    ///
    /// On error neither the grid nor the generation changes.
    pub fn load(&mut self, text: &str) -> Result<u64> {
        self.generation = codec::decode(text, &mut self.grid)?;
        Ok(self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LifeError;

    #[test]
    fn step_counts_generations() {
        let mut state = LifeState::new(6, 6).unwrap();
        state.stamp("Blinker").unwrap();
        assert_eq!(state.step(), 1);
        assert_eq!(state.step(), 2);
        assert_eq!(state.generation(), 2);
    }

    #[test]
    fn clear_resets_generation() {
        let mut state = LifeState::new(6, 6).unwrap();
        state.stamp("Block").unwrap();
        state.step();
        state.clear();
        assert_eq!(state.generation(), 0);
        assert_eq!(state.grid().live_count(), 0);
    }

    #[test]
    fn resize_rejects_zero_and_keeps_old_grid() {
        let mut state = LifeState::new(4, 4).unwrap();
        state.set_alive(1, 1, true).unwrap();
        assert!(matches!(
            state.resize(0, 3),
            Err(LifeError::InvalidDimension { .. })
        ));
        assert!(state.is_alive(1, 1).unwrap());

        state.resize(8, 2).unwrap();
        assert_eq!(state.grid().dimensions(), (8, 2));
        assert_eq!(state.grid().live_count(), 0);
    }

    #[test]
    fn unknown_pattern() {
        let mut state = LifeState::new(4, 4).unwrap();
        assert_eq!(
            state.stamp("Spaceship Factory"),
            Err(LifeError::UnknownPattern("Spaceship Factory".into()))
        );
    }

    #[test]
    fn save_and_load() {
        let mut state = LifeState::new(10, 10).unwrap();
        state.stamp("Glider").unwrap();
        state.step();
        state.step();
        let text = state.save();

        let mut other = LifeState::new(10, 10).unwrap();
        assert_eq!(other.load(&text).unwrap(), 2);
        assert_eq!(other, state);
    }

    #[test]
    fn step_after_loading_max_generation() {
        let mut state = LifeState::new(5, 5).unwrap();
        assert_eq!(state.load("18446744073709551615\n1,2\n2,2\n3,2\n").unwrap(), u64::MAX);
        assert_eq!(state.step(), u64::MAX);
        assert_eq!(state.step(), u64::MAX);
        assert_eq!(state.grid().live_count(), 3);
    }

    #[test]
    fn failed_load_keeps_generation() {
        let mut state = LifeState::new(3, 3).unwrap();
        state.step();
        assert!(state.load("7\n9,9\n").is_err());
        assert_eq!(state.generation(), 1);
    }
}
