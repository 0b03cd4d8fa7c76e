use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::error::{LifeError, Result};
use crate::grid::Grid;

/// Name of the empty pattern; always listed first.
pub const CLEAR: &str = "Clear";

/// Seed templates, one string per row: `O` alive, `.` dead.
const PATTERN_SOURCES: &[(&str, &[&str])] = &[
    (CLEAR, &[]),
    // Oscillators
    ("Blinker", &["OOO"]),
    ("Toad", &["OOO.", ".OOO"]),
    ("Beacon", &["OO..", "O...", "...O", "..OO"]),
    // Still lifes
    ("Block", &["OO", "OO"]),
    ("Tub", &[".O.", "O.O", ".O."]),
    ("Boat", &["OO.", "O.O", ".O."]),
    ("Ship", &["OO.", "O.O", ".OO"]),
    ("Beehive", &[".OO.", "O..O", ".OO."]),
    ("Barge", &[".O..", "O.O.", ".O.O", "..O."]),
    ("Long Boat", &["OO..", "O.O.", ".O.O", "..O."]),
    ("Loaf", &[".OO.", "O..O", "O.O.", ".O.."]),
    ("Pond", &[".OO.", "O..O", "O..O", ".OO."]),
    ("Mango", &[".OO..", "O..O.", ".O..O", "..OO."]),
    ("Long Barge", &[".O...", "O.O..", ".O.O.", "..O.O", "...O."]),
    (
        "Half-Fleet",
        &["OO....", "O.O...", ".OO...", "...OO.", "...O.O", "....OO"],
    ),
    (
        "Half-Bakery",
        &[
            ".OO....",
            "O..O...",
            ".O.O...",
            "..O.OO.",
            "...O..O",
            "....O.O",
            ".....O.",
        ],
    ),
    // Spaceships, guns and generators
    ("Glider", &[".O.", "..O", "OOO"]),
    (
        "Gosper Glider Gun",
        &[
            "........................O...........",
            "......................O.O...........",
            "............OO......OO............OO",
            "...........O...O....OO............OO",
            "OO........O.....O...OO..............",
            "OO........O...O.OO....O.O...........",
            "..........O.....O.......O...........",
            "...........O...O....................",
            "............OO......................",
        ],
    ),
    (
        "Candelabra",
        &[
            "....OO....OO....",
            ".O..O......O..O.",
            "O.O.O......O.O.O",
            ".O..O.OOOO.O..O.",
            "....O.O..O.O....",
            ".....O....O.....",
        ],
    ),
    (
        "Beaconmaker",
        &[
            "..............OO",
            ".............O.O",
            "............O...",
            "...........O....",
            "..........O.....",
            ".........O......",
            "........O.......",
            ".......O........",
            "......O.........",
            ".....O..........",
            "....O...........",
            "...O............",
            "OOO.............",
            "..O.............",
            "..O.............",
        ],
    ),
    (
        "Chemist",
        &[
            ".......O.......",
            ".......OOO.....",
            "..........O....",
            ".....OOO..O..OO",
            "....O.O.O.O.O.O",
            "....O...O.O.O..",
            ".OO.O.....O.OO.",
            "..O.O.O...O....",
            "O.O.O.O.O.O....",
            "OO..O..OOO.....",
            "....O..........",
            ".....OOO.......",
            ".......O.......",
        ],
    ),
];

static LIBRARY: LazyLock<PatternLibrary> = LazyLock::new(|| PatternLibrary::from_sources(PATTERN_SOURCES));

/// An immutable rectangular template of live/dead markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    name: &'static str,
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl Pattern {
    fn parse(name: &'static str, rows: &[&str]) -> Self {
        let cols = rows.first().map_or(0, |r| r.len());
        debug_assert!(
            rows.iter().all(|r| r.len() == cols),
            "pattern {} is not rectangular",
            name
        );
        let cells = rows
            .iter()
            .flat_map(|r| r.bytes().map(|b| b == b'O'))
            .collect();
        Self {
            name,
            rows: rows.len(),
            cols,
            cells,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Live positions as `(col, row)` relative to the pattern's top-left corner.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(move |(idx, _)| (idx % cols, idx / cols))
    }
}

/// The process-wide catalogue of named seed patterns.
#[derive(Debug)]
pub struct PatternLibrary {
    patterns: BTreeMap<&'static str, Pattern>,
}

impl PatternLibrary {
    fn from_sources(sources: &[(&'static str, &[&str])]) -> Self {
        let patterns = sources
            .iter()
            .map(|&(name, rows)| (name, Pattern::parse(name, rows)))
            .collect();
        Self { patterns }
    }

    /// The shared library, built on first use.
    pub fn global() -> &'static PatternLibrary {
        &LIBRARY
    }

    /// Pattern names in ascending order, with "Clear" first.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self
            .patterns
            .keys()
            .copied()
            .filter(|name| *name != CLEAR)
            .collect();
        names.insert(0, CLEAR);
        names
    }

    pub fn get(&self, name: &str) -> Result<&Pattern> {
        self.patterns
            .get(name)
            .ok_or_else(|| LifeError::UnknownPattern(name.to_string()))
    }

    /// Patterns in the same order as [`PatternLibrary::names`].
    pub fn patterns_by_name(&self) -> Vec<(&'static str, &Pattern)> {
        self.names()
            .into_iter()
            .filter_map(|name| self.patterns.get(name).map(|p| (name, p)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Top-left grid position at which `pattern` is centred, as `(col, row)`.
///
/// May be negative when the pattern is larger than the grid.
pub fn centering_offset(grid: &Grid, pattern: &Pattern) -> (isize, isize) {
    let (width, height) = grid.dimensions();
    let offset_col = (width as isize - 1) / 2 - pattern.cols() as isize / 2;
    let offset_row = (height as isize - 1) / 2 - pattern.rows() as isize / 2;
    (offset_col, offset_row)
}

/// Stamp `pattern` onto the centre of `grid`.
///
/// Stamping is additive: cells outside the pattern's live markers keep their
/// state. If the centred pattern rectangle does not fit inside the grid the
/// call fails with `OutOfBounds` and the grid is left untouched.
pub fn stamp(grid: &mut Grid, pattern: &Pattern) -> Result<()> {
    if pattern.is_empty() {
        return Ok(());
    }
    let (width, height) = grid.dimensions();
    let (offset_col, offset_row) = centering_offset(grid, pattern);

    let far_col = offset_col + pattern.cols() as isize;
    let far_row = offset_row + pattern.rows() as isize;
    if offset_col < 0 || offset_row < 0 || far_col > width as isize || far_row > height as isize {
        let (col, row) = if offset_col < 0 || offset_row < 0 {
            (offset_col, offset_row)
        } else {
            (far_col - 1, far_row - 1)
        };
        log::warn!(
            "Pattern {} ({}x{}) does not fit on {}x{} grid",
            pattern.name(),
            pattern.cols(),
            pattern.rows(),
            width,
            height
        );
        return Err(LifeError::out_of_range(col, row, width, height));
    }

    for (pc, pr) in pattern.live_cells() {
        grid.set_alive(offset_col as usize + pc, offset_row as usize + pr, true)?;
    }
    log::info!(
        "Stamped pattern {} at ({}, {})",
        pattern.name(),
        offset_col,
        offset_row
    );
    Ok(())
}
