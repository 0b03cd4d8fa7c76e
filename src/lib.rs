//! Conway's Game of Life on a fixed-size toroidal grid.
//!
//! The crate is the simulation engine only: the grid model, the wrapped
//! neighbour count and B3/S23 transition, a catalogue of seed patterns, a
//! plain-text save format and a background clock. Drawing, input handling
//! and file dialogs belong to whatever front end drives it.

pub mod codec;
pub mod config;
pub mod error;
pub mod grid;
pub mod rules;
pub mod simulator;
pub mod state;

pub use codec::Snapshot;
pub use config::Preferences;
pub use error::{LifeError, Result};
pub use grid::{Cell, Grid};
pub use rules::patterns::{Pattern, PatternLibrary};
pub use rules::presets::{SizePreset, SpeedPreset};
pub use simulator::{RunState, Simulator};
pub use state::LifeState;
