use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::rules::patterns::CLEAR;
use crate::rules::presets::{SizePreset, SpeedPreset};

// Constants
pub const DEFAULT_GRID_WIDTH: usize = 100;
pub const DEFAULT_GRID_HEIGHT: usize = 100;

/// Start-up preferences shared by front ends.
///
/// Stored as JSON. Missing fields take their defaults, so older files keep
/// loading when fields are added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Pattern stamped on a fresh grid
    pub default_pattern: String,
    pub speed: SpeedPreset,
    pub size: SizePreset,
    pub grid_width: usize,
    pub grid_height: usize,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            default_pattern: CLEAR.to_string(),
            speed: SpeedPreset::default(),
            size: SizePreset::default(),
            grid_width: DEFAULT_GRID_WIDTH,
            grid_height: DEFAULT_GRID_HEIGHT,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    #[error("failed to access preferences file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid preferences file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Preferences {
    /// Read preferences from `path`, falling back to defaults if the file
    /// does not exist. A file that exists but cannot be parsed is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PreferencesError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => {
                let prefs = Self::from_json(&text)?;
                log::info!("Loaded preferences from {}", path.display());
                Ok(prefs)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("{} not found - using default values", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PreferencesError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        log::info!("Saved preferences to {}", path.display());
        Ok(())
    }

    pub fn from_json(text: &str) -> Result<Self, PreferencesError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, PreferencesError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
