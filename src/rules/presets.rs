use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Named clock intervals offered to front ends.
///
/// The simulator itself takes any positive [`Duration`]; these are just
/// convenient defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedPreset {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl SpeedPreset {
    pub const ALL: [SpeedPreset; 3] = [SpeedPreset::Slow, SpeedPreset::Normal, SpeedPreset::Fast];

    /// Pause between generations while the clock is running
    pub fn interval(self) -> Duration {
        match self {
            SpeedPreset::Slow => Duration::from_millis(1550),
            SpeedPreset::Normal => Duration::from_millis(800),
            SpeedPreset::Fast => Duration::from_millis(50),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SpeedPreset::Slow => "Slow",
            SpeedPreset::Normal => "Normal",
            SpeedPreset::Fast => "Fast",
        }
    }
}

/// Named on-screen cell sizes, in pixels per cell edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizePreset {
    Small,
    #[default]
    Medium,
    Big,
}

impl SizePreset {
    pub const ALL: [SizePreset; 3] = [SizePreset::Small, SizePreset::Medium, SizePreset::Big];

    pub fn cell_size(self) -> u32 {
        match self {
            SizePreset::Small => 5,
            SizePreset::Medium => 20,
            SizePreset::Big => 35,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SizePreset::Small => "Small",
            SizePreset::Medium => "Medium",
            SizePreset::Big => "Big",
        }
    }
}

impl fmt::Display for SpeedPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for SizePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SpeedPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SpeedPreset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown speed {:?} (expected Slow, Normal or Fast)", s))
    }
}

impl FromStr for SizePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SizePreset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown size {:?} (expected Small, Medium or Big)", s))
    }
}
