//! Game settings
//!
//! Loaded from an optional JSON file; any missing field keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::LevelId;
use crate::consts::{BONUS_CHANCE, STARTING_LIVES};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Lives at the start of an attempt
    pub starting_lives: u32,
    /// Probability (0.0 - 1.0) that a destroyed brick drops a bonus
    pub bonus_chance: f32,
    /// RNG seed for reproducible runs (None = seed from entropy)
    pub seed: Option<u64>,
    /// Level the first game of an attempt starts on
    pub first_level: LevelId,
    /// Longest frame the headless driver will feed into a tick (seconds)
    pub max_frame_length: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            starting_lives: STARTING_LIVES,
            bonus_chance: BONUS_CHANCE,
            seed: None,
            first_level: 0,
            max_frame_length: 1.0 / 60.0,
        }
    }
}

impl Settings {
    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.bonus_chance = settings.bonus_chance.clamp(0.0, 1.0);
        Ok(settings)
    }

    /// Serialize settings to pretty JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not read settings {}: {}, using defaults", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}
