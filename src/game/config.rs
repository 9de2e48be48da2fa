use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Side length of the board. The ruleset is fixed at 4x4.
pub const GRID_SIZE: usize = 4;

/// Number of cells on the board
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Configuration for the game
///
/// Missing fields in a config file fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Tiles placed on an empty board when a game starts
    pub initial_tiles: usize,
    /// Value of every freshly spawned tile
    pub spawn_value: u32,

    // Animation timings (used by the terminal animator)
    /// Time for a tile to slide to its destination, in milliseconds
    pub slide_ms: u64,
    /// Time for a newly spawned tile to pop in, in milliseconds
    pub spawn_ms: u64,
    /// How long a merged tile stays highlighted, in milliseconds
    pub merge_ms: u64,

    /// Seed for tile placement; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_tiles: 2,
            spawn_value: 2,
            slide_ms: 100,
            spawn_ms: 200,
            merge_ms: 150,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a configuration with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Create a configuration with every animation disabled
    pub fn instant() -> Self {
        Self {
            slide_ms: 0,
            spawn_ms: 0,
            merge_ms: 0,
            ..Default::default()
        }
    }

    /// Read a configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Write this configuration as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to {:?}", path))?;
        Ok(())
    }

    /// Check the values the engine relies on
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.spawn_value >= 2 && self.spawn_value.is_power_of_two(),
            "spawn value {} is not a power of two",
            self.spawn_value
        );
        anyhow::ensure!(
            (1..=CELL_COUNT).contains(&self.initial_tiles),
            "initial tile count {} does not fit on the board",
            self.initial_tiles
        );
        Ok(())
    }

    pub fn slide_duration(&self) -> Duration {
        Duration::from_millis(self.slide_ms)
    }

    pub fn spawn_duration(&self) -> Duration {
        Duration::from_millis(self.spawn_ms)
    }

    pub fn merge_duration(&self) -> Duration {
        Duration::from_millis(self.merge_ms)
    }
}
