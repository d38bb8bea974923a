//! Game configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use strictly_ntoe::{Game, Player};
use tracing::{debug, info, instrument};

/// Players and board size for a game.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Player tags in turn order.
    #[serde(default = "default_players")]
    players: Vec<String>,

    /// Board side length.
    #[serde(default = "default_side_length")]
    side_length: usize,
}

#[instrument]
fn default_players() -> Vec<String> {
    vec!["X".to_string(), "O".to_string()]
}

#[instrument]
fn default_side_length() -> usize {
    3
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            players: default_players(),
            side_length: default_side_length(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(players = ?config.players, side_length = config.side_length, "Config loaded successfully");
        Ok(config)
    }

    /// Replaces the player list with one player per character of `tags`.
    pub fn with_player_tags(mut self, tags: &str) -> Self {
        self.players = tags.chars().map(String::from).collect();
        self
    }

    /// Replaces the side length.
    pub fn with_side_length(mut self, side_length: usize) -> Self {
        self.side_length = side_length;
        self
    }

    /// Builds an empty game from this configuration.
    #[instrument(skip(self), fields(side_length = self.side_length))]
    pub fn build_game(&self) -> Result<Game, ConfigError> {
        let players = self
            .players
            .iter()
            .map(|tag| Player::new(tag))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ConfigError::new(format!("Invalid player: {}", e.kind())))?;

        Game::new(players, self.side_length)
            .map_err(|e| ConfigError::new(format!("Invalid game setup: {}", e.kind())))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
