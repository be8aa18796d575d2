//! Session configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use treasure_board::{Board, BoardConfig, DEFAULT_COLUMNS, DEFAULT_ROWS, DEFAULT_TREASURE_COUNT};
use tracing::{debug, info, instrument};

/// Configuration for hosting a session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Board rows.
    #[serde(default = "default_rows")]
    rows: usize,

    /// Board columns.
    #[serde(default = "default_columns")]
    columns: usize,

    /// Treasures to bury.
    #[serde(default = "default_treasure_count")]
    treasure_count: usize,

    /// Seed for board generation. Random when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,

    /// Name this host advertises to peers.
    #[serde(default = "default_display_name")]
    display_name: String,
}

fn default_rows() -> usize {
    DEFAULT_ROWS
}

fn default_columns() -> usize {
    DEFAULT_COLUMNS
}

fn default_treasure_count() -> usize {
    DEFAULT_TREASURE_COUNT
}

fn default_display_name() -> String {
    "Treasure Host".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            columns: default_columns(),
            treasure_count: default_treasure_count(),
            seed: None,
            display_name: default_display_name(),
        }
    }
}

impl SessionConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, does not parse, or describes a
    /// board that cannot be generated.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Fails on malformed TOML or an unplayable board.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        info!(
            rows = config.rows,
            columns = config.columns,
            treasure_count = config.treasure_count,
            seed = ?config.seed,
            "Config loaded"
        );
        Ok(config)
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Fails if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string(self)
            .map_err(|e| ConfigError::new(format!("Failed to render config: {}", e)))
    }

    /// Replaces the seed.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        if seed.is_some() {
            self.seed = seed;
        }
        self
    }

    /// Checks the board is playable: it fits and holds at least one treasure.
    ///
    /// # Errors
    ///
    /// Describes the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.treasure_count == 0 {
            return Err(ConfigError::new("treasure_count must be at least 1".to_string()));
        }
        self.board_config().map(|_| ())
    }

    /// Board shape for this session.
    ///
    /// # Errors
    ///
    /// Fails if the board is empty or the treasures do not fit.
    pub fn board_config(&self) -> Result<BoardConfig, ConfigError> {
        BoardConfig::new(self.rows, self.columns, self.treasure_count)
            .map_err(|e| ConfigError::new(format!("Invalid board: {}", e)))
    }

    /// Generates the session board, seeded if a seed is configured.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid.
    #[instrument(skip(self), fields(seed = ?self.seed))]
    pub fn board(&self) -> Result<Board, ConfigError> {
        self.validate()?;
        let config = self.board_config()?;
        let board = match self.seed {
            Some(seed) => Board::generate(config, &mut StdRng::seed_from_u64(seed)),
            None => Board::random(config),
        };
        board.map_err(|e| ConfigError::new(format!("Failed to generate board: {}", e)))
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
    /// Creates a new configuration error at the caller's location.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
