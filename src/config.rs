//! Configuration for a game session
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::fruit::DEFAULT_PLACEMENT_ATTEMPTS;

/// Which coordinates fruit placement samples from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FruitRange {
    /// every column and row, `[0, size)`
    FullBoard,
    /// `[0, size - 1)` (but at least `[0, 1)`), leaving the rightmost column
    /// and the top row unreachable. Matches boards generated by older clients.
    Legacy,
}

impl FruitRange {
    /// exclusive upper bound to sample from on an axis of `size` cells
    pub fn upper_bound(&self, size: i32) -> i32 {
        match self {
            FruitRange::FullBoard => size,
            FruitRange::Legacy => (size - 1).max(1),
        }
    }
}

impl Default for FruitRange {
    fn default() -> Self {
        FruitRange::FullBoard
    }
}

/// Configuration for the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// number of columns on the board
    pub width: i32,
    /// number of rows on the board
    pub height: i32,
    /// how many fruit are on the board at the start of a game
    pub fruit_number: usize,
    /// how many random cells are tried before giving up on placing a fruit
    pub placement_attempts: u32,
    #[allow(missing_docs)]
    pub fruit_range: FruitRange,
    /// once the random attempts run out, pick among every empty cell instead
    /// of giving up
    pub exhaustive_fallback: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            fruit_number: 1,
            placement_attempts: DEFAULT_PLACEMENT_ATTEMPTS,
            fruit_range: FruitRange::default(),
            exhaustive_fallback: false,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom board size
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Parses a config from json, missing keys take their default value
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations no board can be built from
    pub fn validate(&self) -> Result<(), GameError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(GameError::InvalidDimension {
                width: self.width,
                height: self.height,
            });
        }
        if self.placement_attempts == 0 {
            return Err(GameError::InvalidConfig(
                "placement_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
