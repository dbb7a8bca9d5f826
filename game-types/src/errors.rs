use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::PlayerId;

/// Every rejected operation returns one of these and leaves the game untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, thiserror::Error)]
#[ts(export)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum GameError {
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Operation not allowed while game is {current_state}")]
    InvalidState { current_state: String },
    #[error("{0}")]
    Conflict(ConflictReason),
    #[error("Storage failure: {0}")]
    Storage(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, thiserror::Error)]
#[ts(export)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ConflictReason {
    #[error("Another player has already won this round")]
    RoundClaimed { holder: PlayerId },
    #[error("Your rack must be empty to MESS IT UP! ({remaining} tiles left)")]
    RackNotEmpty { remaining: usize },
    #[error("You must have tiles on the board")]
    NoBoardTiles,
    #[error("All your tiles must be connected")]
    TilesNotConnected,
    #[error("Invalid words on board: {}", .words.join(", "))]
    InvalidWords { words: Vec<String> },
    #[error("Game can only finish when the bag is empty and all racks are empty")]
    CannotFinish { bag_remaining: usize, tiles_in_racks: usize },
    #[error("No tiles left in the bag")]
    BagEmpty,
    #[error("Game is full ({max_players} players)")]
    GameFull { max_players: u32 },
}

impl GameError {
    pub fn validation(message: impl Into<String>) -> Self {
        GameError::Validation(message.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        GameError::NotFound(what.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        GameError::Forbidden(message.into())
    }

    pub fn invalid_state(current_state: impl ToString) -> Self {
        GameError::InvalidState {
            current_state: current_state.to_string(),
        }
    }
}

impl From<ConflictReason> for GameError {
    fn from(reason: ConflictReason) -> Self {
        GameError::Conflict(reason)
    }
}
