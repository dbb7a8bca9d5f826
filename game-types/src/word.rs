use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{GameId, PlayerId, TileId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Horizontal,
    Vertical,
}

/// A maximal run of two or more adjacent board tiles along one axis.
/// Recomputed from the board on demand, never stored as a source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DetectedWord {
    pub word: String,
    pub tiles: Vec<TileId>,
    pub direction: Direction,
    pub start_row: i32,
    pub start_col: i32,
    pub length: usize,
}

/// History entry appended the first time a word shows up on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CompletedWord {
    pub id: uuid::Uuid,
    pub game_id: GameId,
    pub player_id: PlayerId,
    pub word: String,
    pub length: usize,
    pub direction: Direction,
    pub start_row: i32,
    pub start_col: i32,
    pub tiles_involved: Vec<TileId>,
    pub created_at: String, // ISO 8601 string
}

impl CompletedWord {
    /// Same text at the same anchor in the same direction.
    pub fn matches(&self, detected: &DetectedWord) -> bool {
        self.word == detected.word
            && self.start_row == detected.start_row
            && self.start_col == detected.start_col
            && self.direction == detected.direction
    }
}
