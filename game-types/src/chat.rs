use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{GameId, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SenderType {
    Player,
    System,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatMetadata {
    PlayerJoined {
        player_id: PlayerId,
    },
    GameStarted,
    WordCompleted {
        word: String,
        player_id: PlayerId,
    },
    Split {
        player_id: PlayerId,
        word_points: i32,
        new_words: Vec<String>,
    },
    Stuck {
        player_id: PlayerId,
        tiles_drawn: u32,
    },
    GameFinished {
        winner_id: PlayerId,
    },
    AiComment {
        word: Option<String>,
    },
}

/// Append-only log entry. Never consulted for game logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChatMessage {
    pub id: uuid::Uuid,
    pub game_id: GameId,
    pub sender_type: SenderType,
    pub sender_player_id: Option<PlayerId>,
    pub content: String,
    pub metadata: ChatMetadata,
    pub created_at: String, // ISO 8601 string
}
