use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use ts_rs::TS;

use crate::{GameId, PlayerId};

/// Avatar customisation. Opaque to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CharacterCosmetic {
    pub hair_style: u8,
    pub accessory: u8,
    pub skin_tone: u8,
    pub expression: u8,
}

impl Default for CharacterCosmetic {
    fn default() -> Self {
        Self {
            hair_style: 0,
            accessory: 0,
            skin_tone: 2,
            expression: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Player {
    pub id: PlayerId,
    pub game_id: GameId,
    pub display_name: String,
    pub is_creator: bool,
    pub is_active: bool,
    pub color: String,
    pub character: CharacterCosmetic,
    pub avatar_seed: String,
    pub mess_bonus_count: u32,
    pub stuck_penalty_count: u32,
    /// Word texts already paid out to this player by MESS IT UP.
    pub scored_words: BTreeSet<String>,
    pub joined_at: String, // ISO 8601 string
}

/// A player as seen by one particular requester.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerView {
    pub player: Player,
    /// Tile ids for the requester's own rack, opaque placeholders for everyone else.
    pub rack: Vec<String>,
}

/// Placeholder shown in place of an opponent's rack tile id.
pub const HIDDEN_TILE: &str = "hidden";
