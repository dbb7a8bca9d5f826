use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::{CharacterCosmetic, Destination, GameSettings, PlayerId, TileId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateGameRequest {
    pub display_name: String,
    /// Server defaults apply when omitted.
    #[serde(default)]
    pub settings: Option<GameSettings>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub character: Option<CharacterCosmetic>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JoinGameRequest {
    pub join_code: String,
    pub display_name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub character: Option<CharacterCosmetic>,
}

/// Body for actions that only need to know who is acting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerAction {
    pub player_id: PlayerId,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MoveTileRequest {
    pub player_id: PlayerId,
    pub tile_id: TileId,
    pub destination: Destination,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ValidateWordsRequest {
    pub words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ValidateWordsResponse {
    pub results: BTreeMap<String, bool>,
}
