use crate::{
    ChatMessage, CompletedWord, DetectedWord, GameId, PlayerId, PlayerView, Tile,
    player::{CharacterCosmetic, Player},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Waiting,    // Accepting joins, no tiles dealt
    InProgress, // Tiles dealt, play allowed
    Finished,   // Terminal, read-only
}

impl GameStatus {
    /// Status only ever moves forward.
    pub fn can_transition_to(self, next: GameStatus) -> bool {
        matches!(
            (self, next),
            (GameStatus::Waiting, GameStatus::InProgress)
                | (GameStatus::InProgress, GameStatus::Finished)
        )
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameStatus::Waiting => "waiting",
            GameStatus::InProgress => "in_progress",
            GameStatus::Finished => "finished",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameSettings {
    pub piece_count: u32,
    pub timer_enabled: bool,
    pub timer_duration_minutes: u32, // Advisory only, never enforced
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            piece_count: 100,
            timer_enabled: false,
            timer_duration_minutes: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameInfo {
    pub id: GameId,
    pub join_code: String,
    pub creator_id: PlayerId,
    pub status: GameStatus,
    pub max_players: u32,
    pub letter_bag: Vec<char>,
    pub total_tiles_initial: u32,
    pub language: String,
    /// Soft reservation: the only player currently allowed to MESS IT UP.
    pub current_round_winner_id: Option<PlayerId>,
    pub is_final_round: bool,
    pub winner_player_id: Option<PlayerId>,
    pub settings: GameSettings,
    pub created_at: String, // ISO 8601 string
    pub updated_at: String,
    pub timer_started_at: Option<String>,
    pub timer_ends_at: Option<String>,
}

/// Version of GameInfo that only exposes how many letters remain in the bag.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SafeGameInfo {
    pub id: GameId,
    pub join_code: String,
    pub creator_id: PlayerId,
    pub status: GameStatus,
    pub max_players: u32,
    pub bag_remaining: u32,
    pub total_tiles_initial: u32,
    pub language: String,
    pub current_round_winner_id: Option<PlayerId>,
    pub is_final_round: bool,
    pub winner_player_id: Option<PlayerId>,
    pub settings: GameSettings,
    pub created_at: String,
    pub updated_at: String,
    pub timer_started_at: Option<String>,
    pub timer_ends_at: Option<String>,
}

impl From<&GameInfo> for SafeGameInfo {
    fn from(game: &GameInfo) -> Self {
        SafeGameInfo {
            id: game.id,
            join_code: game.join_code.clone(),
            creator_id: game.creator_id,
            status: game.status,
            max_players: game.max_players,
            bag_remaining: game.letter_bag.len() as u32,
            total_tiles_initial: game.total_tiles_initial,
            language: game.language.clone(),
            current_round_winner_id: game.current_round_winner_id,
            is_final_round: game.is_final_round,
            winner_player_id: game.winner_player_id,
            settings: game.settings.clone(),
            created_at: game.created_at.clone(),
            updated_at: game.updated_at.clone(),
            timer_started_at: game.timer_started_at.clone(),
            timer_ends_at: game.timer_ends_at.clone(),
        }
    }
}

/// Live standings shown while the game is running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerScore {
    pub player_id: PlayerId,
    pub word_count: u32,
    pub total_letters: u32,
    pub total_points: i32,
    pub stuck_penalty: i32,
    pub mess_bonus: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FinalPlayerStats {
    pub player_id: PlayerId,
    pub player_name: String,
    pub avatar_seed: String,
    pub color: String,
    pub character: CharacterCosmetic,
    pub total_points: i32,
    pub word_count: u32,
    pub total_letters: u32,
    pub mess_count: u32,
    pub stuck_count: u32,
    pub longest_word: String,
    pub total_vowels: u32,
    pub total_consonants: u32,
}

/// Everything stored for one game. The unit of persistence and of cloning for
/// all-or-nothing updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub game: GameInfo,
    pub players: Vec<Player>,
    pub tiles: Vec<Tile>,
    pub chat: Vec<ChatMessage>,
    pub completed_words: Vec<CompletedWord>,
    pub final_stats: Option<Vec<FinalPlayerStats>>,
}

/// Per-requester state returned by polling. Opponents' racks are redacted.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameStateView {
    pub game: SafeGameInfo,
    pub players: Vec<PlayerView>,
    pub tiles: Vec<Tile>,
    pub chat_messages: Vec<ChatMessage>,
    pub completed_words: Vec<CompletedWord>,
    pub scores: Vec<PlayerScore>,
    pub final_stats: Option<Vec<FinalPlayerStats>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JoinInfo {
    pub game_id: GameId,
    pub player_id: PlayerId,
    pub join_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MoveOutcome {
    pub tile_id: crate::TileId,
    pub displaced_tile_id: Option<crate::TileId>,
    pub new_words: Vec<DetectedWord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TileGrant {
    pub player_id: PlayerId,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MessOutcome {
    pub points_awarded: i32,
    pub new_words: Vec<String>,
    pub grants: Vec<TileGrant>,
    pub bag_remaining: u32,
    pub game_finished: bool,
    pub winner_player_id: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClaimOutcome {
    /// Whoever holds the round lock after the call.
    pub holder: PlayerId,
    /// True only for the call that actually set the lock.
    pub claimed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StuckOutcome {
    pub tiles_drawn: u32,
    pub bag_remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FinishOutcome {
    pub winner: FinalPlayerStats,
    pub scores: Vec<FinalPlayerStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_only_moves_forward() {
        assert!(GameStatus::Waiting.can_transition_to(GameStatus::InProgress));
        assert!(GameStatus::InProgress.can_transition_to(GameStatus::Finished));
        assert!(!GameStatus::Finished.can_transition_to(GameStatus::Waiting));
        assert!(!GameStatus::InProgress.can_transition_to(GameStatus::Waiting));
        assert!(!GameStatus::Waiting.can_transition_to(GameStatus::Waiting));
    }

    #[test]
    fn test_status_display_matches_wire_name() {
        assert_eq!(GameStatus::InProgress.to_string(), "in_progress");
        let json = serde_json::to_string(&GameStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }
}
