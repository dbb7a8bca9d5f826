use crate::board::{self, Board};
use crate::connectivity::is_connected;
use crate::letter_bag::{create_letter_bag, letter_value};
use crate::rack;
use crate::scoring::{MESS_BONUS_POINTS, POINTS_PER_WORD, ScoringEngine};
use crate::word_detection::{detect_words, find_new_words};
use crate::word_validation::WordValidator;
use crate::GameEvent;
use game_types::{
    BoardPosition, CharacterCosmetic, ChatMessage, ChatMetadata, ClaimOutcome, CompletedWord,
    ConflictReason, CreateGameRequest, Destination, DetectedWord, FinalPlayerStats, FinishOutcome,
    GameError, GameId, GameInfo, GameSnapshot, GameStateView, GameStatus, HIDDEN_TILE,
    JoinGameRequest, MessOutcome, MoveOutcome, Player, PlayerId, PlayerView, SafeGameInfo,
    SenderType, StuckOutcome, Tile, TileGrant, TileId, TileLocation,
};
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;
use uuid::Uuid;

pub const INITIAL_RACK_SIZE: u32 = 4;
pub const REDISTRIBUTION_TILES: u32 = 2;
pub const STUCK_DRAW_TILES: u32 = 2;
pub const MAX_DISPLAY_NAME_LEN: usize = 32;
pub const JOIN_CODE_LENGTH: usize = 6;
pub const JOIN_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const PLAYER_COLORS: [&str; 10] = [
    "#E05243", "#2D9CDB", "#27AE60", "#9B51E0", "#F2994A", "#EB5757", "#16A085", "#8E44AD",
    "#2980B9", "#C0392B",
];

/// Server-configurable bounds applied when games are created and joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameLimits {
    pub max_players: u32,
    pub min_piece_count: u32,
    pub max_piece_count: u32,
}

impl Default for GameLimits {
    fn default() -> Self {
        Self {
            max_players: 8,
            min_piece_count: 12,
            max_piece_count: 500,
        }
    }
}

pub fn generate_join_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..JOIN_CODE_LENGTH)
        .map(|_| JOIN_CODE_ALPHABET[rng.random_range(0..JOIN_CODE_ALPHABET.len())] as char)
        .collect()
}

pub fn normalize_join_code(code: &str) -> String {
    code.trim().to_uppercase()
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn validate_display_name(name: &str) -> Result<String, GameError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(GameError::validation("Display name is required"));
    }
    if name.chars().count() > MAX_DISPLAY_NAME_LEN {
        return Err(GameError::validation(format!(
            "Display name must be at most {} characters",
            MAX_DISPLAY_NAME_LEN
        )));
    }
    Ok(name.to_string())
}

/// The authoritative state of one game and every operation that mutates it.
///
/// Operations validate first and only mutate once every check has passed, so an
/// `Err` always leaves the game untouched. Domain events raised by successful
/// operations queue up until [`Game::take_events`] is called.
#[derive(Debug, Clone)]
pub struct Game {
    pub info: GameInfo,
    pub players: Vec<Player>,
    pub tiles: Vec<Tile>,
    pub chat: Vec<ChatMessage>,
    pub completed_words: Vec<CompletedWord>,
    pub final_stats: Option<Vec<FinalPlayerStats>>,
    events: Vec<GameEvent>,
}

impl Game {
    /// Set up a waiting game with the creator seated and holding their first tiles.
    pub fn create<R: Rng + ?Sized>(
        request: &CreateGameRequest,
        join_code: String,
        limits: &GameLimits,
        rng: &mut R,
    ) -> Result<(Self, PlayerId), GameError> {
        let display_name = validate_display_name(&request.display_name)?;
        let settings = request.settings.clone().unwrap_or_default();
        if settings.piece_count < limits.min_piece_count
            || settings.piece_count > limits.max_piece_count
        {
            return Err(GameError::validation(format!(
                "Piece count must be between {} and {}",
                limits.min_piece_count, limits.max_piece_count
            )));
        }
        if settings.timer_enabled && settings.timer_duration_minutes == 0 {
            return Err(GameError::validation("Timer duration must be at least one minute"));
        }

        let timestamp = now();
        let game_id = Uuid::new_v4();
        let creator_id = Uuid::new_v4();
        let letter_bag = create_letter_bag(settings.piece_count as usize, rng);

        let info = GameInfo {
            id: game_id,
            join_code,
            creator_id,
            status: GameStatus::Waiting,
            max_players: limits.max_players,
            total_tiles_initial: letter_bag.len() as u32,
            letter_bag,
            language: "en".to_string(),
            current_round_winner_id: None,
            is_final_round: false,
            winner_player_id: None,
            settings,
            created_at: timestamp.clone(),
            updated_at: timestamp.clone(),
            timer_started_at: None,
            timer_ends_at: None,
        };

        let mut game = Self {
            info,
            players: Vec::new(),
            tiles: Vec::new(),
            chat: Vec::new(),
            completed_words: Vec::new(),
            final_stats: None,
            events: Vec::new(),
        };

        game.seat_player(
            creator_id,
            display_name,
            true,
            request.color.clone(),
            request.character,
            &timestamp,
        );
        game.deal(creator_id, INITIAL_RACK_SIZE, &timestamp);

        game.events.push(GameEvent::GameCreated {
            game_id,
            creator_id,
            join_code: game.info.join_code.clone(),
            piece_count: game.info.total_tiles_initial,
        });

        Ok((game, creator_id))
    }

    pub fn from_snapshot(snapshot: GameSnapshot) -> Self {
        Self {
            info: snapshot.game,
            players: snapshot.players,
            tiles: snapshot.tiles,
            chat: snapshot.chat,
            completed_words: snapshot.completed_words,
            final_stats: snapshot.final_stats,
            events: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            game: self.info.clone(),
            players: self.players.clone(),
            tiles: self.tiles.clone(),
            chat: self.chat.clone(),
            completed_words: self.completed_words.clone(),
            final_stats: self.final_stats.clone(),
        }
    }

    pub fn id(&self) -> GameId {
        self.info.id
    }

    pub fn status(&self) -> GameStatus {
        self.info.status
    }

    pub fn bag_remaining(&self) -> u32 {
        self.info.letter_bag.len() as u32
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn player(&self, player_id: PlayerId) -> Result<&Player, GameError> {
        self.players
            .iter()
            .find(|p| p.id == player_id)
            .ok_or_else(|| GameError::not_found("Player"))
    }

    fn player_mut(&mut self, player_id: PlayerId) -> Result<&mut Player, GameError> {
        self.players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or_else(|| GameError::not_found("Player"))
    }

    pub fn tile(&self, tile_id: TileId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == tile_id)
    }

    /// Rack tiles for a player ordered by slot.
    pub fn rack_tiles(&self, player_id: PlayerId) -> Vec<&Tile> {
        let mut rack: Vec<&Tile> = self
            .tiles
            .iter()
            .filter(|t| t.is_in_rack_of(player_id))
            .collect();
        rack.sort_by_key(|t| t.location.rack_slot());
        rack
    }

    pub fn board_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| t.location.is_board())
    }

    pub fn detected_words(&self) -> Vec<DetectedWord> {
        detect_words(&self.tiles)
    }

    fn require_status(&self, expected: GameStatus) -> Result<(), GameError> {
        if self.info.status == expected {
            Ok(())
        } else {
            Err(GameError::invalid_state(self.info.status))
        }
    }

    fn transition(&mut self, next: GameStatus) -> Result<(), GameError> {
        if !self.info.status.can_transition_to(next) {
            return Err(GameError::invalid_state(self.info.status));
        }
        self.info.status = next;
        Ok(())
    }

    fn touch(&mut self, timestamp: &str) {
        self.info.updated_at = timestamp.to_string();
    }

    fn seat_player(
        &mut self,
        player_id: PlayerId,
        display_name: String,
        is_creator: bool,
        color: Option<String>,
        character: Option<CharacterCosmetic>,
        timestamp: &str,
    ) {
        let color = color
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| PLAYER_COLORS[self.players.len() % PLAYER_COLORS.len()].to_string());
        let avatar_seed = format!("{}-{}", display_name, player_id.simple());

        self.players.push(Player {
            id: player_id,
            game_id: self.info.id,
            display_name,
            is_creator,
            is_active: true,
            color,
            character: character.unwrap_or_default(),
            avatar_seed,
            mess_bonus_count: 0,
            stuck_penalty_count: 0,
            scored_words: BTreeSet::new(),
            joined_at: timestamp.to_string(),
        });
    }

    /// Pop up to `count` letters from the bag into the player's rack.
    fn deal(&mut self, player_id: PlayerId, count: u32, timestamp: &str) -> u32 {
        let mut occupied = rack::rack_slots(&self.tiles, player_id, None);
        let mut dealt = 0;

        while dealt < count {
            let Some(letter) = self.info.letter_bag.pop() else {
                break;
            };
            let slot = rack::first_free_slot(&occupied);
            let tile = Tile {
                id: Uuid::new_v4(),
                game_id: self.info.id,
                letter,
                value: letter_value(letter),
                location: TileLocation::Rack { slot },
                owner_player_id: Some(player_id),
                last_moved_by_player_id: None,
                created_at: timestamp.to_string(),
                updated_at: timestamp.to_string(),
            };
            occupied.insert(slot, tile.id);
            self.tiles.push(tile);
            dealt += 1;
        }

        dealt
    }

    fn push_chat(
        &mut self,
        sender_type: SenderType,
        sender_player_id: Option<PlayerId>,
        content: String,
        metadata: ChatMetadata,
        timestamp: &str,
    ) {
        self.chat.push(ChatMessage {
            id: Uuid::new_v4(),
            game_id: self.info.id,
            sender_type,
            sender_player_id,
            content,
            metadata,
            created_at: timestamp.to_string(),
        });
    }

    fn push_system_message(&mut self, content: String, metadata: ChatMetadata, timestamp: &str) {
        self.push_chat(SenderType::System, None, content, metadata, timestamp);
    }

    /// Append a commentary line. Commentary never affects game logic.
    pub fn push_ai_message(&mut self, content: String, word: Option<String>) {
        let timestamp = now();
        self.push_chat(
            SenderType::Ai,
            None,
            content,
            ChatMetadata::AiComment { word },
            &timestamp,
        );
    }

    pub fn join(&mut self, request: &JoinGameRequest) -> Result<PlayerId, GameError> {
        let display_name = validate_display_name(&request.display_name)?;
        if self.info.status == GameStatus::Finished {
            return Err(GameError::invalid_state(self.info.status));
        }
        if self.players.len() as u32 >= self.info.max_players {
            return Err(ConflictReason::GameFull {
                max_players: self.info.max_players,
            }
            .into());
        }

        let timestamp = now();
        let player_id = Uuid::new_v4();
        self.seat_player(
            player_id,
            display_name.clone(),
            false,
            request.color.clone(),
            request.character,
            &timestamp,
        );

        // Late joiners get their tiles straight away.
        let tiles_dealt = if self.info.status == GameStatus::InProgress {
            self.deal(player_id, INITIAL_RACK_SIZE, &timestamp)
        } else {
            0
        };

        self.push_system_message(
            format!("{} joined the game", display_name),
            ChatMetadata::PlayerJoined { player_id },
            &timestamp,
        );
        self.touch(&timestamp);
        self.events.push(GameEvent::PlayerJoined {
            game_id: self.info.id,
            player_id,
            display_name,
            tiles_dealt,
        });

        Ok(player_id)
    }

    pub fn start(&mut self, player_id: PlayerId) -> Result<(), GameError> {
        let player = self.player(player_id)?;
        if !player.is_creator {
            return Err(GameError::forbidden("Only the game creator can start the game"));
        }
        self.require_status(GameStatus::Waiting)?;

        let timestamp = now();
        self.transition(GameStatus::InProgress)?;

        let empty_handed: Vec<PlayerId> = self
            .players
            .iter()
            .filter(|p| !self.tiles.iter().any(|t| t.owner_player_id == Some(p.id)))
            .map(|p| p.id)
            .collect();
        for id in empty_handed {
            self.deal(id, INITIAL_RACK_SIZE, &timestamp);
        }

        if self.info.settings.timer_enabled {
            let started = chrono::Utc::now();
            let ends = started
                + chrono::Duration::minutes(self.info.settings.timer_duration_minutes as i64);
            self.info.timer_started_at = Some(started.to_rfc3339());
            self.info.timer_ends_at = Some(ends.to_rfc3339());
        }

        self.push_system_message(
            format!("Game started! Each player gets {} tiles.", INITIAL_RACK_SIZE),
            ChatMetadata::GameStarted,
            &timestamp,
        );
        self.touch(&timestamp);
        self.events.push(GameEvent::GameStarted {
            game_id: self.info.id,
            player_count: self.players.len(),
        });

        Ok(())
    }

    pub fn move_tile(
        &mut self,
        player_id: PlayerId,
        tile_id: TileId,
        destination: Destination,
    ) -> Result<MoveOutcome, GameError> {
        self.require_status(GameStatus::InProgress)?;
        self.player(player_id)?;

        let tile = self
            .tile(tile_id)
            .filter(|t| t.location != TileLocation::Bag)
            .ok_or_else(|| GameError::not_found("Tile"))?;
        if tile.location.is_rack() && tile.owner_player_id != Some(player_id) {
            return Err(GameError::forbidden("That tile is in another player's rack"));
        }
        let origin = tile.location;

        let timestamp = now();
        let displaced_tile_id = match destination {
            Destination::Board { row, col } => {
                let target = BoardPosition::new(row, col);
                if !board::in_bounds(target) {
                    return Err(GameError::validation(format!(
                        "Board coordinates must be within ±{}",
                        board::MAX_BOARD_COORDINATE
                    )));
                }
                if origin.board_position() == Some(target) {
                    return Ok(MoveOutcome {
                        tile_id,
                        displaced_tile_id: None,
                        new_words: Vec::new(),
                    });
                }
                self.place_on_board(player_id, tile_id, target, &timestamp)
            }
            Destination::Rack { slot } => {
                let occupied = rack::rack_slots(&self.tiles, player_id, Some(tile_id));
                let changes = rack::insert_at(&occupied, tile_id, slot);
                rack::apply_slot_changes(&mut self.tiles, &changes, &timestamp);
                self.stamp_mover(tile_id, player_id);
                None
            }
        };

        let new_words = if matches!(destination, Destination::Board { .. }) {
            self.record_new_words(player_id, &timestamp)
        } else {
            Vec::new()
        };

        debug!(
            "Tile {} moved {:?} -> {:?} by {} ({} new words)",
            tile_id,
            origin,
            destination,
            player_id,
            new_words.len()
        );
        self.touch(&timestamp);
        self.events.push(GameEvent::TileMoved {
            game_id: self.info.id,
            player_id,
            tile_id,
            displaced_tile_id,
        });

        Ok(MoveOutcome {
            tile_id,
            displaced_tile_id,
            new_words,
        })
    }

    /// Put a tile on `target`, nudging any occupant to the nearest free cell.
    fn place_on_board(
        &mut self,
        player_id: PlayerId,
        tile_id: TileId,
        target: BoardPosition,
        timestamp: &str,
    ) -> Option<TileId> {
        let board = Board::from_tiles(self.tiles.iter().filter(|t| t.id != tile_id));
        let displaced = board.tile_at(target);

        if let Some(occupant_id) = displaced {
            let refuge = board.nearest_empty(target);
            if let Some(occupant) = self.tiles.iter_mut().find(|t| t.id == occupant_id) {
                occupant.location = refuge.into();
                occupant.last_moved_by_player_id = Some(player_id);
                occupant.updated_at = timestamp.to_string();
            }
        }

        if let Some(tile) = self.tiles.iter_mut().find(|t| t.id == tile_id) {
            tile.location = target.into();
            tile.updated_at = timestamp.to_string();
        }
        self.stamp_mover(tile_id, player_id);

        displaced
    }

    fn stamp_mover(&mut self, tile_id: TileId, player_id: PlayerId) {
        if let Some(tile) = self.tiles.iter_mut().find(|t| t.id == tile_id) {
            tile.owner_player_id = Some(player_id);
            tile.last_moved_by_player_id = Some(player_id);
        }
    }

    /// Append every board word missing from history. Running it again on an
    /// unchanged board records nothing.
    pub fn record_new_words(&mut self, player_id: PlayerId, timestamp: &str) -> Vec<DetectedWord> {
        let detected = detect_words(&self.tiles);
        let fresh: Vec<DetectedWord> = find_new_words(&detected, &self.completed_words)
            .into_iter()
            .cloned()
            .collect();
        if fresh.is_empty() {
            return fresh;
        }

        let display_name = self
            .player(player_id)
            .map(|p| p.display_name.clone())
            .unwrap_or_default();

        for word in &fresh {
            self.completed_words.push(CompletedWord {
                id: Uuid::new_v4(),
                game_id: self.info.id,
                player_id,
                word: word.word.clone(),
                length: word.length,
                direction: word.direction,
                start_row: word.start_row,
                start_col: word.start_col,
                tiles_involved: word.tiles.clone(),
                created_at: timestamp.to_string(),
            });
            self.push_system_message(
                format!("{} completed \"{}\"!", display_name, word.word),
                ChatMetadata::WordCompleted {
                    word: word.word.clone(),
                    player_id,
                },
                timestamp,
            );
            self.events.push(GameEvent::WordCompleted {
                game_id: self.info.id,
                player_id,
                word: word.word.clone(),
            });
        }

        fresh
    }

    /// Set the round lock if nobody holds it. Never steals an existing claim.
    pub fn claim_round(&mut self, player_id: PlayerId) -> Result<ClaimOutcome, GameError> {
        self.require_status(GameStatus::InProgress)?;
        self.player(player_id)?;

        if let Some(holder) = self.info.current_round_winner_id {
            return Ok(ClaimOutcome {
                holder,
                claimed: false,
            });
        }

        self.info.current_round_winner_id = Some(player_id);
        self.touch(&now());
        self.events.push(GameEvent::RoundClaimed {
            game_id: self.info.id,
            player_id,
        });

        Ok(ClaimOutcome {
            holder: player_id,
            claimed: true,
        })
    }

    /// Local MESS IT UP gates, in order. On success returns every word text on
    /// the board, all of which must validate before [`Game::mess_it_up`] may run.
    pub fn mess_precheck(&self, player_id: PlayerId) -> Result<BTreeSet<String>, GameError> {
        self.require_status(GameStatus::InProgress)?;
        self.player(player_id)?;

        if let Some(holder) = self.info.current_round_winner_id {
            if holder != player_id {
                return Err(ConflictReason::RoundClaimed { holder }.into());
            }
        }

        let remaining = self.rack_tiles(player_id).len();
        if remaining > 0 {
            return Err(ConflictReason::RackNotEmpty { remaining }.into());
        }

        let positions: HashSet<BoardPosition> = self
            .tiles
            .iter()
            .filter(|t| t.is_on_board_for(player_id))
            .filter_map(|t| t.board_position())
            .collect();
        if positions.is_empty() {
            return Err(ConflictReason::NoBoardTiles.into());
        }
        if !is_connected(&positions) {
            return Err(ConflictReason::TilesNotConnected.into());
        }

        Ok(self
            .detected_words()
            .into_iter()
            .map(|w| WordValidator::normalize(&w.word))
            .collect())
    }

    /// Complete the round. `verdicts` holds the dictionary result for each board
    /// word; a word missing from it counts as invalid.
    pub fn mess_it_up(
        &mut self,
        player_id: PlayerId,
        verdicts: &BTreeMap<String, bool>,
    ) -> Result<MessOutcome, GameError> {
        let board_words = self.mess_precheck(player_id)?;
        let invalid = WordValidator::invalid_words(&board_words, verdicts);
        if !invalid.is_empty() {
            return Err(ConflictReason::InvalidWords { words: invalid }.into());
        }

        let timestamp = now();
        self.record_new_words(player_id, &timestamp);

        let player = self.player(player_id)?;
        let newly_scored: BTreeSet<String> = board_words
            .into_iter()
            .filter(|w| !player.scored_words.contains(w))
            .collect();
        let points_awarded = MESS_BONUS_POINTS + POINTS_PER_WORD * newly_scored.len() as i32;
        let display_name = player.display_name.clone();

        let player = self.player_mut(player_id)?;
        player.mess_bonus_count += 1;
        player.scored_words.extend(newly_scored.iter().cloned());

        self.info.current_round_winner_id = None;
        let grants = self.redistribute(player_id, &timestamp);
        let bag_remaining = self.bag_remaining();
        let everyone_got_full_share = grants.iter().all(|g| g.count == REDISTRIBUTION_TILES);

        let content = if everyone_got_full_share {
            format!(
                "{} used MESS IT UP! (+{} points). Everyone gets {} new tiles. {} tiles remaining.",
                display_name, points_awarded, REDISTRIBUTION_TILES, bag_remaining
            )
        } else {
            format!(
                "{} used MESS IT UP! (+{} points). The last tiles were shared out. {} tiles remaining.",
                display_name, points_awarded, bag_remaining
            )
        };
        self.push_system_message(
            content,
            ChatMetadata::Split {
                player_id,
                word_points: points_awarded,
                new_words: newly_scored.iter().cloned().collect(),
            },
            &timestamp,
        );
        self.touch(&timestamp);
        self.events.push(GameEvent::MessItUp {
            game_id: self.info.id,
            player_id,
            points_awarded,
            bag_remaining,
        });

        let mut winner_player_id = None;
        if bag_remaining == 0 {
            self.info.is_final_round = true;
            let outcome = self.conclude(ScoringEngine::rank_by_points, &timestamp)?;
            winner_player_id = Some(outcome.winner.player_id);
        }

        Ok(MessOutcome {
            points_awarded,
            new_words: newly_scored.into_iter().collect(),
            grants,
            bag_remaining,
            game_finished: self.info.status == GameStatus::Finished,
            winner_player_id,
        })
    }

    /// Two tiles each when the bag allows it. Otherwise the triggering player
    /// draws first and the rest take turns one tile at a time.
    fn redistribute(&mut self, trigger_id: PlayerId, timestamp: &str) -> Vec<TileGrant> {
        let mut order: Vec<PlayerId> = vec![trigger_id];
        order.extend(
            self.players
                .iter()
                .filter(|p| p.is_active && p.id != trigger_id)
                .map(|p| p.id),
        );

        let mut counts: Vec<u32> = vec![0; order.len()];
        let needed = REDISTRIBUTION_TILES as usize * order.len();

        if self.info.letter_bag.len() >= needed {
            for (i, id) in order.iter().enumerate() {
                counts[i] = self.deal(*id, REDISTRIBUTION_TILES, timestamp);
            }
        } else {
            counts[0] = self.deal(trigger_id, REDISTRIBUTION_TILES, timestamp);
            for _ in 0..REDISTRIBUTION_TILES {
                for (i, id) in order.iter().enumerate().skip(1) {
                    counts[i] += self.deal(*id, 1, timestamp);
                }
            }
        }

        order
            .into_iter()
            .zip(counts)
            .map(|(player_id, count)| TileGrant { player_id, count })
            .collect()
    }

    /// Draw up to two tiles at a five point penalty.
    pub fn stuck(&mut self, player_id: PlayerId) -> Result<StuckOutcome, GameError> {
        self.require_status(GameStatus::InProgress)?;
        self.player(player_id)?;
        if self.info.letter_bag.is_empty() {
            return Err(ConflictReason::BagEmpty.into());
        }

        let timestamp = now();
        let tiles_drawn = self.deal(player_id, STUCK_DRAW_TILES, &timestamp);
        let player = self.player_mut(player_id)?;
        player.stuck_penalty_count += 1;
        let display_name = player.display_name.clone();

        self.push_system_message(
            format!(
                "{} is stuck! Drew {} new tiles (-{} points).",
                display_name,
                tiles_drawn,
                crate::scoring::STUCK_PENALTY_POINTS
            ),
            ChatMetadata::Stuck {
                player_id,
                tiles_drawn,
            },
            &timestamp,
        );
        self.touch(&timestamp);
        self.events.push(GameEvent::Stuck {
            game_id: self.info.id,
            player_id,
            tiles_drawn,
        });

        Ok(StuckOutcome {
            tiles_drawn,
            bag_remaining: self.bag_remaining(),
        })
    }

    /// End the game once the bag and every rack are empty.
    pub fn finish(&mut self, player_id: PlayerId) -> Result<FinishOutcome, GameError> {
        self.require_status(GameStatus::InProgress)?;
        self.player(player_id)?;

        let bag_remaining = self.info.letter_bag.len();
        let tiles_in_racks = self.tiles.iter().filter(|t| t.location.is_rack()).count();
        if bag_remaining > 0 || tiles_in_racks > 0 {
            return Err(ConflictReason::CannotFinish {
                bag_remaining,
                tiles_in_racks,
            }
            .into());
        }

        self.conclude(ScoringEngine::rank_by_words, &now())
    }

    fn conclude(
        &mut self,
        rank: fn(&mut [FinalPlayerStats]),
        timestamp: &str,
    ) -> Result<FinishOutcome, GameError> {
        let mut scores =
            ScoringEngine::all_final_stats(&self.players, &self.completed_words, &self.tiles);
        rank(&mut scores);
        let winner = scores
            .first()
            .cloned()
            .ok_or_else(|| GameError::not_found("Player"))?;

        self.transition(GameStatus::Finished)?;
        self.info.winner_player_id = Some(winner.player_id);
        self.info.current_round_winner_id = None;
        self.final_stats = Some(scores.clone());

        self.push_system_message(
            format!(
                "Game Finished! {} wins with {} points!",
                winner.player_name, winner.total_points
            ),
            ChatMetadata::GameFinished {
                winner_id: winner.player_id,
            },
            timestamp,
        );
        self.touch(timestamp);
        self.events.push(GameEvent::GameFinished {
            game_id: self.info.id,
            winner_id: winner.player_id,
            winner_name: winner.player_name.clone(),
            total_points: winner.total_points,
        });

        Ok(FinishOutcome { winner, scores })
    }

    /// State as one requester may see it. Other players' rack tiles are omitted
    /// from the tile list and their rack ids are replaced with placeholders.
    pub fn state_view(&self, requester: Option<PlayerId>) -> GameStateView {
        let players = self
            .players
            .iter()
            .map(|p| {
                let rack = self.rack_tiles(p.id);
                let rack = if Some(p.id) == requester {
                    rack.iter().map(|t| t.id.to_string()).collect()
                } else {
                    vec![HIDDEN_TILE.to_string(); rack.len()]
                };
                PlayerView {
                    player: p.clone(),
                    rack,
                }
            })
            .collect();

        let tiles = self
            .tiles
            .iter()
            .filter(|t| {
                t.location.is_board() || requester.is_some_and(|id| t.is_in_rack_of(id))
            })
            .cloned()
            .collect();

        GameStateView {
            game: SafeGameInfo::from(&self.info),
            players,
            tiles,
            chat_messages: self.chat.clone(),
            completed_words: self.completed_words.clone(),
            scores: ScoringEngine::scores(&self.players, &self.completed_words),
            final_stats: self.final_stats.clone(),
        }
    }

    pub fn final_stats(&self) -> Result<Vec<FinalPlayerStats>, GameError> {
        self.final_stats
            .clone()
            .ok_or_else(|| GameError::not_found("Final stats"))
    }
}
