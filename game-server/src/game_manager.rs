use std::collections::BTreeMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

use crate::commentary::{Commentator, CommentaryContext, CommentaryKind};
use crate::config::Config;
use crate::dictionary::{DictionaryValidator, ValidationPolicy};
use game_core::{
    Game, GameEvent, GameEventBus, GameEventHandler, GameLimits, TracingEventHandler,
    generate_join_code, normalize_join_code,
};
use game_persistence::GameRepository;
use game_types::{
    ClaimOutcome, CreateGameRequest, FinalPlayerStats, FinishOutcome, GameError, GameId,
    GameSettings, GameStateView, JoinGameRequest, JoinInfo, MessOutcome, MoveOutcome,
    MoveTileRequest, PlayerId, StuckOutcome,
};

/// Words at least this long get a line of commentary when completed.
pub const COMMENTARY_MIN_WORD_LENGTH: usize = 6;
const COMMENTARY_TIMEOUT: Duration = Duration::from_secs(2);
const JOIN_CODE_ATTEMPTS: usize = 16;

fn storage_error(err: anyhow::Error) -> GameError {
    GameError::Storage(err.to_string())
}

/// Owns every live game. Each game sits behind its own async mutex, so all
/// reads and writes for one game are serialized while games stay independent.
///
/// Writes are all-or-nothing: an operation runs against a clone, the clone is
/// persisted, and only then does it replace the live game.
pub struct GameManager {
    games: DashMap<GameId, Arc<Mutex<Game>>>,
    join_codes: DashMap<String, GameId>,
    repository: GameRepository,
    dictionary: Arc<DictionaryValidator>,
    commentator: Option<Arc<dyn Commentator>>,
    event_bus: StdMutex<GameEventBus>,
    limits: GameLimits,
    default_piece_count: u32,
}

impl GameManager {
    pub fn new(
        repository: GameRepository,
        dictionary: Arc<DictionaryValidator>,
        commentator: Option<Arc<dyn Commentator>>,
        config: &Config,
    ) -> Self {
        let mut event_bus = GameEventBus::new();
        event_bus.add_handler(Box::new(TracingEventHandler));

        Self {
            games: DashMap::new(),
            join_codes: DashMap::new(),
            repository,
            dictionary,
            commentator,
            event_bus: StdMutex::new(event_bus),
            limits: config.limits(),
            default_piece_count: config.default_piece_count,
        }
    }

    pub fn add_event_handler(&self, handler: Box<dyn GameEventHandler>) {
        match self.event_bus.lock() {
            Ok(mut bus) => bus.add_handler(handler),
            Err(poisoned) => poisoned.into_inner().add_handler(handler),
        }
    }

    fn publish(&self, events: Vec<GameEvent>) {
        match self.event_bus.lock() {
            Ok(mut bus) => bus.publish_all(events),
            Err(poisoned) => poisoned.into_inner().publish_all(events),
        }
    }

    pub fn active_games_count(&self) -> usize {
        self.games.len()
    }

    async fn allocate_join_code(&self) -> Result<String, GameError> {
        for _ in 0..JOIN_CODE_ATTEMPTS {
            let code = generate_join_code(&mut rand::rng());
            if self.join_codes.contains_key(&code) {
                continue;
            }
            if !self
                .repository
                .join_code_taken(&code)
                .await
                .map_err(storage_error)?
            {
                return Ok(code);
            }
        }
        Err(GameError::Storage("Could not allocate a unique join code".to_string()))
    }

    /// Live handle for a game, loading it from the store if it is not resident.
    async fn game_handle(&self, game_id: GameId) -> Result<Arc<Mutex<Game>>, GameError> {
        if let Some(handle) = self.games.get(&game_id).map(|entry| entry.value().clone()) {
            return Ok(handle);
        }

        let snapshot = self
            .repository
            .load_game(game_id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| GameError::not_found("Game"))?;
        info!("Loaded game {} from storage", game_id);

        self.join_codes
            .insert(normalize_join_code(&snapshot.game.join_code), game_id);
        let handle = self
            .games
            .entry(game_id)
            .or_insert_with(|| Arc::new(Mutex::new(Game::from_snapshot(snapshot))))
            .value()
            .clone();
        Ok(handle)
    }

    pub async fn resolve_join_code(&self, join_code: &str) -> Result<GameId, GameError> {
        let code = normalize_join_code(join_code);
        if let Some(id) = self.join_codes.get(&code).map(|entry| *entry.value()) {
            return Ok(id);
        }
        self.repository
            .find_game_id(&code)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| GameError::not_found("Join code"))
    }

    /// Run `op` against a copy of the game and commit it if it succeeds.
    async fn mutate<T, F>(&self, game_id: GameId, op: F) -> Result<T, GameError>
    where
        F: FnOnce(&mut Game) -> Result<T, GameError> + Send,
        T: Send,
    {
        let handle = self.game_handle(game_id).await?;
        let mut guard = handle.lock().await;
        let mut working = guard.clone();
        let value = op(&mut working)?;
        self.commit(&mut guard, working).await?;
        Ok(value)
    }

    /// Add commentary, persist, swap in the new state and publish its events.
    async fn commit(&self, guard: &mut MutexGuard<'_, Game>, mut working: Game) -> Result<(), GameError> {
        self.add_commentary(&mut working).await;
        self.persist(&working).await?;
        let events = working.take_events();
        **guard = working;
        self.publish(events);
        Ok(())
    }

    async fn persist(&self, game: &Game) -> Result<(), GameError> {
        self.repository
            .save_game(&game.snapshot())
            .await
            .map_err(storage_error)
    }

    /// Best effort: a failed or slow commentator only costs the message.
    async fn add_commentary(&self, game: &mut Game) {
        let Some(commentator) = &self.commentator else {
            return;
        };

        let mut requests = Vec::new();
        for event in game.pending_events() {
            let request = match event {
                GameEvent::WordCompleted { player_id, word, .. }
                    if word.chars().count() >= COMMENTARY_MIN_WORD_LENGTH =>
                {
                    Some((CommentaryKind::Word, *player_id, Some(word.clone())))
                }
                GameEvent::MessItUp { player_id, .. } => {
                    Some((CommentaryKind::Split, *player_id, None))
                }
                GameEvent::GameFinished { winner_id, .. } => {
                    Some((CommentaryKind::Winner, *winner_id, None))
                }
                _ => None,
            };
            requests.extend(request);
        }

        for (kind, player_id, word) in requests {
            let player_name = match game.player(player_id) {
                Ok(player) => player.display_name.clone(),
                Err(_) => continue,
            };
            let context = CommentaryContext {
                player_name,
                word: word.clone(),
            };

            match tokio::time::timeout(COMMENTARY_TIMEOUT, commentator.comment(kind, &context)).await {
                Ok(Ok(line)) => game.push_ai_message(line, word),
                Ok(Err(e)) => warn!("Commentary for {:?} failed: {}", kind, e),
                Err(_) => warn!("Commentary for {:?} timed out", kind),
            }
        }
    }

    pub async fn create_game(&self, mut request: CreateGameRequest) -> Result<JoinInfo, GameError> {
        if request.settings.is_none() {
            request.settings = Some(GameSettings {
                piece_count: self.default_piece_count,
                ..GameSettings::default()
            });
        }

        let join_code = self.allocate_join_code().await?;
        let (mut game, player_id) =
            Game::create(&request, join_code, &self.limits, &mut rand::rng())?;

        self.add_commentary(&mut game).await;
        self.persist(&game).await?;

        let info = JoinInfo {
            game_id: game.id(),
            player_id,
            join_code: game.info.join_code.clone(),
        };
        let events = game.take_events();
        self.join_codes.insert(info.join_code.clone(), info.game_id);
        self.games.insert(info.game_id, Arc::new(Mutex::new(game)));
        self.publish(events);

        Ok(info)
    }

    pub async fn join_game(&self, request: JoinGameRequest) -> Result<JoinInfo, GameError> {
        let game_id = self.resolve_join_code(&request.join_code).await?;
        let player_id = self.mutate(game_id, |game| game.join(&request)).await?;
        Ok(JoinInfo {
            game_id,
            player_id,
            join_code: normalize_join_code(&request.join_code),
        })
    }

    pub async fn start_game(&self, game_id: GameId, player_id: PlayerId) -> Result<(), GameError> {
        self.mutate(game_id, |game| game.start(player_id)).await
    }

    pub async fn move_tile(&self, game_id: GameId, request: MoveTileRequest) -> Result<MoveOutcome, GameError> {
        self.mutate(game_id, |game| {
            game.move_tile(request.player_id, request.tile_id, request.destination)
        })
        .await
    }

    pub async fn claim_round(&self, game_id: GameId, player_id: PlayerId) -> Result<ClaimOutcome, GameError> {
        self.mutate(game_id, |game| game.claim_round(player_id)).await
    }

    /// The game lock is held across the dictionary round trip so the board
    /// cannot change between validation and redistribution.
    pub async fn mess_it_up(&self, game_id: GameId, player_id: PlayerId) -> Result<MessOutcome, GameError> {
        let handle = self.game_handle(game_id).await?;
        let mut guard = handle.lock().await;

        let words = guard.mess_precheck(player_id)?;
        let verdicts: BTreeMap<String, bool> = self
            .dictionary
            .validate_all(words.iter().map(String::as_str), ValidationPolicy::Strict)
            .await;

        let mut working = guard.clone();
        let outcome = working.mess_it_up(player_id, &verdicts)?;
        self.commit(&mut guard, working).await?;

        info!(
            "Round completed in game {} by {} (+{} points, {} tiles left)",
            game_id, player_id, outcome.points_awarded, outcome.bag_remaining
        );
        Ok(outcome)
    }

    pub async fn stuck(&self, game_id: GameId, player_id: PlayerId) -> Result<StuckOutcome, GameError> {
        self.mutate(game_id, |game| game.stuck(player_id)).await
    }

    pub async fn finish_game(&self, game_id: GameId, player_id: PlayerId) -> Result<FinishOutcome, GameError> {
        self.mutate(game_id, |game| game.finish(player_id)).await
    }

    pub async fn get_state(&self, join_code: &str, requester: Option<PlayerId>) -> Result<GameStateView, GameError> {
        let game_id = self.resolve_join_code(join_code).await?;
        self.get_state_by_id(game_id, requester).await
    }

    pub async fn get_state_by_id(&self, game_id: GameId, requester: Option<PlayerId>) -> Result<GameStateView, GameError> {
        let handle = self.game_handle(game_id).await?;
        let game = handle.lock().await;
        Ok(game.state_view(requester))
    }

    pub async fn get_final_stats(&self, game_id: GameId) -> Result<Vec<FinalPlayerStats>, GameError> {
        let handle = self.game_handle(game_id).await?;
        let game = handle.lock().await;
        game.final_stats()
    }

    /// Preview validation for clients. Oracle failures count as valid here.
    pub async fn validate_words(&self, words: &[String]) -> BTreeMap<String, bool> {
        self.dictionary
            .validate_all(words.iter().map(String::as_str), ValidationPolicy::Lenient)
            .await
    }
}
