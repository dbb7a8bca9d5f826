use game_types::{GameId, PlayerId, TileId};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    GameCreated {
        game_id: GameId,
        creator_id: PlayerId,
        join_code: String,
        piece_count: u32,
    },
    PlayerJoined {
        game_id: GameId,
        player_id: PlayerId,
        display_name: String,
        tiles_dealt: u32,
    },
    GameStarted {
        game_id: GameId,
        player_count: usize,
    },
    TileMoved {
        game_id: GameId,
        player_id: PlayerId,
        tile_id: TileId,
        displaced_tile_id: Option<TileId>,
    },
    WordCompleted {
        game_id: GameId,
        player_id: PlayerId,
        word: String,
    },
    RoundClaimed {
        game_id: GameId,
        player_id: PlayerId,
    },
    MessItUp {
        game_id: GameId,
        player_id: PlayerId,
        points_awarded: i32,
        bag_remaining: u32,
    },
    Stuck {
        game_id: GameId,
        player_id: PlayerId,
        tiles_drawn: u32,
    },
    GameFinished {
        game_id: GameId,
        winner_id: PlayerId,
        winner_name: String,
        total_points: i32,
    },
}

impl GameEvent {
    pub fn game_id(&self) -> GameId {
        match self {
            GameEvent::GameCreated { game_id, .. } => *game_id,
            GameEvent::PlayerJoined { game_id, .. } => *game_id,
            GameEvent::GameStarted { game_id, .. } => *game_id,
            GameEvent::TileMoved { game_id, .. } => *game_id,
            GameEvent::WordCompleted { game_id, .. } => *game_id,
            GameEvent::RoundClaimed { game_id, .. } => *game_id,
            GameEvent::MessItUp { game_id, .. } => *game_id,
            GameEvent::Stuck { game_id, .. } => *game_id,
            GameEvent::GameFinished { game_id, .. } => *game_id,
        }
    }
}

/// Event handler trait for processing game events
pub trait GameEventHandler: Send {
    fn handle_event(&mut self, event: GameEvent);
}

/// Simple event bus for distributing game events
pub struct GameEventBus {
    handlers: Vec<Box<dyn GameEventHandler>>,
}

impl GameEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn GameEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn publish(&mut self, event: GameEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(event.clone());
        }
    }

    pub fn publish_all(&mut self, events: impl IntoIterator<Item = GameEvent>) {
        for event in events {
            self.publish(event);
        }
    }
}

impl Default for GameEventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes every domain event to the tracing log.
pub struct TracingEventHandler;

impl GameEventHandler for TracingEventHandler {
    fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::GameCreated { game_id, join_code, piece_count, .. } => {
                info!("Game {} created with join code {} ({} pieces)", game_id, join_code, piece_count)
            }
            GameEvent::PlayerJoined { game_id, display_name, tiles_dealt, .. } => {
                info!("{} joined game {} ({} tiles dealt)", display_name, game_id, tiles_dealt)
            }
            GameEvent::GameStarted { game_id, player_count } => {
                info!("Game {} started with {} players", game_id, player_count)
            }
            GameEvent::TileMoved { game_id, player_id, tile_id, displaced_tile_id } => {
                tracing::debug!(
                    "Player {} moved tile {} in game {} (displaced: {:?})",
                    player_id, tile_id, game_id, displaced_tile_id
                )
            }
            GameEvent::WordCompleted { game_id, player_id, word } => {
                info!("Player {} completed {} in game {}", player_id, word, game_id)
            }
            GameEvent::RoundClaimed { game_id, player_id } => {
                info!("Player {} claimed the round in game {}", player_id, game_id)
            }
            GameEvent::MessItUp { game_id, player_id, points_awarded, bag_remaining } => info!(
                "Player {} messed it up in game {} (+{} points, {} tiles left)",
                player_id, game_id, points_awarded, bag_remaining
            ),
            GameEvent::Stuck { game_id, player_id, tiles_drawn } => {
                info!("Player {} is stuck in game {}, drew {}", player_id, game_id, tiles_drawn)
            }
            GameEvent::GameFinished { game_id, winner_name, total_points, .. } => {
                info!("Game {} finished, {} wins with {} points", game_id, winner_name, total_points)
            }
        }
    }
}
