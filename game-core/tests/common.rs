#![allow(dead_code)]

use game_core::{Game, GameEvent, GameEventBus, GameEventHandler, GameLimits};
use game_types::{
    CreateGameRequest, Destination, Direction, GameSettings, JoinGameRequest, PlayerId, TileId,
    TileLocation,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

/// Deterministic RNG so bag contents are reproducible
pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(0x5EED)
}

/// Creates a waiting game with the given creator and piece count
pub fn create_game(creator: &str, piece_count: u32) -> (Game, PlayerId) {
    let request = CreateGameRequest {
        display_name: creator.to_string(),
        settings: Some(GameSettings {
            piece_count,
            ..GameSettings::default()
        }),
        color: None,
        character: None,
    };
    Game::create(
        &request,
        "TEST23".to_string(),
        &GameLimits::default(),
        &mut seeded_rng(),
    )
    .expect("game should be created")
}

pub fn join_player(game: &mut Game, name: &str) -> PlayerId {
    let request = JoinGameRequest {
        join_code: game.info.join_code.clone(),
        display_name: name.to_string(),
        color: None,
        character: None,
    };
    game.join(&request).expect("player should join")
}

/// Creates a started game: the first name is the creator
pub fn started_game(names: &[&str], piece_count: u32) -> (Game, Vec<PlayerId>) {
    let (mut game, creator) = create_game(names[0], piece_count);
    let mut ids = vec![creator];
    for name in &names[1..] {
        ids.push(join_player(&mut game, name));
    }
    game.start(creator).expect("creator should start the game");
    (game, ids)
}

/// Relabel a player's rack so it holds exactly `letters`, in slot order.
/// Surplus rack tiles go back into the bag.
pub fn rig_rack(game: &mut Game, player_id: PlayerId, letters: &str) -> Vec<TileId> {
    let rack: Vec<TileId> = game.rack_tiles(player_id).iter().map(|t| t.id).collect();
    assert!(
        rack.len() >= letters.len(),
        "rack has {} tiles, need {}",
        rack.len(),
        letters.len()
    );

    let mut kept = Vec::new();
    for (i, tile_id) in rack.iter().enumerate() {
        match letters.chars().nth(i) {
            Some(letter) => {
                let tile = game.tiles.iter_mut().find(|t| t.id == *tile_id).unwrap();
                tile.letter = letter;
                kept.push(*tile_id);
            }
            None => {
                let index = game.tiles.iter().position(|t| t.id == *tile_id).unwrap();
                let tile = game.tiles.remove(index);
                game.info.letter_bag.push(tile.letter);
            }
        }
    }
    kept
}

/// Move each tile onto consecutive cells starting at (row, col).
pub fn lay_tiles(
    game: &mut Game,
    player_id: PlayerId,
    tiles: &[TileId],
    row: i32,
    col: i32,
    direction: Direction,
) {
    for (i, tile_id) in tiles.iter().enumerate() {
        let offset = i as i32;
        let destination = match direction {
            Direction::Horizontal => Destination::Board { row, col: col + offset },
            Direction::Vertical => Destination::Board { row: row + offset, col },
        };
        game.move_tile(player_id, *tile_id, destination)
            .expect("move should succeed");
    }
}

/// Dictionary verdicts for `words`, accepting only entries in `dictionary`.
pub fn verdicts(words: &BTreeSet<String>, dictionary: &[&str]) -> BTreeMap<String, bool> {
    words
        .iter()
        .map(|w| (w.clone(), dictionary.contains(&w.as_str())))
        .collect()
}

pub fn board_cell(game: &Game, tile_id: TileId) -> Option<(i32, i32)> {
    match game.tile(tile_id)?.location {
        TileLocation::Board { row, col } => Some((row, col)),
        _ => None,
    }
}

/// Event collector for testing event emissions
#[derive(Clone)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<GameEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_events(&self) -> Vec<GameEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn has_event_type(&self, check_fn: impl Fn(&GameEvent) -> bool) -> bool {
        self.events.lock().unwrap().iter().any(check_fn)
    }
}

impl GameEventHandler for EventCollector {
    fn handle_event(&mut self, event: GameEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Bus with a collector attached; returns both.
pub fn collecting_bus() -> (GameEventBus, EventCollector) {
    let collector = EventCollector::new();
    let mut bus = GameEventBus::new();
    bus.add_handler(Box::new(collector.clone()));
    (bus, collector)
}
