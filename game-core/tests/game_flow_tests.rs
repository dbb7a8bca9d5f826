mod common;

use common::*;
use game_core::{ScoringEngine, detect_words};
use game_types::{
    ConflictReason, Destination, Direction, GameError, GameStatus, TileGrant, TileLocation,
};
use std::collections::HashSet;

#[test]
fn test_end_to_end_small_bag() {
    let (mut game, alice) = create_game("Alice", 12);
    assert_eq!(game.info.total_tiles_initial, 12);
    assert_eq!(game.rack_tiles(alice).len(), 4);
    assert_eq!(game.bag_remaining(), 8);

    game.start(alice).unwrap();
    let cat = rig_rack(&mut game, alice, "CAT");
    assert_eq!(game.bag_remaining(), 9);

    let bob = join_player(&mut game, "Bob");
    assert_eq!(game.rack_tiles(bob).len(), 4);
    assert_eq!(game.bag_remaining(), 5);

    lay_tiles(&mut game, alice, &cat, 0, 0, Direction::Horizontal);
    let words = detect_words(&game.tiles);
    assert_eq!(words.len(), 1);
    assert_eq!(words[0].word, "CAT");
    assert!(game.rack_tiles(alice).is_empty());

    let claim = game.claim_round(alice).unwrap();
    assert!(claim.claimed);

    let to_check = game.mess_precheck(alice).unwrap();
    let outcome = game
        .mess_it_up(alice, &verdicts(&to_check, &["CAT"]))
        .unwrap();

    assert_eq!(outcome.points_awarded, 30);
    assert_eq!(
        outcome.grants,
        vec![
            TileGrant { player_id: alice, count: 2 },
            TileGrant { player_id: bob, count: 2 },
        ]
    );
    assert_eq!(game.bag_remaining(), 1);
    assert_eq!(game.info.current_round_winner_id, None);
    assert_eq!(game.status(), GameStatus::InProgress);
    // CA on the way to CAT counts as a completed word too.
    assert_eq!(
        ScoringEngine::total_points(game.player(alice).unwrap(), &game.completed_words),
        35
    );
}

#[test]
fn test_mess_it_up_exhausting_bag_finishes_game() {
    let (mut game, ids) = started_game(&["Alice", "Bob"], 12);
    let (alice, bob) = (ids[0], ids[1]);
    let go = rig_rack(&mut game, alice, "GO");

    // Leave exactly one full share per player in the bag.
    game.info.letter_bag.truncate(4);
    lay_tiles(&mut game, alice, &go, 2, 2, Direction::Vertical);

    let to_check = game.mess_precheck(alice).unwrap();
    let outcome = game.mess_it_up(alice, &verdicts(&to_check, &["GO"])).unwrap();

    assert!(outcome.game_finished);
    assert_eq!(outcome.bag_remaining, 0);
    assert_eq!(outcome.winner_player_id, Some(alice));
    assert_eq!(game.status(), GameStatus::Finished);
    assert!(game.info.is_final_round);

    let stats = game.final_stats().unwrap();
    assert_eq!(stats[0].player_id, alice);
    assert_eq!(stats[0].total_points, 30);
    assert_eq!(stats[1].player_id, bob);
    assert!(game.chat.last().unwrap().content.starts_with("Game Finished! Alice wins"));

    let bobs_tile = game.rack_tiles(bob)[0].id;
    assert!(matches!(
        game.move_tile(bob, bobs_tile, Destination::Board { row: 9, col: 9 }),
        Err(GameError::InvalidState { .. })
    ));
}

#[test]
fn test_words_score_for_players_who_never_mess() {
    let (mut game, ids) = started_game(&["Alice", "Bob"], 12);
    let (alice, bob) = (ids[0], ids[1]);
    let dogs = rig_rack(&mut game, bob, "DOGS");
    let go = rig_rack(&mut game, alice, "GO");
    game.info.letter_bag.truncate(4);

    lay_tiles(&mut game, bob, &dogs, 10, 10, Direction::Horizontal);
    lay_tiles(&mut game, alice, &go, 2, 2, Direction::Vertical);

    let live = game.state_view(Some(bob));
    let bob_live = live.scores.iter().find(|s| s.player_id == bob).unwrap();
    assert_eq!(bob_live.word_count, 3);
    assert_eq!(bob_live.total_points, 15);

    let to_check = game.mess_precheck(alice).unwrap();
    let outcome = game
        .mess_it_up(alice, &verdicts(&to_check, &["GO", "DOGS"]))
        .unwrap();
    assert_eq!(outcome.points_awarded, 25 + 10);
    assert!(outcome.game_finished);

    let stats = game.final_stats().unwrap();
    let bob_final = stats.iter().find(|s| s.player_id == bob).unwrap();
    assert_eq!(bob_final.word_count, 3);
    assert_eq!(bob_final.mess_count, 0);
    assert_eq!(bob_final.total_points, 15);
    assert_eq!(stats[0].player_id, alice);
    assert_eq!(stats[0].total_points, 5 + 25);
}

#[test]
fn test_mess_it_up_checks_whole_board() {
    let (mut game, ids) = started_game(&["Alice", "Bob"], 100);
    let (alice, bob) = (ids[0], ids[1]);

    let at = rig_rack(&mut game, alice, "AT");
    lay_tiles(&mut game, alice, &at, 0, 0, Direction::Horizontal);

    // Bob's junk word far away still blocks Alice.
    let junk = rig_rack(&mut game, bob, "QXZ");
    lay_tiles(&mut game, bob, &junk, 10, 10, Direction::Horizontal);

    let to_check = game.mess_precheck(alice).unwrap();
    assert!(to_check.contains("AT"));
    assert!(to_check.contains("QXZ"));

    let before = game.snapshot();
    let err = game.mess_it_up(alice, &verdicts(&to_check, &["AT"])).unwrap_err();
    assert_eq!(
        err,
        GameError::Conflict(ConflictReason::InvalidWords {
            words: vec!["QXZ".to_string()]
        })
    );
    assert_eq!(game.snapshot(), before);
}

#[test]
fn test_mess_it_up_requires_connected_tiles() {
    let (mut game, ids) = started_game(&["Alice"], 100);
    let alice = ids[0];
    let tiles = rig_rack(&mut game, alice, "ATIN");

    lay_tiles(&mut game, alice, &tiles[..2], 0, 0, Direction::Horizontal);
    lay_tiles(&mut game, alice, &tiles[2..], 0, 3, Direction::Horizontal);

    assert_eq!(
        game.mess_precheck(alice).unwrap_err(),
        GameError::Conflict(ConflictReason::TilesNotConnected)
    );

    game.move_tile(alice, tiles[3], Destination::Board { row: 0, col: 2 })
        .unwrap();
    assert!(game.mess_precheck(alice).is_ok());
}

#[test]
fn test_word_diff_is_idempotent() {
    let (mut game, ids) = started_game(&["Alice"], 100);
    let alice = ids[0];
    let cat = rig_rack(&mut game, alice, "CAT");
    lay_tiles(&mut game, alice, &cat, 0, 0, Direction::Horizontal);
    assert_eq!(game.completed_words.len(), 1);

    assert!(game.record_new_words(alice, "again").is_empty());
    assert!(game.record_new_words(alice, "again").is_empty());
    assert_eq!(game.completed_words.len(), 1);
    assert_eq!(
        ScoringEngine::player_score(game.player(alice).unwrap(), &game.completed_words).word_count,
        1
    );
}

#[test]
fn test_crossing_words_from_moves() {
    let (mut game, ids) = started_game(&["Alice"], 100);
    let alice = ids[0];
    game.stuck(alice).unwrap();
    let tiles = rig_rack(&mut game, alice, "CATBD");

    lay_tiles(&mut game, alice, &tiles[..3], 1, 0, Direction::Horizontal);
    game.move_tile(alice, tiles[3], Destination::Board { row: 0, col: 1 })
        .unwrap();
    game.move_tile(alice, tiles[4], Destination::Board { row: 2, col: 1 })
        .unwrap();

    let words = detect_words(&game.tiles);
    assert_eq!(words.len(), 2);
    let shared = tiles[1];
    assert!(words.iter().all(|w| w.tiles.contains(&shared)));
    let texts: HashSet<_> = words.iter().map(|w| w.word.as_str()).collect();
    assert_eq!(texts, HashSet::from(["CAT", "BAD"]));
}

#[test]
fn test_displacement_keeps_one_tile_per_cell() {
    let (mut game, ids) = started_game(&["Alice", "Bob"], 100);
    let (alice, bob) = (ids[0], ids[1]);
    let a = game.rack_tiles(alice)[0].id;
    let b = game.rack_tiles(bob)[0].id;

    game.move_tile(bob, b, Destination::Board { row: 4, col: 4 }).unwrap();
    let outcome = game
        .move_tile(alice, a, Destination::Board { row: 4, col: 4 })
        .unwrap();

    assert_eq!(outcome.displaced_tile_id, Some(b));
    assert_eq!(board_cell(&game, a), Some((4, 4)));
    let moved_to = board_cell(&game, b).unwrap();
    assert!((moved_to.0 - 4).abs() <= 1 && (moved_to.1 - 4).abs() <= 1);

    let cells: Vec<_> = game.board_tiles().filter_map(|t| t.board_position()).collect();
    let unique: HashSet<_> = cells.iter().collect();
    assert_eq!(cells.len(), unique.len());
}

#[test]
fn test_rack_shift_insert_through_moves() {
    let (mut game, ids) = started_game(&["Alice"], 100);
    let alice = ids[0];
    let rack = rig_rack(&mut game, alice, "ABCD");

    // Clear slots 0 and 1 so only 2 and 3 are filled.
    game.move_tile(alice, rack[0], Destination::Board { row: 0, col: 0 }).unwrap();
    game.move_tile(alice, rack[1], Destination::Board { row: 5, col: 5 }).unwrap();

    game.move_tile(alice, rack[0], Destination::Rack { slot: 2 }).unwrap();

    let slot_of = |id| game.tile(id).unwrap().location;
    assert_eq!(slot_of(rack[0]), TileLocation::Rack { slot: 2 });
    assert_eq!(slot_of(rack[2]), TileLocation::Rack { slot: 3 });
    assert_eq!(slot_of(rack[3]), TileLocation::Rack { slot: 4 });
    assert_eq!(game.rack_tiles(alice).len(), 3);
}

#[test]
fn test_events_reach_the_bus() {
    let (mut game, ids) = started_game(&["Alice", "Bob"], 100);
    let alice = ids[0];
    let (mut bus, collector) = collecting_bus();
    bus.publish_all(game.take_events());

    assert!(collector.has_event_type(|e| matches!(e, game_core::GameEvent::GameCreated { .. })));
    assert!(collector.has_event_type(|e| matches!(e, game_core::GameEvent::PlayerJoined { .. })));
    assert!(collector.has_event_type(|e| matches!(e, game_core::GameEvent::GameStarted { .. })));
    let seen = collector.event_count();

    game.stuck(alice).unwrap();
    bus.publish_all(game.take_events());
    assert_eq!(collector.event_count(), seen + 1);
    assert!(game.take_events().is_empty());
    assert!(collector
        .get_events()
        .iter()
        .all(|e| e.game_id() == game.id()));
}
