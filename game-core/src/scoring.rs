use crate::letter_bag::is_vowel;
use game_types::{CompletedWord, FinalPlayerStats, Player, PlayerScore, Tile};
use std::collections::BTreeSet;

pub const POINTS_PER_WORD: i32 = 5;
pub const MESS_BONUS_POINTS: i32 = 25;
pub const STUCK_PENALTY_POINTS: i32 = 5;

pub struct ScoringEngine;

impl ScoringEngine {
    /// Distinct word texts this player has completed, regardless of how often or where.
    pub fn unique_words<'a>(player: &Player, history: &'a [CompletedWord]) -> BTreeSet<&'a str> {
        history
            .iter()
            .filter(|w| w.player_id == player.id)
            .map(|w| w.word.as_str())
            .collect()
    }

    /// 5 per unique completed word, 25 per MESS IT UP, minus 5 per stuck draw.
    pub fn total_points(player: &Player, history: &[CompletedWord]) -> i32 {
        POINTS_PER_WORD * Self::unique_words(player, history).len() as i32
            + Self::mess_bonus(player)
            - Self::stuck_penalty(player)
    }

    pub fn mess_bonus(player: &Player) -> i32 {
        MESS_BONUS_POINTS * player.mess_bonus_count as i32
    }

    pub fn stuck_penalty(player: &Player) -> i32 {
        STUCK_PENALTY_POINTS * player.stuck_penalty_count as i32
    }

    pub fn player_score(player: &Player, history: &[CompletedWord]) -> PlayerScore {
        let words = Self::unique_words(player, history);
        PlayerScore {
            player_id: player.id,
            word_count: words.len() as u32,
            total_letters: words.iter().map(|w| w.chars().count() as u32).sum(),
            total_points: Self::total_points(player, history),
            stuck_penalty: Self::stuck_penalty(player),
            mess_bonus: Self::mess_bonus(player),
        }
    }

    pub fn scores(players: &[Player], history: &[CompletedWord]) -> Vec<PlayerScore> {
        players
            .iter()
            .map(|p| Self::player_score(p, history))
            .collect()
    }

    /// Letter counts span every tile the player holds, placed, or last moved,
    /// so tiles they only passed through are counted too.
    pub fn final_stats(player: &Player, history: &[CompletedWord], tiles: &[Tile]) -> FinalPlayerStats {
        let words = Self::unique_words(player, history);
        let longest_word = words
            .iter()
            .copied()
            .fold("", |longest, w| if w.len() > longest.len() { w } else { longest })
            .to_string();

        let touched = tiles.iter().filter(|t| {
            t.owner_player_id == Some(player.id) || t.last_moved_by_player_id == Some(player.id)
        });
        let (mut total_vowels, mut total_consonants) = (0, 0);
        for tile in touched {
            if is_vowel(tile.letter) {
                total_vowels += 1;
            } else {
                total_consonants += 1;
            }
        }

        FinalPlayerStats {
            player_id: player.id,
            player_name: player.display_name.clone(),
            avatar_seed: player.avatar_seed.clone(),
            color: player.color.clone(),
            character: player.character,
            total_points: Self::total_points(player, history),
            word_count: words.len() as u32,
            total_letters: words.iter().map(|w| w.chars().count() as u32).sum(),
            mess_count: player.mess_bonus_count,
            stuck_count: player.stuck_penalty_count,
            longest_word,
            total_vowels,
            total_consonants,
        }
    }

    pub fn all_final_stats(players: &[Player], history: &[CompletedWord], tiles: &[Tile]) -> Vec<FinalPlayerStats> {
        players
            .iter()
            .map(|p| Self::final_stats(p, history, tiles))
            .collect()
    }

    /// Explicit finish ranking: most unique words, then most letters. Stable on join order.
    pub fn rank_by_words(stats: &mut [FinalPlayerStats]) {
        stats.sort_by(|a, b| {
            b.word_count
                .cmp(&a.word_count)
                .then(b.total_letters.cmp(&a.total_letters))
        });
    }

    /// Auto-finish ranking after the bag runs dry: highest total points. Stable on join order.
    pub fn rank_by_points(stats: &mut [FinalPlayerStats]) {
        stats.sort_by(|a, b| b.total_points.cmp(&a.total_points));
    }
}
