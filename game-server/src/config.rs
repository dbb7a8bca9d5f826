use std::env;

use game_core::GameLimits;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_players_per_game: u32,
    pub default_piece_count: u32,
    pub min_piece_count: u32,
    pub max_piece_count: u32,
    pub dictionary_api_url: String,
    pub dictionary_timeout_seconds: u64,
    pub database_url: String,
    pub ai_commentary_enabled: bool,
}

impl Config {
    pub fn new() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("Invalid PORT"),
            max_players_per_game: env::var("MAX_PLAYERS_PER_GAME")
                .unwrap_or_else(|_| "8".to_string())
                .parse()
                .expect("Invalid MAX_PLAYERS_PER_GAME"),
            default_piece_count: env::var("DEFAULT_PIECE_COUNT")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .expect("Invalid DEFAULT_PIECE_COUNT"),
            min_piece_count: env::var("MIN_PIECE_COUNT")
                .unwrap_or_else(|_| "12".to_string())
                .parse()
                .expect("Invalid MIN_PIECE_COUNT"),
            max_piece_count: env::var("MAX_PIECE_COUNT")
                .unwrap_or_else(|_| "500".to_string())
                .parse()
                .expect("Invalid MAX_PIECE_COUNT"),
            dictionary_api_url: env::var("DICTIONARY_API_URL").unwrap_or_else(|_| {
                "https://api.dictionaryapi.dev/api/v2/entries/en".to_string()
            }),
            dictionary_timeout_seconds: env::var("DICTIONARY_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .expect("Invalid DICTIONARY_TIMEOUT_SECONDS"),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://mess.db?mode=rwc".to_string()),
            ai_commentary_enabled: env::var("AI_COMMENTARY_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .expect("Invalid AI_COMMENTARY_ENABLED"),
        }
    }

    pub fn limits(&self) -> GameLimits {
        GameLimits {
            max_players: self.max_players_per_game,
            min_piece_count: self.min_piece_count,
            max_piece_count: self.max_piece_count,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
