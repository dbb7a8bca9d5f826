use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::kv_store::KvStore;
use game_types::{GameId, GameInfo, GameSnapshot};

/// Maps a game snapshot onto its key families:
/// `game:{id}`, `game:{id}:players`, `game:{id}:tiles`, `game:{id}:chat`,
/// `game:{id}:completed_words`, `game:{id}:final_stats` and `joincode:{CODE}`.
#[derive(Clone)]
pub struct GameRepository {
    store: Arc<dyn KvStore>,
}

fn game_key(id: GameId) -> String {
    format!("game:{}", id)
}

fn family_key(id: GameId, family: &str) -> String {
    format!("game:{}:{}", id, family)
}

fn join_code_key(code: &str) -> String {
    format!("joincode:{}", code.trim().to_uppercase())
}

fn word_cache_key(word: &str) -> String {
    format!("valid_word:{}", word.trim().to_uppercase())
}

impl GameRepository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub async fn save_game(&self, snapshot: &GameSnapshot) -> Result<()> {
        let id = snapshot.game.id;
        let mut entries = vec![
            (game_key(id), serde_json::to_string(&snapshot.game)?),
            (family_key(id, "players"), serde_json::to_string(&snapshot.players)?),
            (family_key(id, "tiles"), serde_json::to_string(&snapshot.tiles)?),
            (family_key(id, "chat"), serde_json::to_string(&snapshot.chat)?),
            (
                family_key(id, "completed_words"),
                serde_json::to_string(&snapshot.completed_words)?,
            ),
            (join_code_key(&snapshot.game.join_code), id.to_string()),
        ];
        if let Some(stats) = &snapshot.final_stats {
            entries.push((family_key(id, "final_stats"), serde_json::to_string(stats)?));
        }

        self.store
            .set_many(entries)
            .await
            .with_context(|| format!("Failed to save game {}", id))?;
        debug!("Saved game {}", id);
        Ok(())
    }

    pub async fn load_game(&self, id: GameId) -> Result<Option<GameSnapshot>> {
        let Some(raw) = self.store.get(&game_key(id)).await? else {
            return Ok(None);
        };
        let game: GameInfo =
            serde_json::from_str(&raw).with_context(|| format!("Corrupt game record {}", id))?;

        Ok(Some(GameSnapshot {
            game,
            players: self.load_family(id, "players").await?.unwrap_or_default(),
            tiles: self.load_family(id, "tiles").await?.unwrap_or_default(),
            chat: self.load_family(id, "chat").await?.unwrap_or_default(),
            completed_words: self
                .load_family(id, "completed_words")
                .await?
                .unwrap_or_default(),
            final_stats: self.load_family(id, "final_stats").await?,
        }))
    }

    async fn load_family<T: DeserializeOwned>(&self, id: GameId, family: &str) -> Result<Option<T>> {
        let key = family_key(id, family);
        match self.store.get(&key).await? {
            Some(raw) => {
                let value = serde_json::from_str(&raw).with_context(|| format!("Corrupt record {}", key))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    pub async fn find_game_id(&self, join_code: &str) -> Result<Option<GameId>> {
        match self.store.get(&join_code_key(join_code)).await? {
            Some(raw) => Ok(Some(Uuid::parse_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub async fn join_code_taken(&self, join_code: &str) -> Result<bool> {
        self.store.exists(&join_code_key(join_code)).await
    }

    pub async fn cached_word_validity(&self, word: &str) -> Result<Option<bool>> {
        match self.store.get(&word_cache_key(word)).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub async fn cache_word_validity(&self, word: &str, valid: bool) -> Result<()> {
        self.store
            .set(&word_cache_key(word), serde_json::to_string(&valid)?)
            .await
    }
}
