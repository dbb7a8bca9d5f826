use anyhow::Result;
use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait, PaginatorTrait, TransactionTrait};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::entities::{kv_entries, prelude::*};

/// Minimal string key-value storage. Values are JSON documents.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: String) -> Result<()>;

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Write several entries. Implementations that can should apply them atomically.
    async fn set_many(&self, entries: Vec<(String, String)>) -> Result<()> {
        for (key, value) in entries {
            self.set(&key, value).await?;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryKvStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.entries.read().await.contains_key(key))
    }

    async fn set_many(&self, entries: Vec<(String, String)>) -> Result<()> {
        let mut map = self.entries.write().await;
        map.extend(entries);
        Ok(())
    }
}

/// `kv_entries` table behind sea-orm.
pub struct SeaOrmKvStore {
    db: DatabaseConnection,
}

impl SeaOrmKvStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(KvEntries::find().count(&self.db).await?)
    }

    fn upsert(key: String, value: String) -> sea_orm::Insert<kv_entries::ActiveModel> {
        let model = kv_entries::ActiveModel {
            key: ActiveValue::Set(key),
            value: ActiveValue::Set(value),
            updated_at: ActiveValue::Set(chrono::Utc::now().into()),
        };

        KvEntries::insert(model).on_conflict(
            OnConflict::column(kv_entries::Column::Key)
                .update_columns([kv_entries::Column::Value, kv_entries::Column::UpdatedAt])
                .to_owned(),
        )
    }
}

#[async_trait]
impl KvStore for SeaOrmKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entry = KvEntries::find_by_id(key.to_string()).one(&self.db).await?;
        Ok(entry.map(|model| model.value))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        Self::upsert(key.to_string(), value)
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    async fn set_many(&self, entries: Vec<(String, String)>) -> Result<()> {
        let txn = self.db.begin().await?;
        for (key, value) in entries {
            Self::upsert(key, value).exec_without_returning(&txn).await?;
        }
        txn.commit().await?;
        Ok(())
    }
}
