pub mod connection;
pub mod entities;
pub mod kv_store;
pub mod repositories;

pub use kv_store::{KvStore, MemoryKvStore, SeaOrmKvStore};
pub use repositories::GameRepository;
