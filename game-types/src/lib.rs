pub mod chat;
pub mod errors;
pub mod game;
pub mod player;
pub mod requests;
pub mod tile;
pub mod word;

pub type GameId = uuid::Uuid;
pub type PlayerId = uuid::Uuid;
pub type TileId = uuid::Uuid;

// Re-export all types
pub use chat::*;
pub use errors::*;
pub use game::*;
pub use player::*;
pub use requests::*;
pub use tile::*;
pub use word::*;
