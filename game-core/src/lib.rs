pub mod board;
pub mod connectivity;
pub mod game_events;
pub mod game_state;
pub mod letter_bag;
pub mod rack;
pub mod scoring;
pub mod word_detection;
pub mod word_validation;

// Re-export main components
pub use board::*;
pub use connectivity::*;
pub use game_events::*;
pub use game_state::*;
pub use letter_bag::*;
pub use scoring::*;
pub use word_detection::*;
pub use word_validation::*;
