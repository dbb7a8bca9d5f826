use async_trait::async_trait;
use rand::seq::IndexedRandom;

/// Moments worth a line of commentary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentaryKind {
    Word,
    Split,
    Winner,
}

#[derive(Debug, Clone, Default)]
pub struct CommentaryContext {
    pub player_name: String,
    pub word: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CommentaryError {
    #[error("No commentary for {0:?}")]
    NothingToSay(CommentaryKind),
    #[error("Commentary generator failed: {0}")]
    Generator(String),
}

/// Flavor text generator. Failures never affect game state.
#[async_trait]
pub trait Commentator: Send + Sync {
    async fn comment(
        &self,
        kind: CommentaryKind,
        context: &CommentaryContext,
    ) -> Result<String, CommentaryError>;
}

const WORD_LINES: &[&str] = &[
    "{player} just spelled \"{word}\" like a boss!",
    "Whoa! {player} with the big word \"{word}\"!",
    "{word}? {player} is showing off now!",
    "Nice one {player}, \"{word}\" is a keeper!",
    "{player} brought the heat with \"{word}\"!",
    "Look at {player} go with \"{word}\"!",
];

const SPLIT_LINES: &[&str] = &[
    "{player} hit MESS IT UP! Fresh tiles for everyone!",
    "Boom! {player} just split the bag!",
    "{player} called it! Time for new letters!",
    "And {player} messes it all up! Love it!",
    "{player} keeps things interesting!",
    "Fresh tiles incoming thanks to {player}!",
];

const WINNER_LINES: &[&str] = &[
    "{player} takes the crown! What a game!",
    "Victory goes to {player}! Well played!",
    "{player} dominated that board!",
    "And the winner is... {player}! Congrats!",
    "{player} proved they have the best vocabulary!",
    "Game over! {player} wins this round!",
];

/// Picks a random canned line for each moment.
pub struct CannedCommentator;

#[async_trait]
impl Commentator for CannedCommentator {
    async fn comment(
        &self,
        kind: CommentaryKind,
        context: &CommentaryContext,
    ) -> Result<String, CommentaryError> {
        let lines = match kind {
            CommentaryKind::Word if context.word.is_some() => WORD_LINES,
            CommentaryKind::Word => return Err(CommentaryError::NothingToSay(kind)),
            CommentaryKind::Split => SPLIT_LINES,
            CommentaryKind::Winner => WINNER_LINES,
        };

        let line = lines
            .choose(&mut rand::rng())
            .ok_or(CommentaryError::NothingToSay(kind))?;

        Ok(line
            .replace("{player}", &context.player_name)
            .replace("{word}", context.word.as_deref().unwrap_or_default()))
    }
}
