use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{GameId, PlayerId, TileId};

/// Number of visible rack slots. Dealing can spill past this when a rack is full.
pub const RACK_SLOTS: u32 = 7;

/// A cell on the sparse, logically unbounded board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BoardPosition {
    pub row: i32,
    pub col: i32,
}

impl BoardPosition {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    /// Orthogonal neighbours only; diagonals never count as adjacent.
    pub fn neighbors(self) -> [BoardPosition; 4] {
        [
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(0, -1),
            self.offset(0, 1),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "location_type", rename_all = "snake_case")]
pub enum TileLocation {
    Bag,
    Rack { slot: u32 },
    Board { row: i32, col: i32 },
}

impl TileLocation {
    pub fn board_position(&self) -> Option<BoardPosition> {
        match *self {
            TileLocation::Board { row, col } => Some(BoardPosition::new(row, col)),
            _ => None,
        }
    }

    pub fn rack_slot(&self) -> Option<u32> {
        match *self {
            TileLocation::Rack { slot } => Some(slot),
            _ => None,
        }
    }

    pub fn is_board(&self) -> bool {
        matches!(self, TileLocation::Board { .. })
    }

    pub fn is_rack(&self) -> bool {
        matches!(self, TileLocation::Rack { .. })
    }
}

impl From<BoardPosition> for TileLocation {
    fn from(position: BoardPosition) -> Self {
        TileLocation::Board {
            row: position.row,
            col: position.col,
        }
    }
}

/// A physical letter tile. Tiles are never destroyed; they only change location and owner.
///
/// `owner_player_id` is the player currently responsible for the tile: the rack holder,
/// or for board tiles the player whose move put it where it is now. It says nothing
/// about who originally drew the tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Tile {
    pub id: TileId,
    pub game_id: GameId,
    pub letter: char,
    pub value: u32,
    pub location: TileLocation,
    pub owner_player_id: Option<PlayerId>,
    pub last_moved_by_player_id: Option<PlayerId>,
    pub created_at: String, // ISO 8601 string
    pub updated_at: String,
}

impl Tile {
    pub fn board_position(&self) -> Option<BoardPosition> {
        self.location.board_position()
    }

    pub fn is_in_rack_of(&self, player_id: PlayerId) -> bool {
        self.location.is_rack() && self.owner_player_id == Some(player_id)
    }

    pub fn is_on_board_for(&self, player_id: PlayerId) -> bool {
        self.location.is_board() && self.owner_player_id == Some(player_id)
    }
}

/// Where a client wants a tile to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "location_type", rename_all = "snake_case")]
pub enum Destination {
    Board { row: i32, col: i32 },
    /// Out-of-range slots are clamped into the visible rack.
    Rack { slot: i32 },
}
