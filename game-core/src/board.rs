use game_types::{BoardPosition, Tile, TileId};
use std::collections::HashMap;

/// Coordinates further than this from the origin are rejected as malformed.
pub const MAX_BOARD_COORDINATE: i32 = 1_000_000;

/// Tie-break order when two empty cells are equally close:
/// right, down, left, up, then the diagonals.
const SCAN_ORDER: [(i32, i32); 8] = [
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, -1),
    (-1, 1),
];

/// Sparse view of the board: only occupied cells are stored.
#[derive(Debug, Default, Clone)]
pub struct Board {
    cells: HashMap<BoardPosition, TileId>,
}

impl Board {
    pub fn from_tiles<'a>(tiles: impl IntoIterator<Item = &'a Tile>) -> Self {
        let cells = tiles
            .into_iter()
            .filter_map(|tile| tile.board_position().map(|pos| (pos, tile.id)))
            .collect();
        Self { cells }
    }

    pub fn tile_at(&self, position: BoardPosition) -> Option<TileId> {
        self.cells.get(&position).copied()
    }

    pub fn is_occupied(&self, position: BoardPosition) -> bool {
        self.cells.contains_key(&position)
    }

    /// Closest unoccupied cell to `origin` by Euclidean distance, searching
    /// outward ring by ring through the 8-connected neighbourhood.
    ///
    /// Rings are searched until no farther ring could contain a closer cell,
    /// since a diagonal in ring `r` can be farther away than an axis cell in
    /// ring `r + 1`.
    pub fn nearest_empty(&self, origin: BoardPosition) -> BoardPosition {
        let mut best: Option<(i64, usize, BoardPosition)> = None;
        let mut radius: i32 = 1;

        loop {
            if let Some((best_dist, _, pos)) = best {
                if (radius as i64) * (radius as i64) > best_dist {
                    return pos;
                }
            }

            for (d_row, d_col) in ring_offsets(radius) {
                let candidate = origin.offset(d_row, d_col);
                if self.is_occupied(candidate) || !in_bounds(candidate) {
                    continue;
                }
                let dist = (d_row as i64).pow(2) + (d_col as i64).pow(2);
                let order = scan_rank(d_row, d_col);
                let better = match best {
                    None => true,
                    Some((best_dist, best_order, _)) => (dist, order) < (best_dist, best_order),
                };
                if better {
                    best = Some((dist, order, candidate));
                }
            }

            radius += 1;
        }
    }
}

pub fn in_bounds(position: BoardPosition) -> bool {
    position.row.abs() <= MAX_BOARD_COORDINATE && position.col.abs() <= MAX_BOARD_COORDINATE
}

/// Every offset at Chebyshev distance exactly `radius`.
fn ring_offsets(radius: i32) -> impl Iterator<Item = (i32, i32)> {
    (-radius..=radius).flat_map(move |d_row| {
        (-radius..=radius)
            .filter(move |d_col| d_row.abs() == radius || d_col.abs() == radius)
            .map(move |d_col| (d_row, d_col))
    })
}

/// Rank of an offset's direction in [`SCAN_ORDER`].
fn scan_rank(d_row: i32, d_col: i32) -> usize {
    let direction = (d_row.signum(), d_col.signum());
    SCAN_ORDER
        .iter()
        .position(|&d| d == direction)
        .unwrap_or(SCAN_ORDER.len())
}
