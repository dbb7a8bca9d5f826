use game_types::{BoardPosition, CompletedWord, DetectedWord, Direction, Tile};
use std::collections::HashMap;

/// Scan every board tile for maximal horizontal and vertical runs of two or more letters.
///
/// Horizontal words come first, ordered by (row, col) of their first tile, followed by
/// vertical words ordered by (col, row). Rack and bag tiles are ignored.
pub fn detect_words(tiles: &[Tile]) -> Vec<DetectedWord> {
    let cells: HashMap<BoardPosition, &Tile> = tiles
        .iter()
        .filter_map(|tile| tile.board_position().map(|pos| (pos, tile)))
        .collect();

    let mut words = scan_runs(&cells, Direction::Horizontal);
    words.extend(scan_runs(&cells, Direction::Vertical));
    words
}

fn scan_runs(cells: &HashMap<BoardPosition, &Tile>, direction: Direction) -> Vec<DetectedWord> {
    let (d_row, d_col) = match direction {
        Direction::Horizontal => (0, 1),
        Direction::Vertical => (1, 0),
    };

    let mut starts: Vec<BoardPosition> = cells
        .keys()
        .copied()
        .filter(|pos| !cells.contains_key(&pos.offset(-d_row, -d_col)))
        .collect();
    match direction {
        Direction::Horizontal => starts.sort_by_key(|pos| (pos.row, pos.col)),
        Direction::Vertical => starts.sort_by_key(|pos| (pos.col, pos.row)),
    }

    let mut words = Vec::new();
    for start in starts {
        let mut run = Vec::new();
        let mut cursor = start;
        while let Some(tile) = cells.get(&cursor) {
            run.push(*tile);
            cursor = cursor.offset(d_row, d_col);
        }

        if run.len() < 2 {
            continue;
        }

        words.push(DetectedWord {
            word: run.iter().map(|t| t.letter.to_ascii_uppercase()).collect(),
            tiles: run.iter().map(|t| t.id).collect(),
            direction,
            start_row: start.row,
            start_col: start.col,
            length: run.len(),
        });
    }
    words
}

/// Detected words with no matching entry in the completed-word history.
pub fn find_new_words<'a>(
    detected: &'a [DetectedWord],
    history: &[CompletedWord],
) -> Vec<&'a DetectedWord> {
    detected
        .iter()
        .filter(|word| !history.iter().any(|done| done.matches(word)))
        .collect()
}
