use game_types::BoardPosition;
use std::collections::{HashSet, VecDeque};

/// Whether `positions` form a single orthogonally connected group.
///
/// An empty set is never connected. Diagonal contact does not count.
pub fn is_connected(positions: &HashSet<BoardPosition>) -> bool {
    let Some(&start) = positions.iter().next() else {
        return false;
    };

    let mut visited = HashSet::with_capacity(positions.len());
    let mut queue = VecDeque::from([start]);
    visited.insert(start);

    while let Some(current) = queue.pop_front() {
        for neighbor in current.neighbors() {
            if positions.contains(&neighbor) && visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    visited.len() == positions.len()
}
