use game_types::{PlayerId, RACK_SLOTS, Tile, TileId, TileLocation};
use std::collections::BTreeMap;

/// Slot assignments produced by a rack insert, including the inserted tile.
pub type SlotChanges = Vec<(TileId, u32)>;

/// Occupied rack slots for one player, optionally ignoring one tile (the one being moved).
pub fn rack_slots(tiles: &[Tile], player_id: PlayerId, except: Option<TileId>) -> BTreeMap<u32, TileId> {
    tiles
        .iter()
        .filter(|t| t.is_in_rack_of(player_id) && Some(t.id) != except)
        .filter_map(|t| t.location.rack_slot().map(|slot| (slot, t.id)))
        .collect()
}

/// First unoccupied slot scanning from 0. Past the visible slots when the rack is full.
pub fn first_free_slot(occupied: &BTreeMap<u32, TileId>) -> u32 {
    (0..).find(|slot| !occupied.contains_key(slot)).unwrap_or(0)
}

/// Insert `tile_id` at `target` like stepping into a line of people.
///
/// When `target` is occupied, the contiguous run of occupied slots starting there
/// moves one slot to the right. A tile pushed past the last visible slot wraps to
/// the first empty slot scanning from 0.
pub fn insert_at(occupied: &BTreeMap<u32, TileId>, tile_id: TileId, target: i32) -> SlotChanges {
    let target = target.clamp(0, RACK_SLOTS as i32 - 1) as u32;
    let mut slots = occupied.clone();
    let mut changes = Vec::new();

    if slots.contains_key(&target) {
        let run: Vec<TileId> = (target..RACK_SLOTS)
            .map_while(|slot| slots.get(&slot).copied())
            .collect();
        for offset in 0..run.len() as u32 {
            slots.remove(&(target + offset));
        }

        let mut overflow = Vec::new();
        for (offset, &shifted) in run.iter().enumerate().rev() {
            let new_slot = target + 1 + offset as u32;
            if new_slot < RACK_SLOTS {
                slots.insert(new_slot, shifted);
                changes.push((shifted, new_slot));
            } else {
                overflow.push(shifted);
            }
        }

        // The target slot is reserved for the inserted tile.
        slots.insert(target, tile_id);
        for shifted in overflow {
            let slot = first_free_slot(&slots);
            slots.insert(slot, shifted);
            changes.push((shifted, slot));
        }
    }

    changes.push((tile_id, target));
    changes
}

pub fn apply_slot_changes(tiles: &mut [Tile], changes: &SlotChanges, timestamp: &str) {
    for &(tile_id, slot) in changes {
        if let Some(tile) = tiles.iter_mut().find(|t| t.id == tile_id) {
            tile.location = TileLocation::Rack { slot };
            tile.updated_at = timestamp.to_string();
        }
    }
}
