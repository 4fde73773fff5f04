use std::collections::{HashSet, VecDeque};

use crate::model::{Pixel, PixelGrid};

/// Breadth-first flood fill over 4-connected neighbors.
///
/// Returns the filled copy of the grid, or None when nothing would change:
/// seed out of bounds, or the seed region already has the replacement color.
/// Callers use the None to skip a pointless history entry.
///
/// The visited set is required even though converted cells no longer match
/// the target color; it is what guarantees termination and O(area) cost for
/// every target/replacement combination.
pub fn flood_fill(grid: &PixelGrid, x: i32, y: i32, replacement: &Pixel) -> Option<PixelGrid> {
    let target = grid.get(x, y)?.clone();
    if target == *replacement {
        return None;
    }

    let mut filled = grid.clone();
    let mut visited: HashSet<(i32, i32)> = HashSet::new();
    let mut queue: VecDeque<(i32, i32)> = VecDeque::new();

    visited.insert((x, y));
    queue.push_back((x, y));

    while let Some((cx, cy)) = queue.pop_front() {
        filled.set(cx, cy, replacement.clone());

        for (nx, ny) in [(cx + 1, cy), (cx - 1, cy), (cx, cy + 1), (cx, cy - 1)] {
            if visited.contains(&(nx, ny)) {
                continue;
            }
            if grid.get(nx, ny) == Some(&target) {
                visited.insert((nx, ny));
                queue.push_back((nx, ny));
            }
        }
    }

    Some(filled)
}
