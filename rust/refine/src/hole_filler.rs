// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Closing of enclosed unoccupied regions within one layer.

use roomvox_grid::{LayerShape, RoomId, Voxel, VoxelFlags};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// Convert enclosed unoccupied regions into room interior.
///
/// Every unoccupied voxel not marked outside belongs to exactly one enclosed
/// region (4-connected, bounded by occupied and outside-marked voxels). A
/// region bordered by exactly one room becomes that room's EMPTY_INTERIOR; a
/// region bordered by several rooms is ambiguous — likely a real void
/// between rooms — and is marked outside instead. A region bordering no room
/// is left untouched. Returns `(filled, ambiguous)` voxel counts.
pub(crate) fn close_interior_holes(
    cells: &mut [Voxel],
    shape: LayerShape,
    outside: &mut [bool],
) -> (usize, usize) {
    let mut visited = vec![false; cells.len()];
    let mut filled = 0;
    let mut ambiguous = 0;

    for start in 0..cells.len() {
        if cells[start].is_occupied() || outside[start] || visited[start] {
            continue;
        }

        let mut region = Vec::new();
        let mut border_rooms: FxHashSet<RoomId> = FxHashSet::default();
        let mut queue = VecDeque::new();
        visited[start] = true;
        queue.push_back(start);

        while let Some(idx) = queue.pop_front() {
            region.push(idx);
            let (row, col) = shape.coords(idx);
            for (nr, nc) in shape.neighbors4(row, col) {
                let nidx = shape.idx(nr, nc);
                let neighbor = &cells[nidx];
                if neighbor.is_occupied() {
                    border_rooms.extend(neighbor.rooms());
                } else if !outside[nidx] && !visited[nidx] {
                    visited[nidx] = true;
                    queue.push_back(nidx);
                }
            }
        }

        match border_rooms.len() {
            0 => {}
            1 => {
                let room = *border_rooms.iter().next().unwrap();
                for &idx in &region {
                    cells[idx] = Voxel::of(room, VoxelFlags::EMPTY_INTERIOR);
                }
                filled += region.len();
            }
            _ => {
                for &idx in &region {
                    outside[idx] = true;
                }
                ambiguous += region.len();
            }
        }
    }

    (filled, ambiguous)
}
