// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Directional trimming of WALL_OPENING voxels within one layer.
//!
//! The upstream space partitioning punches openings through walls wherever
//! the scan is thin. Two passes clean those up: the outside pass removes
//! opening regions that face unoccupied space but have no contact with their
//! room's interior anywhere, and the inside pass reclassifies openings that
//! do not face unoccupied space at all.

use roomvox_grid::{LayerShape, RoomId, Voxel, VoxelFlags};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// Remove connected WALL_OPENING regions that touch unoccupied space but
/// never touch their own room's interior.
///
/// A genuine door or window connects the room interior to the outside; an
/// opening patch with no 8-connected contact to the room's interior is a
/// mis-detected artifact and loses the room's claim entirely. Returns the
/// number of claims dropped.
pub(crate) fn shrink_openings_outward(cells: &mut [Voxel], shape: LayerShape) -> usize {
    let mut removed = 0;

    for idx in 0..cells.len() {
        if !cells[idx].is_occupied() {
            continue;
        }
        let (row, col) = shape.coords(idx);
        if !has_unoccupied_neighbor(cells, shape, row, col) {
            continue;
        }
        // Collect candidate rooms up front: the removal below mutates the
        // layer, so claims cannot stay borrowed across it.
        let rooms: Vec<RoomId> = cells[idx]
            .claims()
            .filter(|c| c.flags.contains(VoxelFlags::WALL_OPENING))
            .map(|c| c.room)
            .collect();
        for room in rooms {
            removed += remove_detached_region(cells, shape, row, col, room);
        }
    }

    removed
}

/// Grow the detached opening region seeded at `(row, col)` for `room` and
/// drop the room's claim from every voxel in it.
///
/// The region is 4-connected over WALL_OPENING voxels of the room; growth
/// stops at any voxel 8-adjacent to the room's interior. A seed adjacent to
/// the interior yields an empty region.
fn remove_detached_region(
    cells: &mut [Voxel],
    shape: LayerShape,
    row: usize,
    col: usize,
    room: RoomId,
) -> usize {
    if touches_room_interior8(cells, shape, row, col, room) {
        return 0;
    }

    let mut region: FxHashSet<(usize, usize)> = FxHashSet::default();
    let mut queue = VecDeque::new();
    region.insert((row, col));
    queue.push_back((row, col));

    while let Some((r, c)) = queue.pop_front() {
        for (nr, nc) in shape.neighbors4(r, c) {
            if region.contains(&(nr, nc)) {
                continue;
            }
            let has_opening = cells[shape.idx(nr, nc)]
                .flags_of(room)
                .is_some_and(|f| f.contains(VoxelFlags::WALL_OPENING));
            if !has_opening || touches_room_interior8(cells, shape, nr, nc, room) {
                continue;
            }
            region.insert((nr, nc));
            queue.push_back((nr, nc));
        }
    }

    for &(r, c) in &region {
        cells[shape.idx(r, c)].remove_room(room);
    }
    region.len()
}

/// Reclassify WALL_OPENING claims on voxels with no unoccupied neighbor.
///
/// An opening that does not face the outside cannot be a real exterior
/// opening: next to the room's interior it becomes interior space, anywhere
/// else it becomes wall. Returns the number of claims reclassified.
pub(crate) fn shrink_openings_inward(cells: &mut [Voxel], shape: LayerShape) -> usize {
    let mut reclassified = 0;

    for idx in 0..cells.len() {
        if !cells[idx].is_occupied() {
            continue;
        }
        let (row, col) = shape.coords(idx);
        if has_unoccupied_neighbor(cells, shape, row, col) {
            continue;
        }
        let rooms: Vec<RoomId> = cells[idx]
            .claims()
            .filter(|c| c.flags.contains(VoxelFlags::WALL_OPENING))
            .map(|c| c.room)
            .collect();
        for room in rooms {
            let flags = if touches_room_interior4(cells, shape, row, col, room) {
                VoxelFlags::EMPTY_INTERIOR
            } else {
                VoxelFlags::WALL
            };
            cells[idx].set_flags(room, flags);
            reclassified += 1;
        }
    }

    reclassified
}

fn has_unoccupied_neighbor(
    cells: &[Voxel],
    shape: LayerShape,
    row: usize,
    col: usize,
) -> bool {
    shape
        .neighbors4(row, col)
        .any(|(r, c)| !cells[shape.idx(r, c)].is_occupied())
}

fn touches_room_interior8(
    cells: &[Voxel],
    shape: LayerShape,
    row: usize,
    col: usize,
    room: RoomId,
) -> bool {
    shape.neighbors8(row, col).any(|(r, c)| {
        cells[shape.idx(r, c)]
            .flags_of(room)
            .is_some_and(|f| f.is_interior())
    })
}

fn touches_room_interior4(
    cells: &[Voxel],
    shape: LayerShape,
    row: usize,
    col: usize,
    room: RoomId,
) -> bool {
    shape.neighbors4(row, col).any(|(r, c)| {
        cells[shape.idx(r, c)]
            .flags_of(room)
            .is_some_and(|f| f.is_interior())
    })
}
