// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reconstruction of missing wall segments along a room's outward-facing
//! boundary.
//!
//! Where a room's interior is directly exposed to the outside the upstream
//! partitioning lost a wall. The exposed skin is regrown as WALL when it is
//! too narrow to be a real opening or mostly backed by scanned geometry,
//! and as WALL_OPENING otherwise.

use crate::config::VoxelThresholds;
use roomvox_grid::{LayerShape, NormalCode, RoomId, Voxel, VoxelFlags};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// Reclassify each room's outside-exposed interior skin to wall or opening.
///
/// Returns `(walled, opened)` voxel counts.
pub(crate) fn restore_missing_walls(
    cells: &mut [Voxel],
    normals: &[NormalCode],
    outside: &[bool],
    shape: LayerShape,
    thresholds: &VoxelThresholds,
) -> (usize, usize) {
    let mut walled = 0;
    let mut opened = 0;

    for idx in 0..cells.len() {
        if !cells[idx].is_occupied() {
            continue;
        }
        let (row, col) = shape.coords(idx);
        if !touches_outside8(outside, shape, row, col) {
            continue;
        }
        let rooms: Vec<RoomId> = cells[idx]
            .claims()
            .filter(|c| c.flags.is_interior())
            .map(|c| c.room)
            .collect();
        for room in rooms {
            let (w, o) =
                reclassify_exposed_region(cells, normals, outside, shape, row, col, room, thresholds);
            walled += w;
            opened += o;
        }
    }

    (walled, opened)
}

/// Grow the room's exposed skin from `(row, col)` and classify it whole.
///
/// The region is 4-connected over voxels holding interior flags for the
/// room, each itself 8-adjacent to the outside. `closed_count` tallies how
/// many are backed by scanned geometry; a region narrower than the minimum
/// opening width or denser than the closed-ratio limit becomes WALL, any
/// other becomes WALL_OPENING. Reclassifying strips the interior flags, so
/// later seeds cannot regrow the region.
#[allow(clippy::too_many_arguments)]
fn reclassify_exposed_region(
    cells: &mut [Voxel],
    normals: &[NormalCode],
    outside: &[bool],
    shape: LayerShape,
    row: usize,
    col: usize,
    room: RoomId,
    thresholds: &VoxelThresholds,
) -> (usize, usize) {
    let mut region: FxHashSet<(usize, usize)> = FxHashSet::default();
    let mut closed_count = 0usize;
    let mut queue = VecDeque::new();
    region.insert((row, col));
    queue.push_back((row, col));

    while let Some((r, c)) = queue.pop_front() {
        if normals[shape.idx(r, c)].has_geometry() {
            closed_count += 1;
        }
        for (nr, nc) in shape.neighbors4(r, c) {
            if region.contains(&(nr, nc)) {
                continue;
            }
            let exposed_interior = cells[shape.idx(nr, nc)]
                .flags_of(room)
                .is_some_and(|f| f.is_interior())
                && touches_outside8(outside, shape, nr, nc);
            if exposed_interior {
                region.insert((nr, nc));
                queue.push_back((nr, nc));
            }
        }
    }

    let closed_ratio = closed_count as f64 / region.len() as f64;
    let restore_wall =
        region.len() < thresholds.min_opening_width || closed_ratio > thresholds.max_closed_ratio;
    let flags = if restore_wall {
        VoxelFlags::WALL
    } else {
        VoxelFlags::WALL_OPENING
    };

    for &(r, c) in &region {
        cells[shape.idx(r, c)].set_flags(room, flags);
    }
    if restore_wall {
        (region.len(), 0)
    } else {
        (0, region.len())
    }
}

fn touches_outside8(outside: &[bool], shape: LayerShape, row: usize, col: usize) -> bool {
    shape
        .neighbors8(row, col)
        .any(|(r, c)| outside[shape.idx(r, c)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outside_fill::fill_outside_space;

    fn room(id: u32) -> RoomId {
        RoomId::new(id).unwrap()
    }

    fn thresholds(min_opening_width: usize, max_closed_ratio: f64) -> VoxelThresholds {
        VoxelThresholds {
            min_opening_width,
            min_wall_height: 4,
            max_wall_thickness: 2,
            max_wall_thickness_diag: 1,
            max_closed_ratio,
        }
    }

    /// 4x8 layer: row 0 unoccupied (outside), rows 1..3 room interior of
    /// width `skin_width` starting at col 0 (row 3 is floor), sealed on the
    /// east by a wall column so only the row-1 strip is exposed.
    fn exposed_room(skin_width: usize) -> (Vec<Voxel>, Vec<NormalCode>, LayerShape) {
        let shape = LayerShape { rows: 4, cols: 8 };
        let mut cells = vec![Voxel::default(); shape.len()];
        for col in 0..skin_width {
            cells[shape.idx(1, col)] = Voxel::of(room(1), VoxelFlags::EMPTY_INTERIOR);
            cells[shape.idx(2, col)] = Voxel::of(room(1), VoxelFlags::EMPTY_INTERIOR);
            cells[shape.idx(3, col)] = Voxel::of(room(1), VoxelFlags::FLOOR);
        }
        for row in 1..4 {
            cells[shape.idx(row, skin_width)] = Voxel::of(room(1), VoxelFlags::WALL);
        }
        let normals = vec![NormalCode::EMPTY; shape.len()];
        (cells, normals, shape)
    }

    #[test]
    fn narrow_exposed_patch_becomes_wall_even_without_geometry() {
        let (mut cells, normals, shape) = exposed_room(3);
        let outside = fill_outside_space(&cells, shape, false);

        let (walled, opened) =
            restore_missing_walls(&mut cells, &normals, &outside, shape, &thresholds(4, 0.5));
        assert_eq!(opened, 0);
        assert_eq!(walled, 3);
        for col in 0..3 {
            assert_eq!(
                cells[shape.idx(1, col)].flags_of(room(1)),
                Some(VoxelFlags::WALL),
                "skin voxel (1, {col})"
            );
        }
    }

    #[test]
    fn wide_open_patch_becomes_an_opening() {
        let (mut cells, normals, shape) = exposed_room(6);
        let outside = fill_outside_space(&cells, shape, false);

        let (walled, opened) =
            restore_missing_walls(&mut cells, &normals, &outside, shape, &thresholds(4, 0.5));
        assert_eq!(walled, 0);
        assert_eq!(opened, 6);
        for col in 0..6 {
            assert_eq!(
                cells[shape.idx(1, col)].flags_of(room(1)),
                Some(VoxelFlags::WALL_OPENING),
                "skin voxel (1, {col})"
            );
        }
    }

    #[test]
    fn mostly_scanned_patch_becomes_wall() {
        let (mut cells, mut normals, shape) = exposed_room(6);
        // Real geometry behind most of the skin
        for col in 0..5 {
            normals[shape.idx(1, col)] = NormalCode::new(2);
        }
        let outside = fill_outside_space(&cells, shape, false);

        let (walled, opened) =
            restore_missing_walls(&mut cells, &normals, &outside, shape, &thresholds(4, 0.5));
        assert_eq!(opened, 0);
        assert_eq!(walled, 6);
        assert_eq!(
            cells[shape.idx(1, 0)].flags_of(room(1)),
            Some(VoxelFlags::WALL)
        );
    }

    #[test]
    fn sheltered_interior_is_untouched() {
        let (mut cells, normals, shape) = exposed_room(6);
        let outside = fill_outside_space(&cells, shape, false);

        restore_missing_walls(&mut cells, &normals, &outside, shape, &thresholds(4, 0.5));
        // Rows 2 and 3 are shielded by the skin and the sealing wall.
        for col in 0..6 {
            assert_eq!(
                cells[shape.idx(2, col)].flags_of(room(1)),
                Some(VoxelFlags::EMPTY_INTERIOR),
                "sheltered voxel (2, {col})"
            );
            assert_eq!(
                cells[shape.idx(3, col)].flags_of(room(1)),
                Some(VoxelFlags::FLOOR),
                "sheltered voxel (3, {col})"
            );
        }
    }
}
