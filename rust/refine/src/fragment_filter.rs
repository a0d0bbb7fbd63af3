// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Two-stage removal of false interior wall fragments.
//!
//! Real walls run floor to ceiling; thin "wall" shards left inside a room by
//! the space partitioning do not. Stage one scans each (row, col) column for
//! vertical runs of single-room wall voxels and marks runs shorter than the
//! minimum wall height as removal candidates. Stage two re-examines every
//! candidate within its layer and strips it only when the surrounding
//! voxels, out to the wall-thickness limit in all eight horizontal
//! directions, belong to the same room.

use crate::config::VoxelThresholds;
use rayon::prelude::*;
use roomvox_grid::{
    GridDims, LayerShape, NormalCode, ReconstructionGrid, RoomClaim, RoomId, Voxel, VoxelFlags,
};

/// Remove-candidate mask in column-major order: the cells of one (row, col)
/// column are contiguous, so detection can hand each parallel worker its own
/// column as a disjoint `&mut` slice while removal later reads it shared.
pub(crate) struct CandidateGrid {
    data: Vec<bool>,
    dims: GridDims,
}

impl CandidateGrid {
    pub(crate) fn new(dims: GridDims) -> Self {
        Self {
            data: vec![false; dims.cell_count()],
            dims,
        }
    }

    pub(crate) fn is_candidate(&self, layer: usize, row: usize, col: usize) -> bool {
        self.data[(row * self.dims.cols + col) * self.dims.layers + layer]
    }

    /// One contiguous mutable slice per (row, col) column, in column index
    /// order (`row * cols + col`).
    pub(crate) fn par_columns_mut(
        &mut self,
    ) -> impl IndexedParallelIterator<Item = &mut [bool]> + '_ {
        self.data.par_chunks_mut(self.dims.layers)
    }

    #[cfg(test)]
    fn column_mut(&mut self, row: usize, col: usize) -> &mut [bool] {
        let layers = self.dims.layers;
        let start = (row * self.dims.cols + col) * layers;
        &mut self.data[start..start + layers]
    }
}

/// Stage one: mark vertical wall runs shorter than the minimum wall height.
///
/// A run is a maximal vertical chain of voxels each claimed by exactly one
/// room, the same room throughout, carrying WALL or WALL_OPENING. Short runs
/// become candidates in the column slice; runs at or above the minimum
/// height are genuine walls and are skipped whole. Returns the number of
/// candidates marked.
pub(crate) fn detect_short_wall_runs(
    recon: &ReconstructionGrid,
    row: usize,
    col: usize,
    min_wall_height: usize,
    column: &mut [bool],
) -> usize {
    let layers = recon.dims().layers;
    let mut candidates = 0;
    let mut layer = 0;

    while layer < layers {
        let Some(claim) = single_wall_claim(recon.get(layer, row, col)) else {
            layer += 1;
            continue;
        };
        let start = layer;
        layer += 1;
        while layer < layers
            && single_wall_claim(recon.get(layer, row, col)).is_some_and(|c| c.room == claim.room)
        {
            layer += 1;
        }
        if layer - start < min_wall_height {
            for cell in &mut column[start..layer] {
                *cell = true;
            }
            candidates += layer - start;
        }
    }

    candidates
}

/// Stage two: strip the removable candidates of one layer.
///
/// Returns the number of voxels reclassified.
pub(crate) fn remove_layer_candidates(
    cells: &mut [Voxel],
    normals: &[NormalCode],
    shape: LayerShape,
    layer: usize,
    candidates: &CandidateGrid,
    thresholds: &VoxelThresholds,
) -> usize {
    let mut removed = 0;

    for idx in 0..cells.len() {
        let (row, col) = shape.coords(idx);
        if !candidates.is_candidate(layer, row, col) {
            continue;
        }
        let Some(claim) = single_wall_claim(&cells[idx]) else {
            continue;
        };
        if !fragment_is_removable(cells, shape, row, col, claim.room, thresholds) {
            continue;
        }
        cells[idx].set_flags(claim.room, replacement_flags(claim, normals[idx]));
        removed += 1;
    }

    removed
}

/// The claim of a voxel owned by exactly one room whose flags are wall-like
/// (WALL or WALL_OPENING); `None` for unoccupied, multi-room, or non-wall
/// voxels.
fn single_wall_claim(voxel: &Voxel) -> Option<RoomClaim> {
    voxel.single_claim().filter(|c| c.flags.is_wall_like())
}

/// A wall/floor junction shard reverts to the slab; anything else reverts to
/// interior, as an object when the scan saw geometry there.
fn replacement_flags(claim: RoomClaim, normal: NormalCode) -> VoxelFlags {
    if claim.flags.contains(VoxelFlags::FLOOR) {
        VoxelFlags::FLOOR
    } else if claim.flags.contains(VoxelFlags::CEILING) {
        VoxelFlags::CEILING
    } else if normal.has_geometry() {
        VoxelFlags::INTERIOR_OBJECT
    } else {
        VoxelFlags::EMPTY_INTERIOR
    }
}

/// Horizontal ray directions; the first four are orthogonal, the last four
/// diagonal and bounded by the shorter diagonal thickness limit.
const RAY_DIRECTIONS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

fn fragment_is_removable(
    cells: &[Voxel],
    shape: LayerShape,
    row: usize,
    col: usize,
    room: RoomId,
    thresholds: &VoxelThresholds,
) -> bool {
    RAY_DIRECTIONS.iter().enumerate().all(|(i, &(dr, dc))| {
        let reach = if i < 4 {
            thresholds.max_wall_thickness
        } else {
            thresholds.max_wall_thickness_diag
        };
        ray_stays_in_room(cells, shape, row, col, dr, dc, reach, room)
    })
}

/// Walk one horizontal ray outward from a candidate voxel.
///
/// The ray passes when every voxel out to `reach` is claimed by `room`
/// alone; a FLOOR/CEILING-only voxel (no WALL flag) ends it early. Leaving
/// the grid, meeting any other claim pattern, or meeting the room's own
/// interior rejects the removal.
#[allow(clippy::too_many_arguments)]
fn ray_stays_in_room(
    cells: &[Voxel],
    shape: LayerShape,
    row: usize,
    col: usize,
    dr: i32,
    dc: i32,
    reach: usize,
    room: RoomId,
) -> bool {
    let mut r = row as i32;
    let mut c = col as i32;

    for _ in 0..reach {
        r += dr;
        c += dc;
        if !shape.contains(r, c) {
            return false;
        }
        let voxel = &cells[shape.idx(r as usize, c as usize)];
        let Some(claim) = voxel.single_claim().filter(|cl| cl.room == room) else {
            return false;
        };
        if claim.flags.is_interior() {
            return false;
        }
        if !claim.flags.contains(VoxelFlags::WALL)
            && claim.flags.intersects(VoxelFlags::FLOOR | VoxelFlags::CEILING)
        {
            return true;
        }
    }

    true
}
