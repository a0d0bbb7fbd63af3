// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pass sequencing and the two-phase parallel execution strategy.
//!
//! Phase 1 runs the per-layer refinement passes, parallel across layers;
//! every read and write stays inside one layer, so chunking the layer-major
//! storage hands each worker a disjoint `&mut` layer slice. Phase 2a scans
//! columns for fragment candidates (reads cross layers, writes only the
//! worker's own column of the candidate mask) and therefore starts only
//! after phase 1 has completed everywhere; phase 2b strips candidates,
//! parallel across layers again, reading the finished mask shared.

use crate::config::{RefineConfig, VoxelThresholds};
use crate::error::{Error, Result};
use crate::fragment_filter::{detect_short_wall_runs, remove_layer_candidates, CandidateGrid};
use crate::hole_filler::close_interior_holes;
use crate::opening_shrink::{shrink_openings_inward, shrink_openings_outward};
use crate::outside_fill::fill_outside_space;
use crate::wall_restore::restore_missing_walls;
use rayon::prelude::*;
use roomvox_grid::{LayerShape, NormalCode, NormalGrid, ReconstructionGrid, Voxel};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Counters for what one refinement run changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefineStats {
    /// WALL_OPENING claims dropped because their region never touches the
    /// room's interior.
    pub detached_openings_removed: usize,
    /// WALL_OPENING claims reclassified to wall or interior by the inside
    /// shrink passes.
    pub openings_reclassified: usize,
    /// Enclosed hole voxels converted into single-room interior.
    pub hole_voxels_filled: usize,
    /// Hole voxels bordering several rooms, marked outside instead.
    pub ambiguous_hole_voxels: usize,
    /// Exposed boundary voxels rebuilt as wall.
    pub wall_voxels_restored: usize,
    /// Exposed boundary voxels rebuilt as wall opening.
    pub opening_voxels_restored: usize,
    /// Voxels marked as short-fragment removal candidates.
    pub fragment_candidates: usize,
    /// Candidate voxels actually stripped of their wall classification.
    pub fragment_voxels_removed: usize,
}

impl RefineStats {
    fn merge(mut self, other: Self) -> Self {
        self.detached_openings_removed += other.detached_openings_removed;
        self.openings_reclassified += other.openings_reclassified;
        self.hole_voxels_filled += other.hole_voxels_filled;
        self.ambiguous_hole_voxels += other.ambiguous_hole_voxels;
        self.wall_voxels_restored += other.wall_voxels_restored;
        self.opening_voxels_restored += other.opening_voxels_restored;
        self.fragment_candidates += other.fragment_candidates;
        self.fragment_voxels_removed += other.fragment_voxels_removed;
        self
    }
}

/// Repair topological artifacts in a voxelized room reconstruction.
///
/// Runs, for every horizontal layer in parallel: outside shrink → inside
/// shrink → outside-space flood fill → interior-hole closing → missing-wall
/// restoration → inside shrink again. Afterwards the false-fragment removal
/// runs as two further parallel phases (column-wise detection, layer-wise
/// removal). The reconstruction grid is mutated in place; the normal grid is
/// a read-only oracle for where the scan saw real geometry.
///
/// Fails fast when the grids disagree in shape or the configuration is out
/// of range; the grids are untouched in that case.
pub fn refine_reconstruction(
    recon: &mut ReconstructionGrid,
    normals: &NormalGrid,
    config: &RefineConfig,
) -> Result<RefineStats> {
    if recon.dims() != normals.dims() {
        return Err(Error::ShapeMismatch {
            recon: recon.dims(),
            normals: normals.dims(),
        });
    }
    let thresholds = config.to_thresholds()?;

    let dims = recon.dims();
    if dims.cell_count() == 0 {
        return Ok(RefineStats::default());
    }
    let shape = dims.layer_shape();
    let layer_len = dims.layer_len();
    let top = dims.layers - 1;

    // Phase 1: per-layer refinement, parallel across layers.
    let mut stats = recon
        .as_mut_slice()
        .par_chunks_mut(layer_len)
        .zip(normals.as_slice().par_chunks(layer_len))
        .enumerate()
        .map(|(layer, (cells, layer_normals))| {
            refine_layer(
                cells,
                layer_normals,
                shape,
                layer == 0 || layer == top,
                &thresholds,
            )
        })
        .reduce(RefineStats::default, RefineStats::merge);
    debug!(?stats, "per-layer refinement complete");

    // Phase 2a: candidate detection, parallel across columns. Starts only
    // once every layer of phase 1 has finished; the mask is column-major so
    // each worker owns its column.
    let mut candidates = CandidateGrid::new(dims);
    let detected: &ReconstructionGrid = recon;
    stats.fragment_candidates = candidates
        .par_columns_mut()
        .enumerate()
        .map(|(column, column_cells)| {
            let (row, col) = (column / dims.cols, column % dims.cols);
            detect_short_wall_runs(detected, row, col, thresholds.min_wall_height, column_cells)
        })
        .sum();
    debug!(candidates = stats.fragment_candidates, "fragment detection complete");

    // Phase 2b: fragment removal, parallel across layers, reading the
    // fully-populated candidate mask.
    let candidates = &candidates;
    stats.fragment_voxels_removed = recon
        .as_mut_slice()
        .par_chunks_mut(layer_len)
        .zip(normals.as_slice().par_chunks(layer_len))
        .enumerate()
        .map(|(layer, (cells, layer_normals))| {
            remove_layer_candidates(cells, layer_normals, shape, layer, candidates, &thresholds)
        })
        .sum();

    info!(
        layers = dims.layers,
        rows = dims.rows,
        cols = dims.cols,
        holes_filled = stats.hole_voxels_filled,
        walls_restored = stats.wall_voxels_restored,
        fragments_removed = stats.fragment_voxels_removed,
        "reconstruction refinement finished"
    );
    Ok(stats)
}

/// The per-layer pass sequence of phase 1.
fn refine_layer(
    cells: &mut [Voxel],
    normals: &[NormalCode],
    shape: LayerShape,
    on_grid_face: bool,
    thresholds: &VoxelThresholds,
) -> RefineStats {
    let mut stats = RefineStats::default();

    stats.detached_openings_removed = shrink_openings_outward(cells, shape);
    stats.openings_reclassified = shrink_openings_inward(cells, shape);

    let mut outside = fill_outside_space(cells, shape, on_grid_face);
    let (filled, ambiguous) = close_interior_holes(cells, shape, &mut outside);
    stats.hole_voxels_filled = filled;
    stats.ambiguous_hole_voxels = ambiguous;

    let (walled, opened) = restore_missing_walls(cells, normals, &outside, shape, thresholds);
    stats.wall_voxels_restored = walled;
    stats.opening_voxels_restored = opened;

    // Restoration can bury openings that no longer face unoccupied space.
    stats.openings_reclassified += shrink_openings_inward(cells, shape);

    stats
}
