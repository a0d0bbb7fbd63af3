// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outside-space labeling within one horizontal layer.

use roomvox_grid::{LayerShape, Voxel};
use std::collections::VecDeque;

/// Mark every unoccupied voxel of a layer reachable from the grid's outer
/// face without crossing an occupied voxel (4-connected, in-plane).
///
/// Seeds are unoccupied voxels with any coordinate on the grid face; for the
/// bottom and top layers (`on_grid_face`) that is every unoccupied voxel.
/// Unoccupied voxels the fill does not reach are enclosed holes.
pub(crate) fn fill_outside_space(
    cells: &[Voxel],
    shape: LayerShape,
    on_grid_face: bool,
) -> Vec<bool> {
    let mut outside = vec![false; cells.len()];
    let mut queue = VecDeque::new();

    for (idx, voxel) in cells.iter().enumerate() {
        if voxel.is_occupied() {
            continue;
        }
        let (row, col) = shape.coords(idx);
        if on_grid_face || shape.on_border(row, col) {
            outside[idx] = true;
            queue.push_back((row, col));
        }
    }

    while let Some((row, col)) = queue.pop_front() {
        for (nr, nc) in shape.neighbors4(row, col) {
            let nidx = shape.idx(nr, nc);
            if !outside[nidx] && !cells[nidx].is_occupied() {
                outside[nidx] = true;
                queue.push_back((nr, nc));
            }
        }
    }

    outside
}
