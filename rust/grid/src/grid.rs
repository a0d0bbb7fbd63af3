// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dense 3D grid arena, indexed `(layer, row, col)` with layer vertical.

use crate::voxel::{NormalCode, Voxel};

/// Dimensions of a dense 3D grid. `layers` counts along the vertical axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridDims {
    pub layers: usize,
    pub rows: usize,
    pub cols: usize,
}

impl GridDims {
    pub fn new(layers: usize, rows: usize, cols: usize) -> Self {
        Self { layers, rows, cols }
    }

    pub fn cell_count(&self) -> usize {
        self.layers * self.rows * self.cols
    }

    /// Number of cells in one horizontal layer.
    pub fn layer_len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn layer_shape(&self) -> LayerShape {
        LayerShape {
            rows: self.rows,
            cols: self.cols,
        }
    }
}

/// Dense 3D array in layer-major order: all cells of layer 0, then layer 1,
/// and so on; within a layer, cells are row-major. Each horizontal layer is
/// one contiguous slice, which lets the refinement phases hand every
/// parallel worker a disjoint `&mut` layer region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid3<T> {
    dims: GridDims,
    cells: Vec<T>,
}

pub type ReconstructionGrid = Grid3<Voxel>;
pub type NormalGrid = Grid3<NormalCode>;

impl<T: Clone + Default> Grid3<T> {
    pub fn new(dims: GridDims) -> Self {
        Self {
            dims,
            cells: vec![T::default(); dims.cell_count()],
        }
    }
}

impl<T> Grid3<T> {
    /// Wrap an existing cell buffer. The buffer length must match the
    /// dimensions exactly.
    pub fn from_cells(dims: GridDims, cells: Vec<T>) -> Self {
        assert_eq!(
            cells.len(),
            dims.cell_count(),
            "cell buffer length does not match grid dimensions {dims:?}"
        );
        Self { dims, cells }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    fn index(&self, layer: usize, row: usize, col: usize) -> usize {
        debug_assert!(layer < self.dims.layers && row < self.dims.rows && col < self.dims.cols);
        (layer * self.dims.rows + row) * self.dims.cols + col
    }

    pub fn get(&self, layer: usize, row: usize, col: usize) -> &T {
        &self.cells[self.index(layer, row, col)]
    }

    pub fn get_mut(&mut self, layer: usize, row: usize, col: usize) -> &mut T {
        let idx = self.index(layer, row, col);
        &mut self.cells[idx]
    }

    /// One horizontal layer as a contiguous slice.
    pub fn layer(&self, layer: usize) -> &[T] {
        let len = self.dims.layer_len();
        &self.cells[layer * len..(layer + 1) * len]
    }

    pub fn layer_mut(&mut self, layer: usize) -> &mut [T] {
        let len = self.dims.layer_len();
        &mut self.cells[layer * len..(layer + 1) * len]
    }

    /// The whole arena, layer-major. Intended for chunked parallel iteration.
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.cells
    }
}

/// In-plane shape of one horizontal layer, with neighbor iteration that
/// filters coordinates falling off the grid edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerShape {
    pub rows: usize,
    pub cols: usize,
}

/// 4-connected in-plane neighbor offsets.
const NEIGHBORS_4: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// 8-connected in-plane neighbor offsets.
const NEIGHBORS_8: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

impl LayerShape {
    pub fn len(self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    pub fn idx(self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        row * self.cols + col
    }

    /// Inverse of [`LayerShape::idx`].
    pub fn coords(self, idx: usize) -> (usize, usize) {
        (idx / self.cols, idx % self.cols)
    }

    pub fn contains(self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    /// Whether the cell lies on the layer's outer boundary.
    pub fn on_border(self, row: usize, col: usize) -> bool {
        row == 0 || col == 0 || row + 1 == self.rows || col + 1 == self.cols
    }

    /// In-bounds 4-connected neighbors of a cell.
    pub fn neighbors4(self, row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> {
        self.neighbors(row, col, &NEIGHBORS_4)
    }

    /// In-bounds 8-connected neighbors of a cell.
    pub fn neighbors8(self, row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> {
        self.neighbors(row, col, &NEIGHBORS_8)
    }

    fn neighbors(
        self,
        row: usize,
        col: usize,
        offsets: &'static [(i32, i32)],
    ) -> impl Iterator<Item = (usize, usize)> {
        offsets.iter().filter_map(move |&(dr, dc)| {
            let r = row as i32 + dr;
            let c = col as i32 + dc;
            self.contains(r, c).then(|| (r as usize, c as usize))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::{RoomId, VoxelFlags};

    #[test]
    fn layer_major_indexing() {
        let dims = GridDims::new(2, 3, 4);
        let mut grid: Grid3<u32> = Grid3::new(dims);
        *grid.get_mut(1, 2, 3) = 42;

        assert_eq!(*grid.get(1, 2, 3), 42);
        assert_eq!(grid.as_slice()[(1 * 3 + 2) * 4 + 3], 42);
        assert_eq!(grid.layer(1)[dims.layer_shape().idx(2, 3)], 42);
        assert_eq!(grid.layer(0).iter().sum::<u32>(), 0);
    }

    #[test]
    #[should_panic(expected = "does not match grid dimensions")]
    fn from_cells_rejects_wrong_length() {
        let _ = Grid3::from_cells(GridDims::new(2, 2, 2), vec![0u8; 7]);
    }

    #[test]
    fn voxel_grid_defaults_to_unoccupied() {
        let grid = ReconstructionGrid::new(GridDims::new(1, 2, 2));
        assert!(grid.as_slice().iter().all(|v| !v.is_occupied()));
    }

    #[test]
    fn voxel_grid_mutation() {
        let mut grid = ReconstructionGrid::new(GridDims::new(1, 2, 2));
        let room = RoomId::new(1).unwrap();
        grid.get_mut(0, 1, 1).set_flags(room, VoxelFlags::WALL);
        assert_eq!(grid.get(0, 1, 1).flags_of(room), Some(VoxelFlags::WALL));
    }

    #[test]
    fn neighbors_filtered_at_corners_and_edges() {
        let shape = LayerShape { rows: 3, cols: 3 };

        let corner: Vec<_> = shape.neighbors4(0, 0).collect();
        assert_eq!(corner, vec![(1, 0), (0, 1)]);
        assert_eq!(shape.neighbors8(0, 0).count(), 3);

        let center: Vec<_> = shape.neighbors4(1, 1).collect();
        assert_eq!(center.len(), 4);
        assert_eq!(shape.neighbors8(1, 1).count(), 8);

        let edge: Vec<_> = shape.neighbors4(2, 1).collect();
        assert_eq!(edge, vec![(1, 1), (2, 0), (2, 2)]);
    }

    #[test]
    fn border_and_coords_round_trip() {
        let shape = LayerShape { rows: 4, cols: 5 };
        assert!(shape.on_border(0, 2));
        assert!(shape.on_border(3, 2));
        assert!(shape.on_border(2, 0));
        assert!(shape.on_border(2, 4));
        assert!(!shape.on_border(1, 1));

        for idx in 0..shape.len() {
            let (r, c) = shape.coords(idx);
            assert_eq!(shape.idx(r, c), idx);
        }
    }
}
