// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dense voxel grids and per-voxel room state for indoor 3D reconstruction.
//!
//! The reconstruction pipeline partitions a scanned building volume into a
//! dense 3D grid. Each cell is either unoccupied or claimed by one or more
//! rooms, each claim carrying a set of classification flags (wall, opening,
//! floor, ceiling, interior). A second grid of the same shape records where
//! the scanner actually saw surface geometry.
//!
//! Storage is layer-major: every horizontal layer is one contiguous slice,
//! so callers can partition a grid into disjoint `&mut` layer regions for
//! parallel processing.

pub mod grid;
pub mod voxel;

pub use grid::{Grid3, GridDims, LayerShape, NormalGrid, ReconstructionGrid};
pub use voxel::{NormalCode, RoomClaim, RoomId, Voxel, VoxelFlags};
