// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Topology repair for voxelized indoor room reconstructions.
//!
//! The upstream space partitioning of a scanned building leaves artifacts
//! behind: spurious openings punched through exterior walls, small enclosed
//! holes inside rooms, missing wall segments where a room faces the outside,
//! and thin false wall fragments floating inside rooms. This crate repairs
//! them in place with a sequence of flood-fill refinement passes:
//!
//! 1. Wall-opening shrinking (from outside, then from inside)
//! 2. Outside-space labeling per layer
//! 3. Interior-hole closing
//! 4. Missing-wall restoration along outside-facing room boundaries
//! 5. Inside shrinking again
//! 6. False wall-fragment detection (per column) and removal (per layer)
//!
//! Steps 1–5 run per horizontal layer, parallel across layers; step 6 runs
//! as two further parallel phases once every layer has settled.
//!
//! # Usage
//!
//! ```rust,ignore
//! use roomvox_refine::{refine_reconstruction, RefineConfig};
//!
//! let stats = refine_reconstruction(&mut reconstruction, &normals, &RefineConfig {
//!     resolution: 0.05,
//!     ..Default::default()
//! })?;
//! println!("filled {} hole voxels", stats.hole_voxels_filled);
//! ```

pub mod config;
pub mod error;
mod fragment_filter;
mod hole_filler;
mod opening_shrink;
mod outside_fill;
mod pipeline;
mod wall_restore;

pub use config::{RefineConfig, VoxelThresholds};
pub use error::{Error, Result};
pub use pipeline::{refine_reconstruction, RefineStats};

// The grid model is part of the public surface: callers build and keep the
// grids, this crate only transforms them.
pub use roomvox_grid::{
    Grid3, GridDims, LayerShape, NormalCode, NormalGrid, ReconstructionGrid, RoomClaim, RoomId,
    Voxel, VoxelFlags,
};
