// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use roomvox_grid::GridDims;
use thiserror::Error;

/// Result type for refinement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Contract violations reported at the refinement entry boundary.
///
/// The refinement algorithms themselves never fail: grid-edge neighbor
/// coordinates are filtered during iteration, not raised as errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("grid shape mismatch: reconstruction grid is {recon:?} but normal grid is {normals:?}")]
    ShapeMismatch { recon: GridDims, normals: GridDims },

    #[error("invalid refinement configuration: {0}")]
    InvalidConfig(String),
}
