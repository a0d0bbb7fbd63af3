// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Refinement thresholds, configured in physical units and converted to
//! voxel counts once at the entry boundary.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::SQRT_2;

/// Configuration for the reconstruction refinement passes.
///
/// All distances are meters; `resolution` converts them into voxel counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefineConfig {
    /// Edge length of one voxel in meters. Default: 0.05m
    pub resolution: f64,

    /// Minimum width of a genuine wall opening. Narrower exposed boundary
    /// patches are rebuilt as wall. Default: 0.6m (a narrow door)
    pub min_opening_width_m: f64,

    /// Maximum fraction of an exposed boundary region backed by scanned
    /// geometry for it to remain an opening. Default: 0.5
    pub max_closed_ratio: f64,

    /// Minimum height of a genuine wall. Shorter single-room wall runs
    /// become removal candidates. Default: 2.0m
    pub min_wall_height_m: f64,

    /// Maximum wall thickness. Bounds the horizontal reach of the fragment
    /// removal rays. Default: 0.35m (exterior walls)
    pub max_wall_thickness_m: f64,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            resolution: 0.05,
            min_opening_width_m: 0.6,
            max_closed_ratio: 0.5,
            min_wall_height_m: 2.0,
            max_wall_thickness_m: 0.35,
        }
    }
}

impl RefineConfig {
    /// Validate the configuration and convert the physical thresholds into
    /// voxel counts for one refinement run.
    pub fn to_thresholds(&self) -> Result<VoxelThresholds> {
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "resolution must be a positive length in meters, got {}",
                self.resolution
            )));
        }
        for (name, value) in [
            ("min_opening_width_m", self.min_opening_width_m),
            ("min_wall_height_m", self.min_wall_height_m),
            ("max_wall_thickness_m", self.max_wall_thickness_m),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a non-negative length in meters, got {value}"
                )));
            }
        }
        if !(self.max_closed_ratio.is_finite()
            && (0.0..=1.0).contains(&self.max_closed_ratio))
        {
            return Err(Error::InvalidConfig(format!(
                "max_closed_ratio must lie in [0, 1], got {}",
                self.max_closed_ratio
            )));
        }

        Ok(VoxelThresholds {
            min_opening_width: to_voxels(self.min_opening_width_m, self.resolution),
            min_wall_height: to_voxels(self.min_wall_height_m, self.resolution),
            max_wall_thickness: to_voxels(self.max_wall_thickness_m, self.resolution),
            max_wall_thickness_diag: to_voxels(
                self.max_wall_thickness_m,
                self.resolution * SQRT_2,
            ),
            max_closed_ratio: self.max_closed_ratio,
        })
    }
}

/// Whole voxel steps covering a physical distance; at least one so every
/// threshold stays meaningful on coarse grids.
fn to_voxels(meters: f64, step: f64) -> usize {
    (meters / step).ceil().max(1.0) as usize
}

/// Thresholds converted to voxel counts, fixed for one refinement run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoxelThresholds {
    /// Minimum opening width in voxels.
    pub min_opening_width: usize,
    /// Minimum wall height in voxels.
    pub min_wall_height: usize,
    /// Ray reach for the orthogonal directions, in voxels.
    pub max_wall_thickness: usize,
    /// Ray reach for the diagonal directions: one diagonal step spans √2
    /// voxel edges.
    pub max_wall_thickness_diag: usize,
    /// Maximum fraction of real-geometry voxels for a restored opening.
    pub max_closed_ratio: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_config_converts() {
        let thresholds = RefineConfig::default().to_thresholds().unwrap();
        assert_eq!(thresholds.min_opening_width, 12);
        assert_eq!(thresholds.min_wall_height, 40);
        assert_eq!(thresholds.max_wall_thickness, 7);
        assert_eq!(thresholds.max_wall_thickness_diag, 5);
        assert_relative_eq!(thresholds.max_closed_ratio, 0.5);
    }

    #[test]
    fn converted_thickness_covers_the_physical_distance() {
        let config = RefineConfig::default();
        let thresholds = config.to_thresholds().unwrap();

        let orthogonal_reach = thresholds.max_wall_thickness as f64 * config.resolution;
        assert!(orthogonal_reach >= config.max_wall_thickness_m);
        assert_relative_eq!(orthogonal_reach, 0.35, epsilon = 1e-12);

        let diagonal_reach =
            thresholds.max_wall_thickness_diag as f64 * config.resolution * SQRT_2;
        assert!(diagonal_reach >= config.max_wall_thickness_m);
    }

    #[test]
    fn thresholds_never_drop_below_one_voxel() {
        let config = RefineConfig {
            resolution: 1.0,
            min_opening_width_m: 0.0,
            min_wall_height_m: 0.1,
            max_wall_thickness_m: 0.1,
            ..Default::default()
        };
        let thresholds = config.to_thresholds().unwrap();
        assert_eq!(thresholds.min_opening_width, 1);
        assert_eq!(thresholds.min_wall_height, 1);
        assert_eq!(thresholds.max_wall_thickness, 1);
        assert_eq!(thresholds.max_wall_thickness_diag, 1);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let bad_resolution = RefineConfig {
            resolution: 0.0,
            ..Default::default()
        };
        assert!(bad_resolution.to_thresholds().is_err());

        let bad_ratio = RefineConfig {
            max_closed_ratio: 1.5,
            ..Default::default()
        };
        assert!(bad_ratio.to_thresholds().is_err());

        let bad_width = RefineConfig {
            min_opening_width_m: f64::NAN,
            ..Default::default()
        };
        assert!(bad_width.to_thresholds().is_err());

        let negative_height = RefineConfig {
            min_wall_height_m: -2.0,
            ..Default::default()
        };
        assert!(negative_height.to_thresholds().is_err());
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = RefineConfig {
            resolution: 0.02,
            max_closed_ratio: 0.4,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: RefineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.resolution, config.resolution);
        assert_eq!(back.max_closed_ratio, config.max_closed_ratio);
        assert_eq!(back.min_wall_height_m, config.min_wall_height_m);
    }
}
