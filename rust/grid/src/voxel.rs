// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-voxel room membership and classification state.

use bitflags::bitflags;
use smallvec::SmallVec;
use std::num::NonZeroU32;

/// Identifier of a segmented room, assigned by the upstream space partitioner.
///
/// Room ids are opaque positive integers; zero is not a valid room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoomId(NonZeroU32);

impl RoomId {
    /// Returns `None` for zero, which no room may use.
    pub fn new(id: u32) -> Option<Self> {
        NonZeroU32::new(id).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

bitflags! {
    /// Classification flags a room assigns to one of its voxels.
    ///
    /// Flags are not mutually exclusive: a voxel at the junction of a floor
    /// slab and a wall carries `FLOOR | WALL` for the same room.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct VoxelFlags: u8 {
        /// Structural wall surface.
        const WALL = 1 << 0;
        /// Gap in a wall: a door or window candidate.
        const WALL_OPENING = 1 << 1;
        /// Free air inside the room.
        const EMPTY_INTERIOR = 1 << 2;
        /// Scanned object inside the room (furniture, clutter).
        const INTERIOR_OBJECT = 1 << 3;
        /// Floor slab.
        const FLOOR = 1 << 4;
        /// Ceiling slab.
        const CEILING = 1 << 5;
    }
}

impl VoxelFlags {
    /// Free interior space or an object inside the room.
    pub fn is_interior(self) -> bool {
        self.intersects(Self::EMPTY_INTERIOR | Self::INTERIOR_OBJECT)
    }

    /// Wall surface or an opening punched through one.
    pub fn is_wall_like(self) -> bool {
        self.intersects(Self::WALL | Self::WALL_OPENING)
    }
}

/// One room's claim on a voxel: the room id plus its non-empty flag set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomClaim {
    pub room: RoomId,
    pub flags: VoxelFlags,
}

/// State of a single reconstruction voxel.
///
/// A voxel is unoccupied (no claims) or carries one claim per room. Shared
/// boundary voxels, such as a wall between two rooms, hold claims for both.
/// A claim never has an empty flag set: replacing a claim's flags with the
/// empty set removes the claim, and a voxel whose last claim is removed
/// reverts to unoccupied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Voxel {
    claims: SmallVec<[RoomClaim; 2]>,
}

impl Voxel {
    /// A voxel claimed by a single room. Empty `flags` yield an unoccupied
    /// voxel.
    pub fn of(room: RoomId, flags: VoxelFlags) -> Self {
        let mut voxel = Self::default();
        voxel.set_flags(room, flags);
        voxel
    }

    pub fn is_occupied(&self) -> bool {
        !self.claims.is_empty()
    }

    pub fn has_room(&self, room: RoomId) -> bool {
        self.claims.iter().any(|c| c.room == room)
    }

    /// Flags the given room assigned to this voxel, if it claims it.
    pub fn flags_of(&self, room: RoomId) -> Option<VoxelFlags> {
        self.claims.iter().find(|c| c.room == room).map(|c| c.flags)
    }

    /// All room claims on this voxel.
    pub fn claims(&self) -> impl Iterator<Item = RoomClaim> + '_ {
        self.claims.iter().copied()
    }

    /// All rooms claiming this voxel.
    pub fn rooms(&self) -> impl Iterator<Item = RoomId> + '_ {
        self.claims.iter().map(|c| c.room)
    }

    /// The claim of a voxel owned by exactly one room.
    pub fn single_claim(&self) -> Option<RoomClaim> {
        match self.claims.as_slice() {
            [claim] => Some(*claim),
            _ => None,
        }
    }

    /// Replace (or insert) the given room's flags. An empty set removes the
    /// room's claim instead, upholding the non-empty-flags invariant.
    pub fn set_flags(&mut self, room: RoomId, flags: VoxelFlags) {
        if flags.is_empty() {
            self.remove_room(room);
            return;
        }
        match self.claims.iter_mut().find(|c| c.room == room) {
            Some(claim) => claim.flags = flags,
            None => self.claims.push(RoomClaim { room, flags }),
        }
    }

    /// Drop the given room's claim. Returns whether a claim was removed.
    pub fn remove_room(&mut self, room: RoomId) -> bool {
        let before = self.claims.len();
        self.claims.retain(|c| c.room != room);
        self.claims.len() != before
    }
}

/// Discretized surface-normal direction produced by the upstream normal
/// estimation, or [`NormalCode::EMPTY`] where the scan saw no geometry.
///
/// The refinement passes use this grid only as an oracle for whether real
/// scanned geometry backs a voxel; the direction code itself is opaque here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NormalCode(u8);

impl NormalCode {
    /// Sentinel: no scanned surface at this voxel.
    pub const EMPTY: NormalCode = NormalCode(0);

    pub fn new(code: u8) -> Self {
        NormalCode(code)
    }

    pub fn has_geometry(self) -> bool {
        self != Self::EMPTY
    }
}
