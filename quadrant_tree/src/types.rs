// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the quadtree: point and node identifiers, quadrant slots.

use quadrant_geometry::{Aabb3, Vec3};

/// Caller-assigned identifier of a point.
///
/// The tree never mints ids. They must be unique among the points stored in one
/// tree and stable for as long as the point is stored.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointId(pub u64);

/// A point primitive: an id and a position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point {
    /// Identity used by the id index.
    pub id: PointId,
    /// Position in space.
    pub position: Vec3,
}

impl Point {
    /// Create a point from an id and coordinates.
    pub const fn new(id: u64, x: f64, y: f64, z: f64) -> Self {
        Self {
            id: PointId(id),
            position: Vec3::new(x, y, z),
        }
    }

    /// Exact per-coordinate equality, ignoring ids.
    pub fn same_position(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

/// Identifier for a node in the tree.
///
/// A slot index plus a generation counter. Freed slots are reused with a bumped
/// generation, so an id kept across a prune never aliases the node that replaced it.
/// Use [`QuadTree::is_alive`](crate::QuadTree::is_alive) to test liveness.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Which quadrant of its parent a node occupies.
///
/// The declaration order is the tie-break order for points on a shared boundary.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    /// Low x, low y.
    Sw = 0,
    /// High x, low y.
    Se = 1,
    /// High x, high y.
    Ne = 2,
    /// Low x, high y.
    Nw = 3,
}

impl Slot {
    /// All slots in tie-break order.
    pub const ALL: [Self; 4] = [Self::Sw, Self::Se, Self::Ne, Self::Nw];

    /// Position of this slot in a children array.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The box this slot covers inside `parent`.
    ///
    /// x and y are split at the parent's center; z keeps the parent's full span.
    pub fn quadrant(self, parent: &Aabb3) -> Aabb3 {
        let Aabb3 { min, max } = *parent;
        let c = parent.center();
        match self {
            Self::Sw => Aabb3::new(min, Vec3::new(c.x, c.y, max.z)),
            Self::Se => Aabb3::new(Vec3::new(c.x, min.y, min.z), Vec3::new(max.x, c.y, max.z)),
            Self::Ne => Aabb3::new(Vec3::new(c.x, c.y, min.z), max),
            Self::Nw => Aabb3::new(Vec3::new(min.x, c.y, min.z), Vec3::new(c.x, max.y, max.z)),
        }
    }

    /// The first slot, in [`Slot::ALL`] order, whose quadrant of `parent` contains `p`.
    ///
    /// For any `p` inside `parent` this agrees with testing each [`Slot::quadrant`]
    /// with inclusive containment; it only compares against the center, so it is
    /// total and returns [`Slot::Nw`] for positions that match nothing.
    pub fn containing(parent: &Aabb3, p: Vec3) -> Self {
        let c = parent.center();
        let (west, east) = (p.x <= c.x, p.x >= c.x);
        let (south, north) = (p.y <= c.y, p.y >= c.y);
        if west && south {
            Self::Sw
        } else if east && south {
            Self::Se
        } else if east && north {
            Self::Ne
        } else {
            Self::Nw
        }
    }
}

impl From<Slot> for Quadrants {
    fn from(slot: Slot) -> Self {
        match slot {
            Slot::Sw => Self::SW,
            Slot::Se => Self::SE,
            Slot::Ne => Self::NE,
            Slot::Nw => Self::NW,
        }
    }
}

bitflags::bitflags! {
    /// A set of quadrant slots, e.g. the occupied children of an internal node.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Quadrants: u8 {
        /// South-west.
        const SW = 0b0001;
        /// South-east.
        const SE = 0b0010;
        /// North-east.
        const NE = 0b0100;
        /// North-west.
        const NW = 0b1000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> Aabb3 {
        Aabb3::new(Vec3::ZERO, Vec3::new(2.0, 2.0, 2.0))
    }

    #[test]
    fn quadrants_split_xy_and_keep_z() {
        let b = unit();
        assert_eq!(
            Slot::Sw.quadrant(&b),
            Aabb3::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 2.0))
        );
        assert_eq!(
            Slot::Se.quadrant(&b),
            Aabb3::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 2.0))
        );
        assert_eq!(
            Slot::Ne.quadrant(&b),
            Aabb3::new(Vec3::new(1.0, 1.0, 0.0), Vec3::new(2.0, 2.0, 2.0))
        );
        assert_eq!(
            Slot::Nw.quadrant(&b),
            Aabb3::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 2.0, 2.0))
        );
    }

    #[test]
    fn containing_matches_first_inclusive_quadrant() {
        let b = unit();
        let probes = [0.0, 0.5, 1.0, 1.5, 2.0];
        for &x in &probes {
            for &y in &probes {
                let p = Vec3::new(x, y, 1.0);
                let expected = Slot::ALL
                    .into_iter()
                    .find(|s| s.quadrant(&b).contains_point(p))
                    .unwrap();
                assert_eq!(Slot::containing(&b, p), expected, "at ({x}, {y})");
            }
        }
    }

    #[test]
    fn center_goes_south_west() {
        assert_eq!(Slot::containing(&unit(), Vec3::splat(1.0)), Slot::Sw);
    }

    #[test]
    fn slot_flags_roundtrip_into_set() {
        let set: Quadrants = Slot::ALL.into_iter().map(Quadrants::from).collect();
        assert_eq!(set, Quadrants::all());
        assert_eq!(Quadrants::from(Slot::Ne), Quadrants::NE);
    }
}
