// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadrant Tree: a projected quadtree over 3D points.
//!
//! Each node's box keeps the full extent along z and splits x and y into four
//! quadrants (south-west, south-east, north-east, north-west). Only leaves store
//! points.
//!
//! - Build from a point set, or from explicit bounds with no points.
//! - Insert points; a point outside the bounds triggers a full rebuild.
//! - Look up by id in O(1) through the id index, or near a planar position.
//! - Delete by id or by exact position; emptied leaves are pruned upwards.
//! - Mirror nodes and points into external objects through a [`Builder`].
//!
//! # Example
//!
//! ```rust
//! use quadrant_tree::{Accelerator, Point, PointId, Slot, TreeConfig};
//!
//! let points = vec![Point::new(1, 0.0, 0.0, 0.0), Point::new(2, 1.0, 1.0, 1.0)];
//! let mut acc = Accelerator::new(points, TreeConfig::default()).unwrap();
//!
//! // One split: the two corners land in opposite quadrants.
//! let slots: Vec<_> = acc.nodes().filter(|n| n.is_leaf()).map(|n| n.slot()).collect();
//! assert_eq!(slots, [Some(Slot::Sw), Some(Slot::Ne)]);
//!
//! // A planar lookup only searches the leaf under the probe.
//! let near = acc.find_by_position(kurbo::Point::new(0.1, 0.1), 0.2);
//! assert_eq!(near.map(|p| p.id), Some(PointId(1)));
//!
//! // Out of bounds: the tree is rebuilt around the new point.
//! acc.add_point(Point::new(3, 9.0, 9.0, 9.0));
//! assert!(acc.bounds().contains_point(quadrant_geometry::Vec3::splat(9.0)));
//! assert_eq!(acc.check_invariants(), None);
//! ```
//!
//! ## Builders
//!
//! A [`Builder`] receives `build_group`/`build_primitive` when nodes and points
//! settle, and `destroy_primitive`/`destroy_group` when they go away. Calls are
//! paired one to one, except that the root's group is never passed to
//! `destroy_group`: [`Accelerator::destroy`] returns it to the caller instead.
//!
//! ## Limits
//!
//! - [`Accelerator::find_by_position`] searches a single leaf, so points just across
//!   a leaf boundary are not found.
//! - Capacity and maximum depth are fixed per tree through [`TreeConfig`]; only a
//!   rebuild can raise the depth.
//! - Ids are supplied by the caller and must be unique; `add_point` ignores a
//!   duplicate id or a non-finite coordinate.
//!
//! ## Features
//!
//! - `std` (default): forwards `std` to Kurbo, `thiserror` and `tracing`.
//! - `libm`: for `no_std` builds, forwards `libm` to Kurbo.

#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod accelerator;
mod builder;
mod check;
mod error;
mod iter;
mod tree;
mod types;

pub use accelerator::{Accelerator, TreeConfig, depth_heuristic};
pub use builder::{Builder, NoopBuilder};
pub use check::{Violation, ViolationKind};
pub use error::BuildError;
pub use iter::{Nodes, Points};
pub use tree::{NodeRef, QuadTree};
pub use types::{NodeId, Point, PointId, Quadrants, Slot};
