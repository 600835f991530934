// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadrant Geometry: 3D points and boxes for projected quadtrees.
//!
//! - [`Vec3`]: a plain `f64` position with component-wise min/max.
//! - [`Aabb3`]: an axis-aligned box with inclusive containment, union, center, size,
//!   scaling, and intersection.
//!
//! A projected quadtree splits space on x and y only, so both types expose their
//! footprint on that plane as Kurbo values ([`Vec3::xy`], [`Aabb3::footprint`],
//! [`Aabb3::contains_projected`]).
//!
//! ```rust
//! use quadrant_geometry::{Aabb3, Vec3};
//!
//! let mut b = Aabb3::new(Vec3::new(8.0, 8.0, 8.0), Vec3::ZERO);
//! assert_eq!(b.min, Vec3::ZERO);
//!
//! b.union_point(Vec3::new(9.0, 9.0, 9.0));
//! assert!(b.contains_point(Vec3::new(9.0, 9.0, 9.0)));
//! assert_eq!(b.center(), Vec3::splat(4.5));
//! ```
//!
//! ### Float semantics
//!
//! Comparisons are exact; there is no tolerance. NaN coordinates are not supported
//! and debug builds assert on them when a box is created.

#![no_std]

pub mod types;

pub use types::{Aabb3, Vec3};
