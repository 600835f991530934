// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::cmp::Ordering;
use core::ops::{Add, Mul, Sub};

use kurbo::{Point, Rect};

/// A position in 3D space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec3 {
    /// X coordinate (first partitioned axis).
    pub x: f64,
    /// Y coordinate (second partitioned axis).
    pub y: f64,
    /// Z coordinate (the axis that is never split).
    pub z: f64,
}

impl Vec3 {
    /// The origin.
    pub const ZERO: Self = Self::splat(0.0);

    /// Create a vector from its components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Create a vector with all components set to `v`.
    pub const fn splat(v: f64) -> Self {
        Self { x: v, y: v, z: v }
    }

    /// Component-wise minimum.
    pub fn min(self, other: Self) -> Self {
        Self {
            x: min_t(self.x, other.x),
            y: min_t(self.y, other.y),
            z: min_t(self.z, other.z),
        }
    }

    /// Component-wise maximum.
    pub fn max(self, other: Self) -> Self {
        Self {
            x: max_t(self.x, other.x),
            y: max_t(self.y, other.y),
            z: max_t(self.z, other.z),
        }
    }

    /// Projection onto the partitioned plane.
    pub const fn xy(self) -> Point {
        Point::new(self.x, self.y)
    }

    /// True if every component is finite (not NaN or infinite).
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

/// Axis-aligned bounding box in 3D.
///
/// Bounds are inclusive on every axis, so two boxes sharing a face both contain a
/// point lying on it. Callers that need a single owner must break the tie themselves.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb3 {
    /// Create a box spanning two corners, in either order.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        debug_assert!(
            !has_nan(a) && !has_nan(b),
            "Aabb3 corners must not contain NaN"
        );
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// A degenerate box holding a single position.
    pub const fn from_point(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    /// The smallest box containing every position, or `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = Self::from_point(it.next()?);
        Some(it.fold(first, |acc, p| acc.with_point(p)))
    }

    /// Grow this box to include `p`.
    pub fn union_point(&mut self, p: Vec3) -> &mut Self {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
        self
    }

    /// Grow this box to include `other`.
    pub fn union(&mut self, other: &Self) -> &mut Self {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self
    }

    /// A copy of this box grown to include `p`.
    #[must_use]
    pub fn with_point(mut self, p: Vec3) -> Self {
        self.union_point(p);
        self
    }

    /// Center of the box.
    pub fn center(&self) -> Vec3 {
        Vec3::new(
            mid(self.min.x, self.max.x),
            mid(self.min.y, self.max.y),
            mid(self.min.z, self.max.z),
        )
    }

    /// Extent along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// A box with the same center whose extent is scaled per axis.
    #[must_use]
    pub fn scale(&self, sx: f64, sy: f64, sz: f64) -> Self {
        let c = self.center();
        let s = self.size();
        let half = Vec3::new(0.5 * sx * s.x, 0.5 * sy * s.y, 0.5 * sz * s.z);
        Self::new(c - half, c + half)
    }

    /// Whether the box contains `p`, bounds included.
    pub fn contains_point(&self, p: Vec3) -> bool {
        le(self.min.x, p.x)
            && le(p.x, self.max.x)
            && le(self.min.y, p.y)
            && le(p.y, self.max.y)
            && le(self.min.z, p.z)
            && le(p.z, self.max.z)
    }

    /// Whether the projection of the box onto the x/y plane contains `p`, bounds included.
    ///
    /// Unlike [`Rect::contains`], the max edges are inclusive.
    pub fn contains_projected(&self, p: Point) -> bool {
        le(self.min.x, p.x) && le(p.x, self.max.x) && le(self.min.y, p.y) && le(p.y, self.max.y)
    }

    /// Whether two boxes overlap (touching counts).
    pub fn intersects(&self, other: &Self) -> bool {
        !(lt(other.max.x, self.min.x)
            || lt(self.max.x, other.min.x)
            || lt(other.max.y, self.min.y)
            || lt(self.max.y, other.min.y)
            || lt(other.max.z, self.min.z)
            || lt(self.max.z, other.min.z))
    }

    /// The box's footprint on the partitioned plane.
    pub fn footprint(&self) -> Rect {
        Rect::new(self.min.x, self.min.y, self.max.x, self.max.y)
    }

    /// True if both corners are finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

#[inline]
fn mid(a: f64, b: f64) -> f64 {
    0.5 * (a + b)
}

fn has_nan(v: Vec3) -> bool {
    v.x.is_nan() || v.y.is_nan() || v.z.is_nan()
}

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}

pub(crate) fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o == Ordering::Less)
        .unwrap_or(false)
}
