// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lifecycle hooks invoked as the tree's structure changes.

use quadrant_geometry::Aabb3;

use crate::types::Point;

/// Callbacks that mirror the tree's nodes and points into external objects.
///
/// All calls are synchronous and happen while the tree is mid-mutation, so an
/// implementation must not reach back into the tree that is calling it.
///
/// ## When each hook fires
///
/// - [`build_group`](Builder::build_group): once for every node that is constructed
///   with a non-empty set of points, before it decides to stay a leaf or branch.
///   Leaves and internal nodes both get a group this way. A root created from an
///   empty set has no group.
/// - [`build_primitive`](Builder::build_primitive): when a point settles into the leaf
///   that stores it. The group is that leaf's, or `None` for a root without one.
/// - [`destroy_primitive`](Builder::destroy_primitive): when a point leaves its leaf,
///   either because it was deleted, the tree is torn down, or its leaf branched and
///   the point is about to be rebuilt in a child.
/// - [`destroy_group`](Builder::destroy_group): once for every destroyed node that has
///   a group, except the root. The root's group is handed back to the caller by
///   [`Accelerator::destroy`](crate::Accelerator::destroy) instead.
pub trait Builder {
    /// Handle for the external object associated with a node.
    type Group;

    /// Create the group for a node covering `bounds`.
    fn build_group(&mut self, parent: Option<&Self::Group>, bounds: &Aabb3) -> Self::Group;

    /// Create the primitive for `point` inside `group`.
    fn build_primitive(&mut self, group: Option<&Self::Group>, point: &Point);

    /// Release the primitive previously built for `point`.
    fn destroy_primitive(&mut self, point: &Point);

    /// Release a group previously returned by [`Builder::build_group`].
    fn destroy_group(&mut self, group: Self::Group);
}

/// A builder that does nothing. Used when no external objects are needed.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopBuilder;

impl Builder for NoopBuilder {
    type Group = ();

    fn build_group(&mut self, _parent: Option<&()>, _bounds: &Aabb3) {}

    fn build_primitive(&mut self, _group: Option<&()>, _point: &Point) {}

    fn destroy_primitive(&mut self, _point: &Point) {}

    fn destroy_group(&mut self, _group: ()) {}
}
