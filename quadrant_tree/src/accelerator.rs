// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The owning facade: configuration, id lookups, and rebuild-on-overflow growth.

use alloc::vec::Vec;

use quadrant_geometry::{Aabb3, Vec3};

use crate::builder::{Builder, NoopBuilder};
use crate::check::Violation;
use crate::error::BuildError;
use crate::iter::{Nodes, Points};
use crate::tree::{Insertion, Policy, QuadTree};
use crate::types::{Point, PointId};

/// Capacity and depth settings, fixed when the tree is built.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TreeConfig {
    /// Points a leaf may hold before it branches. Must be at least 1.
    pub max_points_per_node: usize,
    /// Deepest level a leaf may be split to. `None` picks [`depth_heuristic`].
    pub max_depth: Option<u32>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_points_per_node: 1,
            max_depth: None,
        }
    }
}

impl TreeConfig {
    /// Set the points a leaf may hold before it branches.
    #[must_use]
    pub const fn with_capacity(mut self, max_points_per_node: usize) -> Self {
        self.max_points_per_node = max_points_per_node;
        self
    }

    /// Set an explicit maximum depth.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// Default maximum depth for `point_count` points: `ceil(log2(4 * n / capacity) / 2)`.
///
/// The quotient is integer division. Counts below two are treated as two, the
/// smallest set a tree can be derived from without explicit bounds.
pub fn depth_heuristic(point_count: usize, capacity: usize) -> u32 {
    let n = point_count.max(2);
    let ratio = (n.saturating_mul(4) / capacity.max(1)).max(1);
    // ceil(x / 2) == ceil(ceil(x) / 2), so the rounded-up log2 is enough.
    let log2 = ratio.ilog2() + u32::from(!ratio.is_power_of_two());
    log2.div_ceil(2)
}

/// A projected quadtree over points, with an id index and optional lifecycle hooks.
///
/// ```
/// use quadrant_tree::{Accelerator, Point, PointId, TreeConfig};
///
/// let points = vec![Point::new(1, 0.0, 0.0, 0.0), Point::new(2, 1.0, 1.0, 1.0)];
/// let mut acc = Accelerator::new(points, TreeConfig::default()).unwrap();
///
/// acc.add_point(Point::new(3, 0.9, 0.1, 0.5));
/// assert_eq!(acc.find_by_id(PointId(3)).map(|p| p.position.x), Some(0.9));
///
/// assert!(acc.delete_by_id(PointId(3)));
/// assert!(acc.find_by_id(PointId(3)).is_none());
/// assert_eq!(acc.check_invariants(), None);
/// ```
pub struct Accelerator<B: Builder = NoopBuilder> {
    tree: QuadTree<B::Group>,
    builder: B,
}

impl<B: Builder> core::fmt::Debug for Accelerator<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Accelerator")
            .field("bounds", &self.tree.bounds())
            .field("tree", &self.tree)
            .finish_non_exhaustive()
    }
}

impl Accelerator {
    /// Build from at least two points, with bounds derived from them and no builder.
    pub fn new(points: Vec<Point>, config: TreeConfig) -> Result<Self, BuildError> {
        Self::from_parts(points, None, config, NoopBuilder)
    }
}

impl<B: Builder> Accelerator<B> {
    /// Build from at least two points, with bounds derived from them.
    pub fn with_builder(
        points: Vec<Point>,
        config: TreeConfig,
        builder: B,
    ) -> Result<Self, BuildError> {
        Self::from_parts(points, None, config, builder)
    }

    /// Build an empty tree covering `bounds`.
    ///
    /// The root starts as a leaf with no points and no group.
    pub fn with_bounds(bounds: Aabb3, config: TreeConfig, builder: B) -> Result<Self, BuildError> {
        Self::from_parts(Vec::new(), Some(bounds), config, builder)
    }

    /// Build from any combination of points and bounds.
    ///
    /// `bounds` is grown to cover every point. Without `bounds`, at least two
    /// points are required.
    pub fn from_parts(
        points: Vec<Point>,
        bounds: Option<Aabb3>,
        config: TreeConfig,
        mut builder: B,
    ) -> Result<Self, BuildError> {
        let capacity = config.max_points_per_node;
        if capacity == 0 {
            return Err(BuildError::ZeroCapacity);
        }
        if let Some(p) = points.iter().find(|p| !p.position.is_finite()) {
            return Err(BuildError::NonFinitePoint(p.id));
        }
        let seed = match (bounds, points.as_slice()) {
            (Some(b), _) if !b.is_finite() => return Err(BuildError::NonFiniteBounds),
            (Some(b), _) => b,
            (None, [a, b, ..]) => Aabb3::new(a.position, b.position),
            (None, _) => {
                return Err(BuildError::MissingBounds {
                    points: points.len(),
                });
            }
        };
        let bounds = points.iter().fold(seed, |b, p| b.with_point(p.position));
        let max_depth = config
            .max_depth
            .unwrap_or_else(|| depth_heuristic(points.len(), capacity));

        let policy = Policy {
            capacity,
            max_depth,
        };
        let tree = QuadTree::build(points, bounds, policy, &mut builder);
        Ok(Self { tree, builder })
    }

    /// Insert a point.
    ///
    /// A point outside the current bounds triggers a full rebuild: every stored
    /// point is collected, the tree is torn down through the builder, the bounds
    /// grow to cover the new point, the maximum depth is raised to the heuristic
    /// for the new count if that is larger, and the tree is built again. That is
    /// O(n) in the number of stored points, so callers that insert many points
    /// outside the initial bounds should pass generous bounds up front.
    ///
    /// As with [`Accelerator::destroy`], the old root's group is not passed to
    /// [`Builder::destroy_group`] during a rebuild; it is dropped.
    ///
    /// A point with a non-finite coordinate, or with an id that is already stored,
    /// is rejected with a warning and `false` is returned. Otherwise returns `true`.
    pub fn add_point(&mut self, point: Point) -> bool {
        if !point.position.is_finite() {
            tracing::warn!(
                id = ?point.id,
                position = ?point.position,
                "ignoring non-finite point"
            );
            return false;
        }
        if self.tree.leaf_of(point.id).is_some() {
            tracing::warn!(id = ?point.id, "ignoring point with an id that is already stored");
            return false;
        }
        if let Insertion::OutOfBounds(point) = self.tree.insert(point, &mut self.builder) {
            self.rebuild_with(point);
        }
        true
    }

    fn rebuild_with(&mut self, point: Point) {
        let mut points: Vec<Point> = self.tree.points().copied().collect();
        points.push(point);
        let old_bounds = self.tree.bounds();
        let bounds = old_bounds.with_point(point.position);
        let capacity = self.tree.capacity();
        let max_depth = self
            .tree
            .max_depth()
            .max(depth_heuristic(points.len(), capacity));
        tracing::debug!(
            ?old_bounds,
            ?bounds,
            points = points.len(),
            max_depth,
            "rebuilding tree for out-of-bounds point"
        );

        let _root_group = self.tree.teardown(&mut self.builder);
        let policy = Policy {
            capacity,
            max_depth,
        };
        self.tree = QuadTree::build(points, bounds, policy, &mut self.builder);
    }

    /// Delete the point with `id`. Returns `false` if no such point is stored.
    ///
    /// # Panics
    ///
    /// If the id index names a leaf that does not hold the point. That means the
    /// structure is corrupt, and continuing would silently lose data.
    pub fn delete_by_id(&mut self, id: PointId) -> bool {
        let Some(leaf) = self.tree.leaf_of(id) else {
            return false;
        };
        if self
            .tree
            .remove_from_leaf(leaf, id, &mut self.builder)
            .is_none()
        {
            panic!("point {id:?} is indexed at {leaf:?} but that leaf does not hold it");
        }
        true
    }

    /// Delete the first point stored at exactly `position` and return it.
    ///
    /// Only one point is removed. Other points at the same position stay in the
    /// tree and can be removed by further calls or by id.
    pub fn delete_point(&mut self, position: Vec3) -> Option<Point> {
        self.tree.remove_at(position, &mut self.builder)
    }

    /// Look up a point by id.
    pub fn find_by_id(&self, id: PointId) -> Option<&Point> {
        self.tree.find_by_id(id)
    }

    /// Find a point within `radius` of `at` on the x/y plane.
    ///
    /// Only the leaf whose box contains `at` (at the tree's mid-height) is searched,
    /// with a square window of half-width `radius`. Points in neighbouring leaves
    /// are not found even if they fall inside the window. Returns `None` when `at`
    /// is outside the tree, and a negative or NaN `radius` matches nothing.
    pub fn find_by_position(&self, at: kurbo::Point, radius: f64) -> Option<&Point> {
        let probe = Vec3::new(at.x, at.y, self.tree.bounds().center().z);
        let leaf = self.tree.get(self.tree.locate(probe)?)?;
        let (x0, x1) = (at.x - radius, at.x + radius);
        let (y0, y1) = (at.y - radius, at.y + radius);
        leaf.points()?.iter().find(|p| {
            let q = p.position;
            x0 <= q.x && q.x <= x1 && y0 <= q.y && q.y <= y1
        })
    }

    /// Number of stored points.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// True if no points are stored.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// The region covered by the root.
    pub fn bounds(&self) -> Aabb3 {
        self.tree.bounds()
    }

    /// Current maximum depth.
    pub fn max_depth(&self) -> u32 {
        self.tree.max_depth()
    }

    /// Points a leaf may hold before it branches.
    pub fn capacity(&self) -> usize {
        self.tree.capacity()
    }

    /// Depth-first iterator over stored points.
    pub fn points(&self) -> Points<'_, B::Group> {
        self.tree.points()
    }

    /// Depth-first iterator over nodes.
    pub fn nodes(&self) -> Nodes<'_, B::Group> {
        self.tree.nodes()
    }

    /// Read access to the tree structure.
    pub fn tree(&self) -> &QuadTree<B::Group> {
        &self.tree
    }

    /// The builder receiving lifecycle calls.
    pub fn builder(&self) -> &B {
        &self.builder
    }

    /// Mutable access to the builder. It must not be used to mutate this tree.
    pub fn builder_mut(&mut self) -> &mut B {
        &mut self.builder
    }

    /// See [`QuadTree::check_invariants`].
    pub fn check_invariants(&self) -> Option<Violation> {
        self.tree.check_invariants()
    }

    /// Tear the tree down through the builder and return the builder and root group.
    ///
    /// Nodes are destroyed children first. Every stored point goes to
    /// [`Builder::destroy_primitive`] and every group except the root's goes to
    /// [`Builder::destroy_group`]. The root's group, if one was built, belongs to
    /// the caller from here on.
    ///
    /// Dropping an accelerator without calling this makes no builder calls.
    pub fn destroy(mut self) -> (B, Option<B::Group>) {
        let root_group = self.tree.teardown(&mut self.builder);
        (self.builder, root_group)
    }

    #[cfg(test)]
    pub(crate) fn tree_mut(&mut self) -> &mut QuadTree<B::Group> {
        &mut self.tree
    }
}
