// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural invariant checking, for tests and debugging.

use crate::tree::{Contents, QuadTree};
use crate::types::{NodeId, PointId, Slot};

/// The first broken invariant found by [`QuadTree::check_invariants`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// The offending node.
    pub node: NodeId,
    /// What is wrong with it.
    pub kind: ViolationKind,
}

/// Kinds of structural corruption.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    /// A non-root leaf holds no points.
    EmptyLeaf,
    /// A leaf stores a point outside its box.
    PointOutside(PointId),
    /// A leaf holds more points than the capacity above the depth limit.
    Overfull,
    /// An internal node has no occupied slot.
    Childless,
    /// A child's depth is not its parent's plus one.
    DepthMismatch,
    /// A child's parent link, or its slot, disagrees with the parent's children.
    LinkMismatch,
    /// A child's box is not its slot's quadrant of the parent's box.
    QuadrantMismatch,
    /// The id index does not map this stored point to this leaf.
    Unindexed(PointId),
    /// The id index holds an id that no leaf stores.
    StaleIndex(PointId),
}

impl<G> QuadTree<G> {
    /// Walk the tree depth-first and report the first node that breaks an invariant.
    ///
    /// Intended for tests; this visits every node and point.
    pub fn check_invariants(&self) -> Option<Violation> {
        let fail = |node, kind| Some(Violation { node, kind });
        let mut stored = 0_usize;

        for n in self.nodes() {
            let id = n.id();
            let node = self.node(id);
            match &node.contents {
                Contents::Leaf(points) => {
                    if points.is_empty() && node.parent.is_some() {
                        return fail(id, ViolationKind::EmptyLeaf);
                    }
                    if points.len() > self.policy.capacity && node.depth < self.policy.max_depth {
                        return fail(id, ViolationKind::Overfull);
                    }
                    for p in points {
                        if !node.bounds.contains_point(p.position) {
                            return fail(id, ViolationKind::PointOutside(p.id));
                        }
                        if self.leaf_of(p.id) != Some(id) {
                            return fail(id, ViolationKind::Unindexed(p.id));
                        }
                    }
                    stored += points.len();
                }
                Contents::Internal(children) => {
                    if children.iter().all(Option::is_none) {
                        return fail(id, ViolationKind::Childless);
                    }
                    for slot in Slot::ALL {
                        let Some(child_id) = children[slot.index()] else {
                            continue;
                        };
                        let Some(child) = self.get(child_id) else {
                            return fail(id, ViolationKind::LinkMismatch);
                        };
                        if child.parent() != Some(id) || child.slot() != Some(slot) {
                            return fail(child_id, ViolationKind::LinkMismatch);
                        }
                        if child.depth() != node.depth + 1 {
                            return fail(child_id, ViolationKind::DepthMismatch);
                        }
                        if child.bounds() != slot.quadrant(&node.bounds) {
                            return fail(child_id, ViolationKind::QuadrantMismatch);
                        }
                    }
                }
            }
        }

        if stored != self.len() {
            let stale = self.index().iter().find(|(point, leaf)| {
                self.get(**leaf)
                    .and_then(|l| l.points())
                    .is_none_or(|ps| ps.iter().all(|p| p.id != **point))
            });
            if let Some((point, leaf)) = stale {
                return fail(*leaf, ViolationKind::StaleIndex(*point));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Accelerator, Point, TreeConfig};
    use alloc::vec::Vec;

    fn grid(n: u64) -> Vec<Point> {
        (0..n * n)
            .map(|i| Point::new(i, (i % n) as f64, (i / n) as f64, (i % 3) as f64))
            .collect()
    }

    #[test]
    fn built_trees_are_valid() {
        for capacity in 1..=4 {
            let acc =
                Accelerator::new(grid(9), TreeConfig::default().with_capacity(capacity)).unwrap();
            assert_eq!(acc.check_invariants(), None, "capacity {capacity}");
        }
    }

    #[test]
    fn valid_after_mixed_edits() {
        let mut acc = Accelerator::new(grid(6), TreeConfig::default()).unwrap();
        for i in (0..36).step_by(3) {
            assert!(acc.delete_by_id(PointId(i)));
            assert_eq!(acc.check_invariants(), None);
        }
        acc.add_point(Point::new(100, 2.5, 2.5, 0.0));
        acc.add_point(Point::new(101, -4.0, 7.0, 1.0));
        assert_eq!(acc.check_invariants(), None);
    }

    #[test]
    fn reports_first_broken_node() {
        let mut acc = Accelerator::new(grid(4), TreeConfig::default()).unwrap();
        let id = PointId(5);
        let leaf = acc.tree().leaf_of(id).unwrap();
        acc.tree_mut().index_mut().remove(&id);
        assert_eq!(
            acc.check_invariants(),
            Some(Violation {
                node: leaf,
                kind: ViolationKind::Unindexed(id),
            })
        );
    }
}
