// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: node arena, subdivision, insertion, pruning deletes.

use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashMap;

use quadrant_geometry::{Aabb3, Vec3};

use crate::builder::Builder;
use crate::iter::{Nodes, Points};
use crate::types::{NodeId, Point, PointId, Quadrants, Slot};

/// Capacity and depth limits fixed for a tree's lifetime.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Policy {
    pub(crate) capacity: usize,
    pub(crate) max_depth: u32,
}

#[derive(Clone, Debug)]
pub(crate) enum Contents {
    /// Points stored here. Empty only for a root that holds nothing.
    Leaf(Vec<Point>),
    /// Children by [`Slot::index`]; at least one is occupied.
    Internal([Option<NodeId>; 4]),
}

#[derive(Debug)]
pub(crate) struct Node<G> {
    generation: u32,
    pub(crate) bounds: Aabb3,
    pub(crate) depth: u32,
    pub(crate) slot: Option<Slot>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) contents: Contents,
    pub(crate) group: Option<G>,
}

impl<G> Node<G> {
    fn new(
        generation: u32,
        bounds: Aabb3,
        depth: u32,
        slot: Option<Slot>,
        parent: Option<NodeId>,
    ) -> Self {
        Self {
            generation,
            bounds,
            depth,
            slot,
            parent,
            contents: Contents::Leaf(Vec::new()),
            group: None,
        }
    }
}

/// Result of [`QuadTree::insert`].
#[derive(Debug)]
pub(crate) enum Insertion {
    Inserted,
    /// The point lies outside the root box; the tree is unchanged.
    OutOfBounds(Point),
}

/// A projected quadtree: nodes own their children through the arena, and point
/// ids map to the leaf that stores them.
///
/// The tree is built and mutated through [`Accelerator`](crate::Accelerator); this
/// type exposes read access to the structure.
pub struct QuadTree<G> {
    nodes: Vec<Option<Node<G>>>, // slots
    generations: Vec<u32>,       // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    root: NodeId,
    heap: HashMap<PointId, NodeId>,
    pub(crate) policy: Policy,
}

impl<G> core::fmt::Debug for QuadTree<G> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("QuadTree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("points", &self.heap.len())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Read-only view of one node.
#[derive(Debug)]
pub struct NodeRef<'a, G> {
    id: NodeId,
    node: &'a Node<G>,
}

impl<G> Clone for NodeRef<'_, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G> Copy for NodeRef<'_, G> {}

impl<'a, G> NodeRef<'a, G> {
    /// The node's identifier.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The region this node owns.
    pub fn bounds(&self) -> Aabb3 {
        self.node.bounds
    }

    /// Distance from the root, which is at depth `0`.
    pub fn depth(&self) -> u32 {
        self.node.depth
    }

    /// Quadrant of the parent this node occupies; `None` for the root.
    pub fn slot(&self) -> Option<Slot> {
        self.node.slot
    }

    /// The parent, or `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.node.parent
    }

    /// True if the node stores points rather than children.
    pub fn is_leaf(&self) -> bool {
        matches!(self.node.contents, Contents::Leaf(_))
    }

    /// Points of a leaf; `None` for an internal node.
    pub fn points(&self) -> Option<&'a [Point]> {
        match &self.node.contents {
            Contents::Leaf(points) => Some(points),
            Contents::Internal(_) => None,
        }
    }

    /// Children of an internal node by [`Slot::index`]; `None` for a leaf.
    pub fn children(&self) -> Option<[Option<NodeId>; 4]> {
        match self.node.contents {
            Contents::Internal(children) => Some(children),
            Contents::Leaf(_) => None,
        }
    }

    /// The set of occupied child slots. Empty for a leaf.
    pub fn occupied(&self) -> Quadrants {
        occupied(&self.node.contents)
    }

    /// The group built for this node, if any.
    pub fn group(&self) -> Option<&'a G> {
        self.node.group.as_ref()
    }
}

fn occupied(contents: &Contents) -> Quadrants {
    match contents {
        Contents::Leaf(_) => Quadrants::empty(),
        Contents::Internal(children) => Slot::ALL
            .into_iter()
            .filter(|s| children[s.index()].is_some())
            .map(Quadrants::from)
            .collect(),
    }
}

impl<G> QuadTree<G> {
    /// Build a tree over `points` inside `bounds`, which must contain all of them.
    pub(crate) fn build<B>(points: Vec<Point>, bounds: Aabb3, policy: Policy, builder: &mut B) -> Self
    where
        B: Builder<Group = G>,
    {
        let mut tree = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0, 1),
            heap: HashMap::with_capacity(points.len()),
            policy,
        };
        tree.root = tree.construct(points, bounds, None, None, builder);
        tree
    }

    /// The root node's id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The region covered by the whole tree.
    pub fn bounds(&self) -> Aabb3 {
        self.node(self.root).bounds
    }

    /// Number of points stored.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True if no points are stored.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Maximum depth a leaf may be split to.
    pub fn max_depth(&self) -> u32 {
        self.policy.max_depth
    }

    /// Points a leaf may hold before it branches.
    pub fn capacity(&self) -> usize {
        self.policy.capacity
    }

    /// A view of `id`, or `None` if it is stale.
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_, G>> {
        let node = self.nodes.get(id.idx())?.as_ref()?;
        (node.generation == id.1).then_some(NodeRef { id, node })
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// The leaf currently storing the point with `id`.
    pub fn leaf_of(&self, id: PointId) -> Option<NodeId> {
        self.heap.get(&id).copied()
    }

    /// The stored point with `id`.
    pub fn find_by_id(&self, id: PointId) -> Option<&Point> {
        let leaf = self.leaf_of(id)?;
        match &self.node(leaf).contents {
            Contents::Leaf(points) => points.iter().find(|p| p.id == id),
            Contents::Internal(_) => None,
        }
    }

    /// The deepest node reached by descending towards `p`.
    ///
    /// This is a leaf, or an internal node whose slot for `p` is empty. Ties on a
    /// shared boundary go to the first slot in [`Slot::ALL`] order, the same rule
    /// used when a leaf branches.
    pub fn descend(&self, p: Vec3) -> NodeId {
        let mut id = self.root;
        loop {
            let node = self.node(id);
            let Contents::Internal(children) = &node.contents else {
                return id;
            };
            match children[Slot::containing(&node.bounds, p).index()] {
                Some(child) => id = child,
                None => return id,
            }
        }
    }

    /// The deepest node whose box contains `p`, or `None` if `p` is outside the root.
    ///
    /// At each level this takes the first present child, in [`Slot::ALL`] order,
    /// whose box contains `p`. Unlike [`QuadTree::descend`] it reaches an existing
    /// sibling when `p` sits on a shared boundary and the first-match slot is empty.
    /// The result is an internal node when no child contains `p`.
    pub fn locate(&self, p: Vec3) -> Option<NodeId> {
        let mut id = self.root;
        if !self.node(id).bounds.contains_point(p) {
            return None;
        }
        loop {
            let Contents::Internal(children) = &self.node(id).contents else {
                return Some(id);
            };
            let next = children
                .iter()
                .flatten()
                .copied()
                .find(|c| self.node(*c).bounds.contains_point(p));
            match next {
                Some(child) => id = child,
                None => return Some(id),
            }
        }
    }

    /// Ids from the root down to `id`, inclusive.
    pub fn path_to_root(&self, mut id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        loop {
            out.push(id);
            match self.node(id).parent {
                Some(p) => id = p,
                None => break,
            }
        }
        out.reverse();
        out
    }

    /// Slots taken from the root down to `id`. Empty for the root.
    pub fn slot_path(&self, id: NodeId) -> Vec<Slot> {
        self.path_to_root(id)
            .into_iter()
            .filter_map(|n| self.node(n).slot)
            .collect()
    }

    /// Depth-first iterator over all nodes, parents before children.
    pub fn nodes(&self) -> Nodes<'_, G> {
        Nodes::new(self, self.root)
    }

    /// Depth-first iterator over all stored points.
    pub fn points(&self) -> Points<'_, G> {
        Points::new(self, self.root)
    }

    /// Access a node; panics if `id` is stale.
    pub(crate) fn node(&self, id: NodeId) -> &Node<G> {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<G> {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    pub(crate) fn index(&self) -> &HashMap<PointId, NodeId> {
        &self.heap
    }

    #[cfg(test)]
    pub(crate) fn index_mut(&mut self) -> &mut HashMap<PointId, NodeId> {
        &mut self.heap
    }

    fn alloc(&mut self, bounds: Aabb3, slot: Option<Slot>, parent: Option<NodeId>) -> NodeId {
        let depth = parent.map_or(0, |p| self.node(p).depth + 1);
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.nodes.push(None);
            self.generations.push(1);
            (self.nodes.len() - 1, 1)
        };
        self.nodes[idx] = Some(Node::new(generation, bounds, depth, slot, parent));
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Node slots are addressed with 32-bit indices."
        )]
        NodeId::new(idx as u32, generation)
    }

    fn free(&mut self, id: NodeId) -> Node<G> {
        let node = self.nodes[id.idx()].take().expect("dangling NodeId");
        self.free_list.push(id.idx());
        node
    }

    /// Create a node for `points` and recursively subdivide it.
    fn construct<B>(
        &mut self,
        points: Vec<Point>,
        bounds: Aabb3,
        slot: Option<Slot>,
        parent: Option<NodeId>,
        builder: &mut B,
    ) -> NodeId
    where
        B: Builder<Group = G>,
    {
        let id = self.alloc(bounds, slot, parent);
        if points.is_empty() {
            return id;
        }

        let parent_group = parent.and_then(|p| self.node(p).group.as_ref());
        let group = builder.build_group(parent_group, &bounds);
        let node = self.node_mut(id);
        node.group = Some(group);
        let depth = node.depth;

        if depth >= self.policy.max_depth || points.len() <= self.policy.capacity {
            self.settle(id, points, builder);
        } else {
            self.branch(id, points, builder);
        }
        id
    }

    /// Make `id` a leaf holding `points`, registering and building each one.
    fn settle<B>(&mut self, id: NodeId, points: Vec<Point>, builder: &mut B)
    where
        B: Builder<Group = G>,
    {
        let node = self.nodes[id.idx()].as_mut().expect("dangling NodeId");
        for p in &points {
            builder.build_primitive(node.group.as_ref(), p);
            self.heap.insert(p.id, id);
        }
        node.contents = Contents::Leaf(points);
    }

    /// Turn `id` into an internal node, binning `points` into new child leaves.
    fn branch<B>(&mut self, id: NodeId, points: Vec<Point>, builder: &mut B)
    where
        B: Builder<Group = G>,
    {
        let bounds = self.node(id).bounds;
        tracing::debug!(
            node = ?id,
            depth = self.node(id).depth,
            points = points.len(),
            "branching node"
        );

        let mut bins: [Vec<Point>; 4] = Default::default();
        for p in points {
            bins[Slot::containing(&bounds, p.position).index()].push(p);
        }

        self.node_mut(id).contents = Contents::Internal([None; 4]);
        for slot in Slot::ALL {
            let bin = core::mem::take(&mut bins[slot.index()]);
            if bin.is_empty() {
                continue;
            }
            let child = self.construct(bin, slot.quadrant(&bounds), Some(slot), Some(id), builder);
            self.set_child(id, slot, Some(child));
        }
    }

    fn set_child(&mut self, id: NodeId, slot: Slot, child: Option<NodeId>) {
        match &mut self.node_mut(id).contents {
            Contents::Internal(children) => children[slot.index()] = child,
            Contents::Leaf(_) => unreachable!("set_child on a leaf"),
        }
    }

    /// Insert one point below the root without rebalancing anything above the
    /// node it lands in.
    pub(crate) fn insert<B>(&mut self, point: Point, builder: &mut B) -> Insertion
    where
        B: Builder<Group = G>,
    {
        let id = self.descend(point.position);
        let Policy {
            capacity,
            max_depth,
        } = self.policy;
        let node = self.nodes[id.idx()].as_mut().expect("dangling NodeId");
        if !node.bounds.contains_point(point.position) {
            return Insertion::OutOfBounds(point);
        }

        match &mut node.contents {
            Contents::Leaf(points) if points.len() + 1 > capacity && node.depth < max_depth => {
                let mut moved = core::mem::take(points);
                for p in &moved {
                    builder.destroy_primitive(p);
                }
                moved.push(point);
                self.branch(id, moved, builder);
            }
            Contents::Leaf(points) => {
                builder.build_primitive(node.group.as_ref(), &point);
                self.heap.insert(point.id, id);
                points.push(point);
            }
            Contents::Internal(children) => {
                let slot = Slot::containing(&node.bounds, point.position);
                debug_assert!(
                    children[slot.index()].is_none(),
                    "descend stops only at empty slots"
                );
                let bounds = slot.quadrant(&node.bounds);
                tracing::trace!(parent = ?id, ?slot, "new leaf in empty quadrant");
                let child = self.construct(vec![point], bounds, Some(slot), Some(id), builder);
                self.set_child(id, slot, Some(child));
            }
        }
        Insertion::Inserted
    }

    /// Remove the point with `id` from `leaf` and prune what it leaves empty.
    ///
    /// Returns `None` if `leaf` does not hold that point.
    pub(crate) fn remove_from_leaf<B>(
        &mut self,
        leaf: NodeId,
        id: PointId,
        builder: &mut B,
    ) -> Option<Point>
    where
        B: Builder<Group = G>,
    {
        let Contents::Leaf(points) = &mut self.get_mut(leaf)?.contents else {
            return None;
        };
        let pos = points.iter().position(|p| p.id == id)?;
        let removed = points.remove(pos);
        self.finish_removal(leaf, &removed, builder);
        Some(removed)
    }

    /// Remove the first point stored at exactly `position` and prune what it leaves empty.
    pub(crate) fn remove_at<B>(&mut self, position: Vec3, builder: &mut B) -> Option<Point>
    where
        B: Builder<Group = G>,
    {
        let leaf = self.descend(position);
        let Contents::Leaf(points) = &mut self.node_mut(leaf).contents else {
            return None;
        };
        let pos = points.iter().position(|p| p.position == position)?;
        let removed = points.remove(pos);
        self.finish_removal(leaf, &removed, builder);
        Some(removed)
    }

    fn finish_removal<B>(&mut self, leaf: NodeId, removed: &Point, builder: &mut B)
    where
        B: Builder<Group = G>,
    {
        self.heap.remove(&removed.id);
        builder.destroy_primitive(removed);
        self.prune(leaf, builder);
    }

    /// Walk up from `id`, detaching empty leaves until something still has content.
    ///
    /// The root is never detached.
    fn prune<B>(&mut self, mut id: NodeId, builder: &mut B)
    where
        B: Builder<Group = G>,
    {
        loop {
            let node = self.node(id);
            let Some(parent) = node.parent else {
                break;
            };
            if !matches!(&node.contents, Contents::Leaf(points) if points.is_empty()) {
                break;
            }
            let slot = node.slot.expect("non-root node has a slot");
            tracing::trace!(node = ?id, ?parent, ?slot, "pruning empty leaf");

            let detached = self.free(id);
            if let Some(group) = detached.group {
                builder.destroy_group(group);
            }
            self.set_child(parent, slot, None);
            let parent_node = self.node_mut(parent);
            if occupied(&parent_node.contents).is_empty() {
                parent_node.contents = Contents::Leaf(Vec::new());
            }
            id = parent;
        }
    }

    /// Destroy every node, children before parents, and return the root's group.
    ///
    /// Leaves report their points to [`Builder::destroy_primitive`]; every non-root
    /// group goes to [`Builder::destroy_group`]. The tree is left with no nodes.
    pub(crate) fn teardown<B>(&mut self, builder: &mut B) -> Option<G>
    where
        B: Builder<Group = G>,
    {
        let order: Vec<NodeId> = self.nodes().map(|n| n.id()).collect();
        let mut root_group = None;
        for id in order.into_iter().rev() {
            let node = self.free(id);
            if let Contents::Leaf(points) = &node.contents {
                for p in points {
                    builder.destroy_primitive(p);
                }
            }
            match (node.parent, node.group) {
                (Some(_), Some(group)) => builder.destroy_group(group),
                (None, group) => root_group = group,
                (Some(_), None) => {}
            }
        }
        self.heap.clear();
        self.nodes.clear();
        self.generations.clear();
        self.free_list.clear();
        root_group
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<G>> {
        let node = self.nodes.get_mut(id.idx())?.as_mut()?;
        if node.generation != id.1 {
            return None;
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::NoopBuilder;

    fn cube(max: f64) -> Aabb3 {
        Aabb3::new(Vec3::ZERO, Vec3::splat(max))
    }

    fn policy(capacity: usize, max_depth: u32) -> Policy {
        Policy {
            capacity,
            max_depth,
        }
    }

    fn build(points: Vec<Point>, bounds: Aabb3, p: Policy) -> QuadTree<()> {
        QuadTree::build(points, bounds, p, &mut NoopBuilder)
    }

    #[test]
    fn two_corners_make_two_leaves() {
        let tree = build(
            vec![Point::new(1, 0.0, 0.0, 0.0), Point::new(2, 1.0, 1.0, 1.0)],
            cube(1.0),
            policy(1, 2),
        );
        let root = tree.get(tree.root()).unwrap();
        assert_eq!(root.occupied(), Quadrants::SW | Quadrants::NE);

        let leaves: Vec<_> = tree.nodes().filter(|n| n.is_leaf()).collect();
        assert_eq!(leaves.len(), 2);
        for leaf in &leaves {
            assert_eq!(leaf.depth(), 1);
            assert_eq!(leaf.points().unwrap().len(), 1);
        }
        assert_eq!(leaves[0].slot(), Some(Slot::Sw));
        assert_eq!(leaves[1].slot(), Some(Slot::Ne));
    }

    #[test]
    fn max_depth_caps_subdivision() {
        let same: Vec<_> = (0..5).map(|i| Point::new(i, 0.5, 0.5, 0.5)).collect();
        let tree = build(same, cube(1.0), policy(1, 3));
        let deepest = tree.nodes().map(|n| n.depth()).max().unwrap();
        assert_eq!(deepest, 3);
        let leaf = tree.leaf_of(PointId(0)).unwrap();
        assert_eq!(tree.get(leaf).unwrap().points().unwrap().len(), 5);
    }

    #[test]
    fn descend_stops_at_empty_slot() {
        let tree = build(
            vec![Point::new(1, 0.0, 0.0, 0.0), Point::new(2, 1.0, 1.0, 1.0)],
            cube(1.0),
            policy(1, 2),
        );
        assert_eq!(tree.descend(Vec3::new(0.9, 0.1, 0.5)), tree.root());
        let sw = tree.leaf_of(PointId(1)).unwrap();
        assert_eq!(tree.descend(Vec3::new(0.1, 0.1, 0.5)), sw);
    }

    #[test]
    fn locate_follows_containment_and_rejects_outside() {
        // Only SE and NE are occupied; (0.5, 0.1) is on the SW/SE edge.
        let tree = build(
            vec![Point::new(1, 0.75, 0.1, 0.0), Point::new(2, 0.9, 0.9, 0.0)],
            cube(1.0),
            policy(1, 2),
        );
        let se = tree.leaf_of(PointId(1)).unwrap();
        let edge = Vec3::new(0.5, 0.1, 0.5);
        assert_eq!(tree.descend(edge), tree.root(), "first-match slot is empty");
        assert_eq!(tree.locate(edge), Some(se));
        assert_eq!(tree.locate(Vec3::new(0.1, 0.9, 0.5)), Some(tree.root()));
        assert_eq!(tree.locate(Vec3::new(-0.1, 0.1, 0.5)), None);
        assert_eq!(tree.locate(Vec3::new(0.75, 0.1, 2.0)), None);
    }

    #[test]
    fn insert_into_empty_quadrant_leaves_siblings_alone() {
        let mut tree = build(
            vec![Point::new(1, 0.0, 0.0, 0.0), Point::new(2, 1.0, 1.0, 1.0)],
            cube(1.0),
            policy(1, 2),
        );
        let sw = tree.leaf_of(PointId(1)).unwrap();
        let ne = tree.leaf_of(PointId(2)).unwrap();
        assert!(matches!(
            tree.insert(Point::new(3, 0.9, 0.1, 0.0), &mut NoopBuilder),
            Insertion::Inserted
        ));
        let se = tree.leaf_of(PointId(3)).unwrap();
        assert_eq!(tree.get(se).unwrap().slot(), Some(Slot::Se));
        assert_eq!(tree.get(se).unwrap().parent(), Some(tree.root()));
        assert_eq!(tree.leaf_of(PointId(1)), Some(sw));
        assert_eq!(tree.leaf_of(PointId(2)), Some(ne));
    }

    #[test]
    fn insert_outside_is_rejected_unchanged() {
        let mut tree = build(
            vec![Point::new(1, 0.0, 0.0, 0.0), Point::new(2, 8.0, 8.0, 8.0)],
            cube(8.0),
            policy(1, 2),
        );
        let before = tree.node_count();
        let out = tree.insert(Point::new(3, 9.0, 9.0, 9.0), &mut NoopBuilder);
        assert!(matches!(out, Insertion::OutOfBounds(p) if p.id == PointId(3)));
        assert_eq!(tree.node_count(), before);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn remove_prunes_to_first_ancestor_with_content() {
        // Two points deep in SW, one in NE.
        let mut tree = build(
            vec![
                Point::new(1, 0.1, 0.1, 0.0),
                Point::new(2, 0.2, 0.2, 0.0),
                Point::new(3, 0.9, 0.9, 0.0),
            ],
            cube(1.0),
            policy(1, 8),
        );
        let root = tree.root();
        let sw = tree.get(root).unwrap().children().unwrap()[Slot::Sw.index()].unwrap();

        let leaf = tree.leaf_of(PointId(3)).unwrap();
        assert!(tree.remove_from_leaf(leaf, PointId(3), &mut NoopBuilder).is_some());
        assert!(!tree.is_alive(leaf));
        assert_eq!(tree.get(root).unwrap().occupied(), Quadrants::SW);

        let leaf1 = tree.leaf_of(PointId(1)).unwrap();
        tree.remove_from_leaf(leaf1, PointId(1), &mut NoopBuilder);
        assert!(tree.is_alive(sw), "sibling content keeps the chain alive");

        let leaf2 = tree.leaf_of(PointId(2)).unwrap();
        tree.remove_from_leaf(leaf2, PointId(2), &mut NoopBuilder);
        assert!(!tree.is_alive(sw));
        let root_ref = tree.get(root).unwrap();
        assert!(root_ref.is_leaf());
        assert_eq!(root_ref.points(), Some(&[][..]));
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn remove_at_matches_exact_position_only() {
        let mut tree = build(
            vec![Point::new(1, 0.25, 0.25, 0.0), Point::new(2, 0.75, 0.75, 0.0)],
            cube(1.0),
            policy(1, 4),
        );
        assert!(
            tree.remove_at(Vec3::new(0.25, 0.25, 0.5), &mut NoopBuilder)
                .is_none()
        );
        let removed = tree.remove_at(Vec3::new(0.25, 0.25, 0.0), &mut NoopBuilder);
        assert_eq!(removed.map(|p| p.id), Some(PointId(1)));
        assert_eq!(tree.leaf_of(PointId(1)), None);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn freed_slots_are_reused_with_new_generation() {
        let mut tree = build(
            vec![Point::new(1, 0.0, 0.0, 0.0), Point::new(2, 1.0, 1.0, 1.0)],
            cube(1.0),
            policy(1, 2),
        );
        let old = tree.leaf_of(PointId(2)).unwrap();
        tree.remove_from_leaf(old, PointId(2), &mut NoopBuilder);
        tree.insert(Point::new(3, 1.0, 1.0, 1.0), &mut NoopBuilder);
        let new = tree.leaf_of(PointId(3)).unwrap();
        assert!(!tree.is_alive(old));
        assert!(tree.is_alive(new));
        if old.0 == new.0 {
            assert!(new.1 > old.1, "generation must increase on reuse");
        }
    }

    #[test]
    fn slot_path_names_quadrants_from_root() {
        let tree = build(
            vec![Point::new(1, 0.1, 0.1, 0.0), Point::new(2, 0.2, 0.2, 0.0)],
            cube(1.0),
            policy(1, 8),
        );
        let leaf = tree.leaf_of(PointId(2)).unwrap();
        let path = tree.slot_path(leaf);
        assert_eq!(path.len() as u32, tree.get(leaf).unwrap().depth());
        assert!(path.iter().take(2).all(|s| *s == Slot::Sw));
        assert_eq!(tree.path_to_root(leaf).first().copied(), Some(tree.root()));
        assert!(tree.slot_path(tree.root()).is_empty());
    }
}
