// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lazy depth-first traversal over nodes and points.
//!
//! Both iterators borrow the tree, so the borrow checker rules out mutation while
//! a traversal is in progress.

use alloc::vec;
use alloc::vec::Vec;

use crate::tree::{Contents, NodeRef, QuadTree};
use crate::types::{NodeId, Point, Slot};

/// Pre-order iterator over nodes; children are visited in [`Slot::ALL`] order.
#[derive(Debug)]
pub struct Nodes<'a, G> {
    tree: &'a QuadTree<G>,
    stack: Vec<NodeId>,
}

impl<'a, G> Nodes<'a, G> {
    pub(crate) fn new(tree: &'a QuadTree<G>, start: NodeId) -> Self {
        let stack = if tree.is_alive(start) {
            vec![start]
        } else {
            Vec::new()
        };
        Self { tree, stack }
    }
}

impl<'a, G> Iterator for Nodes<'a, G> {
    type Item = NodeRef<'a, G>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        if let Contents::Internal(children) = &self.tree.node(id).contents {
            // Reversed so the south-west child is popped first.
            self.stack
                .extend(Slot::ALL.into_iter().rev().filter_map(|s| children[s.index()]));
        }
        self.tree.get(id)
    }
}

/// Iterator over stored points, leaf by leaf in [`Nodes`] order.
#[derive(Debug)]
pub struct Points<'a, G> {
    nodes: Nodes<'a, G>,
    current: core::slice::Iter<'a, Point>,
}

impl<'a, G> Points<'a, G> {
    pub(crate) fn new(tree: &'a QuadTree<G>, start: NodeId) -> Self {
        Self {
            nodes: Nodes::new(tree, start),
            current: [].iter(),
        }
    }
}

impl<'a, G> Iterator for Points<'a, G> {
    type Item = &'a Point;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(p) = self.current.next() {
                return Some(p);
            }
            let node = self.nodes.next()?;
            if let Some(points) = node.points() {
                self.current = points.iter();
            }
        }
    }
}
