// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadtree basics.
//!
//! Build a tree over a few points, look them up, grow the bounds, and delete.
//!
//! Run:
//! - `cargo run -p quadrant_demos --example quadtree_basics`

use kurbo::Point as Point2;
use quadrant_tree::{Accelerator, Point, PointId, TreeConfig};

fn main() {
    let points = vec![
        Point::new(1, 0.0, 0.0, 0.0),
        Point::new(2, 10.0, 10.0, 2.0),
        Point::new(3, 2.0, 8.0, 1.0),
        Point::new(4, 7.5, 1.5, 0.5),
    ];
    let mut acc = Accelerator::new(points, TreeConfig::default()).unwrap();
    println!("bounds: {:?}, max depth {}", acc.bounds(), acc.max_depth());

    for node in acc.nodes() {
        let indent = "  ".repeat(node.depth() as usize);
        match node.points() {
            Some(points) => println!("{indent}{:?} leaf {:?}", node.slot(), points),
            None => println!("{indent}{:?} internal", node.slot()),
        }
    }

    // The planar lookup ignores z.
    let hit = acc.find_by_position(Point2::new(2.1, 7.9), 0.5);
    println!("near (2.1, 7.9): {hit:?}");
    assert_eq!(hit.map(|p| p.id), Some(PointId(3)));

    // Out of bounds: the tree is rebuilt around the new point.
    acc.add_point(Point::new(5, 20.0, -5.0, 3.0));
    println!("bounds after growth: {:?}", acc.bounds());

    assert!(acc.delete_by_id(PointId(2)));
    assert!(acc.find_by_id(PointId(2)).is_none());
    assert_eq!(acc.check_invariants(), None);
    println!("{} points remain", acc.len());
}
