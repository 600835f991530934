// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Builder lifecycle.
//!
//! Mirror the tree into a toy scene graph and watch the hooks fire. Structural
//! events are also logged through `tracing`.
//!
//! Run:
//! - `RUST_LOG=quadrant_tree=trace cargo run -p quadrant_demos --example builder_lifecycle`

use std::collections::HashMap;

use quadrant_geometry::{Aabb3, Vec3};
use quadrant_tree::{Accelerator, Builder, Point, PointId, TreeConfig};
use tracing_subscriber::EnvFilter;

/// A scene graph with numbered groups and one marker per point.
#[derive(Default)]
struct Scene {
    next: u32,
    groups: HashMap<u32, Option<u32>>,
    markers: HashMap<PointId, Option<u32>>,
}

impl Builder for Scene {
    type Group = u32;

    fn build_group(&mut self, parent: Option<&u32>, bounds: &Aabb3) -> u32 {
        let id = self.next;
        self.next += 1;
        self.groups.insert(id, parent.copied());
        tracing::info!(group = id, ?parent, ?bounds, "group built");
        id
    }

    fn build_primitive(&mut self, group: Option<&u32>, point: &Point) {
        self.markers.insert(point.id, group.copied());
        tracing::info!(point = ?point.id, ?group, "marker built");
    }

    fn destroy_primitive(&mut self, point: &Point) {
        self.markers.remove(&point.id);
        tracing::info!(point = ?point.id, "marker destroyed");
    }

    fn destroy_group(&mut self, group: u32) {
        self.groups.remove(&group);
        tracing::info!(group, "group destroyed");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let bounds = Aabb3::new(Vec3::ZERO, Vec3::new(8.0, 8.0, 1.0));
    let config = TreeConfig::default().with_max_depth(4);
    let mut acc = Accelerator::with_bounds(bounds, config, Scene::default()).unwrap();

    for (i, (x, y)) in [(1.0, 1.0), (6.0, 6.0), (1.5, 6.5), (6.5, 1.0), (1.2, 1.8)]
        .into_iter()
        .enumerate()
    {
        acc.add_point(Point::new(i as u64, x, y, 0.5));
    }
    println!(
        "{} groups, {} markers after inserts",
        acc.builder().groups.len(),
        acc.builder().markers.len()
    );

    acc.delete_by_id(PointId(4));
    acc.delete_point(Vec3::new(6.0, 6.0, 0.5));
    println!(
        "{} groups, {} markers after deletes",
        acc.builder().groups.len(),
        acc.builder().markers.len()
    );

    let (scene, root) = acc.destroy();
    println!("root group returned: {root:?}");
    assert!(scene.markers.is_empty());
    assert_eq!(scene.groups.len(), usize::from(root.is_some()));
}
