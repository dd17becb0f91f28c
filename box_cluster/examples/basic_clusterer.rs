// Copyright 2025 the Box Cluster Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Box Cluster: add boxes, query, enumerate clusters, combine sets.
//!
//! Run:
//! - `cargo run -p box_cluster --example basic_clusterer`

use box_cluster::{Aabb3D, BoxClusterer, ClusterConfig};

fn main() {
    let cfg = ClusterConfig::with_max_leaf_boxes(2).expect("valid leaf capacity");
    let mut red: BoxClusterer<f64> = BoxClusterer::with_config(cfg);
    red.add_boxes([
        Aabb3D::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0),
        Aabb3D::new(5.0, 5.0, 5.0, 6.0, 6.0, 6.0),
        Aabb3D::new(0.5, 0.5, 0.5, 1.5, 1.5, 1.5),
    ])
    .expect("well-formed boxes");

    println!("boxes: {}", red.box_count());
    for cluster in red.clusters() {
        println!("cluster: {:?}", cluster);
    }

    let probe = Aabb3D::new(0.8, 0.8, 0.8, 0.9, 0.9, 0.9);
    println!("probe hits: {}", red.intersects_box(&probe));

    // Malformed input is rejected, not repaired.
    if let Err(err) = red.add_boxes([Aabb3D::new(1.0, 0.0, 0.0, 0.0, 1.0, 1.0)]) {
        println!("rejected: {err}");
    }

    let mut blue = BoxClusterer::with_config(cfg);
    blue.add_boxes([Aabb3D::new(-1.0, -1.0, -1.0, 2.0, 2.0, 2.0)])
        .expect("well-formed boxes");

    let both = red.union(&blue);
    let red_in_blue = red.intersection(&blue);
    let blue_in_red = blue.intersection(&red);
    println!(
        "union={} red∩blue={} blue∩red={}",
        both.box_count(),
        red_in_blue.box_count(),
        blue_in_red.box_count()
    );
}
