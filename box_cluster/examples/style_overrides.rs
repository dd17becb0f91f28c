// Copyright 2025 the Box Cluster Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style overrides over a large object set, using glam for object placement.
//!
//! Each styled object contributes one box; the render side only sees the
//! clusters and asks whether the camera's box touches the style at all.
//!
//! Run:
//! - `cargo run -p box_cluster --example style_overrides --features glam`

use box_cluster::{Aabb3D, BoxClusterer, BoxSet, FlatClusterer};
use glam::Vec3;

/// Boxes of a grid of pipes along x, like a plant section.
fn pipe_boxes(rows: u16, cols: u16) -> Vec<Aabb3D<f32>> {
    let half = Vec3::new(0.9, 0.15, 0.15);
    let mut out = Vec::with_capacity(usize::from(rows) * usize::from(cols));
    for r in 0..rows {
        for c in 0..cols {
            let center = Vec3::new(f32::from(c) * 2.0, f32::from(r) * 0.5, 0.0);
            out.push(Aabb3D::<f32>::from_corners(center - half, center + half));
        }
    }
    out
}

fn main() {
    let boxes = pipe_boxes(40, 50);

    let mut ghosted = BoxClusterer::<f32>::new();
    ghosted
        .add_boxes(boxes.iter().copied())
        .expect("pipe boxes are well-formed");
    println!(
        "{} styled objects in {} clusters (depth {})",
        ghosted.box_count(),
        ghosted.clusters().count(),
        ghosted.backend().depth()
    );

    if let Some(bounds) = ghosted.bounds() {
        println!(
            "style bounds: {} .. {}",
            bounds.min_corner(),
            bounds.max_corner()
        );
    }

    let camera = Aabb3D::<f32>::from_corners(Vec3::new(10.0, 2.0, -1.0), Vec3::new(14.0, 4.0, 1.0));
    println!(
        "camera sees style: {} ({} objects)",
        ghosted.intersects_box(&camera),
        ghosted.query_box(camera).count()
    );

    // A small selection can live in the flat backend behind the same contract.
    let mut selected: Box<dyn BoxSet<f32>> = Box::new(FlatClusterer::<f32>::new());
    selected
        .add_boxes(&mut boxes.iter().copied().take(3))
        .expect("pipe boxes are well-formed");
    match selected.union(&ghosted) {
        Ok(all) => println!("merged {} boxes", all.box_count()),
        Err(err) => println!("cannot merge: {err}"),
    }
}
