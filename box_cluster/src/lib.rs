// Copyright 2025 the Box Cluster Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Box Cluster: 3D AABB clustering for styled object sets.
//!
//! A scene viewer that applies a shared style (visibility, color, selection
//! highlight) to thousands of objects should not track one bounding volume per
//! object. Box Cluster absorbs the objects' boxes into a merging R-tree whose
//! leaves act as cluster boxes, trading a bounded over-approximation for far
//! fewer regions to store, combine, and test against frustums or pick rays.
//!
//! - Add boxes in batches with [`ClustererGeneric::add_boxes`]; malformed boxes are rejected, never normalized.
//! - Ask whether anything overlaps a query box with [`ClustererGeneric::intersects_box`].
//! - Enumerate the original boxes lazily with [`ClustererGeneric::boxes`], or the merged regions with [`ClustererGeneric::clusters`].
//! - Combine styled sets with [`ClustererGeneric::union`] and [`ClustererGeneric::intersection`].
//!
//! It is generic over the scalar type `T` (`f32` or `f64`); volumes and
//! enlargement costs are always computed in `f64`.
//!
//! # Example
//!
//! ```rust
//! use box_cluster::{Aabb3D, BoxClusterer, ClusterConfig};
//!
//! let cfg = ClusterConfig::with_max_leaf_boxes(2).unwrap();
//! let mut styled: BoxClusterer<f64> = BoxClusterer::with_config(cfg);
//! styled
//!     .add_boxes([
//!         Aabb3D::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0),
//!         Aabb3D::new(5.0, 5.0, 5.0, 6.0, 6.0, 6.0),
//!         Aabb3D::new(0.5, 0.5, 0.5, 1.5, 1.5, 1.5),
//!     ])
//!     .unwrap();
//!
//! assert_eq!(styled.box_count(), 3);
//! assert!(styled.intersects_box(&Aabb3D::new(0.8, 0.8, 0.8, 0.9, 0.9, 0.9)));
//! assert!(!styled.intersects_box(&Aabb3D::new(10.0, 10.0, 10.0, 11.0, 11.0, 11.0)));
//!
//! // The two overlapping boxes share a cluster.
//! assert_eq!(styled.clusters().count(), 2);
//! ```
//!
//! Malformed boxes stop the batch but keep what came before:
//!
//! ```rust
//! use box_cluster::{Aabb3D, BoxClusterer, ClusterError};
//!
//! let mut styled = BoxClusterer::<f32>::new();
//! let result = styled.add_boxes([
//!     Aabb3D::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0),
//!     Aabb3D::new(1.0, 0.0, 0.0, 0.0, 1.0, 1.0),
//! ]);
//! assert!(matches!(result, Err(ClusterError::InvalidBox { .. })));
//! assert_eq!(styled.box_count(), 1);
//! ```
//!
//! ## Choosing a backend
//!
//! - `MergingRTree` (default, [`BoxClusterer`]): clusters boxes by least volume
//!   enlargement and prunes queries cluster by cluster.
//! - `FlatList` ([`FlatClusterer`]): linear scans; every box is its own cluster.
//!   Good for very small sets.
//!
//! Consumers that must not depend on the backend can hold a `Box<dyn BoxSet<T>>`.
//! See the [`backends`] docs for the insertion and split heuristics.
//!
//! ### Set semantics
//!
//! `union` keeps every box of both operands, duplicates included. `intersection`
//! keeps the boxes of the left operand that overlap anything in the right one,
//! unclipped, so it is not symmetric.
//!
//! ### Float semantics
//!
//! NaN coordinates make a box malformed. Intersection and containment tests are
//! boundary-inclusive: boxes that touch intersect.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod backend;
pub mod backends;
pub mod clusterer;
pub mod config;
pub mod error;
pub mod set;
pub mod types;

pub use backend::{BackendKind, ClusterBackend};
pub use backends::flatlist::FlatList;
pub use backends::rtree::{ClusterNode, MergingRTree, NodeId, NodeKind};
pub use clusterer::{BoxClusterer, ClustererGeneric, FlatClusterer};
pub use config::ClusterConfig;
pub use error::ClusterError;
pub use set::BoxSet;
pub use types::{Aabb3D, Axis};
