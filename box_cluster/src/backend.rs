// Copyright 2025 the Box Cluster Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend trait for box clustering implementations.

use alloc::boxed::Box;
use core::fmt;

use crate::types::{Aabb3D, Scalar};

/// Identifies a backend implementation at runtime.
///
/// Used by [`BoxSet`](crate::BoxSet) to refuse set operations that mix backends.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// [`MergingRTree`](crate::MergingRTree).
    MergingRTree,
    /// [`FlatList`](crate::FlatList).
    FlatList,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MergingRTree => "merging r-tree",
            Self::FlatList => "flat list",
        })
    }
}

/// Storage and query strategy used by `ClustererGeneric`.
///
/// Backends store raw boxes exactly as given; they never clip or merge the
/// boxes themselves. Clustering only affects [`clusters`](Self::clusters) and
/// how queries are pruned.
pub trait ClusterBackend<T: Scalar> {
    /// Which implementation this is.
    fn kind(&self) -> BackendKind;

    /// An empty backend with the same configuration.
    fn new_empty(&self) -> Self
    where
        Self: Sized;

    /// Insert one raw box. The box must already be validated.
    fn insert(&mut self, aabb: Aabb3D<T>);

    /// Remove every box.
    fn clear(&mut self);

    /// Number of raw boxes stored.
    fn len(&self) -> usize;

    /// Whether no boxes are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Union of every stored box, or `None` when empty.
    fn bounds(&self) -> Option<Aabb3D<T>>;

    /// Every stored raw box. Each call starts a fresh traversal.
    fn boxes<'a>(&'a self) -> Box<dyn Iterator<Item = Aabb3D<T>> + 'a>;

    /// Bounds of each leaf-level cluster.
    fn clusters<'a>(&'a self) -> Box<dyn Iterator<Item = Aabb3D<T>> + 'a>;

    /// Whether any stored box intersects `query` (boundary-inclusive).
    fn intersects_box(&self, query: &Aabb3D<T>) -> bool;

    /// Stored boxes intersecting `query`.
    fn query_box<'a>(&'a self, query: Aabb3D<T>) -> Box<dyn Iterator<Item = Aabb3D<T>> + 'a>;

    /// Whether any stored box contains the point.
    fn contains_point(&self, x: T, y: T, z: T) -> bool {
        self.intersects_box(&Aabb3D::from_point(x, y, z))
    }

    /// Whether a single stored box fully contains `query`.
    fn contains_box(&self, query: &Aabb3D<T>) -> bool {
        self.query_box(*query).any(|b| b.contains(query))
    }

    /// A new backend holding every box of `self`, then every box of `other`.
    ///
    /// This is the union of styled regions, not a geometric union: boxes are
    /// not deduplicated, so the result holds `self.len() + other.len()` boxes.
    fn union(&self, other: &Self) -> Self
    where
        Self: Sized,
    {
        let mut out = self.new_empty();
        for b in self.boxes().chain(other.boxes()) {
            out.insert(b);
        }
        out
    }

    /// A new backend holding the boxes of `self` that intersect anything in
    /// `other`, unclipped.
    ///
    /// Asymmetric: `a.intersection(&b)` keeps boxes of `a`, while
    /// `b.intersection(&a)` keeps boxes of `b`, so the counts may differ.
    fn intersection(&self, other: &Self) -> Self
    where
        Self: Sized,
    {
        let mut out = self.new_empty();
        for b in self.boxes().filter(|b| other.intersects_box(b)) {
            out.insert(b);
        }
        out
    }
}
