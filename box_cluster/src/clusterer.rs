// Copyright 2025 the Box Cluster Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public clusterer API and generic implementation over a pluggable backend.

use core::marker::PhantomData;

use crate::backend::{BackendKind, ClusterBackend};
use crate::backends::flatlist::FlatList;
use crate::backends::rtree::MergingRTree;
use crate::config::ClusterConfig;
use crate::error::ClusterError;
use crate::types::{Aabb3D, Scalar};

/// A box clusterer parameterized by a backend.
///
/// Holds no state besides the backend. Every operation runs to completion on
/// the calling thread; wrap the whole clusterer in a lock if it must be shared.
#[derive(Clone, Debug)]
pub struct ClustererGeneric<T: Scalar, B: ClusterBackend<T>> {
    backend: B,
    _t: PhantomData<T>,
}

/// Default clusterer backed by a [`MergingRTree`].
pub type BoxClusterer<T> = ClustererGeneric<T, MergingRTree<T>>;

/// Clusterer backed by a [`FlatList`], for very small box counts.
pub type FlatClusterer<T> = ClustererGeneric<T, FlatList<T>>;

impl<T, B> Default for ClustererGeneric<T, B>
where
    T: Scalar,
    B: ClusterBackend<T> + Default,
{
    fn default() -> Self {
        Self::with_backend(B::default())
    }
}

impl<T, B> ClustererGeneric<T, B>
where
    T: Scalar,
    B: ClusterBackend<T> + Default,
{
    /// Create an empty clusterer using the backend's default constructor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a clusterer from a batch of boxes. Fails like [`Self::add_boxes`].
    pub fn from_boxes<I>(boxes: I) -> Result<Self, ClusterError>
    where
        I: IntoIterator<Item = Aabb3D<T>>,
    {
        let mut out = Self::new();
        out.add_boxes(boxes)?;
        Ok(out)
    }
}

impl<T: Scalar> ClustererGeneric<T, MergingRTree<T>> {
    /// Create an empty R-tree clusterer with custom shape parameters.
    pub fn with_config(config: ClusterConfig) -> Self {
        Self::with_backend(MergingRTree::with_config(config))
    }
}

impl<T, B> ClustererGeneric<T, B>
where
    T: Scalar,
    B: ClusterBackend<T>,
{
    /// Wrap an existing backend.
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            _t: PhantomData,
        }
    }

    /// The backend, for backend-specific inspection.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Which backend implementation this clusterer uses.
    pub fn kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Validate and insert each box in order.
    ///
    /// Stops at the first malformed box with [`ClusterError::InvalidBox`].
    /// Boxes before it in the same call stay inserted; nothing is rolled back.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, name = "clusterer::add_boxes")
    )]
    pub fn add_boxes<I>(&mut self, boxes: I) -> Result<(), ClusterError>
    where
        I: IntoIterator<Item = Aabb3D<T>>,
    {
        for aabb in boxes {
            if let Err(err) = aabb.validate() {
                #[cfg(feature = "tracing")]
                tracing::warn!(%err, inserted = self.backend.len(), "rejected box");
                return Err(err);
            }
            self.backend.insert(aabb);
        }
        Ok(())
    }

    /// Lazily enumerate every stored raw box.
    ///
    /// Each call starts a fresh traversal, independent of any earlier,
    /// partially consumed one.
    pub fn boxes(&self) -> impl Iterator<Item = Aabb3D<T>> + '_ {
        self.backend.boxes()
    }

    /// Lazily enumerate the bounds of each cluster.
    pub fn clusters(&self) -> impl Iterator<Item = Aabb3D<T>> + '_ {
        self.backend.clusters()
    }

    /// Whether any stored box intersects `query`. Touching counts.
    pub fn intersects_box(&self, query: &Aabb3D<T>) -> bool {
        debug_assert!(query.is_valid(), "query boxes must be well-formed");
        self.backend.intersects_box(query)
    }

    /// Stored boxes intersecting `query`.
    pub fn query_box(&self, query: Aabb3D<T>) -> impl Iterator<Item = Aabb3D<T>> + '_ {
        debug_assert!(query.is_valid(), "query boxes must be well-formed");
        self.backend.query_box(query)
    }

    /// Whether any stored box contains the point.
    pub fn contains_point(&self, x: T, y: T, z: T) -> bool {
        self.backend.contains_point(x, y, z)
    }

    /// Whether a single stored box fully contains `query`.
    pub fn contains_box(&self, query: &Aabb3D<T>) -> bool {
        self.backend.contains_box(query)
    }

    /// Number of raw boxes stored (not clusters or nodes).
    pub fn box_count(&self) -> usize {
        self.backend.len()
    }

    /// Whether no boxes are stored.
    pub fn is_empty(&self) -> bool {
        self.backend.is_empty()
    }

    /// Union of every stored box, or `None` when empty.
    pub fn bounds(&self) -> Option<Aabb3D<T>> {
        self.backend.bounds()
    }

    /// Remove every box.
    pub fn clear(&mut self) {
        self.backend.clear();
    }

    /// A new clusterer with the boxes of `self` followed by those of `other`.
    ///
    /// This is a union of styled regions: identical boxes are not merged, so
    /// `a.union(&b).box_count() == a.box_count() + b.box_count()`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, name = "clusterer::union")
    )]
    pub fn union(&self, other: &Self) -> Self {
        Self::with_backend(self.backend.union(&other.backend))
    }

    /// A new clusterer with the boxes of `self` that intersect any box of
    /// `other`. Kept boxes are not clipped.
    ///
    /// The operation is asymmetric: swapping the operands keeps boxes from the
    /// other side, so the box counts can differ.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, name = "clusterer::intersection")
    )]
    pub fn intersection(&self, other: &Self) -> Self {
        Self::with_backend(self.backend.intersection(&other.backend))
    }
}
