// Copyright 2025 the Box Cluster Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat list backend with linear scans. Small and simple; good for tiny sets.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::{BackendKind, ClusterBackend};
use crate::types::{Aabb3D, Scalar, union_aabb};

/// Flat list backend: every box is its own cluster.
#[derive(Clone)]
pub struct FlatList<T: Scalar> {
    entries: Vec<Aabb3D<T>>,
}

impl<T: Scalar> Default for FlatList<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: Scalar> Debug for FlatList<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlatList")
            .field("boxes", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl<T: Scalar> ClusterBackend<T> for FlatList<T> {
    fn kind(&self) -> BackendKind {
        BackendKind::FlatList
    }

    fn new_empty(&self) -> Self {
        Self::default()
    }

    fn insert(&mut self, aabb: Aabb3D<T>) {
        debug_assert!(aabb.is_valid(), "backends only accept validated boxes");
        self.entries.push(aabb);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn bounds(&self) -> Option<Aabb3D<T>> {
        let mut it = self.entries.iter().copied();
        let first = it.next()?;
        Some(it.fold(first, union_aabb))
    }

    fn boxes<'a>(&'a self) -> Box<dyn Iterator<Item = Aabb3D<T>> + 'a> {
        Box::new(self.entries.iter().copied())
    }

    fn clusters<'a>(&'a self) -> Box<dyn Iterator<Item = Aabb3D<T>> + 'a> {
        self.boxes()
    }

    fn intersects_box(&self, query: &Aabb3D<T>) -> bool {
        self.entries.iter().any(|b| b.intersects(query))
    }

    fn query_box<'a>(&'a self, query: Aabb3D<T>) -> Box<dyn Iterator<Item = Aabb3D<T>> + 'a> {
        Box::new(
            self.entries
                .iter()
                .copied()
                .filter(move |b| b.intersects(&query)),
        )
    }
}
