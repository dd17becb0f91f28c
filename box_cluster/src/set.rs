// Copyright 2025 the Box Cluster Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Object-safe clusterer contract for consumers that must not name a backend.
//!
//! A style-override manager can hold `Box<dyn BoxSet<f32>>` and switch between
//! [`BoxClusterer`](crate::BoxClusterer) and [`FlatClusterer`](crate::FlatClusterer)
//! without changing its own code.

use alloc::boxed::Box;

use crate::backend::{BackendKind, ClusterBackend};
use crate::clusterer::ClustererGeneric;
use crate::error::ClusterError;
use crate::types::{Aabb3D, Scalar};

/// The clusterer operations, usable through `dyn`.
///
/// Set operations only combine operands with the same [`BackendKind`] and
/// return [`ClusterError::TypeMismatch`] otherwise. The result uses the
/// backend and configuration of `self`.
pub trait BoxSet<T: Scalar> {
    /// Backend of this set.
    fn backend_kind(&self) -> BackendKind;

    /// Validate and insert boxes in order; see
    /// [`ClustererGeneric::add_boxes`] for partial-failure behavior.
    fn add_boxes(&mut self, boxes: &mut dyn Iterator<Item = Aabb3D<T>>)
    -> Result<(), ClusterError>;

    /// Lazily enumerate every stored raw box.
    fn boxes(&self) -> Box<dyn Iterator<Item = Aabb3D<T>> + '_>;

    /// Whether any stored box intersects `query`.
    fn intersects_box(&self, query: &Aabb3D<T>) -> bool;

    /// Number of raw boxes stored.
    fn box_count(&self) -> usize;

    /// Union of styled regions; see [`ClustererGeneric::union`].
    fn union(&self, other: &dyn BoxSet<T>) -> Result<Box<dyn BoxSet<T>>, ClusterError>;

    /// Boxes of `self` overlapping `other`; see [`ClustererGeneric::intersection`].
    fn intersection(&self, other: &dyn BoxSet<T>) -> Result<Box<dyn BoxSet<T>>, ClusterError>;
}

fn check_kind(expected: BackendKind, found: BackendKind) -> Result<(), ClusterError> {
    if expected != found {
        #[cfg(feature = "tracing")]
        tracing::warn!(%expected, %found, "refused set operation across backends");
        return Err(ClusterError::TypeMismatch { expected, found });
    }
    Ok(())
}

impl<T, B> BoxSet<T> for ClustererGeneric<T, B>
where
    T: Scalar + 'static,
    B: ClusterBackend<T> + 'static,
{
    fn backend_kind(&self) -> BackendKind {
        self.kind()
    }

    fn add_boxes(
        &mut self,
        boxes: &mut dyn Iterator<Item = Aabb3D<T>>,
    ) -> Result<(), ClusterError> {
        Self::add_boxes(self, boxes)
    }

    fn boxes(&self) -> Box<dyn Iterator<Item = Aabb3D<T>> + '_> {
        self.backend().boxes()
    }

    fn intersects_box(&self, query: &Aabb3D<T>) -> bool {
        Self::intersects_box(self, query)
    }

    fn box_count(&self) -> usize {
        Self::box_count(self)
    }

    fn union(&self, other: &dyn BoxSet<T>) -> Result<Box<dyn BoxSet<T>>, ClusterError> {
        check_kind(self.kind(), other.backend_kind())?;
        let mut out = Self::with_backend(self.backend().new_empty());
        Self::add_boxes(&mut out, self.backend().boxes().chain(other.boxes()))?;
        Ok(Box::new(out))
    }

    fn intersection(&self, other: &dyn BoxSet<T>) -> Result<Box<dyn BoxSet<T>>, ClusterError> {
        check_kind(self.kind(), other.backend_kind())?;
        let mut out = Self::with_backend(self.backend().new_empty());
        Self::add_boxes(
            &mut out,
            self.backend().boxes().filter(|b| other.intersects_box(b)),
        )?;
        Ok(Box::new(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clusterer::{BoxClusterer, FlatClusterer};
    use alloc::vec::Vec;

    fn cube(lo: f32, hi: f32) -> Aabb3D<f32> {
        Aabb3D::new(lo, lo, lo, hi, hi, hi)
    }

    fn styled(flat: bool) -> Box<dyn BoxSet<f32>> {
        if flat {
            Box::new(FlatClusterer::<f32>::new())
        } else {
            Box::new(BoxClusterer::<f32>::new())
        }
    }

    #[test]
    fn consumers_are_backend_agnostic() {
        for flat in [false, true] {
            let mut set = styled(flat);
            set.add_boxes(&mut [cube(0.0, 1.0), cube(3.0, 4.0)].into_iter())
                .unwrap();
            assert_eq!(set.box_count(), 2);
            assert!(set.intersects_box(&cube(3.5, 5.0)));
            assert!(!set.intersects_box(&cube(1.5, 2.5)));
            assert_eq!(set.boxes().count(), 2);
        }
    }

    #[test]
    fn same_backend_set_operations() {
        let mut a = styled(false);
        let mut b = styled(false);
        a.add_boxes(&mut [cube(0.0, 1.0), cube(0.2, 0.4), cube(9.0, 10.0)].into_iter())
            .unwrap();
        b.add_boxes(&mut [cube(-1.0, 2.0)].into_iter()).unwrap();

        let u = a.union(b.as_ref()).unwrap();
        assert_eq!(u.box_count(), 4);
        assert_eq!(u.backend_kind(), BackendKind::MergingRTree);

        let ab = a.intersection(b.as_ref()).unwrap();
        let ba = b.intersection(a.as_ref()).unwrap();
        assert_eq!(ab.box_count(), 2);
        assert_eq!(ba.box_count(), 1);
        let kept: Vec<_> = ab.boxes().collect();
        assert!(kept.contains(&cube(0.0, 1.0)) && kept.contains(&cube(0.2, 0.4)));
    }

    #[test]
    fn mixing_backends_is_refused() {
        let mut tree = styled(false);
        let mut flat = styled(true);
        tree.add_boxes(&mut core::iter::once(cube(0.0, 1.0))).unwrap();
        flat.add_boxes(&mut core::iter::once(cube(0.0, 1.0))).unwrap();

        let err = tree.union(flat.as_ref()).err().unwrap();
        assert_eq!(
            err,
            ClusterError::TypeMismatch {
                expected: BackendKind::MergingRTree,
                found: BackendKind::FlatList,
            }
        );
        assert!(matches!(
            flat.intersection(tree.as_ref()),
            Err(ClusterError::TypeMismatch {
                expected: BackendKind::FlatList,
                found: BackendKind::MergingRTree,
            })
        ));
        // Neither operand was touched.
        assert_eq!(tree.box_count(), 1);
        assert_eq!(flat.box_count(), 1);
    }

    #[test]
    fn dyn_add_boxes_reports_invalid_box() {
        let mut set = styled(true);
        let err = set
            .add_boxes(&mut [cube(0.0, 1.0), Aabb3D::new(0.0, 0.0, 2.0, 1.0, 1.0, 1.0)].into_iter())
            .unwrap_err();
        assert!(matches!(err, ClusterError::InvalidBox { .. }));
        assert_eq!(set.box_count(), 1);
    }
}
