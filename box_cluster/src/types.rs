// Copyright 2025 the Box Cluster Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::cmp::Ordering;
use core::fmt::{self, Debug};

use crate::error::ClusterError;

/// A coordinate axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The x axis.
    X,
    /// The y axis.
    Y,
    /// The z axis.
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        })
    }
}

/// Axis-aligned bounding box in 3D.
///
/// A box is well-formed when `min <= max` holds on every axis. Flat boxes (zero
/// extent on one or more axes) are well-formed and have zero volume.
///
/// [`Aabb3D::new`] does not check its arguments. Use [`Aabb3D::try_new`] or
/// [`Aabb3D::validate`] when the corners come from untrusted geometry; the
/// clusterers validate every box they are given and never normalize a
/// malformed one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3D<T> {
    /// Minimum x
    pub min_x: T,
    /// Minimum y
    pub min_y: T,
    /// Minimum z
    pub min_z: T,
    /// Maximum x
    pub max_x: T,
    /// Maximum y
    pub max_y: T,
    /// Maximum z
    pub max_z: T,
}

impl<T> Aabb3D<T> {
    /// Create a new AABB from min/max corners without validation.
    pub const fn new(min_x: T, min_y: T, min_z: T, max_x: T, max_y: T, max_z: T) -> Self {
        Self {
            min_x,
            min_y,
            min_z,
            max_x,
            max_y,
            max_z,
        }
    }
}

impl<T: Scalar> Aabb3D<T> {
    /// Create a new AABB, failing if any `min` component exceeds its `max`.
    pub fn try_new(
        min_x: T,
        min_y: T,
        min_z: T,
        max_x: T,
        max_y: T,
        max_z: T,
    ) -> Result<Self, ClusterError> {
        let aabb = Self::new(min_x, min_y, min_z, max_x, max_y, max_z);
        aabb.validate()?;
        Ok(aabb)
    }

    /// A degenerate box covering a single point.
    pub const fn from_point(x: T, y: T, z: T) -> Self {
        Self::new(x, y, z, x, y, z)
    }

    /// Create an AABB from its minimum corner and a size along each axis.
    pub fn from_origin_size(x: T, y: T, z: T, w: T, h: T, d: T) -> Self {
        Self::new(x, y, z, T::add(x, w), T::add(y, h), T::add(z, d))
    }

    /// Check that `min <= max` on every axis.
    ///
    /// NaN coordinates compare unordered and are reported as malformed.
    pub fn validate(&self) -> Result<(), ClusterError> {
        let axes = [
            (Axis::X, self.min_x, self.max_x),
            (Axis::Y, self.min_y, self.max_y),
            (Axis::Z, self.min_z, self.max_z),
        ];
        for (axis, min, max) in axes {
            if !le(min, max) {
                return Err(ClusterError::InvalidBox {
                    axis,
                    min: T::widen(min),
                    max: T::widen(max),
                });
            }
        }
        Ok(())
    }

    /// Whether the box is well-formed.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Whether this AABB contains the point. Boundary points are contained.
    pub fn contains_point(&self, x: T, y: T, z: T) -> bool {
        le(self.min_x, x)
            && le(self.min_y, y)
            && le(self.min_z, z)
            && le(x, self.max_x)
            && le(y, self.max_y)
            && le(z, self.max_z)
    }

    /// Whether `other` lies entirely inside this AABB (shared faces allowed).
    pub fn contains(&self, other: &Self) -> bool {
        le(self.min_x, other.min_x)
            && le(self.min_y, other.min_y)
            && le(self.min_z, other.min_z)
            && le(other.max_x, self.max_x)
            && le(other.max_y, self.max_y)
            && le(other.max_z, self.max_z)
    }

    /// Whether the two boxes overlap on all three axes.
    ///
    /// Intersection is boundary-inclusive: boxes that only touch at a face, an
    /// edge, or a corner intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        le(self.min_x, other.max_x)
            && le(other.min_x, self.max_x)
            && le(self.min_y, other.max_y)
            && le(other.min_y, self.max_y)
            && le(self.min_z, other.max_z)
            && le(other.min_z, self.max_z)
    }

    /// The overlap region of two AABBs, or `None` if they do not intersect.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }
        Some(Self {
            min_x: max_t(self.min_x, other.min_x),
            min_y: max_t(self.min_y, other.min_y),
            min_z: max_t(self.min_z, other.min_z),
            max_x: min_t(self.max_x, other.max_x),
            max_y: min_t(self.max_y, other.max_y),
            max_z: min_t(self.max_z, other.max_z),
        })
    }

    /// Smallest AABB containing both boxes.
    pub fn union(&self, other: &Self) -> Self {
        union_aabb(*self, *other)
    }

    /// Volume of the box, in the widened `f64` metric.
    pub fn volume(&self) -> f64 {
        volume(self)
    }

    /// How much this box's volume grows if it is enlarged to include `other`.
    pub fn enlargement_to_include(&self, other: &Self) -> f64 {
        enlargement(self, other)
    }
}

#[cfg(feature = "glam")]
impl Aabb3D<f32> {
    /// Create an AABB from glam corners without validation.
    pub fn from_corners(min: glam::Vec3, max: glam::Vec3) -> Self {
        Self::new(min.x, min.y, min.z, max.x, max.y, max.z)
    }

    /// The minimum corner.
    pub fn min_corner(&self) -> glam::Vec3 {
        glam::Vec3::new(self.min_x, self.min_y, self.min_z)
    }

    /// The maximum corner.
    pub fn max_corner(&self) -> glam::Vec3 {
        glam::Vec3::new(self.max_x, self.max_y, self.max_z)
    }
}

#[cfg(feature = "glam")]
impl Aabb3D<f64> {
    /// Create an AABB from glam corners without validation.
    pub fn from_corners(min: glam::DVec3, max: glam::DVec3) -> Self {
        Self::new(min.x, min.y, min.z, max.x, max.y, max.z)
    }

    /// The minimum corner.
    pub fn min_corner(&self) -> glam::DVec3 {
        glam::DVec3::new(self.min_x, self.min_y, self.min_z)
    }

    /// The maximum corner.
    pub fn max_corner(&self) -> glam::DVec3 {
        glam::DVec3::new(self.max_x, self.max_y, self.max_z)
    }
}

/// Numeric scalar abstraction for 3D AABBs used by backends.
///
/// Volume and enlargement are always computed in `f64` so that `f32` scenes
/// with large extents do not lose the ordering between candidate clusters.
pub trait Scalar: Copy + PartialOrd + Debug {
    /// Add two scalar values.
    fn add(a: Self, b: Self) -> Self;

    /// Subtract two scalar values: a - b.
    fn sub(a: Self, b: Self) -> Self;

    /// Max of the scalar value and zero.
    fn max_zero(v: Self) -> Self;

    /// Convert a scalar to the `f64` metric type.
    fn widen(v: Self) -> f64;
}

impl Scalar for f32 {
    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0.0)
    }

    #[inline]
    fn widen(v: Self) -> f64 {
        v as f64
    }
}

impl Scalar for f64 {
    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0.0)
    }

    #[inline]
    fn widen(v: Self) -> f64 {
        v
    }
}

/// Compute the volume of an AABB in `f64`.
#[inline]
pub fn volume<T: Scalar>(a: &Aabb3D<T>) -> f64 {
    let w = T::max_zero(T::sub(a.max_x, a.min_x));
    let h = T::max_zero(T::sub(a.max_y, a.min_y));
    let d = T::max_zero(T::sub(a.max_z, a.min_z));
    T::widen(w) * T::widen(h) * T::widen(d)
}

/// Volume growth of `existing` when enlarged to include `candidate`.
#[inline]
pub fn enlargement<T: Scalar>(existing: &Aabb3D<T>, candidate: &Aabb3D<T>) -> f64 {
    volume(&union_aabb(*existing, *candidate)) - volume(existing)
}

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}

/// Component-wise union of two AABBs.
pub fn union_aabb<T: PartialOrd + Copy>(a: Aabb3D<T>, b: Aabb3D<T>) -> Aabb3D<T> {
    Aabb3D {
        min_x: min_t(a.min_x, b.min_x),
        min_y: min_t(a.min_y, b.min_y),
        min_z: min_t(a.min_z, b.min_z),
        max_x: max_t(a.max_x, b.max_x),
        max_y: max_t(a.max_y, b.max_y),
        max_z: max_t(a.max_z, b.max_z),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(lo: f64, hi: f64) -> Aabb3D<f64> {
        Aabb3D::new(lo, lo, lo, hi, hi, hi)
    }

    #[test]
    fn touching_faces_edges_and_corners_intersect() {
        let a = cube(0.0, 1.0);
        // Shared face at x = 1.
        assert!(a.intersects(&Aabb3D::new(1.0, 0.0, 0.0, 2.0, 1.0, 1.0)));
        // Shared edge along z.
        assert!(a.intersects(&Aabb3D::new(1.0, 1.0, 0.0, 2.0, 2.0, 1.0)));
        // Shared corner.
        assert!(a.intersects(&cube(1.0, 2.0)));
        // Just past the corner.
        assert!(!a.intersects(&cube(1.0 + 1e-9, 2.0)));
    }

    #[test]
    fn intersection_is_none_when_disjoint() {
        let a = cube(0.0, 1.0);
        assert_eq!(a.intersection(&cube(2.0, 3.0)), None);
        assert_eq!(a.intersection(&cube(0.5, 3.0)), Some(cube(0.5, 1.0)));
        // Touching boxes overlap in a flat region.
        let flat = a.intersection(&cube(1.0, 2.0)).unwrap();
        assert_eq!(flat, Aabb3D::from_point(1.0, 1.0, 1.0));
        assert_eq!(flat.volume(), 0.0);
    }

    #[test]
    fn union_volume_and_enlargement() {
        let a = cube(0.0, 1.0);
        let b = cube(1.0, 2.0);
        assert_eq!(a.union(&b), cube(0.0, 2.0));
        assert_eq!(a.volume(), 1.0);
        assert_eq!(a.enlargement_to_include(&b), 7.0);
        assert_eq!(a.enlargement_to_include(&cube(0.25, 0.75)), 0.0);
    }

    #[test]
    fn flat_boxes_have_zero_volume_and_comparable_enlargement() {
        let sheet = Aabb3D::new(0.0, 0.0, 0.0, 4.0, 4.0, 0.0);
        assert_eq!(sheet.volume(), 0.0);
        let near = Aabb3D::new(0.0, 0.0, 0.0, 4.0, 4.0, 1.0);
        let far = Aabb3D::new(0.0, 0.0, 0.0, 4.0, 4.0, 3.0);
        assert!(sheet.enlargement_to_include(&near) < sheet.enlargement_to_include(&far));
    }

    #[test]
    fn containment_is_boundary_inclusive() {
        let a = cube(0.0, 2.0);
        assert!(a.contains_point(0.0, 2.0, 1.0));
        assert!(!a.contains_point(0.0, 2.1, 1.0));
        assert!(a.contains(&a));
        assert!(a.contains(&cube(0.5, 1.5)));
        assert!(!a.contains(&cube(0.5, 2.5)));
    }

    #[test]
    fn validate_reports_first_bad_axis() {
        let bad = Aabb3D::new(0.0, 3.0, 0.0, 1.0, 2.0, 1.0);
        match bad.validate() {
            Err(ClusterError::InvalidBox { axis, min, max }) => {
                assert_eq!(axis, Axis::Y);
                assert_eq!(min, 3.0);
                assert_eq!(max, 2.0);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(Aabb3D::try_new(1.0, 0.0, 0.0, 0.0, 1.0, 1.0).is_err());
        assert!(Aabb3D::try_new(0.0, 0.0, 0.0, 0.0, 1.0, 1.0).is_ok());
    }

    #[test]
    fn nan_coordinates_are_malformed() {
        let bad = Aabb3D::new(0.0_f32, 0.0, f32::NAN, 1.0, 1.0, 1.0);
        assert!(!bad.is_valid());
        assert!(matches!(
            bad.validate(),
            Err(ClusterError::InvalidBox { axis: Axis::Z, .. })
        ));
    }

    #[test]
    fn f32_metrics_are_widened() {
        let a = Aabb3D::<f32>::from_origin_size(0.0, 0.0, 0.0, 2.0, 3.0, 4.0);
        assert_eq!(a, Aabb3D::new(0.0, 0.0, 0.0, 2.0, 3.0, 4.0));
        assert_eq!(a.volume(), 24.0_f64);
    }
}
