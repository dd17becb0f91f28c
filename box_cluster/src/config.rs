// Copyright 2025 the Box Cluster Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree shape parameters.

use crate::error::ClusterError;

/// Shape parameters for [`MergingRTree`](crate::MergingRTree).
///
/// - `max_leaf_boxes`: raw boxes a leaf cluster may hold before it splits.
/// - `max_children`: child clusters an interior node may hold before it splits.
/// - `min_children`: fewest children a non-root interior node keeps after a split.
///
/// Larger leaves mean fewer, coarser clusters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClusterConfig {
    max_leaf_boxes: usize,
    min_children: usize,
    max_children: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            max_leaf_boxes: 8,
            min_children: 2,
            max_children: 8,
        }
    }
}

impl ClusterConfig {
    /// Create a validated configuration.
    ///
    /// Requires `max_leaf_boxes >= 2`, `max_children >= 2`, `min_children >= 1`
    /// and `2 * min_children <= max_children + 1`, so an overflowing node can
    /// always be split into two halves that both meet the minimum.
    pub fn new(
        max_leaf_boxes: usize,
        min_children: usize,
        max_children: usize,
    ) -> Result<Self, ClusterError> {
        if max_leaf_boxes < 2 {
            return Err(ClusterError::InvalidConfig {
                reason: "max_leaf_boxes must be at least 2",
            });
        }
        if max_children < 2 {
            return Err(ClusterError::InvalidConfig {
                reason: "max_children must be at least 2",
            });
        }
        if min_children == 0 {
            return Err(ClusterError::InvalidConfig {
                reason: "min_children must be at least 1",
            });
        }
        if 2 * min_children > max_children + 1 {
            return Err(ClusterError::InvalidConfig {
                reason: "min_children must not exceed half of max_children + 1",
            });
        }
        Ok(Self {
            max_leaf_boxes,
            min_children,
            max_children,
        })
    }

    /// Default interior fan-out with a custom leaf capacity.
    pub fn with_max_leaf_boxes(max_leaf_boxes: usize) -> Result<Self, ClusterError> {
        let d = Self::default();
        Self::new(max_leaf_boxes, d.min_children, d.max_children)
    }

    /// Raw boxes a leaf may hold before it splits.
    pub const fn max_leaf_boxes(&self) -> usize {
        self.max_leaf_boxes
    }

    /// Fewest children kept by a non-root interior node.
    pub const fn min_children(&self) -> usize {
        self.min_children
    }

    /// Children an interior node may hold before it splits.
    pub const fn max_children(&self) -> usize {
        self.max_children
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let d = ClusterConfig::default();
        assert_eq!(
            ClusterConfig::new(d.max_leaf_boxes(), d.min_children(), d.max_children()),
            Ok(d)
        );
    }

    #[test]
    fn rejects_unsplittable_shapes() {
        assert!(ClusterConfig::new(1, 2, 8).is_err());
        assert!(ClusterConfig::new(4, 1, 1).is_err());
        assert!(ClusterConfig::new(4, 0, 8).is_err());
        // 2 * 5 > 8 + 1
        assert!(ClusterConfig::new(4, 5, 8).is_err());
        assert!(ClusterConfig::new(2, 1, 2).is_ok());
        assert!(ClusterConfig::new(4, 4, 8).is_ok());
    }

    #[test]
    fn leaf_capacity_shortcut() {
        let c = ClusterConfig::with_max_leaf_boxes(2).unwrap();
        assert_eq!(c.max_leaf_boxes(), 2);
        assert_eq!(c.max_children(), ClusterConfig::default().max_children());
        assert!(matches!(
            ClusterConfig::with_max_leaf_boxes(0),
            Err(ClusterError::InvalidConfig { .. })
        ));
    }
}
