// Copyright 2025 the Box Cluster Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend implementations for different clustering strategies.
//!
//! - `rtree`: merging R-tree with quadratic splits; the default.
//! - `flatlist`: flat vector with linear scans; every box is its own cluster.
//!
//! Insertion note
//! --------------
//! The R-tree descends by least volume enlargement
//!
//! `enlargement(c, b) = volume(c ∪ b) - volume(c)`
//!
//! breaking ties by the smaller `volume(c ∪ b)`, then by child order, so the
//! same insertion sequence always builds the same tree.
//! An overflowing node is split by seeding two groups with the pair that wastes
//! the most volume when merged, then handing out the rest by least enlargement.
//! All metrics are computed in `f64`.

pub mod flatlist;
pub mod rtree;
