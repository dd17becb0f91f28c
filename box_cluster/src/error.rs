// Copyright 2025 the Box Cluster Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by the clusterers and their backends.

use thiserror::Error;

use crate::backend::BackendKind;
use crate::types::Axis;

/// Errors raised by box clustering operations.
///
/// Empty clusterers, flat boxes and duplicate boxes are all valid states and
/// never produce an error.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ClusterError {
    /// A box has `min > max` (or a NaN coordinate) on some axis.
    ///
    /// Boxes are never normalized; the caller has to fix the upstream geometry.
    #[error("invalid box: min.{axis} ({min}) is not <= max.{axis} ({max})")]
    InvalidBox {
        /// First axis found to be malformed.
        axis: Axis,
        /// The offending minimum, widened to `f64`.
        min: f64,
        /// The offending maximum, widened to `f64`.
        max: f64,
    },

    /// A set operation mixed clusterers backed by different implementations.
    #[error("backend mismatch: expected {expected} clusterer, got {found}")]
    TypeMismatch {
        /// Backend of the receiving clusterer.
        expected: BackendKind,
        /// Backend of the other operand.
        found: BackendKind,
    },

    /// Tree shape parameters that cannot be honored.
    #[error("invalid cluster configuration: {reason}")]
    InvalidConfig {
        /// Which constraint was violated.
        reason: &'static str,
    },
}
