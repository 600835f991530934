// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors returned when an accelerator cannot be constructed.

use thiserror::Error;

use crate::types::PointId;

/// Invalid construction arguments. Nothing is built when one is returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    /// No bounds were given and there are too few points to derive them.
    #[error("bounds require at least two points when no box is given, got {points}")]
    MissingBounds {
        /// Number of points supplied.
        points: usize,
    },
    /// A leaf must be allowed to hold at least one point.
    #[error("max points per node must be at least 1")]
    ZeroCapacity,
    /// A point has a NaN or infinite coordinate.
    #[error("point {0:?} has a non-finite coordinate")]
    NonFinitePoint(PointId),
    /// The supplied box has a NaN or infinite corner.
    #[error("bounds have a non-finite corner")]
    NonFiniteBounds,
}
