// Copyright 2024 the Bezkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported when validating caller input.

use thiserror::Error;

/// Errors from constructors that validate their input.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum GeometryError {
    /// A polyline needs at least two points to be fitted.
    #[error("a polyline needs at least 2 points, found {found}")]
    TooFewPoints {
        /// Number of points supplied.
        found: usize,
    },

    /// Grid spacing must be finite and strictly positive on both axes.
    #[error("grid spacing must be finite and positive, got ({dx}, {dy})")]
    InvalidSpacing {
        /// Horizontal spacing supplied.
        dx: f64,
        /// Vertical spacing supplied.
        dy: f64,
    },

    /// A grid is too fine for the segment being cut.
    #[error("grid spacing would cut the segment at more than {limit} lines")]
    TooManyGridLines {
        /// Most lines allowed in either direction.
        limit: usize,
    },

    /// A fitting tolerance must be finite and strictly positive.
    #[error("fit tolerance must be finite and positive, got {0}")]
    InvalidTolerance(f64),
}
