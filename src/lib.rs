// Copyright 2024 the Bezkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cubic Bézier geometry for digitized 2D strokes.
//!
//! The bezkit library fits piecewise cubic Béziers to sampled point
//! sequences, and provides the geometry that drawing and hit-testing code
//! needs on the result: evaluation and subdivision, curve/curve and
//! curve/line intersection, tight bounds, convex hulls, and cutting
//! segments along a reference grid.
//!
//! # Examples
//!
//! Fitting a stroke and intersecting it with a line:
//! ```
//! use bezkit::{fit_curve, intersect_curve_line, Line, ParamCurve, Point};
//!
//! let stroke: Vec<Point> = (0..=20)
//!     .map(|i| {
//!         let x = i as f64 * 5.0;
//!         Point::new(x, 0.01 * x * (100.0 - x))
//!     })
//!     .collect();
//! let curves = fit_curve(&stroke, 0.25);
//! assert_eq!(curves[0].start(), stroke[0]);
//!
//! let line = Line::new((0.0, 10.0), (100.0, 10.0));
//! let crossings: usize = curves
//!     .iter()
//!     .map(|c| intersect_curve_line(c, &line).len())
//!     .sum();
//! assert_eq!(crossings, 2);
//! ```
//!
//! # Features
//!
//! This crate either uses the standard library or the [`libm`] crate for
//! math functionality. The `std` feature is enabled by default, but can be
//! disabled, as long as the `libm` feature is enabled. This is useful for
//! `no_std` environments. However, note that the `libm` crate is not as
//! efficient as the standard library, and that this crate still uses the
//! `alloc` crate regardless.
//!
//! Logging goes through the [`log`] facade; no logger is installed here.
//!
//! [`libm`]: https://docs.rs/libm
//! [`log`]: https://docs.rs/log

#![forbid(unsafe_code)]
#![deny(missing_docs, clippy::trivially_copy_pass_by_ref)]
#![warn(clippy::doc_markdown, rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("bezkit requires either the `std` or `libm` feature");

extern crate alloc;

mod affine;
pub mod bezier;
mod bounds;
pub mod common;
mod cubicbez;
mod curve_intersections;
mod error;
mod fit;
mod grid;
mod hull;
mod line;
mod param_curve;
mod point;
mod rect;
mod vec2;

pub use crate::affine::*;
pub use crate::bounds::*;
pub use crate::cubicbez::*;
pub use crate::curve_intersections::*;
pub use crate::error::*;
pub use crate::fit::*;
pub use crate::grid::*;
pub use crate::hull::*;
pub use crate::line::*;
pub use crate::param_curve::*;
pub use crate::point::*;
pub use crate::rect::*;
pub use crate::vec2::*;
