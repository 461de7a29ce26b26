// Copyright 2024 the Bezkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lines.

use core::ops::{Mul, Range};

use arrayvec::ArrayVec;

use crate::common::EPSILON;
use crate::{Affine, ParamCurve, ParamCurveExtrema, Point, Vec2, MAX_EXTREMA};

/// A straight segment, parameterized at constant speed from `p0` to `p1`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    /// Where the segment starts, at `t = 0`.
    pub p0: Point,
    /// Where the segment ends, at `t = 1`.
    pub p1: Point,
}

impl Line {
    /// The segment from `p0` to `p1`.
    #[inline]
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>) -> Line {
        Line {
            p0: p0.into(),
            p1: p1.into(),
        }
    }

    /// Distance between the end points.
    #[inline]
    pub fn length(&self) -> f64 {
        self.direction().length()
    }

    /// The vector from the start point to the end point.
    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.p1 - self.p0
    }

    /// Find the parameters in `[0, 1]` at which the line crosses the vertical
    /// line at `x`.
    ///
    /// A (near) vertical line has no isolated crossings and yields nothing.
    pub fn solve_t_for_x(&self, x: f64) -> ArrayVec<f64, 1> {
        solve_t_for_coord(self.p0.x, self.p1.x, x)
    }

    /// Find the parameters in `[0, 1]` at which the line crosses the
    /// horizontal line at `y`.
    ///
    /// A (near) horizontal line has no isolated crossings and yields nothing.
    pub fn solve_t_for_y(&self, y: f64) -> ArrayVec<f64, 1> {
        solve_t_for_coord(self.p0.y, self.p1.y, y)
    }
}

fn solve_t_for_coord(v0: f64, v1: f64, v: f64) -> ArrayVec<f64, 1> {
    let delta = v1 - v0;
    let t = (v - v0) / delta;
    (!(-EPSILON..EPSILON).contains(&delta) && (0.0..=1.0).contains(&t))
        .then_some(t)
        .into_iter()
        .collect()
}

impl ParamCurve for Line {
    #[inline]
    fn eval(&self, t: f64) -> Point {
        self.p0.lerp(self.p1, t)
    }

    #[inline]
    fn subsegment(&self, range: Range<f64>) -> Line {
        Line::new(self.eval(range.start), self.eval(range.end))
    }

    #[inline]
    fn start(&self) -> Point {
        self.p0
    }

    #[inline]
    fn end(&self) -> Point {
        self.p1
    }
}

impl ParamCurveExtrema for Line {
    #[inline]
    fn extrema(&self) -> ArrayVec<f64, MAX_EXTREMA> {
        // Monotone in both coordinates.
        ArrayVec::new()
    }
}

impl Mul<Line> for Affine {
    type Output = Line;

    #[inline]
    fn mul(self, line: Line) -> Line {
        Line::new(self * line.p0, self * line.p1)
    }
}
