// Copyright 2024 the Bezkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cubic Bézier segments.

use core::ops::{Mul, Range};

use arrayvec::ArrayVec;

use crate::bezier;
use crate::bounds::{axis_extrema, cubic_bounds};
use crate::{Affine, Line, ParamCurve, ParamCurveExtrema, Point, Rect, MAX_EXTREMA};

/// A cubic Bézier segment, the unit of every fitted stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicBez {
    /// The start point.
    pub p0: Point,
    /// The first control point.
    pub p1: Point,
    /// The second control point.
    pub p2: Point,
    /// The end point.
    pub p3: Point,
}

impl CubicBez {
    /// A segment from its end points `p0`, `p3` and control points `p1`, `p2`.
    #[inline]
    pub fn new<P: Into<Point>>(p0: P, p1: P, p2: P, p3: P) -> CubicBez {
        CubicBez {
            p0: p0.into(),
            p1: p1.into(),
            p2: p2.into(),
            p3: p3.into(),
        }
    }

    /// Create a cubic Bézier segment from its four control points.
    #[inline]
    pub const fn from_points(points: [Point; 4]) -> CubicBez {
        let [p0, p1, p2, p3] = points;
        CubicBez { p0, p1, p2, p3 }
    }

    /// The control points as an array.
    #[inline]
    pub const fn points(&self) -> [Point; 4] {
        [self.p0, self.p1, self.p2, self.p3]
    }

    /// The exact degree elevation of a line.
    ///
    /// The control points sit at one and two thirds of the way along the
    /// line, so the parametrization is uniform.
    pub fn from_line(line: Line) -> CubicBez {
        CubicBez {
            p0: line.p0,
            p1: line.p0.lerp(line.p1, 1.0 / 3.0),
            p2: line.p0.lerp(line.p1, 2.0 / 3.0),
            p3: line.p1,
        }
    }

    /// A cubic tracing the same points as a line, with the control points
    /// placed at one and three quarters of the way along it.
    ///
    /// This is how straight segments are promoted before being cut against a
    /// grid, so that they can be treated the same as curved ones.
    pub fn nearly_straight(line: Line) -> CubicBez {
        CubicBez {
            p0: line.p0,
            p1: line.p0.lerp(line.p1, 0.25),
            p2: line.p0.lerp(line.p1, 0.75),
            p3: line.p1,
        }
    }

    /// The line from the start point to the end point.
    #[inline]
    pub fn baseline(&self) -> Line {
        Line::new(self.p0, self.p3)
    }

    /// Is this cubic Bezier curve finite?
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.p0.is_finite() && self.p1.is_finite() && self.p2.is_finite() && self.p3.is_finite()
    }
}

impl From<[Point; 4]> for CubicBez {
    #[inline]
    fn from(points: [Point; 4]) -> CubicBez {
        CubicBez::from_points(points)
    }
}

impl ParamCurve for CubicBez {
    #[inline]
    fn eval(&self, t: f64) -> Point {
        bezier::evaluate(&self.points(), 3, t)
    }

    #[inline]
    fn start(&self) -> Point {
        self.p0
    }

    #[inline]
    fn end(&self) -> Point {
        self.p3
    }

    fn subsegment(&self, range: Range<f64>) -> CubicBez {
        bezier::split_range(&self.points(), range.start, range.end).into()
    }

    /// Halves at `t = 0.5`, sharing one de Casteljau pass.
    #[inline]
    fn subdivide(&self) -> (CubicBez, CubicBez) {
        let parts = bezier::split(&self.points(), 0.5);
        (
            bezier::left_half(&parts).into(),
            bezier::right_half(&parts).into(),
        )
    }
}

impl ParamCurveExtrema for CubicBez {
    fn extrema(&self) -> ArrayVec<f64, MAX_EXTREMA> {
        let mut result = ArrayVec::new();
        for t in axis_extrema(self.p0.x, self.p1.x, self.p2.x, self.p3.x) {
            result.push(t);
        }
        for t in axis_extrema(self.p0.y, self.p1.y, self.p2.y, self.p3.y) {
            result.push(t);
        }
        result.sort_by(f64::total_cmp);
        result
    }

    #[inline]
    fn bounding_box(&self) -> Rect {
        cubic_bounds(self, 0.0)
    }
}

impl Mul<CubicBez> for Affine {
    type Output = CubicBez;

    #[inline]
    fn mul(self, c: CubicBez) -> CubicBez {
        CubicBez::from_points(c.points().map(|p| self * p))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Affine, CubicBez, Line, ParamCurve, ParamCurveExtrema, Point, Rect, Vec2};

    #[test]
    fn cubicbez_eval_and_subdivide() {
        let c = CubicBez::new((0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0));
        assert_eq!(c.eval(0.5), Point::new(0.5, 0.75));
        assert_eq!(c.start(), c.p0);
        assert_eq!(c.end(), c.p3);
        let (left, right) = c.subdivide();
        assert_eq!(left.p3, c.eval(0.5));
        assert_eq!(right.p0, c.eval(0.5));
        assert!(left.eval(0.5).is_near(c.eval(0.25), 1e-12));
        assert!(right.eval(0.5).is_near(c.eval(0.75), 1e-12));
    }

    #[test]
    fn cubicbez_subsegment() {
        let c = CubicBez::new((3.1, 4.1), (5.9, 2.6), (5.3, 5.8), (9.7, 9.3));
        let sub = c.subsegment(0.25..0.75);
        for i in 0..=8 {
            let t = i as f64 / 8.0;
            assert!(sub.eval(t).is_near(c.eval(0.25 + 0.5 * t), 1e-12));
        }
    }

    #[test]
    fn cubicbez_extrema() {
        // Monotone in x, one turning point in y.
        let c = CubicBez::new((0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0));
        let ts = c.extrema();
        assert_eq!(ts.len(), 1);
        assert!((ts[0] - 0.5).abs() < 1e-6);

        let c = CubicBez::new((0.4, 0.5), (0.0, 1.0), (1.0, 0.0), (0.5, 0.4));
        let ts = c.extrema();
        assert_eq!(ts.len(), 4);
        assert!(ts.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn cubicbez_bounding_box() {
        let c = CubicBez::new((0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0));
        let bbox = c.bounding_box();
        assert_eq!(bbox.x0, 0.0);
        assert_eq!(bbox.x1, 1.0);
        assert_eq!(bbox.y0, 0.0);
        assert!((bbox.y1 - 0.75).abs() < 1e-12);
    }

    #[test]
    fn lines_as_cubics() {
        let line = Line::new((1.0, 2.0), (7.0, 5.0));
        let exact = CubicBez::from_line(line);
        for i in 0..=4 {
            let t = i as f64 * 0.25;
            assert!(exact.eval(t).is_near(line.eval(t), 1e-12));
        }
        let promoted = CubicBez::nearly_straight(line);
        assert_eq!(promoted.p1, Point::new(2.5, 2.75));
        assert_eq!(promoted.p2, Point::new(5.5, 4.25));
        assert_eq!(promoted.baseline(), line);
        assert_eq!(
            promoted.bounding_box(),
            Rect::from_points(line.p0, line.p1)
        );
    }

    #[test]
    fn transform_and_convert() {
        let c = CubicBez::new((0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0));
        let moved = Affine::translate((2.0, 3.0)) * c;
        assert_eq!(moved.p2, Point::new(3.0, 4.0));
        assert!(moved.eval(0.3).is_near(c.eval(0.3) + Vec2::new(2.0, 3.0), 1e-12));
        assert_eq!(CubicBez::from(c.points()), c);
    }
}
