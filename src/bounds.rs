// Copyright 2024 the Bezkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tight axis-aligned bounds of cubic Béziers.

use arrayvec::ArrayVec;

use crate::common::{solve_quadratic, TOLERANCE};
use crate::{CubicBez, Point, Rect};

/// The parameters in `(TOLERANCE, 1 - TOLERANCE)` where one coordinate of a
/// cubic with values `v0..v3` has zero derivative.
///
/// The derivative is taken divided by three, which leaves the roots alone.
/// A derivative that vanishes identically has no isolated extrema.
pub(crate) fn axis_extrema(v0: f64, v1: f64, v2: f64, v3: f64) -> ArrayVec<f64, 2> {
    let a = 3.0 * (v1 - v2) - v0 + v3;
    let b = 2.0 * (v0 + v2) - 4.0 * v1;
    let c = v1 - v0;
    let mut result = ArrayVec::new();
    for &t in solve_quadratic(a, b, c).roots() {
        if t > TOLERANCE && t < 1.0 - TOLERANCE {
            result.push(t);
        }
    }
    result
}

#[inline]
fn eval_axis(v0: f64, v1: f64, v2: f64, v3: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    mt * mt * mt * v0 + 3.0 * mt * mt * t * v1 + 3.0 * mt * t * t * v2 + t * t * t * v3
}

/// The smallest rectangle containing every point of `curve`, grown by
/// `padding` on every side.
///
/// The end points are always included. Interior extrema are found per axis
/// from the roots of the derivative, so the result is tight rather than the
/// hull of the control points.
///
/// ```
/// use bezkit::{cubic_bounds, CubicBez, Rect};
///
/// let c = CubicBez::new((0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0));
/// assert_eq!(cubic_bounds(&c, 0.0), Rect::new(0.0, 0.0, 1.0, 0.75));
/// ```
pub fn cubic_bounds(curve: &CubicBez, padding: f64) -> Rect {
    let [p0, p1, p2, p3] = curve.points();
    let mut bounds = Rect::from_points(p0, p0).union_pt(p3);
    let xs = axis_extrema(p0.x, p1.x, p2.x, p3.x);
    let ys = axis_extrema(p0.y, p1.y, p2.y, p3.y);
    for t in xs {
        let x = eval_axis(p0.x, p1.x, p2.x, p3.x, t);
        bounds = bounds.union_pt(Point::new(x, p0.y));
    }
    for t in ys {
        let y = eval_axis(p0.y, p1.y, p2.y, p3.y, t);
        bounds = bounds.union_pt(Point::new(p0.x, y));
    }
    bounds.inflate(padding, padding)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::ParamCurve;

    #[test]
    fn arch() {
        let c = CubicBez::new((0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0));
        assert_eq!(cubic_bounds(&c, 0.0), Rect::new(0.0, 0.0, 1.0, 0.75));
        assert_eq!(cubic_bounds(&c, 0.5), Rect::new(-0.5, -0.5, 1.5, 1.25));
    }

    #[test]
    fn straight_line_is_its_endpoints() {
        let c = CubicBez::new((2.0, 1.0), (3.0, 1.5), (4.0, 2.0), (5.0, 2.5));
        assert_eq!(cubic_bounds(&c, 0.0), Rect::new(2.0, 1.0, 5.0, 2.5));
        // Point curve.
        let p = CubicBez::new((1.0, 1.0), (1.0, 1.0), (1.0, 1.0), (1.0, 1.0));
        assert_eq!(cubic_bounds(&p, 0.0), Rect::new(1.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn overshooting_controls() {
        let c = CubicBez::new((0.0, 0.0), (-1.0, 2.0), (3.0, -2.0), (2.0, 0.0));
        let b = cubic_bounds(&c, 0.0);
        assert!(b.x0 < 0.0 && b.x1 > 2.0);
        assert!(b.y0 < 0.0 && b.y1 > 0.0);
        // Tighter than the control polygon.
        assert!(b.x0 > -1.0 && b.x1 < 3.0);
    }

    #[test]
    fn contains_samples_and_is_tight() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..200 {
            let mut pt = || Point::new(rng.random_range(-50.0..50.0), rng.random_range(-50.0..50.0));
            let c = CubicBez::new(pt(), pt(), pt(), pt());
            let b = cubic_bounds(&c, 0.0);
            let padded = b.inflate(1e-9, 1e-9);
            let mut sampled = Rect::from_points(c.p0, c.p3);
            for i in 0..=1000 {
                let p = c.eval(i as f64 / 1000.0);
                assert!(padded.contains(p), "{p:?} outside {b:?}");
                sampled = sampled.union_pt(p);
            }
            // Dense sampling comes close to every edge.
            assert!(sampled.x0 - b.x0 < 1e-2);
            assert!(b.x1 - sampled.x1 < 1e-2);
            assert!(sampled.y0 - b.y0 < 1e-2);
            assert!(b.y1 - sampled.y1 < 1e-2);
        }
    }
}
