// Copyright 2024 the Bezkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fitting cubic Béziers to digitized point sequences.
//!
//! This is Philip J. Schneider's least-squares algorithm from Graphics Gems:
//! fit one cubic with fixed end tangents, refine the sample parameters with
//! Newton-Raphson while the error is close, and otherwise split at the worst
//! sample and fit both halves.

use alloc::vec::Vec;

use log::{debug, trace};

use crate::bezier::{self, derivative};
use crate::common::TOLERANCE;
use crate::error::GeometryError;
use crate::{CubicBez, Point, Vec2};

/// Options controlling [`fit_curve_with`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FitOptions {
    /// The largest accepted squared distance between a sample and the
    /// fitted curve at that sample's parameter.
    pub squared_error: f64,
    /// How many Newton-Raphson reparameterization rounds to try before
    /// splitting a region.
    pub max_reparameterizations: usize,
}

impl FitOptions {
    /// The number of reparameterization rounds used unless overridden.
    pub const DEFAULT_MAX_REPARAMETERIZATIONS: usize = 4;

    /// Options with the given squared error tolerance, validated.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidTolerance`] if `squared_error` is not
    /// finite and strictly positive.
    pub fn new(squared_error: f64) -> Result<FitOptions, GeometryError> {
        if !(squared_error.is_finite() && squared_error > 0.0) {
            return Err(GeometryError::InvalidTolerance(squared_error));
        }
        Ok(FitOptions::with_tolerance(squared_error))
    }

    /// Options with the given squared error tolerance, unchecked.
    ///
    /// A zero or negative tolerance is accepted; fitting then splits down
    /// to two-sample regions.
    pub const fn with_tolerance(squared_error: f64) -> FitOptions {
        FitOptions {
            squared_error,
            max_reparameterizations: Self::DEFAULT_MAX_REPARAMETERIZATIONS,
        }
    }
}

impl Default for FitOptions {
    /// Two device units of deviation.
    fn default() -> FitOptions {
        FitOptions::with_tolerance(4.0)
    }
}

/// A receiver for fitted segments.
///
/// Segments arrive in path order, each starting where the previous one
/// ended.
pub trait CurveSink {
    /// Accept the next fitted segment.
    fn push_cubic(&mut self, curve: CubicBez);
}

impl CurveSink for Vec<CubicBez> {
    #[inline]
    fn push_cubic(&mut self, curve: CubicBez) {
        self.push(curve);
    }
}

/// An ordered sequence of at least two samples, ready to be fitted.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polyline {
    points: Vec<Point>,
}

#[expect(
    clippy::len_without_is_empty,
    reason = "a polyline always holds at least two points"
)]
impl Polyline {
    /// Wrap a sequence of samples.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::TooFewPoints`] if there are fewer than two.
    pub fn new(points: Vec<Point>) -> Result<Polyline, GeometryError> {
        if points.len() < 2 {
            return Err(GeometryError::TooFewPoints {
                found: points.len(),
            });
        }
        Ok(Polyline { points })
    }

    /// The samples.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Fit cubics to the samples with the given squared error tolerance.
    pub fn fit(&self, squared_error: f64) -> Vec<CubicBez> {
        fit_curve(&self.points, squared_error)
    }

    /// Fit cubics to the samples, streaming them into `sink`.
    pub fn fit_with(&self, options: &FitOptions, sink: &mut impl CurveSink) {
        fit_curve_with(&self.points, options, sink);
    }
}

impl TryFrom<Vec<Point>> for Polyline {
    type Error = GeometryError;

    fn try_from(points: Vec<Point>) -> Result<Polyline, GeometryError> {
        Polyline::new(points)
    }
}

/// Fit a sequence of cubic Béziers to `points`.
///
/// Every sample ends up within `sqrt(squared_error)` of the segment that
/// covers it. The segments join end to end; the first starts at the first
/// sample and the last ends at the last sample. Joins at split points share
/// a tangent direction.
///
/// # Panics
///
/// Panics if `points` holds fewer than two points. Use [`Polyline`] to check
/// this up front.
///
/// # Examples
///
/// ```
/// use bezkit::{fit_curve, Point};
///
/// let points: Vec<Point> = (0..=20)
///     .map(|i| {
///         let th = i as f64 * core::f64::consts::FRAC_PI_2 / 20.0;
///         Point::new(100.0 * th.cos(), 100.0 * th.sin())
///     })
///     .collect();
/// let curves = fit_curve(&points, 0.01);
/// assert!(!curves.is_empty());
/// assert_eq!(curves[0].p0, points[0]);
/// assert_eq!(curves.last().unwrap().p3, points[20]);
/// ```
pub fn fit_curve(points: &[Point], squared_error: f64) -> Vec<CubicBez> {
    let mut curves = Vec::new();
    fit_curve_with(points, &FitOptions::with_tolerance(squared_error), &mut curves);
    curves
}

/// Fit a sequence of cubic Béziers to `points`, streaming them into `sink`.
///
/// See [`fit_curve`].
///
/// # Panics
///
/// Panics if `points` holds fewer than two points.
pub fn fit_curve_with(points: &[Point], options: &FitOptions, sink: &mut impl CurveSink) {
    assert!(
        points.len() >= 2,
        "curve fitting needs at least 2 points, got {}",
        points.len()
    );
    let n = points.len();
    let left_tangent = (points[1] - points[0]).normalize();
    let right_tangent = (points[n - 2] - points[n - 1]).normalize();
    fit_cubic(points, left_tangent, right_tangent, options, sink);
}

/// Fit one region, splitting it as needed.
///
/// `left_tangent` points into the region from its first sample and
/// `right_tangent` points into it from its last sample.
fn fit_cubic(
    region: &[Point],
    left_tangent: Vec2,
    right_tangent: Vec2,
    options: &FitOptions,
    sink: &mut impl CurveSink,
) {
    let n = region.len();
    if n == 2 {
        sink.push_cubic(heuristic_cubic(region[0], region[1], left_tangent, right_tangent));
        return;
    }

    let mut u = chord_length_parameterize(region);
    let mut curve = generate_bezier(region, &u, left_tangent, right_tangent);
    let (mut max_error, mut split_point) = compute_max_error(region, &curve, &u);
    if max_error < options.squared_error {
        sink.push_cubic(curve);
        return;
    }

    // Only worth reparameterizing when the fit is already close.
    let iteration_error = options.squared_error * options.squared_error;
    if max_error < iteration_error {
        for _ in 0..options.max_reparameterizations {
            let u_prime = reparameterize(region, &u, &curve);
            curve = generate_bezier(region, &u_prime, left_tangent, right_tangent);
            (max_error, split_point) = compute_max_error(region, &curve, &u_prime);
            if max_error < options.squared_error {
                sink.push_cubic(curve);
                return;
            }
            u = u_prime;
        }
    }

    trace!("splitting {n} samples at {split_point}, squared error {max_error}");
    let center_tangent = center_tangent(region, split_point);
    fit_cubic(
        &region[..=split_point],
        left_tangent,
        center_tangent,
        options,
        sink,
    );
    fit_cubic(
        &region[split_point..],
        -center_tangent,
        right_tangent,
        options,
        sink,
    );
}

/// The unit tangent at an interior sample, pointing back towards the
/// preceding sample.
fn center_tangent(region: &[Point], center: usize) -> Vec2 {
    let v1 = region[center - 1] - region[center];
    let v2 = region[center] - region[center + 1];
    ((v1 + v2) * 0.5).normalize()
}

/// Parameters in `[0, 1]` proportional to the cumulative chord length.
///
/// When all samples coincide the parameters are spread uniformly instead.
fn chord_length_parameterize(region: &[Point]) -> Vec<f64> {
    let mut u = Vec::with_capacity(region.len());
    let mut total = 0.0;
    u.push(0.0);
    for w in region.windows(2) {
        total += w[0].distance(w[1]);
        u.push(total);
    }
    let last = (region.len() - 1) as f64;
    if total == 0.0 {
        for (i, ui) in u.iter_mut().enumerate() {
            *ui = i as f64 / last;
        }
    } else {
        for ui in &mut u {
            *ui /= total;
        }
    }
    u
}

#[inline]
fn b0(u: f64) -> f64 {
    let tmp = 1.0 - u;
    tmp * tmp * tmp
}

#[inline]
fn b1(u: f64) -> f64 {
    let tmp = 1.0 - u;
    3.0 * u * (tmp * tmp)
}

#[inline]
fn b2(u: f64) -> f64 {
    let tmp = 1.0 - u;
    3.0 * u * u * tmp
}

#[inline]
fn b3(u: f64) -> f64 {
    u * u * u
}

/// The Wu/Barsky fallback: control points a third of the chord along the
/// tangents.
fn heuristic_cubic(first: Point, last: Point, left_tangent: Vec2, right_tangent: Vec2) -> CubicBez {
    let dist = first.distance(last) / 3.0;
    CubicBez::new(
        first,
        first + left_tangent * dist,
        last + right_tangent * dist,
        last,
    )
}

/// Least-squares cubic through the end samples of `region`, with control
/// points constrained to lie along the given tangents.
fn generate_bezier(region: &[Point], u: &[f64], left_tangent: Vec2, right_tangent: Vec2) -> CubicBez {
    let first = region[0];
    let last = region[region.len() - 1];

    let mut c00 = 0.0;
    let mut c01 = 0.0;
    let mut c11 = 0.0;
    let mut x0 = 0.0;
    let mut x1 = 0.0;
    for (&p, &ui) in region.iter().zip(u) {
        let a0 = left_tangent * b1(ui);
        let a1 = right_tangent * b2(ui);
        c00 += a0.dot(a0);
        c01 += a0.dot(a1);
        c11 += a1.dot(a1);
        let tmp = p.to_vec2()
            - first.to_vec2() * (b0(ui) + b1(ui))
            - last.to_vec2() * (b2(ui) + b3(ui));
        x0 += a0.dot(tmp);
        x1 += a1.dot(tmp);
    }
    let c10 = c01;

    let det_c0_c1 = c00 * c11 - c10 * c01;
    let det_c0_x = c00 * x1 - c10 * x0;
    let det_x_c1 = x0 * c11 - x1 * c01;

    let (alpha_l, alpha_r) = if det_c0_c1 == 0.0 {
        (0.0, 0.0)
    } else {
        (det_x_c1 / det_c0_c1, det_c0_x / det_c0_c1)
    };

    // Alphas that are tiny, negative or non-finite would put a control point
    // on top of an end point, which later zeroes the Newton-Raphson
    // derivative.
    let seg_length = first.distance(last);
    let epsilon = TOLERANCE * seg_length;
    if alpha_l < epsilon || alpha_r < epsilon || !(alpha_l.is_finite() && alpha_r.is_finite()) {
        debug!("least squares gave alphas ({alpha_l}, {alpha_r}), using chord heuristic");
        return heuristic_cubic(first, last, left_tangent, right_tangent);
    }

    CubicBez::new(
        first,
        first + left_tangent * alpha_l,
        last + right_tangent * alpha_r,
        last,
    )
}

/// The largest squared distance between a sample and the curve at that
/// sample's parameter, and the index of that sample.
///
/// Only interior samples are measured, since the end samples are
/// interpolated exactly.
fn compute_max_error(region: &[Point], curve: &CubicBez, u: &[f64]) -> (f64, usize) {
    let points = curve.points();
    let mut split_point = region.len() / 2;
    let mut max_dist = 0.0;
    let interior = region.len() - 1;
    for (i, (&sample, &ui)) in region.iter().zip(u).enumerate().take(interior).skip(1) {
        let dist = bezier::evaluate(&points, 3, ui).distance_squared(sample);
        if dist >= max_dist {
            max_dist = dist;
            split_point = i;
        }
    }
    (max_dist, split_point)
}

/// Improve every sample's parameter with one Newton-Raphson step.
fn reparameterize(region: &[Point], u: &[f64], curve: &CubicBez) -> Vec<f64> {
    let q = curve.points();
    let q1 = derivative(&q);
    let q2 = derivative(&q1);
    region
        .iter()
        .zip(u)
        .map(|(&p, &ui)| newton_raphson_root_find(&q, &q1, &q2, p, ui))
        .collect()
}

/// One Newton-Raphson step towards the parameter of the point on the curve
/// closest to `p`.
///
/// `q1` and `q2` are the first and second derivative curves of `q`. When
/// the denominator is exactly zero `u` is returned unchanged.
fn newton_raphson_root_find(q: &[Point; 4], q1: &[Point], q2: &[Point], p: Point, u: f64) -> f64 {
    let q_u = bezier::evaluate(q, 3, u);
    let q1_u = bezier::evaluate(q1, 2, u).to_vec2();
    let q2_u = bezier::evaluate(q2, 1, u).to_vec2();
    let diff = q_u - p;
    let numerator = diff.dot(q1_u);
    let denominator = q1_u.dot(q1_u) + diff.dot(q2_u);
    if denominator == 0.0 {
        return u;
    }
    u - numerator / denominator
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    use core::f64::consts::FRAC_PI_2;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::ParamCurve;

    /// Distance from `p` to the nearest point of `c` with parameter in
    /// `range`, by dense sampling followed by ternary search around the best
    /// sample.
    fn distance_to_curve(c: &CubicBez, p: Point, range: (f64, f64)) -> f64 {
        const N: usize = 1000;
        let at = |i: usize| range.0 + (range.1 - range.0) * i as f64 / N as f64;
        let mut best = (f64::INFINITY, 0);
        for i in 0..=N {
            let d = c.eval(at(i)).distance(p);
            if d < best.0 {
                best = (d, i);
            }
        }
        let mut lo = at(best.1.saturating_sub(1));
        let mut hi = at((best.1 + 1).min(N));
        for _ in 0..60 {
            let m1 = lo + (hi - lo) / 3.0;
            let m2 = hi - (hi - lo) / 3.0;
            if c.eval(m1).distance(p) < c.eval(m2).distance(p) {
                hi = m2;
            } else {
                lo = m1;
            }
        }
        best.0.min(c.eval(0.5 * (lo + hi)).distance(p))
    }

    fn distance_to_curves(curves: &[CubicBez], p: Point, range: (f64, f64)) -> f64 {
        curves
            .iter()
            .map(|c| distance_to_curve(c, p, range))
            .fold(f64::INFINITY, f64::min)
    }

    fn assert_chained(curves: &[CubicBez], points: &[Point]) {
        assert!(!curves.is_empty(), "no curves");
        assert_eq!(curves[0].p0, points[0]);
        assert_eq!(curves[curves.len() - 1].p3, points[points.len() - 1]);
        for w in curves.windows(2) {
            assert_eq!(w[0].p3, w[1].p0, "segments are not joined");
        }
    }

    fn quarter_circle(radius: f64, n: usize) -> Vec<Point> {
        (0..n)
            .map(|i| {
                let th = i as f64 * FRAC_PI_2 / (n - 1) as f64;
                Point::new(radius * th.cos(), radius * th.sin())
            })
            .collect()
    }

    #[test]
    fn quarter_circle_within_tolerance() {
        let points = quarter_circle(100.0, 20);
        let curves = fit_curve(&points, 0.1 * 0.1);
        assert_chained(&curves, &points);
        for &p in &points {
            let d = distance_to_curves(&curves, p, (0.0, 1.0));
            assert!(d < 0.1, "sample {p:?} is {d} away");
        }
    }

    #[test]
    fn two_points_use_heuristic() {
        let points = [Point::new(0.0, 0.0), Point::new(3.0, 0.0)];
        let curves = fit_curve(&points, 1.0);
        assert_eq!(
            curves,
            [CubicBez::new((0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0))]
        );
    }

    #[test]
    fn collinear_samples_fit_one_segment() {
        let points: Vec<Point> = (0..10).map(|i| Point::new(i as f64, 2.0 * i as f64)).collect();
        let curves = fit_curve(&points, 1e-6);
        assert_eq!(curves.len(), 1);
        assert_chained(&curves, &points);
    }

    #[test]
    fn coincident_samples_do_not_produce_nan() {
        let points = [Point::new(5.0, 5.0); 6];
        let curves = fit_curve(&points, 1.0);
        assert!(!curves.is_empty());
        for c in &curves {
            assert!(c.is_finite());
        }
        assert_chained(&curves, &points);
    }

    #[test]
    fn noisy_stroke_is_fitted() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            let points: Vec<Point> = (0..60)
                .map(|i| {
                    let x = i as f64 * 4.0;
                    let y = 40.0 * (x / 50.0).sin();
                    Point::new(
                        x + rng.random_range(-1.0..1.0),
                        y + rng.random_range(-1.0..1.0),
                    )
                })
                .collect();
            // A squared tolerance above 1 enables reparameterization, after
            // which sample parameters may fall slightly outside [0, 1].
            let tolerance = 2.0;
            let curves = fit_curve(&points, tolerance * tolerance);
            assert_chained(&curves, &points);
            for &p in &points {
                let d = distance_to_curves(&curves, p, (-0.5, 1.5));
                assert!(d <= tolerance + 1e-9, "sample {p:?} is {d} away");
            }
        }
    }

    #[test]
    fn sharp_corner_is_split() {
        let mut points: Vec<Point> = (0..=10).map(|i| Point::new(i as f64 * 10.0, 0.0)).collect();
        points.extend((1..=10).map(|i| Point::new(100.0, i as f64 * 10.0)));
        let curves = fit_curve(&points, 0.25);
        assert!(curves.len() >= 2);
        assert_chained(&curves, &points);
        for &p in &points {
            assert!(distance_to_curves(&curves, p, (0.0, 1.0)) < 0.5);
        }
    }

    #[test]
    fn sink_receives_segments_in_order() {
        struct Counter {
            count: usize,
            last_end: Option<Point>,
        }
        impl CurveSink for Counter {
            fn push_cubic(&mut self, curve: CubicBez) {
                if let Some(end) = self.last_end {
                    assert_eq!(end, curve.p0);
                }
                self.last_end = Some(curve.p3);
                self.count += 1;
            }
        }
        let points = quarter_circle(50.0, 30);
        let mut sink = Counter {
            count: 0,
            last_end: None,
        };
        let options = FitOptions::new(0.01).unwrap();
        fit_curve_with(&points, &options, &mut sink);
        assert_eq!(sink.count, fit_curve(&points, 0.01).len());
        assert_eq!(sink.last_end, Some(points[29]));
    }

    #[test]
    fn polyline_validation() {
        assert_eq!(
            Polyline::new(alloc::vec![Point::new(1.0, 1.0)]),
            Err(GeometryError::TooFewPoints { found: 1 })
        );
        assert_eq!(
            Polyline::try_from(Vec::<Point>::new()),
            Err(GeometryError::TooFewPoints { found: 0 })
        );
        let line = Polyline::new(quarter_circle(10.0, 8)).unwrap();
        assert_eq!(line.len(), 8);
        assert_eq!(line.fit(0.01), fit_curve(line.points(), 0.01));
        let mut out = Vec::new();
        line.fit_with(&FitOptions::default(), &mut out);
        assert!(!out.is_empty());
    }

    #[test]
    fn options_validation() {
        assert!(FitOptions::new(0.5).is_ok());
        assert_eq!(
            FitOptions::new(0.0),
            Err(GeometryError::InvalidTolerance(0.0))
        );
        assert!(FitOptions::new(f64::NAN).is_err());
        assert!(FitOptions::new(f64::INFINITY).is_err());
        assert_eq!(
            FitOptions::default().max_reparameterizations,
            FitOptions::DEFAULT_MAX_REPARAMETERIZATIONS
        );
    }

    #[test]
    #[should_panic(expected = "at least 2 points")]
    fn single_point_panics() {
        fit_curve(&[Point::new(0.0, 0.0)], 1.0);
    }

    #[test]
    fn chord_length_parameters() {
        let region = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 3.0),
        ];
        assert_eq!(chord_length_parameterize(&region), [0.0, 0.25, 1.0]);
        let same = [Point::new(2.0, 2.0); 3];
        assert_eq!(chord_length_parameterize(&same), [0.0, 0.5, 1.0]);
    }

    #[test]
    fn newton_step_moves_towards_closest_point() {
        let c = CubicBez::new((0.0, 0.0), (30.0, 60.0), (70.0, 60.0), (100.0, 0.0));
        let q = c.points();
        let q1 = derivative(&q);
        let q2 = derivative(&q1);
        let p = c.eval(0.4) + Vec2::new(0.0, 1.0);
        let u = newton_raphson_root_find(&q, &q1, &q2, p, 0.3);
        assert!((u - 0.4).abs() < (0.3f64 - 0.4).abs());

        // A point curve has a zero denominator.
        let flat = [Point::new(1.0, 1.0); 4];
        let d1 = derivative(&flat);
        let d2 = derivative(&d1);
        assert_eq!(newton_raphson_root_find(&flat, &d1, &d2, p, 0.3), 0.3);
    }

    #[test]
    fn generate_bezier_falls_back_on_bad_tangents() {
        // Tangents pointing away from the samples give negative alphas.
        let region = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 1.0),
            Point::new(3.0, 0.0),
        ];
        let u = chord_length_parameterize(&region);
        let c = generate_bezier(&region, &u, Vec2::new(0.0, -1.0), Vec2::new(0.0, -1.0));
        let down = Vec2::new(0.0, -1.0);
        assert_eq!(c, heuristic_cubic(region[0], region[3], down, down));
    }

    #[test]
    fn center_tangent_points_backwards() {
        let region = [Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0)];
        assert_eq!(center_tangent(&region, 1), Vec2::new(-1.0, 0.0));
    }
}
