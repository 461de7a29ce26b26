// Copyright 2024 the Bezkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive operations on Bézier control polygons.
//!
//! These work on plain slices and arrays of control points so that they can
//! be shared by the fitter, the clipper and the typed curves. A curve of
//! degree `n` has `n + 1` control points.

use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::Point;

/// Evaluate a Bézier curve of the given degree at parameter `t`, using de
/// Casteljau's algorithm.
///
/// Only the first `degree + 1` points of `curve` are used. Evaluating at 0
/// and 1 returns the first and last control points exactly.
///
/// # Panics
///
/// Panics if `curve` has fewer than `degree + 1` points.
///
/// # Examples
///
/// ```
/// use bezkit::bezier::evaluate;
/// use bezkit::Point;
///
/// let curve = [
///     Point::new(0.0, 0.0),
///     Point::new(0.0, 1.0),
///     Point::new(1.0, 1.0),
///     Point::new(1.0, 0.0),
/// ];
/// assert_eq!(evaluate(&curve, 3, 1.0), Point::new(1.0, 0.0));
/// assert_eq!(evaluate(&curve, 3, 0.5), Point::new(0.5, 0.75));
/// ```
pub fn evaluate(curve: &[Point], degree: usize, t: f64) -> Point {
    let mut scratch: SmallVec<[Point; 4]> = curve[..=degree].iter().copied().collect();
    for i in 1..=degree {
        for j in 0..=degree - i {
            scratch[j] = scratch[j].lerp(scratch[j + 1], t);
        }
    }
    scratch[0]
}

/// The control points of the derivative (hodograph) of a Bézier curve.
///
/// For `n + 1` input points the result has `n` points, the i-th being
/// `n * (p[i + 1] - p[i])`. A single point, or no points, yields an empty
/// result.
pub fn derivative(curve: &[Point]) -> Vec<Point> {
    if curve.len() < 2 {
        return Vec::new();
    }
    let degree = (curve.len() - 1) as f64;
    curve
        .windows(2)
        .map(|w| ((w[1] - w[0]) * degree).to_point())
        .collect()
}

/// Split a cubic Bézier at `t` with de Casteljau subdivision.
///
/// The result holds seven points: `[0..4]` is the part over `[0, t]` and
/// `[3..7]` the part over `[t, 1]`, sharing the split point at index 3.
pub fn split(curve: &[Point; 4], t: f64) -> [Point; 7] {
    let [p0, p1, p2, p3] = *curve;
    if t == 0.5 {
        let p01 = p0.midpoint(p1);
        let p12 = p1.midpoint(p2);
        let p23 = p2.midpoint(p3);
        let p012 = p01.midpoint(p12);
        let p123 = p12.midpoint(p23);
        let p0123 = p012.midpoint(p123);
        return [p0, p01, p012, p0123, p123, p23, p3];
    }
    let p01 = p0.lerp(p1, t);
    let p12 = p1.lerp(p2, t);
    let p23 = p2.lerp(p3, t);
    let p012 = p01.lerp(p12, t);
    let p123 = p12.lerp(p23, t);
    let p0123 = p012.lerp(p123, t);
    [p0, p01, p012, p0123, p123, p23, p3]
}

/// The left half of a [`split`] result.
#[inline]
pub(crate) fn left_half(parts: &[Point; 7]) -> [Point; 4] {
    [parts[0], parts[1], parts[2], parts[3]]
}

/// The right half of a [`split`] result.
#[inline]
pub(crate) fn right_half(parts: &[Point; 7]) -> [Point; 4] {
    [parts[3], parts[4], parts[5], parts[6]]
}

/// The control points of the portion of a cubic Bézier over `[min, max]`.
///
/// The curve is split at `min`, then the right part is split again at the
/// parameter that `max` maps to within it. When `min` is 1 the result
/// collapses onto the end point.
pub fn split_range(curve: &[Point; 4], min: f64, max: f64) -> [Point; 4] {
    let mut part = *curve;
    if min > 0.0 {
        part = right_half(&split(&part, min));
    }
    if max < 1.0 {
        let remaining = 1.0 - min;
        if remaining == 0.0 {
            return [part[3]; 4];
        }
        part = left_half(&split(&part, (max - min) / remaining));
    }
    part
}

/// The Bernstein basis polynomial `B(i, n)` at `t`.
///
/// This is `C(n, i) t^i (1 - t)^(n - i)`. It is zero when `i > n`.
pub fn bernstein(i: usize, n: usize, t: f64) -> f64 {
    if i > n {
        return 0.0;
    }
    let mut binomial = 1.0;
    for k in 0..i.min(n - i) {
        binomial = binomial * (n - k) as f64 / (k + 1) as f64;
    }
    let mt = 1.0 - t;
    let mut result = binomial;
    for _ in 0..i {
        result *= t;
    }
    for _ in 0..n - i {
        result *= mt;
    }
    result
}
