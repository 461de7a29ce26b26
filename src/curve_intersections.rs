// Copyright 2024 the Bezkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Intersections of cubic Béziers with each other and with lines.
//!
//! Curve/curve intersection uses Bézier clipping (Sederberg and Nishita):
//! one curve is repeatedly clipped to the fat line of the other, with the
//! roles swapped after every clip. Curve/line intersection rotates the line
//! onto the x axis and solves a cubic.

use alloc::vec::Vec;

use arrayvec::ArrayVec;
use log::{debug, trace};

use crate::bezier::{self, bernstein};
use crate::common::{solve_cubic, EPSILON, TOLERANCE};
use crate::{Affine, CubicBez, Line, ParamCurve, ParamCurveExtrema, Point, Rect, Vec2};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// Clipping recursion deeper than this abandons the branch.
pub const MAX_CLIP_DEPTH: u32 = 32;

/// A single curve/curve query makes at most this many clipping calls.
pub const MAX_CLIP_CALLS: u32 = 4096;

/// A point where two curves, or a curve and a line, meet.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Intersection {
    /// Parameter of the intersection on the first curve.
    pub parameter_on_a: f64,
    /// Parameter of the intersection on the second curve or line.
    pub parameter_on_b: f64,
    /// The intersection point, evaluated on the first curve.
    pub point: Point,
}

/// A band around the baseline of a curve that is guaranteed to contain the
/// whole curve.
///
/// Distances are signed perpendicular distances to the infinite baseline;
/// positive values lie to the left when looking from its start to its end in
/// a y-up space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FatLine {
    /// The line through the first and last control points.
    pub baseline: Line,
    /// The smallest signed distance of any point on the curve.
    pub dmin: f64,
    /// The largest signed distance of any point on the curve.
    pub dmax: f64,
}

impl FatLine {
    /// The fat line of a cubic.
    ///
    /// With interior distances `d1`, `d2` on the same side of the baseline
    /// the curve stays within 3/4 of them, and within 4/9 when they are on
    /// opposite sides. A cubic that is an exact degree elevation of a
    /// quadratic gets the quadratic's fat line. Returns `None` when the end
    /// points coincide, since there is no baseline to measure from.
    pub fn from_cubic(curve: &CubicBez) -> Option<FatLine> {
        if let Some(control) = elevated_quadratic(curve) {
            return FatLine::from_quadratic(curve.p0, control, curve.p3);
        }
        let baseline = curve.baseline();
        let d1 = signed_distance(&baseline, curve.p1)?;
        let d2 = signed_distance(&baseline, curve.p2)?;
        let factor = if d1 * d2 > 0.0 { 3.0 / 4.0 } else { 4.0 / 9.0 };
        Some(FatLine {
            baseline,
            dmin: factor * d1.min(d2).min(0.0),
            dmax: factor * d1.max(d2).max(0.0),
        })
    }

    /// The fat line of a quadratic Bézier with control points `p0`, `p1`,
    /// `p2`.
    ///
    /// A quadratic reaches exactly half of the distance of its control
    /// point. Returns `None` when the end points coincide.
    pub fn from_quadratic(p0: Point, p1: Point, p2: Point) -> Option<FatLine> {
        let baseline = Line::new(p0, p2);
        let d1 = signed_distance(&baseline, p1)?;
        Some(FatLine {
            baseline,
            dmin: 0.5 * d1.min(0.0),
            dmax: 0.5 * d1.max(0.0),
        })
    }

    /// The signed distance from the baseline to `p`.
    ///
    /// Never fails, since a fat line always has a baseline of non-zero
    /// length.
    pub fn signed_distance(&self, p: Point) -> f64 {
        signed_distance(&self.baseline, p).unwrap_or(0.0)
    }
}

/// The control point of the quadratic that `curve` was degree-elevated
/// from, if there is one.
fn elevated_quadratic(curve: &CubicBez) -> Option<Point> {
    let from_start = curve.p0 + (curve.p1 - curve.p0) * 1.5;
    let from_end = curve.p3 + (curve.p2 - curve.p3) * 1.5;
    from_start
        .is_near(from_end, EPSILON)
        .then(|| from_start.midpoint(from_end))
}

/// Signed distance from the infinite line through `line` to `p`, or `None`
/// for a zero-length line.
fn signed_distance(line: &Line, p: Point) -> Option<f64> {
    let dir = line.direction();
    let len = dir.length();
    if len == 0.0 {
        return None;
    }
    Some(dir.cross(p - line.p0) / len)
}

/// A zero-width fat line through `point`, perpendicular to the chord of
/// `points`.
fn across_chord(point: Point, points: &[Point; 4]) -> FatLine {
    let chord = points[3] - points[0];
    let chord = if chord == Vec2::ZERO {
        Vec2::new(1.0, 0.0)
    } else {
        chord
    };
    FatLine {
        baseline: Line::new(point, point + chord.perp()),
        dmin: 0.0,
        dmax: 0.0,
    }
}

/// The upper and lower chains of the convex hull of the distance control
/// points `(i / 3, d[i])`, both running from `t = 0` to `t = 1`.
fn distance_hull(d: [f64; 4]) -> (ArrayVec<Point, 4>, ArrayVec<Point, 4>) {
    let p0 = Point::new(0.0, d[0]);
    let p1 = Point::new(1.0 / 3.0, d[1]);
    let p2 = Point::new(2.0 / 3.0, d[2]);
    let p3 = Point::new(1.0, d[3]);
    // Vertical distances of p1 and p2 from the chord [p0, p3].
    let dist1 = d[1] - (2.0 * d[0] + d[3]) / 3.0;
    let dist2 = d[2] - (d[0] + 2.0 * d[3]) / 3.0;

    // Assume p1 is on top; flip afterwards if not.
    let (top, bottom): (&[Point], &[Point]) = if dist1 * dist2 < 0.0 {
        (&[p0, p1, p3], &[p0, p2, p3])
    } else {
        // Same side: the chord is a hull edge, and the hull is a triangle
        // when one middle point lies inside the triangle of the other.
        let (dist1, dist2) = (dist1.abs(), dist2.abs());
        if dist1 >= 2.0 * dist2 {
            (&[p0, p1, p3], &[p0, p3])
        } else if dist2 >= 2.0 * dist1 {
            (&[p0, p2, p3], &[p0, p3])
        } else {
            (&[p0, p1, p2, p3], &[p0, p3])
        }
    };
    let top: ArrayVec<Point, 4> = top.iter().copied().collect();
    let bottom: ArrayVec<Point, 4> = bottom.iter().copied().collect();
    if dist1 < 0.0 || (dist1 == 0.0 && dist2 < 0.0) {
        (bottom, top)
    } else {
        (top, bottom)
    }
}

/// The parameter interval of `points` that can lie within the fat line, or
/// `None` if the curve misses it entirely.
fn clip_to_fat_line(points: &[Point; 4], fat_line: &FatLine) -> Option<(f64, f64)> {
    let d = points.map(|p| fat_line.signed_distance(p));
    let (mut top, mut bottom) = distance_hull(d);
    let t_min = walk_hull_into_band(&top, &bottom, fat_line.dmin, fat_line.dmax)?;
    // Reversing the chains makes them start at the right corner.
    top.reverse();
    bottom.reverse();
    let t_max = walk_hull_into_band(&top, &bottom, fat_line.dmin, fat_line.dmax)?;
    if t_min > t_max {
        return None;
    }
    Some((t_min, t_max))
}

/// Walk from the first corner of the hull until the hull enters
/// `[d_min, d_max]`, returning the `t` where it does.
fn walk_hull_into_band(top: &[Point], bottom: &[Point], d_min: f64, d_max: f64) -> Option<f64> {
    let start = top[0];
    if start.y < d_min {
        walk_edges_to_threshold(top, true, d_min)
    } else if start.y > d_max {
        walk_edges_to_threshold(bottom, false, d_max)
    } else {
        Some(start.x)
    }
}

fn walk_edges_to_threshold(vertices: &[Point], upwards: bool, threshold: f64) -> Option<f64> {
    for edge in vertices.windows(2) {
        let (p, q) = (edge[0], edge[1]);
        if (upwards && q.y >= threshold) || (!upwards && q.y <= threshold) {
            return if (q.y - threshold).abs() < EPSILON {
                Some(q.x)
            } else {
                Some(p.x + (threshold - p.y) * (q.x - p.x) / (q.y - p.y))
            };
        }
    }
    // The whole chain stays outside the band.
    None
}

/// Which of the two input curves is the one being clipped in a call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Clipped {
    A,
    B,
}

impl Clipped {
    #[inline]
    fn other(self) -> Clipped {
        match self {
            Clipped::A => Clipped::B,
            Clipped::B => Clipped::A,
        }
    }
}

/// A portion of one input curve, with its parameter range on that curve.
#[derive(Clone, Copy, Debug)]
struct Piece {
    points: [Point; 4],
    t0: f64,
    t1: f64,
}

impl Piece {
    fn whole(curve: &CubicBez) -> Piece {
        Piece {
            points: curve.points(),
            t0: 0.0,
            t1: 1.0,
        }
    }

    #[inline]
    fn span(&self) -> f64 {
        self.t1 - self.t0
    }

    #[inline]
    fn mid(&self) -> f64 {
        0.5 * (self.t0 + self.t1)
    }

    fn halves(&self) -> (Piece, Piece) {
        let parts = bezier::split(&self.points, 0.5);
        let mid = self.mid();
        (
            Piece {
                points: bezier::left_half(&parts),
                t0: self.t0,
                t1: mid,
            },
            Piece {
                points: bezier::right_half(&parts),
                t0: mid,
                t1: self.t1,
            },
        )
    }

    /// Whether the control polygons of two pieces have overlapping bounds.
    fn hull_bounds_overlap(&self, other: &Piece) -> bool {
        let bounds = |points: &[Point; 4]| {
            Rect::from_points(points[0], points[3])
                .union_pt(points[1])
                .union_pt(points[2])
        };
        bounds(&self.points).overlaps(bounds(&other.points))
    }
}

struct Clipper<'a> {
    a: &'a CubicBez,
    b: &'a CubicBez,
    calls: u32,
    hits: Vec<Intersection>,
}

impl Clipper<'_> {
    /// Clip `p` against the fat line of `q`, then recurse with the roles
    /// swapped. `clipped` names the input curve `p` belongs to.
    fn clip(&mut self, p: Piece, q: Piece, old_diff: f64, clipped: Clipped, depth: u32) {
        let depth = depth + 1;
        self.calls += 1;
        if depth > MAX_CLIP_DEPTH || self.calls > MAX_CLIP_CALLS {
            debug!(
                "giving up clipping at depth {depth} after {} calls, t in [{}, {}]",
                self.calls, p.t0, p.t1
            );
            return;
        }
        if !p.hull_bounds_overlap(&q) {
            return;
        }

        let [q0, _, _, q3] = q.points;
        let (p, diff) = if q0.x == q3.x && q0.y != q3.y && q.span() < TOLERANCE && depth > 3 {
            // q has already converged onto a vertical segment.
            let mid = p.mid();
            (
                Piece {
                    points: p.points,
                    t0: mid,
                    t1: mid,
                },
                0.0,
            )
        } else {
            let fat_line = match FatLine::from_cubic(&CubicBez::from_points(q.points)) {
                Some(fat_line) => fat_line,
                // q has shrunk to a point: clip p to the line through it
                // across p's chord.
                None if q.span() < TOLERANCE => across_chord(q0, &p.points),
                None => {
                    // No baseline to clip against, so bisect q instead.
                    let (q_left, q_right) = q.halves();
                    self.clip(p, q_left, old_diff, clipped, depth);
                    self.clip(p, q_right, old_diff, clipped, depth);
                    return;
                }
            };
            let Some((min_clip, max_clip)) = clip_to_fat_line(&p.points, &fat_line) else {
                return;
            };
            let span = p.span();
            (
                Piece {
                    points: bezier::split_range(&p.points, min_clip, max_clip),
                    t0: p.t0 + span * min_clip,
                    t1: p.t0 + span * max_clip,
                },
                max_clip - min_clip,
            )
        };

        if old_diff > 0.5 && diff > 0.5 {
            // Two weak clips in a row: bisect the longer piece.
            if p.span() > q.span() {
                let (p_left, p_right) = p.halves();
                self.clip(q, p_left, diff, clipped.other(), depth);
                self.clip(q, p_right, diff, clipped.other(), depth);
            } else {
                let (q_left, q_right) = q.halves();
                self.clip(q_left, p, diff, clipped.other(), depth);
                self.clip(q_right, p, diff, clipped.other(), depth);
            }
        } else if q.span().max(p.span()) < TOLERANCE {
            self.record(clipped, p.mid(), q.mid());
        } else {
            self.clip(q, p, diff, clipped.other(), depth);
        }
    }

    /// Report a hit at `t_clipped` on the clipped curve and `t_other` on
    /// the other one, unless it was already found.
    fn record(&mut self, clipped: Clipped, t_clipped: f64, t_other: f64) {
        let (t_a, t_b) = match clipped {
            Clipped::A => (t_clipped, t_other),
            Clipped::B => (t_other, t_clipped),
        };
        let duplicate = self.hits.iter().any(|hit| {
            (hit.parameter_on_a - t_a).abs() < TOLERANCE
                && (hit.parameter_on_b - t_b).abs() < TOLERANCE
        });
        if duplicate {
            return;
        }
        let hit = Intersection {
            parameter_on_a: t_a,
            parameter_on_b: t_b,
            point: self.a.eval(t_a),
        };
        trace!(
            "intersection at t_a = {t_a}, t_b = {t_b}, residual {}",
            intersection_residual(self.a, self.b, &hit)
        );
        self.hits.push(hit);
    }
}

/// Find the points where two cubic Béziers cross.
///
/// Results are sorted by `parameter_on_a`. Each parameter is accurate to
/// about [`TOLERANCE`].
///
/// Curves that overlap along a stretch share infinitely many points. The
/// search is then cut off by [`MAX_CLIP_DEPTH`] and [`MAX_CLIP_CALLS`], and
/// returns the finite sample of shared points it managed to isolate along
/// the stretch, each lying on both curves. Branches abandoned at the cutoff
/// report nothing.
///
/// # Examples
///
/// ```
/// use bezkit::{intersect_curve_curve, CubicBez, ParamCurve};
///
/// let a = CubicBez::new((0.0, 0.0), (1.0, 1.0), (2.0, 1.0), (3.0, 0.0));
/// let b = CubicBez::new((1.5, -1.0), (1.0, 0.0), (2.0, 1.0), (1.6, 2.0));
/// let hits = intersect_curve_curve(&a, &b);
/// assert_eq!(hits.len(), 1);
/// let on_b = b.eval(hits[0].parameter_on_b);
/// assert!((hits[0].point - on_b).length() < 1e-6);
/// ```
pub fn intersect_curve_curve(a: &CubicBez, b: &CubicBez) -> Vec<Intersection> {
    if !a.bounding_box().overlaps(b.bounding_box()) {
        return Vec::new();
    }
    let mut clipper = Clipper {
        a,
        b,
        calls: 0,
        hits: Vec::new(),
    };
    clipper.clip(Piece::whole(a), Piece::whole(b), 0.0, Clipped::A, 0);
    let mut hits = clipper.hits;
    hits.sort_by(|x, y| x.parameter_on_a.total_cmp(&y.parameter_on_a));
    hits
}

/// Find the points where a cubic Bézier crosses a line segment.
///
/// `parameter_on_a` is the parameter on the curve and `parameter_on_b` the
/// parameter on the line. Results are in ascending curve parameter order.
/// A zero-length line, or a curve lying along the line, yields no
/// intersections.
pub fn intersect_curve_line(curve: &CubicBez, line: &Line) -> Vec<Intersection> {
    let mut result = Vec::new();
    let dir = line.direction();
    let length = dir.length();
    if length == 0.0 {
        return result;
    }
    // Map the line onto the positive x axis, starting at the origin.
    let transform = Affine::translate(-line.p0.to_vec2()).then_rotate((-dir.y).atan2(dir.x));
    let rotated = (transform * *curve).points();
    let [y0, y1, y2, y3] = rotated.map(|p| p.y);
    let a = -y0 + 3.0 * y1 - 3.0 * y2 + y3;
    let b = 3.0 * y0 - 6.0 * y1 + 3.0 * y2;
    let c = -3.0 * y0 + 3.0 * y1;
    let d = y0;
    for t in solve_cubic(a, b, c, d, 0.0, 1.0) {
        let x = bezier::evaluate(&rotated, 3, t).x;
        if (0.0..=length).contains(&x) {
            result.push(Intersection {
                parameter_on_a: t,
                parameter_on_b: x / length,
                point: curve.eval(t),
            });
        }
    }
    result
}

/// The distance between the two curves at the parameters of `hit`,
/// evaluated through the Bernstein basis.
///
/// For a hit from [`intersect_curve_curve`] this is close to zero.
pub fn intersection_residual(a: &CubicBez, b: &CubicBez, hit: &Intersection) -> f64 {
    let eval = |curve: &CubicBez, t: f64| {
        let mut sum = Vec2::ZERO;
        for (i, p) in curve.points().iter().enumerate() {
            sum += p.to_vec2() * bernstein(i, 3, t);
        }
        sum.to_point()
    };
    eval(a, hit.parameter_on_a).distance(eval(b, hit.parameter_on_b))
}
