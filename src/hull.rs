// Copyright 2024 the Bezkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Convex hulls of point sets.

use alloc::vec::Vec;

use crate::Point;

/// Whether walking `p0 -> p1 -> p2` fails to turn left, in a y-up space.
///
/// Clockwise turns are right turns, and so is continuing straight on in the
/// same direction. Coincident points and doubling back are not turns at all
/// and return `false`.
pub fn right_turn(p0: Point, p1: Point, p2: Point) -> bool {
    if p0 == p1 || p1 == p2 {
        return false;
    }
    let d1 = p1 - p0;
    let d2 = p2 - p1;
    let cross = d1.cross(d2);
    if cross < 0.0 {
        true
    } else if cross == 0.0 {
        d1.dot(d2) > 0.0
    } else {
        false
    }
}

/// The convex hull of `points`, by Andrew's monotone chain.
///
/// The hull is returned counter-clockwise (in a y-up space), starting from
/// the point with the smallest x, and smallest y among those. Every vertex is
/// one of the input points; duplicates and points in the middle of a hull
/// edge are left out. Fewer than three distinct input points are returned
/// as they are, sorted.
///
/// ```
/// use bezkit::{convex_hull, Point};
///
/// let points = [
///     Point::new(0.0, 0.0),
///     Point::new(2.0, 0.0),
///     Point::new(1.0, 1.0),
///     Point::new(2.0, 2.0),
///     Point::new(0.0, 2.0),
/// ];
/// let hull = convex_hull(&points);
/// assert_eq!(
///     hull,
///     [
///         Point::new(0.0, 0.0),
///         Point::new(2.0, 0.0),
///         Point::new(2.0, 2.0),
///         Point::new(0.0, 2.0),
///     ]
/// );
/// ```
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted.dedup();
    if sorted.len() < 3 {
        return sorted;
    }

    let mut lower: Vec<Point> = Vec::with_capacity(sorted.len());
    for &p in &sorted {
        push_hull_point(&mut lower, p);
    }
    let mut upper: Vec<Point> = Vec::with_capacity(sorted.len());
    for &p in sorted.iter().rev() {
        push_hull_point(&mut upper, p);
    }
    // Each chain ends where the other begins.
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

fn push_hull_point(chain: &mut Vec<Point>, p: Point) {
    while chain.len() >= 2 && right_turn(chain[chain.len() - 2], chain[chain.len() - 1], p) {
        chain.pop();
    }
    chain.push(p);
}
