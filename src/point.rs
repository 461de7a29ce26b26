// Copyright 2024 the Bezkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Positions in the plane.

use core::fmt;
use core::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::Vec2;

/// A position in the plane: a stroke sample, a control point, or a hit.
///
/// Positions and displacements are kept apart; subtracting two points gives
/// a [`Vec2`], and a point only moves by adding a [`Vec2`] to it.
#[derive(Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// The origin, `(0, 0)`.
    pub const ORIGIN: Point = Point::new(0.0, 0.0);

    /// A point with the given coordinates.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    /// The displacement from the origin to `self`.
    #[inline]
    pub const fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// The point a fraction `t` of the way from `self` to `other`.
    ///
    /// `t = 0` gives `self` exactly and `t = 1` gives `other` exactly.
    #[inline]
    pub fn lerp(self, other: Point, t: f64) -> Point {
        let s = 1.0 - t;
        Point::new(s * self.x + t * other.x, s * self.y + t * other.y)
    }

    /// The point halfway between `self` and `other`.
    #[inline]
    pub fn midpoint(self, other: Point) -> Point {
        self.lerp(other, 0.5)
    }

    /// Straight-line distance to `other`.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (other - self).length()
    }

    /// Squared straight-line distance to `other`.
    #[inline]
    pub fn distance_squared(self, other: Point) -> f64 {
        (other - self).length_squared()
    }

    /// Whether `other` lies within `accuracy` of `self` on each axis.
    ///
    /// This is a box test, not a disc test.
    #[inline]
    pub fn is_near(self, other: Point, accuracy: f64) -> bool {
        let d = other - self;
        let within = |v: f64| (-accuracy..=accuracy).contains(&v);
        within(d.x) && within(d.y)
    }

    /// Whether both coordinates are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.to_vec2().is_finite()
    }
}

impl Add<Vec2> for Point {
    type Output = Point;

    #[inline]
    fn add(self, v: Vec2) -> Point {
        (self.to_vec2() + v).to_point()
    }
}

impl Sub<Vec2> for Point {
    type Output = Point;

    #[inline]
    fn sub(self, v: Vec2) -> Point {
        (self.to_vec2() - v).to_point()
    }
}

impl AddAssign<Vec2> for Point {
    #[inline]
    fn add_assign(&mut self, v: Vec2) {
        *self = *self + v;
    }
}

impl SubAssign<Vec2> for Point {
    #[inline]
    fn sub_assign(&mut self, v: Vec2) {
        *self = *self - v;
    }
}

impl Sub for Point {
    type Output = Vec2;

    #[inline]
    fn sub(self, other: Point) -> Vec2 {
        self.to_vec2() - other.to_vec2()
    }
}

/// Scaling about the origin.
impl Mul<f64> for Point {
    type Output = Point;

    #[inline]
    fn mul(self, k: f64) -> Point {
        (self.to_vec2() * k).to_point()
    }
}

impl From<(f64, f64)> for Point {
    #[inline]
    fn from((x, y): (f64, f64)) -> Point {
        Point::new(x, y)
    }
}

impl From<Point> for (f64, f64) {
    #[inline]
    fn from(p: Point) -> (f64, f64) {
        (p.x, p.y)
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("").field(&self.x).field(&self.y).finish()
    }
}

impl fmt::Display for Point {
    /// Formats as `(x, y)`, passing any precision on to both components.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        fmt::Display::fmt(&self.x, f)?;
        f.write_str(", ")?;
        fmt::Display::fmt(&self.y, f)?;
        f.write_str(")")
    }
}

#[cfg(feature = "mint")]
impl From<Point> for mint::Point2<f64> {
    #[inline]
    fn from(p: Point) -> mint::Point2<f64> {
        mint::Point2 { x: p.x, y: p.y }
    }
}

#[cfg(feature = "mint")]
impl From<mint::Point2<f64>> for Point {
    #[inline]
    fn from(p: mint::Point2<f64>) -> Point {
        Point::new(p.x, p.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_and_displacements() {
        let p = Point::new(1.5, -2.0);
        assert_eq!(p - Vec2::new(10.0, 0.0), Point::new(-8.5, -2.0));
        assert_eq!(Point::ORIGIN - p, Vec2::new(-1.5, 2.0));
        assert_eq!(p * 2.0, Point::new(3.0, -4.0));
        let mut q = p;
        q += Vec2::new(0.5, 2.0);
        assert_eq!(q, Point::new(2.0, 0.0));
        q -= Vec2::new(2.0, 0.0);
        assert_eq!(q, Point::ORIGIN);
    }

    #[test]
    fn lerp_hits_the_ends() {
        let a = Point::new(0.1, 0.7);
        let b = Point::new(-3.3, 1e5);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(Point::new(0.0, 2.0).midpoint(Point::new(4.0, 0.0)), Point::new(2.0, 1.0));
    }

    #[test]
    fn distance() {
        let a = Point::new(-11.0, 1.0);
        let b = Point::new(-7.0, -2.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.distance(a), 5.0);
        assert_eq!(a.distance_squared(b), 25.0);
    }

    #[test]
    fn near() {
        let p = Point::new(1.0, 2.0);
        assert!(p.is_near(Point::new(1.0 + 1e-7, 2.0 - 1e-7), 1e-6));
        assert!(!p.is_near(Point::new(1.0, 2.1), 1e-6));
        // Box, not disc.
        assert!(p.is_near(Point::new(1.9, 2.9), 1.0));
    }

    #[test]
    fn formatting() {
        let p = Point::new(0.12345, 9.87654);
        assert_eq!(format!("{p}"), "(0.12345, 9.87654)");
        assert_eq!(format!("{p:.2}"), "(0.12, 9.88)");
        assert_eq!(format!("{:?}", Point::new(1.0, -0.5)), "(1.0, -0.5)");
        assert!(!Point::new(f64::NAN, 0.0).is_finite());
    }
}
