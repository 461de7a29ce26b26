// Copyright 2024 the Bezkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Affine maps of the plane.

use core::ops::Mul;

use crate::{Point, Vec2};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// An affine map of the plane: a linear part followed by an offset.
///
/// With `coeffs = [a, b, c, d, e, f]`, a point `(x, y)` maps to
/// `(a x + c y + e, b x + d y + f)`. The columns `(a, b)` and `(c, d)` are
/// the images of the unit axes.
///
/// Curves are moved with `affine * curve`; the control points are mapped
/// one by one, which is exact for Béziers.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Affine([f64; 6]);

impl Affine {
    /// The map leaving every point where it is.
    pub const IDENTITY: Affine = Affine([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    /// A map from raw coefficients.
    #[inline]
    pub const fn new(coeffs: [f64; 6]) -> Affine {
        Affine(coeffs)
    }

    /// Rotation about the origin by `angle` radians, counter-clockwise in a
    /// y-up space.
    #[inline]
    pub fn rotate(angle: f64) -> Affine {
        let (sin, cos) = angle.sin_cos();
        Affine([cos, sin, -sin, cos, 0.0, 0.0])
    }

    /// Shift by `offset`.
    #[inline]
    pub fn translate(offset: impl Into<Vec2>) -> Affine {
        let Vec2 { x, y } = offset.into();
        Affine([1.0, 0.0, 0.0, 1.0, x, y])
    }

    /// This map followed by a rotation about the origin.
    #[inline]
    #[must_use]
    pub fn then_rotate(self, angle: f64) -> Affine {
        let rotation = Affine::rotate(angle);
        let [a, b, c, d, e, f] = self.0;
        let col = |x: f64, y: f64| rotation.apply_linear(Vec2::new(x, y));
        let (ab, cd, ef) = (col(a, b), col(c, d), col(e, f));
        Affine([ab.x, ab.y, cd.x, cd.y, ef.x, ef.y])
    }

    /// The linear part alone applied to `v`; offsets do not move vectors.
    #[inline]
    pub fn apply_linear(self, v: Vec2) -> Vec2 {
        let [a, b, c, d, _, _] = self.0;
        Vec2::new(a * v.x + c * v.y, b * v.x + d * v.y)
    }
}

impl Default for Affine {
    #[inline]
    fn default() -> Affine {
        Affine::IDENTITY
    }
}

impl Mul<Point> for Affine {
    type Output = Point;

    #[inline]
    fn mul(self, p: Point) -> Point {
        let [.., e, f] = self.0;
        (self.apply_linear(p.to_vec2()) + Vec2::new(e, f)).to_point()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Affine, Point, Vec2};
    use core::f64::consts::FRAC_PI_2;

    fn assert_near(p0: Point, p1: Point) {
        assert!(p0.is_near(p1, 1e-12), "{p0:?} != {p1:?}");
    }

    #[test]
    fn maps_points() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(Affine::default() * p, p);
        assert_eq!(Affine::translate((5.0, -6.0)) * p, Point::new(8.0, -2.0));
        assert_near(Affine::rotate(FRAC_PI_2) * p, Point::new(-4.0, 3.0));
        assert_eq!(Affine::new([2.0, 0.0, 0.0, 2.0, 1.0, 1.0]) * p, Point::new(7.0, 9.0));
    }

    #[test]
    fn rotation_follows_translation() {
        let p = Point::new(1.0, 0.0);
        let a = Affine::translate((1.0, 0.0)).then_rotate(FRAC_PI_2);
        assert_near(a * p, Point::new(0.0, 2.0));
        assert_near(a * p, Affine::rotate(FRAC_PI_2) * (Affine::translate((1.0, 0.0)) * p));
    }

    #[test]
    fn vectors_ignore_the_offset() {
        let a = Affine::translate((10.0, 10.0)).then_rotate(FRAC_PI_2);
        let v = a.apply_linear(Vec2::new(1.0, 0.0));
        assert!((v - Vec2::new(0.0, 1.0)).length() < 1e-12);
    }

    #[test]
    fn puts_a_direction_on_the_x_axis() {
        let dir = Vec2::new(3.0, 4.0);
        let a = Affine::rotate((-dir.y).atan2(dir.x));
        let v = a.apply_linear(dir);
        assert!((v.x - 5.0).abs() < 1e-12 && v.y.abs() < 1e-12, "{v:?}");
    }
}
