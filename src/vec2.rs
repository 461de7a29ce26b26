// Copyright 2024 the Bezkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Displacements in the plane.

use core::fmt;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::Point;

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// A displacement in the plane, such as a tangent, a chord, or the
/// difference of two [`Point`]s.
///
/// Coordinates are y-up wherever orientation matters: a positive
/// [`cross`](Vec2::cross) product means a counter-clockwise turn.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Vec2 {
    /// The zero displacement.
    pub const ZERO: Vec2 = Vec2::new(0.0, 0.0);

    /// A displacement with the given components.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Vec2 {
        Vec2 { x, y }
    }

    /// The point reached by moving from the origin by `self`.
    #[inline]
    pub const fn to_point(self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Dot product.
    #[inline]
    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// The z component of the 3D cross product, so `(1, 0) × (0, 1) = 1`.
    #[inline]
    pub fn cross(self, other: Vec2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// `self` turned a quarter turn counter-clockwise.
    #[inline]
    #[must_use]
    pub fn perp(self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    /// Euclidean length.
    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Squared Euclidean length.
    #[inline]
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    /// The unit vector in the direction of `self`.
    ///
    /// The zero vector has no direction and comes back unchanged, so a
    /// degenerate tangent stays zero instead of turning into `NaN`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bezkit::Vec2;
    /// assert_eq!(Vec2::new(3.0, 4.0).normalize(), Vec2::new(0.6, 0.8));
    /// assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
    /// ```
    #[inline]
    #[must_use]
    pub fn normalize(self) -> Vec2 {
        let length = self.length();
        if length == 0.0 {
            self
        } else {
            self / length
        }
    }

    /// Whether both components are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

macro_rules! componentwise {
    ($($op:ident :: $method:ident, $assign:ident :: $assign_method:ident, $sym:tt;)*) => {$(
        impl $op for Vec2 {
            type Output = Vec2;

            #[inline]
            fn $method(self, other: Vec2) -> Vec2 {
                Vec2::new(self.x $sym other.x, self.y $sym other.y)
            }
        }

        impl $assign for Vec2 {
            #[inline]
            fn $assign_method(&mut self, other: Vec2) {
                *self = *self $sym other;
            }
        }
    )*};
}

macro_rules! scalar {
    ($($op:ident :: $method:ident, $assign:ident :: $assign_method:ident, $sym:tt;)*) => {$(
        impl $op<f64> for Vec2 {
            type Output = Vec2;

            #[inline]
            fn $method(self, k: f64) -> Vec2 {
                Vec2::new(self.x $sym k, self.y $sym k)
            }
        }

        impl $assign<f64> for Vec2 {
            #[inline]
            fn $assign_method(&mut self, k: f64) {
                *self = *self $sym k;
            }
        }
    )*};
}

componentwise! {
    Add::add, AddAssign::add_assign, +;
    Sub::sub, SubAssign::sub_assign, -;
}

scalar! {
    Mul::mul, MulAssign::mul_assign, *;
    Div::div, DivAssign::div_assign, /;
}

impl Mul<Vec2> for f64 {
    type Output = Vec2;

    #[inline]
    fn mul(self, v: Vec2) -> Vec2 {
        v * self
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Vec2 {
    #[inline]
    fn from((x, y): (f64, f64)) -> Vec2 {
        Vec2::new(x, y)
    }
}

impl From<Vec2> for (f64, f64) {
    #[inline]
    fn from(v: Vec2) -> (f64, f64) {
        (v.x, v.y)
    }
}

impl fmt::Display for Vec2 {
    /// Formats as `⟨x, y⟩`, passing any precision on to both components.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("⟨")?;
        fmt::Display::fmt(&self.x, f)?;
        f.write_str(", ")?;
        fmt::Display::fmt(&self.y, f)?;
        f.write_str("⟩")
    }
}

#[cfg(feature = "mint")]
impl From<Vec2> for mint::Vector2<f64> {
    #[inline]
    fn from(v: Vec2) -> mint::Vector2<f64> {
        mint::Vector2 { x: v.x, y: v.y }
    }
}

#[cfg(feature = "mint")]
impl From<mint::Vector2<f64>> for Vec2 {
    #[inline]
    fn from(v: mint::Vector2<f64>) -> Vec2 {
        Vec2::new(v.x, v.y)
    }
}
