// Copyright 2024 the Bezkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned bounds.

use crate::{Point, Vec2};

/// An axis-aligned box, stored as its two extreme corners.
///
/// Every constructor except [`Rect::new`] orders the corners so that
/// `x0 <= x1` and `y0 <= y1`. A box may be degenerate: the bounds of a
/// horizontal line have zero height and still contain the line.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Smallest x.
    pub x0: f64,
    /// Smallest y.
    pub y0: f64,
    /// Largest x.
    pub x1: f64,
    /// Largest y.
    pub y1: f64,
}

impl Rect {
    /// A box from its corner coordinates, taken as given.
    #[inline]
    pub const fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
        Rect { x0, y0, x1, y1 }
    }

    /// The smallest box containing both points.
    #[inline]
    pub fn from_points(a: impl Into<Point>, b: impl Into<Point>) -> Rect {
        let (a, b) = (a.into(), b.into());
        Rect::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }

    /// The box spanned by `corner` and `corner + (width, height)`.
    ///
    /// Negative sizes extend the box towards smaller coordinates.
    #[inline]
    pub fn from_origin_size(corner: impl Into<Point>, width: f64, height: f64) -> Rect {
        let corner = corner.into();
        Rect::from_points(corner, corner + Vec2::new(width, height))
    }

    /// The corner with the smallest coordinates.
    #[inline]
    pub fn origin(&self) -> Point {
        Point::new(self.x0, self.y0)
    }

    /// Extent along x.
    #[inline]
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Extent along y.
    #[inline]
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// This box grown just enough to contain `p`.
    ///
    /// Folding `union_pt` over a sequence of points, starting from the
    /// degenerate box of the first one, gives their bounds.
    #[inline]
    #[must_use]
    pub fn union_pt(&self, p: Point) -> Rect {
        Rect::new(
            self.x0.min(p.x),
            self.y0.min(p.y),
            self.x1.max(p.x),
            self.y1.max(p.y),
        )
    }

    /// This box with `dx` added on the left and right and `dy` added on the
    /// top and bottom.
    #[inline]
    #[must_use]
    pub fn inflate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x0 - dx, self.y0 - dy, self.x1 + dx, self.y1 + dy)
    }

    /// Whether `p` lies in the box, boundary included.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        (self.x0..=self.x1).contains(&p.x) && (self.y0..=self.y1).contains(&p.y)
    }

    /// Whether the two boxes share at least one point.
    ///
    /// Boxes touching along an edge or at a corner overlap.
    #[inline]
    pub fn overlaps(&self, other: Rect) -> bool {
        let apart_x = self.x1 < other.x0 || other.x1 < self.x0;
        let apart_y = self.y1 < other.y0 || other.y1 < self.y0;
        !(apart_x || apart_y)
    }
}
