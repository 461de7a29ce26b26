// Copyright 2024 the Bezkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cutting path segments at the lines of a regular grid.

use core::ops::{Mul, Range};

use alloc::vec::Vec;

use arrayvec::ArrayVec;

use crate::common::TOLERANCE;
use crate::{
    intersect_curve_line, Affine, CubicBez, GeometryError, Line, ParamCurve, ParamCurveExtrema,
    Point, Rect, Vec2, MAX_EXTREMA,
};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// The most lines of either direction that one segment may be cut at.
///
/// Each line near a cubic costs a curve/line intersection, so a spacing that
/// is tiny relative to the segment is refused rather than processed.
pub const MAX_GRID_LINES: usize = 1 << 16;

/// A regular grid of vertical and horizontal lines.
///
/// Vertical lines sit at `origin.x + i * spacing.x` and horizontal lines at
/// `origin.y + j * spacing.y` for every integer `i` and `j`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    origin: Point,
    spacing: Vec2,
}

impl Grid {
    /// A grid through the origin with the given spacing.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidSpacing`] unless both components of
    /// `spacing` are finite and strictly positive.
    pub fn new(spacing: impl Into<Vec2>) -> Result<Grid, GeometryError> {
        Grid::with_origin(Point::ORIGIN, spacing)
    }

    /// A grid with one vertical and one horizontal line through `origin`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidSpacing`] unless both components of
    /// `spacing` are finite and strictly positive.
    pub fn with_origin(
        origin: impl Into<Point>,
        spacing: impl Into<Vec2>,
    ) -> Result<Grid, GeometryError> {
        let spacing = spacing.into();
        let valid = |d: f64| d.is_finite() && d > 0.0;
        if !valid(spacing.x) || !valid(spacing.y) {
            return Err(GeometryError::InvalidSpacing {
                dx: spacing.x,
                dy: spacing.y,
            });
        }
        Ok(Grid {
            origin: origin.into(),
            spacing,
        })
    }

    /// A point that every grid line passes through, either vertically or
    /// horizontally.
    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// The distance between neighboring lines on each axis.
    #[inline]
    pub fn spacing(&self) -> Vec2 {
        self.spacing
    }

    /// The x coordinates of the vertical lines near `bounds`.
    ///
    /// This covers the bounds plus one extra cell on either side.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::TooManyGridLines`] when that would be more
    /// than [`MAX_GRID_LINES`] lines.
    pub fn vertical_lines(
        &self,
        bounds: Rect,
    ) -> Result<impl Iterator<Item = f64>, GeometryError> {
        lines_in(self.origin.x, self.spacing.x, bounds.x0..bounds.x1)
    }

    /// The y coordinates of the horizontal lines near `bounds`.
    ///
    /// This covers the bounds plus one extra cell on either side.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::TooManyGridLines`] when that would be more
    /// than [`MAX_GRID_LINES`] lines.
    pub fn horizontal_lines(
        &self,
        bounds: Rect,
    ) -> Result<impl Iterator<Item = f64>, GeometryError> {
        lines_in(self.origin.y, self.spacing.y, bounds.y0..bounds.y1)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "the line count is a non-negative whole number"
)]
fn lines_in(
    origin: f64,
    spacing: f64,
    range: Range<f64>,
) -> Result<impl Iterator<Item = f64>, GeometryError> {
    let first = ((range.start - origin) / spacing).ceil() - 1.0;
    let last = ((range.end - origin) / spacing).floor() + 1.0;
    let count = if first.is_finite() && last.is_finite() && last >= first {
        let count = last - first + 1.0;
        if count > MAX_GRID_LINES as f64 {
            return Err(GeometryError::TooManyGridLines {
                limit: MAX_GRID_LINES,
            });
        }
        count as usize
    } else {
        0
    };
    Ok((0..count).map(move |i| origin + (first + i as f64) * spacing))
}

/// A segment of a path: either a line or a cubic Bézier.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathSeg {
    /// A line segment.
    Line(Line),
    /// A cubic Bézier segment.
    Cubic(CubicBez),
}

impl PathSeg {
    /// Turn a line into a cubic with [`CubicBez::nearly_straight`]; cubics
    /// are returned unchanged.
    #[must_use]
    pub fn to_cubic(self) -> PathSeg {
        match self {
            PathSeg::Line(line) => PathSeg::Cubic(CubicBez::nearly_straight(line)),
            cubic @ PathSeg::Cubic(_) => cubic,
        }
    }
}

impl From<Line> for PathSeg {
    #[inline]
    fn from(line: Line) -> PathSeg {
        PathSeg::Line(line)
    }
}

impl From<CubicBez> for PathSeg {
    #[inline]
    fn from(cubic: CubicBez) -> PathSeg {
        PathSeg::Cubic(cubic)
    }
}

impl ParamCurve for PathSeg {
    fn eval(&self, t: f64) -> Point {
        match *self {
            PathSeg::Line(line) => line.eval(t),
            PathSeg::Cubic(cubic) => cubic.eval(t),
        }
    }

    fn subsegment(&self, range: Range<f64>) -> PathSeg {
        match *self {
            PathSeg::Line(line) => PathSeg::Line(line.subsegment(range)),
            PathSeg::Cubic(cubic) => PathSeg::Cubic(cubic.subsegment(range)),
        }
    }

    fn start(&self) -> Point {
        match *self {
            PathSeg::Line(line) => line.p0,
            PathSeg::Cubic(cubic) => cubic.p0,
        }
    }

    fn end(&self) -> Point {
        match *self {
            PathSeg::Line(line) => line.p1,
            PathSeg::Cubic(cubic) => cubic.p3,
        }
    }
}

impl ParamCurveExtrema for PathSeg {
    fn extrema(&self) -> ArrayVec<f64, MAX_EXTREMA> {
        match *self {
            PathSeg::Line(line) => line.extrema(),
            PathSeg::Cubic(cubic) => cubic.extrema(),
        }
    }

    fn bounding_box(&self) -> Rect {
        match *self {
            PathSeg::Line(line) => line.bounding_box(),
            PathSeg::Cubic(cubic) => cubic.bounding_box(),
        }
    }
}

impl Mul<PathSeg> for Affine {
    type Output = PathSeg;

    fn mul(self, seg: PathSeg) -> PathSeg {
        match seg {
            PathSeg::Line(line) => PathSeg::Line(self * line),
            PathSeg::Cubic(cubic) => PathSeg::Cubic(self * cubic),
        }
    }
}

/// The parameters in `(0, 1)` where `seg` crosses a line of `grid`, sorted
/// and with near-duplicates merged.
///
/// Crossings within [`TOLERANCE`] of either end are dropped, since cutting
/// there would only produce a sliver.
///
/// # Errors
///
/// Returns [`GeometryError::TooManyGridLines`] when more than
/// [`MAX_GRID_LINES`] lines of either direction lie near the segment.
pub fn grid_crossings(seg: &PathSeg, grid: &Grid) -> Result<Vec<f64>, GeometryError> {
    let bounds = seg.bounding_box();
    let xs = grid.vertical_lines(bounds)?;
    let ys = grid.horizontal_lines(bounds)?;
    let mut ts = Vec::new();
    // Lines used for cubics span the bounds with a cell to spare.
    let (y_lo, y_hi) = (bounds.y0 - grid.spacing.y, bounds.y1 + grid.spacing.y);
    let (x_lo, x_hi) = (bounds.x0 - grid.spacing.x, bounds.x1 + grid.spacing.x);
    match seg {
        PathSeg::Line(line) => {
            for x in xs {
                ts.extend(line.solve_t_for_x(x));
            }
            for y in ys {
                ts.extend(line.solve_t_for_y(y));
            }
        }
        PathSeg::Cubic(cubic) => {
            for x in xs {
                let hits = intersect_curve_line(cubic, &Line::new((x, y_lo), (x, y_hi)));
                ts.extend(hits.iter().map(|hit| hit.parameter_on_a));
            }
            for y in ys {
                let hits = intersect_curve_line(cubic, &Line::new((x_lo, y), (x_hi, y)));
                ts.extend(hits.iter().map(|hit| hit.parameter_on_a));
            }
        }
    }
    ts.retain(|&t| t > TOLERANCE && t < 1.0 - TOLERANCE);
    ts.sort_by(f64::total_cmp);
    ts.dedup_by(|later, earlier| *later - *earlier < TOLERANCE);
    Ok(ts)
}

/// Cut `seg` at every crossing with a line of `grid`.
///
/// The pieces are returned in order along the segment and together cover
/// it exactly. With `promote_lines`, a line is first turned into a nearly
/// straight cubic, so every piece comes back as [`PathSeg::Cubic`].
///
/// A segment lying along a grid line is only cut by the lines crossing it.
///
/// # Errors
///
/// Returns [`GeometryError::TooManyGridLines`] when the grid is too fine for
/// the segment; see [`MAX_GRID_LINES`].
pub fn subdivide_to_grid(
    seg: PathSeg,
    grid: &Grid,
    promote_lines: bool,
) -> Result<Vec<PathSeg>, GeometryError> {
    let seg = if promote_lines { seg.to_cubic() } else { seg };
    let crossings = grid_crossings(&seg, grid)?;
    let mut result = Vec::with_capacity(crossings.len() + 1);
    let mut t0 = 0.0;
    for t in crossings.into_iter().chain([1.0]) {
        result.push(seg.subsegment(t0..t));
        t0 = t;
    }
    Ok(result)
}
