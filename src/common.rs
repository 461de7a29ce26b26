// Copyright 2024 the Bezkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Common mathematical operations: numeric tolerances and closed-form
//! polynomial root finding.

use arrayvec::ArrayVec;
use smallvec::SmallVec;

/// Defines a trait that chooses between libstd or libm implementations of float methods.
macro_rules! define_float_funcs {
    ($(
        fn $name:ident(self $(,$arg:ident: $arg_ty:ty)*) -> $ret:ty
        => $lname:ident/$lfname:ident;
    )+) => {
        #[cfg(not(feature = "std"))]
        pub(crate) trait FloatFuncs : Sized {
            /// Special implementation for signum, because libm doesn't have it.
            fn signum(self) -> Self;

            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret;)+
        }

        #[cfg(not(feature = "std"))]
        impl FloatFuncs for f64 {
            #[inline]
            fn signum(self) -> f64 {
                if self.is_nan() {
                    f64::NAN
                } else {
                    1.0_f64.copysign(self)
                }
            }

            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret {
                #[cfg(feature = "libm")]
                return libm::$lname(self $(,$arg as _)*);

                #[cfg(not(feature = "libm"))]
                compile_error!("bezkit requires either the `std` or `libm` feature")
            })+
        }
    }
}

define_float_funcs! {
    fn abs(self) -> Self => fabs/fabsf;
    fn acos(self) -> Self => acos/acosf;
    fn atan2(self, other: Self) -> Self => atan2/atan2f;
    fn cbrt(self) -> Self => cbrt/cbrtf;
    fn ceil(self) -> Self => ceil/ceilf;
    fn copysign(self, sign: Self) -> Self => copysign/copysignf;
    fn cos(self) -> Self => cos/cosf;
    fn floor(self) -> Self => floor/floorf;
    fn hypot(self, other: Self) -> Self => hypot/hypotf;
    fn sin_cos(self) -> (Self, Self) => sincos/sincosf;
    fn sqrt(self) -> Self => sqrt/sqrtf;
}

/// General purpose tolerance.
///
/// Used for degenerate-coefficient detection in the quadratic solver, the
/// convergence threshold of curve/curve clipping, and the open parameter
/// interval searched for extrema.
pub const TOLERANCE: f64 = 1e-6;

/// A much smaller tolerance, used where values are expected to be exact up
/// to accumulated roundoff.
///
/// Must stay well below [`TOLERANCE`].
pub const EPSILON: f64 = 1e-12;

/// Roughly the spacing of `f64` values around 1.0, halved.
pub const MACHINE_EPSILON: f64 = 1.12e-16;

const ONETHIRD: f64 = 1.0 / 3.0;

/// The real roots of a quadratic equation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuadraticRoots {
    /// Zero, one or two roots, in ascending order.
    Finite(SmallVec<[f64; 2]>),
    /// All coefficients vanish, so every value of x is a solution.
    Infinite,
}

impl QuadraticRoots {
    /// The discrete roots; empty for [`QuadraticRoots::Infinite`].
    #[inline]
    pub fn roots(&self) -> &[f64] {
        match self {
            QuadraticRoots::Finite(roots) => roots,
            QuadraticRoots::Infinite => &[],
        }
    }

    /// Whether every value solves the equation.
    #[inline]
    pub fn is_infinite(&self) -> bool {
        matches!(self, QuadraticRoots::Infinite)
    }
}

/// Find real roots of the quadratic equation a x² + b x + c = 0.
///
/// When `|a|` is below [`TOLERANCE`] the equation is treated as linear, and
/// when `|b|` is too, as constant. A constant equation with `|c|` below
/// [`EPSILON`] has infinitely many solutions, reported as
/// [`QuadraticRoots::Infinite`].
///
/// The proper quadratic case uses the cancellation-free form of the
/// quadratic formula, in which the square root of the discriminant is
/// given the sign of `b`.
///
/// ```
/// use bezkit::common::{solve_quadratic, QuadraticRoots};
///
/// assert_eq!(solve_quadratic(1.0, -3.0, 2.0).roots(), &[1.0, 2.0]);
/// assert_eq!(solve_quadratic(0.0, 0.0, 0.0), QuadraticRoots::Infinite);
/// ```
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> QuadraticRoots {
    let mut roots = SmallVec::new();
    if a.abs() < TOLERANCE {
        if b.abs() < TOLERANCE {
            if c.abs() < EPSILON {
                return QuadraticRoots::Infinite;
            }
            return QuadraticRoots::Finite(roots);
        }
        roots.push(-c / b);
        return QuadraticRoots::Finite(roots);
    }
    let discriminant = b * b - 4.0 * a * c;
    // Compare the discriminant of the monic equation, so that the slack given
    // to near-double roots does not depend on the coefficient scale.
    if discriminant / (4.0 * a * a) < -EPSILON {
        return QuadraticRoots::Finite(roots);
    }
    let sq = if discriminant > 0.0 {
        discriminant.sqrt()
    } else {
        0.0
    };
    let q = -0.5 * (b + sq.copysign(b));
    if q == 0.0 {
        // b and the discriminant are both zero, which leaves c == 0.
        roots.push(0.0);
        return QuadraticRoots::Finite(roots);
    }
    let root1 = q / a;
    if sq == 0.0 {
        roots.push(root1);
        return QuadraticRoots::Finite(roots);
    }
    let root2 = c / q;
    if root1 < root2 {
        roots.push(root1);
        roots.push(root2);
    } else {
        roots.push(root2);
        roots.push(root1);
    }
    QuadraticRoots::Finite(roots)
}

/// Find real roots of a x² + b x + c = 0 within `[min, max]`, inclusive.
///
/// Roots within [`EPSILON`] outside the range are clamped onto it. The
/// infinite-solution case yields no roots.
pub fn solve_quadratic_in_range(a: f64, b: f64, c: f64, min: f64, max: f64) -> ArrayVec<f64, 2> {
    let mut result = ArrayVec::new();
    for &root in solve_quadratic(a, b, c).roots() {
        if let Some(root) = clamp_root(root, min, max) {
            result.push(root);
        }
    }
    result
}

/// Find real roots of the cubic equation a x³ + b x² + c x + d = 0 within
/// `[min, max]`.
///
/// This is the trigonometric / Cardano method from Numerical Recipes,
/// applied to the equation made monic. Each root gets one Newton-Raphson
/// polishing step. When `|a|` is below [`EPSILON`] this falls back to
/// [`solve_quadratic_in_range`].
///
/// Roots are returned in ascending order. Roots within [`EPSILON`] outside
/// the range are clamped onto it.
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64, min: f64, max: f64) -> ArrayVec<f64, 3> {
    let mut result = ArrayVec::new();
    if a.abs() < EPSILON {
        for root in solve_quadratic_in_range(b, c, d, min, max) {
            result.push(root);
        }
        return result;
    }
    let b = b / a;
    let c = c / a;
    let d = d / a;
    let bb = b * b;
    let p = (bb - 3.0 * c) * (1.0 / 9.0);
    let q = (2.0 * bb * b - 9.0 * b * c + 27.0 * d) * (1.0 / 54.0);
    let ppp = p * p * p;
    let discriminant = q * q - ppp;
    let offset = b * ONETHIRD;

    let mut candidates = ArrayVec::<f64, 3>::new();
    if discriminant.abs() < MACHINE_EPSILON {
        if q.abs() < EPSILON {
            // One triple root.
            candidates.push(-offset);
        } else {
            // One single and one double root.
            let sqp = p.max(0.0).sqrt();
            let snq = q.signum();
            candidates.push(-snq * 2.0 * sqp - offset);
            candidates.push(snq * sqp - offset);
        }
    } else if discriminant < 0.0 {
        // Three distinct real roots.
        let sqp = p.sqrt();
        let phi = (q / (sqp * sqp * sqp)).clamp(-1.0, 1.0).acos() * ONETHIRD;
        let t = -2.0 * sqp;
        let o = 2.0 * core::f64::consts::PI * ONETHIRD;
        candidates.push(t * phi.cos() - offset);
        candidates.push(t * (phi + o).cos() - offset);
        candidates.push(t * (phi - o).cos() - offset);
    } else {
        // One real root.
        let sign = if q > 0.0 { -1.0 } else { 1.0 };
        let big_a = sign * (q.abs() + discriminant.sqrt()).cbrt();
        let big_b = if big_a != 0.0 { p / big_a } else { 0.0 };
        candidates.push(big_a + big_b - offset);
    }

    for x in candidates {
        let x = polish_cubic_root(x, b, c, d);
        if let Some(root) = clamp_root(x, min, max) {
            result.push(root);
        }
    }
    result.sort_by(f64::total_cmp);
    result
}

/// One Newton-Raphson step on the monic cubic x³ + b x² + c x + d.
#[inline]
fn polish_cubic_root(x: f64, b: f64, c: f64, d: f64) -> f64 {
    let f = ((x + b) * x + c) * x + d;
    let df = (3.0 * x + 2.0 * b) * x + c;
    if df == 0.0 {
        return x;
    }
    let polished = x - f / df;
    if polished.is_finite() {
        polished
    } else {
        x
    }
}

#[inline]
fn clamp_root(root: f64, min: f64, max: f64) -> Option<f64> {
    if root >= min - EPSILON && root <= max + EPSILON {
        Some(root.clamp(min, max))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::common::*;

    fn verify(roots: &[f64], expected: &[f64]) {
        assert_eq!(expected.len(), roots.len(), "got {roots:?}, expected {expected:?}");
        let epsilon = 1e-9;
        for (root, expected) in roots.iter().zip(expected) {
            assert!(
                (root - expected).abs() < epsilon,
                "got {roots:?}, expected {expected:?}"
            );
        }
    }

    #[test]
    fn tolerances_are_ordered() {
        assert!(MACHINE_EPSILON < EPSILON);
        assert!(EPSILON < TOLERANCE);
    }

    #[test]
    fn test_solve_quadratic() {
        verify(solve_quadratic(1.0, -3.0, 2.0).roots(), &[1.0, 2.0]);
        verify(
            solve_quadratic(1.0, 0.0, -5.0).roots(),
            &[-(5.0f64.sqrt()), 5.0f64.sqrt()],
        );
        verify(solve_quadratic(1.0, 0.0, 5.0).roots(), &[]);
        verify(solve_quadratic(0.0, 1.0, 5.0).roots(), &[-5.0]);
        verify(solve_quadratic(1.0, 2.0, 1.0).roots(), &[-1.0]);
        verify(solve_quadratic(2.0, 0.0, 0.0).roots(), &[0.0]);
        // Nearly linear: a is below the tolerance.
        verify(solve_quadratic(1e-9, 2.0, -4.0).roots(), &[2.0]);
        // Large b, tiny c: the naive formula would cancel catastrophically.
        let roots = solve_quadratic(1.0, 1e8, 1.0);
        verify(roots.roots(), &[-1e8, -1e-8]);
    }

    #[test]
    fn quadratic_degenerate_cases() {
        assert!(solve_quadratic(0.0, 0.0, 0.0).is_infinite());
        assert!(solve_quadratic(0.0, 0.0, 0.0).roots().is_empty());
        assert_eq!(
            solve_quadratic(0.0, 0.0, 1.0),
            QuadraticRoots::Finite(SmallVec::new())
        );
    }

    #[test]
    fn test_solve_quadratic_in_range() {
        verify(&solve_quadratic_in_range(1.0, -3.0, 2.0, 0.0, 1.5), &[1.0]);
        verify(&solve_quadratic_in_range(1.0, -3.0, 2.0, 1.0, 2.0), &[1.0, 2.0]);
        verify(&solve_quadratic_in_range(1.0, -3.0, 2.0, 2.5, 3.0), &[]);
        verify(&solve_quadratic_in_range(0.0, 0.0, 0.0, 0.0, 1.0), &[]);
        // Just outside the range, within EPSILON, is clamped.
        let roots = solve_quadratic_in_range(0.0, 1.0, -(1.0 + 1e-14), 0.0, 1.0);
        assert_eq!(roots.as_slice(), &[1.0]);
    }

    #[test]
    fn test_solve_cubic() {
        let all = (f64::NEG_INFINITY, f64::INFINITY);
        // (x - 1)(x - 2)(x - 3)
        verify(&solve_cubic(1.0, -6.0, 11.0, -6.0, all.0, all.1), &[1.0, 2.0, 3.0]);
        verify(&solve_cubic(1.0, -6.0, 11.0, -6.0, 1.5, 4.0), &[2.0, 3.0]);
        verify(&solve_cubic(1.0, 0.0, 0.0, -5.0, all.0, all.1), &[5.0f64.cbrt()]);
        verify(&solve_cubic(1.0, 0.0, -1.0, -5.0, all.0, all.1), &[1.90416085913492]);
        verify(&solve_cubic(1.0, 0.0, -1.0, 0.0, all.0, all.1), &[-1.0, 0.0, 1.0]);
        // Double root at -1, single root at 2.
        verify(&solve_cubic(1.0, 0.0, -3.0, -2.0, all.0, all.1), &[-1.0, 2.0]);
        // Triple root.
        verify(&solve_cubic(1.0, -3.0, 3.0, -1.0, all.0, all.1), &[1.0]);
        // Scaled coefficients give the same roots.
        verify(&solve_cubic(-4.0, 24.0, -44.0, 24.0, 0.0, 10.0), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn cubic_falls_back_to_quadratic() {
        verify(&solve_cubic(0.0, 1.0, -3.0, 2.0, 0.0, 5.0), &[1.0, 2.0]);
        verify(&solve_cubic(1e-14, 1.0, -3.0, 2.0, 0.0, 5.0), &[1.0, 2.0]);
        assert!(solve_cubic(0.0, 0.0, 0.0, 0.0, 0.0, 1.0).is_empty());
    }
}
