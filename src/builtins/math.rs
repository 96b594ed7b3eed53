//! Numeric kernels for the unary and binary built-ins
//!
//! Kernels work on raw `f64` amounts. Typing and rounding are applied by the
//! caller in [`super::Operator`].

use super::Operator;

/// Applies a unary kernel
///
/// Non-unary operators yield NaN; the evaluator never routes them here.
pub fn unary(op: Operator, x: f64) -> f64 {
    match op {
        Operator::Neg => -x,
        Operator::Abs => x.abs(),
        Operator::Exp => x.exp(),
        Operator::Sqrt => x.sqrt(),
        Operator::Log => x.ln(),
        Operator::Exp2 => x.exp2(),
        Operator::Cbrt => x.cbrt(),
        _ => f64::NAN,
    }
}

/// Applies a binary arithmetic kernel
///
/// Comparisons are handled by the caller because they do not promote.
pub fn binary(op: Operator, x: f64, y: f64) -> f64 {
    match op {
        Operator::Remainder => ieee_remainder(x, y),
        Operator::Pow => x.powf(y),
        Operator::Max => x.max(y),
        Operator::Min => x.min(y),
        Operator::Hypot => x.hypot(y),
        _ => f64::NAN,
    }
}

/// IEEE 754 remainder: `x - n*y` where `n` is `x/y` rounded to nearest, ties to even
pub fn ieee_remainder(x: f64, y: f64) -> f64 {
    if x.is_nan() || y.is_nan() || x.is_infinite() || y == 0.0 {
        return f64::NAN;
    }
    if y.is_infinite() {
        return x;
    }

    // `%` is exact and carries the sign of x
    let r = x % y;
    let ar = r.abs();
    let ay = y.abs();
    let quotient_odd = ((x - r) / y).abs() % 2.0 == 1.0;

    if ar > ay - ar || (ar == ay - ar && quotient_odd) {
        r - ay.copysign(r)
    } else {
        r
    }
}
