//! Deterministic Scalar Math
//!
//! Scalar helpers for the simulation. Every function in this module is built
//! from `+ - * /` and `sqrt` on `f32` only. IEEE-754 requires those to be
//! correctly rounded, so the results are bit-identical on every platform.
//!
//! ## Trigonometry
//!
//! `f32::sin`, `f32::cos` and `f32::atan2` forward to the platform libm, whose
//! last-bit results differ between x86, ARM and WASM. The tick loop uses the
//! polynomial versions below instead:
//!
//! ```text
//! ┌──────────┬──────────────────────────────────┬──────────────────┐
//! │ function │ reduction                        │ kernel           │
//! ├──────────┼──────────────────────────────────┼──────────────────┤
//! │ sin      │ [-π, π] then fold to [-π/2, π/2] │ Taylor, x^11     │
//! │ cos      │ [-π, π] then |x|, fold at π/2    │ Taylor, x^12     │
//! │ atan     │ 1/z for |z| > 1, then half-angle │ Taylor, z^17     │
//! └──────────┴──────────────────────────────────┴──────────────────┘
//! ```
//!
//! Absolute error stays below 1e-5 against `std` over the angles the game
//! produces.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// Degrees to radians ratio used for player speed integration.
pub const RAD_DEG_RATIO: f32 = 0.017_453_292_51;

/// Convert degrees to radians.
#[inline]
pub fn to_rad(degrees: f32) -> f32 {
    degrees * RAD_DEG_RATIO
}

/// Sign of a value as an integer direction: -1, 0 or 1.
#[inline]
pub fn sign(x: f32) -> i32 {
    (0.0 < x) as i32 - (x < 0.0) as i32
}

/// Move `value` toward `target` by at most `step`.
#[inline]
pub fn move_towards(value: f32, target: f32, step: f32) -> f32 {
    if value < target {
        (value + step).min(target)
    } else {
        (value - step).max(target)
    }
}

/// Move `value` toward zero by at most `step`.
#[inline]
pub fn move_towards_zero(value: f32, step: f32) -> f32 {
    if value > 0.0 {
        (value - step).max(0.0)
    } else if value < 0.0 {
        (value + step).min(0.0)
    } else {
        value
    }
}

/// Hermite smooth step of `x` between `edge0` and `edge1`.
#[inline]
pub fn smooth_step(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Wrap an angle into [-π, π].
#[inline]
pub fn wrap_angle(x: f32) -> f32 {
    x - TAU * (x / TAU).round()
}

/// Deterministic sine.
pub fn sin(x: f32) -> f32 {
    let r = wrap_angle(x);
    let r = if r > FRAC_PI_2 {
        PI - r
    } else if r < -FRAC_PI_2 {
        -PI - r
    } else {
        r
    };
    sin_kernel(r)
}

/// Deterministic cosine.
pub fn cos(x: f32) -> f32 {
    let r = wrap_angle(x).abs();
    if r > FRAC_PI_2 {
        -cos_kernel(PI - r)
    } else {
        cos_kernel(r)
    }
}

/// Deterministic arctangent.
pub fn atan(z: f32) -> f32 {
    if z > 1.0 {
        FRAC_PI_2 - atan_unit(1.0 / z)
    } else if z < -1.0 {
        -FRAC_PI_2 - atan_unit(1.0 / z)
    } else {
        atan_unit(z)
    }
}

/// Deterministic four-quadrant arctangent of `y / x`.
///
/// Returns 0 for the origin.
pub fn atan2(y: f32, x: f32) -> f32 {
    if x == 0.0 && y == 0.0 {
        return 0.0;
    }

    if x.abs() >= y.abs() {
        let a = atan_unit(y / x);
        if x < 0.0 {
            if y >= 0.0 {
                a + PI
            } else {
                a - PI
            }
        } else {
            a
        }
    } else if y > 0.0 {
        FRAC_PI_2 - atan_unit(x / y)
    } else {
        -FRAC_PI_2 - atan_unit(x / y)
    }
}

/// sin(x) for x in [-π/2, π/2].
#[inline]
fn sin_kernel(x: f32) -> f32 {
    let x2 = x * x;
    x * (1.0
        + x2 * (-1.0 / 6.0
            + x2 * (1.0 / 120.0
                + x2 * (-1.0 / 5_040.0
                    + x2 * (1.0 / 362_880.0 + x2 * (-1.0 / 39_916_800.0))))))
}

/// cos(x) for x in [0, π/2].
#[inline]
fn cos_kernel(x: f32) -> f32 {
    let x2 = x * x;
    1.0 + x2
        * (-1.0 / 2.0
            + x2 * (1.0 / 24.0
                + x2 * (-1.0 / 720.0
                    + x2 * (1.0 / 40_320.0
                        + x2 * (-1.0 / 3_628_800.0 + x2 * (1.0 / 479_001_600.0))))))
}

/// atan(z) for z in [-1, 1].
///
/// One half-angle step brings |t| under tan(π/8) before the series.
#[inline]
fn atan_unit(z: f32) -> f32 {
    let t = z / (1.0 + (1.0 + z * z).sqrt());
    let t2 = t * t;
    let series = 1.0
        + t2 * (-1.0 / 3.0
            + t2 * (1.0 / 5.0
                + t2 * (-1.0 / 7.0
                    + t2 * (1.0 / 9.0
                        + t2 * (-1.0 / 11.0
                            + t2 * (1.0 / 13.0 + t2 * (-1.0 / 15.0 + t2 * (1.0 / 17.0))))))));
    2.0 * t * series
}

// =============================================================================
// TESTS
// =============================================================================
