//! Fixed-Point Geometry Module
//!
//! 16.16 fixed-point scalars, binary angles, fine trig tables and the small
//! set of vector helpers the camera code needs.
//!
//! All multiplies and divides go through 64-bit intermediates; additions wrap
//! the way the map format's 32-bit coordinates always have.
//!
//! # Submodules
//!
//! - [`angle`] - Binary angle measurement (BAM) angles and pitch limits
//! - [`trig`] - Fine sine/cosine tables, point-to-angle, approximate distance
//! - [`vector`] - 2D/3D fixed-point vectors and the divline side test

pub mod angle;
pub mod trig;
pub mod vector;

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

pub use angle::{
    ANG45, ANG90, ANG180, ANG270, ANGLE_1, Angle, MAX_PITCH_DOWN, MAX_PITCH_UP, pitch_degrees, pitch_sin,
};
pub use trig::{approx_distance, fine_cosine, fine_sine, point_to_angle};
pub use vector::{DivLine, Side, V2Fixed, V3Fixed};

/// Number of fractional bits in a [`Fixed`].
pub const FRACBITS: u32 = 16;

/// Raw value of `1.0` in 16.16.
pub const FRACUNIT: i32 = 1 << FRACBITS;

static_assertions::const_assert_eq!(FRACUNIT, 65536);
static_assertions::assert_eq_size!(Fixed, i32);

/// A 16.16 fixed-point number.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fixed(pub i32);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(FRACUNIT);
    pub const MAX: Fixed = Fixed(i32::MAX);
    pub const MIN: Fixed = Fixed(i32::MIN);

    /// Whole map units to fixed-point.
    #[inline]
    pub const fn from_int(units: i32) -> Self {
        Fixed(units.wrapping_shl(FRACBITS))
    }

    /// Raw 16.16 bits.
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Truncates toward negative infinity to whole map units.
    #[inline]
    pub const fn to_int(self) -> i32 {
        self.0 >> FRACBITS
    }

    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / FRACUNIT as f64
    }

    #[inline]
    pub fn to_f32(self) -> f32 {
        self.to_f64() as f32
    }

    /// Nearest fixed value to `value`, saturating at the representable range.
    #[inline]
    pub fn from_f64(value: f64) -> Self {
        Fixed((value * FRACUNIT as f64).round() as i32)
    }

    #[inline]
    pub fn abs(self) -> Self {
        Fixed(self.0.wrapping_abs())
    }

    /// Clamp that never panics: the lower bound wins when `lo > hi`.
    ///
    /// Map sectors can be shorter than the margins callers ask for, so the
    /// bounds are not guaranteed to be ordered.
    #[inline]
    pub fn clamp_low_first(self, lo: Self, hi: Self) -> Self {
        if self < lo {
            lo
        } else if self > hi {
            hi
        } else {
            self
        }
    }

    /// `(a * b) >> 16` through a 64-bit intermediate.
    #[inline]
    pub fn fixed_mul(self, other: Self) -> Self {
        Fixed(((self.0 as i64 * other.0 as i64) >> FRACBITS) as i32)
    }

    /// `(a << 16) / b` through a 64-bit intermediate.
    ///
    /// Saturates to `MAX`/`MIN` (by sign) when the quotient would not fit,
    /// which also covers division by zero.
    #[inline]
    pub fn fixed_div(self, other: Self) -> Self {
        if (self.0.unsigned_abs() >> 14) >= other.0.unsigned_abs() {
            if (self.0 ^ other.0) < 0 { Fixed::MIN } else { Fixed::MAX }
        } else {
            Fixed((((self.0 as i64) << FRACBITS) / other.0 as i64) as i32)
        }
    }
}

impl fmt::Debug for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fixed({:.4})", self.to_f64())
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.to_f64())
    }
}

impl Add for Fixed {
    type Output = Fixed;
    #[inline]
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    #[inline]
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_sub(rhs.0))
    }
}

impl Neg for Fixed {
    type Output = Fixed;
    #[inline]
    fn neg(self) -> Fixed {
        Fixed(self.0.wrapping_neg())
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, rhs: Fixed) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fixed {
    #[inline]
    fn sub_assign(&mut self, rhs: Fixed) {
        *self = *self - rhs;
    }
}

impl Mul for Fixed {
    type Output = Fixed;
    #[inline]
    fn mul(self, rhs: Fixed) -> Fixed {
        self.fixed_mul(rhs)
    }
}

/// Integer scaling: `units * fixed`, no shift.
impl Mul<i32> for Fixed {
    type Output = Fixed;
    #[inline]
    fn mul(self, rhs: i32) -> Fixed {
        Fixed(self.0.wrapping_mul(rhs))
    }
}

impl Div for Fixed {
    type Output = Fixed;
    #[inline]
    fn div(self, rhs: Fixed) -> Fixed {
        self.fixed_div(rhs)
    }
}

/// Linear height at an intercept: `dist * (ztarget - zstart) / total + zstart`.
///
/// All four operands are widened so the product cannot overflow.
pub fn interpolate_z(dist: Fixed, total: Fixed, ztarget: Fixed, zstart: Fixed) -> Fixed {
    if total.0 == 0 {
        return zstart;
    }
    let z = (dist.0 as i64 * (ztarget.0 as i64 - zstart.0 as i64)) / total.0 as i64;
    Fixed((z + zstart.0 as i64) as i32)
}
