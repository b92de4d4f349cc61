//! Binary Angle Measurement
//!
//! A full turn is the whole `u32` range, so angle arithmetic wraps for free.
//! Pitch is kept as a signed BAM value (`i32`), positive looking down.

use std::ops::{Add, AddAssign, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use super::trig::{ANGLETOFINESHIFT, fine_cosine, fine_sine};
use super::Fixed;

pub const ANG45: u32 = 0x2000_0000;
pub const ANG90: u32 = 0x4000_0000;
pub const ANG180: u32 = 0x8000_0000;
pub const ANG270: u32 = 0xC000_0000;

/// One degree in BAM.
pub const ANGLE_1: u32 = ANG45 / 45;

/// Degrees a camera may look up.
pub const MAX_PITCH_UP: i32 = 32;
/// Degrees a camera may look down.
pub const MAX_PITCH_DOWN: i32 = 32;

static_assertions::const_assert!((ANGLE_1 as i64) * (MAX_PITCH_UP as i64) < i32::MAX as i64);

/// A binary angle. `0` faces +X (east), `ANG90` faces +Y (north).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Angle(pub u32);

impl Angle {
    pub const EAST: Angle = Angle(0);
    pub const NORTH: Angle = Angle(ANG90);
    pub const WEST: Angle = Angle(ANG180);
    pub const SOUTH: Angle = Angle(ANG270);

    /// Map-thing angle in whole degrees.
    pub fn from_map_degrees(degrees: i32) -> Self {
        let bam = (degrees as i64 * ANGLE_1 as i64).rem_euclid(1i64 << 32);
        Angle(bam as u32)
    }

    /// Index into the fine trig tables.
    #[inline]
    pub fn fine_index(self) -> usize {
        (self.0 >> ANGLETOFINESHIFT) as usize
    }

    #[inline]
    pub fn sin(self) -> Fixed {
        fine_sine(self.fine_index())
    }

    #[inline]
    pub fn cos(self) -> Fixed {
        fine_cosine(self.fine_index())
    }

    /// Shift applied to tic-command turn deltas (`angleturn << 16`).
    #[inline]
    pub fn from_turn(angleturn: i16) -> Self {
        Angle(((angleturn as i32) << 16) as u32)
    }

    pub fn to_degrees(self) -> f64 {
        self.0 as f64 * 360.0 / 4_294_967_296.0
    }
}

impl Add for Angle {
    type Output = Angle;
    #[inline]
    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Angle {
    type Output = Angle;
    #[inline]
    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0.wrapping_sub(rhs.0))
    }
}

impl AddAssign for Angle {
    #[inline]
    fn add_assign(&mut self, rhs: Angle) {
        *self = *self + rhs;
    }
}

impl SubAssign for Angle {
    #[inline]
    fn sub_assign(&mut self, rhs: Angle) {
        *self = *self - rhs;
    }
}

/// Signed pitch limit in BAM for `degrees`.
#[inline]
pub const fn pitch_degrees(degrees: i32) -> i32 {
    ANGLE_1 as i32 * degrees
}

/// Pitch as a sine-table index (the signed value reinterpreted as unsigned).
#[inline]
pub fn pitch_sin(pitch: i32) -> Fixed {
    Angle(pitch as u32).sin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::FRACUNIT;

    #[test]
    fn test_angle_1_is_one_degree() {
        assert_eq!(ANGLE_1, 11_930_464);
        assert!((Angle(ANGLE_1).to_degrees() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_map_degrees_wraps_negative() {
        assert_eq!(Angle::from_map_degrees(90), Angle(ANGLE_1 * 90));
        assert_eq!(Angle::from_map_degrees(-90), Angle(0u32.wrapping_sub(ANGLE_1 * 90)));
        assert_eq!(Angle::from_map_degrees(0), Angle::EAST);
    }

    #[test]
    fn test_cardinal_trig_is_exact() {
        assert_eq!(Angle::EAST.cos().raw(), FRACUNIT);
        assert_eq!(Angle::EAST.sin().raw(), 0);
        assert_eq!(Angle::NORTH.sin().raw(), FRACUNIT);
        assert_eq!(Angle::WEST.cos().raw(), -FRACUNIT);
        assert_eq!(Angle::SOUTH.sin().raw(), -FRACUNIT);
    }

    #[test]
    fn test_from_turn_shifts_sixteen() {
        assert_eq!(Angle::from_turn(1), Angle(1 << 16));
        assert_eq!(Angle::from_turn(-1), Angle(0xFFFF_0000));
    }

    #[test]
    fn test_angle_wraps() {
        assert_eq!(Angle::SOUTH + Angle::NORTH, Angle::EAST);
        assert_eq!(Angle::EAST - Angle::NORTH, Angle::SOUTH);
    }
}
