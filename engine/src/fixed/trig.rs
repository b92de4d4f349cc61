//! Fine Trig Tables
//!
//! Sine over 8192 fine angles, extended by a quarter turn so cosine is a
//! plain offset lookup into the same table.

use std::f64::consts::{PI, TAU};
use std::sync::LazyLock;

use super::angle::Angle;
use super::{FRACUNIT, Fixed};

pub const FINEANGLES: usize = 8192;
pub const FINEMASK: usize = FINEANGLES - 1;
pub const ANGLETOFINESHIFT: u32 = 19;

static_assertions::const_assert_eq!(FINEANGLES, 1 << (32 - ANGLETOFINESHIFT));

static FINE_SINE: LazyLock<Box<[i32]>> = LazyLock::new(|| {
    (0..FINEANGLES * 5 / 4)
        .map(|i| ((i as f64 * TAU / FINEANGLES as f64).sin() * FRACUNIT as f64).round() as i32)
        .collect()
});

#[inline]
pub fn fine_sine(index: usize) -> Fixed {
    Fixed(FINE_SINE[index & FINEMASK])
}

#[inline]
pub fn fine_cosine(index: usize) -> Fixed {
    Fixed(FINE_SINE[(index & FINEMASK) + FINEANGLES / 4])
}

/// Angle of the vector from `(x1, y1)` to `(x2, y2)`.
///
/// Coincident points give `Angle::EAST`.
pub fn point_to_angle(x1: Fixed, y1: Fixed, x2: Fixed, y2: Fixed) -> Angle {
    let dx = x2.0 as f64 - x1.0 as f64;
    let dy = y2.0 as f64 - y1.0 as f64;
    if dx == 0.0 && dy == 0.0 {
        return Angle::EAST;
    }
    let bam = (dy.atan2(dx) * (2_147_483_648.0 / PI)).round() as i64;
    Angle(bam.rem_euclid(1i64 << 32) as u32)
}

/// Octagonal distance estimate: `dx + dy - min(dx, dy) / 2`.
pub fn approx_distance(dx: Fixed, dy: Fixed) -> Fixed {
    let dx = (dx.0 as i64).abs();
    let dy = (dy.0 as i64).abs();
    let d = dx + dy - (dx.min(dy) >> 1);
    Fixed(d.min(i32::MAX as i64) as i32)
}
