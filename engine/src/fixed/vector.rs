//! Fixed-point vectors and the divline side test.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use super::{FRACBITS, Fixed};

/// 2D point or offset in map space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct V2Fixed {
    pub x: Fixed,
    pub y: Fixed,
}

impl V2Fixed {
    pub const ZERO: V2Fixed = V2Fixed { x: Fixed::ZERO, y: Fixed::ZERO };

    #[inline]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }

    /// Point at whole map units.
    #[inline]
    pub const fn units(x: i32, y: i32) -> Self {
        Self { x: Fixed::from_int(x), y: Fixed::from_int(y) }
    }
}

impl Add for V2Fixed {
    type Output = V2Fixed;
    #[inline]
    fn add(self, rhs: V2Fixed) -> V2Fixed {
        V2Fixed::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for V2Fixed {
    type Output = V2Fixed;
    #[inline]
    fn sub(self, rhs: V2Fixed) -> V2Fixed {
        V2Fixed::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// 3D point or offset in map space; `z` is height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct V3Fixed {
    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
}

impl V3Fixed {
    pub const ZERO: V3Fixed = V3Fixed { x: Fixed::ZERO, y: Fixed::ZERO, z: Fixed::ZERO };

    #[inline]
    pub const fn new(x: Fixed, y: Fixed, z: Fixed) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn units(x: i32, y: i32, z: i32) -> Self {
        Self { x: Fixed::from_int(x), y: Fixed::from_int(y), z: Fixed::from_int(z) }
    }

    #[inline]
    pub fn xy(self) -> V2Fixed {
        V2Fixed::new(self.x, self.y)
    }
}

impl Add for V3Fixed {
    type Output = V3Fixed;
    #[inline]
    fn add(self, rhs: V3Fixed) -> V3Fixed {
        V3Fixed::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for V3Fixed {
    type Output = V3Fixed;
    #[inline]
    fn sub(self, rhs: V3Fixed) -> V3Fixed {
        V3Fixed::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Which side of a directed line a point lies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Right of the line direction.
    Front,
    /// Left of the line direction, or exactly on it.
    Back,
}

/// A directed line: origin plus delta. Used both for map lines and traces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct DivLine {
    pub x: Fixed,
    pub y: Fixed,
    pub dx: Fixed,
    pub dy: Fixed,
}

impl DivLine {
    pub fn between(from: V2Fixed, to: V2Fixed) -> Self {
        Self { x: from.x, y: from.y, dx: to.x - from.x, dy: to.y - from.y }
    }

    #[inline]
    pub fn origin(&self) -> V2Fixed {
        V2Fixed::new(self.x, self.y)
    }

    #[inline]
    pub fn end(&self) -> V2Fixed {
        V2Fixed::new(self.x + self.dx, self.y + self.dy)
    }

    /// Point at fraction `frac` (16.16) along the line.
    #[inline]
    pub fn point_at(&self, frac: Fixed) -> V2Fixed {
        V2Fixed::new(self.x + self.dx * frac, self.y + self.dy * frac)
    }

    /// Exact 2D cross product of the direction with `p - origin`.
    #[inline]
    pub fn cross_to(&self, p: V2Fixed) -> i128 {
        let px = p.x.0 as i128 - self.x.0 as i128;
        let py = p.y.0 as i128 - self.y.0 as i128;
        self.dx.0 as i128 * py - self.dy.0 as i128 * px
    }

    pub fn point_side(&self, p: V2Fixed) -> Side {
        if self.cross_to(p) >= 0 { Side::Back } else { Side::Front }
    }

    /// Fraction along `self` where it meets the infinite line `other`.
    ///
    /// `None` for parallel lines. The result is unbounded; callers filter it.
    pub fn intercept_frac(&self, other: &DivLine) -> Option<i128> {
        let den = self.dx.0 as i128 * other.dy.0 as i128 - self.dy.0 as i128 * other.dx.0 as i128;
        if den == 0 {
            return None;
        }
        let ox = other.x.0 as i128 - self.x.0 as i128;
        let oy = other.y.0 as i128 - self.y.0 as i128;
        let num = ox * other.dy.0 as i128 - oy * other.dx.0 as i128;
        Some((num << FRACBITS) / den)
    }
}
