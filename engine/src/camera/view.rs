//! Camera pose shared by every camera mode.

use glam::Vec3;

use crate::fixed::{Angle, Fixed, V2Fixed, V3Fixed};
use crate::map::GroupId;

/// A camera's pose plus the previous tic's pose for render interpolation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Camera {
    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
    pub angle: Angle,
    /// Signed BAM pitch.
    pub pitch: i32,
    pub prev_pitch: i32,
    pub group: GroupId,
    /// Walk camera only: free vertical movement.
    pub flying: bool,
    prev_position: V3Fixed,
    prev_angle: Angle,
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn position(&self) -> V3Fixed {
        V3Fixed::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn xy(&self) -> V2Fixed {
        V2Fixed::new(self.x, self.y)
    }

    pub fn set_position(&mut self, position: V3Fixed) {
        self.x = position.x;
        self.y = position.y;
        self.z = position.z;
    }

    /// Remember the current pose as the interpolation start for this tic.
    pub fn backup_position(&mut self) {
        self.prev_position = self.position();
        self.prev_angle = self.angle;
        self.prev_pitch = self.pitch;
    }

    #[inline]
    pub fn prev_position(&self) -> V3Fixed {
        self.prev_position
    }

    #[inline]
    pub fn prev_angle(&self) -> Angle {
        self.prev_angle
    }

    /// Render origin `frac` of the way from the backed-up to the current
    /// position, in map units.
    pub fn lerp_origin(&self, frac: f32) -> Vec3 {
        let from = to_vec3(self.prev_position);
        let to = to_vec3(self.position());
        from.lerp(to, frac.clamp(0.0, 1.0))
    }
}

fn to_vec3(p: V3Fixed) -> Vec3 {
    Vec3::new(p.x.to_f32(), p.y.to_f32(), p.z.to_f32())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_captures_pose() {
        let mut cam = Camera::new();
        cam.set_position(V3Fixed::units(10, 20, 30));
        cam.angle = Angle::NORTH;
        cam.pitch = 123;
        cam.backup_position();
        cam.set_position(V3Fixed::units(0, 0, 0));

        assert_eq!(cam.prev_position(), V3Fixed::units(10, 20, 30));
        assert_eq!(cam.prev_angle(), Angle::NORTH);
        assert_eq!(cam.prev_pitch, 123);
    }

    #[test]
    fn test_lerp_origin_halfway() {
        let mut cam = Camera::new();
        cam.set_position(V3Fixed::units(0, 0, 0));
        cam.backup_position();
        cam.set_position(V3Fixed::units(64, -32, 16));

        assert_eq!(cam.lerp_origin(0.0), Vec3::ZERO);
        assert_eq!(cam.lerp_origin(0.5), Vec3::new(32.0, -16.0, 8.0));
        assert_eq!(cam.lerp_origin(2.0), Vec3::new(64.0, -32.0, 16.0));
    }
}
