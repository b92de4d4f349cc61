//! Walk Camera Controller
//!
//! Free-roaming first-person camera driven by the same per-tic commands as
//! a player. It ignores walls and slides along the floor unless flying.
//!
//! Key features:
//! - Turn and look straight from the command, no smoothing
//! - Pitch clamped to ±32 degrees
//! - Fly up/down; flying with pitch moves along the view direction
//! - Always kept inside the floor/ceiling of the sector under it

use tracing::{debug, warn};

use crate::actor::VIEW_HEIGHT;
use crate::fixed::{ANG90, Angle, Fixed, MAX_PITCH_DOWN, MAX_PITCH_UP, pitch_degrees, pitch_sin};
use crate::map::MapQuery;

use super::view::Camera;

/// `look` value that recenters the pitch.
pub const CENTER_PITCH_LOOK: i16 = i16::MIN;
/// `fly` value that lands the camera.
pub const FLIGHT_CENTER: i8 = -8;
/// Base movement scale (the classic ground friction constant).
pub const ORIG_FRICTION: i32 = 0xE800;

/// Pitch limit when looking up (negative BAM).
const PITCH_MIN: i32 = -pitch_degrees(MAX_PITCH_UP);
/// Pitch limit when looking down.
const PITCH_MAX: i32 = pitch_degrees(MAX_PITCH_DOWN);

/// Headroom kept under the ceiling.
const CEILING_MARGIN: i32 = 8;
/// Minimum height above the floor.
const FLOOR_MARGIN: i32 = 4;

/// One tic of movement input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TicCmd {
    /// Forward (+) / backward (-) speed.
    pub forwardmove: i8,
    /// Right (+) / left (-) speed.
    pub sidemove: i8,
    /// Yaw change, upper 16 bits of a BAM angle.
    pub angleturn: i16,
    /// Pitch change, upper 16 bits; [`CENTER_PITCH_LOOK`] recenters.
    pub look: i16,
    /// Vertical speed; [`FLIGHT_CENTER`] lands.
    pub fly: i8,
}

#[derive(Clone, Debug, Default)]
pub struct WalkCamera {
    pub camera: Camera,
    active: bool,
}

impl WalkCamera {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Activate. Follow with [`reset`](Self::reset) to move to the start.
    pub fn start(&mut self) {
        self.active = true;
        debug!("walk camera on");
    }

    pub fn end(&mut self) {
        if self.active {
            debug!("walk camera off");
        }
        self.active = false;
    }

    /// Teleport to the first player start.
    pub fn reset<M: MapQuery + ?Sized>(&mut self, map: &M) {
        let Some(start) = map.player_start(0) else {
            warn!("walk camera reset: map has no player start");
            return;
        };
        let cam = &mut self.camera;
        cam.x = start.x();
        cam.y = start.y();
        cam.angle = start.facing();
        cam.pitch = 0;
        cam.flying = false;

        let sector = map.sector_at(cam.x, cam.y);
        cam.z = sector.floor + Fixed::from_int(VIEW_HEIGHT);
        cam.group = sector.group;
        cam.backup_position();
        debug!(x = %cam.x, y = %cam.y, z = %cam.z, "walk camera reset");
    }

    /// Apply one tic of input.
    pub fn tick<M: MapQuery + ?Sized>(&mut self, map: &M, cmd: &TicCmd) {
        let cam = &mut self.camera;
        cam.backup_position();

        cam.angle += Angle::from_turn(cmd.angleturn);

        if cmd.look == CENTER_PITCH_LOOK {
            cam.pitch = 0;
        } else if cmd.look != 0 {
            let pitch = cam.pitch as i64 - ((cmd.look as i64) << 16);
            cam.pitch = pitch.clamp(PITCH_MIN as i64, PITCH_MAX as i64) as i32;
        }

        if cmd.fly == FLIGHT_CENTER {
            cam.flying = false;
        } else if cmd.fly != 0 {
            cam.z += Fixed::from_int(2 * cmd.fly as i32);
            cam.flying = true;
        }

        let forward = Fixed((ORIG_FRICTION / 4) * cmd.forwardmove as i32);
        if cam.flying && cam.pitch != 0 {
            cam.z -= forward * pitch_sin(cam.pitch);
        }

        cam.x += forward * cam.angle.cos();
        cam.y += forward * cam.angle.sin();

        let side = Fixed((ORIG_FRICTION / 6) * cmd.sidemove as i32);
        let right = cam.angle - Angle(ANG90);
        cam.x += side * right.cos();
        cam.y += side * right.sin();

        let sector = map.sector_at(cam.x, cam.y);
        cam.group = sector.group;
        if !cam.flying {
            cam.z = sector.floor + Fixed::from_int(VIEW_HEIGHT);
        }

        // Floor wins when the sector is too short for both margins.
        let ceiling = sector.ceiling - Fixed::from_int(CEILING_MARGIN);
        if cam.z > ceiling {
            cam.z = ceiling;
        }
        let floor = sector.floor + Fixed::from_int(FLOOR_MARGIN);
        if cam.z < floor {
            cam.z = floor;
        }
    }
}
