//! Actor Module
//!
//! The slice of the player/object model the cameras read.
//!
//! # Components
//!
//! - [`PlayerView`] - Per-tic snapshot of the followed player
//! - [`PlayerStart`] - Level start spot (walk camera reset)
//! - [`ThingRegistry`] - Generation-checked storage for map objects
//! - [`ThingRef`] - Non-owning tracked reference with back-link bookkeeping

pub mod registry;

use serde::{Deserialize, Serialize};

use crate::fixed::{Angle, Fixed, V3Fixed};
use crate::map::GroupId;

pub use registry::{Thing, ThingKey, ThingRef, ThingRegistry};

/// Default eye height above the feet, in map units.
pub const VIEW_HEIGHT: i32 = 41;

/// Snapshot of the followed player taken at the start of a tic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerView {
    pub x: Fixed,
    pub y: Fixed,
    /// Feet height.
    pub z: Fixed,
    pub angle: Angle,
    /// Signed BAM pitch.
    pub pitch: i32,
    /// Eye height above `z`.
    pub viewheight: Fixed,
    pub group: GroupId,
}

impl PlayerView {
    /// A level-headed player standing at `feet`.
    pub fn standing(feet: V3Fixed, angle: Angle, group: GroupId) -> Self {
        Self {
            x: feet.x,
            y: feet.y,
            z: feet.z,
            angle,
            pitch: 0,
            viewheight: Fixed::from_int(VIEW_HEIGHT),
            group,
        }
    }

    #[inline]
    pub fn position(&self) -> V3Fixed {
        V3Fixed::new(self.x, self.y, self.z)
    }
}

/// A player start spot as stored in the map: whole units and degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStart {
    pub x: i32,
    pub y: i32,
    /// Facing in whole degrees.
    pub angle: i32,
}

impl PlayerStart {
    #[inline]
    pub fn x(&self) -> Fixed {
        Fixed::from_int(self.x)
    }

    #[inline]
    pub fn y(&self) -> Fixed {
        Fixed::from_int(self.y)
    }

    #[inline]
    pub fn facing(&self) -> Angle {
        Angle::from_map_degrees(self.angle)
    }
}
