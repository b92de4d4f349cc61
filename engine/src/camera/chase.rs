//! Chase Camera Controller
//!
//! Third-person camera that trails the player. Each tic it resolves a
//! target point behind the player and closes a fixed percentage of the
//! remaining distance toward it, so the camera eases into place instead of
//! snapping. Movement goes through the map's portal crossing so the camera
//! can follow the player through linked portals.
//!
//! ## Usage
//! ```rust,ignore
//! let mut chase = ChaseCamera::new();
//! chase.start();
//! chase.reset(&map, &player, &settings);
//!
//! // once per tic
//! chase.tick(&map, &player, &settings);
//! let origin = chase.camera.lerp_origin(frac);
//! ```

use tracing::{debug, trace};

use crate::actor::PlayerView;
use crate::config::ChaseSettings;
use crate::fixed::{FRACUNIT, Fixed, V2Fixed};
use crate::map::MapQuery;

use super::chase_target::{ChaseTarget, resolve_chase_target};
use super::view::Camera;

#[derive(Clone, Debug, Default)]
pub struct ChaseCamera {
    pub camera: Camera,
    active: bool,
    last_target: Option<ChaseTarget>,
}

impl ChaseCamera {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Target resolved by the most recent tic or reset.
    #[inline]
    pub fn last_target(&self) -> Option<ChaseTarget> {
        self.last_target
    }

    /// Activate. Follow with [`reset`](Self::reset) to snap into place.
    pub fn start(&mut self) {
        self.active = true;
        debug!("chase camera on");
    }

    pub fn end(&mut self) {
        if self.active {
            debug!("chase camera off");
        }
        self.active = false;
    }

    /// Snap straight to the resolved target, used after teleports.
    ///
    /// Does nothing while the camera is inactive.
    pub fn reset<M: MapQuery + ?Sized>(
        &mut self,
        map: &M,
        player: &PlayerView,
        settings: &ChaseSettings,
    ) {
        if !self.active {
            return;
        }
        let target = resolve_chase_target(map, player, settings);
        self.camera.set_position(target.position);
        self.camera.group = target.group;
        self.camera.angle = player.angle;
        self.camera.pitch = player.pitch;
        self.camera.backup_position();
        self.last_target = Some(target);
        debug!(
            x = %target.position.x,
            y = %target.position.y,
            z = %target.position.z,
            group = target.group.0,
            "chase camera snapped"
        );
    }

    /// Advance one tic toward this tic's target.
    pub fn tick<M: MapQuery + ?Sized>(
        &mut self,
        map: &M,
        player: &PlayerView,
        settings: &ChaseSettings,
    ) -> ChaseTarget {
        self.camera.backup_position();

        let target = resolve_chase_target(map, player, settings);
        let link = map.link_offset(self.camera.group, target.group);
        let dist = target.position - link - self.camera.position();

        // Re-derive the group in case the last move ended on a boundary.
        self.camera.group = map.sector_at(self.camera.x, self.camera.y).group;

        // Percent of the remaining distance, 0.01 rounded down in 16.16.
        let step = Fixed(settings.speed() * (FRACUNIT / 100));
        let delta = V2Fixed::new(dist.x * step, dist.y * step);
        let dest = map.portal_crossing(self.camera.xy(), delta, &mut self.camera.group);
        self.camera.x = dest.x;
        self.camera.y = dest.y;
        self.camera.z += dist.z * step;

        self.camera.pitch = player.pitch;
        self.camera.angle = player.angle;
        self.last_target = Some(target);

        trace!(
            x = %self.camera.x,
            y = %self.camera.y,
            z = %self.camera.z,
            group = self.camera.group.0,
            "chase camera moved"
        );
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::{Angle, V3Fixed};
    use crate::map::{GroupId, LineListMap, MapBuilder};

    fn hall() -> LineListMap {
        let mut b = MapBuilder::new();
        let s = b.sector(0, 256, 0);
        b.room(s, 0, 0, 1024, 256);
        b.build().unwrap()
    }

    fn player() -> PlayerView {
        PlayerView::standing(V3Fixed::units(512, 128, 0), Angle::EAST, GroupId(0))
    }

    #[test]
    fn test_reset_is_noop_when_inactive() {
        let map = hall();
        let mut chase = ChaseCamera::new();
        chase.reset(&map, &player(), &ChaseSettings::default());
        assert_eq!(chase.camera, Camera::default());
        assert!(chase.last_target().is_none());
    }

    #[test]
    fn test_start_snaps_to_target() {
        let map = hall();
        let mut chase = ChaseCamera::new();
        chase.start();
        chase.reset(&map, &player(), &ChaseSettings::default());
        assert!(chase.is_active());
        assert_eq!(chase.camera.position(), V3Fixed::units(400, 128, 53));
        assert_eq!(chase.camera.prev_position(), chase.camera.position());
    }

    #[test]
    fn test_full_speed_nearly_reaches_target_in_one_tic() {
        let map = hall();
        let settings = ChaseSettings::new(12, 112, 100).unwrap();
        let mut chase = ChaseCamera::new();
        chase.camera.set_position(V3Fixed::units(600, 128, 53));
        let target = chase.tick(&map, &player(), &settings);
        let gap = (chase.camera.x - target.position.x).abs();
        assert!(gap < Fixed::ONE, "gap {gap}");
        assert_eq!(chase.camera.y, target.position.y);
    }

    #[test]
    fn test_partial_speed_closes_a_third() {
        let map = hall();
        let mut chase = ChaseCamera::new();
        chase.camera.set_position(V3Fixed::units(700, 128, 53));
        chase.tick(&map, &player(), &ChaseSettings::default());
        // 300 units away at speed 33: about 99 units covered.
        let moved = (Fixed::from_int(700) - chase.camera.x).to_f64();
        assert!((moved - 99.0).abs() < 0.5, "moved {moved}");
    }

    #[test]
    fn test_tick_copies_player_view_direction() {
        let map = hall();
        let mut p = player();
        p.pitch = 1234;
        let mut chase = ChaseCamera::new();
        chase.camera.set_position(V3Fixed::units(400, 128, 53));
        chase.tick(&map, &p, &ChaseSettings::default());
        assert_eq!(chase.camera.angle, p.angle);
        assert_eq!(chase.camera.pitch, 1234);
    }
}
