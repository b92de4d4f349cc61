//! Camera Context
//!
//! Owns the three alternative cameras and their shared configuration. At
//! most one camera provides the view at a time: starting one ends the
//! others.
//!
//! Resets are gated on a level being loaded, so callers can reset freely
//! from level transitions without checking.

use tracing::{debug, info};

use crate::actor::{PlayerView, ThingKey, ThingRegistry};
use crate::config::{CameraConfig, ChaseSettings};
use crate::error::ConfigError;
use crate::map::MapQuery;

use super::chase::ChaseCamera;
use super::chase_target::ChaseTarget;
use super::follow::{FollowCamera, locate_follow_cam};
use super::view::Camera;
use super::walk::{TicCmd, WalkCamera};

/// Which camera currently provides the view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CameraMode {
    Chase,
    Walk,
    Follow,
}

#[derive(Clone, Debug, Default)]
pub struct CameraContext {
    config: CameraConfig,
    chase: ChaseCamera,
    walk: WalkCamera,
    follow: FollowCamera,
    follow_active: bool,
    in_level: bool,
}

impl CameraContext {
    pub fn new(config: CameraConfig) -> Self {
        Self { config, ..Self::default() }
    }

    // ========================================================================
    // STATE
    // ========================================================================

    #[inline]
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    #[inline]
    pub fn chase_settings(&self) -> &ChaseSettings {
        &self.config.chase
    }

    pub fn set_chase_height(&mut self, height: i32) -> Result<(), ConfigError> {
        self.config.chase.set_height(height)
    }

    pub fn set_chase_dist(&mut self, dist: i32) -> Result<(), ConfigError> {
        self.config.chase.set_dist(dist)
    }

    pub fn set_chase_speed(&mut self, speed: i32) -> Result<(), ConfigError> {
        self.config.chase.set_speed(speed)
    }

    #[inline]
    pub fn in_level(&self) -> bool {
        self.in_level
    }

    /// Mark whether a level is loaded; resets are ignored while it is not.
    pub fn set_in_level(&mut self, in_level: bool) {
        if self.in_level != in_level {
            info!(in_level, "camera level state changed");
        }
        self.in_level = in_level;
    }

    pub fn active_mode(&self) -> Option<CameraMode> {
        if self.chase.is_active() {
            Some(CameraMode::Chase)
        } else if self.walk.is_active() {
            Some(CameraMode::Walk)
        } else if self.follow_active {
            Some(CameraMode::Follow)
        } else {
            None
        }
    }

    /// Pose of the active camera, `None` when the player's own view is used.
    pub fn view(&self) -> Option<&Camera> {
        self.active_mode().map(|mode| match mode {
            CameraMode::Chase => &self.chase.camera,
            CameraMode::Walk => &self.walk.camera,
            CameraMode::Follow => &self.follow.camera,
        })
    }

    #[inline]
    pub fn chase(&self) -> &ChaseCamera {
        &self.chase
    }

    #[inline]
    pub fn walk(&self) -> &WalkCamera {
        &self.walk
    }

    #[inline]
    pub fn follow(&self) -> &FollowCamera {
        &self.follow
    }

    /// End every mode except `keep`.
    ///
    /// A displaced follow camera keeps its target reference until
    /// [`end_follow`](Self::end_follow) or the next follow start releases it.
    fn end_others(&mut self, keep: CameraMode) {
        if keep != CameraMode::Chase {
            self.chase.end();
        }
        if keep != CameraMode::Walk {
            self.walk.end();
        }
        if keep != CameraMode::Follow && self.follow_active {
            self.follow_active = false;
            debug!("follow camera displaced");
        }
    }

    // ========================================================================
    // CHASE
    // ========================================================================

    pub fn start_chase<M: MapQuery + ?Sized>(&mut self, map: &M, player: &PlayerView) {
        self.end_others(CameraMode::Chase);
        self.chase.start();
        self.reset_chase(map, player);
    }

    pub fn end_chase(&mut self) {
        self.chase.end();
    }

    pub fn reset_chase<M: MapQuery + ?Sized>(&mut self, map: &M, player: &PlayerView) {
        if self.in_level {
            self.chase.reset(map, player, &self.config.chase);
        }
    }

    /// Advance the chase camera if it is the active view.
    pub fn tick_chase<M: MapQuery + ?Sized>(
        &mut self,
        map: &M,
        player: &PlayerView,
    ) -> Option<ChaseTarget> {
        if !self.chase.is_active() {
            return None;
        }
        Some(self.chase.tick(map, player, &self.config.chase))
    }

    // ========================================================================
    // WALK
    // ========================================================================

    pub fn start_walk<M: MapQuery + ?Sized>(&mut self, map: &M) {
        self.end_others(CameraMode::Walk);
        self.walk.start();
        self.reset_walk(map);
    }

    pub fn end_walk(&mut self) {
        self.walk.end();
    }

    pub fn reset_walk<M: MapQuery + ?Sized>(&mut self, map: &M) {
        if self.in_level {
            self.walk.reset(map);
        }
    }

    /// Apply a tic of input to the walk camera if it is the active view.
    pub fn tick_walk<M: MapQuery + ?Sized>(&mut self, map: &M, cmd: &TicCmd) -> bool {
        if !self.walk.is_active() {
            return false;
        }
        self.walk.tick(map, cmd);
        true
    }

    // ========================================================================
    // FOLLOW
    // ========================================================================

    /// Park the follow camera near `target` and make it the view.
    ///
    /// Returns `false` if `target` is not a live thing.
    pub fn start_follow<M: MapQuery + ?Sized>(
        &mut self,
        map: &M,
        things: &mut ThingRegistry,
        target: ThingKey,
    ) -> bool {
        let Some(thing) = things.get(target) else {
            return false;
        };
        let at = locate_follow_cam(map, thing);
        self.end_others(CameraMode::Follow);
        if !self.follow.set(map, things, at, target) {
            return false;
        }
        self.follow_active = true;
        debug!("follow camera on");
        true
    }

    pub fn end_follow(&mut self, things: &mut ThingRegistry) {
        self.follow_active = false;
        self.follow.off(things);
    }

    /// Re-aim the follow camera. Returns whether the target is in sight.
    ///
    /// A lost target (removed from the registry) ends the follow view.
    pub fn tick_follow<M: MapQuery + ?Sized>(&mut self, map: &M, things: &ThingRegistry) -> bool {
        if !self.follow_active {
            return false;
        }
        let visible = self.follow.tick(map, things);
        if self.follow.target().is_none() {
            self.follow_active = false;
            debug!("follow camera lost its target");
        }
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Thing;
    use crate::fixed::{Angle, Fixed, V3Fixed};
    use crate::map::{GroupId, LineListMap, MapBuilder};

    fn level() -> LineListMap {
        let mut b = MapBuilder::new();
        let s = b.sector(0, 256, 0);
        b.room(s, 0, 0, 1024, 1024);
        b.player_start(512, 512, 0);
        b.build().unwrap()
    }

    fn player() -> PlayerView {
        PlayerView::standing(V3Fixed::units(512, 512, 0), Angle::EAST, GroupId(0))
    }

    #[test]
    fn test_starting_one_mode_ends_the_other() {
        let map = level();
        let mut ctx = CameraContext::default();
        ctx.set_in_level(true);

        ctx.start_chase(&map, &player());
        assert_eq!(ctx.active_mode(), Some(CameraMode::Chase));

        ctx.start_walk(&map);
        assert_eq!(ctx.active_mode(), Some(CameraMode::Walk));
        assert!(!ctx.chase().is_active());
    }

    #[test]
    fn test_follow_replaces_walk_and_releases_on_end() {
        let map = level();
        let mut things = ThingRegistry::new();
        let key = things.spawn(Thing::new(V3Fixed::units(600, 600, 0), GroupId(0)));
        let mut ctx = CameraContext::default();
        ctx.set_in_level(true);

        ctx.start_walk(&map);
        assert!(ctx.start_follow(&map, &mut things, key));
        assert_eq!(ctx.active_mode(), Some(CameraMode::Follow));
        assert!(!ctx.walk().is_active());

        ctx.start_chase(&map, &player());
        assert_eq!(ctx.active_mode(), Some(CameraMode::Chase));
        ctx.end_follow(&mut things);
        assert_eq!(things.get(key).unwrap().tracked_by, 0);
    }

    #[test]
    fn test_start_outside_level_activates_without_snapping() {
        let map = level();
        let mut ctx = CameraContext::default();
        ctx.start_chase(&map, &player());
        assert_eq!(ctx.active_mode(), Some(CameraMode::Chase));
        assert_eq!(ctx.chase().camera, Camera::default());
    }

    #[test]
    fn test_reset_ignored_outside_level() {
        let map = level();
        let mut ctx = CameraContext::default();
        ctx.set_in_level(true);
        ctx.start_chase(&map, &player());
        let pose = ctx.chase().camera;

        ctx.set_in_level(false);
        let mut moved = player();
        moved.x += Fixed::from_int(100);
        ctx.reset_chase(&map, &moved);
        assert_eq!(ctx.chase().camera, pose);
    }

    #[test]
    fn test_inactive_ticks_do_nothing() {
        let map = level();
        let mut ctx = CameraContext::default();
        assert!(ctx.tick_chase(&map, &player()).is_none());
        assert!(!ctx.tick_walk(&map, &TicCmd::default()));
        assert!(!ctx.tick_follow(&map, &ThingRegistry::new()));
        assert!(ctx.view().is_none());
    }

    #[test]
    fn test_lost_follow_target_ends_follow_view() {
        let map = level();
        let mut things = ThingRegistry::new();
        let key = things.spawn(Thing::new(V3Fixed::units(600, 600, 0), GroupId(0)));
        let mut ctx = CameraContext::default();
        ctx.start_follow(&map, &mut things, key);

        things.remove(key);
        assert!(!ctx.tick_follow(&map, &things));
        assert_eq!(ctx.active_mode(), None);
    }

    #[test]
    fn test_tunables_validated() {
        let mut ctx = CameraContext::default();
        assert!(ctx.set_chase_speed(0).is_err());
        ctx.set_chase_dist(64).unwrap();
        assert_eq!(ctx.chase_settings().dist(), 64);
    }
}
