//! Follow Camera Controller
//!
//! Security-camera style view: parked near a map vertex close to a target
//! thing, it turns and tilts each tic to keep the thing centred and reports
//! whether the thing is still in sight.
//!
//! The target is held through a [`ThingRef`], so removing the thing from the
//! registry simply makes the next tick report "lost".

use std::f64::consts::PI;

use tracing::{debug, warn};

use crate::actor::{Thing, ThingKey, ThingRef, ThingRegistry, VIEW_HEIGHT};
use crate::fixed::{ANG180, ANGLE_1, Fixed, V2Fixed, V3Fixed, approx_distance, point_to_angle};
use crate::map::{MapQuery, SightParams};

use super::view::Camera;

/// Candidate vertices must be within this approximate distance.
pub const FOLLOW_RADIUS: i32 = 256;
/// How far the chosen vertex is nudged toward the target.
pub const FOLLOW_NUDGE: i32 = 10;
/// Pitch limit in degrees, both directions.
pub const FOLLOW_MAX_PITCH: i32 = 32;

/// Pick a camera spot near `target`.
///
/// Tries the vertices of the target's sector within [`FOLLOW_RADIUS`],
/// farthest first, and takes the first one with a line of sight to the
/// target, nudged [`FOLLOW_NUDGE`] units toward it. Falls back to the
/// target's own position.
pub fn locate_follow_cam<M: MapQuery + ?Sized>(map: &M, target: &Thing) -> V2Fixed {
    let sector = map.sector_at(target.x, target.y);
    let radius = Fixed::from_int(FOLLOW_RADIUS);

    let mut candidates: Vec<(V2Fixed, Fixed)> = Vec::new();
    for &line_id in &sector.lines {
        let line = map.line(line_id);
        for v in [line.v1, line.v2] {
            let dist = approx_distance(v.x - target.x, v.y - target.y);
            if dist <= radius {
                candidates.push((v, dist));
            }
        }
    }
    candidates.sort_by(|a, b| b.1.cmp(&a.1));

    let eye = Fixed::from_int(VIEW_HEIGHT);
    for (v, _) in candidates {
        let params = SightParams::from_viewpoint(V3Fixed::new(v.x, v.y, sector.floor), eye, sector.group)
            .with_target_thing(target);
        if map.check_sight(&params) {
            let angle = point_to_angle(v.x, v.y, target.x, target.y);
            return V2Fixed::new(
                v.x + angle.cos() * FOLLOW_NUDGE,
                v.y + angle.sin() * FOLLOW_NUDGE,
            );
        }
    }

    debug!("follow camera: no vertex sees the target, using its position");
    V2Fixed::new(target.x, target.y)
}

/// Pitch that aims a camera at `camera` toward the target's eye height.
///
/// Negative (looking up) when the camera is below the aim point.
pub fn follow_pitch(camera: V3Fixed, target: &Thing) -> i32 {
    let aim_z = target.z + Fixed::from_int(VIEW_HEIGHT);
    let z_dist = (aim_z - camera.z).abs().to_f64();
    let xy_dist = approx_distance(target.x - camera.x, target.y - camera.y).to_f64();

    let limit = (ANGLE_1 * FOLLOW_MAX_PITCH as u32) as i32;
    let angle = ((z_dist.atan2(xy_dist) * (ANG180 as f64 / PI)) as i32).min(limit);
    if camera.z < aim_z { -angle } else { angle }
}

#[derive(Clone, Debug, Default)]
pub struct FollowCamera {
    pub camera: Camera,
    target: ThingRef,
}

impl FollowCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently tracked thing, if any (may be stale).
    #[inline]
    pub fn target(&self) -> Option<ThingKey> {
        self.target.key()
    }

    /// Park the camera at `at` and start tracking `target`.
    ///
    /// Returns `false` and leaves the camera untouched if `target` is not in
    /// the registry.
    pub fn set<M: MapQuery + ?Sized>(
        &mut self,
        map: &M,
        things: &mut ThingRegistry,
        at: V2Fixed,
        target: ThingKey,
    ) -> bool {
        if things.get(target).is_none() {
            warn!("follow camera: target is not in the registry");
            return false;
        }
        self.target.set(things, Some(target));
        let Some(thing) = self.target.resolve(things) else {
            return false;
        };

        let cam = &mut self.camera;
        cam.x = at.x;
        cam.y = at.y;
        cam.angle = point_to_angle(cam.x, cam.y, thing.x, thing.y);
        let sector = map.sector_at(cam.x, cam.y);
        cam.z = sector.floor + Fixed::from_int(VIEW_HEIGHT);
        cam.group = sector.group;
        cam.prev_pitch = cam.pitch;
        cam.pitch = follow_pitch(cam.position(), thing);
        cam.backup_position();
        debug!(x = %cam.x, y = %cam.y, z = %cam.z, "follow camera set");
        true
    }

    /// Stop tracking, releasing the reference.
    pub fn off(&mut self, things: &mut ThingRegistry) {
        if self.target.key().is_some() {
            debug!("follow camera off");
        }
        self.target.clear(things);
    }

    /// Re-aim at the target. Returns whether it is still visible.
    ///
    /// A missing or removed target returns `false` without touching the pose.
    pub fn tick<M: MapQuery + ?Sized>(&mut self, map: &M, things: &ThingRegistry) -> bool {
        if self.target.is_stale(things) {
            warn!("follow camera: target was removed");
            self.target.forget();
            return false;
        }
        let Some(thing) = self.target.resolve(things) else {
            return false;
        };

        let cam = &mut self.camera;
        cam.backup_position();
        cam.angle = point_to_angle(cam.x, cam.y, thing.x, thing.y);
        let sector = map.sector_at(cam.x, cam.y);
        cam.z = sector.floor + Fixed::from_int(VIEW_HEIGHT);
        cam.group = sector.group;
        cam.prev_pitch = cam.pitch;
        cam.pitch = follow_pitch(cam.position(), thing);

        let eye = Fixed::from_int(VIEW_HEIGHT);
        let params = SightParams::from_viewpoint(cam.position(), eye, cam.group).with_target_thing(thing);
        map.check_sight(&params)
    }
}
