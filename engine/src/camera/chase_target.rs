//! Chase Target Resolver
//!
//! Works out where the chase camera wants to be this tic: a point behind and
//! above the player, pulled in to the first wall or too-tight opening along
//! the way, carried through any linked portals the ray passes.
//!
//! The ray uses a fixed 64-unit trace range as its distance scale. Intercept
//! fractions are only ever used as ratios of that range, so the scale stays
//! the same however many portals are crossed.

use tracing::{trace, warn};

use crate::actor::PlayerView;
use crate::config::ChaseSettings;
use crate::fixed::{ANGLE_1, DivLine, Fixed, Side, V2Fixed, V3Fixed, interpolate_z};
use crate::map::{
    GroupId, Intercept, InterceptVisitor, LineFlags, LinkData, MAX_PORTAL_CROSSINGS, MapQuery,
    TraverseStep,
};

/// Trace distance scale (melee range).
pub const CHASE_TRACE_RANGE: Fixed = Fixed::from_int(64);
/// Ray start height above the player's feet.
pub const CHASE_START_HEIGHT: i32 = 28;
/// How far short of a blocking line the target is pulled, in units of range.
pub const CHASE_STANDOFF: i32 = 12;
/// Openings shorter than this block the camera.
pub const CHASE_MIN_OPENING: i32 = 40;
/// Margin kept from the destination floor and ceiling.
pub const CHASE_CLAMP_MARGIN: i32 = 10;

/// Where the chase camera should head, in `group`'s coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChaseTarget {
    pub position: V3Fixed,
    pub group: GroupId,
    /// Portal hops applied while resolving.
    pub crossings: u32,
}

/// Per-leg traversal state.
struct ChaseTraverse<'a, M: MapQuery + ?Sized> {
    map: &'a M,
    /// Naive target, replaced by the hit point when something blocks.
    target: V3Fixed,
    start_z: Fixed,
    link: Option<LinkData>,
    intersection: V2Fixed,
}

impl<M: MapQuery + ?Sized> InterceptVisitor for ChaseTraverse<'_, M> {
    fn visit(&mut self, intercept: &Intercept, trace: &DivLine) -> TraverseStep {
        let line = self.map.line(intercept.line);
        let dist = CHASE_TRACE_RANGE * intercept.frac;
        let standoff = intercept.frac - Fixed::from_int(CHASE_STANDOFF) / CHASE_TRACE_RANGE;
        let hit = trace.point_at(standoff);

        if let (true, Some(back)) = (line.is_two_sided(), line.back) {
            // Only line portals are followed.
            if let Some(link) = line.passable_link() {
                if line.point_side(trace.end()) == Side::Back
                    && line.point_side(trace.origin()) == Side::Front
                {
                    self.intersection = trace.point_at(intercept.frac);
                    self.link = Some(*link);
                    self.start_z += (self.target.z - self.start_z) * intercept.frac;
                    return TraverseStep::Crossed;
                }
            }

            let under = self.map.point_in_sector(hit.x, hit.y);
            let other = self.map.sector(if under == back { line.front } else { back });
            let z = interpolate_z(dist, CHASE_TRACE_RANGE, self.target.z, self.start_z);

            let blocked = line.flags.contains(LineFlags::BLOCKING)
                || other.floor > z
                || other.ceiling < z
                || other.opening() < Fixed::from_int(CHASE_MIN_OPENING);
            if !blocked {
                return TraverseStep::Continue;
            }
        }

        self.target = V3Fixed::new(
            hit.x,
            hit.y,
            interpolate_z(dist, CHASE_TRACE_RANGE, self.target.z, self.start_z),
        );
        TraverseStep::Stop
    }
}

/// The point straight behind and above the player, ignoring geometry.
pub fn naive_chase_target(player: &PlayerView, settings: &ChaseSettings) -> V3Fixed {
    // One unit of height per degree of pitch.
    let aim = player.viewheight
        + Fixed::from_int(settings.height())
        + Fixed(player.pitch) / Fixed(ANGLE_1 as i32);
    V3Fixed::new(
        player.x - player.angle.cos() * settings.dist(),
        player.y - player.angle.sin() * settings.dist(),
        player.z + aim,
    )
}

/// Resolve this tic's chase target against the map.
pub fn resolve_chase_target<M: MapQuery + ?Sized>(
    map: &M,
    player: &PlayerView,
    settings: &ChaseSettings,
) -> ChaseTarget {
    let mut target = naive_chase_target(player, settings);
    let mut group = player.group;
    let mut start = V2Fixed::new(player.x, player.y);
    let mut start_z = player.z + Fixed::from_int(CHASE_START_HEIGHT);
    let mut crossings = 0;

    loop {
        let mut traverse = ChaseTraverse {
            map,
            target,
            start_z,
            link: None,
            intersection: V2Fixed::ZERO,
        };
        map.path_traverse(DivLine::between(start, target.xy()), &mut traverse);
        target = traverse.target;
        start_z = traverse.start_z;

        let Some(link) = traverse.link else {
            break;
        };
        start = traverse.intersection + link.delta.xy();
        start_z += link.delta.z;
        target = target + link.delta;
        group = link.to_group;
        crossings += 1;

        if crossings >= MAX_PORTAL_CROSSINGS {
            warn!(crossings, group = group.0, "chase target portal chain hit the cap");
            break;
        }
    }

    let sector = map.sector_at(target.x, target.y);
    let margin = Fixed::from_int(CHASE_CLAMP_MARGIN);
    target.z = target.z.clamp_low_first(sector.floor + margin, sector.ceiling - margin);

    trace!(
        x = %target.x,
        y = %target.y,
        z = %target.z,
        group = group.0,
        crossings,
        "chase target resolved"
    );
    ChaseTarget { position: target, group, crossings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::Angle;
    use crate::map::{LineListMap, MapBuilder};

    fn hall(ceiling: i32) -> LineListMap {
        let mut b = MapBuilder::new();
        let s = b.sector(0, ceiling, 0);
        b.room(s, 0, 0, 1024, 256);
        b.build().unwrap()
    }

    fn player_at(x: i32, y: i32, angle: Angle) -> PlayerView {
        PlayerView::standing(V3Fixed::units(x, y, 0), angle, GroupId(0))
    }

    #[test]
    fn test_naive_target_behind_player() {
        let settings = ChaseSettings::new(12, 112, 33).unwrap();
        let player = player_at(512, 128, Angle::EAST);
        let naive = naive_chase_target(&player, &settings);
        assert_eq!(naive, V3Fixed::units(400, 128, 41 + 12));
    }

    #[test]
    fn test_naive_target_rises_with_pitch() {
        let settings = ChaseSettings::default();
        let mut player = player_at(512, 128, Angle::EAST);
        player.pitch = (ANGLE_1 * 10) as i32;
        let level = naive_chase_target(&player_at(512, 128, Angle::EAST), &settings);
        let pitched = naive_chase_target(&player, &settings);
        assert_eq!(pitched.z - level.z, Fixed::from_int(10));
    }

    #[test]
    fn test_open_hall_yields_naive_target() {
        let map = hall(256);
        let settings = ChaseSettings::default();
        let player = player_at(512, 128, Angle::EAST);
        let resolved = resolve_chase_target(&map, &player, &settings);
        assert_eq!(resolved.position, naive_chase_target(&player, &settings));
        assert_eq!(resolved.crossings, 0);
        assert_eq!(resolved.group, GroupId(0));
    }

    #[test]
    fn test_low_ceiling_clamps_target() {
        let map = hall(48);
        let settings = ChaseSettings::default();
        let player = player_at(512, 128, Angle::EAST);
        let resolved = resolve_chase_target(&map, &player, &settings);
        assert_eq!(resolved.position.z, Fixed::from_int(38));
    }

    #[test]
    fn test_wall_pulls_target_in() {
        let map = hall(256);
        let settings = ChaseSettings::default();
        // Facing east 50 units from the west wall: naive target is outside.
        let player = player_at(50, 128, Angle::EAST);
        let resolved = resolve_chase_target(&map, &player, &settings);
        assert!(resolved.position.x > Fixed::ZERO);
        assert!(resolved.position.x < Fixed::from_int(50));
        assert_eq!(resolved.position.y, Fixed::from_int(128));
    }
}
