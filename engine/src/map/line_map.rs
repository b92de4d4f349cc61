//! Line List Map
//!
//! A brute-force [`MapQuery`] over a flat list of lines. No BSP, no
//! blockmap: every query scans every line. Intercept math is exact 128-bit
//! integer arithmetic so results do not depend on the platform's floats.
//!
//! Conventions:
//! - a point belongs to the first sector (in definition order) whose lines
//!   enclose it under an even-odd test, or sector 0 if none does
//! - intercepts exactly at a trace's origin are not reported, so a trace
//!   that starts on a line (e.g. just after a portal hop) does not re-hit it
//! - portal crossings require the trace start on the front side and the end
//!   strictly behind; chains stop after [`MAX_PORTAL_CROSSINGS`]

use std::collections::HashMap;
use std::path::Path;

use tracing::{info, trace, warn};

use crate::actor::PlayerStart;
use crate::error::MapError;
use crate::fixed::{DivLine, FRACUNIT, Fixed, Side, V2Fixed, V3Fixed};

use super::{
    GroupId, InterceptVisitor, Intercept, Line, LineFlags, LineId, LinePortal, LinkData,
    LinkOffset, MAX_PORTAL_CROSSINGS, MapDef, MapQuery, Sector, SectorId, SightParams,
    TraverseStep,
};

#[derive(Clone, Debug)]
pub struct LineListMap {
    sectors: Vec<Sector>,
    lines: Vec<Line>,
    links: HashMap<(GroupId, GroupId), LinkOffset>,
    player_starts: Vec<PlayerStart>,
}

impl LineListMap {
    /// Validate and compile a map definition.
    pub fn from_def(def: &MapDef) -> Result<Self, MapError> {
        if def.sectors.is_empty() {
            return Err(MapError::NoSectors);
        }

        let mut sectors: Vec<Sector> = Vec::with_capacity(def.sectors.len());
        for (index, s) in def.sectors.iter().enumerate() {
            if s.ceiling < s.floor {
                return Err(MapError::InvertedSector { sector: index });
            }
            sectors.push(Sector {
                floor: Fixed::from_int(s.floor),
                ceiling: Fixed::from_int(s.ceiling),
                group: GroupId(s.group),
                lines: Vec::new(),
            });
        }

        let vertex = |line: usize, index: usize| -> Result<V2Fixed, MapError> {
            def.vertices
                .get(index)
                .map(|v| V2Fixed::units(v[0], v[1]))
                .ok_or(MapError::MissingVertex { line, vertex: index })
        };
        let check_sector = |line: usize, sector: u32| -> Result<SectorId, MapError> {
            if (sector as usize) < sectors.len() {
                Ok(SectorId(sector))
            } else {
                Err(MapError::MissingSector { line, sector })
            }
        };

        let mut lines = Vec::with_capacity(def.lines.len());
        for (index, l) in def.lines.iter().enumerate() {
            let v1 = vertex(index, l.v1)?;
            let v2 = vertex(index, l.v2)?;
            if v1 == v2 {
                return Err(MapError::DegenerateLine { line: index });
            }
            let front = check_sector(index, l.front)?;
            let back = l.back.map(|b| check_sector(index, b)).transpose()?;

            let mut flags = LineFlags::NONE;
            if back.is_some() {
                flags = flags | LineFlags::TWO_SIDED;
            }
            if l.blocking {
                flags = flags | LineFlags::BLOCKING;
            }

            let portal = match &l.portal {
                Some(_) if back.is_none() => return Err(MapError::OneSidedPortal { line: index }),
                Some(p) => Some(LinePortal {
                    link: LinkData {
                        delta: V3Fixed::units(p.dx, p.dy, p.dz),
                        to_group: GroupId(p.to_group),
                    },
                    passable: p.passable,
                }),
                None => None,
            };

            lines.push(Line { v1, v2, flags, front, back, portal });
        }

        for (index, line) in lines.iter().enumerate() {
            let id = LineId(index as u32);
            sectors[line.front.0 as usize].lines.push(id);
            if let Some(back) = line.back {
                if back != line.front {
                    sectors[back.0 as usize].lines.push(id);
                }
            }
        }

        let links = def
            .links
            .iter()
            .map(|l| {
                ((GroupId(l.from), GroupId(l.to)), V3Fixed::units(l.dx, l.dy, l.dz))
            })
            .collect();

        info!(
            sectors = sectors.len(),
            lines = lines.len(),
            starts = def.player_starts.len(),
            "map loaded"
        );

        Ok(Self { sectors, lines, links, player_starts: def.player_starts.clone() })
    }

    pub fn from_json(json: &str) -> Result<Self, MapError> {
        Self::from_def(&MapDef::from_json(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, MapError> {
        Self::from_def(&MapDef::load(path)?)
    }

    #[inline]
    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }

    #[inline]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Even-odd containment against the sector's boundary lines.
    fn sector_contains(&self, id: SectorId, p: V2Fixed) -> bool {
        let px = p.x.raw() as i128;
        let py = p.y.raw() as i128;
        let mut inside = false;
        for line in self.sector(id).lines.iter().map(|l| self.line(*l)) {
            if line.back == Some(line.front) {
                continue;
            }
            let (ax, ay) = (line.v1.x.raw() as i128, line.v1.y.raw() as i128);
            let (bx, by) = (line.v2.x.raw() as i128, line.v2.y.raw() as i128);
            if (ay > py) == (by > py) {
                continue;
            }
            // p.x < crossing x, without dividing
            let lhs = (px - ax) * (by - ay);
            let rhs = (py - ay) * (bx - ax);
            let left_of_edge = if by > ay { lhs < rhs } else { lhs > rhs };
            if left_of_edge {
                inside = !inside;
            }
        }
        inside
    }

    /// Every line crossing `trace` with `0 < frac <= 1`, nearest first.
    fn intercepts(&self, trace: &DivLine) -> Vec<Intercept> {
        let one = FRACUNIT as i128;
        let mut out: Vec<Intercept> = self
            .lines
            .iter()
            .enumerate()
            .filter_map(|(index, line)| {
                let ld = line.divline();
                let frac = trace.intercept_frac(&ld)?;
                if frac <= 0 || frac > one {
                    return None;
                }
                let along = ld.intercept_frac(trace)?;
                if !(0..=one).contains(&along) {
                    return None;
                }
                Some(Intercept { frac: Fixed(frac as i32), line: LineId(index as u32) })
            })
            .collect();
        out.sort_by_key(|ic| ic.frac);
        out
    }

    /// First passable portal the segment really crosses front-to-back.
    fn first_portal_crossing(&self, trace: &DivLine) -> Option<(Fixed, LinkData)> {
        let start = trace.origin();
        let end = trace.end();
        self.intercepts(trace).into_iter().find_map(|ic| {
            let line = self.line(ic.line);
            let link = line.passable_link()?;
            let crosses = line.point_side(start) == Side::Front && line.point_side(end) == Side::Back;
            crosses.then_some((ic.frac, *link))
        })
    }
}

impl MapQuery for LineListMap {
    fn point_in_sector(&self, x: Fixed, y: Fixed) -> SectorId {
        let p = V2Fixed::new(x, y);
        (0..self.sectors.len() as u32)
            .map(SectorId)
            .find(|id| self.sector_contains(*id, p))
            .unwrap_or_else(|| {
                trace!(x = %x, y = %y, "point outside every sector");
                SectorId(0)
            })
    }

    #[inline]
    fn sector(&self, id: SectorId) -> &Sector {
        &self.sectors[id.0 as usize]
    }

    #[inline]
    fn line(&self, id: LineId) -> &Line {
        &self.lines[id.0 as usize]
    }

    fn path_traverse(&self, trace: DivLine, visitor: &mut dyn InterceptVisitor) -> bool {
        for intercept in self.intercepts(&trace) {
            if visitor.visit(&intercept, &trace) != TraverseStep::Continue {
                return false;
            }
        }
        true
    }

    fn link_offset(&self, from: GroupId, to: GroupId) -> LinkOffset {
        if from == to {
            return V3Fixed::ZERO;
        }
        self.links.get(&(from, to)).copied().unwrap_or_else(|| {
            trace!(from = from.0, to = to.0, "no link between groups");
            V3Fixed::ZERO
        })
    }

    fn portal_crossing(&self, origin: V2Fixed, delta: V2Fixed, group: &mut GroupId) -> V2Fixed {
        let mut start = origin;
        let mut end = origin + delta;
        for _ in 0..MAX_PORTAL_CROSSINGS {
            let trace = DivLine::between(start, end);
            let Some((frac, link)) = self.first_portal_crossing(&trace) else {
                return end;
            };
            let shift = link.delta.xy();
            start = trace.point_at(frac) + shift;
            end = end + shift;
            *group = link.to_group;
        }
        warn!(x = %end.x, y = %end.y, "portal crossing chain hit the cap");
        end
    }

    fn check_sight(&self, params: &SightParams) -> bool {
        let offset = self.link_offset(params.cgroup, params.tgroup);
        let mut eye = params.eye();
        let mut goal = V3Fixed::new(params.tx, params.ty, params.tz) - offset;
        // Visible window as slopes from the eye over the whole path. A
        // saturated quotient only ever gets compared, never added to a height.
        let mut bottom_slope = goal.z - eye.z;
        let mut top_slope = goal.z + params.theight - eye.z;
        let mut start = eye.xy();
        let mut covered = Fixed::ZERO;

        for _ in 0..=MAX_PORTAL_CROSSINGS {
            let leg = DivLine::between(start, goal.xy());
            let mut crossing: Option<(Fixed, LinkData)> = None;
            let mut blocked = false;

            self.path_traverse(leg, &mut |ic: &Intercept, tr: &DivLine| {
                let line = self.line(ic.line);
                if let Some(link) = line.passable_link() {
                    if line.point_side(tr.origin()) == Side::Front
                        && line.point_side(tr.end()) == Side::Back
                    {
                        crossing = Some((ic.frac, *link));
                        return TraverseStep::Crossed;
                    }
                }
                let Some(back_id) = line.back.filter(|_| line.is_two_sided()) else {
                    blocked = true;
                    return TraverseStep::Stop;
                };
                let front = self.sector(line.front);
                let back = self.sector(back_id);
                let open_top = front.ceiling.min(back.ceiling);
                let open_bottom = front.floor.max(back.floor);
                if open_bottom >= open_top {
                    blocked = true;
                    return TraverseStep::Stop;
                }

                let frac = covered + ic.frac * (Fixed::ONE - covered);
                if frac > Fixed::ZERO {
                    if front.floor != back.floor {
                        bottom_slope = bottom_slope.max((open_bottom - eye.z) / frac);
                    }
                    if front.ceiling != back.ceiling {
                        top_slope = top_slope.min((open_top - eye.z) / frac);
                    }
                }
                if top_slope < bottom_slope {
                    blocked = true;
                    return TraverseStep::Stop;
                }
                TraverseStep::Continue
            });

            if blocked {
                return false;
            }
            let Some((frac, link)) = crossing else {
                return true;
            };
            covered = covered + frac * (Fixed::ONE - covered);
            start = leg.point_at(frac) + link.delta.xy();
            eye = eye + link.delta;
            goal = goal + link.delta;
        }
        false
    }

    fn player_start(&self, index: usize) -> Option<PlayerStart> {
        self.player_starts.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MapBuilder;

    /// Two rooms joined by an open two-sided line at x = 256.
    fn two_rooms(step: i32) -> LineListMap {
        let mut b = MapBuilder::new();
        let west = b.sector(0, 128, 0);
        let east = b.sector(step, 128, 0);
        b.wall((0, 0), (0, 128), west);
        b.wall((0, 128), (256, 128), west);
        b.line((256, 128), (256, 0), west, Some(east));
        b.wall((256, 0), (0, 0), west);
        b.wall((256, 128), (512, 128), east);
        b.wall((512, 128), (512, 0), east);
        b.wall((512, 0), (256, 0), east);
        b.build().unwrap()
    }

    #[test]
    fn test_point_in_sector() {
        let map = two_rooms(0);
        assert_eq!(map.point_in_sector(Fixed::from_int(100), Fixed::from_int(64)), SectorId(0));
        assert_eq!(map.point_in_sector(Fixed::from_int(300), Fixed::from_int(64)), SectorId(1));
        // Outside falls back to the first sector.
        assert_eq!(map.point_in_sector(Fixed::from_int(-50), Fixed::from_int(64)), SectorId(0));
    }

    #[test]
    fn test_sector_lines_include_both_sides() {
        let map = two_rooms(0);
        assert_eq!(map.sector(SectorId(0)).lines.len(), 4);
        assert_eq!(map.sector(SectorId(1)).lines.len(), 4);
    }

    #[test]
    fn test_traverse_orders_intercepts() {
        let map = two_rooms(0);
        let mut seen = Vec::new();
        let trace = DivLine::between(V2Fixed::units(128, 64), V2Fixed::units(600, 64));
        let finished = map.path_traverse(trace, &mut |ic: &Intercept, _: &DivLine| {
            seen.push(ic.line);
            TraverseStep::Continue
        });
        assert!(finished);
        assert_eq!(seen, vec![LineId(2), LineId(5)]);
    }

    #[test]
    fn test_traverse_stops_on_request() {
        let map = two_rooms(0);
        let trace = DivLine::between(V2Fixed::units(128, 64), V2Fixed::units(600, 64));
        let mut visits = 0;
        let finished = map.path_traverse(trace, &mut |_: &Intercept, _: &DivLine| {
            visits += 1;
            TraverseStep::Stop
        });
        assert!(!finished);
        assert_eq!(visits, 1);
    }

    #[test]
    fn test_trace_from_a_line_skips_it() {
        let map = two_rooms(0);
        let trace = DivLine::between(V2Fixed::units(256, 64), V2Fixed::units(400, 64));
        let mut seen = Vec::new();
        map.path_traverse(trace, &mut |ic: &Intercept, _: &DivLine| {
            seen.push(ic.line);
            TraverseStep::Continue
        });
        assert!(seen.is_empty());
    }

    #[test]
    fn test_sight_through_open_line() {
        let map = two_rooms(0);
        let params = SightParams::from_viewpoint(V3Fixed::units(64, 64, 0), Fixed::from_int(41), GroupId(0))
            .with_target_point(V3Fixed::units(400, 64, 20), GroupId(0));
        assert!(map.check_sight(&params));
    }

    #[test]
    fn test_sight_blocked_by_wall() {
        let map = two_rooms(0);
        let params = SightParams::from_viewpoint(V3Fixed::units(64, 64, 0), Fixed::from_int(41), GroupId(0))
            .with_target_point(V3Fixed::units(700, 64, 20), GroupId(0));
        assert!(!map.check_sight(&params));
    }

    #[test]
    fn test_sight_blocked_by_closed_step() {
        // East floor at ceiling height: no opening at all.
        let map = two_rooms(128);
        let params = SightParams::from_viewpoint(V3Fixed::units(64, 64, 0), Fixed::from_int(41), GroupId(0))
            .with_target_point(V3Fixed::units(400, 64, 128), GroupId(0));
        assert!(!map.check_sight(&params));
    }

    #[test]
    fn test_sight_over_low_step_to_low_target_fails() {
        // A 100-unit step hides a point on the far floor from a low eye.
        let map = two_rooms(100);
        let params = SightParams::from_viewpoint(V3Fixed::units(200, 64, 0), Fixed::from_int(41), GroupId(0))
            .with_target_point(V3Fixed::units(500, 64, 0), GroupId(0));
        assert!(!map.check_sight(&params));
    }

    /// A 10-unit-wide pit at floor 0 beside a long raised hall at floor 100.
    fn pit_beside_ledge() -> LineListMap {
        let mut b = MapBuilder::new();
        let pit = b.sector(0, 228, 0);
        let ledge = b.sector(100, 228, 0);
        b.wall((0, 0), (0, 128), pit);
        b.wall((0, 128), (10, 128), pit);
        b.line((10, 128), (10, 0), pit, Some(ledge));
        b.wall((10, 0), (0, 0), pit);
        b.wall((10, 128), (3000, 128), ledge);
        b.wall((3000, 128), (3000, 0), ledge);
        b.wall((3000, 0), (10, 0), ledge);
        b.build().unwrap()
    }

    #[test]
    fn test_sight_blocked_by_ledge_right_in_front_of_eye() {
        let map = pit_beside_ledge();
        for eye_x in [8, 1] {
            let params = SightParams::from_viewpoint(V3Fixed::units(eye_x, 64, 0), Fixed::from_int(41), GroupId(0))
                .with_target_point(V3Fixed::units(2900, 64, 100), GroupId(0));
            assert!(!map.check_sight(&params), "eye at x = {eye_x}");
        }
    }

    #[test]
    fn test_sight_over_ledge_from_above() {
        let map = pit_beside_ledge();
        let params = SightParams::from_viewpoint(V3Fixed::units(8, 64, 0), Fixed::from_int(150), GroupId(0))
            .with_target_point(V3Fixed::units(2900, 64, 100), GroupId(0));
        assert!(map.check_sight(&params));
    }

    #[test]
    fn test_rejects_one_sided_portal() {
        let mut b = MapBuilder::new();
        let s = b.sector(0, 128, 0);
        b.room(s, 0, 0, 64, 64);
        b.wall((100, 0), (100, 64), s).portal = Some(crate::map::PortalDef {
            dx: 0,
            dy: 0,
            dz: 0,
            to_group: 0,
            passable: true,
        });
        assert!(matches!(b.build(), Err(MapError::OneSidedPortal { line: 4 })));
    }

    #[test]
    fn test_rejects_missing_vertex() {
        let mut def = MapBuilder::new().into_def();
        def.sectors.push(crate::map::SectorDef { floor: 0, ceiling: 64, group: 0 });
        def.lines.push(crate::map::LineDef {
            v1: 0,
            v2: 1,
            front: 0,
            back: None,
            blocking: false,
            portal: None,
        });
        assert!(matches!(
            LineListMap::from_def(&def),
            Err(MapError::MissingVertex { line: 0, vertex: 0 })
        ));
    }

    #[test]
    fn test_link_offset_same_group_is_zero() {
        let map = two_rooms(0);
        assert_eq!(map.link_offset(GroupId(3), GroupId(3)), V3Fixed::ZERO);
        assert_eq!(map.link_offset(GroupId(0), GroupId(1)), V3Fixed::ZERO);
    }
}
