//! Map Query Module
//!
//! The geometry contract the cameras consume: sector lookup, intercept
//! traversal, portal link offsets and side-effect-free sight checks.
//!
//! Every query takes `&self`. A camera may speculatively trace or check sight
//! as often as it likes without touching simulation state.
//!
//! # Submodules
//!
//! - [`def`] - Serializable map definition and [`MapBuilder`]
//! - [`line_map`] - [`LineListMap`], a brute-force reference implementation

pub mod def;
pub mod line_map;

use std::ops::BitOr;

use serde::{Deserialize, Serialize};

use crate::actor::{PlayerStart, Thing};
use crate::fixed::{DivLine, Fixed, Side, V2Fixed, V3Fixed};

pub use def::{LineDef, LinkDef, MapBuilder, MapDef, PortalDef, SectorDef};
pub use line_map::LineListMap;

/// Hard cap on chained portal crossings within one trace.
pub const MAX_PORTAL_CROSSINGS: u32 = 64;

// ============================================================================
// IDENTIFIERS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectorId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub u32);

/// A linked-portal coordinate region. Groups are offset from one another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u32);

// ============================================================================
// GEOMETRY
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineFlags(pub u16);

impl LineFlags {
    pub const NONE: LineFlags = LineFlags(0);
    /// Blocks players and monsters, and the chase camera.
    pub const BLOCKING: LineFlags = LineFlags(0x0001);
    pub const TWO_SIDED: LineFlags = LineFlags(0x0004);

    #[inline]
    pub fn contains(self, other: LineFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for LineFlags {
    type Output = LineFlags;
    fn bitor(self, rhs: LineFlags) -> LineFlags {
        LineFlags(self.0 | rhs.0)
    }
}

/// Offset applied when moving from one group's coordinates to another's.
pub type LinkOffset = V3Fixed;

/// Destination of a linked portal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkData {
    pub delta: LinkOffset,
    pub to_group: GroupId,
}

/// A portal attached to a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinePortal {
    pub link: LinkData,
    /// Things (and cameras) may cross it.
    pub passable: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Sector {
    pub floor: Fixed,
    pub ceiling: Fixed,
    pub group: GroupId,
    /// Every line with this sector on either side.
    pub lines: Vec<LineId>,
}

impl Sector {
    #[inline]
    pub fn opening(&self) -> Fixed {
        self.ceiling - self.floor
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub v1: V2Fixed,
    pub v2: V2Fixed,
    pub flags: LineFlags,
    pub front: SectorId,
    pub back: Option<SectorId>,
    pub portal: Option<LinePortal>,
}

impl Line {
    #[inline]
    pub fn divline(&self) -> DivLine {
        DivLine::between(self.v1, self.v2)
    }

    #[inline]
    pub fn point_side(&self, p: V2Fixed) -> Side {
        self.divline().point_side(p)
    }

    #[inline]
    pub fn is_two_sided(&self) -> bool {
        self.flags.contains(LineFlags::TWO_SIDED) && self.back.is_some()
    }

    /// The passable portal link, if this line carries one.
    #[inline]
    pub fn passable_link(&self) -> Option<&LinkData> {
        self.portal.as_ref().filter(|p| p.passable).map(|p| &p.link)
    }
}

// ============================================================================
// TRAVERSAL
// ============================================================================

/// A line crossed by a trace, `frac` along it (16.16, `0 < frac <= 1`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Intercept {
    pub frac: Fixed,
    pub line: LineId,
}

/// What a visitor wants the traversal to do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraverseStep {
    Continue,
    /// Hit something; stop here.
    Stop,
    /// Passed through a portal; stop so the caller can resume on the far side.
    Crossed,
}

/// Per-intercept callback for [`MapQuery::path_traverse`].
pub trait InterceptVisitor {
    fn visit(&mut self, intercept: &Intercept, trace: &DivLine) -> TraverseStep;
}

impl<F> InterceptVisitor for F
where
    F: FnMut(&Intercept, &DivLine) -> TraverseStep,
{
    fn visit(&mut self, intercept: &Intercept, trace: &DivLine) -> TraverseStep {
        self(intercept, trace)
    }
}

// ============================================================================
// SIGHT
// ============================================================================

/// A synthetic viewpoint and the target it is looking for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SightParams {
    /// Viewpoint feet position.
    pub cx: Fixed,
    pub cy: Fixed,
    pub cz: Fixed,
    /// Eye height above `cz`.
    pub cheight: Fixed,
    pub cgroup: GroupId,
    /// Target base position.
    pub tx: Fixed,
    pub ty: Fixed,
    pub tz: Fixed,
    /// Target vertical extent above `tz`.
    pub theight: Fixed,
    pub tgroup: GroupId,
}

impl SightParams {
    /// Viewpoint with no target yet (target equals viewpoint).
    pub fn from_viewpoint(feet: V3Fixed, eye_height: Fixed, group: GroupId) -> Self {
        Self {
            cx: feet.x,
            cy: feet.y,
            cz: feet.z,
            cheight: eye_height,
            cgroup: group,
            tx: feet.x,
            ty: feet.y,
            tz: feet.z,
            theight: Fixed::ZERO,
            tgroup: group,
        }
    }

    pub fn with_target_thing(mut self, thing: &Thing) -> Self {
        self.tx = thing.x;
        self.ty = thing.y;
        self.tz = thing.z;
        self.theight = thing.height;
        self.tgroup = thing.group;
        self
    }

    pub fn with_target_point(mut self, point: V3Fixed, group: GroupId) -> Self {
        self.tx = point.x;
        self.ty = point.y;
        self.tz = point.z;
        self.theight = Fixed::ZERO;
        self.tgroup = group;
        self
    }

    #[inline]
    pub fn eye(&self) -> V3Fixed {
        V3Fixed::new(self.cx, self.cy, self.cz + self.cheight)
    }
}

// ============================================================================
// QUERY CONTRACT
// ============================================================================

/// Geometry queries consumed by the cameras.
pub trait MapQuery {
    /// Sector of the subsector containing `(x, y)`.
    fn point_in_sector(&self, x: Fixed, y: Fixed) -> SectorId;

    fn sector(&self, id: SectorId) -> &Sector;

    fn line(&self, id: LineId) -> &Line;

    /// Visit every line crossing `trace` in increasing `frac` order.
    ///
    /// Returns `false` if the visitor stopped early.
    fn path_traverse(&self, trace: DivLine, visitor: &mut dyn InterceptVisitor) -> bool;

    /// Offset from `from`'s coordinates to `to`'s. Zero for the same group.
    fn link_offset(&self, from: GroupId, to: GroupId) -> LinkOffset;

    /// Move `origin` by `delta`, following any passable line portal on the way
    /// and updating `group` to wherever the point ends up.
    fn portal_crossing(&self, origin: V2Fixed, delta: V2Fixed, group: &mut GroupId) -> V2Fixed;

    /// Whether the viewpoint can see the target. Never mutates anything.
    fn check_sight(&self, params: &SightParams) -> bool;

    /// Level start spot for player `index`, if the map has one.
    fn player_start(&self, index: usize) -> Option<PlayerStart>;

    /// Sector under `(x, y)`.
    fn sector_at(&self, x: Fixed, y: Fixed) -> &Sector {
        self.sector(self.point_in_sector(x, y))
    }
}
