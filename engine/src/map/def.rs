//! Map Definition
//!
//! A plain, serde-friendly description of a level: vertices in whole map
//! units, sectors, lines, group links and player starts. [`LineListMap`]
//! validates and compiles it into queryable geometry.
//!
//! ```rust,ignore
//! use portal_cam_engine::map::MapBuilder;
//!
//! let mut builder = MapBuilder::new();
//! let hall = builder.sector(0, 128, 0);
//! builder.room(hall, 0, 0, 512, 256);
//! builder.player_start(64, 64, 0);
//! let map = builder.build()?;
//! ```
//!
//! [`LineListMap`]: super::LineListMap

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::actor::PlayerStart;
use crate::error::MapError;

use super::LineListMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorDef {
    pub floor: i32,
    pub ceiling: i32,
    #[serde(default)]
    pub group: u32,
}

/// Linked portal carried by a line: crossing front-to-back moves by `(dx, dy, dz)`
/// into `to_group`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalDef {
    pub dx: i32,
    pub dy: i32,
    #[serde(default)]
    pub dz: i32,
    pub to_group: u32,
    #[serde(default = "default_passable")]
    pub passable: bool,
}

fn default_passable() -> bool {
    true
}

/// A line from `v1` to `v2`. The front side is on the right of that direction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDef {
    pub v1: usize,
    pub v2: usize,
    pub front: u32,
    #[serde(default)]
    pub back: Option<u32>,
    #[serde(default)]
    pub blocking: bool,
    #[serde(default)]
    pub portal: Option<PortalDef>,
}

/// Coordinate offset from group `from` to group `to`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDef {
    pub from: u32,
    pub to: u32,
    pub dx: i32,
    pub dy: i32,
    #[serde(default)]
    pub dz: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDef {
    pub vertices: Vec<[i32; 2]>,
    pub sectors: Vec<SectorDef>,
    pub lines: Vec<LineDef>,
    #[serde(default)]
    pub links: Vec<LinkDef>,
    #[serde(default)]
    pub player_starts: Vec<PlayerStart>,
}

impl MapDef {
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, MapError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String, MapError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Incremental [`MapDef`] construction. Identical vertices are shared.
#[derive(Clone, Debug, Default)]
pub struct MapBuilder {
    def: MapDef,
}

impl MapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex(&mut self, x: i32, y: i32) -> usize {
        if let Some(index) = self.def.vertices.iter().position(|v| *v == [x, y]) {
            return index;
        }
        self.def.vertices.push([x, y]);
        self.def.vertices.len() - 1
    }

    /// Add a sector; returns its index.
    pub fn sector(&mut self, floor: i32, ceiling: i32, group: u32) -> u32 {
        self.def.sectors.push(SectorDef { floor, ceiling, group });
        (self.def.sectors.len() - 1) as u32
    }

    /// Add a line and hand it back for flag/portal tweaks.
    pub fn line(&mut self, a: (i32, i32), b: (i32, i32), front: u32, back: Option<u32>) -> &mut LineDef {
        let v1 = self.vertex(a.0, a.1);
        let v2 = self.vertex(b.0, b.1);
        self.def.lines.push(LineDef { v1, v2, front, back, blocking: false, portal: None });
        let last = self.def.lines.len() - 1;
        &mut self.def.lines[last]
    }

    /// One-sided wall.
    pub fn wall(&mut self, a: (i32, i32), b: (i32, i32), sector: u32) -> &mut LineDef {
        self.line(a, b, sector, None)
    }

    /// Four one-sided walls enclosing `[x0, x1] x [y0, y1]`, fronts facing in.
    pub fn room(&mut self, sector: u32, x0: i32, y0: i32, x1: i32, y1: i32) {
        self.wall((x0, y0), (x0, y1), sector);
        self.wall((x0, y1), (x1, y1), sector);
        self.wall((x1, y1), (x1, y0), sector);
        self.wall((x1, y0), (x0, y0), sector);
    }

    /// Offsets between two groups, both directions.
    pub fn link_groups(&mut self, from: u32, to: u32, dx: i32, dy: i32, dz: i32) {
        self.def.links.push(LinkDef { from, to, dx, dy, dz });
        self.def.links.push(LinkDef { from: to, to: from, dx: -dx, dy: -dy, dz: -dz });
    }

    pub fn player_start(&mut self, x: i32, y: i32, angle: i32) {
        self.def.player_starts.push(PlayerStart { x, y, angle });
    }

    pub fn def(&self) -> &MapDef {
        &self.def
    }

    pub fn into_def(self) -> MapDef {
        self.def
    }

    pub fn build(&self) -> Result<LineListMap, MapError> {
        LineListMap::from_def(&self.def)
    }
}
