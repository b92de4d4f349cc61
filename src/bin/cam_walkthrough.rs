//! Camera Walkthrough
//!
//! Headless demo that drives each camera through a short scripted sequence
//! and logs the resulting poses.
//!
//! Usage: `cam_walkthrough [--map map.json] [--config camera.json] [--chase-tics N]`
//!
//! Without `--map` a built-in level is used: two rooms in different portal
//! groups joined by a linked portal. Set `RUST_LOG=debug` (or `trace`) to
//! see the camera logs.

use std::path::PathBuf;

use clap::Parser;
use portal_cam_engine::actor::{PlayerView, Thing, ThingRegistry};
use portal_cam_engine::camera::{CENTER_PITCH_LOOK, Camera, CameraContext, FLIGHT_CENTER, TicCmd};
use portal_cam_engine::config::CameraConfig;
use portal_cam_engine::fixed::{Angle, V2Fixed, V3Fixed};
use portal_cam_engine::map::{GroupId, LineListMap, MapBuilder, MapQuery, PortalDef};
use portal_cam_engine::{MapError, Result};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

// ============================================================================
// DEMO LEVEL
// ============================================================================

/// Room A (group 0) at x 0..256, room B (group 1) at x 1280..1536. Walking
/// east through A's east wall comes out of B's west wall.
fn demo_map() -> std::result::Result<LineListMap, MapError> {
    let mut b = MapBuilder::new();
    let room_a = b.sector(0, 128, 0);
    let box_a = b.sector(0, 128, 0);
    let room_b = b.sector(0, 128, 1);
    let box_b = b.sector(0, 128, 1);

    b.wall((0, 0), (0, 128), room_a);
    b.wall((0, 128), (256, 128), room_a);
    b.line((256, 128), (256, 0), room_a, Some(box_a)).portal =
        Some(PortalDef { dx: 1024, dy: 0, dz: 0, to_group: 1, passable: true });
    b.wall((256, 0), (0, 0), room_a);
    b.wall((256, 128), (272, 128), box_a);
    b.wall((272, 128), (272, 0), box_a);
    b.wall((272, 0), (256, 0), box_a);

    b.wall((1280, 128), (1536, 128), room_b);
    b.wall((1536, 128), (1536, 0), room_b);
    b.wall((1536, 0), (1280, 0), room_b);
    b.line((1280, 0), (1280, 128), room_b, Some(box_b)).portal =
        Some(PortalDef { dx: -1024, dy: 0, dz: 0, to_group: 0, passable: true });
    b.wall((1264, 0), (1264, 128), box_b);
    b.wall((1264, 128), (1280, 128), box_b);
    b.wall((1280, 0), (1264, 0), box_b);

    b.link_groups(0, 1, 1024, 0, 0);
    b.player_start(64, 64, 0);
    b.build()
}

// ============================================================================
// ARGUMENTS
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "cam_walkthrough", about = "Drive the chase, walk and follow cameras through a level")]
struct Args {
    /// Map definition (JSON). Uses the built-in two-group level when omitted
    #[arg(long, value_name = "PATH")]
    map: Option<PathBuf>,

    /// Camera configuration (JSON)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Tics to run the chase script for
    #[arg(long, default_value_t = 24)]
    chase_tics: usize,
}

fn log_pose(mode: &str, tic: usize, cam: &Camera) {
    info!(
        mode,
        tic,
        x = cam.x.to_f64(),
        y = cam.y.to_f64(),
        z = cam.z.to_f64(),
        group = cam.group.0,
        angle = cam.angle.to_degrees(),
        pitch = cam.pitch,
        "pose"
    );
}

/// Player start 0 (or the origin) standing on whatever sector is under it.
fn start_feet(map: &LineListMap) -> (V3Fixed, Angle, GroupId) {
    let start = map.player_start(0).unwrap_or_default();
    let sector = map.sector_at(start.x(), start.y());
    (V3Fixed::new(start.x(), start.y(), sector.floor), start.facing(), sector.group)
}

// ============================================================================
// SCRIPTS
// ============================================================================

fn run_chase(cameras: &mut CameraContext, map: &LineListMap, tics: usize) {
    info!("chase script");
    let (feet, facing, group) = start_feet(map);
    let mut player = PlayerView::standing(feet, facing, group);

    cameras.start_chase(map, &player);
    for tic in 0..tics {
        // Walk east 12 units a tic; far enough to pass any portal ahead.
        let mut group = player.group;
        let dest = map.portal_crossing(player.position().xy(), V2Fixed::units(12, 0), &mut group);
        player.x = dest.x;
        player.y = dest.y;
        player.group = group;

        if let Some(target) = cameras.tick_chase(map, &player) {
            if target.crossings > 0 && tic % 6 == 0 {
                info!(crossings = target.crossings, "chase target seen through a portal");
            }
        }
        if let Some(cam) = cameras.view() {
            log_pose("chase", tic, cam);
        }
    }
    cameras.end_chase();
}

fn run_walk(cameras: &mut CameraContext, map: &LineListMap) {
    info!("walk script");
    cameras.start_walk(map);
    let script = [
        TicCmd { forwardmove: 25, ..Default::default() },
        TicCmd { forwardmove: 25, angleturn: 0x0400, ..Default::default() },
        TicCmd { sidemove: 20, look: 400, ..Default::default() },
        TicCmd { fly: 6, ..Default::default() },
        TicCmd { forwardmove: 25, look: 400, ..Default::default() },
        TicCmd { fly: FLIGHT_CENTER, look: CENTER_PITCH_LOOK, ..Default::default() },
    ];
    for (tic, cmd) in script.iter().enumerate() {
        cameras.tick_walk(map, cmd);
        if let Some(cam) = cameras.view() {
            log_pose("walk", tic, cam);
        }
    }
    cameras.end_walk();
}

fn run_follow(cameras: &mut CameraContext, map: &LineListMap) {
    info!("follow script");
    let mut things = ThingRegistry::new();
    let (feet, _, group) = start_feet(map);
    let key = things.spawn(Thing::new(feet, group));

    if !cameras.start_follow(map, &mut things, key) {
        warn!("follow camera could not be placed");
        return;
    }
    for tic in 0..8 {
        if let Some(thing) = things.get_mut(key) {
            let moved = thing.position() + V3Fixed::units(16, 4, 0);
            thing.set_position(moved);
        }
        let visible = cameras.tick_follow(map, &things);
        if let Some(cam) = cameras.view() {
            log_pose("follow", tic, cam);
        }
        debug!(tic, visible, "follow sight");
    }
    things.remove(key);
    let lost = !cameras.tick_follow(map, &things);
    info!(lost, active = ?cameras.active_mode(), "follow target removed");
    cameras.end_follow(&mut things);
}

// ============================================================================
// MAIN
// ============================================================================

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let map = match &args.map {
        Some(path) => LineListMap::load(path)?,
        None => demo_map()?,
    };
    let config = match &args.config {
        Some(path) => CameraConfig::load(path)?,
        None => CameraConfig::default(),
    };
    info!(
        sectors = map.sector_count(),
        lines = map.line_count(),
        height = config.chase.height(),
        dist = config.chase.dist(),
        speed = config.chase.speed(),
        "walkthrough ready"
    );

    let mut cameras = CameraContext::new(config);
    cameras.set_in_level(true);

    run_chase(&mut cameras, &map, args.chase_tics);
    run_walk(&mut cameras, &map);
    run_follow(&mut cameras, &map);

    cameras.set_in_level(false);
    Ok(())
}
