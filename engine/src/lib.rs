//! Portal Camera Library
//!
//! Alternative viewpoints for a sector/portal map engine: a chase camera
//! that trails the player through linked portals, a free walk camera driven
//! by tic commands, and a follow camera that watches a single thing.
//!
//! # Modules
//!
//! - [`fixed`] - 16.16 fixed point, binary angles, trig tables
//! - [`map`] - Map query contract and a line-list reference map
//! - [`actor`] - Player snapshot, player starts and the thing registry
//! - [`camera`] - Chase, walk and follow cameras plus their context
//! - [`config`] - Validated chase camera tunables
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```ignore
//! use portal_cam_engine::camera::CameraContext;
//! use portal_cam_engine::config::CameraConfig;
//! use portal_cam_engine::map::MapBuilder;
//!
//! let mut b = MapBuilder::new();
//! let s = b.sector(0, 128, 0);
//! b.room(s, 0, 0, 512, 512);
//! b.player_start(256, 256, 0);
//! let map = b.build()?;
//!
//! let mut cameras = CameraContext::new(CameraConfig::default());
//! cameras.set_in_level(true);
//! cameras.start_chase(&map, &player);
//!
//! // every tic
//! cameras.tick_chase(&map, &player);
//! let origin = cameras.view().map(|cam| cam.lerp_origin(frac));
//! ```

pub mod actor;
pub mod camera;
pub mod config;
pub mod error;
pub mod fixed;
pub mod map;

// Re-export the types most callers need
pub use camera::{Camera, CameraContext, CameraMode, TicCmd};
pub use config::{CameraConfig, ChaseSettings};
pub use error::{ConfigError, EngineError, MapError, Result};
pub use fixed::{Angle, Fixed};
pub use map::{LineListMap, MapBuilder, MapQuery};
