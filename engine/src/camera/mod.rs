//! Camera Module
//!
//! The three alternative viewpoints and the context that arbitrates them.
//! This module is renderer agnostic - it only produces camera poses.

pub mod chase;
pub mod chase_target;
pub mod context;
pub mod follow;
pub mod view;
pub mod walk;

pub use chase::ChaseCamera;
pub use chase_target::{ChaseTarget, naive_chase_target, resolve_chase_target};
pub use context::{CameraContext, CameraMode};
pub use follow::{FollowCamera, follow_pitch, locate_follow_cam};
pub use view::Camera;
pub use walk::{CENTER_PITCH_LOOK, FLIGHT_CENTER, TicCmd, WalkCamera};
