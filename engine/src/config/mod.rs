//! Camera Configuration
//!
//! The chase camera's three tunables, range-checked at every entry point
//! (constructor, setters and deserialization) so the tickers never see an
//! out-of-range value.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const CHASE_HEIGHT_RANGE: (i32, i32) = (-31, 100);
pub const CHASE_DIST_RANGE: (i32, i32) = (10, 1024);
pub const CHASE_SPEED_RANGE: (i32, i32) = (1, 100);

fn check(name: &'static str, value: i32, (min, max): (i32, i32)) -> Result<i32, ConfigError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange { name, value, min, max })
    }
}

#[derive(Deserialize)]
struct RawChaseSettings {
    height: i32,
    dist: i32,
    speed: i32,
}

/// Chase camera tunables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawChaseSettings")]
pub struct ChaseSettings {
    /// Extra height above the player's eyes, map units.
    height: i32,
    /// Distance behind the player, map units.
    dist: i32,
    /// Percentage of the remaining distance covered per tic.
    speed: i32,
}

impl Default for ChaseSettings {
    fn default() -> Self {
        Self { height: 12, dist: 112, speed: 33 }
    }
}

impl TryFrom<RawChaseSettings> for ChaseSettings {
    type Error = ConfigError;

    fn try_from(raw: RawChaseSettings) -> Result<Self, Self::Error> {
        Self::new(raw.height, raw.dist, raw.speed)
    }
}

impl ChaseSettings {
    pub fn new(height: i32, dist: i32, speed: i32) -> Result<Self, ConfigError> {
        Ok(Self {
            height: check("chasecam_height", height, CHASE_HEIGHT_RANGE)?,
            dist: check("chasecam_dist", dist, CHASE_DIST_RANGE)?,
            speed: check("chasecam_speed", speed, CHASE_SPEED_RANGE)?,
        })
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn dist(&self) -> i32 {
        self.dist
    }

    #[inline]
    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn set_height(&mut self, height: i32) -> Result<(), ConfigError> {
        self.height = check("chasecam_height", height, CHASE_HEIGHT_RANGE)?;
        Ok(())
    }

    pub fn set_dist(&mut self, dist: i32) -> Result<(), ConfigError> {
        self.dist = check("chasecam_dist", dist, CHASE_DIST_RANGE)?;
        Ok(())
    }

    pub fn set_speed(&mut self, speed: i32) -> Result<(), ConfigError> {
        self.speed = check("chasecam_speed", speed, CHASE_SPEED_RANGE)?;
        Ok(())
    }
}

/// All camera tunables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default)]
    pub chase: ChaseSettings,
}

impl CameraConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_in_range() {
        let d = ChaseSettings::default();
        assert_eq!(ChaseSettings::new(d.height(), d.dist(), d.speed()).unwrap(), d);
    }

    #[test]
    fn test_range_edges_accepted() {
        assert!(ChaseSettings::new(-31, 10, 1).is_ok());
        assert!(ChaseSettings::new(100, 1024, 100).is_ok());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(matches!(
            ChaseSettings::new(-32, 112, 33),
            Err(ConfigError::OutOfRange { name: "chasecam_height", .. })
        ));
        assert!(matches!(
            ChaseSettings::new(12, 1025, 33),
            Err(ConfigError::OutOfRange { name: "chasecam_dist", .. })
        ));
        assert!(matches!(
            ChaseSettings::new(12, 112, 0),
            Err(ConfigError::OutOfRange { name: "chasecam_speed", .. })
        ));
    }

    #[test]
    fn test_setter_keeps_old_value_on_error() {
        let mut s = ChaseSettings::default();
        assert!(s.set_speed(101).is_err());
        assert_eq!(s.speed(), 33);
        s.set_speed(100).unwrap();
        assert_eq!(s.speed(), 100);
    }

    #[test]
    fn test_json_is_validated() {
        let ok = CameraConfig::from_json(r#"{ "chase": { "height": 0, "dist": 64, "speed": 50 } }"#)
            .unwrap();
        assert_eq!(ok.chase.dist(), 64);

        let bad = CameraConfig::from_json(r#"{ "chase": { "height": 0, "dist": 5, "speed": 50 } }"#);
        assert!(matches!(bad, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_missing_chase_section_uses_defaults() {
        let cfg = CameraConfig::from_json("{}").unwrap();
        assert_eq!(cfg.chase, ChaseSettings::default());
    }

    #[test]
    fn test_json_round_trip() {
        let cfg = CameraConfig { chase: ChaseSettings::new(-10, 200, 75).unwrap() };
        assert_eq!(CameraConfig::from_json(&cfg.to_json().unwrap()).unwrap(), cfg);
    }
}
