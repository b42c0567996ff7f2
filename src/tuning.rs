//! Data-driven match configuration
//!
//! Mirrors the built-in constants so a host can deserialize a tuning file and
//! hand it to `MatchState::new` without recompiling. Unknown fields fall back
//! to defaults.

use serde::{Deserialize, Serialize};

use crate::consts;
use crate::sim::item;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena_width: f32,
    pub arena_height: f32,
    pub shrinking: bool,
    /// Fraction of the initial arena size lost per second
    pub shrink_rate: f32,
    /// The arena never shrinks below this fraction of its initial size
    pub min_size_fraction: f32,
    pub ball_radius: f32,
    pub launch_speed: f32,
    pub spawn_interval: f32,
    pub despawn_time: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: 800.0,
            arena_height: 600.0,
            shrinking: true,
            shrink_rate: 0.01,
            min_size_fraction: 0.3,
            ball_radius: consts::BALL_RADIUS,
            launch_speed: consts::LAUNCH_SPEED,
            spawn_interval: item::SPAWN_INTERVAL,
            despawn_time: item::DESPAWN_TIME,
        }
    }
}

impl Tuning {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let tuning = Tuning::default();
        assert_eq!(tuning.arena_width, 800.0);
        assert_eq!(tuning.arena_height, 600.0);
        assert_eq!(tuning.ball_radius, consts::BALL_RADIUS);
        assert_eq!(tuning.spawn_interval, item::SPAWN_INTERVAL);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let tuning = Tuning::from_json(r#"{"arena_width": 1024.0}"#).unwrap();
        assert_eq!(tuning.arena_width, 1024.0);
        assert_eq!(tuning.arena_height, 600.0);
        assert!(tuning.shrinking);
    }

    #[test]
    fn test_round_trip() {
        let tuning = Tuning {
            shrink_rate: 0.02,
            ..Tuning::default()
        };
        let json = tuning.to_json().unwrap();
        let back = Tuning::from_json(&json).unwrap();
        assert_eq!(back.shrink_rate, 0.02);
    }
}
