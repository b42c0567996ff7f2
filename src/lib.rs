//! Bounce Battle - a two-ball physics battler
//!
//! Core modules:
//! - `sim`: Deterministic simulation (name analysis, physics, abilities, items, comeback)
//! - `hall_of_fame`: Capped match-history records
//! - `tuning`: Data-driven match configuration

pub mod hall_of_fame;
pub mod sim;
pub mod tuning;

pub use hall_of_fame::HallOfFame;
pub use sim::state::{MatchOutcome, MatchState};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Maximum delta time per tick to prevent spiral of death after long pauses
    pub const MAX_DELTA: f32 = 0.1;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 20.0;
    /// Speed imparted to both balls at match start
    pub const LAUNCH_SPEED: f32 = 200.0;

    /// Physics constants
    pub const FRICTION: f32 = 0.01;
    pub const RESTITUTION: f32 = 0.9;
    /// Velocity components below this are zeroed (anti-jitter)
    pub const MIN_VELOCITY: f32 = 0.1;
    /// Scales relative-velocity momentum into collision damage
    pub const COLLISION_DAMAGE_FACTOR: f32 = 0.05;
}
