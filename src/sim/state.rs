//! Match state, outcome detection, and read-only snapshots for rendering

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ability;
use super::arena::Arena;
use super::ball::Ball;
use super::item::ItemSpawner;
use crate::tuning::Tuning;

/// Result of [`MatchState::outcome`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    InProgress,
    /// Index of the surviving ball
    Winner(usize),
    /// Both balls reached zero HP on the same tick
    Draw,
}

impl MatchOutcome {
    pub fn is_over(&self) -> bool {
        !matches!(self, MatchOutcome::InProgress)
    }
}

/// Complete simulation state for one match. The controller in `tick` is the
/// sole writer sequencer; all subsystem callbacks mutate through it.
#[derive(Debug, Clone)]
pub struct MatchState {
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulated seconds since match start
    pub elapsed: f32,
    /// While paused the update phase is skipped entirely
    pub paused: bool,
    pub arena: Arena,
    pub balls: [Ball; 2],
    pub spawner: ItemSpawner,
}

impl MatchState {
    /// Build a match between two named balls. The same names and seed always
    /// produce the same match.
    pub fn new(name_a: &str, name_b: &str, tuning: &Tuning, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let arena = Arena::new(tuning);

        let mut first = Ball::new(
            name_a,
            tuning.arena_width * 0.25,
            tuning.arena_height * 0.5,
            tuning.ball_radius,
            &mut rng,
        );
        let mut second = Ball::new(
            name_b,
            tuning.arena_width * 0.75,
            tuning.arena_height * 0.5,
            tuning.ball_radius,
            &mut rng,
        );

        // Launch both at full speed in random directions
        let angle_a = rng.random_range(0.0..std::f32::consts::TAU);
        let angle_b = rng.random_range(0.0..std::f32::consts::TAU);
        first.vel = Vec2::new(angle_a.cos(), angle_a.sin()) * tuning.launch_speed;
        second.vel = Vec2::new(angle_b.cos(), angle_b.sin()) * tuning.launch_speed;

        ability::init_ability(&mut first, &mut rng);
        ability::init_ability(&mut second, &mut rng);

        log::info!(
            "Match ready: {} (power {}) vs {} (power {})",
            first.name,
            first.power_score,
            second.name,
            second.power_score
        );

        Self {
            seed,
            rng,
            elapsed: 0.0,
            paused: false,
            arena,
            balls: [first, second],
            spawner: ItemSpawner::new(tuning.spawn_interval, tuning.despawn_time),
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Terminal state check: a ball at zero HP loses; both at zero is a draw
    pub fn outcome(&self) -> MatchOutcome {
        let first_dead = self.balls[0].hp <= 0.0;
        let second_dead = self.balls[1].hp <= 0.0;
        match (first_dead, second_dead) {
            (true, true) => MatchOutcome::Draw,
            (true, false) => MatchOutcome::Winner(1),
            (false, true) => MatchOutcome::Winner(0),
            (false, false) => MatchOutcome::InProgress,
        }
    }

    /// Read-only view for the rendering layer
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            elapsed: self.elapsed,
            arena: ArenaSnapshot {
                x: self.arena.x,
                y: self.arena.y,
                width: self.arena.width,
                height: self.arena.height,
            },
            balls: [
                BallSnapshot::of(&self.balls[0]),
                BallSnapshot::of(&self.balls[1]),
            ],
            items: self
                .spawner
                .active_items
                .iter()
                .map(|item| ItemSnapshot {
                    pos: item.pos,
                    radius: item.radius,
                    icon: item.kind.icon().to_string(),
                    opacity: item.opacity,
                })
                .collect(),
            entities: self
                .arena
                .entities
                .iter()
                .map(|entity| EntitySnapshot {
                    kind: entity.kind_name().to_string(),
                    pos: entity.pos(),
                    radius: entity.radius(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub elapsed: f32,
    pub arena: ArenaSnapshot,
    pub balls: [BallSnapshot; 2],
    pub items: Vec<ItemSnapshot>,
    pub entities: Vec<EntitySnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub name: String,
    pub pos: Vec2,
    pub radius: f32,
    pub hue: f32,
    pub opacity: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub power_score: f32,
    pub passive: String,
    pub tier: String,
    pub effects: Vec<String>,
}

impl BallSnapshot {
    fn of(ball: &Ball) -> Self {
        Self {
            name: ball.name.clone(),
            pos: ball.pos,
            radius: ball.radius,
            hue: ball.hue,
            opacity: ball.opacity,
            hp: ball.hp.max(0.0),
            max_hp: ball.max_hp,
            power_score: ball.power_score,
            passive: ball.ability.kind.name().to_string(),
            tier: ball.passive_tier.as_str().to_string(),
            effects: ball
                .effect_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub pos: Vec2,
    pub radius: f32,
    pub icon: String,
    pub opacity: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub kind: String,
    pub pos: Vec2,
    pub radius: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_match_places_and_launches_balls() {
        let tuning = Tuning::default();
        let state = MatchState::new("Zeus", "Apollo", &tuning, 1);

        assert_eq!(state.balls[0].pos.x, tuning.arena_width * 0.25);
        assert_eq!(state.balls[1].pos.x, tuning.arena_width * 0.75);
        for ball in &state.balls {
            assert!((ball.vel.length() - tuning.launch_speed).abs() < 0.01);
            assert!(ball.hp > 0.0);
        }
        assert_eq!(state.outcome(), MatchOutcome::InProgress);
    }

    #[test]
    fn test_same_seed_same_match() {
        let tuning = Tuning::default();
        let a = MatchState::new("Zeus", "Apollo", &tuning, 77);
        let b = MatchState::new("Zeus", "Apollo", &tuning, 77);

        assert_eq!(a.balls[0].vel, b.balls[0].vel);
        assert_eq!(a.balls[0].passive_tier, b.balls[0].passive_tier);
        assert_eq!(a.balls[0].ability.kind, b.balls[0].ability.kind);
        assert_eq!(a.balls[1].attributes, b.balls[1].attributes);
    }

    #[test]
    fn test_outcome_detection() {
        let tuning = Tuning::default();
        let mut state = MatchState::new("Zeus", "Apollo", &tuning, 1);

        state.balls[1].hp = 0.0;
        assert_eq!(state.outcome(), MatchOutcome::Winner(0));

        state.balls[0].hp = -3.0;
        assert_eq!(state.outcome(), MatchOutcome::Draw);
        assert!(state.outcome().is_over());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let tuning = Tuning::default();
        let state = MatchState::new("Zeus", "a", &tuning, 5);
        let snapshot = state.snapshot();

        assert_eq!(snapshot.balls[0].name, "Zeus");
        assert_eq!(snapshot.balls[1].name, "a");
        assert_eq!(snapshot.arena.width, tuning.arena_width);
        assert!(snapshot.items.is_empty());

        // Snapshots serialize for the rendering layer
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("Zeus"));
    }
}
