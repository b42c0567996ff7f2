//! The battle arena: a shrinking rectangular region plus transient field entities
//!
//! Shrinking stays centered within the original bounds. Field entities are
//! data-only variants spawned by arena items; each exerts a per-tick force on
//! every ball in range and expires on its own timer.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    pub initial_width: f32,
    pub initial_height: f32,
    pub width: f32,
    pub height: f32,
    /// Offset keeping the shrunk region centered in the original bounds
    pub x: f32,
    pub y: f32,
    pub shrinking: bool,
    /// Fraction of the initial size lost per second
    pub shrink_rate: f32,
    /// Comeback sets this to 1.5 while the match is badly lopsided
    pub shrink_multiplier: f32,
    pub min_width: f32,
    pub min_height: f32,
    pub entities: Vec<FieldEntity>,
}

impl Arena {
    pub fn new(tuning: &Tuning) -> Self {
        log::info!(
            "Arena created with size: {} x {}",
            tuning.arena_width,
            tuning.arena_height
        );
        Self {
            initial_width: tuning.arena_width,
            initial_height: tuning.arena_height,
            width: tuning.arena_width,
            height: tuning.arena_height,
            x: 0.0,
            y: 0.0,
            shrinking: tuning.shrinking,
            shrink_rate: tuning.shrink_rate,
            shrink_multiplier: 1.0,
            min_width: tuning.arena_width * tuning.min_size_fraction,
            min_height: tuning.arena_height * tuning.min_size_fraction,
            entities: Vec::new(),
        }
    }

    pub fn update(&mut self, dt: f32) {
        if self.shrinking {
            self.shrink(dt);
        }
    }

    fn shrink(&mut self, dt: f32) {
        let rate = self.shrink_rate * self.shrink_multiplier;
        let width_reduction = self.initial_width * rate * dt;
        let height_reduction = self.initial_height * rate * dt;

        self.width = (self.width - width_reduction).max(self.min_width);
        self.height = (self.height - height_reduction).max(self.min_height);

        self.x = (self.initial_width - self.width) / 2.0;
        self.y = (self.initial_height - self.height) / 2.0;
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, pos: Vec2, radius: f32) -> bool {
        pos.x - radius >= self.left()
            && pos.x + radius <= self.right()
            && pos.y - radius >= self.top()
            && pos.y + radius <= self.bottom()
    }

    /// Random point inside the current bounds, keeping a margin from the edges
    pub fn random_position(&self, margin: f32, rng: &mut impl Rng) -> Vec2 {
        Vec2::new(
            self.x + margin + rng.random::<f32>() * (self.width - 2.0 * margin),
            self.y + margin + rng.random::<f32>() * (self.height - 2.0 * margin),
        )
    }

    pub fn add_entity(&mut self, entity: FieldEntity) {
        self.entities.push(entity);
    }

    /// Advance all field entities, dropping the expired ones. Ball friction
    /// multipliers are reset first so an expired or exited oil slick stops
    /// affecting them.
    pub fn update_entities(&mut self, dt: f32, balls: &mut [Ball]) {
        for ball in balls.iter_mut() {
            ball.friction_multiplier = 1.0;
        }
        self.entities.retain_mut(|entity| entity.update(dt, balls));
    }
}

/// A transient arena-owned object exerting forces on balls over an area
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FieldEntity {
    /// Radial attraction, stronger toward the center
    GravityWell {
        pos: Vec2,
        radius: f32,
        strength: f32,
        duration: f32,
    },
    /// Friction override inside the radius
    OilSlick { pos: Vec2, radius: f32, duration: f32 },
    /// Tangential force, weakest at center and edge, peaking mid-radius
    Vortex {
        pos: Vec2,
        radius: f32,
        rotation_speed: f32,
        duration: f32,
    },
}

impl FieldEntity {
    /// Advance one tick; returns false once the entity has expired
    pub fn update(&mut self, dt: f32, balls: &mut [Ball]) -> bool {
        match self {
            FieldEntity::GravityWell {
                pos,
                radius,
                strength,
                duration,
            } => {
                *duration -= dt;
                for ball in balls.iter_mut() {
                    let delta = *pos - ball.pos;
                    let dist = delta.length();
                    if dist > 0.0 && dist < *radius {
                        let force = (1.0 - dist / *radius) * *strength * dt;
                        ball.vel += (delta / dist) * force;
                    }
                }
                *duration > 0.0
            }
            FieldEntity::OilSlick {
                pos,
                radius,
                duration,
            } => {
                *duration -= dt;
                for ball in balls.iter_mut() {
                    if (*pos - ball.pos).length() < *radius {
                        ball.friction_multiplier = 0.2;
                    }
                }
                *duration > 0.0
            }
            FieldEntity::Vortex {
                pos,
                radius,
                rotation_speed,
                duration,
            } => {
                *duration -= dt;
                for ball in balls.iter_mut() {
                    let delta = ball.pos - *pos;
                    let dist = delta.length();
                    if dist > 0.0 && dist < *radius {
                        let tangent = Vec2::new(-delta.y, delta.x) / dist;
                        let factor =
                            (1.0 - (2.0 * dist / *radius - 1.0).abs()) * *rotation_speed;
                        ball.vel += tangent * factor * dt * 100.0;
                    }
                }
                *duration > 0.0
            }
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldEntity::GravityWell { .. } => "GravityWell",
            FieldEntity::OilSlick { .. } => "OilSlick",
            FieldEntity::Vortex { .. } => "Vortex",
        }
    }

    pub fn pos(&self) -> Vec2 {
        match self {
            FieldEntity::GravityWell { pos, .. }
            | FieldEntity::OilSlick { pos, .. }
            | FieldEntity::Vortex { pos, .. } => *pos,
        }
    }

    pub fn radius(&self) -> f32 {
        match self {
            FieldEntity::GravityWell { radius, .. }
            | FieldEntity::OilSlick { radius, .. }
            | FieldEntity::Vortex { radius, .. } => *radius,
        }
    }
}
