//! The combatant: a named ball with derived stats, health, effects, and a passive

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ability::AbilityInstance;
use super::comeback::ComebackState;
use super::effect::{self, Effect};
use super::name::{self, Attributes, NameFactors, Tier};
use crate::consts::BALL_RADIUS;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub name: String,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub mass: f32,

    // Stats derived from the name
    pub power_score: f32,
    pub attributes: Attributes,
    pub passive_tier: Tier,
    pub factors: NameFactors,

    pub hp: f32,
    pub max_hp: f32,

    // Rendering hints
    pub hue: f32,
    pub opacity: f32,

    pub effects: Vec<Effect>,
    pub ability: AbilityInstance,

    // Transient flags toggled by effects and abilities
    pub phase_shift: bool,
    pub double_strike: bool,
    pub items_disabled: bool,
    pub friction_multiplier: f32,
    pub damage_multiplier: f32,
    pub item_effect_multiplier: f32,
    pub item_duration_multiplier: f32,

    pub comeback: ComebackState,
}

impl Ball {
    /// Create a combatant from a name at the given position. The passive
    /// ability is selected here but its init hook runs at match setup.
    pub fn from_name(name: &str, x: f32, y: f32, rng: &mut impl Rng) -> Self {
        Self::new(name, x, y, BALL_RADIUS, rng)
    }

    pub fn new(name: &str, x: f32, y: f32, radius: f32, rng: &mut impl Rng) -> Self {
        let analysis = name::analyze_name(name, rng);
        let mut attributes = analysis.attributes;
        attributes.sanitize();

        let max_hp =
            (100.0 * (analysis.power_score / 100.0) * (attributes.hp / 25.0)).round();
        let ability = AbilityInstance::select(name.trim(), analysis.passive_tier);
        let hue = name::ball_hue(analysis.passive_tier, rng);

        Self {
            name: name.trim().to_string(),
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            radius,
            mass: std::f32::consts::PI * radius * radius * 0.1,
            power_score: analysis.power_score,
            attributes,
            passive_tier: analysis.passive_tier,
            factors: analysis.factors,
            hp: max_hp,
            max_hp,
            hue,
            opacity: 1.0,
            effects: Vec::new(),
            ability,
            phase_shift: false,
            double_strike: false,
            items_disabled: false,
            friction_multiplier: 1.0,
            damage_multiplier: 1.0,
            item_effect_multiplier: 1.0,
            item_duration_multiplier: 1.0,
            comeback: ComebackState::default(),
        }
    }

    /// Subtract damage from HP. Negative amounts heal (the Nemesis quirk),
    /// capped at max HP. Returns whether the ball is still alive.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        self.hp -= amount;
        if self.hp > self.max_hp {
            self.hp = self.max_hp;
        }
        self.hp > 0.0
    }

    /// Restore HP, never exceeding max
    pub fn heal(&mut self, amount: f32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }

    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp > 0.0 {
            self.hp / self.max_hp
        } else {
            0.0
        }
    }

    /// Attach an effect. An effect with the same name is replaced: the old
    /// one's removal side effects fire first, then the new one's apply.
    pub fn add_effect(&mut self, new: Effect) {
        let key = new.kind.name();
        let kind = new.kind.clone();

        if let Some(index) = self.effects.iter().position(|e| e.kind.name() == key) {
            let old = self.effects.remove(index);
            effect::on_remove(self, &old.kind);
            self.effects.insert(index, new);
        } else {
            self.effects.push(new);
        }

        effect::on_apply(self, &kind);
    }

    pub fn has_effect(&self, name: &str) -> bool {
        self.effects.iter().any(|e| e.kind.name() == name)
    }

    /// Explicitly remove an effect by name, firing its removal side effects
    pub fn remove_effect(&mut self, name: &str) {
        if let Some(index) = self.effects.iter().position(|e| e.kind.name() == name) {
            let removed = self.effects.remove(index);
            effect::on_remove(self, &removed.kind);
        }
    }

    pub fn effect_names(&self) -> Vec<&'static str> {
        self.effects.iter().map(|e| e.kind.name()).collect()
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }
}
