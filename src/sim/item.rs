//! Item pickups and the spawner
//!
//! Items land on a weighted category roll and a uniform pick within the
//! category. Most buff the ball that touches them through the effect system;
//! arena items register a field entity instead. A ball under an EMP still
//! consumes the item but gets nothing from it.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arena::{Arena, FieldEntity};
use super::ball::Ball;
use super::effect::{Effect, EffectKind};
use super::physics;

pub const ITEM_RADIUS: f32 = 10.0;
/// Base duration for timed item effects (seconds)
pub const DEFAULT_DURATION: f32 = 10.0;
pub const SPAWN_INTERVAL: f32 = 15.0;
pub const DESPAWN_TIME: f32 = 8.0;

/// Category weights: Attribute 50 / Special 30 / Arena 15 / Super 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemCategory {
    Attribute,
    Special,
    Arena,
    Super,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    // Attribute
    AttackBoost,
    DefenseShield,
    SpeedPill,
    HealthOrb,
    // Special
    SpikeArmor,
    InvisibilityCloak,
    GrowthRay,
    ShrinkRay,
    // Arena
    GravityWell,
    BouncePad,
    SlickOil,
    Vortex,
    // Super
    BerserkMode,
    EmpBlast,
    DoubleStrike,
    PhaseShift,
}

impl ItemKind {
    pub fn category(&self) -> ItemCategory {
        match self {
            ItemKind::AttackBoost
            | ItemKind::DefenseShield
            | ItemKind::SpeedPill
            | ItemKind::HealthOrb => ItemCategory::Attribute,
            ItemKind::SpikeArmor
            | ItemKind::InvisibilityCloak
            | ItemKind::GrowthRay
            | ItemKind::ShrinkRay => ItemCategory::Special,
            ItemKind::GravityWell
            | ItemKind::BouncePad
            | ItemKind::SlickOil
            | ItemKind::Vortex => ItemCategory::Arena,
            ItemKind::BerserkMode
            | ItemKind::EmpBlast
            | ItemKind::DoubleStrike
            | ItemKind::PhaseShift => ItemCategory::Super,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::AttackBoost => "Attack Boost",
            ItemKind::DefenseShield => "Defense Shield",
            ItemKind::SpeedPill => "Speed Pill",
            ItemKind::HealthOrb => "Health Orb",
            ItemKind::SpikeArmor => "Spike Armor",
            ItemKind::InvisibilityCloak => "Invisibility Cloak",
            ItemKind::GrowthRay => "Growth Ray",
            ItemKind::ShrinkRay => "Shrink Ray",
            ItemKind::GravityWell => "Gravity Well",
            ItemKind::BouncePad => "Bounce Pad",
            ItemKind::SlickOil => "Slick Oil",
            ItemKind::Vortex => "Vortex",
            ItemKind::BerserkMode => "Berserk Mode",
            ItemKind::EmpBlast => "EMP Blast",
            ItemKind::DoubleStrike => "Double Strike",
            ItemKind::PhaseShift => "Phase Shift",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ItemKind::AttackBoost | ItemKind::DoubleStrike => "⚔️",
            ItemKind::DefenseShield => "🛡️",
            ItemKind::SpeedPill => "💨",
            ItemKind::HealthOrb => "❤️",
            ItemKind::SpikeArmor | ItemKind::BouncePad => "🔄",
            ItemKind::InvisibilityCloak | ItemKind::PhaseShift => "👻",
            ItemKind::GrowthRay => "📏",
            ItemKind::ShrinkRay => "🔍",
            ItemKind::GravityWell => "🌀",
            ItemKind::SlickOil => "🛢️",
            ItemKind::Vortex => "🌪️",
            ItemKind::BerserkMode => "🔥",
            ItemKind::EmpBlast => "⚡",
        }
    }

    fn category_list(category: ItemCategory) -> &'static [ItemKind; 4] {
        use ItemKind::*;
        match category {
            ItemCategory::Attribute => &[AttackBoost, DefenseShield, SpeedPill, HealthOrb],
            ItemCategory::Special => &[SpikeArmor, InvisibilityCloak, GrowthRay, ShrinkRay],
            ItemCategory::Arena => &[GravityWell, BouncePad, SlickOil, Vortex],
            ItemCategory::Super => &[BerserkMode, EmpBlast, DoubleStrike, PhaseShift],
        }
    }
}

/// A pickup waiting on the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
    pub pos: Vec2,
    pub radius: f32,
    pub despawn_timer: f32,
    /// Fades linearly over the final two seconds
    pub opacity: f32,
}

impl Item {
    pub fn new(kind: ItemKind, pos: Vec2, despawn_time: f32) -> Self {
        Self {
            kind,
            pos,
            radius: ITEM_RADIUS,
            despawn_timer: despawn_time,
            opacity: 1.0,
        }
    }

    /// Tick the despawn timer; returns false once the item should vanish
    pub fn update(&mut self, dt: f32) -> bool {
        self.despawn_timer -= dt;
        if self.despawn_timer < 2.0 {
            self.opacity = (self.despawn_timer / 2.0).max(0.0);
        }
        self.despawn_timer > 0.0
    }

    /// Run the pickup effect exactly once. EMP-disabled balls get nothing.
    pub fn apply(&self, ball: &mut Ball, opponent: &mut Ball, arena: &mut Arena) {
        if ball.items_disabled {
            log::info!("{} cannot use items while EMP-disabled", ball.name);
            return;
        }
        apply_item(self.kind, ball, opponent, arena);
        log::info!("{} picked up {}", ball.name, self.kind.name());
    }
}

fn apply_item(kind: ItemKind, ball: &mut Ball, opponent: &mut Ball, arena: &mut Arena) {
    // Energizer/Catalyst multipliers plus the comeback item-duration bonus
    let duration_mult =
        ball.item_duration_multiplier * (1.0 + ball.comeback.item_duration_boost);
    let effect_mult = ball.item_effect_multiplier;

    match kind {
        ItemKind::AttackBoost => {
            ball.add_effect(Effect::new(
                EffectKind::AttackBoost {
                    amount: 0.25 * effect_mult,
                },
                DEFAULT_DURATION * duration_mult,
            ));
        }
        ItemKind::DefenseShield => {
            ball.add_effect(Effect::new(
                EffectKind::DefenseShield {
                    amount: 0.30 * effect_mult,
                },
                8.0 * duration_mult,
            ));
        }
        ItemKind::SpeedPill => {
            ball.add_effect(Effect::new(
                EffectKind::SpeedBoost {
                    amount: 0.20 * effect_mult,
                },
                5.0 * duration_mult,
            ));
        }
        ItemKind::HealthOrb => {
            ball.heal((15.0 * effect_mult).ceil());
            ball.add_effect(Effect::new(EffectKind::Healing, 1.0));
        }
        ItemKind::SpikeArmor => {
            ball.add_effect(Effect::new(
                EffectKind::SpikeArmor {
                    reflect: 0.25 * effect_mult,
                },
                8.0 * duration_mult,
            ));
        }
        ItemKind::InvisibilityCloak => {
            ball.add_effect(Effect::new(
                EffectKind::Invisibility {
                    dodge: 0.20 * effect_mult,
                },
                6.0 * duration_mult,
            ));
        }
        ItemKind::GrowthRay => {
            ball.add_effect(Effect::new(
                EffectKind::Growth {
                    original_radius: ball.radius,
                    factor: 1.5 * effect_mult,
                },
                7.0 * duration_mult,
            ));
        }
        ItemKind::ShrinkRay => {
            ball.add_effect(Effect::new(
                EffectKind::Shrink {
                    original_radius: ball.radius,
                    factor: 0.6 * (2.0 - effect_mult),
                },
                7.0 * duration_mult,
            ));
        }
        ItemKind::GravityWell => {
            arena.add_entity(FieldEntity::GravityWell {
                pos: ball.pos,
                radius: ball.radius * 10.0,
                strength: 150.0,
                duration: 5.0,
            });
        }
        ItemKind::BouncePad => {
            ball.add_effect(Effect::new(
                EffectKind::BouncePad {
                    multiplier: 1.5 * effect_mult,
                },
                6.0 * duration_mult,
            ));
        }
        ItemKind::SlickOil => {
            arena.add_entity(FieldEntity::OilSlick {
                pos: ball.pos,
                radius: 100.0,
                duration: 8.0,
            });
        }
        ItemKind::Vortex => {
            arena.add_entity(FieldEntity::Vortex {
                pos: ball.pos,
                radius: 80.0,
                rotation_speed: 5.0,
                duration: 7.0,
            });
        }
        ItemKind::BerserkMode => {
            let defense = ball.attributes.defense;
            let defense_delta = defense - (defense - 20.0).max(5.0);
            ball.add_effect(Effect::new(
                EffectKind::BerserkMode {
                    attack: 50.0 * effect_mult,
                    speed: 30.0 * effect_mult,
                    defense: defense_delta,
                },
                5.0 * duration_mult,
            ));
        }
        ItemKind::EmpBlast => {
            opponent.add_effect(Effect::new(EffectKind::EmpDisabled, 7.0 * effect_mult));
            ball.add_effect(Effect::new(EffectKind::EmpCaster, 1.5));
        }
        ItemKind::DoubleStrike => {
            ball.add_effect(Effect::new(
                EffectKind::DoubleStrike,
                6.0 * duration_mult,
            ));
        }
        ItemKind::PhaseShift => {
            ball.add_effect(Effect::new(EffectKind::PhaseShift, 4.0 * duration_mult));
        }
    }
}

/// Spawns pickups on an interval and drives their lifecycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSpawner {
    pub spawn_timer: f32,
    pub spawn_interval: f32,
    pub despawn_time: f32,
    pub active_items: Vec<Item>,
}

impl ItemSpawner {
    /// First spawn lands at half the regular interval
    pub fn new(spawn_interval: f32, despawn_time: f32) -> Self {
        Self {
            spawn_timer: spawn_interval / 2.0,
            spawn_interval,
            despawn_time,
            active_items: Vec::new(),
        }
    }

    /// Tick the spawner: maybe spawn, then age items and resolve pickups
    pub fn update(
        &mut self,
        dt: f32,
        balls: &mut [Ball; 2],
        arena: &mut Arena,
        rng: &mut impl Rng,
    ) {
        // Comeback item luck drains the spawn countdown faster
        let luck = balls
            .iter()
            .map(|b| b.comeback.item_luck_boost)
            .fold(0.0, f32::max);
        self.spawn_timer -= dt * (1.0 + luck);

        if self.spawn_timer <= 0.0 {
            self.spawn_item(arena, rng);
            self.spawn_timer = self.spawn_interval;
        }

        self.update_items(dt, balls, arena);
    }

    fn update_items(&mut self, dt: f32, balls: &mut [Ball; 2], arena: &mut Arena) {
        let mut kept = Vec::with_capacity(self.active_items.len());

        for mut item in std::mem::take(&mut self.active_items) {
            if !item.update(dt) {
                continue;
            }

            let [first, second] = balls;
            if physics::distance(item.pos, first.pos) < item.radius + first.radius {
                item.apply(first, second, arena);
            } else if physics::distance(item.pos, second.pos) < item.radius + second.radius {
                item.apply(second, first, arena);
            } else {
                kept.push(item);
            }
        }

        self.active_items = kept;
    }

    /// Weighted category roll, uniform pick within the category
    pub fn spawn_item(&mut self, arena: &Arena, rng: &mut impl Rng) {
        let category = select_category(rng);
        let list = ItemKind::category_list(category);
        let kind = list[rng.random_range(0..list.len())];
        let pos = arena.random_position(ITEM_RADIUS * 2.0, rng);

        log::info!("Item spawned: {} ({:?})", kind.name(), category);
        self.active_items.push(Item::new(kind, pos, self.despawn_time));
    }

    pub fn reset(&mut self) {
        self.spawn_timer = self.spawn_interval / 2.0;
        self.active_items.clear();
    }
}

fn select_category(rng: &mut impl Rng) -> ItemCategory {
    let roll = rng.random_range(0.0..100.0);
    if roll < 50.0 {
        ItemCategory::Attribute
    } else if roll < 80.0 {
        ItemCategory::Special
    } else if roll < 95.0 {
        ItemCategory::Arena
    } else {
        ItemCategory::Super
    }
}
