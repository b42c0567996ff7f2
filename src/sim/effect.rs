//! Timed status effects attached to a combatant
//!
//! Effects are a closed set of variants rather than callback bags. Apply and
//! removal side effects dispatch on the kind, and any stat or radius delta the
//! apply makes is stored in the variant so removal reverses exactly what was
//! applied. Passive modifiers (attack boost, dodge chance, ...) carry no side
//! effects at all; the update loop reads them through [`totals`].

use serde::{Deserialize, Serialize};

use super::ball::Ball;

/// Sentinel duration: persists until explicitly removed by name
pub const PERMANENT: f32 = -1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectKind {
    // Item-granted modifiers
    AttackBoost { amount: f32 },
    DefenseShield { amount: f32 },
    SpeedBoost { amount: f32 },
    Healing,
    SpikeArmor { reflect: f32 },
    Invisibility { dodge: f32 },
    Growth { original_radius: f32, factor: f32 },
    Shrink { original_radius: f32, factor: f32 },
    BouncePad { multiplier: f32 },
    /// Stores the deltas actually applied so expiry reverses them exactly
    BerserkMode { attack: f32, speed: f32, defense: f32 },
    DoubleStrike,
    PhaseShift,
    EmpDisabled,
    EmpCaster,
    // Debuff imposed by the Disruptor passive
    Disrupted { factor: f32 },
    // Visual markers raised by abilities and the comeback system
    LifeSteal,
    AdaptiveShield,
    DamageReflection,
    OpportunistStrike,
    BerserkerRage,
    GravitonAura,
    UnstableWarning,
    UnstableExplosion,
    ChameleonShift,
    DisruptorField,
    AvatarAura,
    EqualizerAura,
    NemesisTargeting,
    NemesisStrike,
    PhoenixRebirth,
    PhantomDodge,
    MomentumSwing,
    CriticalHit,
    ComebackAura { intensity: f32 },
}

impl EffectKind {
    /// Stable key; at most one effect per name on a ball
    pub fn name(&self) -> &'static str {
        match self {
            EffectKind::AttackBoost { .. } => "AttackBoost",
            EffectKind::DefenseShield { .. } => "DefenseShield",
            EffectKind::SpeedBoost { .. } => "SpeedBoost",
            EffectKind::Healing => "Healing",
            EffectKind::SpikeArmor { .. } => "SpikeArmor",
            EffectKind::Invisibility { .. } => "Invisibility",
            EffectKind::Growth { .. } => "Growth",
            EffectKind::Shrink { .. } => "Shrink",
            EffectKind::BouncePad { .. } => "BouncePad",
            EffectKind::BerserkMode { .. } => "BerserkMode",
            EffectKind::DoubleStrike => "DoubleStrike",
            EffectKind::PhaseShift => "PhaseShift",
            EffectKind::EmpDisabled => "EMPDisabled",
            EffectKind::EmpCaster => "EMPCaster",
            EffectKind::Disrupted { .. } => "Disrupted",
            EffectKind::LifeSteal => "LifeSteal",
            EffectKind::AdaptiveShield => "AdaptiveShield",
            EffectKind::DamageReflection => "DamageReflection",
            EffectKind::OpportunistStrike => "OpportunistStrike",
            EffectKind::BerserkerRage => "BerserkerRage",
            EffectKind::GravitonAura => "GravitonAura",
            EffectKind::UnstableWarning => "UnstableWarning",
            EffectKind::UnstableExplosion => "UnstableExplosion",
            EffectKind::ChameleonShift => "ChameleonShift",
            EffectKind::DisruptorField => "DisruptorField",
            EffectKind::AvatarAura => "AvatarAura",
            EffectKind::EqualizerAura => "EqualizerAura",
            EffectKind::NemesisTargeting => "NemesisTargeting",
            EffectKind::NemesisStrike => "NemesisStrike",
            EffectKind::PhoenixRebirth => "PhoenixRebirth",
            EffectKind::PhantomDodge => "PhantomDodge",
            EffectKind::MomentumSwing => "MomentumSwing",
            EffectKind::CriticalHit => "CriticalHit",
            EffectKind::ComebackAura { .. } => "ComebackAura",
        }
    }

    /// Item-granted effects are the ones an EMP blast strips
    pub fn is_item_effect(&self) -> bool {
        matches!(
            self,
            EffectKind::AttackBoost { .. }
                | EffectKind::DefenseShield { .. }
                | EffectKind::SpeedBoost { .. }
                | EffectKind::Healing
                | EffectKind::SpikeArmor { .. }
                | EffectKind::Invisibility { .. }
                | EffectKind::Growth { .. }
                | EffectKind::Shrink { .. }
                | EffectKind::BouncePad { .. }
                | EffectKind::BerserkMode { .. }
                | EffectKind::DoubleStrike
                | EffectKind::PhaseShift
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    /// Seconds remaining; [`PERMANENT`] never ticks down
    pub duration: f32,
}

impl Effect {
    pub fn new(kind: EffectKind, duration: f32) -> Self {
        Self { kind, duration }
    }

    pub fn permanent(kind: EffectKind) -> Self {
        Self {
            kind,
            duration: PERMANENT,
        }
    }

    pub fn is_permanent(&self) -> bool {
        self.duration < 0.0
    }
}

/// Side effects fired when an effect lands on a ball
pub fn on_apply(ball: &mut Ball, kind: &EffectKind) {
    match kind {
        EffectKind::Growth {
            original_radius,
            factor,
        }
        | EffectKind::Shrink {
            original_radius,
            factor,
        } => {
            ball.radius = original_radius * factor;
        }
        EffectKind::BerserkMode {
            attack,
            speed,
            defense,
        } => {
            ball.attributes.attack += attack;
            ball.attributes.speed += speed;
            ball.attributes.defense -= defense;
        }
        EffectKind::DoubleStrike => ball.double_strike = true,
        EffectKind::PhaseShift => {
            ball.phase_shift = true;
            ball.opacity = 0.6;
        }
        EffectKind::Invisibility { .. } => ball.opacity = 0.4,
        EffectKind::EmpDisabled => {
            // Strip every active item effect, then lock new pickups out
            let mut kept = Vec::with_capacity(ball.effects.len());
            let mut stripped = Vec::new();
            for effect in std::mem::take(&mut ball.effects) {
                if effect.kind.is_item_effect() {
                    stripped.push(effect);
                } else {
                    kept.push(effect);
                }
            }
            ball.effects = kept;
            for effect in &stripped {
                log::info!("{}: {} disabled by EMP", ball.name, effect.kind.name());
                on_remove(ball, &effect.kind);
            }
            ball.items_disabled = true;
        }
        _ => {}
    }
}

/// Side effects fired when an effect expires or is replaced
pub fn on_remove(ball: &mut Ball, kind: &EffectKind) {
    match kind {
        EffectKind::Growth {
            original_radius, ..
        }
        | EffectKind::Shrink {
            original_radius, ..
        } => {
            ball.radius = *original_radius;
        }
        EffectKind::BerserkMode {
            attack,
            speed,
            defense,
        } => {
            ball.attributes.attack -= attack;
            ball.attributes.speed -= speed;
            ball.attributes.defense += defense;
        }
        EffectKind::DoubleStrike => ball.double_strike = false,
        // Wall collision re-clamps the ball into bounds on the next physics step
        EffectKind::PhaseShift => {
            ball.phase_shift = false;
            ball.opacity = 1.0;
        }
        EffectKind::Invisibility { .. } => ball.opacity = 1.0,
        EffectKind::EmpDisabled => ball.items_disabled = false,
        _ => {}
    }
}

/// Decrement every non-permanent effect and drop the ones crossing zero.
/// Removal order is stable. Callbacks of effects removed earlier in the same
/// tick have already run when later ones fire; this ordering is a documented
/// caveat, not something callers may rely against.
pub fn tick_effects(ball: &mut Ball, dt: f32) {
    let mut kept = Vec::with_capacity(ball.effects.len());
    let mut expired = Vec::new();

    for mut effect in std::mem::take(&mut ball.effects) {
        if effect.is_permanent() {
            kept.push(effect);
            continue;
        }
        effect.duration -= dt;
        if effect.duration <= 0.0 {
            expired.push(effect);
        } else {
            kept.push(effect);
        }
    }

    ball.effects = kept;
    for effect in &expired {
        on_remove(ball, &effect.kind);
    }
}

/// Aggregated numeric modifiers from a ball's active effects
#[derive(Debug, Clone, Copy)]
pub struct EffectTotals {
    pub attack_boost: f32,
    pub defense_boost: f32,
    pub speed_boost: f32,
    pub dodge_chance: f32,
    pub damage_reflect: f32,
    pub bounce_multiplier: f32,
    pub disruption: f32,
}

impl Default for EffectTotals {
    fn default() -> Self {
        Self {
            attack_boost: 0.0,
            defense_boost: 0.0,
            speed_boost: 0.0,
            dodge_chance: 0.0,
            damage_reflect: 0.0,
            bounce_multiplier: 1.0,
            disruption: 0.0,
        }
    }
}

/// Sum a ball's effect modifiers. An active `Disrupted` debuff scales the
/// ball's own positive buffs down by its factor.
pub fn totals(ball: &Ball) -> EffectTotals {
    let mut t = EffectTotals::default();

    for effect in &ball.effects {
        match &effect.kind {
            EffectKind::AttackBoost { amount } => t.attack_boost += amount,
            EffectKind::DefenseShield { amount } => t.defense_boost += amount,
            EffectKind::SpeedBoost { amount } => t.speed_boost += amount,
            EffectKind::SpikeArmor { reflect } => t.damage_reflect += reflect,
            EffectKind::Invisibility { dodge } => t.dodge_chance += dodge,
            EffectKind::BouncePad { multiplier } => t.bounce_multiplier *= multiplier,
            EffectKind::Disrupted { factor } => t.disruption = t.disruption.max(*factor),
            _ => {}
        }
    }

    if t.disruption > 0.0 {
        let scale = 1.0 - t.disruption;
        t.attack_boost *= scale;
        t.defense_boost *= scale;
        t.speed_boost *= scale;
        t.dodge_chance *= scale;
        t.damage_reflect *= scale;
        t.bounce_multiplier = 1.0 + (t.bounce_multiplier - 1.0) * scale;
    }

    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn test_ball() -> Ball {
        let mut rng = Pcg32::seed_from_u64(7);
        Ball::from_name("tester", 100.0, 100.0, &mut rng)
    }

    #[test]
    fn test_add_effect_replaces_same_name() {
        let mut ball = test_ball();
        let base_radius = ball.radius;

        ball.add_effect(Effect::new(
            EffectKind::Growth {
                original_radius: base_radius,
                factor: 1.5,
            },
            7.0,
        ));
        assert_eq!(ball.radius, base_radius * 1.5);
        assert_eq!(ball.effects.len(), 1);

        // Reapplying fires the old on_remove (radius reset) then the new on_apply
        ball.add_effect(Effect::new(
            EffectKind::Growth {
                original_radius: base_radius,
                factor: 2.0,
            },
            7.0,
        ));
        assert_eq!(ball.radius, base_radius * 2.0);
        assert_eq!(ball.effects.len(), 1);
    }

    #[test]
    fn test_expiry_fires_on_remove() {
        let mut ball = test_ball();
        ball.add_effect(Effect::new(EffectKind::DoubleStrike, 1.0));
        assert!(ball.double_strike);

        tick_effects(&mut ball, 0.5);
        assert!(ball.double_strike);

        tick_effects(&mut ball, 0.6);
        assert!(!ball.double_strike);
        assert!(ball.effects.is_empty());
    }

    #[test]
    fn test_permanent_effect_never_auto_removed() {
        let mut ball = test_ball();
        ball.add_effect(Effect::permanent(EffectKind::GravitonAura));

        for _ in 0..1000 {
            tick_effects(&mut ball, 1.0);
        }
        assert!(ball.has_effect("GravitonAura"));

        ball.remove_effect("GravitonAura");
        assert!(!ball.has_effect("GravitonAura"));
    }

    #[test]
    fn test_emp_strips_item_effects_only() {
        let mut ball = test_ball();
        ball.add_effect(Effect::new(EffectKind::DoubleStrike, 6.0));
        ball.add_effect(Effect::new(EffectKind::AttackBoost { amount: 0.25 }, 10.0));
        ball.add_effect(Effect::permanent(EffectKind::GravitonAura));

        ball.add_effect(Effect::new(EffectKind::EmpDisabled, 7.0));

        assert!(ball.items_disabled);
        assert!(!ball.double_strike);
        assert!(!ball.has_effect("DoubleStrike"));
        assert!(!ball.has_effect("AttackBoost"));
        assert!(ball.has_effect("GravitonAura"));

        tick_effects(&mut ball, 7.5);
        assert!(!ball.items_disabled);
    }

    #[test]
    fn test_totals_aggregation_and_disruption() {
        let mut ball = test_ball();
        ball.add_effect(Effect::new(EffectKind::AttackBoost { amount: 0.25 }, 10.0));
        ball.add_effect(Effect::new(EffectKind::Invisibility { dodge: 0.2 }, 6.0));

        let t = totals(&ball);
        assert_eq!(t.attack_boost, 0.25);
        assert_eq!(t.dodge_chance, 0.2);

        ball.add_effect(Effect::new(EffectKind::Disrupted { factor: 0.15 }, 1.0));
        let t = totals(&ball);
        assert!((t.attack_boost - 0.25 * 0.85).abs() < 1e-6);
        assert!((t.dodge_chance - 0.2 * 0.85).abs() < 1e-6);
    }

    #[test]
    fn test_berserk_reverses_exact_deltas() {
        let mut ball = test_ball();
        let before = ball.attributes;

        ball.add_effect(Effect::new(
            EffectKind::BerserkMode {
                attack: 50.0,
                speed: 30.0,
                defense: 12.0,
            },
            5.0,
        ));
        assert_eq!(ball.attributes.attack, before.attack + 50.0);
        assert_eq!(ball.attributes.defense, before.defense - 12.0);

        tick_effects(&mut ball, 5.5);
        assert_eq!(ball.attributes.attack, before.attack);
        assert_eq!(ball.attributes.speed, before.speed);
        assert_eq!(ball.attributes.defense, before.defense);
    }
}
