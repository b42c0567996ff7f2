//! Catch-up scaling for outmatched combatants
//!
//! Activates only for a sufficiently large power-score gap after the opening
//! phase. Five mechanisms scale with a single [0, 1] comeback factor and decay
//! again as the underdog actually catches up, so assistance never snowballs.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::ball::Ball;
use super::effect::{Effect, EffectKind};

/// Minimum power-score gap before comeback kicks in
pub const MIN_POWER_DIFF: f32 = 50.0;
/// Minimum match time before comeback kicks in (seconds)
pub const ACTIVATION_TIME: f32 = 30.0;

pub const MAX_DAMAGE_BOOST: f32 = 0.3;
pub const MAX_DAMAGE_REDUCTION: f32 = 0.3;
pub const MAX_CRIT_CHANCE: f32 = 0.1;

/// Decay applied after the underdog lands a hit worth >=10% of the leader's max HP
pub const REDUCTION_ON_DAMAGE: f32 = 0.05;
/// Decay applied while the underdog holds an HP lead
pub const REDUCTION_ON_HP_LEAD: f32 = 0.5;

/// Arena shrinks this much faster while the gap exceeds 1.5x MIN_POWER_DIFF
pub const ARENA_SHRINK_BOOST: f32 = 1.5;

pub const MOMENTUM_MAX_STACKS: u32 = 5;
pub const MOMENTUM_DURATION: f32 = 3.0;

/// Per-ball comeback bookkeeping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComebackState {
    pub active: bool,
    pub damage_boost: f32,
    pub damage_reduction: f32,
    pub critical_chance: f32,
    pub item_luck_boost: f32,
    pub item_duration_boost: f32,
    pub momentum_factor: f32,
    pub momentum_stacks: u32,
    pub momentum_timer: f32,
}

/// Refresh the weaker ball's comeback scaling for this tick
pub fn update(weaker: &mut Ball, stronger: &Ball, game_time: f32, arena: &mut Arena) {
    let power_diff = stronger.power_score - weaker.power_score;

    if game_time < ACTIVATION_TIME || power_diff < MIN_POWER_DIFF {
        reset(weaker);
        arena.shrink_multiplier = 1.0;
        return;
    }

    let factor = comeback_factor(weaker, stronger, power_diff);

    weaker.comeback.active = true;

    // Adaptive strength
    weaker.comeback.damage_boost = factor * MAX_DAMAGE_BOOST;

    // Resilience shield, with a flat bonus at critical health
    let mut reduction = factor * MAX_DAMAGE_REDUCTION;
    if weaker.hp_fraction() < 0.3 {
        reduction += 0.1;
    }
    weaker.comeback.damage_reduction = reduction;

    // Momentum swing scaling (stacks are granted on hits)
    weaker.comeback.momentum_factor = 0.05 * (1.0 + factor);

    // Item favoritism
    weaker.comeback.item_luck_boost = 0.25 * factor;
    weaker.comeback.item_duration_boost = 0.2 * factor;

    // Critical strikes, gated by the size of the gap
    weaker.comeback.critical_chance = (power_diff / 500.0).min(MAX_CRIT_CHANCE) * factor;

    // Shorten badly lopsided matches
    arena.shrink_multiplier = if power_diff > MIN_POWER_DIFF * 1.5 {
        ARENA_SHRINK_BOOST
    } else {
        1.0
    };

    update_visual(weaker, factor);
}

/// Normalized [0, 1] factor from the power gap and relative health
pub fn comeback_factor(weaker: &Ball, stronger: &Ball, power_diff: f32) -> f32 {
    let mut factor = ((power_diff - MIN_POWER_DIFF) / 100.0).min(1.0);

    // Less help while actually ahead on HP
    if weaker.hp > stronger.hp {
        factor *= 1.0 - REDUCTION_ON_HP_LEAD;
    }

    // More help while clearly behind and hurting
    let weaker_fraction = weaker.hp_fraction();
    let stronger_fraction = stronger.hp_fraction();
    if weaker_fraction < 0.5 && weaker_fraction < stronger_fraction {
        factor *= 1.0 + (0.5 - weaker_fraction);
    }

    factor.clamp(0.0, 1.0)
}

/// Clear every comeback mechanism on the ball
pub fn reset(ball: &mut Ball) {
    ball.comeback = ComebackState::default();
    ball.remove_effect("ComebackAura");
}

/// Scale outgoing damage: boost, momentum stacks, then the crit roll
pub fn apply_damage_boost(ball: &mut Ball, base_damage: f32, rng: &mut impl Rng) -> f32 {
    if !ball.comeback.active {
        return base_damage;
    }

    let mut boosted = base_damage * (1.0 + ball.comeback.damage_boost);

    if ball.comeback.momentum_stacks > 0 {
        let momentum =
            ball.comeback.momentum_stacks as f32 * ball.comeback.momentum_factor;
        boosted *= 1.0 + momentum;
    }

    if ball.comeback.critical_chance > 0.0
        && rng.random::<f32>() < ball.comeback.critical_chance
    {
        boosted *= 2.0;
        ball.add_effect(Effect::new(EffectKind::CriticalHit, 0.5));
        log::info!(
            "Critical hit by {}! Damage: {} -> {}",
            ball.name,
            base_damage,
            boosted
        );
    }

    boosted.round()
}

/// Scale incoming damage down, never below 1
pub fn apply_damage_reduction(ball: &Ball, incoming: f32) -> f32 {
    if !ball.comeback.active {
        return incoming;
    }
    (incoming * (1.0 - ball.comeback.damage_reduction))
        .round()
        .max(1.0)
}

/// Decay momentum stacks after the no-hit window elapses
pub fn update_momentum(ball: &mut Ball, dt: f32) {
    if ball.comeback.momentum_stacks == 0 {
        return;
    }
    ball.comeback.momentum_timer += dt;
    if ball.comeback.momentum_timer >= MOMENTUM_DURATION {
        ball.comeback.momentum_stacks = 0;
        ball.comeback.momentum_timer = 0.0;
        ball.remove_effect("MomentumSwing");
    }
}

/// Grant a momentum stack after a successful hit
pub fn add_momentum_stack(ball: &mut Ball) {
    if !ball.comeback.active {
        return;
    }
    ball.comeback.momentum_timer = 0.0;
    ball.comeback.momentum_stacks =
        (ball.comeback.momentum_stacks + 1).min(MOMENTUM_MAX_STACKS);
    ball.add_effect(Effect::new(EffectKind::MomentumSwing, MOMENTUM_DURATION));
}

/// Self-correcting feedback: big hits and HP leads shrink the assist
pub fn adjust_after_damage_dealt(weaker: &mut Ball, stronger: &Ball, damage_dealt: f32) {
    if !weaker.comeback.active {
        return;
    }

    let damage_percent = if stronger.max_hp > 0.0 {
        damage_dealt / stronger.max_hp
    } else {
        0.0
    };

    if damage_percent >= 0.1 {
        weaker.comeback.damage_boost *= 1.0 - REDUCTION_ON_DAMAGE;
        weaker.comeback.damage_reduction *= 1.0 - REDUCTION_ON_DAMAGE;
        weaker.comeback.critical_chance *= 1.0 - REDUCTION_ON_DAMAGE;
        update_visual(weaker, weaker.comeback.damage_boost / MAX_DAMAGE_BOOST);
        log::info!(
            "Comeback reduced for {} after dealing {}% damage",
            weaker.name,
            (damage_percent * 100.0).round()
        );
    }

    if weaker.hp > stronger.hp {
        weaker.comeback.damage_boost *= 1.0 - REDUCTION_ON_HP_LEAD;
        weaker.comeback.damage_reduction *= 1.0 - REDUCTION_ON_HP_LEAD;
        weaker.comeback.critical_chance *= 1.0 - REDUCTION_ON_HP_LEAD;
        update_visual(weaker, weaker.comeback.damage_boost / MAX_DAMAGE_BOOST);
    }
}

fn update_visual(ball: &mut Ball, factor: f32) {
    if factor < 0.1 {
        ball.remove_effect("ComebackAura");
        return;
    }
    ball.add_effect(Effect::permanent(EffectKind::ComebackAura {
        intensity: factor,
    }));
}
