//! Passive abilities - five rarity tiers, five abilities each
//!
//! The ability index for a name+tier pair is `simple_hash(name) % 5`, so the
//! same matchup always replays with the same passives. Abilities are tagged
//! variants dispatched through the hook functions below; every instance owns
//! its own [`AbilityState`], so two balls can never share mutable state even
//! when they roll the same ability.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::effect::{Effect, EffectKind};
use super::name::{Tier, simple_hash};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityKind {
    // Common
    Regenerator,
    Sturdy,
    Rapid,
    Focused,
    Balanced,
    // Uncommon
    Vampiric,
    Momentum,
    Adaptive,
    Reflector,
    Opportunist,
    // Rare
    GlassCannon,
    Tank,
    SwiftStriker,
    Berserker,
    Energizer,
    // Epic
    Phoenix,
    Graviton,
    Unstable,
    Chameleon,
    Disruptor,
    // Legendary
    Avatar,
    Equalizer,
    Nemesis,
    Catalyst,
    Phantom,
}

/// Ability pool per tier, in roll order
pub fn tier_list(tier: Tier) -> &'static [AbilityKind; 5] {
    use AbilityKind::*;
    match tier {
        Tier::Common => &[Regenerator, Sturdy, Rapid, Focused, Balanced],
        Tier::Uncommon => &[Vampiric, Momentum, Adaptive, Reflector, Opportunist],
        Tier::Rare => &[GlassCannon, Tank, SwiftStriker, Berserker, Energizer],
        Tier::Epic => &[Phoenix, Graviton, Unstable, Chameleon, Disruptor],
        Tier::Legendary => &[Avatar, Equalizer, Nemesis, Catalyst, Phantom],
    }
}

impl AbilityKind {
    pub fn name(&self) -> &'static str {
        match self {
            AbilityKind::Regenerator => "Regenerator",
            AbilityKind::Sturdy => "Sturdy",
            AbilityKind::Rapid => "Rapid",
            AbilityKind::Focused => "Focused",
            AbilityKind::Balanced => "Balanced",
            AbilityKind::Vampiric => "Vampiric",
            AbilityKind::Momentum => "Momentum",
            AbilityKind::Adaptive => "Adaptive",
            AbilityKind::Reflector => "Reflector",
            AbilityKind::Opportunist => "Opportunist",
            AbilityKind::GlassCannon => "Glass Cannon",
            AbilityKind::Tank => "Tank",
            AbilityKind::SwiftStriker => "Swift Striker",
            AbilityKind::Berserker => "Berserker",
            AbilityKind::Energizer => "Energizer",
            AbilityKind::Phoenix => "Phoenix",
            AbilityKind::Graviton => "Graviton",
            AbilityKind::Unstable => "Unstable",
            AbilityKind::Chameleon => "Chameleon",
            AbilityKind::Disruptor => "Disruptor",
            AbilityKind::Avatar => "Avatar",
            AbilityKind::Equalizer => "Equalizer",
            AbilityKind::Nemesis => "Nemesis",
            AbilityKind::Catalyst => "Catalyst",
            AbilityKind::Phantom => "Phantom",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AbilityKind::Regenerator => "Recovers 1% HP every 5 seconds, but attack is 5% lower",
            AbilityKind::Sturdy => "Defense +10%, but speed -5%",
            AbilityKind::Rapid => "Speed +10%, but max HP -5%",
            AbilityKind::Focused => "Damage +10%, but defense -5%",
            AbilityKind::Balanced => "All attributes +3%",
            AbilityKind::Vampiric => "Absorbs 5% of collision damage as HP, but base speed is 5% lower",
            AbilityKind::Momentum => "Damage rises up to +20% with distance travelled before impact, but starts 5% lower",
            AbilityKind::Adaptive => "Each hit taken grants +2% defense (max 5 stacks) at the cost of 1% speed",
            AbilityKind::Reflector => "Reflects 10% of damage taken back at the attacker, but max HP is 10% lower",
            AbilityKind::Opportunist => "Deals +15% bonus damage to targets below 40% HP",
            AbilityKind::GlassCannon => "Damage +20%, but defense -15%",
            AbilityKind::Tank => "Max HP +25%, but speed -15%",
            AbilityKind::SwiftStriker => "Speed +20%, but max HP -15%",
            AbilityKind::Berserker => "Below 30% HP: attack +25%, defense -15%",
            AbilityKind::Energizer => "Item boosts last 30% longer, but their effect is 10% weaker",
            AbilityKind::Phoenix => "Once per match, revives with 25% HP when health reaches 0",
            AbilityKind::Graviton => "Emits a weak gravity field that pulls the opponent in, but speed -10%",
            AbilityKind::Unstable => "Explodes every 20 seconds, dealing area damage but also losing 5% HP",
            AbilityKind::Chameleon => "Swaps to a random Uncommon passive every 15 seconds",
            AbilityKind::Disruptor => "Weakens opponent buffs by 15% within a surrounding radius",
            AbilityKind::Avatar => "Carries 3 random Common passives at once, with no penalties",
            AbilityKind::Equalizer => "Matches the opponent's attributes plus a 5% bonus on every stat",
            AbilityKind::Nemesis => "Damage +30% against the last ball that hurt it, but -10% against others",
            AbilityKind::Catalyst => "Items are 25% stronger, but last 20% shorter",
            AbilityKind::Phantom => "10% chance to dodge damage entirely, but deals 10% less damage",
        }
    }
}

/// Per-instance mutable ability state, isolated per ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityState {
    pub heal_timer: f32,
    pub distance_traveled: f32,
    pub last_position: Option<Vec2>,
    pub adaptive_stacks: u32,
    pub berserker_active: bool,
    pub berserker_attack_delta: f32,
    pub berserker_defense_delta: f32,
    pub phoenix_ready: bool,
    pub unstable_timer: f32,
    pub chameleon_timer: f32,
    pub chameleon_current: Option<Box<AbilityInstance>>,
    pub avatar_passives: Vec<AbilityInstance>,
    pub equalizer_base: Option<super::name::Attributes>,
    pub nemesis_target: Option<String>,
}

impl Default for AbilityState {
    fn default() -> Self {
        Self {
            heal_timer: 0.0,
            distance_traveled: 0.0,
            last_position: None,
            adaptive_stacks: 0,
            berserker_active: false,
            berserker_attack_delta: 0.0,
            berserker_defense_delta: 0.0,
            phoenix_ready: true,
            unstable_timer: 0.0,
            chameleon_timer: 0.0,
            chameleon_current: None,
            avatar_passives: Vec::new(),
            equalizer_base: None,
            nemesis_target: None,
        }
    }
}

/// One ability bound to one ball for the match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityInstance {
    pub kind: AbilityKind,
    pub tier: Tier,
    pub state: AbilityState,
}

impl AbilityInstance {
    /// Deterministic selection: the same name+tier always picks the same ability
    pub fn select(name: &str, tier: Tier) -> Self {
        let list = tier_list(tier);
        let index = simple_hash(name) as usize % list.len();
        Self {
            kind: list[index],
            tier,
            state: AbilityState::default(),
        }
    }

    fn with_kind(kind: AbilityKind, tier: Tier) -> Self {
        Self {
            kind,
            tier,
            state: AbilityState::default(),
        }
    }

    /// One-time stat trade-offs and state setup, applied at match start
    pub fn on_init(&mut self, ball: &mut Ball, rng: &mut impl Rng) {
        let attrs = &mut ball.attributes;
        match self.kind {
            AbilityKind::Regenerator => {
                attrs.attack = (attrs.attack - 5.0).max(5.0);
            }
            AbilityKind::Sturdy => {
                attrs.defense += 10.0;
                attrs.speed = (attrs.speed - 5.0).max(5.0);
            }
            AbilityKind::Rapid => {
                attrs.speed += 10.0;
                ball.max_hp *= 0.95;
                ball.hp = ball.hp.min(ball.max_hp);
            }
            AbilityKind::Focused => {
                attrs.attack += 10.0;
                attrs.defense = (attrs.defense - 5.0).max(5.0);
            }
            AbilityKind::Balanced => {
                attrs.hp += 3.0;
                attrs.attack += 3.0;
                attrs.defense += 3.0;
                attrs.speed += 3.0;
            }
            AbilityKind::Vampiric => {
                attrs.speed = (attrs.speed - 5.0).max(5.0);
            }
            AbilityKind::Momentum => {
                attrs.attack = (attrs.attack - 5.0).max(5.0);
                self.state.last_position = Some(ball.pos);
            }
            AbilityKind::Adaptive | AbilityKind::Opportunist | AbilityKind::Disruptor => {}
            AbilityKind::Reflector => {
                ball.max_hp *= 0.9;
                ball.hp = ball.hp.min(ball.max_hp);
            }
            AbilityKind::GlassCannon => {
                attrs.attack += 20.0;
                attrs.defense = (attrs.defense - 15.0).max(5.0);
            }
            AbilityKind::Tank => {
                ball.max_hp *= 1.25;
                ball.hp *= 1.25;
                attrs.speed = (attrs.speed - 15.0).max(5.0);
            }
            AbilityKind::SwiftStriker => {
                attrs.speed += 20.0;
                ball.max_hp *= 0.85;
                ball.hp = ball.hp.min(ball.max_hp);
            }
            AbilityKind::Berserker => {
                self.state.berserker_active = false;
            }
            AbilityKind::Energizer => {
                ball.item_duration_multiplier = 1.3;
                ball.item_effect_multiplier = 0.9;
            }
            AbilityKind::Phoenix => {
                self.state.phoenix_ready = true;
            }
            AbilityKind::Graviton => {
                attrs.speed = (attrs.speed - 10.0).max(5.0);
            }
            AbilityKind::Unstable => {
                self.state.unstable_timer = 0.0;
            }
            AbilityKind::Chameleon => {
                self.switch_chameleon(ball, rng);
            }
            AbilityKind::Avatar => {
                // Three distinct Common passives, penalties stripped
                let mut pool: Vec<AbilityKind> = tier_list(Tier::Common).to_vec();
                for _ in 0..3 {
                    let index = rng.random_range(0..pool.len());
                    let picked = pool.swap_remove(index);
                    avatar_bonus_init(picked, ball);
                    self.state
                        .avatar_passives
                        .push(AbilityInstance::with_kind(picked, Tier::Common));
                }
                ball.add_effect(Effect::permanent(EffectKind::AvatarAura));
            }
            AbilityKind::Equalizer => {
                self.state.equalizer_base = Some(ball.attributes);
            }
            AbilityKind::Nemesis => {
                self.state.nemesis_target = None;
            }
            AbilityKind::Catalyst => {
                ball.item_effect_multiplier = 1.25;
                ball.item_duration_multiplier = 0.8;
            }
            AbilityKind::Phantom => {
                ball.damage_multiplier = 0.9;
            }
        }
    }

    /// Per-tick behavior: regeneration, auras, timed explosions, passive swaps
    pub fn on_update(&mut self, ball: &mut Ball, opponent: &mut Ball, dt: f32, rng: &mut impl Rng) {
        match self.kind {
            AbilityKind::Regenerator => {
                self.state.heal_timer += dt;
                if self.state.heal_timer >= 5.0 {
                    self.state.heal_timer = 0.0;
                    ball.heal((ball.max_hp * 0.01).ceil());
                }
            }
            AbilityKind::Momentum => {
                let last = self.state.last_position.unwrap_or(ball.pos);
                let moved = (ball.pos - last).length();
                self.state.distance_traveled =
                    (self.state.distance_traveled + moved).min(300.0);
                self.state.last_position = Some(ball.pos);
            }
            AbilityKind::Berserker => {
                let fraction = ball.hp_fraction();
                if fraction < 0.3 && !self.state.berserker_active {
                    self.state.berserker_active = true;
                    let defense_delta = ball.attributes.defense
                        - (ball.attributes.defense - 15.0).max(5.0);
                    self.state.berserker_attack_delta = 25.0;
                    self.state.berserker_defense_delta = defense_delta;
                    ball.attributes.attack += 25.0;
                    ball.attributes.defense -= defense_delta;
                    ball.add_effect(Effect::permanent(EffectKind::BerserkerRage));
                } else if fraction >= 0.3 && self.state.berserker_active {
                    self.state.berserker_active = false;
                    ball.attributes.attack -= self.state.berserker_attack_delta;
                    ball.attributes.defense += self.state.berserker_defense_delta;
                    ball.remove_effect("BerserkerRage");
                }
            }
            AbilityKind::Graviton => {
                let radius = ball.radius * 8.0;
                let delta = ball.pos - opponent.pos;
                let dist = delta.length();
                if dist > 0.0 && dist < radius {
                    // Pull weakens linearly with distance
                    let force = (1.0 - dist / radius) * 50.0 * dt;
                    opponent.vel += (delta / dist) * force;
                }
                if !ball.has_effect("GravitonAura") {
                    ball.add_effect(Effect::permanent(EffectKind::GravitonAura));
                }
            }
            AbilityKind::Unstable => {
                self.state.unstable_timer += dt;
                if self.state.unstable_timer >= 20.0 {
                    self.state.unstable_timer = 0.0;
                    ball.take_damage((ball.max_hp * 0.05).ceil());

                    let radius = ball.radius * 5.0;
                    let delta = ball.pos - opponent.pos;
                    let dist = delta.length();
                    if dist < radius {
                        let falloff = 1.0 - dist / radius;
                        opponent.take_damage((10.0 * falloff).ceil());
                        if dist > 0.0 {
                            let away = (opponent.pos - ball.pos) / dist;
                            opponent.vel += away * 200.0 * falloff;
                        }
                    }
                    ball.add_effect(Effect::new(EffectKind::UnstableExplosion, 1.0));
                }
                if self.state.unstable_timer >= 15.0 && !ball.has_effect("UnstableWarning") {
                    ball.add_effect(Effect::new(EffectKind::UnstableWarning, 5.0));
                }
            }
            AbilityKind::Chameleon => {
                self.state.chameleon_timer += dt;
                if self.state.chameleon_timer >= 15.0 {
                    self.state.chameleon_timer = 0.0;
                    self.switch_chameleon(ball, rng);
                }
            }
            AbilityKind::Disruptor => {
                let radius = ball.radius * 7.0;
                if physics_distance(ball, opponent) < radius
                    && !opponent.has_effect("Disrupted")
                {
                    opponent.add_effect(Effect::new(
                        EffectKind::Disrupted { factor: 0.15 },
                        1.0,
                    ));
                }
                if !ball.has_effect("DisruptorField") {
                    ball.add_effect(Effect::permanent(EffectKind::DisruptorField));
                }
            }
            AbilityKind::Avatar => {
                for sub in self.state.avatar_passives.iter_mut() {
                    sub.on_update(ball, opponent, dt, rng);
                }
            }
            AbilityKind::Equalizer => {
                if let Some(base) = self.state.equalizer_base {
                    // Never worse than the opponent plus 5%, never worse than our own base
                    ball.attributes.hp = base.hp.max(opponent.attributes.hp * 1.05);
                    ball.attributes.attack = base.attack.max(opponent.attributes.attack * 1.05);
                    ball.attributes.defense =
                        base.defense.max(opponent.attributes.defense * 1.05);
                    ball.attributes.speed = base.speed.max(opponent.attributes.speed * 1.05);
                }
                if !ball.has_effect("EqualizerAura") {
                    ball.add_effect(Effect::permanent(EffectKind::EqualizerAura));
                }
            }
            _ => {}
        }
    }

    /// Collision reaction. `damage` is what this ball just received; returning
    /// `true` signals damage prevented / death averted.
    pub fn on_collision(
        &mut self,
        ball: &mut Ball,
        opponent: &mut Ball,
        damage: f32,
        rng: &mut impl Rng,
    ) -> bool {
        match self.kind {
            AbilityKind::Vampiric => {
                if damage > 0.0 {
                    ball.heal((damage * 0.05).ceil());
                    ball.add_effect(Effect::new(EffectKind::LifeSteal, 0.5));
                }
                false
            }
            AbilityKind::Momentum => {
                let bonus_percent = (self.state.distance_traveled / 15.0).min(20.0);
                let bonus = (damage * bonus_percent / 100.0).ceil();
                if bonus > 0.0 {
                    opponent.take_damage(bonus);
                }
                self.state.distance_traveled = 0.0;
                false
            }
            AbilityKind::Adaptive => {
                if damage > 0.0 && self.state.adaptive_stacks < 5 {
                    self.state.adaptive_stacks += 1;
                    ball.attributes.defense += 2.0;
                    ball.attributes.speed = (ball.attributes.speed - 1.0).max(5.0);
                    ball.add_effect(Effect::new(EffectKind::AdaptiveShield, 1.0));
                }
                false
            }
            AbilityKind::Reflector => {
                if damage > 0.0 {
                    opponent.take_damage((damage * 0.1).ceil());
                    ball.add_effect(Effect::new(EffectKind::DamageReflection, 0.5));
                }
                false
            }
            AbilityKind::Opportunist => {
                if opponent.hp_fraction() < 0.4 {
                    opponent.take_damage((damage * 0.15).ceil());
                    ball.add_effect(Effect::new(EffectKind::OpportunistStrike, 0.5));
                }
                false
            }
            AbilityKind::Phoenix => {
                if ball.hp <= 0.0 && self.state.phoenix_ready {
                    ball.hp = (ball.max_hp * 0.25).ceil();
                    self.state.phoenix_ready = false;
                    ball.add_effect(Effect::new(EffectKind::PhoenixRebirth, 2.0));
                    return true;
                }
                false
            }
            AbilityKind::Chameleon => {
                if let Some(sub) = self.state.chameleon_current.as_mut() {
                    sub.on_collision(ball, opponent, damage, rng)
                } else {
                    false
                }
            }
            AbilityKind::Avatar => {
                let mut prevented = false;
                for sub in self.state.avatar_passives.iter_mut() {
                    prevented |= sub.on_collision(ball, opponent, damage, rng);
                }
                prevented
            }
            AbilityKind::Nemesis => {
                if damage > 0.0 {
                    self.state.nemesis_target = Some(opponent.name.clone());
                    ball.add_effect(Effect::new(EffectKind::NemesisTargeting, 2.0));
                }
                if self.state.nemesis_target.as_deref() == Some(opponent.name.as_str()) {
                    opponent.take_damage((damage * 0.3).ceil());
                    ball.add_effect(Effect::new(EffectKind::NemesisStrike, 0.5));
                } else {
                    // Negative damage heals the target; kept as the documented quirk
                    let penalty = -(damage * 0.1).floor();
                    if penalty < 0.0 {
                        opponent.take_damage(penalty);
                    }
                }
                false
            }
            AbilityKind::Phantom => {
                if damage > 0.0 && rng.random::<f32>() < 0.1 {
                    ball.add_effect(Effect::new(EffectKind::PhantomDodge, 1.0));
                    return true;
                }
                false
            }
            _ => false,
        }
    }

    /// Roll a fresh Uncommon sub-ability. The previous sub's stat changes are
    /// not reverted, matching the original behavior.
    fn switch_chameleon(&mut self, ball: &mut Ball, rng: &mut impl Rng) {
        let pool = tier_list(Tier::Uncommon);
        let index = rng.random_range(0..pool.len());
        let mut sub = AbilityInstance::with_kind(pool[index], Tier::Uncommon);
        sub.on_init(ball, rng);
        self.state.chameleon_current = Some(Box::new(sub));
        ball.add_effect(Effect::new(EffectKind::ChameleonShift, 2.0));
    }
}

/// Bonus-only version of a Common passive's init, used by Avatar
fn avatar_bonus_init(kind: AbilityKind, ball: &mut Ball) {
    match kind {
        AbilityKind::Regenerator => {} // keeps its regen tick, loses the attack penalty
        AbilityKind::Sturdy => ball.attributes.defense += 10.0,
        AbilityKind::Rapid => ball.attributes.speed += 10.0,
        AbilityKind::Focused => ball.attributes.attack += 10.0,
        AbilityKind::Balanced => {
            ball.attributes.hp += 3.0;
            ball.attributes.attack += 3.0;
            ball.attributes.defense += 3.0;
            ball.attributes.speed += 3.0;
        }
        _ => {}
    }
}

fn physics_distance(a: &Ball, b: &Ball) -> f32 {
    (b.pos - a.pos).length()
}

/// Run a ball's passive init hook (called once at match setup)
pub fn init_ability(ball: &mut Ball, rng: &mut impl Rng) {
    let mut ability = ball.ability.clone();
    ability.on_init(ball, rng);
    log::info!(
        "Applied passive {} ({}) to {}",
        ability.kind.name(),
        ability.tier.as_str(),
        ball.name
    );
    ball.ability = ability;
}

/// Run a ball's passive update hook for one tick
pub fn update_ability(ball: &mut Ball, opponent: &mut Ball, dt: f32, rng: &mut impl Rng) {
    let mut ability = ball.ability.clone();
    ability.on_update(ball, opponent, dt, rng);
    ball.ability = ability;
}

/// Run a ball's passive collision hook; true means the hit was averted
pub fn collision_ability(
    ball: &mut Ball,
    opponent: &mut Ball,
    damage: f32,
    rng: &mut impl Rng,
) -> bool {
    let mut ability = ball.ability.clone();
    let prevented = ability.on_collision(ball, opponent, damage, rng);
    ball.ability = ability;
    prevented
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(99)
    }

    fn ball_with(kind: AbilityKind, tier: Tier) -> Ball {
        let mut ball = Ball::from_name("tester", 100.0, 100.0, &mut rng());
        ball.ability = AbilityInstance::with_kind(kind, tier);
        ball
    }

    #[test]
    fn test_selection_is_deterministic() {
        let a = AbilityInstance::select("Zeus", Tier::Rare);
        let b = AbilityInstance::select("Zeus", Tier::Rare);
        assert_eq!(a.kind, b.kind);

        // Known index: hash("Zeus") % 5 == 3
        assert_eq!(a.kind, AbilityKind::Berserker);
        assert_eq!(
            AbilityInstance::select("Zeus", Tier::Common).kind,
            AbilityKind::Focused
        );
    }

    #[test]
    fn test_sturdy_trade_off() {
        let mut ball = ball_with(AbilityKind::Sturdy, Tier::Common);
        let before = ball.attributes;
        init_ability(&mut ball, &mut rng());
        assert_eq!(ball.attributes.defense, before.defense + 10.0);
        assert_eq!(ball.attributes.speed, before.speed - 5.0);
    }

    #[test]
    fn test_regenerator_heals_on_interval() {
        let mut ball = ball_with(AbilityKind::Regenerator, Tier::Common);
        let mut opponent = Ball::from_name("other", 400.0, 100.0, &mut rng());
        init_ability(&mut ball, &mut rng());
        ball.hp = 10.0;

        // 4.9 seconds: no heal yet
        for _ in 0..49 {
            update_ability(&mut ball, &mut opponent, 0.1, &mut rng());
        }
        assert_eq!(ball.hp, 10.0);

        update_ability(&mut ball, &mut opponent, 0.1, &mut rng());
        assert!(ball.hp > 10.0);
    }

    #[test]
    fn test_phoenix_averts_death_once() {
        let mut ball = ball_with(AbilityKind::Phoenix, Tier::Epic);
        let mut opponent = Ball::from_name("other", 400.0, 100.0, &mut rng());
        init_ability(&mut ball, &mut rng());

        ball.hp = -5.0;
        let prevented = collision_ability(&mut ball, &mut opponent, 40.0, &mut rng());
        assert!(prevented);
        assert_eq!(ball.hp, (ball.max_hp * 0.25).ceil());

        // Second death is final
        ball.hp = -5.0;
        let prevented = collision_ability(&mut ball, &mut opponent, 40.0, &mut rng());
        assert!(!prevented);
    }

    #[test]
    fn test_berserker_toggles_below_threshold() {
        let mut ball = ball_with(AbilityKind::Berserker, Tier::Rare);
        let mut opponent = Ball::from_name("other", 400.0, 100.0, &mut rng());
        init_ability(&mut ball, &mut rng());
        let base_attack = ball.attributes.attack;

        ball.hp = ball.max_hp * 0.2;
        update_ability(&mut ball, &mut opponent, 0.016, &mut rng());
        assert_eq!(ball.attributes.attack, base_attack + 25.0);
        assert!(ball.has_effect("BerserkerRage"));

        ball.hp = ball.max_hp;
        update_ability(&mut ball, &mut opponent, 0.016, &mut rng());
        assert_eq!(ball.attributes.attack, base_attack);
        assert!(!ball.has_effect("BerserkerRage"));
    }

    #[test]
    fn test_avatar_has_three_distinct_commons() {
        let mut ball = ball_with(AbilityKind::Avatar, Tier::Legendary);
        init_ability(&mut ball, &mut rng());

        let subs = &ball.ability.state.avatar_passives;
        assert_eq!(subs.len(), 3);
        let mut names: Vec<_> = subs.iter().map(|s| s.kind.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 3);
        assert!(ball.has_effect("AvatarAura"));
    }

    #[test]
    fn test_graviton_pulls_opponent() {
        let mut ball = ball_with(AbilityKind::Graviton, Tier::Epic);
        let mut opponent = Ball::from_name("other", 180.0, 100.0, &mut rng());
        init_ability(&mut ball, &mut rng());
        opponent.vel = Vec2::ZERO;

        update_ability(&mut ball, &mut opponent, 0.1, &mut rng());
        // Ball sits to the opponent's left; pull is in -x
        assert!(opponent.vel.x < 0.0);
    }

    #[test]
    fn test_nemesis_marks_attacker_and_strikes_back() {
        let mut ball = ball_with(AbilityKind::Nemesis, Tier::Legendary);
        let mut opponent = Ball::from_name("other", 400.0, 100.0, &mut rng());
        init_ability(&mut ball, &mut rng());

        let opponent_hp = opponent.hp;
        collision_ability(&mut ball, &mut opponent, 40.0, &mut rng());
        assert_eq!(ball.ability.state.nemesis_target.as_deref(), Some("other"));
        // 40 * 0.3 = 12 bonus damage against the marked nemesis
        assert_eq!(opponent.hp, opponent_hp - 12.0);
        assert!(ball.has_effect("NemesisStrike"));
    }
}
