//! Per-tick match advancement
//!
//! The order of operations is load-bearing and fixed: arena shrink, per-ball
//! physics + effect timers + passive updates, comeback scaling, ball-ball
//! collision resolution, item spawner, field entities. A tick is atomic; no
//! subsystem observes a half-updated tick.

use rand::Rng;

use super::ability;
use super::comeback;
use super::effect;
use super::physics;
use super::state::MatchState;
use crate::consts::MAX_DELTA;

/// Advance the whole simulation by one step. `dt` is wall-clock seconds since
/// the previous tick, clamped to [`MAX_DELTA`].
pub fn tick(state: &mut MatchState, dt: f32) {
    if state.paused {
        return;
    }

    let dt = dt.min(MAX_DELTA);
    state.elapsed += dt;

    // 1. Arena shrink
    state.arena.update(dt);

    // 2. Per-ball physics, effect timers, passive updates
    {
        let [first, second] = &mut state.balls;
        physics::update_position(first, dt, &state.arena);
        physics::update_position(second, dt, &state.arena);

        effect::tick_effects(first, dt);
        effect::tick_effects(second, dt);

        ability::update_ability(first, second, dt, &mut state.rng);
        ability::update_ability(second, first, dt, &mut state.rng);
    }

    // 3. Comeback scaling for the outmatched side
    {
        let [first, second] = &mut state.balls;
        if first.power_score < second.power_score {
            comeback::update(first, second, state.elapsed, &mut state.arena);
        } else if second.power_score < first.power_score {
            comeback::update(second, first, state.elapsed, &mut state.arena);
        } else {
            state.arena.shrink_multiplier = 1.0;
        }
        comeback::update_momentum(first, dt);
        comeback::update_momentum(second, dt);
    }

    // 4. Ball-ball collision
    resolve_ball_collision(state);

    // 5. Item spawning and pickups
    state
        .spawner
        .update(dt, &mut state.balls, &mut state.arena, &mut state.rng);

    // 6. Field entities
    state.arena.update_entities(dt, &mut state.balls);
}

/// Resolve one ball-ball contact: physics damage, effect and comeback
/// modifiers, dodge rolls, reflection, then the passive collision hooks.
fn resolve_ball_collision(state: &mut MatchState) {
    let rng = &mut state.rng;
    let [first, second] = &mut state.balls;

    if !physics::check_collision(first, second) {
        return;
    }

    let damage = physics::resolve_collision(first, second);
    let mut dealt_by_first = damage.dealt_by_first;
    let mut dealt_by_second = damage.dealt_by_second;

    // Item effect modifiers: attacker's boost, defender's shield, plus the
    // Phantom damage penalty
    let first_totals = effect::totals(first);
    let second_totals = effect::totals(second);
    dealt_by_first *= (1.0 + first_totals.attack_boost)
        * (1.0 - second_totals.defense_boost)
        * first.damage_multiplier;
    dealt_by_second *= (1.0 + second_totals.attack_boost)
        * (1.0 - first_totals.defense_boost)
        * second.damage_multiplier;

    // Comeback: boost what the underdog deals, shrink what it takes
    if first.comeback.active {
        dealt_by_first = comeback::apply_damage_boost(first, dealt_by_first, rng);
        dealt_by_second = comeback::apply_damage_reduction(first, dealt_by_second);
        comeback::add_momentum_stack(first);
    }
    if second.comeback.active {
        dealt_by_second = comeback::apply_damage_boost(second, dealt_by_second, rng);
        dealt_by_first = comeback::apply_damage_reduction(second, dealt_by_first);
        comeback::add_momentum_stack(second);
    }

    if first.double_strike {
        dealt_by_first *= 2.0;
    }
    if second.double_strike {
        dealt_by_second *= 2.0;
    }

    // Dodge rolls from invisibility-style effects void the incoming hit
    let first_dodges =
        first_totals.dodge_chance > 0.0 && rng.random::<f32>() < first_totals.dodge_chance;
    let second_dodges =
        second_totals.dodge_chance > 0.0 && rng.random::<f32>() < second_totals.dodge_chance;
    let damage_to_first = if first_dodges { 0.0 } else { dealt_by_second };
    let damage_to_second = if second_dodges { 0.0 } else { dealt_by_first };

    let first_hp_before = first.hp;
    let second_hp_before = second.hp;
    first.take_damage(damage_to_first);
    second.take_damage(damage_to_second);

    // Spike armor sends a cut of the damage back
    if damage_to_first > 0.0 && first_totals.damage_reflect > 0.0 {
        second.take_damage((damage_to_first * first_totals.damage_reflect).ceil());
    }
    if damage_to_second > 0.0 && second_totals.damage_reflect > 0.0 {
        first.take_damage((damage_to_second * second_totals.damage_reflect).ceil());
    }

    // Passive hooks see the damage their ball received; a true return averts
    // death, restoring the pre-collision HP if the hook did not set its own
    if ability::collision_ability(first, second, damage_to_first, rng) && first.hp <= 0.0 {
        first.hp = first_hp_before.max(1.0);
    }
    if ability::collision_ability(second, first, damage_to_second, rng) && second.hp <= 0.0 {
        second.hp = second_hp_before.max(1.0);
    }

    // Self-correcting comeback feedback
    if first.comeback.active {
        comeback::adjust_after_damage_dealt(first, second, damage_to_second);
    }
    if second.comeback.active {
        comeback::adjust_after_damage_dealt(second, first, damage_to_first);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::MatchOutcome;
    use crate::tuning::Tuning;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn new_match(a: &str, b: &str, seed: u64) -> MatchState {
        MatchState::new(a, b, &Tuning::default(), seed)
    }

    #[test]
    fn test_pause_skips_update() {
        let mut state = new_match("Zeus", "Apollo", 3);
        state.set_paused(true);

        let positions = [state.balls[0].pos, state.balls[1].pos];
        tick(&mut state, DT);
        assert_eq!(state.elapsed, 0.0);
        assert_eq!(state.balls[0].pos, positions[0]);
        assert_eq!(state.balls[1].pos, positions[1]);

        state.set_paused(false);
        tick(&mut state, DT);
        assert!(state.elapsed > 0.0);
    }

    #[test]
    fn test_delta_clamped_against_spiral_of_death() {
        let mut state = new_match("Zeus", "Apollo", 3);
        tick(&mut state, 5.0);
        assert_eq!(state.elapsed, MAX_DELTA);
    }

    #[test]
    fn test_collision_damages_both_sides() {
        let mut state = new_match("Zeus", "Apollo", 3);
        let radius = state.balls[0].radius;

        state.balls[0].pos = Vec2::new(400.0, 300.0);
        state.balls[1].pos = Vec2::new(400.0 + radius * 1.5, 300.0);
        state.balls[0].vel = Vec2::new(15.0, 0.0);
        state.balls[1].vel = Vec2::new(-15.0, 0.0);

        let hp_before = [state.balls[0].hp, state.balls[1].hp];
        tick(&mut state, DT);

        assert!(state.balls[0].hp < hp_before[0]);
        assert!(state.balls[1].hp < hp_before[1]);
    }

    #[test]
    fn test_determinism_same_seed() {
        let mut a = new_match("Zeus", "a", 123);
        let mut b = new_match("Zeus", "a", 123);

        for _ in 0..600 {
            tick(&mut a, DT);
            tick(&mut b, DT);
        }

        assert_eq!(a.balls[0].hp, b.balls[0].hp);
        assert_eq!(a.balls[1].hp, b.balls[1].hp);
        assert_eq!(a.balls[0].pos, b.balls[0].pos);
        assert_eq!(a.spawner.active_items.len(), b.spawner.active_items.len());
    }

    #[test]
    fn test_items_spawn_during_play() {
        let mut state = new_match("Zeus", "Apollo", 9);
        // Half the spawn interval plus a little slack
        let ticks = (Tuning::default().spawn_interval / 2.0 / DT) as u32 + 5;
        let mut seen = false;
        for _ in 0..ticks {
            tick(&mut state, DT);
            seen |= !state.spawner.active_items.is_empty();
        }
        assert!(seen);
    }

    #[test]
    fn test_match_reaches_terminal_state() {
        let mut state = new_match("Zeus", "a", 7);
        state.balls[0].hp = 2.0;
        state.balls[1].hp = 2.0;

        // Force a head-on contact
        state.balls[0].pos = Vec2::new(400.0, 300.0);
        state.balls[1].pos = Vec2::new(430.0, 300.0);
        state.balls[0].vel = Vec2::new(200.0, 0.0);
        state.balls[1].vel = Vec2::new(-200.0, 0.0);

        for _ in 0..600 {
            tick(&mut state, DT);
            if state.outcome().is_over() {
                break;
            }
        }
        assert!(state.outcome().is_over());
    }

    /// Run one full match to its terminal state (or a 240-second cap)
    fn run_match(seed: u64) -> MatchOutcome {
        let mut state = new_match("Zeus", "a", seed);
        let max_ticks = (240.0 / DT) as u32;
        for _ in 0..max_ticks {
            tick(&mut state, DT);
            let outcome = state.outcome();
            if outcome.is_over() {
                return outcome;
            }
        }
        state.outcome()
    }

    /// "Zeus" carries a special-word power bonus and should statistically
    /// outperform a plain short name across many seeded matches.
    #[test]
    fn test_zeus_beats_single_letter_over_many_matches() {
        let trials = 200;
        let mut zeus_wins = 0u32;
        let mut other_wins = 0u32;

        for seed in 0..trials {
            match run_match(seed as u64) {
                MatchOutcome::Winner(0) => zeus_wins += 1,
                MatchOutcome::Winner(1) => other_wins += 1,
                _ => {}
            }
        }

        let decided = zeus_wins + other_wins;
        assert!(decided > 0, "no match reached a decision");
        let win_rate = zeus_wins as f32 / decided as f32;
        assert!(
            win_rate > 0.55,
            "Zeus won only {zeus_wins}/{decided} decided matches"
        );
    }
}
