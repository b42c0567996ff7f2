//! Collision detection and response for the two combatants
//!
//! Stateless functions over `Ball` pairs and the `Arena`. Damage is derived
//! from the along-normal relative speed scaled by mass, the attacker's attack
//! attribute, and the defender's defense attribute, with a floor of 1.

use glam::Vec2;

use super::arena::Arena;
use super::ball::Ball;
use super::effect;
use crate::consts::*;

/// Damage dealt by each side of a ball-ball collision
#[derive(Debug, Clone, Copy)]
pub struct CollisionDamage {
    pub dealt_by_first: f32,
    pub dealt_by_second: f32,
}

#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Circle-circle overlap test
pub fn check_collision(a: &Ball, b: &Ball) -> bool {
    distance(a.pos, b.pos) < a.radius + b.radius
}

/// Resolve a ball-ball collision: exchange along-normal momentum scaled by
/// restitution, depenetrate both bodies, and compute symmetric damage.
pub fn resolve_collision(a: &mut Ball, b: &mut Ball) -> CollisionDamage {
    let delta = b.pos - a.pos;
    let dist = delta.length();
    // Coincident centers have no defined normal; pick one to avoid NaN
    let normal = if dist > f32::EPSILON {
        delta / dist
    } else {
        Vec2::X
    };

    let v1n = a.vel.dot(normal);
    let v2n = b.vel.dot(normal);
    let relative_velocity = (v1n - v2n).abs();

    // 1D elastic exchange by mass along the contact normal
    let (m1, m2) = (a.mass, b.mass);
    let v1n_after = (v1n * (m1 - m2) + 2.0 * m2 * v2n) / (m1 + m2);
    let v2n_after = (v2n * (m2 - m1) + 2.0 * m1 * v1n) / (m1 + m2);

    a.vel += (v1n_after - v1n) * RESTITUTION * normal;
    b.vel += (v2n_after - v2n) * RESTITUTION * normal;

    // Push both bodies out along the normal by half the overlap
    let overlap = (a.radius + b.radius - dist) / 2.0;
    if overlap > 0.0 {
        a.pos -= overlap * normal;
        b.pos += overlap * normal;
    }

    let a_momentum = relative_velocity * m1 * (a.attributes.attack / 100.0);
    let b_momentum = relative_velocity * m2 * (b.attributes.attack / 100.0);

    let a_damage =
        a_momentum * COLLISION_DAMAGE_FACTOR * (1.0 - b.attributes.defense / 200.0);
    let b_damage =
        b_momentum * COLLISION_DAMAGE_FACTOR * (1.0 - a.attributes.defense / 200.0);

    CollisionDamage {
        dealt_by_first: a_damage.round().max(1.0),
        dealt_by_second: b_damage.round().max(1.0),
    }
}

/// Integrate a ball's position, apply friction decay, and resolve wall hits
pub fn update_position(ball: &mut Ball, dt: f32, arena: &Arena) {
    let totals = effect::totals(ball);
    let speed_attr = ball.attributes.speed * (1.0 + totals.speed_boost);

    ball.pos += ball.vel * (speed_attr / 100.0) * dt;

    // Friction decays velocity each tick; oil slicks scale the decay down
    let decay = 1.0 - FRICTION * ball.friction_multiplier;
    ball.vel *= decay;

    if ball.vel.x.abs() < MIN_VELOCITY {
        ball.vel.x = 0.0;
    }
    if ball.vel.y.abs() < MIN_VELOCITY {
        ball.vel.y = 0.0;
    }

    resolve_wall_collision(ball, arena, totals.bounce_multiplier);
}

/// Reflect the offending axis velocity and clamp position inside the arena.
/// Skipped entirely while the ball is phase-shifted.
pub fn resolve_wall_collision(ball: &mut Ball, arena: &Arena, bounce_multiplier: f32) {
    if ball.phase_shift {
        return;
    }

    let bounce = RESTITUTION * bounce_multiplier;
    let (left, right) = (arena.left(), arena.right());
    let (top, bottom) = (arena.top(), arena.bottom());

    if ball.pos.x - ball.radius < left {
        ball.pos.x = left + ball.radius;
        ball.vel.x = -ball.vel.x * bounce;
    } else if ball.pos.x + ball.radius > right {
        ball.pos.x = right - ball.radius;
        ball.vel.x = -ball.vel.x * bounce;
    }

    if ball.pos.y - ball.radius < top {
        ball.pos.y = top + ball.radius;
        ball.vel.y = -ball.vel.y * bounce;
    } else if ball.pos.y + ball.radius > bottom {
        ball.pos.y = bottom - ball.radius;
        ball.vel.y = -ball.vel.y * bounce;
    }
}

/// Apply an instantaneous impulse, scaled by mass
pub fn apply_impulse(ball: &mut Ball, impulse: Vec2) {
    ball.vel += impulse / ball.mass;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn test_ball(name: &str, x: f32, y: f32) -> Ball {
        let mut rng = Pcg32::seed_from_u64(7);
        Ball::from_name(name, x, y, &mut rng)
    }

    #[test]
    fn test_check_collision() {
        let a = test_ball("alpha", 100.0, 100.0);
        let mut b = test_ball("beta", 200.0, 100.0);
        assert!(!check_collision(&a, &b));

        b.pos.x = 130.0;
        assert!(check_collision(&a, &b));
    }

    #[test]
    fn test_collision_conserves_normal_momentum() {
        let mut a = test_ball("alpha", 100.0, 100.0);
        let mut b = test_ball("beta", 135.0, 100.0);
        a.vel = Vec2::new(120.0, 0.0);
        b.vel = Vec2::new(-80.0, 0.0);

        let before = a.mass * a.vel.x + b.mass * b.vel.x;
        resolve_collision(&mut a, &mut b);
        let after = a.mass * a.vel.x + b.mass * b.vel.x;

        assert!((before - after).abs() < 0.01);
    }

    #[test]
    fn test_collision_damage_floor() {
        // Near-zero relative velocity still deals at least 1 to each side
        let mut a = test_ball("alpha", 100.0, 100.0);
        let mut b = test_ball("beta", 135.0, 100.0);
        let damage = resolve_collision(&mut a, &mut b);
        assert!(damage.dealt_by_first >= 1.0);
        assert!(damage.dealt_by_second >= 1.0);
    }

    #[test]
    fn test_collision_depenetrates() {
        let mut a = test_ball("alpha", 100.0, 100.0);
        let mut b = test_ball("beta", 110.0, 100.0);
        resolve_collision(&mut a, &mut b);
        let dist = distance(a.pos, b.pos);
        assert!(dist >= a.radius + b.radius - 0.01);
    }

    #[test]
    fn test_coincident_centers_produce_no_nan() {
        let mut a = test_ball("alpha", 100.0, 100.0);
        let mut b = test_ball("beta", 100.0, 100.0);
        let damage = resolve_collision(&mut a, &mut b);
        assert!(a.pos.x.is_finite() && b.pos.x.is_finite());
        assert!(damage.dealt_by_first.is_finite());
    }

    #[test]
    fn test_wall_reflection_and_clamp() {
        let arena = Arena::new(&Tuning::default());
        let mut ball = test_ball("alpha", 5.0, 300.0);
        ball.vel = Vec2::new(-100.0, 0.0);

        resolve_wall_collision(&mut ball, &arena, 1.0);
        assert_eq!(ball.pos.x, arena.left() + ball.radius);
        assert!(ball.vel.x > 0.0);
        assert!((ball.vel.x - 100.0 * RESTITUTION).abs() < 0.001);
    }

    #[test]
    fn test_phase_shift_skips_walls() {
        let arena = Arena::new(&Tuning::default());
        let mut ball = test_ball("alpha", -50.0, 300.0);
        ball.vel = Vec2::new(-100.0, 0.0);
        ball.phase_shift = true;

        resolve_wall_collision(&mut ball, &arena, 1.0);
        assert_eq!(ball.pos.x, -50.0);
        assert_eq!(ball.vel.x, -100.0);
    }

    #[test]
    fn test_apply_impulse_scales_by_mass() {
        let mut ball = test_ball("alpha", 100.0, 100.0);
        let mass = ball.mass;
        apply_impulse(&mut ball, Vec2::new(mass * 10.0, 0.0));
        assert!((ball.vel.x - 10.0).abs() < 0.001);
    }
}
