//! Confetti particles and hit-flash decay

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::consts::*;
use crate::ecs::{ComponentKind, Entity, HitFlash, Particle, Position, World};
use crate::renderer::Color;
use crate::sim::time::Millis;

/// Colours a confetti particle is picked from
pub const CONFETTI_COLORS: [Color; 4] = [
    Color::PINK,
    Color::LIGHT_BLUE,
    Color::YELLOW,
    Color::LIGHT_GREEN,
];

/// Burst of confetti at `origin`
pub fn spawn_confetti(world: &mut World, origin: Vec2, now: Millis, rng: &mut impl Rng) -> Vec<Entity> {
    (0..CONFETTI_COUNT)
        .map(|_| {
            let angle = rng.random_range(0.0..TAU);
            let speed = rng.random_range(CONFETTI_MIN_SPEED..=CONFETTI_MAX_SPEED);
            let lifetime = rng.random_range(CONFETTI_MIN_LIFETIME_MS..=CONFETTI_MAX_LIFETIME_MS);
            let color = CONFETTI_COLORS[rng.random_range(0..CONFETTI_COLORS.len())];

            let e = world.spawn();
            world.insert(e, Position(origin));
            world.insert(
                e,
                Particle {
                    born_at: now,
                    lifetime,
                    velocity: Vec2::from_angle(angle) * speed,
                    color,
                },
            );
            e
        })
        .collect()
}

/// Expire old particles and move the rest
///
/// `gravity` is added to each particle's vertical velocity every second.
pub fn update_particles(world: &mut World, now: Millis, dt: f32, gravity: f32) {
    for e in world.query(&[ComponentKind::Particle, ComponentKind::Position]) {
        let Some(particle) = world.get_mut::<Particle>(e) else {
            continue;
        };
        if particle.window().has_lapsed(now) {
            world.despawn(e);
            continue;
        }
        let step = particle.velocity * dt;
        particle.velocity.y += gravity * dt;
        if let Some(pos) = world.get_mut::<Position>(e) {
            pos.0 += step;
        }
    }
}

/// Drop hit flashes whose window has passed
pub fn decay_hit_flash(world: &mut World, now: Millis) {
    for e in world.query(&[ComponentKind::HitFlash]) {
        let lapsed = world
            .get::<HitFlash>(e)
            .is_some_and(|flash| flash.window().has_lapsed(now));
        if lapsed {
            world.remove::<HitFlash>(e);
        }
    }
}
