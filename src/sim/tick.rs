//! Per-frame gameplay pipeline
//!
//! Systems run strictly in this order:
//! input -> AI -> movement -> wall bounce -> paddle hit -> power-up spawn ->
//! power-up pickup -> power-up effects -> scoring -> particles -> hit-flash decay
//!
//! Input runs from the scene's input hook, the rest from `update`. While the
//! ball is parked after a point (or the match is over) everything between
//! input and scoring is skipped.

use glam::Vec2;
use rand::Rng;

use super::collision::{ball_boundary, paddle_collision};
use super::movement::{ai_steer, integrate, player_input};
use super::particle::{decay_hit_flash, update_particles};
use super::powerup::{PowerupCollector, PowerupSpawner, apply_powerup_effects};
use super::scoring::{ScoreEvent, ScoringSystem};
use super::time::Millis;
use crate::consts::*;
use crate::ecs::World;
use crate::platform::InputState;
use crate::settings::Settings;

/// Stateful systems of one gameplay session
#[derive(Debug, Clone)]
pub struct GameplaySystems {
    pub scoring: ScoringSystem,
    pub spawner: PowerupSpawner,
    pub collector: PowerupCollector,
    screen: Vec2,
}

impl GameplaySystems {
    /// Fresh session starting at `now`
    pub fn new(screen: Vec2, settings: &Settings, now: Millis) -> Self {
        Self {
            scoring: ScoringSystem::new(screen, settings.winning_score),
            spawner: PowerupSpawner::new(now, POWERUP_SPAWN_INTERVAL_MS),
            collector: PowerupCollector::new(),
            screen,
        }
    }

    /// Input stage: human paddle velocities from held keys
    pub fn input(&mut self, world: &mut World, settings: &Settings, input: &InputState) {
        player_input(world, &settings.controls, input, PADDLE_SPEED);
    }

    /// Every stage after input
    pub fn update(
        &mut self,
        world: &mut World,
        settings: &Settings,
        now: Millis,
        dt: f32,
        rng: &mut impl Rng,
    ) -> Option<ScoreEvent> {
        if !self.scoring.is_frozen() {
            ai_steer(world, AI_PADDLE_SPEED, AI_DEAD_ZONE);
            integrate(world, dt, self.screen.y);
            ball_boundary(world, self.screen.y);
            if let Some(paddle) = paddle_collision(world, now, settings.mode) {
                self.collector.record_hit(paddle);
            }
            self.spawner
                .update(world, now, self.screen, &settings.powerup_kinds, rng);
            self.collector
                .collect(world, now, POWERUP_DURATION_MS, self.screen.y);
            apply_powerup_effects(world, now, self.screen.y);
        }

        let event = self.scoring.process(world, now, rng);
        if event.is_some() {
            self.collector.clear();
        }

        update_particles(world, now, dt, settings.particle_gravity);
        decay_hit_flash(world, now);
        event
    }
}
