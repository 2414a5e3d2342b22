//! Read-only draw systems
//!
//! Each walks a query snapshot in entity order and emits primitives. None of
//! them mutate the world.

use glam::Vec2;

use super::{Color, Renderer};
use crate::consts::PARTICLE_RADIUS;
use crate::ecs::{
    Button, ComponentKind, Dimensions, Entity, HitFlash, KeyBinding, Particle, Position, Score,
    World,
};
use crate::settings::Controls;
use crate::sim::time::Millis;

const FLASH_COLOR: Color = Color::YELLOW;
const POWERUP_COLOR: Color = Color::GREEN;
const BUTTON_COLOR: Color = Color::rgb(60, 60, 60);
const BUTTON_HOVER_COLOR: Color = Color::rgb(100, 100, 100);
const BUTTON_PRESSED_COLOR: Color = Color::rgb(140, 140, 140);
const TEXT_INSET: Vec2 = Vec2::new(10.0, 10.0);

fn boxes(world: &World, marker: ComponentKind) -> impl Iterator<Item = (Vec2, Vec2, Entity)> + '_ {
    world
        .query(&[marker, ComponentKind::Position, ComponentKind::Dimensions])
        .into_iter()
        .filter_map(move |e| {
            let pos = world.get::<Position>(e)?;
            let dims = world.get::<Dimensions>(e)?;
            Some((pos.0, dims.size(), e))
        })
}

/// Paddles, ball, power-up item and pause icon
pub fn draw_gameplay(world: &World, now: Millis, renderer: &mut dyn Renderer) {
    for marker in [ComponentKind::Paddle, ComponentKind::AiControlled] {
        for (pos, size, e) in boxes(world, marker) {
            let flashing = world.get::<HitFlash>(e).is_some_and(|f| f.is_active(now));
            let color = if flashing { FLASH_COLOR } else { Color::WHITE };
            renderer.rect(pos, size, color);
        }
    }

    for (pos, size, _) in boxes(world, ComponentKind::PowerupItem) {
        renderer.rect(pos, size, POWERUP_COLOR);
    }

    for (pos, size, _) in boxes(world, ComponentKind::Ball) {
        renderer.rect(pos, size, Color::WHITE);
    }

    // Two vertical bars
    for (pos, size, _) in boxes(world, ComponentKind::PauseButton) {
        let bar = Vec2::new(size.x * 0.25, size.y * 0.6);
        let top = pos.y + size.y * 0.2;
        renderer.rect(Vec2::new(pos.x + size.x * 0.15, top), bar, Color::GRAY);
        renderer.rect(Vec2::new(pos.x + size.x * 0.6, top), bar, Color::GRAY);
    }
}

/// Scoreboard text
pub fn draw_scores(world: &World, renderer: &mut dyn Renderer) {
    for e in world.query(&[ComponentKind::Score, ComponentKind::Position]) {
        let (Some(score), Some(pos)) = (world.get::<Score>(e), world.get::<Position>(e)) else {
            continue;
        };
        renderer.text(pos.0, &score.points.to_string(), Color::WHITE);
    }
}

pub fn draw_particles(world: &World, renderer: &mut dyn Renderer) {
    for e in world.query(&[ComponentKind::Particle, ComponentKind::Position]) {
        let (Some(particle), Some(pos)) = (world.get::<Particle>(e), world.get::<Position>(e))
        else {
            continue;
        };
        renderer.circle(pos.0, PARTICLE_RADIUS, particle.color);
    }
}

pub fn draw_buttons(world: &World, renderer: &mut dyn Renderer) {
    for (pos, size, e) in boxes(world, ComponentKind::Button) {
        let Some(button) = world.get::<Button>(e) else {
            continue;
        };
        let color = if button.pressed {
            BUTTON_PRESSED_COLOR
        } else if button.hovered {
            BUTTON_HOVER_COLOR
        } else {
            BUTTON_COLOR
        };
        renderer.rect(pos, size, color);
        renderer.text(pos + TEXT_INSET, &button.label, Color::WHITE);
    }
}

/// Key-binding rows, showing the bound key or a prompt while listening
pub fn draw_key_bindings(world: &World, controls: &Controls, renderer: &mut dyn Renderer) {
    for (pos, size, e) in boxes(world, ComponentKind::KeyBinding) {
        let Some(binding) = world.get::<KeyBinding>(e) else {
            continue;
        };
        let key = if binding.listening {
            "Press a key...".to_string()
        } else {
            controls
                .key_for(binding.player, binding.action)
                .map(|k| k.name())
                .unwrap_or_default()
        };
        let label = format!("Player {} {}: {}", binding.player, binding.action.as_str(), key);
        let color = if binding.listening {
            BUTTON_HOVER_COLOR
        } else {
            BUTTON_COLOR
        };
        renderer.rect(pos, size, color);
        renderer.text(pos + TEXT_INSET, &label, Color::WHITE);
    }
}
