//! Paddle steering and position integration

use crate::ecs::{ComponentKind, Dimensions, Paddle, Position, Velocity, World};
use crate::platform::InputState;
use crate::settings::{Controls, PaddleAction};

/// Set human paddle velocity from the held keys
///
/// No inertia: velocity is fully determined by this frame's input. Up wins
/// when both keys are held.
pub fn player_input(world: &mut World, controls: &Controls, input: &InputState, speed: f32) {
    for entity in world.query(&[ComponentKind::Velocity, ComponentKind::Paddle]) {
        let Some(paddle) = world.get::<Paddle>(entity).copied() else {
            continue;
        };
        let held = |action: PaddleAction| {
            controls
                .key_for(paddle.player, action)
                .is_some_and(|key| input.is_pressed(key))
        };
        let vy = if held(PaddleAction::Up) {
            -speed
        } else if held(PaddleAction::Down) {
            speed
        } else {
            0.0
        };
        if let Some(vel) = world.get_mut::<Velocity>(entity) {
            vel.0.y = vy;
        }
    }
}

/// Steer AI paddles toward the ball's height
pub fn ai_steer(world: &mut World, speed: f32, dead_zone: f32) {
    let Some(ball) = world.first(&[ComponentKind::Ball, ComponentKind::Position]) else {
        return;
    };
    let Some(ball_y) = world.get::<Position>(ball).map(|pos| pos.0.y) else {
        return;
    };

    for entity in world.query(&[
        ComponentKind::Position,
        ComponentKind::Velocity,
        ComponentKind::AiControlled,
    ]) {
        let (Some(pos), Some(dims)) = (
            world.get::<Position>(entity),
            world.get::<Dimensions>(entity),
        ) else {
            continue;
        };
        let center = pos.0.y + dims.height / 2.0;
        let vy = if ball_y < center - dead_zone {
            -speed
        } else if ball_y > center + dead_zone {
            speed
        } else {
            0.0
        };
        if let Some(vel) = world.get_mut::<Velocity>(entity) {
            vel.0.y = vy;
        }
    }
}

/// Integrate every moving entity, keeping paddles on screen
pub fn integrate(world: &mut World, dt: f32, screen_height: f32) {
    for entity in world.query(&[ComponentKind::Position, ComponentKind::Velocity]) {
        let Some(vel) = world.get::<Velocity>(entity).map(|v| v.0) else {
            continue;
        };
        let is_paddle = world.has(entity, ComponentKind::Paddle)
            || world.has(entity, ComponentKind::AiControlled);
        let height = world.get::<Dimensions>(entity).map(|d| d.height);

        let Some(pos) = world.get_mut::<Position>(entity) else {
            continue;
        };
        pos.0 += vel * dt;
        if let (true, Some(height)) = (is_paddle, height) {
            pos.0.y = pos.0.y.min(screen_height - height).max(0.0);
        }
    }
}
