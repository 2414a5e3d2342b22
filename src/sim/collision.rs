//! Collision detection and response for axis-aligned boxes
//!
//! Ball against the top/bottom walls and ball against paddles. Paddle hits
//! resolve penetration, speed the ball up and aim it by where it struck.

use glam::Vec2;

use crate::consts::*;
use crate::ecs::{ComponentKind, Dimensions, Entity, HitFlash, Position, Velocity, World};
use crate::settings::GameMode;
use crate::sim::time::Millis;

/// Axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn from_parts(pos: &Position, dims: &Dimensions) -> Self {
        Self {
            min: pos.0,
            size: dims.size(),
        }
    }

    /// Bounding box of an entity, if it has both a position and dimensions
    pub fn of(world: &World, entity: Entity) -> Option<Self> {
        let pos = world.get::<Position>(entity)?;
        let dims = world.get::<Dimensions>(entity)?;
        Some(Self::from_parts(pos, dims))
    }

    pub fn left(&self) -> f32 {
        self.min.x
    }

    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.min.y
    }

    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Interiors intersect (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Point inside or on the border
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }
}

/// Vertical speed after a paddle hit
///
/// Zero at the paddle center, `-BOUNCE_FACTOR` at its top edge and
/// `+BOUNCE_FACTOR` at its bottom edge.
pub fn bounce_vy(ball: &Rect, paddle: &Rect) -> f32 {
    let offset = (paddle.center().y - ball.center().y) / (paddle.size.y / 2.0);
    -offset * BOUNCE_FACTOR
}

/// Reflect the ball off the top and bottom of the screen
pub fn ball_boundary(world: &mut World, screen_height: f32) {
    let balls = world.query(&[
        ComponentKind::Ball,
        ComponentKind::Position,
        ComponentKind::Velocity,
        ComponentKind::Dimensions,
    ]);
    for ball in balls {
        let Some(rect) = Rect::of(world, ball) else {
            continue;
        };
        let Some(vel) = world.get_mut::<Velocity>(ball) else {
            continue;
        };
        let leaving_top = rect.top() <= 0.0 && vel.0.y < 0.0;
        let leaving_bottom = rect.top() >= screen_height - rect.size.y && vel.0.y > 0.0;
        if leaving_top || leaving_bottom {
            vel.0.y = -vel.0.y;
        }
    }
}

/// Resolve at most one ball/paddle hit this frame
///
/// Human paddles are checked before AI paddles, each in creation order, and the
/// first overlapping paddle the ball is moving toward wins. Returns the paddle
/// that was hit.
pub fn paddle_collision(world: &mut World, now: Millis, mode: GameMode) -> Option<Entity> {
    let ball = world.first(&[
        ComponentKind::Ball,
        ComponentKind::Position,
        ComponentKind::Velocity,
        ComponentKind::Dimensions,
    ])?;
    let ball_rect = Rect::of(world, ball)?;
    let mut vel = world.get::<Velocity>(ball)?.0;

    let paddles = world
        .query(&[ComponentKind::Paddle])
        .into_iter()
        .chain(world.query(&[ComponentKind::AiControlled]));

    for paddle in paddles {
        let Some(paddle_rect) = Rect::of(world, paddle) else {
            continue;
        };
        if !ball_rect.overlaps(&paddle_rect) {
            continue;
        }
        // Ignore a ball that is already receding from this paddle
        let approaching = if paddle_rect.center().x < ball_rect.center().x {
            vel.x < 0.0
        } else {
            vel.x > 0.0
        };
        if !approaching {
            continue;
        }

        let flush_x = if vel.x < 0.0 {
            paddle_rect.right()
        } else {
            paddle_rect.left() - ball_rect.size.x
        };
        vel.x *= -BALL_SPEED_UP;
        vel.y = bounce_vy(&ball_rect, &paddle_rect);

        if let Some(pos) = world.get_mut::<Position>(ball) {
            pos.0.x = flush_x;
        }
        if let Some(ball_vel) = world.get_mut::<Velocity>(ball) {
            ball_vel.0 = vel;
        }
        world.insert(
            paddle,
            HitFlash {
                activated_at: now,
                duration: HIT_FLASH_MS,
            },
        );
        if mode == GameMode::Shrink {
            if let Some(dims) = world.get_mut::<Dimensions>(paddle) {
                dims.height = (dims.height - SHRINK_STEP).max(MIN_PADDLE_HEIGHT);
            }
        }
        log::debug!("Ball hit paddle {} (vel {:?})", paddle, vel);
        return Some(paddle);
    }
    None
}

/// The ball entity, if one exists
pub fn find_ball(world: &World) -> Option<Entity> {
    world.first(&[ComponentKind::Ball])
}
