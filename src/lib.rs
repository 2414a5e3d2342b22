//! Paddle ECS - a two-paddle arcade game on a small entity-component runtime
//!
//! Core modules:
//! - `ecs`: Entity/component storage and multi-kind queries
//! - `sim`: Deterministic gameplay systems (movement, collision, scoring, power-ups, particles)
//! - `scene`: Game states, the scene contract and the concrete scenes
//! - `game`: Frame loop and scene transitions
//! - `platform`: Input snapshot consumed by the core
//! - `renderer`: Draw collaborator interface and read-only draw systems
//! - `settings`: Key bindings and gameplay configuration

pub mod ecs;
pub mod error;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;

pub use ecs::{Component, ComponentKind, Entity, World};
pub use error::{ConfigError, GameError};
pub use game::Game;
pub use settings::{Controls, GameMode, PaddleAction, Settings};

/// Game configuration constants
pub mod consts {
    /// Default screen dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 15.0;
    pub const PADDLE_HEIGHT: f32 = 100.0;
    /// Distance from the screen edge to the outer face of each paddle
    pub const PADDLE_MARGIN: f32 = 50.0;
    /// Human paddle speed (pixels/s)
    pub const PADDLE_SPEED: f32 = 400.0;
    /// AI paddle speed (pixels/s)
    pub const AI_PADDLE_SPEED: f32 = 300.0;
    /// AI ignores the ball while it is within this band around the paddle center
    pub const AI_DEAD_ZONE: f32 = 10.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 20.0;
    /// Per-axis serve speed after a reset (pixels/s)
    pub const BALL_BASE_SPEED: f32 = 300.0;
    /// Horizontal speed multiplier on every paddle hit
    pub const BALL_SPEED_UP: f32 = 1.1;
    /// Vertical speed at the very edge of a paddle
    pub const BOUNCE_FACTOR: f32 = 400.0;

    /// Shrink mode: height lost per hit and the floor it stops at
    pub const SHRINK_STEP: f32 = 5.0;
    pub const MIN_PADDLE_HEIGHT: f32 = 20.0;

    /// Timers (milliseconds)
    pub const HIT_FLASH_MS: u64 = 150;
    pub const RESET_DELAY_MS: u64 = 1000;
    pub const POWERUP_SPAWN_INTERVAL_MS: u64 = 10_000;
    pub const POWERUP_DURATION_MS: u64 = 5000;

    /// Power-up item size
    pub const POWERUP_SIZE: f32 = 30.0;
    /// Extra paddle height granted by the big-paddle power-up
    pub const BIG_PADDLE_BONUS: f32 = 50.0;

    /// Confetti burst on every point
    pub const CONFETTI_COUNT: usize = 30;
    pub const CONFETTI_MIN_SPEED: f32 = 50.0;
    pub const CONFETTI_MAX_SPEED: f32 = 200.0;
    pub const CONFETTI_MIN_LIFETIME_MS: u64 = 500;
    pub const CONFETTI_MAX_LIFETIME_MS: u64 = 1500;
    /// Drawn particle radius
    pub const PARTICLE_RADIUS: f32 = 3.0;
}
