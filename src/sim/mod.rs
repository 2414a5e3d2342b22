//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Game time comes from the frame-advanced `Clock`
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod movement;
pub mod particle;
pub mod powerup;
pub mod scoring;
pub mod tick;
pub mod time;

pub use collision::{Rect, ball_boundary, bounce_vy, paddle_collision};
pub use movement::{ai_steer, integrate, player_input};
pub use particle::{decay_hit_flash, spawn_confetti, update_particles};
pub use powerup::{PowerupCollector, PowerupSpawner, apply_powerup_effects, grant};
pub use scoring::{ScoreEvent, ScoringPhase, ScoringSystem};
pub use tick::GameplaySystems;
pub use time::{Clock, Deadline, Millis};
