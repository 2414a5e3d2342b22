//! Entity-component store
//!
//! The store knows nothing about gameplay: it hands out entity IDs, keeps at
//! most one component per kind on every entity, and answers "which entities
//! carry all of these kinds" by intersecting per-kind indices.
//!
//! Query results are snapshots ordered by entity ID (creation order), so
//! systems may freely add or remove entities while walking them.

pub mod component;
pub mod world;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use component::{
    ActivePowerup, AiControlled, Ball, Button, ButtonAction, Component, ComponentData,
    ComponentKind, Dimensions, HitFlash, KeyBinding, Paddle, Particle, PauseButton, Position,
    PowerupItem, PowerupKind, Score, Velocity,
};
pub use world::World;

/// Opaque entity identifier, allocated in increasing order and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Entity(u32);

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}
