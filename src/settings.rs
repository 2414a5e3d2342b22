//! Game settings and key bindings
//!
//! Stored as JSON. Missing fields fall back to their defaults, so older files
//! keep loading.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::ecs::PowerupKind;
use crate::error::ConfigError;
use crate::platform::Key;

/// Paddle movement action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaddleAction {
    Up,
    Down,
}

impl PaddleAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaddleAction::Up => "up",
            PaddleAction::Down => "down",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" => Some(PaddleAction::Up),
            "down" => Some(PaddleAction::Down),
            _ => None,
        }
    }
}

/// Rule variant applied to the playing states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    #[default]
    Classic,
    /// Each paddle loses height every time it returns the ball
    Shrink,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "Classic",
            GameMode::Shrink => "Shrink",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            GameMode::Classic => GameMode::Shrink,
            GameMode::Shrink => GameMode::Classic,
        }
    }
}

/// Up/down keys for one player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerKeys {
    #[serde(deserialize_with = "deserialize_key")]
    pub up: Key,
    #[serde(deserialize_with = "deserialize_key")]
    pub down: Key,
}

/// Hand-edited files may spell letters in upper case; input never does
fn deserialize_key<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Key, D::Error> {
    Ok(Key::deserialize(deserializer)?.normalized())
}

impl PlayerKeys {
    fn get(&self, action: PaddleAction) -> Key {
        match action {
            PaddleAction::Up => self.up,
            PaddleAction::Down => self.down,
        }
    }

    fn slot_mut(&mut self, action: PaddleAction) -> &mut Key {
        match action {
            PaddleAction::Up => &mut self.up,
            PaddleAction::Down => &mut self.down,
        }
    }
}

/// Key bindings for both players
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub player1: PlayerKeys,
    pub player2: PlayerKeys,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            player1: PlayerKeys {
                up: Key::Char('w'),
                down: Key::Char('s'),
            },
            player2: PlayerKeys {
                up: Key::Up,
                down: Key::Down,
            },
        }
    }
}

impl Controls {
    fn player(&self, player: u8) -> Option<&PlayerKeys> {
        match player {
            1 => Some(&self.player1),
            2 => Some(&self.player2),
            _ => None,
        }
    }

    /// Key bound to `action` for `player` (1 or 2)
    pub fn key_for(&self, player: u8, action: PaddleAction) -> Option<Key> {
        self.player(player).map(|keys| keys.get(action))
    }

    /// Key bound to the action named `action` ("up" / "down")
    pub fn key_for_action(&self, player: u8, action: &str) -> Option<Key> {
        self.key_for(player, PaddleAction::from_name(action)?)
    }

    /// Rebind one action
    pub fn set_key(&mut self, player: u8, action: PaddleAction, key: Key) -> Result<(), ConfigError> {
        let keys = match player {
            1 => &mut self.player1,
            2 => &mut self.player2,
            other => return Err(ConfigError::UnknownPlayer(other)),
        };
        let key = key.normalized();
        *keys.slot_mut(action) = key;
        log::info!("Player {} '{}' bound to {}", player, action.as_str(), key);
        Ok(())
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Paddle key bindings
    pub controls: Controls,
    /// Classic or shrink rules
    pub mode: GameMode,
    /// Points needed to win a match
    pub winning_score: u32,
    /// Downward acceleration on particles (pixels/s², 0 = none)
    pub particle_gravity: f32,
    /// Power-up kinds the spawner picks from
    pub powerup_kinds: Vec<PowerupKind>,
    /// RNG seed for confetti, serves and power-up placement
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            controls: Controls::default(),
            mode: GameMode::Classic,
            winning_score: 5,
            particle_gravity: 300.0,
            powerup_kinds: vec![PowerupKind::BigPaddle],
            seed: 0x5EED,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
