//! Component records and the closed set of component kinds
//!
//! Every component is a plain data record. `Component` is the tagged union the
//! world stores, `ComponentKind` the matching tag used for indexing, and
//! `ComponentData` gives typed access to one variant without reflection.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::renderer::Color;
use crate::scene::GameState;
use crate::settings::PaddleAction;
use crate::sim::time::{Deadline, Millis};

/// World position. Top-left corner for rectangles, center for particles.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position(pub Vec2);

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}

/// Velocity in pixels per second
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity(pub Vec2);

impl Velocity {
    pub fn new(vx: f32, vy: f32) -> Self {
        Self(Vec2::new(vx, vy))
    }
}

/// Axis-aligned bounding box size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

impl Dimensions {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Human-controlled paddle (player 1 or 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paddle {
    pub player: u8,
}

/// Computer-controlled paddle. Never shares an entity with `Paddle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AiControlled;

/// The single ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ball;

/// One player's points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub player: u8,
    pub points: u32,
}

impl Score {
    pub fn new(player: u8) -> Self {
        Self { player, points: 0 }
    }
}

/// Power-up types
///
/// Kinds come from configuration; names this build does not know deserialize
/// to `Unknown`, whose effect is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    /// Taller paddle for the duration
    BigPaddle,
    #[serde(other)]
    Unknown,
}

/// Collectible power-up lying on the field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerupItem {
    pub kind: PowerupKind,
    pub spawned_at: Millis,
}

/// Effect currently in force on a paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivePowerup {
    pub kind: PowerupKind,
    pub activated_at: Millis,
    pub duration: Millis,
    /// Set once the effect has been applied, so it is never applied twice
    pub applied: bool,
}

impl ActivePowerup {
    pub fn new(kind: PowerupKind, activated_at: Millis, duration: Millis) -> Self {
        Self {
            kind,
            activated_at,
            duration,
            applied: false,
        }
    }

    pub fn window(&self) -> Deadline {
        Deadline::armed(self.activated_at, self.duration)
    }
}

/// Short flash on a paddle after it hits the ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitFlash {
    pub activated_at: Millis,
    pub duration: Millis,
}

impl HitFlash {
    pub fn window(&self) -> Deadline {
        Deadline::armed(self.activated_at, self.duration)
    }

    /// Whether the flash should still be drawn at `now`
    pub fn is_active(&self, now: Millis) -> bool {
        !self.window().has_lapsed(now)
    }
}

/// Decorative particle with its own velocity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub born_at: Millis,
    pub lifetime: Millis,
    pub velocity: Vec2,
    pub color: Color,
}

impl Particle {
    pub fn window(&self) -> Deadline {
        Deadline::armed(self.born_at, self.lifetime)
    }
}

/// What a button does when clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonAction {
    /// Request a state change
    Goto(GameState),
    /// Flip between classic and shrink mode
    ToggleMode,
}

/// Clickable menu button
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub action: ButtonAction,
    pub label: String,
    pub hovered: bool,
    pub pressed: bool,
}

impl Button {
    pub fn new(action: ButtonAction, label: impl Into<String>) -> Self {
        Self {
            action,
            label: label.into(),
            hovered: false,
            pressed: false,
        }
    }
}

/// Rebindable control row in the options screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    pub player: u8,
    pub action: PaddleAction,
    /// Waiting for the next key press
    pub listening: bool,
}

/// On-screen pause button in the gameplay scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PauseButton;

/// Typed access to one `Component` variant
pub trait ComponentData: Into<Component> + Sized + 'static {
    const KIND: ComponentKind;

    fn from_component(component: &Component) -> Option<&Self>;
    fn from_component_mut(component: &mut Component) -> Option<&mut Self>;
    fn from_owned(component: Component) -> Option<Self>;
}

macro_rules! components {
    ($($name:ident),* $(,)?) => {
        /// Tag identifying a component kind
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum ComponentKind {
            $($name),*
        }

        impl ComponentKind {
            /// Every kind, in declaration order
            pub const ALL: &'static [ComponentKind] = &[$(ComponentKind::$name),*];
            pub const COUNT: usize = Self::ALL.len();

            /// Slot index in a per-entity component table
            pub fn slot(self) -> usize {
                self as usize
            }
        }

        /// Any component, tagged by kind
        #[derive(Debug, Clone, PartialEq)]
        pub enum Component {
            $($name($name)),*
        }

        impl Component {
            pub fn kind(&self) -> ComponentKind {
                match self {
                    $(Component::$name(_) => ComponentKind::$name),*
                }
            }
        }

        $(
            impl From<$name> for Component {
                fn from(value: $name) -> Self {
                    Component::$name(value)
                }
            }

            impl ComponentData for $name {
                const KIND: ComponentKind = ComponentKind::$name;

                fn from_component(component: &Component) -> Option<&Self> {
                    match component {
                        Component::$name(value) => Some(value),
                        _ => None,
                    }
                }

                fn from_component_mut(component: &mut Component) -> Option<&mut Self> {
                    match component {
                        Component::$name(value) => Some(value),
                        _ => None,
                    }
                }

                fn from_owned(component: Component) -> Option<Self> {
                    match component {
                        Component::$name(value) => Some(value),
                        _ => None,
                    }
                }
            }
        )*
    };
}

components!(
    Position,
    Velocity,
    Dimensions,
    Paddle,
    AiControlled,
    Ball,
    Score,
    PowerupItem,
    ActivePowerup,
    HitFlash,
    Particle,
    Button,
    KeyBinding,
    PauseButton,
);
