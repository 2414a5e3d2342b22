//! Game states and the scene contract
//!
//! Exactly one `GameState` is current. Each state except `Exiting` is owned by
//! a scene that creates its entities in `setup` and destroys them in `cleanup`.
//! Scenes request state changes through `SceneContext::states`; the director
//! in `game` applies them between frames.

pub mod gameplay;
pub mod menu;
pub mod options;
pub mod pause;
pub mod ui;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::ecs::World;
use crate::platform::InputState;
use crate::renderer::Renderer;
use crate::settings::Settings;
use crate::sim::time::Clock;

pub use gameplay::GameplayScene;
pub use menu::MainMenuScene;
pub use options::OptionsScene;
pub use pause::PauseScene;

/// Top-level game states
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GameState {
    MainMenu,
    PlayingSinglePlayer,
    PlayingTwoPlayers,
    Options,
    Paused,
    Exiting,
}

impl GameState {
    pub fn is_playing(self) -> bool {
        matches!(
            self,
            GameState::PlayingSinglePlayer | GameState::PlayingTwoPlayers
        )
    }
}

/// Current and previous state
#[derive(Debug, Clone)]
pub struct StateMachine {
    current: GameState,
    previous: Option<GameState>,
}

impl StateMachine {
    pub fn new(initial: GameState) -> Self {
        Self {
            current: initial,
            previous: None,
        }
    }

    pub fn current(&self) -> GameState {
        self.current
    }

    pub fn previous(&self) -> Option<GameState> {
        self.previous
    }

    /// Switch state; setting the current state again is a no-op
    pub fn set(&mut self, state: GameState) {
        if state == self.current {
            return;
        }
        log::info!("State {:?} -> {:?}", self.current, state);
        self.previous = Some(self.current);
        self.current = state;
    }
}

/// Immutable screen geometry for a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Screen {
    pub width: f32,
    pub height: f32,
}

impl Screen {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.size() / 2.0
    }
}

/// Shared state every scene can read and request changes through
#[derive(Debug, Clone)]
pub struct SceneContext {
    pub settings: Settings,
    pub states: StateMachine,
    pub screen: Screen,
    pub clock: Clock,
    pub rng: Pcg32,
}

impl SceneContext {
    pub fn new(settings: Settings, screen: Screen, initial: GameState) -> Self {
        let rng = Pcg32::seed_from_u64(settings.seed);
        Self {
            settings,
            states: StateMachine::new(initial),
            screen,
            clock: Clock::new(),
            rng,
        }
    }
}

/// Lifecycle of one screen of the game
pub trait Scene {
    /// Create this scene's entities
    fn setup(&mut self, world: &mut World, ctx: &mut SceneContext);

    /// Destroy every entity `setup` created
    fn cleanup(&mut self, world: &mut World);

    fn handle_input(&mut self, world: &mut World, input: &InputState, ctx: &mut SceneContext);

    fn update(&mut self, _world: &mut World, _ctx: &mut SceneContext, _dt: f32) {}

    fn draw(&self, world: &World, ctx: &SceneContext, renderer: &mut dyn Renderer);
}
