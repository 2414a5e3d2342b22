//! Game director: owns the world, the scenes and the frame loop
//!
//! Transition rules:
//! - Normal change: old scene `cleanup`, then new scene `setup`
//! - Playing -> Paused: gameplay entities stay, only the pause scene is set up
//! - Paused -> the paused playing state: pause cleanup, gameplay resumes as is,
//!   with the clock where it stopped
//! - Paused -> anything else: pause cleanup, then gameplay cleanup, then setup
//! - Any -> Exiting: active scenes clean up and the loop stops

use std::collections::BTreeMap;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::ecs::World;
use crate::error::GameError;
use crate::platform::InputState;
use crate::renderer::Renderer;
use crate::scene::{
    GameState, GameplayScene, MainMenuScene, OptionsScene, PauseScene, Scene, SceneContext, Screen,
};
use crate::settings::Settings;

pub type SceneRegistry = BTreeMap<GameState, Box<dyn Scene>>;

/// One scene per state the game can be in
pub fn default_scenes() -> SceneRegistry {
    let mut scenes: SceneRegistry = BTreeMap::new();
    scenes.insert(GameState::MainMenu, Box::new(MainMenuScene::new()));
    scenes.insert(
        GameState::PlayingSinglePlayer,
        Box::new(GameplayScene::single_player()),
    );
    scenes.insert(
        GameState::PlayingTwoPlayers,
        Box::new(GameplayScene::two_players()),
    );
    scenes.insert(GameState::Options, Box::new(OptionsScene::new()));
    scenes.insert(GameState::Paused, Box::new(PauseScene::new()));
    scenes
}

fn scene_mut(scenes: &mut SceneRegistry, state: GameState) -> Result<&mut Box<dyn Scene>, GameError> {
    scenes
        .get_mut(&state)
        .ok_or(GameError::SceneNotRegistered(state))
}

pub struct Game {
    world: World,
    ctx: SceneContext,
    scenes: SceneRegistry,
    /// State whose scene is currently set up
    active: GameState,
    /// Playing state frozen underneath the pause overlay
    paused_over: Option<GameState>,
}

impl Game {
    /// Standard game on an 800x600 screen, starting at the main menu
    pub fn new(settings: Settings) -> Result<Self, GameError> {
        Self::with_scenes(
            settings,
            Screen::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            default_scenes(),
            GameState::MainMenu,
        )
    }

    pub fn with_scenes(
        settings: Settings,
        screen: Screen,
        mut scenes: SceneRegistry,
        initial: GameState,
    ) -> Result<Self, GameError> {
        let mut world = World::new();
        let mut ctx = SceneContext::new(settings, screen, initial);
        if initial != GameState::Exiting {
            scene_mut(&mut scenes, initial)?.setup(&mut world, &mut ctx);
        }
        log::info!("Game started in {:?}", initial);
        Ok(Self {
            world,
            ctx,
            scenes,
            active: initial,
            paused_over: None,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn context(&self) -> &SceneContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut SceneContext {
        &mut self.ctx
    }

    pub fn settings(&self) -> &Settings {
        &self.ctx.settings
    }

    /// State whose scene is running
    pub fn state(&self) -> GameState {
        self.active
    }

    pub fn is_running(&self) -> bool {
        self.active != GameState::Exiting
    }

    /// Run one frame
    ///
    /// Returns `Ok(false)` once the game is exiting.
    pub fn frame(
        &mut self,
        input: &InputState,
        dt: f32,
        renderer: &mut dyn Renderer,
    ) -> Result<bool, GameError> {
        if input.quit_requested() {
            self.ctx.states.set(GameState::Exiting);
        }
        self.apply_transition()?;
        if !self.is_running() {
            return Ok(false);
        }
        // Game time stands still under the pause overlay
        if self.paused_over.is_none() {
            self.ctx.clock.advance(dt);
        }

        if let Some(under) = self.paused_over {
            // Gameplay is frozen: drawn, never updated
            scene_mut(&mut self.scenes, under)?.draw(&self.world, &self.ctx, renderer);
        }
        let scene = scene_mut(&mut self.scenes, self.active)?;
        scene.handle_input(&mut self.world, input, &mut self.ctx);
        scene.update(&mut self.world, &mut self.ctx, dt);
        scene.draw(&self.world, &self.ctx, renderer);
        Ok(true)
    }

    /// Apply the state change requested since the last frame, if any
    fn apply_transition(&mut self) -> Result<(), GameError> {
        let from = self.active;
        let to = self.ctx.states.current();
        if from == to {
            return Ok(());
        }

        if to == GameState::Paused && from.is_playing() {
            scene_mut(&mut self.scenes, to)?.setup(&mut self.world, &mut self.ctx);
            self.paused_over = Some(from);
            self.active = to;
            return Ok(());
        }

        scene_mut(&mut self.scenes, from)?.cleanup(&mut self.world);
        if let Some(under) = self.paused_over.take() {
            if under == to {
                log::info!("Resuming {:?}", to);
                self.active = to;
                return Ok(());
            }
            scene_mut(&mut self.scenes, under)?.cleanup(&mut self.world);
        }

        self.active = to;
        if to == GameState::Exiting {
            log::info!("Exiting");
            return Ok(());
        }
        scene_mut(&mut self.scenes, to)?.setup(&mut self.world, &mut self.ctx);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{ComponentKind, Position, Velocity};
    use crate::platform::Key;
    use crate::renderer::DrawList;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn step(game: &mut Game, input: &mut InputState) -> bool {
        let mut list = DrawList::new();
        let running = game.frame(input, DT, &mut list).unwrap();
        input.clear_events();
        running
    }

    fn goto(game: &mut Game, state: GameState) {
        game.context_mut().states.set(state);
        step(game, &mut InputState::new());
        assert_eq!(game.state(), state);
    }

    #[test]
    fn test_starts_in_main_menu() {
        let game = Game::new(Settings::default()).unwrap();
        assert_eq!(game.state(), GameState::MainMenu);
        assert_eq!(game.world().count(ComponentKind::Button), 4);
    }

    #[test]
    fn test_missing_scene_is_an_error() {
        let result = Game::with_scenes(
            Settings::default(),
            Screen::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            SceneRegistry::new(),
            GameState::MainMenu,
        );
        assert_eq!(
            result.err(),
            Some(GameError::SceneNotRegistered(GameState::MainMenu))
        );

        let mut scenes = SceneRegistry::new();
        scenes.insert(GameState::MainMenu, Box::new(MainMenuScene::new()));
        let mut game = Game::with_scenes(
            Settings::default(),
            Screen::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            scenes,
            GameState::MainMenu,
        )
        .unwrap();
        game.context_mut().states.set(GameState::Options);
        let mut list = DrawList::new();
        assert_eq!(
            game.frame(&InputState::new(), DT, &mut list),
            Err(GameError::SceneNotRegistered(GameState::Options))
        );
    }

    #[test]
    fn test_menu_to_play_replaces_entities() {
        let mut game = Game::new(Settings::default()).unwrap();
        goto(&mut game, GameState::PlayingSinglePlayer);
        assert_eq!(game.world().count(ComponentKind::Button), 0);
        assert_eq!(game.world().count(ComponentKind::Ball), 1);
        assert_eq!(game.world().count(ComponentKind::AiControlled), 1);
    }

    #[test]
    fn test_pause_preserves_gameplay() {
        let mut game = Game::new(Settings::default()).unwrap();
        goto(&mut game, GameState::PlayingTwoPlayers);

        let mut input = InputState::new();
        input.press(Key::Escape);
        step(&mut game, &mut input);
        input.release(Key::Escape);
        step(&mut game, &mut input);
        assert_eq!(game.state(), GameState::Paused);

        let ball = game.world().first(&[ComponentKind::Ball]).unwrap();
        let frozen = game.world().get::<Position>(ball).unwrap().0;
        for _ in 0..10 {
            step(&mut game, &mut input);
        }
        assert_eq!(game.world().get::<Position>(ball).unwrap().0, frozen);
        assert_eq!(game.world().count(ComponentKind::Button), 2);

        // Escape resumes the same match without a new setup
        input.press(Key::Escape);
        step(&mut game, &mut input);
        step(&mut game, &mut input);
        assert_eq!(game.state(), GameState::PlayingTwoPlayers);
        assert_eq!(game.world().first(&[ComponentKind::Ball]), Some(ball));
        assert_eq!(game.world().count(ComponentKind::Button), 0);
        assert_ne!(game.world().get::<Position>(ball).unwrap().0, frozen);
    }

    #[test]
    fn test_clock_stops_while_paused() {
        let mut game = Game::new(Settings::default()).unwrap();
        goto(&mut game, GameState::PlayingSinglePlayer);
        goto(&mut game, GameState::Paused);
        let stopped = game.context().clock.now();

        for _ in 0..120 {
            step(&mut game, &mut InputState::new());
        }
        assert_eq!(game.context().clock.now(), stopped);

        goto(&mut game, GameState::PlayingSinglePlayer);
        assert!(game.context().clock.now() > stopped);
        assert!(game.context().clock.now() - stopped <= 17);
    }

    #[test]
    fn test_pause_draws_gameplay_under_overlay() {
        let mut game = Game::new(Settings::default()).unwrap();
        goto(&mut game, GameState::PlayingSinglePlayer);
        goto(&mut game, GameState::Paused);

        let mut list = DrawList::new();
        game.frame(&InputState::new(), DT, &mut list).unwrap();
        let texts: Vec<_> = list.texts().collect();
        // Scores first, then the overlay title and buttons
        assert_eq!(texts, vec!["0", "0", "PAUSED", "Resume", "Main menu"]);
    }

    #[test]
    fn test_pause_to_menu_cleans_up_both() {
        let mut game = Game::new(Settings::default()).unwrap();
        goto(&mut game, GameState::PlayingSinglePlayer);
        goto(&mut game, GameState::Paused);
        goto(&mut game, GameState::MainMenu);
        assert_eq!(game.world().count(ComponentKind::Ball), 0);
        assert_eq!(game.world().count(ComponentKind::Paddle), 0);
        assert_eq!(game.world().count(ComponentKind::Button), 4);
    }

    #[test]
    fn test_quit_event_exits() {
        let mut game = Game::new(Settings::default()).unwrap();
        goto(&mut game, GameState::PlayingTwoPlayers);
        let mut input = InputState::new();
        input.quit();
        assert!(!step(&mut game, &mut input));
        assert!(!game.is_running());
        assert!(game.world().is_empty());
        assert!(!step(&mut game, &mut input));
    }

    #[test]
    fn test_exit_button() {
        let mut game = Game::new(Settings::default()).unwrap();
        let mut input = InputState::new();
        // Fourth menu button
        input.click(Vec2::new(SCREEN_WIDTH / 2.0, 200.0 + 3.0 * 70.0 + 10.0));
        step(&mut game, &mut input);
        assert!(!step(&mut game, &mut input));
    }

    #[test]
    fn test_ball_moves_while_playing() {
        let mut game = Game::new(Settings::default()).unwrap();
        goto(&mut game, GameState::PlayingTwoPlayers);
        let ball = game.world().first(&[ComponentKind::Ball]).unwrap();
        let before = game.world().get::<Position>(ball).unwrap().0;
        step(&mut game, &mut InputState::new());
        let after = game.world().get::<Position>(ball).unwrap().0;
        let vel = game.world().get::<Velocity>(ball).unwrap().0;
        assert!((after - before - vel * DT).length() < 1e-3);
    }
}
