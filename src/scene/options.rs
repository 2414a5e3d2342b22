//! Options screen: key rebinding and game mode

use glam::Vec2;

use super::ui::{BUTTON_WIDTH, spawn_button, update_buttons};
use super::{GameState, Scene, SceneContext};
use crate::ecs::{Button, ButtonAction, ComponentKind, Dimensions, Entity, KeyBinding, Position, World};
use crate::platform::{InputState, Key};
use crate::renderer::{Color, Renderer, draw_buttons, draw_key_bindings};
use crate::settings::{GameMode, PaddleAction};
use crate::sim::collision::Rect;

const ROW_WIDTH: f32 = 300.0;
const ROW_HEIGHT: f32 = 40.0;
const FIRST_ROW_Y: f32 = 100.0;
const ROW_SPACING: f32 = 60.0;

fn mode_label(mode: GameMode) -> String {
    format!("Mode: {}", mode.as_str())
}

#[derive(Debug, Default)]
pub struct OptionsScene {
    entities: Vec<Entity>,
    mode_button: Option<Entity>,
}

impl OptionsScene {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(world: &World) -> Vec<Entity> {
        world.query(&[
            ComponentKind::KeyBinding,
            ComponentKind::Position,
            ComponentKind::Dimensions,
        ])
    }

    fn listening_row(world: &World) -> Option<Entity> {
        Self::rows(world)
            .into_iter()
            .find(|e| world.get::<KeyBinding>(*e).is_some_and(|b| b.listening))
    }

    /// Start listening on the clicked row, or stop listening everywhere when
    /// the click missed every row
    fn select_row(world: &mut World, click: Vec2) {
        for row in Self::rows(world) {
            let hit = Rect::of(world, row).is_some_and(|r| r.contains(click));
            if let Some(binding) = world.get_mut::<KeyBinding>(row) {
                binding.listening = hit;
            }
        }
    }

    /// Feed key presses to the listening row. Returns true if one was consumed.
    fn rebind(world: &mut World, input: &InputState, ctx: &mut SceneContext) -> bool {
        let Some(row) = Self::listening_row(world) else {
            return false;
        };
        let Some(key) = input.key_presses().next() else {
            return false;
        };
        let Some(binding) = world.get_mut::<KeyBinding>(row) else {
            return false;
        };
        binding.listening = false;
        let (player, action) = (binding.player, binding.action);

        if key == Key::Escape {
            log::debug!("Rebinding cancelled");
        } else if let Err(e) = ctx.settings.controls.set_key(player, action, key) {
            log::warn!("Rebinding failed: {}", e);
        }
        true
    }
}

impl Scene for OptionsScene {
    fn setup(&mut self, world: &mut World, ctx: &mut SceneContext) {
        let row_x = ctx.screen.width / 2.0 - ROW_WIDTH / 2.0;
        let mut y = FIRST_ROW_Y;
        for player in [1, 2] {
            for action in [PaddleAction::Up, PaddleAction::Down] {
                let row = world.spawn();
                world.insert(row, Position::new(row_x, y));
                world.insert(row, Dimensions::new(ROW_WIDTH, ROW_HEIGHT));
                world.insert(
                    row,
                    KeyBinding {
                        player,
                        action,
                        listening: false,
                    },
                );
                self.entities.push(row);
                y += ROW_SPACING;
            }
        }

        let button_x = ctx.screen.width / 2.0 - BUTTON_WIDTH / 2.0;
        let mode = spawn_button(
            world,
            button_x,
            y + 20.0,
            ButtonAction::ToggleMode,
            &mode_label(ctx.settings.mode),
        );
        let back = spawn_button(
            world,
            button_x,
            y + 90.0,
            ButtonAction::Goto(GameState::MainMenu),
            "Back",
        );
        self.mode_button = Some(mode);
        self.entities.extend([mode, back]);
        log::info!("Options ready");
    }

    fn cleanup(&mut self, world: &mut World) {
        for e in self.entities.drain(..) {
            world.despawn(e);
        }
        self.mode_button = None;
    }

    fn handle_input(&mut self, world: &mut World, input: &InputState, ctx: &mut SceneContext) {
        let was_listening = Self::listening_row(world).is_some();
        if was_listening {
            Self::rebind(world, input, ctx);
        } else if input.key_pressed(Key::Escape) {
            ctx.states.set(GameState::MainMenu);
            return;
        }

        if let Some(click) = input.left_releases().next() {
            Self::select_row(world, click);
        }

        match update_buttons(world, input) {
            Some(ButtonAction::ToggleMode) => {
                ctx.settings.mode = ctx.settings.mode.toggled();
                log::info!("Game mode set to {}", ctx.settings.mode.as_str());
                if let Some(e) = self.mode_button {
                    if let Some(button) = world.get_mut::<Button>(e) {
                        button.label = mode_label(ctx.settings.mode);
                    }
                }
            }
            Some(ButtonAction::Goto(state)) => ctx.states.set(state),
            None => {}
        }
    }

    fn draw(&self, world: &World, ctx: &SceneContext, renderer: &mut dyn Renderer) {
        let title = Vec2::new(ctx.screen.width / 2.0 - 40.0, 40.0);
        renderer.text(title, "OPTIONS", Color::WHITE);
        draw_key_bindings(world, &ctx.settings.controls, renderer);
        draw_buttons(world, renderer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::scene::Screen;
    use crate::settings::Settings;

    fn setup() -> (World, SceneContext, OptionsScene) {
        let mut world = World::new();
        let mut ctx = SceneContext::new(
            Settings::default(),
            Screen::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            GameState::Options,
        );
        let mut options = OptionsScene::new();
        options.setup(&mut world, &mut ctx);
        (world, ctx, options)
    }

    /// Center of the n-th binding row (P1 up, P1 down, P2 up, P2 down)
    fn row_center(n: usize) -> Vec2 {
        Vec2::new(SCREEN_WIDTH / 2.0, FIRST_ROW_Y + n as f32 * ROW_SPACING + ROW_HEIGHT / 2.0)
    }

    fn frame(options: &mut OptionsScene, world: &mut World, ctx: &mut SceneContext, input: &mut InputState) {
        options.handle_input(world, input, ctx);
        input.clear_events();
    }

    #[test]
    fn test_setup_creates_rows_and_buttons() {
        let (world, _, _) = setup();
        assert_eq!(world.count(ComponentKind::KeyBinding), 4);
        assert_eq!(world.count(ComponentKind::Button), 2);
    }

    #[test]
    fn test_click_row_then_press_key_rebinds() {
        let (mut world, mut ctx, mut options) = setup();
        let mut input = InputState::new();

        input.click(row_center(3));
        frame(&mut options, &mut world, &mut ctx, &mut input);
        assert!(OptionsScene::listening_row(&world).is_some());

        input.press(Key::Char('j'));
        frame(&mut options, &mut world, &mut ctx, &mut input);
        assert!(OptionsScene::listening_row(&world).is_none());
        assert_eq!(
            ctx.settings.controls.key_for(2, PaddleAction::Down),
            Some(Key::Char('j'))
        );
    }

    #[test]
    fn test_escape_cancels_listening_only() {
        let (mut world, mut ctx, mut options) = setup();
        let mut input = InputState::new();

        input.click(row_center(0));
        frame(&mut options, &mut world, &mut ctx, &mut input);
        input.press(Key::Escape);
        frame(&mut options, &mut world, &mut ctx, &mut input);

        assert!(OptionsScene::listening_row(&world).is_none());
        assert_eq!(ctx.settings.controls.key_for(1, PaddleAction::Up), Some(Key::Char('w')));
        assert_eq!(ctx.states.current(), GameState::Options);

        // Escape again leaves the screen
        input.release(Key::Escape);
        input.press(Key::Escape);
        frame(&mut options, &mut world, &mut ctx, &mut input);
        assert_eq!(ctx.states.current(), GameState::MainMenu);
    }

    #[test]
    fn test_click_elsewhere_cancels_listening() {
        let (mut world, mut ctx, mut options) = setup();
        let mut input = InputState::new();

        input.click(row_center(1));
        frame(&mut options, &mut world, &mut ctx, &mut input);
        input.click(Vec2::new(5.0, 5.0));
        frame(&mut options, &mut world, &mut ctx, &mut input);
        assert!(OptionsScene::listening_row(&world).is_none());
    }

    #[test]
    fn test_toggle_mode_updates_label() {
        let (mut world, mut ctx, mut options) = setup();
        let mode_button = options.mode_button.unwrap();
        let pos = world.get::<Position>(mode_button).unwrap().0;

        let mut input = InputState::new();
        input.click(pos + Vec2::new(10.0, 10.0));
        frame(&mut options, &mut world, &mut ctx, &mut input);
        assert_eq!(ctx.settings.mode, GameMode::Shrink);
        assert_eq!(world.get::<Button>(mode_button).unwrap().label, "Mode: Shrink");

        options.cleanup(&mut world);
        assert!(world.is_empty());
    }
}
