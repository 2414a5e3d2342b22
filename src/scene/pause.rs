//! Pause overlay
//!
//! Drawn over the frozen gameplay frame. Only its own buttons are created
//! and destroyed; the gameplay entities stay untouched.

use glam::Vec2;

use super::ui::{BUTTON_WIDTH, spawn_button, update_buttons};
use super::{GameState, Scene, SceneContext};
use crate::ecs::{ButtonAction, Entity, World};
use crate::platform::{InputState, Key};
use crate::renderer::{Color, Renderer, draw_buttons};

const OVERLAY: Color = Color::rgba(0, 0, 0, 160);

#[derive(Debug, Default)]
pub struct PauseScene {
    entities: Vec<Entity>,
    resume_to: Option<GameState>,
}

impl PauseScene {
    pub fn new() -> Self {
        Self::default()
    }

    fn resume_state(&self) -> GameState {
        self.resume_to.unwrap_or(GameState::MainMenu)
    }
}

impl Scene for PauseScene {
    fn setup(&mut self, world: &mut World, ctx: &mut SceneContext) {
        self.resume_to = ctx.states.previous().filter(|s| s.is_playing());
        let x = ctx.screen.width / 2.0 - BUTTON_WIDTH / 2.0;
        let y = ctx.screen.height / 2.0 - 60.0;
        self.entities = vec![
            spawn_button(world, x, y, ButtonAction::Goto(self.resume_state()), "Resume"),
            spawn_button(world, x, y + 70.0, ButtonAction::Goto(GameState::MainMenu), "Main menu"),
        ];
        log::info!("Paused over {:?}", self.resume_to);
    }

    fn cleanup(&mut self, world: &mut World) {
        for e in self.entities.drain(..) {
            world.despawn(e);
        }
    }

    fn handle_input(&mut self, world: &mut World, input: &InputState, ctx: &mut SceneContext) {
        if input.key_pressed(Key::Escape) {
            ctx.states.set(self.resume_state());
            return;
        }
        if let Some(ButtonAction::Goto(state)) = update_buttons(world, input) {
            ctx.states.set(state);
        }
    }

    fn draw(&self, world: &World, ctx: &SceneContext, renderer: &mut dyn Renderer) {
        renderer.rect(Vec2::ZERO, ctx.screen.size(), OVERLAY);
        let title = Vec2::new(ctx.screen.width / 2.0 - 40.0, ctx.screen.height / 2.0 - 120.0);
        renderer.text(title, "PAUSED", Color::WHITE);
        draw_buttons(world, renderer);
    }
}
